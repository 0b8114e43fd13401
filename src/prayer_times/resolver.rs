use chrono::NaiveDateTime;

use crate::models::{PrayerName, PrayerTimeSet, ResolvedNextPrayer};

/// Work out which prayer comes next after `now` and how many whole seconds
/// remain until it.
///
/// `times` must be the set computed for `now`'s calendar day. `None` means
/// no data has arrived yet and yields `None`.
///
/// A prayer whose timestamp equals `now` has already arrived and is skipped.
/// Once Isha has passed, the answer is Fajr on the following day, using
/// today's Fajr time.
pub fn resolve(times: Option<&PrayerTimeSet>, now: NaiveDateTime) -> Option<ResolvedNextPrayer> {
    let times = times?;
    let today = now.date();

    let upcoming = PrayerName::CANONICAL
        .iter()
        .map(|&name| (name, today.and_time(times.time(name))))
        .find(|(_, at)| *at > now);

    let (name, target) = match upcoming {
        Some(found) => found,
        None => {
            // All prayers passed, next is Fajr tomorrow
            let tomorrow = today.succ_opt().unwrap_or(today);
            (PrayerName::Fajr, tomorrow.and_time(times.fajr))
        }
    };

    debug_assert!(name.is_canonical());
    let seconds_remaining = (target - now).num_seconds().max(0) as u64;
    Some(ResolvedNextPrayer {
        name,
        seconds_remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveTime};

    fn sample_times() -> PrayerTimeSet {
        PrayerTimeSet::parse("05:30", "06:45", "12:15", "15:45", "18:20", "19:45").unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn next(times: &PrayerTimeSet, now: NaiveDateTime) -> ResolvedNextPrayer {
        resolve(Some(times), now).expect("times are present")
    }

    #[test]
    fn absent_times_resolve_to_nothing() {
        assert_eq!(resolve(None, at(12, 0, 0)), None);
    }

    #[test]
    fn afternoon_points_at_maghrib() {
        let r = next(&sample_times(), at(17, 0, 0));
        assert_eq!(r.name, PrayerName::Maghrib);
        assert_eq!(r.seconds_remaining, 4800);
    }

    #[test]
    fn after_isha_rolls_to_tomorrows_fajr() {
        let r = next(&sample_times(), at(20, 0, 0));
        assert_eq!(r.name, PrayerName::Fajr);
        // 4h to midnight plus 5h30m
        assert_eq!(r.seconds_remaining, 34_200);

        let seconds_left_today = 4 * 3600;
        assert!(r.seconds_remaining > seconds_left_today);
    }

    #[test]
    fn before_fajr_counts_to_todays_fajr() {
        let times = sample_times();
        for now in [at(0, 0, 0), at(3, 17, 42), at(5, 29, 59)] {
            let r = next(&times, now);
            assert_eq!(r.name, PrayerName::Fajr);
            let target = now.date().and_time(times.fajr);
            assert_eq!(r.seconds_remaining as i64, (target - now).num_seconds());
        }
    }

    #[test]
    fn exact_prayer_time_is_not_next() {
        let times = sample_times();
        let r = next(&times, at(12, 15, 0));
        assert_eq!(r.name, PrayerName::Asr);
        assert_eq!(r.seconds_remaining, 3 * 3600 + 30 * 60);

        let r = next(&times, at(19, 45, 0));
        assert_eq!(r.name, PrayerName::Fajr);
        assert_eq!(r.seconds_remaining, (4 * 3600 + 15 * 60) + (5 * 3600 + 30 * 60));
    }

    #[test]
    fn sunrise_is_never_next() {
        let r = next(&sample_times(), at(6, 0, 0));
        assert_eq!(r.name, PrayerName::Dhuhr);
        assert_eq!(r.seconds_remaining, 6 * 3600 + 15 * 60);
    }

    #[test]
    fn sub_second_now_is_floored() {
        let now = at(18, 19, 58) + Duration::milliseconds(400);
        let r = next(&sample_times(), now);
        assert_eq!(r.name, PrayerName::Maghrib);
        assert_eq!(r.seconds_remaining, 1);
    }

    #[test]
    fn order_wins_over_magnitude() {
        // Out of order Dhuhr still wins because it comes first canonically.
        let times =
            PrayerTimeSet::parse("05:30", "06:45", "16:00", "15:45", "18:20", "19:45").unwrap();
        let r = next(&times, at(15, 0, 0));
        assert_eq!(r.name, PrayerName::Dhuhr);
        assert_eq!(r.seconds_remaining, 3600);
    }

    #[test]
    fn countdown_decreases_by_one_each_second() {
        let times = sample_times();
        let start = at(0, 0, 0);
        let mut prev = next(&times, start);

        for step in 1..(24 * 3600) {
            let now = start + Duration::seconds(step);
            let cur = next(&times, now);
            if cur.name == prev.name && cur.seconds_remaining + 1 == prev.seconds_remaining {
                prev = cur;
                continue;
            }

            // Anything else must be a hand-over at the moment a prayer arrives.
            assert_eq!(prev.seconds_remaining, 1, "jump at {}", now);
            assert_eq!(now.time(), times.time(prev.name));
            let expected = match prev.name {
                PrayerName::Fajr => PrayerName::Dhuhr,
                PrayerName::Dhuhr => PrayerName::Asr,
                PrayerName::Asr => PrayerName::Maghrib,
                PrayerName::Maghrib => PrayerName::Isha,
                PrayerName::Isha | PrayerName::Sunrise => PrayerName::Fajr,
            };
            assert_eq!(cur.name, expected);
            prev = cur;
        }
    }

    #[test]
    fn fajr_at_midnight_edge() {
        let times =
            PrayerTimeSet::parse("00:00", "06:45", "12:15", "15:45", "18:20", "23:59").unwrap();
        let r = next(&times, at(23, 59, 0));
        assert_eq!(r.name, PrayerName::Fajr);
        assert_eq!(r.seconds_remaining, 60);
        assert_eq!(times.fajr, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }
}
