use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Timelike, Utc};
use salah::prelude::*;

use crate::models::PrayerTimeSet;
use crate::prayer_times::TimesProvider;

/// Offline astronomical calculation for a fixed location.
///
/// Times come out in the configured UTC offset, or in the system timezone
/// when none is set. The latter tracks daylight saving the same way
/// `SystemClock` does, so the resolver compares like with like.
pub struct PrayerCalculator {
    pub lat: f64,
    pub lng: f64,
    pub method_str: String,
    pub madhab_str: String,
    pub tz_offset_minutes: Option<i32>,
}

impl PrayerCalculator {
    pub fn new(
        lat: f64,
        lng: f64,
        method: &str,
        madhab: &str,
        tz_offset_minutes: Option<i32>,
    ) -> Result<Self> {
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        if let Some(minutes) = tz_offset_minutes {
            fixed_offset(minutes)?;
        }
        Ok(Self {
            lat,
            lng,
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
            tz_offset_minutes,
        })
    }

    pub fn times_for_date(&self, date: NaiveDate) -> Result<PrayerTimeSet> {
        let coords = Coordinates::new(self.lat, self.lng);
        let method = parse_method(&self.method_str)?;
        let madhab = parse_madhab(&self.madhab_str)?;
        let params = Configuration::with(method, madhab);

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| anyhow!("Prayer calculation failed: {}", e))?;

        let offset = self.tz_offset_minutes.map(fixed_offset).transpose()?;

        // Providers publish minute precision; drop the seconds to match.
        let to_local = |utc: DateTime<Utc>| -> NaiveTime {
            let t = match offset {
                Some(fixed) => utc.with_timezone(&fixed).time(),
                None => utc.with_timezone(&Local).time(),
            };
            t.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(t)
        };

        log::debug!(
            "calculated times for {} at ({}, {}) using {}/{}",
            date,
            self.lat,
            self.lng,
            self.method_str,
            self.madhab_str
        );

        Ok(PrayerTimeSet {
            fajr: to_local(times.time(Prayer::Fajr)),
            sunrise: to_local(times.time(Prayer::Sunrise)),
            dhuhr: to_local(times.time(Prayer::Dhuhr)),
            asr: to_local(times.time(Prayer::Asr)),
            maghrib: to_local(times.time(Prayer::Maghrib)),
            isha: to_local(times.time(Prayer::Isha)),
        })
    }
}

impl TimesProvider for PrayerCalculator {
    fn times_for_date(&self, date: NaiveDate) -> Result<PrayerTimeSet> {
        PrayerCalculator::times_for_date(self, date)
    }
}

fn fixed_offset(minutes: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(minutes * 60).ok_or_else(|| anyhow!("Invalid timezone offset: {}", minutes))
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow!("Unknown calculation method: '{}'", s)),
    }
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}

pub const CALC_METHODS: &[&str] = &[
    "MuslimWorldLeague",
    "Egyptian",
    "Karachi",
    "UmmAlQura",
    "Dubai",
    "MoonsightingCommittee",
    "NorthAmerica",
    "Kuwait",
    "Qatar",
    "Singapore",
    "Tehran",
    "Turkey",
    "Other",
];

pub const MADHABS: &[&str] = &["Hanafi", "Shafi"];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_unknown_method_and_madhab() {
        assert!(PrayerCalculator::new(39.14, -77.20, "Sundial", "Hanafi", None).is_err());
        assert!(PrayerCalculator::new(39.14, -77.20, "NorthAmerica", "Maliki", None).is_err());
        assert!(PrayerCalculator::new(39.14, -77.20, "NorthAmerica", "Shafi", Some(24 * 60)).is_err());
    }

    #[test]
    fn every_listed_method_is_accepted() {
        for m in CALC_METHODS {
            for madhab in MADHABS {
                assert!(PrayerCalculator::new(0.0, 0.0, m, madhab, Some(0)).is_ok(), "{}", m);
            }
        }
    }

    #[test]
    fn summer_times_in_maryland_are_ordered() {
        let calc =
            PrayerCalculator::new(39.1434, -77.2014, "NorthAmerica", "Shafi", Some(-240)).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let times = calc.times_for_date(date).unwrap();

        assert!(times.is_monotonic());
        assert!(times.fajr < times.sunrise && times.sunrise < times.dhuhr);
        // Solar noon around 13:10 EDT in mid-June
        assert_eq!(times.dhuhr.hour(), 13, "dhuhr {}", times.dhuhr);
        assert_eq!(times.fajr.second(), 0);
    }

    #[test]
    fn unset_offset_follows_system_timezone_in_summer() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let noon = date.and_hms_opt(12, 0, 0).unwrap();
        let system_minutes = Local
            .from_local_datetime(&noon)
            .earliest()
            .expect("noon exists locally")
            .offset()
            .local_minus_utc()
            / 60;

        let system = PrayerCalculator::new(39.1434, -77.2014, "NorthAmerica", "Shafi", None)
            .unwrap()
            .times_for_date(date)
            .unwrap();
        let pinned =
            PrayerCalculator::new(39.1434, -77.2014, "NorthAmerica", "Shafi", Some(system_minutes))
                .unwrap()
                .times_for_date(date)
                .unwrap();

        // Summer offset of the day itself, not a standard-time constant
        assert_eq!(system.dhuhr, pinned.dhuhr);
        assert_eq!(system.maghrib, pinned.maghrib);
        assert_eq!(system.isha, pinned.isha);
    }
}
