use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// Order used to pick the next prayer. Sunrise is shown but never "next".
    pub const CANONICAL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub const ALL: [PrayerName; 6] = [
        PrayerName::Fajr,
        PrayerName::Sunrise,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Sunrise => "Sunrise",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }

    pub fn is_canonical(&self) -> bool {
        *self != PrayerName::Sunrise
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerName::Fajr),
            "sunrise" => Ok(PrayerName::Sunrise),
            "dhuhr" | "zuhr" | "duhr" => Ok(PrayerName::Dhuhr),
            "asr" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" => Ok(PrayerName::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("missing time for {0}")]
    Missing(PrayerName),
    #[error("bad time '{value}' for {prayer}")]
    Malformed { prayer: PrayerName, value: String },
}

/// Parse the leading `HH:MM` of a provider string such as `"05:30"` or
/// `"05:30 (EST)"`.
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    let token = s.split_whitespace().next()?;
    NaiveTime::parse_from_str(token, "%H:%M").ok()
}

/// One day's prayer times at one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerTimeSet {
    pub fajr: NaiveTime,
    pub sunrise: NaiveTime,
    pub dhuhr: NaiveTime,
    pub asr: NaiveTime,
    pub maghrib: NaiveTime,
    pub isha: NaiveTime,
}

impl PrayerTimeSet {
    pub fn time(&self, prayer: PrayerName) -> NaiveTime {
        match prayer {
            PrayerName::Fajr => self.fajr,
            PrayerName::Sunrise => self.sunrise,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }

    /// All six entries in display order.
    pub fn entries(&self) -> [(PrayerName, NaiveTime); 6] {
        PrayerName::ALL.map(|p| (p, self.time(p)))
    }

    /// Build from `HH:MM` strings keyed by prayer.
    pub fn from_strings<S: AsRef<str>>(
        map: &BTreeMap<PrayerName, S>,
    ) -> Result<Self, TimeParseError> {
        let get = |prayer: PrayerName| -> Result<NaiveTime, TimeParseError> {
            let raw = map.get(&prayer).ok_or(TimeParseError::Missing(prayer))?;
            parse_hhmm(raw.as_ref()).ok_or_else(|| TimeParseError::Malformed {
                prayer,
                value: raw.as_ref().to_string(),
            })
        };

        Ok(Self {
            fajr: get(PrayerName::Fajr)?,
            sunrise: get(PrayerName::Sunrise)?,
            dhuhr: get(PrayerName::Dhuhr)?,
            asr: get(PrayerName::Asr)?,
            maghrib: get(PrayerName::Maghrib)?,
            isha: get(PrayerName::Isha)?,
        })
    }

    /// Convenience for the common positional form, in `PrayerName::ALL` order.
    pub fn parse(
        fajr: &str,
        sunrise: &str,
        dhuhr: &str,
        asr: &str,
        maghrib: &str,
        isha: &str,
    ) -> Result<Self, TimeParseError> {
        let map: BTreeMap<PrayerName, &str> = PrayerName::ALL
            .into_iter()
            .zip([fajr, sunrise, dhuhr, asr, maghrib, isha])
            .collect();
        Self::from_strings(&map)
    }

    /// True when the canonical five never go backwards within the day.
    pub fn is_monotonic(&self) -> bool {
        PrayerName::CANONICAL
            .windows(2)
            .all(|w| self.time(w[0]) <= self.time(w[1]))
    }
}

/// The prayer that comes next and how long until it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedNextPrayer {
    pub name: PrayerName,
    pub seconds_remaining: u64,
}
