//! Client for the public Al-Adhan timings API.
//!
//! `GET {base}/v1/timings/{DD-MM-YYYY}?latitude=..&longitude=..&method=..`
//! answers with `{ code, status, data: { timings: { Fajr: "05:30", .. } } }`.

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{PrayerName, PrayerTimeSet, TimeParseError};
use crate::prayer_times::TimesProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.aladhan.com";

/// Islamic Society of North America, used when nothing else matches.
pub const DEFAULT_METHOD_ID: u8 = 2;

/// Calculation methods the API understands, by id.
pub const METHODS: &[(&str, u8)] = &[
    ("Shia Ithna-Ansari", 0),
    ("University of Islamic Sciences, Karachi", 1),
    ("Islamic Society of North America (ISNA)", 2),
    ("Muslim World League", 3),
    ("Umm al-Qura University, Makkah", 4),
    ("Egyptian General Authority of Survey", 5),
    ("Institute of Geophysics, University of Tehran", 7),
    ("Gulf Region", 8),
    ("Kuwait", 9),
    ("Qatar", 10),
    ("Majlis Ugama Islam Singapura, Singapore", 11),
    ("Union Organization islamic de France", 12),
    ("Diyanet İşleri Başkanlığı, Turkey", 13),
    ("Spiritual Administration of Muslims of Russia", 14),
    ("Moonsighting Committee Worldwide", 15),
    ("Dubai", 16),
];

/// Look up a method id by name: exact match, then the first method whose
/// name contains `name` (case-insensitive), then ISNA.
pub fn method_id(name: &str) -> u8 {
    let name = name.trim();
    if name.is_empty() {
        return DEFAULT_METHOD_ID;
    }
    if let Some((_, id)) = METHODS.iter().find(|(n, _)| *n == name) {
        return *id;
    }
    let needle = name.to_lowercase();
    METHODS
        .iter()
        .find(|(n, _)| n.to_lowercase().contains(&needle))
        .map(|(_, id)| *id)
        .unwrap_or(DEFAULT_METHOD_ID)
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API call failed with status: {0}")]
    Status(u16),
    #[error("API returned error status: {code} {status}")]
    Api { code: u16, status: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Times(#[from] TimeParseError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Timings {
    fajr: String,
    sunrise: String,
    dhuhr: String,
    asr: String,
    maghrib: String,
    isha: String,
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    timings: Timings,
}

#[derive(Debug, Deserialize)]
struct TimingsResponse {
    code: u16,
    status: String,
    // A timings object on success, an error message string otherwise
    #[serde(default)]
    data: serde_json::Value,
}

/// Turn a response body into a `PrayerTimeSet`.
pub fn parse_response(body: &str) -> Result<PrayerTimeSet, ProviderError> {
    let resp: TimingsResponse = serde_json::from_str(body)?;

    if resp.code != 200 {
        return Err(ProviderError::Api {
            code: resp.code,
            status: resp.status,
        });
    }

    let data: TimingsData = serde_json::from_value(resp.data)?;
    let t = data.timings;
    PrayerTimeSet::parse(&t.fajr, &t.sunrise, &t.dhuhr, &t.asr, &t.maghrib, &t.isha)
        .map_err(ProviderError::from)
}

pub struct AlAdhanClient {
    base_url: String,
    http: reqwest::blocking::Client,
    pub lat: f64,
    pub lng: f64,
    pub method: u8,
}

impl AlAdhanClient {
    pub fn new(base_url: &str, lat: f64, lng: f64, method: u8) -> Result<Self, ProviderError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("musalla/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            lat,
            lng,
            method,
        })
    }

    pub fn url_for(&self, date: NaiveDate) -> String {
        format!("{}/v1/timings/{}", self.base_url, date.format("%d-%m-%Y"))
    }

    pub fn fetch(&self, date: NaiveDate) -> Result<PrayerTimeSet, ProviderError> {
        let url = self.url_for(date);
        log::debug!("fetching prayer times from {}", url);

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("latitude", self.lat.to_string()),
                ("longitude", self.lng.to_string()),
                ("method", self.method.to_string()),
            ])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = resp.text()?;
        let times = parse_response(&body)?;
        if !times.is_monotonic() {
            log::warn!(
                "provider returned out-of-order times (Dhuhr {}, Asr {})",
                times.time(PrayerName::Dhuhr),
                times.time(PrayerName::Asr)
            );
        }
        Ok(times)
    }
}

impl TimesProvider for AlAdhanClient {
    fn times_for_date(&self, date: NaiveDate) -> Result<PrayerTimeSet> {
        Ok(self.fetch(date)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    const OK_BODY: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {
                "Fajr": "05:30",
                "Sunrise": "06:45",
                "Dhuhr": "12:15",
                "Asr": "15:45",
                "Sunset": "18:18",
                "Maghrib": "18:20",
                "Isha": "19:45",
                "Imsak": "05:20",
                "Midnight": "00:32"
            },
            "date": { "readable": "14 Jun 2024" }
        }
    }"#;

    #[test]
    fn parses_timings_and_ignores_extra_fields() {
        let times = parse_response(OK_BODY).unwrap();
        assert_eq!(times.maghrib, NaiveTime::from_hms_opt(18, 20, 0).unwrap());
        assert_eq!(times.sunrise, NaiveTime::from_hms_opt(6, 45, 0).unwrap());
    }

    #[test]
    fn zone_suffix_is_tolerated() {
        let body = OK_BODY.replace("\"05:30\"", "\"05:30 (EDT)\"");
        let times = parse_response(&body).unwrap();
        assert_eq!(times.fajr, NaiveTime::from_hms_opt(5, 30, 0).unwrap());
    }

    #[test]
    fn api_error_code_is_reported() {
        let body = r#"{ "code": 400, "status": "BAD_REQUEST", "data": "Please specify a latitude" }"#;
        match parse_response(body) {
            Err(ProviderError::Api { code, status }) => {
                assert_eq!(code, 400);
                assert_eq!(status, "BAD_REQUEST");
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_timings_on_success_is_a_decode_error() {
        let body = r#"{ "code": 200, "status": "OK", "data": {} }"#;
        assert!(matches!(parse_response(body), Err(ProviderError::Decode(_))));
    }

    #[test]
    fn bad_time_is_reported() {
        let body = OK_BODY.replace("\"12:15\"", "\"noon\"");
        assert!(matches!(
            parse_response(&body),
            Err(ProviderError::Times(TimeParseError::Malformed {
                prayer: PrayerName::Dhuhr,
                ..
            }))
        ));
    }

    #[test]
    fn method_lookup() {
        assert_eq!(method_id("Muslim World League"), 3);
        assert_eq!(method_id("Shia Ithna-Ansari"), 0);
        assert_eq!(method_id("karachi"), 1);
        assert_eq!(method_id("turkey"), 13);
        assert_eq!(method_id("Something Else Entirely"), DEFAULT_METHOD_ID);
        assert_eq!(method_id("  "), DEFAULT_METHOD_ID);
    }

    #[test]
    fn url_uses_day_month_year() {
        let client = AlAdhanClient::new("https://example.test/", 39.1, -77.2, 2).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        assert_eq!(client.url_for(date), "https://example.test/v1/timings/04-06-2024");
    }
}
