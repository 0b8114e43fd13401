pub mod aladhan;
pub mod calculator;
pub mod clock;
pub mod resolver;
pub mod ticker;

use anyhow::Result;
use chrono::NaiveDate;

use crate::config::{AppConfig, TimesSource};
use crate::models::PrayerTimeSet;

pub use aladhan::AlAdhanClient;
pub use calculator::PrayerCalculator;
pub use clock::{Clock, FixedClock, SystemClock};
pub use resolver::resolve;
pub use ticker::{NextPrayerTicker, TickerState};

/// Something that can tell us a day's prayer times. Shared with the
/// dashboard's background fetches, hence `Send + Sync`.
pub trait TimesProvider: Send + Sync {
    fn times_for_date(&self, date: NaiveDate) -> Result<PrayerTimeSet>;
}

/// Build the provider selected in the config, optionally overriding the source.
pub fn provider_from_config(
    config: &AppConfig,
    source: Option<TimesSource>,
) -> Result<Box<dyn TimesProvider>> {
    let loc = &config.location;
    match source.unwrap_or(config.prayer.source) {
        TimesSource::Offline => Ok(Box::new(PrayerCalculator::new(
            loc.latitude,
            loc.longitude,
            &config.prayer.calc_method,
            &config.prayer.madhab,
            loc.timezone_offset,
        )?)),
        TimesSource::Aladhan => Ok(Box::new(AlAdhanClient::new(
            &config.prayer.aladhan_url,
            loc.latitude,
            loc.longitude,
            aladhan::method_id(&config.prayer.aladhan_method),
        )?)),
    }
}

/// Fetch times, treating any provider failure as "no data yet".
pub fn times_or_absent(provider: &dyn TimesProvider, date: NaiveDate) -> Option<PrayerTimeSet> {
    match provider.times_for_date(date) {
        Ok(times) => Some(times),
        Err(e) => {
            log::warn!("could not load prayer times for {}: {:#}", date, e);
            None
        }
    }
}
