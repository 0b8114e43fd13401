pub mod prayer;
pub mod space;

pub use prayer::{PrayerName, PrayerTimeSet, ResolvedNextPrayer, TimeParseError};
pub use space::{Amenity, GeoPosition, PrayerSpace, SpaceKind};
