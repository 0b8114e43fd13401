use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPosition {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in kilometres (haversine).
    pub fn distance_km(&self, other: &GeoPosition) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Amenity {
    Wudu,
    SistersArea,
    Parking,
    WheelchairAccessible,
}

impl Amenity {
    pub fn label(&self) -> &'static str {
        match self {
            Amenity::Wudu => "Wudu",
            Amenity::SistersArea => "Sisters Area",
            Amenity::Parking => "Parking",
            Amenity::WheelchairAccessible => "Wheelchair Accessible",
        }
    }
}

impl std::fmt::Display for Amenity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Amenity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(&['-', '_', ' ', '\''][..], "").as_str() {
            "wudu" => Ok(Amenity::Wudu),
            "sisters" | "sistersarea" => Ok(Amenity::SistersArea),
            "parking" => Ok(Amenity::Parking),
            "wheelchair" | "wheelchairaccessible" => Ok(Amenity::WheelchairAccessible),
            _ => Err(anyhow::anyhow!(
                "Unknown amenity '{}'. Use: wudu, sisters, parking, wheelchair",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpaceKind {
    Masjid,
    Home { capacity: u32, hours: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerSpace {
    pub id: String,
    pub name: String,
    pub position: GeoPosition,
    pub kind: SpaceKind,
    pub amenities: Vec<Amenity>,
}

impl PrayerSpace {
    pub fn is_masjid(&self) -> bool {
        matches!(self.kind, SpaceKind::Masjid)
    }

    pub fn has(&self, amenity: Amenity) -> bool {
        self.amenities.contains(&amenity)
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            SpaceKind::Masjid => "masjid",
            SpaceKind::Home { .. } => "home",
        }
    }
}
