use crate::models::{Amenity, GeoPosition, PrayerSpace, SpaceKind};

fn masjid(id: &str, name: &str, lat: f64, lng: f64, amenities: &[Amenity]) -> PrayerSpace {
    PrayerSpace {
        id: id.to_string(),
        name: name.to_string(),
        position: GeoPosition::new(lat, lng),
        kind: SpaceKind::Masjid,
        amenities: amenities.to_vec(),
    }
}

fn home(
    id: &str,
    name: &str,
    lat: f64,
    lng: f64,
    capacity: u32,
    hours: &str,
    amenities: &[Amenity],
) -> PrayerSpace {
    PrayerSpace {
        id: id.to_string(),
        name: name.to_string(),
        position: GeoPosition::new(lat, lng),
        kind: SpaceKind::Home {
            capacity,
            hours: hours.to_string(),
        },
        amenities: amenities.to_vec(),
    }
}

/// Known spaces around Gaithersburg, MD. There is no backing store yet.
pub fn sample_spaces() -> Vec<PrayerSpace> {
    use Amenity::*;
    vec![
        masjid(
            "m1",
            "Islamic Center of Maryland",
            39.1376,
            -77.1511,
            &[Wudu, Parking, WheelchairAccessible, SistersArea],
        ),
        masjid(
            "m2",
            "Islamic Community Center of Potomac",
            39.0911,
            -77.2458,
            &[Wudu, Parking],
        ),
        home("h1", "Ahmed's Prayer Space", 39.1550, -77.2050, 8, "Dhuhr & Asr", &[Wudu]),
        home(
            "h2",
            "Khadija's Guest Room",
            39.1280,
            -77.1800,
            4,
            "All day",
            &[Wudu, SistersArea],
        ),
        masjid("m3", "Muslim Community Center", 39.1162, -77.0135, &[Wudu, Parking]),
        home(
            "h3",
            "Yusuf's Garage Musalla",
            39.1422,
            -77.2352,
            12,
            super::filters::JUMMAH_ONLY,
            &[Parking],
        ),
    ]
}
