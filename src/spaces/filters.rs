use serde::{Deserialize, Serialize};

use crate::models::{Amenity, GeoPosition, PrayerSpace, SpaceKind};

/// Hours label for homes that only open for the Friday prayer.
pub const JUMMAH_ONLY: &str = "Jummah Only";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceFilters {
    pub masjid: bool,
    pub home: bool,
    pub wudu: bool,
    pub sisters: bool,
    pub parking: bool,
    pub wheelchair: bool,
    pub jummah: bool,
}

impl Default for SpaceFilters {
    fn default() -> Self {
        Self {
            masjid: true,
            home: true,
            wudu: false,
            sisters: false,
            parking: false,
            wheelchair: false,
            jummah: false,
        }
    }
}

impl SpaceFilters {
    pub fn matches(&self, space: &PrayerSpace) -> bool {
        match space.kind {
            SpaceKind::Masjid if !self.masjid => return false,
            SpaceKind::Home { .. } if !self.home => return false,
            _ => {}
        }

        let required = [
            (self.wudu, Amenity::Wudu),
            (self.sisters, Amenity::SistersArea),
            (self.parking, Amenity::Parking),
            (self.wheelchair, Amenity::WheelchairAccessible),
        ];
        if required.iter().any(|(on, a)| *on && !space.has(*a)) {
            return false;
        }

        // Masjids are assumed to hold Jummah
        match &space.kind {
            SpaceKind::Home { hours, .. } if self.jummah => hours == JUMMAH_ONLY,
            _ => true,
        }
    }

    pub fn apply<'a>(&self, spaces: &'a [PrayerSpace]) -> Vec<&'a PrayerSpace> {
        spaces.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Spaces paired with their distance from `from`, closest first.
pub fn nearest<'a>(spaces: &[&'a PrayerSpace], from: &GeoPosition) -> Vec<(&'a PrayerSpace, f64)> {
    let mut with_distance: Vec<_> = spaces
        .iter()
        .map(|s| (*s, from.distance_km(&s.position)))
        .collect();
    with_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
    with_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spaces::catalog::sample_spaces;

    fn ids(filters: &SpaceFilters) -> Vec<String> {
        let spaces = sample_spaces();
        filters
            .apply(&spaces)
            .into_iter()
            .map(|s| s.id.clone())
            .collect()
    }

    #[test]
    fn defaults_show_everything() {
        assert_eq!(ids(&SpaceFilters::default()).len(), 6);
    }

    #[test]
    fn type_toggles() {
        let masjids_only = SpaceFilters {
            home: false,
            ..Default::default()
        };
        assert_eq!(ids(&masjids_only), vec!["m1", "m2", "m3"]);

        let nothing = SpaceFilters {
            home: false,
            masjid: false,
            ..Default::default()
        };
        assert!(ids(&nothing).is_empty());
    }

    #[test]
    fn amenities_are_all_required() {
        let f = SpaceFilters {
            wudu: true,
            sisters: true,
            ..Default::default()
        };
        assert_eq!(ids(&f), vec!["m1", "h2"]);

        let f = SpaceFilters {
            wheelchair: true,
            ..Default::default()
        };
        assert_eq!(ids(&f), vec!["m1"]);
    }

    #[test]
    fn jummah_keeps_masjids_and_jummah_homes() {
        let f = SpaceFilters {
            jummah: true,
            ..Default::default()
        };
        assert_eq!(ids(&f), vec!["m1", "m2", "m3", "h3"]);

        // Amenity filters still apply to masjids under Jummah
        let f = SpaceFilters {
            jummah: true,
            sisters: true,
            ..Default::default()
        };
        assert_eq!(ids(&f), vec!["m1"]);
    }

    #[test]
    fn nearest_sorts_by_distance() {
        let spaces = sample_spaces();
        let all = SpaceFilters::default().apply(&spaces);
        // Standing right at Khadija's guest room
        let here = GeoPosition::new(39.1280, -77.1800);
        let sorted = nearest(&all, &here);
        assert_eq!(sorted[0].0.id, "h2");
        assert!(sorted[0].1 < 0.001);
        assert!(sorted.windows(2).all(|w| w[0].1 <= w[1].1));
        assert_eq!(sorted.last().unwrap().0.id, "m3");
    }
}
