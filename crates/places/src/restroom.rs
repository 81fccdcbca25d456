//! The restroom payload.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Facilities a restroom may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amenity {
    /// Step-free, wide stalls
    WheelchairAccessible,
    /// Changing table available
    BabyChanging,
    /// Unisex / all-gender
    GenderNeutral,
    /// No fee
    Free,
    /// Open around the clock
    Open24h,
    /// Shower available
    Shower,
}

impl Amenity {
    /// All amenities, in display order.
    pub const ALL: [Amenity; 6] = [
        Amenity::WheelchairAccessible,
        Amenity::BabyChanging,
        Amenity::GenderNeutral,
        Amenity::Free,
        Amenity::Open24h,
        Amenity::Shower,
    ];

    /// Canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::WheelchairAccessible => "wheelchair_accessible",
            Amenity::BabyChanging => "baby_changing",
            Amenity::GenderNeutral => "gender_neutral",
            Amenity::Free => "free",
            Amenity::Open24h => "open_24h",
            Amenity::Shower => "shower",
        }
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Amenity {
    type Err = String;

    /// Accepts the canonical names plus the aliases providers use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "wheelchair_accessible" | "wheelchair" | "accessible" => Ok(Amenity::WheelchairAccessible),
            "baby_changing" | "changing_table" | "baby" => Ok(Amenity::BabyChanging),
            "gender_neutral" | "unisex" | "all_gender" => Ok(Amenity::GenderNeutral),
            "free" | "no_fee" => Ok(Amenity::Free),
            "open_24h" | "24h" | "24_7" => Ok(Amenity::Open24h),
            "shower" | "showers" => Ok(Amenity::Shower),
            _ => Err(format!("Unknown amenity: {}", s)),
        }
    }
}

/// Everything the map shows about a restroom besides its position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Restroom {
    /// Display name
    pub name: String,
    /// Street address, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Average rating, 0 to 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Cleanliness score, 0 to 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanliness: Option<f64>,
    /// Provider category, e.g. "public", "cafe", "gas_station"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Facilities on site
    #[serde(default)]
    pub amenities: BTreeSet<Amenity>,
    /// Number of reviews behind the rating
    #[serde(default)]
    pub review_count: u32,
}

impl Restroom {
    /// Creates a restroom with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns true if every amenity in `required` is present.
    pub fn has_all(&self, required: &BTreeSet<Amenity>) -> bool {
        required.is_subset(&self.amenities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amenity_aliases() {
        assert_eq!("unisex".parse::<Amenity>(), Ok(Amenity::GenderNeutral));
        assert_eq!("Changing-Table".parse::<Amenity>(), Ok(Amenity::BabyChanging));
        assert!("24/7".parse::<Amenity>().is_err());
        assert_eq!("open 24h".parse::<Amenity>(), Ok(Amenity::Open24h));
    }

    #[test]
    fn test_amenity_round_trips_through_display() {
        for amenity in Amenity::ALL {
            assert_eq!(amenity.to_string().parse::<Amenity>(), Ok(amenity));
        }
    }

    #[test]
    fn test_has_all() {
        let mut restroom = Restroom::named("Central Station");
        restroom.amenities.insert(Amenity::Free);
        restroom.amenities.insert(Amenity::BabyChanging);

        let mut required = BTreeSet::new();
        assert!(restroom.has_all(&required));
        required.insert(Amenity::Free);
        assert!(restroom.has_all(&required));
        required.insert(Amenity::Shower);
        assert!(!restroom.has_all(&required));
    }
}
