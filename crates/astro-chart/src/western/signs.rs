//! Zodiac signs and their fixed element/modality tables.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

/// Signs in zodiacal order, each with its element and modality
const SIGN_TABLE: [(Sign, &str, Element, Modality); 12] = [
    (Sign::Aries, "Aries", Element::Fire, Modality::Cardinal),
    (Sign::Taurus, "Taurus", Element::Earth, Modality::Fixed),
    (Sign::Gemini, "Gemini", Element::Air, Modality::Mutable),
    (Sign::Cancer, "Cancer", Element::Water, Modality::Cardinal),
    (Sign::Leo, "Leo", Element::Fire, Modality::Fixed),
    (Sign::Virgo, "Virgo", Element::Earth, Modality::Mutable),
    (Sign::Libra, "Libra", Element::Air, Modality::Cardinal),
    (Sign::Scorpio, "Scorpio", Element::Water, Modality::Fixed),
    (Sign::Sagittarius, "Sagittarius", Element::Fire, Modality::Mutable),
    (Sign::Capricorn, "Capricorn", Element::Earth, Modality::Cardinal),
    (Sign::Aquarius, "Aquarius", Element::Air, Modality::Fixed),
    (Sign::Pisces, "Pisces", Element::Water, Modality::Mutable),
];

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    /// Sign at `index` (0 = Aries), wrapping past Pisces
    pub fn from_index(index: usize) -> Sign {
        SIGN_TABLE[index % 12].0
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        SIGN_TABLE[self.index()].1
    }

    pub fn element(self) -> Element {
        SIGN_TABLE[self.index()].2
    }

    pub fn modality(self) -> Modality {
        SIGN_TABLE[self.index()].3
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Cardinal, Modality::Fixed, Modality::Mutable];
}

/// Normalize any longitude into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Sign occupied by a longitude
pub fn sign_of(longitude: f64) -> Sign {
    let normalized = normalize_degrees(longitude);
    Sign::from_index((normalized / 30.0).floor() as usize)
}

/// Unrounded position within the sign, in [0, 30)
pub fn degree_in_sign(longitude: f64) -> f64 {
    normalize_degrees(longitude) % 30.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_element_has_three_signs() {
        for element in Element::ALL {
            let count = Sign::ALL.iter().filter(|s| s.element() == element).count();
            assert_eq!(count, 3, "{:?}", element);
        }
    }

    #[test]
    fn every_modality_has_four_signs() {
        for modality in Modality::ALL {
            let count = Sign::ALL.iter().filter(|s| s.modality() == modality).count();
            assert_eq!(count, 4, "{:?}", modality);
        }
    }

    #[test]
    fn table_order_matches_enum() {
        for (i, sign) in Sign::ALL.iter().enumerate() {
            assert_eq!(sign.index(), i);
            assert_eq!(Sign::from_index(i), *sign);
        }
    }

    #[test]
    fn negative_longitudes_wrap() {
        assert_eq!(sign_of(-10.0), Sign::Pisces);
        assert_eq!(normalize_degrees(-1e-18), 0.0);
        assert_eq!(normalize_degrees(720.5), 0.5);
    }
}
