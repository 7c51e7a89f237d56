use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Celestial bodies the engine can place.
///
/// Declaration order is the output order for placements and aspect pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    NorthNode,
    SouthNode,
}

impl Body {
    pub const ALL: [Body; 13] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Chiron,
        Body::NorthNode,
        Body::SouthNode,
    ];

    /// The ten bodies placed when no body list is configured
    pub const DEFAULT_SET: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::Chiron => "chiron",
            Body::NorthNode => "north_node",
            Body::SouthNode => "south_node",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Body {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Body::ALL
            .iter()
            .copied()
            .find(|body| body.id() == wanted)
            .ok_or_else(|| format!("unknown body '{}'", s))
    }
}

/// House division systems, keyed by their one-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HouseSystem {
    Placidus,
    Koch,
    WholeSign,
    Equal,
    Regiomontanus,
    Campanus,
    Alcabitius,
    Morinus,
    Porphyry,
}

/// House system mapping: (name, code)
const HOUSE_SYSTEMS: &[(HouseSystem, &str, char)] = &[
    (HouseSystem::Placidus, "placidus", 'P'),
    (HouseSystem::Koch, "koch", 'K'),
    (HouseSystem::WholeSign, "whole_sign", 'W'),
    (HouseSystem::Equal, "equal", 'E'),
    (HouseSystem::Regiomontanus, "regiomontanus", 'R'),
    (HouseSystem::Campanus, "campanus", 'C'),
    (HouseSystem::Alcabitius, "alcabitius", 'A'),
    (HouseSystem::Morinus, "morinus", 'M'),
    (HouseSystem::Porphyry, "porphyry", 'O'),
];

impl Default for HouseSystem {
    fn default() -> Self {
        HouseSystem::Placidus
    }
}

impl HouseSystem {
    pub fn code(self) -> char {
        HOUSE_SYSTEMS
            .iter()
            .find(|(system, _, _)| *system == self)
            .map(|(_, _, code)| *code)
            .unwrap_or('P')
    }

    pub fn name(self) -> &'static str {
        HOUSE_SYSTEMS
            .iter()
            .find(|(system, _, _)| *system == self)
            .map(|(_, name, _)| *name)
            .unwrap_or("placidus")
    }

    /// Quadrant systems whose cusps are undefined inside the polar circles
    pub fn is_polar_sensitive(self) -> bool {
        matches!(self, HouseSystem::Placidus | HouseSystem::Koch)
    }

    pub fn valid_names() -> Vec<String> {
        HOUSE_SYSTEMS
            .iter()
            .map(|(_, name, code)| format!("{code} ({name})"))
            .collect()
    }
}

impl FromStr for HouseSystem {
    type Err = String;

    /// Accepts either the one-letter code ("P") or the name ("placidus")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let upper = c.to_ascii_uppercase();
            if let Some((system, _, _)) = HOUSE_SYSTEMS.iter().find(|(_, _, code)| *code == upper) {
                return Ok(*system);
            }
        }

        let lower = trimmed.to_lowercase();
        HOUSE_SYSTEMS
            .iter()
            .find(|(_, name, _)| *name == lower)
            .map(|(system, _, _)| *system)
            .ok_or_else(|| {
                format!(
                    "unknown house system '{}'; valid: {}",
                    s,
                    HouseSystem::valid_names().join(", ")
                )
            })
    }
}

/// Ecliptic position and motion of one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    /// Longitude in degrees (0-360)
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Speed in longitude (degrees per day)
    pub speed_lon: f64,
}

impl PlanetPosition {
    pub fn is_retrograde(&self) -> bool {
        self.speed_lon < 0.0
    }
}

/// House cusps and chart angles for one moment and place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseFrame {
    pub system: HouseSystem,
    /// Cusp longitudes for houses 1..12
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
    pub descendant: f64,
    pub imum_coeli: f64,
}

impl HouseFrame {
    /// Build a frame from raw cusps and the two primary angles; the opposite
    /// angles are derived.
    pub fn new(system: HouseSystem, cusps: [f64; 12], ascendant: f64, midheaven: f64) -> Self {
        let ascendant = crate::western::normalize_degrees(ascendant);
        let midheaven = crate::western::normalize_degrees(midheaven);
        Self {
            system,
            cusps: cusps.map(crate::western::normalize_degrees),
            ascendant,
            midheaven,
            descendant: crate::western::normalize_degrees(ascendant + 180.0),
            imum_coeli: crate::western::normalize_degrees(midheaven + 180.0),
        }
    }
}

/// Result of a house-cusp query
#[derive(Debug, Clone, PartialEq)]
pub enum CuspOutcome {
    Ok(HouseFrame),
    /// Best-effort cusps with the reason they are not the requested ones
    Degraded(HouseFrame, String),
    Failed(String),
}

impl CuspOutcome {
    pub fn frame(&self) -> Option<&HouseFrame> {
        match self {
            CuspOutcome::Ok(frame) | CuspOutcome::Degraded(frame, _) => Some(frame),
            CuspOutcome::Failed(_) => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            CuspOutcome::Ok(_) => None,
            CuspOutcome::Degraded(_, reason) | CuspOutcome::Failed(reason) => Some(reason),
        }
    }
}
