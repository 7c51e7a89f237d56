use crate::ephemeris::Body;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The five major aspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AspectType {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
}

/// Aspect catalog: (type, name, exact angle, default orb)
const ASPECT_CATALOG: [(AspectType, &str, f64, f64); 5] = [
    (AspectType::Conjunction, "Conjunction", 0.0, 8.0),
    (AspectType::Opposition, "Opposition", 180.0, 8.0),
    (AspectType::Trine, "Trine", 120.0, 8.0),
    (AspectType::Square, "Square", 90.0, 8.0),
    (AspectType::Sextile, "Sextile", 60.0, 6.0),
];

impl AspectType {
    pub const ALL: [AspectType; 5] = [
        AspectType::Conjunction,
        AspectType::Opposition,
        AspectType::Trine,
        AspectType::Square,
        AspectType::Sextile,
    ];

    pub fn name(self) -> &'static str {
        ASPECT_CATALOG[self as usize].1
    }

    pub fn angle(self) -> f64 {
        ASPECT_CATALOG[self as usize].2
    }

    pub fn default_orb(self) -> f64 {
        ASPECT_CATALOG[self as usize].3
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AspectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectType::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown aspect '{}'", s))
    }
}

/// Reference to a body within a named set ("natal", "transit")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectObjectRef {
    pub layer: String,
    pub body: Body,
}

/// One detected aspect between two bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectMatch {
    pub aspect: AspectType,
    pub from: AspectObjectRef,
    pub to: AspectObjectRef,
    /// Exact angle of the aspect
    pub angle: f64,
    /// Circular separation, two decimals
    pub separation: f64,
    /// |separation - exact angle|, two decimals
    pub orb: f64,
    /// Within 0.1 degrees of exact
    pub exact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectSetKind {
    IntraLayer,
    InterLayer,
}

/// A set of aspects (intra-layer or inter-layer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSet {
    pub kind: AspectSetKind,
    pub layers: Vec<String>,
    pub matches: Vec<AspectMatch>,
}

/// Settings for aspect calculations
#[derive(Debug, Clone, PartialEq)]
pub struct AspectSettings {
    /// Orb per aspect type
    pub orbs: BTreeMap<AspectType, f64>,
    /// Bodies allowed to take part; empty means all
    pub include: Vec<Body>,
}

impl Default for AspectSettings {
    fn default() -> Self {
        Self {
            orbs: AspectType::ALL.iter().map(|a| (*a, a.default_orb())).collect(),
            include: Vec::new(),
        }
    }
}

impl AspectSettings {
    pub fn orb(&self, aspect: AspectType) -> f64 {
        self.orbs.get(&aspect).copied().unwrap_or_else(|| aspect.default_orb())
    }

    pub fn with_orb(mut self, aspect: AspectType, orb: f64) -> Self {
        self.orbs.insert(aspect, orb);
        self
    }

    pub fn includes(&self, body: Body) -> bool {
        self.include.is_empty() || self.include.contains(&body)
    }
}
