//! Hex grid geometry with axial coordinates
//!
//! The grid is unbounded: the hive can drift anywhere, so coordinates are
//! plain `i32` pairs and the first piece lands on [`Hex::ORIGIN`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseHexError;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

/// Direction vectors in axial coordinates (dq, dr), clockwise.
/// Index: 0=E, 1=SE, 2=SW, 3=W, 4=NW, 5=NE
///
/// Consecutive entries are themselves adjacent, which is what lets
/// [`Hex::gates`] find the two cells flanking an edge by index arithmetic.
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),   // E
    (0, 1),   // SE
    (-1, 1),  // SW
    (-1, 0),  // W
    (0, -1),  // NW
    (1, -1),  // NE
];

pub const DIRECTION_NAMES: [&str; 6] = ["E", "SE", "SW", "W", "NW", "NE"];

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction as usize % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    /// All six neighbors in [`DIRECTIONS`] order
    pub fn neighbors(&self) -> [Hex; 6] {
        let mut out = [*self; 6];
        for (dir, slot) in out.iter_mut().enumerate() {
            *slot = self.neighbor(dir as u8);
        }
        out
    }

    /// The two cells flanking the edge between `self` and `self.neighbor(direction)`
    pub fn gates(&self, direction: u8) -> (Hex, Hex) {
        let d = direction % 6;
        (self.neighbor((d + 5) % 6), self.neighbor((d + 1) % 6))
    }

    /// Direction index from `self` to an adjacent hex
    pub fn direction_to(&self, other: Hex) -> Option<u8> {
        let delta = (other.q - self.q, other.r - self.r);
        DIRECTIONS.iter().position(|&d| d == delta).map(|i| i as u8)
    }

    pub fn is_adjacent(&self, other: Hex) -> bool {
        self.direction_to(other).is_some()
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }

    /// Pixel center for a pointy-top layout with the given hex size
    pub fn to_pixel(&self, size: f64) -> (f64, f64) {
        let sqrt3 = 3f64.sqrt();
        let x = size * (sqrt3 * self.q as f64 + sqrt3 / 2.0 * self.r as f64);
        let y = size * (1.5 * self.r as f64);
        (x, y)
    }

    /// Canonical map key, e.g. `"-2,5"`
    pub fn key(&self) -> String {
        format!("{},{}", self.q, self.r)
    }

    pub fn from_key(key: &str) -> Result<Self, ParseHexError> {
        key.parse()
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

impl FromStr for Hex {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (q, r) = s
            .split_once(',')
            .ok_or_else(|| ParseHexError(s.to_string()))?;
        let q = q.trim().parse().map_err(|_| ParseHexError(s.to_string()))?;
        let r = r.trim().parse().map_err(|_| ParseHexError(s.to_string()))?;
        Ok(Hex::new(q, r))
    }
}
