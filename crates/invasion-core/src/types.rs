//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of aliens a simulation accepts.
///
/// Runtime grows linearly with the alien count.
pub const MAX_ALIENS: usize = 10_000;

/// Maximum number of epochs a run executes. Bounds runs that would
/// otherwise oscillate forever.
pub const MAX_EPOCHS: u32 = 10_000;

/// Unique identifier for an alien, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AlienId(pub u32);

impl fmt::Display for AlienId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense index of a city inside a world graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityId(pub u32);

impl CityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Direction of a road leaving a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Parse a map-file keyword, ignoring case
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Direction::all()
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(keyword))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_keywords() {
        assert_eq!(Direction::from_keyword("north"), Some(Direction::North));
        assert_eq!(Direction::from_keyword("WEST"), Some(Direction::West));
        assert_eq!(Direction::from_keyword("up"), None);
    }

    #[test]
    fn test_alien_id_display() {
        assert_eq!(AlienId(42).to_string(), "42");
    }
}
