//! Core type definitions for the toys.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grid cell coordinate. Row 0 is the top of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell `dx` columns and `dy` rows away. May fall off the grid.
    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn offset(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.add(dx, dy)
    }

    pub fn in_bounds(&self, columns: i32, rows: i32) -> bool {
        (0..columns).contains(&self.x) && (0..rows).contains(&self.y)
    }
}

/// Neighbor offsets; North points toward row 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Column and row step
    pub fn delta(self) -> (i32, i32) {
        let dx = match self {
            Direction::East | Direction::NorthEast | Direction::SouthEast => 1,
            Direction::West | Direction::NorthWest | Direction::SouthWest => -1,
            Direction::North | Direction::South => 0,
        };
        let dy = match self {
            Direction::North | Direction::NorthEast | Direction::NorthWest => -1,
            Direction::South | Direction::SouthEast | Direction::SouthWest => 1,
            Direction::East | Direction::West => 0,
        };
        (dx, dy)
    }

    /// Full 8-neighborhood, column by column from the left
    pub fn all() -> [Direction; 8] {
        [
            Direction::NorthWest,
            Direction::West,
            Direction::SouthWest,
            Direction::North,
            Direction::South,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
        ]
    }

    /// Von Neumann neighborhood
    pub fn cardinal() -> [Direction; 4] {
        [
            Direction::West,
            Direction::North,
            Direction::South,
            Direction::East,
        ]
    }
}

/// The three kinds of entity living on the food chain grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Stationary triangles that branch up and down into chains
    Vine,
    /// Circles that walk toward the far wall and clone themselves there
    Migrator,
    /// Squares that spread into clumps over a few generations
    Colony,
}

impl Species {
    pub fn all() -> [Species; 3] {
        [Species::Vine, Species::Migrator, Species::Colony]
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Species::Vine => ContentType::Vine,
            Species::Migrator => ContentType::Migrator,
            Species::Colony => ContentType::Colony,
        }
    }
}

/// What a grid lookup found. `Invalid` is only produced for positions outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    None,
    Vine,
    Migrator,
    Colony,
    Invalid,
}

impl ContentType {
    /// Value written to the red channel of the grid texture
    pub fn as_u8(&self) -> u8 {
        match self {
            ContentType::None => 0,
            ContentType::Vine => 1,
            ContentType::Migrator => 2,
            ContentType::Colony => 3,
            ContentType::Invalid => 4,
        }
    }

    pub fn species(&self) -> Option<Species> {
        match self {
            ContentType::Vine => Some(Species::Vine),
            ContentType::Migrator => Some(Species::Migrator),
            ContentType::Colony => Some(Species::Colony),
            ContentType::None | ContentType::Invalid => None,
        }
    }
}

impl From<Species> for ContentType {
    fn from(species: Species) -> Self {
        species.content_type()
    }
}

/// Which toy a playground is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToyKind {
    FoodChain,
    CollectingRain,
    SpillingPaint,
}

impl fmt::Display for ToyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToyKind::FoodChain => "food-chain",
            ToyKind::CollectingRain => "collecting-rain",
            ToyKind::SpillingPaint => "spilling-paint",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ToyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "food-chain" => Ok(ToyKind::FoodChain),
            "collecting-rain" => Ok(ToyKind::CollectingRain),
            "spilling-paint" => Ok(ToyKind::SpillingPaint),
            other => Err(Error::NotFound(format!("unknown toy '{}'", other))),
        }
    }
}
