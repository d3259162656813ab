//! Cell records for the food chain grid.
//!
//! Each occupied cell carries a lifetime counter and a small amount of
//! species-specific state. The state is kept as named fields; `Cell::aux_byte`
//! packs it back into the single byte layout the grid texture expects.

use crate::types::{ContentType, Species};
use serde::{Deserialize, Serialize};

/// Lifetime value at which an entity is removed from the grid
pub const MAX_LIFETIME_TICKS: u8 = 255;

/// Birth/death fade windows measured in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifecycle {
    /// Length of the fade-in window after birth
    pub birth_ticks: u8,
    /// Length of the fade-out window before removal
    pub death_ticks: u8,
    /// Lifetime at which the entity is removed
    pub max_lifetime: u8,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            birth_ticks: 8,
            death_ticks: 16,
            max_lifetime: MAX_LIFETIME_TICKS,
        }
    }
}

impl Lifecycle {
    /// Outside both the birth and the death fade window
    pub fn is_adult(&self, lifetime: u8) -> bool {
        let lifetime = lifetime as i32;
        lifetime > self.birth_ticks as i32 + 1
            && lifetime < self.max_lifetime as i32 - self.death_ticks as i32 - 1
    }

    /// Lifetime mapped into 0..=1
    pub fn normalized(&self, lifetime: u8) -> f32 {
        if self.max_lifetime == 0 {
            return 1.0;
        }
        (lifetime.min(self.max_lifetime) as f32) / self.max_lifetime as f32
    }
}

/// Which wall a migrator is walking toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    /// Newborn migrators head for the wall farther from where they were born
    pub fn toward_far_wall(x: i32, columns: i32) -> Self {
        if x as f32 > columns as f32 * 0.5 {
            Heading::Left
        } else {
            Heading::Right
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    pub fn dx(&self) -> i32 {
        match self {
            Heading::Left => -1,
            Heading::Right => 1,
        }
    }

    /// Whether column `x` is the wall this heading is walking toward
    pub fn at_goal_wall(&self, x: i32, columns: i32) -> bool {
        match self {
            Heading::Left => x == 0,
            Heading::Right => x == columns - 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VineState {
    /// Length of the longest vine chain running through this cell
    pub chain: u8,
}

impl Default for VineState {
    fn default() -> Self {
        Self { chain: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratorState {
    pub heading: Heading,
    /// Already acted during the current tick
    pub went: bool,
    /// Times the migrator has touched its goal wall since it last turned around
    pub wall_contacts: u8,
}

impl MigratorState {
    /// Six bits are available for the wall counter in the packed layout
    pub const WALL_CONTACTS_MAX: u8 = 63;

    pub fn new(heading: Heading) -> Self {
        Self {
            heading,
            went: false,
            wall_contacts: 0,
        }
    }

    pub fn bump_wall_contacts(&mut self) -> u8 {
        self.wall_contacts = (self.wall_contacts + 1).min(Self::WALL_CONTACTS_MAX);
        self.wall_contacts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyState {
    /// 4-bit generation counter
    pub generation: u8,
    /// 4-bit count of colony neighbors seen at the last check
    pub neighbor_cache: u8,
}

impl ColonyState {
    pub const GENERATION_MAX: u8 = 15;
    pub const NEIGHBOR_CACHE_MAX: u8 = 15;
    /// Last generation that still ages slowly and can be renewed
    pub const FINAL_GENERATION: u8 = 3;
    /// Marks a colony that already spent its growth
    pub const EXHAUSTED_GENERATION: u8 = 4;

    pub fn new(generation: u8, neighbor_cache: u8) -> Self {
        debug_assert!(generation <= Self::GENERATION_MAX);
        debug_assert!(neighbor_cache <= Self::NEIGHBOR_CACHE_MAX);
        Self {
            generation: generation.min(Self::GENERATION_MAX),
            neighbor_cache: neighbor_cache.min(Self::NEIGHBOR_CACHE_MAX),
        }
    }

    pub fn set_neighbor_cache(&mut self, count: usize) {
        self.neighbor_cache = count.min(Self::NEIGHBOR_CACHE_MAX as usize) as u8;
    }
}

impl Default for ColonyState {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// Species-specific part of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Empty,
    Vine(VineState),
    Migrator(MigratorState),
    Colony(ColonyState),
}

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Ticks since birth, 0 while empty
    pub lifetime: u8,
    pub state: CellState,
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl Cell {
    pub fn empty() -> Self {
        Self {
            lifetime: 0,
            state: CellState::Empty,
        }
    }

    /// A freshly born entity at column `x` of a grid `columns` wide
    pub fn newborn(species: Species, x: i32, columns: i32) -> Self {
        let state = match species {
            Species::Vine => CellState::Vine(VineState::default()),
            Species::Migrator => {
                CellState::Migrator(MigratorState::new(Heading::toward_far_wall(x, columns)))
            }
            Species::Colony => CellState::Colony(ColonyState::default()),
        };
        Self { lifetime: 0, state }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, CellState::Empty)
    }

    pub fn content_type(&self) -> ContentType {
        match self.state {
            CellState::Empty => ContentType::None,
            CellState::Vine(_) => ContentType::Vine,
            CellState::Migrator(_) => ContentType::Migrator,
            CellState::Colony(_) => ContentType::Colony,
        }
    }

    pub fn species(&self) -> Option<Species> {
        self.content_type().species()
    }

    /// Species state packed into one byte, as stored in the blue texture channel
    pub fn aux_byte(&self) -> u8 {
        match self.state {
            CellState::Empty => 0,
            CellState::Vine(vine) => vine.chain,
            CellState::Migrator(m) => {
                let heading = matches!(m.heading, Heading::Left) as u8;
                heading | (m.went as u8) << 1 | (m.wall_contacts.min(MigratorState::WALL_CONTACTS_MAX)) << 2
            }
            CellState::Colony(c) => (c.generation & 0x0F) | (c.neighbor_cache & 0x0F) << 4,
        }
    }
}
