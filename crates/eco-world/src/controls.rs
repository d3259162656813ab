//! Pointer-facing controls of the food chain toy: the draw meter, the brush
//! panel and the mapping from canvas coordinates to grid cells.

use eco_core::{FoodChainConfig, Position, Species, Vec2};
use serde::{Deserialize, Serialize};

/// Limits how many entities can be placed in a burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawMeter {
    level: f32,
    max: f32,
    recovery: f32,
}

impl DrawMeter {
    pub fn new(max: f32, recovery: f32) -> Self {
        Self {
            level: max,
            max,
            recovery,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Take one unit if a whole one is available
    pub fn try_consume(&mut self) -> bool {
        if self.level < 1.0 {
            return false;
        }
        self.level = (self.level - 1.0).max(0.0);
        true
    }

    /// Refill while nothing is being drawn
    pub fn recover(&mut self, delta: f32, pointer_held: bool) {
        if pointer_held {
            return;
        }
        self.level = (self.level + delta.max(0.0) * self.recovery).min(self.max);
    }
}

/// Currently selected species and the highlight weight of each button
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushPanel {
    pub selected: Species,
    /// Highlight per button, in `Species::all()` order
    pub weights: [f32; 3],
}

impl Default for BrushPanel {
    fn default() -> Self {
        Self {
            selected: Species::Vine,
            weights: [1.0, 0.0, 0.0],
        }
    }
}

impl BrushPanel {
    pub fn select(&mut self, species: Species) {
        self.selected = species;
    }

    /// Move the highlight toward the selected button
    pub fn update(&mut self, delta: f32, speed: f32) {
        let step = speed * delta.max(0.0);
        for (weight, species) in self.weights.iter_mut().zip(Species::all()) {
            *weight = if species == self.selected {
                (*weight + step).min(1.0)
            } else {
                (*weight - step).max(0.0)
            };
        }
    }
}

/// Where the grid and the brush buttons sit on the normalized canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasLayout {
    pub grid_width_fraction: f32,
    pub grid_height_fraction: f32,
}

impl CanvasLayout {
    pub fn from_config(config: &FoodChainConfig) -> Self {
        Self {
            grid_width_fraction: config.grid_width_fraction,
            grid_height_fraction: config.grid_height_fraction,
        }
    }

    /// Width of the brush strip on the left, also the side of each button
    pub fn strip_width(&self) -> f32 {
        1.0 - self.grid_width_fraction
    }

    /// Grid cell under a canvas point. The result may lie outside the grid.
    pub fn to_grid(&self, point: Vec2, columns: i32, rows: i32) -> Position {
        let u = (point.x - self.strip_width()) / self.grid_width_fraction;
        let v = point.y / self.grid_height_fraction;
        Position::new(
            (u * columns as f32).floor() as i32,
            (v * rows as f32).floor() as i32,
        )
    }

    /// Top-left corner of each brush button
    pub fn button_origins(&self) -> [Vec2; 3] {
        let side = self.strip_width();
        let padding = self.grid_height_fraction * 0.1;
        [0.0, 1.0, 2.0].map(|i| Vec2::new(0.0, padding + (side + padding) * i))
    }

    /// Brush button under a canvas point
    pub fn brush_at(&self, point: Vec2) -> Option<Species> {
        let side = self.strip_width();
        self.button_origins()
            .iter()
            .zip(Species::all())
            .find(|(origin, _)| {
                point.x >= origin.x
                    && point.x <= origin.x + side
                    && point.y >= origin.y
                    && point.y <= origin.y + side
            })
            .map(|(_, species)| species)
    }
}
