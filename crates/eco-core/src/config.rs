//! Configuration types for the toys.

use crate::cell::Lifecycle;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Food chain grid automaton parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodChainConfig {
    /// Number of grid columns
    pub columns: i32,
    /// Number of grid rows
    pub rows: i32,
    /// Seconds per automaton tick
    pub tick_length: f32,
    /// Fade-in / fade-out windows
    pub lifecycle: Lifecycle,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Chance that an eligible vine skips spawning
    pub vine_idle_chance: f32,
    /// Chance that a vine spawn is shifted one column sideways
    pub vine_jitter_chance: f32,
    /// Placements available when the meter is full
    pub draw_meter_max: f32,
    /// Meter units recovered per second while no pointer is held
    pub draw_meter_recovery: f32,
    /// Fraction of the canvas width covered by the grid (the brush strip takes the rest)
    pub grid_width_fraction: f32,
    /// Fraction of the canvas height covered by the grid
    pub grid_height_fraction: f32,
    /// Speed of the brush selection highlight
    pub brush_speed: f32,
    /// Ticks between population metric log lines
    pub metrics_interval: u64,
}

impl Default for FoodChainConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            // columns * 0.9 / 0.87, floored
            rows: 20,
            tick_length: 0.04,
            lifecycle: Lifecycle::default(),
            seed: 0,
            vine_idle_chance: 0.5,
            vine_jitter_chance: 0.05,
            draw_meter_max: 10.0,
            draw_meter_recovery: 1.0,
            grid_width_fraction: 0.87,
            grid_height_fraction: 0.9,
            brush_speed: 7.0,
            metrics_interval: 100,
        }
    }
}

impl FoodChainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.columns < 3 || self.rows < 3 {
            return Err(Error::Validation(format!(
                "grid must be at least 3x3, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.columns > 1024 || self.rows > 1024 {
            return Err(Error::Validation("grid larger than 1024 in a dimension".into()));
        }
        if !(self.tick_length > 0.0) {
            return Err(Error::Validation("tick_length must be positive".into()));
        }
        let lc = self.lifecycle;
        if lc.birth_ticks as u32 + lc.death_ticks as u32 + 2 >= lc.max_lifetime as u32 {
            return Err(Error::Validation(
                "birth and death windows leave no adult lifetime".into(),
            ));
        }
        check_fraction("vine_idle_chance", self.vine_idle_chance)?;
        check_fraction("vine_jitter_chance", self.vine_jitter_chance)?;
        check_fraction("grid_width_fraction", self.grid_width_fraction)?;
        check_fraction("grid_height_fraction", self.grid_height_fraction)?;
        if self.draw_meter_max < 1.0 {
            return Err(Error::Validation("draw_meter_max must be at least 1".into()));
        }
        Ok(())
    }
}

/// Spilling paint parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    pub seed: u64,
    /// Circles created at setup and after a failed pass
    pub start_circles: usize,
    pub max_circles: usize,
    /// Number of paint styles, assigned by circle index
    pub styles: usize,
    pub initial_radius: f32,
    /// Snap distance for radius animations
    pub epsilon: f32,
    /// Extra gap kept between dragged circles
    pub collision_buffer: f32,
    /// Radius a spilled circle grows toward
    pub grow_radius: f32,
    pub birth_speed: f32,
    pub grow_speed: f32,
    pub shrink_speed: f32,
    pub drag_speed: f32,
    pub transition_speed: f32,
    /// Canvas height relative to its width
    pub height_fraction: f32,
    /// Squared drag distance under which a release counts as a click
    pub click_distance_sq: f32,
    /// Probe resolution for detecting a full screen
    pub full_probe: usize,
    /// Probe resolution for scoring goals
    pub goal_probe: usize,
    /// Coverage share a single style needs for the "mostly" goals
    pub dominant_share: f32,
    /// Share each of the first two styles needs for the pair goal
    pub pair_share: f32,
    /// Share every style needs for the mix goal
    pub mix_share: f32,
    /// Length of the pass result sequence in seconds
    pub sequence_seconds: f32,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            start_circles: 4,
            max_circles: 7,
            styles: 3,
            initial_radius: 0.075,
            epsilon: 0.001,
            collision_buffer: 0.05,
            grow_radius: 1.5,
            birth_speed: 5.0,
            grow_speed: 0.15,
            shrink_speed: 3.5,
            drag_speed: 4.0,
            transition_speed: 4.0,
            height_fraction: 0.8,
            click_distance_sq: 0.001,
            full_probe: 5,
            goal_probe: 32,
            dominant_share: 0.75,
            pair_share: 0.36,
            mix_share: 0.17,
            sequence_seconds: 1.7,
        }
    }
}

impl PaintConfig {
    pub fn validate(&self) -> Result<()> {
        if self.start_circles == 0 || self.start_circles > self.max_circles {
            return Err(Error::Validation(format!(
                "start_circles must be in 1..={}, got {}",
                self.max_circles, self.start_circles
            )));
        }
        if self.styles == 0 {
            return Err(Error::Validation("styles must be positive".into()));
        }
        if self.full_probe == 0 || self.goal_probe == 0 {
            return Err(Error::Validation("probe resolution must be positive".into()));
        }
        if !(self.initial_radius > 0.0) || self.grow_radius <= self.initial_radius {
            return Err(Error::Validation(
                "grow_radius must exceed a positive initial_radius".into(),
            ));
        }
        check_fraction("height_fraction", self.height_fraction)?;
        check_fraction("dominant_share", self.dominant_share)?;
        check_fraction("pair_share", self.pair_share)?;
        check_fraction("mix_share", self.mix_share)?;
        if !(self.sequence_seconds > 0.0) {
            return Err(Error::Validation("sequence_seconds must be positive".into()));
        }
        Ok(())
    }
}

/// Collecting rain parameters. Distances are in world units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub seed: u64,
    /// Side of the square world
    pub world_size: f32,
    /// Height of the bottom strip holding the goal markers
    pub bottom_strip: f32,
    pub min_velocity: f32,
    pub max_velocity: f32,
    /// Horizontal velocity relative to the vertical one
    pub x_velocity_factor: f32,
    pub max_spawn_interval: f32,
    pub min_spawn_interval: f32,
    pub shape_scale: f32,
    /// Scale multiplier while a shape is held
    pub drag_scale: f32,
    pub bucket_x: f32,
    pub bucket_min_scale: f32,
    pub bucket_max_scale: f32,
    /// Target scale of a freshly unlocked bucket
    pub bucket_start_scale: f32,
    pub lock_scale: f32,
    pub unlock_scale: f32,
    /// Bucket growth per caught shape
    pub growth: f32,
    /// Bucket shrink per interval
    pub shrink: f32,
    pub shrink_interval: f32,
    pub goal_scale: f32,
    pub shape_morph_speed: f32,
    pub bucket_morph_speed: f32,
    pub goal_morph_speed: f32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world_size: 200.0,
            bottom_strip: 40.0,
            min_velocity: 20.0,
            max_velocity: 40.0,
            x_velocity_factor: 0.15,
            max_spawn_interval: 1.6,
            min_spawn_interval: 0.12,
            shape_scale: 36.0,
            drag_scale: 1.2,
            bucket_x: 20.0,
            bucket_min_scale: 15.0,
            bucket_max_scale: 30.0,
            bucket_start_scale: 19.0,
            lock_scale: 16.5,
            unlock_scale: 26.25,
            growth: 3.2,
            shrink: 1.6,
            shrink_interval: 2.5,
            goal_scale: 34.0,
            shape_morph_speed: 40.0,
            bucket_morph_speed: 40.0,
            goal_morph_speed: 40.0,
        }
    }
}

impl RainConfig {
    /// Lowest y a falling shape may reach before it is removed
    pub fn floor_y(&self) -> f32 {
        self.world_size - self.bottom_strip
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.world_size > self.bottom_strip) || self.bottom_strip < 0.0 {
            return Err(Error::Validation(
                "bottom_strip must fit inside world_size".into(),
            ));
        }
        if self.min_velocity > self.max_velocity {
            return Err(Error::Validation("min_velocity exceeds max_velocity".into()));
        }
        if !(self.min_spawn_interval > 0.0) || self.min_spawn_interval > self.max_spawn_interval {
            return Err(Error::Validation("spawn intervals out of order".into()));
        }
        if !(self.bucket_min_scale <= self.lock_scale
            && self.lock_scale < self.unlock_scale
            && self.unlock_scale <= self.bucket_max_scale)
        {
            return Err(Error::Validation(
                "bucket scales must satisfy min <= lock < unlock <= max".into(),
            ));
        }
        if !(self.shrink_interval > 0.0) {
            return Err(Error::Validation("shrink_interval must be positive".into()));
        }
        Ok(())
    }
}

/// Shared end-of-toy effect
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CelebrationConfig {
    pub duration: f32,
    pub fade: f32,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            duration: 12.0,
            fade: 0.5,
        }
    }
}

impl CelebrationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.fade > 0.0) || self.fade * 2.0 > self.duration {
            return Err(Error::Validation(
                "celebration fades must fit inside its duration".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for every toy, as loaded from a JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToyConfig {
    pub food_chain: FoodChainConfig,
    pub paint: PaintConfig,
    pub rain: RainConfig,
    pub celebration: CelebrationConfig,
}

impl ToyConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ToyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(format!("config file {}", path.display())));
        }
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!(path = %path.display(), "Loaded toy configuration");
        Ok(config)
    }

    /// Use the same seed for every toy
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.food_chain.seed = seed;
        self.paint.seed = seed;
        self.rain.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.food_chain.validate()?;
        self.paint.validate()?;
        self.rain.validate()?;
        self.celebration.validate()
    }
}

fn check_fraction(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} must be within 0..=1, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(ToyConfig::default().validate().is_ok());
        assert_eq!(FoodChainConfig::default().rows, 20);
        assert_eq!(RainConfig::default().floor_y(), 160.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ToyConfig::from_json_str(r#"{"food_chain": {"columns": 30, "seed": 7}}"#).unwrap();
        assert_eq!(config.food_chain.columns, 30);
        assert_eq!(config.food_chain.seed, 7);
        assert_eq!(config.food_chain.tick_length, 0.04);
        assert_eq!(config.paint.max_circles, 7);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = ToyConfig::from_json_str(r#"{"food_chain": {"columns": 1}}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = ToyConfig::from_json_str(r#"{"rain": {"lock_scale": 28.0}}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = ToyConfig::from_json_str(r#"{"paint": {"pair_share": 1.5}}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = ToyConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ToyConfig::from_json_file("/nonexistent/eco-toys.json").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_with_seed() {
        let config = ToyConfig::default().with_seed(42);
        assert_eq!(config.food_chain.seed, 42);
        assert_eq!(config.paint.seed, 42);
        assert_eq!(config.rain.seed, 42);
    }
}
