//! Exponential-decay morphing of visual state toward a target.

use eco_core::{exp_lerp_alpha, lerp, Vec2};
use serde::{Deserialize, Serialize};

/// Position, scale and rotation of a shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MorphState {
    pub position: Vec2,
    pub scale: f32,
    pub rotation: f32,
}

impl MorphState {
    pub fn new(position: Vec2, scale: f32, rotation: f32) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    /// Move a fraction `t` of the way toward `target`
    pub fn lerp(&self, target: &MorphState, t: f32) -> MorphState {
        MorphState {
            position: self.position.lerp(target.position, t),
            scale: lerp(self.scale, target.scale, t),
            rotation: lerp(self.rotation, target.rotation, t),
        }
    }
}

/// A shape whose displayed state chases a target state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Morphable {
    pub current: MorphState,
    pub target: MorphState,
    /// Decay speed in 1/s
    pub speed: f32,
}

impl Morphable {
    pub fn new(state: MorphState, speed: f32) -> Self {
        Self {
            current: state,
            target: state,
            speed,
        }
    }

    /// Advance the current state by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let alpha = exp_lerp_alpha(self.speed, dt);
        self.current = self.current.lerp(&self.target, alpha);
    }

    /// Squared distance of the current position from the target
    pub fn position_error_sq(&self) -> f32 {
        self.current.position.distance_squared(self.target.position)
    }
}
