//! Small numeric helpers shared by the continuous toys.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// 2D vector in toy space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(self, other: Vec2) -> f32 {
        (self - other).length_squared()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    /// Unit vector, or `None` for a zero-length input
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len > f32::EPSILON {
            Some(self / len)
        } else {
            None
        }
    }

    /// Heading of the vector in radians
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn lerp(self, target: Vec2, t: f32) -> Vec2 {
        Vec2::new(lerp(self.x, target.x, t), lerp(self.y, target.y, t))
    }

    /// Component-wise clamp into the box `[min, max]`
    pub fn clamp(self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(clamp(self.x, min.x, max.x), clamp(self.y, min.y, max.y))
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Fraction of the remaining distance covered in `dt` seconds when decaying at `speed`
pub fn exp_lerp_alpha(speed: f32, dt: f32) -> f32 {
    1.0 - (-speed * dt.max(0.0)).exp()
}

/// One exponential-decay step of `current` toward `target`
pub fn exp_lerp(current: f32, target: f32, speed: f32, dt: f32) -> f32 {
    lerp(current, target, exp_lerp_alpha(speed, dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_vec_ops() {
        let a = Vec2::new(3.0, 4.0);
        assert_eq!(a.length(), 5.0);
        assert_eq!(a + Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0));
        assert_eq!(a - a, Vec2::ZERO);
        assert_eq!(a * 2.0, Vec2::new(6.0, 8.0));
        assert_eq!(Vec2::ZERO.normalized(), None);
        let n = a.normalized().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_and_lerp() {
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
        assert_eq!(lerp(10.0, 20.0, 0.25), 12.5);
        assert_eq!(
            Vec2::new(2.0, -1.0).clamp(Vec2::ZERO, Vec2::new(1.0, 0.8)),
            Vec2::new(1.0, 0.0)
        );
    }

    #[test]
    fn test_exp_lerp_alpha_bounds() {
        assert_eq!(exp_lerp_alpha(5.0, 0.0), 0.0);
        let a = exp_lerp_alpha(5.0, 1.0 / 60.0);
        assert!(a > 0.0 && a < 1.0);
        assert!(exp_lerp_alpha(5.0, 100.0) <= 1.0);
    }

    proptest! {
        #[test]
        fn prop_morph_converges_without_overshoot(
            start in -100.0f32..100.0,
            target in -100.0f32..100.0,
            speed in 0.5f32..20.0,
            dt in 0.001f32..0.05,
        ) {
            prop_assume!((target - start).abs() > 1.0);
            let mut current = start;
            let mut distance = (target - current).abs();
            for _ in 0..10 {
                let next = exp_lerp(current, target, speed, dt);
                let next_distance = (target - next).abs();
                prop_assert!(next_distance < distance);
                // never crosses over the target
                prop_assert!((target - next).signum() == (target - start).signum() || next_distance == 0.0);
                current = next;
                distance = next_distance;
            }
        }
    }
}
