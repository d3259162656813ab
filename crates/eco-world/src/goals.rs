//! Goal tracking and the celebration effect shared by the toys.

use eco_core::{CelebrationConfig, PaintConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Goals of the spilling paint toy, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaintGoal {
    /// First style covers most of the canvas
    MostlyFirst,
    MostlySecond,
    MostlyThird,
    /// First and second styles share the canvas
    FirstAndSecond,
    /// All three styles share the canvas
    AllThree,
}

impl PaintGoal {
    pub const ALL: [PaintGoal; 5] = [
        PaintGoal::MostlyFirst,
        PaintGoal::MostlySecond,
        PaintGoal::MostlyThird,
        PaintGoal::FirstAndSecond,
        PaintGoal::AllThree,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the style fractions of a full canvas satisfy this goal
    pub fn is_met(self, fractions: &[f32], config: &PaintConfig) -> bool {
        let share = |i: usize| fractions.get(i).copied().unwrap_or(0.0);
        match self {
            PaintGoal::MostlyFirst => share(0) > config.dominant_share,
            PaintGoal::MostlySecond => share(1) > config.dominant_share,
            PaintGoal::MostlyThird => share(2) > config.dominant_share,
            PaintGoal::FirstAndSecond => share(0) > config.pair_share && share(1) > config.pair_share,
            PaintGoal::AllThree => (0..3).all(|i| share(i) > config.mix_share),
        }
    }

    /// Whether achieving this goal earns an extra circle
    pub fn adds_circle(self) -> bool {
        matches!(
            self,
            PaintGoal::MostlyThird | PaintGoal::FirstAndSecond | PaintGoal::AllThree
        )
    }
}

/// Goals of the collecting rain toy, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RainGoal {
    DiamondBucket,
    /// Diamond, star and heart buckets open at once
    AllBuckets,
    /// Heart bucket open while diamond and star are closed
    HeartAlone,
    /// Nothing but stars falling
    OnlyStars,
    /// Every bucket open and nearly full
    AllBucketsFull,
}

impl RainGoal {
    pub const ALL: [RainGoal; 5] = [
        RainGoal::DiamondBucket,
        RainGoal::AllBuckets,
        RainGoal::HeartAlone,
        RainGoal::OnlyStars,
        RainGoal::AllBucketsFull,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Monotonic achievement flags. Only an explicit reset clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSet {
    achieved: Vec<bool>,
}

impl GoalSet {
    pub fn new(count: usize) -> Self {
        Self {
            achieved: vec![false; count],
        }
    }

    /// Mark goal `index`, returning true if it was not achieved before
    pub fn achieve(&mut self, index: usize) -> bool {
        match self.achieved.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_achieved(&self, index: usize) -> bool {
        self.achieved.get(index).copied().unwrap_or(false)
    }

    pub fn all_achieved(&self) -> bool {
        self.achieved.iter().all(|&a| a)
    }

    pub fn achieved_count(&self) -> usize {
        self.achieved.iter().filter(|&&a| a).count()
    }

    pub fn len(&self) -> usize {
        self.achieved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.achieved.is_empty()
    }

    pub fn reset(&mut self) {
        self.achieved.iter_mut().for_each(|a| *a = false);
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.achieved
    }
}

/// Timed full-screen effect played once every goal of a toy is met
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Celebration {
    duration: f32,
    fade: f32,
    elapsed: f32,
    active: bool,
}

impl Celebration {
    pub fn new(config: &CelebrationConfig) -> Self {
        Self {
            duration: config.duration,
            fade: config.fade,
            elapsed: 0.0,
            active: false,
        }
    }

    /// Start or restart the effect
    pub fn start(&mut self) {
        info!(event = "celebration_started", duration = self.duration, "Celebration started");
        self.elapsed = 0.0;
        self.active = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed > self.duration {
            self.active = false;
            self.elapsed = 0.0;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Opacity in 0..=1: fades in, holds, fades out
    pub fn alpha(&self) -> f32 {
        if !self.active {
            return 0.0;
        }
        let alpha = if self.elapsed < self.fade {
            self.elapsed / self.fade
        } else if self.elapsed > self.duration - self.fade {
            (self.duration - self.elapsed) / self.fade
        } else {
            1.0
        };
        alpha.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_set_is_monotonic() {
        let mut goals = GoalSet::new(3);
        assert!(goals.achieve(1));
        assert!(!goals.achieve(1));
        assert!(!goals.achieve(7));
        assert_eq!(goals.achieved_count(), 1);
        assert!(goals.is_achieved(1));
        assert!(!goals.all_achieved());
        goals.achieve(0);
        goals.achieve(2);
        assert!(goals.all_achieved());
        goals.reset();
        assert_eq!(goals.achieved_count(), 0);
        assert_eq!(goals.len(), 3);
    }

    #[test]
    fn test_paint_goal_thresholds() {
        let config = PaintConfig::default();
        assert!(PaintGoal::MostlyFirst.is_met(&[0.8, 0.1, 0.1], &config));
        assert!(!PaintGoal::MostlyFirst.is_met(&[0.75, 0.25, 0.0], &config));
        assert!(PaintGoal::FirstAndSecond.is_met(&[0.4, 0.4, 0.2], &config));
        assert!(!PaintGoal::FirstAndSecond.is_met(&[0.6, 0.3, 0.1], &config));
        assert!(PaintGoal::AllThree.is_met(&[0.3, 0.3, 0.4], &config));
        assert!(!PaintGoal::AllThree.is_met(&[0.5, 0.5], &config));
        assert!(PaintGoal::MostlyThird.adds_circle());
        assert!(!PaintGoal::MostlySecond.adds_circle());
    }

    #[test]
    fn test_paint_goal_thresholds_follow_config() {
        let config = PaintConfig {
            dominant_share: 0.5,
            pair_share: 0.45,
            mix_share: 0.3,
            ..Default::default()
        };
        assert!(PaintGoal::MostlySecond.is_met(&[0.2, 0.6, 0.2], &config));
        assert!(!PaintGoal::MostlySecond.is_met(&[0.2, 0.6, 0.2], &PaintConfig::default()));
        assert!(!PaintGoal::FirstAndSecond.is_met(&[0.4, 0.4, 0.2], &config));
        assert!(!PaintGoal::AllThree.is_met(&[0.3, 0.3, 0.4], &config));
        assert!(PaintGoal::AllThree.is_met(&[0.32, 0.33, 0.35], &config));
    }

    #[test]
    fn test_celebration_fades() {
        let mut celebration = Celebration::new(&CelebrationConfig::default());
        assert_eq!(celebration.alpha(), 0.0);
        celebration.start();
        celebration.update(0.25);
        assert!((celebration.alpha() - 0.5).abs() < 1e-6);
        celebration.update(5.0);
        assert_eq!(celebration.alpha(), 1.0);
        celebration.update(6.5);
        assert!((celebration.alpha() - 0.5).abs() < 1e-4);
        celebration.update(0.5);
        assert!(!celebration.is_active());
        assert_eq!(celebration.alpha(), 0.0);
    }
}
