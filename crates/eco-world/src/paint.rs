//! The spilling paint toy: drag circles around, click one to spill it, and
//! score the canvas once paint covers it.

use crate::circles::{CircleField, CircleView};
use crate::goals::{Celebration, GoalSet, PaintGoal};
use eco_core::{CelebrationConfig, PaintConfig, Stopwatch, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use tracing::{debug, info, instrument};

pub struct SpillingPaint {
    config: PaintConfig,
    field: CircleField,
    rng: ChaCha8Rng,
    goals: GoalSet,
    celebration: Celebration,
    /// Paint covers every full-screen probe point
    screen_full: bool,
    /// The last scoring of a full canvas met a new goal
    completed_a_goal: bool,
    sequence: Stopwatch,
    white_out: f32,
    red_out: f32,
    passes: u32,
}

/// Renderable state of the paint toy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintSnapshot {
    pub circles: Vec<CircleView>,
    pub animating: bool,
    pub screen_full: bool,
    pub goals: Vec<bool>,
    /// Success flash intensity
    pub white_out: f32,
    /// Failure flash intensity
    pub red_out: f32,
    pub passes: u32,
}

impl SpillingPaint {
    #[instrument(skip_all, fields(seed = config.seed))]
    pub fn new(config: PaintConfig, celebration: &CelebrationConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut field = CircleField::new(config.clone());
        field.reset(config.start_circles, &mut rng);
        Self {
            config,
            field,
            rng,
            goals: GoalSet::new(PaintGoal::ALL.len()),
            celebration: Celebration::new(celebration),
            screen_full: false,
            completed_a_goal: false,
            sequence: Stopwatch::new(),
            white_out: 0.0,
            red_out: 0.0,
            passes: 0,
        }
    }

    pub fn field(&self) -> &CircleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut CircleField {
        &mut self.field
    }

    pub fn goals(&self) -> &GoalSet {
        &self.goals
    }

    pub fn celebration(&self) -> &Celebration {
        &self.celebration
    }

    pub fn is_screen_full(&self) -> bool {
        self.screen_full
    }

    pub fn white_out(&self) -> f32 {
        self.white_out
    }

    pub fn red_out(&self) -> f32 {
        self.red_out
    }

    pub fn pointer_down(&mut self, point: Vec2) {
        self.field.begin_drag(point);
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        self.field.update_drag(point);
    }

    pub fn pointer_up(&mut self, point: Vec2) {
        self.field.end_drag(point);
    }

    pub fn update(&mut self, dt: f32) {
        if self.field.update(dt, &mut self.rng) {
            self.screen_full = false;
            debug!(circles = self.field.circles().len(), "Circles back to rest");
        }
        self.screen_full_tick(dt);
        self.celebration.update(dt);
    }

    fn screen_full_tick(&mut self, dt: f32) {
        if !self.screen_full {
            let coverage = self.field.coverage(self.config.full_probe);
            if coverage.uncovered > 0 {
                return;
            }
            self.screen_full = true;
            self.score_canvas();
            self.field.finish_all();
            self.sequence.restart();
        }

        if self.field.is_animating() {
            return;
        }

        self.sequence.tick(dt);
        let t = self.sequence.elapsed() / self.config.sequence_seconds;
        if self.completed_a_goal {
            self.white_out = (PI * t).sin().powi(2);
        } else {
            let t2 = (2.0 * t) % 1.0;
            let curve = if t <= 0.5 {
                (PI * t2).sin()
            } else {
                1.0 - (1.0 - t2).powi(4)
            };
            self.red_out = curve * curve;
        }

        if !self.sequence.lap(self.config.sequence_seconds) {
            return;
        }
        self.white_out = 0.0;
        self.red_out = 0.0;
        self.passes += 1;
        if self.completed_a_goal {
            self.field.shrink_all();
        } else {
            info!(event = "paint_reset", passes = self.passes, "Pass missed every goal, starting over");
            self.field.reset(self.config.start_circles, &mut self.rng);
            self.goals.reset();
            self.screen_full = false;
        }
    }

    /// Score the full canvas against every goal not yet achieved
    fn score_canvas(&mut self) {
        let coverage = self.field.coverage(self.config.goal_probe);
        let fractions = coverage.style_fractions(self.config.styles);
        self.completed_a_goal = false;

        for goal in PaintGoal::ALL {
            if self.goals.is_achieved(goal.index()) || !goal.is_met(&fractions, &self.config) {
                continue;
            }
            self.goals.achieve(goal.index());
            self.completed_a_goal = true;
            if goal.adds_circle() {
                self.field.request_new_circle();
            }
            info!(
                event = "goal_achieved",
                goal = ?goal,
                achieved = self.goals.achieved_count(),
                "Paint goal achieved"
            );
        }

        debug!(?fractions, completed = self.completed_a_goal, "Scored full canvas");
        if self.completed_a_goal && self.goals.all_achieved() {
            self.celebration.start();
        }
    }

    pub fn snapshot(&self) -> PaintSnapshot {
        PaintSnapshot {
            circles: self.field.views(),
            animating: self.field.is_animating(),
            screen_full: self.screen_full,
            goals: self.goals.as_slice().to_vec(),
            white_out: self.white_out,
            red_out: self.red_out,
            passes: self.passes,
        }
    }
}
