//! Hosting of one toy at a time behind a common frame/pointer interface.

use crate::automaton::{FoodChain, FoodChainSnapshot};
use crate::paint::{PaintSnapshot, SpillingPaint};
use crate::rain::{CollectingRain, RainSnapshot};
use eco_core::{ToyConfig, ToyKind, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// A toy driven one frame at a time. Pointer points are normalized canvas
/// coordinates with the origin at the top left.
pub trait Toy {
    fn kind(&self) -> ToyKind;

    fn update(&mut self, dt: f32);

    fn pointer_down(&mut self, point: Vec2);

    fn pointer_move(&mut self, point: Vec2);

    fn pointer_up(&mut self, point: Vec2);

    /// Opacity of the celebration overlay
    fn celebration_alpha(&self) -> f32 {
        0.0
    }

    fn snapshot(&self) -> ToySnapshot;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "toy", rename_all = "snake_case")]
pub enum ToySnapshot {
    FoodChain(FoodChainSnapshot),
    CollectingRain(RainSnapshot),
    SpillingPaint(PaintSnapshot),
}

impl Toy for FoodChain {
    fn kind(&self) -> ToyKind {
        ToyKind::FoodChain
    }

    fn update(&mut self, dt: f32) {
        FoodChain::update(self, dt)
    }

    fn pointer_down(&mut self, point: Vec2) {
        FoodChain::pointer_down(self, point)
    }

    fn pointer_move(&mut self, point: Vec2) {
        FoodChain::pointer_move(self, point)
    }

    fn pointer_up(&mut self, point: Vec2) {
        FoodChain::pointer_up(self, point)
    }

    fn snapshot(&self) -> ToySnapshot {
        ToySnapshot::FoodChain(FoodChain::snapshot(self))
    }
}

impl Toy for CollectingRain {
    fn kind(&self) -> ToyKind {
        ToyKind::CollectingRain
    }

    fn update(&mut self, dt: f32) {
        CollectingRain::update(self, dt)
    }

    fn pointer_down(&mut self, point: Vec2) {
        self.begin_drag(point);
    }

    fn pointer_move(&mut self, point: Vec2) {
        self.update_drag(point)
    }

    fn pointer_up(&mut self, point: Vec2) {
        self.end_drag(point);
    }

    fn celebration_alpha(&self) -> f32 {
        self.celebration().alpha()
    }

    fn snapshot(&self) -> ToySnapshot {
        ToySnapshot::CollectingRain(CollectingRain::snapshot(self))
    }
}

impl Toy for SpillingPaint {
    fn kind(&self) -> ToyKind {
        ToyKind::SpillingPaint
    }

    fn update(&mut self, dt: f32) {
        SpillingPaint::update(self, dt)
    }

    fn pointer_down(&mut self, point: Vec2) {
        SpillingPaint::pointer_down(self, point)
    }

    fn pointer_move(&mut self, point: Vec2) {
        SpillingPaint::pointer_move(self, point)
    }

    fn pointer_up(&mut self, point: Vec2) {
        SpillingPaint::pointer_up(self, point)
    }

    fn celebration_alpha(&self) -> f32 {
        self.celebration().alpha()
    }

    fn snapshot(&self) -> ToySnapshot {
        ToySnapshot::SpillingPaint(SpillingPaint::snapshot(self))
    }
}

/// Build a fresh toy of `kind`
pub fn create_toy(kind: ToyKind, config: &ToyConfig) -> Box<dyn Toy> {
    match kind {
        ToyKind::FoodChain => Box::new(FoodChain::new(config.food_chain.clone())),
        ToyKind::CollectingRain => {
            Box::new(CollectingRain::new(config.rain.clone(), &config.celebration))
        }
        ToyKind::SpillingPaint => {
            Box::new(SpillingPaint::new(config.paint.clone(), &config.celebration))
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaygroundSnapshot {
    pub kind: ToyKind,
    pub paused: bool,
    pub celebration_alpha: f32,
    pub toy: ToySnapshot,
}

/// Owns the single running toy
pub struct Playground {
    config: ToyConfig,
    toy: Box<dyn Toy>,
    paused: bool,
    frames: u64,
}

impl Playground {
    #[instrument(skip(config))]
    pub fn new(kind: ToyKind, config: ToyConfig) -> Self {
        let toy = create_toy(kind, &config);
        info!(toy = %kind, "Playground started");
        Self {
            config,
            toy,
            paused: false,
            frames: 0,
        }
    }

    pub fn kind(&self) -> ToyKind {
        self.toy.kind()
    }

    pub fn toy(&self) -> &dyn Toy {
        self.toy.as_ref()
    }

    /// Frames run since the current toy started, paused frames excluded
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Replace the running toy with a fresh one, discarding all of its state
    pub fn switch_to(&mut self, kind: ToyKind) {
        info!(from = %self.toy.kind(), to = %kind, "Switching toy");
        self.toy = create_toy(kind, &self.config);
        self.paused = false;
        self.frames = 0;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        self.toy.update(dt);
        self.frames += 1;
    }

    /// A press on a paused playground only wakes it up
    pub fn pointer_down(&mut self, point: Vec2) {
        if self.paused {
            self.unpause();
            return;
        }
        self.toy.pointer_down(point);
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        if !self.paused {
            self.toy.pointer_move(point);
        }
    }

    pub fn pointer_up(&mut self, point: Vec2) {
        if !self.paused {
            self.toy.pointer_up(point);
        }
    }

    pub fn snapshot(&self) -> PlaygroundSnapshot {
        PlaygroundSnapshot {
            kind: self.toy.kind(),
            paused: self.paused,
            celebration_alpha: self.toy.celebration_alpha(),
            toy: self.toy.snapshot(),
        }
    }
}
