//! Scripted pointer input standing in for a player.

use eco_core::{ToyConfig, Vec2};
use eco_world::controls::CanvasLayout;
use eco_world::{Playground, PlaygroundSnapshot, ToySnapshot};
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// One press-move-release, interpolated over `duration` seconds
#[derive(Debug, Clone, Copy)]
struct Gesture {
    from: Vec2,
    to: Vec2,
    elapsed: f32,
    duration: f32,
}

impl Gesture {
    fn stroke(from: Vec2, to: Vec2, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(1e-3),
        }
    }

    fn tap(at: Vec2) -> Self {
        Self::stroke(at, at, 0.0)
    }
}

pub struct Autoplay {
    rng: ChaCha8Rng,
    layout: CanvasLayout,
    /// Side of the rain toy's world, for converting its snapshot positions
    rain_world: f32,
    cooldown: f32,
    gesture: Option<Gesture>,
    gestures: u64,
}

impl Autoplay {
    pub fn new(seed: u64, config: &ToyConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            layout: CanvasLayout::from_config(&config.food_chain),
            rain_world: config.rain.world_size,
            cooldown: 0.0,
            gesture: None,
            gestures: 0,
        }
    }

    /// Gestures started so far
    pub fn gestures(&self) -> u64 {
        self.gestures
    }

    /// Feed this frame's pointer events to the playground
    pub fn step(&mut self, playground: &mut Playground, dt: f32) {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.elapsed += dt;
            let t = (gesture.elapsed / gesture.duration).min(1.0);
            let point = gesture.from.lerp(gesture.to, t);
            if t < 1.0 {
                playground.pointer_move(point);
                return;
            }
            playground.pointer_up(point);
            self.gesture = None;
            self.cooldown = self.rng.gen_range(0.2..1.2);
            return;
        }

        self.cooldown -= dt;
        if self.cooldown > 0.0 {
            return;
        }
        match self.plan(&playground.snapshot()) {
            Some(gesture) => {
                trace!(?gesture, "Starting gesture");
                playground.pointer_down(gesture.from);
                self.gesture = Some(gesture);
                self.gestures += 1;
            }
            None => self.cooldown = 0.25,
        }
    }

    fn plan(&mut self, snapshot: &PlaygroundSnapshot) -> Option<Gesture> {
        match &snapshot.toy {
            ToySnapshot::FoodChain(_) => Some(self.plan_drawing()),
            ToySnapshot::SpillingPaint(paint) => {
                if paint.animating || paint.screen_full {
                    return None;
                }
                let circle = paint.circles.choose(&mut self.rng)?;
                let center = Vec2::new(circle.x, circle.y);
                if self.rng.gen_bool(0.35) {
                    Some(Gesture::tap(center))
                } else {
                    let to = Vec2::new(self.rng.gen_range(0.05..0.95), self.rng.gen_range(0.05..0.75));
                    Some(Gesture::stroke(center, to, 0.8))
                }
            }
            ToySnapshot::CollectingRain(rain) => {
                let world = self.rain_world;
                let shape = rain
                    .shapes
                    .iter()
                    .filter(|s| !s.dragged && s.state.position.y < world * 0.7)
                    .choose(&mut self.rng)?;
                let from = shape.state.position / world;
                let to = match rain.buckets.iter().find(|b| b.kind == shape.kind && b.active) {
                    Some(bucket) => bucket.state.position / world,
                    None => (from + Vec2::new(0.2, 0.0)).clamp(Vec2::ZERO, Vec2::new(1.0, 1.0)),
                };
                Some(Gesture::stroke(from, to, 0.3))
            }
        }
    }

    /// Mostly short strokes across the grid, every fourth gesture a brush switch
    fn plan_drawing(&mut self) -> Gesture {
        let side = self.layout.strip_width();
        if self.gestures % 4 == 3 {
            let origins = self.layout.button_origins();
            let origin = origins[self.rng.gen_range(0..origins.len())];
            return Gesture::tap(origin + Vec2::new(side * 0.5, side * 0.5));
        }
        let min = Vec2::new(side + 0.01, 0.01);
        let max = Vec2::new(0.99, self.layout.grid_height_fraction - 0.01);
        let from = Vec2::new(self.rng.gen_range(min.x..max.x), self.rng.gen_range(min.y..max.y));
        let offset = Vec2::new(self.rng.gen_range(-0.2..0.2), self.rng.gen_range(-0.2..0.2));
        Gesture::stroke(from, (from + offset).clamp(min, max), 0.6)
    }
}
