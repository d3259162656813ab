//! The collecting rain toy: shapes fall from the top, the player drags them
//! into buckets that grow, shrink and unlock the next kind of shape.

use crate::goals::{Celebration, GoalSet, RainGoal};
use crate::morph::{MorphState, Morphable};
use eco_core::{clamp, lerp, CelebrationConfig, RainConfig, Stopwatch, Vec2};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};
use tracing::{debug, info, instrument, warn};

/// Half-extent of every shape's hit box relative to its scale
const AABB_HALF_EXTENT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Raindrop,
    Diamond,
    Star,
    Heart,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Raindrop,
        ShapeKind::Diamond,
        ShapeKind::Star,
        ShapeKind::Heart,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Kind whose bucket this kind's bucket unlocks
    pub fn next(self) -> Option<ShapeKind> {
        match self {
            ShapeKind::Raindrop => Some(ShapeKind::Diamond),
            ShapeKind::Diamond => Some(ShapeKind::Star),
            ShapeKind::Star => Some(ShapeKind::Heart),
            ShapeKind::Heart => None,
        }
    }
}

fn aabb_contains(center: Vec2, scale: f32, point: Vec2) -> bool {
    let half = AABB_HALF_EXTENT * scale;
    point.x >= center.x - half
        && point.x <= center.x + half
        && point.y >= center.y - half
        && point.y <= center.y + half
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingShape {
    pub kind: ShapeKind,
    pub morph: Morphable,
    pub velocity: Vec2,
    pub dragged: bool,
    /// Per-shape phase for renderer variation
    pub seed: f32,
}

impl FallingShape {
    /// Hit test against the target position at the displayed scale
    pub fn hit(&self, point: Vec2) -> bool {
        aabb_contains(self.morph.target.position, self.morph.current.scale, point)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub kind: ShapeKind,
    pub morph: Morphable,
    pub active: bool,
}

impl Bucket {
    pub fn scale(&self) -> f32 {
        self.morph.current.scale
    }

    pub fn target_scale(&self) -> f32 {
        self.morph.target.scale
    }

    pub fn contains(&self, point: Vec2) -> bool {
        aabb_contains(self.morph.current.position, self.morph.current.scale, point)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalMarker {
    pub goal: RainGoal,
    pub morph: Morphable,
    pub achieved: bool,
}

/// Renderable state of the rain toy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainSnapshot {
    pub elapsed: f32,
    pub shapes: Vec<ShapeView>,
    pub buckets: Vec<BucketView>,
    pub goals: Vec<GoalView>,
    pub spawn_interval: f32,
    pub base_velocity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeView {
    pub kind: ShapeKind,
    pub state: MorphState,
    pub dragged: bool,
    pub seed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketView {
    pub kind: ShapeKind,
    pub state: MorphState,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalView {
    pub goal: RainGoal,
    pub state: MorphState,
    pub achieved: bool,
}

/// Round-robin spawning, retuned every frame from the bucket state
#[derive(Debug, Clone)]
struct SpawnSchedule {
    point_count: usize,
    last_point: usize,
    last_kind: usize,
    interval: f32,
    base_velocity: f32,
    last_spawn: f32,
}

pub struct CollectingRain {
    config: RainConfig,
    rng: ChaCha8Rng,
    clock: Stopwatch,
    shapes: Vec<FallingShape>,
    buckets: [Bucket; 4],
    markers: Vec<GoalMarker>,
    goals: GoalSet,
    celebration: Celebration,
    spawn: SpawnSchedule,
    last_shrink: f32,
    /// Pointer in world units while held
    pointer: Option<Vec2>,
}

impl CollectingRain {
    #[instrument(skip_all, fields(seed = config.seed))]
    pub fn new(config: RainConfig, celebration: &CelebrationConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let floor = config.floor_y();
        let buckets = ShapeKind::ALL.map(|kind| {
            let y = (kind.index() + 1) as f32 * floor / (ShapeKind::ALL.len() + 1) as f32;
            let state = MorphState::new(Vec2::new(config.bucket_x, y), 0.0, 0.0);
            Bucket {
                kind,
                morph: Morphable::new(state, config.bucket_morph_speed),
                active: false,
            }
        });

        let buffered_width = config.world_size * 0.96;
        let slot = buffered_width / RainGoal::ALL.len() as f32;
        let offset = slot * 0.5 + (config.world_size - buffered_width) * 0.5;
        let marker_y = config.world_size - config.bottom_strip * 0.5;
        let markers = RainGoal::ALL
            .iter()
            .enumerate()
            .map(|(i, &goal)| {
                let state = MorphState::new(
                    Vec2::new(i as f32 * slot + offset, marker_y),
                    config.goal_scale,
                    0.0,
                );
                GoalMarker {
                    goal,
                    morph: Morphable::new(state, config.goal_morph_speed),
                    achieved: false,
                }
            })
            .collect();

        let spawn = SpawnSchedule {
            point_count: 1,
            last_point: 0,
            last_kind: 0,
            interval: config.max_spawn_interval,
            base_velocity: config.min_velocity,
            last_spawn: -config.max_spawn_interval,
        };

        let mut toy = Self {
            config,
            rng,
            clock: Stopwatch::new(),
            shapes: Vec::new(),
            buckets,
            markers,
            goals: GoalSet::new(RainGoal::ALL.len()),
            celebration: Celebration::new(celebration),
            spawn,
            last_shrink: 0.0,
            pointer: None,
        };
        toy.buckets[ShapeKind::Raindrop.index()].active = true;
        toy.grow_bucket(ShapeKind::Raindrop, toy.config.bucket_start_scale);
        toy
    }

    pub fn shapes(&self) -> &[FallingShape] {
        &self.shapes
    }

    pub fn bucket(&self, kind: ShapeKind) -> &Bucket {
        &self.buckets[kind.index()]
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn goals(&self) -> &GoalSet {
        &self.goals
    }

    pub fn celebration(&self) -> &Celebration {
        &self.celebration
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn.interval
    }

    pub fn base_velocity(&self) -> f32 {
        self.spawn.base_velocity
    }

    pub fn spawn_point_count(&self) -> usize {
        self.spawn.point_count
    }

    pub fn active_bucket_count(&self) -> usize {
        self.buckets.iter().filter(|b| b.active).count()
    }

    /// Add a falling shape at `position` moving with `velocity`
    pub fn add_falling_shape(&mut self, kind: ShapeKind, position: Vec2, velocity: Vec2) {
        let state = MorphState::new(position, self.config.shape_scale, 0.0);
        self.shapes.push(FallingShape {
            kind,
            morph: Morphable::new(state, self.config.shape_morph_speed),
            velocity,
            dragged: false,
            seed: self.rng.gen::<f32>() * TAU,
        });
    }

    /// Remove the falling shape at `index`. An index past the end is reported and skipped.
    pub fn remove_falling_shape(&mut self, index: usize) -> bool {
        if index >= self.shapes.len() {
            warn!(index, live = self.shapes.len(), "Invalid falling shape index");
            return false;
        }
        self.shapes.remove(index);
        true
    }

    /// Grow (or with negative `growth`, shrink) the target scale of a bucket,
    /// locking it when it gets too small and unlocking the next kind when it
    /// gets big enough
    pub fn grow_bucket(&mut self, kind: ShapeKind, growth: f32) {
        let (min, max) = (self.config.bucket_min_scale, self.config.bucket_max_scale);
        let bucket = &mut self.buckets[kind.index()];
        let target = clamp(bucket.morph.target.scale + growth, min, max);
        bucket.morph.target.scale = target;

        if kind != ShapeKind::Raindrop && target <= self.config.lock_scale {
            if bucket.active {
                info!(event = "bucket_locked", kind = ?kind, "Bucket locked");
            }
            bucket.active = false;
            bucket.morph.target.scale = 0.0;
            return;
        }

        if target < self.config.unlock_scale || growth <= 0.0 {
            return;
        }
        let Some(next) = kind.next() else {
            return;
        };
        if self.buckets[next.index()].active {
            return;
        }
        info!(event = "bucket_unlocked", kind = ?next, "Bucket unlocked");
        let unlocked = &mut self.buckets[next.index()];
        unlocked.active = true;
        unlocked.morph.target.scale = 0.0;
        self.grow_bucket(next, self.config.bucket_start_scale);
    }

    /// Convert a normalized canvas point to world units
    fn to_world(&self, point: Vec2) -> Vec2 {
        point * self.config.world_size
    }

    /// Pick up the first shape under `point` (normalized canvas coordinates)
    pub fn begin_drag(&mut self, point: Vec2) -> bool {
        let world = self.to_world(point);
        self.pointer = Some(world);
        if self.shapes.iter().any(|s| s.dragged) {
            return false;
        }
        let picked = ShapeKind::ALL.iter().find_map(|&kind| {
            self.shapes
                .iter()
                .position(|s| s.kind == kind && s.hit(world))
        });
        let Some(index) = picked else {
            return false;
        };
        let drag_scale = self.config.shape_scale * self.config.drag_scale;
        let shape = &mut self.shapes[index];
        shape.dragged = true;
        shape.morph.target.scale = drag_scale;
        debug!(kind = ?shape.kind, "Shape picked up");
        true
    }

    pub fn update_drag(&mut self, point: Vec2) {
        if self.pointer.is_some() {
            self.pointer = Some(self.to_world(point));
        }
    }

    /// Drop the held shape. Returns true when it landed in its bucket.
    pub fn end_drag(&mut self, point: Vec2) -> bool {
        let world = self.to_world(point);
        self.pointer = None;
        let Some(index) = self.shapes.iter().position(|s| s.dragged) else {
            return false;
        };

        let shape_scale = self.config.shape_scale;
        let shape = &mut self.shapes[index];
        shape.dragged = false;
        shape.morph.target.scale = shape_scale;
        shape.morph.target.position = world;
        let kind = shape.kind;

        let bucket = &self.buckets[kind.index()];
        if !bucket.active || !bucket.contains(world) {
            return false;
        }
        self.grow_bucket(kind, self.config.growth);
        self.remove_falling_shape(index);
        debug!(kind = ?kind, "Shape caught");
        true
    }

    pub fn update(&mut self, dt: f32) {
        self.clock.tick(dt);
        self.update_goals();
        self.update_buckets();
        self.spawn_shapes();
        self.update_falling_shapes(dt);
        self.step_morphs(dt);
        self.celebration.update(dt);
    }

    fn update_goals(&mut self) {
        let active = |kind: ShapeKind| self.buckets[kind.index()].active;
        let count = |kind: ShapeKind| self.shapes.iter().filter(|s| s.kind == kind).count();
        let unlock = self.config.unlock_scale;

        let met = [
            active(ShapeKind::Diamond),
            active(ShapeKind::Diamond) && active(ShapeKind::Star) && active(ShapeKind::Heart),
            !active(ShapeKind::Diamond) && !active(ShapeKind::Star) && active(ShapeKind::Heart),
            count(ShapeKind::Star) > 0
                && count(ShapeKind::Raindrop) == 0
                && count(ShapeKind::Diamond) == 0
                && count(ShapeKind::Heart) == 0,
            self.buckets.iter().all(|b| b.active && b.scale() > unlock),
        ];

        let mut newly = false;
        for goal in RainGoal::ALL {
            if met[goal.index()] && self.goals.achieve(goal.index()) {
                newly = true;
                self.markers[goal.index()].achieved = true;
                info!(
                    event = "goal_achieved",
                    goal = ?goal,
                    achieved = self.goals.achieved_count(),
                    "Rain goal achieved"
                );
            }
        }

        if newly && self.goals.all_achieved() {
            self.celebration.start();
        }
    }

    fn update_buckets(&mut self) {
        let now = self.clock.elapsed();
        if now > self.last_shrink + self.config.shrink_interval {
            self.last_shrink = now;
            for kind in ShapeKind::ALL {
                self.grow_bucket(kind, -self.config.shrink);
            }
        }

        let active = self.active_bucket_count();
        let total_scale: f32 = self.buckets.iter().map(Bucket::scale).sum();
        let capacity = self.config.bucket_max_scale * self.buckets.len() as f32;
        let alpha = active as f32 / self.buckets.len() as f32 * 0.5 + total_scale / capacity * 0.5;

        self.spawn.point_count = 1 + active;
        self.spawn.interval = lerp(
            self.config.max_spawn_interval,
            self.config.min_spawn_interval,
            alpha,
        );
        self.spawn.base_velocity = lerp(self.config.min_velocity, self.config.max_velocity, alpha);
    }

    fn spawn_shapes(&mut self) {
        let now = self.clock.elapsed();
        if self.spawn.last_spawn + self.spawn.interval >= now {
            return;
        }
        self.spawn.last_spawn = now;

        let points = self.spawn.point_count.max(1);
        self.spawn.last_point = (self.spawn.last_point + 1) % points;
        let x = (self.spawn.last_point + 1) as f32 * self.config.world_size / (points + 2) as f32;

        let kinds: Vec<ShapeKind> = ShapeKind::ALL
            .into_iter()
            .filter(|&k| k == ShapeKind::Raindrop || self.buckets[k.index()].active)
            .collect();
        self.spawn.last_kind = (self.spawn.last_kind + 1) % kinds.len();
        let kind = kinds[self.spawn.last_kind];

        let v = self.spawn.base_velocity;
        let velocity = Vec2::new(v * self.config.x_velocity_factor, v);
        self.add_falling_shape(kind, Vec2::new(x, 0.0), velocity);
    }

    fn update_falling_shapes(&mut self, dt: f32) {
        let floor = self.config.floor_y();
        let pointer = self.pointer;
        let mut i = 0;
        while i < self.shapes.len() {
            let shape = &mut self.shapes[i];
            if shape.dragged {
                if let Some(p) = pointer {
                    shape.morph.target.position = p;
                }
            } else {
                shape.morph.target.position += shape.velocity * dt;
                shape.morph.target.rotation = shape.velocity.angle() - FRAC_PI_2;
                if shape.morph.target.position.y > floor {
                    self.shapes.remove(i);
                    continue;
                }
            }
            i += 1;
        }
    }

    fn step_morphs(&mut self, dt: f32) {
        for shape in &mut self.shapes {
            shape.morph.step(dt);
        }
        for bucket in &mut self.buckets {
            bucket.morph.step(dt);
        }
        for marker in &mut self.markers {
            marker.morph.step(dt);
        }
    }

    pub fn snapshot(&self) -> RainSnapshot {
        RainSnapshot {
            elapsed: self.clock.elapsed(),
            shapes: self
                .shapes
                .iter()
                .map(|s| ShapeView {
                    kind: s.kind,
                    state: s.morph.current,
                    dragged: s.dragged,
                    seed: s.seed,
                })
                .collect(),
            buckets: self
                .buckets
                .iter()
                .map(|b| BucketView {
                    kind: b.kind,
                    state: b.morph.current,
                    active: b.active,
                })
                .collect(),
            goals: self
                .markers
                .iter()
                .map(|m| GoalView {
                    goal: m.goal,
                    state: m.morph.current,
                    achieved: m.achieved,
                })
                .collect(),
            spawn_interval: self.spawn.interval,
            base_velocity: self.spawn.base_velocity,
        }
    }
}
