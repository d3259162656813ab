//! Paint circles: blue-noise placement, dragging with collision push-back,
//! spill growth cascades and coverage sampling.

use eco_core::{exp_lerp, exp_lerp_alpha, PaintConfig, Vec2};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircleState {
    /// Radius easing in from zero
    Birth,
    Ready,
    /// Spilling outward after a click or a collision
    Grow,
    /// Finished spilling for this pass
    Done,
    /// Easing back to the initial radius after a successful pass
    Shrink,
    /// Following the pointer
    Drag,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub position: Vec2,
    pub radius: f32,
    pub state: CircleState,
    /// Where a dragged circle is heading
    pub drag_target: Vec2,
    /// Pointer position when the drag began
    pub drag_start: Vec2,
    /// Draw order: higher priorities paint over lower ones
    pub priority: u32,
    /// Highlight in 0..=1, up while growing or shrinking
    pub transition: f32,
}

impl Circle {
    fn born_at(position: Vec2) -> Self {
        Self {
            position,
            radius: 0.0,
            state: CircleState::Birth,
            drag_target: position,
            drag_start: position,
            priority: 0,
            transition: 0.0,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance_squared(point) < self.radius * self.radius
    }

    pub fn overlaps(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.position.distance_squared(other.position) < reach * reach
    }
}

/// Flat renderer view of a circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub priority: u32,
    pub transition: f32,
    pub style: usize,
}

/// Result of sampling a grid of probe points against the circles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    /// Probe points won by each circle index
    pub per_circle: Vec<usize>,
    pub uncovered: usize,
    pub samples: usize,
}

impl Coverage {
    /// Fraction of all samples owned by each style
    pub fn style_fractions(&self, styles: usize) -> Vec<f32> {
        let mut owned = vec![0usize; styles];
        for (index, count) in self.per_circle.iter().enumerate() {
            owned[index % styles] += count;
        }
        owned
            .into_iter()
            .map(|count| count as f32 / self.samples.max(1) as f32)
            .collect()
    }
}

/// All circles of the paint toy plus the shared animation flag
#[derive(Debug, Clone)]
pub struct CircleField {
    config: PaintConfig,
    circles: Vec<Circle>,
    /// A grow or shrink cascade is running
    animating: bool,
    /// Add a circle once the current shrink finishes
    pending_new: bool,
    pointer: Vec2,
}

impl CircleField {
    pub fn new(config: PaintConfig) -> Self {
        Self {
            config,
            circles: Vec::new(),
            animating: false,
            pending_new: false,
            pointer: Vec2::ZERO,
        }
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    /// Direct access for arranging scenarios
    pub fn circles_mut(&mut self) -> &mut Vec<Circle> {
        &mut self.circles
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn pending_new(&self) -> bool {
        self.pending_new
    }

    pub fn request_new_circle(&mut self) {
        self.pending_new = true;
    }

    fn bounds_max(&self) -> Vec2 {
        Vec2::new(1.0, self.config.height_fraction)
    }

    /// Side lengths of one blue-noise placement cell
    fn cell_size(&self) -> (usize, Vec2) {
        let per_side = (self.config.max_circles as f32).sqrt().ceil().max(1.0) as usize;
        let width = 1.0 / per_side as f32;
        (per_side, Vec2::new(width, width * self.config.height_fraction))
    }

    fn position_in_cell<R: Rng>(&self, cell: (usize, usize), size: Vec2, rng: &mut R) -> Vec2 {
        let margin = self.config.initial_radius;
        let span_x = (size.x - 2.0 * margin).max(0.0);
        let span_y = (size.y - 2.0 * margin).max(0.0);
        Vec2::new(
            cell.0 as f32 * size.x + margin + rng.gen::<f32>() * span_x,
            cell.1 as f32 * size.y + margin + rng.gen::<f32>() * span_y,
        )
    }

    /// Replace all circles with `count` fresh ones, one per shuffled cell
    pub fn reset<R: Rng>(&mut self, count: usize, rng: &mut R) {
        let (per_side, size) = self.cell_size();
        let mut cells: Vec<(usize, usize)> = (0..per_side)
            .flat_map(|i| (0..per_side).map(move |j| (i, j)))
            .collect();
        cells.shuffle(rng);

        self.circles.clear();
        self.animating = false;
        self.pending_new = false;
        for cell in cells.into_iter().take(count.min(self.config.max_circles)) {
            let position = self.position_in_cell(cell, size, rng);
            self.circles.push(Circle::born_at(position));
        }
        debug!(circles = self.circles.len(), "Placed paint circles");
    }

    /// Add one circle in a cell that holds no circle center
    pub fn add_circle<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.circles.len() >= self.config.max_circles {
            return false;
        }
        let (per_side, size) = self.cell_size();
        let mut free: Vec<(usize, usize)> = (0..per_side)
            .flat_map(|i| (0..per_side).map(move |j| (i, j)))
            .filter(|&(i, j)| {
                let lo = Vec2::new(i as f32 * size.x, j as f32 * size.y);
                let hi = lo + size;
                !self.circles.iter().any(|c| {
                    c.position.x >= lo.x
                        && c.position.x < hi.x
                        && c.position.y >= lo.y
                        && c.position.y < hi.y
                })
            })
            .collect();
        free.shuffle(rng);
        let Some(cell) = free.pop() else {
            return false;
        };
        let position = self.position_in_cell(cell, size, rng);
        self.circles.push(Circle::born_at(position));
        debug!(circles = self.circles.len(), "Added paint circle");
        true
    }

    /// Start dragging the ready circle under `point`. Blocked while animating.
    pub fn begin_drag(&mut self, point: Vec2) -> bool {
        if self.animating {
            return false;
        }
        self.pointer = point;
        match self
            .circles
            .iter_mut()
            .find(|c| c.state == CircleState::Ready && c.contains(point))
        {
            Some(circle) => {
                circle.state = CircleState::Drag;
                circle.drag_start = point;
                true
            }
            None => false,
        }
    }

    pub fn update_drag(&mut self, point: Vec2) {
        self.pointer = point;
    }

    /// Release the dragged circle. A release without real movement spills it.
    /// Returns true when a spill started.
    pub fn end_drag(&mut self, point: Vec2) -> bool {
        self.pointer = point;
        let click_distance_sq = self.config.click_distance_sq;
        let Some(circle) = self
            .circles
            .iter_mut()
            .find(|c| c.state == CircleState::Drag)
        else {
            return false;
        };
        circle.state = CircleState::Ready;
        if circle.contains(point)
            && circle.drag_start.distance_squared(circle.position) < click_distance_sq
        {
            circle.state = CircleState::Grow;
            self.animating = true;
            debug!(priority = circle.priority, "Paint spill started");
            return true;
        }
        false
    }

    /// Mark every circle done and stop any cascade
    pub fn finish_all(&mut self) {
        for circle in &mut self.circles {
            circle.state = CircleState::Done;
        }
        self.animating = false;
    }

    /// Ease every circle back to its initial radius
    pub fn shrink_all(&mut self) {
        for circle in &mut self.circles {
            circle.state = CircleState::Shrink;
        }
        self.animating = true;
    }

    /// Advance all circles by `dt`. Returns true on the frame a shrink finishes.
    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R) -> bool {
        let mut was_shrinking = false;
        for i in 0..self.circles.len() {
            let towards = match self.circles[i].state {
                CircleState::Birth => {
                    self.birth(i, dt);
                    0.0
                }
                CircleState::Ready => {
                    self.follow_drag(i, dt, false);
                    0.0
                }
                CircleState::Drag => {
                    self.follow_drag(i, dt, true);
                    0.0
                }
                CircleState::Grow => {
                    self.grow(i, dt);
                    1.0
                }
                CircleState::Shrink => {
                    was_shrinking = true;
                    self.shrink(i, dt);
                    1.0
                }
                CircleState::Done => 0.0,
            };
            let circle = &mut self.circles[i];
            circle.transition =
                exp_lerp(circle.transition, towards, self.config.transition_speed, dt);
        }

        let still_shrinking = self
            .circles
            .iter()
            .any(|c| c.state == CircleState::Shrink);
        if !was_shrinking || still_shrinking {
            return false;
        }

        self.animating = false;
        if self.pending_new {
            self.pending_new = false;
            self.add_circle(rng);
        }
        for circle in &mut self.circles {
            circle.priority = 0;
        }
        true
    }

    fn birth(&mut self, i: usize, dt: f32) {
        let r0 = self.config.initial_radius;
        let circle = &mut self.circles[i];
        circle.radius = exp_lerp(circle.radius, r0, self.config.birth_speed, dt);
        if circle.radius + self.config.epsilon >= r0 {
            circle.radius = r0;
            circle.state = CircleState::Ready;
        }
    }

    fn shrink(&mut self, i: usize, dt: f32) {
        let r0 = self.config.initial_radius;
        let circle = &mut self.circles[i];
        circle.radius = exp_lerp(circle.radius, r0, self.config.shrink_speed, dt);
        if circle.radius < r0 + self.config.epsilon {
            circle.radius = r0;
            circle.state = CircleState::Ready;
        }
    }

    /// Grow circle `i`; the first unfinished circle it touches takes over
    fn grow(&mut self, i: usize, dt: f32) {
        {
            let circle = &mut self.circles[i];
            circle.radius = exp_lerp(
                circle.radius,
                self.config.grow_radius,
                self.config.grow_speed,
                dt,
            );
        }
        let grower = self.circles[i];
        let hit = self.circles.iter().enumerate().position(|(j, other)| {
            j != i && other.state != CircleState::Done && grower.overlaps(other)
        });
        if let Some(j) = hit {
            self.circles[i].state = CircleState::Done;
            self.circles[j].priority = grower.priority + 1;
            self.circles[j].state = CircleState::Grow;
            debug!(from = i, to = j, priority = grower.priority + 1, "Paint spill spread");
        }
    }

    /// Ease circle `i` toward its drag target and push the target out of
    /// any circle it overlaps
    fn follow_drag(&mut self, i: usize, dt: f32, track_pointer: bool) {
        let max = self.bounds_max();
        let pointer = self.pointer;
        {
            let circle = &mut self.circles[i];
            if track_pointer {
                circle.drag_target = pointer.clamp(Vec2::ZERO, max);
            }
            let alpha = exp_lerp_alpha(self.config.drag_speed, dt);
            circle.position = circle.position.lerp(circle.drag_target, alpha);
        }
        if self.animating {
            return;
        }

        let me = self.circles[i];
        let mut count = 0usize;
        let mut sum_position = Vec2::ZERO;
        let mut sum_radii = 0.0f32;
        let mut sum_dist_sq = 0.0f32;
        for (j, other) in self.circles.iter().enumerate() {
            if j == i {
                continue;
            }
            let reach = me.radius + other.radius;
            let dist_sq = me.drag_target.distance_squared(other.position);
            if dist_sq < reach * reach {
                count += 1;
                sum_position += other.position;
                sum_radii += reach;
                sum_dist_sq += dist_sq;
            }
        }
        if count == 0 {
            return;
        }

        let n = count as f32;
        let avg_position = sum_position / n;
        let Some(dir) = (me.position - avg_position).normalized() else {
            return;
        };
        let push = sum_radii / n - (sum_dist_sq / n).sqrt() + self.config.collision_buffer;
        let circle = &mut self.circles[i];
        circle.drag_target = (circle.drag_target + dir * push).clamp(Vec2::ZERO, max);
    }

    /// Sample an `n`×`n` grid of probe points over the canvas. Each point is
    /// owned by the covering circle with the highest priority, later circles
    /// winning ties.
    pub fn coverage(&self, n: usize) -> Coverage {
        let mut per_circle = vec![0usize; self.circles.len()];
        let mut uncovered = 0;
        let height = self.config.height_fraction;
        for i in 0..n {
            for j in 0..n {
                let point = Vec2::new(
                    (i as f32 + 0.5) / n as f32,
                    (j as f32 + 0.5) * height / n as f32,
                );
                let mut owner: Option<(usize, u32)> = None;
                for (k, circle) in self.circles.iter().enumerate() {
                    if circle.contains(point)
                        && owner.map_or(true, |(_, best)| circle.priority >= best)
                    {
                        owner = Some((k, circle.priority));
                    }
                }
                match owner {
                    Some((k, _)) => per_circle[k] += 1,
                    None => uncovered += 1,
                }
            }
        }
        Coverage {
            per_circle,
            uncovered,
            samples: n * n,
        }
    }

    pub fn views(&self) -> Vec<CircleView> {
        let styles = self.config.styles.max(1);
        self.circles
            .iter()
            .enumerate()
            .map(|(i, c)| CircleView {
                x: c.position.x,
                y: c.position.y,
                radius: c.radius,
                priority: c.priority,
                transition: c.transition,
                style: i % styles,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 1.0 / 60.0;

    fn ready_circle(x: f32, y: f32, radius: f32) -> Circle {
        let mut c = Circle::born_at(Vec2::new(x, y));
        c.radius = radius;
        c.state = CircleState::Ready;
        c
    }

    fn field_with(circles: Vec<Circle>) -> CircleField {
        let mut field = CircleField::new(PaintConfig::default());
        *field.circles_mut() = circles;
        field
    }

    #[test]
    fn test_reset_places_circles_in_distinct_cells() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut field = CircleField::new(PaintConfig::default());
        field.reset(4, &mut rng);
        assert_eq!(field.circles().len(), 4);
        let cells: std::collections::HashSet<(i32, i32)> = field
            .circles()
            .iter()
            .map(|c| {
                assert_eq!(c.state, CircleState::Birth);
                assert!(c.position.x >= 0.0 && c.position.x <= 1.0);
                assert!(c.position.y >= 0.0 && c.position.y <= 0.8);
                ((c.position.x * 3.0) as i32, (c.position.y / (0.8 / 3.0)) as i32)
            })
            .collect();
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_add_circle_respects_max() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut field = CircleField::new(PaintConfig::default());
        field.reset(4, &mut rng);
        assert!(field.add_circle(&mut rng));
        assert!(field.add_circle(&mut rng));
        assert!(field.add_circle(&mut rng));
        assert_eq!(field.circles().len(), 7);
        assert!(!field.add_circle(&mut rng));
    }

    #[test]
    fn test_birth_snaps_to_initial_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut field = CircleField::new(PaintConfig::default());
        field.reset(1, &mut rng);
        for _ in 0..120 {
            field.update(DT, &mut rng);
        }
        let c = field.circles()[0];
        assert_eq!(c.state, CircleState::Ready);
        assert_eq!(c.radius, 0.075);
    }

    #[test]
    fn test_click_starts_spill() {
        let mut field = field_with(vec![ready_circle(0.5, 0.4, 0.075)]);
        let p = Vec2::new(0.5, 0.4);
        assert!(field.begin_drag(p));
        assert_eq!(field.circles()[0].state, CircleState::Drag);
        assert!(field.end_drag(p));
        assert_eq!(field.circles()[0].state, CircleState::Grow);
        assert!(field.is_animating());
        // no drags while a spill runs
        assert!(!field.begin_drag(p));
    }

    #[test]
    fn test_drag_release_away_does_not_spill() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut field = field_with(vec![ready_circle(0.2, 0.4, 0.075)]);
        assert!(field.begin_drag(Vec2::new(0.2, 0.4)));
        field.update_drag(Vec2::new(0.7, 0.4));
        for _ in 0..120 {
            field.update(DT, &mut rng);
        }
        assert!((field.circles()[0].position.x - 0.7).abs() < 0.01);
        assert!(!field.end_drag(Vec2::new(0.7, 0.4)));
        assert_eq!(field.circles()[0].state, CircleState::Ready);
    }

    #[test]
    fn test_drag_target_stays_on_canvas() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut field = field_with(vec![ready_circle(0.5, 0.4, 0.075)]);
        field.begin_drag(Vec2::new(0.5, 0.4));
        field.update_drag(Vec2::new(2.0, -1.0));
        field.update(DT, &mut rng);
        assert_eq!(field.circles()[0].drag_target, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_dragged_circle_is_pushed_off_others() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut field = field_with(vec![
            ready_circle(0.3, 0.4, 0.075),
            ready_circle(0.6, 0.4, 0.075),
        ]);
        field.begin_drag(Vec2::new(0.3, 0.4));
        field.update_drag(Vec2::new(0.6, 0.4));
        for _ in 0..30 {
            field.update(DT, &mut rng);
        }
        // the pushed-out target takes over once released
        assert!(!field.end_drag(Vec2::new(0.6, 0.4)));
        for _ in 0..240 {
            field.update(DT, &mut rng);
        }
        let dragged = field.circles()[0];
        let other = field.circles()[1];
        assert!(dragged.position.distance(other.position) > 0.1);
    }

    #[test]
    fn test_grow_hands_off_on_contact() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut grower = ready_circle(0.3, 0.4, 0.075);
        grower.state = CircleState::Grow;
        let mut field = field_with(vec![grower, ready_circle(0.55, 0.4, 0.075)]);
        field.animating = true;

        let mut frames = 0;
        while field.circles()[0].state == CircleState::Grow && frames < 2000 {
            field.update(DT, &mut rng);
            let growing = field
                .circles()
                .iter()
                .filter(|c| c.state == CircleState::Grow)
                .count();
            assert!(growing <= 1);
            frames += 1;
        }
        assert_eq!(field.circles()[0].state, CircleState::Done);
        assert_eq!(field.circles()[1].state, CircleState::Grow);
        assert_eq!(field.circles()[1].priority, 1);
    }

    #[test]
    fn test_shrink_finishes_and_adds_pending() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut big = ready_circle(0.5, 0.4, 1.0);
        big.priority = 3;
        let mut field = field_with(vec![big]);
        field.request_new_circle();
        field.shrink_all();
        let mut finished = false;
        for _ in 0..600 {
            if field.update(DT, &mut rng) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert!(!field.is_animating());
        assert_eq!(field.circles().len(), 2);
        assert_eq!(field.circles()[0].radius, 0.075);
        assert_eq!(field.circles()[0].priority, 0);
        assert!(!field.pending_new());
    }

    #[test]
    fn test_coverage_prefers_priority_then_latest() {
        let mut low = ready_circle(0.5, 0.4, 2.0);
        low.priority = 2;
        let mut high = ready_circle(0.5, 0.4, 2.0);
        high.priority = 1;
        let field = field_with(vec![low, high]);
        let coverage = field.coverage(4);
        assert_eq!(coverage.per_circle, vec![16, 0]);

        let field = field_with(vec![ready_circle(0.5, 0.4, 2.0), ready_circle(0.5, 0.4, 2.0)]);
        let coverage = field.coverage(4);
        assert_eq!(coverage.per_circle, vec![0, 16]);
        assert_eq!(coverage.uncovered, 0);
        assert_eq!(coverage.style_fractions(3), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_coverage_counts_gaps() {
        let field = field_with(vec![ready_circle(0.1, 0.1, 0.075)]);
        let coverage = field.coverage(5);
        assert_eq!(coverage.samples, 25);
        assert_eq!(coverage.per_circle[0], 1);
        assert_eq!(coverage.uncovered, 24);
    }
}
