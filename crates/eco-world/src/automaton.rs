//! The food chain toy: a tick-driven grid automaton fed by pointer drawing.

use crate::behavior::{self, TickStats};
use crate::controls::{BrushPanel, CanvasLayout, DrawMeter};
use crate::grid::{CellView, Grid, SpeciesCounts};
use eco_core::{FoodChainConfig, Position, Species, TickClock, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub struct FoodChain {
    config: FoodChainConfig,
    grid: Grid,
    clock: TickClock,
    rng: ChaCha8Rng,
    meter: DrawMeter,
    brush: BrushPanel,
    layout: CanvasLayout,
    /// Canvas point of the held pointer
    pointer: Option<Vec2>,
    /// Last cell drawn during the current press
    last_drawn: Option<Position>,
    totals: TickStats,
}

/// Renderable state of the food chain toy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodChainSnapshot {
    pub tick: u64,
    pub columns: i32,
    pub rows: i32,
    pub cells: Vec<CellView>,
    pub counts: SpeciesCounts,
    pub draw_meter: f32,
    pub draw_meter_max: f32,
    pub brush: Species,
    pub brush_weights: [f32; 3],
}

impl FoodChain {
    #[instrument(skip_all, fields(columns = config.columns, rows = config.rows, seed = config.seed))]
    pub fn new(config: FoodChainConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = Grid::new(config.columns, config.rows);
        let clock = TickClock::new(config.tick_length);
        let meter = DrawMeter::new(config.draw_meter_max, config.draw_meter_recovery);
        let layout = CanvasLayout::from_config(&config);

        debug!("Created food chain grid");

        Self {
            config,
            grid,
            clock,
            rng,
            meter,
            brush: BrushPanel::default(),
            layout,
            pointer: None,
            last_drawn: None,
            totals: TickStats::default(),
        }
    }

    pub fn config(&self) -> &FoodChainConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for seeding scenarios
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn tick_count(&self) -> u64 {
        self.clock.tick_count()
    }

    pub fn meter(&self) -> &DrawMeter {
        &self.meter
    }

    pub fn brush(&self) -> &BrushPanel {
        &self.brush
    }

    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    /// Event counts accumulated since creation
    pub fn totals(&self) -> &TickStats {
        &self.totals
    }

    /// Place a fresh entity at `pos`, paying one unit of the draw meter.
    ///
    /// Returns false without touching anything when the position is outside
    /// the grid, the meter is empty, or the same cell was just drawn.
    pub fn place_entity(&mut self, pos: Position, species: Species) -> bool {
        if !self.grid.in_bounds(pos) {
            return false;
        }
        if self.last_drawn == Some(pos) {
            return false;
        }
        if !self.meter.try_consume() {
            return false;
        }
        self.grid.spawn(pos, species);
        self.last_drawn = Some(pos);
        true
    }

    pub fn pointer_down(&mut self, point: Vec2) {
        if let Some(species) = self.layout.brush_at(point) {
            debug!(brush = ?species, "Brush switched");
            self.brush.select(species);
        }
        self.pointer = Some(point);
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        if self.pointer.is_some() {
            self.pointer = Some(point);
        }
    }

    pub fn pointer_up(&mut self, _point: Vec2) {
        self.pointer = None;
        self.last_drawn = None;
    }

    /// Advance the toy by one frame
    pub fn update(&mut self, delta: f32) {
        if let Some(point) = self.pointer {
            let pos = self.layout.to_grid(point, self.grid.columns, self.grid.rows);
            self.place_entity(pos, self.brush.selected);
        }

        if let Some(ticks) = self.clock.advance(delta) {
            for tick in ticks {
                self.step(tick);
            }
        }

        self.meter.recover(delta, self.pointer.is_some());
        self.brush.update(delta, self.config.brush_speed);
    }

    fn step(&mut self, tick: u64) {
        let stats = behavior::run_tick(&mut self.grid, tick, &self.config, &mut self.rng);
        self.totals.merge(&stats);

        if self.config.metrics_interval > 0 && tick % self.config.metrics_interval == 0 {
            self.emit_population_metrics(tick);
        }
    }

    fn emit_population_metrics(&self, tick: u64) {
        let counts = self.grid.counts();
        info!(
            event = "population_metrics",
            tick = tick,
            total_population = counts.total(),
            vines = counts.vines,
            migrators = counts.migrators,
            colonies = counts.colonies,
            vine_spawns = self.totals.vine_spawns,
            migrator_moves = self.totals.migrator_moves,
            migrator_clones = self.totals.migrator_clones,
            colony_spawns = self.totals.colony_spawns,
            colony_renewals = self.totals.colony_renewals,
            expirations = self.totals.expirations,
            draw_meter = self.meter.level(),
            "Population metrics snapshot"
        );
    }

    /// RGBA grid texture, one pixel per cell
    pub fn texture_bytes(&self) -> Vec<u8> {
        self.grid.texture_bytes()
    }

    pub fn snapshot(&self) -> FoodChainSnapshot {
        FoodChainSnapshot {
            tick: self.clock.tick_count(),
            columns: self.grid.columns,
            rows: self.grid.rows,
            cells: self.grid.views(&self.config.lifecycle),
            counts: self.grid.counts(),
            draw_meter: self.meter.level(),
            draw_meter_max: self.meter.max(),
            brush: self.brush.selected,
            brush_weights: self.brush.weights,
        }
    }
}
