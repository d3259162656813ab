//! Per-tick passes of the food chain automaton.
//!
//! All passes mutate the single grid buffer in place, so an entity that moves
//! or spawns ahead of the iteration cursor is seen again later in the same
//! pass. Migrators carry a `went` flag for exactly that reason.

use crate::grid::Grid;
use eco_core::{
    Cell, CellState, ColonyState, ContentType, Direction, FoodChainConfig, Position, Species,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Vines act on every eighth tick, staggered by cell index
pub const VINE_CADENCE: u64 = 8;
pub const MIGRATOR_CADENCE: u64 = 15;
pub const COLONY_CADENCE: u64 = 32;
/// Adult migrators only age on ticks divisible by this
pub const MIGRATOR_AGING_CADENCE: u64 = 2;
/// Adult final-generation colonies only age on ticks divisible by this
pub const COLONY_AGING_CADENCE: u64 = 64;

/// Wall contacts at which a migrator clones itself
const MIGRATOR_CLONE_CONTACTS: u8 = 3;
/// Wall contacts after which a migrator turns around
const MIGRATOR_TURN_CONTACTS: u8 = 4;
/// Colonies spawned by a single growth step
const COLONY_BROOD: usize = 3;

/// Events counted while running ticks, for metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    pub vine_spawns: u64,
    pub migrator_moves: u64,
    pub migrator_clones: u64,
    pub migrator_turns: u64,
    pub colony_spawns: u64,
    pub colony_renewals: u64,
    pub expirations: u64,
}

impl TickStats {
    pub fn merge(&mut self, other: &TickStats) {
        self.vine_spawns += other.vine_spawns;
        self.migrator_moves += other.migrator_moves;
        self.migrator_clones += other.migrator_clones;
        self.migrator_turns += other.migrator_turns;
        self.colony_spawns += other.colony_spawns;
        self.colony_renewals += other.colony_renewals;
        self.expirations += other.expirations;
    }
}

/// Run one full tick: aggregation, behavior, then aging
pub fn run_tick<R: Rng>(grid: &mut Grid, tick: u64, config: &FoodChainConfig, rng: &mut R) -> TickStats {
    let mut stats = TickStats::default();
    aggregate_chains(grid);
    behave(grid, tick, config, rng, &mut stats);
    age_cells(grid, tick, config, &mut stats);
    stats
}

/// Bottom-to-top pass. The top vine of each chain ends up holding its length.
pub fn aggregate_chains(grid: &mut Grid) {
    for pos in grid.column_major_rev() {
        let mut chain = match grid.get(pos).map(|c| c.state) {
            Some(CellState::Vine(vine)) => vine.chain,
            _ => continue,
        };
        for dx in -1..=1 {
            if let Some(CellState::Vine(lower)) = grid.get(pos.add(dx, 1)).map(|c| c.state) {
                chain = chain.max(lower.chain.saturating_add(1));
            }
        }
        set_chain(grid, pos, chain);
    }
}

/// Top-to-bottom pass dispatching on species
pub fn behave<R: Rng>(
    grid: &mut Grid,
    tick: u64,
    config: &FoodChainConfig,
    rng: &mut R,
    stats: &mut TickStats,
) {
    for pos in grid.column_major() {
        match grid.content(pos) {
            ContentType::Vine => vine_behavior(grid, pos, tick, config, rng, stats),
            ContentType::Migrator => migrator_behavior(grid, pos, tick, config, rng, stats),
            ContentType::Colony => colony_behavior(grid, pos, tick, config, rng, stats),
            ContentType::None | ContentType::Invalid => {}
        }
    }
}

fn set_chain(grid: &mut Grid, pos: Position, chain: u8) {
    if let Some(Cell {
        state: CellState::Vine(vine),
        ..
    }) = grid.get_mut(pos)
    {
        vine.chain = chain;
    }
}

/// Vines grow through empty cells and colonies
fn vine_can_grow_into(content: ContentType) -> bool {
    matches!(content, ContentType::None | ContentType::Colony)
}

/// Migrators walk over empty cells and eat vines
fn migrator_passable(content: ContentType) -> bool {
    matches!(content, ContentType::None | ContentType::Vine)
}

fn vine_behavior<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    tick: u64,
    config: &FoodChainConfig,
    rng: &mut R,
    stats: &mut TickStats,
) {
    let Some(cell) = grid.get(pos).copied() else {
        return;
    };
    let CellState::Vine(vine) = cell.state else {
        return;
    };

    // fill the chain length back down from the top
    let mut chain = vine.chain;
    for dx in -1..=1 {
        if let Some(CellState::Vine(upper)) = grid.get(pos.add(dx, -1)).map(|c| c.state) {
            chain = chain.max(upper.chain);
        }
    }
    set_chain(grid, pos, chain);

    let index = grid.pos_to_index(pos) as u64;
    if !config.lifecycle.is_adult(cell.lifetime) || (tick + index) % VINE_CADENCE != 0 {
        return;
    }

    let row_open = |dy: i32| (-1..=1).all(|dx| vine_can_grow_into(grid.content(pos.add(dx, dy))));
    let up_open = row_open(-1);
    let down_open = row_open(1);
    if !up_open && !down_open {
        return;
    }

    if rng.gen::<f32>() <= config.vine_idle_chance {
        return;
    }

    let mut x = pos.x;
    if rng.gen::<f32>() < config.vine_jitter_chance {
        x += if rng.gen_bool(0.5) { 1 } else { -1 };
    }

    let dy = match (up_open, down_open) {
        (true, false) => -1,
        (false, true) => 1,
        _ => {
            if rng.gen_bool(0.5) {
                -1
            } else {
                1
            }
        }
    };

    let target = Position::new(x, pos.y + dy);
    if vine_can_grow_into(grid.content(target)) && grid.spawn(target, Species::Vine) {
        stats.vine_spawns += 1;
    }
}

fn migrator_behavior<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    tick: u64,
    config: &FoodChainConfig,
    rng: &mut R,
    stats: &mut TickStats,
) {
    if tick % MIGRATOR_CADENCE != 0 {
        return;
    }
    let Some(cell) = grid.get(pos).copied() else {
        return;
    };
    let CellState::Migrator(mut state) = cell.state else {
        return;
    };
    if state.went || !config.lifecycle.is_adult(cell.lifetime) {
        return;
    }

    if state.heading.at_goal_wall(pos.x, grid.columns) {
        let mut lifetime = cell.lifetime;
        let contacts = state.bump_wall_contacts();

        if contacts == MIGRATOR_CLONE_CONTACTS {
            let mut directions = Direction::cardinal();
            directions.shuffle(rng);
            let target = directions
                .iter()
                .map(|dir| pos.offset(*dir))
                .find(|p| migrator_passable(grid.content(*p)));
            if let Some(target) = target {
                grid.spawn(target, Species::Migrator);
                lifetime = config.lifecycle.birth_ticks;
                stats.migrator_clones += 1;
            }
        } else if contacts > MIGRATOR_TURN_CONTACTS {
            state.heading = state.heading.reversed();
            state.wall_contacts = 0;
            stats.migrator_turns += 1;
        }

        state.went = true;
        grid.set(
            pos,
            Cell {
                lifetime,
                state: CellState::Migrator(state),
            },
        );
        return;
    }

    let dx = state.heading.dx();
    let mut sideways = [pos.add(0, 1), pos.add(0, -1)];
    sideways.shuffle(rng);
    let candidates = [pos.add(dx, 0), sideways[0], sideways[1], pos.add(-dx, 0)];

    if let Some(target) = candidates
        .into_iter()
        .find(|p| migrator_passable(grid.content(*p)))
    {
        state.went = true;
        grid.set(
            target,
            Cell {
                lifetime: cell.lifetime,
                state: CellState::Migrator(state),
            },
        );
        grid.clear(pos);
        stats.migrator_moves += 1;
    }
}

/// Adult colonies with a generation left spawn a brood of three into open
/// neighbors, then go exhausted. A final-generation colony is renewed to
/// generation 1 when its colony neighbor count exceeds the cached count from
/// its last check.
fn colony_behavior<R: Rng>(
    grid: &mut Grid,
    pos: Position,
    tick: u64,
    config: &FoodChainConfig,
    rng: &mut R,
    stats: &mut TickStats,
) {
    if tick % COLONY_CADENCE != 0 {
        return;
    }
    let Some(cell) = grid.get(pos).copied() else {
        return;
    };
    let CellState::Colony(mut state) = cell.state else {
        return;
    };
    if !config.lifecycle.is_adult(cell.lifetime) {
        return;
    }

    let mut open = Vec::with_capacity(8);
    let mut same = 0usize;
    for (neighbor, content) in grid.neighbors(pos) {
        match content {
            ContentType::None | ContentType::Migrator => open.push(neighbor),
            ContentType::Colony => same += 1,
            ContentType::Vine | ContentType::Invalid => {}
        }
    }

    // a spent colony gets another round when its clump has grown since the last check
    if state.generation == ColonyState::FINAL_GENERATION
        && state.neighbor_cache > 0
        && same > state.neighbor_cache as usize
    {
        state.generation = 1;
        state.set_neighbor_cache(same);
        grid.set(
            pos,
            Cell {
                lifetime: config.lifecycle.birth_ticks.saturating_add(1),
                state: CellState::Colony(state),
            },
        );
        stats.colony_renewals += 1;
        return;
    }

    if state.generation < ColonyState::FINAL_GENERATION && open.len() >= COLONY_BROOD {
        open.shuffle(rng);
        let child = ColonyState::new(state.generation + 1, 0);
        for target in open.iter().take(COLONY_BROOD) {
            grid.set(
                *target,
                Cell {
                    lifetime: 0,
                    state: CellState::Colony(child),
                },
            );
        }
        same += COLONY_BROOD;
        state.generation = ColonyState::EXHAUSTED_GENERATION;
        stats.colony_spawns += COLONY_BROOD as u64;
    }

    state.set_neighbor_cache(same);
    grid.set(
        pos,
        Cell {
            lifetime: cell.lifetime,
            state: CellState::Colony(state),
        },
    );
}

/// Advance lifetimes and clear expired cells
pub fn age_cells(grid: &mut Grid, tick: u64, config: &FoodChainConfig, stats: &mut TickStats) {
    let lifecycle = config.lifecycle;
    let long_chain = grid.rows as f32 * 0.75;

    for pos in grid.column_major() {
        let Some(cell) = grid.get_mut(pos) else {
            continue;
        };
        let adult = lifecycle.is_adult(cell.lifetime);

        let step = match &mut cell.state {
            CellState::Empty => continue,
            CellState::Vine(vine) => {
                // long chains stop aging
                let ratio = (vine.chain as f32 / long_chain).min(1.0);
                vine.chain = 1;
                (ratio < 0.95 || !adult) as u8
            }
            CellState::Migrator(migrator) => {
                migrator.went = false;
                if adult {
                    (tick % MIGRATOR_AGING_CADENCE == 0) as u8
                } else {
                    1
                }
            }
            CellState::Colony(colony) => {
                if adult && colony.generation == ColonyState::FINAL_GENERATION {
                    (tick % COLONY_AGING_CADENCE == 0) as u8
                } else {
                    1
                }
            }
        };

        cell.lifetime = cell.lifetime.saturating_add(step).min(lifecycle.max_lifetime);
        if cell.lifetime >= lifecycle.max_lifetime {
            *cell = Cell::empty();
            stats.expirations += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::{Heading, MigratorState, VineState};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn adult(state: CellState) -> Cell {
        Cell { lifetime: 20, state }
    }

    fn chain_at(grid: &Grid, pos: Position) -> u8 {
        match grid.get(pos).map(|c| c.state) {
            Some(CellState::Vine(v)) => v.chain,
            other => panic!("expected vine at {:?}, got {:?}", pos, other),
        }
    }

    #[test]
    fn test_vine_column_chain_lengths() {
        let mut grid = Grid::new(10, 10);
        for y in 2..7 {
            grid.spawn(Position::new(4, y), Species::Vine);
        }
        aggregate_chains(&mut grid);
        assert_eq!(chain_at(&grid, Position::new(4, 2)), 5);
        assert_eq!(chain_at(&grid, Position::new(4, 4)), 3);
        assert_eq!(chain_at(&grid, Position::new(4, 6)), 1);
    }

    #[test]
    fn test_diagonal_chain_counts() {
        let mut grid = Grid::new(10, 10);
        grid.spawn(Position::new(3, 3), Species::Vine);
        grid.spawn(Position::new(4, 4), Species::Vine);
        grid.spawn(Position::new(5, 5), Species::Vine);
        aggregate_chains(&mut grid);
        assert_eq!(chain_at(&grid, Position::new(3, 3)), 3);
    }

    #[test]
    fn test_behavior_fills_chain_down_and_aging_resets() {
        let config = FoodChainConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut grid = Grid::new(10, 10);
        for y in 2..7 {
            grid.spawn(Position::new(4, y), Species::Vine);
        }
        aggregate_chains(&mut grid);
        let mut stats = TickStats::default();
        behave(&mut grid, 1, &config, &mut rng, &mut stats);
        for y in 2..7 {
            assert_eq!(chain_at(&grid, Position::new(4, y)), 5);
        }
        age_cells(&mut grid, 1, &config, &mut stats);
        for y in 2..7 {
            assert_eq!(chain_at(&grid, Position::new(4, y)), 1);
            assert_eq!(grid.get(Position::new(4, y)).unwrap().lifetime, 1);
        }
    }

    #[test]
    fn test_long_chain_pauses_aging() {
        let config = FoodChainConfig::default();
        let mut grid = Grid::new(4, 4);
        let pos = Position::new(1, 1);
        grid.set(pos, adult(CellState::Vine(VineState { chain: 4 })));
        let mut stats = TickStats::default();
        age_cells(&mut grid, 3, &config, &mut stats);
        // 4 / (4 * 0.75) is past the threshold
        assert_eq!(grid.get(pos).unwrap().lifetime, 20);
        age_cells(&mut grid, 4, &config, &mut stats);
        assert_eq!(grid.get(pos).unwrap().lifetime, 21);
    }

    #[test]
    fn test_expiry_clears_cell() {
        let config = FoodChainConfig::default();
        let mut grid = Grid::new(4, 4);
        let pos = Position::new(2, 2);
        grid.set(
            pos,
            Cell {
                lifetime: 254,
                state: CellState::Colony(ColonyState::new(2, 0)),
            },
        );
        let mut stats = TickStats::default();
        age_cells(&mut grid, 1, &config, &mut stats);
        assert_eq!(grid.content(pos), ContentType::None);
        assert_eq!(grid.get(pos).unwrap().lifetime, 0);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_migrator_aging_cadence() {
        let config = FoodChainConfig::default();
        let mut grid = Grid::new(4, 4);
        let pos = Position::new(1, 1);
        let mut state = MigratorState::new(Heading::Right);
        state.went = true;
        grid.set(pos, adult(CellState::Migrator(state)));
        let mut stats = TickStats::default();
        age_cells(&mut grid, 1, &config, &mut stats);
        let cell = *grid.get(pos).unwrap();
        assert_eq!(cell.lifetime, 20);
        assert!(matches!(cell.state, CellState::Migrator(m) if !m.went));
        age_cells(&mut grid, 2, &config, &mut stats);
        assert_eq!(grid.get(pos).unwrap().lifetime, 21);
    }

    #[test]
    fn test_migrator_moves_forward_once_per_tick() {
        let config = FoodChainConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut grid = Grid::new(10, 5);
        grid.set(
            Position::new(2, 2),
            adult(CellState::Migrator(MigratorState::new(Heading::Right))),
        );
        let mut stats = TickStats::default();
        behave(&mut grid, 15, &config, &mut rng, &mut stats);
        assert_eq!(grid.content(Position::new(2, 2)), ContentType::None);
        assert_eq!(grid.content(Position::new(3, 2)), ContentType::Migrator);
        assert_eq!(grid.get(Position::new(3, 2)).unwrap().lifetime, 20);
        assert_eq!(stats.migrator_moves, 1);

        // off-cadence ticks do nothing
        behave(&mut grid, 16, &config, &mut rng, &mut stats);
        assert_eq!(stats.migrator_moves, 1);
    }

    #[test]
    fn test_migrator_eats_vine_and_backs_off_when_boxed() {
        let config = FoodChainConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut grid = Grid::new(10, 3);
        let pos = Position::new(4, 1);
        grid.set(pos, adult(CellState::Migrator(MigratorState::new(Heading::Right))));
        grid.spawn(Position::new(5, 1), Species::Vine);
        let mut stats = TickStats::default();
        behave(&mut grid, 15, &config, &mut rng, &mut stats);
        assert_eq!(grid.content(Position::new(5, 1)), ContentType::Migrator);

        // walled in on three sides: only backward is left
        let mut grid = Grid::new(10, 3);
        grid.set(pos, adult(CellState::Migrator(MigratorState::new(Heading::Right))));
        grid.spawn(Position::new(5, 1), Species::Colony);
        grid.spawn(Position::new(4, 0), Species::Colony);
        grid.spawn(Position::new(4, 2), Species::Colony);
        behave(&mut grid, 15, &config, &mut rng, &mut stats);
        assert_eq!(grid.content(Position::new(3, 1)), ContentType::Migrator);
        assert_eq!(grid.content(pos), ContentType::None);
    }

    #[test]
    fn test_migrator_turns_after_wall_contacts() {
        let config = FoodChainConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut grid = Grid::new(6, 3);
        let pos = Position::new(5, 1);
        let mut state = MigratorState::new(Heading::Right);
        state.wall_contacts = 4;
        grid.set(pos, adult(CellState::Migrator(state)));
        let mut stats = TickStats::default();
        behave(&mut grid, 30, &config, &mut rng, &mut stats);
        match grid.get(pos).unwrap().state {
            CellState::Migrator(m) => {
                assert_eq!(m.heading, Heading::Left);
                assert_eq!(m.wall_contacts, 0);
                assert!(m.went);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(stats.migrator_turns, 1);
    }

    #[test]
    fn test_colony_growth_and_exhaustion() {
        let config = FoodChainConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut grid = Grid::new(7, 7);
        let pos = Position::new(3, 3);
        grid.set(pos, adult(CellState::Colony(ColonyState::new(1, 0))));
        let mut stats = TickStats::default();
        behave(&mut grid, 32, &config, &mut rng, &mut stats);

        let counts = grid.counts();
        assert_eq!(counts.colonies, 4);
        match grid.get(pos).unwrap().state {
            CellState::Colony(c) => {
                assert_eq!(c.generation, ColonyState::EXHAUSTED_GENERATION);
                assert_eq!(c.neighbor_cache, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
        for (p, content) in grid.neighbors(pos) {
            if content == ContentType::Colony {
                let cell = grid.get(p).unwrap();
                assert_eq!(cell.lifetime, 0);
                assert!(matches!(cell.state, CellState::Colony(c) if c.generation == 2));
            }
        }
    }

    #[test]
    fn test_colony_renewal() {
        let config = FoodChainConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut grid = Grid::new(5, 5);
        let pos = Position::new(2, 2);
        grid.set(pos, adult(CellState::Colony(ColonyState::new(3, 1))));
        grid.spawn(Position::new(1, 1), Species::Vine);
        grid.spawn(Position::new(1, 2), Species::Vine);
        grid.spawn(Position::new(3, 3), Species::Colony);
        grid.spawn(Position::new(3, 1), Species::Colony);
        let mut stats = TickStats::default();
        behave(&mut grid, 64, &config, &mut rng, &mut stats);
        let cell = *grid.get(pos).unwrap();
        assert_eq!(cell.lifetime, config.lifecycle.birth_ticks + 1);
        assert_eq!(cell.state, CellState::Colony(ColonyState::new(1, 2)));
        assert_eq!(stats.colony_renewals, 1);
    }

    fn eager_vines() -> FoodChainConfig {
        FoodChainConfig {
            vine_idle_chance: 0.0,
            vine_jitter_chance: 0.0,
            ..Default::default()
        }
    }

    /// Run the behavior pass over ticks `1..=ticks`, returning the tick of each vine spawn
    fn vine_spawn_ticks(grid: &mut Grid, config: &FoodChainConfig, seed: u64, ticks: u64) -> Vec<u64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut spawned_at = Vec::new();
        for tick in 1..=ticks {
            let mut stats = TickStats::default();
            behave(grid, tick, config, &mut rng, &mut stats);
            for _ in 0..stats.vine_spawns {
                spawned_at.push(tick);
            }
        }
        spawned_at
    }

    #[test]
    fn test_interior_vine_spawns_on_its_cadence_tick() {
        let config = eager_vines();
        let mut grid = Grid::new(10, 10);
        let pos = Position::new(5, 5);
        grid.set(pos, adult(CellState::Vine(VineState { chain: 1 })));
        let index = grid.pos_to_index(pos) as u64;
        let expected_tick = (1..=VINE_CADENCE)
            .find(|t| (t + index) % VINE_CADENCE == 0)
            .unwrap();

        let spawned_at = vine_spawn_ticks(&mut grid, &config, 21, VINE_CADENCE);
        assert_eq!(spawned_at, vec![expected_tick]);

        let above = grid.content(Position::new(5, 4));
        let below = grid.content(Position::new(5, 6));
        assert!(
            (above == ContentType::Vine) != (below == ContentType::Vine),
            "exactly one of the cells above and below should hold the new vine"
        );
        assert_eq!(grid.counts().vines, 2);
    }

    #[test]
    fn test_vine_spawns_toward_the_only_open_row() {
        let config = eager_vines();
        let mut grid = Grid::new(10, 10);
        grid.set(Position::new(5, 5), adult(CellState::Vine(VineState { chain: 1 })));
        // one blocked cell closes the whole upper row
        grid.spawn(Position::new(4, 4), Species::Migrator);

        let spawned_at = vine_spawn_ticks(&mut grid, &config, 23, VINE_CADENCE);
        assert_eq!(spawned_at.len(), 1);
        assert_eq!(grid.content(Position::new(5, 6)), ContentType::Vine);
        assert_eq!(grid.content(Position::new(5, 4)), ContentType::None);
    }

    #[test]
    fn test_vine_spawn_overwrites_colony() {
        let config = eager_vines();
        let mut grid = Grid::new(10, 10);
        grid.set(Position::new(5, 5), adult(CellState::Vine(VineState { chain: 1 })));
        grid.spawn(Position::new(6, 4), Species::Migrator);
        grid.spawn(Position::new(5, 6), Species::Colony);

        let spawned_at = vine_spawn_ticks(&mut grid, &config, 29, VINE_CADENCE);
        assert_eq!(spawned_at.len(), 1);
        let cell = *grid.get(Position::new(5, 6)).unwrap();
        assert_eq!(cell.content_type(), ContentType::Vine);
        assert_eq!(cell.lifetime, 0);
    }

    #[test]
    fn test_edge_vine_never_spawns_off_grid() {
        let config = eager_vines();

        // top row with the lower row blocked: the off-grid row above is not open either
        let mut grid = Grid::new(10, 10);
        grid.set(Position::new(5, 0), adult(CellState::Vine(VineState { chain: 1 })));
        grid.spawn(Position::new(5, 1), Species::Migrator);
        let spawned_at = vine_spawn_ticks(&mut grid, &config, 31, 64);
        assert!(spawned_at.is_empty());
        assert_eq!(grid.counts().vines, 1);

        // bottom row with room above only ever grows upward
        let mut grid = Grid::new(10, 10);
        grid.set(Position::new(5, 9), adult(CellState::Vine(VineState { chain: 1 })));
        let spawned_at = vine_spawn_ticks(&mut grid, &config, 37, VINE_CADENCE);
        assert_eq!(spawned_at.len(), 1);
        assert_eq!(grid.content(Position::new(5, 8)), ContentType::Vine);

        // a vine in a corner column sees Invalid on its left in both rows
        let mut grid = Grid::new(10, 10);
        grid.set(Position::new(0, 5), adult(CellState::Vine(VineState { chain: 1 })));
        let spawned_at = vine_spawn_ticks(&mut grid, &config, 41, 64);
        assert!(spawned_at.is_empty());
    }

    #[test]
    fn test_young_colony_does_not_renew_without_cache() {
        let config = FoodChainConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut grid = Grid::new(5, 5);
        let pos = Position::new(2, 2);
        grid.set(pos, adult(CellState::Colony(ColonyState::new(3, 0))));
        grid.spawn(Position::new(3, 3), Species::Colony);
        let mut stats = TickStats::default();
        behave(&mut grid, 32, &config, &mut rng, &mut stats);
        assert_eq!(
            grid.get(pos).unwrap().state,
            CellState::Colony(ColonyState::new(3, 1))
        );
        assert_eq!(stats.colony_renewals, 0);
    }
}
