//! Bounded 2D grid of automaton cells.

use eco_core::{Cell, ContentType, Direction, Lifecycle, Position, Species};
use serde::{Deserialize, Serialize};

/// A fixed-size grid. Reads outside it return `Invalid`, writes are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub columns: i32,
    pub rows: i32,
    cells: Vec<Cell>,
}

/// Per-species population of a grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCounts {
    pub vines: usize,
    pub migrators: usize,
    pub colonies: usize,
}

impl SpeciesCounts {
    pub fn total(&self) -> usize {
        self.vines + self.migrators + self.colonies
    }
}

/// Renderer view of one occupied or empty cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub x: i32,
    pub y: i32,
    pub content: ContentType,
    /// Lifetime mapped into 0..=1
    pub lifetime: f32,
    pub aux: u8,
}

impl Grid {
    pub fn new(columns: i32, rows: i32) -> Self {
        let size = (columns.max(0) * rows.max(0)) as usize;
        Self {
            columns,
            rows,
            cells: vec![Cell::empty(); size],
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.in_bounds(self.columns, self.rows)
    }

    /// Get cell at position, `None` outside the grid
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells.get(self.pos_to_index(pos))
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        let index = self.pos_to_index(pos);
        self.cells.get_mut(index)
    }

    /// Content at position, `Invalid` outside the grid
    pub fn content(&self, pos: Position) -> ContentType {
        self.get(pos)
            .map(|cell| cell.content_type())
            .unwrap_or(ContentType::Invalid)
    }

    /// Set cell at position. Returns false (and does nothing) outside the grid.
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.get_mut(pos) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Place a newborn entity, overwriting whatever was there
    pub fn spawn(&mut self, pos: Position, species: Species) -> bool {
        let cell = Cell::newborn(species, pos.x, self.columns);
        self.set(pos, cell)
    }

    pub fn clear(&mut self, pos: Position) -> bool {
        self.set(pos, Cell::empty())
    }

    /// Contents of the 8-neighborhood, column by column from the left
    pub fn neighbors(&self, pos: Position) -> [(Position, ContentType); 8] {
        Direction::all().map(|dir| {
            let neighbor = pos.offset(dir);
            (neighbor, self.content(neighbor))
        })
    }

    /// Row-major cell index, also used to stagger per-cell cadences
    pub fn pos_to_index(&self, pos: Position) -> usize {
        (pos.y * self.columns + pos.x) as usize
    }

    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.columns;
        let y = (index as i32) / self.columns;
        Position::new(x, y)
    }

    /// Positions column by column: x outer, y inner
    pub fn column_major(&self) -> impl Iterator<Item = Position> {
        let rows = self.rows;
        (0..self.columns).flat_map(move |x| (0..rows).map(move |y| Position::new(x, y)))
    }

    /// Same as [`Grid::column_major`] walked from the bottom-right corner
    pub fn column_major_rev(&self) -> impl Iterator<Item = Position> {
        let rows = self.rows;
        (0..self.columns)
            .rev()
            .flat_map(move |x| (0..rows).rev().map(move |y| Position::new(x, y)))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }

    pub fn counts(&self) -> SpeciesCounts {
        let mut counts = SpeciesCounts::default();
        for cell in &self.cells {
            match cell.species() {
                Some(Species::Vine) => counts.vines += 1,
                Some(Species::Migrator) => counts.migrators += 1,
                Some(Species::Colony) => counts.colonies += 1,
                None => {}
            }
        }
        counts
    }

    /// Occupied cells for rendering
    pub fn views(&self, lifecycle: &Lifecycle) -> Vec<CellView> {
        self.iter()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(pos, cell)| CellView {
                x: pos.x,
                y: pos.y,
                content: cell.content_type(),
                lifetime: lifecycle.normalized(cell.lifetime),
                aux: cell.aux_byte(),
            })
            .collect()
    }

    /// RGBA bytes, row-major: content, lifetime, packed species state, 255
    pub fn texture_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.cells.len() * 4);
        for cell in &self.cells {
            bytes.extend_from_slice(&[
                cell.content_type().as_u8(),
                cell.lifetime,
                cell.aux_byte(),
                255,
            ]);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 8);
        assert_eq!(grid.columns, 10);
        assert_eq!(grid.rows, 8);
        assert_eq!(grid.cells.len(), 80);
        assert_eq!(grid.counts().total(), 0);
    }

    #[test]
    fn test_out_of_bounds_is_invalid() {
        let mut grid = Grid::new(10, 10);
        assert_eq!(grid.content(Position::new(-1, 0)), ContentType::Invalid);
        assert_eq!(grid.content(Position::new(0, 10)), ContentType::Invalid);
        assert!(!grid.spawn(Position::new(10, 3), Species::Vine));
        assert!(grid.get(Position::new(3, -1)).is_none());
        assert_eq!(grid.counts().total(), 0);
        assert_eq!(grid.content(Position::new(9, 9)), ContentType::None);
    }

    #[test]
    fn test_spawn_overwrites() {
        let mut grid = Grid::new(10, 10);
        let pos = Position::new(4, 4);
        assert!(grid.spawn(pos, Species::Colony));
        grid.get_mut(pos).unwrap().lifetime = 50;
        assert!(grid.spawn(pos, Species::Vine));
        assert_eq!(grid.content(pos), ContentType::Vine);
        assert_eq!(grid.get(pos).unwrap().lifetime, 0);
    }

    #[test]
    fn test_neighbors_at_corner() {
        let grid = Grid::new(10, 10);
        let neighbors = grid.neighbors(Position::new(0, 0));
        assert_eq!(neighbors.len(), 8);
        let invalid = neighbors
            .iter()
            .filter(|(_, c)| *c == ContentType::Invalid)
            .count();
        assert_eq!(invalid, 5);
    }

    #[test]
    fn test_iteration_orders() {
        let grid = Grid::new(3, 2);
        let forward: Vec<_> = grid.column_major().collect();
        assert_eq!(forward[0], Position::new(0, 0));
        assert_eq!(forward[1], Position::new(0, 1));
        assert_eq!(forward[2], Position::new(1, 0));
        let backward: Vec<_> = grid.column_major_rev().collect();
        assert_eq!(backward[0], Position::new(2, 1));
        assert_eq!(backward.len(), 6);
    }

    #[test]
    fn test_texture_layout() {
        let mut grid = Grid::new(4, 4);
        grid.spawn(Position::new(1, 2), Species::Colony);
        let bytes = grid.texture_bytes();
        assert_eq!(bytes.len(), 64);
        let idx = grid.pos_to_index(Position::new(1, 2)) * 4;
        assert_eq!(&bytes[idx..idx + 4], &[3, 0, 1, 255]);
        assert_eq!(&bytes[0..4], &[0, 0, 0, 255]);

        let views = grid.views(&Lifecycle::default());
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].content, ContentType::Colony);
    }
}
