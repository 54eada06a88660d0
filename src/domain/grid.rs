/// The fixed-size maze grid.
///
/// Every difficulty uses the same 6 × 8 shape. Cells are only ever
/// produced by the grid itself (`Grid::cells`, `Grid::neighbor`) or by the
/// authored topology table, so indices are in range by construction.

use std::fmt;

use super::tile::{Direction, Tile, TileKind};

pub const ROWS: usize = 6;
pub const COLS: usize = 8;

/// Authored tile table, row-major.
pub type Layout = [[Tile; COLS]; ROWS];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A passage flag with no matching flag on the other side, or one that
/// opens off the edge of the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Asymmetry {
    pub cell: Cell,
    pub dir: Direction,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    tiles: Layout,
}

impl Grid {
    pub const fn from_layout(tiles: Layout) -> Self {
        Grid { tiles }
    }

    #[inline]
    pub fn tile(&self, cell: Cell) -> Tile {
        self.tiles[cell.row][cell.col]
    }

    #[inline]
    pub fn kind(&self, cell: Cell) -> TileKind {
        self.tile(cell).kind
    }

    #[inline]
    pub fn set_kind(&mut self, cell: Cell, kind: TileKind) {
        self.tiles[cell.row][cell.col].kind = kind;
    }

    /// All cells in row-major order.
    pub fn cells() -> impl Iterator<Item = Cell> {
        (0..ROWS).flat_map(|row| (0..COLS).map(move |col| Cell::new(row, col)))
    }

    /// The adjacent cell in `dir`, or None at the grid edge.
    pub fn neighbor(cell: Cell, dir: Direction) -> Option<Cell> {
        let (dr, dc) = dir.delta();
        let row = cell.row.checked_add_signed(dr)?;
        let col = cell.col.checked_add_signed(dc)?;
        if row < ROWS && col < COLS {
            Some(Cell::new(row, col))
        } else {
            None
        }
    }

    pub fn count_kind(&self, kind: TileKind) -> usize {
        Grid::cells().filter(|&c| self.kind(c) == kind).count()
    }

    /// Every passage flag that disagrees with the neighbor's opposing flag.
    /// Each mismatched pair is reported once, from the side whose flag is open.
    pub fn asymmetries(&self) -> Vec<Asymmetry> {
        let mut found = Vec::new();
        for cell in Grid::cells() {
            let here = self.tile(cell);
            for dir in Direction::ALL {
                if !here.is_open(dir) {
                    continue;
                }
                let matched = Grid::neighbor(cell, dir)
                    .map(|n| self.tile(n).is_open(dir.opposite()))
                    .unwrap_or(false);
                if !matched {
                    found.push(Asymmetry { cell, dir });
                }
            }
        }
        found
    }
}

impl fmt::Display for Grid {
    /// Text diagram: one line per row, `kind glyph` plus open sides.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for col in 0..COLS {
                let t = self.tiles[row][col];
                let west = if t.passages.west { '<' } else { '|' };
                let north = if t.passages.north { '^' } else { '-' };
                let south = if t.passages.south { 'v' } else { '_' };
                let east = if t.passages.east { '>' } else { '|' };
                write!(f, "{west}{north}{}{south}{east} ", t.kind.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
