/// Authored maze topologies, one per map difficulty.
///
/// Each tile is written as `kind(open sides)`:
///   `o` = Walkable   `f` = Flower   `i` = Ice   `s` = Start
/// and the open sides are `N | E | S | W` (open = the token may pass).
///
/// The tables are immutable. `load_topology` hands out a copy, so blooming
/// or melting during a round never touches the template.

use super::difficulty::Difficulty;
use super::grid::{Cell, Grid, Layout};
use super::tile::{Tile, TileKind, E, N, S, W};

/// Everything a round needs to know about a map besides its tiles.
pub struct LevelDef {
    pub layout: Layout,
    pub start: Cell,
    pub end: Cell,
    pub flowers_to_bloom: u32,
}

const fn o(open: u8) -> Tile { Tile::new(TileKind::Walkable, open) }
const fn f(open: u8) -> Tile { Tile::new(TileKind::Flower, open) }
const fn i(open: u8) -> Tile { Tile::new(TileKind::Ice, open) }
const fn s(open: u8) -> Tile { Tile::new(TileKind::StartTile, open) }

const START: Cell = Cell::new(0, 3);
const END: Cell = Cell::new(5, 4);

static EASY: LevelDef = LevelDef {
    layout: [
        [f(E), o(E | S | W), o(S | W), s(S), i(E | S), o(E | W), o(S | W), f(S)],
        [o(E | S), o(N | W), o(N | S), o(N | S), o(N | E), o(S | W), o(N | S), o(N | S)],
        [o(N | E), o(S | W), o(N | S), o(N | E), o(E | W), o(N | W), o(N | E | S), o(N | W)],
        [o(S), i(N | S), o(N | E), o(E | W), o(E | W), o(E | S | W), o(N | E | W), o(W)],
        [f(N | S), o(N | E | S), o(S | W), f(E), o(S | W), o(N | S), o(E | S), o(S | W)],
        [o(N | E), o(N | W), o(N | E), o(E | W), o(N | W), i(N | E), o(N | W), f(N)],
    ],
    start: START,
    end: END,
    flowers_to_bloom: 5,
};

static MEDIUM: LevelDef = LevelDef {
    layout: [
        [o(E | S), o(E | S | W), f(W), s(S), f(E), o(E | W), o(E | S | W), o(S | W)],
        [o(N | S), i(N | S), o(E | S), o(N | W), o(E | S), o(S | W), f(N), o(N | S)],
        [o(N | S), o(N | S), i(N | E), o(E | W), o(N | W), o(N | E), o(E | W), o(N | S | W)],
        [o(N | S), f(N), o(E | S), o(E | W), o(E | W), o(E | S | W), o(S | W), o(N | S)],
        [i(N | S), o(E | S), f(N | W), o(E | S), o(S | W), o(N | S), f(N), i(N | S)],
        [o(N | E), o(N | E | W), o(E | W), o(N | W), o(N), o(N | E), o(E | W), o(N | W)],
    ],
    start: START,
    end: END,
    flowers_to_bloom: 6,
};

static HARD: LevelDef = LevelDef {
    layout: [
        [o(E | S), i(S | W), f(E), s(S | W), o(E | S), o(E | W), o(E | W), o(S | W)],
        [o(N | S), o(N | S), o(E | S), o(N | W), o(N | E), i(S | W), f(E), o(N | W)],
        [o(N | S), o(N | E), o(N | W), o(E | S), o(E | W), o(N | S | W), o(E | S), o(S | W)],
        [o(N | S), f(E), o(E | W), i(N | W), o(E | S), o(N | W), o(N | S), o(N | S)],
        [i(N | E | S), o(S | W), o(E | S), o(S | W), o(N | E), o(E | W), f(N | W), o(N | S)],
        [f(N), o(N | E), o(N | W), o(N | E), o(E | W), i(E | W), o(E | W), o(N | W)],
    ],
    start: START,
    end: END,
    flowers_to_bloom: 5,
};

static EXTREME: LevelDef = LevelDef {
    layout: [
        [f(S), o(E | S), o(E | S | W), s(W), o(E | S), i(S | W), o(E | S), o(S | W)],
        [o(N | E), i(N | W), o(N | E), o(S | W), o(N | S), o(N | E), i(N | S | W), f(N)],
        [o(E | S), i(S | W), f(S), o(N | S), o(N | E), f(W), o(N | E), o(S | W)],
        [o(N | S), o(N | S), o(N | S), i(N | E), o(E | W), o(S | W), o(E | S), o(N | W)],
        [o(N | S), o(N | E), o(N | W), f(S), o(E | S), o(N | W), o(N | E), o(S | W)],
        [o(N | E), o(E | W), o(E | W), i(N | E | W), o(N | E | W), o(E | W), o(E | W), o(N | W)],
    ],
    start: START,
    end: END,
    flowers_to_bloom: 5,
};

pub fn level_def(level: Difficulty) -> &'static LevelDef {
    match level {
        Difficulty::Easy => &EASY,
        Difficulty::Medium => &MEDIUM,
        Difficulty::Hard => &HARD,
        Difficulty::Extreme => &EXTREME,
    }
}

/// Fresh, mutable copy of a level's grid.
pub fn load_topology(level: Difficulty) -> Grid {
    Grid::from_layout(level_def(level).layout)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use proptest::prelude::*;

    use super::*;
    use crate::domain::tile::Direction;

    fn reachable_from(grid: &Grid, start: Cell) -> HashSet<Cell> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for dir in Direction::ALL {
                if !grid.tile(cell).is_open(dir) { continue; }
                if let Some(next) = Grid::neighbor(cell, dir) {
                    if seen.insert(next) { queue.push_back(next); }
                }
            }
        }
        seen
    }

    #[test]
    fn passages_are_symmetric_on_every_level() {
        for level in Difficulty::ALL {
            let asym = load_topology(level).asymmetries();
            assert!(asym.is_empty(), "{level}: {asym:?}");
        }
    }

    #[test]
    fn flower_count_matches_bloom_target() {
        for level in Difficulty::ALL {
            let def = level_def(level);
            let flowers = load_topology(level).count_kind(TileKind::Flower);
            assert_eq!(flowers as u32, def.flowers_to_bloom, "{level}");
        }
    }

    #[test]
    fn bloom_targets() {
        assert_eq!(level_def(Difficulty::Easy).flowers_to_bloom, 5);
        assert_eq!(level_def(Difficulty::Medium).flowers_to_bloom, 6);
        assert_eq!(level_def(Difficulty::Hard).flowers_to_bloom, 5);
        assert_eq!(level_def(Difficulty::Extreme).flowers_to_bloom, 5);
    }

    #[test]
    fn exactly_one_start_tile_at_start() {
        for level in Difficulty::ALL {
            let grid = load_topology(level);
            assert_eq!(grid.count_kind(TileKind::StartTile), 1, "{level}");
            assert_eq!(grid.kind(level_def(level).start), TileKind::StartTile, "{level}");
        }
    }

    #[test]
    fn every_level_has_some_ice() {
        for level in Difficulty::ALL {
            assert!(load_topology(level).count_kind(TileKind::Ice) >= 3, "{level}");
        }
    }

    #[test]
    fn end_is_plain_and_distinct_from_start() {
        for level in Difficulty::ALL {
            let def = level_def(level);
            assert_ne!(def.start, def.end);
            assert_eq!(load_topology(level).kind(def.end), TileKind::Walkable, "{level}");
        }
    }

    #[test]
    fn whole_maze_reachable_from_start() {
        for level in Difficulty::ALL {
            let grid = load_topology(level);
            let seen = reachable_from(&grid, level_def(level).start);
            assert_eq!(seen.len(), Grid::cells().count(), "{level}");
        }
    }

    #[test]
    fn mutating_a_copy_leaves_template_alone() {
        let mut grid = load_topology(Difficulty::Easy);
        let flower = Cell::new(0, 0);
        assert_eq!(grid.kind(flower), TileKind::Flower);
        grid.set_kind(flower, TileKind::Bloomed);
        assert_eq!(load_topology(Difficulty::Easy).kind(flower), TileKind::Flower);
    }

    proptest! {
        #[test]
        fn open_side_has_open_neighbor(
            level in prop::sample::select(Difficulty::ALL.to_vec()),
            row in 0..crate::domain::grid::ROWS,
            col in 0..crate::domain::grid::COLS,
            dir in prop::sample::select(Direction::ALL.to_vec()),
        ) {
            let grid = load_topology(level);
            let cell = Cell::new(row, col);
            let open = grid.tile(cell).is_open(dir);
            match Grid::neighbor(cell, dir) {
                Some(n) => prop_assert_eq!(open, grid.tile(n).is_open(dir.opposite())),
                None => prop_assert!(!open),
            }
        }
    }

    #[test]
    fn levels_differ() {
        let grids: Vec<Grid> = Difficulty::ALL.iter().map(|&l| load_topology(l)).collect();
        for a in 0..grids.len() {
            for b in (a + 1)..grids.len() {
                assert_ne!(grids[a], grids[b]);
            }
        }
    }
}
