/// MazeSession: the complete state of one round.
///
/// ## Grid layers
///
/// The authored topology is never touched. `begin` takes a fresh copy
/// (`topology::load_topology`), and all blooming/melting happens on that
/// copy. The next round starts from the template again.
///
/// ## Clock
///
/// All timestamps are milliseconds on the host's monotonic clock, passed
/// in by the caller. The session never reads a clock itself, so tests can
/// drive time explicitly.

use crate::domain::difficulty::Difficulty;
use crate::domain::grid::{Cell, Grid};
use crate::domain::tile::TileKind;
use crate::domain::topology::{level_def, load_topology};

/// Ice-melt progress on the tile the token currently sits on.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum MeltTarget {
    /// Not yet sampled for this ice tile.
    #[default]
    Unset,
    /// Melts once the thermometer reaches this many °C.
    Targeting(f32),
}

#[derive(Clone, Debug)]
pub struct MazeSession {
    // ── Grid (live copy) ──
    pub grid: Grid,

    // ── Round config ──
    pub level: Difficulty,
    pub speed: Difficulty,
    pub tick_interval_ms: u64,

    // ── Positions ──
    pub token: Cell,
    pub start: Cell,
    pub end: Cell,

    // ── Objectives ──
    pub flowers_to_bloom: u32,
    pub flowers_bloomed: u32,
    pub melt_target: MeltTarget,

    // ── Timing ──
    pub started_at_ms: u64,
    /// Set once, when the round is won.
    pub ended_at_ms: Option<u64>,
    /// Reference point for tick gating.
    pub last_tick_ms: u64,
}

// ── Lifecycle ──

impl MazeSession {
    /// Start a round on `level`'s map at `speed`'s tick interval.
    pub fn begin(level: Difficulty, speed: Difficulty, now_ms: u64) -> Self {
        let def = level_def(level);
        let mut grid = load_topology(level);
        grid.set_kind(def.start, TileKind::StartTile);

        MazeSession {
            grid,
            level,
            speed,
            tick_interval_ms: speed.tick_interval_ms(),
            token: def.start,
            start: def.start,
            end: def.end,
            flowers_to_bloom: def.flowers_to_bloom,
            flowers_bloomed: 0,
            melt_target: MeltTarget::Unset,
            started_at_ms: now_ms,
            ended_at_ms: None,
            last_tick_ms: now_ms,
        }
    }

    pub fn is_won(&self) -> bool {
        self.token == self.end && self.all_flowers_bloomed()
    }

    /// Record the end time. Returns the elapsed time the first time the
    /// round is seen won; None if not won or already completed.
    pub fn complete(&mut self, now_ms: u64) -> Option<u64> {
        if self.ended_at_ms.is_some() || !self.is_won() {
            return None;
        }
        self.ended_at_ms = Some(now_ms);
        Some(self.elapsed_ms())
    }

    pub fn is_complete(&self) -> bool {
        self.ended_at_ms.is_some()
    }
}

// ── Queries ──

impl MazeSession {
    #[inline]
    pub fn current_kind(&self) -> TileKind {
        self.grid.kind(self.token)
    }

    /// Has a full tick interval passed since the reference point?
    #[inline]
    pub fn tick_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_tick_ms) >= self.tick_interval_ms
    }

    /// Round time: start → end once complete, otherwise start → last tick.
    pub fn elapsed_ms(&self) -> u64 {
        let until = self.ended_at_ms.unwrap_or(self.last_tick_ms);
        until.saturating_sub(self.started_at_ms)
    }

    pub fn all_flowers_bloomed(&self) -> bool {
        self.flowers_bloomed >= self.flowers_to_bloom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_places_token_on_full_start_cell() {
        let s = MazeSession::begin(Difficulty::Easy, Difficulty::Easy, 1_000);
        assert_eq!(s.token, s.start);
        assert_eq!(s.start, Cell::new(0, 3));
        assert_eq!(s.end, Cell::new(5, 4));
        assert_eq!(s.current_kind(), TileKind::StartTile);
        assert_eq!(s.melt_target, MeltTarget::Unset);
        assert_eq!(s.flowers_bloomed, 0);
        assert_eq!(s.flowers_to_bloom, 5);
        assert_eq!(s.started_at_ms, 1_000);
        assert_eq!(s.ended_at_ms, None);
    }

    #[test]
    fn speed_picks_tick_interval_independently_of_map() {
        let s = MazeSession::begin(Difficulty::Easy, Difficulty::Extreme, 0);
        assert_eq!(s.tick_interval_ms, 50);
        assert_eq!(s.flowers_to_bloom, 5);
        let s = MazeSession::begin(Difficulty::Medium, Difficulty::Easy, 0);
        assert_eq!(s.tick_interval_ms, 300);
        assert_eq!(s.flowers_to_bloom, 6);
    }

    #[test]
    fn tick_due_at_exact_interval() {
        let s = MazeSession::begin(Difficulty::Easy, Difficulty::Hard, 500);
        assert!(!s.tick_due(599));
        assert!(s.tick_due(600));
        assert!(s.tick_due(10_000));
    }

    #[test]
    fn not_won_at_end_without_flowers() {
        let mut s = MazeSession::begin(Difficulty::Easy, Difficulty::Easy, 0);
        s.token = s.end;
        s.flowers_bloomed = 4;
        assert!(!s.is_won());
    }

    #[test]
    fn not_won_with_flowers_away_from_end() {
        let mut s = MazeSession::begin(Difficulty::Easy, Difficulty::Easy, 0);
        s.flowers_bloomed = 5;
        assert_ne!(s.token, s.end);
        assert!(!s.is_won());
    }

    #[test]
    fn won_when_both_hold() {
        let mut s = MazeSession::begin(Difficulty::Easy, Difficulty::Easy, 0);
        s.flowers_bloomed = 5;
        s.token = s.end;
        assert!(s.is_won());
    }

    #[test]
    fn complete_only_once_and_only_when_won() {
        let mut s = MazeSession::begin(Difficulty::Easy, Difficulty::Easy, 1_000);
        assert_eq!(s.complete(2_000), None);
        assert!(!s.is_complete());

        s.flowers_bloomed = 5;
        s.token = s.end;
        assert_eq!(s.complete(61_000), Some(60_000));
        assert_eq!(s.ended_at_ms, Some(61_000));
        assert_eq!(s.complete(99_000), None);
        assert_eq!(s.ended_at_ms, Some(61_000));
    }

    #[test]
    fn rounds_do_not_share_grid_changes() {
        let mut a = MazeSession::begin(Difficulty::Easy, Difficulty::Easy, 0);
        a.grid.set_kind(Cell::new(0, 0), TileKind::Bloomed);
        let b = MazeSession::begin(Difficulty::Easy, Difficulty::Easy, 0);
        assert_eq!(b.grid.kind(Cell::new(0, 0)), TileKind::Flower);
    }
}
