/// Tilt and objective rules: truth-table driven.
///
/// Pure functions on sensor samples and tiles. They decide "what is
/// legal" without performing the action; `sim::step` applies them.
///
/// ## Tilt → Direction (A)
///
/// Raw accelerometer readings are in g and are scaled by `GRAVITY` first.
/// All comparisons below are on the scaled values.
///
/// ┌──────────────────────────────┬──────────────┐
/// │ Condition (priority order)    │ Result       │
/// ├──────────────────────────────┼──────────────┤
/// │ |x| ≤ 1 and |y| ≤ 1           │ None (flat)  │
/// │ |x| > |y|, x > 0              │ West         │
/// │ |x| > |y|, x < 0              │ East         │
/// │ |x| ≤ |y|, y > 0              │ South        │
/// │ |x| ≤ |y|, y < 0              │ North        │
/// └──────────────────────────────┴──────────────┘
///
/// The comparison is strict, so |x| == |y| resolves on the vertical axis.
/// Signs follow the sensor's mounting: tipping the left edge down reads +x.
///
/// ## Step (B)
///
/// ┌──────────────────────────────┬──────────────┐
/// │ Condition                     │ Allow?       │
/// ├──────────────────────────────┼──────────────┤
/// │ here kind is Ice or Flower    │ DENY         │
/// │ here passage flag (dir) false │ DENY (wall)  │
/// │ neighbor off the grid         │ DENY         │
/// │ Otherwise                     │ ALLOW        │
/// └──────────────────────────────┴──────────────┘
///
/// ## Objectives (C)
///
/// ┌──────────────────────────────┬──────────────────────────┐
/// │ Ice, target unset             │ target = sample + 2.0 °C │
/// │ Ice, sample ≥ target          │ melt → Walkable          │
/// │ Flower, light ≥ 4000          │ bloom → Bloomed          │
/// └──────────────────────────────┴──────────────────────────┘

use super::grid::{Cell, Grid};
use super::tile::Direction;

/// Standard gravity, m/s² per g.
pub const GRAVITY: f32 = 9.8;
/// Scaled tilt at or below this on both axes is treated as flat.
pub const TILT_DEAD_ZONE: f32 = 1.0;
/// White-light count at which a flower bud blooms.
pub const BLOOM_BRIGHTNESS: u16 = 4000;
/// Warming above the first sample needed to melt ice, °C.
pub const MELT_DELTA_C: f32 = 2.0;

/// Accelerometer sample scaled to m/s². Only x and y drive movement.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Tilt {
    pub x: f32,
    pub y: f32,
}

impl Tilt {
    pub fn from_g(x_g: f32, y_g: f32) -> Self {
        Tilt { x: x_g * GRAVITY, y: y_g * GRAVITY }
    }

    pub fn is_flat(self) -> bool {
        self.x.abs() <= TILT_DEAD_ZONE && self.y.abs() <= TILT_DEAD_ZONE
    }
}

// ── Tilt ──

/// Dominant tilt direction. See truth table (A).
pub fn tilt_direction(tilt: Tilt) -> Option<Direction> {
    if tilt.is_flat() {
        return None;
    }
    if tilt.x.abs() > tilt.y.abs() {
        if tilt.x > 0.0 { Some(Direction::West) } else { Some(Direction::East) }
    } else if tilt.y > 0.0 {
        Some(Direction::South)
    } else {
        Some(Direction::North)
    }
}

// ── Step ──

/// Where the token ends up if it tries to leave `from` toward `dir`.
/// See truth table (B).
pub fn try_step(grid: &Grid, from: Cell, dir: Direction) -> Option<Cell> {
    let here = grid.tile(from);
    if !here.kind.accepts_tilt() {
        return None;
    }
    if !here.is_open(dir) {
        return None;
    }
    Grid::neighbor(from, dir)
}

// ── Objectives ──

/// Temperature the ice on the current tile must reach.
pub fn melt_target(first_sample_c: f32) -> f32 {
    first_sample_c + MELT_DELTA_C
}

pub fn is_melted(sample_c: f32, target_c: f32) -> bool {
    sample_c >= target_c
}

pub fn is_bloomed(white_light: u16) -> bool {
    white_light >= BLOOM_BRIGHTNESS
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
