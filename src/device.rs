/// Capability interfaces between the maze core and the device.
///
/// The core only ever talks in grid cells and raw sensor readings. How a
/// cell becomes pixels (or terminal cells), and where a reading comes from,
/// is the host's business.

use std::fmt;

use thiserror::Error;

use crate::domain::difficulty::Difficulty;
use crate::domain::grid::{Cell, Grid};
use crate::domain::tile::TileKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SensorKind {
    Motion,
    Light,
    Temperature,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SensorKind::Motion => "motion sensor",
            SensorKind::Light => "light sensor",
            SensorKind::Temperature => "temperature sensor",
        })
    }
}

/// Startup failure of a peripheral. Fatal: the device halts inert.
#[derive(Debug, Error, PartialEq)]
pub enum SensorError {
    #[error("{sensor} not detected")]
    NotDetected { sensor: SensorKind },
    #[error("{sensor} unreadable: {reason}")]
    Unreadable { sensor: SensorKind, reason: String },
}

/// Raw accelerometer sample, in g. The core uses x and y only.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub trait MotionSensor {
    fn probe(&mut self) -> Result<(), SensorError> {
        Ok(())
    }
    fn read_tilt_acceleration(&mut self) -> Acceleration;
}

pub trait LightSensor {
    fn probe(&mut self) -> Result<(), SensorError> {
        Ok(())
    }
    fn read_white_light(&mut self) -> u16;
}

pub trait TemperatureSensor {
    fn probe(&mut self) -> Result<(), SensorError> {
        Ok(())
    }
    /// Degrees Celsius.
    fn read_temperature(&mut self) -> f32;
}

/// Short audible cue. Fire-and-forget.
pub trait Chime {
    fn play_chime(&self);
}

/// Map/speed choice pending on the Start screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Selection {
    pub level: Difficulty,
    pub speed: Difficulty,
}

/// Everything the core asks the display to do.
///
/// Calls are side effects only; the core never reads anything back.
pub trait RenderSurface {
    // ── Maze screen ──
    fn draw_tile_cover(&mut self, cell: Cell);
    fn draw_token(&mut self, cell: Cell);
    fn draw_tile(&mut self, cell: Cell, kind: TileKind);
    fn draw_end_marker(&mut self, cell: Cell);
    fn clear_and_draw_layout(&mut self, grid: &Grid);

    // ── Other screens ──
    fn show_summary(&mut self, elapsed_ms: u64, level: Difficulty, speed: Difficulty);
    fn show_start(&mut self, selection: Selection);
    /// Re-highlight the selection row without redrawing the whole screen.
    fn draw_selection(&mut self, selection: Selection);
    fn show_instructions(&mut self);
}
