/// Scripted sensors, a recording display and a counting chime for tests.

use std::cell::Cell as Counter;
use std::collections::VecDeque;

use crate::device::{
    Acceleration, Chime, LightSensor, MotionSensor, RenderSurface, Selection, TemperatureSensor,
};
use crate::domain::difficulty::Difficulty;
use crate::domain::grid::{Cell, Grid};
use crate::domain::tile::{Direction, TileKind};
use super::step::Peripherals;

/// A clear tilt toward `dir`, in g.
pub fn tilt_toward(dir: Direction) -> Acceleration {
    let (x, y) = match dir {
        Direction::West => (0.5, 0.0),
        Direction::East => (-0.5, 0.0),
        Direction::South => (0.0, 0.5),
        Direction::North => (0.0, -0.5),
    };
    Acceleration { x, y, z: 1.0 }
}

/// Always reports the same tilt; counts reads.
#[derive(Default)]
pub struct FixedTilt(pub Acceleration, pub u32);

impl MotionSensor for FixedTilt {
    fn read_tilt_acceleration(&mut self) -> Acceleration {
        self.1 += 1;
        self.0
    }
}

#[derive(Default)]
pub struct FixedLight(pub u16);

impl LightSensor for FixedLight {
    fn read_white_light(&mut self) -> u16 {
        self.0
    }
}

/// Plays queued readings first, then a ramp if set, then repeats the last.
pub struct ScriptedThermo {
    queue: VecDeque<f32>,
    ramp: Option<(f32, f32)>,
    last: f32,
    pub reads: u32,
}

impl ScriptedThermo {
    pub fn new() -> Self {
        ScriptedThermo { queue: VecDeque::new(), ramp: None, last: 21.0, reads: 0 }
    }

    pub fn push<I: IntoIterator<Item = f32>>(&mut self, readings: I) {
        self.queue.extend(readings);
    }

    pub fn ramp(&mut self, from: f32, step: f32) {
        self.ramp = Some((from, step));
    }
}

impl TemperatureSensor for ScriptedThermo {
    fn read_temperature(&mut self) -> f32 {
        self.reads += 1;
        if let Some(v) = self.queue.pop_front() {
            self.last = v;
        } else if let Some((next, step)) = self.ramp {
            self.last = next;
            self.ramp = Some((next + step, step));
        }
        self.last
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Draw {
    Cover(Cell),
    Token(Cell),
    Tile(Cell, TileKind),
    EndMarker(Cell),
    Layout,
    Summary { elapsed_ms: u64, level: Difficulty, speed: Difficulty },
    Start(Selection),
    Selection(Selection),
    Instructions,
}

#[derive(Default)]
pub struct Recorder {
    pub draws: Vec<Draw>,
}

impl Recorder {
    pub fn count(&self, draw: &Draw) -> usize {
        self.draws.iter().filter(|d| *d == draw).count()
    }
}

impl RenderSurface for Recorder {
    fn draw_tile_cover(&mut self, cell: Cell) {
        self.draws.push(Draw::Cover(cell));
    }
    fn draw_token(&mut self, cell: Cell) {
        self.draws.push(Draw::Token(cell));
    }
    fn draw_tile(&mut self, cell: Cell, kind: TileKind) {
        self.draws.push(Draw::Tile(cell, kind));
    }
    fn draw_end_marker(&mut self, cell: Cell) {
        self.draws.push(Draw::EndMarker(cell));
    }
    fn clear_and_draw_layout(&mut self, _grid: &Grid) {
        self.draws.push(Draw::Layout);
    }
    fn show_summary(&mut self, elapsed_ms: u64, level: Difficulty, speed: Difficulty) {
        self.draws.push(Draw::Summary { elapsed_ms, level, speed });
    }
    fn show_start(&mut self, selection: Selection) {
        self.draws.push(Draw::Start(selection));
    }
    fn draw_selection(&mut self, selection: Selection) {
        self.draws.push(Draw::Selection(selection));
    }
    fn show_instructions(&mut self) {
        self.draws.push(Draw::Instructions);
    }
}

#[derive(Default)]
pub struct CountingChime(Counter<u32>);

impl CountingChime {
    pub fn count(&self) -> u32 {
        self.0.get()
    }
}

impl Chime for CountingChime {
    fn play_chime(&self) {
        self.0.set(self.0.get() + 1);
    }
}

/// One of each fake, lent out together as `Peripherals`.
pub struct Rig {
    pub tilt: FixedTilt,
    pub light: FixedLight,
    pub thermo: ScriptedThermo,
    pub display: Recorder,
    pub chime: CountingChime,
}

impl Rig {
    pub fn new() -> Self {
        Rig {
            tilt: FixedTilt::default(),
            light: FixedLight::default(),
            thermo: ScriptedThermo::new(),
            display: Recorder::default(),
            chime: CountingChime::default(),
        }
    }

    pub fn hw(&mut self) -> Peripherals<'_> {
        Peripherals {
            motion: &mut self.tilt,
            light: &mut self.light,
            thermo: &mut self.thermo,
            display: &mut self.display,
            chime: &self.chime,
        }
    }

    pub fn tilt_reads(&self) -> u32 {
        self.tilt.1
    }
}
