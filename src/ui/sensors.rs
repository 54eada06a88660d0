/// Desktop stand-ins for the device's sensors.
///
/// The game loop feeds these from keyboard/gamepad state every iteration;
/// the maze core reads them through the `device` sensor traits exactly as
/// it would read real peripherals.
///
///   Tilt         held arrows / WASD, or the gamepad left stick
///   Light        ambient level, torch level while the torch is held
///   Temperature  first-order model: rises while warming, relaxes to ambient

use std::time::Duration;

use crate::config::{LightConfig, MotionConfig, MotionSource, TemperatureConfig};
use crate::device::{
    Acceleration, LightSensor, MotionSensor, SensorError, SensorKind, TemperatureSensor,
};

// ── Tilt ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TiltSource {
    Keyboard,
    Gamepad,
}

pub struct TiltEmulator {
    /// None when a gamepad was required but none is connected.
    source: Option<TiltSource>,
    key_tilt_g: f32,
    stick_scale_g: f32,
    reading: Acceleration,
}

impl TiltEmulator {
    pub fn new(cfg: &MotionConfig, pad_connected: bool) -> Self {
        let source = match cfg.source {
            MotionSource::Auto if pad_connected => Some(TiltSource::Gamepad),
            MotionSource::Auto | MotionSource::Keyboard => Some(TiltSource::Keyboard),
            MotionSource::Gamepad if pad_connected => Some(TiltSource::Gamepad),
            MotionSource::Gamepad => None,
        };
        TiltEmulator {
            source,
            key_tilt_g: cfg.key_tilt_g,
            stick_scale_g: cfg.stick_scale_g,
            reading: flat(),
        }
    }

    pub fn source(&self) -> Option<TiltSource> {
        self.source
    }

    /// Held direction keys: the device tips toward the pressed side.
    pub fn update_keys(&mut self, left: bool, right: bool, up: bool, down: bool) {
        if self.source != Some(TiltSource::Keyboard) {
            return;
        }
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        // Rolling west reads +x, rolling north reads -y
        self.reading.x = axis(right, left) * self.key_tilt_g;
        self.reading.y = axis(up, down) * self.key_tilt_g;
    }

    /// Stick position, +x right, +y up.
    pub fn update_stick(&mut self, x: f32, y: f32) {
        if self.source != Some(TiltSource::Gamepad) {
            return;
        }
        self.reading.x = -x * self.stick_scale_g;
        self.reading.y = -y * self.stick_scale_g;
    }
}

fn flat() -> Acceleration {
    Acceleration { x: 0.0, y: 0.0, z: 1.0 }
}

impl MotionSensor for TiltEmulator {
    fn probe(&mut self) -> Result<(), SensorError> {
        match self.source {
            Some(_) => Ok(()),
            None => Err(SensorError::NotDetected { sensor: SensorKind::Motion }),
        }
    }

    fn read_tilt_acceleration(&mut self) -> Acceleration {
        self.reading
    }
}

// ── Light ──

pub struct LightEmulator {
    ambient: u16,
    torch: u16,
    torch_on: bool,
}

impl LightEmulator {
    pub fn new(cfg: &LightConfig) -> Self {
        LightEmulator { ambient: cfg.ambient, torch: cfg.torch, torch_on: false }
    }

    pub fn set_torch(&mut self, on: bool) {
        self.torch_on = on;
    }

    pub fn level(&self) -> u16 {
        if self.torch_on { self.torch } else { self.ambient }
    }
}

impl LightSensor for LightEmulator {
    fn probe(&mut self) -> Result<(), SensorError> {
        if self.torch <= self.ambient {
            return Err(SensorError::Unreadable {
                sensor: SensorKind::Light,
                reason: format!("torch ({}) is not brighter than ambient ({})", self.torch, self.ambient),
            });
        }
        Ok(())
    }

    fn read_white_light(&mut self) -> u16 {
        self.level()
    }
}

// ── Temperature ──

/// Operating range of the emulated part, °C.
const THERMO_MIN_C: f32 = -40.0;
const THERMO_MAX_C: f32 = 125.0;

pub struct ThermoEmulator {
    ambient_c: f32,
    warm_rate: f32,
    cool_rate: f32,
    temp_c: f32,
    warming: bool,
}

impl ThermoEmulator {
    pub fn new(cfg: &TemperatureConfig) -> Self {
        ThermoEmulator {
            ambient_c: cfg.ambient_c,
            warm_rate: cfg.warm_rate_c_per_s,
            cool_rate: cfg.cool_rate_c_per_s,
            temp_c: cfg.ambient_c,
            warming: false,
        }
    }

    pub fn set_warming(&mut self, on: bool) {
        self.warming = on;
    }

    /// Integrate the model over `dt`.
    pub fn advance(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        if self.warming {
            self.temp_c = (self.temp_c + self.warm_rate * secs).min(THERMO_MAX_C);
        } else if self.temp_c > self.ambient_c {
            self.temp_c = (self.temp_c - self.cool_rate * secs).max(self.ambient_c);
        } else {
            self.temp_c = (self.temp_c + self.cool_rate * secs).min(self.ambient_c);
        }
    }

    pub fn celsius(&self) -> f32 {
        self.temp_c
    }
}

impl TemperatureSensor for ThermoEmulator {
    fn probe(&mut self) -> Result<(), SensorError> {
        let t = self.ambient_c;
        if !t.is_finite() || !(THERMO_MIN_C..=THERMO_MAX_C).contains(&t) {
            return Err(SensorError::Unreadable {
                sensor: SensorKind::Temperature,
                reason: format!("ambient {t} °C out of range"),
            });
        }
        Ok(())
    }

    fn read_temperature(&mut self) -> f32 {
        self.temp_c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::rules::{tilt_direction, Tilt};
    use crate::domain::tile::Direction;

    fn dir_of(t: &mut TiltEmulator) -> Option<Direction> {
        let a = t.read_tilt_acceleration();
        tilt_direction(Tilt::from_g(a.x, a.y))
    }

    #[test]
    fn keys_roll_toward_pressed_side() {
        let cfg = GameConfig::default();
        let mut t = TiltEmulator::new(&cfg.motion, false);
        assert_eq!(t.source(), Some(TiltSource::Keyboard));

        t.update_keys(true, false, false, false);
        assert_eq!(dir_of(&mut t), Some(Direction::West));
        t.update_keys(false, true, false, false);
        assert_eq!(dir_of(&mut t), Some(Direction::East));
        t.update_keys(false, false, true, false);
        assert_eq!(dir_of(&mut t), Some(Direction::North));
        t.update_keys(false, false, false, true);
        assert_eq!(dir_of(&mut t), Some(Direction::South));
        t.update_keys(false, false, false, false);
        assert_eq!(dir_of(&mut t), None);
    }

    #[test]
    fn stick_rolls_toward_deflection() {
        let mut cfg = GameConfig::default();
        cfg.motion.source = MotionSource::Gamepad;
        let mut t = TiltEmulator::new(&cfg.motion, true);
        t.update_stick(1.0, 0.0);
        assert_eq!(dir_of(&mut t), Some(Direction::East));
        t.update_stick(0.0, 1.0);
        assert_eq!(dir_of(&mut t), Some(Direction::North));
        // Slight nudge stays in the dead zone
        t.update_stick(0.1, 0.1);
        assert_eq!(dir_of(&mut t), None);
        // Keys are ignored when the pad drives tilt
        t.update_keys(true, false, false, false);
        assert_eq!(dir_of(&mut t), None);
    }

    #[test]
    fn gamepad_source_without_pad_is_not_detected() {
        let mut cfg = GameConfig::default();
        cfg.motion.source = MotionSource::Gamepad;
        let mut t = TiltEmulator::new(&cfg.motion, false);
        assert_eq!(t.probe(), Err(SensorError::NotDetected { sensor: SensorKind::Motion }));

        cfg.motion.source = MotionSource::Auto;
        let mut t = TiltEmulator::new(&cfg.motion, false);
        assert!(t.probe().is_ok());
    }

    #[test]
    fn torch_switches_level() {
        let cfg = GameConfig::default();
        let mut l = LightEmulator::new(&cfg.light);
        assert!(l.probe().is_ok());
        assert_eq!(l.read_white_light(), 250);
        l.set_torch(true);
        assert_eq!(l.read_white_light(), 4500);
    }

    #[test]
    fn dim_torch_fails_probe() {
        let mut cfg = GameConfig::default();
        cfg.light.torch = 100;
        let mut l = LightEmulator::new(&cfg.light);
        assert!(matches!(l.probe(), Err(SensorError::Unreadable { sensor: SensorKind::Light, .. })));
    }

    #[test]
    fn warming_then_cooling_back_to_ambient() {
        let cfg = GameConfig::default();
        let mut th = ThermoEmulator::new(&cfg.temperature);
        assert_eq!(th.read_temperature(), 21.0);

        th.set_warming(true);
        th.advance(Duration::from_secs(2));
        assert!((th.read_temperature() - 24.0).abs() < 1e-4);

        th.set_warming(false);
        th.advance(Duration::from_secs(2));
        assert!((th.read_temperature() - 23.0).abs() < 1e-4);
        th.advance(Duration::from_secs(60));
        assert_eq!(th.read_temperature(), 21.0);
    }

    #[test]
    fn out_of_range_ambient_fails_probe() {
        let mut cfg = GameConfig::default();
        cfg.temperature.ambient_c = 400.0;
        let mut th = ThermoEmulator::new(&cfg.temperature);
        assert!(th.probe().is_err());
    }
}
