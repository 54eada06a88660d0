/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Tilt
///   R1 / R2 (held)        →  Torch (light sensor)
///   L1 / L2 (held)        →  Warm (temperature sensor)
///   Start / A             →  Start round
///   Select                →  How to play (Start screen), Exit (End screen)
///   B                     →  Back
///   X / Y                 →  Next map / next speed

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

/// Stick deflection below this is noise and reads as centred.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.15;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    confirm: Vec<Btn>,
    back: Vec<Btn>,
    how_to_play: Vec<Btn>,
    exit: Vec<Btn>,
    torch: Vec<Btn>,
    warm: Vec<Btn>,
    next_level: Vec<Btn>,
    next_speed: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm:     vec![Btn::Start, Btn::A],
            back:        vec![Btn::B],
            how_to_play: vec![Btn::Select],
            exit:        vec![Btn::Select],
            torch:       vec![Btn::R1, Btn::R2],
            warm:        vec![Btn::L1, Btn::L2],
            next_level:  vec![Btn::X],
            next_speed:  vec![Btn::Y],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    // All tracked buttons (indexed by Btn)
    buttons: [BtnState; 10],

    // D-pad
    dpad_up: bool,
    dpad_down: bool,
    dpad_left: bool,
    dpad_right: bool,

    // Left stick, -1.0 ..= 1.0, +y is up
    stick_x: f32,
    stick_y: f32,

    // Action mapping
    action_map: ActionMap,

    pub connected: bool,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

fn parse_list(names: &[String]) -> Vec<Btn> {
    names.iter().filter_map(|s| Btn::from_name(s)).collect()
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    log::warn!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); 10],
            dpad_up: false,
            dpad_down: false,
            dpad_left: false,
            dpad_right: false,
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Lists with no recognised button
    /// names keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn apply(slot: &mut Vec<Btn>, names: &[String]) {
            let parsed = parse_list(names);
            if !parsed.is_empty() { *slot = parsed; }
        }
        let map = &mut self.action_map;
        apply(&mut map.confirm, &cfg.confirm);
        apply(&mut map.back, &cfg.back);
        apply(&mut map.how_to_play, &cfg.how_to_play);
        apply(&mut map.exit, &cfg.exit);
        apply(&mut map.torch, &cfg.torch);
        apply(&mut map.warm, &cfg.warm);
        apply(&mut map.next_level, &cfg.next_level);
        apply(&mut map.next_speed, &cfg.next_speed);
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    self.update_axis(axis, value);
                }
                EventType::Connected => {
                    self.connected = true;
                    log::info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                    log::info!("gamepad disconnected");
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        // D-pad handled separately (not in Btn enum)
        match gilrs_btn {
            Button::DPadUp    => { self.dpad_up = held; return; }
            Button::DPadDown  => { self.dpad_down = held; return; }
            Button::DPadLeft  => { self.dpad_left = held; return; }
            Button::DPadRight => { self.dpad_right = held; return; }
            _ => {}
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            let idx = btn_index(btn);
            if held && !self.buttons[idx].held {
                self.buttons[idx].just_pressed = true;
            }
            self.buttons[idx].held = held;
        }
    }

    #[cfg(feature = "gamepad")]
    fn update_axis(&mut self, axis: Axis, value: f32) {
        let value = if value.abs() < STICK_DEADZONE { 0.0 } else { value };
        match axis {
            Axis::LeftStickX => self.stick_x = value,
            Axis::LeftStickY => self.stick_y = value,
            _ => {}
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].just_pressed)
    }

    fn any_held(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].held)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }
    pub fn back_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.back)
    }
    pub fn how_to_play_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.how_to_play)
    }
    pub fn exit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.exit)
    }
    pub fn next_level_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.next_level)
    }
    pub fn next_speed_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.next_speed)
    }

    // Sensor emulation (continuous, held)
    pub fn torch_held(&self) -> bool {
        self.any_held(&self.action_map.torch)
    }
    pub fn warm_held(&self) -> bool {
        self.any_held(&self.action_map.warm)
    }

    /// Left stick position, +x right, +y up. The d-pad reads as full
    /// deflection and wins over the stick.
    pub fn stick(&self) -> (f32, f32) {
        let dx = (self.dpad_right as i8 - self.dpad_left as i8) as f32;
        let dy = (self.dpad_up as i8 - self.dpad_down as i8) as f32;
        let x = if dx != 0.0 { dx } else { self.stick_x };
        let y = if dy != 0.0 { dy } else { self.stick_y };
        (x, y)
    }

    // ── Internal ──

    fn clear_just_pressed(&mut self) {
        for b in &mut self.buttons { b.just_pressed = false; }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in &mut self.buttons { *b = BtnState::default(); }
        self.dpad_up = false;
        self.dpad_down = false;
        self.dpad_left = false;
        self.dpad_right = false;
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}
