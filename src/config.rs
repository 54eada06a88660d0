/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// Only the desktop host is configurable: where to log, how the emulated
/// sensors behave, and the gamepad mapping. Game rules are constants.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub log_file: PathBuf,
    pub frame_sleep_ms: u64,
    pub motion: MotionConfig,
    pub light: LightConfig,
    pub temperature: TemperatureConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionSource {
    /// Gamepad if one is connected at startup, else keyboard.
    Auto,
    Keyboard,
    Gamepad,
}

#[derive(Clone, Debug)]
pub struct MotionConfig {
    pub source: MotionSource,
    pub key_tilt_g: f32,     // tilt produced by a held direction key
    pub stick_scale_g: f32,  // tilt at full stick deflection
}

#[derive(Clone, Debug)]
pub struct LightConfig {
    pub ambient: u16,
    pub torch: u16,
}

#[derive(Clone, Debug)]
pub struct TemperatureConfig {
    pub ambient_c: f32,
    pub warm_rate_c_per_s: f32,
    pub cool_rate_c_per_s: f32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub back: Vec<String>,
    pub how_to_play: Vec<String>,
    pub exit: Vec<String>,
    pub torch: Vec<String>,
    pub warm: Vec<String>,
    pub next_level: Vec<String>,
    pub next_speed: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    motion: TomlMotion,
    #[serde(default)]
    light: TomlLight,
    #[serde(default)]
    temperature: TomlTemperature,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_frame_sleep")]
    frame_sleep_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlMotion {
    #[serde(default = "default_motion_source")]
    source: MotionSource,
    #[serde(default = "default_key_tilt")]
    key_tilt_g: f32,
    #[serde(default = "default_stick_scale")]
    stick_scale_g: f32,
}

#[derive(Deserialize, Debug)]
struct TomlLight {
    #[serde(default = "default_ambient_light")]
    ambient: u16,
    #[serde(default = "default_torch")]
    torch: u16,
}

#[derive(Deserialize, Debug)]
struct TomlTemperature {
    #[serde(default = "default_ambient_c")]
    ambient_c: f32,
    #[serde(default = "default_warm_rate")]
    warm_rate_c_per_s: f32,
    #[serde(default = "default_cool_rate")]
    cool_rate_c_per_s: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_back")]
    back: Vec<String>,
    #[serde(default = "default_how_to_play")]
    how_to_play: Vec<String>,
    #[serde(default = "default_exit")]
    exit: Vec<String>,
    #[serde(default = "default_torch_buttons")]
    torch: Vec<String>,
    #[serde(default = "default_warm_buttons")]
    warm: Vec<String>,
    #[serde(default = "default_next_level")]
    next_level: Vec<String>,
    #[serde(default = "default_next_speed")]
    next_speed: Vec<String>,
}

// ── Defaults ──

fn default_log_file() -> String { "maze-time.log".into() }
fn default_frame_sleep() -> u64 { 5 }

fn default_motion_source() -> MotionSource { MotionSource::Auto }
fn default_key_tilt() -> f32 { 0.35 }     // 3.4 m/s², well past the dead zone
fn default_stick_scale() -> f32 { 0.6 }

fn default_ambient_light() -> u16 { 250 }  // indoor room
fn default_torch() -> u16 { 4500 }         // phone torch held close

fn default_ambient_c() -> f32 { 21.0 }
fn default_warm_rate() -> f32 { 1.5 }      // hand on the sensor
fn default_cool_rate() -> f32 { 0.5 }

fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_back() -> Vec<String> { vec!["B".into()] }
fn default_how_to_play() -> Vec<String> { vec!["Select".into()] }
fn default_exit() -> Vec<String> { vec!["Select".into()] }
fn default_torch_buttons() -> Vec<String> { vec!["R1".into(), "R2".into()] }
fn default_warm_buttons() -> Vec<String> { vec!["L1".into(), "L2".into()] }
fn default_next_level() -> Vec<String> { vec!["X".into()] }
fn default_next_speed() -> Vec<String> { vec!["Y".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            log_file: default_log_file(),
            frame_sleep_ms: default_frame_sleep(),
        }
    }
}

impl Default for TomlMotion {
    fn default() -> Self {
        TomlMotion {
            source: default_motion_source(),
            key_tilt_g: default_key_tilt(),
            stick_scale_g: default_stick_scale(),
        }
    }
}

impl Default for TomlLight {
    fn default() -> Self {
        TomlLight {
            ambient: default_ambient_light(),
            torch: default_torch(),
        }
    }
}

impl Default for TomlTemperature {
    fn default() -> Self {
        TomlTemperature {
            ambient_c: default_ambient_c(),
            warm_rate_c_per_s: default_warm_rate(),
            cool_rate_c_per_s: default_cool_rate(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            back: default_back(),
            how_to_play: default_how_to_play(),
            exit: default_exit(),
            torch: default_torch_buttons(),
            warm: default_warm_buttons(),
            next_level: default_next_level(),
            next_speed: default_next_speed(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/maze-time, (4) /usr/share/maze-time.
    /// Missing file or missing keys gracefully fall back to defaults.
    ///
    /// Runs before logging is up, so problems go to stderr.
    pub fn load() -> Self {
        GameConfig::load_from(&candidate_dirs())
    }

    /// First readable `config.toml` in `search_dirs`, else defaults.
    fn load_from(search_dirs: &[PathBuf]) -> Self {
        for dir in search_dirs {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    return GameConfig::parse(&text).unwrap_or_else(|e| {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        GameConfig::default()
                    });
                }
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
        GameConfig::default()
    }

    /// Parse a config document. Missing keys take their defaults.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(toml_cfg))
    }

    fn from_toml(t: TomlConfig) -> Self {
        GameConfig {
            // Relative paths land in the working directory
            log_file: PathBuf::from(&t.general.log_file),
            frame_sleep_ms: t.general.frame_sleep_ms,
            motion: MotionConfig {
                source: t.motion.source,
                key_tilt_g: t.motion.key_tilt_g,
                stick_scale_g: t.motion.stick_scale_g,
            },
            light: LightConfig {
                ambient: t.light.ambient,
                torch: t.light.torch,
            },
            temperature: TemperatureConfig {
                ambient_c: t.temperature.ambient_c,
                warm_rate_c_per_s: t.temperature.warm_rate_c_per_s,
                cool_rate_c_per_s: t.temperature.cool_rate_c_per_s,
            },
            gamepad: GamepadConfig {
                confirm: t.gamepad.confirm,
                back: t.gamepad.back,
                how_to_play: t.gamepad.how_to_play,
                exit: t.gamepad.exit,
                torch: t.gamepad.torch,
                warm: t.gamepad.warm,
                next_level: t.gamepad.next_level,
                next_speed: t.gamepad.next_speed,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/maze-time");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/maze-time");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
