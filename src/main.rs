/// Entry point: startup, sensor probing, the polling loop, shutdown.

mod config;
mod device;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::KeyCode;
use log::{debug, error, info, warn};

use config::GameConfig;
use device::{Chime, LightSensor, MotionSensor, Selection, SensorError, TemperatureSensor};
use domain::difficulty::Difficulty;
use domain::tile::TileKind;
use sim::event::MazeEvent;
use sim::screen::{Console, Control, Flow, InputEvent, ScreenState};
use sim::session::{MazeSession, MeltTarget};
use sim::step::Peripherals;
use ui::gamepad::GamepadState;
use ui::input::{DoubleTap, InputState};
use ui::renderer::TerminalDisplay;
use ui::sensors::{LightEmulator, ThermoEmulator, TiltEmulator};
use ui::sound::{Mute, SoundEngine};

fn main() -> anyhow::Result<()> {
    let config = GameConfig::load();
    init_logging(&config.log_file);
    info!("maze-time {} starting", env!("CARGO_PKG_VERSION"));

    let mut display = TerminalDisplay::new();
    display.init().context("terminal init failed")?;

    let result = run(&mut display, &config);
    let cleanup = display.cleanup().context("terminal cleanup failed");
    result?;
    cleanup?;

    info!("shutdown");
    println!();
    println!("Thanks for playing Maze Time!");
    Ok(())
}

/// The terminal is in raw mode while running, so logs go to a file.
fn init_logging(path: &Path) {
    match File::create(path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!(
            "Warning: cannot open log file {}: {e}; logging disabled",
            path.display()
        ),
    }
}

fn run(display: &mut TerminalDisplay, config: &GameConfig) -> anyhow::Result<()> {
    let mut kb = InputState::new();
    match kb.enable_release_events() {
        Ok(true) => info!("key release events enabled"),
        Ok(false) => info!("key release events unsupported; using hold timeout"),
        Err(e) => warn!("keyboard enhancement failed: {e}"),
    }

    let result = game_loop(display, config, &mut kb);

    if let Err(e) = kb.disable_release_events() {
        warn!("keyboard enhancement reset failed: {e}");
    }
    result
}

fn probe_sensors(
    tilt: &mut TiltEmulator,
    light: &mut LightEmulator,
    thermo: &mut ThermoEmulator,
) -> Result<(), SensorError> {
    tilt.probe()?;
    light.probe()?;
    thermo.probe()
}

fn game_loop(display: &mut TerminalDisplay, config: &GameConfig, kb: &mut InputState) -> anyhow::Result<()> {
    let frame_sleep = Duration::from_millis(config.frame_sleep_ms);

    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let sound = SoundEngine::new();
    let mute = Mute;
    let chime: &dyn Chime = match sound.as_ref() {
        Some(s) => s,
        None => {
            warn!("no audio output device; chime muted");
            &mute
        }
    };

    let mut tilt = TiltEmulator::new(&config.motion, gp.connected);
    let mut light = LightEmulator::new(&config.light);
    let mut thermo = ThermoEmulator::new(&config.temperature);
    info!("tilt source: {:?}", tilt.source());

    if let Err(e) = probe_sensors(&mut tilt, &mut light, &mut thermo) {
        error!("startup halted: {e}");
        display.show_sensor_missing(&e);
        return halt_inert(display, kb, frame_sleep);
    }

    let epoch = Instant::now();
    let mut last_frame = epoch;
    let mut back_taps = DoubleTap::new();
    let mut console = Console::new();
    console.boot(display);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            info!("interrupted");
            break;
        }

        let now = Instant::now();
        let now_ms = now.duration_since(epoch).as_millis() as u64;

        let inputs = screen_inputs(console.screen(), console.selection(), kb, &gp, &mut back_taps, now);
        for event in inputs {
            if console.handle(event, now_ms, display) == Flow::Shutdown {
                return Ok(());
            }
        }

        // Sensor emulation
        tilt.update_keys(
            kb.any_held(KEYS_LEFT),
            kb.any_held(KEYS_RIGHT),
            kb.any_held(KEYS_UP),
            kb.any_held(KEYS_DOWN),
        );
        let (sx, sy) = gp.stick();
        tilt.update_stick(sx, sy);
        light.set_torch(kb.any_held(KEYS_TORCH) || gp.torch_held());
        thermo.set_warming(kb.any_held(KEYS_WARM) || gp.warm_held());
        thermo.advance(now.duration_since(last_frame));
        last_frame = now;

        let mut hw = Peripherals {
            motion: &mut tilt,
            light: &mut light,
            thermo: &mut thermo,
            display: &mut *display,
            chime,
        };
        let events = console.update(now_ms, &mut hw);

        if console.screen() == ScreenState::Maze {
            process_maze_events(&events, display);
            display.draw_hud(&hud_line(&light, &thermo, console.session()));
        }

        display.present().context("terminal write failed")?;
        std::thread::sleep(frame_sleep);
    }

    Ok(())
}

/// Missing-sensor screen: nothing runs until the process is interrupted.
fn halt_inert(display: &mut TerminalDisplay, kb: &mut InputState, frame_sleep: Duration) -> anyhow::Result<()> {
    loop {
        kb.drain_events();
        if kb.ctrl_c_pressed() {
            return Ok(());
        }
        display.present().context("terminal write failed")?;
        std::thread::sleep(frame_sleep);
    }
}

fn process_maze_events(events: &[MazeEvent], display: &mut TerminalDisplay) {
    for event in events {
        debug!("event: {event:?}");
        if let Some(text) = event.notice() {
            display.draw_notice(&text);
        }
    }
}

fn hud_line(light: &LightEmulator, thermo: &ThermoEmulator, session: Option<&MazeSession>) -> String {
    let target = match session.map(|s| s.melt_target) {
        Some(MeltTarget::Targeting(t)) => format!("{t:.1}°C"),
        _ => "--".to_string(),
    };
    let prompt = match session.map(|s| s.current_kind()) {
        Some(kind) if kind.accepts_tilt() => "tilt to roll",
        Some(TileKind::Ice) => "warm it up [t]",
        Some(TileKind::Flower) => "shine a light [l]",
        _ => "",
    };
    format!(
        "light {:>5}  temp {:>5.1}°C  ice {:<7}  {}",
        light.level(),
        thermo.celsius(),
        target,
        prompt
    )
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_TORCH: &[KeyCode] = &[KeyCode::Char('l'), KeyCode::Char('L')];
const KEYS_WARM: &[KeyCode] = &[KeyCode::Char('t'), KeyCode::Char('T')];
const KEYS_NEXT_LEVEL: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];
const KEYS_NEXT_SPEED: &[KeyCode] = &[KeyCode::Char('v'), KeyCode::Char('V')];
const KEYS_START: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_HOW_TO_PLAY: &[KeyCode] = &[KeyCode::Char('?'), KeyCode::Char('i'), KeyCode::Char('I')];
const KEYS_BACK: &[KeyCode] = &[KeyCode::Char('b'), KeyCode::Char('B'), KeyCode::Backspace];
const KEYS_EXIT: &[KeyCode] = &[KeyCode::Char('x'), KeyCode::Char('X'), KeyCode::Enter];
const KEYS_DIFFICULTY: [char; 4] = ['1', '2', '3', '4'];

/// Translate this iteration's presses into device events for the current screen.
fn screen_inputs(
    screen: ScreenState,
    selection: Selection,
    kb: &InputState,
    gp: &GamepadState,
    back_taps: &mut DoubleTap,
    now: Instant,
) -> Vec<InputEvent> {
    let mut out = Vec::new();
    match screen {
        ScreenState::Start => {
            for (key, d) in KEYS_DIFFICULTY.iter().zip(Difficulty::ALL) {
                if kb.was_pressed(KeyCode::Char(*key)) {
                    out.push(InputEvent::Tap(Control::Difficulty(d)));
                }
            }
            if kb.any_pressed(KEYS_NEXT_LEVEL) || gp.next_level_pressed() {
                out.push(InputEvent::Tap(Control::Level(selection.level.next())));
            }
            if kb.any_pressed(KEYS_NEXT_SPEED) || gp.next_speed_pressed() {
                out.push(InputEvent::Tap(Control::Speed(selection.speed.next())));
            }
            if kb.any_pressed(KEYS_HOW_TO_PLAY) || gp.how_to_play_pressed() {
                out.push(InputEvent::Tap(Control::HowToPlay));
            } else if kb.any_pressed(KEYS_START) || gp.confirm_pressed() {
                out.push(InputEvent::Tap(Control::Start));
            }
        }
        ScreenState::Instructions => {
            if kb.any_pressed(KEYS_BACK) || gp.back_pressed() {
                out.push(InputEvent::Tap(Control::Back));
                if back_taps.tap(now) {
                    out.push(InputEvent::DoubleTap(Control::Back));
                }
            }
        }
        ScreenState::Maze => {}
        ScreenState::End => {
            if kb.any_pressed(KEYS_EXIT) || gp.exit_pressed() {
                out.push(InputEvent::Tap(Control::Exit));
            }
        }
    }
    out
}
