/// Screen/session state machine.
///
/// ```text
///            Tap(HowToPlay)
///   Start ──────────────────▶ Instructions
///     ▲  ◀──────────────────      │
///     │     DoubleTap(Back)       │ Tap(Back): no-op
///     │ Tap(Start)
///     ▼
///   Maze ──(round won, checked every update)──▶ End ──Tap(Exit)──▶ shutdown
/// ```
///
/// Level/Speed/Difficulty taps are accepted only on Start and just change
/// the pending selection. Any other event is ignored in any state.

use log::{debug, info, warn};

use crate::device::{RenderSurface, Selection};
use crate::domain::difficulty::Difficulty;
use crate::domain::tile::TileKind;
use super::event::MazeEvent;
use super::session::MazeSession;
use super::step::{step, Peripherals};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScreenState {
    Start,
    Instructions,
    Maze,
    End,
}

/// Selectable options on the device screens.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Control {
    /// Map layout only.
    Level(Difficulty),
    /// Tick speed only.
    Speed(Difficulty),
    /// Map and speed together.
    Difficulty(Difficulty),
    Start,
    HowToPlay,
    Back,
    Exit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    Tap(Control),
    /// Secondary gesture; only leaves Instructions.
    DoubleTap(Control),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Shutdown,
}

pub struct Console {
    screen: ScreenState,
    selection: Selection,
    session: Option<MazeSession>,
}

impl Console {
    pub fn new() -> Self {
        Console {
            screen: ScreenState::Start,
            selection: Selection::default(),
            session: None,
        }
    }

    /// Draw the initial Start screen.
    pub fn boot(&mut self, display: &mut dyn RenderSurface) {
        display.show_start(self.selection);
    }

    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn session(&self) -> Option<&MazeSession> {
        self.session.as_ref()
    }

    /// Apply one input event. Events outside the current screen's accepted
    /// set do nothing.
    pub fn handle(&mut self, event: InputEvent, now_ms: u64, display: &mut dyn RenderSurface) -> Flow {
        match (self.screen, event) {
            (ScreenState::Start, InputEvent::Tap(control)) => match control {
                Control::Level(d) => self.select(display, |s| s.level = d),
                Control::Speed(d) => self.select(display, |s| s.speed = d),
                Control::Difficulty(d) => self.select(display, |s| {
                    s.level = d;
                    s.speed = d;
                }),
                Control::Start => self.start_round(now_ms, display),
                Control::HowToPlay => {
                    self.screen = ScreenState::Instructions;
                    display.show_instructions();
                    info!("screen: instructions");
                }
                Control::Back | Control::Exit => {}
            },
            (ScreenState::Instructions, InputEvent::DoubleTap(Control::Back)) => {
                self.screen = ScreenState::Start;
                display.show_start(self.selection);
                info!("screen: start");
            }
            (ScreenState::End, InputEvent::Tap(Control::Exit)) => {
                info!("exit requested");
                return Flow::Shutdown;
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Run the maze engines for one poll-loop iteration. Only does anything
    /// on the Maze screen; moves to End as soon as the round is won.
    pub fn update(&mut self, now_ms: u64, hw: &mut Peripherals<'_>) -> Vec<MazeEvent> {
        if self.screen != ScreenState::Maze {
            return Vec::new();
        }
        let session = match self.session.as_mut() {
            Some(s) => s,
            None => return Vec::new(),
        };

        let events = step(session, now_ms, hw);
        if session.is_complete() {
            self.screen = ScreenState::End;
            hw.display.show_summary(session.elapsed_ms(), session.level, session.speed);
            info!(
                "screen: end ({} ms, map {}, speed {})",
                session.elapsed_ms(),
                session.level,
                session.speed
            );
        }
        events
    }

    // ── Internal ──

    fn select(&mut self, display: &mut dyn RenderSurface, change: impl FnOnce(&mut Selection)) {
        change(&mut self.selection);
        display.draw_selection(self.selection);
        info!("selected map {}, speed {}", self.selection.level, self.selection.speed);
    }

    fn start_round(&mut self, now_ms: u64, display: &mut dyn RenderSurface) {
        let session = MazeSession::begin(self.selection.level, self.selection.speed, now_ms);
        for gap in session.grid.asymmetries() {
            warn!(
                "map {}: {:?} passage at {} has no matching side",
                session.level, gap.dir, gap.cell
            );
        }
        display.clear_and_draw_layout(&session.grid);
        display.draw_token(session.start);
        info!(
            "round start: map {}, speed {} ({} ms tick), {} of {} flowers to bloom",
            session.level,
            session.speed,
            session.tick_interval_ms,
            session.flowers_to_bloom,
            session.grid.count_kind(TileKind::Flower)
        );
        debug!("layout:\n{}", session.grid);
        self.session = Some(session);
        self.screen = ScreenState::Maze;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Cell;
    use crate::sim::testkit::{Draw, Recorder, Rig};

    fn tap(c: Control) -> InputEvent {
        InputEvent::Tap(c)
    }

    #[test]
    fn boots_on_start_with_easy_selection() {
        let mut console = Console::new();
        let mut rec = Recorder::default();
        console.boot(&mut rec);
        assert_eq!(console.screen(), ScreenState::Start);
        assert_eq!(console.selection(), Selection { level: Difficulty::Easy, speed: Difficulty::Easy });
        assert_eq!(rec.draws, vec![Draw::Start(Selection::default())]);
    }

    #[test]
    fn level_and_speed_are_independent() {
        let mut console = Console::new();
        let mut rec = Recorder::default();
        console.handle(tap(Control::Level(Difficulty::Hard)), 0, &mut rec);
        console.handle(tap(Control::Speed(Difficulty::Medium)), 0, &mut rec);
        let sel = Selection { level: Difficulty::Hard, speed: Difficulty::Medium };
        assert_eq!(console.selection(), sel);
        assert_eq!(console.screen(), ScreenState::Start);
        assert_eq!(rec.draws.last(), Some(&Draw::Selection(sel)));
    }

    #[test]
    fn difficulty_sets_both() {
        let mut console = Console::new();
        let mut rec = Recorder::default();
        console.handle(tap(Control::Difficulty(Difficulty::Extreme)), 0, &mut rec);
        assert_eq!(
            console.selection(),
            Selection { level: Difficulty::Extreme, speed: Difficulty::Extreme }
        );
    }

    #[test]
    fn start_begins_round_with_selection() {
        let mut console = Console::new();
        let mut rec = Recorder::default();
        console.handle(tap(Control::Level(Difficulty::Medium)), 0, &mut rec);
        console.handle(tap(Control::Speed(Difficulty::Hard)), 0, &mut rec);
        rec.draws.clear();

        console.handle(tap(Control::Start), 5_000, &mut rec);
        assert_eq!(console.screen(), ScreenState::Maze);
        let s = console.session().expect("session");
        assert_eq!(s.level, Difficulty::Medium);
        assert_eq!(s.speed, Difficulty::Hard);
        assert_eq!(s.tick_interval_ms, 100);
        assert_eq!(s.started_at_ms, 5_000);
        assert_eq!(rec.draws, vec![Draw::Layout, Draw::Token(Cell::new(0, 3))]);
    }

    #[test]
    fn every_map_starts_symmetric_with_token_on_start() {
        for d in Difficulty::ALL {
            let mut console = Console::new();
            let mut rec = Recorder::default();
            console.handle(tap(Control::Level(d)), 0, &mut rec);
            rec.draws.clear();
            console.handle(tap(Control::Start), 0, &mut rec);

            let s = console.session().expect("session");
            assert!(s.grid.asymmetries().is_empty(), "{d}");
            assert_eq!(s.grid.count_kind(TileKind::Flower) as u32, s.flowers_to_bloom, "{d}");
            assert_eq!(rec.draws, vec![Draw::Layout, Draw::Token(s.start)], "{d}");
        }
    }

    #[test]
    fn instructions_need_double_tap_to_leave() {
        let mut console = Console::new();
        let mut rec = Recorder::default();
        console.handle(tap(Control::HowToPlay), 0, &mut rec);
        assert_eq!(console.screen(), ScreenState::Instructions);

        console.handle(tap(Control::Back), 0, &mut rec);
        assert_eq!(console.screen(), ScreenState::Instructions);
        console.handle(tap(Control::Start), 0, &mut rec);
        assert_eq!(console.screen(), ScreenState::Instructions);

        console.handle(InputEvent::DoubleTap(Control::Back), 0, &mut rec);
        assert_eq!(console.screen(), ScreenState::Start);
        assert_eq!(rec.draws.last(), Some(&Draw::Start(Selection::default())));
    }

    #[test]
    fn selection_ignored_outside_start() {
        let mut console = Console::new();
        let mut rec = Recorder::default();
        console.handle(tap(Control::HowToPlay), 0, &mut rec);
        console.handle(tap(Control::Level(Difficulty::Hard)), 0, &mut rec);
        assert_eq!(console.selection(), Selection::default());

        console.handle(InputEvent::DoubleTap(Control::Back), 0, &mut rec);
        console.handle(tap(Control::Start), 0, &mut rec);
        console.handle(tap(Control::Speed(Difficulty::Hard)), 0, &mut rec);
        assert_eq!(console.selection(), Selection::default());
        assert_eq!(console.session().map(|s| s.speed), Some(Difficulty::Easy));
    }

    #[test]
    fn double_tap_back_elsewhere_is_noop() {
        let mut console = Console::new();
        let mut rec = Recorder::default();
        console.handle(InputEvent::DoubleTap(Control::Back), 0, &mut rec);
        assert_eq!(console.screen(), ScreenState::Start);
        assert!(rec.draws.is_empty());
    }

    #[test]
    fn exit_only_from_end() {
        let mut console = Console::new();
        let mut rec = Recorder::default();
        assert_eq!(console.handle(tap(Control::Exit), 0, &mut rec), Flow::Continue);
        console.handle(tap(Control::Start), 0, &mut rec);
        assert_eq!(console.handle(tap(Control::Exit), 0, &mut rec), Flow::Continue);
        assert_eq!(console.screen(), ScreenState::Maze);
    }

    #[test]
    fn update_is_inert_off_the_maze() {
        let mut console = Console::new();
        let mut rig = Rig::new();
        assert!(console.update(10_000, &mut rig.hw()).is_empty());
        assert_eq!(rig.tilt_reads(), 0);
    }

    #[test]
    fn winning_moves_to_end_and_shows_summary() {
        let mut console = Console::new();
        let mut rig = Rig::new();
        console.handle(tap(Control::Start), 1_000, &mut rig.display);

        // Jump the live round to a won position
        if let Some(s) = console.session.as_mut() {
            s.flowers_bloomed = s.flowers_to_bloom;
            s.token = s.end;
        }
        let events = console.update(73_000, &mut rig.hw());
        assert_eq!(events, vec![MazeEvent::RoundWon { elapsed_ms: 72_000 }]);
        assert_eq!(console.screen(), ScreenState::End);
        assert_eq!(
            rig.display.draws.last(),
            Some(&Draw::Summary {
                elapsed_ms: 72_000,
                level: Difficulty::Easy,
                speed: Difficulty::Easy,
            })
        );

        // End is terminal apart from Exit
        assert!(console.update(80_000, &mut rig.hw()).is_empty());
        assert_eq!(console.handle(tap(Control::Start), 0, &mut rig.display), Flow::Continue);
        assert_eq!(console.screen(), ScreenState::End);
        assert_eq!(console.handle(tap(Control::Exit), 0, &mut rig.display), Flow::Shutdown);
    }
}
