/// Input state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous tilt / torch / warm while a key is held
///   - Edge-triggered screen controls (only fire on initial press)
///   - Double-tap detection for the Back gesture
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events; long enough
/// to bridge the usual key-repeat delay.
const HOLD_TIMEOUT: Duration = Duration::from_millis(550);

/// Two taps closer than this make a double-tap.
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(400);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for Ctrl-C handling.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Ask the terminal for Release events. Returns whether it agreed.
    pub fn enable_release_events(&mut self) -> io::Result<bool> {
        if terminal::supports_keyboard_enhancement()? {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.honor_release = true;
        }
        Ok(self.honor_release)
    }

    pub fn disable_release_events(&mut self) -> io::Result<()> {
        if self.honor_release {
            execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            self.honor_release = false;
        }
        Ok(())
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per loop iteration.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply(key, Instant::now());
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn apply(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Enhancement not confirmed; rely on timeout-based expiry
            }
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active.get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    /// Convenience: is any of these keys held?
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this iteration? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this iteration has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

/// Turns a stream of taps into single taps and double-taps.
///
/// A tap within `DOUBLE_TAP_WINDOW` of the previous one is a double-tap
/// and consumes both; a third quick tap starts a new pair.
pub struct DoubleTap {
    last: Option<Instant>,
}

impl DoubleTap {
    pub fn new() -> Self {
        DoubleTap { last: None }
    }

    /// Register a tap. True if it completes a double-tap.
    pub fn tap(&mut self, at: Instant) -> bool {
        match self.last {
            Some(prev) if at.saturating_duration_since(prev) <= DOUBLE_TAP_WINDOW => {
                self.last = None;
                true
            }
            _ => {
                self.last = Some(at);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn fresh_press_then_held() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.apply(press(KeyCode::Left), now);
        assert!(input.was_pressed(KeyCode::Left));
        assert!(input.is_held(KeyCode::Left));

        // Repeat while held is not a fresh press
        input.fresh_presses.clear();
        input.apply(press(KeyCode::Left), now);
        assert!(!input.was_pressed(KeyCode::Left));
        assert!(input.any_held(&[KeyCode::Up, KeyCode::Left]));
    }

    #[test]
    fn release_honored_only_with_enhancement() {
        let mut input = InputState::new();
        let now = Instant::now();
        let release = KeyEvent::new_with_kind(KeyCode::Char('l'), KeyModifiers::NONE, KeyEventKind::Release);

        input.apply(press(KeyCode::Char('l')), now);
        input.apply(release, now);
        assert!(input.is_held(KeyCode::Char('l')));

        input.honor_release = true;
        input.apply(release, now);
        assert!(!input.is_held(KeyCode::Char('l')));
    }

    #[test]
    fn ctrl_c_detected() {
        let mut input = InputState::new();
        input.apply(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(input.ctrl_c_pressed());
    }

    #[test]
    fn double_tap_window() {
        let t0 = Instant::now();
        let mut dt = DoubleTap::new();
        assert!(!dt.tap(t0));
        assert!(dt.tap(t0 + Duration::from_millis(300)));
        // Pair consumed; next tap starts over
        assert!(!dt.tap(t0 + Duration::from_millis(350)));

        let mut dt = DoubleTap::new();
        assert!(!dt.tap(t0));
        assert!(!dt.tap(t0 + Duration::from_millis(401)));
        assert!(dt.tap(t0 + Duration::from_millis(700)));
    }
}
