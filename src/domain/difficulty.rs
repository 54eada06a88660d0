/// Difficulty levels.
///
/// The same four values are used for two independent choices: which map
/// layout to play, and how fast the tilt tick runs.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        }
    }

    /// Minimum time between tilt evaluations when used as a speed.
    pub fn tick_interval_ms(self) -> u64 {
        match self {
            Difficulty::Easy => 300,
            Difficulty::Medium => 200,
            Difficulty::Hard => 100,
            Difficulty::Extreme => 50,
        }
    }

    /// Next value, wrapping Extreme → Easy.
    pub fn next(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Extreme,
            Difficulty::Extreme => Difficulty::Easy,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_intervals() {
        assert_eq!(Difficulty::Easy.tick_interval_ms(), 300);
        assert_eq!(Difficulty::Medium.tick_interval_ms(), 200);
        assert_eq!(Difficulty::Hard.tick_interval_ms(), 100);
        assert_eq!(Difficulty::Extreme.tick_interval_ms(), 50);
    }

    #[test]
    fn next_cycles_through_all() {
        let mut d = Difficulty::default();
        for expected in Difficulty::ALL.iter().cycle().skip(1).take(4) {
            d = d.next();
            assert_eq!(d, *expected);
        }
        assert_eq!(d, Difficulty::Easy);
    }
}
