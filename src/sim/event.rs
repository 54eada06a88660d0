/// Events emitted during a maze tick.
/// The host logs these and shows a one-line notice for the objective
/// ones; the chime and redraws have already happened through the device
/// traits.

use crate::domain::grid::Cell;
use crate::domain::tile::Direction;

#[derive(Clone, Debug, PartialEq)]
pub enum MazeEvent {
    TokenMoved { from: Cell, to: Cell, dir: Direction },
    MoveBlocked { at: Cell, dir: Direction },
    IceTargetSet { at: Cell, target_c: f32 },
    IceMelted { at: Cell },
    FlowerBloomed { at: Cell, bloomed: u32, required: u32 },
    AllFlowersBloomed { end: Cell },
    RoundWon { elapsed_ms: u64 },
}

impl MazeEvent {
    /// Short player-facing notice, for events worth one.
    pub fn notice(&self) -> Option<String> {
        match self {
            MazeEvent::TokenMoved { .. } | MazeEvent::MoveBlocked { .. } => None,
            MazeEvent::IceTargetSet { target_c, .. } => {
                Some(format!("ice! warm it to {target_c:.1}°C"))
            }
            MazeEvent::IceMelted { .. } => Some("the ice melted".to_string()),
            MazeEvent::FlowerBloomed { bloomed, required, .. } => {
                Some(format!("a flower bloomed ({bloomed}/{required})"))
            }
            MazeEvent::AllFlowersBloomed { .. } => {
                Some("all flowers bloomed, head for the end".to_string())
            }
            // The End screen takes over
            MazeEvent::RoundWon { .. } => None,
        }
    }
}
