//! Read-only view of a falling-block session.
//!
//! Everything a renderer needs after a state transition, with no access to
//! the live engine internals.

use crate::core::pieces::PieceKind;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Board with the active piece overlaid, as color indices (0 = empty).
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    /// Upcoming piece preview.
    pub next: PieceKind,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub running: bool,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.running && !self.game_over
    }
}
