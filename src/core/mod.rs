//! Falling-block engine: pure, deterministic, and testable.
//!
//! No terminal IO, no persistence, no clock: the engine only changes in
//! response to [`GameState::tick`] and [`GameState::apply_action`], both
//! driven by the caller on a single thread, so updates are serialized by
//! construction.
//!
//! - [`board`]: the 10×20 grid with placement legality and line clearing
//! - [`pieces`]: shape matrices and matrix rotation
//! - [`game_state`]: the session state machine
//! - [`scoring`]: score/level/gravity schedules
//! - [`snapshot`]: read-only state export for rendering

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod scoring;
pub mod snapshot;

pub use board::Board;
pub use game_state::GameState;
pub use pieces::{Piece, PieceKind, Shape};
pub use snapshot::GameSnapshot;
