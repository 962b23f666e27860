//! Daily crossword widget: puzzle model, numbering, and play session.
//!
//! The production puzzle feed is out of scope; callers construct puzzles
//! with [`Puzzle::numbered`] (the hub ships one built-in mini).

pub mod puzzle;
pub mod session;

pub use puzzle::{Clue, ClueDirection, ClueSpec, Puzzle, PuzzleCell};
pub use session::{CrosswordSession, SessionProgress};
