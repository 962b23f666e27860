//! Crossword play session.
//!
//! Holds the user's input grid over a [`Puzzle`], the selected cell and
//! typing direction, and the completion check. Progress round-trips through
//! the [`SaveStore`] keyed by puzzle id, the way the original widget kept a
//! serialized grid per puzzle in browser storage.

use std::time::{Duration, Instant};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::crossword::puzzle::{ClueDirection, Puzzle};
use crate::store::SaveStore;

const COMPLETED_KEY: &str = "crossword/completed";

fn progress_key(puzzle_id: &str) -> String {
    format!("crossword/progress/{puzzle_id}")
}

/// Serialized session progress: one string per grid row (space = empty)
/// plus elapsed play time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub rows: Vec<String>,
    pub elapsed_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CrosswordSession {
    puzzle: Puzzle,
    /// User letters; `' '` marks an empty cell. Black cells stay empty.
    inputs: Vec<Vec<char>>,
    selected: (usize, usize),
    direction: ClueDirection,
    started_at: Option<Instant>,
    banked: Duration,
    completed: bool,
}

impl CrosswordSession {
    pub fn new(puzzle: Puzzle) -> Self {
        let size = puzzle.size;
        let selected = first_white_cell(&puzzle).unwrap_or((0, 0));
        Self {
            puzzle,
            inputs: vec![vec![' '; size]; size],
            selected,
            direction: ClueDirection::Across,
            started_at: None,
            banked: Duration::ZERO,
            completed: false,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn selected(&self) -> (usize, usize) {
        self.selected
    }

    pub fn direction(&self) -> ClueDirection {
        self.direction
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// User letter at (row, col); `' '` when empty.
    pub fn input_at(&self, row: usize, col: usize) -> char {
        self.inputs
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(' ')
    }

    /// Time spent, including restored progress. The clock starts on the
    /// first typed letter.
    pub fn elapsed(&self) -> Duration {
        self.banked
            + self
                .started_at
                .map(|t| t.elapsed())
                .unwrap_or(Duration::ZERO)
    }

    /// Type a letter into a cell. Black cells, out-of-bounds positions, and
    /// non-alphabetic input are ignored; letters are stored uppercased. The
    /// first letter starts the timer, and every write re-checks completion.
    pub fn update_cell(&mut self, row: usize, col: usize, letter: char) {
        if !self.is_white(row, col) || !letter.is_ascii_alphabetic() {
            return;
        }
        self.inputs[row][col] = letter.to_ascii_uppercase();
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        self.check_completion();
    }

    /// Clear a cell (backspace). Completion stays latched once reached.
    pub fn clear_cell(&mut self, row: usize, col: usize) {
        if self.is_white(row, col) {
            self.inputs[row][col] = ' ';
        }
    }

    /// Move the selection by a row/column delta, clamped to the grid and
    /// skipping nothing: black cells can be traversed, matching the arrow
    /// behavior of the original widget.
    pub fn move_selection(&mut self, dr: isize, dc: isize) {
        let size = self.puzzle.size as isize;
        let (row, col) = self.selected;
        let row = (row as isize + dr).clamp(0, size - 1) as usize;
        let col = (col as isize + dc).clamp(0, size - 1) as usize;
        self.selected = (row, col);
    }

    pub fn select(&mut self, row: usize, col: usize) {
        if row < self.puzzle.size && col < self.puzzle.size {
            self.selected = (row, col);
        }
    }

    pub fn toggle_direction(&mut self) {
        self.direction = match self.direction {
            ClueDirection::Across => ClueDirection::Down,
            ClueDirection::Down => ClueDirection::Across,
        };
    }

    /// Type into the selected cell and advance along the typing direction.
    pub fn type_letter(&mut self, letter: char) {
        let (row, col) = self.selected;
        self.update_cell(row, col, letter);
        match self.direction {
            ClueDirection::Across => self.move_selection(0, 1),
            ClueDirection::Down => self.move_selection(1, 0),
        }
    }

    /// Erase the selected cell and step back.
    pub fn backspace(&mut self) {
        let (row, col) = self.selected;
        self.clear_cell(row, col);
        match self.direction {
            ClueDirection::Across => self.move_selection(0, -1),
            ClueDirection::Down => self.move_selection(-1, 0),
        }
    }

    /// True when every clue's answer is matched by the user grid. Once
    /// complete, the state latches and the timer stops.
    pub fn check_completion(&mut self) -> bool {
        if self.completed {
            return true;
        }
        let solved = self.puzzle.clues.iter().all(|clue| {
            clue.answer
                .chars()
                .zip(clue.cells())
                .all(|(expected, (row, col))| self.input_at(row, col) == expected)
        });
        if solved {
            self.completed = true;
            if let Some(started) = self.started_at.take() {
                self.banked += started.elapsed();
            }
        }
        solved
    }

    /// Wipe all input and restart the timer state.
    pub fn reset(&mut self) {
        let size = self.puzzle.size;
        self.inputs = vec![vec![' '; size]; size];
        self.started_at = None;
        self.banked = Duration::ZERO;
        self.completed = false;
    }

    /// Snapshot the session for persistence.
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            rows: self.inputs.iter().map(|row| row.iter().collect()).collect(),
            elapsed_secs: self.elapsed().as_secs(),
        }
    }

    /// Restore from a snapshot. A snapshot whose geometry does not match
    /// the puzzle is ignored.
    pub fn restore(&mut self, progress: &SessionProgress) -> bool {
        let size = self.puzzle.size;
        if progress.rows.len() != size
            || progress.rows.iter().any(|row| row.chars().count() != size)
        {
            return false;
        }
        self.inputs = progress
            .rows
            .iter()
            .map(|row| row.chars().collect())
            .collect();
        self.banked = Duration::from_secs(progress.elapsed_secs);
        self.started_at = None;
        self.check_completion();
        true
    }

    /// Persist progress under this puzzle's id.
    pub fn save_progress(&self, store: &mut SaveStore) -> Result<()> {
        store.set(&progress_key(&self.puzzle.id), &self.progress())
    }

    /// Load saved progress for this puzzle, if any.
    pub fn load_progress(&mut self, store: &SaveStore) -> bool {
        store
            .get::<SessionProgress>(&progress_key(&self.puzzle.id))
            .map(|progress| self.restore(&progress))
            .unwrap_or(false)
    }

    /// Drop saved progress (after completion).
    pub fn clear_progress(&self, store: &mut SaveStore) -> Result<()> {
        store.remove(&progress_key(&self.puzzle.id))
    }

    /// Record this puzzle in the completed list.
    pub fn mark_completed(&self, store: &mut SaveStore) -> Result<()> {
        let mut done: Vec<String> = store.get(COMPLETED_KEY).unwrap_or_default();
        if !done.contains(&self.puzzle.id) {
            done.push(self.puzzle.id.clone());
            store.set(COMPLETED_KEY, &done)?;
        }
        Ok(())
    }

    /// Whether this puzzle was completed in an earlier session.
    pub fn was_completed(&self, store: &SaveStore) -> bool {
        store
            .get::<Vec<String>>(COMPLETED_KEY)
            .map(|done| done.contains(&self.puzzle.id))
            .unwrap_or(false)
    }

    fn is_white(&self, row: usize, col: usize) -> bool {
        self.puzzle
            .grid
            .get(row)
            .and_then(|r| r.get(col))
            .map(|cell| !cell.is_black)
            .unwrap_or(false)
    }
}

fn first_white_cell(puzzle: &Puzzle) -> Option<(usize, usize)> {
    puzzle.grid.iter().enumerate().find_map(|(r, row)| {
        row.iter()
            .position(|cell| !cell.is_black)
            .map(|c| (r, c))
    })
}
