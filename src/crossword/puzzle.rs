//! Crossword puzzle data model, numbering, and validation.
//!
//! A puzzle is a square grid of white/black cells plus a clue list. Clue
//! numbers follow crossword convention: start cells are numbered in reading
//! order (left to right, top to bottom), and clues sharing a start cell
//! share its number.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClueDirection {
    Across,
    Down,
}

/// One grid cell. User input lives in the play session, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PuzzleCell {
    pub is_black: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub number: u32,
    pub text: String,
    pub answer: String,
    pub direction: ClueDirection,
    pub start_row: usize,
    pub start_col: usize,
}

impl Clue {
    /// The (row, col) positions this clue's answer covers.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (row, col, dir) = (self.start_row, self.start_col, self.direction);
        self.answer.chars().enumerate().map(move |(i, _)| match dir {
            ClueDirection::Across => (row, col + i),
            ClueDirection::Down => (row + i, col),
        })
    }
}

/// An unnumbered clue, used when constructing puzzles programmatically.
#[derive(Debug, Clone)]
pub struct ClueSpec {
    pub text: String,
    pub answer: String,
    pub direction: ClueDirection,
    pub start_row: usize,
    pub start_col: usize,
}

impl ClueSpec {
    pub fn new(
        text: &str,
        answer: &str,
        direction: ClueDirection,
        start_row: usize,
        start_col: usize,
    ) -> Self {
        Self {
            text: text.to_string(),
            answer: answer.to_uppercase(),
            direction,
            start_row,
            start_col,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub date: String,
    /// Grid side length; the daily minis are 5 or 7.
    pub size: usize,
    pub grid: Vec<Vec<PuzzleCell>>,
    pub clues: Vec<Clue>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub author: Option<String>,
}

impl Puzzle {
    /// Build a numbered puzzle from a white/black pattern (`true` = white)
    /// and unnumbered clues.
    ///
    /// Start cells are numbered in reading order; clues starting on the
    /// same cell share the number, and the numbers are written into the
    /// grid cells.
    pub fn numbered(
        id: &str,
        date: &str,
        size: usize,
        pattern: &[Vec<bool>],
        specs: Vec<ClueSpec>,
    ) -> Self {
        let mut grid: Vec<Vec<PuzzleCell>> = pattern
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&white| PuzzleCell {
                        is_black: !white,
                        number: None,
                    })
                    .collect()
            })
            .collect();

        // Reading-order pass over distinct start cells.
        let mut cell_numbers: BTreeMap<(usize, usize), u32> = BTreeMap::new();
        for spec in &specs {
            cell_numbers.entry((spec.start_row, spec.start_col)).or_insert(0);
        }
        for (next, number) in cell_numbers.values_mut().enumerate() {
            *number = next as u32 + 1;
        }

        let mut clues: Vec<Clue> = specs
            .into_iter()
            .map(|spec| Clue {
                number: cell_numbers[&(spec.start_row, spec.start_col)],
                text: spec.text,
                answer: spec.answer,
                direction: spec.direction,
                start_row: spec.start_row,
                start_col: spec.start_col,
            })
            .collect();
        clues.sort_by_key(|clue| (clue.number, clue.start_row, clue.start_col));

        for (&(row, col), &number) in &cell_numbers {
            if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
                if !cell.is_black {
                    cell.number = Some(number);
                }
            }
        }

        Self {
            id: id.to_string(),
            date: date.to_string(),
            size,
            grid,
            clues,
            title: None,
            author: None,
        }
    }

    /// Re-derive grid numbers from the clue list: every number is cleared,
    /// then each clue's start cell receives its number (the smallest wins
    /// when clues disagree). Black cells are never numbered.
    pub fn renumber(&mut self) {
        for row in &mut self.grid {
            for cell in row {
                cell.number = None;
            }
        }

        let mut sorted: Vec<&Clue> = self.clues.iter().collect();
        sorted.sort_by_key(|clue| clue.number);

        for clue in sorted {
            let Some(cell) = self
                .grid
                .get_mut(clue.start_row)
                .and_then(|row| row.get_mut(clue.start_col))
            else {
                continue;
            };
            if cell.is_black {
                continue;
            }
            if cell.number.map_or(true, |n| n > clue.number) {
                cell.number = Some(clue.number);
            }
        }
    }

    /// Check numbering and geometry consistency. Returns human-readable
    /// issues; an empty list means the puzzle is well-formed.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for clue in &self.clues {
            let label = format!("clue {} {}", clue.number, direction_name(clue.direction));

            if clue.start_row >= self.size || clue.start_col >= self.size {
                issues.push(format!(
                    "{label}: start ({}, {}) is outside the grid",
                    clue.start_row, clue.start_col
                ));
                continue;
            }

            let start = self.grid[clue.start_row][clue.start_col];
            if start.is_black {
                issues.push(format!(
                    "{label}: start ({}, {}) is a black cell",
                    clue.start_row, clue.start_col
                ));
                continue;
            }

            if start.number != Some(clue.number) {
                match start.number {
                    Some(n) => issues.push(format!(
                        "{label}: start cell is numbered {n}, expected {}",
                        clue.number
                    )),
                    None => issues.push(format!("{label}: start cell has no number")),
                }
            }

            for (row, col) in clue.cells() {
                if row >= self.size || col >= self.size {
                    issues.push(format!("{label}: answer extends beyond the grid"));
                    break;
                }
                if self.grid[row][col].is_black {
                    issues.push(format!(
                        "{label}: answer passes through the black cell at ({row}, {col})"
                    ));
                    break;
                }
            }
        }

        issues
    }

    /// Clues in a direction, in number order.
    pub fn clues_in(&self, direction: ClueDirection) -> impl Iterator<Item = &Clue> {
        self.clues.iter().filter(move |c| c.direction == direction)
    }
}

fn direction_name(direction: ClueDirection) -> &'static str {
    match direction {
        ClueDirection::Across => "across",
        ClueDirection::Down => "down",
    }
}
