//! Tile-merge puzzle engine (the 4×4 doubling game).
//!
//! A move compacts every line toward the chosen edge and merges equal
//! adjacent pairs once per pair, leading pair first; each merged value is
//! added to the score. Only a move that changes the grid spawns a new tile:
//! a 2 with 90% probability, otherwise a 4, on a uniformly-random empty
//! cell. The game is won once a 2048 tile exists and over when no move can
//! change the grid.

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::types::Direction;

pub const GRID: usize = 4;
pub const WIN_TILE: u32 = 2048;

#[derive(Debug, Clone)]
pub struct MergeGame {
    /// Tile values, 0 = empty.
    grid: [[u32; GRID]; GRID],
    score: u32,
    won: bool,
    game_over: bool,
    rng: SimpleRng,
}

impl MergeGame {
    /// A fresh grid with two spawned tiles.
    pub fn new(seed: u32) -> Self {
        let mut game = Self {
            grid: [[0; GRID]; GRID],
            score: 0,
            won: false,
            game_over: false,
            rng: SimpleRng::new(seed),
        };
        game.spawn_tile();
        game.spawn_tile();
        game
    }

    pub fn grid(&self) -> &[[u32; GRID]; GRID] {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.rng.state());
    }

    /// Apply a move. Returns true when the grid changed (and a tile was
    /// spawned); a no-op move returns false and spawns nothing.
    pub fn shift(&mut self, dir: Direction) -> bool {
        if self.game_over {
            return false;
        }

        let mut next = [[0u32; GRID]; GRID];
        let mut gained = 0u32;

        for lane in 0..GRID {
            let mut line: ArrayVec<u32, GRID> = ArrayVec::new();
            for step in 0..GRID {
                let value = match dir {
                    Direction::Left => self.grid[lane][step],
                    Direction::Right => self.grid[lane][GRID - 1 - step],
                    Direction::Up => self.grid[step][lane],
                    Direction::Down => self.grid[GRID - 1 - step][lane],
                };
                if value != 0 {
                    line.push(value);
                }
            }

            let (merged, line_score) = merge_line(&line);
            gained += line_score;

            for (idx, value) in merged.iter().enumerate() {
                match dir {
                    Direction::Left => next[lane][idx] = *value,
                    Direction::Right => next[lane][GRID - 1 - idx] = *value,
                    Direction::Up => next[idx][lane] = *value,
                    Direction::Down => next[GRID - 1 - idx][lane] = *value,
                }
            }
        }

        if next == self.grid {
            return false;
        }

        self.grid = next;
        self.score += gained;
        self.won = self.won || self.grid.iter().flatten().any(|&v| v >= WIN_TILE);
        self.spawn_tile();
        if !self.can_move() {
            self.game_over = true;
        }
        true
    }

    /// True while any move could change the grid: an empty cell exists, or
    /// two equal tiles are adjacent.
    pub fn can_move(&self) -> bool {
        for r in 0..GRID {
            for c in 0..GRID {
                let value = self.grid[r][c];
                if value == 0 {
                    return true;
                }
                if c + 1 < GRID && self.grid[r][c + 1] == value {
                    return true;
                }
                if r + 1 < GRID && self.grid[r + 1][c] == value {
                    return true;
                }
            }
        }
        false
    }

    /// Place a 2 (90%) or 4 (10%) on a random empty cell, if any.
    fn spawn_tile(&mut self) {
        let empty: ArrayVec<(usize, usize), { GRID * GRID }> = (0..GRID)
            .flat_map(|r| (0..GRID).map(move |c| (r, c)))
            .filter(|&(r, c)| self.grid[r][c] == 0)
            .collect();
        if empty.is_empty() {
            return;
        }
        let (r, c) = empty[self.rng.next_range(empty.len() as u32) as usize];
        self.grid[r][c] = if self.rng.chance(9, 10) { 2 } else { 4 };
    }

    #[cfg(test)]
    pub fn set_grid(&mut self, grid: [[u32; GRID]; GRID]) {
        self.grid = grid;
    }
}

/// Merge one compacted line: equal adjacent pairs combine once, leading
/// pair first, and each merged value is returned as score.
fn merge_line(line: &[u32]) -> (ArrayVec<u32, GRID>, u32) {
    let mut merged: ArrayVec<u32, GRID> = ArrayVec::new();
    let mut score = 0u32;
    let mut i = 0;
    while i < line.len() {
        if i + 1 < line.len() && line[i] == line[i + 1] {
            let value = line[i] * 2;
            merged.push(value);
            score += value;
            i += 2;
        } else {
            merged.push(line[i]);
            i += 1;
        }
    }
    (merged, score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_game() -> MergeGame {
        let mut game = MergeGame::new(1);
        game.set_grid([[0; GRID]; GRID]);
        game
    }

    #[test]
    fn new_game_has_two_tiles() {
        let game = MergeGame::new(42);
        let tiles = game.grid().iter().flatten().filter(|&&v| v != 0).count();
        assert_eq!(tiles, 2);
        assert!(game
            .grid()
            .iter()
            .flatten()
            .all(|&v| v == 0 || v == 2 || v == 4));
    }

    #[test]
    fn merge_line_pairs_once() {
        let (line, score) = merge_line(&[2, 2, 2, 2]);
        assert_eq!(line.as_slice(), &[4, 4]);
        assert_eq!(score, 8);
    }

    #[test]
    fn merge_line_leading_pair_wins() {
        let (line, score) = merge_line(&[4, 2, 2]);
        assert_eq!(line.as_slice(), &[4, 4]);
        assert_eq!(score, 4);

        let (line, score) = merge_line(&[2, 2, 4]);
        assert_eq!(line.as_slice(), &[4, 4]);
        assert_eq!(score, 4);
    }

    #[test]
    fn merged_tiles_do_not_chain() {
        // 4 4 8 -> 8 8, not 16.
        let (line, score) = merge_line(&[4, 4, 8]);
        assert_eq!(line.as_slice(), &[8, 8]);
        assert_eq!(score, 8);
    }

    #[test]
    fn shift_left_compacts_and_merges() {
        let mut game = empty_game();
        game.set_grid([
            [2, 0, 2, 0],
            [4, 4, 2, 0],
            [0, 0, 0, 2],
            [0, 0, 0, 0],
        ]);

        assert!(game.shift(Direction::Left));
        let grid = game.grid();
        assert_eq!(grid[0][0], 4);
        assert_eq!(&grid[1][..2], &[8, 2]);
        assert_eq!(grid[2][0], 2);
        assert_eq!(game.score(), 4 + 8);
    }

    #[test]
    fn shift_right_targets_the_far_edge() {
        let mut game = empty_game();
        game.set_grid([
            [2, 2, 0, 0],
            [0; 4],
            [0; 4],
            [0; 4],
        ]);

        assert!(game.shift(Direction::Right));
        assert_eq!(game.grid()[0][3], 4);
    }

    #[test]
    fn shift_down_merges_toward_the_bottom() {
        let mut game = empty_game();
        game.set_grid([
            [2, 0, 0, 0],
            [2, 0, 0, 0],
            [2, 0, 0, 0],
            [2, 0, 0, 0],
        ]);

        assert!(game.shift(Direction::Down));
        assert_eq!(game.grid()[3][0], 4);
        assert_eq!(game.grid()[2][0], 4);
        assert_eq!(game.score(), 8);
    }

    #[test]
    fn noop_move_spawns_nothing() {
        let mut game = empty_game();
        game.set_grid([
            [2, 4, 0, 0],
            [0; 4],
            [0; 4],
            [0; 4],
        ]);

        assert!(!game.shift(Direction::Left));
        let tiles = game.grid().iter().flatten().filter(|&&v| v != 0).count();
        assert_eq!(tiles, 2);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn moving_move_spawns_exactly_one_tile() {
        let mut game = empty_game();
        game.set_grid([
            [0, 2, 0, 0],
            [0; 4],
            [0; 4],
            [0; 4],
        ]);

        assert!(game.shift(Direction::Left));
        let tiles = game.grid().iter().flatten().filter(|&&v| v != 0).count();
        assert_eq!(tiles, 2);
    }

    #[test]
    fn win_is_latched_at_2048() {
        let mut game = empty_game();
        game.set_grid([
            [1024, 1024, 0, 0],
            [0; 4],
            [0; 4],
            [0; 4],
        ]);

        assert!(game.shift(Direction::Left));
        assert!(game.won());
    }

    #[test]
    fn full_unmergeable_grid_rejects_every_move() {
        let mut game = empty_game();
        game.set_grid([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 8],
        ]);
        assert!(!game.can_move());

        for dir in [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ] {
            assert!(!game.shift(dir));
        }
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn can_move_with_any_empty_cell() {
        let mut game = empty_game();
        game.set_grid([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 0],
        ]);
        assert!(game.can_move());
    }
}
