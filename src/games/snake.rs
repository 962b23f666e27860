//! Snake engine.
//!
//! An N×N grid, a segment list with the head first, and a fixed timer that
//! advances the head one cell per tick. Eating food grows the snake and
//! shortens the tick interval; wall or self contact ends the run. Uses the
//! same `Idle → Running → (Paused ⇄ Running) → GameOver` lifecycle as the
//! falling-block engine.

use std::collections::VecDeque;

use crate::rng::SimpleRng;
use crate::types::{Direction, Phase};

pub const MIN_GRID: u8 = 10;
pub const MAX_GRID: u8 = 30;
pub const DEFAULT_GRID: u8 = 20;

pub const MIN_TICK_MS: u32 = 40;
pub const MAX_TICK_MS: u32 = 400;
pub const DEFAULT_TICK_MS: u32 = 120;

/// Tick-interval reduction per food eaten.
pub const SPEEDUP_PER_FOOD_MS: u32 = 4;

/// Grid size and starting speed, clamped to the supported ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnakeConfig {
    pub grid: u8,
    pub tick_ms: u32,
}

impl SnakeConfig {
    pub fn clamped(self) -> Self {
        Self {
            grid: self.grid.clamp(MIN_GRID, MAX_GRID),
            tick_ms: self.tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS),
        }
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            grid: DEFAULT_GRID,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    grid: u8,
    /// Segments as (row, col), head first.
    body: VecDeque<(i8, i8)>,
    dir: Direction,
    food: (i8, i8),
    score: u32,
    phase: Phase,
    tick_ms: u32,
    start_tick_ms: u32,
    rng: SimpleRng,
}

impl SnakeGame {
    pub fn new(config: SnakeConfig, seed: u32) -> Self {
        let config = config.clamped();
        let mut rng = SimpleRng::new(seed);
        let body = starting_body(config.grid);
        let food = random_food(&mut rng, &body, config.grid);
        Self {
            grid: config.grid,
            body,
            dir: Direction::Right,
            food,
            score: 0,
            phase: Phase::Idle,
            tick_ms: config.tick_ms,
            start_tick_ms: config.tick_ms,
            rng,
        }
    }

    pub fn grid(&self) -> u8 {
        self.grid
    }

    pub fn body(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.body.iter().copied()
    }

    pub fn head(&self) -> (i8, i8) {
        *self.body.front().expect("snake always has a head")
    }

    pub fn food(&self) -> (i8, i8) {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current tick interval; shrinks as the snake eats.
    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
    }

    /// Back to idle with the starting body, speed, and a fresh food cell.
    pub fn reset(&mut self) {
        let config = SnakeConfig {
            grid: self.grid,
            tick_ms: self.start_tick_ms,
        };
        *self = Self::new(config, self.rng.state());
    }

    /// Change heading. A reversal onto the snake's own neck is ignored, as
    /// is input outside the running phase.
    pub fn steer(&mut self, dir: Direction) {
        if !self.phase.is_running() || dir == self.dir.opposite() {
            return;
        }
        self.dir = dir;
    }

    /// Advance one cell. Returns true while the run continues.
    pub fn tick(&mut self) -> bool {
        if !self.phase.is_running() {
            return false;
        }

        let (dr, dc) = self.dir.delta();
        let head = self.head();
        let new_head = (head.0 + dr, head.1 + dc);

        let out_of_bounds = new_head.0 < 0
            || new_head.0 >= self.grid as i8
            || new_head.1 < 0
            || new_head.1 >= self.grid as i8;
        if out_of_bounds || self.body.contains(&new_head) {
            self.phase = Phase::GameOver;
            return false;
        }

        self.body.push_front(new_head);

        if new_head == self.food {
            self.score += 1;
            self.tick_ms = self
                .tick_ms
                .saturating_sub(SPEEDUP_PER_FOOD_MS)
                .max(MIN_TICK_MS);
            self.food = random_food(&mut self.rng, &self.body, self.grid);
        } else {
            self.body.pop_back();
        }

        true
    }

    #[cfg(test)]
    pub fn place_food(&mut self, food: (i8, i8)) {
        self.food = food;
    }

    #[cfg(test)]
    pub fn set_body(&mut self, body: &[(i8, i8)]) {
        self.body = body.iter().copied().collect();
    }
}

impl Default for SnakeGame {
    fn default() -> Self {
        Self::new(SnakeConfig::default(), 1)
    }
}

/// Three segments at the grid center, heading right.
fn starting_body(grid: u8) -> VecDeque<(i8, i8)> {
    let c = (grid / 2) as i8;
    VecDeque::from([(c, c), (c, c - 1), (c, c - 2)])
}

/// Uniformly-random cell not covered by the snake.
fn random_food(rng: &mut SimpleRng, body: &VecDeque<(i8, i8)>, grid: u8) -> (i8, i8) {
    loop {
        let cell = (
            rng.next_range(grid as u32) as i8,
            rng.next_range(grid as u32) as i8,
        );
        if !body.contains(&cell) {
            return cell;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_game(seed: u32) -> SnakeGame {
        let mut game = SnakeGame::new(SnakeConfig::default(), seed);
        game.start();
        game
    }

    #[test]
    fn config_is_clamped() {
        let config = SnakeConfig { grid: 99, tick_ms: 5 }.clamped();
        assert_eq!(config.grid, MAX_GRID);
        assert_eq!(config.tick_ms, MIN_TICK_MS);
    }

    #[test]
    fn starts_centered_with_three_segments() {
        let game = SnakeGame::new(SnakeConfig::default(), 1);
        let body: Vec<_> = game.body().collect();
        assert_eq!(body, vec![(10, 10), (10, 9), (10, 8)]);
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn food_never_spawns_on_the_snake() {
        for seed in 1..50 {
            let game = SnakeGame::new(SnakeConfig::default(), seed);
            let body: Vec<_> = game.body().collect();
            assert!(!body.contains(&game.food()));
        }
    }

    #[test]
    fn tick_advances_the_head() {
        let mut game = running_game(1);
        game.place_food((0, 0));
        let head = game.head();
        assert!(game.tick());
        assert_eq!(game.head(), (head.0, head.1 + 1));
        assert_eq!(game.body().count(), 3);
    }

    #[test]
    fn eating_grows_scores_and_speeds_up() {
        let mut game = running_game(1);
        let head = game.head();
        game.place_food((head.0, head.1 + 1));

        assert!(game.tick());
        assert_eq!(game.score(), 1);
        assert_eq!(game.body().count(), 4);
        assert_eq!(game.tick_ms(), DEFAULT_TICK_MS - SPEEDUP_PER_FOOD_MS);
    }

    #[test]
    fn speed_floors_at_minimum() {
        let mut game = running_game(1);
        for _ in 0..100 {
            let head = game.head();
            if head.1 + 1 >= game.grid() as i8 {
                break;
            }
            game.place_food((head.0, head.1 + 1));
            game.tick();
        }
        assert!(game.tick_ms() >= MIN_TICK_MS);
    }

    #[test]
    fn reversal_is_ignored() {
        let mut game = running_game(1);
        game.place_food((0, 0));
        game.steer(Direction::Left); // heading right: ignored
        game.tick();
        assert_eq!(game.head(), (10, 11));

        game.steer(Direction::Up); // allowed
        game.tick();
        assert_eq!(game.head(), (9, 11));
    }

    #[test]
    fn wall_contact_ends_the_run() {
        let mut game = running_game(1);
        game.place_food((0, 0));
        while game.tick() {}
        assert_eq!(game.phase(), Phase::GameOver);
        // The head never left the grid.
        assert_eq!(game.head().1, game.grid() as i8 - 1);
    }

    #[test]
    fn self_contact_ends_the_run() {
        let mut game = running_game(1);
        game.place_food((0, 0));
        // A hook: steering up from (5,4) runs into the body at (4,4).
        game.set_body(&[(5, 4), (4, 4), (4, 5), (5, 5)]);
        game.steer(Direction::Up);
        assert!(!game.tick());
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn paused_game_does_not_move() {
        let mut game = running_game(1);
        game.place_food((0, 0));
        game.toggle_pause();
        let head = game.head();
        assert!(!game.tick());
        assert_eq!(game.head(), head);
    }

    #[test]
    fn reset_restores_speed_and_length() {
        let mut game = running_game(1);
        let head = game.head();
        game.place_food((head.0, head.1 + 1));
        game.tick();
        game.reset();
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.score(), 0);
        assert_eq!(game.body().count(), 3);
        assert_eq!(game.tick_ms(), DEFAULT_TICK_MS);
    }
}
