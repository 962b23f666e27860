//! Falling-block session state.
//!
//! Ties the board, the active piece, and the score/level bookkeeping into
//! one state machine:
//!
//! `Idle → Running → (Paused ⇄ Running) → GameOver`
//!
//! Game over is terminal until [`GameState::reset`] returns to `Idle` with
//! a fresh board and zeroed counters. Illegal moves and rotations are
//! silent no-ops; the engine has no error path. All mutation happens in
//! response to [`GameState::tick`] (gravity) or [`GameState::apply_action`]
//! (key input), which the caller serializes on one thread.

use crate::core::pieces::{Piece, PieceKind};
use crate::core::scoring::{drop_interval_ms, level_for, line_score};
use crate::core::snapshot::GameSnapshot;
use crate::core::Board;
use crate::rng::SimpleRng;
use crate::types::{GameAction, Phase, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<Piece>,
    next: PieceKind,
    rng: SimpleRng,
    score: u32,
    lines: u32,
    level: u32,
    phase: Phase,
}

impl GameState {
    /// Create an idle session with the given RNG seed.
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = draw_kind(&mut rng);
        Self {
            board: Board::new(),
            active: None,
            next,
            rng,
            score: 0,
            lines: 0,
            level: level_for(0),
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn running(&self) -> bool {
        self.phase.is_running()
    }

    pub fn game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// Monotonic score; resets only with the session.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Total cleared-line count.
    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Derived from the line count; controls gravity speed.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    /// Preview of the upcoming piece.
    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    /// Current gravity interval in milliseconds, derived from the level.
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level)
    }

    /// Leave idle and spawn the first piece.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Running;
        self.spawn_piece();
    }

    /// Toggle between running and paused; no-op in other phases.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
    }

    /// Return to idle with zeroed session state and an empty board.
    ///
    /// The RNG keeps advancing, so consecutive games see different pieces.
    pub fn reset(&mut self) {
        *self = Self::new(self.rng.state());
    }

    /// Attempt a one-column horizontal move. Rejected moves have no effect.
    pub fn try_move(&mut self, dx: i8) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        if self.board.can_place(&piece.shape, piece.x + dx, piece.y) {
            piece.x += dx;
            true
        } else {
            false
        }
    }

    /// Attempt a clockwise rotation. The rotated copy is validated against
    /// the board and silently discarded on collision or out-of-bounds.
    pub fn try_rotate(&mut self) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let rotated = piece.shape.rotated();
        if self.board.can_place(&rotated, piece.x, piece.y) {
            piece.shape = rotated;
            true
        } else {
            false
        }
    }

    /// Gravity step: descend one row, or lock when blocked.
    ///
    /// Returns true when the session is still running afterwards; the
    /// caller stops scheduling ticks once this reports false.
    pub fn tick(&mut self) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        if !self.descend() {
            self.lock_and_advance();
        }
        self.phase.is_running()
    }

    /// Player-driven drop: same as a gravity step, applied immediately.
    pub fn soft_drop(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        if !self.descend() {
            self.lock_and_advance();
        }
    }

    /// Move the active piece down one row if legal.
    fn descend(&mut self) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        if self.board.can_place(&piece.shape, piece.x, piece.y + 1) {
            piece.y += 1;
            true
        } else {
            false
        }
    }

    /// Lock the active piece, clear lines, update score/level, and spawn
    /// the next piece. A spawn collision ends the session.
    fn lock_and_advance(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        self.board
            .place(&piece.shape, piece.x, piece.y, piece.color());

        let cleared = self.board.clear_lines();
        if cleared > 0 {
            self.score += line_score(cleared);
            self.lines += cleared;
            self.level = level_for(self.lines);
        }

        self.spawn_piece();
    }

    /// Promote the preview piece to active and draw a new preview. Sets
    /// game over when the spawn position is already blocked; the board is
    /// left untouched in that case.
    fn spawn_piece(&mut self) {
        let piece = Piece::spawn(self.next);
        self.next = draw_kind(&mut self.rng);

        if !self.board.can_place(&piece.shape, piece.x, piece.y) {
            self.phase = Phase::GameOver;
        }
        self.active = Some(piece);
    }

    /// Apply a discrete input action. Returns whether anything changed.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.try_move(-1),
            GameAction::MoveRight => self.try_move(1),
            GameAction::MoveDown => {
                if self.phase.is_running() {
                    self.soft_drop();
                    true
                } else {
                    false
                }
            }
            GameAction::Rotate => self.try_rotate(),
            GameAction::Start => match self.phase {
                Phase::Idle => {
                    self.start();
                    true
                }
                Phase::GameOver => {
                    self.reset();
                    self.start();
                    true
                }
                Phase::Paused => {
                    self.toggle_pause();
                    true
                }
                Phase::Running => false,
            },
            GameAction::Pause => {
                let before = self.phase;
                self.toggle_pause();
                self.phase != before
            }
            GameAction::Restart => {
                self.reset();
                true
            }
        }
    }

    /// Board grid with the active piece overlaid, as color indices
    /// (0 = empty). The overlay only writes onto empty cells.
    pub fn render_grid(&self) -> [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize] {
        let mut grid = self.board.to_grid();
        if let Some(piece) = &self.active {
            for (r, c) in piece.shape.occupied() {
                let x = piece.x + c as i8;
                let y = piece.y + r as i8;
                if (0..BOARD_WIDTH as i8).contains(&x)
                    && (0..BOARD_HEIGHT as i8).contains(&y)
                    && grid[y as usize][x as usize] == 0
                {
                    grid[y as usize][x as usize] = piece.shape.at(r, c);
                }
            }
        }
        grid
    }

    /// Read-only values exposed after every state transition.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.render_grid(),
            next: self.next,
            score: self.score,
            lines: self.lines,
            level: self.level,
            running: self.running(),
            game_over: self.game_over(),
        }
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub fn set_active(&mut self, piece: Piece) {
        self.active = Some(piece);
    }

    #[cfg(test)]
    pub fn set_next(&mut self, kind: PieceKind) {
        self.next = kind;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

fn draw_kind(rng: &mut SimpleRng) -> PieceKind {
    PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize]
}
