//! Arcade hub binary.
//!
//! One crossterm-backed loop per game: render, poll input with a timeout
//! until the next tick, apply actions, tick the engine. Escape returns to
//! the hub menu; q (or Ctrl-C) quits from anywhere.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};

use retro_arcade::core::GameState;
use retro_arcade::crossword::{ClueDirection, ClueSpec, CrosswordSession, Puzzle};
use retro_arcade::games::{dodge, registry, DodgeGame, MergeGame, SnakeConfig, SnakeGame};
use retro_arcade::input::{
    blocks_action, direction_for, is_menu_key, is_pause_key, is_start_key, should_quit,
};
use retro_arcade::store::SaveStore;
use retro_arcade::term::{
    render_blocks, render_crossword, render_dodge, render_menu, render_merge, render_snake,
    TerminalRenderer, Viewport,
};
use retro_arcade::types::{GameAction, Phase};

const DODGE_BEST_KEY: &str = "dodge/best";

/// Where to go after a runner returns.
enum Flow {
    Menu,
    Quit,
}

fn main() -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let mut store = SaveStore::open(SaveStore::default_path());
    let games = registry();
    let mut selected = 0usize;

    loop {
        let choice = match run_menu(term, &mut selected)? {
            Some(index) => index,
            None => return Ok(()),
        };

        let flow = match games[choice].name {
            "blocks" => run_blocks(term)?,
            "snake" => run_snake(term)?,
            "merge" => run_merge(term)?,
            "dodge" => run_dodge(term, &mut store)?,
            "crossword" => run_crossword(term, &mut store)?,
            _ => Flow::Menu,
        };
        if let Flow::Quit = flow {
            return Ok(());
        }
    }
}

fn viewport() -> Viewport {
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    Viewport::new(w, h)
}

/// Seed from the wall clock; each launch sees a different piece sequence.
fn seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos().wrapping_add(d.as_secs() as u32))
        .unwrap_or(1)
}

fn next_key(timeout: Duration) -> Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Some(key)),
            Event::Resize(..) => return Ok(None),
            _ => {}
        }
    }
    Ok(None)
}

fn run_menu(term: &mut TerminalRenderer, selected: &mut usize) -> Result<Option<usize>> {
    let games = registry();
    loop {
        term.draw(&render_menu(&games, *selected, viewport()))?;

        let Some(key) = next_key(Duration::from_millis(250))? else {
            continue;
        };
        if should_quit(key) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                *selected = selected.checked_sub(1).unwrap_or(games.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                *selected = (*selected + 1) % games.len();
            }
            KeyCode::Enter | KeyCode::Char(' ') => return Ok(Some(*selected)),
            KeyCode::Char(c) => {
                if let Some(digit) = c.to_digit(10) {
                    let index = digit as usize;
                    if (1..=games.len()).contains(&index) {
                        return Ok(Some(index - 1));
                    }
                }
            }
            _ => {}
        }
    }
}

fn run_blocks(term: &mut TerminalRenderer) -> Result<Flow> {
    let mut game = GameState::new(seed());
    let mut last_tick = Instant::now();

    loop {
        term.draw(&render_blocks(&game, viewport()))?;

        let interval = Duration::from_millis(game.drop_interval_ms() as u64);
        let timeout = interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if let Some(key) = next_key(timeout)? {
            if should_quit(key) {
                return Ok(Flow::Quit);
            }
            if is_menu_key(key) {
                return Ok(Flow::Menu);
            }
            if !game.running() && is_start_key(key) {
                game.apply_action(GameAction::Start);
            } else if let Some(action) = blocks_action(key) {
                game.apply_action(action);
            }
        }

        // The tick scheduler stops with the session: a finished or paused
        // game only reacts to keys.
        if !game.running() {
            last_tick = Instant::now();
        } else if last_tick.elapsed() >= interval {
            last_tick = Instant::now();
            game.tick();
        }
    }
}

fn run_snake(term: &mut TerminalRenderer) -> Result<Flow> {
    let mut game = SnakeGame::new(SnakeConfig::default(), seed());
    let mut last_tick = Instant::now();

    loop {
        term.draw(&render_snake(&game, viewport()))?;

        let interval = Duration::from_millis(game.tick_ms() as u64);
        let timeout = interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if let Some(key) = next_key(timeout)? {
            if should_quit(key) {
                return Ok(Flow::Quit);
            }
            if is_menu_key(key) {
                return Ok(Flow::Menu);
            }
            if is_pause_key(key) {
                game.toggle_pause();
            } else if is_start_key(key) {
                match game.phase() {
                    Phase::Idle => game.start(),
                    Phase::GameOver => {
                        game.reset();
                        game.start();
                    }
                    _ => {}
                }
            } else if let Some(dir) = direction_for(key) {
                game.steer(dir);
            } else if key.code == KeyCode::Char('r') || key.code == KeyCode::Char('R') {
                game.reset();
            }
        }

        if !game.phase().is_running() {
            last_tick = Instant::now();
        } else if last_tick.elapsed() >= interval {
            last_tick = Instant::now();
            game.tick();
        }
    }
}

fn run_merge(term: &mut TerminalRenderer) -> Result<Flow> {
    let mut game = MergeGame::new(seed());

    loop {
        term.draw(&render_merge(&game, viewport()))?;

        let Some(key) = next_key(Duration::from_millis(250))? else {
            continue;
        };
        if should_quit(key) {
            return Ok(Flow::Quit);
        }
        if is_menu_key(key) {
            return Ok(Flow::Menu);
        }
        if key.code == KeyCode::Char('r') || key.code == KeyCode::Char('R') {
            game.reset();
        } else if let Some(dir) = direction_for(key) {
            game.shift(dir);
        }
    }
}

fn run_dodge(term: &mut TerminalRenderer, store: &mut SaveStore) -> Result<Flow> {
    let mut game = DodgeGame::new(seed());
    game.set_best(store.get(DODGE_BEST_KEY).unwrap_or(0));

    let interval = Duration::from_millis(dodge::TICK_MS as u64);
    let mut last_tick = Instant::now();
    let mut was_running = false;

    loop {
        term.draw(&render_dodge(&game, viewport()))?;

        let timeout = interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if let Some(key) = next_key(timeout)? {
            if should_quit(key) {
                store.set(DODGE_BEST_KEY, &game.best())?;
                return Ok(Flow::Quit);
            }
            if is_menu_key(key) {
                store.set(DODGE_BEST_KEY, &game.best())?;
                return Ok(Flow::Menu);
            }
            if is_pause_key(key) {
                game.toggle_pause();
            } else if is_start_key(key) {
                match game.phase() {
                    Phase::Idle => game.start(),
                    Phase::GameOver => {
                        game.reset();
                        game.start();
                    }
                    _ => game.flap(),
                }
            }
        }

        if !game.phase().is_running() {
            last_tick = Instant::now();
        } else if last_tick.elapsed() >= interval {
            last_tick = Instant::now();
            game.tick();
        }

        // Persist the best score as each run ends.
        let running = game.phase().is_running();
        if was_running && game.phase().is_game_over() {
            store.set(DODGE_BEST_KEY, &game.best())?;
        }
        was_running = running;
    }
}

fn run_crossword(term: &mut TerminalRenderer, store: &mut SaveStore) -> Result<Flow> {
    let mut session = CrosswordSession::new(sample_puzzle());
    session.load_progress(store);
    let mut already_recorded = session.is_completed();

    loop {
        term.draw(&render_crossword(&session, viewport()))?;

        // Short timeout keeps the timer display live.
        let Some(key) = next_key(Duration::from_millis(500))? else {
            continue;
        };
        if should_quit(key) {
            session.save_progress(store)?;
            return Ok(Flow::Quit);
        }
        if is_menu_key(key) {
            session.save_progress(store)?;
            return Ok(Flow::Menu);
        }
        match key.code {
            KeyCode::Up => session.move_selection(-1, 0),
            KeyCode::Down => session.move_selection(1, 0),
            KeyCode::Left => session.move_selection(0, -1),
            KeyCode::Right => session.move_selection(0, 1),
            KeyCode::Tab => session.toggle_direction(),
            KeyCode::Backspace => session.backspace(),
            KeyCode::Delete => {
                let (row, col) = session.selected();
                session.clear_cell(row, col);
            }
            KeyCode::Char(c) if c.is_ascii_alphabetic() => session.type_letter(c),
            _ => {}
        }

        if session.is_completed() && !already_recorded {
            already_recorded = true;
            session.mark_completed(store)?;
            session.clear_progress(store)?;
        }
    }
}

/// The built-in daily mini. The full puzzle feed lives outside this binary;
/// one hand-made 5×5 keeps the widget playable on its own.
fn sample_puzzle() -> Puzzle {
    // C R A T E
    // I . . . N
    // D O Z E N
    // E . . . U
    // R . . . I
    let pattern = vec![
        vec![true, true, true, true, true],
        vec![true, false, false, false, true],
        vec![true, true, true, true, true],
        vec![true, false, false, false, true],
        vec![true, false, false, false, true],
    ];
    let mut puzzle = Puzzle::numbered(
        "mini-2024-06-01",
        "2024-06-01",
        5,
        &pattern,
        vec![
            ClueSpec::new("Shipping box", "CRATE", ClueDirection::Across, 0, 0),
            ClueSpec::new("Pressed-apple drink", "CIDER", ClueDirection::Down, 0, 0),
            ClueSpec::new("Listless boredom", "ENNUI", ClueDirection::Down, 0, 4),
            ClueSpec::new("Twelve of anything", "DOZEN", ClueDirection::Across, 2, 0),
        ],
    );
    puzzle.title = Some("Daily Mini".to_string());
    debug_assert!(puzzle.validate().is_empty());
    puzzle
}
