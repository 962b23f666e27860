//! Pure views: engine state in, framebuffer out.
//!
//! No IO happens here, so each view can be unit-tested by inspecting the
//! buffer. Board cells are drawn 2 columns × 1 row to compensate for the
//! terminal glyph aspect ratio.

use crate::core::{GameState, PieceKind};
use crate::crossword::{ClueDirection, CrosswordSession};
use crate::games::dodge::{self, DodgeGame};
use crate::games::merge::{MergeGame, GRID as MERGE_GRID};
use crate::games::snake::SnakeGame;
use crate::games::GameDescriptor;
use crate::term::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Color, Phase, BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// The web palette the original cabinet used, by color tag.
pub fn color_rgb(color: Color) -> Rgb {
    match color {
        Color::Cyan => Rgb::new(34, 211, 238),
        Color::Yellow => Rgb::new(250, 204, 21),
        Color::Purple => Rgb::new(168, 85, 247),
        Color::Green => Rgb::new(34, 197, 94),
        Color::Red => Rgb::new(239, 68, 68),
        Color::Blue => Rgb::new(59, 130, 246),
        Color::Orange => Rgb::new(249, 115, 22),
    }
}

const BACKDROP: Rgb = Rgb::new(10, 10, 16);
const WELL: Rgb = Rgb::new(28, 28, 38);

fn backdrop_style() -> CellStyle {
    CellStyle::plain(Rgb::new(90, 90, 100), BACKDROP)
}

fn border_style() -> CellStyle {
    CellStyle::plain(Rgb::new(200, 200, 200), BACKDROP)
}

fn label_style() -> CellStyle {
    CellStyle::plain(Rgb::new(148, 163, 184), BACKDROP)
}

fn value_style() -> CellStyle {
    CellStyle::plain(Rgb::new(255, 255, 255), BACKDROP).bold()
}

fn overlay_style() -> CellStyle {
    CellStyle::plain(Rgb::new(250, 204, 21), Rgb::new(60, 20, 20)).bold()
}

fn new_frame(viewport: Viewport) -> FrameBuffer {
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);
    fb.clear(backdrop_style().into_cell(' '));
    fb
}

/// Paint one logical grid cell as a 2×1 block.
fn put_block(fb: &mut FrameBuffer, origin_x: u16, origin_y: u16, x: u16, y: u16, style: CellStyle) {
    fb.put_char(origin_x + x * 2, origin_y + y, '█', style);
    fb.put_char(origin_x + x * 2 + 1, origin_y + y, '█', style);
}

fn phase_overlay(fb: &mut FrameBuffer, x: u16, w: u16, y: u16, phase: Phase) {
    let text = match phase {
        Phase::Idle => "SPACE/ENTER TO START",
        Phase::Paused => "PAUSED",
        Phase::GameOver => "GAME OVER",
        Phase::Running => return,
    };
    fb.put_str_centered(x, w, y, text, overlay_style());
}

// ---------------------------------------------------------------------------
// Hub menu
// ---------------------------------------------------------------------------

pub fn render_menu(games: &[GameDescriptor], selected: usize, viewport: Viewport) -> FrameBuffer {
    let mut fb = new_frame(viewport);

    let w = 52u16.min(viewport.width);
    let h = (games.len() as u16 + 6).min(viewport.height);
    let x = viewport.width.saturating_sub(w) / 2;
    let y = viewport.height.saturating_sub(h) / 2;

    fb.draw_border(x, y, w, h, border_style());
    fb.put_str_centered(x, w, y + 1, "A R C A D E", value_style());
    fb.put_str_centered(x, w, y + 2, "choose your game", label_style());

    for (i, game) in games.iter().enumerate() {
        let row = y + 4 + i as u16;
        let style = if i == selected {
            CellStyle::plain(Rgb::new(0, 0, 0), Rgb::new(34, 211, 238)).bold()
        } else {
            label_style()
        };
        let line = format!(" {}. {:<10} {}", i + 1, game.name, game.description);
        let fits: String = line.chars().take(w.saturating_sub(4) as usize).collect();
        fb.put_str(x + 2, row, &fits, style);
    }

    fb.put_str_centered(
        x,
        w,
        y + h - 1,
        " enter: play   q: quit ",
        label_style(),
    );
    fb
}

// ---------------------------------------------------------------------------
// Falling blocks
// ---------------------------------------------------------------------------

pub fn render_blocks(game: &GameState, viewport: Viewport) -> FrameBuffer {
    let mut fb = new_frame(viewport);

    let board_w = BOARD_WIDTH as u16 * 2;
    let board_h = BOARD_HEIGHT as u16;
    let frame_w = board_w + 2;
    let frame_h = board_h + 2;
    let x0 = viewport.width.saturating_sub(frame_w + 16) / 2;
    let y0 = viewport.height.saturating_sub(frame_h) / 2;

    fb.fill_rect(
        x0 + 1,
        y0 + 1,
        board_w,
        board_h,
        ' ',
        CellStyle::plain(Rgb::new(70, 70, 80), WELL),
    );
    fb.draw_border(x0, y0, frame_w, frame_h, border_style());

    let grid = game.render_grid();
    for (y, row) in grid.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            if let Some(color) = Color::from_index(value) {
                let style = CellStyle::plain(color_rgb(color), WELL);
                put_block(&mut fb, x0 + 1, y0 + 1, x as u16, y as u16, style);
            }
        }
    }

    // Side panel: score / lines / level / next.
    let px = x0 + frame_w + 2;
    fb.put_str(px, y0 + 1, "SCORE", label_style());
    fb.put_str(px, y0 + 2, &game.score().to_string(), value_style());
    fb.put_str(px, y0 + 4, "LINES", label_style());
    fb.put_str(px, y0 + 5, &game.lines().to_string(), value_style());
    fb.put_str(px, y0 + 7, "LEVEL", label_style());
    fb.put_str(px, y0 + 8, &game.level().to_string(), value_style());

    fb.put_str(px, y0 + 10, "NEXT", label_style());
    draw_piece_preview(&mut fb, px, y0 + 11, game.next_kind());

    fb.put_str(px, y0 + 17, "◀ ▶ move", label_style());
    fb.put_str(px, y0 + 18, "▲ rotate ▼ drop", label_style());
    fb.put_str(px, y0 + 19, "p pause  r reset", label_style());

    phase_overlay(&mut fb, x0, frame_w, y0 + frame_h / 2, game.phase());
    fb
}

fn draw_piece_preview(fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind) {
    let shape = kind.shape();
    let style = CellStyle::plain(color_rgb(kind.color()), BACKDROP);
    for (r, c) in shape.occupied() {
        put_block(fb, x, y, c as u16, r as u16, style);
    }
}

// ---------------------------------------------------------------------------
// Snake
// ---------------------------------------------------------------------------

pub fn render_snake(game: &SnakeGame, viewport: Viewport) -> FrameBuffer {
    let mut fb = new_frame(viewport);

    let grid = game.grid() as u16;
    let frame_w = grid * 2 + 2;
    let frame_h = grid + 2;
    let x0 = viewport.width.saturating_sub(frame_w) / 2;
    let y0 = viewport.height.saturating_sub(frame_h + 2) / 2;

    fb.fill_rect(
        x0 + 1,
        y0 + 1,
        grid * 2,
        grid,
        ' ',
        CellStyle::plain(Rgb::new(70, 70, 80), WELL),
    );
    fb.draw_border(x0, y0, frame_w, frame_h, border_style());

    let food = game.food();
    put_block(
        &mut fb,
        x0 + 1,
        y0 + 1,
        food.1 as u16,
        food.0 as u16,
        CellStyle::plain(color_rgb(Color::Red), WELL),
    );

    let body_style = CellStyle::plain(Rgb::new(34, 197, 94), WELL);
    let head_style = CellStyle::plain(Rgb::new(22, 101, 52), WELL).bold();
    for (i, (row, col)) in game.body().enumerate() {
        let style = if i == 0 { head_style } else { body_style };
        put_block(&mut fb, x0 + 1, y0 + 1, col as u16, row as u16, style);
    }

    let status = format!("score {}   speed {} ms", game.score(), game.tick_ms());
    fb.put_str_centered(x0, frame_w, y0 + frame_h, &status, label_style());
    fb.put_str_centered(
        x0,
        frame_w,
        y0 + frame_h + 1,
        "arrows/wasd steer  p pause  esc menu",
        label_style(),
    );

    phase_overlay(&mut fb, x0, frame_w, y0 + frame_h / 2, game.phase());
    fb
}

// ---------------------------------------------------------------------------
// Tile merge
// ---------------------------------------------------------------------------

fn tile_rgb(value: u32) -> Rgb {
    match value {
        2 => Rgb::new(55, 65, 81),
        4 => Rgb::new(202, 138, 4),
        8 => Rgb::new(234, 179, 8),
        16 => Rgb::new(249, 115, 22),
        32 => Rgb::new(239, 68, 68),
        64 => Rgb::new(220, 38, 38),
        128 => Rgb::new(168, 85, 247),
        256 => Rgb::new(147, 51, 234),
        512 => Rgb::new(59, 130, 246),
        1024 => Rgb::new(37, 99, 235),
        2048 => Rgb::new(251, 191, 36),
        _ => Rgb::new(16, 185, 129),
    }
}

pub fn render_merge(game: &MergeGame, viewport: Viewport) -> FrameBuffer {
    let mut fb = new_frame(viewport);

    const TILE_W: u16 = 8;
    const TILE_H: u16 = 3;
    let frame_w = MERGE_GRID as u16 * TILE_W + 2;
    let frame_h = MERGE_GRID as u16 * TILE_H + 2;
    let x0 = viewport.width.saturating_sub(frame_w) / 2;
    let y0 = viewport.height.saturating_sub(frame_h + 3) / 2;

    fb.draw_border(x0, y0, frame_w, frame_h, border_style());

    for (r, row) in game.grid().iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let tx = x0 + 1 + c as u16 * TILE_W;
            let ty = y0 + 1 + r as u16 * TILE_H;
            if value == 0 {
                fb.fill_rect(tx, ty, TILE_W, TILE_H, ' ', CellStyle::plain(WELL, WELL));
                continue;
            }
            let style = CellStyle::plain(Rgb::new(255, 255, 255), tile_rgb(value)).bold();
            fb.fill_rect(tx, ty, TILE_W, TILE_H, ' ', style);
            fb.put_str_centered(tx, TILE_W, ty + TILE_H / 2, &value.to_string(), style);
        }
    }

    let mut status = format!("score {}", game.score());
    if game.won() {
        status.push_str("   you made 2048!");
    }
    fb.put_str_centered(x0, frame_w, y0 + frame_h, &status, label_style());
    fb.put_str_centered(
        x0,
        frame_w,
        y0 + frame_h + 1,
        "arrows/wasd slide  r reset  esc menu",
        label_style(),
    );

    if game.game_over() {
        fb.put_str_centered(x0, frame_w, y0 + frame_h / 2, "NO MOVES LEFT", overlay_style());
    }
    fb
}

// ---------------------------------------------------------------------------
// Dodge
// ---------------------------------------------------------------------------

pub fn render_dodge(game: &DodgeGame, viewport: Viewport) -> FrameBuffer {
    let mut fb = new_frame(viewport);

    let frame_w = 62u16.min(viewport.width).max(12);
    let frame_h = 22u16.min(viewport.height).max(6);
    let field_w = frame_w - 2;
    let field_h = frame_h - 2;
    let x0 = viewport.width.saturating_sub(frame_w) / 2;
    let y0 = viewport.height.saturating_sub(frame_h + 2) / 2;

    fb.fill_rect(
        x0 + 1,
        y0 + 1,
        field_w,
        field_h,
        ' ',
        CellStyle::plain(Rgb::new(70, 70, 80), Rgb::new(22, 48, 60)),
    );
    fb.draw_border(x0, y0, frame_w, frame_h, border_style());

    let sx = |x: f32| (x / dodge::FIELD_WIDTH * field_w as f32) as i32;
    let sy = |y: f32| (y / dodge::FIELD_HEIGHT * field_h as f32) as i32;

    let pipe_style = CellStyle::plain(Rgb::new(22, 101, 52), Rgb::new(34, 197, 94));
    for pipe in game.pipes() {
        let left = sx(pipe.x).max(0);
        let right = sx(pipe.x + dodge::PIPE_WIDTH).min(field_w as i32);
        let gap_top = sy(pipe.top_height);
        let gap_bottom = sy(pipe.top_height + dodge::PIPE_GAP);
        for col in left..right {
            for row in 0..field_h as i32 {
                if row < gap_top || row >= gap_bottom {
                    fb.put_char(
                        x0 + 1 + col as u16,
                        y0 + 1 + row as u16,
                        '█',
                        pipe_style,
                    );
                }
            }
        }
    }

    let bird_col = sx(dodge::BIRD_X).clamp(0, field_w as i32 - 1);
    let bird_row = sy(game.bird_y()).clamp(0, field_h as i32 - 1);
    fb.put_char(
        x0 + 1 + bird_col as u16,
        y0 + 1 + bird_row as u16,
        '●',
        CellStyle::plain(Rgb::new(250, 204, 21), Rgb::new(22, 48, 60)).bold(),
    );

    let status = format!("score {}   best {}", game.score(), game.best());
    fb.put_str_centered(x0, frame_w, y0 + frame_h, &status, label_style());
    fb.put_str_centered(
        x0,
        frame_w,
        y0 + frame_h + 1,
        "space/enter flap  p pause  esc menu",
        label_style(),
    );

    phase_overlay(&mut fb, x0, frame_w, y0 + frame_h / 2, game.phase());
    fb
}

// ---------------------------------------------------------------------------
// Crossword
// ---------------------------------------------------------------------------

pub fn render_crossword(session: &CrosswordSession, viewport: Viewport) -> FrameBuffer {
    let mut fb = new_frame(viewport);

    const CELL_W: u16 = 4;
    const CELL_H: u16 = 2;
    let size = session.puzzle().size as u16;
    let grid_w = size * CELL_W + 1;
    let grid_h = size * CELL_H + 1;
    let total_w = grid_w + 34;
    let x0 = viewport.width.saturating_sub(total_w) / 2;
    let y0 = viewport.height.saturating_sub(grid_h + 2) / 2;

    let black = CellStyle::plain(Rgb::new(0, 0, 0), Rgb::new(0, 0, 0));
    let white = CellStyle::plain(Rgb::new(17, 24, 39), Rgb::new(226, 232, 240));
    let selected = CellStyle::plain(Rgb::new(17, 24, 39), Rgb::new(250, 204, 21)).bold();
    let number_style = CellStyle::plain(Rgb::new(71, 85, 105), Rgb::new(226, 232, 240));

    for row in 0..size {
        for col in 0..size {
            let cell = session.puzzle().grid[row as usize][col as usize];
            let cx = x0 + col * CELL_W;
            let cy = y0 + row * CELL_H;

            let style = if cell.is_black {
                black
            } else if session.selected() == (row as usize, col as usize) {
                selected
            } else {
                white
            };
            fb.fill_rect(cx, cy, CELL_W - 1, CELL_H - 1, ' ', style);

            if let Some(number) = cell.number {
                let digits = number.to_string();
                fb.put_str(cx, cy, &digits, if cell.is_black { black } else { number_style });
            }
            if !cell.is_black {
                let letter = session.input_at(row as usize, col as usize);
                if letter != ' ' {
                    // Numbers sit in the left corner; the letter takes the
                    // remaining content column.
                    fb.put_char(cx + 2, cy, letter, style.bold());
                }
            }
        }
    }

    // Clue panel.
    let px = x0 + grid_w + 3;
    let mut py = y0;
    for (title, direction) in [
        ("ACROSS", ClueDirection::Across),
        ("DOWN", ClueDirection::Down),
    ] {
        let marker = if session.direction() == direction { "▶ " } else { "  " };
        fb.put_str(px, py, &format!("{marker}{title}"), value_style());
        py += 1;
        for clue in session.puzzle().clues_in(direction) {
            let line = format!("{}. {}", clue.number, clue.text);
            fb.put_str(px + 2, py, &line, label_style());
            py += 1;
        }
        py += 1;
    }

    let elapsed = session.elapsed().as_secs();
    let timer = format!("{}:{:02}", elapsed / 60, elapsed % 60);
    fb.put_str(px, py, &timer, label_style());

    let footer_y = y0 + grid_h + 1;
    fb.put_str_centered(
        x0,
        total_w,
        footer_y,
        "type letters  tab: direction  backspace: erase  esc: menu",
        label_style(),
    );

    if session.is_completed() {
        fb.put_str_centered(x0, grid_w, y0 + grid_h / 2, " SOLVED! ", overlay_style());
    }
    fb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::{ClueSpec, Puzzle};
    use crate::games::{registry, SnakeConfig};

    fn viewport() -> Viewport {
        Viewport::new(100, 32)
    }

    #[test]
    fn menu_lists_every_game() {
        let games = registry();
        let fb = render_menu(&games, 0, viewport());
        let text: String = (0..fb.height())
            .map(|y| fb.row_text(y))
            .collect::<Vec<_>>()
            .join("\n");
        for game in &games {
            assert!(text.contains(game.name), "menu is missing {}", game.name);
        }
    }

    #[test]
    fn blocks_view_shows_score_and_overlay() {
        let game = GameState::new(1);
        let fb = render_blocks(&game, viewport());
        let text: String = (0..fb.height())
            .map(|y| fb.row_text(y))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("SCORE"));
        assert!(text.contains("SPACE/ENTER TO START"));
    }

    #[test]
    fn snake_view_renders_without_panicking_at_small_sizes() {
        let game = SnakeGame::new(SnakeConfig::default(), 1);
        let _ = render_snake(&game, Viewport::new(10, 5));
        let _ = render_snake(&game, viewport());
    }

    #[test]
    fn merge_view_shows_tiles() {
        let game = MergeGame::new(1);
        let fb = render_merge(&game, viewport());
        let text: String = (0..fb.height())
            .map(|y| fb.row_text(y))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains('2') || text.contains('4'));
    }

    #[test]
    fn dodge_view_draws_the_bird() {
        let game = DodgeGame::new(1);
        let fb = render_dodge(&game, viewport());
        let found = fb.cells().iter().any(|c| c.ch == '●');
        assert!(found);
    }

    #[test]
    fn crossword_view_shows_clues() {
        let pattern = vec![vec![true; 5]; 5];
        let puzzle = Puzzle::numbered(
            "p",
            "2024-01-01",
            5,
            &pattern,
            vec![ClueSpec::new(
                "Test clue",
                "AAAAA",
                ClueDirection::Across,
                0,
                0,
            )],
        );
        let session = CrosswordSession::new(puzzle);
        let fb = render_crossword(&session, viewport());
        let text: String = (0..fb.height())
            .map(|y| fb.row_text(y))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("ACROSS"));
        assert!(text.contains("Test clue"));
    }
}
