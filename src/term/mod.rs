//! Terminal front end: framebuffer, renderer, and per-game views.

pub mod fb;
pub mod renderer;
pub mod views;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::TerminalRenderer;
pub use views::{
    color_rgb, render_blocks, render_crossword, render_dodge, render_menu, render_merge,
    render_snake, Viewport,
};
