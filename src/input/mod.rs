//! Keyboard input handling.

pub mod map;

pub use map::{
    blocks_action, direction_for, is_menu_key, is_pause_key, is_start_key, should_quit,
};
