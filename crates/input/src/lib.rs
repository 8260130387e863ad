//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::GameAction`]. Each key press
//! is one command; terminal auto-repeat produces repeated commands.

pub mod map;

pub use neon_tetris_types as types;

pub use map::{handle_key_event, is_press, should_quit};
