//! Terminal renderer for the game.
//!
//! Rendering goes through a plain framebuffer of styled characters instead of
//! a widget toolkit: [`GameView`] draws a snapshot into a [`FrameBuffer`]
//! (pure, testable) and [`TerminalRenderer`] flushes it through crossterm,
//! emitting only the cells that changed since the previous frame.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use neon_tetris_core as core;
pub use neon_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, CommentaryView, GameView, Viewport};
pub use renderer::{encode_frame, TerminalRenderer};
