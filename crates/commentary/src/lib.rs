//! Commentary - short flavor-text remarks about the game
//!
//! The engine knows nothing about this crate. A [`CommentaryRunner`]
//! subscribes to the engine's event stream, asks a [`CommentaryTrigger`]
//! whether an event deserves a remark, and if so asks a
//! [`CommentaryService`] for one. Results land in a
//! [`CommentaryState`] watch channel for the renderer.
//!
//! Services:
//!
//! - [`SilentCommentary`]: never says anything
//! - [`CannedCommentary`]: offline phrase book
//! - [`CommandCommentary`]: pipes the request (JSON) to an external program
//!   and takes the first line it prints

pub mod config;
pub mod request;
pub mod runner;
pub mod service;
pub mod trigger;

pub use neon_tetris_core as core;
pub use neon_tetris_engine as engine;

pub use config::{CommentaryConfig, CommentaryMode};
pub use request::{CommentaryKind, CommentaryRequest, Mood};
pub use runner::{CommentaryRunner, CommentaryState, INITIAL_TEXT};
pub use service::{CannedCommentary, CommandCommentary, CommentaryService, SilentCommentary};
pub use trigger::{CommentaryTrigger, DEFAULT_LINE_CLEAR_CHANCE};
