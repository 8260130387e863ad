//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on UI, timers, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule can be exercised without a clock
//! - **Portable**: Can run in any environment (terminal, headless, benchmarks)
//!
//! # Module Structure
//!
//! - [`board`]: 10x21 game board with collision detection and line clearing
//! - [`pieces`]: Tetromino rotation matrices and the horizontal kick sequence
//! - [`game_state`]: Active piece, upcoming piece, scoring and lifecycle transitions
//! - [`rng`]: Uniform random piece generation from a seedable LCG
//! - [`scoring`]: Line clear points, level and gravity period
//! - [`snapshot`]: Copyable read-only view for renderers and observers
//! - [`events`]: Notifications queued by transitions
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every upcoming piece is an independent draw (no bag)
//! - **Simplified kicks**: rotation tries horizontal offsets `0, -1, +1, -2, +2`
//! - **No lock delay**: a piece that cannot descend locks on the next gravity tick
//! - **Scoring**: `{0, 40, 100, 300, 1200}` times the level before the clear
//! - **Levels**: `lines / 10 + 1`
//!
//! # Example
//!
//! ```
//! use neon_tetris_core::GameState;
//! use neon_tetris_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//! game.settle();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! // No lines yet, so no points; the next piece is already falling.
//! assert_eq!(game.score(), 0);
//! assert!(game.active().is_some());
//! ```

pub mod board;
pub mod events;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use neon_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use events::GameEvent;
pub use game_state::{GameState, LockResult, Tetromino};
pub use pieces::{get_shape, matrix, try_rotate, RotationMatrix};
pub use rng::{PieceRandomizer, SimpleRng};
pub use scoring::{gravity_interval_ms, level_for_lines, line_clear_points};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
