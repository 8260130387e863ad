//! Engine runtime - timed, concurrent half of the game engine
//!
//! [`neon_tetris_core`] holds the rules as synchronous transitions. This crate
//! runs them under time and concurrency:
//!
//! - [`Engine::spawn`] starts a single task that owns the game state. Every
//!   input, gravity tick and deferred lock is a message applied atomically.
//! - [`GravitySupervisor`] keeps exactly one periodic gravity task whose
//!   period matches the current level, and none while paused or over.
//! - Hard drops commit the landing position immediately and lock after a short
//!   cosmetic delay, during which the piece ignores all input.
//! - Observers read [`GameSnapshot`](crate::core::GameSnapshot)s from a watch
//!   channel and [`TimedEvent`]s from a broadcast channel.
//!
//! # Example
//!
//! ```no_run
//! use neon_tetris_engine::{Engine, EngineConfig};
//!
//! # async fn demo() -> neon_tetris_engine::Result<()> {
//! let engine = Engine::spawn(EngineConfig::default());
//! let mut events = engine.subscribe_events();
//! engine.start().await?;
//! engine.move_left().await?;
//! engine.hard_drop().await?;
//! let first = events.recv().await;
//! println!("{:?} / score {}", first, engine.snapshot().score);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gravity;
pub mod runtime;

pub use neon_tetris_core as core;
pub use neon_tetris_types as types;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use gravity::{GravityPlan, GravitySupervisor};
pub use runtime::{Engine, EngineHandle, EngineMessage, TimedEvent};
