//! Neon Tetris (workspace facade crate).
//!
//! Re-exports the member crates under one roof so the binary, the
//! integration tests and the benchmarks can write `neon_tetris::core::...`.

pub use neon_tetris_commentary as commentary;
pub use neon_tetris_core as core;
pub use neon_tetris_engine as engine;
pub use neon_tetris_input as input;
pub use neon_tetris_term as term;
pub use neon_tetris_types as types;
