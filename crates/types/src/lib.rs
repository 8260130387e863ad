//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, engine runtime, terminal rendering, commentary).
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 21 rows (indexed 0-20)
//! - **Spawn position**: (3, 0), roughly centered for every piece
//!
//! # Timing
//!
//! Gravity is derived from the level:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1000ms |
//! | 2 | 900ms |
//! | ... | -100ms per level |
//! | 10+ | 100ms (floor) |
//!
//! # Examples
//!
//! ```
//! use neon_tetris_types::{GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 21);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (21 rows)
pub const BOARD_HEIGHT: u8 = 21;

/// Spawn column (top-left of the piece matrix)
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 2;

/// Spawn row
pub const SPAWN_Y: i8 = 0;

/// Gravity interval at level 1 (milliseconds)
pub const BASE_DROP_MS: u32 = 1000;

/// Gravity speed-up per level (milliseconds)
pub const DROP_STEP_MS: u32 = 100;

/// Fastest gravity interval (milliseconds)
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// Cosmetic pause between a hard drop landing and its lock (milliseconds)
pub const HARD_DROP_LOCK_DELAY_MS: u32 = 10;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Starting level
pub const START_LEVEL: u32 = 1;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in table order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Index into per-kind tables
    pub fn index(&self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    /// Display color (r, g, b). Only used to pick a render color.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            PieceKind::I => (34, 211, 238),
            PieceKind::O => (250, 204, 21),
            PieceKind::T => (192, 132, 252),
            PieceKind::S => (74, 222, 128),
            PieceKind::Z => (248, 113, 113),
            PieceKind::J => (96, 165, 250),
            PieceKind::L => (251, 146, 60),
        }
    }
}

/// Rotation index in `0..4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rotation(u8);

impl Rotation {
    pub const SPAWN: Rotation = Rotation(0);

    /// Build from any integer, wrapping into `0..4`
    pub fn new(index: u8) -> Self {
        Self(index % 4)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Next rotation clockwise (`(current + 1) mod 4`)
    pub fn next(&self) -> Self {
        Self((self.0 + 1) % 4)
    }
}

/// Commands accepted from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
    TogglePause,
    Restart,
}

impl GameAction {
    /// Parse action from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotate" => Some(GameAction::Rotate),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "togglepause" | "pause" => Some(GameAction::TogglePause),
            "restart" | "start" | "reset" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Rotate => "rotate",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::TogglePause => "togglePause",
            GameAction::Restart => "restart",
        }
    }
}

/// Cell on the board (None = empty, Some = filled with piece kind)
pub type Cell = Option<PieceKind>;

/// Line clear scoring, indexed by lines cleared (multiplied by level)
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];
