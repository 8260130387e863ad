use crate::board::Board;
use crate::game_state::Tetromino;
use crate::pieces::{self, PieceShape, RotationMatrix};
use crate::types::{PieceKind, Rotation, START_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    pub fn matrix(&self) -> &'static RotationMatrix {
        pieces::matrix(self.kind, self.rotation)
    }

    pub fn shape(&self) -> PieceShape {
        *self.matrix().minos()
    }
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

/// Immutable copy of everything a renderer or observer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: Board,
    pub active: Option<ActiveSnapshot>,
    pub next: PieceKind,
    pub paused: bool,
    pub game_over: bool,
    /// A hard-dropped piece is resting and waiting for its deferred lock.
    pub lock_pending: bool,
    pub episode_id: u32,
    pub piece_id: u32,
    /// Seed the piece randomizer was created with
    pub seed: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
}

impl GameSnapshot {
    /// Row where the active piece would land, if there is one
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        let distance = self.board.drop_distance(active.x, active.y, active.matrix());
        Some(active.y + distance)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: Board::new(),
            active: None,
            next: PieceKind::I,
            paused: false,
            game_over: false,
            lock_pending: false,
            episode_id: 0,
            piece_id: 0,
            seed: 0,
            score: 0,
            level: START_LEVEL,
            lines: 0,
        }
    }
}
