//! Game events emitted by state transitions.
//!
//! Events are queued inside [`GameState`](crate::GameState) and drained with
//! `take_events()`; the engine runtime stamps and broadcasts them.

/// Lifecycle and scoring notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// A new game began (first start or reset).
    GameStarted { episode_id: u32 },
    /// One lock cleared at least one line. `points` were awarded for this
    /// clear; `score`, `level` and `lines` are the totals after it.
    LinesCleared {
        count: u8,
        points: u32,
        score: u32,
        level: u32,
        lines: u32,
    },
    /// The level increased as a result of a clear.
    LevelUp { level: u32 },
    /// A spawn collided; the game is over.
    GameOver {
        final_score: u32,
        lines: u32,
        level: u32,
    },
}

impl GameEvent {
    /// Stable camelCase name
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "gameStarted",
            GameEvent::LinesCleared { .. } => "linesCleared",
            GameEvent::LevelUp { .. } => "levelUp",
            GameEvent::GameOver { .. } => "gameOver",
        }
    }
}
