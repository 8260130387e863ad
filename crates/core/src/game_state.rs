//! Game state module - manages the complete game state
//!
//! This module ties together all core components: board, pieces, RNG, and scoring.
//! It handles spawning, movement, rotation, locking, line clears and the game lifecycle.
//! Time is not tracked here: gravity and the deferred hard-drop lock are driven
//! from outside through [`GameState::gravity_step`] and
//! [`GameState::complete_pending_lock`].

use crate::board::Board;
use crate::events::GameEvent;
use crate::pieces::{self, PieceShape, RotationMatrix};
use crate::rng::PieceRandomizer;
use crate::scoring::{level_for_lines, line_clear_points};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at spawn position
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::SPAWN,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    pub fn matrix(&self) -> &'static RotationMatrix {
        pieces::matrix(self.kind, self.rotation)
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        *self.matrix().minos()
    }

    pub fn collides(&self, board: &Board) -> bool {
        board.collides(self.x, self.y, self.matrix())
    }
}

/// Outcome of a single lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockResult {
    pub lines_cleared: u8,
    pub points: u32,
    pub level_before: u32,
    pub level_after: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<Tetromino>,
    next: PieceKind,
    randomizer: PieceRandomizer,
    /// Monotonic episode id (increments on every start/reset).
    episode_id: u32,
    /// Monotonic id for spawned pieces; survives resets so a deferred lock
    /// scheduled before a reset can never match a later piece.
    piece_id: u32,
    /// Hard drop committed the resting position; waiting for the lock.
    lock_pending: bool,
    events: Vec<GameEvent>,
    score: u32,
    level: u32,
    lines: u32,
    paused: bool,
    game_over: bool,
}

impl GameState {
    /// Create a new game with the given RNG seed
    ///
    /// The game is idle until [`start`](Self::start) is called.
    pub fn new(seed: u32) -> Self {
        let mut randomizer = PieceRandomizer::new(seed);
        let next = randomizer.draw();

        Self {
            board: Board::new(),
            active: None,
            next,
            randomizer,
            episode_id: 0,
            piece_id: 0,
            lock_pending: false,
            events: Vec::new(),
            score: 0,
            level: START_LEVEL,
            lines: 0,
            paused: false,
            game_over: false,
        }
    }

    /// Start (or restart) a game: empty board, zeroed counters, level 1,
    /// a freshly drawn upcoming piece and no active piece.
    ///
    /// The random stream continues from where it was, so consecutive games
    /// differ while staying reproducible from the original seed.
    pub fn start(&mut self) {
        self.board.clear();
        self.active = None;
        self.next = self.randomizer.draw();
        self.lock_pending = false;
        self.score = 0;
        self.level = START_LEVEL;
        self.lines = 0;
        self.paused = false;
        self.game_over = false;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.events.push(GameEvent::GameStarted {
            episode_id: self.episode_id,
        });
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn lock_pending(&self) -> bool {
        self.lock_pending
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replace the active piece directly. Only meant for setting up positions in tests
    /// and benchmarks; it bypasses spawn and collision checks.
    pub fn set_active(&mut self, piece: Option<Tetromino>) {
        self.active = piece;
    }

    /// Drain the events queued by the transitions since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.board = self.board;
        out.active = self.active.map(ActiveSnapshot::from);
        out.next = self.next;
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.lock_pending = self.lock_pending;
        out.episode_id = self.episode_id;
        out.piece_id = self.piece_id;
        out.seed = self.randomizer.seed();
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Player commands apply only to a live, unpaused, controllable piece
    fn can_control(&self) -> bool {
        self.active.is_some() && !self.paused && !self.game_over && !self.lock_pending
    }

    /// Whether the loop should spawn right now (a started game with no piece)
    pub fn needs_spawn(&self) -> bool {
        self.episode_id > 0
            && self.active.is_none()
            && !self.paused
            && !self.game_over
            && !self.lock_pending
    }

    /// Spawn if there is no active piece and the game is running.
    ///
    /// Returns true when a piece was installed.
    pub fn settle(&mut self) -> bool {
        if !self.needs_spawn() {
            return false;
        }
        self.spawn_piece()
    }

    /// Promote the upcoming piece to active at the spawn position.
    ///
    /// When the spawn position collides the game ends and no piece is installed.
    pub fn spawn_piece(&mut self) -> bool {
        if self.game_over || self.active.is_some() {
            return false;
        }

        let piece = Tetromino::new(self.next);
        if piece.collides(&self.board) {
            self.game_over = true;
            self.active = None;
            self.events.push(GameEvent::GameOver {
                final_score: self.score,
                lines: self.lines,
                level: self.level,
            });
            return false;
        }

        self.active = Some(piece);
        self.next = self.randomizer.draw();
        self.piece_id = self.piece_id.wrapping_add(1);
        true
    }

    /// Try to move the active piece
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if !self.can_control() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let moved = Tetromino {
            x: active.x + dx,
            y: active.y + dy,
            ..active
        };
        if moved.collides(&self.board) {
            return false;
        }

        self.active = Some(moved);
        true
    }

    /// Rotate clockwise using the fixed horizontal kick sequence
    pub fn try_rotate(&mut self) -> bool {
        if !self.can_control() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let board = &self.board;
        let result = pieces::try_rotate(active.kind, active.rotation, active.x, active.y, |x, y, m| {
            board.collides(x, y, m)
        });

        match result {
            Some((rotation, x)) => {
                self.active = Some(Tetromino {
                    rotation,
                    x,
                    ..active
                });
                true
            }
            None => false,
        }
    }

    /// Move down one row, or lock when resting.
    ///
    /// Returns true only when the piece moved.
    pub fn soft_drop(&mut self) -> bool {
        if !self.can_control() {
            return false;
        }
        if self.try_move(0, 1) {
            return true;
        }
        self.lock_piece();
        false
    }

    /// One gravity tick: identical to a soft drop
    pub fn gravity_step(&mut self) -> bool {
        self.soft_drop()
    }

    /// Commit the active piece to its resting position and mark a pending lock.
    ///
    /// Returns the id of the dropped piece, to be passed to
    /// [`complete_pending_lock`](Self::complete_pending_lock).
    pub fn hard_drop(&mut self) -> Option<u32> {
        if !self.can_control() {
            return None;
        }
        let active = self.active?;

        let distance = self.board.drop_distance(active.x, active.y, active.matrix());
        self.active = Some(Tetromino {
            y: active.y + distance,
            ..active
        });
        self.lock_pending = true;
        Some(self.piece_id)
    }

    /// Finish a deferred hard-drop lock.
    ///
    /// Does nothing if no lock is pending or the piece id no longer matches
    /// (a reset happened in between). A pause during the window does not
    /// cancel the lock.
    pub fn complete_pending_lock(&mut self, piece_id: u32) -> Option<LockResult> {
        if !self.lock_pending || piece_id != self.piece_id || self.game_over {
            return None;
        }
        self.lock_piece()
    }

    /// Lock the active piece onto the board and handle line clears
    pub fn lock_piece(&mut self) -> Option<LockResult> {
        let active = self.active.take()?;
        self.lock_pending = false;

        self.board
            .merge(active.matrix(), active.x, active.y, active.kind);

        let cleared = self.board.clear_full_rows().len();
        debug_assert!(cleared <= 4, "a single piece spans at most four rows");

        let level_before = self.level;
        let points = line_clear_points(cleared, level_before);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(cleared as u32);
        self.level = level_for_lines(self.lines);
        debug_assert!(self.level >= level_before);

        if cleared > 0 {
            self.events.push(GameEvent::LinesCleared {
                count: cleared as u8,
                points,
                score: self.score,
                level: self.level,
                lines: self.lines,
            });
        }
        if self.level > level_before {
            self.events.push(GameEvent::LevelUp { level: self.level });
        }

        Some(LockResult {
            lines_cleared: cleared as u8,
            points,
            level_before,
            level_after: self.level,
        })
    }

    /// Flip the paused flag. Not allowed once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    /// Apply an action synchronously and settle the loop (spawn if needed).
    ///
    /// A hard drop locks immediately here; the engine runtime defers it instead.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        let applied = match action {
            GameAction::MoveLeft => self.try_move(-1, 0),
            GameAction::MoveRight => self.try_move(1, 0),
            GameAction::Rotate => self.try_rotate(),
            GameAction::SoftDrop => {
                let had_piece = self.can_control();
                self.soft_drop();
                had_piece
            }
            GameAction::HardDrop => match self.hard_drop() {
                Some(id) => {
                    self.complete_pending_lock(id);
                    true
                }
                None => false,
            },
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::Restart => {
                self.start();
                true
            }
        };
        self.settle();
        applied
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
