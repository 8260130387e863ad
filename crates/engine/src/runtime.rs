//! Engine runtime - the single writer of the game state.
//!
//! One task owns the [`GameState`]. Player actions, gravity ticks and
//! deferred hard-drop locks all arrive on the same bounded queue and are
//! applied strictly one at a time. After every message the task commits:
//!
//! 1. spawn if the loop needs a piece,
//! 2. drain and broadcast events,
//! 3. publish the new snapshot,
//! 4. reconcile the gravity timer.
//!
//! Readers only ever see whole snapshots published after step 3.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::EngineConfig;
use crate::core::{GameEvent, GameSnapshot, GameState};
use crate::error::{EngineError, Result};
use crate::gravity::{GravityPlan, GravitySupervisor};
use crate::types::GameAction;

/// Messages applied by the runtime task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMessage {
    Action(GameAction),
    GravityTick { generation: u64 },
    CompleteLock { piece_id: u32 },
    Shutdown,
}

/// A game event stamped with wall-clock milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub event: GameEvent,
    pub timestamp_ms: u64,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Entry point: starts the runtime task.
pub struct Engine;

impl Engine {
    /// Spawn the runtime task on the current tokio runtime.
    ///
    /// The game stays idle until [`EngineHandle::start`] so that subscribers
    /// can attach before the first `GameStarted` event. The task stops on
    /// [`EngineHandle::shutdown`] or once every handle has been dropped.
    pub fn spawn(config: EngineConfig) -> EngineHandle {
        let (tx, rx) = mpsc::channel(config.command_capacity.max(1));
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));

        let state = GameState::new(config.seed);
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());

        let task = EngineTask {
            state,
            weak_tx: tx.downgrade(),
            rx,
            snapshot_tx,
            event_tx: event_tx.clone(),
            gravity: GravitySupervisor::new(),
            pending_lock: None,
            lock_delay: config.hard_drop_lock_delay,
        };
        tracing::info!(
            "Engine starting (seed {}, hard drop lock delay {:?})",
            config.seed,
            config.hard_drop_lock_delay
        );
        tokio::spawn(task.run());

        EngineHandle {
            tx,
            snapshots: snapshot_rx,
            events: event_tx,
        }
    }
}

/// Cheap, cloneable access to a running engine
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineMessage>,
    snapshots: watch::Receiver<GameSnapshot>,
    events: broadcast::Sender<TimedEvent>,
}

impl EngineHandle {
    /// Queue an action, waiting for queue space
    pub async fn send(&self, action: GameAction) -> Result<()> {
        self.tx
            .send(EngineMessage::Action(action))
            .await
            .map_err(|_| EngineError::Stopped)
    }

    /// Queue an action without waiting
    pub fn try_send(&self, action: GameAction) -> Result<()> {
        self.tx
            .try_send(EngineMessage::Action(action))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => EngineError::Busy,
                mpsc::error::TrySendError::Closed(_) => EngineError::Stopped,
            })
    }

    pub async fn move_left(&self) -> Result<()> {
        self.send(GameAction::MoveLeft).await
    }

    pub async fn move_right(&self) -> Result<()> {
        self.send(GameAction::MoveRight).await
    }

    pub async fn rotate(&self) -> Result<()> {
        self.send(GameAction::Rotate).await
    }

    pub async fn soft_drop(&self) -> Result<()> {
        self.send(GameAction::SoftDrop).await
    }

    pub async fn hard_drop(&self) -> Result<()> {
        self.send(GameAction::HardDrop).await
    }

    pub async fn toggle_pause(&self) -> Result<()> {
        self.send(GameAction::TogglePause).await
    }

    /// Start the first game
    pub async fn start(&self) -> Result<()> {
        self.send(GameAction::Restart).await
    }

    /// Reset to a fresh game (also the way out of game over)
    pub async fn restart(&self) -> Result<()> {
        self.send(GameAction::Restart).await
    }

    /// Latest committed snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        *self.snapshots.borrow()
    }

    /// Receiver notified after every commit
    pub fn watch_snapshots(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Subscribe to events committed from now on
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimedEvent> {
        self.events.subscribe()
    }

    /// Ask the runtime task to stop. Later sends fail with `Stopped`.
    pub async fn shutdown(&self) -> Result<()> {
        self.tx
            .send(EngineMessage::Shutdown)
            .await
            .map_err(|_| EngineError::Stopped)
    }

    /// Whether the runtime task has stopped
    pub fn is_stopped(&self) -> bool {
        self.tx.is_closed()
    }
}

struct EngineTask {
    state: GameState,
    weak_tx: mpsc::WeakSender<EngineMessage>,
    rx: mpsc::Receiver<EngineMessage>,
    snapshot_tx: watch::Sender<GameSnapshot>,
    event_tx: broadcast::Sender<TimedEvent>,
    gravity: GravitySupervisor,
    pending_lock: Option<JoinHandle<()>>,
    lock_delay: Duration,
}

impl EngineTask {
    async fn run(mut self) {
        self.commit();

        while let Some(message) = self.rx.recv().await {
            match message {
                EngineMessage::Shutdown => {
                    tracing::info!("Engine received shutdown, exiting");
                    break;
                }
                EngineMessage::Action(action) => self.handle_action(action),
                EngineMessage::GravityTick { generation } => {
                    if !self.gravity.is_current(generation) {
                        tracing::trace!("Dropping stale gravity tick (generation {})", generation);
                        continue;
                    }
                    self.state.gravity_step();
                }
                EngineMessage::CompleteLock { piece_id } => {
                    self.pending_lock = None;
                    if self.state.complete_pending_lock(piece_id).is_none() {
                        tracing::debug!("Deferred lock for piece {} no longer applies", piece_id);
                    }
                }
            }
            self.commit();
        }

        self.gravity.stop();
        self.cancel_pending_lock();
        self.rx.close();
        tracing::info!("Engine stopped");
    }

    fn handle_action(&mut self, action: GameAction) {
        let applied = match action {
            GameAction::HardDrop => match self.state.hard_drop() {
                Some(piece_id) => {
                    self.schedule_lock(piece_id);
                    true
                }
                None => false,
            },
            GameAction::Restart => {
                self.cancel_pending_lock();
                self.state.start();
                true
            }
            other => self.state.apply_action(other),
        };

        if applied {
            tracing::trace!("Applied {}", action.as_str());
        } else {
            tracing::trace!("Rejected {}", action.as_str());
        }
    }

    fn schedule_lock(&mut self, piece_id: u32) {
        if self.lock_delay.is_zero() {
            self.state.complete_pending_lock(piece_id);
            return;
        }

        let delay = self.lock_delay;
        let tx = self.weak_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(EngineMessage::CompleteLock { piece_id }).await;
            }
        });
        if let Some(previous) = self.pending_lock.replace(task) {
            previous.abort();
        }
    }

    fn cancel_pending_lock(&mut self) {
        if let Some(task) = self.pending_lock.take() {
            task.abort();
        }
    }

    fn commit(&mut self) {
        self.state.settle();

        let events = self.state.take_events();
        if !events.is_empty() {
            let timestamp_ms = now_ms();
            for event in events {
                self.log_event(&event);
                // No subscribers is fine.
                let _ = self.event_tx.send(TimedEvent {
                    event,
                    timestamp_ms,
                });
            }
        }

        let snapshot = self.state.snapshot();
        self.snapshot_tx.send_replace(snapshot);

        self.gravity
            .reconcile(GravityPlan::for_snapshot(&snapshot), &self.weak_tx);
    }

    fn log_event(&self, event: &GameEvent) {
        match *event {
            GameEvent::GameStarted { episode_id } => {
                tracing::info!("Game {} started", episode_id)
            }
            GameEvent::LinesCleared {
                count,
                points,
                score,
                lines,
                ..
            } => tracing::debug!(
                "Cleared {} lines (+{} = {}), {} total",
                count,
                points,
                score,
                lines
            ),
            GameEvent::LevelUp { level } => tracing::info!("Level up: {}", level),
            GameEvent::GameOver {
                final_score,
                lines,
                level,
            } => tracing::info!(
                "Game over: score {} lines {} level {}",
                final_score,
                lines,
                level
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn idle_until_started() {
        let engine = Engine::spawn(EngineConfig::default());
        let mut rx = engine.watch_snapshots();
        assert_eq!(engine.snapshot().episode_id, 0);
        assert!(engine.snapshot().active.is_none());

        engine.start().await.unwrap();
        rx.changed().await.unwrap();
        let snap = *rx.borrow();
        assert_eq!(snap.episode_id, 1);
        assert!(snap.active.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn try_send_reports_stopped() {
        let engine = Engine::spawn(EngineConfig::default());
        engine.shutdown().await.unwrap();
        while !engine.is_stopped() {
            tokio::task::yield_now().await;
        }
        assert_eq!(engine.try_send(GameAction::Rotate), Err(EngineError::Stopped));
        assert_eq!(engine.rotate().await, Err(EngineError::Stopped));
    }
}
