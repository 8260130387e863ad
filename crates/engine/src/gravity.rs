//! Gravity supervisor - one periodic task per gravity plan
//!
//! The period is never changed on a running timer. Whenever the plan
//! (episode, level, or running/stopped) changes, the old task is aborted and
//! a new one starts with a fresh generation number. Ticks carry their
//! generation so that a tick already queued by an aborted task is discarded.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::core::{gravity_interval_ms, GameSnapshot};
use crate::runtime::EngineMessage;

/// Parameters governing the gravity timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GravityPlan {
    pub episode_id: u32,
    pub level: u32,
    pub period: Duration,
}

impl GravityPlan {
    /// Plan for a snapshot, or `None` when gravity must not run
    /// (not started, paused, or over).
    pub fn for_snapshot(snapshot: &GameSnapshot) -> Option<Self> {
        if snapshot.episode_id == 0 || snapshot.paused || snapshot.game_over {
            return None;
        }
        Some(Self {
            episode_id: snapshot.episode_id,
            level: snapshot.level,
            period: Duration::from_millis(gravity_interval_ms(snapshot.level) as u64),
        })
    }
}

#[derive(Debug, Default)]
pub struct GravitySupervisor {
    plan: Option<GravityPlan>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl GravitySupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> Option<GravityPlan> {
        self.plan
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a tick with this generation comes from the running timer
    pub fn is_current(&self, generation: u64) -> bool {
        self.task.is_some() && generation == self.generation
    }

    /// Bring the timer in line with `plan`. Returns true if the timer was
    /// torn down or recreated.
    pub fn reconcile(
        &mut self,
        plan: Option<GravityPlan>,
        tx: &mpsc::WeakSender<EngineMessage>,
    ) -> bool {
        if plan == self.plan {
            return false;
        }

        self.stop();
        self.plan = plan;

        if let Some(plan) = plan {
            self.generation = self.generation.wrapping_add(1);
            let generation = self.generation;
            let tx = tx.clone();
            self.task = Some(tokio::spawn(async move {
                let mut interval =
                    tokio::time::interval_at(Instant::now() + plan.period, plan.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    let Some(tx) = tx.upgrade() else {
                        break;
                    };
                    if tx
                        .send(EngineMessage::GravityTick { generation })
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            }));
            tracing::debug!(
                "Gravity restarted: episode {} level {} period {:?} (generation {})",
                plan.episode_id,
                plan.level,
                plan.period,
                generation
            );
        } else {
            tracing::debug!("Gravity stopped");
        }

        true
    }

    /// Abort the running timer, if any. The plan is kept.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for GravitySupervisor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;

    #[test]
    fn plan_follows_level_pause_and_game_over() {
        let mut game = GameState::new(1);
        assert_eq!(GravityPlan::for_snapshot(&game.snapshot()), None);

        game.start();
        let plan = GravityPlan::for_snapshot(&game.snapshot()).unwrap();
        assert_eq!(plan.level, 1);
        assert_eq!(plan.period, Duration::from_millis(1000));

        game.toggle_pause();
        assert_eq!(GravityPlan::for_snapshot(&game.snapshot()), None);
    }

    #[tokio::test(start_paused = true)]
    async fn reconcile_restarts_only_on_change() {
        let (tx, mut rx) = mpsc::channel(8);
        let weak = tx.downgrade();
        let mut supervisor = GravitySupervisor::new();

        let plan = GravityPlan {
            episode_id: 1,
            level: 1,
            period: Duration::from_millis(1000),
        };
        assert!(supervisor.reconcile(Some(plan), &weak));
        assert!(!supervisor.reconcile(Some(plan), &weak));
        let first = supervisor.generation();

        tokio::time::sleep(Duration::from_millis(1001)).await;
        match rx.recv().await {
            Some(EngineMessage::GravityTick { generation }) => assert_eq!(generation, first),
            other => panic!("unexpected message: {:?}", other),
        }

        let faster = GravityPlan {
            level: 2,
            period: Duration::from_millis(900),
            ..plan
        };
        assert!(supervisor.reconcile(Some(faster), &weak));
        assert!(!supervisor.is_current(first));
        assert!(supervisor.is_current(first + 1));

        assert!(supervisor.reconcile(None, &weak));
        assert!(!supervisor.is_current(first + 1));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
