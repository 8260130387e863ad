//! Commentary runner - listens to engine events and publishes remarks
//!
//! The runner is a leaf: it only reads the event stream and writes its own
//! watch channel. A slow or failing service never reaches the engine.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::engine::TimedEvent;
use crate::request::{CommentaryRequest, Mood};
use crate::service::CommentaryService;
use crate::trigger::CommentaryTrigger;

/// Greeting shown before the first remark arrives
pub const INITIAL_TEXT: &str = "Ready to play? Let's stack some blocks!";

/// What the commentary panel should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryState {
    pub text: String,
    pub mood: Mood,
    /// A request is in flight
    pub loading: bool,
}

impl Default for CommentaryState {
    fn default() -> Self {
        Self {
            text: INITIAL_TEXT.to_string(),
            mood: Mood::Neutral,
            loading: false,
        }
    }
}

pub struct CommentaryRunner {
    service: Arc<dyn CommentaryService>,
    trigger: CommentaryTrigger,
    timeout: Duration,
    rng: StdRng,
}

impl CommentaryRunner {
    pub fn new(
        service: Arc<dyn CommentaryService>,
        trigger: CommentaryTrigger,
        timeout: Duration,
    ) -> Self {
        Self {
            service,
            trigger,
            timeout,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Fix the trigger's random rolls (tests)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Start listening. The task ends when the event stream closes.
    pub fn spawn(
        self,
        events: broadcast::Receiver<TimedEvent>,
    ) -> (JoinHandle<()>, watch::Receiver<CommentaryState>) {
        let (state_tx, state_rx) = watch::channel(CommentaryState::default());
        let task = tokio::spawn(self.run(events, state_tx));
        (task, state_rx)
    }

    async fn run(
        mut self,
        mut events: broadcast::Receiver<TimedEvent>,
        state_tx: watch::Sender<CommentaryState>,
    ) {
        loop {
            let timed = match events.recv().await {
                Ok(timed) => timed,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Commentary skipped {} events", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            let Some(request) = self.trigger.decide(&timed.event, &mut self.rng) else {
                tracing::trace!("No remark for {}", timed.event.name());
                continue;
            };
            self.comment(&request, &state_tx).await;
        }
        tracing::debug!("Commentary runner stopped");
    }

    async fn comment(&self, request: &CommentaryRequest, state_tx: &watch::Sender<CommentaryState>) {
        tracing::debug!("Requesting {} commentary", request.kind.as_str());
        state_tx.send_modify(|s| s.loading = true);

        let text = match tokio::time::timeout(self.timeout, self.service.generate(request)).await {
            Ok(text) => text,
            Err(_) => {
                tracing::warn!(
                    "Commentary for {} timed out after {:?}",
                    request.kind.as_str(),
                    self.timeout
                );
                None
            }
        };

        // An empty answer keeps the previous remark.
        state_tx.send_modify(|s| {
            s.loading = false;
            if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
                s.text = text;
                s.mood = request.mood();
            }
        });
    }
}
