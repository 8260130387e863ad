use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::{broadcast, watch};

use neon_tetris_commentary::core::GameEvent;
use neon_tetris_commentary::engine::{Engine, EngineConfig, TimedEvent};
use neon_tetris_commentary::{
    CommentaryKind, CommentaryRequest, CommentaryRunner, CommentaryService, CommentaryState,
    CommentaryTrigger, Mood, INITIAL_TEXT,
};

/// Answers with the request kind and remembers every request
#[derive(Default)]
struct Recording {
    seen: Mutex<Vec<CommentaryRequest>>,
}

impl CommentaryService for Recording {
    fn generate<'a>(&'a self, request: &'a CommentaryRequest) -> BoxFuture<'a, Option<String>> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        futures::future::ready(Some(request.kind.as_str().to_string())).boxed()
    }
}

/// Takes far longer than any sane timeout
struct Sleepy;

impl CommentaryService for Sleepy {
    fn generate<'a>(&'a self, _request: &'a CommentaryRequest) -> BoxFuture<'a, Option<String>> {
        async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Some("too late".to_string())
        }
        .boxed()
    }
}

/// Answers with whitespace only
struct Blank;

impl CommentaryService for Blank {
    fn generate<'a>(&'a self, _request: &'a CommentaryRequest) -> BoxFuture<'a, Option<String>> {
        futures::future::ready(Some("   ".to_string())).boxed()
    }
}

async fn wait_for(
    rx: &mut watch::Receiver<CommentaryState>,
    f: impl FnMut(&CommentaryState) -> bool,
) -> CommentaryState {
    tokio::time::timeout(Duration::from_secs(30), rx.wait_for(f))
        .await
        .expect("timeout waiting for commentary")
        .expect("runner stopped")
        .clone()
}

fn started() -> TimedEvent {
    TimedEvent {
        event: GameEvent::GameStarted { episode_id: 1 },
        timestamp_ms: 0,
    }
}

#[tokio::test(start_paused = true)]
async fn game_start_from_the_engine_gets_a_remark() {
    let engine = Engine::spawn(EngineConfig::default());
    let service = Arc::new(Recording::default());
    let runner = CommentaryRunner::new(
        service.clone(),
        CommentaryTrigger::default(),
        Duration::from_secs(1),
    )
    .with_seed(1);
    let (_task, mut state) = runner.spawn(engine.subscribe_events());
    assert_eq!(state.borrow().text, INITIAL_TEXT);

    engine.start().await.unwrap();
    let remark = wait_for(&mut state, |s| s.text == "start").await;
    assert_eq!(remark.mood, Mood::Happy);
    assert!(!remark.loading);

    let seen = service.seen.lock().unwrap();
    assert_eq!(seen[0].kind, CommentaryKind::Start);
}

#[tokio::test(start_paused = true)]
async fn tetris_always_gets_a_remark_and_small_clears_can_be_skipped() {
    let (tx, rx) = broadcast::channel(8);
    let service = Arc::new(Recording::default());
    let trigger = CommentaryTrigger {
        line_clear_chance: 0.0,
        comment_on_level_up: false,
    };
    let (_task, mut state) = CommentaryRunner::new(service.clone(), trigger, Duration::from_secs(1))
        .spawn(rx);

    for count in [1u8, 2, 3, 4] {
        tx.send(TimedEvent {
            event: GameEvent::LinesCleared {
                count,
                points: 0,
                score: 0,
                level: 1,
                lines: count as u32,
            },
            timestamp_ms: 0,
        })
        .unwrap();
    }
    tx.send(TimedEvent {
        event: GameEvent::LevelUp { level: 2 },
        timestamp_ms: 0,
    })
    .unwrap();

    let remark = wait_for(&mut state, |s| s.text == "line_clear").await;
    assert_eq!(remark.mood, Mood::Excited);

    drop(tx);
    tokio::time::sleep(Duration::from_millis(10)).await;
    let seen = service.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].lines_cleared, Some(4));
}

#[tokio::test(start_paused = true)]
async fn slow_service_times_out_and_keeps_the_previous_text() {
    let (tx, rx) = broadcast::channel(8);
    let (_task, mut state) =
        CommentaryRunner::new(Arc::new(Sleepy), CommentaryTrigger::default(), Duration::from_secs(2))
            .spawn(rx);

    tx.send(started()).unwrap();
    wait_for(&mut state, |s| s.loading).await;
    let done = wait_for(&mut state, |s| !s.loading).await;
    assert_eq!(done.text, INITIAL_TEXT);
    assert_eq!(done.mood, Mood::Neutral);
}

#[tokio::test(start_paused = true)]
async fn blank_answer_keeps_the_previous_text() {
    let (tx, rx) = broadcast::channel(8);
    let (task, state) =
        CommentaryRunner::new(Arc::new(Blank), CommentaryTrigger::default(), Duration::from_secs(1))
            .spawn(rx);

    tx.send(started()).unwrap();
    drop(tx);
    task.await.unwrap();
    assert_eq!(state.borrow().text, INITIAL_TEXT);
    assert!(!state.borrow().loading);
}

#[cfg(unix)]
#[tokio::test]
async fn command_service_reads_the_first_line_of_output() {
    use neon_tetris_commentary::CommandCommentary;

    let service =
        CommandCommentary::new("sh").args(["-c", "read request; echo; echo \"got $request\""]);
    let text = service
        .generate(&CommentaryRequest::new(CommentaryKind::GameOver))
        .await
        .unwrap();
    assert_eq!(text, r#"got {"kind":"game_over"}"#);
}
