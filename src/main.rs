//! Terminal Tetris runner (default binary).
//!
//! Wiring only: the engine task owns the game, a blocking thread turns
//! crossterm key presses into engine commands, the commentary runner
//! listens to engine events, and this task redraws whenever a new snapshot
//! or remark is published.

use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tokio::sync::{mpsc, watch};

use neon_tetris::commentary::{CommentaryConfig, CommentaryMode, CommentaryRunner, CommentaryState};
use neon_tetris::engine::{Engine, EngineConfig, EngineError, EngineHandle};
use neon_tetris::input::{handle_key_event, is_press, should_quit};
use neon_tetris::term::{CommentaryView, FrameBuffer, GameView, TerminalRenderer, Viewport};

/// neon-tetris - terminal Tetris
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Piece randomizer seed (default: NEON_TETRIS_SEED, else the clock)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Write logs to this file (logging is off without it)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter level: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Disable the commentary panel
    #[arg(long)]
    no_commentary: bool,
}

/// Events from the input thread to the render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiEvent {
    Quit,
    Resize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let engine_config = engine_config(&args);
    let mut commentary_config = CommentaryConfig::from_env();
    if args.no_commentary {
        commentary_config.mode = CommentaryMode::Off;
    }

    let engine = Engine::spawn(engine_config);

    let commentary = match commentary_config.mode {
        CommentaryMode::Off => None,
        _ => {
            let runner = CommentaryRunner::new(
                commentary_config.build_service(),
                commentary_config.trigger(),
                commentary_config.timeout,
            );
            let (_task, state) = runner.spawn(engine.subscribe_events());
            Some(state)
        }
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &engine, commentary).await;

    // Always try to restore terminal state.
    let _ = term.exit();
    let _ = engine.shutdown().await;
    tracing::info!("Bye");
    result
}

fn init_tracing(args: &Args) -> Result<()> {
    // stdout belongs to the game screen.
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    Ok(())
}

fn engine_config(args: &Args) -> EngineConfig {
    let config = EngineConfig::from_env();
    match args.seed {
        Some(seed) => config.with_seed(seed),
        None if std::env::var_os("NEON_TETRIS_SEED").is_some() => config,
        None => config.with_seed(clock_seed()),
    }
}

fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    (nanos as u32) ^ ((nanos >> 32) as u32)
}

async fn run(
    term: &mut TerminalRenderer,
    engine: &EngineHandle,
    mut commentary: Option<watch::Receiver<CommentaryState>>,
) -> Result<()> {
    let mut snapshots = engine.watch_snapshots();
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));

    let input_task = {
        let engine = engine.clone();
        let stop = stop.clone();
        tokio::task::spawn_blocking(move || input_loop(engine, ui_tx, stop))
    };

    engine.start().await?;

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    let result = loop {
        draw(term, &view, engine, commentary.as_ref(), &mut fb)?;

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
            }
            changed = commentary_changed(&mut commentary) => {
                if changed.is_err() {
                    // Runner gone; keep the last remark on screen.
                    tracing::debug!("Commentary channel closed");
                }
            }
            ui = ui_rx.recv() => match ui {
                Some(UiEvent::Resize) => term.invalidate(),
                Some(UiEvent::Quit) | None => break Ok(()),
            },
        }
    };

    stop.store(true, Ordering::Relaxed);
    if let Err(e) = input_task.await {
        tracing::warn!("Input thread ended abnormally: {}", e);
    }
    result
}

async fn commentary_changed(
    commentary: &mut Option<watch::Receiver<CommentaryState>>,
) -> std::result::Result<(), watch::error::RecvError> {
    match commentary {
        Some(rx) => {
            let changed = rx.changed().await;
            if changed.is_err() {
                *commentary = None;
            }
            changed
        }
        None => std::future::pending().await,
    }
}

fn draw(
    term: &mut TerminalRenderer,
    view: &GameView,
    engine: &EngineHandle,
    commentary: Option<&watch::Receiver<CommentaryState>>,
    fb: &mut FrameBuffer,
) -> Result<()> {
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let snap = engine.snapshot();
    let state = commentary.map(|rx| rx.borrow().clone());
    let panel = state.as_ref().map(|s| CommentaryView {
        text: &s.text,
        loading: s.loading,
    });
    view.render_into(&snap, panel, Viewport::new(w, h), fb);
    term.draw_swap(fb)
}

/// Blocking key reader. Polls so it can notice `stop` between keys.
fn input_loop(engine: EngineHandle, ui_tx: mpsc::UnboundedSender<UiEvent>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Relaxed) {
        match event::poll(Duration::from_millis(50)) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                tracing::warn!("Input poll failed: {}", e);
                let _ = ui_tx.send(UiEvent::Quit);
                return;
            }
        }

        let ev = match event::read() {
            Ok(ev) => ev,
            Err(e) => {
                tracing::warn!("Input read failed: {}", e);
                let _ = ui_tx.send(UiEvent::Quit);
                return;
            }
        };

        match ev {
            Event::Key(key) if is_press(&key) => {
                if should_quit(key) {
                    let _ = ui_tx.send(UiEvent::Quit);
                    return;
                }
                let Some(action) = handle_key_event(key) else {
                    continue;
                };
                match engine.try_send(action) {
                    Ok(()) => {}
                    Err(EngineError::Busy) => {
                        tracing::debug!("Engine busy, dropped {}", action.as_str())
                    }
                    Err(EngineError::Stopped) => {
                        let _ = ui_tx.send(UiEvent::Quit);
                        return;
                    }
                }
            }
            Event::Resize(_, _) => {
                let _ = ui_tx.send(UiEvent::Resize);
            }
            _ => {}
        }
    }
}
