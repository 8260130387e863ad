//! Commentary services - where remarks come from
//!
//! A service returns `Some(text)` or `None`. It never reports errors: every
//! failure (missing program, bad output, timeout upstream) is an empty result.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Mutex;

use futures::future::BoxFuture;
use futures::FutureExt;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::request::{CommentaryKind, CommentaryRequest};

/// Source of short remarks about game moments
pub trait CommentaryService: Send + Sync {
    fn generate<'a>(&'a self, request: &'a CommentaryRequest) -> BoxFuture<'a, Option<String>>;
}

/// Never says anything (no generator configured)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCommentary;

impl CommentaryService for SilentCommentary {
    fn generate<'a>(&'a self, _request: &'a CommentaryRequest) -> BoxFuture<'a, Option<String>> {
        futures::future::ready(None).boxed()
    }
}

const START_LINES: &[&str] = &[
    "Grid online. Let's make some neon rain.",
    "Welcome back, stacker. The blocks won't wait.",
    "Systems green. Drop in and light it up.",
];

const CLEAR_LINES: &[&str] = &[
    "Clean. Keep that stack low.",
    "Nice clear, the grid thanks you.",
    "Smooth moves. Keep it flowing.",
];

const TETRIS_LINES: &[&str] = &[
    "TETRIS! Absolute voltage!",
    "Four lines. Pure overload!",
    "Maximum clear. Grid obliterated!",
];

const LEVEL_UP_LINES: &[&str] = &[
    "Speed's climbing. Hold on tight.",
    "New level. Gravity just got meaner.",
    "Faster now. Don't blink.",
];

const GAME_OVER_GOOD_LINES: &[&str] = &[
    "Now that was a run worth remembering.",
    "Respectable stacking. The grid salutes you.",
];

const GAME_OVER_BAD_LINES: &[&str] = &[
    "The blocks won this round. Try again?",
    "Short circuit. Reboot and go again.",
];

/// Offline phrase book, one random pick per request
#[derive(Debug)]
pub struct CannedCommentary {
    rng: Mutex<StdRng>,
}

impl CannedCommentary {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn phrases(request: &CommentaryRequest) -> &'static [&'static str] {
        match request.kind {
            CommentaryKind::Start => START_LINES,
            CommentaryKind::LineClear if request.is_tetris() => TETRIS_LINES,
            CommentaryKind::LineClear => CLEAR_LINES,
            CommentaryKind::LevelUp => LEVEL_UP_LINES,
            CommentaryKind::GameOver
                if request.score.unwrap_or(0) > crate::request::GOOD_SCORE =>
            {
                GAME_OVER_GOOD_LINES
            }
            CommentaryKind::GameOver => GAME_OVER_BAD_LINES,
        }
    }

    pub fn pick(&self, request: &CommentaryRequest) -> Option<String> {
        let mut rng = self.rng.lock().ok()?;
        Self::phrases(request)
            .choose(&mut *rng)
            .map(|s| s.to_string())
    }
}

impl Default for CannedCommentary {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentaryService for CannedCommentary {
    fn generate<'a>(&'a self, request: &'a CommentaryRequest) -> BoxFuture<'a, Option<String>> {
        futures::future::ready(self.pick(request)).boxed()
    }
}

/// Asks an external program for each remark.
///
/// The request is written to the program's stdin as one line of JSON; the
/// first non-empty line of its stdout is the remark. The child is killed if
/// the request is dropped (e.g. on timeout).
#[derive(Debug, Clone)]
pub struct CommandCommentary {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandCommentary {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    async fn run(&self, request: &CommentaryRequest) -> std::io::Result<Option<String>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut line = request.to_json();
            line.push('\n');
            stdin.write_all(line.as_bytes()).await?;
            // Dropping stdin closes the pipe so the program sees EOF.
        }

        let Some(stdout) = child.stdout.take() else {
            return Ok(None);
        };
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
        Ok(None)
    }
}

impl CommentaryService for CommandCommentary {
    fn generate<'a>(&'a self, request: &'a CommentaryRequest) -> BoxFuture<'a, Option<String>> {
        async move {
            match self.run(request).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        "Commentary command '{}' failed: {}",
                        self.program.display(),
                        e
                    );
                    None
                }
            }
        }
        .boxed()
    }
}
