//! Configuration for commentary

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::service::{CannedCommentary, CommandCommentary, CommentaryService, SilentCommentary};
use crate::trigger::{CommentaryTrigger, DEFAULT_LINE_CLEAR_CHANCE};

/// Where remarks come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentaryMode {
    /// No remarks at all
    Off,
    /// Built-in phrase book
    Canned,
    /// External generator program
    Command { program: PathBuf, args: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct CommentaryConfig {
    pub mode: CommentaryMode,

    /// Chance to comment on a 1-3 line clear
    pub line_clear_chance: f64,

    /// Upper bound for one request; slower answers are dropped
    pub timeout: Duration,

    pub comment_on_level_up: bool,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            mode: CommentaryMode::Canned,
            line_clear_chance: DEFAULT_LINE_CLEAR_CHANCE,
            timeout: Duration::from_secs(5),
            comment_on_level_up: true,
        }
    }
}

impl CommentaryConfig {
    /// Create from environment variables
    ///
    /// - `NEON_TETRIS_COMMENTARY`: `off`, `canned` or `command`
    /// - `NEON_TETRIS_COMMENTARY_CMD`: generator program (implies `command`
    ///   unless the mode says otherwise)
    /// - `NEON_TETRIS_COMMENTARY_ARGS`: whitespace separated arguments for it
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let command = var("NEON_TETRIS_COMMENTARY_CMD")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let args: Vec<String> = var("NEON_TETRIS_COMMENTARY_ARGS")
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let mode = match var("NEON_TETRIS_COMMENTARY")
            .map(|s| s.trim().to_lowercase())
            .as_deref()
        {
            Some("off") | Some("0") | Some("false") => CommentaryMode::Off,
            Some("canned") => CommentaryMode::Canned,
            _ => match command {
                Some(program) => CommentaryMode::Command { program, args },
                None => CommentaryMode::Canned,
            },
        };

        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn trigger(&self) -> CommentaryTrigger {
        CommentaryTrigger {
            line_clear_chance: self.line_clear_chance.clamp(0.0, 1.0),
            comment_on_level_up: self.comment_on_level_up,
        }
    }

    pub fn build_service(&self) -> Arc<dyn CommentaryService> {
        match &self.mode {
            CommentaryMode::Off => Arc::new(SilentCommentary),
            CommentaryMode::Canned => Arc::new(CannedCommentary::new()),
            CommentaryMode::Command { program, args } => {
                Arc::new(CommandCommentary::new(program.clone()).args(args.iter().cloned()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> CommentaryConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CommentaryConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn canned_without_any_variables() {
        assert_eq!(config_from(&[]).mode, CommentaryMode::Canned);
    }

    #[test]
    fn command_takes_split_arguments() {
        let config = config_from(&[
            ("NEON_TETRIS_COMMENTARY_CMD", " /usr/local/bin/quip "),
            ("NEON_TETRIS_COMMENTARY_ARGS", "--style  neon\t--short"),
        ]);
        assert_eq!(
            config.mode,
            CommentaryMode::Command {
                program: PathBuf::from("/usr/local/bin/quip"),
                args: vec!["--style".into(), "neon".into(), "--short".into()],
            }
        );
    }

    #[test]
    fn off_wins_over_a_command() {
        let config = config_from(&[
            ("NEON_TETRIS_COMMENTARY", "OFF"),
            ("NEON_TETRIS_COMMENTARY_CMD", "/usr/local/bin/quip"),
        ]);
        assert_eq!(config.mode, CommentaryMode::Off);
    }
}
