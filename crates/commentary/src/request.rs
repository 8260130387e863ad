//! Commentary requests - what happened, and how to ask for a remark about it

use serde::{Deserialize, Serialize};

use crate::core::GameEvent;

/// Kind of moment worth a remark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentaryKind {
    Start,
    LineClear,
    LevelUp,
    GameOver,
}

impl CommentaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentaryKind::Start => "start",
            CommentaryKind::LineClear => "line_clear",
            CommentaryKind::LevelUp => "level_up",
            CommentaryKind::GameOver => "game_over",
        }
    }
}

/// Tone of the current remark, used only for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Neutral,
    Happy,
    Excited,
    Sad,
}

/// Payload handed to a [`CommentaryService`](crate::CommentaryService)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryRequest {
    pub kind: CommentaryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_cleared: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

/// Score above which a finished game counts as a good one
pub const GOOD_SCORE: u32 = 2000;

impl CommentaryRequest {
    pub fn new(kind: CommentaryKind) -> Self {
        Self {
            kind,
            lines_cleared: None,
            score: None,
            level: None,
        }
    }

    /// Request describing an engine event
    pub fn from_event(event: &GameEvent) -> Self {
        match *event {
            GameEvent::GameStarted { .. } => Self::new(CommentaryKind::Start),
            GameEvent::LinesCleared {
                count,
                score,
                level,
                ..
            } => Self {
                lines_cleared: Some(count),
                score: Some(score),
                level: Some(level),
                ..Self::new(CommentaryKind::LineClear)
            },
            GameEvent::LevelUp { level } => Self {
                level: Some(level),
                ..Self::new(CommentaryKind::LevelUp)
            },
            GameEvent::GameOver {
                final_score, level, ..
            } => Self {
                score: Some(final_score),
                level: Some(level),
                ..Self::new(CommentaryKind::GameOver)
            },
        }
    }

    pub fn is_tetris(&self) -> bool {
        self.kind == CommentaryKind::LineClear && self.lines_cleared.unwrap_or(0) >= 4
    }

    pub fn mood(&self) -> Mood {
        match self.kind {
            CommentaryKind::Start => Mood::Happy,
            CommentaryKind::LineClear if self.is_tetris() => Mood::Excited,
            CommentaryKind::LineClear => Mood::Happy,
            CommentaryKind::LevelUp => Mood::Excited,
            CommentaryKind::GameOver if self.score.unwrap_or(0) > GOOD_SCORE => Mood::Happy,
            CommentaryKind::GameOver => Mood::Sad,
        }
    }

    /// Short natural-language prompt for text generators
    pub fn prompt(&self) -> String {
        match self.kind {
            CommentaryKind::Start => "A player is starting a game of neon-themed Tetris. \
                 Give a short, hype, one-sentence welcome message."
                .to_string(),
            CommentaryKind::LineClear if self.is_tetris() => {
                "The player just scored a Tetris (4 lines)! \
                 Give an explosive hype reaction of five words at most."
                    .to_string()
            }
            CommentaryKind::LineClear => format!(
                "The player cleared {} lines. Give a short, encouraging one-sentence remark.",
                self.lines_cleared.unwrap_or(0)
            ),
            CommentaryKind::LevelUp => format!(
                "The player just reached level {}! Give a short, intense warning that speed is increasing.",
                self.level.unwrap_or(1)
            ),
            CommentaryKind::GameOver => format!(
                "Game over! The player scored {}. Give a short one-sentence remark, \
                 snarky or comforting depending on whether the score is good (good is above {}).",
                self.score.unwrap_or(0),
                GOOD_SCORE
            ),
        }
    }

    pub fn to_json(&self) -> String {
        // Plain struct of enums and integers; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_snake_case_and_skips_missing_fields() {
        let start = CommentaryRequest::new(CommentaryKind::Start);
        assert_eq!(start.to_json(), r#"{"kind":"start"}"#);

        let clear = CommentaryRequest::from_event(&GameEvent::LinesCleared {
            count: 2,
            points: 100,
            score: 1300,
            level: 1,
            lines: 2,
        });
        let value: serde_json::Value = serde_json::from_str(&clear.to_json()).unwrap();
        assert_eq!(value["kind"], "line_clear");
        assert_eq!(value["lines_cleared"], 2);
        // The running total, not the points for this clear.
        assert_eq!(value["score"], 1300);
    }

    #[test]
    fn prompt_mentions_the_payload() {
        let over = CommentaryRequest::from_event(&GameEvent::GameOver {
            final_score: 4321,
            lines: 30,
            level: 4,
        });
        assert!(over.prompt().contains("4321"));
        assert_eq!(over.mood(), Mood::Happy);

        let tetris = CommentaryRequest {
            lines_cleared: Some(4),
            ..CommentaryRequest::new(CommentaryKind::LineClear)
        };
        assert!(tetris.is_tetris());
        assert_eq!(tetris.mood(), Mood::Excited);
        assert!(tetris.prompt().contains("Tetris"));
    }
}
