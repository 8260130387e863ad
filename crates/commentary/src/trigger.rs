//! Commentary trigger - decides which events deserve a remark

use rand::Rng;

use crate::core::GameEvent;
use crate::request::CommentaryRequest;

/// Probability of commenting on an ordinary (fewer than four lines) clear
pub const DEFAULT_LINE_CLEAR_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommentaryTrigger {
    /// Chance in `[0, 1]` to comment on a 1-3 line clear. Tetrises always qualify.
    pub line_clear_chance: f64,
    pub comment_on_level_up: bool,
}

impl Default for CommentaryTrigger {
    fn default() -> Self {
        Self {
            line_clear_chance: DEFAULT_LINE_CLEAR_CHANCE,
            comment_on_level_up: true,
        }
    }
}

impl CommentaryTrigger {
    /// Decide with an explicit roll in `[0, 1)`
    pub fn should_comment(&self, event: &GameEvent, roll: f64) -> bool {
        match *event {
            GameEvent::GameStarted { .. } | GameEvent::GameOver { .. } => true,
            GameEvent::LinesCleared { count, .. } => {
                count >= 4 || (count > 0 && roll < self.line_clear_chance)
            }
            GameEvent::LevelUp { .. } => self.comment_on_level_up,
        }
    }

    /// Request to issue for this event, if any
    pub fn decide<R: Rng + ?Sized>(
        &self,
        event: &GameEvent,
        rng: &mut R,
    ) -> Option<CommentaryRequest> {
        let roll: f64 = rng.random();
        self.should_comment(event, roll)
            .then(|| CommentaryRequest::from_event(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear(count: u8) -> GameEvent {
        GameEvent::LinesCleared {
            count,
            points: 0,
            score: 0,
            level: 1,
            lines: count as u32,
        }
    }

    #[test]
    fn lifecycle_events_always_qualify() {
        let trigger = CommentaryTrigger {
            line_clear_chance: 0.0,
            comment_on_level_up: false,
        };
        assert!(trigger.should_comment(&GameEvent::GameStarted { episode_id: 1 }, 0.99));
        assert!(trigger.should_comment(
            &GameEvent::GameOver {
                final_score: 0,
                lines: 0,
                level: 1
            },
            0.99
        ));
        assert!(!trigger.should_comment(&GameEvent::LevelUp { level: 2 }, 0.0));
    }

    #[test]
    fn line_clears_use_the_chance_except_tetrises() {
        let trigger = CommentaryTrigger::default();
        assert!(trigger.should_comment(&clear(4), 0.99));
        assert!(trigger.should_comment(&clear(1), 0.1));
        assert!(!trigger.should_comment(&clear(1), 0.3));
        assert!(!trigger.should_comment(&clear(3), 0.8));
    }
}
