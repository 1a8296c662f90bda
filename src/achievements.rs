//! Achievement gating for results screens
//!
//! Pure queries over [`GameState`]. Lines are appended in rule order, never
//! in set iteration order, so the same unlocks always render the same way.
//! No placeholder line is added when nothing is unlocked; only the end
//! screen shows a negative message, and it does so on its own.

use crate::config::AchievementRule;
use crate::game_state::{AchievementKey, GameState};
use crate::gui::content::TextLine;

pub fn is_unlocked(state: &GameState, key: &AchievementKey) -> bool {
    state.has_achievement(key)
}

/// Appends one line per unlocked rule, in rule order
pub fn decorate(
    mut lines: Vec<TextLine>,
    state: &GameState,
    rules: &[AchievementRule],
) -> Vec<TextLine> {
    lines.extend(
        rules
            .iter()
            .filter(|rule| is_unlocked(state, &rule.key))
            .map(|rule| TextLine::new(rule.label.as_str(), rule.color)),
    );
    lines
}
