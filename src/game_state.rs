//! Session State
//!
//! This module holds the state that survives between screens:
//! - [`GameState`]: cumulative score, unlocked achievements, progression counters
//! - [`SessionResult`]: the score/achievement bundle a finished level hands to
//!   the next results screen
//!
//! `GameState` is owned by the flow controller and lent to levels by mutable
//! reference. It has exactly one bulk mutator, [`GameState::reset_all`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Opaque identifier of an unlockable condition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementKey(String);

impl AchievementKey {
    pub fn new(key: impl Into<String>) -> Self {
        AchievementKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AchievementKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AchievementKey {
    fn from(key: &str) -> Self {
        AchievementKey::new(key)
    }
}

/// Level number, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub u32);

impl LevelId {
    pub const ONE: LevelId = LevelId(1);
    pub const TWO: LevelId = LevelId(2);
    pub const THREE: LevelId = LevelId(3);

    pub fn next(self) -> LevelId {
        LevelId(self.0 + 1)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "level {}", self.0)
    }
}

/// Result of a finished level, consumed by exactly one results screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub score: u32,
    pub achievements: BTreeSet<AchievementKey>,
    pub completed_level: LevelId,
}

impl SessionResult {
    pub fn new(completed_level: LevelId, score: u32) -> Self {
        SessionResult {
            score,
            achievements: BTreeSet::new(),
            completed_level,
        }
    }

    /// Snapshot the current session state at the end of `level`
    pub fn from_state(level: LevelId, state: &GameState) -> Self {
        SessionResult {
            score: state.score(),
            achievements: state.achievements().iter().cloned().collect(),
            completed_level: level,
        }
    }
}

/// Process-wide session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    score: u32,
    achievements: HashSet<AchievementKey>,
    extra_hearts: u32,
    levels_cleared: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Spends `points` if the score covers them
    pub fn spend_score(&mut self, points: u32) -> bool {
        if self.score < points {
            return false;
        }
        self.score -= points;
        true
    }

    pub fn achievements(&self) -> &HashSet<AchievementKey> {
        &self.achievements
    }

    pub fn has_achievement(&self, key: &AchievementKey) -> bool {
        self.achievements.contains(key)
    }

    /// Returns true if the key was newly unlocked
    pub fn unlock(&mut self, key: impl Into<AchievementKey>) -> bool {
        self.achievements.insert(key.into())
    }

    pub fn extra_hearts(&self) -> u32 {
        self.extra_hearts
    }

    pub fn add_extra_heart(&mut self) {
        self.extra_hearts += 1;
    }

    pub fn levels_cleared(&self) -> u32 {
        self.levels_cleared
    }

    pub fn record_level_cleared(&mut self) {
        self.levels_cleared += 1;
    }

    /// Clears everything back to the initial session
    pub fn reset_all(&mut self) {
        *self = GameState::default();
    }
}
