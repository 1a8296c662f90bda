//! Interfaces to the gameplay side
//!
//! Levels run their own simulation and report back through
//! [`LevelOutcome`]. The flow controller only launches them, lends them the
//! session state and reacts to how they ended.

use crate::game_state::{GameState, LevelId, SessionResult};
use std::fmt;

/// Builds the level after a won one. Called at most once, from the win screen.
pub type NextLevel = Box<dyn FnOnce() -> Result<Box<dyn LevelController>, LaunchError>>;

/// How a level ended
pub enum LevelOutcome {
    Won {
        result: SessionResult,
        /// `None` for the last level
        next_level: Option<NextLevel>,
    },
    Lost(SessionResult),
    /// The window was closed mid-level
    Abandoned,
}

impl fmt::Debug for LevelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LevelOutcome::Won { result, next_level } => f
                .debug_struct("Won")
                .field("result", result)
                .field("has_next_level", &next_level.is_some())
                .finish(),
            LevelOutcome::Lost(result) => f.debug_tuple("Lost").field(result).finish(),
            LevelOutcome::Abandoned => f.write_str("Abandoned"),
        }
    }
}

/// A level in progress
pub trait LevelController {
    fn level_id(&self) -> LevelId;

    /// Runs the level to completion, mutating the shared session state
    fn play(&mut self, state: &mut GameState) -> LevelOutcome;
}

/// Starts a new game from the main menu
pub trait LevelLauncher {
    fn launch_game(&mut self) -> Result<Box<dyn LevelController>, LaunchError>;
}

/// Errors raised while constructing a level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// The level could not be built
    Construction(String),

    /// No level is registered under this id
    MissingLevel(LevelId),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LaunchError::Construction(msg) => write!(f, "Failed to construct level: {}", msg),
            LaunchError::MissingLevel(level) => write!(f, "No such level: {}", level),
        }
    }
}

impl std::error::Error for LaunchError {}
