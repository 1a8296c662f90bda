use super::controller::ScreenName;
use super::level::LaunchError;
use crate::gui::OverlayError;
use std::fmt;

/// Errors returned by screen transitions. The screen is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Starting a level failed; the menu stays usable
    Launch(LaunchError),

    /// The event has no meaning on the current screen
    InvalidTransition { from: ScreenName, event: &'static str },

    /// Next level requested after the last level, or twice
    NoNextLevel,

    /// The main menu itself could not be shown
    MenuUnavailable(OverlayError),
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FlowError::Launch(e) => write!(f, "Launch failed: {}", e),
            FlowError::InvalidTransition { from, event } => {
                write!(f, "Event {} is not valid on screen {:?}", event, from)
            }
            FlowError::NoNextLevel => write!(f, "There is no next level"),
            FlowError::MenuUnavailable(e) => write!(f, "Main menu unavailable: {}", e),
        }
    }
}

impl std::error::Error for FlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlowError::Launch(e) => Some(e),
            FlowError::MenuUnavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LaunchError> for FlowError {
    fn from(error: LaunchError) -> Self {
        FlowError::Launch(error)
    }
}
