//! Screen Flow
//!
//! Drives the game from screen to screen: main menu, instructions, levels,
//! results screens and the shop.
//!
//! # Architecture
//!
//! - `controller`: [`ScreenFlowController`], the transition table and run loop
//! - `level`: the [`LevelController`] / [`LevelLauncher`] seam to gameplay
//! - `error`: [`FlowError`]
//!
//! # Example Usage
//!
//! ```ignore
//! let presenter = OverlayPresenter::new(loader, &log);
//! let mut flow = ScreenFlowController::new(config, presenter, Box::new(launcher), &log);
//! flow.run(&mut frontend)?; // returns when the player quits
//! ```

pub mod controller;
pub mod error;
pub mod level;

pub use controller::{
    FlowEvent, OVERLAY_ATTEMPTS, Screen, ScreenFlowController, ScreenName, WinContext,
};
pub use error::FlowError;
pub use level::{LaunchError, LevelController, LevelLauncher, LevelOutcome, NextLevel};
