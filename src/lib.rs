//! Sky Battle screen flow
//!
//! The overlay and screen-transition layer of a small arcade shooter: main
//! menu, instructions, win and game-over screens, the shop, and the state
//! machine that moves the player between them and the levels.
//!
//! # Architecture
//!
//! - `game_state`: session score, achievements and extra hearts
//! - `config`: screen texts, asset paths and per-level variants (JSON)
//! - `logging`: slog root logger setup
//! - `assets`: font and image loading with fallbacks
//! - `achievements`: achievement lines for the results screens
//! - `gui`: overlay content, visibility guard and presenter
//! - `flow`: the screen flow controller and the level seam
//! - `sdl`: SDL2 frontend and demo levels

pub mod achievements;
pub mod assets;
pub mod config;
pub mod flow;
pub mod game_state;
pub mod gui;
pub mod logging;
pub mod sdl;
