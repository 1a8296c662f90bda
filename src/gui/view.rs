//! Built overlay views and the frontend seam
//!
//! An [`OverlayView`] is a [`ContentSpec`](super::ContentSpec) with its
//! assets resolved: fonts loaded (or defaulted), images decoded (or dropped).
//! A [`Frontend`] shows it modally and reports how the player left it.

use super::content::OverlayKind;
use crate::assets::{Font, Image};
use crate::config::Rgb;
use std::fmt;

#[derive(Debug, Clone)]
pub struct TextElement {
    pub text: String,
    pub font: Font,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
pub struct ButtonElement {
    pub label: TextElement,
    /// Missing when the button image failed to load
    pub image: Option<Image>,
}

#[derive(Debug, Clone)]
pub struct CloseButton {
    pub image: Option<Image>,
}

#[derive(Debug, Clone)]
pub struct OverlayView {
    pub kind: OverlayKind,
    pub width: u32,
    pub height: u32,
    pub background: Option<Image>,
    pub title: Option<TextElement>,
    pub lines: Vec<TextElement>,
    pub buttons: Vec<ButtonElement>,
    pub close_button: Option<CloseButton>,
}

/// How the player left an overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// Index into the view's buttons
    Pressed(usize),
    /// Close button, Escape, or a window close request
    Closed,
}

/// Errors raised while showing an overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// The frontend failed to draw or service the overlay
    Render(String),

    /// Building or running the overlay panicked
    Panicked(String),

    /// The frontend reported a button that does not exist
    InvalidButton(usize),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OverlayError::Render(msg) => write!(f, "Render error: {}", msg),
            OverlayError::Panicked(msg) => write!(f, "Overlay panicked: {}", msg),
            OverlayError::InvalidButton(index) => write!(f, "Invalid button index: {}", index),
        }
    }
}

impl std::error::Error for OverlayError {}

impl From<String> for OverlayError {
    fn from(msg: String) -> Self {
        OverlayError::Render(msg)
    }
}

/// Renders overlays and owns the application window
pub trait Frontend {
    /// Shows `view` with exclusive input until the player dismisses it
    fn run_modal(&mut self, view: &OverlayView) -> Result<Dismissal, OverlayError>;

    /// Resizes the owning window
    fn resize_owner(&mut self, width: u32, height: u32);
}
