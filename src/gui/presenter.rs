//! Overlay Presenter
//!
//! Shows one overlay at a time through a [`Frontend`], with these rules:
//! - a kind that is already visible is not shown again
//! - assets that fail to load degrade only their own element
//! - the visibility flag is cleared on every exit path (button, close,
//!   frontend error, panic) before the chosen action is handed back

use super::content::{Action, ContentSpec, OverlayKind};
use super::guard::VisibilityGuard;
use super::view::{ButtonElement, CloseButton, Dismissal, Frontend, OverlayError, OverlayView, TextElement};
use crate::assets::ResourceLoader;
use slog::{Logger, error, info, o, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Result of one [`OverlayPresenter::present`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentOutcome {
    /// The kind was already visible; nothing was shown
    Suppressed,
    /// The player left through a button or the close affordance
    Chosen(Action),
    /// The overlay could not be shown or crashed while open
    Failed(OverlayError),
}

pub struct OverlayPresenter {
    loader: ResourceLoader,
    guard: VisibilityGuard,
    log: Logger,
}

impl OverlayPresenter {
    pub fn new(loader: ResourceLoader, parent_log: &Logger) -> Self {
        OverlayPresenter {
            loader,
            guard: VisibilityGuard::new(),
            log: parent_log.new(o!("system" => "overlays")),
        }
    }

    pub fn guard(&self) -> &VisibilityGuard {
        &self.guard
    }

    pub fn guard_mut(&mut self) -> &mut VisibilityGuard {
        &mut self.guard
    }

    /// Resolves the spec's assets into a view
    pub fn build_view(&mut self, kind: OverlayKind, spec: &ContentSpec) -> OverlayView {
        let title_font = self.loader.font(&spec.font.path, spec.font.title_size);
        let body_font = self.loader.font(&spec.font.path, spec.font.body_size);

        let background = spec.background.as_deref().and_then(|path| self.loader.image(path));
        let title = (!spec.title.is_empty()).then(|| TextElement {
            text: spec.title.clone(),
            font: title_font,
            color: spec.title_color,
        });
        let lines = spec
            .lines
            .iter()
            .map(|line| TextElement {
                text: line.text.clone(),
                font: body_font.clone(),
                color: line.color,
            })
            .collect();
        let buttons = spec
            .buttons
            .iter()
            .map(|button| ButtonElement {
                label: TextElement {
                    text: button.label.clone(),
                    font: body_font.clone(),
                    color: button.text_color,
                },
                image: button.image.as_deref().and_then(|path| self.loader.image(path)),
            })
            .collect();
        let close_button = spec.close_button.as_deref().map(|path| CloseButton {
            image: self.loader.image(path),
        });

        OverlayView {
            kind,
            width: spec.width,
            height: spec.height,
            background,
            title,
            lines,
            buttons,
            close_button,
        }
    }

    /// Shows `spec` modally and returns what the player chose.
    ///
    /// Returns only after the overlay is gone and its flag is cleared, so the
    /// caller can immediately present the next overlay.
    pub fn present(
        &mut self,
        kind: OverlayKind,
        spec: &ContentSpec,
        frontend: &mut dyn Frontend,
    ) -> PresentOutcome {
        if !self.guard.try_acquire(kind) {
            warn!(self.log, "Overlay already visible, ignoring show request"; "overlay" => kind.name());
            return PresentOutcome::Suppressed;
        }
        info!(self.log, "Showing overlay"; "overlay" => kind.name());

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let view = self.build_view(kind, spec);
            frontend.run_modal(&view)
        }));
        self.guard.release(kind);

        let outcome = match result {
            Ok(Ok(Dismissal::Pressed(index))) => match spec.action_of(index) {
                Some(action) => PresentOutcome::Chosen(action),
                None => PresentOutcome::Failed(OverlayError::InvalidButton(index)),
            },
            Ok(Ok(Dismissal::Closed)) => PresentOutcome::Chosen(spec.close_action),
            Ok(Err(e)) => PresentOutcome::Failed(e),
            Err(payload) => PresentOutcome::Failed(OverlayError::Panicked(panic_message(payload))),
        };

        match &outcome {
            PresentOutcome::Chosen(action) => {
                info!(self.log, "Overlay dismissed"; "overlay" => kind.name(), "action" => ?action);
            }
            PresentOutcome::Failed(e) => {
                error!(self.log, "Overlay failed"; "overlay" => kind.name(), "error" => %e);
            }
            PresentOutcome::Suppressed => {}
        }
        outcome
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
