//! Modal Overlay System
//!
//! Full-screen modal views (main menu, instructions, results screens, shop)
//! that block the game window until the player picks an action.
//!
//! # Architecture
//!
//! - `content`: declarative [`ContentSpec`] builders, one per overlay
//! - `guard`: [`VisibilityGuard`], at most one visible overlay per kind
//! - `view`: resolved [`OverlayView`] and the [`Frontend`] trait that shows it
//! - `presenter`: [`OverlayPresenter`], which ties the three together
//!
//! # Example Usage
//!
//! ```ignore
//! let spec = content::end_screen(&config, &result);
//! match presenter.present(OverlayKind::EndScreen, &spec, &mut frontend) {
//!     PresentOutcome::Chosen(Action::ReturnToMenu) => { /* ... */ }
//!     PresentOutcome::Suppressed => { /* already showing */ }
//!     _ => {}
//! }
//! ```

pub mod content;
pub mod guard;
pub mod presenter;
pub mod view;

pub use content::{Action, ButtonSpec, ContentSpec, FontSpec, OverlayKind, TextLine, WinVariant};
pub use guard::VisibilityGuard;
pub use presenter::{OverlayPresenter, PresentOutcome};
pub use view::{ButtonElement, CloseButton, Dismissal, Frontend, OverlayError, OverlayView, TextElement};
