//! Asset Loading
//!
//! Fonts and images for the overlays, loaded through [`ResourceLoader`].
//!
//! # Architecture
//!
//! - `loader`: cached, never-failing loads with logged fallbacks
//! - `font`: TrueType faces (ab_glyph) and the built-in 5x7 bitmap face
//! - `images`: decoded RGBA images (image crate)
//!
//! # Example Usage
//!
//! ```no_run
//! use sky_battle::assets::ResourceLoader;
//! use sky_battle::logging;
//!
//! let mut loader = ResourceLoader::new("assets", &logging::discard());
//! let title_font = loader.font("fonts/pixelFont.ttf", 40); // default face if missing
//! if let Some(background) = loader.image("images/pause.png") {
//!     println!("{}x{}", background.width(), background.height());
//! }
//! ```

pub mod font;
pub mod images;
pub mod loader;

pub use font::{Font, TextBitmap};
pub use images::Image;
pub use loader::{AssetKind, Resource, ResourceLoader};

use std::fmt;

/// Errors that can occur while loading an asset
#[derive(Debug)]
pub enum AssetError {
    /// The file could not be read
    Io { path: String, source: std::io::Error },

    /// The bytes are not a usable font or image
    Decode { path: String, message: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssetError::Io { path, source } => write!(f, "Failed to read {}: {}", path, source),
            AssetError::Decode { path, message } => {
                write!(f, "Failed to decode {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            AssetError::Decode { .. } => None,
        }
    }
}
