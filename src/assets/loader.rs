//! Best-effort asset loading
//!
//! [`ResourceLoader`] never fails past its own boundary: a missing or
//! undecodable font becomes the system default at the requested size, a
//! missing image becomes `None`. Results are cached per path (and per size
//! for fonts), failures included, so the same path always yields the same
//! resource for the lifetime of the loader.

use super::{AssetError, Font, Image};
use ab_glyph::FontArc;
use slog::{Logger, debug, o, warn};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Font,
    Image,
}

/// What [`ResourceLoader::load`] hands back
#[derive(Debug, Clone)]
pub enum Resource {
    Font(Font),
    /// Absent when the image could not be loaded
    Image(Option<Image>),
}

pub struct ResourceLoader {
    root: PathBuf,
    faces: HashMap<String, Option<FontArc>>,
    images: HashMap<String, Option<Image>>,
    log: Logger,
}

impl ResourceLoader {
    /// Creates a loader resolving logical paths under `root`
    pub fn new(root: impl Into<PathBuf>, parent_log: &Logger) -> Self {
        ResourceLoader {
            root: root.into(),
            faces: HashMap::new(),
            images: HashMap::new(),
            log: parent_log.new(o!("system" => "resources")),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Untyped entry point; `size` is ignored for images
    pub fn load(&mut self, kind: AssetKind, path: &str, size: u16) -> Resource {
        match kind {
            AssetKind::Font => Resource::Font(self.font(path, size)),
            AssetKind::Image => Resource::Image(self.image(path)),
        }
    }

    /// Loads the face at `path`, or the system default font at `size`
    pub fn font(&mut self, path: &str, size: u16) -> Font {
        if !self.faces.contains_key(path) {
            let face = match self.try_face(path) {
                Ok(face) => {
                    debug!(self.log, "Loaded font"; "path" => path);
                    Some(face)
                }
                Err(e) => {
                    warn!(self.log, "Using default font"; "path" => path, "error" => %e);
                    None
                }
            };
            self.faces.insert(path.to_string(), face);
        }

        match self.faces.get(path) {
            Some(Some(face)) => Font::true_type(path, face.clone(), size),
            _ => Font::system_default(size),
        }
    }

    /// Loads the image at `path`; `None` means callers skip drawing it
    pub fn image(&mut self, path: &str) -> Option<Image> {
        if let Some(cached) = self.images.get(path) {
            return cached.clone();
        }

        let image = match self.try_image(path) {
            Ok(image) => {
                debug!(self.log, "Loaded image";
                    "path" => path, "width" => image.width(), "height" => image.height());
                Some(image)
            }
            Err(e) => {
                warn!(self.log, "Skipping image"; "path" => path, "error" => %e);
                None
            }
        };
        self.images.insert(path.to_string(), image.clone());
        image
    }

    /// Uncached, fallible font load
    pub fn try_font(&self, path: &str, size: u16) -> Result<Font, AssetError> {
        Ok(Font::true_type(path, self.try_face(path)?, size))
    }

    /// Uncached, fallible image load
    pub fn try_image(&self, path: &str) -> Result<Image, AssetError> {
        let bytes = self.read(path)?;
        Image::decode(path, &bytes)
    }

    fn try_face(&self, path: &str) -> Result<FontArc, AssetError> {
        let bytes = self.read(path)?;
        FontArc::try_from_vec(bytes).map_err(|e| AssetError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        fs::read(self.resolve(path)).map_err(|source| AssetError::Io {
            path: path.to_string(),
            source,
        })
    }
}
