use super::AssetError;
use std::fmt;
use std::sync::Arc;

/// Decoded image, RGBA8 row-major
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    source: String,
    width: u32,
    height: u32,
    pixels: Arc<Vec<u8>>,
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Image({} {}x{})", self.source, self.width, self.height)
    }
}

impl Image {
    /// Decodes PNG or JPEG bytes; `source` names the asset in errors
    pub fn decode(source: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
            path: source.to_string(),
            message: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        Ok(Image {
            source: source.to_string(),
            width: rgba.width(),
            height: rgba.height(),
            pixels: Arc::new(rgba.into_raw()),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
