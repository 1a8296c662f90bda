//! Texture uploads for images and rasterized text

use crate::assets::{Image, TextBitmap};
use crate::config::Rgb;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

/// R, G, B, A byte order on little-endian targets
const RGBA_FORMAT: PixelFormatEnum = PixelFormatEnum::ABGR8888;

/// A texture and the size it was created with
pub struct SizedTexture<'a> {
    pub texture: Texture<'a>,
    pub width: u32,
    pub height: u32,
}

/// Colors a coverage mask, coverage becoming alpha
pub fn text_pixels(bitmap: &TextBitmap, color: Rgb) -> Vec<u8> {
    let Rgb(r, g, b) = color;
    bitmap
        .coverage
        .iter()
        .flat_map(|&alpha| [r, g, b, alpha])
        .collect()
}

pub fn rgba_texture<'a>(
    texture_creator: &'a TextureCreator<WindowContext>,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<SizedTexture<'a>, String> {
    let mut texture = texture_creator
        .create_texture_static(RGBA_FORMAT, width, height)
        .map_err(|e| e.to_string())?;
    texture
        .update(None, pixels, (width * 4) as usize)
        .map_err(|e| e.to_string())?;
    texture.set_blend_mode(BlendMode::Blend);
    Ok(SizedTexture {
        texture,
        width,
        height,
    })
}

pub fn image_texture<'a>(
    texture_creator: &'a TextureCreator<WindowContext>,
    image: &Image,
) -> Result<SizedTexture<'a>, String> {
    rgba_texture(texture_creator, image.width(), image.height(), image.pixels())
}

pub fn text_texture<'a>(
    texture_creator: &'a TextureCreator<WindowContext>,
    bitmap: &TextBitmap,
    color: Rgb,
) -> Result<SizedTexture<'a>, String> {
    rgba_texture(
        texture_creator,
        bitmap.width,
        bitmap.height,
        &text_pixels(bitmap, color),
    )
}

/// Copies whatever is currently on the canvas, for drawing under a panel
pub fn snapshot<'a>(
    canvas: &Canvas<Window>,
    texture_creator: &'a TextureCreator<WindowContext>,
) -> Option<SizedTexture<'a>> {
    let (width, height) = canvas.output_size().ok()?;
    let pixels = canvas.read_pixels(None, RGBA_FORMAT).ok()?;
    rgba_texture(texture_creator, width, height, &pixels).ok()
}
