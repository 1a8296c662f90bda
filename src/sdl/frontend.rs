//! Modal overlay loop
//!
//! Each [`SdlFrontend::run_modal`] call owns the window's input until the
//! player leaves the overlay:
//! - Up/Down move the selection (wrapping), Enter or Space press it
//! - clicking a button presses it; hovering selects it
//! - Escape, the close button or closing the window dismiss the overlay
//!
//! Once the window has been asked to close, every later overlay is dismissed
//! immediately so the flow can wind down.

use super::layout::{Hit, Layout, OverlayStyle, Selection};
use super::textures::{self, SizedTexture};
use super::{Display, SharedDisplay};
use crate::assets::Image;
use crate::gui::{Dismissal, Frontend, OverlayError, OverlayView, TextElement};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use slog::{Logger, debug, o, warn};
use std::thread;
use std::time::Duration;

/// About 60 frames per second
const FRAME_DELAY: Duration = Duration::from_millis(16);

pub struct SdlFrontend {
    display: SharedDisplay,
    style: OverlayStyle,
    log: Logger,
}

impl SdlFrontend {
    pub fn new(display: SharedDisplay, parent_log: &Logger) -> Self {
        Self::with_style(display, OverlayStyle::default(), parent_log)
    }

    pub fn with_style(display: SharedDisplay, style: OverlayStyle, parent_log: &Logger) -> Self {
        SdlFrontend {
            display,
            style,
            log: parent_log.new(o!("system" => "sdl_frontend")),
        }
    }
}

impl Frontend for SdlFrontend {
    fn run_modal(&mut self, view: &OverlayView) -> Result<Dismissal, OverlayError> {
        let mut display = self.display.borrow_mut();
        let Display {
            canvas,
            texture_creator,
            event_pump,
            quit_requested,
        } = &mut *display;
        if *quit_requested {
            return Ok(Dismissal::Closed);
        }

        let backdrop = textures::snapshot(canvas, texture_creator);
        let textures = OverlayTextures::build(texture_creator, view, &self.log);
        let line_heights: Vec<u32> = textures
            .lines
            .iter()
            .map(|line| line.as_ref().map_or(0, |t| t.height))
            .collect();
        let layout = Layout::compute(
            &self.style,
            canvas.window().size(),
            (view.width, view.height),
            textures.title.as_ref().map(|t| t.height),
            &line_heights,
            view.buttons.len(),
            view.close_button.is_some(),
        );
        let mut selection = Selection::new(view.buttons.len());

        loop {
            for event in event_pump.poll_iter() {
                match event {
                    Event::Quit { .. } => {
                        debug!(self.log, "Window close requested"; "overlay" => view.kind.name());
                        *quit_requested = true;
                        return Ok(Dismissal::Closed);
                    }
                    Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => return Ok(Dismissal::Closed),
                    Event::KeyDown {
                        keycode: Some(Keycode::Up),
                        ..
                    } => selection.select_previous(),
                    Event::KeyDown {
                        keycode: Some(Keycode::Down),
                        ..
                    } => selection.select_next(),
                    Event::KeyDown {
                        keycode: Some(Keycode::Return | Keycode::Space),
                        ..
                    } => {
                        return Ok(selection.index().map_or(Dismissal::Closed, Dismissal::Pressed));
                    }
                    Event::MouseMotion { x, y, .. } => {
                        if let Some(Hit::Button(index)) = layout.hit(x, y) {
                            selection.select(index);
                        }
                    }
                    Event::MouseButtonDown {
                        mouse_btn: MouseButton::Left,
                        x,
                        y,
                        ..
                    } => match layout.hit(x, y) {
                        Some(Hit::Button(index)) => return Ok(Dismissal::Pressed(index)),
                        Some(Hit::Close) => return Ok(Dismissal::Closed),
                        None => {}
                    },
                    _ => {}
                }
            }

            draw(
                canvas,
                &self.style,
                &layout,
                &textures,
                backdrop.as_ref(),
                selection.index(),
            )?;
            canvas.present();
            thread::sleep(FRAME_DELAY);
        }
    }

    fn resize_owner(&mut self, width: u32, height: u32) {
        let mut display = self.display.borrow_mut();
        if let Err(e) = display.canvas.window_mut().set_size(width, height) {
            warn!(self.log, "Failed to resize window"; "width" => width, "height" => height, "error" => %e);
        }
    }
}

/// Everything of one view uploaded to the GPU
struct OverlayTextures<'a> {
    background: Option<SizedTexture<'a>>,
    title: Option<SizedTexture<'a>>,
    lines: Vec<Option<SizedTexture<'a>>>,
    buttons: Vec<ButtonTextures<'a>>,
    close: Option<SizedTexture<'a>>,
}

struct ButtonTextures<'a> {
    image: Option<SizedTexture<'a>>,
    label: Option<SizedTexture<'a>>,
}

impl<'a> OverlayTextures<'a> {
    /// A failed upload drops only its own element
    fn build(
        texture_creator: &'a TextureCreator<WindowContext>,
        view: &OverlayView,
        log: &Logger,
    ) -> Self {
        let upload = |what: &str, result: Result<SizedTexture<'a>, String>| match result {
            Ok(texture) => Some(texture),
            Err(e) => {
                warn!(log, "Texture upload failed"; "element" => what, "error" => %e);
                None
            }
        };
        let text = |what: &str, element: &TextElement| {
            let bitmap = element.font.rasterize(&element.text);
            upload(what, textures::text_texture(texture_creator, &bitmap, element.color))
        };
        let picture = |what: &str, image: &Image| {
            upload(what, textures::image_texture(texture_creator, image))
        };

        OverlayTextures {
            background: view.background.as_ref().and_then(|bg| picture("background", bg)),
            title: view.title.as_ref().and_then(|title| text("title", title)),
            lines: view.lines.iter().map(|line| text("line", line)).collect(),
            buttons: view
                .buttons
                .iter()
                .map(|button| ButtonTextures {
                    image: button.image.as_ref().and_then(|img| picture("button", img)),
                    label: text("button label", &button.label),
                })
                .collect(),
            close: view
                .close_button
                .as_ref()
                .and_then(|close| close.image.as_ref())
                .and_then(|img| picture("close button", img)),
        }
    }
}

fn copy_at(canvas: &mut Canvas<Window>, texture: &SizedTexture, x: i32, y: i32) -> Result<(), String> {
    canvas.copy(&texture.texture, None, Rect::new(x, y, texture.width, texture.height))
}

fn draw(
    canvas: &mut Canvas<Window>,
    style: &OverlayStyle,
    layout: &Layout,
    textures: &OverlayTextures,
    backdrop: Option<&SizedTexture>,
    selected: Option<usize>,
) -> Result<(), String> {
    canvas.set_draw_color(Color::RGB(0, 0, 0));
    canvas.clear();

    // 1. Whatever was on screen before, dimmed unless the panel covers it
    let (screen_width, screen_height) = canvas.window().size();
    let covers_screen = layout.panel.width() >= screen_width && layout.panel.height() >= screen_height;
    if !covers_screen {
        if let Some(backdrop) = backdrop {
            canvas.copy(&backdrop.texture, None, None)?;
        }
        canvas.set_blend_mode(BlendMode::Blend);
        canvas.set_draw_color(Color::RGBA(0, 0, 0, style.overlay_alpha));
        canvas.fill_rect(None)?;
        canvas.set_blend_mode(BlendMode::None);
    }

    // 2. Panel
    match &textures.background {
        Some(background) => canvas.copy(&background.texture, None, layout.panel)?,
        None => {
            canvas.set_draw_color(style.panel_color);
            canvas.fill_rect(layout.panel)?;
        }
    }
    if !covers_screen {
        let panel = layout.panel;
        canvas.set_draw_color(style.border_color);
        canvas.draw_rect(panel)?;
        if style.border_thickness > 1 && panel.width() > 4 && panel.height() > 4 {
            canvas.draw_rect(Rect::new(
                panel.x() + 2,
                panel.y() + 2,
                panel.width() - 4,
                panel.height() - 4,
            ))?;
        }
    }

    // 3. Title and lines, centered
    if let (Some(title), Some(y)) = (&textures.title, layout.title_y) {
        copy_at(canvas, title, layout.centered_x(title.width), y)?;
    }
    for (line, &y) in textures.lines.iter().zip(&layout.line_ys) {
        if let Some(line) = line {
            copy_at(canvas, line, layout.centered_x(line.width), y)?;
        }
    }

    // 4. Buttons
    for (i, (button, rect)) in textures.buttons.iter().zip(&layout.buttons).enumerate() {
        match &button.image {
            Some(image) => canvas.copy(&image.texture, None, *rect)?,
            None => {
                canvas.set_draw_color(style.button_color);
                canvas.fill_rect(*rect)?;
            }
        }
        if selected == Some(i) {
            canvas.set_draw_color(style.highlight_color);
            canvas.draw_rect(*rect)?;
            canvas.draw_rect(Rect::new(
                rect.x() + 1,
                rect.y() + 1,
                rect.width().saturating_sub(2),
                rect.height().saturating_sub(2),
            ))?;
        }
        if let Some(label) = &button.label {
            let x = rect.x() + (rect.width() as i32 - label.width as i32) / 2;
            let y = rect.y() + (rect.height() as i32 - label.height as i32) / 2;
            copy_at(canvas, label, x, y)?;
        }
    }

    // 5. Close button, drawn as a cross when its image is missing
    if let Some(rect) = layout.close {
        match &textures.close {
            Some(image) => canvas.copy(&image.texture, None, rect)?,
            None => {
                canvas.set_draw_color(style.border_color);
                canvas.draw_rect(rect)?;
                canvas.draw_line(
                    Point::new(rect.left() + 6, rect.top() + 6),
                    Point::new(rect.right() - 7, rect.bottom() - 7),
                )?;
                canvas.draw_line(
                    Point::new(rect.right() - 7, rect.top() + 6),
                    Point::new(rect.left() + 6, rect.bottom() - 7),
                )?;
            }
        }
    }

    Ok(())
}
