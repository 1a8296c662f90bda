//! Overlay geometry and button selection
//!
//! Pure computations over pixel sizes, kept apart from the SDL calls so they
//! can be tested without a window.

use sdl2::pixels::Color;
use sdl2::rect::Rect;

/// Appearance of overlay panels
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    /// Backdrop darkness behind panels smaller than the window (0-255)
    pub overlay_alpha: u8,

    /// Panel fill when there is no background image
    pub panel_color: Color,

    pub border_color: Color,

    /// Draws a double border if > 1
    pub border_thickness: u32,

    /// Button fill when the button image is missing
    pub button_color: Color,

    /// Outline around the selected button
    pub highlight_color: Color,

    pub button_width: u32,
    pub button_height: u32,

    /// Gap between the panel edge and its contents
    pub padding: u32,

    /// Vertical gap between rows
    pub spacing: u32,

    pub close_size: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        OverlayStyle {
            overlay_alpha: 180,
            panel_color: Color::RGB(222, 196, 150),
            border_color: Color::RGB(100, 70, 40),
            border_thickness: 2,
            button_color: Color::RGB(120, 170, 90),
            highlight_color: Color::RGB(255, 255, 255),
            button_width: 260,
            button_height: 56,
            padding: 30,
            spacing: 14,
            close_size: 32,
        }
    }
}

/// Where everything of one overlay goes, in window coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub panel: Rect,
    /// Top edge of the title row
    pub title_y: Option<i32>,
    /// Top edge of each text line
    pub line_ys: Vec<i32>,
    pub buttons: Vec<Rect>,
    pub close: Option<Rect>,
}

/// What a pointer position lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Button(usize),
    Close,
}

impl Layout {
    /// Lays out a panel of `panel_size` centered in `window`.
    ///
    /// The panel is clamped to the window. Rows stack top to bottom: title,
    /// text lines, then buttons centered horizontally.
    pub fn compute(
        style: &OverlayStyle,
        window: (u32, u32),
        panel_size: (u32, u32),
        title_height: Option<u32>,
        line_heights: &[u32],
        button_count: usize,
        has_close: bool,
    ) -> Layout {
        let width = panel_size.0.min(window.0).max(1);
        let height = panel_size.1.min(window.1).max(1);
        let panel = Rect::new(
            (window.0.saturating_sub(width) / 2) as i32,
            (window.1.saturating_sub(height) / 2) as i32,
            width,
            height,
        );

        let mut y = panel.y() + style.padding as i32;
        let title_y = title_height.map(|h| {
            let top = y;
            y += (h + style.spacing * 2) as i32;
            top
        });

        let line_ys = line_heights
            .iter()
            .map(|&h| {
                let top = y;
                y += (h + style.spacing) as i32;
                top
            })
            .collect();

        if !line_heights.is_empty() {
            y += style.spacing as i32;
        }

        let button_width = style
            .button_width
            .min(width.saturating_sub(style.padding * 2))
            .max(1);
        let button_x = panel.x() + ((width - button_width) / 2) as i32;
        let buttons = (0..button_count)
            .map(|_| {
                let rect = Rect::new(button_x, y, button_width, style.button_height);
                y += (style.button_height + style.spacing) as i32;
                rect
            })
            .collect();

        let close = has_close.then(|| {
            let size = style.close_size;
            let inset = (style.padding / 3) as i32;
            Rect::new(
                panel.right() - size as i32 - inset,
                panel.y() + inset,
                size,
                size,
            )
        });

        Layout {
            panel,
            title_y,
            line_ys,
            buttons,
            close,
        }
    }

    /// The close button wins over a button it overlaps
    pub fn hit(&self, x: i32, y: i32) -> Option<Hit> {
        if self.close.is_some_and(|r| r.contains_point((x, y))) {
            return Some(Hit::Close);
        }
        self.buttons
            .iter()
            .position(|r| r.contains_point((x, y)))
            .map(Hit::Button)
    }

    /// Left edge that centers an item of `width` in the panel
    pub fn centered_x(&self, width: u32) -> i32 {
        self.panel.x() + (self.panel.width() as i32 - width as i32) / 2
    }
}

/// Keyboard selection over a row of buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    count: usize,
    selected: usize,
}

impl Selection {
    pub fn new(count: usize) -> Self {
        Selection { count, selected: 0 }
    }

    /// `None` when there are no buttons
    pub fn index(&self) -> Option<usize> {
        (self.count > 0).then_some(self.selected)
    }

    /// Move selection up (wraps to bottom)
    pub fn select_previous(&mut self) {
        if self.count == 0 {
            return;
        }
        if self.selected == 0 {
            self.selected = self.count - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Move selection down (wraps to top)
    pub fn select_next(&mut self) {
        if self.count == 0 {
            return;
        }
        self.selected = (self.selected + 1) % self.count;
    }

    pub fn select(&mut self, index: usize) {
        if index < self.count {
            self.selected = index;
        }
    }
}
