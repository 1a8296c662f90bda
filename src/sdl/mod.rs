//! SDL2 Frontend
//!
//! Shows overlays in the game window and hosts the demo levels the binary
//! runs between them.
//!
//! # Architecture
//!
//! - `layout`: panel geometry and button selection (no SDL calls)
//! - `textures`: uploads decoded images and rasterized text as textures
//! - `frontend`: [`SdlFrontend`], the modal loop behind [`Frontend`](crate::gui::Frontend)
//! - `demo`: [`DemoLauncher`], keyboard-driven stand-in levels
//!
//! The window, renderer and event pump live in one [`Display`] shared by the
//! frontend and the levels. Only one of them runs at a time.
//!
//! # Example Usage
//!
//! ```no_run
//! use sky_battle::config::WindowConfig;
//! use sky_battle::logging;
//! use sky_battle::sdl::{Display, SdlFrontend};
//!
//! let sdl_context = sdl2::init().unwrap();
//! let display = Display::open(&sdl_context, &WindowConfig::default()).unwrap().shared();
//! let frontend = SdlFrontend::new(display.clone(), &logging::discard());
//! ```

pub mod demo;
pub mod frontend;
pub mod layout;
pub mod textures;

pub use demo::{DemoLauncher, DemoPlan};
pub use frontend::SdlFrontend;
pub use layout::{Hit, Layout, OverlayStyle, Selection};

use crate::config::WindowConfig;
use sdl2::EventPump;
use sdl2::Sdl;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedDisplay = Rc<RefCell<Display>>;

/// The game window and everything needed to draw into it
pub struct Display {
    pub canvas: Canvas<Window>,
    pub texture_creator: TextureCreator<WindowContext>,
    pub event_pump: EventPump,
    /// Set once the window has been asked to close
    pub quit_requested: bool,
}

impl Display {
    pub fn open(sdl_context: &Sdl, config: &WindowConfig) -> Result<Self, String> {
        let video_subsystem = sdl_context.video()?;
        let window = video_subsystem
            .window(&config.title, config.width, config.height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok(Display {
            canvas,
            texture_creator,
            event_pump,
            quit_requested: false,
        })
    }

    pub fn shared(self) -> SharedDisplay {
        Rc::new(RefCell::new(self))
    }

    pub fn size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }
}
