use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use winit::window::Window;

use crate::app::Game;

use super::{Frame, Viewport};

/// Owns the drawing surface. The only place the frame buffer is mutated.
pub struct Renderer {
    pixels: Pixels<'static>,
    canvas: Viewport,
    surface: Viewport,
}

impl Renderer {
    /// Creates a surface for `window` backed by a `canvas_width` x
    /// `canvas_height` buffer. The buffer is scaled to fit the window.
    pub fn new(window: Arc<Window>, canvas_width: u32, canvas_height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = Viewport {
            width: size.width,
            height: size.height,
        };
        let texture = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(canvas_width, canvas_height, texture)?;
        Ok(Self {
            pixels,
            canvas: Viewport {
                width: canvas_width,
                height: canvas_height,
            },
            surface,
        })
    }

    /// Resizes the surface only. A zero-sized window (minimized) is recorded
    /// so `render` skips presenting until the window comes back.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        let surface = Viewport { width, height };
        if !surface.is_empty() {
            self.pixels.resize_surface(width, height)?;
        }
        self.surface = surface;
        Ok(())
    }

    /// Repaints the whole buffer from `game` and presents it.
    pub fn render(&mut self, game: &dyn Game) -> Result<(), Error> {
        if self.surface.is_empty() {
            return Ok(());
        }
        let mut frame = Frame::new(
            self.pixels.frame_mut(),
            self.canvas.width,
            self.canvas.height,
        );
        game.draw(&mut frame);
        self.pixels.render()
    }
}
