mod color;
mod frame;
mod renderer;

pub use color::{ParseColorError, Rgba};
pub use frame::Frame;
pub use renderer::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// True when either side is zero, as for a minimized window.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
