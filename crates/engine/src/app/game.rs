use std::error::Error as StdError;

use thiserror::Error;

use super::{Frame, InputSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCommand {
    Continue,
    Quit,
}

/// A tick that did not complete. The loop logs it and runs the next tick.
#[derive(Debug, Error)]
#[error("tick {tick} failed: {source}")]
pub struct TickError {
    pub tick: u64,
    #[source]
    pub source: Box<dyn StdError + Send + Sync + 'static>,
}

impl TickError {
    pub fn new(tick: u64, source: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self {
            tick,
            source: source.into(),
        }
    }
}

/// The seam between the host loop and game logic.
///
/// `tick` is the only place game state may change. `draw` receives a shared
/// reference and must repaint the entire frame from that state.
pub trait Game {
    fn load(&mut self) {}
    fn tick(&mut self, input: &InputSnapshot) -> Result<LoopCommand, TickError>;
    fn draw(&self, frame: &mut Frame<'_>);
    fn unload(&mut self) {}
    fn title(&self) -> Option<String> {
        None
    }
}

pub(crate) struct GameRuntime {
    game: Box<dyn Game>,
    is_loaded: bool,
}

impl GameRuntime {
    pub(crate) fn new(game: Box<dyn Game>) -> Self {
        Self {
            game,
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.game.load();
        self.is_loaded = true;
    }

    pub(crate) fn tick(&mut self, input: &InputSnapshot) -> Result<LoopCommand, TickError> {
        self.game.tick(input)
    }

    pub(crate) fn game(&self) -> &dyn Game {
        self.game.as_ref()
    }

    pub(crate) fn title(&self) -> Option<String> {
        self.game.title()
    }

    pub(crate) fn shutdown(&mut self) {
        if self.is_loaded {
            self.game.unload();
            self.is_loaded = false;
        }
    }
}
