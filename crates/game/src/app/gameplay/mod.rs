mod intent;
mod render;
mod world;

#[cfg(test)]
mod replay;
#[cfg(test)]
mod tests;

use forest_engine::{Frame, Game, InputSnapshot, LoopCommand, TickError};
use tracing::{debug, info};

pub(crate) use world::{Bounds, Form, NpcBehavior, Vec2, WorldError};

use self::intent::IntentSet;
use self::world::{Entity, EntityId, WorldState};
use super::config::{GameConfig, Palette};

const PLAYER_ID: EntityId = EntityId(0);
const NPC_ID: EntityId = EntityId(1);

/// The forest scene: one shapeshifting player and one NPC.
pub(crate) struct ForestGame {
    world: WorldState,
    palette: Palette,
    base_title: String,
}

impl ForestGame {
    pub(crate) fn from_config(config: &GameConfig) -> Result<Self, WorldError> {
        let bounds = Bounds {
            width: config.window.width as f32,
            height: config.window.height as f32,
        };
        let world = WorldState::new(
            vec![
                Entity::player(PLAYER_ID, config.world.player_spawn),
                Entity::npc(NPC_ID, config.world.npc_spawn, config.world.npc_behavior),
            ],
            bounds,
            config.world.player_speed,
        )?;
        Ok(Self::new(world, config.palette, config.window.title.clone()))
    }

    fn new(world: WorldState, palette: Palette, base_title: String) -> Self {
        Self {
            world,
            palette,
            base_title,
        }
    }

    #[cfg(test)]
    fn world(&self) -> &WorldState {
        &self.world
    }
}

impl Game for ForestGame {
    fn load(&mut self) {
        let bounds = self.world.bounds();
        info!(
            entities = self.world.entities().len(),
            world_width = bounds.width,
            world_height = bounds.height,
            "world_loaded"
        );
    }

    fn tick(&mut self, input: &InputSnapshot) -> Result<LoopCommand, TickError> {
        if input.quit_requested() {
            return Ok(LoopCommand::Quit);
        }

        let intents = IntentSet::from_input(input);
        let next = self.world.advance(&intents);
        next.validate().map_err(|error| TickError::new(next.tick(), error))?;

        if let (Some(before), Some(after)) = (self.world.player(), next.player()) {
            if before.form != after.form {
                info!(tick = next.tick(), form = after.form.label(), "player_transformed");
            }
            if before.facing != after.facing {
                debug!(tick = next.tick(), facing = ?after.facing, "player_turned");
            }
        }

        self.world = next;
        Ok(LoopCommand::Continue)
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        render::draw_world(&self.world, &self.palette, frame);
    }

    fn unload(&mut self) {
        info!(tick = self.world.tick(), "world_unloaded");
    }

    fn title(&self) -> Option<String> {
        let form = self.world.player()?.form;
        Some(format!("{} [{}]", self.base_title, form.label()))
    }
}
