use serde::Deserialize;
use thiserror::Error;

use super::intent::{Intent, IntentSet};

pub(crate) const PLAYER_RADIUS: f32 = 30.0;
pub(crate) const NPC_SIZE: f32 = 40.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Vec2 {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Vec2 {
    pub(crate) const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub(crate) const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EntityId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Form {
    PlayerBase,
    PlayerAlt,
    Npc,
}

impl Form {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Form::PlayerBase => "base form",
            Form::PlayerAlt => "alt form",
            Form::Npc => "npc",
        }
    }

    /// Whether the shape anchored at `position` lies inside `bounds`, so that
    /// clamping leaves it where it is.
    pub(crate) fn fits(self, position: Vec2, bounds: Bounds) -> bool {
        let (min, max) = self.extent();
        position.is_finite()
            && (-min.x..=bounds.width - max.x).contains(&position.x)
            && (-min.y..=bounds.height - max.y).contains(&position.y)
    }

    /// Offsets of the drawn shape relative to the entity position.
    fn extent(self) -> (Vec2, Vec2) {
        match self {
            Form::PlayerBase | Form::PlayerAlt => (
                Vec2::new(-PLAYER_RADIUS, -PLAYER_RADIUS),
                Vec2::new(PLAYER_RADIUS, PLAYER_RADIUS),
            ),
            Form::Npc => (Vec2::ZERO, Vec2::new(NPC_SIZE, NPC_SIZE)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Facing {
    Left,
    Right,
}

/// A pair of forms an entity can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Shapeshift {
    pub(crate) base: Form,
    pub(crate) alt: Form,
}

impl Shapeshift {
    fn toggled(self, current: Form) -> Form {
        if current == self.alt {
            self.base
        } else {
            self.alt
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub(crate) enum NpcBehavior {
    #[default]
    Idle,
    /// Step toward the player by at most `speed` pixels per axis per tick.
    Follow { speed: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) position: Vec2,
    pub(crate) form: Form,
    pub(crate) velocity: Vec2,
    pub(crate) facing: Facing,
    pub(crate) player_controlled: bool,
    pub(crate) shapeshift: Option<Shapeshift>,
    pub(crate) behavior: NpcBehavior,
}

impl Entity {
    pub(crate) fn player(id: EntityId, position: Vec2) -> Self {
        Self {
            id,
            position,
            form: Form::PlayerBase,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            player_controlled: true,
            shapeshift: Some(Shapeshift {
                base: Form::PlayerBase,
                alt: Form::PlayerAlt,
            }),
            behavior: NpcBehavior::Idle,
        }
    }

    pub(crate) fn npc(id: EntityId, position: Vec2, behavior: NpcBehavior) -> Self {
        Self {
            id,
            position,
            form: Form::Npc,
            velocity: Vec2::ZERO,
            facing: Facing::Left,
            player_controlled: false,
            shapeshift: None,
            behavior,
        }
    }

    pub(crate) fn center(&self) -> Vec2 {
        let (min, max) = self.form.extent();
        Vec2::new(
            self.position.x + (min.x + max.x) * 0.5,
            self.position.y + (min.y + max.y) * 0.5,
        )
    }

    fn apply_player_intents(&mut self, intents: &IntentSet, speed: f32) {
        let horizontal = axis(
            intents.contains(Intent::MoveRight),
            intents.contains(Intent::MoveLeft),
        );
        let vertical = axis(
            intents.contains(Intent::MoveDown),
            intents.contains(Intent::MoveUp),
        );
        self.velocity = Vec2::new(horizontal * speed, vertical * speed);
        if horizontal > 0.0 {
            self.facing = Facing::Right;
        } else if horizontal < 0.0 {
            self.facing = Facing::Left;
        }

        if intents.contains(Intent::Transform) {
            if let Some(shapeshift) = self.shapeshift {
                self.form = shapeshift.toggled(self.form);
            }
        }
    }

    fn apply_behavior(&mut self, player_center: Option<Vec2>) {
        self.velocity = match (self.behavior, player_center) {
            (NpcBehavior::Follow { speed }, Some(target)) => {
                let here = self.center();
                Vec2::new(
                    (target.x - here.x).clamp(-speed, speed),
                    (target.y - here.y).clamp(-speed, speed),
                )
            }
            _ => Vec2::ZERO,
        };
        if self.velocity.x > 0.0 {
            self.facing = Facing::Right;
        } else if self.velocity.x < 0.0 {
            self.facing = Facing::Left;
        }
    }

    fn integrate(&mut self, bounds: Bounds) {
        let (min, max) = self.form.extent();
        let x = self.position.x + self.velocity.x;
        let y = self.position.y + self.velocity.y;
        self.position = Vec2::new(
            clamp_span(x, -min.x, bounds.width - max.x),
            clamp_span(y, -min.y, bounds.height - max.y),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) width: f32,
    pub(crate) height: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum WorldError {
    #[error("no entity is player-controlled")]
    NoPlayer,
    #[error("{count} entities are player-controlled, expected exactly one")]
    MultiplePlayers { count: usize },
    #[error("entity id {0} appears more than once")]
    DuplicateId(u64),
    #[error("entity {0} has a non-finite position or velocity")]
    NonFinite(u64),
}

/// The whole simulation state. Replaced wholesale once per tick.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WorldState {
    entities: Vec<Entity>,
    tick: u64,
    bounds: Bounds,
    player_speed: f32,
}

impl WorldState {
    pub(crate) fn new(
        entities: Vec<Entity>,
        bounds: Bounds,
        player_speed: f32,
    ) -> Result<Self, WorldError> {
        let world = Self {
            entities,
            tick: 0,
            bounds,
            player_speed,
        };
        world.validate()?;
        Ok(world)
    }

    pub(crate) fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub(crate) fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.player_controlled)
    }

    /// Computes the next state from this one and the intents of one tick.
    ///
    /// Pure: the same state and intents always produce the same result.
    /// Intents the player has no capability for are ignored.
    pub(crate) fn advance(&self, intents: &IntentSet) -> WorldState {
        let player_center = self.player().map(Entity::center);
        let mut next = self.clone();
        next.tick = self.tick.saturating_add(1);
        for entity in &mut next.entities {
            if entity.player_controlled {
                entity.apply_player_intents(intents, self.player_speed);
            } else {
                entity.apply_behavior(player_center);
            }
            entity.integrate(self.bounds);
        }
        next
    }

    pub(crate) fn validate(&self) -> Result<(), WorldError> {
        let player_count = self
            .entities
            .iter()
            .filter(|entity| entity.player_controlled)
            .count();
        match player_count {
            0 => return Err(WorldError::NoPlayer),
            1 => {}
            count => return Err(WorldError::MultiplePlayers { count }),
        }

        let mut ids: Vec<u64> = self.entities.iter().map(|entity| entity.id.0).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(WorldError::DuplicateId(pair[0]));
        }

        if let Some(entity) = self
            .entities
            .iter()
            .find(|entity| !entity.position.is_finite() || !entity.velocity.is_finite())
        {
            return Err(WorldError::NonFinite(entity.id.0));
        }
        Ok(())
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Clamps into `[low, high]`; a span narrower than the shape pins to `low`.
fn clamp_span(value: f32, low: f32, high: f32) -> f32 {
    if high < low {
        low
    } else {
        value.clamp(low, high)
    }
}
