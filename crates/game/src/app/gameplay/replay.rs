use super::intent::IntentSet;
use super::world::WorldState;

/// Records the intents of a run so it can be replayed from its initial state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct IntentLog {
    ticks: Vec<IntentSet>,
}

impl IntentLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, intents: IntentSet) {
        self.ticks.push(intents);
    }

    pub(crate) fn len(&self) -> usize {
        self.ticks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub(crate) fn replay(&self, initial: &WorldState) -> WorldState {
        self.ticks
            .iter()
            .fold(initial.clone(), |world, intents| world.advance(intents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::gameplay::intent::Intent;
    use crate::app::gameplay::world::{Bounds, Entity, EntityId, NpcBehavior, Vec2};

    fn initial_world() -> WorldState {
        WorldState::new(
            vec![
                Entity::player(EntityId(0), Vec2::new(100.0, 500.0)),
                Entity::npc(
                    EntityId(1),
                    Vec2::new(300.0, 500.0),
                    NpcBehavior::Follow { speed: 1.25 },
                ),
            ],
            Bounds {
                width: 800.0,
                height: 600.0,
            },
            3.5,
        )
        .expect("valid world")
    }

    /// Deterministic pseudo-random intent sequence.
    fn scripted_intents(seed: u32, len: usize) -> Vec<IntentSet> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let mut set = IntentSet::empty();
                for (bit, intent) in Intent::ALL.into_iter().enumerate() {
                    if (state >> (bit + 8)) & 1 == 1 {
                        set.insert(intent);
                    }
                }
                set
            })
            .collect()
    }

    #[test]
    fn replay_of_empty_log_is_initial_state() {
        let initial = initial_world();
        let log = IntentLog::new();
        assert!(log.is_empty());
        assert_eq!(log.replay(&initial), initial);
    }

    #[test]
    fn replay_reproduces_live_run() {
        let initial = initial_world();
        let mut live = initial.clone();
        let mut log = IntentLog::new();
        for intents in scripted_intents(7, 300) {
            live = live.advance(&intents);
            log.record(intents);
        }

        assert_eq!(log.len(), 300);
        assert_eq!(log.replay(&initial), live);
        assert_eq!(live.tick(), 300);
    }

    #[test]
    fn advance_is_deterministic_across_sequences() {
        for seed in [1, 42, 9_001] {
            let intents = scripted_intents(seed, 120);
            let run = |intents: &[IntentSet]| {
                intents
                    .iter()
                    .fold(initial_world(), |world, step| world.advance(step))
            };
            assert_eq!(run(&intents), run(&intents), "seed {seed}");
        }
    }

    #[test]
    fn exactly_one_player_in_every_reachable_state() {
        for seed in [3, 17, 256] {
            let mut world = initial_world();
            for intents in scripted_intents(seed, 200) {
                world = world.advance(&intents);
                assert_eq!(world.validate(), Ok(()));
                let players = world
                    .entities()
                    .iter()
                    .filter(|entity| entity.player_controlled)
                    .count();
                assert_eq!(players, 1);
            }
        }
    }
}
