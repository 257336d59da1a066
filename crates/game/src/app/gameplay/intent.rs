use forest_engine::{InputAction, InputSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Intent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Transform,
}

impl Intent {
    #[cfg(test)]
    pub(crate) const ALL: [Intent; 5] = [
        Intent::MoveUp,
        Intent::MoveDown,
        Intent::MoveLeft,
        Intent::MoveRight,
        Intent::Transform,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// The intents of a single tick. Each intent is present at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct IntentSet {
    bits: u8,
}

impl IntentSet {
    pub(crate) const fn empty() -> Self {
        Self { bits: 0 }
    }

    #[cfg(test)]
    pub(crate) fn from_intents(intents: &[Intent]) -> Self {
        let mut set = Self::empty();
        for intent in intents {
            set.insert(*intent);
        }
        set
    }

    /// Translates one tick's input into intents.
    ///
    /// Movement follows held keys, so holding a direction yields one move per
    /// tick. Transform follows the press edge and fires once per press.
    pub(crate) fn from_input(input: &InputSnapshot) -> Self {
        let mut set = Self::empty();
        let held = [
            (InputAction::MoveUp, Intent::MoveUp),
            (InputAction::MoveDown, Intent::MoveDown),
            (InputAction::MoveLeft, Intent::MoveLeft),
            (InputAction::MoveRight, Intent::MoveRight),
        ];
        for (action, intent) in held {
            if input.is_down(action) {
                set.insert(intent);
            }
        }
        if input.transform_pressed() {
            set.insert(Intent::Transform);
        }
        set
    }

    pub(crate) fn insert(&mut self, intent: Intent) {
        self.bits |= intent.bit();
    }

    pub(crate) fn contains(&self, intent: Intent) -> bool {
        self.bits & intent.bit() != 0
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.bits == 0
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = Intent> + '_ {
        Intent::ALL
            .into_iter()
            .filter(move |intent| self.contains(*intent))
    }
}
