use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Transform,
    Quit,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Transform => 4,
            InputAction::Quit => 5,
        }
    }
}

/// Input state handed to exactly one tick.
///
/// Held actions report whether the key is down at the tick boundary. Edge
/// flags (`transform_pressed`, `quit_requested`) are true for the first tick
/// after the press and cleared afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    quit_requested: bool,
    transform_pressed: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn transform_pressed(&self) -> bool {
        self.transform_pressed
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_transform_pressed(mut self, transform_pressed: bool) -> Self {
        self.transform_pressed = transform_pressed;
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    pub(crate) quit_requested: bool,
    transform_is_down: bool,
    transform_pressed_edge: bool,
    pointer_is_down: bool,
    action_states: ActionStates,
}

impl InputCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    pub(crate) fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        // OS auto-repeat carries no new information for held actions.
        if key_event.repeat {
            return;
        }
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
    }

    pub(crate) fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                if !self.pointer_is_down {
                    self.transform_pressed_edge = true;
                }
                self.pointer_is_down = true;
            }
            ElementState::Released => self.pointer_is_down = false,
        }
    }

    pub(crate) fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            quit_requested: self.quit_requested,
            transform_pressed: self.transform_pressed_edge,
            actions: self.action_states,
        };
        self.transform_pressed_edge = false;
        snapshot
    }

    fn handle_transform_key_state(&mut self, is_pressed: bool) {
        if is_pressed {
            if !self.transform_is_down {
                self.transform_pressed_edge = true;
            }
            self.transform_is_down = true;
        } else {
            self.transform_is_down = false;
        }
        self.action_states
            .set(InputAction::Transform, self.transform_is_down);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        match key {
            PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.action_states.set(InputAction::MoveUp, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.action_states.set(InputAction::MoveDown, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.action_states.set(InputAction::MoveLeft, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.action_states.set(InputAction::MoveRight, is_pressed);
            }
            PhysicalKey::Code(KeyCode::Space) | PhysicalKey::Code(KeyCode::KeyE) => {
                self.handle_transform_key_state(is_pressed);
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.action_states.set(InputAction::Quit, is_pressed);
                if is_pressed {
                    self.mark_quit_requested();
                }
            }
            _ => {}
        }
    }
}
