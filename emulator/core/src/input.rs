use gbe_host::{Button, ButtonState, InputTarget, Key, KeyEvent};

use crate::error::Error;
use crate::native::{InstanceHandle, NativeModule};


/// What to do with a key that has no button assigned to it
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UnmappedKeys {
    #[default]
    Ignore,
    /// Treat it as the A button, which is how the web frontend has always behaved
    PrimaryButton,
}

/// The fixed keyboard layout
pub fn map_key(key: Key) -> Option<Button> {
    match key {
        Key::ArrowUp => Some(Button::DpadUp),
        Key::ArrowDown => Some(Button::DpadDown),
        Key::ArrowLeft => Some(Button::DpadLeft),
        Key::ArrowRight => Some(Button::DpadRight),
        Key::Enter => Some(Button::Start),
        Key::Backspace => Some(Button::Select),
        Key::Space => Some(Button::A),
        Key::Letter('B') => Some(Button::B),
        _ => None,
    }
}

#[derive(Clone, Debug, Default)]
pub struct InputTranslator {
    unmapped: UnmappedKeys,
}

impl InputTranslator {
    pub fn new(unmapped: UnmappedKeys) -> Self {
        Self {
            unmapped,
        }
    }

    pub fn resolve(&self, key: Key) -> Option<Button> {
        match (map_key(key), self.unmapped) {
            (Some(button), _) => Some(button),
            (None, UnmappedKeys::PrimaryButton) => Some(Button::A),
            (None, UnmappedKeys::Ignore) => None,
        }
    }

    pub fn on_press<M: NativeModule>(
        &self,
        module: &mut M,
        handle: Option<InstanceHandle>,
        event: &KeyEvent,
    ) -> Result<(), Error> {
        self.forward(module, handle, event, ButtonState::Pressed)
    }

    pub fn on_release<M: NativeModule>(
        &self,
        module: &mut M,
        handle: Option<InstanceHandle>,
        event: &KeyEvent,
    ) -> Result<(), Error> {
        self.forward(module, handle, event, ButtonState::Released)
    }

    fn forward<M: NativeModule>(
        &self,
        module: &mut M,
        handle: Option<InstanceHandle>,
        event: &KeyEvent,
        state: ButtonState,
    ) -> Result<(), Error> {
        if event.target != InputTarget::Surface {
            return Ok(());
        }

        match (handle, self.resolve(event.key)) {
            (Some(handle), Some(button)) => {
                log::trace!("{:?} {:?} as {:?}", event.key, state, button);
                module.set_button_state(handle, button, state)
            },
            _ => Ok(()),
        }
    }
}
