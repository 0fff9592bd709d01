/// The logical buttons of the handheld
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    Select,
    Start,
    DpadRight,
    DpadLeft,
    DpadUp,
    DpadDown,
}

impl Button {
    /// The button id used by the native core's button-state call
    pub fn id(self) -> u8 {
        match self {
            Button::A => 0,
            Button::B => 1,
            Button::Select => 2,
            Button::Start => 3,
            Button::DpadRight => 4,
            Button::DpadLeft => 5,
            Button::DpadUp => 6,
            Button::DpadDown => 7,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    /// The state value used by the native core's button-state call
    pub fn id(self) -> u8 {
        match self {
            ButtonState::Pressed => 0,
            ButtonState::Released => 1,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_ids_follow_the_native_protocol() {
        let buttons = [
            Button::A,
            Button::B,
            Button::Select,
            Button::Start,
            Button::DpadRight,
            Button::DpadLeft,
            Button::DpadUp,
            Button::DpadDown,
        ];
        for (i, button) in buttons.iter().enumerate() {
            assert_eq!(button.id() as usize, i);
        }
        assert_eq!(ButtonState::Pressed.id(), 0);
        assert_eq!(ButtonState::Released.id(), 1);
    }
}
