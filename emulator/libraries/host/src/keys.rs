/// Physical keys, named after the DOM `KeyboardEvent.code` values
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Backspace,
    Space,
    Tab,
    Escape,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    /// `KeyA` through `KeyZ`
    Letter(char),
    /// `Digit0` through `Digit9`
    Digit(u8),
    /// `F1` through `F12`
    Function(u8),
    Unknown,
}

const NAMED: &[(&str, Key)] = &[
    ("ArrowUp", Key::ArrowUp),
    ("ArrowDown", Key::ArrowDown),
    ("ArrowLeft", Key::ArrowLeft),
    ("ArrowRight", Key::ArrowRight),
    ("Enter", Key::Enter),
    ("Backspace", Key::Backspace),
    ("Space", Key::Space),
    ("Tab", Key::Tab),
    ("Escape", Key::Escape),
    ("ShiftLeft", Key::ShiftLeft),
    ("ShiftRight", Key::ShiftRight),
    ("ControlLeft", Key::ControlLeft),
    ("ControlRight", Key::ControlRight),
    ("AltLeft", Key::AltLeft),
    ("AltRight", Key::AltRight),
];

impl Key {
    /// Parses a DOM key code.  Anything unrecognized becomes `Key::Unknown`.
    pub fn from_code(code: &str) -> Key {
        if let Some((_, key)) = NAMED.iter().find(|(name, _)| *name == code) {
            return *key;
        }

        if let Some(rest) = code.strip_prefix("Key") {
            let mut chars = rest.chars();
            if let (Some(ch), None) = (chars.next(), chars.next()) {
                if ch.is_ascii_uppercase() {
                    return Key::Letter(ch);
                }
            }
        } else if let Some(rest) = code.strip_prefix("Digit") {
            if let Ok(digit @ 0..=9) = rest.parse::<u8>() {
                return Key::Digit(digit);
            }
        } else if let Some(rest) = code.strip_prefix('F') {
            if let Ok(num @ 1..=12) = rest.parse::<u8>() {
                return Key::Function(num);
            }
        }

        Key::Unknown
    }

    pub fn code(self) -> String {
        if let Some((name, _)) = NAMED.iter().find(|(_, key)| *key == self) {
            return name.to_string();
        }

        match self {
            Key::Letter(ch) => format!("Key{}", ch),
            Key::Digit(digit) => format!("Digit{}", digit),
            Key::Function(num) => format!("F{}", num),
            _ => "Unidentified".to_string(),
        }
    }
}

/// Where a key event was delivered
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputTarget {
    /// The surface that captures emulator input
    Surface,
    /// Any other widget, such as a text field
    Elsewhere,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: bool,
    pub target: InputTarget,
}

impl KeyEvent {
    pub fn new(key: Key, state: bool) -> Self {
        Self {
            key,
            state,
            target: InputTarget::Surface,
        }
    }

    pub fn with_target(mut self, target: InputTarget) -> Self {
        self.target = target;
        self
    }
}
