use minifb::Key as MiniKey;
use gbe_host::Key;

pub fn map_key(key: MiniKey) -> Key {
    match key {
        MiniKey::Up => Key::ArrowUp,
        MiniKey::Down => Key::ArrowDown,
        MiniKey::Left => Key::ArrowLeft,
        MiniKey::Right => Key::ArrowRight,
        MiniKey::Enter => Key::Enter,
        MiniKey::Backspace => Key::Backspace,
        MiniKey::Space => Key::Space,
        MiniKey::Tab => Key::Tab,
        MiniKey::Escape => Key::Escape,
        MiniKey::LeftShift => Key::ShiftLeft,
        MiniKey::RightShift => Key::ShiftRight,
        MiniKey::LeftCtrl => Key::ControlLeft,
        MiniKey::RightCtrl => Key::ControlRight,
        MiniKey::LeftAlt => Key::AltLeft,
        MiniKey::RightAlt => Key::AltRight,

        MiniKey::A => Key::Letter('A'),
        MiniKey::B => Key::Letter('B'),
        MiniKey::C => Key::Letter('C'),
        MiniKey::D => Key::Letter('D'),
        MiniKey::E => Key::Letter('E'),
        MiniKey::F => Key::Letter('F'),
        MiniKey::G => Key::Letter('G'),
        MiniKey::H => Key::Letter('H'),
        MiniKey::I => Key::Letter('I'),
        MiniKey::J => Key::Letter('J'),
        MiniKey::K => Key::Letter('K'),
        MiniKey::L => Key::Letter('L'),
        MiniKey::M => Key::Letter('M'),
        MiniKey::N => Key::Letter('N'),
        MiniKey::O => Key::Letter('O'),
        MiniKey::P => Key::Letter('P'),
        MiniKey::Q => Key::Letter('Q'),
        MiniKey::R => Key::Letter('R'),
        MiniKey::S => Key::Letter('S'),
        MiniKey::T => Key::Letter('T'),
        MiniKey::U => Key::Letter('U'),
        MiniKey::V => Key::Letter('V'),
        MiniKey::W => Key::Letter('W'),
        MiniKey::X => Key::Letter('X'),
        MiniKey::Y => Key::Letter('Y'),
        MiniKey::Z => Key::Letter('Z'),

        MiniKey::Key0 => Key::Digit(0),
        MiniKey::Key1 => Key::Digit(1),
        MiniKey::Key2 => Key::Digit(2),
        MiniKey::Key3 => Key::Digit(3),
        MiniKey::Key4 => Key::Digit(4),
        MiniKey::Key5 => Key::Digit(5),
        MiniKey::Key6 => Key::Digit(6),
        MiniKey::Key7 => Key::Digit(7),
        MiniKey::Key8 => Key::Digit(8),
        MiniKey::Key9 => Key::Digit(9),

        MiniKey::F1 => Key::Function(1),
        MiniKey::F2 => Key::Function(2),
        MiniKey::F3 => Key::Function(3),
        MiniKey::F4 => Key::Function(4),
        MiniKey::F5 => Key::Function(5),
        MiniKey::F6 => Key::Function(6),
        MiniKey::F7 => Key::Function(7),
        MiniKey::F8 => Key::Function(8),
        MiniKey::F9 => Key::Function(9),
        MiniKey::F10 => Key::Function(10),
        MiniKey::F11 => Key::Function(11),
        MiniKey::F12 => Key::Function(12),
        _ => Key::Unknown,
    }
}
