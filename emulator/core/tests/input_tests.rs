use gbe_host::{Button, ButtonState, FrameSurface, InputTarget, Key, KeyEvent, PixelEncoding};

use gbe_core::{Emulator, EmulatorOptions, UnmappedKeys};
use gbe_core::dummy::{Call, DummyModule};

fn loaded(unmapped_keys: UnmappedKeys) -> Emulator<DummyModule> {
    let options = EmulatorOptions {
        unmapped_keys,
        ..Default::default()
    };
    let mut emulator = Emulator::new(DummyModule::new(0x1_0000), options);
    let mut surface = FrameSurface::new(PixelEncoding::RGBA);
    emulator.load_rom(&[0; 64], &mut surface).unwrap();
    emulator.module().clear_calls();
    emulator
}

fn button_calls(emulator: &Emulator<DummyModule>) -> Vec<(Button, ButtonState)> {
    emulator
        .module()
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::SetButtonState(_, button, state) => Some((button, state)),
            _ => None,
        })
        .collect()
}


#[test]
fn arrow_up_press_and_release() {
    let mut emulator = loaded(UnmappedKeys::Ignore);
    let event = KeyEvent::new(Key::from_code("ArrowUp"), true);

    emulator.on_press(&event).unwrap();
    emulator.on_release(&event).unwrap();

    let handle = emulator.handle().unwrap().raw();
    assert_eq!(
        emulator.module().calls(),
        vec![
            Call::SetButtonState(handle, Button::DpadUp, ButtonState::Pressed),
            Call::SetButtonState(handle, Button::DpadUp, ButtonState::Released),
        ]
    );
}

#[test]
fn every_mapped_key_reaches_its_button() {
    let mut emulator = loaded(UnmappedKeys::Ignore);
    let layout = [
        ("ArrowUp", Button::DpadUp),
        ("ArrowDown", Button::DpadDown),
        ("ArrowLeft", Button::DpadLeft),
        ("ArrowRight", Button::DpadRight),
        ("Enter", Button::Start),
        ("Backspace", Button::Select),
        ("Space", Button::A),
        ("KeyB", Button::B),
    ];

    for (code, _) in layout {
        emulator.on_key(&KeyEvent::new(Key::from_code(code), true)).unwrap();
    }

    let expected: Vec<(Button, ButtonState)> = layout
        .iter()
        .map(|(_, button)| (*button, ButtonState::Pressed))
        .collect();
    assert_eq!(button_calls(&emulator), expected);
}

#[test]
fn unmapped_keys_are_ignored_by_default() {
    let mut emulator = loaded(UnmappedKeys::Ignore);
    emulator.on_press(&KeyEvent::new(Key::from_code("KeyQ"), true)).unwrap();
    emulator.on_release(&KeyEvent::new(Key::Unknown, false)).unwrap();
    assert!(emulator.module().calls().is_empty());
}

#[test]
fn unmapped_keys_can_press_a() {
    let mut emulator = loaded(UnmappedKeys::PrimaryButton);
    emulator.on_press(&KeyEvent::new(Key::from_code("KeyQ"), true)).unwrap();
    emulator.on_release(&KeyEvent::new(Key::from_code("KeyQ"), false)).unwrap();
    assert_eq!(button_calls(&emulator), vec![(Button::A, ButtonState::Pressed), (Button::A, ButtonState::Released)]);
}

#[test]
fn keys_from_elsewhere_are_ignored() {
    let mut emulator = loaded(UnmappedKeys::PrimaryButton);
    let event = KeyEvent::new(Key::Space, true).with_target(InputTarget::Elsewhere);

    emulator.on_press(&event).unwrap();
    emulator.on_release(&event).unwrap();
    assert!(emulator.module().calls().is_empty());
}

#[test]
fn keys_before_any_rom_are_ignored() {
    let mut emulator = Emulator::new(DummyModule::new(0x1000), EmulatorOptions::default());
    emulator.on_press(&KeyEvent::new(Key::ArrowUp, true)).unwrap();
    emulator.on_release(&KeyEvent::new(Key::ArrowUp, false)).unwrap();
    assert!(emulator.module().calls().is_empty());
}
