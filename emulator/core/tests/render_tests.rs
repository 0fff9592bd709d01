use femtos::Instant;
use gbe_host::{Frame, FrameSurface, PixelEncoding, Surface};

use gbe_core::{Emulator, EmulatorOptions, Error, REFRESH_RATE};
use gbe_core::dummy::{Call, DummyModule};

fn frame_at(frame: u64) -> Instant {
    Instant::START + REFRESH_RATE.period_duration() * frame
}

fn assert_shows_frame(surface: &FrameSurface, module: &DummyModule, frame: u64, scale: u32) {
    let backing: &Frame = surface.backing();
    for y in 0..backing.height {
        for x in 0..backing.width {
            let expected = module.frame_pixel(frame, x / scale, y / scale).encode(backing.encoding);
            assert_eq!(backing.get_pixel(x, y), Some(expected), "frame {} at ({}, {})", frame, x, y);
        }
    }
}


#[test]
fn tick_without_a_rom_touches_nothing() {
    let mut emulator = Emulator::new(DummyModule::new(0x1000), EmulatorOptions::default());
    let mut surface = FrameSurface::new(PixelEncoding::RGBA);

    for _ in 0..3 {
        assert!(!emulator.tick(&mut surface).unwrap());
    }
    assert!(emulator.module().calls().is_empty());
    assert_eq!(surface.draws(), 0);
}

#[test]
fn first_tick_of_a_256_byte_rom() {
    let mut emulator = Emulator::new(DummyModule::new(0x1_0000).with_resolution(160, 144), EmulatorOptions::default());
    let mut surface = FrameSurface::new(PixelEncoding::RGBA);

    let rom: Vec<u8> = (0..256).map(|i| i as u8).collect();
    emulator.load_rom(&rom, &mut surface).unwrap();
    assert_eq!(surface.size(), (640, 576));
    let handle = emulator.handle().unwrap().raw();

    emulator.module().clear_calls();
    assert!(emulator.tick(&mut surface).unwrap());

    assert_eq!(emulator.module().calls(), vec![Call::Step(handle, 0), Call::ScreenPointer(handle)]);
    assert_eq!(surface.draws(), 1);
    assert_shows_frame(&surface, emulator.module(), 1, 4);
}

#[test]
fn frames_are_presented_in_order() {
    let options = EmulatorOptions {
        scale: 2,
        ..Default::default()
    };
    let mut emulator = Emulator::new(DummyModule::new(0x1_0000).with_resolution(8, 6), options);
    let mut surface = FrameSurface::new(PixelEncoding::ARGB);
    emulator.load_rom(&[0xC3; 32], &mut surface).unwrap();

    emulator.tick(&mut surface).unwrap();
    assert_eq!(surface.draws(), 1);
    assert_shows_frame(&surface, emulator.module(), 1, 2);

    emulator.tick(&mut surface).unwrap();
    assert_eq!(surface.draws(), 2);
    assert_shows_frame(&surface, emulator.module(), 2, 2);
}

#[test]
fn every_tick_presents_its_own_frame() {
    let options = EmulatorOptions {
        scale: 1,
        ..Default::default()
    };
    let mut emulator = Emulator::new(DummyModule::new(0x1_0000).with_resolution(2, 2), options);
    let mut surface = FrameSurface::new(PixelEncoding::RGBA);
    emulator.load_rom(&[1; 16], &mut surface).unwrap();

    for frame in 1..=3 {
        assert!(emulator.tick(&mut surface).unwrap());
        assert_eq!(emulator.clock(), frame_at(frame));
        assert_eq!(surface.draws(), frame);
        assert_shows_frame(&surface, emulator.module(), frame, 1);
    }
    assert_eq!(emulator.stats().frames, 3);
}

#[test]
fn frame_clock_keeps_running_across_reloads() {
    let mut emulator = Emulator::new(DummyModule::new(0x1_0000).with_resolution(4, 4), EmulatorOptions::default());
    let mut surface = FrameSurface::new(PixelEncoding::RGBA);
    emulator.load_rom(&[1; 16], &mut surface).unwrap();
    emulator.tick(&mut surface).unwrap();
    emulator.tick(&mut surface).unwrap();

    emulator.load_rom(&[2; 16], &mut surface).unwrap();
    emulator.tick(&mut surface).unwrap();
    assert_eq!(emulator.clock(), frame_at(3));
    assert_eq!(surface.draws(), 3);
}

#[test]
fn step_faults_do_not_stop_rendering() {
    let mut emulator = Emulator::new(DummyModule::new(0x1_0000).with_step_status(-1), EmulatorOptions::default());
    let mut surface = FrameSurface::new(PixelEncoding::RGBA);
    emulator.load_rom(&[1; 16], &mut surface).unwrap();

    for _ in 0..3 {
        assert!(emulator.tick(&mut surface).unwrap());
    }
    assert_eq!(emulator.stats().step_faults, 3);
    assert_eq!(surface.draws(), 3);
}

#[test]
fn screen_pointer_past_the_end_of_memory() {
    let mut emulator = Emulator::new(DummyModule::new(0x1_0000).with_screen_past_end(), EmulatorOptions::default());
    let mut surface = FrameSurface::new(PixelEncoding::RGBA);
    emulator.load_rom(&[1; 16], &mut surface).unwrap();

    let result = emulator.tick(&mut surface);
    assert!(matches!(result, Err(Error::OutOfBounds { len: 92160, .. })));
    assert_eq!(surface.draws(), 0);

    // the rom stays loaded and later ticks fail the same way
    assert!(emulator.is_loaded());
    assert!(emulator.tick(&mut surface).is_err());
}

#[test]
fn reload_resizes_and_keeps_drawing() {
    let mut emulator = Emulator::new(DummyModule::new(0x1_0000).with_resolution(4, 4), EmulatorOptions::default());
    let mut surface = FrameSurface::new(PixelEncoding::RGBA);
    emulator.load_rom(&[1; 16], &mut surface).unwrap();
    emulator.tick(&mut surface).unwrap();

    emulator.load_rom(&[2; 16], &mut surface).unwrap();
    assert_eq!(surface.size(), (16, 16));
    emulator.tick(&mut surface).unwrap();
    assert_eq!(surface.draws(), 2);
}
