//! Rendering smoke test against the color_test ROM.
//!
//! Place `color_test.nes` in `test-roms/` at the workspace root to
//! enable this test.

use ferrones_core::{Console, FRAME_WIDTH};
use std::path::PathBuf;

fn rom_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("test-roms")
        .join("color_test.nes")
}

#[test]
fn color_test_lights_the_screen_center() {
    let path = rom_path();
    if !path.exists() {
        eprintln!("skipping color test: place color_test.nes in test-roms/");
        return;
    }

    let rom = std::fs::read(&path).unwrap();
    let mut console = Console::load(&rom).unwrap();

    // Give the ROM 30 frames to initialise its palette and background.
    for _ in 0..30 {
        console.step_frame().unwrap();
    }

    let pixel = console.framebuffer()[128 + FRAME_WIDTH * 120];
    assert_ne!(pixel & 0x00FF_FFFF, 0, "screen center should be lit");
}
