//! FerroNES emulation core.
//!
//! This crate wires the CPU, PPU, APU, controllers and cartridge mapper
//! together behind a memory-mapped bus and exposes the whole machine as a
//! [`Console`]:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                       Console                         │
//! │  ┌─────────────────────────────────────────────────┐  │
//! │  │                     NesBus                      │  │
//! │  │  ┌─────┐  ┌─────┐  ┌─────┐  ┌────────┐  ┌────┐ │  │
//! │  │  │ RAM │  │ PPU │  │ APU │  │ Mapper │  │Pads│ │  │
//! │  │  └─────┘  └─────┘  └─────┘  └────────┘  └────┘ │  │
//! │  └─────────────────────────────────────────────────┘  │
//! │                          ▲                            │
//! │                     ┌────┴────┐                       │
//! │                     │ 6502 CPU│                       │
//! │                     └─────────┘                       │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Timing is cooperative and deterministic: the CPU executes one
//! instruction, the bus advances the shared cycle counter and pushes
//! three PPU dots per CPU cycle, and NMIs raised by the PPU are delivered
//! at the start of the next instruction.
//!
//! # Example
//!
//! ```no_run
//! use ferrones_core::Console;
//!
//! let rom = std::fs::read("game.nes").expect("failed to read ROM");
//! let mut console = Console::load(&rom).expect("failed to load ROM");
//!
//! loop {
//!     console.set_buttons(0);
//!     console.step_frame().expect("fatal core error");
//!     let _frame = console.framebuffer(); // 256x240, 0x00RRGGBB
//! }
//! ```

mod bus;
mod console;
mod input;

pub use bus::NesBus;
pub use console::Console;
pub use input::{Button, Controller};

pub use ferrones_apu::ApuHandle;
pub use ferrones_ppu::{FRAME_HEIGHT, FRAME_WIDTH};

/// Fatal core errors. The emulator keeps no recoverable state; every
/// variant ends the session.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Cartridge parsing or mapper selection failed.
    #[error(transparent)]
    Rom(#[from] ferrones_mappers::RomError),

    /// The CPU fetched a byte with no opcode dispatch.
    #[error(transparent)]
    Cpu(#[from] ferrones_cpu::CpuError),

    /// A CPU access landed in an unmodelled address range.
    #[error("unsupported bus address ${0:04X}")]
    UnsupportedAddress(u16),

    /// The cartridge requests PPU behavior this core does not model.
    #[error("unsupported PPU configuration: {0}")]
    UnsupportedPpu(String),
}
