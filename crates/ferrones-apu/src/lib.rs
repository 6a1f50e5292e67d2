//! 2A03 APU emulation as a parameter-publishing model.
//!
//! The console does not synthesise audio cycle-by-cycle. Instead, CPU
//! writes to $4000-$4013 decode into a small set of per-channel
//! parameters (duty, volume, frequency), and the host's audio callback
//! pulls samples from free-running [`voice`] oscillators driven by those
//! parameters. Envelopes, sweeps, length counters and the DMC channel are
//! not modelled; audio is approximate by design.
//!
//! # Thread model
//!
//! The audio callback runs on the host's audio-device thread, so every
//! published parameter is an atomic scalar read with relaxed ordering.
//! At a 60Hz update cadence the resulting races are inaudible.
//!
//! # Example
//!
//! ```
//! use ferrones_apu::{voice::PulseVoice, Apu};
//!
//! let mut apu = Apu::new();
//! let handle = apu.handle();
//!
//! // CPU side: configure square 1 for a 50% duty A440-ish tone.
//! apu.write_register(0x4000, 0x8F);
//! apu.write_register(0x4002, 0xFD);
//! apu.write_register(0x4003, 0x00);
//!
//! // Audio side: the voice fills the device buffer.
//! let mut voice = PulseVoice::new(handle.square1);
//! let mut buffer = [0.0f32; 128];
//! voice.fill(&mut buffer, 44_100.0);
//! ```

mod apu;
mod noise;
mod pulse;
mod shared;
mod triangle;
pub mod voice;

pub use apu::{Apu, ApuHandle};
pub use noise::NoiseParams;
pub use pulse::PulseParams;
pub use triangle::TriangleParams;

/// NTSC CPU clock rate, the timebase for every channel's period.
pub const CPU_CLOCK_HZ: f32 = 1_789_773.0;
