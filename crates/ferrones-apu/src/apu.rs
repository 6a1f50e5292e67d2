//! APU register file and the handle shared with the audio host.

use crate::noise::{Noise, NoiseParams};
use crate::pulse::{Pulse, PulseParams};
use crate::triangle::{Triangle, TriangleParams};
use std::sync::Arc;

/// Audio processing unit: the CPU-facing register side of the four
/// synthesised channels.
pub struct Apu {
    square1: Pulse,
    square2: Pulse,
    triangle: Triangle,
    noise: Noise,
}

/// Cloneable bundle of the per-channel parameter handles. The host hands
/// these to its audio callback thread.
pub struct ApuHandle {
    /// Square channel 1 ($4000-$4003).
    pub square1: Arc<PulseParams>,
    /// Square channel 2 ($4004-$4007).
    pub square2: Arc<PulseParams>,
    /// Triangle channel ($4008-$400B).
    pub triangle: Arc<TriangleParams>,
    /// Noise channel ($400C-$400F).
    pub noise: Arc<NoiseParams>,
}

impl Apu {
    /// Create an APU with every channel silent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            square1: Pulse::new(),
            square2: Pulse::new(),
            triangle: Triangle::new(),
            noise: Noise::new(),
        }
    }

    /// Parameter handles for the audio thread.
    #[must_use]
    pub fn handle(&self) -> ApuHandle {
        ApuHandle {
            square1: self.square1.params(),
            square2: self.square2.params(),
            triangle: self.triangle.params(),
            noise: self.noise.params(),
        }
    }

    /// Decode a CPU write to $4000-$4013.
    ///
    /// Registers belonging to unmodelled units (sweeps, the linear and
    /// length counters, DMC) are accepted and ignored.
    pub fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            0x4000 => self.square1.write_ctrl(value),
            0x4002 => self.square1.write_period_lo(value),
            0x4003 => self.square1.write_period_hi(value),
            0x4004 => self.square2.write_ctrl(value),
            0x4006 => self.square2.write_period_lo(value),
            0x4007 => self.square2.write_period_hi(value),
            0x400A => self.triangle.write_period_lo(value),
            0x400B => self.triangle.write_period_hi(value),
            0x400C => self.noise.write_ctrl(value),
            0x400E => self.noise.write_mode(value),
            // $4001/$4005 sweep, $4008 linear counter, $400F length,
            // $4010-$4013 DMC: unmodelled.
            _ => {}
        }
    }

    /// Silence every channel.
    pub fn reset(&mut self) {
        self.square1.reset();
        self.square2.reset();
        self.triangle.reset();
        self.noise.reset();
        log::debug!("APU reset");
    }
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_decode_independently() {
        let mut apu = Apu::new();
        let handle = apu.handle();

        apu.write_register(0x4000, 0x4A);
        apu.write_register(0x4004, 0xC5);

        assert_eq!(handle.square1.duty(), 0.25);
        assert!((handle.square1.volume() - 10.0 / 15.0).abs() < 1e-6);
        assert_eq!(handle.square2.duty(), 0.75);
        assert!((handle.square2.volume() - 5.0 / 15.0).abs() < 1e-6);
    }

    #[test]
    fn unmodelled_registers_are_ignored() {
        let mut apu = Apu::new();
        let handle = apu.handle();
        apu.write_register(0x4001, 0xFF);
        apu.write_register(0x4008, 0xFF);
        apu.write_register(0x400F, 0xFF);
        apu.write_register(0x4010, 0xFF);
        assert_eq!(handle.square1.frequency(), 0.0);
        assert_eq!(handle.noise.volume(), 0.0);
    }

    #[test]
    fn handles_survive_reset() {
        let mut apu = Apu::new();
        let handle = apu.handle();
        apu.write_register(0x4000, 0x0F);
        assert_eq!(handle.square1.volume(), 1.0);
        apu.reset();
        assert_eq!(handle.square1.volume(), 0.0);
    }
}
