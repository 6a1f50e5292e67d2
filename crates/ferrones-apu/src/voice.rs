//! Free-running oscillators for the host's audio callback.
//!
//! Each voice owns its phase accumulator and a handle to one channel's
//! published parameters; [`fill`](PulseVoice::fill) renders mono float
//! samples in [-1, 1]. Mixing the four voices is the host's business.

use crate::noise::NoiseParams;
use crate::pulse::PulseParams;
use crate::triangle::TriangleParams;
use std::sync::Arc;

/// Square-wave generator.
pub struct PulseVoice {
    params: Arc<PulseParams>,
    phase: f32,
}

impl PulseVoice {
    /// Create a voice over one square channel's parameters.
    #[must_use]
    pub fn new(params: Arc<PulseParams>) -> Self {
        Self { params, phase: 0.0 }
    }

    /// Fill `buffer` with samples at `sample_rate`.
    pub fn fill(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let duty = self.params.duty();
        let volume = self.params.volume();
        let step = self.params.frequency() / sample_rate;
        for sample in buffer {
            *sample = if self.phase < duty { volume } else { -volume };
            self.phase += step;
            self.phase -= self.phase.floor();
        }
    }
}

/// Triangle-wave generator.
pub struct TriangleVoice {
    params: Arc<TriangleParams>,
    phase: f32,
}

impl TriangleVoice {
    /// Create a voice over the triangle channel's parameters.
    #[must_use]
    pub fn new(params: Arc<TriangleParams>) -> Self {
        Self { params, phase: 0.0 }
    }

    /// Fill `buffer` with samples at `sample_rate`.
    pub fn fill(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let step = self.params.frequency() / sample_rate;
        for sample in buffer {
            // Symmetric ramp: -1 up to +1 over the first half period,
            // back down over the second.
            *sample = if self.phase < 0.5 {
                4.0 * self.phase - 1.0
            } else {
                3.0 - 4.0 * self.phase
            };
            self.phase += step;
            self.phase -= self.phase.floor();
        }
    }
}

/// LFSR noise generator.
pub struct NoiseVoice {
    params: Arc<NoiseParams>,
    phase: f32,
    lfsr: u16,
}

impl NoiseVoice {
    /// Create a voice over the noise channel's parameters.
    #[must_use]
    pub fn new(params: Arc<NoiseParams>) -> Self {
        Self {
            params,
            phase: 0.0,
            // The register must never be all zeroes or it locks up.
            lfsr: 1,
        }
    }

    /// Fill `buffer` with samples at `sample_rate`.
    pub fn fill(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let volume = self.params.volume();
        let tap = self.params.tap();
        let step = self.params.frequency() / sample_rate;
        for sample in buffer {
            *sample = if self.lfsr & 1 == 0 { volume } else { 0.0 };
            self.phase += step;
            while self.phase >= 1.0 {
                self.phase -= 1.0;
                self.advance_lfsr(tap);
            }
        }
    }

    fn advance_lfsr(&mut self, tap: u32) {
        let feedback = (self.lfsr ^ (self.lfsr >> tap)) & 1;
        self.lfsr = (self.lfsr >> 1) | (feedback << 14);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Apu;

    #[test]
    fn pulse_voice_emits_plus_minus_volume() {
        let mut apu = Apu::new();
        apu.write_register(0x4000, 0xBF); // 50% duty, full volume
        apu.write_register(0x4002, 0xFD);
        apu.write_register(0x4003, 0x00);

        let mut voice = PulseVoice::new(apu.handle().square1);
        let mut buffer = [0.0f32; 1024];
        voice.fill(&mut buffer, 44_100.0);

        assert!(buffer.iter().all(|&s| s == 1.0 || s == -1.0));
        assert!(buffer.iter().any(|&s| s == 1.0));
        assert!(buffer.iter().any(|&s| s == -1.0));
    }

    #[test]
    fn silent_channel_emits_zeros() {
        let mut voice = PulseVoice::new(Apu::new().handle().square1);
        let mut buffer = [1.0f32; 16];
        voice.fill(&mut buffer, 44_100.0);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn triangle_voice_ramps_within_unit_range() {
        let mut apu = Apu::new();
        apu.write_register(0x400A, 0x80);
        apu.write_register(0x400B, 0x01);

        let mut voice = TriangleVoice::new(apu.handle().triangle);
        let mut buffer = [0.0f32; 2048];
        voice.fill(&mut buffer, 44_100.0);

        assert!(buffer.iter().all(|&s| (-1.0..=1.0).contains(&s)));
        let max = buffer.iter().fold(f32::MIN, |a, &b| a.max(b));
        let min = buffer.iter().fold(f32::MAX, |a, &b| a.min(b));
        assert!(max > 0.9 && min < -0.9, "ramp should span the range");
    }

    #[test]
    fn noise_lfsr_follows_the_long_sequence() {
        let mut voice = NoiseVoice::new(Apu::new().handle().noise);
        // Seed 1, tap 1: feedback = (1 ^ 0) & 1 = 1 -> 0x4000.
        voice.advance_lfsr(1);
        assert_eq!(voice.lfsr, 0x4000);
        voice.advance_lfsr(1);
        assert_eq!(voice.lfsr, 0x2000);
    }

    #[test]
    fn noise_output_gates_on_lfsr_bit() {
        let mut apu = Apu::new();
        apu.write_register(0x400C, 0x0F);
        apu.write_register(0x400E, 0x04);

        let mut voice = NoiseVoice::new(apu.handle().noise);
        let mut buffer = [0.0f32; 4096];
        voice.fill(&mut buffer, 44_100.0);
        assert!(buffer.iter().all(|&s| s == 0.0 || s == 1.0));
        assert!(buffer.iter().any(|&s| s == 0.0));
        assert!(buffer.iter().any(|&s| s == 1.0));
    }
}
