//! Atomic scalars shared with the audio thread.

use std::sync::atomic::{AtomicU32, Ordering};

/// A float published across threads as its bit pattern. All accesses use
/// relaxed ordering; the readers tolerate values from any recent write.
pub(crate) struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub(crate) fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub(crate) fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}
