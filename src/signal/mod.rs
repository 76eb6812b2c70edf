// BedSense - Derived Signals
//
// Stateful detectors layered over the physical readings. Each one is owned by
// a single task; values other tasks need to look at are published through
// atomics (last-writer-wins snapshots).

pub mod alarm;
pub mod ema;
pub mod history;
pub mod occupancy;
pub mod tap;

use std::sync::atomic::{AtomicU32, Ordering};

/// `f32` stored bit-for-bit in an `AtomicU32`.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn from_f32(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    /// Holds NaN until the first store.
    pub fn nan() -> Self {
        Self::from_f32(f32::NAN)
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::nan()
    }
}

#[cfg(test)]
mod tests {
    use super::AtomicF32;

    #[test]
    fn round_trips_special_values() {
        let a = AtomicF32::default();
        assert!(a.load().is_nan());
        a.store(-0.0);
        assert_eq!(a.load().to_bits(), (-0.0f32).to_bits());
        a.store(512.25);
        assert_eq!(a.load(), 512.25);
    }
}
