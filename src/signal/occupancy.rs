// BedSense - Occupancy Monitor
//
// Low-frequency level check of the smoothed force against a fixed threshold.
// The periodic timer is the only debounce.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::events::{EventBits, EventBus};

#[derive(Debug)]
pub struct OccupancyMonitor {
    threshold_g: f32,
    occupied: AtomicBool,
}

impl OccupancyMonitor {
    pub fn new(threshold_g: f32) -> Self {
        Self {
            threshold_g,
            occupied: AtomicBool::new(false),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied.load(Ordering::Relaxed)
    }

    /// Compare the smoothed force against the threshold; on a change, store the
    /// new state and raise [`EventBits::OCC_UPDATE`]. Returns `true` on a
    /// change. NaN (no reading yet) leaves the state alone.
    pub fn check(&self, smoothed_g: f32, bus: &EventBus) -> bool {
        if smoothed_g.is_nan() {
            return false;
        }
        let now_occupied = smoothed_g >= self.threshold_g;
        if self.occupied.swap(now_occupied, Ordering::Relaxed) == now_occupied {
            return false;
        }

        log::info!(
            "bed {} (smoothed force {:.0} g)",
            if now_occupied { "occupied" } else { "vacated" },
            smoothed_g
        );
        bus.set(EventBits::OCC_UPDATE);
        true
    }
}
