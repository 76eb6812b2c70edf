// BedSense - Occupancy Timer Task

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::events::EventBus;
use crate::signal::occupancy::OccupancyMonitor;
use crate::signal::AtomicF32;

/// Every `interval`, compare the force task's smoothed estimate with the
/// occupancy threshold.
pub fn occupancy_task(
    monitor: Arc<OccupancyMonitor>,
    estimate: Arc<AtomicF32>,
    bus: Arc<EventBus>,
    interval: Duration,
) {
    log::info!("Occupancy task started");

    loop {
        thread::sleep(interval);
        monitor.check(estimate.load(), &bus);
    }
}
