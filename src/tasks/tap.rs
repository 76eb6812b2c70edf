// BedSense - Tap Gesture Task
//
// Blocks on the tap queue (it has no periodic duty) and raises HELP on the
// event bus when the multi-tap gesture completes.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::events::{EventBits, EventBus};
use crate::signal::tap::{TapDetector, TapOutcome};

pub fn tap_task<const N: usize>(taps: Receiver<u32>, mut detector: TapDetector<N>, bus: Arc<EventBus>) {
    log::info!("Tap task started");

    loop {
        let stamp = match taps.recv() {
            Ok(t) => t,
            Err(_) => {
                log::warn!("Tap channel closed - exiting tap task");
                return;
            }
        };

        match detector.register(stamp) {
            TapOutcome::Gesture { span_ms } => {
                log::info!("help gesture: {} taps in {} ms", N, span_ms);
                bus.set(EventBits::HELP);
            }
            TapOutcome::Counted { since_gesture } => {
                log::debug!("tap at {} ms ({} since last gesture)", stamp, since_gesture);
            }
        }
    }
}
