// BedSense - Force Sensing Task
//
// Samples the FSR every period, keeps the smoothed force estimate, and
// forwards tap candidates (sudden rises above the average) to the tap task.
// A failed read skips the tick's smoothing and tap check but never stops the
// loop.

use std::sync::mpsc::{SyncSender, TrySendError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::adc::VoltageSource;
use crate::sensors::Fsr;
use crate::signal::ema::Ema;
use crate::signal::AtomicF32;

/// What one sample did to the force pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceTick {
    /// Read failed; nothing was updated.
    Invalid,
    Smoothed { average: f32 },
    /// The sample also registered as a tap.
    Tap { average: f32 },
}

pub struct ForceMonitor {
    ema: Ema,
    spike_threshold_g: f32,
    debounce_ms: u32,
    last_tap_ms: Option<u32>,
    taps: SyncSender<u32>,
    estimate: Arc<AtomicF32>,
}

impl ForceMonitor {
    /// `initial_g` is the reading taken before the periodic loop starts; the
    /// smoothed estimate starts there (or at the first valid sample if it
    /// is NaN).
    pub fn new(
        initial_g: f32,
        alpha: f32,
        spike_threshold_g: f32,
        debounce_ms: u32,
        taps: SyncSender<u32>,
        estimate: Arc<AtomicF32>,
    ) -> Self {
        let ema = Ema::seeded(alpha, initial_g);
        estimate.store(ema.value().unwrap_or(f32::NAN));
        Self {
            ema,
            spike_threshold_g,
            debounce_ms,
            last_tap_ms: None,
            taps,
            estimate,
        }
    }

    pub fn process(&mut self, force_g: f32, now_ms: u32) -> ForceTick {
        if !force_g.is_finite() {
            return ForceTick::Invalid;
        }
        let Some(average) = self.ema.update(force_g) else {
            return ForceTick::Invalid;
        };
        self.estimate.store(average);

        if force_g - average <= self.spike_threshold_g {
            return ForceTick::Smoothed { average };
        }
        let debounced = self
            .last_tap_ms
            .map_or(true, |last| now_ms.wrapping_sub(last) > self.debounce_ms);
        if !debounced {
            return ForceTick::Smoothed { average };
        }

        match self.taps.try_send(now_ms) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::debug!("tap queue full, dropping tap at {} ms", now_ms),
            Err(TrySendError::Disconnected(_)) => log::warn!("tap task gone, dropping tap"),
        }
        self.last_tap_ms = Some(now_ms);
        ForceTick::Tap { average }
    }
}

pub fn force_task<A: VoltageSource>(
    fsr: Fsr<A>,
    mut monitor: ForceMonitor,
    interval: Duration,
    max_wait: Duration,
) {
    log::info!("Force task started");

    let mut failing = false;
    loop {
        let tick_start = Instant::now();

        let sample = match fsr.try_read(max_wait) {
            Ok(g) => {
                if failing {
                    log::info!("FSR reads recovered");
                    failing = false;
                }
                g
            }
            Err(e) => {
                if !failing {
                    log::warn!("FSR read error: {}", e);
                    failing = true;
                }
                f32::NAN
            }
        };
        monitor.process(sample, crate::now_ms());

        // Sleep for the remainder of the sampling interval.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{sync_channel, Receiver};

    fn monitor(initial: f32, queue: usize) -> (ForceMonitor, Receiver<u32>, Arc<AtomicF32>) {
        let (tx, rx) = sync_channel(queue);
        let estimate = Arc::new(AtomicF32::nan());
        let m = ForceMonitor::new(initial, 0.1, 300.0, 150, tx, Arc::clone(&estimate));
        (m, rx, estimate)
    }

    #[test]
    fn seeds_estimate_from_initial_reading() {
        let (_m, _rx, estimate) = monitor(40.0, 4);
        assert_eq!(estimate.load(), 40.0);
    }

    #[test]
    fn invalid_samples_leave_average_alone() {
        let (mut m, rx, estimate) = monitor(100.0, 4);
        assert_eq!(m.process(f32::NAN, 0), ForceTick::Invalid);
        assert_eq!(estimate.load(), 100.0);
        match m.process(200.0, 20) {
            ForceTick::Smoothed { average } => assert!((average - 110.0).abs() < 1e-3),
            other => panic!("unexpected {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn spike_enqueues_tap() {
        let (mut m, rx, _) = monitor(0.0, 4);
        // avg = 0.1 * 1000 = 100, spike = 900 above it.
        match m.process(1000.0, 500) {
            ForceTick::Tap { average } => assert!((average - 100.0).abs() < 1e-3),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(rx.try_recv(), Ok(500));
    }

    #[test]
    fn taps_are_debounced() {
        let (mut m, rx, _) = monitor(0.0, 8);
        assert!(matches!(m.process(2000.0, 1000), ForceTick::Tap { .. }));
        // Still spiking, but inside the debounce interval.
        assert!(matches!(m.process(2000.0, 1100), ForceTick::Smoothed { .. }));
        assert!(matches!(m.process(2000.0, 1150), ForceTick::Smoothed { .. }));
        // Past the debounce interval: the average has risen, so spike harder.
        assert!(matches!(m.process(5000.0, 1151), ForceTick::Tap { .. }));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), [1000, 1151]);
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let (mut m, rx, _) = monitor(0.0, 1);
        assert!(matches!(m.process(2000.0, 0), ForceTick::Tap { .. }));
        m.process(0.0, 100);
        // Average decays back towards zero before the next spike.
        for t in (200..2000).step_by(20) {
            m.process(0.0, t);
        }
        assert!(matches!(m.process(2000.0, 2000), ForceTick::Tap { .. }));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn steady_load_is_not_a_tap() {
        let (mut m, rx, estimate) = monitor(600.0, 4);
        for t in 0..50 {
            assert!(matches!(m.process(600.0, t * 20), ForceTick::Smoothed { .. }));
        }
        assert!((estimate.load() - 600.0).abs() < 1e-3);
        assert!(rx.try_recv().is_err());
    }
}
