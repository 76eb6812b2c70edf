// BedSense - Temperature Sensing Task
//
// One thermistor sample per period: appended to the rolling history (failed
// reads are kept as NaN gaps), published as the latest value, and checked
// against the over-temperature alarm. Temperature is not smoothed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::adc::VoltageSource;
use crate::config::TEMP_HISTORY_LEN;
use crate::events::{EventBits, EventBus};
use crate::sensors::Thermistor;
use crate::signal::alarm::{AlarmTransition, TempAlarm};
use crate::signal::history::History;
use crate::signal::AtomicF32;

/// Read side of the temperature pipeline, shared with the presentation layer
/// and the alarm indicator.
#[derive(Debug)]
pub struct TemperatureRecord {
    history: Mutex<History<TEMP_HISTORY_LEN>>,
    latest: AtomicF32,
    alarm: AtomicBool,
}

impl TemperatureRecord {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(History::new()),
            latest: AtomicF32::nan(),
            alarm: AtomicBool::new(false),
        }
    }

    /// Newest sample; NaN before the first reading or after a failed one.
    pub fn latest(&self) -> f32 {
        self.latest.load()
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm.load(Ordering::Relaxed)
    }

    /// Copy of every history slot, oldest first, NaN gaps included.
    pub fn history(&self) -> [f32; TEMP_HISTORY_LEN] {
        *self
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .samples()
    }

    /// Valid samples only, oldest first.
    pub fn valid_history(&self) -> Vec<f32> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .valid()
            .collect()
    }

    fn push(&self, sample: f32) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sample);
        self.latest.store(sample);
    }
}

impl Default for TemperatureRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Write side, owned by the temperature task.
pub struct TemperatureMonitor {
    alarm: TempAlarm,
    record: Arc<TemperatureRecord>,
    bus: Arc<EventBus>,
}

impl TemperatureMonitor {
    pub fn new(alarm_threshold_c: f32, record: Arc<TemperatureRecord>, bus: Arc<EventBus>) -> Self {
        Self {
            alarm: TempAlarm::new(alarm_threshold_c),
            record,
            bus,
        }
    }

    pub fn record(&mut self, celsius: f32) -> Option<AlarmTransition> {
        self.record.push(celsius);
        if celsius.is_nan() {
            return None;
        }
        self.bus.set(EventBits::TEMP_UPDATE);

        let transition = self.alarm.update(celsius)?;
        match transition {
            AlarmTransition::Raised => {
                log::warn!("temperature alarm raised at {:.2} C", celsius);
                self.record.alarm.store(true, Ordering::Relaxed);
            }
            AlarmTransition::Cleared => {
                log::info!("temperature alarm cleared at {:.2} C", celsius);
                self.record.alarm.store(false, Ordering::Relaxed);
            }
        }
        self.bus.set(EventBits::ALARM_UPDATE);
        Some(transition)
    }
}

pub fn temperature_task<A: VoltageSource>(
    thermistor: Thermistor<A>,
    mut monitor: TemperatureMonitor,
    interval: Duration,
    max_wait: Duration,
) {
    log::info!("Temperature task started");

    loop {
        let tick_start = Instant::now();

        let sample = thermistor.try_read(max_wait).unwrap_or_else(|e| {
            log::warn!("thermistor read error: {}", e);
            f32::NAN
        });
        monitor.record(sample);

        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
