// BedSense - Alarm Indicator Task
//
// Blinks the alarm output while the over-temperature alarm is active and
// holds it low otherwise.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::tasks::temperature::TemperatureRecord;

/// Single digital output driving the alarm LED.
pub trait AlarmIndicator: Send {
    fn set(&mut self, on: bool) -> anyhow::Result<()>;
}

/// Output level sequence for the blink: toggles while active, low when idle.
#[derive(Debug, Default)]
pub struct Blinker {
    lit: bool,
}

impl Blinker {
    pub fn next(&mut self, active: bool) -> bool {
        self.lit = active && !self.lit;
        self.lit
    }
}

pub fn alarm_task<L: AlarmIndicator>(record: Arc<TemperatureRecord>, mut led: L, interval: Duration) {
    log::info!("Alarm task started");

    let mut blinker = Blinker::default();
    let mut driven: Option<bool> = None;
    loop {
        let level = blinker.next(record.alarm_active());
        if driven != Some(level) {
            match led.set(level) {
                Ok(()) => driven = Some(level),
                Err(e) => log::warn!("alarm output error: {}", e),
            }
        }
        thread::sleep(interval);
    }
}
