// BedSense - Presentation Hub
//
// Pull side of the sensing pipeline for the UI / transport layer, plus the
// help acknowledgement flag that the notification task raises and the UI
// clears.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::events::{history_frame, EventBus, Publisher, Update};
use crate::signal::occupancy::OccupancyMonitor;
use crate::tasks::temperature::TemperatureRecord;

pub struct SenseHub {
    bus: Arc<EventBus>,
    occupancy: Arc<OccupancyMonitor>,
    temperature: Arc<TemperatureRecord>,
    help: AtomicBool,
}

impl SenseHub {
    pub fn new(
        bus: Arc<EventBus>,
        occupancy: Arc<OccupancyMonitor>,
        temperature: Arc<TemperatureRecord>,
    ) -> Self {
        Self {
            bus,
            occupancy,
            temperature,
            help: AtomicBool::new(false),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Valid temperature samples, oldest first.
    pub fn temperature_history(&self) -> Vec<f32> {
        self.temperature.valid_history()
    }

    /// History as a `T:` text frame.
    pub fn temperature_history_frame(&self) -> String {
        history_frame(&self.temperature.history())
    }

    pub fn latest_temperature(&self) -> f32 {
        self.temperature.latest()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupancy.is_occupied()
    }

    pub fn help_requested(&self) -> bool {
        self.help.load(Ordering::Relaxed)
    }

    pub fn alarm_active(&self) -> bool {
        self.temperature.alarm_active()
    }

    pub(crate) fn raise_help(&self) {
        self.help.store(true, Ordering::Relaxed);
    }

    /// Acknowledge a help request and re-publish the cleared state.
    pub fn clear_help(&self, publisher: &mut dyn Publisher) {
        self.help.store(false, Ordering::Relaxed);
        log::info!("help request cleared");
        publisher.publish(Update::Help(false));
    }

    /// Everything a newly attached client needs besides the history frame.
    pub fn current_state(&self) -> [Update; 4] {
        [
            Update::LatestTemperature(self.latest_temperature()),
            Update::Occupancy(self.is_occupied()),
            Update::Help(self.help_requested()),
            Update::Alarm(self.alarm_active()),
        ]
    }
}
