// BedSense - Notification Task
//
// The single consumer of the event bus: takes every pending flag on wake and
// pushes the matching state to the presentation layer.

use std::sync::Arc;

use crate::events::{EventBits, Publisher, Update};
use crate::hub::SenseHub;

const WATCHED: EventBits = EventBits::ALL;

/// Act on one batch of taken event bits.
pub fn dispatch(hub: &SenseHub, events: EventBits, publisher: &mut dyn Publisher) {
    if events.contains(EventBits::TEMP_UPDATE) {
        publisher.publish(Update::LatestTemperature(hub.latest_temperature()));
    }
    if events.contains(EventBits::OCC_UPDATE) {
        publisher.publish(Update::Occupancy(hub.is_occupied()));
    }
    if events.contains(EventBits::HELP) {
        hub.raise_help();
        publisher.publish(Update::Help(true));
    }
    if events.contains(EventBits::ALARM_UPDATE) {
        publisher.publish(Update::Alarm(hub.alarm_active()));
    }
}

pub fn notify_task<P: Publisher>(hub: Arc<SenseHub>, mut publisher: P) {
    log::info!("Notify task started");

    loop {
        let events = hub.bus().wait(WATCHED);
        dispatch(&hub, events, &mut publisher);
    }
}
