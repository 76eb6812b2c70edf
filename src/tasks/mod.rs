// BedSense - Tasks
//
// Each task is a `std::thread` (a FreeRTOS task on ESP-IDF) that runs for the
// device's lifetime.

pub mod alarm;
pub mod force;
pub mod notify;
pub mod occupancy;
pub mod tap;
pub mod temperature;
