// BedSense - Bed Monitor Sensing Core
//
// FSR + thermistor sensing over one shared ADC, the derived signals
// (occupancy, help tap gesture, over-temperature alarm, temperature history)
// and the event bus that hands state changes to the presentation layer.
//
// Everything outside `drivers` is hardware independent and tested on the
// host; `drivers` only builds for ESP-IDF.

pub mod adc;
pub mod config;
pub mod curve;
pub mod divider;
pub mod events;
pub mod hub;
pub mod ntc;
pub mod sensors;
pub mod signal;
pub mod tasks;

#[cfg(target_os = "espidf")]
pub mod drivers;

// ---------------------------------------------------------------------------
// Utility: milliseconds since boot (wraps at ~49 days - fine for timeouts)
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
pub fn now_ms() -> u32 {
    unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u32 }
}

#[cfg(not(target_os = "espidf"))]
pub fn now_ms() -> u32 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static BOOT: OnceLock<Instant> = OnceLock::new();
    BOOT.get_or_init(Instant::now).elapsed().as_millis() as u32
}
