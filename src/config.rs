// BedSense - Hardware & System Configuration
// Target: ESP32-C3 (RISC-V), FSR + NTC thermistor on ADC1

use std::time::Duration;

use crate::adc::AdcChannel;
use crate::curve::CurvePoint;

// ---------------------------------------------------------------------------
// Pin / channel assignments
// ---------------------------------------------------------------------------
pub const FSR_ADC_CHANNEL: AdcChannel = AdcChannel(0); // GPIO0 - FSR divider midpoint
pub const THERMISTOR_ADC_CHANNEL: AdcChannel = AdcChannel(1); // GPIO1 - NTC divider midpoint
pub const PIN_ALARM_LED: i32 = 8; // over-temperature indicator (active HIGH)

// ---------------------------------------------------------------------------
// Voltage dividers
// ---------------------------------------------------------------------------
pub const SUPPLY_MV: f32 = 3300.0;
pub const FSR_PULLDOWN_OHMS: f32 = 1000.0;
pub const THERMISTOR_PULLDOWN_OHMS: f32 = 10_000.0;

// ---------------------------------------------------------------------------
// FSR calibration curve (resistance in ohms -> force in grams)
// ---------------------------------------------------------------------------
pub const FSR_CURVE_POINTS: usize = 11;
pub const FSR_CURVE: [CurvePoint; FSR_CURVE_POINTS] = [
    CurvePoint::new(100_000.0, 16.0), // interpolated
    CurvePoint::new(30_000.0, 20.0),
    CurvePoint::new(10_000.0, 50.0),
    CurvePoint::new(6_000.0, 100.0),
    CurvePoint::new(3_500.0, 250.0), // interpolated
    CurvePoint::new(2_000.0, 500.0),
    CurvePoint::new(1_250.0, 1_000.0),
    CurvePoint::new(750.0, 2_000.0), // interpolated
    CurvePoint::new(450.0, 4_000.0), // interpolated
    CurvePoint::new(300.0, 7_000.0), // interpolated
    CurvePoint::new(250.0, 10_000.0), // interpolated
];
pub const FSR_MAX_FORCE_G: f32 = 10_000.0; // maximum rated force

// ---------------------------------------------------------------------------
// Thermistor (NTC, B-parameter model)
// ---------------------------------------------------------------------------
pub const THERMISTOR_BETA: f32 = 3950.0;
pub const THERMISTOR_R0_OHMS: f32 = 10_000.0;
pub const THERMISTOR_T0_C: f32 = 25.0;

// ---------------------------------------------------------------------------
// Force processing
// ---------------------------------------------------------------------------
pub const FORCE_EMA_ALPHA: f32 = 0.1;
pub const TAP_SPIKE_THRESHOLD_G: f32 = 300.0; // force above the average that counts as a tap
pub const TAP_DEBOUNCE_MS: u32 = 150;
pub const TAPS_PER_GESTURE: usize = 5;
pub const TAP_GESTURE_WINDOW_MS: u32 = 2000; // first-to-last tap span for a help gesture
pub const TAP_QUEUE_LEN: usize = 8;
pub const OCCUPANCY_THRESHOLD_G: f32 = 500.0;

// ---------------------------------------------------------------------------
// Temperature processing
// ---------------------------------------------------------------------------
pub const TEMP_HISTORY_LEN: usize = 60; // one hour at one sample per minute
pub const TEMP_ALARM_THRESHOLD_C: f32 = 40.0;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------
pub const FSR_SAMPLE_INTERVAL_MS: u64 = 20; // 50 Hz
pub const OCCUPANCY_CHECK_INTERVAL_MS: u64 = 30_000;
pub const TEMP_SAMPLE_INTERVAL_MS: u64 = 60_000;
pub const ALARM_BLINK_INTERVAL_MS: u64 = 500;
pub const ADC_MAX_WAIT: Duration = Duration::from_millis(50); // lock budget per read

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_FORCE: usize = 4096;
pub const STACK_TAP: usize = 3072;
pub const STACK_OCCUPANCY: usize = 3072;
pub const STACK_TEMPERATURE: usize = 4096;
pub const STACK_ALARM: usize = 2048;
pub const STACK_NOTIFY: usize = 4096;
