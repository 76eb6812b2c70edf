// BedSense - Sensor Front Ends
//
// Channel set-up plus the voltage -> physical unit chain for each sensor.
// Reads take a caller-chosen ADC wait budget and report failures as NaN.

pub mod fsr;
pub mod thermistor;

pub use fsr::Fsr;
pub use thermistor::Thermistor;
