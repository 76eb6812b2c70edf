// BedSense - ESP-IDF Drivers

pub mod adc;
pub mod led;
