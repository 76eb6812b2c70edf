// BedSense - Alarm LED Driver
//
// Plain GPIO output, active HIGH.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use crate::tasks::alarm::AlarmIndicator;

pub struct AlarmLed<'d> {
    pin: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> AlarmLed<'d> {
    pub fn new(mut pin: PinDriver<'d, AnyOutputPin, Output>) -> anyhow::Result<Self> {
        pin.set_low()?;
        Ok(Self { pin })
    }
}

impl AlarmIndicator for AlarmLed<'static> {
    fn set(&mut self, on: bool) -> anyhow::Result<()> {
        if on {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        Ok(())
    }
}
