// BedSense - Force-Sensing Resistor

use std::sync::Arc;
use std::time::Duration;

use crate::adc::{AdcChannel, AdcError, VoltageSource};
use crate::config::*;
use crate::curve::ForceCurve;
use crate::divider::series_resistance;

pub struct Fsr<A> {
    adc: Arc<A>,
    channel: AdcChannel,
    curve: ForceCurve<FSR_CURVE_POINTS>,
}

impl<A: VoltageSource> Fsr<A> {
    /// Configure the FSR channel on `adc` and load the calibration curve.
    /// The ADC service must already be initialised.
    pub fn init(adc: Arc<A>) -> anyhow::Result<Self> {
        let curve = ForceCurve::new(FSR_CURVE, FSR_MAX_FORCE_G)?;
        adc.configure(FSR_ADC_CHANNEL)?;
        log::info!("FSR ready on {}", FSR_ADC_CHANNEL);
        Ok(Self {
            adc,
            channel: FSR_ADC_CHANNEL,
            curve,
        })
    }

    /// Force in grams for a divider voltage in millivolts.
    pub fn convert(&self, millivolts: i32) -> f32 {
        let ohms = series_resistance(millivolts as f32, FSR_PULLDOWN_OHMS, SUPPLY_MV);
        self.curve.force_at(ohms)
    }

    pub fn try_read(&self, max_wait: Duration) -> Result<f32, AdcError> {
        let mv = self.adc.read_millivolts(self.channel, max_wait)?;
        Ok(self.convert(mv))
    }

    /// Force in grams, or NaN if the ADC could not be read within `max_wait`.
    pub fn read(&self, max_wait: Duration) -> f32 {
        self.try_read(max_wait).unwrap_or(f32::NAN)
    }
}
