// BedSense - NTC Thermistor

use std::sync::Arc;
use std::time::Duration;

use crate::adc::{AdcChannel, AdcError, VoltageSource};
use crate::config::*;
use crate::divider::series_resistance;
use crate::ntc::BetaModel;

pub struct Thermistor<A> {
    adc: Arc<A>,
    channel: AdcChannel,
    model: BetaModel,
}

impl<A: VoltageSource> Thermistor<A> {
    /// Configure the thermistor channel. The ADC service must already be
    /// initialised.
    pub fn init(adc: Arc<A>) -> anyhow::Result<Self> {
        adc.configure(THERMISTOR_ADC_CHANNEL)?;
        log::info!("thermistor ready on {}", THERMISTOR_ADC_CHANNEL);
        Ok(Self {
            adc,
            channel: THERMISTOR_ADC_CHANNEL,
            model: BetaModel::new(THERMISTOR_R0_OHMS, THERMISTOR_T0_C, THERMISTOR_BETA),
        })
    }

    /// Temperature in degrees Celsius for a divider voltage in millivolts.
    /// An open or shorted thermistor gives NaN.
    pub fn convert(&self, millivolts: i32) -> f32 {
        let ohms = series_resistance(millivolts as f32, THERMISTOR_PULLDOWN_OHMS, SUPPLY_MV);
        if !ohms.is_finite() || ohms <= 0.0 {
            return f32::NAN;
        }
        self.model.celsius(ohms)
    }

    pub fn try_read(&self, max_wait: Duration) -> Result<f32, AdcError> {
        let mv = self.adc.read_millivolts(self.channel, max_wait)?;
        Ok(self.convert(mv))
    }

    /// Temperature in degrees Celsius, or NaN if the read failed.
    pub fn read(&self, max_wait: Duration) -> f32 {
        self.try_read(max_wait).unwrap_or(f32::NAN)
    }
}
