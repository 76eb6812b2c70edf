// BedSense - ESP32-C3 ADC1 One-Shot Driver
//
// Raw ESP-IDF one-shot unit + curve-fitting calibration, both at 12 dB
// attenuation (full 0-3.3 V range) and default bit width.

use esp_idf_sys::{
    adc_atten_t_ADC_ATTEN_DB_12, adc_bitwidth_t_ADC_BITWIDTH_DEFAULT, adc_cali_handle_t,
    adc_cali_curve_fitting_config_t, adc_cali_create_scheme_curve_fitting, adc_cali_raw_to_voltage,
    adc_oneshot_chan_cfg_t, adc_oneshot_config_channel, adc_oneshot_new_unit, adc_oneshot_read,
    adc_oneshot_unit_handle_t, adc_oneshot_unit_init_cfg_t, adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
    adc_unit_t_ADC_UNIT_1, esp, esp_err_t, EspError,
};

use crate::adc::{AdcChannel, AdcError, AdcUnit, Calibration};

fn check(ret: esp_err_t) -> Result<(), AdcError> {
    esp!(ret).map_err(|e| AdcError::HardwareFault(e.code()))
}

pub struct EspAdcUnit {
    handle: adc_oneshot_unit_handle_t,
}

// SAFETY: the handle is only ever used by whoever holds it exclusively through
// the ADC service; the one-shot driver has no thread affinity.
unsafe impl Send for EspAdcUnit {}

impl EspAdcUnit {
    pub fn new() -> Result<Self, EspError> {
        let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        let cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..unsafe { core::mem::zeroed() }
        };
        esp!(unsafe { adc_oneshot_new_unit(&cfg, &mut handle) })?;
        Ok(Self { handle })
    }
}

impl AdcUnit for EspAdcUnit {
    fn configure_channel(&mut self, channel: AdcChannel) -> Result<(), AdcError> {
        let cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_DEFAULT,
        };
        check(unsafe { adc_oneshot_config_channel(self.handle, channel.0 as _, &cfg) })
    }

    fn read_raw(&mut self, channel: AdcChannel) -> Result<i32, AdcError> {
        let mut raw: i32 = 0;
        check(unsafe { adc_oneshot_read(self.handle, channel.0 as _, &mut raw) })?;
        Ok(raw)
    }
}

pub struct EspCalibration {
    handle: adc_cali_handle_t,
}

// SAFETY: read-only after creation.
unsafe impl Send for EspCalibration {}

impl EspCalibration {
    pub fn new() -> Result<Self, EspError> {
        let mut handle: adc_cali_handle_t = core::ptr::null_mut();
        let cfg = adc_cali_curve_fitting_config_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_DEFAULT,
            ..unsafe { core::mem::zeroed() }
        };
        esp!(unsafe { adc_cali_create_scheme_curve_fitting(&cfg, &mut handle) })?;
        Ok(Self { handle })
    }
}

impl Calibration for EspCalibration {
    fn raw_to_millivolts(&self, raw: i32) -> Result<i32, AdcError> {
        let mut mv: i32 = 0;
        check(unsafe { adc_cali_raw_to_voltage(self.handle, raw, &mut mv) })?;
        Ok(mv)
    }
}
