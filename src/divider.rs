// BedSense - Voltage-Divider Inversion
//
//   VCC -- R1 (sensor) -- + -- R_pd -- GND
//                         |
//                        ADC
//
// I = VCC / (R1 + R_pd) = V / R_pd  =>  R1 = R_pd * (VCC / V - 1)

/// Resistance of the upper (sensor) leg given the voltage `v_mv` measured
/// across the known pulldown `r_pulldown`, with the divider fed from `vcc_mv`.
///
/// A reading of 0 mV or below means no current flows through the sensor and
/// is reported as [`f32::INFINITY`] (open circuit / unloaded). Readings at or
/// above the supply clamp to 0 Ω. NaN propagates unchanged.
pub fn series_resistance(v_mv: f32, r_pulldown: f32, vcc_mv: f32) -> f32 {
    if v_mv.is_nan() {
        return f32::NAN;
    }
    if v_mv <= 0.0 {
        return f32::INFINITY;
    }
    if v_mv >= vcc_mv {
        return 0.0;
    }
    r_pulldown * (vcc_mv / v_mv - 1.0)
}
