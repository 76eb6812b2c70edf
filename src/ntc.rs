// BedSense - NTC Thermistor Transfer Function
//
// Single-point B-parameter approximation (not a full Steinhart-Hart fit):
//   1/T = ln(R/R0)/B + 1/T0   (kelvin)
// Only meaningful inside the part's rated range; nothing here bounds-checks.

pub const KELVIN_OFFSET: f32 = 273.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaModel {
    /// Rated resistance in ohms at `t0_c`.
    pub r0: f32,
    /// Rated temperature in degrees Celsius.
    pub t0_c: f32,
    /// Material B constant in kelvin.
    pub beta: f32,
}

impl BetaModel {
    pub const fn new(r0: f32, t0_c: f32, beta: f32) -> Self {
        Self { r0, t0_c, beta }
    }

    /// Temperature in degrees Celsius at resistance `ohms`.
    pub fn celsius(&self, ohms: f32) -> f32 {
        let t0_k = self.t0_c + KELVIN_OFFSET;
        let t_k = 1.0 / ((ohms / self.r0).ln() / self.beta + 1.0 / t0_k);
        t_k - KELVIN_OFFSET
    }
}
