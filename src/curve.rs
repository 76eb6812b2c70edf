// BedSense - Piecewise-Linear Force Curve
//
// Breakpoints are ordered by strictly decreasing resistance (an FSR's
// resistance falls as force rises) and non-decreasing force.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub ohms: f32,
    pub grams: f32,
}

impl CurvePoint {
    pub const fn new(ohms: f32, grams: f32) -> Self {
        Self { ohms, grams }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("a curve needs at least two breakpoints")]
    TooFewPoints,
    #[error("breakpoint {0} does not decrease in resistance")]
    ResistanceNotDecreasing(usize),
    #[error("breakpoint {0} decreases in force")]
    ForceDecreasing(usize),
}

#[derive(Debug, Clone)]
pub struct ForceCurve<const N: usize> {
    points: [CurvePoint; N],
    max_force: f32,
}

impl<const N: usize> ForceCurve<N> {
    /// Validates the breakpoints; `max_force` is the rated ceiling applied to
    /// every result.
    pub fn new(points: [CurvePoint; N], max_force: f32) -> Result<Self, CurveError> {
        if N < 2 {
            return Err(CurveError::TooFewPoints);
        }
        for (i, w) in points.windows(2).enumerate() {
            if w[1].ohms >= w[0].ohms {
                return Err(CurveError::ResistanceNotDecreasing(i + 1));
            }
            if w[1].grams < w[0].grams {
                return Err(CurveError::ForceDecreasing(i + 1));
            }
        }
        Ok(Self { points, max_force })
    }

    pub fn max_force(&self) -> f32 {
        self.max_force
    }

    /// Force in grams at resistance `ohms`.
    ///
    /// Above the highest breakpoint the sensor is considered unloaded (0 g).
    /// Below the lowest breakpoint the result is the rated maximum rather than
    /// an extrapolation. NaN propagates.
    pub fn force_at(&self, ohms: f32) -> f32 {
        if ohms.is_nan() {
            return f32::NAN;
        }
        let first = self.points[0];
        let last = self.points[N - 1];
        if ohms > first.ohms {
            return 0.0;
        }
        if ohms < last.ohms {
            return self.max_force;
        }

        let segment = self
            .points
            .windows(2)
            .find(|w| ohms <= w[0].ohms && ohms >= w[1].ohms);
        let force = match segment {
            Some(w) => {
                let (a, b) = (w[0], w[1]);
                let slope = (b.grams - a.grams) / (b.ohms - a.ohms);
                let intercept = a.grams - a.ohms * slope;
                slope * ohms + intercept
            }
            None => last.grams,
        };
        force.min(self.max_force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FSR_CURVE, FSR_MAX_FORCE_G, FSR_PULLDOWN_OHMS, SUPPLY_MV};
    use crate::divider::series_resistance;

    fn fsr() -> ForceCurve<{ crate::config::FSR_CURVE_POINTS }> {
        ForceCurve::new(FSR_CURVE, FSR_MAX_FORCE_G).unwrap()
    }

    #[test]
    fn breakpoints_are_exact() {
        let curve = fsr();
        for p in FSR_CURVE {
            let f = curve.force_at(p.ohms);
            assert!((f - p.grams).abs() < 1e-2, "{} ohms -> {} g", p.ohms, f);
        }
    }

    #[test]
    fn midpoint_of_segment() {
        // Halfway between (2000, 500) and (1250, 1000)
        let f = fsr().force_at(1625.0);
        assert!((f - 750.0).abs() < 1e-2, "{f}");
    }

    #[test]
    fn unloaded_above_first_breakpoint() {
        let curve = fsr();
        assert_eq!(curve.force_at(100_001.0), 0.0);
        assert_eq!(curve.force_at(1.0e6), 0.0);
        assert_eq!(curve.force_at(f32::INFINITY), 0.0);
    }

    #[test]
    fn clamps_below_last_breakpoint() {
        let curve = fsr();
        assert_eq!(curve.force_at(200.0), FSR_MAX_FORCE_G);
        assert_eq!(curve.force_at(0.0), FSR_MAX_FORCE_G);
    }

    #[test]
    fn never_exceeds_ceiling() {
        let curve = ForceCurve::new(
            [CurvePoint::new(1000.0, 0.0), CurvePoint::new(100.0, 500.0)],
            200.0,
        )
        .unwrap();
        assert_eq!(curve.force_at(100.0), 200.0);
        assert!(curve.force_at(900.0) < 200.0);
    }

    #[test]
    fn continuous_and_monotonic_over_voltage_sweep() {
        let curve = fsr();
        let mut prev: Option<f32> = None;
        // Falling voltage means rising resistance, so force must not increase.
        let mut mv = SUPPLY_MV - 1.0;
        while mv > 1.0 {
            let f = curve.force_at(series_resistance(mv, FSR_PULLDOWN_OHMS, SUPPLY_MV));
            assert!(f <= FSR_MAX_FORCE_G);
            if let Some(p) = prev {
                assert!(f <= p + 1e-3, "force rose from {p} to {f} at {mv} mV");
                // 0.5 mV steps never jump by more than the steepest segment allows.
                if f > 0.0 {
                    assert!(p - f < 200.0, "jump from {p} to {f} at {mv} mV");
                }
            }
            prev = Some(f);
            mv -= 0.5;
        }
    }

    #[test]
    fn rejects_bad_curves() {
        assert_eq!(
            ForceCurve::new([CurvePoint::new(1.0, 1.0)], 10.0).unwrap_err(),
            CurveError::TooFewPoints
        );
        assert_eq!(
            ForceCurve::new([CurvePoint::new(100.0, 1.0), CurvePoint::new(100.0, 2.0)], 10.0)
                .unwrap_err(),
            CurveError::ResistanceNotDecreasing(1)
        );
        assert_eq!(
            ForceCurve::new([CurvePoint::new(100.0, 5.0), CurvePoint::new(50.0, 2.0)], 10.0)
                .unwrap_err(),
            CurveError::ForceDecreasing(1)
        );
    }
}
