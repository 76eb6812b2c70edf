// BedSense - Exponential Moving Average
//
// avg' = alpha * x + (1 - alpha) * avg. Non-finite samples are skipped so a
// failed read cannot poison the average.

#[derive(Debug, Clone, Copy)]
pub struct Ema {
    alpha: f32,
    value: Option<f32>,
}

impl Ema {
    pub fn new(alpha: f32) -> Self {
        debug_assert!((0.0..=1.0).contains(&alpha), "alpha must be within 0..=1");
        Self { alpha, value: None }
    }

    /// Start from a known value instead of the first accepted sample.
    pub fn seeded(alpha: f32, initial: f32) -> Self {
        let mut ema = Self::new(alpha);
        if initial.is_finite() {
            ema.value = Some(initial);
        }
        ema
    }

    /// Feed one sample. Returns the updated average, or `None` if the sample
    /// was rejected and nothing is known yet.
    pub fn update(&mut self, sample: f32) -> Option<f32> {
        if !sample.is_finite() {
            return self.value;
        }
        let next = match self.value {
            Some(avg) => self.alpha * sample + (1.0 - self.alpha) * avg,
            None => sample,
        };
        self.value = Some(next);
        self.value
    }

    pub fn value(&self) -> Option<f32> {
        self.value
    }
}
