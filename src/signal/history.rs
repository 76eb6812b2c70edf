// BedSense - Fixed-Length Sample History
//
// Oldest sample first, newest last. Starts out full of NaN ("no data") and
// never grows; each push shifts everything one slot left.

#[derive(Debug, Clone)]
pub struct History<const N: usize> {
    samples: [f32; N],
}

impl<const N: usize> History<N> {
    pub fn new() -> Self {
        assert!(N > 0, "history needs at least one slot");
        Self {
            samples: [f32::NAN; N],
        }
    }

    /// Drop the oldest sample and append `sample` as the newest. NaN is
    /// stored as-is.
    pub fn push(&mut self, sample: f32) {
        self.samples.copy_within(1.., 0);
        self.samples[N - 1] = sample;
    }

    pub fn latest(&self) -> f32 {
        self.samples[N - 1]
    }

    /// All slots, oldest first, including NaN gaps.
    pub fn samples(&self) -> &[f32; N] {
        &self.samples
    }

    /// Valid samples only, oldest first.
    pub fn valid(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied().filter(|s| !s.is_nan())
    }
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::History;

    #[test]
    fn starts_empty() {
        let h = History::<4>::new();
        assert!(h.samples().iter().all(|s| s.is_nan()));
        assert!(h.latest().is_nan());
        assert_eq!(h.valid().count(), 0);
    }

    #[test]
    fn nan_only_until_first_filled() {
        let mut h = History::<4>::new();
        h.push(1.0);
        h.push(2.0);
        assert_eq!(h.valid().collect::<Vec<_>>(), [1.0, 2.0]);
        assert!(h.samples()[0].is_nan() && h.samples()[1].is_nan());
        h.push(3.0);
        h.push(4.0);
        assert_eq!(h.samples(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut h = History::<3>::new();
        for s in 1..=10 {
            h.push(s as f32);
            if s >= 3 {
                let expect = [(s - 2) as f32, (s - 1) as f32, s as f32];
                assert_eq!(h.samples(), &expect);
            }
        }
        assert_eq!(h.latest(), 10.0);
    }

    #[test]
    fn failed_reads_are_kept_as_gaps() {
        let mut h = History::<3>::new();
        h.push(20.0);
        h.push(f32::NAN);
        h.push(21.0);
        assert_eq!(h.valid().collect::<Vec<_>>(), [20.0, 21.0]);
        assert_eq!(h.latest(), 21.0);
    }
}
