// BedSense - Multi-Tap Gesture Detector
//
// Keeps the last N tap timestamps in a ring. Once at least N taps have been
// seen since the last gesture, every new tap compares itself with the tap
// N-1 places back; if the whole run of N fits in the window the gesture fires
// and the count restarts. A run that is too slow does not reset the count, so
// the check keeps sliding over later taps.

/// Outcome of registering one tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Not enough taps yet, or the last N were spread too far apart.
    Counted { since_gesture: u32 },
    /// N taps landed inside the window.
    Gesture { span_ms: u32 },
}

#[derive(Debug, Clone)]
pub struct TapDetector<const N: usize> {
    stamps: [u32; N],
    next: usize,
    count: u32,
    window_ms: u32,
}

impl<const N: usize> TapDetector<N> {
    pub fn new(window_ms: u32) -> Self {
        assert!(N >= 2, "a gesture needs at least two taps");
        Self {
            stamps: [0; N],
            next: 0,
            count: 0,
            window_ms,
        }
    }

    /// Taps seen since the last recognised gesture.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Register a tap at `now_ms` (wrapping millisecond clock).
    pub fn register(&mut self, now_ms: u32) -> TapOutcome {
        self.stamps[self.next] = now_ms;
        self.next = (self.next + 1) % N;
        self.count = self.count.saturating_add(1);

        if (self.count as usize) < N {
            return TapOutcome::Counted {
                since_gesture: self.count,
            };
        }

        // After the write, `next` points at the oldest of the last N taps.
        let oldest = self.stamps[self.next];
        let span_ms = now_ms.wrapping_sub(oldest);
        if span_ms <= self.window_ms {
            self.count = 0;
            TapOutcome::Gesture { span_ms }
        } else {
            TapOutcome::Counted {
                since_gesture: self.count,
            }
        }
    }
}
