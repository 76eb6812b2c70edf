// BedSense - Sensing Event Bus & Presentation Updates
//
// Producers OR bits into a shared atomic word; one consumer waits for any bit
// of interest and takes (reads + clears) them in a single atomic step. A bit
// set several times before the consumer wakes is observed once.

use std::fmt::{self, Write as _};
use std::ops::{BitOr, BitOrAssign};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Event bits
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventBits(u32);

impl EventBits {
    pub const NONE: Self = Self(0);
    /// A new temperature sample was recorded.
    pub const TEMP_UPDATE: Self = Self(1 << 0);
    /// Bed occupancy flipped.
    pub const OCC_UPDATE: Self = Self(1 << 1);
    /// The multi-tap help gesture was recognised.
    pub const HELP: Self = Self(1 << 2);
    /// Over-temperature alarm turned on or off.
    pub const ALARM_UPDATE: Self = Self(1 << 3);

    pub const ALL: Self = Self(0b1111);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for EventBits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventBits {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// ---------------------------------------------------------------------------
// Event bus
// ---------------------------------------------------------------------------
pub struct EventBus {
    bits: AtomicU32,
    gate: Mutex<()>,
    wake: Condvar,
}

impl EventBus {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
            gate: Mutex::new(()),
            wake: Condvar::new(),
        }
    }

    /// Set `bits`; never blocks on the consumer.
    pub fn set(&self, bits: EventBits) {
        if bits.is_empty() {
            return;
        }
        self.bits.fetch_or(bits.0, Ordering::AcqRel);
        // Pass through the gate so a consumer between its check and its wait
        // cannot miss the notification.
        drop(self.gate.lock().unwrap_or_else(PoisonError::into_inner));
        self.wake.notify_all();
    }

    pub fn clear(&self, bits: EventBits) {
        self.bits.fetch_and(!bits.0, Ordering::AcqRel);
    }

    /// Currently pending bits, without consuming them.
    pub fn pending(&self) -> EventBits {
        EventBits(self.bits.load(Ordering::Acquire))
    }

    fn take(&self, mask: EventBits) -> EventBits {
        EventBits(self.bits.fetch_and(!mask.0, Ordering::AcqRel) & mask.0)
    }

    /// Block until any bit in `mask` is set, then clear and return those bits.
    pub fn wait(&self, mask: EventBits) -> EventBits {
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            let taken = self.take(mask);
            if !taken.is_empty() {
                return taken;
            }
            gate = self.wake.wait(gate).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`EventBus::wait`] but gives up after `timeout`, returning
    /// [`EventBits::NONE`].
    pub fn wait_timeout(&self, mask: EventBits, timeout: Duration) -> EventBits {
        let deadline = Instant::now().checked_add(timeout);
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            let taken = self.take(mask);
            if !taken.is_empty() {
                return taken;
            }
            let remaining = match deadline {
                Some(d) => match d.checked_duration_since(Instant::now()) {
                    Some(r) if !r.is_zero() => r,
                    _ => return EventBits::NONE,
                },
                None => Duration::MAX,
            };
            gate = self
                .wake
                .wait_timeout(gate, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Presentation updates - pushed to the UI / transport layer
// ---------------------------------------------------------------------------

/// One state change for the presentation layer. `Display` renders the compact
/// text frame the web front end parses (`t:23.50`, `o:1`, `h:0`, `a:1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update {
    /// Newest temperature sample (degrees Celsius, may be NaN).
    LatestTemperature(f32),
    Occupancy(bool),
    Help(bool),
    Alarm(bool),
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::LatestTemperature(t) => write!(f, "t:{:.2}", t),
            Self::Occupancy(o) => write!(f, "o:{}", u8::from(o)),
            Self::Help(h) => write!(f, "h:{}", u8::from(h)),
            Self::Alarm(a) => write!(f, "a:{}", u8::from(a)),
        }
    }
}

/// Receiver of presentation updates (web socket broadcaster, display, log).
pub trait Publisher: Send {
    fn publish(&mut self, update: Update);
}

/// Publisher that only logs; used when no transport is attached.
#[derive(Debug, Default)]
pub struct LogPublisher;

impl Publisher for LogPublisher {
    fn publish(&mut self, update: Update) {
        log::info!("update {}", update);
    }
}

/// Full-history frame, oldest first, NaN samples dropped (`T:21.00,21.50`).
pub fn history_frame(samples: &[f32]) -> String {
    let mut frame = String::with_capacity(2 + samples.len() * 7);
    frame.push_str("T:");
    let mut first = true;
    for s in samples.iter().filter(|s| !s.is_nan()) {
        if !first {
            frame.push(',');
        }
        first = false;
        let _ = write!(frame, "{:.2}", s);
    }
    frame
}
