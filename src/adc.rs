// BedSense - Calibrated ADC Service
//
// The ADC unit is not reentrant, so every channel shares one lock. A reader
// checks the unit out of its slot for the duration of a single raw sample and
// returns it afterwards; other readers wait on a condition variable for at
// most their own `max_wait` budget.

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;

/// ADC1 channel number (0-4 map to GPIO0-4 on the ESP32-C3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdcChannel(pub u8);

impl fmt::Display for AdcChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ADC1_CH{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdcError {
    #[error("ADC service used before initialisation")]
    NotInitialized,
    #[error("{0} read before being configured")]
    ChannelNotConfigured(AdcChannel),
    #[error("timed out waiting for the ADC lock")]
    Timeout,
    #[error("ADC driver failure (esp_err_t {0})")]
    HardwareFault(i32),
}

/// Raw one-shot access to the ADC peripheral.
pub trait AdcUnit: Send {
    /// Apply the fixed attenuation / bit-width settings to `channel`.
    fn configure_channel(&mut self, channel: AdcChannel) -> Result<(), AdcError>;

    /// Take one raw conversion on `channel`.
    fn read_raw(&mut self, channel: AdcChannel) -> Result<i32, AdcError>;
}

/// Device-specific raw code to millivolt mapping.
pub trait Calibration: Send {
    fn raw_to_millivolts(&self, raw: i32) -> Result<i32, AdcError>;
}

/// Anything that can hand out calibrated channel voltages to sensing tasks.
pub trait VoltageSource: Send + Sync {
    fn configure(&self, channel: AdcChannel) -> Result<(), AdcError>;

    fn read_millivolts(&self, channel: AdcChannel, max_wait: Duration) -> Result<i32, AdcError>;
}

// Bit per channel; ADC1 has fewer than 32 channels.
#[derive(Debug, Default, Clone, Copy)]
struct ChannelSet(u32);

impl ChannelSet {
    fn contains(self, channel: AdcChannel) -> bool {
        channel.0 < 32 && self.0 & (1 << channel.0) != 0
    }

    fn insert(&mut self, channel: AdcChannel) {
        if channel.0 < 32 {
            self.0 |= 1 << channel.0;
        }
    }
}

struct Hardware<U, C> {
    unit: U,
    calibration: C,
}

enum Slot<U, C> {
    Uninitialized,
    Idle(Hardware<U, C>),
    Busy,
}

struct State<U, C> {
    slot: Slot<U, C>,
    configured: ChannelSet,
}

/// Mutex-guarded, calibrated, multi-channel ADC access.
pub struct AdcService<U, C> {
    state: Mutex<State<U, C>>,
    returned: Condvar,
}

impl<U: AdcUnit, C: Calibration> AdcService<U, C> {
    /// An uninitialised service; every read fails with
    /// [`AdcError::NotInitialized`] until [`AdcService::init`] is called.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(State {
                slot: Slot::Uninitialized,
                configured: ChannelSet(0),
            }),
            returned: Condvar::new(),
        }
    }

    /// Install the ADC unit and its calibration profile.
    pub fn init(&self, unit: U, calibration: C) {
        let mut state = self.wait_idle_or_uninit();
        state.slot = Slot::Idle(Hardware { unit, calibration });
        drop(state);
        self.returned.notify_all();
        log::info!("ADC service initialised");
    }

    /// Convenience constructor for an already initialised service.
    pub fn with_hardware(unit: U, calibration: C) -> Self {
        let service = Self::new();
        service.init(unit, calibration);
        service
    }

    fn lock_state(&self) -> MutexGuard<'_, State<U, C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Waits (without bound) until nobody has the unit checked out.
    fn wait_idle_or_uninit(&self) -> MutexGuard<'_, State<U, C>> {
        let guard = self.lock_state();
        self.returned
            .wait_while(guard, |s| matches!(s.slot, Slot::Busy))
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn checkout(&self, max_wait: Duration) -> Result<Checkout<'_, U, C>, AdcError> {
        let guard = self.lock_state();
        let (mut state, _) = self
            .returned
            .wait_timeout_while(guard, max_wait, |s| matches!(s.slot, Slot::Busy))
            .unwrap_or_else(PoisonError::into_inner);

        match std::mem::replace(&mut state.slot, Slot::Busy) {
            Slot::Idle(hw) => Ok(Checkout {
                service: self,
                hw: Some(hw),
                configured: state.configured,
            }),
            Slot::Uninitialized => {
                state.slot = Slot::Uninitialized;
                Err(AdcError::NotInitialized)
            }
            Slot::Busy => Err(AdcError::Timeout),
        }
    }
}

impl<U: AdcUnit, C: Calibration> Default for AdcService<U, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: AdcUnit, C: Calibration> VoltageSource for AdcService<U, C> {
    fn configure(&self, channel: AdcChannel) -> Result<(), AdcError> {
        let state = self.lock_state();
        if matches!(state.slot, Slot::Uninitialized) {
            return Err(AdcError::NotInitialized);
        }
        if state.configured.contains(channel) {
            log::warn!("{} already configured, keeping existing settings", channel);
            return Ok(());
        }
        drop(state);

        let mut checkout = self.checkout(Duration::MAX)?;
        checkout.hw_mut().unit.configure_channel(channel)?;
        checkout.configured.insert(channel);
        log::debug!("{} configured", channel);
        Ok(())
    }

    fn read_millivolts(&self, channel: AdcChannel, max_wait: Duration) -> Result<i32, AdcError> {
        let mut checkout = self.checkout(max_wait)?;
        if !checkout.configured.contains(channel) {
            return Err(AdcError::ChannelNotConfigured(channel));
        }

        let hw = checkout.hw_mut();
        let raw = hw.unit.read_raw(channel).map_err(|e| {
            log::error!("cannot read from {} ({})", channel, e);
            e
        })?;
        hw.calibration.raw_to_millivolts(raw).map_err(|e| {
            log::error!("cannot convert raw ADC value ({}) to voltage ({})", raw, e);
            e
        })
    }
}

// Exclusive use of the hardware; puts it back and wakes a waiter on drop, so
// early returns and panics inside a sample cannot leave the unit checked out.
struct Checkout<'a, U, C> {
    service: &'a AdcService<U, C>,
    hw: Option<Hardware<U, C>>,
    configured: ChannelSet,
}

impl<U, C> Checkout<'_, U, C> {
    fn hw_mut(&mut self) -> &mut Hardware<U, C> {
        match self.hw.as_mut() {
            Some(hw) => hw,
            None => unreachable!("hardware is present until the checkout is dropped"),
        }
    }
}

impl<U, C> Drop for Checkout<'_, U, C> {
    fn drop(&mut self) {
        if let Some(hw) = self.hw.take() {
            let mut state = self.service.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.slot = Slot::Idle(hw);
            state.configured = self.configured;
            drop(state);
            self.service.returned.notify_one();
        }
    }
}
