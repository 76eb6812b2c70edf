// End-to-end run of the force pipeline over a simulated divider: idle bed,
// someone lies down, then taps out a help request.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bedsense::adc::{AdcChannel, AdcError, AdcService, AdcUnit, Calibration};
use bedsense::config::*;
use bedsense::events::{EventBits, EventBus, Publisher, Update};
use bedsense::hub::SenseHub;
use bedsense::sensors::Fsr;
use bedsense::signal::occupancy::OccupancyMonitor;
use bedsense::signal::tap::TapDetector;
use bedsense::signal::AtomicF32;
use bedsense::tasks::force::{ForceMonitor, ForceTick};
use bedsense::tasks::notify::dispatch;
use bedsense::tasks::tap::tap_task;
use bedsense::tasks::temperature::TemperatureRecord;

// Divider voltages for a few loads on the FSR curve.
const IDLE_MV: i32 = 20; // ~164k, above the curve -> 0 g
const LYING_MV: i32 = 1158; // ~1850 ohm -> ~600 g
const SPIKE_MV: i32 = 2276; // ~450 ohm -> ~4000 g

struct SimulatedDivider {
    mv: Arc<AtomicI32>,
}

impl AdcUnit for SimulatedDivider {
    fn configure_channel(&mut self, _channel: AdcChannel) -> Result<(), AdcError> {
        Ok(())
    }

    fn read_raw(&mut self, _channel: AdcChannel) -> Result<i32, AdcError> {
        Ok(self.mv.load(Ordering::SeqCst))
    }
}

struct Millivolts;

impl Calibration for Millivolts {
    fn raw_to_millivolts(&self, raw: i32) -> Result<i32, AdcError> {
        Ok(raw)
    }
}

#[derive(Default)]
struct Recorder(Vec<Update>);

impl Publisher for Recorder {
    fn publish(&mut self, update: Update) {
        self.0.push(update);
    }
}

struct Bed {
    mv: Arc<AtomicI32>,
    fsr: Fsr<AdcService<SimulatedDivider, Millivolts>>,
    now_ms: u32,
}

impl Bed {
    fn tick(&mut self, monitor: &mut ForceMonitor, mv: i32) -> ForceTick {
        self.mv.store(mv, Ordering::SeqCst);
        let force = self.fsr.read(Duration::from_millis(10));
        let tick = monitor.process(force, self.now_ms);
        self.now_ms += FSR_SAMPLE_INTERVAL_MS as u32;
        tick
    }

    fn hold(&mut self, monitor: &mut ForceMonitor, mv: i32, ms: u32) {
        for _ in 0..ms / FSR_SAMPLE_INTERVAL_MS as u32 {
            self.tick(monitor, mv);
        }
    }
}

fn pump(hub: &SenseHub, out: &mut Recorder) {
    let events = hub.bus().wait_timeout(EventBits::ALL, Duration::ZERO);
    dispatch(hub, events, out);
}

#[test]
fn idle_then_occupied_then_help() {
    let mv = Arc::new(AtomicI32::new(IDLE_MV));
    let adc = Arc::new(AdcService::with_hardware(
        SimulatedDivider { mv: Arc::clone(&mv) },
        Millivolts,
    ));
    let fsr = Fsr::init(adc).unwrap();

    let bus = Arc::new(EventBus::new());
    let estimate = Arc::new(AtomicF32::nan());
    let occupancy = Arc::new(OccupancyMonitor::new(OCCUPANCY_THRESHOLD_G));
    let hub = SenseHub::new(
        Arc::clone(&bus),
        Arc::clone(&occupancy),
        Arc::new(TemperatureRecord::new()),
    );
    let mut out = Recorder::default();

    let (tap_tx, tap_rx) = sync_channel(TAP_QUEUE_LEN);
    let tapper = {
        let bus = Arc::clone(&bus);
        thread::spawn(move || {
            tap_task(
                tap_rx,
                TapDetector::<TAPS_PER_GESTURE>::new(TAP_GESTURE_WINDOW_MS),
                bus,
            )
        })
    };

    // Idle bed reads 0 g and stays unoccupied.
    let initial = fsr.read(Duration::ZERO);
    assert_eq!(initial, 0.0);
    let mut monitor = ForceMonitor::new(
        initial,
        FORCE_EMA_ALPHA,
        TAP_SPIKE_THRESHOLD_G,
        TAP_DEBOUNCE_MS,
        tap_tx,
        Arc::clone(&estimate),
    );
    let mut bed = Bed { mv, fsr, now_ms: 1_000 };

    bed.hold(&mut monitor, IDLE_MV, 1_000);
    assert_eq!(estimate.load(), 0.0);
    assert!(!occupancy.check(estimate.load(), &bus));
    pump(&hub, &mut out);
    assert!(out.0.is_empty());

    // Someone lies down (~600 g); the next periodic check flips occupancy.
    bed.hold(&mut monitor, LYING_MV, 4_000);
    assert!((estimate.load() - 600.0).abs() < 5.0, "{}", estimate.load());
    assert!(occupancy.check(estimate.load(), &bus));
    assert!(!occupancy.check(estimate.load(), &bus));
    pump(&hub, &mut out);
    assert_eq!(out.0, [Update::Occupancy(true)]);

    // Five spikes 400 ms apart: one help request.
    for _ in 0..TAPS_PER_GESTURE {
        assert!(matches!(bed.tick(&mut monitor, SPIKE_MV), ForceTick::Tap { .. }));
        bed.hold(&mut monitor, LYING_MV, 380);
    }
    assert_eq!(
        bus.wait_timeout(EventBits::HELP, Duration::from_secs(5)),
        EventBits::HELP
    );
    dispatch(&hub, EventBits::HELP, &mut out);
    assert!(hub.help_requested());

    // A sixth spike 3 s later does not retrigger.
    bed.hold(&mut monitor, LYING_MV, 3_000);
    assert!(matches!(bed.tick(&mut monitor, SPIKE_MV), ForceTick::Tap { .. }));
    drop(monitor);
    tapper.join().unwrap();
    assert!(!bus.pending().intersects(EventBits::HELP));

    // Still occupied; no further occupancy events.
    assert!(!occupancy.check(estimate.load(), &bus));
    pump(&hub, &mut out);
    assert_eq!(out.0, [Update::Occupancy(true), Update::Help(true)]);

    hub.clear_help(&mut out);
    assert!(!hub.help_requested());
    assert_eq!(out.0.last(), Some(&Update::Help(false)));
}
