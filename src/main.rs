// BedSense - Firmware Entry Point
//
// Bring-up order:
//   1. Logger.
//   2. ADC service (one-shot unit + calibration profile).
//   3. FSR and thermistor channels.
//   4. Seed the force average from one reading.
//   5. Spawn force, tap, occupancy, temperature, alarm, and notify tasks.
//
// None of the tasks ever return; the main thread parks once they are up.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("bedsense firmware targets ESP-IDF (riscv32imc-esp-espidf); nothing to run on this host");
}

#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{OutputPin, PinDriver};
    use esp_idf_hal::prelude::*;

    use bedsense::adc::AdcService;
    use bedsense::config::*;
    use bedsense::drivers::adc::{EspAdcUnit, EspCalibration};
    use bedsense::drivers::led::AlarmLed;
    use bedsense::events::{EventBus, LogPublisher};
    use bedsense::hub::SenseHub;
    use bedsense::sensors::{Fsr, Thermistor};
    use bedsense::signal::occupancy::OccupancyMonitor;
    use bedsense::signal::tap::TapDetector;
    use bedsense::signal::AtomicF32;
    use bedsense::tasks;
    use bedsense::tasks::force::ForceMonitor;
    use bedsense::tasks::temperature::{TemperatureMonitor, TemperatureRecord};

    type Adc = AdcService<EspAdcUnit, EspCalibration>;

    pub fn run() -> anyhow::Result<()> {
        // Link esp-idf-sys runtime patches and initialise logging.
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("BedSense firmware starting");

        let peripherals = Peripherals::take()?;

        // ---- ADC service + sensors ----------------------------------------
        let adc: Arc<Adc> = Arc::new(AdcService::new());
        adc.init(EspAdcUnit::new()?, EspCalibration::new()?);

        let fsr = Fsr::init(Arc::clone(&adc))?;
        let thermistor = Thermistor::init(Arc::clone(&adc))?;

        // ---- Shared state -------------------------------------------------
        let bus = Arc::new(EventBus::new());
        let force_estimate = Arc::new(AtomicF32::nan());
        let occupancy = Arc::new(OccupancyMonitor::new(OCCUPANCY_THRESHOLD_G));
        let temperature = Arc::new(TemperatureRecord::new());
        let hub = Arc::new(SenseHub::new(
            Arc::clone(&bus),
            Arc::clone(&occupancy),
            Arc::clone(&temperature),
        ));

        // ---- Channels -----------------------------------------------------
        let (tap_tx, tap_rx) = mpsc::sync_channel::<u32>(TAP_QUEUE_LEN);

        let initial = fsr.read(Duration::MAX);
        if initial.is_nan() {
            log::warn!("initial FSR reading failed; smoothing starts at first good sample");
        }
        let force_monitor = ForceMonitor::new(
            initial,
            FORCE_EMA_ALPHA,
            TAP_SPIKE_THRESHOLD_G,
            TAP_DEBOUNCE_MS,
            tap_tx,
            Arc::clone(&force_estimate),
        );
        let temperature_monitor =
            TemperatureMonitor::new(TEMP_ALARM_THRESHOLD_C, Arc::clone(&temperature), Arc::clone(&bus));

        let led_pin = PinDriver::output(peripherals.pins.gpio8.downgrade_output())?;
        let led = AlarmLed::new(led_pin)?;

        // ---- Spawn tasks (map to FreeRTOS tasks via std::thread) ---------------

        thread::Builder::new()
            .name("force".into())
            .stack_size(STACK_FORCE)
            .spawn(move || {
                tasks::force::force_task(
                    fsr,
                    force_monitor,
                    Duration::from_millis(FSR_SAMPLE_INTERVAL_MS),
                    ADC_MAX_WAIT,
                );
            })?;

        let tap_bus = Arc::clone(&bus);
        thread::Builder::new()
            .name("tap".into())
            .stack_size(STACK_TAP)
            .spawn(move || {
                tasks::tap::tap_task(
                    tap_rx,
                    TapDetector::<TAPS_PER_GESTURE>::new(TAP_GESTURE_WINDOW_MS),
                    tap_bus,
                );
            })?;

        let occ_bus = Arc::clone(&bus);
        thread::Builder::new()
            .name("occupancy".into())
            .stack_size(STACK_OCCUPANCY)
            .spawn(move || {
                tasks::occupancy::occupancy_task(
                    occupancy,
                    force_estimate,
                    occ_bus,
                    Duration::from_millis(OCCUPANCY_CHECK_INTERVAL_MS),
                );
            })?;

        thread::Builder::new()
            .name("temperature".into())
            .stack_size(STACK_TEMPERATURE)
            .spawn(move || {
                tasks::temperature::temperature_task(
                    thermistor,
                    temperature_monitor,
                    Duration::from_millis(TEMP_SAMPLE_INTERVAL_MS),
                    ADC_MAX_WAIT,
                );
            })?;

        thread::Builder::new()
            .name("alarm".into())
            .stack_size(STACK_ALARM)
            .spawn(move || {
                tasks::alarm::alarm_task(temperature, led, Duration::from_millis(ALARM_BLINK_INTERVAL_MS));
            })?;

        thread::Builder::new()
            .name("notify".into())
            .stack_size(STACK_NOTIFY)
            .spawn(move || {
                tasks::notify::notify_task(hub, LogPublisher);
            })?;

        log::info!("Bring-up complete - entering normal operation");

        // Main thread has nothing left to do - park it forever.
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }
}
