#![no_std]
#![no_main]

extern crate alloc;

// Required for ESP-IDF bootloader compatibility
// Use explicit parameters to ensure correct efuse block revision values
esp_bootloader_esp_idf::esp_app_desc!(
    env!("CARGO_PKG_VERSION"),  // version
    env!("CARGO_PKG_NAME"),     // project_name
    "00:00:00",                 // build_time
    "2025-01-01",               // build_date
    "0.0.0",                    // idf_ver (not using IDF)
    0x10000,                    // mmu_page_size (64KB)
    0,                          // min_efuse_blk_rev_full (accept all)
    u16::MAX                    // max_efuse_blk_rev_full (accept all)
);

use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Ticker};
use esp_backtrace as _;
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::Async;
use log::error;
use static_cell::StaticCell;

use sensor_peripheral_firmware::config;
use sensor_peripheral_firmware::sensors::{Lsm303ah, Si7060};
use sensor_peripheral_firmware::tasks::{measurement_trigger, SensorTask};
use sensor_peripheral_firmware::transport::I2cTransport;
use sensor_peripheral_firmware::SensorChannel;

/// Register transport over the shared I2C master
type Transport = I2cTransport<I2c<'static, Async>>;

/// I2C bus shared by both sensor tasks; each sampling cycle holds the lock
type SharedBus = Mutex<CriticalSectionRawMutex, Transport>;

type TemperatureTask = SensorTask<'static, CriticalSectionRawMutex, Transport, Si7060>;
type AccelerometerTask = SensorTask<'static, CriticalSectionRawMutex, Transport, Lsm303ah>;

/// Type alias for the BLE controller
type BleController = trouble_host::prelude::ExternalController<
    esp_radio::ble::controller::BleConnector<'static>,
    10,
>;

/// Latest temperature sample (degrees C)
static TEMPERATURE: SensorChannel<CriticalSectionRawMutex, i16> = SensorChannel::new(0);

/// Latest accelerometer sample (X axis)
static ACCELEROMETER: SensorChannel<CriticalSectionRawMutex, u16> = SensorChannel::new(0);

/// Static executor for embassy
static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

/// Static cell for esp-radio controller (needed for 'static lifetime)
static RADIO_CONTROLLER: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();

static I2C_BUS: StaticCell<SharedBus> = StaticCell::new();

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger(log::LevelFilter::Info);

    // Initialise heap allocator for BLE support (64KB - BLE requires significant heap)
    esp_alloc::heap_allocator!(size: 64 * 1024);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    // Initialise the RTOS scheduler with timer - MUST be done before any async operations
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // I2C master in standard mode; pins match config::i2c
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(config::i2c::FREQUENCY_KHZ)),
    )
    .unwrap()
    .with_sda(peripherals.GPIO4)
    .with_scl(peripherals.GPIO5)
    .into_async();
    let bus: &'static SharedBus = I2C_BUS.init(Mutex::new(I2cTransport::new(i2c)));

    // Read unique device ID from eFuse MAC address (last 3 bytes)
    let mac = esp_hal::efuse::Efuse::read_base_mac_address();
    let device_id: [u8; 3] = [mac[3], mac[4], mac[5]];

    // Initialise esp-radio for BLE support (must be after esp_rtos::start)
    let radio_controller = RADIO_CONTROLLER.init(
        esp_radio::init().expect("Failed to initialize esp-radio")
    );

    // Create BLE connector (ownership is passed to ExternalController)
    let ble_connector = esp_radio::ble::controller::BleConnector::new(
        radio_controller,
        peripherals.BT,
        esp_radio::ble::Config::default(),
    ).expect("Failed to initialize BLE connector");

    // Wrap in ExternalController for trouble-host compatibility
    let controller: BleController = trouble_host::prelude::ExternalController::new(ble_connector);

    // Create and run the embassy executor
    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(async_main(spawner, bus, controller, device_id));
    })
}

#[embassy_executor::task]
async fn async_main(
    spawner: Spawner,
    bus: &'static SharedBus,
    ble_controller: BleController,
    device_id: [u8; 3],
) {
    // A sensor that fails initialisation stays disabled; its characteristic
    // keeps reporting the initial value
    match SensorTask::start(&TEMPERATURE, bus, Si7060::default()).await {
        Ok(task) => {
            spawner.must_spawn(temperature_task(task));
            spawner.must_spawn(temperature_trigger_task(Ticker::every(Duration::from_millis(
                config::temperature::PERIOD_MS,
            ))));
        }
        Err(e) => error!("temperature: initialisation failed ({:?}), sensor disabled", e),
    }

    match SensorTask::start(&ACCELEROMETER, bus, Lsm303ah::default()).await {
        Ok(task) => {
            spawner.must_spawn(accelerometer_task(task));
            spawner.must_spawn(accelerometer_trigger_task(Ticker::every(Duration::from_millis(
                config::accelerometer::PERIOD_MS,
            ))));
        }
        Err(e) => error!("accelerometer: initialisation failed ({:?}), sensor disabled", e),
    }

    spawner.must_spawn(ble_host_task(ble_controller, device_id));
}

#[embassy_executor::task]
async fn temperature_task(task: TemperatureTask) {
    task.run().await;
}

#[embassy_executor::task]
async fn accelerometer_task(task: AccelerometerTask) {
    task.run().await;
}

/// Requests a temperature measurement every 2 s
#[embassy_executor::task]
async fn temperature_trigger_task(ticker: Ticker) {
    measurement_trigger(ticker, &TEMPERATURE).await;
}

/// Requests an accelerometer measurement every 1 s
#[embassy_executor::task]
async fn accelerometer_trigger_task(ticker: Ticker) {
    measurement_trigger(ticker, &ACCELEROMETER).await;
}

/// Task that manages BLE connectivity
///
/// Answers read requests on the sensors service with the latest samples.
#[embassy_executor::task]
async fn ble_host_task(controller: BleController, device_id: [u8; 3]) {
    sensor_peripheral_firmware::tasks::ble_task(
        controller,
        device_id,
        TEMPERATURE.publisher(),
        ACCELEROMETER.publisher(),
    )
    .await;
}
