//! BLE task for serving sensor reads
//!
//! Implements the BLE host task that advertises the peripheral and answers
//! read requests on the sensors service from the sensor channels.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use log::{debug, info, warn};
use trouble_host::prelude::*;

use crate::ble::service::SensorsService;
use crate::config;
use crate::publisher::ValuePublisher;

/// Number of maximum concurrent connections
const CONNECTIONS_MAX: usize = 1;
/// Number of L2CAP channels
const L2CAP_CHANNELS_MAX: usize = 2;

/// BLE GATT Server with the sensors service
#[gatt_server(mutex_type = CriticalSectionRawMutex)]
struct Server {
    sensors: SensorsService,
}

/// Main BLE task that manages the Bluetooth stack and connections
///
/// This task:
/// 1. Builds the host stack and GATT server
/// 2. Advertises as "Dialog Custom"
/// 3. On each read of a sensor characteristic, loads the current value
///    from its publisher before accepting the read
pub async fn ble_task<C: Controller, M: RawMutex>(
    controller: C,
    device_id: [u8; 3],
    temperature: ValuePublisher<'_, M, i16>,
    acceleration: ValuePublisher<'_, M, u16>,
) {
    info!("BLE: Starting as '{}'", config::ble::DEVICE_NAME);

    let mut resources: HostResources<DefaultPacketPool, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX> =
        HostResources::new();

    // Static random address derived from the chip ID
    let stack = trouble_host::new(controller, &mut resources).set_random_address(Address::random([
        device_id[0],
        device_id[1],
        device_id[2],
        0x1E,
        0x83,
        0xE7,
    ]));

    let Host {
        mut peripheral,
        mut runner,
        ..
    } = stack.build();

    let gap = GapConfig::Peripheral(PeripheralConfig {
        name: config::ble::DEVICE_NAME,
        appearance: &appearance::UNKNOWN,
    });
    let server: Server = match Server::new_with_config(gap) {
        Ok(s) => s,
        Err(_) => {
            warn!("BLE: GATT server setup failed");
            return;
        }
    };

    let runner_task = runner.run();

    let peripheral_task = async {
        let mut adv_data = [0u8; 31];
        let len = match AdStructure::encode_slice(
            &[
                AdStructure::Flags(LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED),
                AdStructure::CompleteLocalName(config::ble::DEVICE_NAME.as_bytes()),
            ],
            &mut adv_data,
        ) {
            Ok(l) => l,
            Err(_) => return,
        };

        loop {
            debug!("BLE: Advertising...");
            let advertiser = match peripheral
                .advertise(
                    &Default::default(),
                    Advertisement::ConnectableScannableUndirected {
                        adv_data: &adv_data[..len],
                        scan_data: &[],
                    },
                )
                .await
            {
                Ok(a) => a,
                Err(_) => continue,
            };

            let acceptor = match advertiser.accept().await {
                Ok(a) => {
                    info!("BLE: Connected");
                    a
                }
                Err(_) => continue,
            };

            let conn = match acceptor.with_attribute_server(&*server) {
                Ok(c) => c,
                Err(_) => continue,
            };

            loop {
                match conn.next().await {
                    GattConnectionEvent::Disconnected { reason: _ } => {
                        info!("BLE: Disconnected");
                        break;
                    }
                    GattConnectionEvent::Gatt { event } => match event {
                        GattEvent::Read(read_event) => {
                            refresh_value(&server, read_event.handle(), &temperature, &acceleration);
                            let _ = read_event.accept();
                        }
                        GattEvent::Write(write_event) => {
                            let _ = write_event.accept();
                        }
                        GattEvent::Other(other_event) => {
                            let _ = other_event.accept();
                        }
                    },
                    _ => {}
                }
            }
        }
    };

    embassy_futures::select::select(runner_task, peripheral_task).await;
}

/// Load the current sample into the characteristic being read
fn refresh_value<M: RawMutex>(
    server: &Server<'_>,
    handle: u16,
    temperature: &ValuePublisher<'_, M, i16>,
    acceleration: &ValuePublisher<'_, M, u16>,
) {
    let result = if handle == server.sensors.temperature.handle {
        server.set(&server.sensors.temperature, &temperature.read_payload())
    } else if handle == server.sensors.accelerometer.handle {
        server.set(&server.sensors.accelerometer, &acceleration.read_payload())
    } else {
        Ok(())
    };

    if result.is_err() {
        warn!("BLE: Failed to update characteristic {}", handle);
    }
}
