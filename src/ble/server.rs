//! UART-service GATT server and advertising loop.
//!
//! The companion app speaks the Nordic UART Service (NUS): it
//! subscribes to TX notifications and receives each displayed sample
//! as text, exactly as it would from a serial console. The RX
//! characteristic accepts a single-byte `R` command to restart the
//! readout (blank + intro), which the app sends after a re-pair.

use crate::config::BLE_ADV_INTERVAL;
use crate::error::BleError;
use crate::AppEvent;
use defmt::{info, warn};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use nrf_softdevice::ble::{gatt_server, peripheral};
use nrf_softdevice::Softdevice;

/// Nordic UART Service.
#[nrf_softdevice::gatt_service(uuid = "6e400001-b5a3-f393-e0a9-e50e24dcca9e")]
pub struct UartService {
    /// App → device commands.
    #[characteristic(uuid = "6e400002-b5a3-f393-e0a9-e50e24dcca9e", write_without_response)]
    rx: heapless::Vec<u8, 20>,
    /// Device → app sample stream.
    #[characteristic(uuid = "6e400003-b5a3-f393-e0a9-e50e24dcca9e", notify)]
    tx: heapless::Vec<u8, 20>,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub uart: UartService,
}

/// Advertisement payload: flags + complete local name.
#[rustfmt::skip]
const ADV_DATA: &[u8] = &[
    // Flags: LE General Discoverable, BR/EDR not supported
    0x02, 0x01, 0x06,
    // Complete local name "TempID"
    0x07, 0x09, b'T', b'e', b'm', b'p', b'I', b'D',
];

/// Scan response: the 128-bit UART service UUID (little-endian).
#[rustfmt::skip]
const SCAN_DATA: &[u8] = &[
    0x11, 0x07,
    0x9e, 0xca, 0xdc, 0x24, 0x0e, 0xe5, 0xa9, 0xe0,
    0x93, 0xf3, 0xa3, 0xb5, 0x01, 0x00, 0x40, 0x6e,
];

/// Advertise, serve one central at a time, and stream samples to it.
///
/// Runs forever: disconnect drops back to advertising.
pub async fn ble_task(
    sd: &'static Softdevice,
    server: &'static Server,
    samples: Receiver<'static, CriticalSectionRawMutex, heapless::String<20>, 4>,
    events: &Sender<'static, CriticalSectionRawMutex, AppEvent, 8>,
) -> ! {
    loop {
        let config = peripheral::Config {
            interval: BLE_ADV_INTERVAL,
            ..Default::default()
        };
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: ADV_DATA,
            scan_data: SCAN_DATA,
        };

        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("BLE: {}: {:?}", BleError::AdvertiseFailed, e);
                continue;
            }
        };

        info!("BLE: central connected");
        events.send(AppEvent::Bluetooth(true)).await;

        // Serve GATT events until disconnect while forwarding samples.
        let gatt = gatt_server::run(&conn, server, |e| match e {
            ServerEvent::Uart(UartServiceEvent::RxWrite(data)) => {
                if data.first() == Some(&b'R') {
                    // Sync context: best effort, drop if the queue is full.
                    let _ = events.try_send(AppEvent::Reset);
                }
            }
            ServerEvent::Uart(UartServiceEvent::TxCccdWrite { notifications }) => {
                info!("BLE: sample notifications {}", notifications);
            }
        });

        let stream = async {
            loop {
                let text = samples.receive().await;
                let mut payload = heapless::Vec::<u8, 20>::new();
                let _ = payload.extend_from_slice(text.as_bytes());
                if server.uart.tx_notify(&conn, &payload).is_err() {
                    // Not subscribed yet, or the queue is full.
                    warn!("BLE: {}", BleError::NotifyFailed);
                }
            }
        };

        match select(gatt, stream).await {
            Either::First(e) => info!("BLE: disconnected: {:?}", e),
            Either::Second(_) => unreachable!(),
        }

        events.send(AppEvent::Bluetooth(false)).await;
    }
}
