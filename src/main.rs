//! TempID firmware entry point (nRF52840).
//!
//! Task layout:
//!
//! - **ui_task**: owns the `DisplayController` and the LCD. Drains the
//!   single event queue, handles each event to completion, applies the
//!   resulting draw commands in order. The only place display state
//!   ever changes.
//! - **contact_task / infrared_task**: sensor polling and on-demand
//!   sampling; only valid readings are queued.
//! - **battery_task / charger_task**: gauge sampling + charger STAT pin.
//! - **button_task** ×2: UNITS and MEASURE.
//! - **ble_task / softdevice_task**: advertising, UART service, sample
//!   notifications.

#![no_std]
#![no_main]

mod battery;
mod battery_logic;
mod ble;
mod config;
mod display_logic;
mod error;
mod sensors;
mod ui;
mod units;

use core::mem;

use defmt::{info, unwrap, Format};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Flex, Level, Output, OutputDrive, Pin as _};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::{bind_interrupts, peripherals, saadc, spim, twim};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use nrf_softdevice::{raw, Softdevice};
use panic_probe as _;
use static_cell::StaticCell;

use crate::ble::server::Server;
use crate::display_logic::{DisplayController, TemperatureReading};
use crate::ui::screen::Screen;

/// Events consumed by the UI task, in strict arrival order.
#[derive(Clone, Copy, Format)]
pub enum AppEvent {
    /// A validated sample from either sensor.
    Reading(TemperatureReading),
    /// UNITS button press.
    UnitToggle,
    /// MEASURE button press - kicks the infrared task.
    MeasureRequest,
    /// Raw gauge percentage; may exceed [0, 100], display logic clamps.
    Battery(i16),
    /// Charger STAT pin level changed.
    Charging(bool),
    /// Central connected / disconnected.
    Bluetooth(bool),
    /// Companion app requested a readout restart.
    Reset,
}

/// The single ordered event queue feeding the UI task.
static EVENTS: Channel<CriticalSectionRawMutex, AppEvent, 8> = Channel::new();

/// MEASURE press → infrared task wakeup.
static MEASURE_TRIGGER: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Formatted samples queued for BLE notification.
static BLE_SAMPLES: Channel<CriticalSectionRawMutex, heapless::String<20>, 4> = Channel::new();

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// SoftDevice parameters: one peripheral link, default MTU, device
/// name served from flash-resident static data.
fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 23 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: config::BLE_DEVICE_NAME.as_ptr() as _,
            current_len: config::BLE_DEVICE_NAME.len() as u16,
            max_len: config::BLE_DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    let tx = EVENTS.sender();
    ble::server::ble_task(sd, server, BLE_SAMPLES.receiver(), &tx).await
}

#[embassy_executor::task]
async fn contact_task(pin: Flex<'static>) -> ! {
    let tx = EVENTS.sender();
    sensors::contact::contact_task(pin, &tx).await
}

#[embassy_executor::task]
async fn infrared_task(i2c: twim::Twim<'static, peripherals::TWISPI0>) -> ! {
    let tx = EVENTS.sender();
    sensors::infrared::infrared_task(i2c, &MEASURE_TRIGGER, &tx).await
}

#[embassy_executor::task]
async fn battery_task(adc: saadc::Saadc<'static, 1>) -> ! {
    let tx = EVENTS.sender();
    battery::battery_task(adc, &tx).await
}

#[embassy_executor::task]
async fn charger_task(pin: AnyPin) -> ! {
    let tx = EVENTS.sender();
    battery::charger_task(pin, &tx).await
}

#[embassy_executor::task(pool_size = 2)]
async fn button_task(pin: AnyPin, event: AppEvent) -> ! {
    let tx = EVENTS.sender();
    ui::buttons::button_task(pin, event, &tx).await
}

/// The main loop: one controller, one panel, strictly ordered events.
#[embassy_executor::task]
async fn ui_task(mut screen: Screen<'static>) -> ! {
    use core::fmt::Write as _;

    let mut controller = DisplayController::new();

    // Boot renders like any reset: blank panel, intro, defaults.
    let directives = controller.reset();
    ui::screen::apply(&mut screen, &directives).await;

    loop {
        let event = EVENTS.receive().await;
        let directives = match event {
            AppEvent::Reading(reading) => {
                let directives = controller.on_temperature_reading(reading);

                // Mirror the displayed value to the companion app.
                let (value, unit) = units::convert(reading.value_celsius, controller.state().unit);
                let mut text: heapless::String<20> = heapless::String::new();
                let _ = write!(text, "{:.2} {}", value, unit);
                if BLE_SAMPLES.try_send(text).is_err() {
                    info!("BLE sample queue full, dropping");
                }

                directives
            }
            AppEvent::UnitToggle => controller.on_unit_toggle(),
            AppEvent::MeasureRequest => {
                MEASURE_TRIGGER.signal(());
                display_logic::Directives::new()
            }
            AppEvent::Battery(raw) => controller.on_battery_update(raw),
            AppEvent::Charging(on) => controller.on_charging_changed(on),
            AppEvent::Bluetooth(up) => controller.on_bluetooth_changed(up),
            AppEvent::Reset => controller.reset(),
        };

        ui::screen::apply(&mut screen, &directives).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("TempID booting");

    let mut hw_config = embassy_nrf::config::Config::default();
    // SoftDevice reserves interrupt priorities 0, 1 and 4.
    hw_config.gpiote_interrupt_priority = Priority::P2;
    hw_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(hw_config);

    interrupt::SAADC.set_priority(Priority::P3);
    interrupt::SPIM3.set_priority(Priority::P3);
    interrupt::TWISPI0.set_priority(Priority::P3);

    let sd = Softdevice::enable(&softdevice_config());
    static SERVER: StaticCell<Server> = StaticCell::new();
    let server = SERVER.init(unwrap!(Server::new(sd)));
    // GATT registration is done; from here on only shared access.
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // LCD on SPIM3 (the only SPI instance allowed a high clock).
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim::Frequency::M8;
    let spi = spim::Spim::new_txonly(p.SPI3, Irqs, p.P1_01, p.P1_02, spi_config);
    let cs = Output::new(p.P1_03, Level::High, OutputDrive::Standard);
    let dc = Output::new(p.P1_04, Level::Low, OutputDrive::Standard);
    let rst = Output::new(p.P1_05, Level::Low, OutputDrive::Standard);
    let screen = unwrap!(ui::screen::init(spi, cs, dc, rst));

    // Sensors: one-wire probe pin + I²C for the infrared sensor.
    let probe_pin = Flex::new(p.P0_13);
    let mut i2c_config = twim::Config::default();
    i2c_config.frequency = twim::Frequency::K100;
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config);

    // Battery gauge on AIN0.
    let adc_config = saadc::Config::default();
    let channel = saadc::ChannelConfig::single_ended(p.P0_02);
    let adc = saadc::Saadc::new(p.SAADC, Irqs, adc_config, [channel]);

    unwrap!(spawner.spawn(ui_task(screen)));
    unwrap!(spawner.spawn(contact_task(probe_pin)));
    unwrap!(spawner.spawn(infrared_task(i2c)));
    unwrap!(spawner.spawn(battery_task(adc)));
    unwrap!(spawner.spawn(charger_task(p.P0_14.degrade())));
    unwrap!(spawner.spawn(button_task(p.P0_11.degrade(), AppEvent::UnitToggle)));
    unwrap!(spawner.spawn(button_task(p.P0_12.degrade(), AppEvent::MeasureRequest)));
    unwrap!(spawner.spawn(ble_task(sd, server)));

    info!("TempID ready");

    // Keep main alive; everything happens in the spawned tasks.
    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}
