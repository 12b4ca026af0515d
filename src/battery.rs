//! Battery monitoring - SAADC voltage sampling + charger detect pin.
//!
//! VBAT is measured through a resistor divider every few seconds and
//! mapped to a percentage via the discharge curve in `battery_logic`.
//! The raw percentage goes to the display logic unclamped; clamping is
//! its job, not ours.
//!
//! The charger's STAT pin is open drain, active low while a charge
//! cycle is running. Transitions are reported as events; repeats are
//! filtered downstream.

use crate::battery_logic::battery_percent_from_millivolts;
use crate::config::{BATTERY_SAMPLE_SECS, BUTTON_DEBOUNCE_MS, VBAT_DIVIDER};
use crate::AppEvent;
use defmt::debug;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_nrf::saadc::Saadc;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Timer};

/// 12-bit result, gain 1/6 against the 0.6 V internal reference:
/// 3600 mV full scale at the pin, times the external divider.
fn sample_to_millivolts(raw: i16) -> u16 {
    let raw = raw.max(0) as u32;
    (raw * 3600 * VBAT_DIVIDER / 4095) as u16
}

/// Periodically sample VBAT and queue the raw percentage.
pub async fn battery_task(
    mut adc: Saadc<'static, 1>,
    tx: &Sender<'static, CriticalSectionRawMutex, AppEvent, 8>,
) -> ! {
    loop {
        let mut buf = [0i16; 1];
        adc.sample(&mut buf).await;

        let millivolts = sample_to_millivolts(buf[0]);
        let percent = battery_percent_from_millivolts(millivolts);
        debug!("battery: {} mV -> {} %", millivolts, percent);

        tx.send(AppEvent::Battery(percent)).await;

        Timer::after(Duration::from_secs(BATTERY_SAMPLE_SECS)).await;
    }
}

/// Watch the charger STAT pin and report each transition.
pub async fn charger_task(
    pin: AnyPin,
    tx: &Sender<'static, CriticalSectionRawMutex, AppEvent, 8>,
) -> ! {
    let mut stat = Input::new(pin, Pull::Up);

    loop {
        // STAT low = charge cycle running. Initial state counts too.
        tx.send(AppEvent::Charging(stat.is_low())).await;

        stat.wait_for_any_edge().await;
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
    }
}
