//! DS18B20 contact probe on a bit-banged one-wire bus.
//!
//! The nRF52840 has no one-wire peripheral, so the bus runs on a single
//! open-drain GPIO with an external 4.7 kΩ pull-up. Bit slots are tens
//! of microseconds - far below the RTC tick - so slot timing uses CPU
//! cycle counting, and each slot runs inside a critical section so the
//! SoftDevice cannot stretch it mid-bit.
//!
//! Single-drop bus, so ROM search is skipped. Per sample:
//! reset → SKIP ROM → CONVERT T → (conversion wait) → reset → SKIP ROM →
//! READ SCRATCHPAD → CRC-8 check → raw / 16 °C.

use crate::config::{CONTACT_POLL_SECS, DS18B20_CONVERSION_MS};
use crate::display_logic::{SensorKind, TemperatureReading};
use crate::error::SensorError;
use crate::AppEvent;
use defmt::{debug, warn};
use embassy_nrf::gpio::{Flex, OutputDrive, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Timer};

const CMD_SKIP_ROM: u8 = 0xCC;
const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// CPU cycles per microsecond (64 MHz core clock).
const CYCLES_PER_US: u32 = 64;

fn delay_us(us: u32) {
    cortex_m::asm::delay(us * CYCLES_PER_US);
}

/// Single-drop one-wire bus on an open-drain pin.
struct OneWire<'d> {
    pin: Flex<'d>,
}

impl<'d> OneWire<'d> {
    fn new(mut pin: Flex<'d>) -> Self {
        pin.set_as_input(Pull::Up);
        Self { pin }
    }

    /// Drive the bus low; the pull-up releases it in `drive_released`.
    fn drive_low(&mut self) {
        self.pin.set_low();
        self.pin.set_as_output(OutputDrive::Standard0Disconnect1);
    }

    fn release(&mut self) {
        self.pin.set_as_input(Pull::Up);
    }

    /// Reset pulse. Ok when the probe answers with a presence pulse.
    fn reset(&mut self) -> Result<(), SensorError> {
        self.drive_low();
        delay_us(480);

        let present = critical_section::with(|_| {
            self.release();
            delay_us(70);
            self.pin.is_low()
        });
        delay_us(410);

        if present {
            Ok(())
        } else {
            Err(SensorError::NoPresence)
        }
    }

    fn write_bit(&mut self, bit: bool) {
        critical_section::with(|_| {
            self.drive_low();
            if bit {
                delay_us(6);
                self.release();
                delay_us(64);
            } else {
                delay_us(60);
                self.release();
                delay_us(10);
            }
        });
    }

    fn read_bit(&mut self) -> bool {
        critical_section::with(|_| {
            self.drive_low();
            delay_us(6);
            self.release();
            delay_us(9);
            let bit = self.pin.is_high();
            delay_us(55);
            bit
        })
    }

    fn write_byte(&mut self, byte: u8) {
        for i in 0..8 {
            self.write_bit(byte & (1 << i) != 0);
        }
    }

    fn read_byte(&mut self) -> u8 {
        let mut byte = 0;
        for i in 0..8 {
            if self.read_bit() {
                byte |= 1 << i;
            }
        }
        byte
    }
}

/// Dallas/Maxim CRC-8, polynomial 0x31 (reflected 0x8C).
fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// DS18B20 probe driver.
pub struct Ds18b20<'d> {
    bus: OneWire<'d>,
}

impl<'d> Ds18b20<'d> {
    pub fn new(pin: Flex<'d>) -> Self {
        Self {
            bus: OneWire::new(pin),
        }
    }

    /// Run one conversion and read it back, in Celsius.
    pub async fn read_celsius(&mut self) -> Result<f64, SensorError> {
        self.bus.reset()?;
        self.bus.write_byte(CMD_SKIP_ROM);
        self.bus.write_byte(CMD_CONVERT_T);

        // 12-bit conversion; the probe holds the bus meanwhile.
        Timer::after(Duration::from_millis(DS18B20_CONVERSION_MS)).await;

        self.bus.reset()?;
        self.bus.write_byte(CMD_SKIP_ROM);
        self.bus.write_byte(CMD_READ_SCRATCHPAD);

        let mut scratchpad = [0u8; 9];
        for b in scratchpad.iter_mut() {
            *b = self.bus.read_byte();
        }

        if crc8(&scratchpad[..8]) != scratchpad[8] {
            return Err(SensorError::CrcMismatch);
        }

        let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
        Ok(f64::from(raw) / 16.0)
    }
}

/// Poll the contact probe and queue every valid sample.
pub async fn contact_task(
    pin: Flex<'static>,
    tx: &Sender<'static, CriticalSectionRawMutex, AppEvent, 8>,
) -> ! {
    let mut probe = Ds18b20::new(pin);

    loop {
        match probe.read_celsius().await {
            Ok(raw) => match super::validate(raw) {
                Ok(celsius) => {
                    debug!("contact: {} m°C", (celsius * 1000.0) as i32);
                    tx.send(AppEvent::Reading(TemperatureReading {
                        source: SensorKind::Contact,
                        value_celsius: celsius,
                    }))
                    .await;
                }
                Err(e) => warn!("contact: sample rejected: {}", e),
            },
            Err(e) => warn!("contact: read failed: {}", e),
        }

        Timer::after(Duration::from_secs(CONTACT_POLL_SECS)).await;
    }
}
