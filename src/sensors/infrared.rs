//! MLX90614 infrared thermometer (I²C / SMBus).
//!
//! Sampled on demand when the MEASURE button fires rather than polled:
//! the sensor reports whatever happens to be in its field of view, so
//! only a deliberate press should update the readout.
//!
//! RAM cell 0x07 holds the object temperature in units of 0.02 K.
//! Bit 15 of a RAM read is the sensor's error flag.

use crate::config::MLX90614_ADDR;
use crate::display_logic::{SensorKind, TemperatureReading};
use crate::error::SensorError;
use crate::AppEvent;
use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_sync::signal::Signal;
use embedded_hal_async::i2c::I2c;

const REG_TOBJ1: u8 = 0x07;

/// MLX90614 driver, generic over the I²C implementation so callers
/// pass in their HAL's bus.
pub struct Mlx90614<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C: I2c> Mlx90614<I2C> {
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self { i2c, addr }
    }

    /// Read the object (non-contact) temperature in Celsius.
    pub async fn read_object_celsius(&mut self) -> Result<f64, SensorError> {
        let mut buf = [0u8; 3]; // LSB, MSB, PEC
        self.i2c
            .write_read(self.addr, &[REG_TOBJ1], &mut buf)
            .await
            .map_err(|_| SensorError::I2c)?;

        let raw = u16::from_le_bytes([buf[0], buf[1]]);
        if raw & 0x8000 != 0 {
            return Err(SensorError::I2c);
        }

        Ok(f64::from(raw) * 0.02 - 273.15)
    }
}

/// Wait for MEASURE presses and queue one valid sample per press.
pub async fn infrared_task<I2C: I2c>(
    i2c: I2C,
    trigger: &'static Signal<CriticalSectionRawMutex, ()>,
    tx: &Sender<'static, CriticalSectionRawMutex, AppEvent, 8>,
) -> ! {
    let mut sensor = Mlx90614::new(i2c, MLX90614_ADDR);

    loop {
        trigger.wait().await;

        match sensor.read_object_celsius().await {
            Ok(raw) => match super::validate(raw) {
                Ok(celsius) => {
                    info!("infrared: {} m°C", (celsius * 1000.0) as i32);
                    tx.send(AppEvent::Reading(TemperatureReading {
                        source: SensorKind::Infrared,
                        value_celsius: celsius,
                    }))
                    .await;
                }
                Err(e) => warn!("infrared: sample rejected: {}", e),
            },
            Err(e) => warn!("infrared: read failed: {}", e),
        }
    }
}
