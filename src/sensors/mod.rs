//! Temperature sensor subsystem - contact probe + infrared.
//!
//! Two independent sources feed the same on-screen readout:
//!
//! 1. **Contact** - DS18B20 digital probe on a one-wire bus, polled
//!    every couple of seconds while the device is worn.
//! 2. **Infrared** - MLX90614 over I²C, sampled on demand when the
//!    MEASURE button fires.
//!
//! Both tasks validate samples before anything leaves this module: a
//! failed bus transaction, a CRC mismatch or an implausible value is
//! logged and dropped, so downstream code only ever sees valid
//! `TemperatureReading`s and never has to handle a sensor fault.

pub mod contact;
pub mod infrared;

use crate::config::{SENSOR_VALID_MAX_C, SENSOR_VALID_MIN_C};
use crate::error::SensorError;

/// Final validation gate shared by both sensors.
///
/// Catches the classic failure values a decoded frame can still carry:
/// -127 from an open bus, +85 power-on scratchpad, NaN from a botched
/// conversion.
pub(crate) fn validate(celsius: f64) -> Result<f64, SensorError> {
    if !(SENSOR_VALID_MIN_C..=SENSOR_VALID_MAX_C).contains(&celsius) {
        return Err(SensorError::OutOfRange);
    }
    Ok(celsius)
}
