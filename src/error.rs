//! Unified error type for tempid.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! None of these reach the display logic: a failed sensor read is
//! logged and dropped, so the screen keeps showing the previous sample.

use defmt::Format;

/// Top-level error type used across the application.
#[derive(Debug, Format)]
pub enum Error {
    /// A sensor read failed; the sample was discarded.
    Sensor(SensorError),

    /// SPI transaction to the LCD failed.
    Display,

    /// The SoftDevice rejected an operation.
    Ble(BleError),
}

/// Sensor-level failures (all recovered by skipping the sample).
#[derive(Debug, Clone, Copy, Format)]
pub enum SensorError {
    /// No presence pulse on the one-wire bus - probe unplugged.
    NoPresence,
    /// Scratchpad CRC mismatch - bus glitch mid-read.
    CrcMismatch,
    /// I²C transaction to the infrared sensor failed.
    I2c,
    /// Sample decoded fine but sits outside the plausible window.
    OutOfRange,
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, Format)]
pub enum BleError {
    /// Advertising could not start.
    AdvertiseFailed,
    /// Notification write was rejected (no subscriber, full queue).
    NotifyFailed,
}

// Convenience conversions

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Error::Sensor(e)
    }
}

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
