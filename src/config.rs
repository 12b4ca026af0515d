//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// Sensors

/// Contact probe (DS18B20) poll period (seconds).
pub const CONTACT_POLL_SECS: u64 = 2;

/// DS18B20 12-bit conversion time (ms). The datasheet maximum is 750 ms.
pub const DS18B20_CONVERSION_MS: u64 = 750;

/// MLX90614 I²C address (factory default).
pub const MLX90614_ADDR: u8 = 0x5A;

/// Reject samples outside this Celsius window as sensor glitches
/// (open bus reads as -127, a dropped pull-up as +85 power-on value).
pub const SENSOR_VALID_MIN_C: f64 = -40.0;
pub const SENSOR_VALID_MAX_C: f64 = 125.0;

// Battery gauge

/// Battery voltage sample period (seconds).
pub const BATTERY_SAMPLE_SECS: u64 = 5;

/// VBAT sits behind a 1:2 resistor divider into the ADC input.
pub const VBAT_DIVIDER: u32 = 2;

// Display

/// ST7735 panel size (pixels).
pub const DISPLAY_WIDTH: u16 = 128;
pub const DISPLAY_HEIGHT: u16 = 128;

// BLE

/// GAP device name, also carried in the advertisement.
pub const BLE_DEVICE_NAME: &str = "TempID";

/// Advertising interval (in 0.625 ms units). 244 = 152.5 ms.
pub const BLE_ADV_INTERVAL: u32 = 244;

// GPIO pin assignments
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button UNITS    → P0.11
//   Button MEASURE  → P0.12
//   DS18B20 data    → P0.13 (4.7 kΩ pull-up to 3V3)
//   Charger STAT    → P0.14 (active low, open drain)
//   VBAT sense      → P0.02 (AIN0, behind divider)
//   I²C SDA         → P0.26
//   I²C SCL         → P0.27
//   LCD SCK         → P1.01
//   LCD MOSI        → P1.02
//   LCD CS          → P1.03
//   LCD DC          → P1.04
//   LCD RST         → P1.05

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;
