//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Advertiser** - broadcasts the device name plus the UART service
//!    UUID so the companion phone app can find the device.
//! 2. **GATT server** - exposes the Nordic UART Service; every
//!    displayed temperature sample is pushed out as an ASCII
//!    notification on the TX characteristic.
//! 3. Link transitions (central connected / disconnected) are
//!    forwarded to the UI queue so the screen can show or hide the
//!    Bluetooth glyph.
//!
//! Communication with other tasks is done via Embassy channels defined
//! in the crate root.

pub mod server;
