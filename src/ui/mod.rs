//! User interface subsystem - ST7735 color LCD + physical buttons.
//!
//! The UI task owns the display controller and the panel: every status
//! event funnels into one queue, each event is handled to completion,
//! and the resulting draw commands are applied to the LCD in order.
//!
//! ## Components
//!
//! - **Screen**: ST7735 128×128 color LCD via SPI
//! - **Buttons**: 2 tactile switches with debouncing (UNITS, MEASURE)

pub mod buttons;
pub mod screen;
