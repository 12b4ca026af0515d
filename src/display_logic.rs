//! Display state and rendering decisions.
//!
//! `DisplayController` is the single authority for what is currently on
//! the LCD. Status events (sensor readings, battery, charging, Bluetooth,
//! the UNITS button) are fed in one at a time; each handler updates the
//! state and returns the draw commands the screen task must execute, in
//! order. The controller performs no I/O itself, which is what lets the
//! whole rendering policy run under `cargo test` on the host.
//!
//! Redundant redraws are suppressed here, not in the screen task: the
//! draw commands are not required to be idempotent on the panel side.

use heapless::Vec;

use crate::units::{self, TemperatureUnit};

/// Which physical sensor produced a reading.
///
/// Both sensors feed the same readout area - last reading wins, the
/// screen does not distinguish them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    /// DS18B20 probe (skin contact).
    Contact,
    /// MLX90614 infrared (no contact).
    Infrared,
}

/// A validated temperature sample. Always Celsius; unit selection is a
/// display concern.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureReading {
    pub source: SensorKind,
    pub value_celsius: f64,
}

/// Battery state as last shown on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryStatus {
    /// Always within [0, 100]; raw gauge output is clamped on entry.
    pub percentage: u8,
    pub charging: bool,
}

/// Bluetooth link state as last shown on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectivityStatus {
    pub bluetooth_connected: bool,
}

/// Text layout for the temperature readout area.
///
/// Three-digit values need the full width of the readout rect, so the
/// cursor starts further left and the unit suffix is not drawn (there
/// is no room for it). Two-digit values get the wider offset plus the
/// suffix in the top corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TemperatureLayout {
    Default,
    Large,
}

/// One draw command for the screen task.
///
/// Commands must be executed in the order emitted; they are not
/// idempotent on the panel side (each one blanks or paints pixels).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderDirective {
    /// Repaint the temperature readout. `unit_suffix` is `None` in the
    /// large layout.
    DrawTemperature {
        value: f64,
        unit_suffix: Option<char>,
        layout: TemperatureLayout,
    },
    /// Repaint the battery gauge with a numeric percentage.
    DrawBattery { percentage: u8 },
    /// Repaint the battery gauge as the solid "on charger" glyph.
    DrawCharging,
    /// Blank the battery corner before repainting it.
    ClearBatteryArea,
    DrawBluetoothIcon,
    ClearBluetoothIcon,
    /// Blank the whole panel.
    ClearScreen,
    /// Boot animation; choreography is owned by the screen task.
    PlayIntroAnimation,
}

/// Upper bound on directives a single event can produce.
pub const MAX_DIRECTIVES: usize = 4;

/// Ordered draw commands produced by one event.
pub type Directives = Vec<RenderDirective, MAX_DIRECTIVES>;

/// Everything currently reflected on the LCD.
///
/// Owned exclusively by [`DisplayController`]; other tasks observe it
/// only through the directives they are handed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    pub unit: TemperatureUnit,
    /// Last sample stored in Celsius so a unit toggle can re-render it.
    pub last_temperature_c: Option<f64>,
    pub battery: BatteryStatus,
    pub connectivity: ConnectivityStatus,
}

impl DisplayState {
    /// Boot defaults: Fahrenheit, no sample yet, empty battery, not
    /// charging, Bluetooth down.
    pub const fn new() -> Self {
        Self {
            unit: TemperatureUnit::Fahrenheit,
            last_temperature_c: None,
            battery: BatteryStatus {
                percentage: 0,
                charging: false,
            },
            connectivity: ConnectivityStatus {
                bluetooth_connected: false,
            },
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

/// Decides what the LCD must be told to draw next.
///
/// Constructed once at boot by the UI task and fed every event in
/// arrival order; each handler runs to completion before the next
/// event is popped, so the state never sees a half-applied update.
pub struct DisplayController {
    state: DisplayState,
}

impl DisplayController {
    pub const fn new() -> Self {
        Self {
            state: DisplayState::new(),
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// A sensor produced a valid sample: store it and repaint the
    /// readout in the currently selected unit.
    pub fn on_temperature_reading(&mut self, reading: TemperatureReading) -> Directives {
        self.state.last_temperature_c = Some(reading.value_celsius);

        let mut out = Directives::new();
        let _ = out.push(temperature_directive(reading.value_celsius, self.state.unit));
        out
    }

    /// UNITS button: flip Celsius/Fahrenheit and re-render the stored
    /// sample in the new unit. Nothing to redraw before the first
    /// sample arrives.
    pub fn on_unit_toggle(&mut self) -> Directives {
        self.state.unit = self.state.unit.toggled();

        let mut out = Directives::new();
        if let Some(celsius) = self.state.last_temperature_c {
            let _ = out.push(temperature_directive(celsius, self.state.unit));
        }
        out
    }

    /// Gauge reported a new percentage. Raw values may fall outside
    /// [0, 100] (curve extrapolation, ADC noise); they are clamped
    /// here and never propagate. While on the charger the numeric bar
    /// is replaced by the charging glyph.
    pub fn on_battery_update(&mut self, raw_percentage: i16) -> Directives {
        self.state.battery.percentage = clamp_percentage(raw_percentage);
        self.battery_directives()
    }

    /// Charger plugged or unplugged. Repaints the battery corner with
    /// the last known percentage once the charger is removed.
    pub fn on_charging_changed(&mut self, charging: bool) -> Directives {
        if self.state.battery.charging == charging {
            return Directives::new();
        }
        self.state.battery.charging = charging;
        self.battery_directives()
    }

    /// Bluetooth link came up or went down. Repeated reports of the
    /// same state draw nothing.
    pub fn on_bluetooth_changed(&mut self, connected: bool) -> Directives {
        let mut out = Directives::new();
        if self.state.connectivity.bluetooth_connected == connected {
            return out;
        }
        self.state.connectivity.bluetooth_connected = connected;

        let _ = out.push(if connected {
            RenderDirective::DrawBluetoothIcon
        } else {
            RenderDirective::ClearBluetoothIcon
        });
        out
    }

    /// Device reset: back to boot defaults, blank panel, intro.
    pub fn reset(&mut self) -> Directives {
        self.state = DisplayState::new();

        let mut out = Directives::new();
        let _ = out.push(RenderDirective::ClearScreen);
        let _ = out.push(RenderDirective::PlayIntroAnimation);
        out
    }

    /// Battery corner repaint: blank it, then either the charging
    /// glyph or the numeric bar. Charging wins over the percentage.
    fn battery_directives(&self) -> Directives {
        let mut out = Directives::new();
        let _ = out.push(RenderDirective::ClearBatteryArea);
        let _ = out.push(if self.state.battery.charging {
            RenderDirective::DrawCharging
        } else {
            RenderDirective::DrawBattery {
                percentage: self.state.battery.percentage,
            }
        });
        out
    }
}

impl Default for DisplayController {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the readout repaint for a stored Celsius sample.
///
/// Values of three or more digits (|value| >= 100) switch to the large
/// layout and drop the unit suffix; the readout area only fits the
/// digits at that size. Carried over from the shipped panel layout.
fn temperature_directive(value_celsius: f64, unit: TemperatureUnit) -> RenderDirective {
    let (value, suffix) = units::convert(value_celsius, unit);

    if value >= 100.0 || value <= -100.0 {
        RenderDirective::DrawTemperature {
            value,
            unit_suffix: None,
            layout: TemperatureLayout::Large,
        }
    } else {
        RenderDirective::DrawTemperature {
            value,
            unit_suffix: Some(suffix),
            layout: TemperatureLayout::Default,
        }
    }
}

/// Clamp a raw gauge percentage into [0, 100].
fn clamp_percentage(raw: i16) -> u8 {
    raw.clamp(0, 100) as u8
}
