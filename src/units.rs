//! Temperature unit conversion.
//!
//! Sensors always report Celsius; the wearer picks the unit shown on
//! the LCD. Conversion is pure arithmetic so it runs (and is tested)
//! on the host. NaN/infinity pass through unchanged - the sensor tasks
//! reject invalid samples before they get here.

/// Unit selected for the on-screen readout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TemperatureUnit {
    Celsius,
    /// Factory default.
    #[default]
    Fahrenheit,
}

impl TemperatureUnit {
    /// The other unit (UNITS button behaviour).
    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    /// Single-letter suffix drawn next to the degree symbol.
    pub fn suffix(self) -> char {
        match self {
            TemperatureUnit::Celsius => 'C',
            TemperatureUnit::Fahrenheit => 'F',
        }
    }
}

/// Celsius to Fahrenheit.
pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// Fahrenheit to Celsius.
pub fn to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) / 1.8
}

/// Convert a Celsius sample to the requested unit, returning the value
/// to draw and the suffix letter that goes with it.
pub fn convert(value_celsius: f64, unit: TemperatureUnit) -> (f64, char) {
    let value = match unit {
        TemperatureUnit::Celsius => value_celsius,
        TemperatureUnit::Fahrenheit => to_fahrenheit(value_celsius),
    };
    (value, unit.suffix())
}
