//! Test-only library interface for tempid.
//!
//! This module re-exports the pure logic modules that can be tested
//! on the host (no embedded hardware required): the display controller
//! (what should currently be on the LCD), unit conversion, and the
//! battery discharge curve.
//!
//! Usage: `cargo test`
//!
//! Note: The firmware binary uses main.rs with #![no_std] and #![no_main].
//! This lib.rs provides a separate entry point for host-based testing.

#![cfg_attr(not(test), no_std)]

pub mod battery_logic;
pub mod display_logic;
pub mod units;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::battery_logic::battery_percent_from_millivolts;
    use super::display_logic::{
        DisplayController, RenderDirective, SensorKind, TemperatureLayout, TemperatureReading,
    };
    use super::units::{self, TemperatureUnit};

    fn contact(value_celsius: f64) -> TemperatureReading {
        TemperatureReading {
            source: SensorKind::Contact,
            value_celsius,
        }
    }

    fn infrared(value_celsius: f64) -> TemperatureReading {
        TemperatureReading {
            source: SensorKind::Infrared,
            value_celsius,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Unit Conversion Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn to_fahrenheit_known_points() {
        assert_eq!(units::to_fahrenheit(0.0), 32.0);
        assert_eq!(units::to_fahrenheit(100.0), 212.0);
        assert_eq!(units::to_fahrenheit(36.5), 97.7);
        assert_eq!(units::to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn to_fahrenheit_matches_formula() {
        for c in [-55.0, -10.5, 0.0, 0.1, 36.6, 41.25, 125.0] {
            assert_eq!(units::to_fahrenheit(c), c * 1.8 + 32.0);
        }
    }

    #[test]
    fn to_celsius_inverts_to_fahrenheit() {
        for c in [-40.0, 0.0, 37.0, 100.0] {
            let roundtrip = units::to_celsius(units::to_fahrenheit(c));
            assert!((roundtrip - c).abs() < 1e-9);
        }
    }

    #[test]
    fn conversion_passes_non_finite_through() {
        assert!(units::to_fahrenheit(f64::NAN).is_nan());
        assert_eq!(units::to_fahrenheit(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn convert_keeps_celsius_and_picks_suffix() {
        assert_eq!(units::convert(37.0, TemperatureUnit::Celsius), (37.0, 'C'));
        assert_eq!(
            units::convert(36.5, TemperatureUnit::Fahrenheit),
            (97.7, 'F')
        );
    }

    #[test]
    fn unit_default_is_fahrenheit() {
        assert_eq!(TemperatureUnit::default(), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn unit_toggle_is_an_involution() {
        assert_eq!(
            TemperatureUnit::Fahrenheit.toggled(),
            TemperatureUnit::Celsius
        );
        assert_eq!(
            TemperatureUnit::Fahrenheit.toggled().toggled(),
            TemperatureUnit::Fahrenheit
        );
    }

    // ════════════════════════════════════════════════════════════════════════
    // Display Controller - Temperature Readout
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn boot_state_defaults() {
        let controller = DisplayController::new();
        let state = controller.state();

        assert_eq!(state.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(state.last_temperature_c, None);
        assert_eq!(state.battery.percentage, 0);
        assert!(!state.battery.charging);
        assert!(!state.connectivity.bluetooth_connected);
    }

    #[test]
    fn reading_below_100_draws_with_suffix() {
        let mut controller = DisplayController::new();

        // 37.0 C -> 98.6 F: still two digits, default layout + suffix.
        let directives = controller.on_temperature_reading(contact(37.0));

        assert_eq!(directives.len(), 1);
        assert_eq!(
            directives[0],
            RenderDirective::DrawTemperature {
                value: 37.0 * 1.8 + 32.0,
                unit_suffix: Some('F'),
                layout: TemperatureLayout::Default,
            }
        );
        assert_eq!(controller.state().last_temperature_c, Some(37.0));
    }

    #[test]
    fn reading_at_or_above_100_drops_suffix() {
        let mut controller = DisplayController::new();

        // 38.0 C -> 100.4 F: three digits, large layout, no suffix.
        let directives = controller.on_temperature_reading(infrared(38.0));

        assert_eq!(directives.len(), 1);
        assert_eq!(
            directives[0],
            RenderDirective::DrawTemperature {
                value: 100.4,
                unit_suffix: None,
                layout: TemperatureLayout::Large,
            }
        );
    }

    #[test]
    fn large_layout_applies_to_magnitude() {
        let mut controller = DisplayController::new();

        // -80.0 C -> -112.0 F: three digits on the negative side.
        let directives = controller.on_temperature_reading(contact(-80.0));

        assert_eq!(
            directives[0],
            RenderDirective::DrawTemperature {
                value: -112.0,
                unit_suffix: None,
                layout: TemperatureLayout::Large,
            }
        );
    }

    #[test]
    fn both_sensors_share_the_readout_slot() {
        let mut controller = DisplayController::new();

        controller.on_temperature_reading(contact(36.5));
        controller.on_temperature_reading(infrared(39.0));

        // Last reading wins regardless of source.
        assert_eq!(controller.state().last_temperature_c, Some(39.0));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Display Controller - Unit Toggle
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn unit_toggle_rerenders_stored_reading() {
        let mut controller = DisplayController::new();
        controller.on_temperature_reading(contact(37.0));

        let directives = controller.on_unit_toggle();

        assert_eq!(controller.state().unit, TemperatureUnit::Celsius);
        assert_eq!(directives.len(), 1);
        assert_eq!(
            directives[0],
            RenderDirective::DrawTemperature {
                value: 37.0,
                unit_suffix: Some('C'),
                layout: TemperatureLayout::Default,
            }
        );
    }

    #[test]
    fn unit_toggle_before_first_reading_draws_nothing() {
        let mut controller = DisplayController::new();

        let directives = controller.on_unit_toggle();

        assert_eq!(controller.state().unit, TemperatureUnit::Celsius);
        assert!(directives.is_empty());
    }

    #[test]
    fn double_toggle_restores_the_previous_render() {
        let mut controller = DisplayController::new();
        let before = controller.on_temperature_reading(contact(37.0));

        controller.on_unit_toggle();
        let after = controller.on_unit_toggle();

        assert_eq!(before, after);
        assert_eq!(controller.state().unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn toggle_can_move_a_value_across_the_layout_boundary() {
        let mut controller = DisplayController::new();

        // 40.0 C is two digits in Celsius but 104.0 F in Fahrenheit.
        controller.on_temperature_reading(contact(40.0));
        let directives = controller.on_unit_toggle();

        assert_eq!(
            directives[0],
            RenderDirective::DrawTemperature {
                value: 40.0,
                unit_suffix: Some('C'),
                layout: TemperatureLayout::Default,
            }
        );

        let directives = controller.on_unit_toggle();
        assert_eq!(
            directives[0],
            RenderDirective::DrawTemperature {
                value: 104.0,
                unit_suffix: None,
                layout: TemperatureLayout::Large,
            }
        );
    }

    // ════════════════════════════════════════════════════════════════════════
    // Display Controller - Battery & Charging
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn battery_update_emits_clear_then_bar() {
        let mut controller = DisplayController::new();

        let directives = controller.on_battery_update(72);

        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0], RenderDirective::ClearBatteryArea);
        assert_eq!(directives[1], RenderDirective::DrawBattery { percentage: 72 });
    }

    #[test]
    fn battery_update_clamps_out_of_range_input() {
        let mut controller = DisplayController::new();

        controller.on_battery_update(150);
        assert_eq!(controller.state().battery.percentage, 100);

        controller.on_battery_update(-5);
        assert_eq!(controller.state().battery.percentage, 0);
    }

    #[test]
    fn battery_percentage_stays_in_range_for_any_input() {
        let mut controller = DisplayController::new();
        for raw in [i16::MIN, -1, 0, 1, 50, 99, 100, 101, 1000, i16::MAX] {
            controller.on_battery_update(raw);
            assert!(controller.state().battery.percentage <= 100);
        }
    }

    #[test]
    fn charging_takes_priority_over_percentage() {
        let mut controller = DisplayController::new();
        controller.on_charging_changed(true);

        // Every update while on the charger keeps showing the glyph.
        for raw in [10, 55, 100] {
            let directives = controller.on_battery_update(raw);
            assert_eq!(directives[0], RenderDirective::ClearBatteryArea);
            assert_eq!(directives[1], RenderDirective::DrawCharging);
        }

        // Unplugging falls back to the stored percentage.
        let directives = controller.on_charging_changed(false);
        assert_eq!(directives[0], RenderDirective::ClearBatteryArea);
        assert_eq!(
            directives[1],
            RenderDirective::DrawBattery { percentage: 100 }
        );
    }

    #[test]
    fn charging_started_repaints_battery_corner() {
        let mut controller = DisplayController::new();
        controller.on_battery_update(40);

        let directives = controller.on_charging_changed(true);

        assert!(controller.state().battery.charging);
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0], RenderDirective::ClearBatteryArea);
        assert_eq!(directives[1], RenderDirective::DrawCharging);
    }

    #[test]
    fn repeated_charging_state_draws_nothing() {
        let mut controller = DisplayController::new();

        controller.on_charging_changed(true);
        assert!(controller.on_charging_changed(true).is_empty());

        controller.on_charging_changed(false);
        assert!(controller.on_charging_changed(false).is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Display Controller - Bluetooth
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn bluetooth_connect_draws_icon_once() {
        let mut controller = DisplayController::new();

        let first = controller.on_bluetooth_changed(true);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0], RenderDirective::DrawBluetoothIcon);

        // Same state again: no redraw.
        assert!(controller.on_bluetooth_changed(true).is_empty());
    }

    #[test]
    fn bluetooth_disconnect_clears_icon() {
        let mut controller = DisplayController::new();
        controller.on_bluetooth_changed(true);

        let directives = controller.on_bluetooth_changed(false);

        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0], RenderDirective::ClearBluetoothIcon);
        assert!(!controller.state().connectivity.bluetooth_connected);
    }

    #[test]
    fn bluetooth_disconnected_at_boot_is_not_a_transition() {
        let mut controller = DisplayController::new();
        assert!(controller.on_bluetooth_changed(false).is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Display Controller - Reset
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn reset_blanks_screen_and_plays_intro() {
        let mut controller = DisplayController::new();

        let directives = controller.reset();

        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0], RenderDirective::ClearScreen);
        assert_eq!(directives[1], RenderDirective::PlayIntroAnimation);
    }

    #[test]
    fn reset_restores_boot_defaults() {
        let mut controller = DisplayController::new();
        controller.on_temperature_reading(contact(37.0));
        controller.on_unit_toggle();
        controller.on_battery_update(80);
        controller.on_charging_changed(true);
        controller.on_bluetooth_changed(true);

        controller.reset();
        let state = controller.state();

        assert_eq!(state.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(state.last_temperature_c, None);
        assert_eq!(state.battery.percentage, 0);
        assert!(!state.battery.charging);
        assert!(!state.connectivity.bluetooth_connected);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Battery Discharge Curve
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn discharge_curve_breakpoints() {
        assert_eq!(battery_percent_from_millivolts(4200), 100);
        assert_eq!(battery_percent_from_millivolts(4000), 85);
        assert_eq!(battery_percent_from_millivolts(3700), 40);
        assert_eq!(battery_percent_from_millivolts(3300), 0);
    }

    #[test]
    fn discharge_curve_interpolates_between_breakpoints() {
        // Halfway between (3600, 20) and (3700, 40).
        assert_eq!(battery_percent_from_millivolts(3650), 30);
        // Halfway between (3800, 60) and (4000, 85).
        assert_eq!(battery_percent_from_millivolts(3900), 72);
    }

    #[test]
    fn discharge_curve_extrapolates_past_the_endpoints() {
        // The gauge may report out-of-range values; the display logic
        // clamps them, not the curve.
        assert!(battery_percent_from_millivolts(4400) > 100);
        assert!(battery_percent_from_millivolts(3100) < 0);
    }

    #[test]
    fn gauge_output_is_clamped_by_the_controller() {
        let mut controller = DisplayController::new();

        controller.on_battery_update(battery_percent_from_millivolts(4400));
        assert_eq!(controller.state().battery.percentage, 100);

        controller.on_battery_update(battery_percent_from_millivolts(3100));
        assert_eq!(controller.state().battery.percentage, 0);
    }
}
