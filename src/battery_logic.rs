//! Battery percentage estimation from the measured cell voltage.
//!
//! Piecewise-linear LiPo discharge curve (single cell, light load).
//! The output is intentionally unclamped: the endpoints extrapolate, so
//! a cell fresh off the charger can report slightly above 100 and a
//! deeply discharged one below 0. The display logic owns the [0, 100]
//! clamp.

/// Discharge curve breakpoints, millivolts to percent, ascending.
const DISCHARGE_CURVE: [(i32, i32); 7] = [
    (3300, 0),
    (3500, 10),
    (3600, 20),
    (3700, 40),
    (3800, 60),
    (4000, 85),
    (4200, 100),
];

/// Estimate remaining charge from the cell voltage in millivolts.
pub fn battery_percent_from_millivolts(millivolts: u16) -> i16 {
    let mv = millivolts as i32;

    // Pick the curve segment containing mv; the first and last segments
    // also cover everything beyond their outer breakpoint.
    let mut segment = (DISCHARGE_CURVE[0], DISCHARGE_CURVE[1]);
    for pair in DISCHARGE_CURVE.windows(2) {
        segment = (pair[0], pair[1]);
        if mv < pair[1].0 {
            break;
        }
    }

    let ((v0, p0), (v1, p1)) = segment;
    (p0 + (mv - v0) * (p1 - p0) / (v1 - v0)) as i16
}
