//! Rounding helpers shared by the monetary outputs.

/// Rounds `value` to the nearest multiple of `step`; a non-positive step is a no-op.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 || !step.is_finite() {
        return value;
    }
    (value / step).round() * step
}

/// Nearest whole currency unit.
pub fn round_currency(value: f64) -> f64 {
    value.round()
}

pub(crate) fn round_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
