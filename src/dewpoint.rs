//! Magnus-Tetens dew point approximation.

pub const MAGNUS_K2: f64 = 17.62;
pub const MAGNUS_K3: f64 = 243.12;

/// Dew point reported when the relative humidity is zero and the formula is undefined.
pub const DRY_AIR_DEW_POINT: f64 = -50.0;

/// Calculate the dew point in °C from a temperature in °C and a relative humidity in percent.
///
/// The result is rounded to one decimal place with `f64::round`, so halves round away from zero.
pub fn dew_point(temperature: f64, humidity: f64) -> f64 {
    let alpha = MAGNUS_K2 * temperature / (MAGNUS_K3 + temperature);
    let beta = MAGNUS_K2 * MAGNUS_K3 / (MAGNUS_K3 + temperature);

    let dew_point = if humidity == 0.0 {
        DRY_AIR_DEW_POINT
    } else {
        let ln_rh = (humidity / 100.0).ln();
        MAGNUS_K3 * (alpha + ln_rh) / (beta - ln_rh)
    };

    (dew_point * 10.0).round() / 10.0
}
