//! Turn raw source states into readings in canonical units.
use std::fmt;
use std::str::FromStr;

use log::Level;
use thiserror::Error;

use dewpoint_events::{SourceState, PERCENTAGE, TEMP_CELSIUS, TEMP_FAHRENHEIT};

#[derive(Debug, Error, PartialEq, Clone)]
pub enum NormalizeError {
    #[error("Unable to read {quantity} from unavailable sensor: {entity_id}")]
    SourceUnavailable {
        quantity: Quantity,
        entity_id: String,
    },

    #[error("Unable to parse {quantity} from sensor {entity_id} with state: {state}")]
    ParseFailure {
        quantity: Quantity,
        entity_id: String,
        state: String,
    },

    #[error("{quantity} sensor {entity_id} has unsupported unit: {} (allowed: {allowed})", .unit.as_deref().unwrap_or("none"))]
    UnsupportedUnit {
        quantity: Quantity,
        entity_id: String,
        unit: Option<String>,
        allowed: &'static str,
    },

    #[error("{quantity} sensor {entity_id} is out of range: {value} (allowed: 0-100%)")]
    OutOfRange {
        quantity: Quantity,
        entity_id: String,
        value: f64,
    },
}

impl NormalizeError {
    pub fn entity_id(&self) -> &str {
        match self {
            NormalizeError::SourceUnavailable { entity_id, .. }
            | NormalizeError::ParseFailure { entity_id, .. }
            | NormalizeError::UnsupportedUnit { entity_id, .. }
            | NormalizeError::OutOfRange { entity_id, .. } => entity_id,
        }
    }

    /// Severity the failure is logged with.
    pub fn level(&self) -> Level {
        match self {
            NormalizeError::SourceUnavailable { .. } | NormalizeError::ParseFailure { .. } => {
                Level::Error
            }
            NormalizeError::UnsupportedUnit { .. } | NormalizeError::OutOfRange { .. } => {
                Level::Warn
            }
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Quantity {
    Temperature,
    Humidity,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Quantity::Temperature => "temperature",
            Quantity::Humidity => "relative humidity",
        })
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TEMP_CELSIUS => Ok(TemperatureUnit::Celsius),
            TEMP_FAHRENHEIT => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(()),
        }
    }
}

type NormalizeResult<T> = Result<T, NormalizeError>;

fn parse_state(
    quantity: Quantity,
    entity_id: &str,
    state: Option<&SourceState>,
) -> NormalizeResult<f64> {
    let state = match state {
        Some(state) if !state.is_unknown() => state,
        _ => {
            return Err(NormalizeError::SourceUnavailable {
                quantity,
                entity_id: entity_id.to_string(),
            })
        }
    };

    match state.state.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(NormalizeError::ParseFailure {
            quantity,
            entity_id: entity_id.to_string(),
            state: state.state.clone(),
        }),
    }
}

/// Read a temperature source in °C, converting from °F where needed.
pub fn temperature(entity_id: &str, state: Option<&SourceState>) -> NormalizeResult<f64> {
    let value = parse_state(Quantity::Temperature, entity_id, state)?;
    let unit = state.and_then(SourceState::unit);

    match unit.map(str::parse::<TemperatureUnit>) {
        Some(Ok(unit)) => Ok(unit.to_celsius(value)),
        _ => Err(NormalizeError::UnsupportedUnit {
            quantity: Quantity::Temperature,
            entity_id: entity_id.to_string(),
            unit: unit.map(String::from),
            allowed: "°C, °F",
        }),
    }
}

/// Read a relative humidity source in percent, within 0 to 100 inclusive.
pub fn humidity(entity_id: &str, state: Option<&SourceState>) -> NormalizeResult<f64> {
    let value = parse_state(Quantity::Humidity, entity_id, state)?;
    let unit = state.and_then(SourceState::unit);

    if unit != Some(PERCENTAGE) {
        return Err(NormalizeError::UnsupportedUnit {
            quantity: Quantity::Humidity,
            entity_id: entity_id.to_string(),
            unit: unit.map(String::from),
            allowed: PERCENTAGE,
        });
    }

    if !(0.0..=100.0).contains(&value) {
        return Err(NormalizeError::OutOfRange {
            quantity: Quantity::Humidity,
            entity_id: entity_id.to_string(),
            value,
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPERATURE: &str = "sensor.temperature";
    const HUMIDITY: &str = "sensor.humidity";

    fn state(value: &str, unit: &str) -> SourceState {
        SourceState::new(value, Some(unit))
    }

    #[test]
    fn parse_temperature_units() {
        assert_eq!("°C".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Celsius));
        assert_eq!("°F".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Fahrenheit));
        assert_eq!("K".parse::<TemperatureUnit>(), Err(()));
        assert_eq!(TemperatureUnit::Fahrenheit.to_celsius(212.0), 100.0);
    }

    #[test]
    fn celsius_is_passed_through() {
        for raw in &[-40.0, 0.0, 20.0, 37.5] {
            let value = temperature(TEMPERATURE, Some(&SourceState::numeric(*raw, "°C")));
            assert_eq!(value, Ok(*raw));
        }
    }

    #[test]
    fn fahrenheit_is_converted() {
        for raw in &[-40.0, 32.0, 68.0, 98.6] {
            let value = temperature(TEMPERATURE, Some(&SourceState::numeric(*raw, "°F")));
            assert_eq!(value, Ok((raw - 32.0) * 5.0 / 9.0));
        }
    }

    #[test]
    fn missing_temperature_source_is_unavailable() {
        // act
        let err = temperature(TEMPERATURE, None).unwrap_err();

        // assert
        assert_eq!(
            err,
            NormalizeError::SourceUnavailable {
                quantity: Quantity::Temperature,
                entity_id: TEMPERATURE.to_string(),
            }
        );
        assert_eq!(err.level(), Level::Error);
    }

    #[test]
    fn unknown_state_is_unavailable() {
        let err = humidity(HUMIDITY, Some(&state("unknown", "%"))).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::SourceUnavailable {
                quantity: Quantity::Humidity,
                entity_id: HUMIDITY.to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Unable to read relative humidity from unavailable sensor: sensor.humidity"
        );
    }

    #[test]
    fn non_numeric_state_fails_to_parse() {
        for raw in &["warm", "", "NaN", "inf"] {
            let err = temperature(TEMPERATURE, Some(&state(raw, "°C"))).unwrap_err();

            assert_eq!(
                err,
                NormalizeError::ParseFailure {
                    quantity: Quantity::Temperature,
                    entity_id: TEMPERATURE.to_string(),
                    state: raw.to_string(),
                }
            );
            assert_eq!(err.level(), Level::Error);
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(temperature(TEMPERATURE, Some(&state(" 21.5 ", "°C"))), Ok(21.5));
    }

    #[test]
    fn parse_failure_is_reported_before_unit() {
        let err = temperature(TEMPERATURE, Some(&state("warm", "K"))).unwrap_err();

        assert!(matches!(err, NormalizeError::ParseFailure { .. }));
    }

    #[test]
    fn kelvin_is_unsupported() {
        // act
        let err = temperature(TEMPERATURE, Some(&state("293.15", "K"))).unwrap_err();

        // assert
        assert_eq!(
            err,
            NormalizeError::UnsupportedUnit {
                quantity: Quantity::Temperature,
                entity_id: TEMPERATURE.to_string(),
                unit: Some("K".to_string()),
                allowed: "°C, °F",
            }
        );
        assert_eq!(err.level(), Level::Warn);
        assert_eq!(
            err.to_string(),
            "temperature sensor sensor.temperature has unsupported unit: K (allowed: °C, °F)"
        );
    }

    #[test]
    fn temperature_without_unit_is_unsupported() {
        let err = temperature(TEMPERATURE, Some(&SourceState::new("20", None))).unwrap_err();

        assert_eq!(err.entity_id(), TEMPERATURE);
        assert!(err.to_string().contains("unsupported unit: none"));
    }

    #[test]
    fn humidity_in_range_is_unchanged() {
        for raw in &[0.0, 0.1, 50.0, 99.9, 100.0] {
            assert_eq!(humidity(HUMIDITY, Some(&SourceState::numeric(*raw, "%"))), Ok(*raw));
        }
    }

    #[test]
    fn humidity_out_of_range() {
        for raw in &[-1.0, 101.0] {
            let err = humidity(HUMIDITY, Some(&SourceState::numeric(*raw, "%"))).unwrap_err();

            assert_eq!(
                err,
                NormalizeError::OutOfRange {
                    quantity: Quantity::Humidity,
                    entity_id: HUMIDITY.to_string(),
                    value: *raw,
                }
            );
            assert_eq!(err.level(), Level::Warn);
            assert!(err.to_string().contains(&raw.to_string()));
        }
    }

    #[test]
    fn humidity_in_celsius_is_unsupported() {
        let err = humidity(HUMIDITY, Some(&state("50", "°C"))).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::UnsupportedUnit {
                quantity: Quantity::Humidity,
                entity_id: HUMIDITY.to_string(),
                unit: Some("°C".to_string()),
                allowed: "%",
            }
        );
    }

    #[test]
    fn humidity_unit_is_checked_before_range() {
        let err = humidity(HUMIDITY, Some(&state("150", "g/m³"))).unwrap_err();

        assert!(matches!(err, NormalizeError::UnsupportedUnit { .. }));
    }
}
