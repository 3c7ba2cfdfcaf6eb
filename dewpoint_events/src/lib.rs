use serde::{Deserialize, Serialize};

pub mod message;

pub const TEMP_CELSIUS: &str = "°C";
pub const TEMP_FAHRENHEIT: &str = "°F";
pub const PERCENTAGE: &str = "%";

pub const STATE_UNKNOWN: &str = "unknown";
pub const STATE_UNAVAILABLE: &str = "unavailable";

/// The state of an entity as held by the host state store.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SourceState {
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
}

impl SourceState {
    pub fn new(state: impl Into<String>, unit_of_measurement: Option<&str>) -> Self {
        Self {
            state: state.into(),
            unit_of_measurement: unit_of_measurement.map(String::from),
        }
    }

    pub fn numeric(value: f64, unit_of_measurement: &str) -> Self {
        Self::new(value.to_string(), Some(unit_of_measurement))
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit_of_measurement.as_deref()
    }

    /// `true` for the sentinel states a source reports before it has a reading.
    pub fn is_unknown(&self) -> bool {
        self.state == STATE_UNKNOWN || self.state == STATE_UNAVAILABLE
    }
}

/// A normalized pair of readings: degrees Celsius and percent relative humidity.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Measurement {
    pub temperature: f64,
    pub humidity: f64,
}

impl Measurement {
    pub const fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature,
            humidity,
        }
    }
}

/// The published state of a derived sensor entity.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SensorState {
    pub entity_id: String,
    pub unique_id: String,
    pub friendly_name: String,
    pub native_value: f64,
    pub unit_of_measurement: String,
    pub device_class: String,
    pub state_class: String,
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_and_unavailable_are_sentinels() {
        assert!(SourceState::new("unknown", None).is_unknown());
        assert!(SourceState::new("unavailable", Some(PERCENTAGE)).is_unknown());
        assert!(!SourceState::new("12.5", Some(PERCENTAGE)).is_unknown());
    }

    #[test]
    fn numeric_state_keeps_unit() {
        // act
        let state = SourceState::numeric(20.5, TEMP_CELSIUS);

        // assert
        assert_eq!(state.state, "20.5");
        assert_eq!(state.unit(), Some("°C"));
    }

    #[test]
    fn deserialize_state_without_unit() {
        // act
        let state: SourceState = serde_json::from_str(r#"{"state":"on"}"#).unwrap();

        // assert
        assert_eq!(state, SourceState::new("on", None));
    }
}
