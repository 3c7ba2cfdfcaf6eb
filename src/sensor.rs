//! Dew point sensor derived from a temperature and a relative humidity entity.
use std::sync::mpsc::Sender;

use log::{debug, error, log};

use dewpoint_events::{
    message::{Event, Message, Payload},
    Measurement, SensorState, TEMP_CELSIUS,
};

use crate::dewpoint::dew_point;
use crate::events::{MessageHandler, StateStore};
use crate::normalize::{self, NormalizeError};

pub const DEVICE_CLASS: &str = "temperature";
pub const STATE_CLASS: &str = "measurement";
pub const ICON: &str = "mdi:thermometer-lines";

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Status {
    /// Waiting for the host to finish starting.
    Uninitialized,
    /// Tracking both source entities.
    Active,
}

pub struct DewPointSensor {
    unique_id: String,
    entity_id: String,
    name: String,
    temperature_entity: String,
    humidity_entity: String,
    status: Status,
    tracked: Vec<String>,
    native_value: Option<f64>,
}

impl DewPointSensor {
    pub fn new(
        device_id: &str,
        name: &str,
        temperature_entity: &str,
        humidity_entity: &str,
    ) -> Self {
        Self {
            unique_id: device_id.to_string(),
            entity_id: format!("sensor.{}", device_id),
            name: name.to_string(),
            temperature_entity: temperature_entity.to_string(),
            humidity_entity: humidity_entity.to_string(),
            status: Status::Uninitialized,
            tracked: vec![],
            native_value: None,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn native_value(&self) -> Option<f64> {
        self.native_value
    }

    pub fn is_tracking(&self, entity_id: &str) -> bool {
        self.tracked.iter().any(|tracked| tracked == entity_id)
    }

    fn activate(&mut self) {
        self.tracked = vec![
            self.temperature_entity.clone(),
            self.humidity_entity.clone(),
        ];
        self.status = Status::Active;
        debug!(
            "{} tracking {} and {}",
            self.entity_id, self.temperature_entity, self.humidity_entity
        );
    }

    /// Read and normalize both sources, collecting every failure.
    pub fn measurement(&self, states: &dyn StateStore) -> Result<Measurement, Vec<NormalizeError>> {
        let temperature = normalize::temperature(
            &self.temperature_entity,
            states.state(&self.temperature_entity),
        );
        let humidity = normalize::humidity(&self.humidity_entity, states.state(&self.humidity_entity));

        match (temperature, humidity) {
            (Ok(temperature), Ok(humidity)) => Ok(Measurement::new(temperature, humidity)),
            (temperature, humidity) => Err(temperature
                .err()
                .into_iter()
                .chain(humidity.err())
                .collect()),
        }
    }

    /// Run one computation pass. The current value is kept when either source is unusable.
    pub fn update(&mut self, states: &dyn StateStore) -> Option<SensorState> {
        match self.measurement(states) {
            Ok(measurement) => {
                let value = dew_point(measurement.temperature, measurement.humidity);
                debug!("Dew point: {} {}", value, TEMP_CELSIUS);
                self.native_value = Some(value);
                self.sensor_state()
            }
            Err(errors) => {
                for err in errors {
                    log!(err.level(), "{}", err);
                }
                None
            }
        }
    }

    pub fn sensor_state(&self) -> Option<SensorState> {
        self.native_value.map(|native_value| SensorState {
            entity_id: self.entity_id.clone(),
            unique_id: self.unique_id.clone(),
            friendly_name: self.name.clone(),
            native_value,
            unit_of_measurement: TEMP_CELSIUS.to_string(),
            device_class: DEVICE_CLASS.to_string(),
            state_class: STATE_CLASS.to_string(),
            icon: ICON.to_string(),
        })
    }

    fn publish(&mut self, states: &dyn StateStore, sender: &Sender<Message>) {
        if let Some(state) = self.update(states) {
            if let Err(err) = sender.send(Message::new_event(Event::SensorUpdated(state))) {
                error!("Failed to publish {}: {:?}", self.entity_id, err);
            }
        }
    }
}

impl MessageHandler for DewPointSensor {
    fn handle(&mut self, message: &Message, states: &dyn StateStore, sender: &Sender<Message>) {
        match message.payload() {
            Payload::Event(Event::Started) if self.status == Status::Uninitialized => {
                self.activate();
                self.publish(states, sender);
            }
            Payload::Event(Event::StateChanged { entity_id, .. })
                if self.is_tracking(entity_id) =>
            {
                self.publish(states, sender);
            }
            _ => {}
        }
    }
}
