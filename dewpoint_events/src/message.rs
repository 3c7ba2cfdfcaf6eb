use std::fmt;

use chrono::{offset::Utc, DateTime};
use serde::{Deserialize, Serialize};

use crate::{SensorState, SourceState};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    stamp: DateTime<Utc>,
    payload: Payload,
}

impl Message {
    pub fn new(payload: Payload) -> Self {
        Self::raw(Utc::now(), payload)
    }

    pub fn raw(stamp: DateTime<Utc>, payload: Payload) -> Self {
        Self { stamp, payload }
    }

    pub fn new_command(command: Command) -> Self {
        Self::new(Payload::Command(command))
    }

    pub fn new_event(event: Event) -> Self {
        Self::new(Payload::Event(event))
    }

    pub fn set_state(entity_id: impl Into<String>, state: Option<SourceState>) -> Self {
        Self::new_command(Command::SetState {
            entity_id: entity_id.into(),
            state,
        })
    }

    pub fn state_changed(
        entity_id: impl Into<String>,
        old_state: Option<SourceState>,
        new_state: Option<SourceState>,
    ) -> Self {
        Self::new_event(Event::StateChanged {
            entity_id: entity_id.into(),
            old_state,
            new_state,
        })
    }

    pub fn stamp(&self) -> DateTime<Utc> {
        self.stamp
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_command(self) -> Option<Command> {
        if let Payload::Command(command) = self.payload {
            Some(command)
        } else {
            None
        }
    }

    pub fn into_event(self) -> Option<Event> {
        if let Payload::Event(event) = self.payload {
            Some(event)
        } else {
            None
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum Payload {
    Command(Command),
    Event(Event),
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    /// Replace the state of an entity in the host state store; `None` removes it.
    SetState {
        entity_id: String,
        state: Option<SourceState>,
    },
    Stop,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// The host finished starting; emitted once per run.
    Started,
    StateChanged {
        entity_id: String,
        old_state: Option<SourceState>,
        new_state: Option<SourceState>,
    },
    SensorUpdated(SensorState),
}

impl Event {
    pub fn title(&self) -> &'static str {
        match self {
            Event::Started => "Started",
            Event::StateChanged { .. } => "State changed",
            Event::SensorUpdated(_) => "Sensor updated",
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Started => "host.started",
            Event::StateChanged { .. } => "state.changed",
            Event::SensorUpdated(_) => "sensor.updated",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Started => write!(f, "started"),
            Event::StateChanged {
                entity_id,
                new_state: Some(state),
                ..
            } => match state.unit() {
                Some(unit) => write!(f, "{}: {} {}", entity_id, state.state, unit),
                None => write!(f, "{}: {}", entity_id, state.state),
            },
            Event::StateChanged { entity_id, .. } => write!(f, "{}: removed", entity_id),
            Event::SensorUpdated(sensor) => write!(
                f,
                "{}: {:.1}{}",
                sensor.entity_id, sensor.native_value, sensor.unit_of_measurement
            ),
        }
    }
}
