//! Line-oriented state feed and published-state printer for running sensors outside a host.
use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::thread;

use log::{error, info, warn};

use dewpoint_events::{
    message::{Command, Event, Message, Payload},
    SourceState,
};

use crate::events::{MessageHandler, StateStore};

/// Parse `<entity_id> <state> [unit]`. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_state_line(line: &str) -> Result<Option<(String, SourceState)>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let entity_id = parts.next().ok_or_else(|| format!("missing entity id: {}", line))?;
    if !entity_id.contains('.') {
        return Err(format!("invalid entity id: {}", entity_id));
    }
    let state = parts
        .next()
        .ok_or_else(|| format!("missing state for {}", entity_id))?;
    let unit = parts.collect::<Vec<&str>>().join(" ");
    let unit = if unit.is_empty() { None } else { Some(unit.as_str()) };

    Ok(Some((entity_id.to_string(), SourceState::new(state, unit))))
}

/// Read state changes from a reader on a worker thread and stop the loop at end of input.
pub struct StateFeeder<R> {
    reader: Option<R>,
}

impl<R: BufRead + Send + 'static> StateFeeder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

fn feed<R: BufRead>(reader: R, sender: &Sender<Message>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!("failed to read state line: {}", err);
                break;
            }
        };
        match parse_state_line(&line) {
            Ok(Some((entity_id, state))) => {
                if let Err(err) = sender.send(Message::set_state(entity_id, Some(state))) {
                    error!("failed to write state change to bus: {:?}", err);
                    return;
                }
            }
            Ok(None) => {}
            Err(err) => warn!("skipping line: {}", err),
        }
    }

    info!("end of state input");
    if let Err(err) = sender.send(Message::new_command(Command::Stop)) {
        error!("failed to send stop command: {:?}", err);
    }
}

impl<R: BufRead + Send + 'static> MessageHandler for StateFeeder<R> {
    fn start(&mut self, sender: Sender<Message>) {
        if let Some(reader) = self.reader.take() {
            thread::spawn(move || feed(reader, &sender));
        }
    }
}

/// Print every published sensor state as a JSON line.
pub struct PrintSensorHandler;

impl MessageHandler for PrintSensorHandler {
    fn handle(&mut self, message: &Message, _: &dyn StateStore, _: &Sender<Message>) {
        if let Payload::Event(Event::SensorUpdated(_)) = message.payload() {
            match serde_json::to_string(message) {
                Ok(line) => println!("{}", line),
                Err(err) => error!("failed to serialize {:?}: {}", message, err),
            }
        }
    }
}
