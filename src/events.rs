use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{channel, Sender};

use log::{debug, error};

use dewpoint_events::{
    message::{Command, Event, Message, Payload},
    SourceState,
};

/// Read access to the current state of host entities.
pub trait StateStore {
    fn state(&self, entity_id: &str) -> Option<&SourceState>;
}

/// In-memory state store owned by the message loop.
#[derive(Debug, Default, Clone)]
pub struct States {
    states: HashMap<String, SourceState>,
}

impl States {
    /// Replace the state of an entity, returning the previous one.
    pub fn set(&mut self, entity_id: &str, state: Option<SourceState>) -> Option<SourceState> {
        match state {
            Some(state) => self.states.insert(entity_id.to_string(), state),
            None => self.states.remove(entity_id),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl StateStore for States {
    fn state(&self, entity_id: &str) -> Option<&SourceState> {
        self.states.get(entity_id)
    }
}

pub trait MessageHandler {
    /// Called once before delivery begins; `sender` feeds new messages into the loop.
    fn start(&mut self, _sender: Sender<Message>) {}
    /// Messages sent on `sender` here are delivered before the next incoming message.
    fn handle(&mut self, _message: &Message, _states: &dyn StateStore, _sender: &Sender<Message>) {}
}

/// Deliver messages to every handler in the order they were sent.
///
/// `Started` is always the first message delivered. `SetState` commands are applied to the
/// state store and followed by a `StateChanged` event. The loop returns the final states after a
/// `Stop` command, or once every handler has dropped its sender.
pub fn run_loop(mut handlers: Vec<Box<dyn MessageHandler>>, mut states: States) -> States {
    let (sender, receiver) = channel();
    let (follow_up, follow_ups) = channel();

    if let Err(err) = sender.send(Message::new_event(Event::Started)) {
        error!("failed to send start event: {:?}", err);
    }

    for handler in handlers.iter_mut() {
        handler.start(sender.clone());
    }
    drop(sender);

    let mut stopping = false;
    for message in receiver.iter() {
        let mut pending = VecDeque::new();
        pending.push_back(message);

        while let Some(message) = pending.pop_front() {
            if let Payload::Command(Command::SetState { entity_id, state }) = message.payload() {
                let old_state = states.set(entity_id, state.clone());
                debug!("{} changed from {:?} to {:?}", entity_id, old_state, state);
                pending.push_back(Message::state_changed(
                    entity_id.as_str(),
                    old_state,
                    state.clone(),
                ));
            }

            for handler in handlers.iter_mut() {
                handler.handle(&message, &states, &follow_up);
            }
            pending.extend(follow_ups.try_iter());

            if let Payload::Command(Command::Stop) = message.payload() {
                stopping = true;
            }
        }

        if stopping {
            break;
        }
    }

    states
}
