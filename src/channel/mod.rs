//! The room channel: one bidirectional event connection per process.
//!
//! Views never open their own connection. They receive a `&dyn Channel` when
//! mounted, register handlers once, and keep the returned [`Subscription`]s
//! for as long as they are mounted. Dropping a subscription deregisters its
//! handler, so remounting a view never stacks duplicate handlers.
//!
//! Handlers run on the thread that owns the channel (the UI thread).

pub mod memory;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use log::warn;

use crate::models::events::{ClientEvent, ServerEvent, ServerEventKind};

/// Handlers get the channel's emitter so they can answer an event.
pub type Handler = Box<dyn FnMut(&ServerEvent, &dyn Emitter)>;
pub type ConnectionHandler = Box<dyn FnMut(&ConnectionState, &dyn Emitter)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected { reason: String },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connecting => f.write_str("Connecting"),
            ConnectionState::Connected => f.write_str("Connected"),
            ConnectionState::Disconnected { reason } => write!(f, "Disconnected ({reason})"),
        }
    }
}

pub trait Emitter {
    /// Fire-and-forget: no acknowledgement, no retry.
    fn emit(&self, event: ClientEvent);
}

pub trait Channel: Emitter {
    fn on(&self, kind: ServerEventKind, handler: Handler) -> Subscription;

    fn on_connection(&self, handler: ConnectionHandler) -> Subscription;

    fn connection_state(&self) -> ConnectionState;
}

type Shared<T> = Rc<RefCell<T>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    events: HashMap<ServerEventKind, Vec<(u64, Shared<Handler>)>>,
    connection: Vec<(u64, Shared<ConnectionHandler>)>,
}

impl Registry {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Handler registry shared by the channel implementations.
#[derive(Clone, Default)]
pub struct Handlers {
    registry: Rc<RefCell<Registry>>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, kind: ServerEventKind, handler: Handler) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.allocate();
        registry
            .events
            .entry(kind)
            .or_default()
            .push((id, Rc::new(RefCell::new(handler))));
        Subscription {
            registry: Rc::downgrade(&self.registry),
            slot: Slot::Event(kind, id),
        }
    }

    pub fn on_connection(&self, handler: ConnectionHandler) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.allocate();
        registry
            .connection
            .push((id, Rc::new(RefCell::new(handler))));
        Subscription {
            registry: Rc::downgrade(&self.registry),
            slot: Slot::Connection(id),
        }
    }

    /// Invokes every handler registered for the event's kind and returns how many ran.
    pub fn dispatch(&self, event: &ServerEvent, emitter: &dyn Emitter) -> usize {
        // Snapshot first: handlers may drop subscriptions while running.
        let targets: Vec<Shared<Handler>> = self
            .registry
            .borrow()
            .events
            .get(&event.kind())
            .map(|entries| entries.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();

        let mut ran = 0;
        for handler in targets {
            match handler.try_borrow_mut() {
                Ok(mut callback) => {
                    (*callback)(event, emitter);
                    ran += 1;
                }
                Err(_) => warn!("Skipping re-entrant handler for {}", event.kind().name()),
            }
        }
        ran
    }

    pub fn notify_connection(&self, state: &ConnectionState, emitter: &dyn Emitter) {
        let targets: Vec<Shared<ConnectionHandler>> = self
            .registry
            .borrow()
            .connection
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();

        for handler in targets {
            if let Ok(mut callback) = handler.try_borrow_mut() {
                (*callback)(state, emitter);
            }
        }
    }

    pub fn count(&self, kind: ServerEventKind) -> usize {
        self.registry
            .borrow()
            .events
            .get(&kind)
            .map_or(0, Vec::len)
    }

    pub fn connection_count(&self) -> usize {
        self.registry.borrow().connection.len()
    }
}

enum Slot {
    Event(ServerEventKind, u64),
    Connection(u64),
}

/// Keeps a handler registered; dropping it deregisters the handler.
#[must_use = "dropping a Subscription deregisters its handler immediately"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    slot: Slot,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let Ok(mut registry) = registry.try_borrow_mut() else {
            warn!("Handler registry busy, subscription not removed");
            return;
        };
        match self.slot {
            Slot::Event(kind, id) => {
                if let Some(entries) = registry.events.get_mut(&kind) {
                    entries.retain(|(entry, _)| *entry != id);
                }
            }
            Slot::Connection(id) => registry.connection.retain(|(entry, _)| *entry != id),
        }
    }
}
