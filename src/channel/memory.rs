use std::cell::RefCell;

use log::debug;

use super::{
    Channel, ConnectionHandler, ConnectionState, Emitter, Handler, Handlers, Subscription,
};
use crate::models::events::{ClientEvent, ServerEvent, ServerEventKind};

/// In-process channel: records what was emitted and lets the caller inject
/// server events. Used to drive flows without a backend.
pub struct MemoryChannel {
    handlers: Handlers,
    sent: RefCell<Vec<ClientEvent>>,
    state: RefCell<ConnectionState>,
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self {
            handlers: Handlers::new(),
            sent: RefCell::new(Vec::new()),
            state: RefCell::new(ConnectionState::Connected),
        }
    }
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a server event to the registered handlers.
    pub fn deliver(&self, event: ServerEvent) -> usize {
        self.handlers.dispatch(&event, self)
    }

    pub fn set_state(&self, state: ConnectionState) {
        *self.state.borrow_mut() = state.clone();
        self.handlers.notify_connection(&state, self);
    }

    pub fn sent(&self) -> Vec<ClientEvent> {
        self.sent.borrow().clone()
    }

    pub fn take_sent(&self) -> Vec<ClientEvent> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }

    pub fn handler_count(&self, kind: ServerEventKind) -> usize {
        self.handlers.count(kind)
    }
}

impl Emitter for MemoryChannel {
    fn emit(&self, event: ClientEvent) {
        debug!("memory channel emit {}", event.name());
        self.sent.borrow_mut().push(event);
    }
}

impl Channel for MemoryChannel {
    fn on(&self, kind: ServerEventKind, handler: Handler) -> Subscription {
        self.handlers.on(kind, handler)
    }

    fn on_connection(&self, handler: ConnectionHandler) -> Subscription {
        self.handlers.on_connection(handler)
    }

    fn connection_state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }
}
