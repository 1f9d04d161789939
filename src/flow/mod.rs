//! Per-view room state machines.
//!
//! Each flow is a plain state machine fed with server events; the matching
//! `*View` type mounts it on a [`crate::channel::Channel`] and owns the
//! subscriptions for as long as the view lives.

pub mod guest;
pub mod host;

pub use guest::{GuestFlow, GuestScreen, GuestState, GuestView};
pub use host::{HostFlow, HostScreen, HostState, HostView};
