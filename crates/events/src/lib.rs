//! Event system for the prospect tracker
//!
//! This crate provides the event bus and event types used to tell listeners
//! (the SSE endpoint, tests) about entity-store mutations.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;
