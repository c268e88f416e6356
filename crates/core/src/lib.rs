//! Domain types for the prospect tracker.

pub mod domain;
mod error;

pub use domain::*;
pub use error::CoreError;
