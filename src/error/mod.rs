//! Error handling
//!
//! Defines the storage error taxonomy and the single io-error mapping boundary.

pub mod handlers;
pub mod types;

pub use handlers::handle_error;
pub use types::*;
