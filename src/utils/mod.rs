//! Utility functions
//!
//! Logging setup for the console binary.

pub mod logging;
