//! Operator console
//!
//! Line-oriented commands driving a [`crate::storage::UserStorage`].

mod handlers;
mod parser;

pub use handlers::{Session, format_entry, handle_command};
pub use parser::{Command, CommandResult, CommandStatus, parse_command};
