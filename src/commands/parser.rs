//! Console command parsing
//!
//! Turns one input line into a [`Command`]. Arguments are whitespace
//! separated, so paths containing spaces are not expressible here.

/// Console command
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    User(String),
    List(String),
    Mkd(String),
    Stor { path: String, local: String },
    Retr { path: String, local: String },
    Del(String),
    Ren { path: String, new_name: String },
    Unknown(String),
}

/// Outcome status of executing a command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure(u16),
    CloseConnection,
}

/// Full result of a command: status plus the text to print
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: String,
}

// Parse raw command string into Command enum
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let args: Vec<&str> = parts.collect();

    match (cmd.as_str(), args.as_slice()) {
        ("QUIT" | "Q", []) => Command::Quit,
        ("USER", [id]) => Command::User(id.to_string()),
        ("LIST", []) => Command::List(".".to_string()),
        ("LIST", [path]) => Command::List(path.to_string()),
        ("MKD", [path]) => Command::Mkd(path.to_string()),
        ("STOR", [path, local]) => Command::Stor {
            path: path.to_string(),
            local: local.to_string(),
        },
        ("RETR", [path, local]) => Command::Retr {
            path: path.to_string(),
            local: local.to_string(),
        },
        ("DEL", [path]) => Command::Del(path.to_string()),
        ("REN", [path, new_name]) => Command::Ren {
            path: path.to_string(),
            new_name: new_name.to_string(),
        },
        _ => Command::Unknown(trimmed.to_string()),
    }
}
