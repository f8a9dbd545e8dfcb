//! Console command handlers
//!
//! Each handler drives one storage operation for the selected user and turns
//! the outcome into a status line.

use log::{info, warn};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_stream::StreamExt;

use crate::commands::parser::{Command, CommandResult, CommandStatus};
use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::storage::{EntryMetadata, UserStorage};

/// Console session: the loaded configuration and the selected user, if any
pub struct Session {
    config: StorageConfig,
    storage: Option<UserStorage>,
}

impl Session {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            storage: None,
        }
    }

    pub fn current_user(&self) -> Option<u64> {
        self.storage.as_ref().map(UserStorage::user_id)
    }
}

// Handle a single command against the session
pub async fn handle_command(session: &mut Session, command: Command) -> CommandResult {
    match command {
        Command::Quit => CommandResult {
            status: CommandStatus::CloseConnection,
            message: "221 Goodbye".into(),
        },
        Command::User(id) => handle_cmd_user(session, &id),
        Command::Unknown(raw) => failure(500, format!("Unknown or malformed command: {raw}")),
        command => match session.storage.as_ref() {
            Some(storage) => handle_storage_command(storage, command).await,
            None => failure(530, "Select a user first".into()),
        },
    }
}

async fn handle_storage_command(storage: &UserStorage, command: Command) -> CommandResult {
    match command {
        Command::List(path) => handle_cmd_list(storage, &path),
        Command::Mkd(path) => {
            respond(storage.create_folder(&path), format!("201 Folder {path} created"))
        }
        Command::Stor { path, local } => handle_cmd_stor(storage, &path, &local).await,
        Command::Retr { path, local } => handle_cmd_retr(storage, &path, &local).await,
        Command::Del(path) => respond(storage.delete(&path), format!("204 Deleted {path}")),
        Command::Ren { path, new_name } => respond(
            storage.rename(&path, &new_name),
            format!("200 Renamed {path} to {new_name}"),
        ),
        Command::Quit | Command::User(_) | Command::Unknown(_) => {
            failure(500, "Not a storage command".into())
        }
    }
}

fn handle_cmd_user(session: &mut Session, id: &str) -> CommandResult {
    let user_id = match id.parse::<u64>() {
        Ok(user_id) => user_id,
        Err(_) => return failure(501, format!("Invalid user id: {id}")),
    };

    match UserStorage::open(&session.config, user_id) {
        Ok(storage) => {
            info!("Console switched to user {user_id}");
            session.storage = Some(storage);
            success(format!("200 Using storage of user {user_id}"))
        }
        Err(e) => storage_failure(&e),
    }
}

fn handle_cmd_list(storage: &UserStorage, path: &str) -> CommandResult {
    match storage.list(path) {
        Ok(entries) => {
            let mut lines = vec![format!("200 {} entries in {}", entries.len(), path)];
            lines.extend(entries.iter().map(format_entry));
            success(lines.join("\n"))
        }
        Err(e) => storage_failure(&e),
    }
}

async fn handle_cmd_stor(storage: &UserStorage, path: &str, local: &str) -> CommandResult {
    let filename = match std::path::Path::new(local).file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => return failure(501, format!("No file name in {local}")),
    };

    let source = match File::open(local).await {
        Ok(file) => file,
        Err(e) => {
            warn!("Cannot open local file {local}: {e}");
            return failure(550, format!("Cannot open local file {local}"));
        }
    };

    match storage.upload_async(path, &filename, source).await {
        Ok(result) => success(format!(
            "200 Stored {} ({} bytes)",
            result.virtual_path, result.bytes_written
        )),
        Err(e) => storage_failure(&e),
    }
}

async fn handle_cmd_retr(storage: &UserStorage, path: &str, local: &str) -> CommandResult {
    let mut chunks = match storage.download_stream(path).await {
        Ok(stream) => stream,
        Err(e) => return storage_failure(&e),
    };

    let mut sink = match File::create(local).await {
        Ok(file) => file,
        Err(e) => {
            warn!("Cannot create local file {local}: {e}");
            return failure(550, format!("Cannot create local file {local}"));
        }
    };

    let mut total = 0u64;
    while let Some(chunk) = chunks.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => return storage_failure(&e),
        };
        if let Err(e) = sink.write_all(&chunk).await {
            warn!("Write to {local} failed: {e}");
            return failure(451, format!("Write to {local} failed"));
        }
        total += chunk.len() as u64;
    }

    if let Err(e) = sink.flush().await {
        warn!("Flush of {local} failed: {e}");
        return failure(451, format!("Write to {local} failed"));
    }

    success(format!("200 Retrieved {path} ({total} bytes)"))
}

/// Format: "name|size|d or -|RFC 3339 timestamp"
pub fn format_entry(entry: &EntryMetadata) -> String {
    format!(
        "{}|{}|{}|{}",
        entry.name,
        entry.size,
        if entry.is_dir { "d" } else { "-" },
        entry.mod_time.to_rfc3339()
    )
}

fn respond(outcome: Result<(), StorageError>, message: String) -> CommandResult {
    match outcome {
        Ok(()) => success(message),
        Err(e) => storage_failure(&e),
    }
}

fn success(message: String) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message,
    }
}

fn failure(code: u16, message: String) -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure(code),
        message: format!("{code} {message}"),
    }
}

fn storage_failure(err: &StorageError) -> CommandResult {
    failure(err.status_code(), err.to_string())
}
