//! cloudbox console - Entry Point
//!
//! Reads storage commands from stdin and answers one status line per command.

use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use cloudbox::StorageConfig;
use cloudbox::commands::{CommandStatus, Session, handle_command, parse_command};
use cloudbox::utils::logging::setup_logging;

#[tokio::main]
async fn main() {
    setup_logging();

    let config = match StorageConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    info!("Storage root: {}", config.storage_dir);

    let mut session = Session::new(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read command: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let result = handle_command(&mut session, parse_command(&line)).await;
        println!("{}", result.message);

        if result.status == CommandStatus::CloseConnection {
            break;
        }
    }

    info!("Console closed");
}
