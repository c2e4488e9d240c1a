//! CLI interface module
//!
//! Runs one-shot commands against the configured storage backend.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::cli::{Commands, ConfigCommands};
use crate::errors::EngineError;
use crate::runtime::lifetime::startup::build_link_service;
use crate::services::LinkService;
use commands::{config_generate, create_link, print_report, resolve_link};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        if err.is_client_error() {
            CliError::CommandError(err.to_string())
        } else {
            CliError::StorageError(err.to_string())
        }
    }
}

/// Run a CLI command from clap-parsed input
///
/// `Serve` is handled by the caller.
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // Generate doesn't need storage
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cmd
    {
        return config_generate(output_path, force).await;
    }

    let config = crate::config::get_config();
    let service: Arc<LinkService> = build_link_service(&config)?;

    let result = match cmd {
        Commands::Create {
            url,
            validity,
            code,
        } => create_link(&service, url, validity, code).await,
        Commands::Resolve { code } => resolve_link(&service, &code).await,
        Commands::Report => print_report(&service).await,
        Commands::Serve | Commands::Config { .. } => Err(CliError::CommandError(
            "command is not handled by the CLI runner".to_string(),
        )),
    };

    // 刷新点击记录，避免进程退出时丢失
    let flushed = service.click_recorder().try_flush().await;
    finish_command(result, flushed)
}

/// Combine a command outcome with the final click flush
///
/// A command error wins over a flush error; the flush error is only logged.
fn finish_command(
    result: Result<(), CliError>,
    flushed: crate::errors::Result<usize>,
) -> Result<(), CliError> {
    match (result, flushed) {
        (Ok(()), Ok(_)) => Ok(()),
        (Ok(()), Err(e)) => Err(e.into()),
        (Err(cmd_err), Err(flush_err)) => {
            tracing::warn!("Click flush failed after command error: {}", flush_err);
            Err(cmd_err)
        }
        (Err(cmd_err), Ok(_)) => Err(cmd_err),
    }
}
