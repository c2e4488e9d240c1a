//! Mode routing
//!
//! - Server mode (HTTP host)
//! - CLI mode (one-shot commands)

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "server")]
pub use server::run_server;

#[cfg(feature = "cli")]
pub use cli::run_cli;

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    #[cfg(feature = "server")]
    Server,
    #[cfg(feature = "cli")]
    Cli,
    Unknown,
}

/// Pick the mode for a parsed command
///
/// No subcommand or `serve` starts the server; anything else is a CLI command.
pub fn detect_mode(command: Option<&crate::cli::Commands>) -> Mode {
    #[cfg(feature = "cli")]
    if let Some(cmd) = command
        && !matches!(cmd, crate::cli::Commands::Serve)
    {
        return Mode::Cli;
    }
    #[cfg(not(feature = "cli"))]
    let _ = command;

    #[cfg(feature = "server")]
    return Mode::Server;

    #[cfg(not(feature = "server"))]
    Mode::Unknown
}
