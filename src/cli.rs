//! Command-line interface definitions using clap
//!
//! Without a subcommand the binary starts the HTTP host.

use clap::{Parser, Subcommand};

/// lapselink - short links that lapse after a validity window
#[derive(Parser)]
#[command(name = "lapselink")]
#[command(version)]
#[command(about = "An expiring URL shortener", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP host (default)
    Serve,

    /// Create a short link
    Create {
        /// Target URL
        url: String,

        /// Validity in minutes (default from config)
        #[arg(long)]
        validity: Option<String>,

        /// Custom short code (alphanumeric)
        #[arg(long)]
        code: Option<String>,
    },

    /// Resolve a short code to its target URL
    Resolve {
        /// Short code to look up
        code: String,
    },

    /// Print the statistics report as JSON
    Report,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate a sample configuration file
    Generate {
        /// Output file path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "lapselink",
            "create",
            "https://example.com",
            "--validity",
            "15",
            "--code",
            "abc123",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Create {
                url,
                validity,
                code,
            }) => {
                assert_eq!(url, "https://example.com");
                assert_eq!(validity.as_deref(), Some("15"));
                assert_eq!(code.as_deref(), Some("abc123"));
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["lapselink", "--config", "custom.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_config_generate() {
        let cli = Cli::try_parse_from(["lapselink", "config", "generate", "out.toml", "--force"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate { force: true, .. }
            })
        ));
    }
}
