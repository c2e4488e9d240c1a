use clap::Parser;

use lapselink::cli::Cli;
use lapselink::runtime::modes::{self, Mode};
use lapselink::system::{init_cli_logging, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = lapselink::config::init_config(cli.config.as_deref());

    match modes::detect_mode(cli.command.as_ref()) {
        Mode::Cli => {
            let log_guard = init_cli_logging(&config.logging)?;
            let Some(command) = cli.command else {
                return Ok(());
            };
            if let Err(e) = modes::run_cli(command).await {
                eprintln!("{}", e.format_colored());
                drop(log_guard);
                std::process::exit(1);
            }
            Ok(())
        }
        Mode::Server => {
            // guard 需要存活到进程结束
            let _log_guard = init_logging(&config.logging)?;
            modes::run_server().await
        }
        Mode::Unknown => {
            anyhow::bail!("No execution mode enabled; build with the `server` feature")
        }
    }
}
