//! Resolve link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn resolve_link(service: &LinkService, code: &str) -> Result<(), CliError> {
    let target = service.resolve(code).await?;
    println!(
        "{} {} -> {}",
        "→".bold().green(),
        code.cyan(),
        target.blue().underline()
    );
    Ok(())
}
