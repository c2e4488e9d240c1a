//! Statistics report command

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn print_report(service: &LinkService) -> Result<(), CliError> {
    let report = service.report().await?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::CommandError(format!("Failed to serialize report: {}", e)))?;
    println!("{}", json);
    Ok(())
}
