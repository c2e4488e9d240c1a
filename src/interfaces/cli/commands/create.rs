//! Create link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{CreateLinkRequest, LinkService};

pub async fn create_link(
    service: &LinkService,
    target_url: String,
    validity: Option<String>,
    custom_code: Option<String>,
) -> Result<(), CliError> {
    if target_url.trim().is_empty() {
        return Err(CliError::ParseError("Target URL cannot be empty".to_string()));
    }

    let generated = custom_code.as_deref().is_none_or(|c| c.trim().is_empty());
    let request = CreateLinkRequest {
        target_url,
        validity_minutes: validity,
        custom_code,
    };
    let link = service.create(request).await?;

    if generated {
        println!(
            "{} Generated random code: {}",
            "ℹ".bold().blue(),
            link.code.magenta()
        );
    }
    println!(
        "{} Created short link: {} -> {} (expires: {})",
        "✓".bold().green(),
        link.short_link.cyan(),
        link.target_url.blue().underline(),
        link.expires_display.yellow()
    );

    Ok(())
}
