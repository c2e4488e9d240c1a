//! URL 验证模块
//!
//! Targets must parse as absolute URLs; script-capable schemes are refused
//! because a redirect to them executes in the visitor's browser.

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_SCHEMES: &[&str] = &["javascript", "data", "vbscript", "blob"];

/// Validate a redirect target and return its normalized form.
///
/// The normalized string is what gets stored: the parser drops tabs and
/// newlines and percent-encodes other control characters, so the result is
/// always safe for a `Location` header.
pub fn validate_url(url: &str) -> Result<String, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if DANGEROUS_SCHEMES.contains(&parsed.scheme()) {
        return Err(UrlValidationError::DangerousProtocol(format!(
            "{}:",
            parsed.scheme()
        )));
    }

    Ok(parsed.into())
}
