use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidUrl(String),
    InvalidValidity(String),
    InvalidShortcode(String),
    CodeTaken(String),
    TooManyRequests(String),
    NoValidRequests(String),
    GenerationExhausted(String),
    NotFound(String),
    Expired(String),
    Storage(String),
    Serialization(String),
    FileOperation(String),
    Config(String),
}

impl EngineError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidUrl(_) => "E001",
            EngineError::InvalidValidity(_) => "E002",
            EngineError::InvalidShortcode(_) => "E003",
            EngineError::CodeTaken(_) => "E004",
            EngineError::TooManyRequests(_) => "E005",
            EngineError::NoValidRequests(_) => "E006",
            EngineError::GenerationExhausted(_) => "E007",
            EngineError::NotFound(_) => "E008",
            EngineError::Expired(_) => "E009",
            EngineError::Storage(_) => "E010",
            EngineError::Serialization(_) => "E011",
            EngineError::FileOperation(_) => "E012",
            EngineError::Config(_) => "E013",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            EngineError::InvalidUrl(_) => "Invalid URL",
            EngineError::InvalidValidity(_) => "Invalid Validity",
            EngineError::InvalidShortcode(_) => "Invalid Shortcode",
            EngineError::CodeTaken(_) => "Code Taken",
            EngineError::TooManyRequests(_) => "Too Many Requests",
            EngineError::NoValidRequests(_) => "No Valid Requests",
            EngineError::GenerationExhausted(_) => "Code Generation Exhausted",
            EngineError::NotFound(_) => "Link Not Found",
            EngineError::Expired(_) => "Link Expired",
            EngineError::Storage(_) => "Storage Error",
            EngineError::Serialization(_) => "Serialization Error",
            EngineError::FileOperation(_) => "File Operation Error",
            EngineError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            EngineError::InvalidUrl(msg)
            | EngineError::InvalidValidity(msg)
            | EngineError::InvalidShortcode(msg)
            | EngineError::CodeTaken(msg)
            | EngineError::TooManyRequests(msg)
            | EngineError::NoValidRequests(msg)
            | EngineError::GenerationExhausted(msg)
            | EngineError::NotFound(msg)
            | EngineError::Expired(msg)
            | EngineError::Storage(msg)
            | EngineError::Serialization(msg)
            | EngineError::FileOperation(msg)
            | EngineError::Config(msg) => msg,
        }
    }

    /// Whether the caller caused this error (bad input or a business rule),
    /// as opposed to an infrastructure failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            EngineError::Storage(_)
                | EngineError::Serialization(_)
                | EngineError::FileOperation(_)
                | EngineError::Config(_)
                | EngineError::GenerationExhausted(_)
        )
    }

    /// HTTP status used by the HTTP host
    #[cfg(feature = "server")]
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            EngineError::InvalidUrl(_)
            | EngineError::InvalidValidity(_)
            | EngineError::InvalidShortcode(_)
            | EngineError::NoValidRequests(_) => StatusCode::BAD_REQUEST,
            EngineError::CodeTaken(_) => StatusCode::CONFLICT,
            EngineError::TooManyRequests(_) => StatusCode::PAYLOAD_TOO_LARGE,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Expired(_) => StatusCode::GONE,
            EngineError::GenerationExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::Storage(_)
            | EngineError::Serialization(_)
            | EngineError::FileOperation(_)
            | EngineError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EngineError {}

// 便捷的构造函数
impl EngineError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        EngineError::InvalidUrl(msg.into())
    }

    pub fn invalid_validity<T: Into<String>>(msg: T) -> Self {
        EngineError::InvalidValidity(msg.into())
    }

    pub fn invalid_shortcode<T: Into<String>>(msg: T) -> Self {
        EngineError::InvalidShortcode(msg.into())
    }

    pub fn code_taken<T: Into<String>>(msg: T) -> Self {
        EngineError::CodeTaken(msg.into())
    }

    pub fn too_many_requests<T: Into<String>>(msg: T) -> Self {
        EngineError::TooManyRequests(msg.into())
    }

    pub fn no_valid_requests<T: Into<String>>(msg: T) -> Self {
        EngineError::NoValidRequests(msg.into())
    }

    pub fn generation_exhausted<T: Into<String>>(msg: T) -> Self {
        EngineError::GenerationExhausted(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        EngineError::NotFound(msg.into())
    }

    pub fn expired<T: Into<String>>(msg: T) -> Self {
        EngineError::Expired(msg.into())
    }

    pub fn storage<T: Into<String>>(msg: T) -> Self {
        EngineError::Storage(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        EngineError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        EngineError::FileOperation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        EngineError::Config(msg.into())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

/// A failure inside `create_batch`.
///
/// `index` is the 1-based position of the offending request in the submitted
/// batch; it is `None` when the batch as a whole was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    pub index: Option<usize>,
    pub error: EngineError,
}

impl BatchError {
    pub fn whole_batch(error: EngineError) -> Self {
        Self { index: None, error }
    }

    pub fn at(index: usize, error: EngineError) -> Self {
        Self {
            index: Some(index),
            error,
        }
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "request {}: {}", index, self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
