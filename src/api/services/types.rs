//! Request and response bodies for the JSON endpoints

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{BatchError, EngineError};
use crate::services::CreateLinkRequest;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub data: T,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    /// Engine error code, e.g. "E004"
    pub code: String,
    pub error: String,
    pub message: String,
    /// 1-based position of the failing request, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl ApiError {
    pub fn from_engine(err: &EngineError, index: Option<usize>) -> Self {
        Self {
            code: err.code().to_string(),
            error: err.error_type().to_string(),
            message: err.message().to_string(),
            index,
        }
    }
}

impl From<&BatchError> for ApiError {
    fn from(err: &BatchError) -> Self {
        Self::from_engine(&err.error, err.index)
    }
}

/// One entry of `POST /api/links`
#[derive(Deserialize, Clone, Debug, Default)]
pub struct PostLink {
    #[serde(default)]
    pub target_url: String,
    /// Accepts `30` as well as `"30"`
    #[serde(default, deserialize_with = "string_or_number")]
    pub validity_minutes: Option<String>,
    #[serde(default)]
    pub custom_code: Option<String>,
}

impl From<PostLink> for CreateLinkRequest {
    fn from(post: PostLink) -> Self {
        CreateLinkRequest {
            target_url: post.target_url,
            validity_minutes: post.validity_minutes,
            custom_code: post.custom_code,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct PostLinkBatch {
    #[serde(default)]
    pub requests: Vec<PostLink>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Float(f)) => Some(f.to_string()),
    })
}
