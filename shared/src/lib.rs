use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

mod runtime;

pub use runtime::{Runtime, RuntimeError};

/// A movie record as stored and as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    /// System-assigned identifier, immutable after creation
    pub id: i64,
    /// Insertion timestamp; never exposed to clients
    #[serde(skip)]
    pub created_at: OffsetDateTime,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,
    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    pub genres: Vec<String>,
    /// Starts at 1, bumped by the repository on every successful update
    pub version: i32,
}

impl Movie {
    /// Build an unsaved movie; the repository fills in id, created_at and version.
    pub fn new(title: String, year: i32, runtime: Runtime, genres: Vec<String>) -> Self {
        Self {
            id: 0,
            created_at: OffsetDateTime::UNIX_EPOCH,
            title,
            year,
            runtime,
            genres,
            version: 0,
        }
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// Body of POST /v1/movies
///
/// Absent fields take their zero value so that validation, not decoding,
/// reports them. `genres` stays optional to tell "absent" from "empty".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CreateMovieRequest {
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Option<Vec<String>>,
}

/// Body of PUT/PATCH /v1/movies/:id; only provided fields are overwritten
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub environment: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub system_info: SystemInfo,
}
