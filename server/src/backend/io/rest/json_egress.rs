//! # JSON Egress
//!
//! Every response body is an [`Envelope`]: a JSON object whose keys name
//! the payloads. [`write_json`] renders it and builds the response, and it
//! fails before any response exists, so callers can still send something
//! else.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

const INDENT: &[u8] = b"    ";

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Ordered top-level response object
#[derive(Debug, Default)]
pub struct Envelope {
    entries: Vec<(&'static str, Value)>,
    failure: Option<serde_json::Error>,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` under `key`, replacing an earlier value for the same key.
    /// A value that cannot be represented as JSON poisons the envelope and
    /// [`write_json`] reports it.
    pub fn with<T: Serialize + ?Sized>(mut self, key: &'static str, value: &T) -> Self {
        if self.failure.is_some() {
            return self;
        }

        match serde_json::to_value(value) {
            Ok(value) => match self.entries.iter_mut().find(|(name, _)| *name == key) {
                Some(entry) => entry.1 = value,
                None => self.entries.push((key, value)),
            },
            Err(err) => self.failure = Some(err),
        }
        self
    }

    /// Render as indented JSON with a trailing newline
    pub fn into_json(self) -> Result<Vec<u8>, EncodeError> {
        if let Some(err) = self.failure {
            return Err(err.into());
        }

        let mut buf = Vec::with_capacity(128);
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl Serialize for Envelope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Build a JSON response.
///
/// Caller headers replace any existing values under the same name; the
/// content type is always set to JSON.
pub fn write_json(
    status: StatusCode,
    envelope: Envelope,
    headers: HeaderMap,
) -> Result<Response, EncodeError> {
    let body = envelope.into_json()?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;

    let response_headers = response.headers_mut();
    let mut current = None;
    for (name, value) in headers {
        // `None` continues the previous name's values
        if let Some(name) = name {
            response_headers.remove(&name);
            current = Some(name);
        }
        if let Some(name) = &current {
            response_headers.append(name.clone(), value);
        }
    }
    response_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(response)
}
