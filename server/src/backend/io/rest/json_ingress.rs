//! # JSON Ingress
//!
//! Turns a request body into a typed request value. Every failure a client
//! can cause is reported as one [`DecodeError`] kind; a destination whose
//! field table disagrees with its serde shape is a [`DecodeFault`], which is
//! a bug in this crate and is handled by the fault boundary, not reported as
//! a bad request.
//!
//! Decoding runs in stages:
//! 1. read at most `max_bytes` from the body
//! 2. parse the first JSON value
//! 3. check the object's keys and value shapes against the [`FieldTable`]
//! 4. reject anything but whitespace after that value
//! 5. build the typed value with serde

use std::fmt;
use std::io::Read;

use axum::body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_json::{Map, Value};
use shared::Runtime;

use super::field_table::{FieldKind, FieldTable};

/// Default body cap in bytes
pub const DEFAULT_MAX_BODY_BYTES: usize = 1_048_567;

/// Where a type mismatch was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Field(String),
    Offset(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Field(name) => write!(f, " for field \"{}\"", name),
            Location::Offset(offset) => write!(f, " (at character {})", offset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("body must not be larger than {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("body contains unknown key \"{0}\"")]
    UnknownField(String),
    #[error("body contains badly-formed JSON (at character {offset})")]
    SyntaxError { offset: usize },
    #[error("body contains badly-formed JSON")]
    UnexpectedEof,
    #[error("body contains incorrect JSON type{0}")]
    TypeMismatch(Location),
    #[error("body must not be empty")]
    EmptyBody,
    #[error("body must only contain a single JSON value")]
    MultipleValues,
    #[error("invalid runtime format")]
    InvalidRuntimeFormat,
    #[error("{0}")]
    Unclassified(String),
}

impl DecodeError {
    /// Stable machine-readable name of the kind
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::BodyTooLarge { .. } => "body_too_large",
            DecodeError::UnknownField(_) => "unknown_field",
            DecodeError::SyntaxError { .. } => "syntax_error",
            DecodeError::UnexpectedEof => "unexpected_eof",
            DecodeError::TypeMismatch(_) => "type_mismatch",
            DecodeError::EmptyBody => "empty_body",
            DecodeError::MultipleValues => "multiple_values",
            DecodeError::InvalidRuntimeFormat => "invalid_runtime_format",
            DecodeError::Unclassified(_) => "bad_request",
        }
    }
}

/// The destination type rejected an object its own field table accepted
#[derive(Debug, thiserror::Error)]
#[error("decode destination {type_name} disagrees with its field table: {source}")]
pub struct DecodeFault {
    pub type_name: &'static str,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    #[error(transparent)]
    Client(#[from] DecodeError),
    #[error(transparent)]
    Fault(#[from] DecodeFault),
}

/// Body decoder with a fixed size cap
#[derive(Debug, Clone, Copy)]
pub struct JsonIngress {
    max_bytes: usize,
}

impl Default for JsonIngress {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BODY_BYTES)
    }
}

impl JsonIngress {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Decode one `T` from `reader`
    pub fn decode<T>(&self, reader: impl Read) -> Result<T, IngressError>
    where
        T: DeserializeOwned + FieldTable,
    {
        let body = self.read_limited(reader)?;
        let parsed = parse_first_value(&body)?;
        let object = check_fields::<T>(parsed.value, parsed.token_end)?;
        // Trailing content only matters once the first value is acceptable
        if parsed.trailing {
            return Err(DecodeError::MultipleValues.into());
        }

        serde_json::from_value(Value::Object(object)).map_err(|source| {
            IngressError::Fault(DecodeFault {
                type_name: std::any::type_name::<T>(),
                source,
            })
        })
    }

    /// Decode into `dest`, which is only written when decoding succeeds
    pub fn decode_into<T>(&self, reader: impl Read, dest: &mut T) -> Result<(), IngressError>
    where
        T: DeserializeOwned + FieldTable,
    {
        *dest = self.decode(reader)?;
        Ok(())
    }

    /// Collect an HTTP body under the size cap, then decode it
    pub async fn read_body<T>(&self, body: Body) -> Result<T, IngressError>
    where
        T: DeserializeOwned + FieldTable,
    {
        let bytes = match Limited::new(body, self.max_bytes).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) if err.is::<LengthLimitError>() => {
                return Err(DecodeError::BodyTooLarge {
                    limit: self.max_bytes,
                }
                .into())
            }
            Err(err) => return Err(DecodeError::Unclassified(err.to_string()).into()),
        };

        self.decode(bytes.as_ref())
    }

    fn read_limited(&self, reader: impl Read) -> Result<Vec<u8>, DecodeError> {
        let mut body = Vec::new();
        // One byte past the cap tells "exactly at the limit" from "over it"
        reader
            .take(self.max_bytes as u64 + 1)
            .read_to_end(&mut body)
            .map_err(|err| DecodeError::Unclassified(err.to_string()))?;

        if body.len() > self.max_bytes {
            return Err(DecodeError::BodyTooLarge {
                limit: self.max_bytes,
            });
        }
        Ok(body)
    }
}

/// The first JSON value of a body
struct FirstValue {
    value: Value,
    /// Offset just past the value's opening token: the `{` or `[` of a
    /// container, or the whole of a scalar
    token_end: usize,
    /// Anything other than whitespace follows the value
    trailing: bool,
}

/// Parse the first JSON value and note whether anything follows it
fn parse_first_value(body: &[u8]) -> Result<FirstValue, DecodeError> {
    let mut stream = serde_json::Deserializer::from_slice(body).into_iter::<Value>();

    let value = match stream.next() {
        None => return Err(DecodeError::EmptyBody),
        Some(Ok(value)) => value,
        Some(Err(err)) => return Err(classify(&err, body)),
    };
    let end = stream.byte_offset();
    let token_end = match value {
        Value::Object(_) | Value::Array(_) => {
            let start = body
                .iter()
                .position(|byte| !byte.is_ascii_whitespace())
                .unwrap_or(0);
            start + 1
        }
        _ => end,
    };
    let trailing = stream.next().is_some();

    Ok(FirstValue {
        value,
        token_end,
        trailing,
    })
}

/// Check keys and value shapes against `T`'s table, dropping `null`s.
/// A runtime has no `null` form and always goes through its codec.
fn check_fields<T: FieldTable>(
    value: Value,
    token_end: usize,
) -> Result<Map<String, Value>, DecodeError> {
    let Value::Object(object) = value else {
        return Err(DecodeError::TypeMismatch(Location::Offset(token_end)));
    };

    let mut accepted = Map::new();
    for (name, field_value) in object {
        let Some(spec) = T::field(&name) else {
            return Err(DecodeError::UnknownField(name));
        };

        match spec.kind {
            FieldKind::Runtime => {
                Runtime::from_json_value(&field_value)
                    .map_err(|_| DecodeError::InvalidRuntimeFormat)?;
            }
            _ if field_value.is_null() => continue,
            kind if !kind.matches(&field_value) => {
                return Err(DecodeError::TypeMismatch(Location::Field(name)));
            }
            _ => {}
        }
        accepted.insert(name, field_value);
    }
    Ok(accepted)
}

/// Map a parse failure onto a decode kind
fn classify(err: &serde_json::Error, body: &[u8]) -> DecodeError {
    match err.classify() {
        Category::Eof => DecodeError::UnexpectedEof,
        Category::Syntax => DecodeError::SyntaxError {
            offset: byte_offset(body, err.line(), err.column()),
        },
        Category::Io | Category::Data => DecodeError::Unclassified(err.to_string()),
    }
}

/// Convert serde_json's 1-based line/column into a byte count from the start
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        body.iter()
            .enumerate()
            .filter(|(_, byte)| **byte == b'\n')
            .nth(line - 2)
            .map_or(body.len(), |(index, _)| index + 1)
    };

    (line_start + column).min(body.len())
}
