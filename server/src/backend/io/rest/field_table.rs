//! Declared JSON field tables for inbound request types.
//!
//! The ingress decoder checks every key of an inbound object against the
//! destination's table before handing the object to serde. Absent and `null`
//! fields are left for serde defaults; output naming and omission policy for
//! responses lives on the response types themselves.

use serde_json::Value;
use shared::{CreateMovieRequest, UpdateMovieRequest};

/// The JSON shape a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// A JSON integer that fits in `i32`
    Int32,
    /// An array whose elements are all strings
    StringList,
    /// A runtime string, checked by the runtime codec rather than by shape
    Runtime,
}

impl FieldKind {
    /// Whether `value` has this kind's JSON shape. `Runtime` accepts any
    /// shape here; the codec decides.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Int32 => value
                .as_i64()
                .is_some_and(|n| i32::try_from(n).is_ok()),
            FieldKind::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::Runtime => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// A type that can be decoded from a JSON object with a fixed set of keys
pub trait FieldTable {
    const FIELDS: &'static [FieldSpec];

    fn field(name: &str) -> Option<&'static FieldSpec> {
        Self::FIELDS.iter().find(|spec| spec.name == name)
    }
}

const MOVIE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", FieldKind::String),
    FieldSpec::new("year", FieldKind::Int32),
    FieldSpec::new("runtime", FieldKind::Runtime),
    FieldSpec::new("genres", FieldKind::StringList),
];

impl FieldTable for CreateMovieRequest {
    const FIELDS: &'static [FieldSpec] = MOVIE_FIELDS;
}

impl FieldTable for UpdateMovieRequest {
    const FIELDS: &'static [FieldSpec] = MOVIE_FIELDS;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int32_bounds() {
        assert!(FieldKind::Int32.matches(&json!(2020)));
        assert!(FieldKind::Int32.matches(&json!(-5)));
        assert!(!FieldKind::Int32.matches(&json!(2_147_483_648i64)));
        assert!(!FieldKind::Int32.matches(&json!(2020.5)));
        assert!(!FieldKind::Int32.matches(&json!("2020")));
    }

    #[test]
    fn test_string_list_requires_string_elements() {
        assert!(FieldKind::StringList.matches(&json!([])));
        assert!(FieldKind::StringList.matches(&json!(["drama", "comedy"])));
        assert!(!FieldKind::StringList.matches(&json!(["drama", 1])));
        assert!(!FieldKind::StringList.matches(&json!("drama")));
    }

    #[test]
    fn test_movie_request_table_lookup() {
        assert_eq!(
            CreateMovieRequest::field("runtime").map(|spec| spec.kind),
            Some(FieldKind::Runtime)
        );
        assert!(CreateMovieRequest::field("rating").is_none());
        assert_eq!(UpdateMovieRequest::FIELDS.len(), 4);
    }
}
