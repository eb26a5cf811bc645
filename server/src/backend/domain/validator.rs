//! # Validator
//!
//! Per-request accumulator for field errors. Checks never short-circuit;
//! the first message recorded for a field wins and later failures on the
//! same field are ignored.

use std::collections::HashSet;
use std::hash::Hash;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Field name to message, kept in the order the fields first failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, String)>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, message)| (name.as_str(), message.as_str()))
    }

    fn insert_if_absent(&mut self, field: &str, message: &str) {
        if !self.contains(field) {
            self.entries.push((field.to_string(), message.to_string()));
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field has failed
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` for `field` unless the field already has one
    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.insert_if_absent(field, message);
    }

    /// Record `message` for `field` when `ok` is false
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

/// True when every element of `values` is distinct
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let set: HashSet<&T> = values.iter().collect();
    set.len() == values.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validator_is_valid() {
        let v = Validator::new();
        assert!(v.valid());
        assert!(v.errors().is_empty());
    }

    #[test]
    fn test_check_records_failures_only() {
        let mut v = Validator::new();
        v.check(true, "title", "must be provided");
        assert!(v.valid());

        v.check(false, "title", "must be provided");
        assert!(!v.valid());
        assert_eq!(v.errors().get("title"), Some("must be provided"));
    }

    #[test]
    fn test_first_message_per_field_wins() {
        let mut v = Validator::new();
        v.check(false, "year", "must be provided");
        v.check(false, "year", "must be greater than 1888");

        assert_eq!(v.errors().len(), 1);
        assert_eq!(v.errors().get("year"), Some("must be provided"));
    }

    #[test]
    fn test_errors_keep_insertion_order() {
        let mut v = Validator::new();
        v.add_error("title", "a");
        v.add_error("genres", "b");
        v.add_error("year", "c");

        let fields: Vec<&str> = v.errors().iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["title", "genres", "year"]);

        let json = serde_json::to_string(v.errors()).unwrap();
        assert_eq!(json, r#"{"title":"a","genres":"b","year":"c"}"#);
    }

    #[test]
    fn test_validators_are_independent() {
        let mut first = Validator::new();
        let second = Validator::new();
        first.add_error("title", "must be provided");

        assert!(!first.valid());
        assert!(second.valid());
    }

    #[test]
    fn test_unique_is_case_sensitive() {
        assert!(unique(&["drama", "Drama"]));
        assert!(!unique(&["drama", "comedy", "drama"]));
        assert!(unique::<&str>(&[]));
    }
}
