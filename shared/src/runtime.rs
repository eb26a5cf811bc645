//! Wire codec for movie runtimes.
//!
//! A runtime travels as the quoted string `"<minutes> mins"` in both
//! directions, never as a bare number.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The only unit literal accepted on the wire
const UNIT: &str = "mins";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("invalid runtime format")]
    InvalidRuntimeFormat,
}

/// Movie runtime in whole minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(pub i32);

impl Runtime {
    pub fn minutes(self) -> i32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Decode a runtime from an already-parsed JSON value.
    ///
    /// Only a JSON string is accepted; numbers, arrays and the rest fail
    /// with [`RuntimeError::InvalidRuntimeFormat`].
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, RuntimeError> {
        match value {
            serde_json::Value::String(text) => text.parse(),
            _ => Err(RuntimeError::InvalidRuntimeFormat),
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, UNIT)
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Self(minutes)
    }
}

/// Parses the unquoted form, e.g. `104 mins`.
impl FromStr for Runtime {
    type Err = RuntimeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = text.split(' ').collect();
        match parts.as_slice() {
            [number, unit] if *unit == UNIT => number
                .parse::<i32>()
                .map(Runtime)
                .map_err(|_| RuntimeError::InvalidRuntimeFormat),
            _ => Err(RuntimeError::InvalidRuntimeFormat),
        }
    }
}

impl Serialize for Runtime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

struct RuntimeVisitor;

impl RuntimeVisitor {
    fn reject<E: de::Error>(&self) -> Result<Runtime, E> {
        Err(E::custom(RuntimeError::InvalidRuntimeFormat))
    }
}

impl<'de> Visitor<'de> for RuntimeVisitor {
    type Value = Runtime;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string of the form \"<minutes> mins\"")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        self.reject()
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        self.reject()
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        self.reject()
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        self.reject()
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        self.reject()
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RuntimeVisitor)
    }
}
