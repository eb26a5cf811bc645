//! Route parameter parsing.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid id parameter")]
pub struct InvalidIdentifier;

/// Parse a resource ID from a path segment. IDs are base-10 and at least 1;
/// callers cannot tell "not a number" from "not positive".
pub fn parse_id(raw: &str) -> Result<i64, InvalidIdentifier> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(InvalidIdentifier),
    }
}
