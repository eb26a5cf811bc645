//! # Domain Module
//!
//! Business rules for movie records.
//!
//! - **validator** - Per-request field error accumulator
//! - **movie_rules** - The rule set applied on create and update, and the
//!   injectable clock it reads the current year from
//! - **movie_service** - Validation followed by repository calls
//!
//! Nothing here knows about HTTP; the IO layer translates errors into
//! responses.

pub mod movie_rules;
pub mod movie_service;
pub mod validator;

pub use movie_rules::{Clock, FixedClock, MovieDraft, SystemClock};
pub use movie_service::{MovieService, MovieServiceError};
pub use validator::{ValidationErrors, Validator};
