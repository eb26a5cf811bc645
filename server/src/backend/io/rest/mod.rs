//! # REST API Interface Layer
//!
//! HTTP endpoints for the movies API. This layer handles:
//! - Bounded, strict JSON request decoding with client-facing error messages
//! - Envelope-shaped JSON responses
//! - Translation of domain and decode failures into HTTP status codes
//!
//! Handlers never talk to storage directly; they go through the movie
//! service and render whatever it returns.

pub mod errors;
pub mod field_table;
pub mod health_apis;
pub mod json_egress;
pub mod json_ingress;
pub mod movie_apis;
pub mod params;

pub use errors::{handle_panic, method_not_allowed, not_found, ApiError};
pub use health_apis::healthcheck;
pub use json_egress::{write_json, EncodeError, Envelope};
pub use json_ingress::{DecodeError, DecodeFault, IngressError, JsonIngress, DEFAULT_MAX_BODY_BYTES};
pub use movie_apis::{create_movie, delete_movie, show_movie, update_movie};
