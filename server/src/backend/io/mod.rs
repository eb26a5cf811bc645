//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain. Requests are decoded
//! and checked here before reaching the movie service, and domain results
//! and errors are rendered back as JSON.

pub mod rest;

pub use rest::*;
