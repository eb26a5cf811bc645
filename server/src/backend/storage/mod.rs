//! # Storage Module
//!
//! Persistence for movie records. The domain layer only sees the
//! [`MovieRepository`] trait; the SQLite implementation lives behind it.
//!
//! ## Components
//!
//! - **connection.rs** - SQLite pool setup and schema
//! - **traits.rs** - The repository contract and its error type
//! - **movie_repository.rs** - SQLx implementation of the contract

pub mod connection;
pub mod movie_repository;
pub mod traits;

pub use connection::{DbConnection, PoolSettings};
pub use movie_repository::SqliteMovieRepository;
pub use traits::{MovieRepository, RepositoryError};
