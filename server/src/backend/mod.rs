//! # Backend Module
//!
//! Everything behind the HTTP listener for the movies API.
//!
//! The backend follows a layered architecture:
//! ```text
//! IO Layer (REST handlers, JSON ingress/egress)
//!     ↓
//! Domain Layer (validation rules, movie service)
//!     ↓
//! Storage Layer (SQLite pool, movie repository)
//! ```
//!
//! [`initialize_backend`] builds the services from a [`Config`] and
//! [`create_router`] wires them to routes.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::{Config, Environment};
use domain::{MovieService, SystemClock};
use io::rest::{self, JsonIngress};
use storage::{DbConnection, SqliteMovieRepository};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub movie_service: MovieService,
    pub ingress: JsonIngress,
    pub environment: Environment,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.pool_settings()).await?;

    info!("Setting up domain model");
    let repository = Arc::new(SqliteMovieRepository::new(db));
    let movie_service = MovieService::new(repository, Arc::new(SystemClock));

    Ok(AppState {
        movie_service,
        ingress: JsonIngress::new(config.max_body_bytes),
        environment: config.environment,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/healthz",
            get(rest::healthcheck).fallback(rest::method_not_allowed),
        )
        .route(
            "/movies",
            post(rest::create_movie).fallback(rest::method_not_allowed),
        )
        .route(
            "/movies/:id",
            get(rest::show_movie)
                .put(rest::update_movie)
                .patch(rest::update_movie)
                .delete(rest::delete_movie)
                .fallback(rest::method_not_allowed),
        );

    Router::new()
        .nest("/v1", api_routes)
        .fallback(rest::not_found)
        .layer(CatchPanicLayer::custom(rest::handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::header::CONNECTION;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use shared::Movie;
    use tower::ServiceExt;

    use crate::backend::domain::FixedClock;
    use crate::backend::storage::{MovieRepository, RepositoryError};

    /// Repository whose reads blow up inside the handler
    struct PanickingRepository;

    #[async_trait]
    impl MovieRepository for PanickingRepository {
        async fn insert(&self, _movie: &mut Movie) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn get(&self, id: i64) -> Result<Movie, RepositoryError> {
            panic!("storage exploded while reading movie {id}");
        }

        async fn update(&self, _movie: &mut Movie) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn delete(&self, _id: i64) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    fn panicking_app() -> Router {
        let movie_service = MovieService::new(
            Arc::new(PanickingRepository),
            Arc::new(FixedClock(2026)),
        );
        create_router(AppState {
            movie_service,
            ingress: JsonIngress::default(),
            environment: Environment::Development,
        })
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_closing_server_error() {
        let app = panicking_app();

        let request = Request::get("/v1/movies/1").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONNECTION], "close");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "server_error");
        assert!(!body.to_string().contains("exploded"));

        // The router keeps serving after a panic
        let request = Request::get("/v1/healthz").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
