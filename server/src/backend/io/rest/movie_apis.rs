//! # REST API for Movies
//!
//! Endpoints for creating, retrieving, updating and deleting movies. Each
//! handler parses the route ID and body, hands off to the movie service, and
//! renders the result in an envelope.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use shared::{CreateMovieRequest, UpdateMovieRequest};
use tracing::info;

use super::errors::ApiError;
use super::json_egress::{write_json, Envelope};
use super::params::parse_id;
use crate::backend::AppState;

/// Create a new movie
pub async fn create_movie(
    State(state): State<AppState>,
    body: Body,
) -> Result<Response, ApiError> {
    info!("POST /v1/movies");

    let request: CreateMovieRequest = state.ingress.read_body(body).await?;
    let movie = state.movie_service.create_movie(request).await?;

    let location = HeaderValue::try_from(format!("/v1/movies/{}", movie.id))
        .map_err(|e| ApiError::Server(e.into()))?;
    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location);

    Ok(write_json(
        StatusCode::CREATED,
        Envelope::new().with("movie", &movie),
        headers,
    )?)
}

/// Get a movie by ID
pub async fn show_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    info!("GET /v1/movies/{}", id);

    let id = parse_id(&id)?;
    let movie = state.movie_service.get_movie(id).await?;

    Ok(write_json(
        StatusCode::OK,
        Envelope::new().with("movie", &movie),
        HeaderMap::new(),
    )?)
}

/// Overwrite the provided fields of a movie (PUT and PATCH)
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body,
) -> Result<Response, ApiError> {
    info!("update /v1/movies/{}", id);

    let id = parse_id(&id)?;
    let request: UpdateMovieRequest = state.ingress.read_body(body).await?;
    let movie = state.movie_service.update_movie(id, request).await?;

    Ok(write_json(
        StatusCode::OK,
        Envelope::new().with("movie", &movie),
        HeaderMap::new(),
    )?)
}

/// Delete a movie by ID
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    info!("DELETE /v1/movies/{}", id);

    let id = parse_id(&id)?;
    state.movie_service.delete_movie(id).await?;

    Ok(write_json(
        StatusCode::OK,
        Envelope::new().with("message", "movie successfully deleted"),
        HeaderMap::new(),
    )?)
}
