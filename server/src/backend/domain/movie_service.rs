//! Movie service: validates decoded requests and drives the repository.

use std::sync::Arc;

use shared::{CreateMovieRequest, Movie, UpdateMovieRequest};
use tracing::info;

use super::movie_rules::{validate_movie, Clock, MovieDraft};
use super::validator::{ValidationErrors, Validator};
use crate::backend::storage::{MovieRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum MovieServiceError {
    #[error("movie failed validation")]
    Validation(ValidationErrors),
    #[error("movie not found")]
    NotFound,
    #[error("movie was modified concurrently")]
    EditConflict,
    #[error(transparent)]
    Storage(RepositoryError),
}

impl From<RepositoryError> for MovieServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::EditConflict => Self::EditConflict,
            other => Self::Storage(other),
        }
    }
}

#[derive(Clone)]
pub struct MovieService {
    repository: Arc<dyn MovieRepository>,
    clock: Arc<dyn Clock>,
}

impl MovieService {
    pub fn new(repository: Arc<dyn MovieRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn validate(&self, draft: &MovieDraft) -> Result<(), MovieServiceError> {
        let mut v = Validator::new();
        validate_movie(&mut v, draft, self.clock.as_ref());
        if v.valid() {
            Ok(())
        } else {
            Err(MovieServiceError::Validation(v.into_errors()))
        }
    }

    /// Validate and store a new movie
    pub async fn create_movie(&self, request: CreateMovieRequest) -> Result<Movie, MovieServiceError> {
        let draft = MovieDraft {
            title: request.title,
            year: request.year,
            runtime: request.runtime,
            genres: request.genres,
        };
        self.validate(&draft)?;

        let mut movie = Movie::new(
            draft.title,
            draft.year,
            draft.runtime,
            draft.genres.unwrap_or_default(),
        );
        self.repository.insert(&mut movie).await?;

        info!(id = movie.id, "created movie");
        Ok(movie)
    }

    pub async fn get_movie(&self, id: i64) -> Result<Movie, MovieServiceError> {
        Ok(self.repository.get(id).await?)
    }

    /// Overwrite the provided fields of an existing movie, re-validate, persist
    pub async fn update_movie(
        &self,
        id: i64,
        request: UpdateMovieRequest,
    ) -> Result<Movie, MovieServiceError> {
        let mut movie = self.repository.get(id).await?;

        if let Some(title) = request.title {
            movie.title = title;
        }
        if let Some(year) = request.year {
            movie.year = year;
        }
        if let Some(runtime) = request.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = request.genres {
            movie.genres = genres;
        }

        self.validate(&MovieDraft::from(&movie))?;
        self.repository.update(&mut movie).await?;

        info!(id = movie.id, version = movie.version, "updated movie");
        Ok(movie)
    }

    pub async fn delete_movie(&self, id: i64) -> Result<(), MovieServiceError> {
        self.repository.delete(id).await?;
        info!(id, "deleted movie");
        Ok(())
    }
}
