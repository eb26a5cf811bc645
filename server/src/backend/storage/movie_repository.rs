use async_trait::async_trait;
use shared::{Movie, Runtime};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use time::OffsetDateTime;

use super::connection::DbConnection;
use super::traits::{MovieRepository, RepositoryError};

/// SQLite-backed movie repository
#[derive(Clone)]
pub struct SqliteMovieRepository {
    db: DbConnection,
}

impl SqliteMovieRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn movie_from_row(row: &SqliteRow) -> Result<Movie, RepositoryError> {
        let genres: String = row.try_get("genres")?;
        Ok(Movie {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            title: row.try_get("title")?,
            year: row.try_get("year")?,
            runtime: Runtime(row.try_get("runtime")?),
            genres: serde_json::from_str(&genres)?,
            version: row.try_get("version")?,
        })
    }
}

#[async_trait]
impl MovieRepository for SqliteMovieRepository {
    async fn insert(&self, movie: &mut Movie) -> Result<(), RepositoryError> {
        let created_at = OffsetDateTime::now_utc();
        let genres = serde_json::to_string(&movie.genres)?;

        let row = sqlx::query(
            r#"
            INSERT INTO movies (created_at, title, year, runtime, genres)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, version
            "#,
        )
        .bind(created_at)
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime.minutes())
        .bind(genres)
        .fetch_one(self.db.pool())
        .await?;

        movie.id = row.try_get("id")?;
        movie.version = row.try_get("version")?;
        movie.created_at = created_at;
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Movie, RepositoryError> {
        if id < 1 {
            return Err(RepositoryError::NotFound);
        }

        let row = sqlx::query(
            r#"
            SELECT id, created_at, title, year, runtime, genres, version
            FROM movies
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Self::movie_from_row(&r),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn update(&self, movie: &mut Movie) -> Result<(), RepositoryError> {
        let genres = serde_json::to_string(&movie.genres)?;

        let row = sqlx::query(
            r#"
            UPDATE movies
            SET title = ?, year = ?, runtime = ?, genres = ?, version = version + 1
            WHERE id = ? AND version = ?
            RETURNING version
            "#,
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime.minutes())
        .bind(genres)
        .bind(movie.id)
        .bind(movie.version)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => {
                movie.version = r.try_get("version")?;
                Ok(())
            }
            None => Err(RepositoryError::EditConflict),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        if id < 1 {
            return Err(RepositoryError::NotFound);
        }

        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
