//! # Movie Rules
//!
//! The validation rule set shared by movie creation and update, plus the
//! clock the year rule reads "now" from.

use shared::{Movie, Runtime};
use time::OffsetDateTime;

use super::validator::{unique, Validator};

/// Earliest accepted release year
pub const FIRST_FILM_YEAR: i32 = 1888;
pub const MAX_TITLE_BYTES: usize = 500;
pub const MAX_GENRES: usize = 5;

/// Source of the current calendar year (UTC)
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        OffsetDateTime::now_utc().year()
    }
}

/// Clock pinned to a single year
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}

/// The fields the rules look at.
///
/// `genres` is optional here because an inbound request can omit it, while a
/// stored [`Movie`] always carries a list.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDraft {
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Option<Vec<String>>,
}

impl From<&Movie> for MovieDraft {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            year: movie.year,
            runtime: movie.runtime,
            genres: Some(movie.genres.clone()),
        }
    }
}

pub fn validate_movie(v: &mut Validator, draft: &MovieDraft, clock: &dyn Clock) {
    let current_year = clock.current_year();

    v.check(!draft.title.is_empty(), "title", "must be provided");
    v.check(
        draft.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(draft.year != 0, "year", "must be provided");
    v.check(draft.year >= FIRST_FILM_YEAR, "year", "must be greater than 1888");
    v.check(draft.year <= current_year, "year", "must not be in the future");

    v.check(!draft.runtime.is_zero(), "runtime", "must be provided");
    v.check(draft.runtime.minutes() > 0, "runtime", "must be a positive integer");

    match &draft.genres {
        None => v.add_error("genres", "must be provided"),
        Some(genres) => {
            v.check(!genres.is_empty(), "genres", "must contain at least 1 genre");
            v.check(
                genres.len() <= MAX_GENRES,
                "genres",
                "must not contain more than 5 genres",
            );
            v.check(unique(genres.as_slice()), "genres", "must not contain duplicate values");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: FixedClock = FixedClock(2026);

    fn valid_draft() -> MovieDraft {
        MovieDraft {
            title: "Moana".to_string(),
            year: 2016,
            runtime: Runtime(107),
            genres: Some(vec!["animation".to_string(), "adventure".to_string()]),
        }
    }

    fn run(draft: &MovieDraft) -> Validator {
        let mut v = Validator::new();
        validate_movie(&mut v, draft, &NOW);
        v
    }

    #[test]
    fn test_valid_movie_passes() {
        assert!(run(&valid_draft()).valid());
    }

    #[test]
    fn test_duplicate_genres_only_flag_genres() {
        let draft = MovieDraft {
            title: "A".to_string(),
            year: 2020,
            runtime: Runtime(100),
            genres: Some(vec!["x".to_string(), "x".to_string()]),
        };

        let v = run(&draft);
        assert_eq!(v.errors().len(), 1);
        assert_eq!(
            v.errors().get("genres"),
            Some("must not contain duplicate values")
        );
    }

    #[test]
    fn test_empty_and_missing_genres() {
        let mut draft = valid_draft();
        draft.genres = Some(Vec::new());
        assert_eq!(
            run(&draft).errors().get("genres"),
            Some("must contain at least 1 genre")
        );

        draft.genres = None;
        assert_eq!(run(&draft).errors().get("genres"), Some("must be provided"));
    }

    #[test]
    fn test_too_many_genres() {
        let mut draft = valid_draft();
        draft.genres = Some((0..6).map(|i| format!("genre-{i}")).collect());
        assert_eq!(
            run(&draft).errors().get("genres"),
            Some("must not contain more than 5 genres")
        );
    }

    #[test]
    fn test_title_rules_count_bytes() {
        let mut draft = valid_draft();
        draft.title = String::new();
        assert_eq!(run(&draft).errors().get("title"), Some("must be provided"));

        // 250 two-byte characters: 500 bytes, still fine
        draft.title = "é".repeat(250);
        assert!(run(&draft).valid());

        draft.title = "é".repeat(251);
        assert_eq!(
            run(&draft).errors().get("title"),
            Some("must not be more than 500 bytes long")
        );
    }

    #[test]
    fn test_year_rules() {
        let mut draft = valid_draft();
        draft.year = 0;
        assert_eq!(run(&draft).errors().get("year"), Some("must be provided"));

        draft.year = 1887;
        assert_eq!(
            run(&draft).errors().get("year"),
            Some("must be greater than 1888")
        );

        draft.year = 1888;
        assert!(run(&draft).valid());

        draft.year = 2026;
        assert!(run(&draft).valid());

        draft.year = 2027;
        assert_eq!(
            run(&draft).errors().get("year"),
            Some("must not be in the future")
        );
    }

    #[test]
    fn test_year_rule_follows_the_clock() {
        let mut draft = valid_draft();
        draft.year = 2030;

        let mut v = Validator::new();
        validate_movie(&mut v, &draft, &FixedClock(2030));
        assert!(v.valid());
    }

    #[test]
    fn test_runtime_rules() {
        let mut draft = valid_draft();
        draft.runtime = Runtime(0);
        assert_eq!(run(&draft).errors().get("runtime"), Some("must be provided"));

        draft.runtime = Runtime(-10);
        assert_eq!(
            run(&draft).errors().get("runtime"),
            Some("must be a positive integer")
        );
    }

    #[test]
    fn test_all_fields_reported_together() {
        let draft = MovieDraft {
            title: String::new(),
            year: 0,
            runtime: Runtime(0),
            genres: None,
        };

        let v = run(&draft);
        let fields: Vec<&str> = v.errors().iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["title", "year", "runtime", "genres"]);
    }

    #[test]
    fn test_stored_movie_converts_to_draft() {
        let movie = Movie::new(
            "Moana".to_string(),
            2016,
            Runtime(107),
            vec!["animation".to_string()],
        );
        let draft = MovieDraft::from(&movie);
        assert_eq!(draft.genres, Some(vec!["animation".to_string()]));
        assert!(run(&draft).valid());
    }
}
