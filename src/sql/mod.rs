//! SQLite repository functions for gridiron.
//!
//! Each submodule owns one table and exposes free functions that take the pool
//! explicitly. Reads return `Option`/`Vec`; writes return the refreshed entity, or a
//! `bool` saying whether a row matched.

use crate::DataStoreError;

/// Team operations.
pub mod team;

/// Player operations.
pub mod player;

/// Game operations.
pub mod game;

/// Player statistics operations.
pub mod player_stats;

/// Result type for database operations.
pub type SqlResult<T> = Result<T, DataStoreError>;

/// Classifies a sqlx error and logs it when it is not a constraint violation.
fn classify(context: &'static str, e: sqlx::Error) -> DataStoreError {
    let err = DataStoreError::from(e);
    match &err {
        DataStoreError::Internal(msg) => tracing::error!(context, error = %msg, "database error"),
        other => tracing::debug!(context, error = %other, "constraint rejected statement"),
    }
    err
}

/// Decodes a stored enum spelling, treating an unknown value as corruption.
fn decode_choice<T: crate::Choice>(column: &'static str, value: &str) -> SqlResult<T> {
    T::parse(value).ok_or_else(|| {
        DataStoreError::Internal(format!("unexpected {} in store: {}", column, value))
    })
}

#[cfg(test)]
/// Test utilities for SQLite database operations.
pub mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use sqlx::SqlitePool;

    use crate::{
        Conference, Database, Division, GameStatus, NewGame, NewPlayer, NewTeam, Team,
    };

    /// Creates an isolated, migrated in-memory database for one test.
    pub async fn setup_test_db() -> SqlitePool {
        Database::new_in_memory()
            .await
            .expect("failed to create test database")
            .pool()
            .clone()
    }

    /// A fixed kickoff time.
    pub fn kickoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 8, 17, 0, 0).unwrap()
    }

    /// A valid team named `name`.
    pub fn new_team(name: &str) -> NewTeam {
        NewTeam {
            name: name.to_string(),
            city: format!("{} City", name),
            conference: Conference::Afc,
            division: Division::West,
        }
    }

    /// Inserts a team named `name`.
    pub async fn insert_team(pool: &SqlitePool, name: &str) -> Team {
        super::team::create(pool, &new_team(name))
            .await
            .expect("failed to insert team")
    }

    /// A valid player on `team_id`.
    pub fn new_player(team_id: i64, jersey_number: Option<i64>) -> NewPlayer {
        NewPlayer {
            team_id,
            first_name: "Test".to_string(),
            last_name: "Player".to_string(),
            position: "QB".to_string(),
            jersey_number,
            height: Some(75),
            weight: Some(220),
        }
    }

    /// A valid week-one game between two teams.
    pub fn new_game(home_team_id: i64, away_team_id: i64) -> NewGame {
        NewGame {
            home_team_id,
            away_team_id,
            season: "2024".to_string(),
            week: 1,
            game_date: kickoff(),
            status: GameStatus::Scheduled,
            home_score: None,
            away_score: None,
        }
    }
}
