//! Game operations for the SQLite database.
//!
//! Listings are ordered by kickoff, then id.

use chrono::Utc;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};

use super::{SqlResult, classify, decode_choice};
use crate::{Choice, DataStoreError, Game, NewGame};

const SELECT_GAME: &str = r#"
    SELECT id, home_team_id, away_team_id, season, week, game_date, status,
           home_score, away_score, created_at, updated_at
    FROM games
"#;

fn game_from_row(row: &SqliteRow) -> SqlResult<Game> {
    let status: String = row.try_get("status")?;
    Ok(Game {
        id: row.try_get("id")?,
        home_team_id: row.try_get("home_team_id")?,
        away_team_id: row.try_get("away_team_id")?,
        season: row.try_get("season")?,
        week: row.try_get("week")?,
        game_date: row.try_get("game_date")?,
        status: decode_choice("status", &status)?,
        home_score: row.try_get("home_score")?,
        away_score: row.try_get("away_score")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Creates a new game and returns it as stored.
///
/// # Arguments
/// * `pool` - SQLite connection pool
/// * `game` - The validated game to insert
///
/// # Returns
/// * `Ok(Game)` - Game created
/// * `Err(DataStoreError::AlreadyExists)` - Same teams, season, week and date already scheduled
/// * `Err(DataStoreError::ForeignKeyViolation)` - A team does not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn create(pool: &SqlitePool, game: &NewGame) -> SqlResult<Game> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO games
            (home_team_id, away_team_id, season, week, game_date, status,
             home_score, away_score, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(game.home_team_id)
    .bind(game.away_team_id)
    .bind(&game.season)
    .bind(game.week)
    .bind(game.game_date)
    .bind(game.status.as_str())
    .bind(game.home_score)
    .bind(game.away_score)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| classify("creating game", e))?;

    get(pool, result.last_insert_rowid())
        .await?
        .ok_or(DataStoreError::NotFound)
}

/// Retrieves a game by id.
pub async fn get(pool: &SqlitePool, id: i64) -> SqlResult<Option<Game>> {
    let result = sqlx::query(&format!("{} WHERE id = ?", SELECT_GAME))
        .bind(id)
        .fetch_optional(pool)
        .await;

    match result {
        Ok(Some(row)) => Ok(Some(game_from_row(&row)?)),
        Ok(None) => Ok(None),
        Err(e) => Err(classify("getting game", e)),
    }
}

async fn fetch_games<'q>(
    pool: &SqlitePool,
    context: &'static str,
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
) -> SqlResult<Vec<Game>> {
    let rows = query
        .fetch_all(pool)
        .await
        .map_err(|e| classify(context, e))?;
    rows.iter().map(game_from_row).collect()
}

/// Lists every game.
pub async fn list(pool: &SqlitePool) -> SqlResult<Vec<Game>> {
    let sql = format!("{} ORDER BY game_date, id", SELECT_GAME);
    fetch_games(pool, "listing games", sqlx::query(&sql)).await
}

/// Lists the games a team plays in, home or away.
pub async fn list_by_team(pool: &SqlitePool, team_id: i64) -> SqlResult<Vec<Game>> {
    let sql = format!(
        "{} WHERE home_team_id = ?1 OR away_team_id = ?1 ORDER BY game_date, id",
        SELECT_GAME
    );
    fetch_games(pool, "listing games by team", sqlx::query(&sql).bind(team_id)).await
}

/// Lists the games of a season.
pub async fn list_by_season(pool: &SqlitePool, season: &str) -> SqlResult<Vec<Game>> {
    let sql = format!("{} WHERE season = ? ORDER BY game_date, id", SELECT_GAME);
    fetch_games(pool, "listing games by season", sqlx::query(&sql).bind(season)).await
}

/// Lists the games of one week of a season.
pub async fn list_by_week(pool: &SqlitePool, season: &str, week: i64) -> SqlResult<Vec<Game>> {
    let sql = format!(
        "{} WHERE season = ? AND week = ? ORDER BY game_date, id",
        SELECT_GAME
    );
    fetch_games(
        pool,
        "listing games by week",
        sqlx::query(&sql).bind(season).bind(week),
    )
    .await
}

/// Checks whether a game exists.
pub async fn exists(pool: &SqlitePool, id: i64) -> SqlResult<bool> {
    let (found,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM games WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| classify("probing game", e))?;
    Ok(found)
}

/// Overwrites a game's fields with `game` and returns the refreshed row.
///
/// # Returns
/// * `Ok(Some(Game))` - Game updated
/// * `Ok(None)` - No game with `game.id`
/// * `Err(DataStoreError::AlreadyExists)` - The new schedule collides with another game
/// * `Err(DataStoreError::ForeignKeyViolation)` - A team does not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn update(pool: &SqlitePool, game: &Game) -> SqlResult<Option<Game>> {
    let result = sqlx::query(
        r#"
        UPDATE games
        SET home_team_id = ?, away_team_id = ?, season = ?, week = ?, game_date = ?,
            status = ?, home_score = ?, away_score = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(game.home_team_id)
    .bind(game.away_team_id)
    .bind(&game.season)
    .bind(game.week)
    .bind(game.game_date)
    .bind(game.status.as_str())
    .bind(game.home_score)
    .bind(game.away_score)
    .bind(Utc::now())
    .bind(game.id)
    .execute(pool)
    .await
    .map_err(|e| classify("updating game", e))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get(pool, game.id).await
}

/// Deletes a game. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: i64) -> SqlResult<bool> {
    let result = sqlx::query("DELETE FROM games WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| classify("deleting game", e))?;
    Ok(result.rows_affected() > 0)
}
