//! Player statistics operations for the SQLite database.
//!
//! Counter columns are bound in [`StatLine::COLUMNS`] order, so the statements below are
//! generated from that list once.

use std::sync::LazyLock;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use super::{SqlResult, classify};
use crate::{DataStoreError, NewPlayerStats, PlayerStats, StatLine};

static SELECT_STATS: LazyLock<String> = LazyLock::new(|| {
    format!(
        "SELECT id, player_id, game_id, {}, created_at, updated_at FROM player_stats",
        StatLine::COLUMNS.join(", ")
    )
});

static INSERT_STATS: LazyLock<String> = LazyLock::new(|| {
    let placeholders = vec!["?"; StatLine::COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO player_stats (player_id, game_id, {}, created_at, updated_at) \
         VALUES (?, ?, {}, ?, ?)",
        StatLine::COLUMNS.join(", "),
        placeholders
    )
});

static UPDATE_STATS: LazyLock<String> = LazyLock::new(|| {
    let assignments = StatLine::COLUMNS
        .iter()
        .map(|column| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE player_stats SET {}, updated_at = ? WHERE id = ?",
        assignments
    )
});

fn player_stats_from_row(row: &SqliteRow) -> SqlResult<PlayerStats> {
    Ok(PlayerStats {
        id: row.try_get("id")?,
        player_id: row.try_get("player_id")?,
        game_id: row.try_get("game_id")?,
        stats: StatLine::from_row(row)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Records a stat line and returns it as stored.
///
/// # Arguments
/// * `pool` - SQLite connection pool
/// * `stats` - The validated stat line; absent counters are stored as NULL
///
/// # Returns
/// * `Ok(PlayerStats)` - Stat line created
/// * `Err(DataStoreError::AlreadyExists)` - The player already has a line for this game
/// * `Err(DataStoreError::ForeignKeyViolation)` - The player or game does not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn create(pool: &SqlitePool, stats: &NewPlayerStats) -> SqlResult<PlayerStats> {
    let now = Utc::now();
    let mut query = sqlx::query(INSERT_STATS.as_str())
        .bind(stats.player_id)
        .bind(stats.game_id);
    for (_, value) in stats.stats.counters() {
        query = query.bind(value);
    }
    let result = query
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| classify("creating player stats", e))?;

    get(pool, result.last_insert_rowid())
        .await?
        .ok_or(DataStoreError::NotFound)
}

/// Retrieves a stat line by id.
pub async fn get(pool: &SqlitePool, id: i64) -> SqlResult<Option<PlayerStats>> {
    let result = sqlx::query(&format!("{} WHERE id = ?", *SELECT_STATS))
        .bind(id)
        .fetch_optional(pool)
        .await;

    match result {
        Ok(Some(row)) => Ok(Some(player_stats_from_row(&row)?)),
        Ok(None) => Ok(None),
        Err(e) => Err(classify("getting player stats", e)),
    }
}

/// Lists every stat line ordered by id.
pub async fn list(pool: &SqlitePool) -> SqlResult<Vec<PlayerStats>> {
    let rows = sqlx::query(&format!("{} ORDER BY id", *SELECT_STATS))
        .fetch_all(pool)
        .await
        .map_err(|e| classify("listing player stats", e))?;
    rows.iter().map(player_stats_from_row).collect()
}

/// Lists one player's stat lines ordered by id.
pub async fn list_by_player(pool: &SqlitePool, player_id: i64) -> SqlResult<Vec<PlayerStats>> {
    let rows = sqlx::query(&format!(
        "{} WHERE player_id = ? ORDER BY id",
        *SELECT_STATS
    ))
    .bind(player_id)
    .fetch_all(pool)
    .await
    .map_err(|e| classify("listing player stats by player", e))?;
    rows.iter().map(player_stats_from_row).collect()
}

/// Lists one game's stat lines ordered by id.
pub async fn list_by_game(pool: &SqlitePool, game_id: i64) -> SqlResult<Vec<PlayerStats>> {
    let rows = sqlx::query(&format!("{} WHERE game_id = ? ORDER BY id", *SELECT_STATS))
        .bind(game_id)
        .fetch_all(pool)
        .await
        .map_err(|e| classify("listing player stats by game", e))?;
    rows.iter().map(player_stats_from_row).collect()
}

/// Checks whether a stat line exists.
pub async fn exists(pool: &SqlitePool, id: i64) -> SqlResult<bool> {
    let (found,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM player_stats WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(|e| classify("probing player stats", e))?;
    Ok(found)
}

/// Checks whether `player_id` already has a stat line for `game_id`.
pub async fn exists_for_player_and_game(
    pool: &SqlitePool,
    player_id: i64,
    game_id: i64,
) -> SqlResult<bool> {
    let (found,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM player_stats WHERE player_id = ? AND game_id = ?)",
    )
    .bind(player_id)
    .bind(game_id)
    .fetch_one(pool)
    .await
    .map_err(|e| classify("probing player stats by player and game", e))?;
    Ok(found)
}

/// Overwrites every counter of a stat line with `stats` and returns the refreshed row.
///
/// The player and game of a stat line never change.
///
/// # Returns
/// * `Ok(Some(PlayerStats))` - Stat line updated
/// * `Ok(None)` - No stat line with `stats.id`
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn update(pool: &SqlitePool, stats: &PlayerStats) -> SqlResult<Option<PlayerStats>> {
    let mut query = sqlx::query(UPDATE_STATS.as_str());
    for (_, value) in stats.stats.counters() {
        query = query.bind(value);
    }
    let result = query
        .bind(Utc::now())
        .bind(stats.id)
        .execute(pool)
        .await
        .map_err(|e| classify("updating player stats", e))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get(pool, stats.id).await
}

/// Deletes a stat line. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: i64) -> SqlResult<bool> {
    let result = sqlx::query("DELETE FROM player_stats WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| classify("deleting player stats", e))?;
    Ok(result.rows_affected() > 0)
}
