//! Team operations for the SQLite database.
//!
//! `created_at` and `updated_at` are stamped here on insert and update.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{SqlResult, classify, decode_choice};
use crate::{Choice, Conference, DataStoreError, Division, NewTeam, Team};

const SELECT_TEAM: &str = r#"
    SELECT id, name, city, conference, division, created_at, updated_at
    FROM teams
"#;

fn team_from_row(row: &SqliteRow) -> SqlResult<Team> {
    let conference: String = row.try_get("conference")?;
    let division: String = row.try_get("division")?;
    Ok(Team {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        conference: decode_choice("conference", &conference)?,
        division: decode_choice("division", &division)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Creates a new team and returns it as stored.
///
/// # Arguments
/// * `pool` - SQLite connection pool
/// * `team` - The validated team to insert
///
/// # Returns
/// * `Ok(Team)` - Team created, with its assigned id and timestamps
/// * `Err(DataStoreError::AlreadyExists)` - A team with this name and city exists
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn create(pool: &SqlitePool, team: &NewTeam) -> SqlResult<Team> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO teams (name, city, conference, division, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&team.name)
    .bind(&team.city)
    .bind(team.conference.as_str())
    .bind(team.division.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| classify("creating team", e))?;

    get(pool, result.last_insert_rowid())
        .await?
        .ok_or(DataStoreError::NotFound)
}

/// Retrieves a team by id.
///
/// # Returns
/// * `Ok(Some(Team))` - Team found
/// * `Ok(None)` - No team with this id
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn get(pool: &SqlitePool, id: i64) -> SqlResult<Option<Team>> {
    let result = sqlx::query(&format!("{} WHERE id = ?", SELECT_TEAM))
        .bind(id)
        .fetch_optional(pool)
        .await;

    match result {
        Ok(Some(row)) => Ok(Some(team_from_row(&row)?)),
        Ok(None) => Ok(None),
        Err(e) => Err(classify("getting team", e)),
    }
}

/// Lists teams ordered by id, optionally restricted to a conference and/or division.
pub async fn list(
    pool: &SqlitePool,
    conference: Option<Conference>,
    division: Option<Division>,
) -> SqlResult<Vec<Team>> {
    let rows = sqlx::query(&format!(
        "{} WHERE (?1 IS NULL OR conference = ?1) AND (?2 IS NULL OR division = ?2) ORDER BY id",
        SELECT_TEAM
    ))
    .bind(conference.map(|c| c.as_str()))
    .bind(division.map(|d| d.as_str()))
    .fetch_all(pool)
    .await
    .map_err(|e| classify("listing teams", e))?;

    rows.iter().map(team_from_row).collect()
}

/// Checks whether a team exists.
pub async fn exists(pool: &SqlitePool, id: i64) -> SqlResult<bool> {
    let (found,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM teams WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| classify("probing team", e))?;
    Ok(found)
}

/// Overwrites a team's fields with `team` and returns the refreshed row.
///
/// # Returns
/// * `Ok(Some(Team))` - Team updated
/// * `Ok(None)` - No team with `team.id`
/// * `Err(DataStoreError::AlreadyExists)` - The new name and city collide with another team
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn update(pool: &SqlitePool, team: &Team) -> SqlResult<Option<Team>> {
    let result = sqlx::query(
        r#"
        UPDATE teams
        SET name = ?, city = ?, conference = ?, division = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&team.name)
    .bind(&team.city)
    .bind(team.conference.as_str())
    .bind(team.division.as_str())
    .bind(Utc::now())
    .bind(team.id)
    .execute(pool)
    .await
    .map_err(|e| classify("updating team", e))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get(pool, team.id).await
}

/// Deletes a team.
///
/// # Returns
/// * `Ok(true)` - Team existed and was deleted
/// * `Ok(false)` - No team with this id
/// * `Err(DataStoreError::ForeignKeyViolation)` - Players or games still reference the team
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn delete(pool: &SqlitePool, id: i64) -> SqlResult<bool> {
    let result = sqlx::query("DELETE FROM teams WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| classify("deleting team", e))?;
    Ok(result.rows_affected() > 0)
}
