//! Player operations for the SQLite database.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{SqlResult, classify};
use crate::{DataStoreError, NewPlayer, Player};

const SELECT_PLAYER: &str = r#"
    SELECT id, team_id, first_name, last_name, position, jersey_number, height, weight,
           created_at, updated_at
    FROM players
"#;

fn player_from_row(row: &SqliteRow) -> SqlResult<Player> {
    Ok(Player {
        id: row.try_get("id")?,
        team_id: row.try_get("team_id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        position: row.try_get("position")?,
        jersey_number: row.try_get("jersey_number")?,
        height: row.try_get("height")?,
        weight: row.try_get("weight")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Creates a new player and returns it as stored.
///
/// # Arguments
/// * `pool` - SQLite connection pool
/// * `player` - The validated player to insert
///
/// # Returns
/// * `Ok(Player)` - Player created
/// * `Err(DataStoreError::ForeignKeyViolation)` - The team does not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn create(pool: &SqlitePool, player: &NewPlayer) -> SqlResult<Player> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO players
            (team_id, first_name, last_name, position, jersey_number, height, weight,
             created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(player.team_id)
    .bind(&player.first_name)
    .bind(&player.last_name)
    .bind(&player.position)
    .bind(player.jersey_number)
    .bind(player.height)
    .bind(player.weight)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| classify("creating player", e))?;

    get(pool, result.last_insert_rowid())
        .await?
        .ok_or(DataStoreError::NotFound)
}

/// Retrieves a player by id.
pub async fn get(pool: &SqlitePool, id: i64) -> SqlResult<Option<Player>> {
    let result = sqlx::query(&format!("{} WHERE id = ?", SELECT_PLAYER))
        .bind(id)
        .fetch_optional(pool)
        .await;

    match result {
        Ok(Some(row)) => Ok(Some(player_from_row(&row)?)),
        Ok(None) => Ok(None),
        Err(e) => Err(classify("getting player", e)),
    }
}

/// Lists every player ordered by id.
pub async fn list(pool: &SqlitePool) -> SqlResult<Vec<Player>> {
    let rows = sqlx::query(&format!("{} ORDER BY id", SELECT_PLAYER))
        .fetch_all(pool)
        .await
        .map_err(|e| classify("listing players", e))?;
    rows.iter().map(player_from_row).collect()
}

/// Lists a team's roster ordered by id.
pub async fn list_by_team(pool: &SqlitePool, team_id: i64) -> SqlResult<Vec<Player>> {
    let rows = sqlx::query(&format!("{} WHERE team_id = ? ORDER BY id", SELECT_PLAYER))
        .bind(team_id)
        .fetch_all(pool)
        .await
        .map_err(|e| classify("listing players by team", e))?;
    rows.iter().map(player_from_row).collect()
}

/// Checks whether a player exists.
pub async fn exists(pool: &SqlitePool, id: i64) -> SqlResult<bool> {
    let (found,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM players WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| classify("probing player", e))?;
    Ok(found)
}

/// Overwrites a player's fields with `player` and returns the refreshed row.
///
/// # Returns
/// * `Ok(Some(Player))` - Player updated
/// * `Ok(None)` - No player with `player.id`
/// * `Err(DataStoreError::ForeignKeyViolation)` - The new team does not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn update(pool: &SqlitePool, player: &Player) -> SqlResult<Option<Player>> {
    let result = sqlx::query(
        r#"
        UPDATE players
        SET team_id = ?, first_name = ?, last_name = ?, position = ?, jersey_number = ?,
            height = ?, weight = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(player.team_id)
    .bind(&player.first_name)
    .bind(&player.last_name)
    .bind(&player.position)
    .bind(player.jersey_number)
    .bind(player.height)
    .bind(player.weight)
    .bind(Utc::now())
    .bind(player.id)
    .execute(pool)
    .await
    .map_err(|e| classify("updating player", e))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get(pool, player.id).await
}

/// Deletes a player. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: i64) -> SqlResult<bool> {
    let result = sqlx::query("DELETE FROM players WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| classify("deleting player", e))?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::tests::{insert_team, new_player, setup_test_db};

    #[tokio::test]
    async fn create_then_get_returns_equal_player() {
        let pool = setup_test_db().await;
        let team = insert_team(&pool, "Chiefs").await;
        let created = create(&pool, &new_player(team.id, Some(15))).await.unwrap();
        let fetched = get(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.jersey_number, Some(15));
    }

    #[tokio::test]
    async fn optional_measurements_round_trip_as_null() {
        let pool = setup_test_db().await;
        let team = insert_team(&pool, "Chiefs").await;
        let mut player = new_player(team.id, None);
        player.height = None;
        player.weight = None;
        let created = create(&pool, &player).await.unwrap();
        assert_eq!(created.jersey_number, None);
        assert_eq!(created.height, None);
        assert_eq!(created.weight, None);
    }

    #[tokio::test]
    async fn unknown_team_violates_foreign_key() {
        let pool = setup_test_db().await;
        let err = create(&pool, &new_player(42, None)).await.unwrap_err();
        assert_eq!(err, DataStoreError::ForeignKeyViolation);
    }

    #[tokio::test]
    async fn list_by_team_returns_only_that_roster() {
        let pool = setup_test_db().await;
        let chiefs = insert_team(&pool, "Chiefs").await;
        let bears = insert_team(&pool, "Bears").await;
        create(&pool, &new_player(chiefs.id, Some(15))).await.unwrap();
        create(&pool, &new_player(chiefs.id, Some(87))).await.unwrap();
        create(&pool, &new_player(bears.id, Some(18))).await.unwrap();

        assert_eq!(list(&pool).await.unwrap().len(), 3);
        let roster = list_by_team(&pool, chiefs.id).await.unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.iter().all(|p| p.team_id == chiefs.id));
    }

    #[tokio::test]
    async fn update_and_delete() {
        let pool = setup_test_db().await;
        let team = insert_team(&pool, "Chiefs").await;
        let mut player = create(&pool, &new_player(team.id, Some(15))).await.unwrap();
        player.position = "WR".to_string();
        let updated = update(&pool, &player).await.unwrap().unwrap();
        assert_eq!(updated.position, "WR");
        assert!(exists(&pool, player.id).await.unwrap());
        assert!(delete(&pool, player.id).await.unwrap());
        assert!(!delete(&pool, player.id).await.unwrap());
        assert_eq!(update(&pool, &player).await.unwrap(), None);
    }
}
