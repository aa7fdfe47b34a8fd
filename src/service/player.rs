//! Player operations.
//!
//! Jersey numbers are unique per team. The store has no constraint for that, so the rule
//! is enforced here by scanning the destination roster before every write.

use sqlx::SqlitePool;

use super::require_positive;
use crate::{
    CreatePlayerRequest, DataStoreError, Player, ServiceError, UpdatePlayerRequest, sql,
    validate,
};

/// Fails with `Conflict` when someone other than `player_id` on `team_id` wears `jersey_number`.
async fn ensure_jersey_free(
    pool: &SqlitePool,
    team_id: i64,
    jersey_number: Option<i64>,
    player_id: Option<i64>,
) -> Result<(), ServiceError> {
    let Some(jersey_number) = jersey_number else {
        return Ok(());
    };
    let roster = sql::player::list_by_team(pool, team_id).await?;
    let taken = roster
        .iter()
        .filter(|p| Some(p.id) != player_id)
        .any(|p| p.jersey_number == Some(jersey_number));
    if taken {
        tracing::debug!(team_id, jersey_number, "jersey number taken");
        return Err(ServiceError::Conflict(format!(
            "jersey number {} is already taken by another player on team {}",
            jersey_number, team_id
        )));
    }
    Ok(())
}

async fn ensure_team_exists(pool: &SqlitePool, team_id: i64) -> Result<(), ServiceError> {
    if !sql::team::exists(pool, team_id).await? {
        return Err(ServiceError::not_found("team", team_id));
    }
    Ok(())
}

/// Fetches a player.
pub async fn get_player(pool: &SqlitePool, id: i64) -> Result<Player, ServiceError> {
    require_positive("player", id)?;
    sql::player::get(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("player", id))
}

/// Lists every player.
pub async fn list_players(pool: &SqlitePool) -> Result<Vec<Player>, ServiceError> {
    Ok(sql::player::list(pool).await?)
}

/// Lists a team's roster. The team must exist.
pub async fn list_players_by_team(
    pool: &SqlitePool,
    team_id: i64,
) -> Result<Vec<Player>, ServiceError> {
    require_positive("team", team_id)?;
    ensure_team_exists(pool, team_id).await?;
    Ok(sql::player::list_by_team(pool, team_id).await?)
}

/// Creates a player on an existing team.
///
/// # Returns
/// * `Ok(Player)` - The stored player
/// * `Err(ServiceError::InvalidArgument)` - A field is missing or out of range
/// * `Err(ServiceError::NotFound)` - The team does not exist
/// * `Err(ServiceError::Conflict)` - The jersey number is taken on that team
pub async fn create_player(
    pool: &SqlitePool,
    request: &CreatePlayerRequest,
) -> Result<Player, ServiceError> {
    let player = validate::player_create(request)?;
    ensure_team_exists(pool, player.team_id).await?;
    ensure_jersey_free(pool, player.team_id, player.jersey_number, None).await?;
    match sql::player::create(pool, &player).await {
        Ok(created) => {
            tracing::info!(id = created.id, team_id = created.team_id, "created player");
            Ok(created)
        }
        Err(DataStoreError::ForeignKeyViolation) => {
            Err(ServiceError::not_found("team", player.team_id))
        }
        Err(e) => Err(e.into()),
    }
}

/// Applies a patch to a player, possibly moving them to another team.
///
/// The roster scan runs against the merged team and jersey number, so changing either
/// one is checked against the destination team.
pub async fn update_player(
    pool: &SqlitePool,
    id: i64,
    request: &UpdatePlayerRequest,
) -> Result<Player, ServiceError> {
    require_positive("player", id)?;
    let patch = validate::player_update(request)?;
    let existing = get_player(pool, id).await?;
    let merged = existing.merge(&patch);
    if merged.team_id != existing.team_id {
        ensure_team_exists(pool, merged.team_id).await?;
    }
    ensure_jersey_free(pool, merged.team_id, merged.jersey_number, Some(id)).await?;
    match sql::player::update(pool, &merged).await {
        Ok(Some(updated)) => Ok(updated),
        Ok(None) => Err(ServiceError::not_found("player", id)),
        Err(DataStoreError::ForeignKeyViolation) => {
            Err(ServiceError::not_found("team", merged.team_id))
        }
        Err(e) => Err(e.into()),
    }
}

/// Deletes a player.
///
/// Stat lines recorded for the player keep the row referenced; deleting such a player
/// is a `Conflict`.
pub async fn delete_player(pool: &SqlitePool, id: i64) -> Result<(), ServiceError> {
    require_positive("player", id)?;
    if !sql::player::exists(pool, id).await? {
        return Err(ServiceError::not_found("player", id));
    }
    match sql::player::delete(pool, id).await {
        Ok(true) => {
            tracing::info!(id, "deleted player");
            Ok(())
        }
        Ok(false) => Err(ServiceError::not_found("player", id)),
        Err(DataStoreError::ForeignKeyViolation) => Err(ServiceError::Conflict(format!(
            "player {} still has recorded statistics",
            id
        ))),
        Err(e) => Err(e.into()),
    }
}
