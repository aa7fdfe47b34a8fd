//! Player statistics operations.
//!
//! Updates are validated twice: the patch on its own, then the patch merged onto the
//! stored line. Lowering `passing_attempts` below a stored `passing_completions` passes
//! the first check and fails the second.

use sqlx::SqlitePool;

use super::require_positive;
use crate::{
    CreatePlayerStatsRequest, DataStoreError, PlayerStats, ServiceError,
    UpdatePlayerStatsRequest, sql, validate,
};

fn duplicate(player_id: i64, game_id: i64) -> ServiceError {
    ServiceError::Conflict(format!(
        "player stats already exist for player {} in game {}",
        player_id, game_id
    ))
}

/// Fetches a stat line.
pub async fn get_player_stats(pool: &SqlitePool, id: i64) -> Result<PlayerStats, ServiceError> {
    require_positive("player stats", id)?;
    sql::player_stats::get(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("player stats", id))
}

/// Lists every stat line.
pub async fn list_player_stats(pool: &SqlitePool) -> Result<Vec<PlayerStats>, ServiceError> {
    Ok(sql::player_stats::list(pool).await?)
}

/// Lists one player's stat lines. The player must exist.
pub async fn list_player_stats_by_player(
    pool: &SqlitePool,
    player_id: i64,
) -> Result<Vec<PlayerStats>, ServiceError> {
    require_positive("player", player_id)?;
    if !sql::player::exists(pool, player_id).await? {
        return Err(ServiceError::not_found("player", player_id));
    }
    Ok(sql::player_stats::list_by_player(pool, player_id).await?)
}

/// Lists one game's stat lines. The game must exist.
pub async fn list_player_stats_by_game(
    pool: &SqlitePool,
    game_id: i64,
) -> Result<Vec<PlayerStats>, ServiceError> {
    require_positive("game", game_id)?;
    if !sql::game::exists(pool, game_id).await? {
        return Err(ServiceError::not_found("game", game_id));
    }
    Ok(sql::player_stats::list_by_game(pool, game_id).await?)
}

/// Records a player's stat line for a game.
///
/// # Returns
/// * `Ok(PlayerStats)` - The stored line
/// * `Err(ServiceError::InvalidArgument)` - No counters, a negative counter, or a broken
///   cross-field rule
/// * `Err(ServiceError::NotFound)` - The player or game does not exist
/// * `Err(ServiceError::Conflict)` - The player already has a line for this game
pub async fn create_player_stats(
    pool: &SqlitePool,
    request: &CreatePlayerStatsRequest,
) -> Result<PlayerStats, ServiceError> {
    let stats = validate::player_stats_create(request)?;
    if !sql::player::exists(pool, stats.player_id).await? {
        return Err(ServiceError::not_found("player", stats.player_id));
    }
    if !sql::game::exists(pool, stats.game_id).await? {
        return Err(ServiceError::not_found("game", stats.game_id));
    }
    if sql::player_stats::exists_for_player_and_game(pool, stats.player_id, stats.game_id).await? {
        return Err(duplicate(stats.player_id, stats.game_id));
    }
    match sql::player_stats::create(pool, &stats).await {
        Ok(created) => {
            tracing::info!(
                id = created.id,
                player_id = created.player_id,
                game_id = created.game_id,
                "recorded player stats"
            );
            Ok(created)
        }
        Err(DataStoreError::AlreadyExists) => Err(duplicate(stats.player_id, stats.game_id)),
        Err(e) => Err(e.into()),
    }
}

/// Applies a patch to a stat line.
///
/// # Returns
/// * `Ok(PlayerStats)` - The refreshed line
/// * `Err(ServiceError::NoFieldsProvided)` - The patch carries no counters
/// * `Err(ServiceError::InvalidArgument)` - The patch, or the line it produces, breaks a rule
/// * `Err(ServiceError::NotFound)` - No such stat line
pub async fn update_player_stats(
    pool: &SqlitePool,
    id: i64,
    request: &UpdatePlayerStatsRequest,
) -> Result<PlayerStats, ServiceError> {
    require_positive("player stats", id)?;
    validate::player_stats_update(&request.stats)?;
    let existing = get_player_stats(pool, id).await?;
    let merged = existing.merge(&request.stats);
    if let Err(e) = validate::stat_line(&merged.stats) {
        tracing::debug!(id, error = %e, "patch breaks stored stat line");
        return Err(e.into());
    }
    match sql::player_stats::update(pool, &merged).await {
        Ok(Some(updated)) => Ok(updated),
        Ok(None) => Err(ServiceError::not_found("player stats", id)),
        Err(e) => Err(e.into()),
    }
}

/// Deletes a stat line.
pub async fn delete_player_stats(pool: &SqlitePool, id: i64) -> Result<(), ServiceError> {
    require_positive("player stats", id)?;
    if !sql::player_stats::exists(pool, id).await? {
        return Err(ServiceError::not_found("player stats", id));
    }
    if !sql::player_stats::delete(pool, id).await? {
        return Err(ServiceError::not_found("player stats", id));
    }
    tracing::info!(id, "deleted player stats");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatLine;
    use crate::sql::tests::{insert_team, new_game, new_player, setup_test_db};

    async fn fixture(pool: &SqlitePool) -> (i64, i64) {
        let home = insert_team(pool, "Chiefs").await;
        let away = insert_team(pool, "Ravens").await;
        let player = sql::player::create(pool, &new_player(home.id, Some(15)))
            .await
            .unwrap();
        let game = sql::game::create(pool, &new_game(home.id, away.id))
            .await
            .unwrap();
        (player.id, game.id)
    }

    fn request(player_id: i64, game_id: i64, stats: StatLine) -> CreatePlayerStatsRequest {
        CreatePlayerStatsRequest {
            player_id,
            game_id,
            stats,
        }
    }

    fn passing(attempts: i64, completions: i64) -> StatLine {
        StatLine {
            passing_attempts: Some(attempts),
            passing_completions: Some(completions),
            ..StatLine::default()
        }
    }

    #[tokio::test]
    async fn completions_cannot_exceed_attempts() {
        let pool = setup_test_db().await;
        let (player_id, game_id) = fixture(&pool).await;
        let err = create_player_stats(&pool, &request(player_id, game_id, passing(10, 11)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidArgument(
                "passing_completions cannot exceed passing_attempts".to_string()
            )
        );
        assert!(
            create_player_stats(&pool, &request(player_id, game_id, passing(35, 28)))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn duplicate_line_conflicts() {
        let pool = setup_test_db().await;
        let (player_id, game_id) = fixture(&pool).await;
        create_player_stats(&pool, &request(player_id, game_id, passing(35, 28)))
            .await
            .unwrap();
        let err = create_player_stats(&pool, &request(player_id, game_id, passing(1, 1)))
            .await
            .unwrap_err();
        assert_eq!(err, duplicate(player_id, game_id));
    }

    #[tokio::test]
    async fn player_and_game_must_exist() {
        let pool = setup_test_db().await;
        let (player_id, game_id) = fixture(&pool).await;
        assert_eq!(
            create_player_stats(&pool, &request(player_id + 50, game_id, passing(1, 1))).await,
            Err(ServiceError::not_found("player", player_id + 50))
        );
        assert_eq!(
            create_player_stats(&pool, &request(player_id, game_id + 50, passing(1, 1))).await,
            Err(ServiceError::not_found("game", game_id + 50))
        );
    }

    #[tokio::test]
    async fn update_is_checked_against_merged_line() {
        let pool = setup_test_db().await;
        let (player_id, game_id) = fixture(&pool).await;
        let stored = create_player_stats(&pool, &request(player_id, game_id, passing(35, 28)))
            .await
            .unwrap();

        let lower_attempts = UpdatePlayerStatsRequest {
            stats: StatLine {
                passing_attempts: Some(20),
                ..StatLine::default()
            },
        };
        let err = update_player_stats(&pool, stored.id, &lower_attempts)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        let unchanged = get_player_stats(&pool, stored.id).await.unwrap();
        assert_eq!(unchanged.stats.passing_attempts, Some(35));

        let more_attempts = UpdatePlayerStatsRequest {
            stats: StatLine {
                passing_attempts: Some(40),
                rushing_yards: Some(12),
                ..StatLine::default()
            },
        };
        let updated = update_player_stats(&pool, stored.id, &more_attempts)
            .await
            .unwrap();
        assert_eq!(updated.stats.passing_attempts, Some(40));
        assert_eq!(updated.stats.passing_completions, Some(28));
        assert_eq!(updated.stats.rushing_yards, Some(12));
    }

    #[tokio::test]
    async fn empty_update_is_no_fields_provided() {
        let pool = setup_test_db().await;
        let (player_id, game_id) = fixture(&pool).await;
        let stored = create_player_stats(&pool, &request(player_id, game_id, passing(1, 1)))
            .await
            .unwrap();
        assert_eq!(
            update_player_stats(&pool, stored.id, &UpdatePlayerStatsRequest::default()).await,
            Err(ServiceError::NoFieldsProvided)
        );
    }

    #[tokio::test]
    async fn stats_pin_player_and_game() {
        let pool = setup_test_db().await;
        let (player_id, game_id) = fixture(&pool).await;
        let stored = create_player_stats(&pool, &request(player_id, game_id, passing(1, 1)))
            .await
            .unwrap();
        assert_eq!(
            list_player_stats_by_player(&pool, player_id).await.unwrap(),
            vec![stored.clone()]
        );
        assert_eq!(
            list_player_stats_by_game(&pool, game_id).await.unwrap(),
            vec![stored.clone()]
        );
        assert!(matches!(
            crate::service::player::delete_player(&pool, player_id).await,
            Err(ServiceError::Conflict(_))
        ));

        delete_player_stats(&pool, stored.id).await.unwrap();
        assert!(list_player_stats(&pool).await.unwrap().is_empty());
        assert_eq!(
            delete_player_stats(&pool, stored.id).await,
            Err(ServiceError::not_found("player stats", stored.id))
        );
        crate::service::player::delete_player(&pool, player_id)
            .await
            .unwrap();
    }
}
