//! Game operations.
//!
//! Create and update take `now` so the game-date window can be tested deterministically.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::require_positive;
use crate::{
    CreateGameRequest, DataStoreError, Game, ServiceError, UpdateGameRequest, ValidationError,
    sql, validate,
};

async fn ensure_team_exists(
    pool: &SqlitePool,
    role: &'static str,
    team_id: i64,
) -> Result<(), ServiceError> {
    if !sql::team::exists(pool, team_id).await? {
        return Err(ServiceError::not_found(role, team_id));
    }
    Ok(())
}

fn duplicate(home: i64, away: i64, season: &str, week: i64, date: DateTime<Utc>) -> ServiceError {
    ServiceError::Conflict(format!(
        "a game between teams {} and {} in season {} week {} on {} already exists",
        home, away, season, week, date
    ))
}

fn season(value: &str) -> Result<&str, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field: "season" }.into());
    }
    Ok(value)
}

/// Fetches a game.
pub async fn get_game(pool: &SqlitePool, id: i64) -> Result<Game, ServiceError> {
    require_positive("game", id)?;
    sql::game::get(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("game", id))
}

/// Lists every game.
pub async fn list_games(pool: &SqlitePool) -> Result<Vec<Game>, ServiceError> {
    Ok(sql::game::list(pool).await?)
}

/// Lists the games a team plays in. The team must exist.
pub async fn list_games_by_team(pool: &SqlitePool, team_id: i64) -> Result<Vec<Game>, ServiceError> {
    require_positive("team", team_id)?;
    ensure_team_exists(pool, "team", team_id).await?;
    Ok(sql::game::list_by_team(pool, team_id).await?)
}

/// Lists a season's games.
pub async fn list_games_by_season(
    pool: &SqlitePool,
    season_token: &str,
) -> Result<Vec<Game>, ServiceError> {
    let season_token = season(season_token)?;
    Ok(sql::game::list_by_season(pool, season_token).await?)
}

/// Lists the games of one week of a season. The week must lie in `1..=22`.
pub async fn list_games_by_week(
    pool: &SqlitePool,
    season_token: &str,
    week: i64,
) -> Result<Vec<Game>, ServiceError> {
    let season_token = season(season_token)?;
    validate::week(week)?;
    Ok(sql::game::list_by_week(pool, season_token, week).await?)
}

/// Schedules a game.
///
/// Home and away must differ before either team is looked up.
///
/// # Returns
/// * `Ok(Game)` - The stored game
/// * `Err(ServiceError::InvalidArgument)` - A field is invalid, or both sides name one team
/// * `Err(ServiceError::NotFound)` - The home or away team does not exist
/// * `Err(ServiceError::Conflict)` - The same matchup is already scheduled for that slot
pub async fn create_game(
    pool: &SqlitePool,
    request: &CreateGameRequest,
    now: DateTime<Utc>,
) -> Result<Game, ServiceError> {
    let game = validate::game_create(request, now)?;
    ensure_team_exists(pool, "home team", game.home_team_id).await?;
    ensure_team_exists(pool, "away team", game.away_team_id).await?;
    match sql::game::create(pool, &game).await {
        Ok(created) => {
            tracing::info!(
                id = created.id,
                home = created.home_team_id,
                away = created.away_team_id,
                "created game"
            );
            Ok(created)
        }
        Err(DataStoreError::AlreadyExists) => Err(duplicate(
            game.home_team_id,
            game.away_team_id,
            &game.season,
            game.week,
            game.game_date,
        )),
        Err(e) => Err(e.into()),
    }
}

/// Applies a patch to a game.
///
/// The merged game is checked again for home == away, which catches a patch that moves
/// only one side onto the other team.
pub async fn update_game(
    pool: &SqlitePool,
    id: i64,
    request: &UpdateGameRequest,
    now: DateTime<Utc>,
) -> Result<Game, ServiceError> {
    require_positive("game", id)?;
    let patch = validate::game_update(request, now)?;
    let existing = get_game(pool, id).await?;
    let merged = existing.merge(&patch);
    validate::game_teams(merged.home_team_id, merged.away_team_id)?;
    if merged.home_team_id != existing.home_team_id {
        ensure_team_exists(pool, "home team", merged.home_team_id).await?;
    }
    if merged.away_team_id != existing.away_team_id {
        ensure_team_exists(pool, "away team", merged.away_team_id).await?;
    }
    match sql::game::update(pool, &merged).await {
        Ok(Some(updated)) => Ok(updated),
        Ok(None) => Err(ServiceError::not_found("game", id)),
        Err(DataStoreError::AlreadyExists) => Err(duplicate(
            merged.home_team_id,
            merged.away_team_id,
            &merged.season,
            merged.week,
            merged.game_date,
        )),
        Err(e) => Err(e.into()),
    }
}

/// Deletes a game. Games with recorded statistics are a `Conflict`.
pub async fn delete_game(pool: &SqlitePool, id: i64) -> Result<(), ServiceError> {
    require_positive("game", id)?;
    if !sql::game::exists(pool, id).await? {
        return Err(ServiceError::not_found("game", id));
    }
    match sql::game::delete(pool, id).await {
        Ok(true) => {
            tracing::info!(id, "deleted game");
            Ok(())
        }
        Ok(false) => Err(ServiceError::not_found("game", id)),
        Err(DataStoreError::ForeignKeyViolation) => Err(ServiceError::Conflict(format!(
            "game {} still has recorded statistics",
            id
        ))),
        Err(e) => Err(e.into()),
    }
}
