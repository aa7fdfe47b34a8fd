//! # Games
//!
//! A game is a scheduled or played match between two distinct teams in a given season and
//! week. Scores stay empty until someone records them. The combination of both teams,
//! season, week and date is unique.

use std::fmt::{Display, Formatter, Result as FmtResult};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::http::parse_id;
use crate::validate::Choice;
use crate::{ServiceError, service};

///////////////////////////////////////////// GameStatus /////////////////////////////////////////////

/// Lifecycle state of a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Not yet kicked off.
    #[default]
    Scheduled,
    /// Being played.
    InProgress,
    /// Finished.
    Completed,
    /// Called off.
    Cancelled,
}

impl Choice for GameStatus {
    const VARIANTS: &'static [Self] = &[
        GameStatus::Scheduled,
        GameStatus::InProgress,
        GameStatus::Completed,
        GameStatus::Cancelled,
    ];
    const NAMES: &'static [&'static str] = &["scheduled", "in_progress", "completed", "cancelled"];

    fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::InProgress => "in_progress",
            GameStatus::Completed => "completed",
            GameStatus::Cancelled => "cancelled",
        }
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

//////////////////////////////////////////////// Game ////////////////////////////////////////////////

/// A persisted game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Store-assigned identifier.
    pub id: i64,
    /// Hosting team.
    pub home_team_id: i64,
    /// Visiting team.
    pub away_team_id: i64,
    /// Season token, e.g. "2024".
    pub season: String,
    /// Week within the season, `1..=22`.
    pub week: i64,
    /// Kickoff time.
    pub game_date: DateTime<Utc>,
    /// Lifecycle state.
    pub status: GameStatus,
    /// Points scored by the home team.
    pub home_score: Option<i64>,
    /// Points scored by the away team.
    pub away_score: Option<i64>,
    /// When the game was created.
    pub created_at: DateTime<Utc>,
    /// When the game was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Applies a validated patch, leaving absent fields unchanged.
    ///
    /// The result may name the same team twice when the patch changes only one side; the
    /// caller re-validates it.
    pub fn merge(&self, patch: &GamePatch) -> Game {
        Game {
            id: self.id,
            home_team_id: patch.home_team_id.unwrap_or(self.home_team_id),
            away_team_id: patch.away_team_id.unwrap_or(self.away_team_id),
            season: patch.season.clone().unwrap_or_else(|| self.season.clone()),
            week: patch.week.unwrap_or(self.week),
            game_date: patch.game_date.unwrap_or(self.game_date),
            status: patch.status.unwrap_or(self.status),
            home_score: patch.home_score.or(self.home_score),
            away_score: patch.away_score.or(self.away_score),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A validated game ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    /// Hosting team.
    pub home_team_id: i64,
    /// Visiting team.
    pub away_team_id: i64,
    /// Trimmed season token.
    pub season: String,
    /// Week within the season.
    pub week: i64,
    /// Kickoff time.
    pub game_date: DateTime<Utc>,
    /// Parsed status, `Scheduled` when the request left it out.
    pub status: GameStatus,
    /// Home score, if known.
    pub home_score: Option<i64>,
    /// Away score, if known.
    pub away_score: Option<i64>,
}

/// A validated game patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamePatch {
    /// New hosting team.
    pub home_team_id: Option<i64>,
    /// New visiting team.
    pub away_team_id: Option<i64>,
    /// New season.
    pub season: Option<String>,
    /// New week.
    pub week: Option<i64>,
    /// New kickoff time.
    pub game_date: Option<DateTime<Utc>>,
    /// New status.
    pub status: Option<GameStatus>,
    /// New home score.
    pub home_score: Option<i64>,
    /// New away score.
    pub away_score: Option<i64>,
}

////////////////////////////////////////// HTTP Request Types ////////////////////////////////////////

/// Request structure for creating a game.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateGameRequest {
    /// Hosting team; must exist.
    #[serde(default)]
    pub home_team_id: i64,
    /// Visiting team; must exist and differ from the home team.
    #[serde(default)]
    pub away_team_id: i64,
    /// Season token.
    #[serde(default)]
    pub season: String,
    /// Week within the season.
    #[serde(default)]
    pub week: i64,
    /// Kickoff time as an RFC 3339 timestamp.
    #[serde(default)]
    pub game_date: Option<DateTime<Utc>>,
    /// Status in any casing; defaults to "scheduled".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Home score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<i64>,
    /// Away score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<i64>,
}

/// Request structure for patching a game. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateGameRequest {
    /// New hosting team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team_id: Option<i64>,
    /// New visiting team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team_id: Option<i64>,
    /// New season.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    /// New week.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<i64>,
    /// New kickoff time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_date: Option<DateTime<Utc>>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// New home score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<i64>,
    /// New away score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<i64>,
}

//////////////////////////////////////////// HTTP Handlers ///////////////////////////////////////////

/// HTTP endpoint for creating a game.
async fn create_game(
    State(pool): State<SqlitePool>,
    Json(request): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<Game>), ServiceError> {
    let game = service::game::create_game(&pool, &request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// HTTP endpoint for getting a game by ID.
async fn get_game(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<Game>, ServiceError> {
    let id = parse_id("game", &id)?;
    Ok(Json(service::game::get_game(&pool, id).await?))
}

/// HTTP endpoint for listing every game.
async fn list_games(State(pool): State<SqlitePool>) -> Result<Json<Vec<Game>>, ServiceError> {
    Ok(Json(service::game::list_games(&pool).await?))
}

/// HTTP endpoint for listing games a team plays in, home or away.
async fn list_games_by_team(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Game>>, ServiceError> {
    let team_id = parse_id("team", &id)?;
    Ok(Json(service::game::list_games_by_team(&pool, team_id).await?))
}

/// HTTP endpoint for listing a season's games.
async fn list_games_by_season(
    State(pool): State<SqlitePool>,
    Path(season): Path<String>,
) -> Result<Json<Vec<Game>>, ServiceError> {
    Ok(Json(
        service::game::list_games_by_season(&pool, &season).await?,
    ))
}

/// HTTP endpoint for listing the games of one week of a season.
async fn list_games_by_week(
    State(pool): State<SqlitePool>,
    Path((season, week)): Path<(String, String)>,
) -> Result<Json<Vec<Game>>, ServiceError> {
    let week = week
        .trim()
        .parse::<i64>()
        .map_err(|_| ServiceError::InvalidArgument(format!("invalid week: {}", week)))?;
    Ok(Json(
        service::game::list_games_by_week(&pool, &season, week).await?,
    ))
}

/// HTTP endpoint for patching a game.
async fn update_game(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    Json(request): Json<UpdateGameRequest>,
) -> Result<Json<Game>, ServiceError> {
    let id = parse_id("game", &id)?;
    Ok(Json(
        service::game::update_game(&pool, id, &request, Utc::now()).await?,
    ))
}

/// HTTP endpoint for deleting a game.
async fn delete_game(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = parse_id("game", &id)?;
    service::game::delete_game(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//////////////////////////////////////////////// Router ///////////////////////////////////////////////

/// Creates an Axum router with the game endpoints.
///
/// # Routes
/// - `GET /games` - List games
/// - `POST /games` - Create a game
/// - `GET /games/:id` - Get a game
/// - `PUT`/`PATCH /games/:id` - Patch a game
/// - `DELETE /games/:id` - Delete a game
/// - `GET /games/season/:season` - List a season's games
/// - `GET /games/season/:season/week/:week` - List one week's games
/// - `GET /teams/:id/games` - List a team's games
pub fn create_game_router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route(
            "/games/:id",
            get(get_game)
                .put(update_game)
                .patch(update_game)
                .delete(delete_game),
        )
        .route("/games/season/:season", get(list_games_by_season))
        .route(
            "/games/season/:season/week/:week",
            get(list_games_by_week),
        )
        .route("/teams/:id/games", get(list_games_by_team))
        .with_state(pool)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn game() -> Game {
        let at = Utc.with_ymd_and_hms(2024, 9, 8, 17, 0, 0).unwrap();
        Game {
            id: 1,
            home_team_id: 1,
            away_team_id: 2,
            season: "2024".to_string(),
            week: 1,
            game_date: at,
            status: GameStatus::Scheduled,
            home_score: None,
            away_score: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn merge_records_final_score() {
        let patch = GamePatch {
            status: Some(GameStatus::Completed),
            home_score: Some(27),
            away_score: Some(20),
            ..GamePatch::default()
        };
        let merged = game().merge(&patch);
        assert_eq!(merged.status, GameStatus::Completed);
        assert_eq!(merged.home_score, Some(27));
        assert_eq!(merged.away_score, Some(20));
        assert_eq!(merged.week, 1);
    }

    #[test]
    fn merge_can_produce_same_teams() {
        let patch = GamePatch {
            away_team_id: Some(1),
            ..GamePatch::default()
        };
        let merged = game().merge(&patch);
        assert_eq!(merged.home_team_id, merged.away_team_id);
        assert!(crate::validate::game_teams(merged.home_team_id, merged.away_team_id).is_err());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_value(GameStatus::InProgress).unwrap();
        assert_eq!(json, "in_progress");
        assert_eq!(GameStatus::parse("Cancelled"), Some(GameStatus::Cancelled));
    }
}
