//! # Players
//!
//! A player belongs to exactly one team. Jersey numbers are optional but, when present,
//! unique within the player's team; that rule needs a roster lookup, so the service layer
//! owns it.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::http::parse_id;
use crate::{ServiceError, service};

/////////////////////////////////////////////// Player ///////////////////////////////////////////////

/// A persisted player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Store-assigned identifier.
    pub id: i64,
    /// The team this player belongs to.
    pub team_id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Free-text position, e.g. "QB".
    pub position: String,
    /// Jersey number in `0..=99`.
    pub jersey_number: Option<i64>,
    /// Height in inches.
    pub height: Option<i64>,
    /// Weight in pounds.
    pub weight: Option<i64>,
    /// When the player was created.
    pub created_at: DateTime<Utc>,
    /// When the player was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Applies a validated patch, leaving absent fields unchanged.
    pub fn merge(&self, patch: &UpdatePlayerRequest) -> Player {
        Player {
            id: self.id,
            team_id: patch.team_id.unwrap_or(self.team_id),
            first_name: patch
                .first_name
                .clone()
                .unwrap_or_else(|| self.first_name.clone()),
            last_name: patch
                .last_name
                .clone()
                .unwrap_or_else(|| self.last_name.clone()),
            position: patch
                .position
                .clone()
                .unwrap_or_else(|| self.position.clone()),
            jersey_number: patch.jersey_number.or(self.jersey_number),
            height: patch.height.or(self.height),
            weight: patch.weight.or(self.weight),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// The player's display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A validated player ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    /// Positive team id; existence is checked by the service.
    pub team_id: i64,
    /// Trimmed given name.
    pub first_name: String,
    /// Trimmed family name.
    pub last_name: String,
    /// Trimmed position.
    pub position: String,
    /// Jersey number in `0..=99`.
    pub jersey_number: Option<i64>,
    /// Height in `60..=90` inches.
    pub height: Option<i64>,
    /// Weight in `150..=400` pounds.
    pub weight: Option<i64>,
}

////////////////////////////////////////// HTTP Request Types ////////////////////////////////////////

/// Request structure for creating a player.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreatePlayerRequest {
    /// The team to join; must exist.
    #[serde(default)]
    pub team_id: i64,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Free-text position.
    #[serde(default)]
    pub position: String,
    /// Optional jersey number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<i64>,
    /// Optional height in inches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    /// Optional weight in pounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

/// Request structure for patching a player. Absent fields are left unchanged.
///
/// Supplying `team_id` moves the player; the destination team must exist and must not
/// already have a player wearing the (possibly unchanged) jersey number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UpdatePlayerRequest {
    /// Destination team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    /// New given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// New jersey number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<i64>,
    /// New height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    /// New weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

//////////////////////////////////////////// HTTP Handlers ///////////////////////////////////////////

/// HTTP endpoint for creating a player.
async fn create_player(
    State(pool): State<SqlitePool>,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ServiceError> {
    let player = service::player::create_player(&pool, &request).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// HTTP endpoint for getting a player by ID.
async fn get_player(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ServiceError> {
    let id = parse_id("player", &id)?;
    Ok(Json(service::player::get_player(&pool, id).await?))
}

/// HTTP endpoint for listing every player.
async fn list_players(State(pool): State<SqlitePool>) -> Result<Json<Vec<Player>>, ServiceError> {
    Ok(Json(service::player::list_players(&pool).await?))
}

/// HTTP endpoint for listing a team's roster.
async fn list_players_by_team(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Player>>, ServiceError> {
    let team_id = parse_id("team", &id)?;
    Ok(Json(
        service::player::list_players_by_team(&pool, team_id).await?,
    ))
}

/// HTTP endpoint for patching a player.
async fn update_player(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePlayerRequest>,
) -> Result<Json<Player>, ServiceError> {
    let id = parse_id("player", &id)?;
    Ok(Json(
        service::player::update_player(&pool, id, &request).await?,
    ))
}

/// HTTP endpoint for deleting a player.
async fn delete_player(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = parse_id("player", &id)?;
    service::player::delete_player(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//////////////////////////////////////////////// Router ///////////////////////////////////////////////

/// Creates an Axum router with the player endpoints.
///
/// # Routes
/// - `GET /players` - List players
/// - `POST /players` - Create a player
/// - `GET /players/:id` - Get a player
/// - `PUT`/`PATCH /players/:id` - Patch a player
/// - `DELETE /players/:id` - Delete a player
/// - `GET /teams/:id/players` - List a team's players
pub fn create_player_router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route(
            "/players/:id",
            get(get_player)
                .put(update_player)
                .patch(update_player)
                .delete(delete_player),
        )
        .route("/teams/:id/players", get(list_players_by_team))
        .with_state(pool)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn player() -> Player {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Player {
            id: 3,
            team_id: 1,
            first_name: "Travis".to_string(),
            last_name: "Kelce".to_string(),
            position: "TE".to_string(),
            jersey_number: Some(87),
            height: Some(77),
            weight: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn merge_keeps_absent_fields() {
        let patch = UpdatePlayerRequest {
            weight: Some(250),
            team_id: Some(2),
            ..UpdatePlayerRequest::default()
        };
        let merged = player().merge(&patch);
        assert_eq!(merged.team_id, 2);
        assert_eq!(merged.weight, Some(250));
        assert_eq!(merged.jersey_number, Some(87));
        assert_eq!(merged.full_name(), "Travis Kelce");
    }

    #[test]
    fn absent_optionals_are_omitted_from_patch_json() {
        let patch = UpdatePlayerRequest {
            position: Some("WR".to_string()),
            ..UpdatePlayerRequest::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"position": "WR"}));
    }
}
