//! # Teams
//!
//! A team belongs to one conference and one division. The pair `(name, city)` is unique
//! across the store, and a team cannot be deleted while players or games still reference
//! it.
//!
//! Conference and division are accepted in any casing and stored canonically:
//!
//! ```rust
//! use gridiron::{Choice, Conference, Division};
//!
//! assert_eq!(Conference::parse(" nfc "), Some(Conference::Nfc));
//! assert_eq!(Division::parse("NORTH").map(|d| d.as_str()), Some("North"));
//! assert_eq!(Conference::parse("XFL"), None);
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::http::parse_id;
use crate::validate::Choice;
use crate::{ServiceError, service};

///////////////////////////////////////////// Conference /////////////////////////////////////////////

/// One of the two conferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    /// American Football Conference.
    #[serde(rename = "AFC")]
    Afc,
    /// National Football Conference.
    #[serde(rename = "NFC")]
    Nfc,
}

impl Choice for Conference {
    const VARIANTS: &'static [Self] = &[Conference::Afc, Conference::Nfc];
    const NAMES: &'static [&'static str] = &["AFC", "NFC"];

    fn as_str(&self) -> &'static str {
        match self {
            Conference::Afc => "AFC",
            Conference::Nfc => "NFC",
        }
    }
}

impl Display for Conference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

////////////////////////////////////////////// Division //////////////////////////////////////////////

/// One of the four divisions within a conference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    /// North division.
    North,
    /// South division.
    South,
    /// East division.
    East,
    /// West division.
    West,
}

impl Choice for Division {
    const VARIANTS: &'static [Self] = &[
        Division::North,
        Division::South,
        Division::East,
        Division::West,
    ];
    const NAMES: &'static [&'static str] = &["North", "South", "East", "West"];

    fn as_str(&self) -> &'static str {
        match self {
            Division::North => "North",
            Division::South => "South",
            Division::East => "East",
            Division::West => "West",
        }
    }
}

impl Display for Division {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

//////////////////////////////////////////////// Team ////////////////////////////////////////////////

/// A persisted team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Store-assigned identifier.
    pub id: i64,
    /// Team name, e.g. "Chiefs".
    pub name: String,
    /// Home city, e.g. "Kansas City".
    pub city: String,
    /// Conference membership.
    pub conference: Conference,
    /// Division membership.
    pub division: Division,
    /// When the team was created.
    pub created_at: DateTime<Utc>,
    /// When the team was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Applies a validated patch, leaving absent fields unchanged.
    ///
    /// Identity and timestamps are carried over; the repository refreshes `updated_at`
    /// when it persists the result.
    pub fn merge(&self, patch: &TeamPatch) -> Team {
        Team {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            city: patch.city.clone().unwrap_or_else(|| self.city.clone()),
            conference: patch.conference.unwrap_or(self.conference),
            division: patch.division.unwrap_or(self.division),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A validated team ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    /// Trimmed team name.
    pub name: String,
    /// Trimmed city.
    pub city: String,
    /// Parsed conference.
    pub conference: Conference,
    /// Parsed division.
    pub division: Division,
}

/// A validated team patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPatch {
    /// New name, if changing.
    pub name: Option<String>,
    /// New city, if changing.
    pub city: Option<String>,
    /// New conference, if changing.
    pub conference: Option<Conference>,
    /// New division, if changing.
    pub division: Option<Division>,
}

////////////////////////////////////////// HTTP Request Types ////////////////////////////////////////

/// Request structure for creating a team.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateTeamRequest {
    /// Team name.
    #[serde(default)]
    pub name: String,
    /// Home city.
    #[serde(default)]
    pub city: String,
    /// "AFC" or "NFC", any casing.
    #[serde(default)]
    pub conference: String,
    /// "North", "South", "East" or "West", any casing.
    #[serde(default)]
    pub division: String,
}

/// Request structure for patching a team. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateTeamRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// New conference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    /// New division.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
}

/// Query parameters accepted by the team listing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TeamFilter {
    /// Only teams in this conference.
    pub conference: Option<String>,
    /// Only teams in this division.
    pub division: Option<String>,
}

//////////////////////////////////////////// HTTP Handlers ///////////////////////////////////////////

/// HTTP endpoint for creating a team.
async fn create_team(
    State(pool): State<SqlitePool>,
    Json(request): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Team>), ServiceError> {
    let team = service::team::create_team(&pool, &request).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// HTTP endpoint for getting a team by ID.
async fn get_team(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<Team>, ServiceError> {
    let id = parse_id("team", &id)?;
    Ok(Json(service::team::get_team(&pool, id).await?))
}

/// HTTP endpoint for listing teams, optionally filtered.
async fn list_teams(
    State(pool): State<SqlitePool>,
    Query(filter): Query<TeamFilter>,
) -> Result<Json<Vec<Team>>, ServiceError> {
    Ok(Json(service::team::list_teams(&pool, &filter).await?))
}

/// HTTP endpoint for patching a team.
async fn update_team(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTeamRequest>,
) -> Result<Json<Team>, ServiceError> {
    let id = parse_id("team", &id)?;
    Ok(Json(service::team::update_team(&pool, id, &request).await?))
}

/// HTTP endpoint for deleting a team.
async fn delete_team(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = parse_id("team", &id)?;
    service::team::delete_team(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//////////////////////////////////////////////// Router ///////////////////////////////////////////////

/// Creates an Axum router with the team endpoints.
///
/// # Routes
/// - `GET /teams` - List teams, filtered by `conference` and `division` query parameters
/// - `POST /teams` - Create a team
/// - `GET /teams/:id` - Get a team
/// - `PUT`/`PATCH /teams/:id` - Patch a team
/// - `DELETE /teams/:id` - Delete a team
pub fn create_team_router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/:id",
            get(get_team)
                .put(update_team)
                .patch(update_team)
                .delete(delete_team),
        )
        .with_state(pool)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn team() -> Team {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Team {
            id: 7,
            name: "Chiefs".to_string(),
            city: "Kansas City".to_string(),
            conference: Conference::Afc,
            division: Division::West,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn merge_applies_only_present_fields() {
        let patch = TeamPatch {
            city: Some("Arlington".to_string()),
            division: Some(Division::East),
            ..TeamPatch::default()
        };
        let merged = team().merge(&patch);
        assert_eq!(merged.id, 7);
        assert_eq!(merged.name, "Chiefs");
        assert_eq!(merged.city, "Arlington");
        assert_eq!(merged.conference, Conference::Afc);
        assert_eq!(merged.division, Division::East);
    }

    #[test]
    fn empty_patch_merges_to_identity() {
        assert_eq!(team().merge(&TeamPatch::default()), team());
    }

    #[test]
    fn enums_serialize_canonically() {
        let json = serde_json::to_value(team()).unwrap();
        assert_eq!(json["conference"], "AFC");
        assert_eq!(json["division"], "West");
    }

    #[test]
    fn create_request_tolerates_missing_fields() {
        let request: CreateTeamRequest = serde_json::from_str(r#"{"name": "Bears"}"#).unwrap();
        assert_eq!(request.name, "Bears");
        assert!(request.city.is_empty());
    }
}
