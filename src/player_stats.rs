//! # Player statistics
//!
//! One row of counters per player per game. Every counter is optional: a kicker's line
//! carries field goals and leaves passing empty, and an absent counter is stored as NULL
//! rather than zero.
//!
//! The counters live in [`StatLine`], which is flattened into the JSON of both the
//! persisted record and the requests:
//!
//! ```rust
//! use gridiron::CreatePlayerStatsRequest;
//!
//! let request: CreatePlayerStatsRequest = serde_json::from_str(
//!     r#"{"player_id": 1, "game_id": 2, "passing_attempts": 35, "passing_completions": 28}"#,
//! ).unwrap();
//! assert_eq!(request.stats.passing_attempts, Some(35));
//! assert_eq!(request.stats.rushing_yards, None);
//! ```

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;

use crate::http::parse_id;
use crate::{ServiceError, service};

////////////////////////////////////////////// StatLine //////////////////////////////////////////////

macro_rules! stat_line {
    ($($(#[doc = $doc:literal])* $field:ident,)+) => {
        /// The counters of one player's performance in one game.
        ///
        /// Fields are declared in storage-column order. `None` means "not recorded".
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct StatLine {
            $(
                $(#[doc = $doc])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<i64>,
            )+
        }

        impl StatLine {
            /// Storage column names, in declaration order.
            pub const COLUMNS: &'static [&'static str] = &[$(stringify!($field)),+];

            /// Every counter paired with its column name, in declaration order.
            pub fn counters(&self) -> Vec<(&'static str, Option<i64>)> {
                vec![$((stringify!($field), self.$field)),+]
            }

            /// True when no counter is recorded.
            pub fn is_empty(&self) -> bool {
                $(self.$field.is_none())&&+
            }

            /// Overlays `patch` on `self`: counters present in the patch win.
            pub fn merge(&self, patch: &StatLine) -> StatLine {
                StatLine {
                    $($field: patch.$field.or(self.$field),)+
                }
            }
        }

        impl<'r> sqlx::FromRow<'r, SqliteRow> for StatLine {
            fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
                use sqlx::Row;
                Ok(StatLine {
                    $($field: row.try_get(stringify!($field))?,)+
                })
            }
        }
    };
}

stat_line! {
    /// Passes thrown.
    passing_attempts,
    /// Passes caught by a teammate; never more than `passing_attempts`.
    passing_completions,
    /// Yards gained through the air.
    passing_yards,
    /// Touchdown passes.
    passing_touchdowns,
    /// Passes intercepted by the defense.
    passing_interceptions,
    /// Carries.
    rushing_attempts,
    /// Yards gained on the ground.
    rushing_yards,
    /// Rushing touchdowns.
    rushing_touchdowns,
    /// Times thrown to.
    receiving_targets,
    /// Catches.
    receptions,
    /// Yards after catches.
    receiving_yards,
    /// Receiving touchdowns.
    receiving_touchdowns,
    /// Fumbles.
    fumbles,
    /// Fumbles recovered by the opponent; never more than `fumbles`.
    fumbles_lost,
    /// Total tackles; equals `solo_tackles + assisted_tackles` when all three are known.
    tackles,
    /// Unassisted tackles.
    solo_tackles,
    /// Shared tackles.
    assisted_tackles,
    /// Quarterback sacks.
    sacks,
    /// Passes intercepted.
    defensive_interceptions,
    /// Passes broken up.
    pass_deflections,
    /// Fumbles forced.
    forced_fumbles,
    /// Fumbles recovered.
    fumble_recoveries,
    /// Defensive touchdowns.
    defensive_touchdowns,
    /// Field goals tried.
    field_goals_attempted,
    /// Field goals converted; never more than `field_goals_attempted`.
    field_goals_made,
    /// Extra points tried.
    extra_points_attempted,
    /// Extra points converted; never more than `extra_points_attempted`.
    extra_points_made,
    /// Punts.
    punts,
    /// Total punt distance.
    punt_yards,
    /// Kickoffs returned.
    kick_returns,
    /// Kickoff return yards.
    kick_return_yards,
    /// Kickoff return touchdowns.
    kick_return_touchdowns,
    /// Punts returned.
    punt_returns,
    /// Punt return yards.
    punt_return_yards,
    /// Punt return touchdowns.
    punt_return_touchdowns,
}

//////////////////////////////////////////// PlayerStats /////////////////////////////////////////////

/// A persisted stat line for one player in one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Store-assigned identifier.
    pub id: i64,
    /// The player the line belongs to.
    pub player_id: i64,
    /// The game the line was recorded in.
    pub game_id: i64,
    /// The counters.
    #[serde(flatten)]
    pub stats: StatLine,
    /// When the line was created.
    pub created_at: DateTime<Utc>,
    /// When the line was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PlayerStats {
    /// Applies a validated patch, leaving absent counters unchanged.
    pub fn merge(&self, patch: &StatLine) -> PlayerStats {
        PlayerStats {
            stats: self.stats.merge(patch),
            ..self.clone()
        }
    }
}

/// A validated stat line ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayerStats {
    /// The player the line belongs to.
    pub player_id: i64,
    /// The game the line was recorded in.
    pub game_id: i64,
    /// The counters; at least one is present.
    pub stats: StatLine,
}

////////////////////////////////////////// HTTP Request Types ////////////////////////////////////////

/// Request structure for recording a stat line.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreatePlayerStatsRequest {
    /// The player; must exist.
    #[serde(default)]
    pub player_id: i64,
    /// The game; must exist.
    #[serde(default)]
    pub game_id: i64,
    /// The counters, given as top-level JSON fields.
    #[serde(flatten)]
    pub stats: StatLine,
}

/// Request structure for patching a stat line. Absent counters are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdatePlayerStatsRequest {
    /// The counters to change, given as top-level JSON fields.
    #[serde(flatten)]
    pub stats: StatLine,
}

//////////////////////////////////////////// HTTP Handlers ///////////////////////////////////////////

/// HTTP endpoint for recording a stat line.
async fn create_player_stats(
    State(pool): State<SqlitePool>,
    Json(request): Json<CreatePlayerStatsRequest>,
) -> Result<(StatusCode, Json<PlayerStats>), ServiceError> {
    let stats = service::player_stats::create_player_stats(&pool, &request).await?;
    Ok((StatusCode::CREATED, Json(stats)))
}

/// HTTP endpoint for getting a stat line by ID.
async fn get_player_stats(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<PlayerStats>, ServiceError> {
    let id = parse_id("player stats", &id)?;
    Ok(Json(
        service::player_stats::get_player_stats(&pool, id).await?,
    ))
}

/// HTTP endpoint for listing every stat line.
async fn list_player_stats(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<PlayerStats>>, ServiceError> {
    Ok(Json(service::player_stats::list_player_stats(&pool).await?))
}

/// HTTP endpoint for listing one player's stat lines.
async fn list_player_stats_by_player(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PlayerStats>>, ServiceError> {
    let player_id = parse_id("player", &id)?;
    Ok(Json(
        service::player_stats::list_player_stats_by_player(&pool, player_id).await?,
    ))
}

/// HTTP endpoint for listing every stat line recorded in one game.
async fn list_player_stats_by_game(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PlayerStats>>, ServiceError> {
    let game_id = parse_id("game", &id)?;
    Ok(Json(
        service::player_stats::list_player_stats_by_game(&pool, game_id).await?,
    ))
}

/// HTTP endpoint for patching a stat line.
async fn update_player_stats(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePlayerStatsRequest>,
) -> Result<Json<PlayerStats>, ServiceError> {
    let id = parse_id("player stats", &id)?;
    Ok(Json(
        service::player_stats::update_player_stats(&pool, id, &request).await?,
    ))
}

/// HTTP endpoint for deleting a stat line.
async fn delete_player_stats(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = parse_id("player stats", &id)?;
    service::player_stats::delete_player_stats(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//////////////////////////////////////////////// Router ///////////////////////////////////////////////

/// Creates an Axum router with the player statistics endpoints.
///
/// # Routes
/// - `GET /player-stats` - List stat lines
/// - `POST /player-stats` - Record a stat line
/// - `GET /player-stats/:id` - Get a stat line
/// - `PUT`/`PATCH /player-stats/:id` - Patch a stat line
/// - `DELETE /player-stats/:id` - Delete a stat line
/// - `GET /players/:id/stats` - List a player's stat lines
/// - `GET /games/:id/stats` - List a game's stat lines
pub fn create_player_stats_router(pool: SqlitePool) -> Router {
    Router::new()
        .route(
            "/player-stats",
            get(list_player_stats).post(create_player_stats),
        )
        .route(
            "/player-stats/:id",
            get(get_player_stats)
                .put(update_player_stats)
                .patch(update_player_stats)
                .delete(delete_player_stats),
        )
        .route("/players/:id/stats", get(list_player_stats_by_player))
        .route("/games/:id/stats", get(list_player_stats_by_game))
        .with_state(pool)
}
