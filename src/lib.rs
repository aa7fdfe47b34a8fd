//! # Gridiron: a validated store for football teams, players, games and statistics
//!
//! Gridiron keeps four families of records behind an HTTP/JSON API and refuses every
//! write that would leave them inconsistent:
//!
//! - **Teams** belong to a conference (AFC, NFC) and a division (North, South, East,
//!   West), and are unique by name and city.
//! - **Players** belong to a team and wear a jersey number no teammate wears.
//! - **Games** pair two different teams in a season week, within a window around today.
//! - **Player statistics** record one line of counters per player per game, and the
//!   counters agree with each other (completions never exceed attempts, tackles add up).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ HTTP layer (axum routers, CORS, errors) │
//! ├─────────────────────────────────────────┤
//! │ Service layer (probes, merges, writes)  │
//! ├─────────────────────────────────────────┤
//! │ Validation & consistency engine (pure)  │
//! ├─────────────────────────────────────────┤
//! │ Repository (sqlx over SQLite)           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The engine in [`validate`] never touches storage. The service layer in [`service`]
//! runs it, looks up every referenced record, merges patches onto stored records and
//! re-validates the result before [`sql`] persists it. Errors travel as data
//! ([`ValidationError`], [`DataStoreError`], [`ServiceError`]) and become HTTP status codes
//! only in [`create_router`].
//!
//! ## Partial updates
//!
//! Every `Update*Request` has only optional fields; a present field replaces the stored
//! value and an absent one keeps it. A patch with no fields at all is rejected with
//! [`ServiceError::NoFieldsProvided`].
//!
//! ```rust
//! use gridiron::{StatLine, validate};
//!
//! let stored = StatLine {
//!     passing_attempts: Some(35),
//!     passing_completions: Some(28),
//!     ..StatLine::default()
//! };
//! let patch = StatLine {
//!     passing_attempts: Some(20),
//!     ..StatLine::default()
//! };
//!
//! // The patch alone is fine...
//! assert!(validate::player_stats_update(&patch).is_ok());
//! // ...but the line it would produce is not.
//! assert!(validate::stat_line(&stored.merge(&patch)).is_err());
//! ```
//!
//! ## Running a server
//!
//! ```no_run
//! # use gridiron::{Database, create_router};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open(std::path::Path::new("./gridiron.db")).await?;
//! let app = create_router(db.pool().clone());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
mod database;
mod errors;
mod game;
mod http;
mod player;
mod player_stats;
mod team;

/// Validation & consistency engine.
///
/// Pure functions that accept or reject create requests, patches and merged records.
pub mod validate;

/// SQLite repository functions, one submodule per table.
pub mod sql;

/// Service operations, one submodule per entity family.
pub mod service;

pub use database::{Database, DatabaseError};
pub use errors::{DataStoreError, ServiceError};
pub use game::{
    CreateGameRequest, Game, GamePatch, GameStatus, NewGame, UpdateGameRequest,
    create_game_router,
};
pub use http::{ErrorBody, create_router, parse_id};
pub use player::{
    CreatePlayerRequest, NewPlayer, Player, UpdatePlayerRequest, create_player_router,
};
pub use player_stats::{
    CreatePlayerStatsRequest, NewPlayerStats, PlayerStats, StatLine, UpdatePlayerStatsRequest,
    create_player_stats_router,
};
pub use team::{
    Conference, CreateTeamRequest, Division, NewTeam, Team, TeamFilter, TeamPatch,
    UpdateTeamRequest, create_team_router,
};
pub use validate::{Choice, StatInvariant, ValidationError};
