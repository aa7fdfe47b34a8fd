//! # Validation & Consistency Engine
//!
//! Pure functions that accept or reject a mutation before it reaches the repository.
//! Nothing in this module touches storage; rules that need a lookup (team existence,
//! jersey uniqueness, one stats row per player per game) live in the service layer.
//!
//! Each `*_create` / `*_update` function both checks and normalizes its input: strings
//! come back trimmed, enum fields come back parsed, so the service layer only ever
//! persists values that passed through here.
//!
//! ## Rules
//!
//! - Required strings must be non-empty after trimming.
//! - Conference, division and game status match their allowed set case-insensitively.
//! - Numeric ranges: jersey number `0..=99`, height `60..=90`, weight `150..=400`,
//!   week `1..=22`, scores and every stat counter `>= 0`.
//! - A game date must fall within one year before and two years after "now"; callers
//!   pass "now" so the rule is deterministic under test.
//! - Player statistics obey the cross-field rules in [`StatInvariant`]. Each rule is
//!   skipped when one of its operands is absent.
//! - An update that carries no fields is [`ValidationError::NoFieldsProvided`].
//!
//! ```rust
//! use gridiron::{StatLine, ValidationError, validate};
//!
//! let stats = StatLine {
//!     passing_attempts: Some(35),
//!     passing_completions: Some(28),
//!     ..StatLine::default()
//! };
//! assert!(validate::stat_line(&stats).is_ok());
//!
//! let stats = StatLine {
//!     passing_attempts: Some(10),
//!     passing_completions: Some(11),
//!     ..StatLine::default()
//! };
//! assert!(matches!(
//!     validate::stat_line(&stats),
//!     Err(ValidationError::StatInvariant(_))
//! ));
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::game::{CreateGameRequest, GamePatch, GameStatus, NewGame, UpdateGameRequest};
use crate::player::{CreatePlayerRequest, NewPlayer, UpdatePlayerRequest};
use crate::player_stats::{CreatePlayerStatsRequest, NewPlayerStats, StatLine};
use crate::team::{Conference, CreateTeamRequest, Division, NewTeam, TeamPatch, UpdateTeamRequest};

/////////////////////////////////////////////// Limits ///////////////////////////////////////////////

/// Valid jersey numbers.
pub const JERSEY_NUMBERS: RangeInclusive<i64> = 0..=99;
/// Valid player heights, in inches.
pub const HEIGHTS: RangeInclusive<i64> = 60..=90;
/// Valid player weights, in pounds.
pub const WEIGHTS: RangeInclusive<i64> = 150..=400;
/// Valid weeks within a season.
pub const WEEKS: RangeInclusive<i64> = 1..=22;

/// How far before "now" a game may be dated, in years.
const GAME_DATE_PAST_YEARS: i32 = 1;
/// How far after "now" a game may be dated, in years.
const GAME_DATE_FUTURE_YEARS: i32 = 2;

/////////////////////////////////////////// ValidationError //////////////////////////////////////////

/// The reason a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A mandatory field is missing or blank.
    #[error("{field} is required")]
    Required {
        /// The offending field.
        field: &'static str,
    },
    /// An optional field was supplied but is blank.
    #[error("{field} cannot be empty")]
    Empty {
        /// The offending field.
        field: &'static str,
    },
    /// An identifier is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// A number falls outside its allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// A counter or score is negative.
    #[error("{field} cannot be negative, got {value}")]
    Negative {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// A string is not a member of a fixed set.
    #[error("invalid {field} '{value}': must be one of: {}", .allowed.join(", "))]
    NotOneOf {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// The accepted values.
        allowed: &'static [&'static str],
    },
    /// A game date lies more than a year before validation time.
    #[error("game_date cannot be more than 1 year in the past, got {value}")]
    GameDateTooEarly {
        /// The rejected date.
        value: DateTime<Utc>,
    },
    /// A game date lies more than two years after validation time.
    #[error("game_date cannot be more than 2 years in the future, got {value}")]
    GameDateTooLate {
        /// The rejected date.
        value: DateTime<Utc>,
    },
    /// A game names the same team on both sides.
    #[error("home team and away team cannot be the same (team {team_id})")]
    SameTeams {
        /// The team named twice.
        team_id: i64,
    },
    /// A stats creation request carries no counters.
    #[error("at least one statistic must be provided")]
    NoStatistics,
    /// A cross-field statistics rule does not hold.
    #[error("{0}")]
    StatInvariant(StatInvariant),
    /// An update request carries no fields.
    #[error("at least one field must be provided for update")]
    NoFieldsProvided,
}

//////////////////////////////////////////// StatInvariant ///////////////////////////////////////////

/// Cross-field rules that relate player statistic counters to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatInvariant {
    /// `passing_completions <= passing_attempts`
    CompletionsWithinAttempts,
    /// `tackles == solo_tackles + assisted_tackles`
    TacklesAddUp,
    /// `field_goals_made <= field_goals_attempted`
    FieldGoalsWithinAttempts,
    /// `extra_points_made <= extra_points_attempted`
    ExtraPointsWithinAttempts,
    /// `fumbles_lost <= fumbles`
    FumblesLostWithinFumbles,
}

impl StatInvariant {
    /// Every rule, in the order they are checked.
    pub const ALL: [StatInvariant; 5] = [
        StatInvariant::CompletionsWithinAttempts,
        StatInvariant::TacklesAddUp,
        StatInvariant::FieldGoalsWithinAttempts,
        StatInvariant::ExtraPointsWithinAttempts,
        StatInvariant::FumblesLostWithinFumbles,
    ];

    /// Whether the rule holds for `stats`. Rules with an absent operand hold vacuously.
    pub fn holds(self, stats: &StatLine) -> bool {
        match self {
            StatInvariant::CompletionsWithinAttempts => {
                at_most(stats.passing_completions, stats.passing_attempts)
            }
            StatInvariant::TacklesAddUp => {
                match (stats.tackles, stats.solo_tackles, stats.assisted_tackles) {
                    (Some(total), Some(solo), Some(assisted)) => {
                        solo.checked_add(assisted) == Some(total)
                    }
                    _ => true,
                }
            }
            StatInvariant::FieldGoalsWithinAttempts => {
                at_most(stats.field_goals_made, stats.field_goals_attempted)
            }
            StatInvariant::ExtraPointsWithinAttempts => {
                at_most(stats.extra_points_made, stats.extra_points_attempted)
            }
            StatInvariant::FumblesLostWithinFumbles => at_most(stats.fumbles_lost, stats.fumbles),
        }
    }
}

impl Display for StatInvariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let msg = match self {
            StatInvariant::CompletionsWithinAttempts => {
                "passing_completions cannot exceed passing_attempts"
            }
            StatInvariant::TacklesAddUp => {
                "tackles must equal solo_tackles plus assisted_tackles"
            }
            StatInvariant::FieldGoalsWithinAttempts => {
                "field_goals_made cannot exceed field_goals_attempted"
            }
            StatInvariant::ExtraPointsWithinAttempts => {
                "extra_points_made cannot exceed extra_points_attempted"
            }
            StatInvariant::FumblesLostWithinFumbles => "fumbles_lost cannot exceed fumbles",
        };
        write!(f, "{}", msg)
    }
}

fn at_most(part: Option<i64>, whole: Option<i64>) -> bool {
    match (part, whole) {
        (Some(part), Some(whole)) => part <= whole,
        _ => true,
    }
}

/////////////////////////////////////////////// Choice ///////////////////////////////////////////////

/// A closed set of string values matched case-insensitively.
pub trait Choice: Copy + Sized + 'static {
    /// Every member of the set.
    const VARIANTS: &'static [Self];
    /// Canonical spelling of every member, in the same order as `VARIANTS`.
    const NAMES: &'static [&'static str];

    /// Canonical spelling of this member.
    fn as_str(&self) -> &'static str;

    /// Finds the member whose canonical spelling matches `s`, ignoring case and
    /// surrounding whitespace.
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
    }
}

/////////////////////////////////////////////// Helpers //////////////////////////////////////////////

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(trimmed.to_string())
}

fn non_empty(
    field: &'static str,
    value: Option<&String>,
) -> Result<Option<String>, ValidationError> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::Empty { field });
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}

fn positive(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}

fn within(
    field: &'static str,
    value: Option<i64>,
    range: RangeInclusive<i64>,
) -> Result<(), ValidationError> {
    match value {
        Some(value) if !range.contains(&value) => Err(ValidationError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        }),
        _ => Ok(()),
    }
}

fn non_negative(field: &'static str, value: Option<i64>) -> Result<(), ValidationError> {
    match value {
        Some(value) if value < 0 => Err(ValidationError::Negative { field, value }),
        _ => Ok(()),
    }
}

/// Parses `value` as a member of `T`, rejecting blanks and unknown spellings.
pub fn choice<T: Choice>(field: &'static str, value: &str) -> Result<T, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    T::parse(value).ok_or_else(|| ValidationError::NotOneOf {
        field,
        value: value.to_string(),
        allowed: T::NAMES,
    })
}

fn optional_choice<T: Choice>(
    field: &'static str,
    value: Option<&String>,
) -> Result<Option<T>, ValidationError> {
    match value {
        Some(value) if value.trim().is_empty() => Err(ValidationError::Empty { field }),
        Some(value) => choice(field, value).map(Some),
        None => Ok(None),
    }
}

//////////////////////////////////////////////// Teams ///////////////////////////////////////////////

/// Validates a team creation request and returns the normalized team.
pub fn team_create(request: &CreateTeamRequest) -> Result<NewTeam, ValidationError> {
    let name = required("name", &request.name)?;
    let city = required("city", &request.city)?;
    let conference = choice::<Conference>("conference", &request.conference)?;
    let division = choice::<Division>("division", &request.division)?;
    Ok(NewTeam {
        name,
        city,
        conference,
        division,
    })
}

/// Validates a team patch and returns it normalized.
pub fn team_update(request: &UpdateTeamRequest) -> Result<TeamPatch, ValidationError> {
    if request.name.is_none()
        && request.city.is_none()
        && request.conference.is_none()
        && request.division.is_none()
    {
        return Err(ValidationError::NoFieldsProvided);
    }
    Ok(TeamPatch {
        name: non_empty("name", request.name.as_ref())?,
        city: non_empty("city", request.city.as_ref())?,
        conference: optional_choice("conference", request.conference.as_ref())?,
        division: optional_choice("division", request.division.as_ref())?,
    })
}

/////////////////////////////////////////////// Players //////////////////////////////////////////////

fn player_measurements(
    jersey_number: Option<i64>,
    height: Option<i64>,
    weight: Option<i64>,
) -> Result<(), ValidationError> {
    within("jersey_number", jersey_number, JERSEY_NUMBERS)?;
    within("height", height, HEIGHTS)?;
    within("weight", weight, WEIGHTS)?;
    Ok(())
}

/// Validates a player creation request and returns the normalized player.
pub fn player_create(request: &CreatePlayerRequest) -> Result<NewPlayer, ValidationError> {
    let team_id = positive("team_id", request.team_id)?;
    let first_name = required("first_name", &request.first_name)?;
    let last_name = required("last_name", &request.last_name)?;
    let position = required("position", &request.position)?;
    player_measurements(request.jersey_number, request.height, request.weight)?;
    Ok(NewPlayer {
        team_id,
        first_name,
        last_name,
        position,
        jersey_number: request.jersey_number,
        height: request.height,
        weight: request.weight,
    })
}

/// Validates a player patch and returns it normalized.
pub fn player_update(request: &UpdatePlayerRequest) -> Result<UpdatePlayerRequest, ValidationError> {
    if request.team_id.is_none()
        && request.first_name.is_none()
        && request.last_name.is_none()
        && request.position.is_none()
        && request.jersey_number.is_none()
        && request.height.is_none()
        && request.weight.is_none()
    {
        return Err(ValidationError::NoFieldsProvided);
    }
    let team_id = request
        .team_id
        .map(|team_id| positive("team_id", team_id))
        .transpose()?;
    let first_name = non_empty("first_name", request.first_name.as_ref())?;
    let last_name = non_empty("last_name", request.last_name.as_ref())?;
    let position = non_empty("position", request.position.as_ref())?;
    player_measurements(request.jersey_number, request.height, request.weight)?;
    Ok(UpdatePlayerRequest {
        team_id,
        first_name,
        last_name,
        position,
        jersey_number: request.jersey_number,
        height: request.height,
        weight: request.weight,
    })
}

//////////////////////////////////////////////// Games ///////////////////////////////////////////////

/// Moves `at` by whole calendar years, keeping the time of day.
///
/// February 29 in a year without one rolls over to March 1 rather than clamping to
/// February 28.
fn shift_years(at: DateTime<Utc>, years: i32) -> Option<DateTime<Utc>> {
    let date = at.date_naive();
    let year = date.year().checked_add(years)?;
    let shifted = NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))?;
    Some(shifted.and_time(at.time()).and_utc())
}

/// Checks that a game date lies within one year before and two years after `now`.
///
/// Both bounds are inclusive and computed in calendar years. From February 29 the bounds
/// fall on March 1.
pub fn game_date(value: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ValidationError> {
    let earliest = shift_years(now, -GAME_DATE_PAST_YEARS).unwrap_or(DateTime::<Utc>::MIN_UTC);
    let latest = shift_years(now, GAME_DATE_FUTURE_YEARS).unwrap_or(DateTime::<Utc>::MAX_UTC);
    if value < earliest {
        return Err(ValidationError::GameDateTooEarly { value });
    }
    if value > latest {
        return Err(ValidationError::GameDateTooLate { value });
    }
    Ok(())
}

/// Checks that a game's two sides name different teams.
pub fn game_teams(home_team_id: i64, away_team_id: i64) -> Result<(), ValidationError> {
    if home_team_id == away_team_id {
        return Err(ValidationError::SameTeams {
            team_id: home_team_id,
        });
    }
    Ok(())
}

/// Checks that a week lies within a season.
pub fn week(value: i64) -> Result<(), ValidationError> {
    within("week", Some(value), WEEKS)
}

/// Validates a game creation request against `now` and returns the normalized game.
pub fn game_create(
    request: &CreateGameRequest,
    now: DateTime<Utc>,
) -> Result<NewGame, ValidationError> {
    let home_team_id = positive("home_team_id", request.home_team_id)?;
    let away_team_id = positive("away_team_id", request.away_team_id)?;
    game_teams(home_team_id, away_team_id)?;
    let season = required("season", &request.season)?;
    week(request.week)?;
    let date = request
        .game_date
        .ok_or(ValidationError::Required { field: "game_date" })?;
    game_date(date, now)?;
    let status = match request.status.as_deref() {
        Some(status) if !status.trim().is_empty() => choice::<GameStatus>("status", status)?,
        _ => GameStatus::Scheduled,
    };
    non_negative("home_score", request.home_score)?;
    non_negative("away_score", request.away_score)?;
    Ok(NewGame {
        home_team_id,
        away_team_id,
        season,
        week: request.week,
        game_date: date,
        status,
        home_score: request.home_score,
        away_score: request.away_score,
    })
}

/// Validates a game patch against `now` and returns it normalized.
///
/// When both team ids are present they must differ; the service re-checks the merged
/// game for the case where only one side changes.
pub fn game_update(
    request: &UpdateGameRequest,
    now: DateTime<Utc>,
) -> Result<GamePatch, ValidationError> {
    if request.home_team_id.is_none()
        && request.away_team_id.is_none()
        && request.season.is_none()
        && request.week.is_none()
        && request.game_date.is_none()
        && request.status.is_none()
        && request.home_score.is_none()
        && request.away_score.is_none()
    {
        return Err(ValidationError::NoFieldsProvided);
    }
    let home_team_id = request
        .home_team_id
        .map(|id| positive("home_team_id", id))
        .transpose()?;
    let away_team_id = request
        .away_team_id
        .map(|id| positive("away_team_id", id))
        .transpose()?;
    if let (Some(home), Some(away)) = (home_team_id, away_team_id) {
        game_teams(home, away)?;
    }
    let season = non_empty("season", request.season.as_ref())?;
    if let Some(value) = request.week {
        week(value)?;
    }
    if let Some(date) = request.game_date {
        game_date(date, now)?;
    }
    let status = optional_choice::<GameStatus>("status", request.status.as_ref())?;
    non_negative("home_score", request.home_score)?;
    non_negative("away_score", request.away_score)?;
    Ok(GamePatch {
        home_team_id,
        away_team_id,
        season,
        week: request.week,
        game_date: request.game_date,
        status,
        home_score: request.home_score,
        away_score: request.away_score,
    })
}

//////////////////////////////////////////// Player stats ////////////////////////////////////////////

/// Checks every counter is non-negative and every [`StatInvariant`] holds.
pub fn stat_line(stats: &StatLine) -> Result<(), ValidationError> {
    for (field, value) in stats.counters() {
        non_negative(field, value)?;
    }
    for invariant in StatInvariant::ALL {
        if !invariant.holds(stats) {
            return Err(ValidationError::StatInvariant(invariant));
        }
    }
    Ok(())
}

/// Validates a stats creation request and returns the normalized record.
pub fn player_stats_create(
    request: &CreatePlayerStatsRequest,
) -> Result<NewPlayerStats, ValidationError> {
    let player_id = positive("player_id", request.player_id)?;
    let game_id = positive("game_id", request.game_id)?;
    if request.stats.is_empty() {
        return Err(ValidationError::NoStatistics);
    }
    stat_line(&request.stats)?;
    Ok(NewPlayerStats {
        player_id,
        game_id,
        stats: request.stats.clone(),
    })
}

/// Validates a stats patch on its own.
///
/// This only sees the fields in the patch. The service also validates the patch merged
/// onto the stored record, which catches a patch that breaks a rule together with
/// counters it did not touch.
pub fn player_stats_update(patch: &StatLine) -> Result<(), ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::NoFieldsProvided);
    }
    stat_line(patch)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn team_request() -> CreateTeamRequest {
        CreateTeamRequest {
            name: "Chiefs".to_string(),
            city: "Kansas City".to_string(),
            conference: "AFC".to_string(),
            division: "West".to_string(),
        }
    }

    fn player_request() -> CreatePlayerRequest {
        CreatePlayerRequest {
            team_id: 1,
            first_name: "Patrick".to_string(),
            last_name: "Mahomes".to_string(),
            position: "QB".to_string(),
            jersey_number: Some(15),
            height: Some(74),
            weight: Some(225),
        }
    }

    fn game_request() -> CreateGameRequest {
        CreateGameRequest {
            home_team_id: 1,
            away_team_id: 2,
            season: "2024".to_string(),
            week: 1,
            game_date: Some(now() + Duration::days(30)),
            status: None,
            home_score: None,
            away_score: None,
        }
    }

    #[test]
    fn team_create_trims_and_canonicalizes() {
        let request = CreateTeamRequest {
            name: "  Chiefs ".to_string(),
            city: " Kansas City".to_string(),
            conference: "afc".to_string(),
            division: " wEsT ".to_string(),
        };
        let team = team_create(&request).unwrap();
        assert_eq!(team.name, "Chiefs");
        assert_eq!(team.city, "Kansas City");
        assert_eq!(team.conference, Conference::Afc);
        assert_eq!(team.division, Division::West);
    }

    #[test]
    fn team_create_requires_every_field() {
        let mut request = team_request();
        request.city = "   ".to_string();
        assert_eq!(
            team_create(&request),
            Err(ValidationError::Required { field: "city" })
        );
    }

    #[test]
    fn team_create_rejects_unknown_conference() {
        let mut request = team_request();
        request.conference = "XFL".to_string();
        let err = team_create(&request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid conference 'XFL': must be one of: AFC, NFC"
        );
    }

    #[test]
    fn team_create_rejects_unknown_division() {
        let mut request = team_request();
        request.division = "Central".to_string();
        assert!(matches!(
            team_create(&request),
            Err(ValidationError::NotOneOf {
                field: "division",
                ..
            })
        ));
    }

    #[test]
    fn empty_team_patch_is_no_fields() {
        assert_eq!(
            team_update(&UpdateTeamRequest::default()),
            Err(ValidationError::NoFieldsProvided)
        );
    }

    #[test]
    fn team_patch_rejects_blank_name() {
        let patch = UpdateTeamRequest {
            name: Some(" ".to_string()),
            ..UpdateTeamRequest::default()
        };
        assert_eq!(
            team_update(&patch),
            Err(ValidationError::Empty { field: "name" })
        );
    }

    #[test]
    fn jersey_number_boundaries() {
        for accepted in [0, 99] {
            let mut request = player_request();
            request.jersey_number = Some(accepted);
            assert!(player_create(&request).is_ok(), "{accepted} should pass");
        }
        for rejected in [-1, 100] {
            let mut request = player_request();
            request.jersey_number = Some(rejected);
            assert!(
                matches!(
                    player_create(&request),
                    Err(ValidationError::OutOfRange {
                        field: "jersey_number",
                        ..
                    })
                ),
                "{rejected} should fail"
            );
        }
    }

    #[test]
    fn height_and_weight_ranges() {
        let mut request = player_request();
        request.height = Some(59);
        assert!(player_create(&request).is_err());
        request.height = Some(90);
        request.weight = Some(401);
        assert_eq!(
            player_create(&request),
            Err(ValidationError::OutOfRange {
                field: "weight",
                value: 401,
                min: 150,
                max: 400
            })
        );
    }

    #[test]
    fn player_requires_positive_team() {
        let mut request = player_request();
        request.team_id = 0;
        assert_eq!(
            player_create(&request),
            Err(ValidationError::NotPositive {
                field: "team_id",
                value: 0
            })
        );
    }

    #[test]
    fn empty_player_patch_is_no_fields() {
        assert_eq!(
            player_update(&UpdatePlayerRequest::default()),
            Err(ValidationError::NoFieldsProvided)
        );
    }

    #[test]
    fn week_boundaries() {
        for accepted in [1, 22] {
            let mut request = game_request();
            request.week = accepted;
            assert!(game_create(&request, now()).is_ok(), "{accepted} should pass");
        }
        for rejected in [0, 23] {
            let mut request = game_request();
            request.week = rejected;
            assert!(
                matches!(
                    game_create(&request, now()),
                    Err(ValidationError::OutOfRange { field: "week", .. })
                ),
                "{rejected} should fail"
            );
        }
    }

    #[test]
    fn same_team_rejected_before_other_fields() {
        let mut request = game_request();
        request.away_team_id = 1;
        request.week = 99;
        request.season = String::new();
        assert_eq!(
            game_create(&request, now()),
            Err(ValidationError::SameTeams { team_id: 1 })
        );
    }

    #[test]
    fn game_date_window_is_relative_to_now() {
        let mut request = game_request();
        request.game_date = Some(now() - Duration::days(367));
        assert!(matches!(
            game_create(&request, now()),
            Err(ValidationError::GameDateTooEarly { .. })
        ));

        request.game_date = Some(now() + Duration::days(365 * 2 + 1));
        assert!(matches!(
            game_create(&request, now()),
            Err(ValidationError::GameDateTooLate { .. })
        ));

        let earliest = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        let latest = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        assert!(game_date(earliest, now()).is_ok());
        assert!(game_date(latest, now()).is_ok());
        assert!(matches!(
            game_date(earliest - Duration::seconds(1), now()),
            Err(ValidationError::GameDateTooEarly { .. })
        ));
        assert!(game_date(latest + Duration::seconds(1), now()).is_err());
    }

    #[test]
    fn leap_day_window_rolls_over_to_march() {
        let leap_day = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        let march_first = Utc.with_ymd_and_hms(2023, 3, 1, 12, 0, 0).unwrap();
        assert!(matches!(
            game_date(march_first - Duration::days(1), leap_day),
            Err(ValidationError::GameDateTooEarly { .. })
        ));
        assert!(game_date(march_first, leap_day).is_ok());

        let latest = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert!(game_date(latest, leap_day).is_ok());
        assert!(game_date(latest + Duration::seconds(1), leap_day).is_err());
    }

    #[test]
    fn game_update_checks_date_window() {
        let patch = UpdateGameRequest {
            game_date: Some(now() + Duration::days(3 * 365)),
            ..UpdateGameRequest::default()
        };
        assert!(matches!(
            game_update(&patch, now()),
            Err(ValidationError::GameDateTooLate { .. })
        ));

        let patch = UpdateGameRequest {
            game_date: Some(now() - Duration::days(400)),
            ..UpdateGameRequest::default()
        };
        assert!(matches!(
            game_update(&patch, now()),
            Err(ValidationError::GameDateTooEarly { .. })
        ));

        let patch = UpdateGameRequest {
            game_date: Some(now() + Duration::days(30)),
            ..UpdateGameRequest::default()
        };
        assert!(game_update(&patch, now()).is_ok());
    }

    #[test]
    fn game_requires_date() {
        let mut request = game_request();
        request.game_date = None;
        assert_eq!(
            game_create(&request, now()),
            Err(ValidationError::Required { field: "game_date" })
        );
    }

    #[test]
    fn game_status_defaults_and_is_case_insensitive() {
        let game = game_create(&game_request(), now()).unwrap();
        assert_eq!(game.status, GameStatus::Scheduled);

        let mut request = game_request();
        request.status = Some("IN_PROGRESS".to_string());
        assert_eq!(
            game_create(&request, now()).unwrap().status,
            GameStatus::InProgress
        );

        request.status = Some("postponed".to_string());
        assert!(matches!(
            game_create(&request, now()),
            Err(ValidationError::NotOneOf { field: "status", .. })
        ));
    }

    #[test]
    fn negative_scores_rejected() {
        let mut request = game_request();
        request.away_score = Some(-3);
        assert_eq!(
            game_create(&request, now()),
            Err(ValidationError::Negative {
                field: "away_score",
                value: -3
            })
        );
    }

    #[test]
    fn game_patch_with_both_sides_equal_is_rejected() {
        let patch = UpdateGameRequest {
            home_team_id: Some(4),
            away_team_id: Some(4),
            ..UpdateGameRequest::default()
        };
        assert_eq!(
            game_update(&patch, now()),
            Err(ValidationError::SameTeams { team_id: 4 })
        );
    }

    #[test]
    fn game_patch_with_blank_status_is_rejected() {
        let patch = UpdateGameRequest {
            status: Some("".to_string()),
            ..UpdateGameRequest::default()
        };
        assert_eq!(
            game_update(&patch, now()),
            Err(ValidationError::Empty { field: "status" })
        );
    }

    #[test]
    fn tackles_must_add_up_exactly() {
        let stats = StatLine {
            tackles: Some(5),
            solo_tackles: Some(3),
            assisted_tackles: Some(1),
            ..StatLine::default()
        };
        assert_eq!(
            stat_line(&stats),
            Err(ValidationError::StatInvariant(StatInvariant::TacklesAddUp))
        );

        let stats = StatLine {
            tackles: Some(4),
            ..stats
        };
        assert!(stat_line(&stats).is_ok());
    }

    #[test]
    fn invariants_skip_absent_operands() {
        let stats = StatLine {
            passing_completions: Some(30),
            tackles: Some(9),
            solo_tackles: Some(1),
            field_goals_made: Some(4),
            extra_points_made: Some(2),
            fumbles_lost: Some(1),
            ..StatLine::default()
        };
        assert!(stat_line(&stats).is_ok());
    }

    #[test]
    fn each_made_count_is_bounded_by_attempts() {
        let cases = [
            (
                StatLine {
                    field_goals_attempted: Some(2),
                    field_goals_made: Some(3),
                    ..StatLine::default()
                },
                StatInvariant::FieldGoalsWithinAttempts,
            ),
            (
                StatLine {
                    extra_points_attempted: Some(1),
                    extra_points_made: Some(2),
                    ..StatLine::default()
                },
                StatInvariant::ExtraPointsWithinAttempts,
            ),
            (
                StatLine {
                    fumbles: Some(0),
                    fumbles_lost: Some(1),
                    ..StatLine::default()
                },
                StatInvariant::FumblesLostWithinFumbles,
            ),
        ];
        for (stats, invariant) in cases {
            assert_eq!(
                stat_line(&stats),
                Err(ValidationError::StatInvariant(invariant))
            );
        }
    }

    #[test]
    fn negative_counter_names_field() {
        let stats = StatLine {
            punt_return_yards: Some(-1),
            ..StatLine::default()
        };
        assert_eq!(
            stat_line(&stats),
            Err(ValidationError::Negative {
                field: "punt_return_yards",
                value: -1
            })
        );
    }

    #[test]
    fn stats_create_needs_a_counter() {
        let request = CreatePlayerStatsRequest {
            player_id: 1,
            game_id: 1,
            stats: StatLine::default(),
        };
        assert_eq!(
            player_stats_create(&request),
            Err(ValidationError::NoStatistics)
        );
    }

    #[test]
    fn stats_patch_cross_checks_fields_in_same_request() {
        let patch = StatLine {
            passing_attempts: Some(10),
            passing_completions: Some(12),
            ..StatLine::default()
        };
        assert_eq!(
            player_stats_update(&patch),
            Err(ValidationError::StatInvariant(
                StatInvariant::CompletionsWithinAttempts
            ))
        );
        assert_eq!(
            player_stats_update(&StatLine::default()),
            Err(ValidationError::NoFieldsProvided)
        );
    }
}
