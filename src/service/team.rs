//! Team operations.

use sqlx::SqlitePool;

use super::require_positive;
use crate::{
    Conference, CreateTeamRequest, DataStoreError, Division, ServiceError, Team, TeamFilter,
    UpdateTeamRequest, sql, validate,
};

fn duplicate(name: &str, city: &str) -> ServiceError {
    ServiceError::Conflict(format!("team {} from {} already exists", name, city))
}

/// Fetches a team.
pub async fn get_team(pool: &SqlitePool, id: i64) -> Result<Team, ServiceError> {
    require_positive("team", id)?;
    sql::team::get(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("team", id))
}

/// Lists teams, optionally restricted by conference and division.
///
/// Filters are parsed like request fields; a blank filter is ignored and an unknown one
/// is `InvalidArgument`.
pub async fn list_teams(pool: &SqlitePool, filter: &TeamFilter) -> Result<Vec<Team>, ServiceError> {
    let conference = match filter.conference.as_deref() {
        Some(value) if !value.trim().is_empty() => {
            Some(validate::choice::<Conference>("conference", value)?)
        }
        _ => None,
    };
    let division = match filter.division.as_deref() {
        Some(value) if !value.trim().is_empty() => {
            Some(validate::choice::<Division>("division", value)?)
        }
        _ => None,
    };
    Ok(sql::team::list(pool, conference, division).await?)
}

/// Creates a team.
///
/// # Returns
/// * `Ok(Team)` - The stored team
/// * `Err(ServiceError::InvalidArgument)` - A field is missing or invalid
/// * `Err(ServiceError::Conflict)` - A team with the same name and city exists
pub async fn create_team(
    pool: &SqlitePool,
    request: &CreateTeamRequest,
) -> Result<Team, ServiceError> {
    let team = validate::team_create(request)?;
    match sql::team::create(pool, &team).await {
        Ok(created) => {
            tracing::info!(id = created.id, name = %created.name, "created team");
            Ok(created)
        }
        Err(DataStoreError::AlreadyExists) => Err(duplicate(&team.name, &team.city)),
        Err(e) => Err(e.into()),
    }
}

/// Applies a patch to a team.
///
/// # Returns
/// * `Ok(Team)` - The refreshed team
/// * `Err(ServiceError::NoFieldsProvided)` - The patch is empty
/// * `Err(ServiceError::InvalidArgument)` - A field is invalid
/// * `Err(ServiceError::NotFound)` - No such team
/// * `Err(ServiceError::Conflict)` - The new name and city belong to another team
pub async fn update_team(
    pool: &SqlitePool,
    id: i64,
    request: &UpdateTeamRequest,
) -> Result<Team, ServiceError> {
    require_positive("team", id)?;
    let patch = validate::team_update(request)?;
    let existing = get_team(pool, id).await?;
    let merged = existing.merge(&patch);
    match sql::team::update(pool, &merged).await {
        Ok(Some(updated)) => Ok(updated),
        Ok(None) => Err(ServiceError::not_found("team", id)),
        Err(DataStoreError::AlreadyExists) => Err(duplicate(&merged.name, &merged.city)),
        Err(e) => Err(e.into()),
    }
}

/// Deletes a team that nothing references.
///
/// # Returns
/// * `Ok(())` - The team is gone
/// * `Err(ServiceError::NotFound)` - No such team
/// * `Err(ServiceError::Conflict)` - Players or games still reference the team
pub async fn delete_team(pool: &SqlitePool, id: i64) -> Result<(), ServiceError> {
    require_positive("team", id)?;
    if !sql::team::exists(pool, id).await? {
        return Err(ServiceError::not_found("team", id));
    }
    match sql::team::delete(pool, id).await {
        Ok(true) => {
            tracing::info!(id, "deleted team");
            Ok(())
        }
        Ok(false) => Err(ServiceError::not_found("team", id)),
        Err(DataStoreError::ForeignKeyViolation) => Err(ServiceError::Conflict(format!(
            "team {} is still referenced by players or games",
            id
        ))),
        Err(e) => Err(e.into()),
    }
}
