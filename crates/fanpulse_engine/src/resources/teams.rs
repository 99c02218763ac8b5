use fanpulse_core::model::{
    Ack, CreatedTeam, DateRange, NewTeam, SeedResult, Team, TeamComparison, TeamList, TeamReport,
    TeamStats, TeamUpdate,
};
use fanpulse_core::teams::fold_turkish;
use fanpulse_core::validate;
use fanpulse_core::{QueryParams, ValidationError};

use super::format_date;
use crate::{ApiClient, ApiError};

pub async fn list_teams(api: &ApiClient) -> Result<TeamList, ApiError> {
    api.get("/teams", &QueryParams::new()).await
}

pub async fn active_teams(api: &ApiClient) -> Result<TeamList, ApiError> {
    let mut list = list_teams(api).await?;
    list.teams.retain(|team| team.is_active);
    list.count = list.teams.len();
    Ok(list)
}

pub async fn get_team(api: &ApiClient, id: &str) -> Result<Team, ApiError> {
    api.get(&format!("/teams/{id}"), &QueryParams::new()).await
}

pub async fn create_team(api: &ApiClient, team: &NewTeam) -> Result<Team, ApiError> {
    let created: CreatedTeam = api.post("/teams", team).await?;
    Ok(created.team)
}

pub async fn update_team(api: &ApiClient, id: &str, update: &TeamUpdate) -> Result<Ack, ApiError> {
    api.put(&format!("/teams/{id}"), update).await
}

pub async fn set_team_active(api: &ApiClient, id: &str, active: bool) -> Result<Ack, ApiError> {
    let update = TeamUpdate {
        is_active: Some(active),
        ..TeamUpdate::default()
    };
    update_team(api, id, &update).await
}

pub async fn delete_team(api: &ApiClient, id: &str) -> Result<Ack, ApiError> {
    api.delete(&format!("/teams/{id}")).await
}

pub async fn team_sentiment(
    api: &ApiClient,
    id: &str,
    range: DateRange,
) -> Result<TeamReport, ApiError> {
    let params = QueryParams::new()
        .with_opt("start_date", range.start.map(format_date))
        .with_opt("end_date", range.end.map(format_date));
    api.get(&format!("/teams/{id}/sentiment"), &params).await
}

pub async fn team_stats(api: &ApiClient, id: &str) -> Result<TeamStats, ApiError> {
    api.get(&format!("/teams/{id}/stats"), &QueryParams::new())
        .await
}

pub async fn seed_teams(api: &ApiClient) -> Result<SeedResult, ApiError> {
    api.post_empty("/teams/seed", &QueryParams::new()).await
}

pub async fn team_comparison(api: &ApiClient) -> Result<TeamComparison, ApiError> {
    super::dashboard::team_comparison(api).await
}

/// Teams whose name or any keyword contains `query`, ignoring case and
/// Turkish diacritics.
pub async fn search_teams(api: &ApiClient, query: &str) -> Result<TeamList, ApiError> {
    let mut list = list_teams(api).await?;
    let needle = fold_turkish(query);
    list.teams.retain(|team| {
        fold_turkish(&team.name).contains(&needle)
            || team
                .keywords
                .iter()
                .any(|keyword| fold_turkish(keyword).contains(&needle))
    });
    list.count = list.teams.len();
    Ok(list)
}

/// Client-side checks run before `create_team`.
pub fn validate_team(team: &NewTeam) -> Result<(), ValidationError> {
    validate::validate_team(team)
}
