use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubProfile {
    pub id: String,
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_market_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confederation: Option<String>,
    pub is_national: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifa_world_ranking: Option<String>,
    pub league: ClubLeague,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubLeague {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

/// One roster row. National-team rows fill `international_matches` and
/// `goals` and leave `signed_from` and `contract` empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubPlayer {
    pub id: String,
    pub name: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    pub nationality: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_club: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_matches: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubPlayers {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_id: Option<String>,
    pub is_national: bool,
    pub players: Vec<ClubPlayer>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubManager {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_office: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub games: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_per_game: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubManagers {
    pub id: String,
    pub managers: Vec<ClubManager>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlayersQuery {
    /// Season start year, e.g. `2023`. Defaults to the running season.
    pub season_id: Option<String>,
    /// Read the roster as a national team.
    pub is_national: Option<bool>,
}
