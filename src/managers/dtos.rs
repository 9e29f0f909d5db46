use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ManagerPlaceOfBirth {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// The club currently managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerClub {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Link to the manager's playing career, when there was one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub id: String,
    pub url: String,
    pub retired: bool,
    pub retired_since: Option<NaiveDate>,
}

/// Absent `club` and `player_profile` serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerProfile {
    pub id: String,
    pub url: String,
    pub name: String,
    pub full_name: Option<String>,
    pub image_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub place_of_birth: ManagerPlaceOfBirth,
    pub age: Option<i64>,
    pub citizenship: Vec<String>,
    pub club: Option<ManagerClub>,
    pub player_profile: Option<PlayerProfile>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ManagerContractClub {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerContract {
    /// Manager id, repeated on every station.
    pub id: String,
    pub club: ManagerContractClub,
    pub role: String,
    pub start_date: NaiveDate,
    /// May be an expected date for the running contract.
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerContracts {
    pub id: String,
    pub contracts: Vec<ManagerContract>,
    pub updated_at: DateTime<Utc>,
}
