use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CompetitionClub {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionClubs {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_id: Option<String>,
    pub is_knockout: bool,
    pub clubs: Vec<CompetitionClub>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClubsQuery {
    /// Read the participants page of a cup competition.
    pub is_knockout: Option<bool>,
    /// Season start year. Inferred from the page when omitted.
    pub season_id: Option<String>,
}
