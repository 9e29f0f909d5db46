use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Club side of a transfer. Youth sides often have no linked club page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlayerTransferClub {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTransfer {
    pub id: String,
    pub club_from: PlayerTransferClub,
    pub club_to: PlayerTransferClub,
    pub date: Option<NaiveDate>,
    pub upcoming: Option<bool>,
    pub season: Option<String>,
    pub market_value: Option<i64>,
    /// `None` for loans, free transfers and undisclosed fees.
    pub fee: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTransfers {
    pub id: String,
    pub transfers: Vec<PlayerTransfer>,
    pub youth_clubs: Vec<String>,
    pub updated_at: DateTime<Utc>,
}
