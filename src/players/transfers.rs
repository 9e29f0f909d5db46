use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::extractor::normalize::{entity_id, non_blank, parse_date, parse_int, path_param, split_list};
use crate::extractor::{Entity, Field, Fields, Layout, RowError, collect_rows, required};
use crate::fetcher::FetchError;
use crate::players::dtos::{PlayerTransfer, PlayerTransferClub, PlayerTransfers};
use crate::scrape::{EntityParser, ParseInput, SiteUrls, SubsectionError, recover};

/// Fee texts that carry no amount.
const NO_FEE: &[&str] = &["-", "?", "free transfer"];

/// Transfer history from the JSON endpoint plus youth clubs from the page.
pub struct PlayerTransfersParser {
    pub player_id: String,
}

impl PlayerTransfersParser {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
        }
    }
}

impl EntityParser for PlayerTransfersParser {
    type Output = PlayerTransfers;

    fn entity(&self) -> Entity {
        Entity::PlayerTransfers
    }

    fn id(&self) -> &str {
        &self.player_id
    }

    fn page_url(&self, site: &SiteUrls) -> String {
        site.player_transfers(&self.player_id)
    }

    fn secondary_url(&self, site: &SiteUrls) -> Option<String> {
        Some(site.transfer_history(&self.player_id))
    }

    fn parse(&self, input: ParseInput<'_>) -> PlayerTransfers {
        let fields = input.fields(Layout::Default);
        let youth_clubs = recover("youthClubs", &self.player_id, youth_clubs(&fields));
        let transfers = recover("transfers", &self.player_id, transfers(input.secondary));

        PlayerTransfers {
            id: self.player_id.clone(),
            transfers,
            youth_clubs,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransfer {
    url: String,
    from: RawClub,
    to: RawClub,
    date: Option<String>,
    upcoming: Option<bool>,
    season: Option<String>,
    market_value: Option<String>,
    fee: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClub {
    #[serde(default)]
    href: Option<String>,
    club_name: String,
}

impl From<RawClub> for PlayerTransferClub {
    fn from(club: RawClub) -> Self {
        Self {
            id: club.href.as_deref().and_then(entity_id),
            name: club.club_name,
        }
    }
}

fn transfers(
    document: Option<Result<Value, FetchError>>,
) -> Result<Vec<PlayerTransfer>, SubsectionError> {
    let mut document = match document {
        Some(result) => result.map_err(SubsectionError::Unavailable)?,
        None => return Ok(Vec::new()),
    };
    let Some(Value::Array(entries)) = document.get_mut("transfers").map(Value::take) else {
        return Err(SubsectionError::Shape("no transfers array".into()));
    };

    Ok(collect_rows(entries.into_iter().map(transfer_row)))
}

fn transfer_row(entry: Value) -> Result<PlayerTransfer, RowError> {
    let raw: RawTransfer = serde_json::from_value(entry).map_err(|e| RowError::Malformed {
        field: "transfer",
        value: e.to_string(),
    })?;

    Ok(PlayerTransfer {
        id: required("id", path_param(&raw.url, "transfer_id"))?,
        club_from: raw.from.into(),
        club_to: raw.to.into(),
        date: raw
            .date
            .filter(|date| date != "0000-00-00")
            .and_then(|date| parse_date(Some(&date))),
        upcoming: raw.upcoming,
        season: non_blank(raw.season),
        market_value: parse_int(raw.market_value.as_deref()),
        fee: raw.fee.as_deref().and_then(fee_amount),
    })
}

fn fee_amount(fee: &str) -> Option<i64> {
    let fee = fee.trim();
    if NO_FEE.iter().any(|none| fee.eq_ignore_ascii_case(none)) {
        return None;
    }
    parse_int(Some(fee))
}

fn youth_clubs(fields: &Fields<'_>) -> Result<Vec<String>, SubsectionError> {
    if fields.elements(Field::YouthClubs).is_empty() {
        return Ok(Vec::new());
    }
    let clubs = split_list(fields.first(Field::YouthClubs).as_deref());
    if clubs.is_empty() {
        return Err(SubsectionError::Shape("empty youth club box".into()));
    }
    Ok(clubs)
}
