use chrono::{NaiveDate, Utc};
use scraper::ElementRef;

use crate::extractor::normalize::{entity_id, parse_date};
use crate::extractor::{Entity, Field, Fields, Layout, RowError, collect_rows, required};
use crate::managers::dtos::{ManagerContract, ManagerContractClub, ManagerContracts};
use crate::scrape::{EntityParser, ParseInput, SiteUrls};

/// Coaching stations, most recent first.
pub struct ManagerContractsParser {
    pub manager_id: String,
}

impl ManagerContractsParser {
    pub fn new(manager_id: impl Into<String>) -> Self {
        Self {
            manager_id: manager_id.into(),
        }
    }
}

impl EntityParser for ManagerContractsParser {
    type Output = ManagerContracts;

    fn entity(&self) -> Entity {
        Entity::ManagerContracts
    }

    fn id(&self) -> &str {
        &self.manager_id
    }

    fn page_url(&self, site: &SiteUrls) -> String {
        site.manager_contracts(&self.manager_id)
    }

    fn parse(&self, input: ParseInput<'_>) -> ManagerContracts {
        let fields = input.fields(Layout::Default);

        let contracts = collect_rows(
            fields
                .elements(Field::Rows)
                .into_iter()
                .map(|row| self.contract_row(&fields, row)),
        );

        ManagerContracts {
            id: self.manager_id.clone(),
            contracts,
            updated_at: Utc::now(),
        }
    }
}

impl ManagerContractsParser {
    fn contract_row<'a>(
        &self,
        fields: &Fields<'a>,
        row: ElementRef<'a>,
    ) -> Result<ManagerContract, RowError> {
        let club_id = required(
            "club.id",
            fields
                .first_within(row, Field::ClubUrl)
                .and_then(|href| entity_id(&href)),
        )?;
        let start_text = fields.first_within(row, Field::StartDate).unwrap_or_default();
        let start_date = station_date(&start_text).ok_or(RowError::Malformed {
            field: "startDate",
            value: start_text,
        })?;

        Ok(ManagerContract {
            id: self.manager_id.clone(),
            club: ManagerContractClub {
                id: club_id,
                name: fields.first_within(row, Field::ClubName).unwrap_or_default(),
            },
            role: fields.first_within(row, Field::Role).unwrap_or_default(),
            start_date,
            end_date: fields
                .first_within(row, Field::EndDate)
                .and_then(|text| station_date(&text)),
        })
    }
}

/// Reads "24/25 (May 29, 2024)" and "expected Jun 30, 2027" cells.
fn station_date(cell: &str) -> Option<NaiveDate> {
    let text = match cell.split_once("expected") {
        Some((_, rest)) => rest,
        None => cell
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map_or(cell, |(inner, _)| inner),
    };
    parse_date(Some(text.trim()))
}
