use chrono::Utc;
use scraper::ElementRef;

use crate::clubs::dtos::{ClubManager, ClubManagers};
use crate::extractor::normalize::{
    entity_id, non_blank, parse_date, parse_days, parse_float, parse_int,
};
use crate::extractor::{Entity, Field, Fields, Layout, RowError, collect_rows, required};
use crate::scrape::{EntityParser, ParseInput, SiteUrls};

pub struct ClubManagersParser {
    pub club_id: String,
}

impl ClubManagersParser {
    pub fn new(club_id: impl Into<String>) -> Self {
        Self {
            club_id: club_id.into(),
        }
    }
}

impl EntityParser for ClubManagersParser {
    type Output = ClubManagers;

    fn entity(&self) -> Entity {
        Entity::ClubManagers
    }

    fn id(&self) -> &str {
        &self.club_id
    }

    fn page_url(&self, site: &SiteUrls) -> String {
        site.club_managers(&self.club_id)
    }

    fn parse(&self, input: ParseInput<'_>) -> ClubManagers {
        let fields = input.fields(Layout::Default);

        let managers = collect_rows(
            fields
                .elements(Field::Rows)
                .into_iter()
                .map(|row| manager_row(&fields, row)),
        );

        ClubManagers {
            id: self.club_id.clone(),
            managers,
            updated_at: Utc::now(),
        }
    }
}

fn manager_row<'a>(fields: &Fields<'a>, row: ElementRef<'a>) -> Result<ClubManager, RowError> {
    let name = required("name", fields.first_within(row, Field::Name))?;
    let id = required(
        "id",
        fields
            .first_within(row, Field::ProfileUrl)
            .and_then(|href| entity_id(&href)),
    )?;
    let cell = |field| fields.first_within(row, field);

    Ok(ClubManager {
        id,
        name,
        nationality: non_blank(Some(fields.within(row, Field::Nationality).join("; "))),
        start_date: parse_date(cell(Field::Appointed).as_deref()),
        end_date: parse_date(cell(Field::EndDate).as_deref()),
        time_in_office: parse_days(cell(Field::TimeInPost).as_deref()),
        games: parse_int(cell(Field::Matches).as_deref()),
        points_per_game: parse_float(cell(Field::PointsPerGame).as_deref()),
    })
}
