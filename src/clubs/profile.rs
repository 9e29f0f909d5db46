use crate::clubs::dtos::{ClubLeague, ClubProfile};
use crate::extractor::normalize::{entity_id, flag_country_id, parse_date, parse_int};
use crate::extractor::{Entity, Field, Layout};
use crate::scrape::{EntityParser, ParseInput, SiteUrls};

pub struct ClubProfileParser {
    pub club_id: String,
}

impl ClubProfileParser {
    pub fn new(club_id: impl Into<String>) -> Self {
        Self {
            club_id: club_id.into(),
        }
    }
}

impl EntityParser for ClubProfileParser {
    type Output = ClubProfile;

    fn entity(&self) -> Entity {
        Entity::ClubProfile
    }

    fn id(&self) -> &str {
        &self.club_id
    }

    fn page_url(&self, site: &SiteUrls) -> String {
        site.club_profile(&self.club_id)
    }

    fn parse(&self, input: ParseInput<'_>) -> ClubProfile {
        let fields = input.fields(Layout::Default);

        let url = fields
            .first(Field::CrestLink)
            .map(|href| input.site.absolute(&href))
            .unwrap_or_else(|| input.site.club_profile(&self.club_id));
        let confederation = fields.first(Field::Confederation);

        ClubProfile {
            id: self.club_id.clone(),
            url,
            name: fields.first(Field::Name).unwrap_or_default(),
            official_name: fields.first(Field::OfficialName),
            image: fields
                .first(Field::Crest)
                .and_then(|src| src.split('?').next().map(str::to_string)),
            founded_on: parse_date(fields.first(Field::FoundedOn).as_deref()),
            current_market_value: parse_int(fields.first(Field::MarketValue).as_deref()),
            is_national: confederation.is_some(),
            confederation,
            fifa_world_ranking: fields
                .first(Field::FifaRanking)
                .map(|rank| rank.replace("Pos", "").trim().to_string())
                .filter(|rank| !rank.is_empty()),
            league: ClubLeague {
                id: fields.first(Field::LeagueUrl).and_then(|href| entity_id(&href)),
                name: fields.first(Field::LeagueName),
                country_id: fields
                    .first(Field::LeagueCountryFlag)
                    .and_then(|src| flag_country_id(&src)),
                country_name: fields.first(Field::LeagueCountryName),
                tier: fields.first(Field::LeagueTier),
            },
        }
    }
}
