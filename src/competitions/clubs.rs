use chrono::Utc;

use crate::competitions::dtos::{CompetitionClub, CompetitionClubs};
use crate::extractor::normalize::{entity_id, path_param};
use crate::extractor::{Assembler, Entity, Field, Fields, Layout, required};
use crate::scrape::{EntityParser, ParseInput, SiteUrls};

/// Participants of a league season or a cup edition.
pub struct CompetitionClubsParser {
    pub competition_id: String,
    pub season_id: Option<String>,
    pub is_knockout: bool,
}

impl CompetitionClubsParser {
    pub fn new(
        competition_id: impl Into<String>,
        season_id: Option<String>,
        is_knockout: bool,
    ) -> Self {
        Self {
            competition_id: competition_id.into(),
            season_id,
            is_knockout,
        }
    }

    fn layout(&self) -> Layout {
        if self.is_knockout {
            Layout::Knockout
        } else {
            Layout::League
        }
    }
}

impl EntityParser for CompetitionClubsParser {
    type Output = CompetitionClubs;

    fn entity(&self) -> Entity {
        Entity::CompetitionClubs
    }

    fn id(&self) -> &str {
        &self.competition_id
    }

    fn page_url(&self, site: &SiteUrls) -> String {
        let season = self.season_id.as_deref();
        if self.is_knockout {
            site.knockout_clubs(&self.competition_id, season)
        } else {
            site.competition_clubs(&self.competition_id, season)
        }
    }

    fn probe_layout(&self) -> Layout {
        self.layout()
    }

    fn parse(&self, input: ParseInput<'_>) -> CompetitionClubs {
        let fields = input.fields(self.layout());

        let season_id = self.season_id.clone().or_else(|| season_from_page(&fields));

        CompetitionClubs {
            id: self.competition_id.clone(),
            name: fields.first(Field::Name).unwrap_or_default(),
            season_id,
            is_knockout: self.is_knockout,
            clubs: clubs(&fields),
            updated_at: Utc::now(),
        }
    }
}

fn season_from_page(fields: &Fields<'_>) -> Option<String> {
    fields.first(Field::SeasonId).or_else(|| {
        fields
            .first(Field::SeasonLink)
            .and_then(|href| path_param(&href, "saison_id"))
    })
}

fn clubs(fields: &Fields<'_>) -> Vec<CompetitionClub> {
    let urls = fields.all_keep_blank(Field::ClubUrls);
    let names = fields.all_keep_blank(Field::ClubNames);

    Assembler::new()
        .column("url", &urls)
        .column("name", &names)
        .build(|i| {
            Ok(CompetitionClub {
                id: required("id", entity_id(&urls[i]))?,
                name: required("name", Some(names[i].clone()))?,
            })
        })
}
