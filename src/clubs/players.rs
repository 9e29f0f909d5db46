use chrono::Utc;
use scraper::ElementRef;

use crate::clubs::dtos::{ClubPlayer, ClubPlayers};
use crate::extractor::normalize::{
    entity_id, non_blank, parse_date, parse_height, parse_int, path_param, split_dob_age,
};
use crate::extractor::{Assembler, Entity, Field, Fields, Layout, required};
use crate::scrape::{EntityParser, ParseInput, SiteUrls};

const NATIONAL_TEAM_DEBUT: &str = "National Team Debut";

pub struct ClubPlayersParser {
    pub club_id: String,
    pub season_id: Option<String>,
    pub is_national: bool,
}

impl ClubPlayersParser {
    pub fn new(club_id: impl Into<String>, season_id: Option<String>, is_national: bool) -> Self {
        Self {
            club_id: club_id.into(),
            season_id: season_id.filter(|s| !s.trim().is_empty()),
            is_national,
        }
    }
}

impl EntityParser for ClubPlayersParser {
    type Output = ClubPlayers;

    fn entity(&self) -> Entity {
        Entity::ClubPlayers
    }

    fn id(&self) -> &str {
        &self.club_id
    }

    fn page_url(&self, site: &SiteUrls) -> String {
        site.club_players(&self.club_id, self.season_id.as_deref())
    }

    fn probe_layout(&self) -> Layout {
        if self.is_national {
            Layout::National
        } else {
            Layout::Present
        }
    }

    fn parse(&self, input: ParseInput<'_>) -> ClubPlayers {
        let probe = input.fields(self.probe_layout());
        let season_id = self.season_id.clone().or_else(|| {
            probe
                .first(Field::ClubUrl)
                .and_then(|href| path_param(&href, "saison_id"))
        });

        let players = if self.is_national {
            national_players(probe)
        } else {
            let past = probe
                .all(Field::PastFlag)
                .iter()
                .any(|header| header.contains("Current club"));
            let layout = if past { Layout::Past } else { Layout::Present };
            club_players(input.fields(layout), past)
        };

        ClubPlayers {
            id: self.club_id.clone(),
            season_id,
            is_national: self.is_national,
            players,
            updated_at: Utc::now(),
        }
    }
}

/// Per-cell values of `field`, joined with "; ".
fn joined_within<'a>(fields: &Fields<'a>, cells: &[ElementRef<'a>], field: Field) -> Vec<Option<String>> {
    cells
        .iter()
        .map(|cell| non_blank(Some(fields.within(*cell, field).join("; "))))
        .collect()
}

fn club_players(fields: Fields<'_>, past: bool) -> Vec<ClubPlayer> {
    let urls = fields.all_keep_blank(Field::PlayerUrls);
    let names = fields.all_keep_blank(Field::PlayerNames);
    let positions = fields.all_keep_blank(Field::Positions);
    let dob_ages = fields.all_keep_blank(Field::DobAge);
    let nationalities: Vec<Vec<String>> = fields
        .elements(Field::NationalityCells)
        .into_iter()
        .map(|cell| fields.within(cell, Field::Nationality))
        .collect();
    let current_clubs: Vec<Option<String>> = if past {
        fields
            .all_keep_blank(Field::CurrentClub)
            .into_iter()
            .map(Some)
            .collect()
    } else {
        vec![None; urls.len()]
    };
    let heights = fields.all_keep_blank(Field::Heights);
    let foots = fields.all_keep_blank(Field::Foots);
    let joined_on = fields.all_keep_blank(Field::JoinedOn);
    let info_cells = fields.elements(Field::InfoCells);
    let joined = joined_within(&fields, &info_cells, Field::Joined);
    let statuses = joined_within(&fields, &info_cells, Field::Status);
    let signed_from = joined_within(&fields, &fields.elements(Field::SignedFromCells), Field::SignedFrom);
    let contracts: Vec<Option<String>> = if past {
        vec![None; urls.len()]
    } else {
        fields
            .all_keep_blank(Field::Contracts)
            .into_iter()
            .map(Some)
            .collect()
    };
    let market_values = fields.all_keep_blank(Field::MarketValues);

    Assembler::new()
        .column("id", &urls)
        .column("name", &names)
        .column("position", &positions)
        .column("dateOfBirth", &dob_ages)
        .column("nationality", &nationalities)
        .column("currentClub", &current_clubs)
        .column("height", &heights)
        .column("foot", &foots)
        .column("joinedOn", &joined_on)
        .column("joined", &joined)
        .column("signedFrom", &signed_from)
        .column("contract", &contracts)
        .column("marketValue", &market_values)
        .column("status", &statuses)
        .build(|i| {
            let (dob, age) = split_dob_age(Some(&dob_ages[i]));
            Ok(ClubPlayer {
                id: required("id", entity_id(&urls[i]))?,
                name: required("name", Some(names[i].clone()))?,
                position: positions[i].clone(),
                date_of_birth: parse_date(dob.as_deref()),
                age: parse_int(age.as_deref()),
                nationality: nationalities[i].clone(),
                current_club: non_blank(current_clubs[i].clone()),
                height: parse_height(Some(&heights[i])),
                foot: non_blank(Some(foots[i].clone())).filter(|f| f != "-"),
                international_matches: None,
                goals: None,
                joined_on: parse_date(Some(&joined_on[i])),
                joined: joined[i].clone(),
                signed_from: signed_from[i].clone(),
                contract: parse_date(contracts[i].as_deref()),
                market_value: parse_int(Some(&market_values[i])),
                status: statuses[i].clone(),
            })
        })
}

fn national_players(fields: Fields<'_>) -> Vec<ClubPlayer> {
    let rows = fields.elements(Field::Rows);
    let urls = fields.all_keep_blank(Field::PlayerUrls);
    let names = fields.all_keep_blank(Field::PlayerNames);
    let positions = fields.all_keep_blank(Field::Positions);
    let dob_ages = fields.all_keep_blank(Field::DobAge);
    let current_clubs = fields.all_keep_blank(Field::CurrentClub);
    let heights = fields.all_keep_blank(Field::Heights);
    let foots = fields.all_keep_blank(Field::Foots);
    let matches = fields.all_keep_blank(Field::InternationalMatches);
    let goals = fields.all_keep_blank(Field::Goals);
    let debuts: Vec<Option<String>> = rows
        .iter()
        .map(|row| fields.first_within(*row, Field::JoinedOn))
        .collect();
    let market_values = fields.all_keep_blank(Field::MarketValues);
    let statuses = joined_within(&fields, &rows, Field::Status);

    Assembler::new()
        .column("id", &urls)
        .column("name", &names)
        .column("position", &positions)
        .column("dateOfBirth", &dob_ages)
        .column("currentClub", &current_clubs)
        .column("height", &heights)
        .column("foot", &foots)
        .column("internationalMatches", &matches)
        .column("goals", &goals)
        .column("joinedOn", &debuts)
        .column("marketValue", &market_values)
        .column("status", &statuses)
        .build(|i| {
            let (dob, age) = split_dob_age(Some(&dob_ages[i]));
            Ok(ClubPlayer {
                id: required("id", entity_id(&urls[i]))?,
                name: required("name", Some(names[i].clone()))?,
                position: positions[i].clone(),
                date_of_birth: parse_date(dob.as_deref()),
                age: parse_int(age.as_deref()),
                nationality: Vec::new(),
                current_club: non_blank(Some(current_clubs[i].clone())),
                height: parse_height(Some(&heights[i])),
                foot: non_blank(Some(foots[i].clone())).filter(|f| f != "-"),
                international_matches: parse_int(Some(&matches[i])),
                goals: parse_int(Some(&goals[i])),
                joined_on: parse_date(debuts[i].as_deref()),
                joined: Some(NATIONAL_TEAM_DEBUT.to_string()),
                signed_from: None,
                contract: None,
                market_value: parse_int(Some(&market_values[i])),
                status: statuses[i].clone(),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{MockPageFetcher, PageResponse};
    use crate::scrape::Scraper;
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use std::fs;
    use std::sync::Arc;
    use url::Url;

    fn scraper_serving(expected_url: &'static str, html: String) -> Scraper {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_page()
            .with(eq(expected_url))
            .times(1)
            .returning(move |url| {
                Ok(PageResponse::from_html(Url::parse(url).unwrap(), html.clone()))
            });
        Scraper::new(Arc::new(fetcher), SiteUrls::new("https://tm.test"))
    }

    #[tokio::test]
    async fn test_parse_present_roster() {
        let html = fs::read_to_string("tests/fixtures/club_players.html")
            .expect("Failed to read test fixture");
        let scraper = scraper_serving("https://tm.test/-/kader/verein/27/plus/1", html);

        let roster = scraper
            .retrieve(&ClubPlayersParser::new("27", None, false))
            .await
            .unwrap();

        assert_eq!(roster.id, "27");
        assert_eq!(roster.season_id.as_deref(), Some("2024"));
        assert!(!roster.is_national);
        assert_eq!(roster.players.len(), 3);

        let neuer = &roster.players[0];
        assert_eq!(neuer.id, "17259");
        assert_eq!(neuer.name, "Manuel Neuer");
        assert_eq!(neuer.position, "Goalkeeper");
        assert_eq!(neuer.date_of_birth, NaiveDate::from_ymd_opt(1986, 3, 27));
        assert_eq!(neuer.age, Some(38));
        assert_eq!(neuer.nationality, vec!["Germany"]);
        assert_eq!(neuer.current_club, None);
        assert_eq!(neuer.height, Some(193));
        assert_eq!(neuer.foot.as_deref(), Some("right"));
        assert_eq!(neuer.joined_on, NaiveDate::from_ymd_opt(2011, 7, 1));
        assert_eq!(neuer.signed_from.as_deref(), Some("FC Schalke 04: Ablöse €30.00m"));
        assert_eq!(neuer.contract, NaiveDate::from_ymd_opt(2025, 6, 30));
        assert_eq!(neuer.market_value, Some(4_000_000));
        assert_eq!(neuer.status.as_deref(), Some("Team captain"));

        let youth = &roster.players[2];
        assert_eq!(youth.nationality, vec!["Germany", "Albania"]);
        assert_eq!(youth.height, None);
        assert_eq!(youth.foot, None);
        assert_eq!(youth.contract, None);
        assert_eq!(youth.market_value, None);
        assert_eq!(
            youth.status.as_deref(),
            Some("Cruciate ligament tear - Return unknown")
        );
    }

    #[tokio::test]
    async fn test_parse_past_roster_reads_shifted_columns() {
        let html = r#"<html><body>
            <header><h1>FC Bayern München</h1></header>
            <div id="yw1"><table class="items">
              <thead><tr><th>#</th><th>Player</th><th>Date of birth/Age</th><th>Nat.</th><th>Current club</th><th>Height</th><th>Foot</th><th>Joined</th><th>Signed from</th><th>Market value</th></tr></thead>
              <tbody><tr>
                <td>1</td>
                <td class="posrela"><table class="inline-table">
                  <tr><td></td><td class="hauptlink"><a href="/oliver-kahn/profil/spieler/3066">Oliver Kahn</a></td></tr>
                  <tr><td>Goalkeeper</td></tr>
                </table></td>
                <td>Jun 15, 1969 (31)</td>
                <td><img title="Germany"></td>
                <td><a href="/x"><img title="Retired"></a></td>
                <td>1,88m</td>
                <td>right</td>
                <td>Jul 1, 1994</td>
                <td><a href="/ksc"><img title="Karlsruher SC: Ablöse €2.30m"></a></td>
                <td class="rechts hauptlink">€30.00m</td>
              </tr></tbody>
            </table></div>
        </body></html>"#;
        let scraper = scraper_serving(
            "https://tm.test/-/kader/verein/27/saison_id/2000/plus/1",
            html.to_string(),
        );

        let roster = scraper
            .retrieve(&ClubPlayersParser::new("27", Some("2000".into()), false))
            .await
            .unwrap();

        assert_eq!(roster.season_id.as_deref(), Some("2000"));
        let kahn = &roster.players[0];
        assert_eq!(kahn.current_club.as_deref(), Some("Retired"));
        assert_eq!(kahn.height, Some(188));
        assert_eq!(kahn.foot.as_deref(), Some("right"));
        assert_eq!(kahn.joined_on, NaiveDate::from_ymd_opt(1994, 7, 1));
        assert_eq!(kahn.signed_from.as_deref(), Some("Karlsruher SC: Ablöse €2.30m"));
        assert_eq!(kahn.contract, None);
        assert_eq!(kahn.market_value, Some(30_000_000));
    }

    #[tokio::test]
    async fn test_parse_national_roster() {
        let html = r#"<html><body>
            <h1 class="data-header__headline-wrapper">Germany</h1>
            <ul><li id="overview"><a href="/deutschland/startseite/verein/3262/saison_id/2024">Overview</a></li></ul>
            <table class="items"><tbody>
              <tr>
                <td>1</td>
                <td class="posrela"><table class="inline-table">
                  <tr><td></td><td class="hauptlink"><a href="/marc-andre-ter-stegen/profil/spieler/74857">Marc-André ter Stegen</a><span class="kapitaenicon-table" title="Captain"></span></td></tr>
                  <tr><td>Goalkeeper</td></tr>
                </table></td>
                <td>Apr 30, 1992 (32)</td>
                <td><a title="FC Barcelona" href="/fc-barcelona/startseite/verein/131"><img></a></td>
                <td>1,87m</td>
                <td>right</td>
                <td>44</td>
                <td>0</td>
                <td>May 29, 2012<br><span>vs Switzerland</span></td>
                <td><a href="/mv">€28.00m</a></td>
              </tr>
              <tr>
                <td>2</td>
                <td class="posrela"><table class="inline-table">
                  <tr><td></td><td class="hauptlink"><a href="/antonio-rudiger/profil/spieler/86202">Antonio Rüdiger</a></td></tr>
                  <tr><td>Centre-Back</td></tr>
                </table></td>
                <td>Mar 3, 1993 (31)</td>
                <td><a title="Real Madrid" href="/real-madrid/startseite/verein/418"><img></a></td>
                <td>1,90m</td>
                <td>right</td>
                <td>72</td>
                <td>3</td>
                <td>Mar 5, 2014</td>
                <td><a href="/mv">€25.00m</a></td>
              </tr>
            </tbody></table>
        </body></html>"#;
        let scraper = scraper_serving("https://tm.test/-/kader/verein/3262/plus/1", html.to_string());

        let roster = scraper
            .retrieve(&ClubPlayersParser::new("3262", None, true))
            .await
            .unwrap();

        assert!(roster.is_national);
        assert_eq!(roster.season_id.as_deref(), Some("2024"));
        assert_eq!(roster.players.len(), 2);

        let keeper = &roster.players[0];
        assert_eq!(keeper.name, "Marc-André ter Stegen");
        assert!(keeper.nationality.is_empty());
        assert_eq!(keeper.current_club.as_deref(), Some("FC Barcelona"));
        assert_eq!(keeper.international_matches, Some(44));
        assert_eq!(keeper.goals, Some(0));
        assert_eq!(keeper.joined_on, NaiveDate::from_ymd_opt(2012, 5, 29));
        assert_eq!(keeper.joined.as_deref(), Some("National Team Debut"));
        assert_eq!(keeper.signed_from, None);
        assert_eq!(keeper.market_value, Some(28_000_000));
        assert_eq!(keeper.status.as_deref(), Some("Captain"));
        assert_eq!(roster.players[1].status, None);
    }
}
