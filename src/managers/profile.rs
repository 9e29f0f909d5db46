use chrono::Utc;

use crate::extractor::normalize::{entity_id, non_blank, parse_date, parse_int, split_dob_age, split_list};
use crate::extractor::{Entity, Field, Fields, Layout};
use crate::managers::dtos::{ManagerClub, ManagerPlaceOfBirth, ManagerProfile, PlayerProfile};
use crate::scrape::{EntityParser, ParseInput, SiteUrls};

pub struct ManagerProfileParser {
    pub manager_id: String,
}

impl ManagerProfileParser {
    pub fn new(manager_id: impl Into<String>) -> Self {
        Self {
            manager_id: manager_id.into(),
        }
    }
}

impl EntityParser for ManagerProfileParser {
    type Output = ManagerProfile;

    fn entity(&self) -> Entity {
        Entity::ManagerProfile
    }

    fn id(&self) -> &str {
        &self.manager_id
    }

    fn page_url(&self, site: &SiteUrls) -> String {
        site.manager_profile(&self.manager_id)
    }

    fn parse(&self, input: ParseInput<'_>) -> ManagerProfile {
        let fields = input.fields(Layout::Default);

        let name = format!(
            "{} {}",
            fields.first(Field::NameFirst).unwrap_or_default(),
            fields.first(Field::NameLast).unwrap_or_default()
        )
        .trim()
        .to_string();
        let (dob, age) = split_dob_age(fields.first(Field::DobAge).as_deref());

        ManagerProfile {
            id: self.manager_id.clone(),
            url: fields
                .first(Field::ProfileUrl)
                .unwrap_or_else(|| input.site.manager_profile(&self.manager_id)),
            name,
            full_name: full_name(&fields),
            image_url: fields.first(Field::ImageUrl),
            date_of_birth: parse_date(dob.as_deref()),
            place_of_birth: ManagerPlaceOfBirth {
                city: fields.first(Field::BirthCity),
                country: fields.first(Field::BirthCountry),
            },
            age: parse_int(age.as_deref()),
            citizenship: citizenship(&fields),
            club: club(&fields),
            player_profile: player_profile(&fields, input.site),
            updated_at: Utc::now(),
        }
    }
}

/// Every text node of the headline, including the jersey number when shown.
fn full_name(fields: &Fields<'_>) -> Option<String> {
    let headline = fields.elements(Field::Headline).into_iter().next()?;
    let parts: Vec<&str> = headline
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    non_blank(Some(parts.join(" ")))
}

/// Countries written out in the text plus those only shown as flags.
fn citizenship(fields: &Fields<'_>) -> Vec<String> {
    let mut countries = split_list(fields.first(Field::Citizenship).as_deref());
    for cell in fields.elements(Field::Citizenship) {
        countries.extend(fields.within(cell, Field::CitizenshipFlag));
    }

    let mut seen = Vec::with_capacity(countries.len());
    for country in countries {
        if !seen.contains(&country) {
            seen.push(country);
        }
    }
    seen
}

fn club(fields: &Fields<'_>) -> Option<ManagerClub> {
    let name = fields.first(Field::ClubName)?;
    let id = fields.first(Field::ClubUrl).and_then(|href| entity_id(&href))?;

    Some(ManagerClub {
        id,
        name,
        role: fields.first(Field::ClubRole),
        start_date: parse_date(fields.first(Field::ClubStart).as_deref()),
        end_date: parse_date(fields.first(Field::ClubEnd).as_deref()),
    })
}

fn player_profile(fields: &Fields<'_>, site: &SiteUrls) -> Option<PlayerProfile> {
    let href = fields.first(Field::PlayerUrl)?;
    let id = entity_id(&href)?;
    let retired_since = parse_date(fields.first(Field::RetiredOn).as_deref());

    Some(PlayerProfile {
        id,
        url: site.absolute(&href),
        retired: retired_since.is_some(),
        retired_since,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{MockPageFetcher, PageResponse};
    use crate::scrape::{ScrapeError, Scraper};
    use chrono::NaiveDate;
    use std::fs;
    use std::sync::Arc;
    use url::Url;

    fn scraper_serving(html: String) -> Scraper {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_fetch_page().returning(move |url| {
            Ok(PageResponse::from_html(Url::parse(url).unwrap(), html.clone()))
        });
        Scraper::new(Arc::new(fetcher), SiteUrls::new("https://tm.test"))
    }

    #[tokio::test]
    async fn test_parse_manager_profile() {
        let html = fs::read_to_string("tests/fixtures/manager_profile.html")
            .expect("Failed to read test fixture");

        let profile = scraper_serving(html)
            .retrieve(&ManagerProfileParser::new("9233"))
            .await
            .unwrap();

        assert_eq!(profile.id, "9233");
        assert_eq!(
            profile.url,
            "https://www.transfermarkt.com/vincent-kompany/profil/trainer/9233"
        );
        assert_eq!(profile.name, "Vincent Kompany");
        assert_eq!(profile.full_name.as_deref(), Some("Vincent Kompany"));
        assert_eq!(
            profile.image_url.as_deref(),
            Some("https://img.test/portrait/header/9233-1.jpg")
        );
        assert_eq!(profile.date_of_birth, NaiveDate::from_ymd_opt(1986, 4, 10));
        assert_eq!(profile.age, Some(38));
        assert_eq!(
            profile.place_of_birth,
            ManagerPlaceOfBirth {
                city: Some("Uccle".into()),
                country: Some("Belgium".into()),
            }
        );
        assert_eq!(profile.citizenship, vec!["Belgium", "DR Congo"]);

        assert_eq!(
            profile.club,
            Some(ManagerClub {
                id: "27".into(),
                name: "Bayern Munich".into(),
                role: Some("Manager".into()),
                start_date: NaiveDate::from_ymd_opt(2024, 5, 29),
                end_date: NaiveDate::from_ymd_opt(2027, 6, 30),
            })
        );
        assert_eq!(
            profile.player_profile,
            Some(PlayerProfile {
                id: "9594".into(),
                url: "https://tm.test/vincent-kompany/profil/spieler/9594".into(),
                retired: true,
                retired_since: NaiveDate::from_ymd_opt(2020, 7, 1),
            })
        );
    }

    #[tokio::test]
    async fn test_manager_without_club_or_playing_career() {
        let html = r#"<html><body>
            <h1 class="data-header__headline-wrapper">Otto <strong>Rehhagel</strong></h1>
        </body></html>"#;

        let profile = scraper_serving(html.to_string())
            .retrieve(&ManagerProfileParser::new("714"))
            .await
            .unwrap();

        assert_eq!(profile.name, "Otto Rehhagel");
        assert_eq!(profile.url, "https://tm.test/-/profil/trainer/714");
        assert!(profile.citizenship.is_empty());
        assert_eq!(profile.club, None);
        assert_eq!(profile.player_profile, None);

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["club"].is_null());
        assert!(json["playerProfile"].is_null());
        assert!(json.get("playerProfile").is_some());
        assert_eq!(json["placeOfBirth"], serde_json::json!({"city": null, "country": null}));
    }

    #[tokio::test]
    async fn test_unknown_manager_is_not_found() {
        let err = scraper_serving("<html><body><h1>Oops</h1></body></html>".to_string())
            .retrieve(&ManagerProfileParser::new("0"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::NotFound { entity: Entity::ManagerProfile, .. }));
        assert_eq!(err.to_string(), "manager 0 not found");
    }
}
