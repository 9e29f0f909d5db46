use std::fs;

use crate::extractor::normalize::{entity_id, parse_height, parse_int};
use crate::extractor::{Entity, Field, Layout, Page, catalog};

fn fixture(name: &str) -> Page {
    let html = fs::read_to_string(format!("tests/fixtures/{}", name))
        .expect("Failed to read test fixture");
    Page::parse(&html)
}

#[test]
fn test_profile_fields_from_fixture() {
    let page = fixture("club_profile.html");
    let fields = page.fields(catalog().layout(Entity::ClubProfile, Layout::Default));

    assert!(fields.has_marker());
    assert_eq!(fields.first(Field::Name).as_deref(), Some("FC Bayern München"));
    // label row lookup
    assert_eq!(fields.first(Field::FoundedOn).as_deref(), Some("Feb 27, 1900"));
    assert_eq!(fields.first(Field::Confederation), None);
}

#[test]
fn test_marker_absent_on_other_entity_page() {
    let page = fixture("competition_clubs.html");
    let fields = page.fields(catalog().layout(Entity::ClubProfile, Layout::Default));
    assert!(!fields.has_marker());
}

#[test]
fn test_blank_cells_keep_column_alignment() {
    let page = fixture("club_players.html");
    let fields = page.fields(catalog().layout(Entity::ClubPlayers, Layout::Present));

    let heights = fields.all_keep_blank(Field::Heights);
    assert_eq!(heights, vec!["1,93m", "1,77m", ""]);
    assert_eq!(fields.all(Field::Heights).len(), 2);

    let parsed: Vec<Option<i64>> = heights.iter().map(|h| parse_height(Some(h))).collect();
    assert_eq!(parsed, vec![Some(193), Some(177), None]);
}

#[test]
fn test_row_scoped_values() {
    let page = fixture("club_players.html");
    let fields = page.fields(catalog().layout(Entity::ClubPlayers, Layout::Present));

    let cells = fields.elements(Field::NationalityCells);
    assert_eq!(cells.len(), 3);
    assert_eq!(fields.within(cells[2], Field::Nationality), vec!["Germany", "Albania"]);
    assert_eq!(fields.first_within(cells[0], Field::Nationality).as_deref(), Some("Germany"));
}

#[test]
fn test_fallback_query_used_when_primary_is_empty() {
    let page = fixture("competition_knockout.html");
    let fields = page.fields(catalog().layout(Entity::CompetitionClubs, Layout::Knockout));

    let ids: Vec<String> = fields
        .all(Field::ClubUrls)
        .iter()
        .filter_map(|href| entity_id(href))
        .collect();
    assert_eq!(ids, vec!["27", "15", "39"]);
    assert_eq!(fields.elements(Field::ClubNames).len(), 3);
}

#[test]
fn test_primary_query_wins_over_fallback() {
    let html = r#"<html><body>
        <header><h1>Header name</h1></header>
        <h1 class="data-header__headline-wrapper">Headline name</h1>
    </body></html>"#;
    let page = Page::parse(html);
    let fields = page.fields(catalog().layout(Entity::ClubProfile, Layout::Default));

    assert_eq!(fields.all(Field::Name), vec!["Header name"]);
}

#[test]
fn test_field_missing_from_set_is_empty() {
    let page = fixture("club_managers.html");
    let fields = page.fields(catalog().layout(Entity::ClubManagers, Layout::Default));

    assert!(fields.all(Field::YouthClubs).is_empty());
    assert_eq!(fields.first(Field::Crest), None);
}

#[test]
fn test_money_cells_from_fixture() {
    let page = fixture("club_players.html");
    let fields = page.fields(catalog().layout(Entity::ClubPlayers, Layout::Present));

    let values: Vec<Option<i64>> = fields
        .all_keep_blank(Field::MarketValues)
        .iter()
        .map(|v| parse_int(Some(v)))
        .collect();
    assert_eq!(values, vec![Some(4_000_000), Some(50_000_000), None]);
}

#[cfg(feature = "fuzz")]
mod normalizer_properties {
    use crate::extractor::normalize::{
        parse_date, parse_days, parse_float, parse_height, parse_int, split_dob_age,
    };
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalizers_never_panic(s in "\\PC*") {
            let _ = parse_date(Some(&s));
            let _ = parse_int(Some(&s));
            let _ = parse_float(Some(&s));
            let _ = parse_height(Some(&s));
            let _ = parse_days(Some(&s));
            let _ = split_dob_age(Some(&s));
        }

        #[test]
        fn money_like_text_never_panics(s in "[€+'\" ]{0,2}[0-9,.]{0,12}(k|m|bn|b)?<?") {
            let _ = parse_int(Some(&s));
        }

        #[test]
        fn parse_int_is_idempotent(n in 0i64..i64::MAX) {
            let once = parse_int(Some(&n.to_string()));
            prop_assert_eq!(once, Some(n));
            let twice = parse_int(once.map(|v| v.to_string()).as_deref());
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn parse_days_reads_only_digits(days in 0u32..100_000, unit in "[a-z ]{0,8}") {
            prop_assert_eq!(parse_days(Some(&format!("{} {}", days, unit))), Some(days as i64));
        }
    }
}
