//! Per-layout selector tables.
//!
//! Every entity type is extracted with one `SelectorSet`, keyed by entity and
//! layout variant. The tables are plain constants compiled once into the
//! process-wide `catalog()` and never mutated afterwards.

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use tracing::warn;

use crate::extractor::query::{
    CatalogError, Query, QueryDef, attr, leading_text, own_text, text,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    ClubProfile,
    ClubPlayers,
    ClubManagers,
    CompetitionClubs,
    ManagerProfile,
    ManagerContracts,
    PlayerTransfers,
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Entity::ClubProfile | Entity::ClubPlayers | Entity::ClubManagers => "club",
            Entity::CompetitionClubs => "competition",
            Entity::ManagerProfile | Entity::ManagerContracts => "manager",
            Entity::PlayerTransfers => "player",
        };
        f.write_str(kind)
    }
}

/// Structurally different renderings of the same entity page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Default,
    /// Roster of the running season.
    Present,
    /// Historical roster, with a "Current club" column.
    Past,
    /// National team roster.
    National,
    League,
    Knockout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // page header
    Headline,
    ClubName,
    ClubUrl,
    ProfileUrl,
    // club profile
    CrestLink,
    Name,
    OfficialName,
    Crest,
    FoundedOn,
    MarketValue,
    Confederation,
    FifaRanking,
    LeagueUrl,
    LeagueName,
    LeagueCountryFlag,
    LeagueCountryName,
    LeagueTier,
    // rosters
    PastFlag,
    Rows,
    PlayerNames,
    PlayerUrls,
    Positions,
    DobAge,
    NationalityCells,
    Nationality,
    CurrentClub,
    Heights,
    Foots,
    JoinedOn,
    InfoCells,
    Joined,
    Status,
    SignedFromCells,
    SignedFrom,
    Contracts,
    MarketValues,
    InternationalMatches,
    Goals,
    // managers
    Appointed,
    EndDate,
    TimeInPost,
    Matches,
    PointsPerGame,
    NameFirst,
    NameLast,
    ImageUrl,
    BirthCity,
    BirthCountry,
    Citizenship,
    CitizenshipFlag,
    ClubRole,
    ClubStart,
    ClubEnd,
    PlayerUrl,
    RetiredOn,
    Role,
    StartDate,
    // competitions
    SeasonId,
    SeasonLink,
    ClubUrls,
    ClubNames,
    // players
    YouthClubs,
}

/// A field with its primary query and, for brittle fields, a fallback tried
/// only when the primary matches nothing.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub field: Field,
    pub primary: QueryDef,
    pub fallback: Option<QueryDef>,
}

const fn field(field: Field, primary: QueryDef) -> FieldDef {
    FieldDef {
        field,
        primary,
        fallback: None,
    }
}

impl FieldDef {
    const fn or(mut self, fallback: QueryDef) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutDef {
    pub entity: Entity,
    pub layout: Layout,
    /// Existence probe: no match means the entity does not exist.
    pub marker: Field,
    pub groups: &'static [&'static [FieldDef]],
}

/// Cell `n` of a roster table row.
macro_rules! roster_cell {
    ($n:literal) => {
        concat!("div#yw1 table.items > tbody > tr > td:nth-child(", $n, ")")
    };
    ($n:literal, $rest:literal) => {
        concat!(
            "div#yw1 table.items > tbody > tr > td:nth-child(",
            $n,
            ") ",
            $rest
        )
    };
}

macro_rules! national_cell {
    ($n:literal) => {
        concat!("table.items > tbody > tr > td:nth-child(", $n, ")")
    };
    ($n:literal, $rest:literal) => {
        concat!("table.items > tbody > tr > td:nth-child(", $n, ") ", $rest)
    };
}

const CLUB_PROFILE: &[FieldDef] = &[
    field(Field::CrestLink, attr("div.datenfakten-wappen a", "href")),
    field(Field::Name, text("header h1")).or(text("h1.data-header__headline-wrapper")),
    field(
        Field::OfficialName,
        text("td").labelled("tr", "Official club name:"),
    ),
    field(Field::Crest, attr("div.datenfakten-wappen img", "src")),
    field(Field::FoundedOn, text("td").labelled("tr", "Founded:")),
    field(
        Field::MarketValue,
        leading_text("a.data-header__market-value-wrapper", 3),
    ),
    field(
        Field::Confederation,
        text("span").labelled("li", "Confederation:"),
    ),
    field(
        Field::FifaRanking,
        text("span a").labelled("li", "FIFA World Ranking:"),
    ),
    field(Field::LeagueUrl, attr("span[itemprop='affiliation'] a", "href")),
    field(Field::LeagueName, text("span[itemprop='affiliation'] a")),
    field(
        Field::LeagueCountryFlag,
        attr("div.data-header__club-info img.flaggenrahmen", "data-src"),
    )
    .or(attr("div.data-header__club-info img.flaggenrahmen", "src")),
    field(
        Field::LeagueCountryName,
        attr("div.data-header__club-info img.flaggenrahmen", "title"),
    ),
    field(
        Field::LeagueTier,
        text("span.data-header__content a").labelled("span.data-header__label", "League level:"),
    ),
];

const ROSTER_COMMON: &[FieldDef] = &[
    field(Field::ClubName, text("header h1")).or(text("h1.data-header__headline-wrapper")),
    field(Field::ClubUrl, attr("li#overview a", "href")),
    field(Field::PastFlag, text("div#yw1 table thead th")),
    field(
        Field::PlayerNames,
        text("td.posrela table.inline-table td.hauptlink a"),
    ),
    field(
        Field::PlayerUrls,
        attr("td.posrela table.inline-table td.hauptlink a", "href"),
    ),
    field(
        Field::Positions,
        text("td.posrela table.inline-table tr:nth-child(2) td"),
    ),
    field(Field::DobAge, text(roster_cell!(3))),
    field(Field::NationalityCells, text(roster_cell!(4))),
    field(Field::Nationality, attr("img", "title")),
    field(Field::InfoCells, text("td.posrela")),
    field(Field::Joined, attr("span > [title]", "title")),
    field(Field::Status, attr("td.hauptlink span[title]", "title")),
    field(Field::SignedFrom, attr("a img", "title")),
    field(Field::MarketValues, text("td.rechts.hauptlink")),
];

const ROSTER_PRESENT: &[FieldDef] = &[
    field(Field::Heights, text(roster_cell!(5))),
    field(Field::Foots, text(roster_cell!(6))),
    field(Field::JoinedOn, text(roster_cell!(7))),
    field(Field::SignedFromCells, text(roster_cell!(8))),
    field(Field::Contracts, text(roster_cell!(9))),
];

const ROSTER_PAST: &[FieldDef] = &[
    field(Field::CurrentClub, attr(roster_cell!(5, "img"), "title")),
    field(Field::Heights, text(roster_cell!(6))),
    field(Field::Foots, text(roster_cell!(7))),
    field(Field::JoinedOn, text(roster_cell!(8))),
    field(Field::SignedFromCells, text(roster_cell!(9))),
];

const ROSTER_NATIONAL: &[FieldDef] = &[
    field(Field::ClubName, text("h1.data-header__headline-wrapper")).or(text("header h1")),
    field(Field::ClubUrl, attr("li#overview a", "href")),
    field(Field::Rows, text("table.items > tbody > tr")),
    field(
        Field::PlayerNames,
        text("table.items table.inline-table td.hauptlink a"),
    ),
    field(
        Field::PlayerUrls,
        attr("table.items table.inline-table td.hauptlink a", "href"),
    ),
    field(
        Field::Positions,
        text("table.items table.inline-table tr:nth-child(2) td"),
    ),
    field(Field::DobAge, text(national_cell!(3))),
    field(Field::CurrentClub, attr(national_cell!(4, "a"), "title")),
    field(Field::Heights, text(national_cell!(5))),
    field(Field::Foots, text(national_cell!(6))),
    field(Field::InternationalMatches, text(national_cell!(7))),
    field(Field::Goals, text(national_cell!(8))),
    // relative to a row
    field(Field::JoinedOn, own_text("td:nth-child(9)")),
    field(Field::MarketValues, text(national_cell!(10))),
    field(
        Field::Status,
        attr("span.verletzt-table, span.kapitaenicon-table", "title"),
    ),
];

const CLUB_MANAGERS: &[FieldDef] = &[
    field(Field::ClubName, text("header h1")).or(text("h1.data-header__headline-wrapper")),
    field(Field::Rows, text("table.items > tbody > tr")),
    // relative to a row
    field(Field::Name, text("td.hauptlink > a")),
    field(Field::ProfileUrl, attr("td.hauptlink > a", "href")),
    field(
        Field::Nationality,
        attr("td.zentriert", "title").nth(0).then("img"),
    ),
    field(Field::Appointed, text("td.zentriert").nth(1)),
    field(Field::EndDate, text("td.zentriert").nth(2)),
    field(Field::TimeInPost, text("td.rechts")),
    field(Field::Matches, text("td.zentriert").nth(3).then("a")),
    field(Field::PointsPerGame, text("td.zentriert").nth(4)),
];

const COMPETITION_COMMON: &[FieldDef] = &[
    field(
        Field::SeasonId,
        attr("select[name='saison_id'] option[selected]", "value"),
    ),
    field(Field::SeasonLink, attr("a.tm-tab[href*='saison_id']", "href")),
];

const COMPETITION_LEAGUE: &[FieldDef] = &[
    field(Field::Name, text("div.data-header__headline-container h1"))
        .or(text("h1.data-header__headline-wrapper")),
    field(
        Field::ClubUrls,
        attr("td.hauptlink.no-border-links > a:first-of-type", "href"),
    ),
    field(
        Field::ClubNames,
        text("td.hauptlink.no-border-links > a:first-of-type"),
    ),
];

const COMPETITION_KNOCKOUT: &[FieldDef] = &[
    field(Field::Name, text("div[class*='data-header__headline-wrapper']")).or(text("header h1")),
    field(
        Field::ClubUrls,
        attr("table.items > tbody > tr > td.hauptlink a", "href"),
    )
    .or(attr("td.links.no-border-links.hauptlink > a", "href")),
    field(
        Field::ClubNames,
        text("table.items > tbody > tr > td.hauptlink a"),
    )
    .or(text("td.links.no-border-links.hauptlink > a")),
];

const MANAGER_PROFILE: &[FieldDef] = &[
    field(Field::Headline, text("h1.data-header__headline-wrapper")),
    field(Field::ProfileUrl, attr("meta[property='og:url']", "content"))
        .or(attr("link[rel='canonical']", "href")),
    field(Field::NameFirst, own_text("h1.data-header__headline-wrapper")),
    field(Field::NameLast, text("h1.data-header__headline-wrapper strong")),
    field(Field::ImageUrl, attr("img.data-header__profile-image", "src")),
    field(
        Field::DobAge,
        text("span.data-header__content").labelled("li.data-header__label", "Date of birth"),
    ),
    field(
        Field::BirthCity,
        text("span.data-header__content").labelled("li.data-header__label", "Place of birth"),
    ),
    field(
        Field::BirthCountry,
        attr("img.flaggenrahmen", "alt").labelled("li.data-header__label", "Place of birth"),
    ),
    field(
        Field::Citizenship,
        text("span.data-header__content").labelled("li.data-header__label", "Citizenship"),
    ),
    field(Field::CitizenshipFlag, attr("img", "title")),
    field(
        Field::ClubName,
        text("div.data-header__club-info span.data-header__club a"),
    ),
    field(
        Field::ClubUrl,
        attr("div.data-header__box--big a[href*='/verein/']", "href"),
    )
    .or(attr("span.data-header__club a", "href")),
    field(
        Field::ClubRole,
        text("div.data-header__club-info span.data-header__label b"),
    ),
    field(
        Field::ClubStart,
        text("span.data-header__content").labelled("span.data-header__label", "Appointed"),
    ),
    field(
        Field::ClubEnd,
        text("span.data-header__content").labelled("span.data-header__label", "Contract until"),
    ),
    field(Field::PlayerUrl, attr("a.data-header__box--link", "href")),
    field(
        Field::RetiredOn,
        text("span.data-header__content").labelled("span.data-header__label", "Retired"),
    ),
];

const MANAGER_CONTRACTS: &[FieldDef] = &[
    field(Field::Headline, text("h1.data-header__headline-wrapper")).or(text("header h1")),
    field(
        Field::Rows,
        text("table.items")
            .nth(0)
            .then("tbody > tr:not(.extrarow)"),
    ),
    // relative to a row
    field(Field::ClubUrl, attr("td.hauptlink a", "href")),
    field(Field::ClubName, text("td.hauptlink a")),
    field(Field::Role, own_text("td.hauptlink")),
    field(Field::StartDate, text("td:nth-child(3)")),
    field(Field::EndDate, text("td:nth-child(4)")),
];

const PLAYER_TRANSFERS: &[FieldDef] = &[
    field(Field::Headline, text("h1.data-header__headline-wrapper")),
    field(
        Field::YouthClubs,
        text("div.content").labelled("div.box.tm-player-additional-data", "Youth"),
    ),
];

pub const LAYOUTS: &[LayoutDef] = &[
    LayoutDef {
        entity: Entity::ClubProfile,
        layout: Layout::Default,
        marker: Field::CrestLink,
        groups: &[CLUB_PROFILE],
    },
    LayoutDef {
        entity: Entity::ClubPlayers,
        layout: Layout::Present,
        marker: Field::ClubName,
        groups: &[ROSTER_COMMON, ROSTER_PRESENT],
    },
    LayoutDef {
        entity: Entity::ClubPlayers,
        layout: Layout::Past,
        marker: Field::ClubName,
        groups: &[ROSTER_COMMON, ROSTER_PAST],
    },
    LayoutDef {
        entity: Entity::ClubPlayers,
        layout: Layout::National,
        marker: Field::ClubName,
        groups: &[ROSTER_NATIONAL],
    },
    LayoutDef {
        entity: Entity::ClubManagers,
        layout: Layout::Default,
        marker: Field::ClubName,
        groups: &[CLUB_MANAGERS],
    },
    LayoutDef {
        entity: Entity::CompetitionClubs,
        layout: Layout::League,
        marker: Field::Name,
        groups: &[COMPETITION_LEAGUE, COMPETITION_COMMON],
    },
    LayoutDef {
        entity: Entity::CompetitionClubs,
        layout: Layout::Knockout,
        marker: Field::Name,
        groups: &[COMPETITION_KNOCKOUT, COMPETITION_COMMON],
    },
    LayoutDef {
        entity: Entity::ManagerProfile,
        layout: Layout::Default,
        marker: Field::Headline,
        groups: &[MANAGER_PROFILE],
    },
    LayoutDef {
        entity: Entity::ManagerContracts,
        layout: Layout::Default,
        marker: Field::Headline,
        groups: &[MANAGER_CONTRACTS],
    },
    LayoutDef {
        entity: Entity::PlayerTransfers,
        layout: Layout::Default,
        marker: Field::Headline,
        groups: &[PLAYER_TRANSFERS],
    },
];

/// Compiled primary/fallback pair for one field.
#[derive(Debug)]
pub struct FieldQuery {
    pub primary: Query,
    pub fallback: Option<Query>,
}

/// The ordered field queries of one entity layout.
#[derive(Debug)]
pub struct SelectorSet {
    entity: Option<Entity>,
    layout: Option<Layout>,
    marker: Option<Field>,
    fields: Vec<(Field, FieldQuery)>,
}

impl SelectorSet {
    fn empty() -> Self {
        Self {
            entity: None,
            layout: None,
            marker: None,
            fields: Vec::new(),
        }
    }

    fn compile(def: &LayoutDef) -> Result<Self, CatalogError> {
        let mut fields = Vec::new();
        for group in def.groups {
            for field in group.iter() {
                let compiled = FieldQuery {
                    primary: field.primary.compile()?,
                    fallback: field.fallback.map(|q| q.compile()).transpose()?,
                };
                // later groups override earlier ones
                fields.retain(|(existing, _)| *existing != field.field);
                fields.push((field.field, compiled));
            }
        }
        Ok(Self {
            entity: Some(def.entity),
            layout: Some(def.layout),
            marker: Some(def.marker),
            fields,
        })
    }

    pub fn marker(&self) -> Option<Field> {
        self.marker
    }

    pub fn get(&self, field: Field) -> Option<&FieldQuery> {
        self.fields
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, query)| query)
    }

    /// Field queries in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldQuery)> {
        self.fields.iter().map(|(field, query)| (*field, query))
    }
}

#[derive(Debug)]
pub struct SelectorCatalog {
    sets: Vec<SelectorSet>,
    empty: SelectorSet,
}

impl SelectorCatalog {
    pub fn compile(defs: &[LayoutDef]) -> Result<Self, CatalogError> {
        let sets = defs
            .iter()
            .map(SelectorSet::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sets,
            empty: SelectorSet::empty(),
        })
    }

    /// The selector set for `entity` rendered with `layout`. Unregistered
    /// combinations get an empty set, whose missing marker reads as
    /// "not found".
    pub fn layout(&self, entity: Entity, layout: Layout) -> &SelectorSet {
        self.sets
            .iter()
            .find(|set| set.entity == Some(entity) && set.layout == Some(layout))
            .unwrap_or_else(|| {
                warn!(?entity, ?layout, "no selector set registered");
                &self.empty
            })
    }
}

static CATALOG: LazyLock<SelectorCatalog> = LazyLock::new(|| {
    SelectorCatalog::compile(LAYOUTS).expect("Failed to compile selector catalog")
});

/// Process-wide compiled catalog.
pub fn catalog() -> &'static SelectorCatalog {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_layout_compiles() {
        let catalog = SelectorCatalog::compile(LAYOUTS).unwrap();
        assert_eq!(catalog.sets.len(), LAYOUTS.len());
    }

    #[test]
    fn every_marker_has_a_query() {
        for def in LAYOUTS {
            let set = catalog().layout(def.entity, def.layout);
            assert!(
                set.get(def.marker).is_some(),
                "{:?}/{:?} marker {:?} has no query",
                def.entity,
                def.layout,
                def.marker
            );
        }
    }

    #[test]
    fn later_groups_override_common_fields() {
        let present = catalog().layout(Entity::ClubPlayers, Layout::Present);
        let past = catalog().layout(Entity::ClubPlayers, Layout::Past);
        let css = |set: &SelectorSet| set.get(Field::Heights).unwrap().primary.def().css;
        assert!(css(present).ends_with("td:nth-child(5)"));
        assert!(css(past).ends_with("td:nth-child(6)"));
        assert!(present.get(Field::CurrentClub).is_none());
        assert_eq!(
            present.fields().filter(|(f, _)| *f == Field::MarketValues).count(),
            1
        );
    }

    #[test]
    fn knockout_clubs_have_fallbacks() {
        let set = catalog().layout(Entity::CompetitionClubs, Layout::Knockout);
        assert!(set.get(Field::ClubUrls).unwrap().fallback.is_some());
        let league = catalog().layout(Entity::CompetitionClubs, Layout::League);
        assert!(league.get(Field::ClubUrls).unwrap().fallback.is_none());
    }

    #[test]
    fn unknown_layout_is_empty() {
        let set = catalog().layout(Entity::ClubProfile, Layout::Knockout);
        assert!(set.marker().is_none());
        assert_eq!(set.fields().count(), 0);
    }
}
