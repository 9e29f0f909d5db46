/// Page URLs on the scraped site, rooted at a configurable base.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: String,
}

impl SiteUrls {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolves a site-relative href; absolute URLs pass through.
    pub fn absolute(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.base, href)
        } else {
            format!("{}/{}", self.base, href)
        }
    }

    pub fn club_profile(&self, club_id: &str) -> String {
        format!("{}/-/datenfakten/verein/{}", self.base, club_id)
    }

    /// Roster page; without a season the site shows the running one.
    pub fn club_players(&self, club_id: &str, season_id: Option<&str>) -> String {
        match season_id {
            Some(season) => format!(
                "{}/-/kader/verein/{}/saison_id/{}/plus/1",
                self.base, club_id, season
            ),
            None => format!("{}/-/kader/verein/{}/plus/1", self.base, club_id),
        }
    }

    pub fn club_managers(&self, club_id: &str) -> String {
        format!(
            "{}/-/mitarbeiterhistorie/verein/{}/personalie_id/1",
            self.base, club_id
        )
    }

    pub fn competition_clubs(&self, competition_id: &str, season_id: Option<&str>) -> String {
        format!(
            "{}/-/startseite/wettbewerb/{}/plus/?saison_id={}",
            self.base,
            competition_id,
            season_id.unwrap_or_default()
        )
    }

    pub fn knockout_clubs(&self, competition_id: &str, season_id: Option<&str>) -> String {
        match season_id {
            Some(season) => format!(
                "{}/-/teilnehmer/pokalwettbewerb/{}/saison_id/{}",
                self.base, competition_id, season
            ),
            None => format!(
                "{}/-/teilnehmer/pokalwettbewerb/{}",
                self.base, competition_id
            ),
        }
    }

    pub fn manager_profile(&self, manager_id: &str) -> String {
        format!("{}/-/profil/trainer/{}", self.base, manager_id)
    }

    pub fn manager_contracts(&self, manager_id: &str) -> String {
        format!("{}/-/stationen/trainer/{}", self.base, manager_id)
    }

    pub fn player_transfers(&self, player_id: &str) -> String {
        format!("{}/-/transfers/spieler/{}", self.base, player_id)
    }

    pub fn transfer_history(&self, player_id: &str) -> String {
        format!("{}/ceapi/transferHistory/list/{}", self.base, player_id)
    }
}
