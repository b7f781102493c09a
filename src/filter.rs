use crate::model::{
    FALLBACK_NAME, HomeAway, League, MatchRecord, NamedRef, Opponent, Player, TeamSize, Venue,
};

/// Id → display name resolution over the reference collections.
#[derive(Debug, Clone, Copy)]
pub struct NameLookup<'a> {
    pub players: &'a [Player],
    pub opponents: &'a [Opponent],
    pub venues: &'a [Venue],
    pub leagues: &'a [League],
}

impl<'a> NameLookup<'a> {
    pub fn player(&self, id: Option<&str>) -> &'a str {
        id.and_then(|id| self.players.iter().find(|p| p.id == id))
            .map(|p| p.name.as_str())
            .unwrap_or(FALLBACK_NAME)
    }

    pub fn opponent(&self, id: Option<&str>) -> &'a str {
        find_name(self.opponents, id)
    }

    pub fn venue(&self, id: Option<&str>) -> &'a str {
        find_name(self.venues, id)
    }

    pub fn league(&self, id: Option<&str>) -> &'a str {
        find_name(self.leagues, id)
    }
}

fn find_name<'a>(refs: &'a [NamedRef], id: Option<&str>) -> &'a str {
    id.and_then(|id| refs.iter().find(|r| r.id == id))
        .map(|r| r.name.as_str())
        .unwrap_or(FALLBACK_NAME)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchKind {
    #[default]
    All,
    League,
    Friendly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    /// Case-insensitive substring of the opponent's name.
    pub search: String,
    pub kind: MatchKind,
    pub side: Option<HomeAway>,
    pub team_size: Option<TeamSize>,
}

impl MatchFilter {
    pub fn matches(&self, m: &MatchRecord, names: &NameLookup<'_>) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !names
                .opponent(Some(m.opponent_id.as_str()))
                .to_lowercase()
                .contains(&needle)
        {
            return false;
        }
        match self.kind {
            MatchKind::All => {}
            MatchKind::League if m.is_friendly => return false,
            MatchKind::Friendly if !m.is_friendly => return false,
            _ => {}
        }
        if self.side.is_some_and(|side| side != m.home_away) {
            return false;
        }
        if self.team_size.is_some_and(|size| size != m.team_size) {
            return false;
        }
        true
    }

    /// Matching records, in their stored order.
    pub fn apply<'m>(
        &self,
        matches: &'m [MatchRecord],
        names: &NameLookup<'_>,
    ) -> Vec<&'m MatchRecord> {
        matches.iter().filter(|m| self.matches(m, names)).collect()
    }
}
