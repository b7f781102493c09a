use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::MatchdayError;
use crate::filter::{MatchFilter, NameLookup};
use crate::ledger::{self, Outcome};
use crate::match_form::{self, MatchDraft, QuickGoal};
use crate::model::{League, MatchRecord, NamedRef, Opponent, Player, PlayerStatus, Venue};
use crate::stats::{self, FORM_LENGTH, LeaderEntry, LeaderField, SeasonTotals};
use crate::store::{
    KEY_LEAGUES, KEY_MATCHES, KEY_OPPONENTS, KEY_PLAYERS, KEY_VENUES, RecordStore,
};

/// Everything recorded for one team's season. Matches are kept newest-first,
/// in the order they were entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonBook {
    pub players: Vec<Player>,
    pub opponents: Vec<Opponent>,
    pub venues: Vec<Venue>,
    pub leagues: Vec<League>,
    pub matches: Vec<MatchRecord>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn add_named(list: &mut Vec<NamedRef>, name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    let id = new_id();
    list.insert(0, NamedRef::new(id.clone(), trimmed));
    Some(id)
}

fn remove_by_id<T>(list: &mut Vec<T>, id: &str, key: impl Fn(&T) -> &str) -> bool {
    let before = list.len();
    list.retain(|item| key(item) != id);
    list.len() != before
}

impl SeasonBook {
    pub fn load<S: RecordStore>(store: &S) -> Self {
        Self {
            players: store.load(KEY_PLAYERS, Vec::new()),
            opponents: store.load(KEY_OPPONENTS, Vec::new()),
            venues: store.load(KEY_VENUES, Vec::new()),
            leagues: store.load(KEY_LEAGUES, Vec::new()),
            matches: store.load(KEY_MATCHES, Vec::new()),
        }
    }

    pub fn save<S: RecordStore>(&self, store: &mut S) -> Result<()> {
        store.save(KEY_PLAYERS, &self.players)?;
        store.save(KEY_OPPONENTS, &self.opponents)?;
        store.save(KEY_VENUES, &self.venues)?;
        store.save(KEY_LEAGUES, &self.leagues)?;
        store.save(KEY_MATCHES, &self.matches)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.opponents.is_empty() && self.matches.is_empty()
    }

    pub fn names(&self) -> NameLookup<'_> {
        NameLookup {
            players: &self.players,
            opponents: &self.opponents,
            venues: &self.venues,
            leagues: &self.leagues,
        }
    }

    pub fn add_player(&mut self, name: &str, shirt: Option<u32>) -> Option<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        let id = new_id();
        let mut player = Player::new(id.clone(), trimmed);
        player.shirt = shirt;
        self.players.push(player);
        Some(id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn set_player_status(&mut self, id: &str, status: PlayerStatus) -> bool {
        match self.player_mut(id) {
            Some(p) => {
                p.status = Some(status);
                true
            }
            None => false,
        }
    }

    /// No cascade: goals keep the id and render with the fallback name.
    pub fn remove_player(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.players, id, |p| p.id.as_str())
    }

    pub fn add_opponent(&mut self, name: &str) -> Option<String> {
        add_named(&mut self.opponents, name)
    }

    pub fn add_venue(&mut self, name: &str) -> Option<String> {
        add_named(&mut self.venues, name)
    }

    pub fn add_league(&mut self, name: &str) -> Option<String> {
        add_named(&mut self.leagues, name)
    }

    pub fn rename_opponent(&mut self, id: &str, name: &str) -> bool {
        rename(&mut self.opponents, id, name)
    }

    pub fn rename_venue(&mut self, id: &str, name: &str) -> bool {
        rename(&mut self.venues, id, name)
    }

    pub fn rename_league(&mut self, id: &str, name: &str) -> bool {
        rename(&mut self.leagues, id, name)
    }

    pub fn remove_opponent(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.opponents, id, |r| r.id.as_str())
    }

    pub fn remove_venue(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.venues, id, |r| r.id.as_str())
    }

    pub fn remove_league(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.leagues, id, |r| r.id.as_str())
    }

    pub fn find_match(&self, id: &str) -> Option<&MatchRecord> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Validate a form and store its record: edits replace in place, new
    /// matches go to the front. An edit of a match deleted in the meantime is
    /// rejected. Returns the saved id.
    pub fn save_match(&mut self, draft: &MatchDraft) -> Result<String, MatchdayError> {
        let record = draft.to_record()?;
        if let Some(editing) = &draft.editing_id
            && self.find_match(editing).is_none()
        {
            return Err(MatchdayError::UnknownMatch(editing.clone()));
        }
        let drift = ledger::score_drift(&record).filter(|_| !record.goals.is_empty());
        if let Some((us, them)) = drift {
            log::warn!(
                "match {} stored as {}-{} but its goal ledger gives {us}-{them}",
                record.id,
                record.our_score,
                record.their_score
            );
        }
        let id = record.id.clone();
        match self.matches.iter_mut().find(|m| m.id == id) {
            Some(existing) => *existing = record,
            None => self.matches.insert(0, record),
        }
        Ok(id)
    }

    pub fn delete_match(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.matches, id, |m| m.id.as_str())
    }

    pub fn add_quick_goal(
        &mut self,
        match_id: &str,
        goal: &QuickGoal,
    ) -> Result<(), MatchdayError> {
        let Some(existing) = self.matches.iter_mut().find(|m| m.id == match_id) else {
            return Err(MatchdayError::UnknownMatch(match_id.to_string()));
        };
        *existing = match_form::record_quick_goal(existing, goal)?;
        Ok(())
    }

    /// Pre-filled minute for a quick goal on a saved match.
    pub fn next_goal_minute(&self, match_id: &str, clock_minute: u32) -> u32 {
        let last = self
            .find_match(match_id)
            .and_then(|m| m.goals.last())
            .map(|g| g.minute);
        match_form::suggest_minute(last, clock_minute)
    }

    pub fn totals(&self) -> SeasonTotals {
        stats::aggregate(&self.matches)
    }

    pub fn leaders(&self, field: LeaderField, limit: usize) -> Vec<LeaderEntry> {
        stats::leaders(&self.matches, field, &self.players, limit)
    }

    pub fn league_form(&self) -> Vec<Outcome> {
        stats::league_form(&self.matches, FORM_LENGTH)
    }

    pub fn filtered(&self, filter: &MatchFilter) -> Vec<&MatchRecord> {
        filter.apply(&self.matches, &self.names())
    }
}

fn rename(list: &mut [NamedRef], id: &str, name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return false;
    }
    match list.iter_mut().find(|r| r.id == id) {
        Some(r) => {
            r.name = trimmed.to_string();
            true
        }
        None => false,
    }
}
