//! Side-aware goal entry.
//!
//! A draft's `side` is the side credited with the goal. For an own goal the
//! scorer is a defender from the opposite side, and no assist is recorded.
//! Every mutation returns a new, self-consistent draft; invalid rows (blank
//! scorer, bad minute) are only filtered out at save time by
//! [`crate::ledger::sanitize_goals`].

use crate::ledger;
use crate::model::{FALLBACK_NAME, GoalEvent, Player, TeamSide};

pub const MAX_MINUTE: f64 = 130.0;

/// Players grouped by the side they play for in one fixture.
#[derive(Debug, Clone, Default)]
pub struct SideRoster {
    home: Vec<Player>,
    away: Vec<Player>,
}

impl SideRoster {
    pub fn new(home: Vec<Player>, away: Vec<Player>) -> Self {
        Self { home, away }
    }

    /// Split `players` using a caller-supplied team association. Players the
    /// lookup can't place are left out of both pools.
    pub fn from_lookup<F>(players: &[Player], side_of: F) -> Self
    where
        F: Fn(&Player) -> Option<TeamSide>,
    {
        let mut roster = Self::default();
        for p in players {
            match side_of(p) {
                Some(TeamSide::Home) => roster.home.push(p.clone()),
                Some(TeamSide::Away) => roster.away.push(p.clone()),
                None => {}
            }
        }
        roster
    }

    pub fn players(&self, side: TeamSide) -> &[Player] {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn side_of(&self, player_id: &str) -> Option<TeamSide> {
        if self.home.iter().any(|p| p.id == player_id) {
            Some(TeamSide::Home)
        } else if self.away.iter().any(|p| p.id == player_id) {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    pub fn name(&self, player_id: &str) -> &str {
        self.home
            .iter()
            .chain(self.away.iter())
            .find(|p| p.id == player_id)
            .map(|p| p.name.as_str())
            .unwrap_or(FALLBACK_NAME)
    }

    /// Side credited with a recorded goal, worked out from the scorer's team.
    pub fn credited_side(&self, event: &GoalEvent) -> Option<TeamSide> {
        self.side_of(&event.scorer_id)
            .map(|side| credited_side(side, event.own_goal))
    }
}

pub fn credited_side(scorer_side: TeamSide, own_goal: bool) -> TeamSide {
    if own_goal {
        scorer_side.opposite()
    } else {
        scorer_side
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub id: String,
    pub side: TeamSide,
    pub minute: f64,
    pub scorer_id: String,
    pub assist_id: Option<String>,
    pub own_goal: bool,
}

impl GoalDraft {
    pub fn new(id: impl Into<String>, minute: f64) -> Self {
        Self {
            id: id.into(),
            side: TeamSide::Home,
            minute,
            scorer_id: String::new(),
            assist_id: None,
            own_goal: false,
        }
    }

    /// Blank row with a generated id.
    pub fn fresh(minute: f64) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), minute)
    }

    /// Re-open a saved goal for editing.
    pub fn from_event(event: &GoalEvent, roster: &SideRoster) -> Self {
        let side = event
            .side
            .or_else(|| roster.credited_side(event))
            .unwrap_or_default();
        Self {
            id: event.id.clone(),
            side,
            minute: f64::from(event.minute),
            scorer_id: event.scorer_id.clone(),
            assist_id: event.assist_id.clone(),
            own_goal: event.own_goal,
        }
    }

    /// Side the scorer has to come from.
    pub fn scorer_side(&self) -> TeamSide {
        if self.own_goal {
            self.side.opposite()
        } else {
            self.side
        }
    }

    pub fn scorer_pool<'a>(&self, roster: &'a SideRoster) -> &'a [Player] {
        roster.players(self.scorer_side())
    }

    pub fn assist_pool<'a>(&self, roster: &'a SideRoster) -> Vec<&'a Player> {
        if self.own_goal {
            return Vec::new();
        }
        roster
            .players(self.side)
            .iter()
            .filter(|p| p.id != self.scorer_id)
            .collect()
    }

    pub fn with_side(&self, side: TeamSide) -> Self {
        if side == self.side {
            return self.clone();
        }
        Self {
            side,
            scorer_id: String::new(),
            assist_id: None,
            ..self.clone()
        }
    }

    pub fn with_own_goal(&self, own_goal: bool) -> Self {
        if own_goal == self.own_goal {
            return self.clone();
        }
        Self {
            own_goal,
            scorer_id: String::new(),
            assist_id: None,
            ..self.clone()
        }
    }

    pub fn with_minute(&self, minute: f64) -> Self {
        let minute = if minute.is_finite() {
            minute.clamp(0.0, MAX_MINUTE)
        } else {
            0.0
        };
        Self {
            minute,
            ..self.clone()
        }
    }

    /// Scorers outside the current pool clear the field instead.
    pub fn with_scorer(&self, roster: &SideRoster, scorer_id: &str) -> Self {
        let in_pool = self.scorer_pool(roster).iter().any(|p| p.id == scorer_id);
        let scorer_id = if in_pool { scorer_id.to_string() } else { String::new() };
        let assist_id = self
            .assist_id
            .clone()
            .filter(|a| !scorer_id.is_empty() && *a != scorer_id);
        Self {
            scorer_id,
            assist_id,
            ..self.clone()
        }
    }

    pub fn with_assist(&self, roster: &SideRoster, assist_id: Option<&str>) -> Self {
        let assist_id = assist_id
            .filter(|id| !id.is_empty())
            .filter(|id| self.assist_pool(roster).iter().any(|p| p.id == *id))
            .map(str::to_string);
        Self {
            assist_id,
            ..self.clone()
        }
    }

    pub fn apply(&self, roster: &SideRoster, patch: GoalPatch) -> Self {
        match patch {
            GoalPatch::Side(side) => self.with_side(side),
            GoalPatch::Minute(minute) => self.with_minute(minute),
            GoalPatch::Scorer(id) => self.with_scorer(roster, &id),
            GoalPatch::Assist(id) => self.with_assist(roster, id.as_deref()),
            GoalPatch::OwnGoal(flag) => self.with_own_goal(flag),
        }
    }

    pub fn to_event(&self) -> GoalEvent {
        GoalEvent {
            id: self.id.clone(),
            // Saturating cast; negative and NaN minutes never get this far.
            minute: self.minute as u32,
            scorer_id: self.scorer_id.clone(),
            assist_id: if self.own_goal {
                None
            } else {
                self.assist_id.clone()
            },
            own_goal: self.own_goal,
            side: Some(self.side),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GoalPatch {
    Side(TeamSide),
    Minute(f64),
    Scorer(String),
    Assist(Option<String>),
    OwnGoal(bool),
}

/// The ordered goal rows of one match form.
#[derive(Debug, Clone, Default)]
pub struct GoalSheet {
    rows: Vec<GoalDraft>,
}

impl GoalSheet {
    pub fn from_events(events: &[GoalEvent], roster: &SideRoster) -> Self {
        Self {
            rows: events
                .iter()
                .map(|e| GoalDraft::from_event(e, roster))
                .collect(),
        }
    }

    pub fn rows(&self) -> &[GoalDraft] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add(&mut self, minute: f64) -> &GoalDraft {
        self.rows.push(GoalDraft::fresh(0.0).with_minute(minute));
        &self.rows[self.rows.len() - 1]
    }

    /// Append a row as-is, bypassing the side pools (quick entry).
    pub fn push(&mut self, draft: GoalDraft) {
        self.rows.push(draft);
    }

    pub fn update(&mut self, idx: usize, roster: &SideRoster, patch: GoalPatch) -> bool {
        let Some(row) = self.rows.get(idx) else {
            return false;
        };
        let next = row.apply(roster, patch);
        self.rows[idx] = next;
        true
    }

    pub fn remove(&mut self, idx: usize) -> Option<GoalDraft> {
        (idx < self.rows.len()).then(|| self.rows.remove(idx))
    }

    pub fn pop(&mut self) -> Option<GoalDraft> {
        self.rows.pop()
    }

    pub fn to_events(&self) -> Vec<GoalEvent> {
        ledger::sanitize_goals(&self.rows)
    }

    /// One line per goal in minute order, e.g. `Home 23′ — Alice (assist: Bob)`.
    pub fn summary_lines(&self, roster: &SideRoster) -> Vec<String> {
        let mut ordered: Vec<&GoalDraft> = self.rows.iter().collect();
        ordered.sort_by(|a, b| a.minute.total_cmp(&b.minute));
        ordered
            .into_iter()
            .map(|ev| {
                let scorer = ev
                    .scorer_pool(roster)
                    .iter()
                    .find(|p| p.id == ev.scorer_id)
                    .map(|p| p.name.as_str())
                    .unwrap_or(FALLBACK_NAME);
                let suffix = if ev.own_goal {
                    " (OG)".to_string()
                } else {
                    ev.assist_id
                        .as_deref()
                        .and_then(|id| roster.players(ev.side).iter().find(|p| p.id == id))
                        .map(|p| format!(" (assist: {})", p.name))
                        .unwrap_or_default()
                };
                format!("{} {}′ — {}{}", ev.side.label(), ev.minute, scorer, suffix)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> SideRoster {
        SideRoster::new(
            vec![
                Player::new("h1", "Alice Byrne"),
                Player::new("h2", "Ciara Doyle"),
                Player::new("h3", "Emily Ward"),
            ],
            vec![
                Player::new("a1", "Megan Fox"),
                Player::new("a2", "Katie Nolan"),
            ],
        )
    }

    fn ids(players: &[Player]) -> Vec<&str> {
        players.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn own_goal_for_home_draws_scorer_from_away() {
        let roster = roster();
        let draft = GoalDraft::new("g", 10.0).with_own_goal(true);
        assert_eq!(draft.side, TeamSide::Home);
        assert_eq!(ids(draft.scorer_pool(&roster)), vec!["a1", "a2"]);
        assert!(draft.assist_pool(&roster).is_empty());

        let picked = draft.with_scorer(&roster, "h1");
        assert!(picked.scorer_id.is_empty());
        let picked = draft.with_scorer(&roster, "a2");
        assert_eq!(picked.scorer_id, "a2");
        assert_eq!(picked.to_event().side, Some(TeamSide::Home));
    }

    #[test]
    fn toggling_own_goal_clears_scorer_and_assist() {
        let roster = roster();
        let draft = GoalDraft::new("g", 10.0)
            .with_scorer(&roster, "h1")
            .with_assist(&roster, Some("h2"));
        assert_eq!(draft.assist_id.as_deref(), Some("h2"));

        let toggled = draft.with_own_goal(true);
        assert!(toggled.scorer_id.is_empty());
        assert!(toggled.assist_id.is_none());
        let back = toggled.with_scorer(&roster, "a1").with_own_goal(false);
        assert!(back.scorer_id.is_empty());
    }

    #[test]
    fn changing_side_clears_scorer_and_assist() {
        let roster = roster();
        let draft = GoalDraft::new("g", 10.0)
            .with_scorer(&roster, "h1")
            .with_assist(&roster, Some("h3"));
        let same = draft.with_side(TeamSide::Home);
        assert_eq!(same, draft);
        let moved = draft.with_side(TeamSide::Away);
        assert!(moved.scorer_id.is_empty());
        assert!(moved.assist_id.is_none());
        assert_eq!(ids(moved.scorer_pool(&roster)), vec!["a1", "a2"]);
    }

    #[test]
    fn assist_cannot_be_the_scorer() {
        let roster = roster();
        let draft = GoalDraft::new("g", 10.0).with_scorer(&roster, "h1");
        let pool: Vec<&str> = draft
            .assist_pool(&roster)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(pool, vec!["h2", "h3"]);
        assert!(draft.with_assist(&roster, Some("h1")).assist_id.is_none());
        assert!(draft.with_assist(&roster, Some("a1")).assist_id.is_none());

        let assisted = draft.with_assist(&roster, Some("h2"));
        let swapped = assisted.with_scorer(&roster, "h2");
        assert_eq!(swapped.scorer_id, "h2");
        assert!(swapped.assist_id.is_none());
    }

    #[test]
    fn minute_is_clamped() {
        let draft = GoalDraft::new("g", 0.0);
        assert_eq!(draft.with_minute(-5.0).minute, 0.0);
        assert_eq!(draft.with_minute(200.0).minute, 130.0);
        assert_eq!(draft.with_minute(f64::NAN).minute, 0.0);
        assert_eq!(draft.with_minute(37.0).minute, 37.0);
    }

    #[test]
    fn roster_resolves_credited_side() {
        let roster = roster();
        let mut og = GoalEvent::new("g", 5, "a1");
        og.own_goal = true;
        assert_eq!(roster.credited_side(&og), Some(TeamSide::Home));
        let plain = GoalEvent::new("g", 5, "a1");
        assert_eq!(roster.credited_side(&plain), Some(TeamSide::Away));
        assert_eq!(roster.credited_side(&GoalEvent::new("g", 5, "zz")), None);
    }

    #[test]
    fn sheet_summary_is_sorted_by_minute() {
        let roster = roster();
        let mut sheet = GoalSheet::default();
        sheet.add(30.0);
        sheet.add(12.0);
        sheet.add(50.0);
        assert!(sheet.update(0, &roster, GoalPatch::Scorer("h1".to_string())));
        assert!(sheet.update(0, &roster, GoalPatch::Assist(Some("h2".to_string()))));
        assert!(sheet.update(1, &roster, GoalPatch::OwnGoal(true)));
        assert!(sheet.update(1, &roster, GoalPatch::Scorer("a1".to_string())));
        assert!(!sheet.update(9, &roster, GoalPatch::Minute(1.0)));

        let lines = sheet.summary_lines(&roster);
        assert_eq!(
            lines,
            vec![
                "Home 12′ — Megan Fox (OG)".to_string(),
                "Home 30′ — Alice Byrne (assist: Ciara Doyle)".to_string(),
                "Home 50′ — —".to_string(),
            ]
        );

        let events = sheet.to_events();
        assert_eq!(events.len(), 2);
        assert!(events[1].own_goal);
        assert!(sheet.remove(5).is_none());
        assert!(sheet.remove(2).is_some());
        assert_eq!(sheet.rows().len(), 2);
    }
}
