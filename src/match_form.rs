use chrono::{Local, NaiveDate};

use crate::error::{MatchdayError, Result};
use crate::goal_editor::{GoalDraft, GoalSheet, SideRoster};
use crate::ledger;
use crate::model::{GoalEvent, HomeAway, MatchRecord, SubEvent, TeamSide, TeamSize};

/// Lenient numeric parse for form inputs: anything that isn't a number is 0.
pub fn parse_num(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Score stepper input: negative or fractional text is floored into range.
pub fn parse_score(raw: &str) -> u32 {
    parse_num(raw).max(0.0).min(f64::from(u32::MAX)) as u32
}

/// `mm:ss` for a running match clock.
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Short display date, e.g. `31 Jan 2025`.
pub fn nice_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| MatchdayError::InvalidDate(raw.trim().to_string()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchClock {
    seconds: u64,
    running: bool,
}

impl MatchClock {
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance by one second if running.
    pub fn tick(&mut self) {
        if self.running {
            self.seconds = self.seconds.saturating_add(1);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn minute(&self) -> u32 {
        (self.seconds / 60) as u32
    }

    pub fn display(&self) -> String {
        format_clock(self.seconds)
    }
}

/// Minute to pre-fill for a quick goal: one past the last recorded goal, or
/// the clock, whichever is later.
pub fn suggest_minute(last_minute: Option<u32>, clock_minute: u32) -> u32 {
    let after_last = last_minute.map(|m| m.saturating_add(1)).unwrap_or(0);
    after_last.max(clock_minute)
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuickGoal {
    pub minute: f64,
    pub scorer_id: String,
    pub assist_id: Option<String>,
}

impl QuickGoal {
    pub fn new(minute: f64, scorer_id: impl Into<String>) -> Self {
        Self {
            minute,
            scorer_id: scorer_id.into(),
            assist_id: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.scorer_id.is_empty() || !self.minute.is_finite() || self.minute < 0.0 {
            return Err(MatchdayError::InvalidQuickGoal);
        }
        Ok(())
    }

    fn to_draft(&self, record_side: HomeAway) -> GoalDraft {
        let mut draft = GoalDraft::fresh(self.minute);
        draft.side = record_side.into();
        draft.scorer_id = self.scorer_id.clone();
        draft.assist_id = self.assist_id.clone().filter(|a| *a != self.scorer_id);
        draft
    }
}

/// Append a quick goal for our side to a saved match, bumping our score.
pub fn record_quick_goal(record: &MatchRecord, goal: &QuickGoal) -> Result<MatchRecord> {
    goal.validate()?;
    let mut next = record.clone();
    next.goals.push(goal.to_draft(record.home_away).to_event());
    next.our_score = next.our_score.saturating_add(1);
    Ok(next)
}

/// In-progress state of the add/edit match form.
#[derive(Debug, Clone)]
pub struct MatchDraft {
    pub editing_id: Option<String>,
    pub date: String,
    pub opponent_id: String,
    pub home_away: HomeAway,
    pub venue_id: Option<String>,
    pub league_id: Option<String>,
    pub is_friendly: bool,
    pub team_size: TeamSize,
    pub our_score: u32,
    pub their_score: u32,
    pub goals: GoalSheet,
    pub subs: Vec<SubEvent>,
    pub notes: String,
}

impl MatchDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            editing_id: None,
            date: date.format("%Y-%m-%d").to_string(),
            opponent_id: String::new(),
            home_away: HomeAway::Home,
            venue_id: None,
            league_id: None,
            is_friendly: false,
            team_size: TeamSize::Eleven,
            our_score: 0,
            their_score: 0,
            goals: GoalSheet::default(),
            subs: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn from_record(record: &MatchRecord, roster: &SideRoster) -> Self {
        Self {
            editing_id: Some(record.id.clone()),
            date: record.date.format("%Y-%m-%d").to_string(),
            opponent_id: record.opponent_id.clone(),
            home_away: record.home_away,
            venue_id: record.venue_id.clone(),
            league_id: record.league_id.clone(),
            is_friendly: record.is_friendly,
            team_size: record.team_size,
            our_score: record.our_score,
            their_score: record.their_score,
            goals: GoalSheet::from_events(&record.goals, roster),
            subs: record.subs.clone(),
            notes: record.notes.clone().unwrap_or_default(),
        }
    }

    pub fn last_goal_minute(&self) -> Option<u32> {
        self.goals.rows().last().map(|g| g.minute.max(0.0) as u32)
    }

    pub fn add_quick_goal(&mut self, goal: &QuickGoal) -> Result<()> {
        goal.validate()?;
        self.goals.push(goal.to_draft(self.home_away));
        self.our_score = self.our_score.saturating_add(1);
        Ok(())
    }

    /// Drop the last goal row and take it off the score of the side it was
    /// credited to. Blank rows never counted, so the score is left alone.
    pub fn undo_last_goal(&mut self) -> Option<GoalEvent> {
        let removed = self.goals.pop()?;
        if ledger::is_valid_goal(&removed) {
            if removed.side == TeamSide::from(self.home_away) {
                self.our_score = self.our_score.saturating_sub(1);
            } else {
                self.their_score = self.their_score.saturating_sub(1);
            }
        }
        Some(removed.to_event())
    }

    /// Build the record to persist. Date and opponent are required; goal rows
    /// that aren't complete are dropped.
    pub fn to_record(&self) -> Result<MatchRecord> {
        if self.date.trim().is_empty() {
            return Err(MatchdayError::MissingDate);
        }
        if self.opponent_id.trim().is_empty() {
            return Err(MatchdayError::MissingOpponent);
        }
        let date = parse_date(&self.date)?;
        let notes = self.notes.trim();
        Ok(MatchRecord {
            id: self
                .editing_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            date,
            opponent_id: self.opponent_id.clone(),
            home_away: self.home_away,
            venue_id: self.venue_id.clone().filter(|v| !v.is_empty()),
            league_id: self.league_id.clone().filter(|v| !v.is_empty()),
            is_friendly: self.is_friendly,
            team_size: self.team_size,
            our_score: self.our_score,
            their_score: self.their_score,
            goals: self.goals.to_events(),
            subs: self.subs.clone(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}
