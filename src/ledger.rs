use std::fmt;

use serde::{Deserialize, Serialize};

use crate::goal_editor::GoalDraft;
use crate::model::{GoalEvent, MatchRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl Outcome {
    pub fn as_char(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Draw => 'D',
            Outcome::Loss => 'L',
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Purely comparative; values that don't compare (NaN) land on `Loss`.
pub fn outcome<T: PartialOrd>(our: T, their: T) -> Outcome {
    if our > their {
        Outcome::Win
    } else if our == their {
        Outcome::Draw
    } else {
        Outcome::Loss
    }
}

/// Average that is 0 for an empty sample and never NaN or infinite.
pub fn avg_safe(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let avg = total / count as f64;
    if avg.is_finite() { avg } else { 0.0 }
}

pub fn is_valid_goal(row: &GoalDraft) -> bool {
    !row.scorer_id.is_empty() && row.minute.is_finite() && row.minute >= 0.0
}

/// Keep only the rows that can be persisted, in their original order.
pub fn sanitize_goals(rows: &[GoalDraft]) -> Vec<GoalEvent> {
    rows.iter()
        .filter(|row| is_valid_goal(row))
        .map(GoalDraft::to_event)
        .collect()
}

/// Score implied by the goal ledger: goals credited to our side (or carrying no
/// side, as in quick-entry rows, which only ever record our goals) count for us,
/// goals credited to the other side count against.
pub fn ledger_score(record: &MatchRecord) -> (u32, u32) {
    let ours = record.our_side();
    record.goals.iter().fold((0, 0), |(us, them), g| match g.side {
        Some(side) if side != ours => (us, them + 1),
        _ => (us + 1, them),
    })
}

/// Stored totals that disagree with the ledger. Stored totals stay authoritative
/// for aggregates, so this is only reported, never corrected.
pub fn score_drift(record: &MatchRecord) -> Option<(u32, u32)> {
    let derived = ledger_score(record);
    if derived == (record.our_score, record.their_score) {
        None
    } else {
        Some(derived)
    }
}
