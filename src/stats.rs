use std::collections::HashMap;

use serde::Serialize;

use crate::ledger::{Outcome, avg_safe, outcome};
use crate::model::{FALLBACK_NAME, MatchRecord, Player};

pub const DEFAULT_LEADER_LIMIT: usize = 5;
pub const FORM_LENGTH: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonTotals {
    pub played: usize,
    pub goals_for: u64,
    pub goals_against: u64,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate_pct: u32,
    pub clean_sheets: usize,
    pub goal_difference: i64,
    pub points: usize,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
}

/// Season totals from the stored score fields (not the goal ledger).
pub fn aggregate(matches: &[MatchRecord]) -> SeasonTotals {
    let mut out = SeasonTotals {
        played: matches.len(),
        ..SeasonTotals::default()
    };

    for m in matches {
        out.goals_for += u64::from(m.our_score);
        out.goals_against += u64::from(m.their_score);
        match outcome(m.our_score, m.their_score) {
            Outcome::Win => out.wins += 1,
            Outcome::Draw => out.draws += 1,
            Outcome::Loss => out.losses += 1,
        }
        if m.their_score == 0 {
            out.clean_sheets += 1;
        }
    }

    out.win_rate_pct = (avg_safe(out.wins as f64, out.played) * 100.0).round() as u32;
    out.goal_difference = out.goals_for as i64 - out.goals_against as i64;
    out.points = out.wins * 3 + out.draws;
    out.avg_goals_for = avg_safe(out.goals_for as f64, out.played);
    out.avg_goals_against = avg_safe(out.goals_against as f64, out.played);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderField {
    Scorer,
    Assist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderEntry {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Players ranked by goals (every goal, own goals included) or assists.
pub fn leaders(
    matches: &[MatchRecord],
    field: LeaderField,
    players: &[Player],
    limit: usize,
) -> Vec<LeaderEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for g in matches.iter().flat_map(|m| m.goals.iter()) {
        let id = match field {
            LeaderField::Scorer => Some(g.scorer_id.as_str()),
            LeaderField::Assist => g.assist_id.as_deref(),
        };
        if let Some(id) = id {
            *counts.entry(id).or_insert(0) += 1;
        }
    }

    let names: HashMap<&str, &str> = players
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();

    let mut rows: Vec<LeaderEntry> = counts
        .into_iter()
        .map(|(id, count)| LeaderEntry {
            id: id.to_string(),
            name: names.get(id).copied().unwrap_or(FALLBACK_NAME).to_string(),
            count,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    rows.truncate(limit);
    rows
}

/// W/D/L of the most recent league (non-friendly) matches, oldest first.
pub fn league_form(matches: &[MatchRecord], len: usize) -> Vec<Outcome> {
    let mut league: Vec<&MatchRecord> = matches.iter().filter(|m| !m.is_friendly).collect();
    league.sort_by(|a, b| a.date.cmp(&b.date));
    let skip = league.len().saturating_sub(len);
    league.into_iter().skip(skip).map(MatchRecord::outcome).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GoalEvent;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn scored(id: &str, our: u32, their: u32) -> MatchRecord {
        MatchRecord::new(id, day(1), "o", our, their)
    }

    #[test]
    fn empty_season_has_zero_rates() {
        let t = aggregate(&[]);
        assert_eq!(t.played, 0);
        assert_eq!(t.win_rate_pct, 0);
        assert_eq!(t.avg_goals_for, 0.0);
        assert_eq!(t.avg_goals_against, 0.0);
    }

    #[test]
    fn three_match_season_totals() {
        let t = aggregate(&[scored("a", 2, 1), scored("b", 1, 1), scored("c", 0, 2)]);
        assert_eq!(t.played, 3);
        assert_eq!((t.wins, t.draws, t.losses), (1, 1, 1));
        assert_eq!((t.goals_for, t.goals_against), (3, 4));
        assert_eq!(t.win_rate_pct, 33);
        assert_eq!(t.goal_difference, -1);
        assert_eq!(t.clean_sheets, 0);
        assert_eq!(t.points, 4);
        assert!((t.avg_goals_for - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn win_rate_rounds_half_up() {
        let t = aggregate(&[scored("a", 1, 0), scored("b", 0, 0)]);
        assert_eq!(t.win_rate_pct, 50);
        assert_eq!(t.clean_sheets, 2);
        let t = aggregate(&[scored("a", 1, 0), scored("b", 1, 0), scored("c", 0, 1)]);
        assert_eq!(t.win_rate_pct, 67);
    }

    #[test]
    fn leaders_break_ties_alphabetically() {
        let mut m = scored("a", 3, 0);
        m.goals = vec![
            GoalEvent::new("1", 1, "z"),
            GoalEvent::new("2", 2, "y"),
            GoalEvent::new("3", 3, "ghost"),
        ];
        let players = vec![Player::new("z", "Aoife"), Player::new("y", "bríd")];
        let rows = leaders(&[m], LeaderField::Scorer, &players, DEFAULT_LEADER_LIMIT);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Aoife", "bríd", FALLBACK_NAME]);
    }

    #[test]
    fn leaders_respect_limit() {
        let mut m = scored("a", 7, 0);
        m.goals = (0..7)
            .map(|i| GoalEvent::new(i.to_string(), i, format!("p{i}")))
            .collect();
        let rows = leaders(&[m.clone()], LeaderField::Scorer, &[], DEFAULT_LEADER_LIMIT);
        assert_eq!(rows.len(), 5);
        assert!(leaders(&[m], LeaderField::Assist, &[], 5).is_empty());
    }

    #[test]
    fn league_form_skips_friendlies_and_keeps_latest() {
        let mut matches = Vec::new();
        for (d, our, their, friendly) in [
            (10, 1, 0, false),
            (2, 0, 1, false),
            (8, 2, 2, true),
            (4, 3, 1, false),
            (6, 0, 0, false),
            (12, 0, 4, false),
            (14, 5, 0, false),
        ] {
            let mut m = MatchRecord::new(format!("m{d}"), day(d), "o", our, their);
            m.is_friendly = friendly;
            matches.push(m);
        }
        let form = league_form(&matches, FORM_LENGTH);
        let text: String = form.iter().map(|o| o.as_char()).collect();
        assert_eq!(text, "WDWLW");
    }
}
