use std::fs;
use std::path::PathBuf;

use matchday::filter::{MatchFilter, MatchKind};
use matchday::ledger::{Outcome, avg_safe, outcome};
use matchday::model::{FALLBACK_NAME, MatchRecord, NamedRef, Player};
use matchday::season::SeasonBook;
use matchday::stats::{DEFAULT_LEADER_LIMIT, LeaderField, aggregate, leaders};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_matches() -> Vec<MatchRecord> {
    serde_json::from_str(&read_fixture("matches.json")).expect("fixture should parse")
}

fn players() -> Vec<Player> {
    vec![Player::new("a", "Alice"), Player::new("b", "Bob")]
}

#[test]
fn fixture_season_aggregates_from_stored_scores() {
    let totals = aggregate(&fixture_matches());
    assert_eq!(totals.played, 3);
    assert_eq!((totals.wins, totals.draws, totals.losses), (1, 1, 1));
    assert_eq!(totals.goals_for, 3);
    assert_eq!(totals.goals_against, 4);
    assert_eq!(totals.win_rate_pct, 33);
    assert_eq!(totals.goal_difference, -1);
    assert_eq!(totals.clean_sheets, 0);
    assert_eq!(totals.points, 4);
    assert_eq!(totals.avg_goals_for, avg_safe(3.0, 3));
}

#[test]
fn empty_season_is_safe() {
    let totals = aggregate(&[]);
    assert_eq!(totals.played, 0);
    assert_eq!(totals.win_rate_pct, 0);
    assert!(totals.avg_goals_against.is_finite());
}

#[test]
fn outcomes_and_averages() {
    assert_eq!(outcome(2, 1), Outcome::Win);
    assert_eq!(outcome(1, 1), Outcome::Draw);
    assert_eq!(outcome(0, 3), Outcome::Loss);
    assert_eq!(avg_safe(5.0, 0), 0.0);
    assert_eq!(avg_safe(5.0, 2), 2.5);
}

#[test]
fn fixture_leaderboards() {
    let matches = fixture_matches();
    let scorers = leaders(&matches, LeaderField::Scorer, &players(), DEFAULT_LEADER_LIMIT);
    let got: Vec<(&str, &str, usize)> = scorers
        .iter()
        .map(|r| (r.id.as_str(), r.name.as_str(), r.count))
        .collect();
    assert_eq!(got, vec![("a", "Alice", 2), ("b", "Bob", 1)]);

    let assists = leaders(&matches, LeaderField::Assist, &players(), DEFAULT_LEADER_LIMIT);
    assert_eq!(assists.len(), 1);
    assert_eq!(assists[0].id, "a");
    assert_eq!(assists[0].count, 1);
}

#[test]
fn tied_leaders_are_alphabetical_and_stable() {
    let mut m = fixture_matches().remove(2);
    m.goals.truncate(1);
    m.goals.push(matchday::model::GoalEvent::new("x", 70, "b"));
    let roster = vec![Player::new("a", "Zoe"), Player::new("b", "amy")];
    let first = leaders(&[m.clone()], LeaderField::Scorer, &roster, 5);
    let names: Vec<&str> = first.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["amy", "Zoe"]);
    for _ in 0..10 {
        assert_eq!(leaders(&[m.clone()], LeaderField::Scorer, &roster, 5), first);
    }
}

#[test]
fn book_views_over_fixture() {
    let book = SeasonBook {
        players: players(),
        opponents: vec![
            NamedRef::new("o1", "Swords Celtic"),
            NamedRef::new("o2", "Malahide United"),
        ],
        venues: vec![NamedRef::new("v1", "Broadmeadow")],
        leagues: vec![NamedRef::new("l1", "U12 Division 1")],
        matches: fixture_matches(),
    };

    let form: Vec<Outcome> = book.league_form();
    assert_eq!(form, vec![Outcome::Win, Outcome::Loss]);

    let names = book.names();
    assert_eq!(names.opponent(Some("gone")), FALLBACK_NAME);
    assert_eq!(names.venue(Some("v1")), "Broadmeadow");

    let league = MatchFilter {
        kind: MatchKind::League,
        ..MatchFilter::default()
    };
    let ids: Vec<&str> = book
        .filtered(&league)
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(ids, vec!["m3", "m1"]);

    let malahide = MatchFilter {
        search: "mala".to_string(),
        ..MatchFilter::default()
    };
    assert_eq!(book.filtered(&malahide).len(), 1);
}
