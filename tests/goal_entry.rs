use chrono::NaiveDate;

use matchday::goal_editor::{GoalDraft, GoalPatch, GoalSheet, SideRoster};
use matchday::ledger::{ledger_score, sanitize_goals};
use matchday::match_form::MatchDraft;
use matchday::model::{HomeAway, Player, TeamSide};
use matchday::season::SeasonBook;

fn roster() -> SideRoster {
    let players = vec![
        Player::new("h1", "Alice Byrne"),
        Player::new("h2", "Ciara Doyle"),
        Player::new("a1", "Megan Fox"),
        Player::new("a2", "Katie Nolan"),
        Player::new("x", "Guest"),
    ];
    SideRoster::from_lookup(&players, |p| {
        if p.id.starts_with('h') {
            Some(TeamSide::Home)
        } else if p.id.starts_with('a') {
            Some(TeamSide::Away)
        } else {
            None
        }
    })
}

#[test]
fn own_goal_pool_comes_from_the_other_side() {
    let roster = roster();
    let draft = GoalDraft::new("g1", 20.0).apply(&roster, GoalPatch::OwnGoal(true));
    let pool: Vec<&str> = draft
        .scorer_pool(&roster)
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(pool, vec!["a1", "a2"]);
    assert!(!pool.contains(&"h1"));
    assert_eq!(roster.side_of("x"), None);
}

#[test]
fn toggling_own_goal_resets_selection() {
    let roster = roster();
    let draft = GoalDraft::new("g1", 20.0)
        .apply(&roster, GoalPatch::Scorer("h1".to_string()))
        .apply(&roster, GoalPatch::Assist(Some("h2".to_string())));
    assert_eq!(draft.scorer_id, "h1");
    assert_eq!(draft.assist_id.as_deref(), Some("h2"));

    let og = draft.apply(&roster, GoalPatch::OwnGoal(true));
    assert_eq!(og.scorer_id, "");
    assert_eq!(og.assist_id, None);

    let side = draft.apply(&roster, GoalPatch::Side(TeamSide::Away));
    assert_eq!(side.scorer_id, "");
    assert_eq!(side.assist_id, None);
}

#[test]
fn sanitizer_drops_blank_rows_without_touching_input() {
    let roster = roster();
    let mut sheet = GoalSheet::default();
    sheet.add(5.0);
    sheet.add(10.0);
    sheet.update(1, &roster, GoalPatch::Scorer("h2".to_string()));
    let rows = sheet.rows().to_vec();

    let clean = sanitize_goals(sheet.rows());
    assert_eq!(clean.len(), 1);
    assert_eq!(clean[0].scorer_id, "h2");
    assert_eq!(clean[0].minute, 10);
    assert_eq!(sheet.rows(), rows.as_slice());
}

#[test]
fn saved_match_carries_credited_sides() {
    let roster = roster();
    let mut form = MatchDraft::new(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
    form.opponent_id = "o1".to_string();
    form.home_away = HomeAway::Home;
    form.our_score = 1;
    form.their_score = 1;

    form.goals.add(14.0);
    form.goals.update(0, &roster, GoalPatch::Scorer("h1".to_string()));
    form.goals.add(60.0);
    form.goals.update(1, &roster, GoalPatch::Side(TeamSide::Away));
    form.goals.update(1, &roster, GoalPatch::OwnGoal(true));
    form.goals.update(1, &roster, GoalPatch::Scorer("h2".to_string()));

    let mut book = SeasonBook::default();
    let id = book.save_match(&form).expect("complete form saves");
    let saved = book.find_match(&id).expect("saved match");
    assert_eq!(saved.goals.len(), 2);
    assert_eq!(saved.goals[1].side, Some(TeamSide::Away));
    assert!(saved.goals[1].own_goal);
    assert_eq!(roster.credited_side(&saved.goals[1]), Some(TeamSide::Away));
    assert_eq!(ledger_score(saved), (1, 1));

    let reopened = MatchDraft::from_record(saved, &roster);
    assert_eq!(reopened.goals.rows()[1].side, TeamSide::Away);
    assert_eq!(
        reopened.goals.summary_lines(&roster),
        vec![
            "Home 14′ — Alice Byrne".to_string(),
            "Away 60′ — Ciara Doyle (OG)".to_string(),
        ]
    );
}
