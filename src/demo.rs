use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{GoalEvent, HomeAway, MatchRecord, NamedRef, Player, TeamSize};
use crate::season::SeasonBook;

pub const DEMO_SEED: u64 = 12;

const SQUAD: &[(&str, u32, &str)] = &[
    ("Aoife Kelly", 1, "GK"),
    ("Ciara Doyle", 2, "DF"),
    ("Emily Ward", 3, "DF"),
    ("Grace Murphy", 4, "DF"),
    ("Niamh Walsh", 5, "DF"),
    ("Katie Byrne", 6, "MF"),
    ("Sophie Ryan", 7, "MF"),
    ("Ella O'Brien", 8, "MF"),
    ("Alice Byrne", 9, "FW"),
    ("Megan Nolan", 10, "MF"),
    ("Sarah Keane", 11, "FW"),
    ("Lucy Brennan", 12, "FW"),
    ("Hannah Quinn", 14, "DF"),
    ("Chloe Fitzgerald", 15, "MF"),
];

const OPPONENTS: &[&str] = &[
    "Swords Celtic",
    "Malahide United",
    "St Kevin's Boys",
    "Cherry Orchard",
    "Home Farm",
    "Lakewood Athletic",
];

const VENUES: &[&str] = &["Broadmeadow", "Ridgewood Park", "Seapark"];

/// A plausible season for first runs. Same seed, same season; every match's
/// goal ledger lists exactly `our_score` goals.
pub fn generate_demo_season(seed: u64) -> SeasonBook {
    let mut rng = StdRng::seed_from_u64(seed);

    let players: Vec<Player> = SQUAD
        .iter()
        .enumerate()
        .map(|(i, (name, shirt, pos))| {
            let mut p = Player::new(format!("p{}", i + 1), *name);
            p.shirt = Some(*shirt);
            p.position = Some((*pos).to_string());
            p
        })
        .collect();
    let opponents: Vec<NamedRef> = OPPONENTS
        .iter()
        .enumerate()
        .map(|(i, name)| NamedRef::new(format!("o{}", i + 1), *name))
        .collect();
    let venues: Vec<NamedRef> = VENUES
        .iter()
        .enumerate()
        .map(|(i, name)| NamedRef::new(format!("v{}", i + 1), *name))
        .collect();
    let leagues = vec![NamedRef::new("l1", "U12 Girls Division 1")];

    // Outfield players do the scoring.
    let attackers: Vec<&Player> = players
        .iter()
        .filter(|p| p.position.as_deref() != Some("GK"))
        .collect();

    let start = NaiveDate::from_ymd_opt(2025, 9, 6).unwrap_or_default();
    let mut matches = Vec::new();
    for round in 0..12u32 {
        let id = format!("m{}", round + 1);
        let date = start + Duration::weeks(i64::from(round));
        let opponent = &opponents[round as usize % opponents.len()];
        let our_score = rng.gen_range(0..=4u32);
        let their_score = rng.gen_range(0..=3u32);

        let mut minutes: Vec<u32> = (0..our_score).map(|_| rng.gen_range(1..=60)).collect();
        minutes.sort_unstable();
        let goals: Vec<GoalEvent> = minutes
            .into_iter()
            .enumerate()
            .filter_map(|(n, minute)| {
                let scorer = attackers.choose(&mut rng)?;
                let goal_id = format!("{id}-g{}", n + 1);
                let mut goal = GoalEvent::new(goal_id, minute, scorer.id.clone());
                if rng.gen_bool(0.6) {
                    goal.assist_id = attackers
                        .iter()
                        .filter(|p| p.id != scorer.id)
                        .collect::<Vec<_>>()
                        .choose(&mut rng)
                        .map(|p| p.id.clone());
                }
                Some(goal)
            })
            .collect();

        let is_friendly = round % 4 == 3;
        let mut record = MatchRecord::new(id, date, opponent.id.clone(), our_score, their_score);
        record.home_away = if round % 2 == 0 {
            HomeAway::Home
        } else {
            HomeAway::Away
        };
        record.venue_id = venues.choose(&mut rng).map(|v| v.id.clone());
        record.league_id = (!is_friendly).then(|| leagues[0].id.clone());
        record.is_friendly = is_friendly;
        record.team_size = if round < 2 {
            TeamSize::Nine
        } else {
            TeamSize::Eleven
        };
        record.goals = goals;
        matches.push(record);
    }
    // Newest first, as entered.
    matches.reverse();

    SeasonBook {
        players,
        opponents,
        venues,
        leagues,
        matches,
    }
}
