use std::path::PathBuf;

use anyhow::{Context, Result};

use matchday::config::AppConfig;
use matchday::demo::{DEMO_SEED, generate_demo_season};
use matchday::filter::{MatchFilter, MatchKind};
use matchday::ledger::score_drift;
use matchday::match_form::nice_date;
use matchday::season::SeasonBook;
use matchday::stats::{LeaderEntry, LeaderField};
use matchday::store::JsonFileStore;

const RECENT_MATCHES: usize = 6;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let mut cfg = AppConfig::load();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if let Some(dir) = arg_value(&args, "--data-dir") {
        cfg.data_dir = PathBuf::from(dir);
    }
    if let Some(limit) = arg_value(&args, "--limit").and_then(|v| v.parse::<usize>().ok()) {
        cfg.leader_limit = limit.max(1);
    }
    let seed_demo = args.iter().any(|a| a == "--demo");
    let league_only = args.iter().any(|a| a == "--league-only");
    let as_json = args.iter().any(|a| a == "--json");

    let mut store = JsonFileStore::new(&cfg.data_dir, cfg.key_prefix.clone());
    let mut book = SeasonBook::load(&store);
    if book.is_empty() && seed_demo {
        log::info!("no saved season in {}, seeding demo data", store.dir().display());
        book = generate_demo_season(DEMO_SEED);
        book.save(&mut store).context("save demo season")?;
    }

    let filter = MatchFilter {
        kind: if league_only {
            MatchKind::League
        } else {
            MatchKind::All
        },
        ..MatchFilter::default()
    };
    let view = SeasonBook {
        matches: book.filtered(&filter).into_iter().cloned().collect(),
        ..book.clone()
    };

    let totals = view.totals();
    let scorers = view.leaders(LeaderField::Scorer, cfg.leader_limit);
    let assists = view.leaders(LeaderField::Assist, cfg.leader_limit);

    if as_json {
        let out = serde_json::json!({
            "totals": totals,
            "form": view.league_form(),
            "scorers": scorers,
            "assists": assists,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Season summary ({})", store.dir().display());
    println!("Played: {}", totals.played);
    println!("W-D-L: {}-{}-{}", totals.wins, totals.draws, totals.losses);
    println!("GF/GA: {}/{}", totals.goals_for, totals.goals_against);
    println!("GD: {}", totals.goal_difference);
    println!("Points: {}", totals.points);
    println!("Win %: {}", totals.win_rate_pct);
    println!("Clean sheets: {}", totals.clean_sheets);
    println!(
        "Goals / match: {:.1}  GA / match: {:.1}",
        totals.avg_goals_for, totals.avg_goals_against
    );
    let form: String = view.league_form().iter().map(|o| o.as_char()).collect();
    if !form.is_empty() {
        println!("League form: {form}");
    }

    print_leaders("Top scorers", &scorers);
    print_leaders("Top assists", &assists);

    if !view.matches.is_empty() {
        println!();
        println!("Recent matches");
        let names = view.names();
        for m in view.matches.iter().take(RECENT_MATCHES) {
            let competition = if m.is_friendly {
                "Friendly"
            } else {
                names.league(m.league_id.as_deref())
            };
            println!(
                "  {} {} · {} vs {} @ {} [{}] {}-{}",
                m.outcome(),
                nice_date(m.date),
                m.home_away,
                names.opponent(Some(m.opponent_id.as_str())),
                names.venue(m.venue_id.as_deref()),
                competition,
                m.our_score,
                m.their_score
            );
            if let Some((us, them)) = score_drift(m).filter(|_| !m.goals.is_empty()) {
                println!("    note: goal ledger gives {us}-{them}");
            }
        }
    }

    Ok(())
}

fn print_leaders(title: &str, rows: &[LeaderEntry]) {
    println!();
    println!("{title}");
    if rows.is_empty() {
        println!("  (none yet)");
        return;
    }
    for (rank, row) in rows.iter().enumerate() {
        println!("  {}. {} ({})", rank + 1, row.name, row.count);
    }
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
