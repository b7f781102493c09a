use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use matchday::config::AppConfig;
use matchday::season::SeasonBook;
use matchday::sql_store;
use matchday::store::JsonFileStore;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cfg = AppConfig::load();
    let db_path = parse_db_path_arg()
        .or_else(|| cfg.db_path.clone())
        .unwrap_or_else(|| sql_store::default_db_path(&cfg.data_dir));
    let pull = std::env::args().skip(1).any(|a| a == "--pull");

    let mut store = JsonFileStore::new(&cfg.data_dir, cfg.key_prefix.clone());
    let mut conn = sql_store::open_db(&db_path)?;

    let book = if pull {
        let book = sql_store::load_book(&conn)?;
        book.save(&mut store).context("write json store")?;
        book
    } else {
        let book = SeasonBook::load(&store);
        if book.is_empty() {
            return Err(anyhow!(
                "nothing to sync: no saved season in {}",
                store.dir().display()
            ));
        }
        sql_store::save_book(&mut conn, &book)?;
        let back = sql_store::load_book(&conn)?;
        if back.matches.len() != book.matches.len() {
            log::warn!(
                "{} of {} matches did not survive the round trip",
                book.matches.len() - back.matches.len().min(book.matches.len()),
                book.matches.len()
            );
        }
        book
    };

    println!("Sync complete ({})", if pull { "db -> json" } else { "json -> db" });
    println!("DB: {}", db_path.display());
    println!("JSON: {}", store.dir().display());
    println!(
        "Players: {}  Opponents: {}  Venues: {}  Leagues: {}  Matches: {}",
        book.players.len(),
        book.opponents.len(),
        book.venues.len(),
        book.leagues.len(),
        book.matches.len()
    );
    Ok(())
}

fn parse_db_path_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--db=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--db" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
