use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Transaction, params};

use crate::match_form::parse_date;
use crate::model::{
    GoalEvent, HomeAway, MatchRecord, NamedRef, Player, PlayerStatus, SubEvent, TeamSide, TeamSize,
};
use crate::season::SeasonBook;

pub fn default_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("matchday.sqlite")
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS opponents (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS venues (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS leagues (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS players (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            shirt INTEGER NULL,
            position TEXT NULL,
            status TEXT NULL
        );
        CREATE TABLE IF NOT EXISTS matches (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            opponent_id TEXT NULL,
            home_away TEXT NOT NULL,
            venue_id TEXT NULL,
            league_id TEXT NULL,
            is_friendly INTEGER NULL,
            team_size INTEGER NULL,
            our_score INTEGER NULL,
            their_score INTEGER NULL,
            notes TEXT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_matches_date ON matches(date);

        CREATE TABLE IF NOT EXISTS goals (
            id TEXT PRIMARY KEY,
            match_id TEXT NOT NULL REFERENCES matches(id) ON DELETE CASCADE,
            seq INTEGER NOT NULL,
            minute INTEGER NOT NULL,
            scorer_id TEXT NOT NULL,
            assist_id TEXT NULL,
            own_goal INTEGER NOT NULL DEFAULT 0,
            team_side TEXT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_goals_match ON goals(match_id);

        CREATE TABLE IF NOT EXISTS subs (
            id TEXT PRIMARY KEY,
            match_id TEXT NOT NULL REFERENCES matches(id) ON DELETE CASCADE,
            seq INTEGER NOT NULL,
            player_id TEXT NOT NULL,
            minute INTEGER NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// A `matches` row as stored: score and flag columns may be null.
#[derive(Debug, Clone, Default)]
pub struct MatchRow {
    pub id: String,
    pub date: String,
    pub opponent_id: Option<String>,
    pub home_away: String,
    pub venue_id: Option<String>,
    pub league_id: Option<String>,
    pub is_friendly: Option<bool>,
    pub team_size: Option<i64>,
    pub our_score: Option<i64>,
    pub their_score: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GoalRow {
    pub id: String,
    pub match_id: String,
    pub minute: i64,
    pub scorer_id: String,
    pub assist_id: Option<String>,
    pub own_goal: bool,
    pub team_side: Option<String>,
}

fn score(v: Option<i64>) -> u32 {
    v.and_then(|s| u32::try_from(s).ok()).unwrap_or(0)
}

/// Map a stored row into a typed record. Missing numbers become 0, a missing
/// friendly flag means a league match and an unknown team size means 11. Rows
/// whose date can't be read are dropped.
pub fn normalize_match_row(
    row: MatchRow,
    goals: Vec<GoalEvent>,
    subs: Vec<SubEvent>,
) -> Option<MatchRecord> {
    let date = match parse_date(&row.date) {
        Ok(date) => date,
        Err(err) => {
            log::warn!("skipping match {}: {err}", row.id);
            return None;
        }
    };
    let team_size = row
        .team_size
        .and_then(|n| u8::try_from(n).ok())
        .and_then(|n| TeamSize::try_from(n).ok())
        .unwrap_or_default();
    Some(MatchRecord {
        id: row.id,
        date,
        opponent_id: row.opponent_id.unwrap_or_default(),
        home_away: HomeAway::parse(&row.home_away).unwrap_or_default(),
        venue_id: row.venue_id,
        league_id: row.league_id,
        is_friendly: row.is_friendly.unwrap_or(false),
        team_size,
        our_score: score(row.our_score),
        their_score: score(row.their_score),
        goals,
        subs,
        notes: row.notes.filter(|n| !n.is_empty()),
    })
}

/// Goal rows with a negative minute or no scorer are not goals.
pub fn normalize_goal_row(row: GoalRow) -> Option<GoalEvent> {
    if row.scorer_id.is_empty() {
        return None;
    }
    let minute = u32::try_from(row.minute).ok()?;
    let side = match row.team_side.as_deref() {
        Some("home") => Some(TeamSide::Home),
        Some("away") => Some(TeamSide::Away),
        _ => None,
    };
    Some(GoalEvent {
        id: row.id,
        minute,
        scorer_id: row.scorer_id,
        assist_id: row.assist_id.filter(|a| !a.is_empty()),
        own_goal: row.own_goal,
        side,
    })
}

fn side_key(side: TeamSide) -> &'static str {
    match side {
        TeamSide::Home => "home",
        TeamSide::Away => "away",
    }
}

fn status_key(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Available => "available",
        PlayerStatus::Injured => "injured",
        PlayerStatus::Unavailable => "unavailable",
    }
}

fn parse_status(raw: &str) -> Option<PlayerStatus> {
    match raw {
        "available" => Some(PlayerStatus::Available),
        "injured" => Some(PlayerStatus::Injured),
        "unavailable" => Some(PlayerStatus::Unavailable),
        _ => None,
    }
}

/// Replace the whole database contents with `book`.
pub fn save_book(conn: &mut Connection, book: &SeasonBook) -> Result<()> {
    let tx = conn.transaction().context("begin save transaction")?;
    tx.execute_batch(
        "DELETE FROM goals; DELETE FROM subs; DELETE FROM matches;
         DELETE FROM players; DELETE FROM opponents; DELETE FROM venues; DELETE FROM leagues;",
    )
    .context("clear tables")?;

    for (table, refs) in [
        ("opponents", &book.opponents),
        ("venues", &book.venues),
        ("leagues", &book.leagues),
    ] {
        for r in refs {
            tx.execute(
                &format!("INSERT INTO {table}(id, name) VALUES (?1, ?2)"),
                params![r.id, r.name],
            )
            .with_context(|| format!("insert into {table}"))?;
        }
    }

    for p in &book.players {
        tx.execute(
            "INSERT INTO players(id, name, shirt, position, status) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![p.id, p.name, p.shirt, p.position, p.status.map(status_key)],
        )
        .context("insert player")?;
    }

    for m in &book.matches {
        insert_match(&tx, m)?;
    }
    tx.commit().context("commit save transaction")?;
    Ok(())
}

fn insert_match(tx: &Transaction<'_>, m: &MatchRecord) -> Result<()> {
    tx.execute(
        "INSERT INTO matches(id, date, opponent_id, home_away, venue_id, league_id,
                             is_friendly, team_size, our_score, their_score, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            m.id,
            m.date.format("%Y-%m-%d").to_string(),
            m.opponent_id,
            m.home_away.as_str(),
            m.venue_id,
            m.league_id,
            m.is_friendly,
            m.team_size.players(),
            m.our_score,
            m.their_score,
            m.notes,
        ],
    )
    .with_context(|| format!("insert match {}", m.id))?;
    insert_goals(tx, &m.id, &m.goals)?;
    for (seq, s) in m.subs.iter().enumerate() {
        tx.execute(
            "INSERT INTO subs(id, match_id, seq, player_id, minute) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![s.id, m.id, seq as i64, s.player_id, s.minute],
        )
        .context("insert sub")?;
    }
    Ok(())
}

/// Append goals to a stored match, after any it already has.
pub fn insert_goals(conn: &Connection, match_id: &str, goals: &[GoalEvent]) -> Result<()> {
    let start: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(seq) + 1, 0) FROM goals WHERE match_id = ?1",
            params![match_id],
            |row| row.get(0),
        )
        .context("query goal seq")?;
    for (n, g) in goals.iter().enumerate() {
        conn.execute(
            "INSERT INTO goals(id, match_id, seq, minute, scorer_id, assist_id, own_goal, team_side)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                g.id,
                match_id,
                start + n as i64,
                g.minute,
                g.scorer_id,
                g.assist_id,
                g.own_goal,
                g.side.map(side_key),
            ],
        )
        .with_context(|| format!("insert goal {}", g.id))?;
    }
    Ok(())
}

pub fn update_match_score(
    conn: &Connection,
    match_id: &str,
    our: u32,
    their: u32,
) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE matches SET our_score = ?1, their_score = ?2 WHERE id = ?3",
            params![our, their, match_id],
        )
        .context("update match score")?;
    Ok(changed > 0)
}

/// Case-insensitive find-or-create by name; returns the opponent id, or `None`
/// for a blank name.
pub fn upsert_opponent_by_name(conn: &Connection, name: &str) -> Result<Option<String>> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let existing = conn
        .query_row(
            "SELECT id FROM opponents WHERE name = ?1 COLLATE NOCASE LIMIT 1",
            params![trimmed],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .context("find opponent")?;
    if let Some(id) = existing {
        return Ok(Some(id));
    }
    let id = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO opponents(id, name) VALUES (?1, ?2)",
        params![id, trimmed],
    )
    .context("insert opponent")?;
    Ok(Some(id))
}

fn load_named(conn: &Connection, table: &str) -> Result<Vec<NamedRef>> {
    let mut stmt = conn
        .prepare(&format!("SELECT id, name FROM {table} ORDER BY rowid ASC"))
        .with_context(|| format!("prepare {table} query"))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(NamedRef::new(
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })
        .with_context(|| format!("query {table}"))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.with_context(|| format!("decode {table} row"))?);
    }
    Ok(out)
}

pub fn load_book(conn: &Connection) -> Result<SeasonBook> {
    let opponents = load_named(conn, "opponents")?;
    let venues = load_named(conn, "venues")?;
    let leagues = load_named(conn, "leagues")?;

    let mut stmt = conn
        .prepare("SELECT id, name, shirt, position, status FROM players ORDER BY rowid ASC")
        .context("prepare players query")?;
    let rows = stmt
        .query_map([], |row| {
            let status: Option<String> = row.get(4)?;
            Ok(Player {
                id: row.get(0)?,
                name: row.get(1)?,
                shirt: row.get(2)?,
                position: row.get(3)?,
                status: status.as_deref().and_then(parse_status),
            })
        })
        .context("query players")?;
    let mut players = Vec::new();
    for row in rows {
        players.push(row.context("decode player row")?);
    }

    let mut goals_by_match: HashMap<String, Vec<GoalEvent>> = HashMap::new();
    let mut stmt = conn
        .prepare(
            "SELECT id, match_id, minute, scorer_id, assist_id, own_goal, team_side
             FROM goals ORDER BY match_id ASC, seq ASC",
        )
        .context("prepare goals query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(GoalRow {
                id: row.get(0)?,
                match_id: row.get(1)?,
                minute: row.get(2)?,
                scorer_id: row.get(3)?,
                assist_id: row.get(4)?,
                own_goal: row.get::<_, i64>(5)? != 0,
                team_side: row.get(6)?,
            })
        })
        .context("query goals")?;
    for row in rows {
        let row = row.context("decode goal row")?;
        let match_id = row.match_id.clone();
        if let Some(goal) = normalize_goal_row(row) {
            goals_by_match.entry(match_id).or_default().push(goal);
        }
    }

    let mut subs_by_match: HashMap<String, Vec<SubEvent>> = HashMap::new();
    let mut stmt = conn
        .prepare("SELECT id, match_id, player_id, minute FROM subs ORDER BY match_id ASC, seq ASC")
        .context("prepare subs query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(1)?,
                SubEvent {
                    id: row.get(0)?,
                    player_id: row.get(2)?,
                    minute: row.get(3)?,
                },
            ))
        })
        .context("query subs")?;
    for row in rows {
        let (match_id, sub) = row.context("decode sub row")?;
        subs_by_match.entry(match_id).or_default().push(sub);
    }

    let mut stmt = conn
        .prepare(
            "SELECT id, date, opponent_id, home_away, venue_id, league_id,
                    is_friendly, team_size, our_score, their_score, notes
             FROM matches ORDER BY date DESC, rowid ASC",
        )
        .context("prepare matches query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(MatchRow {
                id: row.get(0)?,
                date: row.get(1)?,
                opponent_id: row.get(2)?,
                home_away: row.get(3)?,
                venue_id: row.get(4)?,
                league_id: row.get(5)?,
                is_friendly: row.get::<_, Option<i64>>(6)?.map(|v| v != 0),
                team_size: row.get(7)?,
                our_score: row.get(8)?,
                their_score: row.get(9)?,
                notes: row.get(10)?,
            })
        })
        .context("query matches")?;
    let mut matches = Vec::new();
    for row in rows {
        let row = row.context("decode match row")?;
        let goals = goals_by_match.remove(&row.id).unwrap_or_default();
        let subs = subs_by_match.remove(&row.id).unwrap_or_default();
        if let Some(record) = normalize_match_row(row, goals, subs) {
            matches.push(record);
        }
    }

    Ok(SeasonBook {
        players,
        opponents,
        venues,
        leagues,
        matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_columns_normalize_to_defaults() {
        let row = MatchRow {
            id: "m1".to_string(),
            date: "2025-10-04".to_string(),
            home_away: "home".to_string(),
            team_size: Some(7),
            ..MatchRow::default()
        };
        let rec = normalize_match_row(row, Vec::new(), Vec::new()).expect("valid date");
        assert_eq!(rec.our_score, 0);
        assert_eq!(rec.their_score, 0);
        assert!(!rec.is_friendly);
        assert_eq!(rec.team_size, TeamSize::Eleven);
        assert_eq!(rec.home_away, HomeAway::Home);
        assert_eq!(rec.opponent_id, "");
    }

    #[test]
    fn bad_rows_are_dropped() {
        let row = MatchRow {
            id: "m1".to_string(),
            date: "October".to_string(),
            ..MatchRow::default()
        };
        assert!(normalize_match_row(row, Vec::new(), Vec::new()).is_none());

        let goal = GoalRow {
            id: "g".to_string(),
            minute: -2,
            scorer_id: "p".to_string(),
            ..GoalRow::default()
        };
        assert!(normalize_goal_row(goal).is_none());
        let blank = GoalRow {
            id: "g".to_string(),
            minute: 4,
            ..GoalRow::default()
        };
        assert!(normalize_goal_row(blank).is_none());
    }

    #[test]
    fn opponent_upsert_is_case_insensitive() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let a = upsert_opponent_by_name(&conn, "Swords Celtic").unwrap();
        let b = upsert_opponent_by_name(&conn, "  swords celtic ").unwrap();
        assert_eq!(a, b);
        assert_eq!(upsert_opponent_by_name(&conn, "  ").unwrap(), None);
        assert_eq!(load_named(&conn, "opponents").unwrap().len(), 1);
    }
}
