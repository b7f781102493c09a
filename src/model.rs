use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::{self, Outcome};

/// Display value for any reference that no longer resolves.
pub const FALLBACK_NAME: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Available,
    Injured,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shirt: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PlayerStatus>,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shirt: None,
            position: None,
            status: None,
        }
    }

    pub fn status(&self) -> PlayerStatus {
        self.status.unwrap_or_default()
    }

    /// Picker label, e.g. `#9 Alice Byrne · FW`.
    pub fn label(&self) -> String {
        let mut out = String::new();
        if let Some(shirt) = self.shirt {
            out.push_str(&format!("#{shirt} "));
        }
        out.push_str(&self.name);
        if let Some(pos) = self.position.as_deref().filter(|p| !p.is_empty()) {
            out.push_str(" · ");
            out.push_str(pos);
        }
        out
    }
}

/// Reference records (opponents, venues, leagues) carry nothing but a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

impl NamedRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

pub type Opponent = NamedRef;
pub type Venue = NamedRef;
pub type League = NamedRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HomeAway {
    #[default]
    Home,
    Away,
}

impl HomeAway {
    pub fn as_str(self) -> &'static str {
        match self {
            HomeAway::Home => "Home",
            HomeAway::Away => "Away",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" => Some(HomeAway::Home),
            "away" => Some(HomeAway::Away),
            _ => None,
        }
    }
}

impl fmt::Display for HomeAway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the pitch a goal is credited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    #[default]
    Home,
    Away,
}

impl TeamSide {
    pub fn opposite(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TeamSide::Home => "Home",
            TeamSide::Away => "Away",
        }
    }
}

impl From<HomeAway> for TeamSide {
    fn from(value: HomeAway) -> Self {
        match value {
            HomeAway::Home => TeamSide::Home,
            HomeAway::Away => TeamSide::Away,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TeamSize {
    Nine,
    #[default]
    Eleven,
}

impl TeamSize {
    pub fn players(self) -> u8 {
        match self {
            TeamSize::Nine => 9,
            TeamSize::Eleven => 11,
        }
    }
}

impl TryFrom<u8> for TeamSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            9 => Ok(TeamSize::Nine),
            11 => Ok(TeamSize::Eleven),
            other => Err(format!("unsupported team size {other} (expected 9 or 11)")),
        }
    }
}

impl From<TeamSize> for u8 {
    fn from(value: TeamSize) -> Self {
        value.players()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalEvent {
    pub id: String,
    pub minute: u32,
    pub scorer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assist_id: Option<String>,
    #[serde(default)]
    pub own_goal: bool,
    /// Credited side, when the goal was entered through the side-aware editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<TeamSide>,
}

impl GoalEvent {
    pub fn new(id: impl Into<String>, minute: u32, scorer_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            minute,
            scorer_id: scorer_id.into(),
            assist_id: None,
            own_goal: false,
            side: None,
        }
    }

    pub fn with_assist(mut self, assist_id: impl Into<String>) -> Self {
        self.assist_id = Some(assist_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubEvent {
    pub id: String,
    pub player_id: String,
    pub minute: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub date: NaiveDate,
    pub opponent_id: String,
    #[serde(default)]
    pub home_away: HomeAway,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_id: Option<String>,
    #[serde(default)]
    pub is_friendly: bool,
    #[serde(default)]
    pub team_size: TeamSize,
    pub our_score: u32,
    pub their_score: u32,
    #[serde(default)]
    pub goals: Vec<GoalEvent>,
    #[serde(default)]
    pub subs: Vec<SubEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MatchRecord {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        opponent_id: impl Into<String>,
        our_score: u32,
        their_score: u32,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            opponent_id: opponent_id.into(),
            home_away: HomeAway::Home,
            venue_id: None,
            league_id: None,
            is_friendly: false,
            team_size: TeamSize::Eleven,
            our_score,
            their_score,
            goals: Vec::new(),
            subs: Vec::new(),
            notes: None,
        }
    }

    pub fn outcome(&self) -> Outcome {
        ledger::outcome(self.our_score, self.their_score)
    }

    /// The side our team occupies in this fixture.
    pub fn our_side(&self) -> TeamSide {
        self.home_away.into()
    }
}
