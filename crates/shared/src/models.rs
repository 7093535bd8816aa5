//! Wire models for the NBA prediction service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type TeamId = u64;
pub type PlayerId = u64;

// --- Games ---

/// Live scoreboard status. The wire carries `1`, `2`, `3`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum GameStatus {
    Scheduled,
    Live,
    Final,
}

impl TryFrom<u8> for GameStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GameStatus::Scheduled),
            2 => Ok(GameStatus::Live),
            3 => Ok(GameStatus::Final),
            other => Err(format!("unknown game status {other}")),
        }
    }
}

impl From<GameStatus> for u8 {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Scheduled => 1,
            GameStatus::Live => 2,
            GameStatus::Final => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodScore {
    pub period: u32,
    #[serde(default)]
    pub period_type: String,
    #[serde(default)]
    pub score: u32,
}

/// One side of a game as it appears on the scoreboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: TeamId,
    pub team_name: String,
    #[serde(default)]
    pub team_city: String,
    pub team_tricode: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub periods: Vec<PeriodScore>,
}

impl Team {
    pub fn full_name(&self) -> String {
        if self.team_city.is_empty() {
            self.team_name.clone()
        } else {
            format!("{} {}", self.team_city, self.team_name)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    #[serde(default)]
    pub person_id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub jersey_num: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub team_tricode: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub rebounds: u32,
    #[serde(default)]
    pub assists: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameLeaders {
    #[serde(default)]
    pub home_leaders: Option<Leader>,
    #[serde(default)]
    pub away_leaders: Option<Leader>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub game_id: String,
    pub game_status: GameStatus,
    #[serde(default)]
    pub game_status_text: String,
    #[serde(default)]
    pub period: u32,
    /// ISO-8601 duration such as `PT05M32.00S`; empty before tip-off.
    #[serde(default)]
    pub game_clock: String,
    #[serde(default, rename = "gameTimeUTC")]
    pub game_time_utc: Option<DateTime<Utc>>,
    pub home_team: Team,
    pub away_team: Team,
    #[serde(default)]
    pub game_leaders: Option<GameLeaders>,
}

impl Game {
    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        [&self.home_team, &self.away_team]
            .into_iter()
            .find(|t| t.team_id == team_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scoreboard {
    #[serde(default)]
    pub game_date: Option<NaiveDate>,
    #[serde(default)]
    pub games: Vec<Game>,
}

/// Body of `GET /api/nba/games/today`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodayGames {
    pub scoreboard: Scoreboard,
}

// --- Teams ---

/// One row of a team's season game log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamGameLogEntry {
    #[serde(rename = "Game_ID", alias = "GAME_ID")]
    pub game_id: String,
    #[serde(rename = "GAME_DATE")]
    pub game_date: String,
    #[serde(rename = "MATCHUP")]
    pub matchup: String,
    #[serde(rename = "WL", default)]
    pub result: Option<String>,
    #[serde(rename = "W", default)]
    pub wins: Option<u32>,
    #[serde(rename = "L", default)]
    pub losses: Option<u32>,
    #[serde(rename = "PTS", default)]
    pub points: Option<u32>,
    #[serde(rename = "FG_PCT", default)]
    pub fg_pct: Option<f64>,
    #[serde(rename = "FG3_PCT", default)]
    pub fg3_pct: Option<f64>,
    #[serde(rename = "REB", default)]
    pub rebounds: Option<u32>,
    #[serde(rename = "AST", default)]
    pub assists: Option<u32>,
    #[serde(rename = "TOV", default)]
    pub turnovers: Option<u32>,
}

impl TeamGameLogEntry {
    pub fn is_home(&self) -> bool {
        self.matchup.contains("vs.")
    }

    pub fn won(&self) -> Option<bool> {
        self.result.as_deref().map(|wl| wl.eq_ignore_ascii_case("W"))
    }
}

/// Team record as served by `GET /api/nba/teams/`: the season game log,
/// either bare or wrapped in `{"games": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TeamRecord {
    Rows(Vec<TeamGameLogEntry>),
    Wrapped { games: Vec<TeamGameLogEntry> },
}

impl TeamRecord {
    pub fn into_games(self) -> Vec<TeamGameLogEntry> {
        match self {
            TeamRecord::Rows(games) | TeamRecord::Wrapped { games } => games,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RosterPlayer {
    pub player_id: PlayerId,
    pub name: String,
}

/// Team roster decoded from the `[playerIds[], playerNames[]]` tuple.
/// Extra ids or names without a partner are dropped.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Roster {
    pub players: Vec<RosterPlayer>,
}

impl Roster {
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.player_id).collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (ids, names): (Vec<FlexId>, Vec<String>) = Deserialize::deserialize(deserializer)?;
        let players = ids
            .into_iter()
            .zip(names)
            .map(|(id, name)| RosterPlayer {
                player_id: id.0,
                name,
            })
            .collect();
        Ok(Roster { players })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Injury {
    #[serde(rename = "PLAYER_NAME")]
    pub player_name: String,
    #[serde(rename = "STATUS", default)]
    pub status: String,
    #[serde(rename = "REASON", default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InjuryReport {
    #[serde(default)]
    pub injuries: Vec<Injury>,
}

// --- Helpers ---

/// Player ids arrive as numbers from most endpoints and as strings from a few.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FlexId(pub PlayerId);

impl<'de> Deserialize<'de> for FlexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u64),
            Text(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(FlexId(n)),
            Repr::Text(s) => s
                .trim()
                .parse()
                .map(FlexId)
                .map_err(|_| serde::de::Error::custom(format!("invalid player id {s:?}"))),
        }
    }
}

pub(crate) fn de_opt_flex_id<'de, D>(deserializer: D) -> Result<Option<PlayerId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FlexId>::deserialize(deserializer)?.map(|id| id.0))
}
