//! Display values derived from decoded payloads. No layout lives here.

use courtside_shared::{
    BatchPredictions, Game, GameStatus, Leader, PlayerId, PlayerPointsPrediction, PredictionOutcome,
    Roster, Team,
};
use serde::Serialize;

/// Shown wherever a number does not exist yet.
pub const PLACEHOLDER: &str = "-";

const REGULATION_PERIODS: u32 = 4;

/// Score for one side; scheduled games have no score, not a zero.
pub fn score_text(status: GameStatus, team: &Team) -> String {
    match status {
        GameStatus::Scheduled => PLACEHOLDER.to_string(),
        GameStatus::Live | GameStatus::Final => team.score.to_string(),
    }
}

pub fn record_text(team: &Team) -> String {
    format!("{}-{}", team.wins, team.losses)
}

/// `Q1`..`Q4`, then `OT1`, `OT2`, ...; empty before tip-off.
pub fn period_label(period: u32) -> String {
    match period {
        0 => String::new(),
        p if p <= REGULATION_PERIODS => format!("Q{p}"),
        p => format!("OT{}", p - REGULATION_PERIODS),
    }
}

/// `PT05M32.00S` -> `5:32`. Anything unparseable yields `None`.
pub fn format_clock(clock: &str) -> Option<String> {
    let rest = clock.trim().strip_prefix("PT")?;
    let (minutes, seconds) = match rest.split_once('M') {
        Some((m, s)) => (m, s),
        None => ("0", rest),
    };
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: f64 = seconds.trim_end_matches('S').parse().ok()?;
    if !(0.0..60.0).contains(&seconds) {
        return None;
    }
    Some(format!("{}:{:02}", minutes, seconds.floor() as u32))
}

pub fn status_line(game: &Game) -> String {
    match game.game_status {
        GameStatus::Scheduled => {
            if !game.game_status_text.trim().is_empty() {
                game.game_status_text.trim().to_string()
            } else if let Some(tip) = game.game_time_utc {
                tip.format("%H:%M UTC").to_string()
            } else {
                "Scheduled".to_string()
            }
        }
        GameStatus::Live => match format_clock(&game.game_clock) {
            Some(clock) => format!("{} {}", period_label(game.period), clock)
                .trim()
                .to_string(),
            None => game.game_status_text.trim().to_string(),
        },
        GameStatus::Final => {
            let text = game.game_status_text.trim();
            if text.starts_with("Final") {
                text.to_string()
            } else {
                "Final".to_string()
            }
        }
    }
}

pub fn win_probability_text(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideLine {
    pub team_id: u64,
    pub tricode: String,
    pub name: String,
    pub record: String,
    pub score: String,
    pub leader: Option<String>,
}

/// Everything one tile of the game grid shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameCard {
    pub game_id: String,
    pub status: String,
    pub home: SideLine,
    pub away: SideLine,
}

impl GameCard {
    pub fn from_game(game: &Game) -> Self {
        let leaders = game.game_leaders.clone().unwrap_or_default();
        let side = |team: &Team, leader: Option<&Leader>| SideLine {
            team_id: team.team_id,
            tricode: team.team_tricode.clone(),
            name: team.full_name(),
            record: record_text(team),
            score: score_text(game.game_status, team),
            leader: leader
                .filter(|l| game.game_status != GameStatus::Scheduled && !l.name.is_empty())
                .map(|l| format!("{} {} PTS {} REB {} AST", l.name, l.points, l.rebounds, l.assists)),
        };
        Self {
            game_id: game.game_id.clone(),
            status: status_line(game),
            home: side(&game.home_team, leaders.home_leaders.as_ref()),
            away: side(&game.away_team, leaders.away_leaders.as_ref()),
        }
    }
}

/// One player line of the team predictions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    pub player_id: PlayerId,
    pub name: String,
    pub outcome: PredictionOutcome<PlayerPointsPrediction>,
}

impl PredictionRow {
    pub fn points_text(&self) -> String {
        match &self.outcome {
            PredictionOutcome::Ok(p) => format!("{:.1}", p.predicted_points),
            PredictionOutcome::SoftError(_) => PLACEHOLDER.to_string(),
        }
    }
}

/// Join roster names with batch outcomes, keeping roster order.
/// A player the batch left out becomes a soft error.
pub fn merge_roster_predictions(roster: &Roster, mut batch: BatchPredictions) -> Vec<PredictionRow> {
    roster
        .players
        .iter()
        .map(|player| PredictionRow {
            player_id: player.player_id,
            name: player.name.clone(),
            outcome: batch
                .remove(&player.player_id)
                .unwrap_or_else(|| PredictionOutcome::SoftError("no prediction returned".into())),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
}

/// Prop-style context for a points prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropContext {
    pub vs_recent_avg: Option<f64>,
    pub vs_season_avg: Option<f64>,
    pub confidence: Option<Confidence>,
}

impl PropContext {
    pub fn from_prediction(prediction: &PlayerPointsPrediction) -> Self {
        let diff = |avg: Option<f64>| avg.map(|a| round1(prediction.predicted_points - a));
        let vs_recent_avg = diff(prediction.recent_avg);
        Self {
            vs_recent_avg,
            vs_season_avg: diff(prediction.season_avg),
            confidence: vs_recent_avg.map(|d| {
                if d.abs() < 3.0 {
                    Confidence::High
                } else {
                    Confidence::Medium
                }
            }),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
