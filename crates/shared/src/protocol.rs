//! Endpoint table of the prediction service REST contract.

use crate::models::PlayerId;

/// Every route the client talks to. All are `GET` and return JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    GamesToday,
    /// `?id=` team record (season game log)
    Team,
    /// `?teamid=` roster tuple
    TeamPlayers,
    /// `?teamid=`
    Injuries,
    /// `?gameid=&teamid=`
    GamePrediction,
    /// `?playerid=`
    PlayerPrediction,
    /// `?player_ids=` comma-joined
    BatchPredictions,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Endpoint::Health => "/health",
            Endpoint::GamesToday => "/api/nba/games/today",
            Endpoint::Team => "/api/nba/teams/",
            Endpoint::TeamPlayers => "/api/nba/teamplayers/",
            Endpoint::Injuries => "/api/nba/injuries/",
            Endpoint::GamePrediction => "/api/nba/predictions/today/",
            Endpoint::PlayerPrediction => "/api/nba/predictions/player/today/",
            Endpoint::BatchPredictions => "/api/nba/predictions/players/batch/",
        }
    }
}

pub const PARAM_TEAM_RECORD_ID: &str = "id";
pub const PARAM_TEAM_ID: &str = "teamid";
pub const PARAM_GAME_ID: &str = "gameid";
pub const PARAM_PLAYER_ID: &str = "playerid";
pub const PARAM_PLAYER_IDS: &str = "player_ids";

/// Join ids into the single `player_ids` parameter of the batch endpoint.
pub fn join_player_ids(ids: &[PlayerId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_ids_without_spaces() {
        assert_eq!(join_player_ids(&[1, 22, 333]), "1,22,333");
        assert_eq!(join_player_ids(&[]), "");
    }
}
