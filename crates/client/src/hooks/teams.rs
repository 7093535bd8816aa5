use courtside_shared::{ApiError, Injury, Roster, ServiceReply, TeamGameLogEntry, TeamId};
use futures_util::future::{FutureExt, LocalBoxFuture};

use super::{require, Hook, Query};
use crate::api_client::ApiClient;
use crate::cancellation::CancellationToken;
use crate::query::QueryKey;

/// Roster of one team.
pub struct TeamPlayersQuery;

impl Query for TeamPlayersQuery {
    type Input = Option<TeamId>;
    type Params = TeamId;
    type Output = Roster;

    fn validate(input: &Option<TeamId>) -> Result<TeamId, ApiError> {
        require(input, "team_id")
    }

    fn key(team_id: &TeamId) -> QueryKey {
        QueryKey::TeamPlayers(*team_id)
    }

    fn fetch(
        client: ApiClient,
        team_id: TeamId,
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<ServiceReply<Roster>, ApiError>> {
        async move {
            let roster = client.team_players(team_id, &token).await?;
            Ok(ServiceReply::Ready(roster))
        }
        .boxed_local()
    }
}

pub type TeamPlayersHook = Hook<TeamPlayersQuery>;

/// Injury report of one team.
pub struct TeamInjuriesQuery;

impl Query for TeamInjuriesQuery {
    type Input = Option<TeamId>;
    type Params = TeamId;
    type Output = Vec<Injury>;

    fn validate(input: &Option<TeamId>) -> Result<TeamId, ApiError> {
        require(input, "team_id")
    }

    fn key(team_id: &TeamId) -> QueryKey {
        QueryKey::TeamInjuries(*team_id)
    }

    fn fetch(
        client: ApiClient,
        team_id: TeamId,
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<ServiceReply<Vec<Injury>>, ApiError>> {
        async move {
            let report = client.team_injuries(team_id, &token).await?;
            Ok(ServiceReply::Ready(report.injuries))
        }
        .boxed_local()
    }
}

pub type TeamInjuriesHook = Hook<TeamInjuriesQuery>;

/// Season game log of one team, most recent first as served.
pub struct TeamGamesQuery;

impl Query for TeamGamesQuery {
    type Input = Option<TeamId>;
    type Params = TeamId;
    type Output = Vec<TeamGameLogEntry>;

    fn validate(input: &Option<TeamId>) -> Result<TeamId, ApiError> {
        require(input, "team_id")
    }

    fn key(team_id: &TeamId) -> QueryKey {
        QueryKey::TeamGames(*team_id)
    }

    fn fetch(
        client: ApiClient,
        team_id: TeamId,
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<ServiceReply<Vec<TeamGameLogEntry>>, ApiError>> {
        async move {
            let games = client.team_games(team_id, &token).await?;
            Ok(ServiceReply::Ready(games))
        }
        .boxed_local()
    }
}

pub type TeamGamesHook = Hook<TeamGamesQuery>;
