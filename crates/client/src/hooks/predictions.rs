use courtside_shared::{
    ApiError, PlayerId, PlayerPointsPrediction, ServiceReply, TeamId, TeamPrediction,
};
use futures_util::future::{FutureExt, LocalBoxFuture};

use super::{require, Hook, Query};
use crate::api_client::ApiClient;
use crate::cancellation::CancellationToken;
use crate::query::QueryKey;
use crate::view_model::{merge_roster_predictions, PredictionRow};

/// Win probability for one side of a game. May answer "warming up".
pub struct GamePredictionQuery;

impl Query for GamePredictionQuery {
    /// `(game_id, team_id)`
    type Input = (Option<String>, Option<TeamId>);
    type Params = (String, TeamId);
    type Output = TeamPrediction;

    fn validate(input: &Self::Input) -> Result<Self::Params, ApiError> {
        let game_id = require(&input.0, "game_id")?;
        if game_id.trim().is_empty() {
            return Err(ApiError::missing("game_id"));
        }
        Ok((game_id, require(&input.1, "team_id")?))
    }

    fn key(params: &Self::Params) -> QueryKey {
        QueryKey::GamePrediction {
            game_id: params.0.clone(),
            team_id: params.1,
        }
    }

    fn fetch(
        client: ApiClient,
        (game_id, team_id): Self::Params,
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<ServiceReply<TeamPrediction>, ApiError>> {
        async move { client.game_prediction(&game_id, team_id, &token).await }.boxed_local()
    }
}

pub type GamePredictionHook = Hook<GamePredictionQuery>;

/// Predicted points for one player. A service-side `{"error"}` fails the hook.
pub struct PlayerPredictionQuery;

impl Query for PlayerPredictionQuery {
    type Input = Option<PlayerId>;
    type Params = PlayerId;
    type Output = PlayerPointsPrediction;

    fn validate(input: &Option<PlayerId>) -> Result<PlayerId, ApiError> {
        require(input, "player_id")
    }

    fn key(player_id: &PlayerId) -> QueryKey {
        QueryKey::PlayerPrediction(*player_id)
    }

    fn fetch(
        client: ApiClient,
        player_id: PlayerId,
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<ServiceReply<PlayerPointsPrediction>, ApiError>> {
        async move { client.player_prediction(player_id, &token).await }.boxed_local()
    }
}

pub type PlayerPredictionHook = Hook<PlayerPredictionQuery>;

/// Points predictions for a whole team: the roster, then a single batched
/// request for every player on it, whatever the roster size.
pub struct BatchPredictionsQuery;

impl Query for BatchPredictionsQuery {
    type Input = Option<TeamId>;
    type Params = TeamId;
    type Output = Vec<PredictionRow>;

    fn validate(input: &Option<TeamId>) -> Result<TeamId, ApiError> {
        require(input, "team_id")
    }

    fn key(team_id: &TeamId) -> QueryKey {
        QueryKey::BatchPredictions(*team_id)
    }

    fn fetch(
        client: ApiClient,
        team_id: TeamId,
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<ServiceReply<Vec<PredictionRow>>, ApiError>> {
        async move {
            let roster = client.team_players(team_id, &token).await?;
            let reply = client
                .batch_predictions(&roster.player_ids(), &token)
                .await?;
            Ok(reply.map(|batch| merge_roster_predictions(&roster, batch)))
        }
        .boxed_local()
    }
}

pub type BatchPredictionsHook = Hook<BatchPredictionsQuery>;
