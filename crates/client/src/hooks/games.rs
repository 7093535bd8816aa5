use courtside_shared::{ApiError, Scoreboard, ServiceReply};
use futures_util::future::{FutureExt, LocalBoxFuture};

use super::{Hook, Query};
use crate::api_client::ApiClient;
use crate::cancellation::CancellationToken;
use crate::query::QueryKey;

/// Today's scoreboard for the game grid.
pub struct GamesTodayQuery;

impl Query for GamesTodayQuery {
    type Input = ();
    type Params = ();
    type Output = Scoreboard;

    fn validate(_input: &()) -> Result<(), ApiError> {
        Ok(())
    }

    fn key(_params: &()) -> QueryKey {
        QueryKey::GamesToday
    }

    fn fetch(
        client: ApiClient,
        _params: (),
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<ServiceReply<Scoreboard>, ApiError>> {
        async move {
            let today = client.games_today(&token).await?;
            Ok(ServiceReply::Ready(today.scoreboard))
        }
        .boxed_local()
    }
}

pub type GamesTodayHook = Hook<GamesTodayQuery>;
