//! Resource hooks: one per resource the dashboard shows.
//!
//! A hook is created inside a view's [`QueryScope`], driven by `load` whenever
//! its parameters change, and read through `snapshot`. Views render
//! `(data, loading, error)` and, for predictions, `warming_up`.
//!
//! ```rust,ignore
//! let scope = QueryScope::new(client, config.refresh_cooldown);
//! let players = TeamPlayersHook::new(&scope);
//!
//! players.load(Some(team_id)).await;
//! match players.snapshot().state {
//!     RequestState::Success(roster) => { /* render */ }
//!     RequestState::Failed(message) => { /* inline error for this widget */ }
//!     _ => { /* spinner */ }
//! }
//!
//! // Refresh button: disabled unless the gate is ready.
//! let enabled = players.refresh_state().is_enabled();
//! ```

use std::cell::RefCell;

use courtside_shared::{ApiError, ServiceReply};
use futures_util::future::LocalBoxFuture;

use crate::api_client::ApiClient;
use crate::cancellation::CancellationToken;
use crate::query::{HookSnapshot, QueryKey};
use crate::refresh_gate::GateState;
use crate::scope::QueryScope;

mod games;
mod predictions;
mod resource;
mod teams;

pub use games::{GamesTodayHook, GamesTodayQuery};
pub use predictions::{
    BatchPredictionsHook, BatchPredictionsQuery, GamePredictionHook, GamePredictionQuery,
    PlayerPredictionHook, PlayerPredictionQuery,
};
pub use resource::{ResourceHook, Subscription};
pub use teams::{
    TeamGamesHook, TeamGamesQuery, TeamInjuriesHook, TeamInjuriesQuery, TeamPlayersHook,
    TeamPlayersQuery,
};

/// Describes one resource: how its parameters are validated, keyed and fetched.
pub trait Query: 'static {
    /// Reactive parameters as the view holds them; identifiers may be missing.
    type Input: Clone + 'static;
    type Params: 'static;
    type Output: Clone + 'static;

    fn validate(input: &Self::Input) -> Result<Self::Params, ApiError>;

    fn key(params: &Self::Params) -> QueryKey;

    fn fetch(
        client: ApiClient,
        params: Self::Params,
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<ServiceReply<Self::Output>, ApiError>>;
}

/// A [`ResourceHook`] bound to one [`Query`].
pub struct Hook<Q: Query> {
    resource: ResourceHook<Q::Output>,
    client: ApiClient,
    last_input: RefCell<Option<Q::Input>>,
}

impl<Q: Query> Hook<Q> {
    pub fn new(scope: &QueryScope) -> Self {
        Self {
            resource: ResourceHook::new(scope),
            client: scope.client().clone(),
            last_input: RefCell::new(None),
        }
    }

    pub fn snapshot(&self) -> HookSnapshot<Q::Output> {
        self.resource.snapshot()
    }

    pub fn resource(&self) -> &ResourceHook<Q::Output> {
        &self.resource
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&HookSnapshot<Q::Output>) + 'static,
    ) -> Subscription {
        self.resource.subscribe(observer)
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.resource.unsubscribe(subscription)
    }

    pub fn refresh_state(&self) -> GateState {
        self.resource.refresh_state()
    }

    /// Fetch for `input`; call on mount and on every parameter change.
    ///
    /// A missing identifier fails immediately without a request.
    pub async fn load(&self, input: Q::Input) {
        *self.last_input.borrow_mut() = Some(input.clone());
        let params = match Q::validate(&input) {
            Ok(params) => params,
            Err(error) => {
                self.resource.fail(error);
                return;
            }
        };
        let key = Q::key(&params);
        let client = self.client.clone();
        self.resource
            .run(key, move |token| Q::fetch(client, params, token))
            .await;
    }

    /// Manual refresh of the last parameters, gated by the cool-down.
    /// Returns `false` when the trigger was rejected or nothing was loaded yet.
    pub async fn refresh(&self) -> bool {
        let Some(input) = self.last_input.borrow().clone() else {
            return false;
        };
        self.resource.gated(self.load(input)).await
    }
}

pub(crate) fn require<T: Clone>(value: &Option<T>, field: &'static str) -> Result<T, ApiError> {
    value.clone().ok_or(ApiError::missing(field))
}
