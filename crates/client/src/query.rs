//! Query keys and per-hook request state.

use std::fmt;

use courtside_shared::{PlayerId, TeamId};

/// Identifies one logical, parameterized request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    GamesToday,
    TeamGames(TeamId),
    TeamPlayers(TeamId),
    TeamInjuries(TeamId),
    GamePrediction { game_id: String, team_id: TeamId },
    PlayerPrediction(PlayerId),
    BatchPredictions(TeamId),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::GamesToday => write!(f, "games/today"),
            QueryKey::TeamGames(id) => write!(f, "team-games/{id}"),
            QueryKey::TeamPlayers(id) => write!(f, "team-players/{id}"),
            QueryKey::TeamInjuries(id) => write!(f, "team-injuries/{id}"),
            QueryKey::GamePrediction { game_id, team_id } => {
                write!(f, "game-prediction/{game_id}/{team_id}")
            }
            QueryKey::PlayerPrediction(id) => write!(f, "player-prediction/{id}"),
            QueryKey::BatchPredictions(id) => write!(f, "batch-predictions/{id}"),
        }
    }
}

/// Identity of one hook instance inside its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub(crate) u64);

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hook-{}", self.0)
    }
}

/// Cancellation registry key: a query as issued by one hook.
///
/// At most one network operation per request key is in flight inside a
/// scope. Two hooks showing the same team each own their own request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub hook: HookId,
    pub query: QueryKey,
}

impl RequestKey {
    pub fn new(hook: HookId, query: QueryKey) -> Self {
        Self { hook, query }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.query, self.hook)
    }
}

/// Lifecycle of one hook's request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What a view reads from a hook: (data, loading, error) plus warm-up.
#[derive(Debug, Clone, PartialEq)]
pub struct HookSnapshot<T> {
    pub state: RequestState<T>,
    /// The service is still computing this prediction. Independent of
    /// `state`: it survives a reload and is cleared by the next real answer.
    pub warming_up: bool,
}

impl<T> Default for HookSnapshot<T> {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
            warming_up: false,
        }
    }
}

impl<T> HookSnapshot<T> {
    pub fn data(&self) -> Option<&T> {
        self.state.data()
    }

    pub fn loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }
}
