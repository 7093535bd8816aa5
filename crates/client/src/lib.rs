//! Courtside Client - data layer of the NBA predictions dashboard
//!
//! Fetches games, rosters, injuries and model predictions from the
//! prediction service and reconciles them into per-widget view state.
//! Rendering is left to whichever UI runtime drives the hooks.

pub mod logging;

pub mod api_client;
pub mod cancellation;
pub mod config;
pub mod diagnostics;
pub mod hooks;
pub mod query;
pub mod refresh_gate;
pub mod scope;
pub mod transport;
pub mod view_model;

pub use api_client::{ApiClient, RequestOptions};
pub use cancellation::{CancellationManager, CancellationToken};
pub use config::ClientConfig;
pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink, NullSink, RecordingSink};
pub use hooks::{
    BatchPredictionsHook, GamePredictionHook, GamesTodayHook, Hook, PlayerPredictionHook, Query,
    ResourceHook, Subscription, TeamGamesHook, TeamInjuriesHook, TeamPlayersHook,
};
pub use query::{HookId, HookSnapshot, QueryKey, RequestKey, RequestState};
pub use refresh_gate::{GateState, RefreshGate};
pub use scope::QueryScope;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
