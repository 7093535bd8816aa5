//! HTTP API client for the prediction service.

use std::rc::Rc;

use courtside_shared::{
    decode_batch_predictions, decode_health, decode_player_prediction, decode_team_prediction,
    join_player_ids, try_error_detail, ApiError, BatchPredictions, Endpoint, InjuryReport,
    PlayerId, PlayerPointsPrediction, Roster, ServiceReply, TeamGameLogEntry, TeamId,
    TeamPrediction, TeamRecord, TodayGames, PARAM_GAME_ID, PARAM_PLAYER_ID, PARAM_PLAYER_IDS,
    PARAM_TEAM_ID, PARAM_TEAM_RECORD_ID,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cancellation::CancellationToken;
use crate::config::ClientConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

/// Per-call options: query params, extra headers and the cancellation token.
#[derive(Debug, Default, Clone)]
pub struct RequestOptions<'a> {
    params: Vec<(&'static str, Option<String>)>,
    headers: Vec<(String, String)>,
    token: Option<&'a CancellationToken>,
}

impl<'a> RequestOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, Some(value.to_string())));
        self
    }

    /// A `None` value is left out of the query string.
    pub fn opt_param<V: ToString>(mut self, name: &'static str, value: Option<V>) -> Self {
        self.params.push((name, value.map(|v| v.to_string())));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn token(mut self, token: &'a CancellationToken) -> Self {
        self.token = Some(token);
        self
    }
}

/// HTTP client for the prediction service.
///
/// Cheap to clone; clones share the transport and diagnostic sink.
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    base_url: String,
    headers: Vec<(String, String)>,
    diagnostics: Rc<dyn DiagnosticSink>,
}

impl ApiClient {
    /// Create a client over any transport, reporting through [`LogSink`].
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Rc::new(transport),
            base_url: String::new(),
            headers: Vec::new(),
            diagnostics: Rc::new(LogSink),
        }
    }

    /// Create a `reqwest`-backed client from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::new(transport).with_base_url(config.api_url.clone()))
    }

    /// Set the base URL for API requests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        merge_header(&mut self.headers, name.into(), value.into());
        self
    }

    pub fn with_diagnostics(mut self, sink: Rc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, params: &[(&'static str, Option<String>)]) -> String {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if self.base_url.is_empty() {
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        } else {
            let base = self.base_url.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{path}")
        };

        let query: Vec<String> = params
            .iter()
            .filter_map(|(name, value)| {
                value.as_ref().map(|value| {
                    format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
                })
            })
            .collect();
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query.join("&"));
        }
        url
    }

    fn headers_for(&self, extra: Vec<(String, String)>) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        for (name, value) in self.headers.iter().cloned().chain(extra) {
            merge_header(&mut headers, name, value);
        }
        headers
    }

    /// GET `endpoint` and return the decoded JSON body.
    ///
    /// Fails with [`ApiError::Http`] on a non-2xx status and with
    /// [`ApiError::Aborted`] when the token is cancelled first.
    pub async fn request(
        &self,
        endpoint: Endpoint,
        options: RequestOptions<'_>,
    ) -> Result<Value, ApiError> {
        let RequestOptions {
            params,
            headers,
            token,
        } = options;
        let request = HttpRequest {
            url: self.url(endpoint.path(), &params),
            headers: self.headers_for(headers),
        };
        let url = request.url.clone();
        self.diagnostics.record(&Diagnostic::Started { url: url.clone() });

        let call = self.transport.get(&request);
        let result = match token {
            Some(token) => token.run(call).await,
            None => call.await,
        };

        let response = match result {
            Ok(response) => response,
            Err(ApiError::Aborted) => {
                self.diagnostics.record(&Diagnostic::Aborted { url });
                return Err(ApiError::Aborted);
            }
            Err(error) => {
                self.diagnostics.record(&Diagnostic::Failed {
                    url,
                    error: error.clone(),
                    detail: None,
                });
                return Err(error);
            }
        };

        if !response.is_success() {
            let error = ApiError::Http {
                status: response.status,
                status_text: response.status_text,
            };
            self.diagnostics.record(&Diagnostic::Failed {
                url,
                error: error.clone(),
                detail: try_error_detail(&response.body),
            });
            return Err(error);
        }

        if response.body.trim().is_empty() {
            self.diagnostics.record(&Diagnostic::Succeeded {
                url,
                status: response.status,
            });
            return Ok(Value::Null);
        }

        match serde_json::from_str(&response.body) {
            Ok(value) => {
                self.diagnostics.record(&Diagnostic::Succeeded {
                    url,
                    status: response.status,
                });
                Ok(value)
            }
            Err(e) => {
                let error = ApiError::Deserialize(e.to_string());
                self.diagnostics.record(&Diagnostic::Failed {
                    url,
                    error: error.clone(),
                    detail: None,
                });
                Err(error)
            }
        }
    }

    /// GET `endpoint` and decode the body into `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        options: RequestOptions<'_>,
    ) -> Result<T, ApiError> {
        let value = self.request(endpoint, options).await?;
        Ok(serde_json::from_value(value)?)
    }

    // --- Prediction service endpoints ---

    /// Liveness probe
    pub async fn health(&self) -> Result<bool, ApiError> {
        let value = self.request(Endpoint::Health, RequestOptions::new()).await?;
        Ok(decode_health(&value))
    }

    /// Today's scoreboard
    pub async fn games_today(&self, token: &CancellationToken) -> Result<TodayGames, ApiError> {
        self.get_json(Endpoint::GamesToday, RequestOptions::new().token(token))
            .await
    }

    /// A team's season game log
    pub async fn team_games(
        &self,
        team_id: TeamId,
        token: &CancellationToken,
    ) -> Result<Vec<TeamGameLogEntry>, ApiError> {
        let record: TeamRecord = self
            .get_json(
                Endpoint::Team,
                RequestOptions::new()
                    .param(PARAM_TEAM_RECORD_ID, team_id)
                    .token(token),
            )
            .await?;
        Ok(record.into_games())
    }

    /// A team's roster as `(id, name)` pairs
    pub async fn team_players(
        &self,
        team_id: TeamId,
        token: &CancellationToken,
    ) -> Result<Roster, ApiError> {
        self.get_json(
            Endpoint::TeamPlayers,
            RequestOptions::new().param(PARAM_TEAM_ID, team_id).token(token),
        )
        .await
    }

    /// A team's current injury report
    pub async fn team_injuries(
        &self,
        team_id: TeamId,
        token: &CancellationToken,
    ) -> Result<InjuryReport, ApiError> {
        self.get_json(
            Endpoint::Injuries,
            RequestOptions::new().param(PARAM_TEAM_ID, team_id).token(token),
        )
        .await
    }

    /// Win probability for one side of one of today's games
    pub async fn game_prediction(
        &self,
        game_id: &str,
        team_id: TeamId,
        token: &CancellationToken,
    ) -> Result<ServiceReply<TeamPrediction>, ApiError> {
        let value = self
            .request(
                Endpoint::GamePrediction,
                RequestOptions::new()
                    .param(PARAM_GAME_ID, game_id)
                    .param(PARAM_TEAM_ID, team_id)
                    .token(token),
            )
            .await?;
        decode_team_prediction(value)
    }

    /// Predicted points for one player today
    pub async fn player_prediction(
        &self,
        player_id: PlayerId,
        token: &CancellationToken,
    ) -> Result<ServiceReply<PlayerPointsPrediction>, ApiError> {
        let value = self
            .request(
                Endpoint::PlayerPrediction,
                RequestOptions::new()
                    .param(PARAM_PLAYER_ID, player_id)
                    .token(token),
            )
            .await?;
        decode_player_prediction(value)
    }

    /// Predicted points for many players in one request
    pub async fn batch_predictions(
        &self,
        player_ids: &[PlayerId],
        token: &CancellationToken,
    ) -> Result<ServiceReply<BatchPredictions>, ApiError> {
        let value = self
            .request(
                Endpoint::BatchPredictions,
                RequestOptions::new()
                    .param(PARAM_PLAYER_IDS, join_player_ids(player_ids))
                    .token(token),
            )
            .await?;
        decode_batch_predictions(value)
    }
}

/// Insert or replace a header, matching names case-insensitively.
fn merge_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
        Some(existing) => existing.1 = value,
        None => headers.push((name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    #[async_trait::async_trait(?Send)]
    impl Transport for Unreachable {
        async fn get(&self, _request: &HttpRequest) -> Result<crate::HttpResponse, ApiError> {
            Err(ApiError::Network("unreachable".into()))
        }
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(Unreachable).with_base_url(base)
    }

    #[test]
    fn joins_base_and_path_with_one_slash() {
        let c = client("http://localhost:8000/");
        assert_eq!(
            c.url("/api/nba/games/today", &[]),
            "http://localhost:8000/api/nba/games/today"
        );
    }

    #[test]
    fn empty_base_is_same_origin() {
        assert_eq!(client("").url("health", &[]), "/health");
    }

    #[test]
    fn skips_null_params_and_encodes_values() {
        let c = client("http://svc");
        let url = c.url(
            "/api/nba/predictions/players/batch/",
            &[("player_ids", Some("1,2".into())), ("season", None), ("q", Some("a b&c".into()))],
        );
        assert_eq!(
            url,
            "http://svc/api/nba/predictions/players/batch/?player_ids=1%2C2&q=a%20b%26c"
        );
    }

    #[test]
    fn caller_headers_override_defaults() {
        let c = client("http://svc").with_header("X-Client", "courtside");
        let headers = c.headers_for(vec![("content-type".into(), "text/plain".into())]);
        assert_eq!(headers.len(), 3);
        assert!(headers.contains(&("Content-Type".into(), "text/plain".into())));
        assert!(headers.contains(&("X-Client".into(), "courtside".into())));
    }
}
