#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use courtside_client::{ApiClient, HttpRequest, HttpResponse, NullSink, Transport};
use courtside_shared::ApiError;
use serde_json::Value;
use tokio::sync::oneshot;

pub const BASE_URL: &str = "http://courtside.test";

pub const GAMES_TODAY: &str = "/api/nba/games/today";
pub const TEAM: &str = "/api/nba/teams/";
pub const TEAM_PLAYERS: &str = "/api/nba/teamplayers/";
pub const INJURIES: &str = "/api/nba/injuries/";
pub const GAME_PREDICTION: &str = "/api/nba/predictions/today/";
pub const PLAYER_PREDICTION: &str = "/api/nba/predictions/player/today/";
pub const BATCH_PREDICTIONS: &str = "/api/nba/predictions/players/batch/";

#[derive(Default)]
struct Routes {
    replies: HashMap<String, VecDeque<HttpResponse>>,
    holds: HashMap<String, VecDeque<oneshot::Receiver<()>>>,
    calls: Vec<HttpRequest>,
}

/// Scripted transport. Routes match on `path?query` first, then on the bare
/// path. Queued replies are served in order and the last one repeats.
#[derive(Clone, Default)]
pub struct FakeTransport {
    routes: Rc<RefCell<Routes>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, route: &str, status: u16, body: impl Into<String>) -> &Self {
        let status_text = match status {
            200 => "OK",
            404 => "Not Found",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "",
        };
        self.routes
            .borrow_mut()
            .replies
            .entry(route.to_string())
            .or_default()
            .push_back(HttpResponse {
                status,
                status_text: status_text.to_string(),
                body: body.into(),
            });
        self
    }

    pub fn json(&self, route: &str, body: Value) -> &Self {
        self.respond(route, 200, body.to_string())
    }

    /// The next call to `route` waits until the returned sender fires or drops.
    pub fn hold(&self, route: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.routes
            .borrow_mut()
            .holds
            .entry(route.to_string())
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.routes.borrow().calls.clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<HttpRequest> {
        self.calls()
            .into_iter()
            .filter(|call| split_url(&call.url).0 == path)
            .collect()
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.clone())
            .with_base_url(BASE_URL)
            .with_diagnostics(Rc::new(NullSink))
    }
}

/// `(path, path?query)` of a request URL.
fn split_url(url: &str) -> (&str, &str) {
    let full = url.strip_prefix(BASE_URL).unwrap_or(url);
    let path = full.split('?').next().unwrap_or(full);
    (path, full)
}

fn pick<'a, T>(map: &'a mut HashMap<String, T>, path: &str, full: &str) -> Option<&'a mut T> {
    if map.contains_key(full) {
        map.get_mut(full)
    } else {
        map.get_mut(path)
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let (path, full) = split_url(&request.url);
        let (path, full) = (path.to_string(), full.to_string());

        let hold = {
            let mut routes = self.routes.borrow_mut();
            routes.calls.push(request.clone());
            pick(&mut routes.holds, &path, &full).and_then(VecDeque::pop_front)
        };
        if let Some(hold) = hold {
            let _ = hold.await;
        }

        let reply = {
            let mut routes = self.routes.borrow_mut();
            pick(&mut routes.replies, &path, &full).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };
        Ok(reply.unwrap_or_else(|| HttpResponse {
            status: 404,
            status_text: "Not Found".to_string(),
            body: r#"{"detail":"Not Found"}"#.to_string(),
        }))
    }
}

/// A `[ids, names]` roster body with players `1..=n`.
pub fn roster_body(n: u64) -> Value {
    let ids: Vec<u64> = (1..=n).collect();
    let names: Vec<String> = ids.iter().map(|id| format!("Player {id}")).collect();
    serde_json::json!([ids, names])
}

pub fn fixture(name: &str) -> Value {
    let raw = match name {
        "scoreboard" => include_str!("../fixtures/scoreboard.json"),
        "team_games" => include_str!("../fixtures/team_games.json"),
        "batch_predictions" => include_str!("../fixtures/batch_predictions.json"),
        other => panic!("unknown fixture {other}"),
    };
    serde_json::from_str(raw).expect("fixture is valid json")
}
