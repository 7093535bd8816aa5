//! Per-view ownership of query state.

use std::cell::Cell;
use std::time::Duration;

use crate::api_client::ApiClient;
use crate::cancellation::CancellationManager;
use crate::query::HookId;
use crate::refresh_gate::{system_clock, Clock, RefreshGate};

/// Everything the hooks of one mounted view share: the client, the
/// cancellation registry and the refresh cool-down.
///
/// Create one per view and drop it on unmount; dropping cancels every request
/// the view's hooks still have in flight.
pub struct QueryScope {
    client: ApiClient,
    manager: CancellationManager,
    refresh_cooldown: Duration,
    clock: Clock,
    next_hook: Cell<u64>,
}

impl QueryScope {
    pub fn new(client: ApiClient, refresh_cooldown: Duration) -> Self {
        Self {
            client,
            manager: CancellationManager::new(),
            refresh_cooldown,
            clock: system_clock(),
            next_hook: Cell::new(0),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn manager(&self) -> &CancellationManager {
        &self.manager
    }

    pub(crate) fn next_hook_id(&self) -> HookId {
        let id = self.next_hook.get();
        self.next_hook.set(id + 1);
        HookId(id)
    }

    pub(crate) fn refresh_gate(&self) -> RefreshGate {
        RefreshGate::with_clock(self.refresh_cooldown, self.clock.clone())
    }
}

impl Drop for QueryScope {
    fn drop(&mut self) {
        let active = self.manager.active_count();
        if active > 0 {
            crate::log_debug!("view scope dropped, cancelling {} request(s)", active);
        }
        self.manager.cancel_all();
    }
}
