use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use courtside_shared::{ApiError, ServiceReply};

use crate::cancellation::{CancellationManager, CancellationToken};
use crate::query::{HookId, HookSnapshot, QueryKey, RequestKey, RequestState};
use crate::refresh_gate::{GateState, RefreshGate};
use crate::scope::QueryScope;

type Observer<T> = Box<dyn Fn(&HookSnapshot<T>)>;

/// Handle returned by [`ResourceHook::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

struct Inner<T> {
    id: HookId,
    manager: CancellationManager,
    snapshot: RefCell<HookSnapshot<T>>,
    /// Key of the request this hook is currently waiting on.
    active: RefCell<Option<QueryKey>>,
    /// Key of the most recent load, settled or not.
    last_key: RefCell<Option<QueryKey>>,
    gate: RefCell<RefreshGate>,
    observers: RefCell<Vec<(Subscription, Observer<T>)>>,
    next_subscription: Cell<u64>,
}

/// The state machine behind every resource hook.
///
/// `Idle -> Loading -> Success | Failed`, plus a `warming_up` flag for
/// endpoints that can answer "still computing". Only the newest request may
/// commit: an aborted call commits nothing, and a response whose token lost
/// its registration in the scope is dropped as stale.
///
/// Each hook registers its requests under its own [`HookId`], so two hooks
/// loading the same query never cancel each other.
pub struct ResourceHook<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for ResourceHook<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Closes the refresh gate's in-flight window even if the refresh future
/// is dropped before it settles.
struct InFlight<'a>(&'a RefCell<RefreshGate>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.borrow_mut().finish();
    }
}

impl<T: Clone + 'static> ResourceHook<T> {
    pub fn new(scope: &QueryScope) -> Self {
        Self {
            inner: Rc::new(Inner {
                id: scope.next_hook_id(),
                manager: scope.manager().clone(),
                snapshot: RefCell::new(HookSnapshot::default()),
                active: RefCell::new(None),
                last_key: RefCell::new(None),
                gate: RefCell::new(scope.refresh_gate()),
                observers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    pub fn id(&self) -> HookId {
        self.inner.id
    }

    pub fn snapshot(&self) -> HookSnapshot<T> {
        self.inner.snapshot.borrow().clone()
    }

    pub fn refresh_state(&self) -> GateState {
        self.inner.gate.borrow().state()
    }

    /// Call `observer` after every state transition.
    ///
    /// Observers must not subscribe or unsubscribe from inside the callback.
    pub fn subscribe(&self, observer: impl Fn(&HookSnapshot<T>) + 'static) -> Subscription {
        let id = Subscription(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut observers = self.inner.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(id, _)| *id != subscription);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    fn update(&self, f: impl FnOnce(&mut HookSnapshot<T>)) {
        f(&mut self.inner.snapshot.borrow_mut());
        let snapshot = self.snapshot();
        for (_, observer) in self.inner.observers.borrow().iter() {
            observer(&snapshot);
        }
    }

    fn request_key(&self, key: &QueryKey) -> RequestKey {
        RequestKey::new(self.inner.id, key.clone())
    }

    /// Point the hook at `key`, cancelling a request for different parameters.
    fn supersede(&self, key: Option<&QueryKey>) {
        let previous = self.inner.active.replace(key.cloned());
        if let Some(previous) = previous {
            if Some(&previous) != key {
                self.inner.manager.cancel(&self.request_key(&previous));
            }
        }
    }

    /// Fail synchronously without touching the network.
    pub fn fail(&self, error: ApiError) {
        self.supersede(None);
        self.inner.last_key.replace(None);
        self.update(|s| {
            s.state = RequestState::Failed(error.to_string());
            s.warming_up = false;
        });
    }

    /// Run one request for `key` and commit its outcome if it is still current.
    ///
    /// `warming_up` survives only a reload of the same key.
    pub async fn run<F, Fut>(&self, key: QueryKey, fetch: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<ServiceReply<T>, ApiError>>,
    {
        self.supersede(Some(&key));
        let reload = self.inner.last_key.replace(Some(key.clone())).as_ref() == Some(&key);
        self.update(|s| {
            s.state = RequestState::Loading;
            if !reload {
                s.warming_up = false;
            }
        });

        let request = self.request_key(&key);
        let token = self.inner.manager.begin(&request);
        let result = fetch(token.clone()).await;

        if matches!(result, Err(ApiError::Aborted)) {
            crate::log_debug!("{} superseded", request);
            return;
        }
        if !self.inner.manager.end(&request, &token) {
            crate::log_debug!("dropping stale response for {}", request);
            return;
        }
        {
            let mut active = self.inner.active.borrow_mut();
            if active.as_ref() == Some(&key) {
                *active = None;
            }
        }

        self.update(|s| match result {
            Ok(ServiceReply::Ready(data)) => {
                s.state = RequestState::Success(data);
                s.warming_up = false;
            }
            Ok(ServiceReply::WarmingUp) => {
                s.state = RequestState::Idle;
                s.warming_up = true;
            }
            Err(error) => {
                s.state = RequestState::Failed(error.to_string());
                s.warming_up = false;
            }
        });
    }

    /// Run `work` unless a refresh is already running or cooling down.
    /// Returns whether the trigger was accepted.
    pub async fn gated<Fut: Future<Output = ()>>(&self, work: Fut) -> bool {
        if !self.inner.gate.borrow_mut().try_begin() {
            return false;
        }
        let _in_flight = InFlight(&self.inner.gate);
        work.await;
        true
    }
}
