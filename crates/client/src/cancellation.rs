//! One in-flight operation per request key.
//!
//! A [`CancellationManager`] lives in a view's [`QueryScope`](crate::QueryScope)
//! and is shared by that view's hooks only, so the registry is a plain
//! `Rc<RefCell<_>>`; nothing here is `Send`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use courtside_shared::ApiError;
use futures_util::future::{AbortHandle, Abortable};

use crate::query::RequestKey;

struct TokenInner {
    cancelled: Cell<bool>,
    handles: RefCell<Vec<AbortHandle>>,
}

/// Handle for one in-flight operation.
///
/// An operation may span several sequential calls (roster, then batch); each
/// call is guarded through [`CancellationToken::run`]. Equality is identity.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Rc<TokenInner>,
}

impl CancellationToken {
    /// A token that is not registered anywhere. Only an explicit
    /// [`cancel`](Self::cancel) stops it.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(TokenInner {
                cancelled: Cell::new(false),
                handles: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Abort every call currently guarded by this token and fail later ones.
    /// Cancelling twice does nothing the second time.
    pub fn cancel(&self) {
        if self.inner.cancelled.replace(true) {
            return;
        }
        let handles = std::mem::take(&mut *self.inner.handles.borrow_mut());
        for handle in handles {
            handle.abort();
        }
    }

    /// Drive `fut` until it finishes or this token is cancelled, whichever
    /// comes first. Cancellation surfaces as [`ApiError::Aborted`].
    pub async fn run<T, F>(&self, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.is_cancelled() {
            return Err(ApiError::Aborted);
        }
        let (handle, registration) = AbortHandle::new_pair();
        self.inner.handles.borrow_mut().push(handle);

        match Abortable::new(fut, registration).await {
            Ok(result) => result,
            Err(_aborted) => Err(ApiError::Aborted),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for CancellationToken {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for CancellationToken {}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("ptr", &Rc::as_ptr(&self.inner))
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Registry of the active token per request key.
///
/// Per key: `None -> Active(t)` on [`begin`](Self::begin),
/// `Active(t) -> Active(t')` on a second begin (the old token is cancelled),
/// `Active(t) -> None` on [`end`](Self::end) or [`cancel`](Self::cancel).
#[derive(Clone, Default)]
pub struct CancellationManager {
    registry: Rc<RefCell<HashMap<RequestKey, CancellationToken>>>,
}

impl CancellationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh token for `key`, cancelling whichever token held it.
    pub fn begin(&self, key: &RequestKey) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self.registry.borrow_mut().insert(key.clone(), token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }
        token
    }

    /// Clear `key` if `token` is still the one registered for it.
    ///
    /// Returns `false` when a newer request replaced it or the key was
    /// already cleared; a response guarded by such a token is stale.
    pub fn end(&self, key: &RequestKey, token: &CancellationToken) -> bool {
        let mut registry = self.registry.borrow_mut();
        match registry.get(key) {
            Some(current) if current == token => {
                registry.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Cancel and forget the active token for `key`, if any.
    pub fn cancel(&self, key: &RequestKey) {
        let token = self.registry.borrow_mut().remove(key);
        if let Some(token) = token {
            token.cancel();
        }
    }

    /// Cancel everything this scope registered. Called on view teardown.
    pub fn cancel_all(&self) {
        let tokens: Vec<_> = self.registry.borrow_mut().drain().map(|(_, t)| t).collect();
        for token in tokens {
            token.cancel();
        }
    }

    pub fn is_active(&self, key: &RequestKey) -> bool {
        self.registry.borrow().contains_key(key)
    }

    pub fn active_count(&self) -> usize {
        self.registry.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{HookId, QueryKey};

    fn request(hook: u64, query: QueryKey) -> RequestKey {
        RequestKey::new(HookId(hook), query)
    }

    fn key() -> RequestKey {
        request(0, QueryKey::TeamPlayers(1610612738))
    }

    #[test]
    fn begin_replaces_and_cancels_previous_token() {
        let manager = CancellationManager::new();
        let first = manager.begin(&key());
        let second = manager.begin(&key());

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_ne!(first, second);
        assert_eq!(manager.active_count(), 1);
    }

    #[test]
    fn end_is_a_no_op_for_stale_tokens() {
        let manager = CancellationManager::new();
        let stale = manager.begin(&key());
        let fresh = manager.begin(&key());

        assert!(!manager.end(&key(), &stale));
        assert!(manager.is_active(&key()));
        assert!(manager.end(&key(), &fresh));
        assert!(!manager.is_active(&key()));
    }

    #[test]
    fn end_twice_only_clears_once() {
        let manager = CancellationManager::new();
        let token = manager.begin(&key());

        assert!(manager.end(&key(), &token));
        assert!(!manager.end(&key(), &token));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_twice_is_idempotent() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_all_clears_every_key() {
        let manager = CancellationManager::new();
        let a = manager.begin(&request(0, QueryKey::GamesToday));
        let b = manager.begin(&request(1, QueryKey::PlayerPrediction(201939)));

        manager.cancel_all();

        assert!(a.is_cancelled() && b.is_cancelled());
        assert_eq!(manager.active_count(), 0);
    }

    #[test]
    fn independent_keys_do_not_interfere() {
        let manager = CancellationManager::new();
        let a = manager.begin(&request(0, QueryKey::TeamPlayers(1)));
        let b = manager.begin(&request(0, QueryKey::TeamPlayers(2)));

        manager.cancel(&request(0, QueryKey::TeamPlayers(1)));

        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
        assert!(manager.is_active(&request(0, QueryKey::TeamPlayers(2))));
    }

    #[test]
    fn same_query_from_two_hooks_keeps_both_tokens() {
        let manager = CancellationManager::new();
        let a = manager.begin(&request(0, QueryKey::TeamPlayers(1)));
        let b = manager.begin(&request(1, QueryKey::TeamPlayers(1)));

        assert!(!a.is_cancelled());
        assert!(manager.end(&request(1, QueryKey::TeamPlayers(1)), &b));
        assert!(manager.end(&request(0, QueryKey::TeamPlayers(1)), &a));
    }

    #[tokio::test]
    async fn cancelled_token_fails_fast() {
        let token = CancellationToken::new();
        token.cancel();
        let result = token.run(async { Ok::<_, ApiError>(1) }).await;
        assert_eq!(result, Err(ApiError::Aborted));
    }

    #[tokio::test]
    async fn cancel_aborts_a_pending_call() {
        let token = CancellationToken::new();
        let pending = token.run(futures_util::future::pending::<Result<(), ApiError>>());
        let canceller = async {
            tokio::task::yield_now().await;
            token.cancel();
        };
        let (result, ()) = tokio::join!(pending, canceller);
        assert_eq!(result, Err(ApiError::Aborted));
    }
}
