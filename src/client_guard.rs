//! Client-evaluated guard.
//!
//! Models a view that mounts before the caller's identity is known: it shows a
//! neutral placeholder, resolves the identity asynchronously, and then either shows
//! its content or navigates away. The decision itself is the same `gate::decide`
//! the server guard uses.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    gate::{AccessRequirement, Decision, RouteKind, UNAUTHORIZED_PATH, decide},
    identity::{Identity, VerifierState},
    session::Credential,
};

/// Performs client-side navigation. Implemented by whatever hosts the view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Allowed(Option<Identity>),
    Redirecting(String),
}

/// What the view may render. Loading and redirecting look the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView {
    Placeholder,
    Content(Option<Identity>),
}

pub struct ClientGuard {
    state: watch::Receiver<GuardState>,
    // Held while a result is published and while unmounting, so an unmount either
    // precedes the navigation entirely or waits for it to finish.
    mounted: Arc<Mutex<bool>>,
    task: Option<JoinHandle<()>>,
}

fn lock_mounted(mounted: &Mutex<bool>) -> MutexGuard<'_, bool> {
    mounted.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ClientGuard {
    /// mount
    ///
    /// Starts resolving the identity on the tokio runtime and returns immediately in
    /// the `Loading` state. Must be called from within a runtime.
    pub fn mount(
        verifier: VerifierState,
        credential: Option<Credential>,
        requirement: AccessRequirement,
        path: impl Into<String>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (tx, rx) = watch::channel(GuardState::Loading);
        let mounted = Arc::new(Mutex::new(true));
        let still_mounted = Arc::clone(&mounted);
        let path = path.into();

        let task = tokio::spawn(async move {
            let identity = verifier.verify(credential.as_ref()).await;
            let next = match decide(identity, requirement, RouteKind::Page, &path) {
                Decision::Allow(identity) => GuardState::Allowed(identity),
                Decision::RedirectTo(target) => GuardState::Redirecting(target),
                // Page decisions redirect; a bare status has no client rendering.
                Decision::Reject(_) => GuardState::Redirecting(UNAUTHORIZED_PATH.to_string()),
            };

            let mounted = lock_mounted(&still_mounted);
            if !*mounted {
                tracing::debug!(path = %path, "view unmounted before identity resolved");
                return;
            }

            let _ = tx.send(next.clone());
            if let GuardState::Redirecting(target) = next {
                navigator.navigate(&target);
            }
            drop(mounted);
        });

        Self {
            state: rx,
            mounted,
            task: Some(task),
        }
    }

    pub fn state(&self) -> GuardState {
        self.state.borrow().clone()
    }

    /// view
    ///
    /// Protected content is only exposed once the gate has allowed the request.
    pub fn view(&self) -> GuardView {
        match &*self.state.borrow() {
            GuardState::Allowed(identity) => GuardView::Content(identity.clone()),
            GuardState::Loading | GuardState::Redirecting(_) => GuardView::Placeholder,
        }
    }

    /// settled
    ///
    /// Waits until resolution has produced a decision. If the resolution task died
    /// without one, the current (loading) state is returned.
    pub async fn settled(&mut self) -> GuardState {
        let settled = self
            .state
            .wait_for(|state| !matches!(state, GuardState::Loading))
            .await
            .map(|state| (*state).clone());
        settled.unwrap_or_else(|_| self.state())
    }

    /// unmount
    ///
    /// Detaches the view. An in-flight verification is left to finish, but its result
    /// is discarded and no navigation happens. The returned handle completes when the
    /// resolution task does. Once this returns, no navigation can happen; if one is in
    /// progress, this blocks until it completes.
    pub fn unmount(mut self) -> JoinHandle<()> {
        *lock_mounted(&self.mounted) = false;
        self.task
            .take()
            .unwrap_or_else(|| tokio::spawn(async {}))
    }
}

impl Drop for ClientGuard {
    fn drop(&mut self) {
        *lock_mounted(&self.mounted) = false;
    }
}
