// SPDX-License-Identifier: MIT

//! Session tracking: who is signed in right now.
//!
//! Subscribes exactly once, for its own lifetime, to the identity
//! provider's state-change notifications and mirrors them into queryable
//! state. It never touches the document store.

use crate::auth::AuthState;
use crate::models::Identity;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Observed session state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Current identity, or `None` when signed out
    pub identity: Option<Identity>,
    /// True until the provider's first determined notification arrives.
    /// The UI treats this as a blocking loading state that precedes any
    /// routing decision.
    pub initializing: bool,
}

/// Tracks the identity provider's auth state.
///
/// Dropping the tracker unsubscribes (the forwarding task is aborted).
pub struct SessionTracker {
    rx: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SessionTracker {
    /// Subscribe to `auth_rx` for the lifetime of the tracker.
    pub fn new(mut auth_rx: watch::Receiver<AuthState>) -> Self {
        let (tx, rx) = watch::channel(SessionState {
            identity: None,
            initializing: true,
        });

        let task = tokio::spawn(async move {
            loop {
                // Each notification replaces the state atomically; the first
                // determined one clears the initializing flag for good.
                let state = auth_rx.borrow_and_update().clone();
                match state {
                    AuthState::Unknown => {}
                    AuthState::SignedOut => {
                        let _ = tx.send(SessionState {
                            identity: None,
                            initializing: false,
                        });
                    }
                    AuthState::SignedIn(identity) => {
                        let _ = tx.send(SessionState {
                            identity: Some(identity),
                            initializing: false,
                        });
                    }
                }
                if auth_rx.changed().await.is_err() {
                    // Provider dropped; keep the last known state.
                    break;
                }
            }
        });

        Self { rx, task }
    }

    /// Current identity, or `None` when signed out or not yet determined.
    pub fn current_identity(&self) -> Option<Identity> {
        self.rx.borrow().identity.clone()
    }

    /// True until the provider's first notification has been observed.
    pub fn is_initializing(&self) -> bool {
        self.rx.borrow().initializing
    }

    /// Subscribe to session state changes.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.rx.clone()
    }
}

impl Drop for SessionTracker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
