// core/src/session.rs

//! Explicit session context. Every repository mutation takes the caller's
//! session as an argument; there is no ambient global identity. The provider
//! publishes changes over a watch channel so interaction layers can react to
//! sign-in/sign-out, and tearing the subscription down is just dropping the
//! receiver.

use crate::error::{MarketError, Result};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// The authenticated identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
  pub user_id: Uuid,
}

/// Precondition check for operations that demand an identity.
pub fn require(session: Option<&Session>) -> Result<&Session> {
  session.ok_or(MarketError::Unauthenticated)
}

/// Receiver half of the session change stream. `changed().await` resolves on
/// every sign-in or sign-out; dropping it unsubscribes.
pub type SessionWatch = watch::Receiver<Option<Session>>;

/// Holds the current identity and notifies subscribers when it changes.
/// Cloning shares the same underlying state.
#[derive(Clone)]
pub struct SessionProvider {
  state: Arc<watch::Sender<Option<Session>>>,
}

impl SessionProvider {
  pub fn new() -> Self {
    let (tx, _rx) = watch::channel(None);
    Self { state: Arc::new(tx) }
  }

  pub fn sign_in(&self, user_id: Uuid) {
    tracing::debug!(%user_id, "session established");
    self.state.send_replace(Some(Session { user_id }));
  }

  pub fn sign_out(&self) {
    tracing::debug!("session cleared");
    self.state.send_replace(None);
  }

  pub fn current(&self) -> Option<Session> {
    *self.state.borrow()
  }

  pub fn subscribe(&self) -> SessionWatch {
    self.state.subscribe()
  }
}

impl Default for SessionProvider {
  fn default() -> Self {
    Self::new()
  }
}
