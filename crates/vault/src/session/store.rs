//! [`PassphraseSession`]: in-memory holder for the master passphrase.

use std::sync::{Arc, Weak};
use std::time::Duration;

use common::SessionStatus;
use secrecy::SecretString;
use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tokio::time::{self, Instant};
use tracing::debug;

/// Default time-to-live of a cached passphrase (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// Upper bound applied to any requested TTL so the deadline never overflows.
const MAX_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Default)]
struct SessionState {
    secret: Option<SecretString>,
    expires_at: Option<Instant>,
    /// Bumped on every mutation; a timer only clears the generation it armed.
    generation: u64,
    timer: Option<AbortHandle>,
}

impl SessionState {
    fn is_live(&self, now: Instant) -> bool {
        match (&self.secret, self.expires_at) {
            (Some(_), Some(at)) => now <= at,
            _ => false,
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn clear(&mut self) {
        self.cancel_timer();
        self.secret = None;
        self.expires_at = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Drop for SessionState {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Shared cache for the master passphrase with a time-to-live.
///
/// Cloning is cheap and every clone refers to the same session, so a host
/// creates one and injects it wherever a passphrase may be needed.
///
/// States:
/// - **Empty**: nothing cached.
/// - **Active**: a passphrase, an absolute deadline, and a pending timer that
///   clears the passphrase at the deadline.
///
/// Every mutation cancels the pending timer before arming a new one, so an
/// older timer can never clear a passphrase that was just set or extended.
#[derive(Clone)]
pub struct PassphraseSession {
    inner: Arc<RwLock<SessionState>>,
    default_ttl: Duration,
}

impl PassphraseSession {
    /// Create an empty session whose set/extend calls default to `default_ttl`.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState::default())),
            default_ttl,
        }
    }

    /// Cache `secret` for the default TTL, replacing any cached passphrase.
    pub async fn set_passphrase(&self, secret: SecretString) {
        self.set_passphrase_for(secret, self.default_ttl).await;
    }

    /// Cache `secret` for `ttl`, replacing any cached passphrase.
    pub async fn set_passphrase_for(&self, secret: SecretString, ttl: Duration) {
        let mut state = self.inner.write().await;
        state.secret = Some(secret);
        let applied = self.arm(&mut state, ttl);
        debug!(ttl_ms = millis(applied), "passphrase cached");
    }

    /// Return the cached passphrase if it has not expired.
    ///
    /// An expired passphrase is cleared on the spot and `None` is returned.
    /// Reading never extends the deadline.
    pub async fn get_passphrase(&self) -> Option<SecretString> {
        {
            let state = self.inner.read().await;
            if state.secret.is_none() {
                return None;
            }
            if state.is_live(Instant::now()) {
                return state.secret.clone();
            }
        }

        let mut state = self.inner.write().await;
        if state.is_live(Instant::now()) {
            return state.secret.clone();
        }
        if state.secret.is_some() {
            state.clear();
            debug!("cached passphrase expired on read");
        }
        None
    }

    /// Returns `true` if [`get_passphrase`](Self::get_passphrase) would return
    /// a value.
    pub async fn has_valid_passphrase(&self) -> bool {
        self.get_passphrase().await.is_some()
    }

    /// Push the deadline to now + default TTL. See
    /// [`extend_validity_for`](Self::extend_validity_for).
    pub async fn extend_validity(&self) -> bool {
        self.extend_validity_for(self.default_ttl).await
    }

    /// Push the deadline to now + `ttl` and re-arm the timer.
    ///
    /// Returns `false`, changing nothing, when no live passphrase is cached.
    /// A passphrase that has already expired is cleared rather than revived.
    pub async fn extend_validity_for(&self, ttl: Duration) -> bool {
        let mut state = self.inner.write().await;
        if !state.is_live(Instant::now()) {
            if state.secret.is_some() {
                state.clear();
            }
            return false;
        }
        let applied = self.arm(&mut state, ttl);
        debug!(ttl_ms = millis(applied), "passphrase validity extended");
        true
    }

    /// Drop the cached passphrase and cancel the timer. Idempotent.
    pub async fn clear_passphrase(&self) {
        let mut state = self.inner.write().await;
        let had_secret = state.secret.is_some();
        state.clear();
        if had_secret {
            debug!("cached passphrase cleared");
        }
    }

    /// Time left before the cached passphrase expires; zero when empty.
    pub async fn remaining_time(&self) -> Duration {
        let state = self.inner.read().await;
        state
            .expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO)
    }

    /// Absolute deadline of the cached passphrase, if any.
    pub async fn expires_at(&self) -> Option<Instant> {
        self.inner.read().await.expires_at
    }

    /// Non-secret snapshot for display.
    pub async fn status(&self) -> SessionStatus {
        let state = self.inner.read().await;
        let now = Instant::now();
        if !state.is_live(now) {
            return SessionStatus::inactive();
        }
        let remaining = state
            .expires_at
            .map(|at| at.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO);
        SessionStatus {
            active: true,
            remaining_ms: millis(remaining),
        }
    }

    /// Set a new deadline and replace the pending timer. Returns the TTL applied.
    fn arm(&self, state: &mut SessionState, ttl: Duration) -> Duration {
        state.cancel_timer();
        state.generation = state.generation.wrapping_add(1);

        let ttl = ttl.min(MAX_TTL);
        let deadline = Instant::now() + ttl;
        state.expires_at = Some(deadline);

        let task = tokio::spawn(expire_at(
            Arc::downgrade(&self.inner),
            deadline,
            state.generation,
        ));
        state.timer = Some(task.abort_handle());
        ttl
    }
}

impl Default for PassphraseSession {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl std::fmt::Debug for PassphraseSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassphraseSession")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Timer body: clear the session at `deadline` unless it was re-armed since.
async fn expire_at(state: Weak<RwLock<SessionState>>, deadline: Instant, generation: u64) {
    time::sleep_until(deadline).await;

    let Some(state) = state.upgrade() else {
        return;
    };
    let mut state = state.write().await;
    if state.generation != generation {
        return;
    }
    // This task is the pending timer; detach it so clearing does not abort it.
    state.timer = None;
    state.clear();
    debug!("cached passphrase expired");
}
