//! Session lifecycle, inactivity expiry and login lockout
//!
//! States: `Anonymous -> Authenticated -> Expired | LoggedOut`, plus a
//! transient `Locked` state entered after too many failed logins. Failed
//! attempts are counted for the whole installation, not per principal, and
//! the counter is persisted so a restart does not clear a lockout.
//!
//! An inactivity timer runs while a session is authenticated. Recording
//! user activity pushes the deadline back without contacting the backend;
//! reaching it forces a logout.

use std::sync::Arc;
use std::time::Duration;

use appraisal_common::time::Clock;
use appraisal_domain::constants::{
    ACCOUNT_LOCK_KEY, ACCOUNT_LOCK_NAMESPACE, SESSION_KEY, SESSION_NAMESPACE,
};
use appraisal_domain::{
    AccountLock, ActivityKind, AppraisalError, Result, Session, SessionConfig, SessionState,
};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::persistence::PersistenceFacade;

/// Owns the current session and the failed-login counter.
pub struct SessionAuthority {
    inner: Arc<Inner>,
    timer: Mutex<Option<ExpiryTimer>>,
}

struct Inner {
    facade: Arc<PersistenceFacade>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    state: watch::Sender<SessionState>,
    last_activity: Mutex<Instant>,
}

struct ExpiryTimer {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ExpiryTimer {
    fn stop(self) {
        self.cancel.cancel();
        drop(self.handle);
    }
}

impl SessionAuthority {
    pub fn new(facade: Arc<PersistenceFacade>, clock: Arc<dyn Clock>, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self {
            inner: Arc::new(Inner {
                facade,
                clock,
                config,
                state,
                last_activity: Mutex::new(Instant::now()),
            }),
            timer: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Observe state transitions, including forced logouts.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.inner.state.borrow().session().cloned()
    }

    /// Persisted failed-login counter.
    pub fn account_lock(&self) -> AccountLock {
        self.inner
            .facade
            .cache()
            .read(ACCOUNT_LOCK_NAMESPACE, ACCOUNT_LOCK_KEY)
            .unwrap_or_default()
    }

    /// Authenticate `principal_id`.
    ///
    /// While locked, returns [`AppraisalError::Lockout`] without contacting
    /// the backend. A rejected principal returns
    /// [`AppraisalError::LoginFailed`] with the attempts left; the rejection
    /// that reaches the threshold reports zero and locks the installation.
    /// An unreachable backend with no cached record is reported as
    /// [`AppraisalError::Network`] and does not count as an attempt.
    #[instrument(skip(self))]
    pub async fn login(&self, principal_id: &str) -> Result<Session> {
        let now = self.inner.clock.now();
        let mut lock = self.account_lock();

        if let Some(remaining) = lock.remaining(now) {
            self.inner.state.send_replace(SessionState::Locked { until: now + remaining });
            let remaining_secs =
                u64::try_from((remaining.num_milliseconds() + 999) / 1000).unwrap_or(0);
            debug!(remaining_secs, "login rejected while locked");
            return Err(AppraisalError::Lockout { remaining_secs });
        }
        if lock.locked_until.is_some() {
            info!("lockout elapsed; resetting failed-login counter");
            lock = AccountLock::default();
            self.store_lock(&lock);
        }

        match self.inner.facade.authenticate(principal_id).await {
            Ok(tagged) => {
                let offline = tagged.is_offline();
                let record = tagged.into_inner();
                let session = Session {
                    principal_id: record.employee_code,
                    role: record.role,
                    issued_at: now,
                    last_activity: now,
                    offline,
                };

                self.clear_lock();
                self.inner.store_session(&session);
                self.inner.state.send_replace(SessionState::Authenticated(session.clone()));
                self.start_timer(Instant::now());
                self.inner.facade.activity().record(
                    ActivityKind::Login,
                    Some(&session.principal_id),
                    offline.then(|| "offline login from cached record".to_string()),
                );
                info!(principal_id = %session.principal_id, offline, "login succeeded");
                Ok(session)
            }
            Err(err @ (AppraisalError::Auth(_) | AppraisalError::NotFound(_))) => {
                Err(self.register_failure(principal_id, lock, &err))
            }
            Err(err) => Err(err),
        }
    }

    /// End the session on user request.
    pub fn logout(&self) {
        self.cancel_timer();
        let previous = self.inner.state.send_replace(SessionState::LoggedOut);
        self.inner.clear_session();
        if let Some(session) = previous.session() {
            let activity = self.inner.facade.activity();
            activity.record(ActivityKind::Logout, Some(&session.principal_id), None);
            info!(principal_id = %session.principal_id, "logged out");
        }
    }

    /// Push back the inactivity deadline. Returns `false` when no session
    /// is active. Never contacts the backend.
    pub fn record_activity(&self) -> bool {
        let now = self.inner.clock.now();
        let timeout = chrono_duration(self.inner.config.timeout());

        if self.current_session().is_some_and(|session| session.is_expired(now, timeout)) {
            self.force_expire();
            return false;
        }

        let mut refreshed = None;
        self.inner.state.send_if_modified(|state| match state {
            SessionState::Authenticated(session) => {
                session.last_activity = now;
                refreshed = Some(session.clone());
                true
            }
            _ => false,
        });

        match refreshed {
            Some(session) => {
                *self.inner.last_activity.lock() = Instant::now();
                self.inner.store_session(&session);
                true
            }
            None => false,
        }
    }

    /// Explicitly extend the active session.
    pub fn extend(&self) -> Result<Session> {
        if !self.record_activity() {
            return Err(AppraisalError::Auth("no active session to extend".into()));
        }
        let session = self.ensure_active()?;
        debug!(principal_id = %session.principal_id, "session extended");
        Ok(session)
    }

    /// The active session, or [`AppraisalError::Auth`] when signed out or
    /// past the inactivity window. An overdue session is logged out.
    pub fn ensure_active(&self) -> Result<Session> {
        let now = self.inner.clock.now();
        let timeout = chrono_duration(self.inner.config.timeout());
        match self.current_session() {
            Some(session) if session.is_expired(now, timeout) => {
                self.force_expire();
                Err(AppraisalError::Auth("session expired".into()))
            }
            Some(session) => Ok(session),
            None => Err(AppraisalError::Auth("not signed in".into())),
        }
    }

    /// Resume a session persisted by a previous run if it is still within
    /// the inactivity window.
    pub fn restore(&self) -> Option<Session> {
        let now = self.inner.clock.now();
        if let Some(remaining) = self.account_lock().remaining(now) {
            self.inner.state.send_replace(SessionState::Locked { until: now + remaining });
        }

        let session: Session = self.inner.facade.cache().read(SESSION_NAMESPACE, SESSION_KEY)?;
        let timeout = chrono_duration(self.inner.config.timeout());
        if session.is_expired(now, timeout) {
            info!(principal_id = %session.principal_id, "persisted session expired while closed");
            self.inner.clear_session();
            self.inner.facade.activity().record(ActivityKind::Expired, Some(&session.principal_id), None);
            return None;
        }

        let idle = (now - session.last_activity).to_std().unwrap_or(Duration::ZERO);
        let last_seen = Instant::now().checked_sub(idle).unwrap_or_else(Instant::now);
        self.inner.state.send_replace(SessionState::Authenticated(session.clone()));
        self.start_timer(last_seen);
        info!(principal_id = %session.principal_id, "session restored");
        Some(session)
    }

    fn register_failure(
        &self,
        principal_id: &str,
        mut lock: AccountLock,
        reason: &AppraisalError,
    ) -> AppraisalError {
        let now = self.inner.clock.now();
        lock.failed_attempts += 1;
        let remaining_attempts =
            self.inner.config.lockout_threshold.saturating_sub(lock.failed_attempts);

        if remaining_attempts == 0 {
            let until = now + chrono_duration(self.inner.config.lockout());
            lock.locked_until = Some(until);
            self.inner.state.send_replace(SessionState::Locked { until });
            self.inner.facade.activity().record(
                ActivityKind::Locked,
                Some(principal_id),
                Some(format!("{} failed attempts", lock.failed_attempts)),
            );
            warn!(failed_attempts = lock.failed_attempts, %until, "login locked");
        } else {
            self.inner.facade.activity().record(
                ActivityKind::LoginFailed,
                Some(principal_id),
                Some(reason.to_string()),
            );
            debug!(remaining_attempts, error = %reason, "login failed");
        }

        self.store_lock(&lock);
        AppraisalError::LoginFailed { remaining_attempts }
    }

    fn store_lock(&self, lock: &AccountLock) {
        let cache = self.inner.facade.cache();
        if let Err(err) = cache.write(ACCOUNT_LOCK_NAMESPACE, ACCOUNT_LOCK_KEY, lock) {
            warn!(error = %err, "failed to persist account lock");
        }
    }

    fn clear_lock(&self) {
        if let Err(err) = self.inner.facade.cache().remove(ACCOUNT_LOCK_NAMESPACE, ACCOUNT_LOCK_KEY) {
            warn!(error = %err, "failed to clear account lock");
        }
    }

    fn force_expire(&self) {
        self.cancel_timer();
        self.inner.expire();
    }

    fn start_timer(&self, last_seen: Instant) {
        self.cancel_timer();
        *self.inner.last_activity.lock() = last_seen;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(Inner::expiry_loop(Arc::clone(&self.inner), cancel.clone()));
        *self.timer.lock() = Some(ExpiryTimer { cancel, handle });
    }

    fn cancel_timer(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.stop();
        }
    }
}

impl Inner {
    async fn expiry_loop(inner: Arc<Self>, cancel: CancellationToken) {
        let timeout = inner.config.timeout();
        loop {
            let deadline = *inner.last_activity.lock() + timeout;
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep_until(deadline) => {}
            }

            // activity may have moved the deadline while we slept
            if Instant::now() >= *inner.last_activity.lock() + timeout {
                inner.expire();
                return;
            }
        }
    }

    fn expire(&self) {
        let mut expired = None;
        self.state.send_if_modified(|state| match state {
            SessionState::Authenticated(session) => {
                expired = Some(session.principal_id.clone());
                *state = SessionState::Expired;
                true
            }
            _ => false,
        });

        if let Some(principal_id) = expired {
            self.clear_session();
            self.facade.activity().record(ActivityKind::Expired, Some(&principal_id), None);
            warn!(%principal_id, "session expired after inactivity");
        }
    }

    fn store_session(&self, session: &Session) {
        if let Err(err) = self.facade.cache().write(SESSION_NAMESPACE, SESSION_KEY, session) {
            warn!(error = %err, "failed to persist session");
        }
    }

    fn clear_session(&self) {
        if let Err(err) = self.facade.cache().remove(SESSION_NAMESPACE, SESSION_KEY) {
            warn!(error = %err, "failed to clear persisted session");
        }
    }
}

impl Drop for SessionAuthority {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

fn chrono_duration(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::days(365))
}
