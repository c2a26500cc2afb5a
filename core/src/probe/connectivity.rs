//! Backend wake-up probe.
//!
//! One liveness check runs on start. A timeout is read as a dormant
//! (cold-start) backend and hands over to a bounded retry loop; connect
//! failures and every other error are terminal until the user asks for a
//! retry. Nothing escapes to the caller: every outcome is a state transition
//! published through [`ConnectivityProbe::subscribe`].

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::classify::ProbeFailure;
use crate::config::ProbeConfig;
use crate::state::{ConnectionState, ObservableState, ProbeEvent, StateTransition, Subscription};
use crate::transport::LivenessPlugin;

/// Owns the connectivity state machine.
///
/// Share it behind an `Arc`. Dropping the last handle cancels the retry loop
/// together with any liveness call it has in flight.
pub struct ConnectivityProbe {
    inner: Arc<ProbeInner>,
}

struct ProbeInner {
    liveness: Arc<dyn LivenessPlugin>,
    max_retries: u32,
    retry_delay: Duration,
    call_timeout: Duration,
    state: ObservableState<ConnectionState>,
    attempt: AtomicU32,
    /// Single in-flight retry loop guard.
    loop_active: AtomicBool,
    initial_checked: AtomicBool,
    cancel: CancellationToken,
    event_tx: broadcast::Sender<ProbeEvent>,
}

impl ConnectivityProbe {
    pub fn new(liveness: Arc<dyn LivenessPlugin>, cfg: &ProbeConfig) -> Self {
        Self::build(liveness, cfg, CancellationToken::new())
    }

    /// Tie the probe to an outer lifetime: cancelling `parent` stops the probe.
    pub fn with_cancellation(
        liveness: Arc<dyn LivenessPlugin>,
        cfg: &ProbeConfig,
        parent: &CancellationToken,
    ) -> Self {
        Self::build(liveness, cfg, parent.child_token())
    }

    fn build(liveness: Arc<dyn LivenessPlugin>, cfg: &ProbeConfig, cancel: CancellationToken) -> Self {
        let (event_tx, _) = broadcast::channel(cfg.event_capacity.max(1));
        let inner = ProbeInner {
            liveness,
            max_retries: cfg.max_retries,
            retry_delay: cfg.retry_delay(),
            call_timeout: cfg.call_timeout(),
            state: ObservableState::new(ConnectionState::InitialLoading),
            attempt: AtomicU32::new(0),
            loop_active: AtomicBool::new(false),
            initial_checked: AtomicBool::new(false),
            cancel,
            event_tx,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state.get()
    }

    pub fn subscribe(&self) -> Subscription<ConnectionState> {
        self.inner.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<ProbeEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Attempts consumed by the current retry loop.
    pub fn attempt(&self) -> u32 {
        self.inner.attempt.load(Ordering::SeqCst)
    }

    pub fn max_retries(&self) -> u32 {
        self.inner.max_retries
    }

    pub fn is_loop_active(&self) -> bool {
        self.inner.loop_active.load(Ordering::SeqCst)
    }

    /// Run the initial liveness check.
    ///
    /// Only the first call per probe issues a request; later calls return the
    /// current state. On timeout the retry loop is spawned and this returns
    /// `WakingUp` without waiting for it. Must be called within a tokio runtime.
    pub async fn check_once(&self) -> ConnectionState {
        let inner = &self.inner;
        if inner.initial_checked.swap(true, Ordering::SeqCst) {
            tracing::debug!(
                target: "kanban.probe",
                stage = "probe.initial.skip",
                state = %self.state()
            );
            return self.state();
        }

        tracing::info!(target: "kanban.probe", stage = "probe.initial.in");
        let Some(outcome) = inner.probe_once(0).await else {
            return self.state();
        };

        match outcome {
            Ok(()) => {
                inner.transition(ConnectionState::Ready);
            }
            Err(ProbeFailure::Timeout) => {
                tracing::warn!(
                    target: "kanban.probe",
                    stage = "probe.initial.timeout",
                    "initial check timed out, backend is presumed asleep"
                );
                inner.attempt.store(0, Ordering::SeqCst);
                if inner.transition(ConnectionState::WakingUp) {
                    inner.spawn_retry_loop();
                }
            }
            Err(ProbeFailure::HostUnreachable) => {
                inner.transition(ConnectionState::NetworkError);
            }
            Err(ProbeFailure::ServerFault) => {
                inner.transition(ConnectionState::ServerError);
            }
        }

        let state = self.state();
        tracing::info!(target: "kanban.probe", stage = "probe.initial.out", state = %state);
        state
    }

    /// User-triggered retry: back to `WakingUp` with a fresh attempt budget,
    /// and (re)start the retry loop unless one is already running.
    ///
    /// Ignored once `Ready` or after shutdown; returns whether the retry was
    /// accepted. Must be called within a tokio runtime.
    pub fn retry_connection(&self) -> bool {
        let inner = &self.inner;
        if inner.cancel.is_cancelled() {
            return false;
        }
        let current = self.state();
        if current == ConnectionState::Ready {
            tracing::debug!(
                target: "kanban.probe",
                stage = "probe.retry.ignored",
                state = %current
            );
            return false;
        }

        tracing::info!(target: "kanban.probe", stage = "probe.retry.manual", from = %current);
        // Reset before publishing WakingUp so a running loop resumes on a fresh budget.
        inner.attempt.store(0, Ordering::SeqCst);
        if !inner.transition(ConnectionState::WakingUp) {
            return false;
        }
        inner.spawn_retry_loop();
        true
    }

    /// Wait until the probe reaches a terminal state, or until it is shut
    /// down (then the current state is returned as-is).
    pub async fn settled(&self) -> ConnectionState {
        let mut sub = self.subscribe();
        tokio::select! {
            _ = self.inner.cancel.cancelled() => self.state(),
            s = sub.wait_for(|s| s.is_terminal()) => s.unwrap_or_else(|| self.state()),
        }
    }

    pub fn shutdown(&self) {
        if !self.inner.cancel.is_cancelled() {
            tracing::debug!(target: "kanban.probe", stage = "probe.shutdown");
            self.inner.cancel.cancel();
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

impl Drop for ConnectivityProbe {
    fn drop(&mut self) {
        self.inner.cancel.cancel();
    }
}

impl ProbeInner {
    fn emit(&self, event: ProbeEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Validated, atomic transition. Returns false when rejected.
    fn transition(&self, to: ConnectionState) -> bool {
        self.transition_when(to, || true)
    }

    /// Like [`Self::transition`], with `guard` evaluated under the state lock
    /// so it cannot interleave with a concurrent transition.
    fn transition_when<G>(&self, to: ConnectionState, guard: G) -> bool
    where
        G: FnOnce() -> bool,
    {
        let previous = self.state.update_if(|current| {
            if !guard() {
                return None;
            }
            match StateTransition::validate(*current, to) {
                Ok(()) => Some(to),
                Err(err) => {
                    tracing::warn!(
                        target: "kanban.probe",
                        stage = "probe.transition.rejected",
                        error = %err
                    );
                    None
                }
            }
        });

        match previous {
            Some(from) => {
                if from != to {
                    tracing::debug!(
                        target: "kanban.probe",
                        stage = "probe.transition",
                        from = %from,
                        to = %to
                    );
                    self.emit(ProbeEvent::StateChanged {
                        from,
                        to,
                        timestamp: Utc::now(),
                    });
                }
                true
            }
            None => false,
        }
    }

    /// Budget exhausted: settle on `ServerError` unless a manual retry reset
    /// the counter in the meantime.
    fn give_up(&self) -> bool {
        let max = self.max_retries;
        self.transition_when(ConnectionState::ServerError, || {
            self.attempt.load(Ordering::SeqCst) >= max
        })
    }

    /// One bounded liveness call. `None` when cancelled before it resolved.
    async fn probe_once(&self, attempt: u32) -> Option<Result<(), ProbeFailure>> {
        self.emit(ProbeEvent::AttemptStarted {
            attempt,
            timestamp: Utc::now(),
        });

        let call = tokio::time::timeout(self.call_timeout, self.liveness.check_status());
        let result = tokio::select! {
            _ = self.cancel.cancelled() => return None,
            r = call => r,
        };

        let outcome = match result {
            Ok(Ok(body)) => {
                tracing::debug!(
                    target: "kanban.probe",
                    stage = "probe.call.ok",
                    attempt,
                    body_len = body.len()
                );
                Ok(())
            }
            Ok(Err(err)) => {
                let failure = ProbeFailure::classify(&err);
                tracing::debug!(
                    target: "kanban.probe",
                    stage = "probe.call.err",
                    attempt,
                    failure = %failure,
                    error = %err
                );
                Err(failure)
            }
            Err(_) => {
                tracing::debug!(
                    target: "kanban.probe",
                    stage = "probe.call.deadline",
                    attempt,
                    timeout_ms = self.call_timeout.as_millis() as u64
                );
                Err(ProbeFailure::Timeout)
            }
        };

        if let Err(failure) = outcome {
            self.emit(ProbeEvent::AttemptFailed {
                attempt,
                failure,
                timestamp: Utc::now(),
            });
        }
        Some(outcome)
    }

    fn spawn_retry_loop(self: &Arc<Self>) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        if self
            .loop_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(
                target: "kanban.probe",
                stage = "probe.loop.already_running"
            );
            return false;
        }
        tokio::spawn(Arc::clone(self).run_retry_loop());
        true
    }

    async fn run_retry_loop(self: Arc<Self>) {
        loop {
            self.run_attempts().await;
            self.loop_active.store(false, Ordering::SeqCst);

            let state = self.state.get();
            let attempts = self.attempt.load(Ordering::SeqCst);
            tracing::info!(
                target: "kanban.probe",
                stage = "probe.loop.out",
                attempts,
                state = %state
            );
            self.emit(ProbeEvent::LoopFinished {
                attempts,
                state,
                timestamp: Utc::now(),
            });

            if self.cancel.is_cancelled() || !state.is_probing() {
                break;
            }
            // A manual retry landed while this loop was winding down and could
            // not start its own; take the work over unless someone else did.
            if self.loop_active.swap(true, Ordering::SeqCst) {
                break;
            }
        }
    }

    async fn run_attempts(&self) {
        loop {
            if self.cancel.is_cancelled() || !self.state.get().is_probing() {
                break;
            }

            let max = self.max_retries;
            let attempt = match self
                .attempt
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |a| {
                    if a < max {
                        Some(a + 1)
                    } else {
                        None
                    }
                }) {
                Ok(previous) => previous + 1,
                Err(_) => {
                    if self.give_up() {
                        break;
                    }
                    continue;
                }
            };

            tracing::debug!(
                target: "kanban.probe",
                stage = "probe.loop.attempt",
                attempt,
                max_retries = max
            );

            let Some(outcome) = self.probe_once(attempt).await else {
                break;
            };

            match outcome {
                Ok(()) => {
                    tracing::info!(
                        target: "kanban.probe",
                        stage = "probe.loop.ready",
                        attempt
                    );
                    self.transition(ConnectionState::Ready);
                    break;
                }
                Err(ProbeFailure::HostUnreachable) => {
                    tracing::error!(
                        target: "kanban.probe",
                        stage = "probe.loop.network_lost",
                        attempt
                    );
                    self.transition(ConnectionState::NetworkError);
                    break;
                }
                Err(ProbeFailure::ServerFault) => {
                    tracing::error!(
                        target: "kanban.probe",
                        stage = "probe.loop.server_fault",
                        attempt
                    );
                    self.transition(ConnectionState::ServerError);
                    break;
                }
                Err(ProbeFailure::Timeout) => {
                    if self.give_up() {
                        tracing::error!(
                            target: "kanban.probe",
                            stage = "probe.loop.exhausted",
                            attempts = max,
                            "backend did not wake up"
                        );
                        break;
                    }
                }
            }

            if self.state.get() == ConnectionState::WakingUp {
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.retry_delay) => {}
                }
            }
        }
    }
}
