//! Intersection controller: the scheduler loop and the override handler.

use super::builder::ControllerBuilder;
use super::error::ControllerError;
use crate::core::{
    override_for, Axis, Guard, OverrideDecision, Phase, PhaseHistory, PhaseTable,
    PhaseTransition, TransitionCause,
};
use crate::driver::SignalDriver;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What the signal heads are doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerStatus {
    /// Cycling; the given phase is applied
    Active(Phase),
    /// Shut down with every output de-energized
    Dark,
}

/// How a hold ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HoldOutcome {
    Elapsed,
    Overridden,
    Shutdown,
}

/// State shared by the scheduler and the override handler.
///
/// Only the scheduler writes `current`. A `pending` request is always
/// relative to `current`: the handler computes it under this lock and the
/// scheduler clears it whenever it advances.
struct Shared {
    current: Phase,
    pending: Option<Phase>,
    history: PhaseHistory,
    dark: bool,
    fault: Option<ControllerError>,
}

struct Inner<D> {
    driver: D,
    table: PhaseTable,
    guard: Guard,
    state: Mutex<Shared>,
    wake: Notify,
    cancel: CancellationToken,
    /// Per-axis pulse generation, so an older pulse never clears a newer one
    pulses: [AtomicU64; 2],
}

/// Controller for a single four-way intersection.
///
/// Cheap to clone; clones share the same state. Hand one to the scheduler
/// task ([`run_cycle`](Self::run_cycle)) and one to the arrival handler
/// ([`request_override`](Self::request_override)).
pub struct Controller<D: SignalDriver + 'static> {
    inner: Arc<Inner<D>>,
}

impl<D: SignalDriver + 'static> Clone for Controller<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: SignalDriver + 'static> Controller<D> {
    /// Controller with reference timings starting at east/west green.
    pub fn new(driver: D) -> Self {
        ControllerBuilder::new(driver).build()
    }

    pub fn builder(driver: D) -> ControllerBuilder<D> {
        ControllerBuilder::new(driver)
    }

    pub(crate) fn from_parts(
        driver: D,
        table: PhaseTable,
        guard: Guard,
        initial: Phase,
        history_capacity: usize,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                driver,
                table,
                guard,
                state: Mutex::new(Shared {
                    current: initial,
                    pending: None,
                    history: PhaseHistory::with_capacity(history_capacity),
                    dark: false,
                    fault: None,
                }),
                wake: Notify::new(),
                cancel: CancellationToken::new(),
                pulses: [AtomicU64::new(0), AtomicU64::new(0)],
            }),
        }
    }

    pub fn current_phase(&self) -> Phase {
        self.inner.state.lock().current
    }

    /// Override request waiting for the scheduler, if any.
    pub fn pending_request(&self) -> Option<Phase> {
        self.inner.state.lock().pending
    }

    pub fn status(&self) -> ControllerStatus {
        let state = self.inner.state.lock();
        if state.dark {
            ControllerStatus::Dark
        } else {
            ControllerStatus::Active(state.current)
        }
    }

    /// Snapshot of recent transitions.
    pub fn history(&self) -> PhaseHistory {
        self.inner.state.lock().history.clone()
    }

    pub fn driver(&self) -> &D {
        &self.inner.driver
    }

    pub fn table(&self) -> &PhaseTable {
        &self.inner.table
    }

    pub fn is_running(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    /// Token cancelled when the controller shuts down. Companion tasks
    /// (sensor sources, handlers) stop on it.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    /// Ask the scheduler to stop. It wakes from any hold, switches every
    /// output off and returns from [`run_cycle`](Self::run_cycle).
    pub fn shutdown(&self) {
        if self.is_running() {
            info!("Shutdown requested");
        }
        self.inner.cancel.cancel();
    }

    /// Handle a vehicle arrival on `axis`.
    ///
    /// Computes the override from the current phase and, for a jump,
    /// stores it in the pending slot and wakes the scheduler. Arrivals on
    /// an axis already being served, or one the default succession already
    /// leads to, leave the slot untouched.
    pub fn request_override(&self, axis: Axis) -> OverrideDecision {
        let (current, decision) = {
            let mut state = self.inner.state.lock();
            let decision = override_for(axis, state.current);
            if let Some(target) = decision.requested() {
                state.pending = Some(target);
            }
            (state.current, decision)
        };

        match decision {
            OverrideDecision::Jump(target) => {
                debug!(%axis, %current, %target, "Override requested");
                self.inner.wake.notify_one();
            }
            OverrideDecision::AlreadyServing => {
                debug!(%axis, %current, "Arrival ignored; axis already has green");
            }
            OverrideDecision::Defer => {
                debug!(%axis, %current, "Arrival deferred to default succession");
            }
        }

        decision
    }

    /// Light the arrival indicator for `axis` for `duration`, without
    /// blocking the caller or the scheduler.
    pub fn pulse_indicator(&self, axis: Axis, duration: Duration) -> JoinHandle<()> {
        let slot = axis.index();
        let generation = self.inner.pulses[slot].fetch_add(1, Ordering::SeqCst) + 1;
        let controller = self.clone();

        tokio::spawn(async move {
            if !controller.write_indicator(axis, true) {
                return;
            }

            tokio::select! {
                _ = controller.inner.cancel.cancelled() => return,
                _ = tokio::time::sleep(duration) => {}
            }

            if controller.inner.pulses[slot].load(Ordering::SeqCst) == generation {
                controller.write_indicator(axis, false);
            }
        })
    }

    /// Run the signal cycle until shutdown.
    ///
    /// Applies the current phase, holds it for its duration (cut short by an
    /// override request), then advances to the requested phase or the
    /// default successor. On shutdown or a driver failure every output is
    /// switched off before returning.
    pub async fn run_cycle(&self) -> Result<(), ControllerError> {
        info!(phase = %self.current_phase(), "Starting signal cycle");

        let outcome = self.cycle().await;

        let off = {
            let mut state = self.inner.state.lock();
            let off = self.inner.driver.all_off();
            state.dark = true;
            off
        };
        // Companion tasks stop with the scheduler, whatever the reason.
        self.inner.cancel.cancel();

        match (outcome, off) {
            (Ok(()), Ok(())) => {
                info!("Signal cycle stopped; all outputs off");
                Ok(())
            }
            (Ok(()), Err(err)) => {
                error!(error = %err, "Failed to switch outputs off");
                Err(err.into())
            }
            (Err(err), off) => {
                if let Err(off_err) = off {
                    error!(error = %off_err, "Failed to switch outputs off");
                }
                error!(error = %err, "Signal cycle aborted");
                Err(err)
            }
        }
    }

    async fn cycle(&self) -> Result<(), ControllerError> {
        while self.is_running() {
            let config = self.inner.table.config_for(self.current_phase());
            self.inner.driver.apply(&config)?;
            debug!(
                phase = %config.phase,
                hold_ms = config.hold.as_millis() as u64,
                "Phase applied"
            );

            match self.hold(config.hold).await {
                HoldOutcome::Shutdown => break,
                HoldOutcome::Elapsed | HoldOutcome::Overridden => self.advance(),
            }
        }

        let fault = self.inner.state.lock().fault.take();
        match fault {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Wait out a hold. Returns early on shutdown or when an override is pending.
    async fn hold(&self, duration: Duration) -> HoldOutcome {
        let deadline = Instant::now() + duration;

        loop {
            tokio::select! {
                biased;
                _ = self.inner.cancel.cancelled() => return HoldOutcome::Shutdown,
                _ = self.inner.wake.notified() => {
                    // A wake-up with an empty slot is a stale permit from a
                    // request already consumed; keep holding.
                    if self.pending_request().is_some() {
                        return HoldOutcome::Overridden;
                    }
                }
                _ = tokio::time::sleep_until(deadline) => return HoldOutcome::Elapsed,
            }
        }
    }

    /// Commit the next phase: a pending request if it passes the guard,
    /// otherwise the default successor.
    fn advance(&self) {
        let (from, to, cause) = {
            let mut state = self.inner.state.lock();
            let from = state.current;
            let (to, cause) = match state.pending.take() {
                Some(requested) if self.inner.guard.check(&from, &requested) => {
                    (requested, TransitionCause::Override)
                }
                Some(requested) => {
                    error!(%from, %requested, "Discarding override that fails clearance");
                    (from.successor(), TransitionCause::Scheduled)
                }
                None => (from.successor(), TransitionCause::Scheduled),
            };
            state.current = to;
            state.history.record(PhaseTransition::new(from, to, cause));
            (from, to, cause)
        };

        info!(%from, %to, ?cause, "Phase change");
    }

    /// Write an indicator unless the controller has gone dark.
    /// A failure is recorded as the controller fault and stops the cycle.
    fn write_indicator(&self, axis: Axis, on: bool) -> bool {
        let mut state = self.inner.state.lock();
        if state.dark {
            return false;
        }

        match self.inner.driver.set_indicator(axis, on) {
            Ok(()) => true,
            Err(source) => {
                error!(%axis, on, error = %source, "Indicator write failed");
                if state.fault.is_none() {
                    state.fault = Some(ControllerError::Indicator { axis, source });
                }
                drop(state);
                warn!("Stopping signal cycle after driver fault");
                self.inner.cancel.cancel();
                false
            }
        }
    }
}
