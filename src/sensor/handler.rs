//! Task that turns arrival events into override requests.

use super::ArrivalEvent;
use crate::controller::Controller;
use crate::driver::SignalDriver;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Drain arrival events into the controller until shutdown or until every
/// sender is gone.
///
/// Each arrival is evaluated against the current phase and pulses that
/// axis's indicator for `pulse`. The pulse runs as its own task, so the
/// handler is ready for the next event immediately.
pub async fn run_override_handler<D: SignalDriver + 'static>(
    controller: Controller<D>,
    mut events: mpsc::Receiver<ArrivalEvent>,
    pulse: Duration,
) {
    let cancel = controller.cancellation_token();

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        let decision = controller.request_override(event.axis);
        info!(axis = %event.axis, ?decision, "Vehicle arrival");
        controller.pulse_indicator(event.axis, pulse);
    }

    debug!("Override handler stopped");
}
