//! Text-line detector source.
//!
//! Each line names an axis, standing in for a detector press. The binary
//! reads stdin so an operator can simulate vehicles from a terminal.

use super::{ArrivalEvent, Debouncer};
use crate::core::Axis;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Parse an axis token, case-insensitively.
///
/// ```rust
/// use signalbox::core::Axis;
/// use signalbox::sensor::parse_axis;
///
/// assert_eq!(parse_axis("NS"), Some(Axis::NorthSouth));
/// assert_eq!(parse_axis("east_west"), Some(Axis::EastWest));
/// assert_eq!(parse_axis("up"), None);
/// ```
pub fn parse_axis(token: &str) -> Option<Axis> {
    match token.trim().to_ascii_lowercase().as_str() {
        "ns" | "north_south" | "n" | "s" | "north" | "south" => Some(Axis::NorthSouth),
        "ew" | "east_west" | "e" | "w" | "east" | "west" => Some(Axis::EastWest),
        _ => None,
    }
}

/// Reads axis names line by line and forwards debounced arrivals.
pub struct LineSensor<R> {
    reader: R,
    debouncer: Debouncer,
}

impl<R: AsyncBufRead + Unpin> LineSensor<R> {
    pub fn new(reader: R, debounce: Duration) -> Self {
        Self {
            reader,
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Forward arrivals until the input ends, the receiver goes away, or
    /// `cancel` fires. A full queue drops the arrival rather than blocking.
    pub async fn run(
        mut self,
        events: mpsc::Sender<ArrivalEvent>,
        cancel: CancellationToken,
    ) -> std::io::Result<()> {
        let mut lines = self.reader.lines();

        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => break,
                line = lines.next_line() => line?,
            };
            let Some(line) = line else {
                debug!("Sensor input closed");
                break;
            };

            let token = line.trim();
            if token.is_empty() {
                continue;
            }
            let Some(axis) = parse_axis(token) else {
                warn!(input = %token, "Unrecognised sensor input");
                continue;
            };

            let event = ArrivalEvent::now(axis);
            if !self.debouncer.accept(&event) {
                debug!(%axis, "Arrival debounced");
                continue;
            }

            match events.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => debug!(%axis, "Event queue full; arrival dropped"),
                Err(TrySendError::Closed(_)) => break,
            }
        }

        Ok(())
    }
}
