//! Search progress publication
//!
//! The solver reports every expanded node to an optional
//! [`ProgressObserver`]. Two observers are provided: one that forwards the
//! partial footstep sequence over a bounded channel for external
//! visualization, and one that writes periodic log lines.

use crossbeam_channel::{Sender, TrySendError};
use log::{debug, warn};

use crate::common::ProgressObserver;

/// Snapshot handed to observers when a node is expanded
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate<'a, S> {
    /// Footsteps from the start to the expanded node, inclusive
    pub footsteps: &'a [S],
    /// Number of nodes expanded so far, including this one
    pub expanded: usize,
    /// Accumulated cost of the expanded node
    pub cost: f64,
}

/// Owned copy of a [`ProgressUpdate`], as sent over a channel
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressMessage<S> {
    pub footsteps: Vec<S>,
    pub expanded: usize,
    pub cost: f64,
}

/// Forwards progress over a bounded channel without ever blocking
///
/// Messages are dropped when the receiver lags behind or has gone away.
pub struct ChannelProgressPublisher<S> {
    sender: Sender<ProgressMessage<S>>,
    dropped: usize,
    disconnected: bool,
}

impl<S> ChannelProgressPublisher<S> {
    pub fn new(sender: Sender<ProgressMessage<S>>) -> Self {
        Self {
            sender,
            dropped: 0,
            disconnected: false,
        }
    }

    /// Messages discarded so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<S: Clone> ProgressObserver<S> for ChannelProgressPublisher<S> {
    fn on_expand(&mut self, update: &ProgressUpdate<'_, S>) {
        if self.disconnected {
            self.dropped += 1;
            return;
        }
        let message = ProgressMessage {
            footsteps: update.footsteps.to_vec(),
            expanded: update.expanded,
            cost: update.cost,
        };
        match self.sender.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                debug!("[Progress] channel full, dropped update {}", update.expanded);
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                self.disconnected = true;
                warn!("[Progress] receiver disconnected, progress publication stopped");
            }
        }
    }
}

/// Logs the search frontier every `interval` expansions
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    interval: usize,
}

impl LoggingObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl<S> ProgressObserver<S> for LoggingObserver {
    fn on_expand(&mut self, update: &ProgressUpdate<'_, S>) {
        if update.expanded % self.interval == 0 {
            debug!(
                "[Progress] expanded: {}, depth: {}, cost: {:.3}",
                update.expanded,
                update.footsteps.len(),
                update.cost
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn update(steps: &[u32], expanded: usize) -> ProgressUpdate<'_, u32> {
        ProgressUpdate {
            footsteps: steps,
            expanded,
            cost: expanded as f64,
        }
    }

    #[test]
    fn test_channel_publisher_forwards_updates() {
        let (tx, rx) = bounded(4);
        let mut publisher = ChannelProgressPublisher::new(tx);
        publisher.on_expand(&update(&[1, 2, 3], 1));

        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.footsteps, vec![1, 2, 3]);
        assert_eq!(msg.expanded, 1);
        assert_eq!(publisher.dropped(), 0);
    }

    #[test]
    fn test_channel_publisher_drops_when_full() {
        let (tx, rx) = bounded(1);
        let mut publisher = ChannelProgressPublisher::new(tx);
        publisher.on_expand(&update(&[1], 1));
        publisher.on_expand(&update(&[1, 2], 2));
        publisher.on_expand(&update(&[1, 2, 3], 3));

        assert_eq!(publisher.dropped(), 2);
        assert_eq!(rx.try_recv().unwrap().expanded, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_publisher_survives_disconnect() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut publisher = ChannelProgressPublisher::new(tx);
        publisher.on_expand(&update(&[1], 1));
        publisher.on_expand(&update(&[1], 2));
        assert_eq!(publisher.dropped(), 2);
    }

    #[test]
    fn test_logging_observer_interval_floor() {
        let mut observer = LoggingObserver::new(0);
        assert_eq!(observer.interval, 1);
        observer.on_expand(&update(&[1], 5));
    }
}
