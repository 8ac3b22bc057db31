//! The latch release seam.
//!
//! The room has exactly one physical actuator: a servo that drops the
//! false bottom of the tacklebox when the mission completes. The hub
//! core never touches hardware; it asks the environment for a release
//! on the mission-complete edge and the host wires in a real driver.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Fault reported by a latch driver.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("Latch driver fault: {reason}")]
pub struct LatchFault {
    pub reason: String,
}

/// Environment capability for the latch release.
///
/// Drivers take `&self` and manage their own interior state so they
/// can be shared with an async host. A release request is only issued
/// on the first mission-complete edge per session; drivers should
/// still tolerate repeats, since a retried command can reach them
/// twice.
pub trait LatchDriver {
    fn release(&self) -> Result<(), LatchFault>;
}

/// Driver that counts release edges instead of moving hardware.
///
/// Clones share the counter, so a copy handed into an effect run
/// reports back through the original.
#[derive(Clone, Debug, Default)]
pub struct RecordingLatch {
    releases: Arc<AtomicUsize>,
}

impl RecordingLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many release edges have been requested.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl LatchDriver for RecordingLatch {
    fn release(&self) -> Result<(), LatchFault> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        tracing::info!("Latch release triggered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_latch_counts_releases() {
        let latch = RecordingLatch::new();
        assert_eq!(latch.releases(), 0);

        latch.release().unwrap();
        latch.release().unwrap();
        assert_eq!(latch.releases(), 2);
    }

    #[test]
    fn clones_share_the_counter() {
        let latch = RecordingLatch::new();
        let clone = latch.clone();

        clone.release().unwrap();
        assert_eq!(latch.releases(), 1);
    }

    #[test]
    fn fault_renders_its_reason() {
        let fault = LatchFault {
            reason: "servo jammed".to_string(),
        };
        assert_eq!(fault.to_string(), "Latch driver fault: servo jammed");
    }
}
