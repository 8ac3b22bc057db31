//! Effectful event execution using Stillwater 0.11.0.
//!
//! This module is the "imperative shell" around the pure core: it
//! owns the committed session, runs inbound events as effects, and
//! reaches the one piece of hardware (the latch release) through an
//! environment trait.
//!
//! Following Stillwater 0.11.0 conventions:
//! - `step` returns `impl Effect` for zero-cost composition
//! - The environment is supplied at `run`, not at construction
//! - A step computes on a copy; `commit` stores the result

mod hub;
mod latch;

pub use hub::{HubError, MissionHub};
pub use latch::{LatchDriver, LatchFault, RecordingLatch};
