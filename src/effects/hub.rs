//! Hub that executes inbound events as effects.

use crate::core::GameSession;
use crate::dispatch::{EventReply, InboundEvent};
use crate::effects::latch::{LatchDriver, LatchFault};
use chrono::{DateTime, Utc};
use stillwater::effect::Effect;
use stillwater::prelude::*;
use thiserror::Error;

/// Failures while executing an event against the environment.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum HubError {
    /// The latch driver refused the release.
    #[error("Latch release failed: {0}")]
    Latch(#[from] LatchFault),
}

/// Owns the session and executes inbound events with their effects.
///
/// Execution is two-phase: `step` computes the next session on a copy
/// and fires the latch through the environment on the
/// mission-complete edge, then `commit` stores the computed session.
/// A driver fault therefore leaves the committed session exactly as
/// it was; the host can surface the fault and retry the event.
pub struct MissionHub {
    session: GameSession,
}

impl MissionHub {
    /// Wrap a session for effectful execution.
    pub fn new(session: GameSession) -> Self {
        Self { session }
    }

    /// The committed session (pure).
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Execute one event, returning the next session and its reply.
    /// Returns impl Effect for zero-cost composition.
    /// After running the effect, call commit() with the new session.
    pub fn step<Env>(
        &self,
        event: InboundEvent,
        now: DateTime<Utc>,
    ) -> impl Effect<Output = (GameSession, EventReply), Error = HubError, Env = Env> + '_
    where
        Env: LatchDriver + Clone + Send + Sync + 'static,
    {
        from_fn(move |env: &Env| {
            let mut next = self.session.clone();
            let armed_before = next.latch_triggered();
            let reply = next.apply(event, now);

            // The latch fires on the false -> true edge and on no
            // other path, so comparing the flag around the event is
            // exact.
            if !armed_before && next.latch_triggered() {
                env.release()?;
            }

            Ok((next, reply))
        })
    }

    /// Store the session computed by a successful step.
    pub fn commit(&mut self, next: GameSession) {
        self.session = next;
    }
}
