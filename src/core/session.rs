//! The mission session: stage progression, one-shot gates, and the
//! button matcher behind a single owned value.
//!
//! One `GameSession` exists per powered-on room. All operations take
//! `&mut self` and an explicit `now`; the session never reads the
//! clock itself, which keeps every rule a pure function of its inputs
//! and makes the timed error flash testable without sleeping.

use super::history::{StageHistory, StageTransition, TransitionCause};
use super::sequence::{SequenceOutcome, SequencePattern, SequenceProgress};
use super::stage::GameStage;
use crate::config::GameRules;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected session requests. State is untouched when these are
/// returned.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The requested stage change is not a legal forward step.
    #[error("No transition available from {from} to {to}")]
    InvalidTransition { from: GameStage, to: GameStage },

    /// The button id does not exist on the console. The transport
    /// validates ids before calling in, so reaching this means a host
    /// bug rather than player input.
    #[error("Button id {id} is not on the console")]
    ButtonOutOfRange { id: u8 },
}

/// Outcome of a conduit confirmation request.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ConduitConfirmResult {
    /// First confirmation while Puzzle 2 is active; the access code is
    /// now unlocked.
    Accepted,
    /// Repeat confirmation; the gate stays set.
    AlreadyConfirmed,
    /// Confirmation arrived outside Puzzle 2 and was ignored.
    WrongState,
}

/// Record of an applied stage change, returned by every operation
/// that moves the stage.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TransitionOutcome {
    /// The stage that was active when the request arrived
    pub from: GameStage,
    /// The stage that is active now
    pub to: GameStage,
    /// What drove the change
    pub cause: TransitionCause,
    /// True only on the first entry to `MissionComplete` per session;
    /// the host fires the physical latch release on this edge.
    pub latch_fired: bool,
}

/// The single mission session for the room.
///
/// Owns the current stage, both one-shot gates, the button matcher
/// state, and the transition journal. The session is the only writer
/// of all of them.
///
/// # Example
///
/// ```rust
/// use lost_signal::core::{GameSession, GameStage};
/// use chrono::Utc;
///
/// let mut session = GameSession::default();
/// assert_eq!(session.stage(), GameStage::Puzzle1);
///
/// let outcome = session.advance(GameStage::Puzzle2, Utc::now()).unwrap();
/// assert_eq!(outcome.to, GameStage::Puzzle2);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct GameSession {
    stage: GameStage,
    latch_triggered: bool,
    conduits_verified: bool,
    sequence: SequenceProgress,
    history: StageHistory,
    rules: GameRules,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameRules::default())
    }
}

impl GameSession {
    /// Start a fresh session in Puzzle 1 under the given rules.
    pub fn new(rules: GameRules) -> Self {
        Self {
            stage: GameStage::Puzzle1,
            latch_triggered: false,
            conduits_verified: false,
            sequence: SequenceProgress::new(),
            history: StageHistory::new(),
            rules,
        }
    }

    /// The currently active stage.
    pub fn stage(&self) -> GameStage {
        self.stage
    }

    /// Whether the latch release has fired this session.
    pub fn latch_triggered(&self) -> bool {
        self.latch_triggered
    }

    /// Whether the game master has confirmed the power conduits.
    pub fn conduits_verified(&self) -> bool {
        self.conduits_verified
    }

    /// Button matcher state.
    pub fn sequence(&self) -> &SequenceProgress {
        &self.sequence
    }

    /// Journal of applied stage changes.
    pub fn history(&self) -> &StageHistory {
        &self.history
    }

    /// The rules this session runs under.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Request a forward stage change.
    ///
    /// Only adjacent forward steps are legal; anything else is
    /// rejected without touching state, including every request made
    /// while the mission is already complete. Advancing into
    /// `MissionComplete` behaves exactly like
    /// [`complete_mission`](Self::complete_mission).
    pub fn advance(
        &mut self,
        target: GameStage,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, SessionError> {
        if self.stage.next() != Some(target) {
            tracing::warn!(
                from = self.stage.name(),
                to = target.name(),
                "Rejected stage advance"
            );
            return Err(SessionError::InvalidTransition {
                from: self.stage,
                to: target,
            });
        }

        let outcome = match target {
            GameStage::MissionComplete => self.complete(TransitionCause::Advance, now),
            stage => self.enter(stage, TransitionCause::Advance, now),
        };
        Ok(outcome)
    }

    /// Force the mission complete from any stage.
    ///
    /// Idempotent game-master override: calling it again once complete
    /// changes nothing and reports `latch_fired: false`.
    pub fn complete_mission(&mut self, now: DateTime<Utc>) -> TransitionOutcome {
        self.complete(TransitionCause::GmOverride, now)
    }

    /// Return the room to Puzzle 1 for the next group.
    ///
    /// Unconditional: clears both gates and the matcher, re-arming the
    /// latch for the next playthrough.
    pub fn reset(&mut self, now: DateTime<Utc>) -> TransitionOutcome {
        let from = self.stage;
        self.stage = GameStage::Puzzle1;
        self.conduits_verified = false;
        self.latch_triggered = false;
        self.sequence.restart();
        self.journal(from, GameStage::Puzzle1, TransitionCause::Reset, now);
        tracing::info!(from = from.name(), "Mission reset to Puzzle 1");
        TransitionOutcome {
            from,
            to: GameStage::Puzzle1,
            cause: TransitionCause::Reset,
            latch_fired: false,
        }
    }

    /// Record the game master's conduit confirmation.
    ///
    /// The only path by which the conduit gate becomes set. Accepted
    /// once per Puzzle 2 visit; repeats are reported distinctly and
    /// requests outside Puzzle 2 are ignored.
    pub fn confirm_conduits(&mut self) -> ConduitConfirmResult {
        match self.stage {
            GameStage::Puzzle2 if self.conduits_verified => ConduitConfirmResult::AlreadyConfirmed,
            GameStage::Puzzle2 => {
                self.conduits_verified = true;
                tracing::info!(
                    code = %self.rules.access_code,
                    "Power conduits confirmed, access code unlocked"
                );
                ConduitConfirmResult::Accepted
            }
            _ => {
                tracing::debug!(
                    stage = self.stage.name(),
                    "Conduit confirmation ignored outside Puzzle 2"
                );
                ConduitConfirmResult::WrongState
            }
        }
    }

    /// Submit one button press to the matcher.
    ///
    /// Presses only count while Puzzle 3 is active; elsewhere they are
    /// reported as `WrongStage` and ignored. Completing the pattern
    /// finishes the mission on the spot.
    pub fn submit(
        &mut self,
        button_id: u8,
        now: DateTime<Utc>,
    ) -> Result<SequenceOutcome, SessionError> {
        if !SequencePattern::is_valid_button(button_id) {
            return Err(SessionError::ButtonOutOfRange { id: button_id });
        }
        if self.stage != GameStage::Puzzle3 {
            tracing::debug!(
                stage = self.stage.name(),
                button_id,
                "Ignored press outside Puzzle 3"
            );
            return Ok(SequenceOutcome::WrongStage { stage: self.stage });
        }

        let error_flash = self.rules.error_flash();
        let outcome = self
            .sequence
            .submit(&self.rules.pattern, button_id, error_flash, now);

        match outcome {
            SequenceOutcome::Correct { progress, complete } => {
                tracing::debug!(
                    button_id,
                    progress,
                    total = self.rules.pattern.len(),
                    "Correct button press"
                );
                if complete {
                    self.complete(TransitionCause::SequenceComplete, now);
                }
            }
            SequenceOutcome::Incorrect { expected } => {
                tracing::warn!(button_id, expected, "Wrong button, sequence reset");
            }
            SequenceOutcome::WrongStage { .. } => {}
        }

        Ok(outcome)
    }

    /// Whether the sequence error flash is showing at `now`. Pure read
    /// used by the display projection.
    pub fn error_active(&self, now: DateTime<Utc>) -> bool {
        self.sequence.error_active(now)
    }

    /// Polling read of the error flash; releases the stored deadline
    /// on its first expired observation.
    pub fn poll_error(&mut self, now: DateTime<Utc>) -> bool {
        self.sequence.poll_error(now)
    }

    fn enter(&mut self, target: GameStage, cause: TransitionCause, now: DateTime<Utc>) -> TransitionOutcome {
        let from = self.stage;
        self.stage = target;
        match target {
            // Re-entering Puzzle 2 always re-arms the conduit gate.
            GameStage::Puzzle2 => {
                self.conduits_verified = false;
                self.sequence.clear_error();
            }
            GameStage::Puzzle3 => self.sequence.restart(),
            _ => {}
        }
        self.journal(from, target, cause, now);
        tracing::info!(from = from.name(), to = target.name(), "Advanced stage");
        TransitionOutcome {
            from,
            to: target,
            cause,
            latch_fired: false,
        }
    }

    fn complete(&mut self, cause: TransitionCause, now: DateTime<Utc>) -> TransitionOutcome {
        let from = self.stage;
        self.stage = GameStage::MissionComplete;
        self.sequence.restart();
        let latch_fired = !self.latch_triggered;
        self.latch_triggered = true;
        self.journal(from, GameStage::MissionComplete, cause, now);
        if latch_fired {
            tracing::info!(cause = ?cause, "Mission complete, latch release requested");
        } else {
            tracing::info!(cause = ?cause, "Mission complete confirmed, latch already released");
        }
        TransitionOutcome {
            from,
            to: GameStage::MissionComplete,
            cause,
            latch_fired,
        }
    }

    // Journal only real stage changes; repeats like a second
    // mission-complete override stay out of the record.
    fn journal(&mut self, from: GameStage, to: GameStage, cause: TransitionCause, now: DateTime<Utc>) {
        if from != to {
            self.history = self.history.record(StageTransition {
                from,
                to,
                cause,
                timestamp: now,
            });
        }
    }
}
