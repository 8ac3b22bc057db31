//! Inbound request vocabulary and acknowledgement lines.
//!
//! The transport layer maps each of its endpoints to exactly one
//! [`InboundEvent`] and serves the [`EventReply`]'s display rendering
//! back as the response body. Events are delivered one at a time;
//! [`GameSession::apply`] is the single entry the host event loop
//! calls.

use crate::core::{
    ConduitConfirmResult, GameSession, GameStage, SequenceOutcome, SessionError, TransitionOutcome,
};
use crate::remote::RemoteButton;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One inbound request from the control panel, console, or remote.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum InboundEvent {
    /// Game-master request to move to the given stage.
    Advance(GameStage),
    /// Game-master mission-complete override.
    CompleteMission,
    /// Return the room to Puzzle 1.
    Reset,
    /// Game-master conduit confirmation.
    ConfirmConduits,
    /// A console button press.
    PressButton { id: u8 },
    /// A raw code from the keyfob receiver.
    Remote { code: char },
}

/// What the transport serves back for one event.
///
/// The display rendering is the response body, matching the lines the
/// panel and console firmware expect. Button press replies are
/// deliberately identical for correct and incorrect presses; the
/// room's display is the only feedback channel for the sequence.
#[derive(Clone, PartialEq, Debug)]
pub enum EventReply {
    /// A stage change was applied.
    Applied(TransitionOutcome),
    /// The request was rejected; state is unchanged.
    Rejected(SessionError),
    /// Conduit confirmation was handled.
    Conduits {
        result: ConduitConfirmResult,
        access_code: String,
    },
    /// A console button press was handled.
    Press { id: u8, outcome: SequenceOutcome },
    /// A remote key was recognized and its action applied.
    RemoteAccepted { button: RemoteButton },
    /// An unknown remote code was dropped.
    RemoteIgnored { code: char },
}

impl fmt::Display for EventReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied(outcome) => write!(f, "Stage set: {}", outcome.to),
            Self::Rejected(error) => write!(f, "Request ignored: {error}"),
            Self::Conduits {
                result: ConduitConfirmResult::Accepted,
                access_code,
            } => write!(f, "Conduits confirmed. Code {access_code} unlocked."),
            Self::Conduits {
                result: ConduitConfirmResult::AlreadyConfirmed,
                ..
            } => f.write_str("Conduits already verified."),
            Self::Conduits {
                result: ConduitConfirmResult::WrongState,
                ..
            } => f.write_str("Conduit confirmation ignored. Not in Puzzle 2."),
            Self::Press {
                outcome: SequenceOutcome::WrongStage { .. },
                ..
            } => f.write_str("Button ignored. Not in Puzzle 3."),
            Self::Press { id, .. } => write!(f, "Button press registered: {id}"),
            Self::RemoteAccepted { button } => {
                write!(f, "Remote input accepted: {}", button.code())
            }
            Self::RemoteIgnored { code } => write!(f, "Ignored unknown remote input: {code}"),
        }
    }
}

impl GameSession {
    /// Route one inbound event to its operation and build the reply.
    pub fn apply(&mut self, event: InboundEvent, now: DateTime<Utc>) -> EventReply {
        match event {
            InboundEvent::Advance(target) => match self.advance(target, now) {
                Ok(outcome) => EventReply::Applied(outcome),
                Err(error) => EventReply::Rejected(error),
            },
            InboundEvent::CompleteMission => EventReply::Applied(self.complete_mission(now)),
            InboundEvent::Reset => EventReply::Applied(self.reset(now)),
            InboundEvent::ConfirmConduits => EventReply::Conduits {
                result: self.confirm_conduits(),
                access_code: self.rules().access_code.clone(),
            },
            InboundEvent::PressButton { id } => match self.submit(id, now) {
                Ok(outcome) => EventReply::Press { id, outcome },
                Err(error) => EventReply::Rejected(error),
            },
            InboundEvent::Remote { code } => match RemoteButton::from_code(code) {
                Some(button) => {
                    self.apply_remote(button, now);
                    EventReply::RemoteAccepted { button }
                }
                None => {
                    tracing::debug!(code = %code, "Dropped unknown remote input");
                    EventReply::RemoteIgnored { code }
                }
            },
        }
    }

    // Remote keys map onto the same four operations the panel exposes.
    // The reply acks receipt of the key; an advance that is illegal in
    // the current stage is simply a no-op, the receiver acks either way.
    fn apply_remote(&mut self, button: RemoteButton, now: DateTime<Utc>) {
        match button {
            RemoteButton::A => {
                let _ = self.advance(GameStage::Puzzle2, now);
            }
            RemoteButton::B => {
                let _ = self.advance(GameStage::Puzzle3, now);
            }
            RemoteButton::C => {
                self.reset(now);
            }
            RemoteButton::D => {
                self.complete_mission(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_event_moves_the_stage() {
        let mut session = GameSession::default();
        let reply = session.apply(InboundEvent::Advance(GameStage::Puzzle2), Utc::now());

        assert_eq!(session.stage(), GameStage::Puzzle2);
        assert_eq!(reply.to_string(), "Stage set: Puzzle 2 - Power Conduits");
    }

    #[test]
    fn rejected_advance_renders_the_reason() {
        let mut session = GameSession::default();
        let reply = session.apply(InboundEvent::Advance(GameStage::Puzzle3), Utc::now());

        assert_eq!(session.stage(), GameStage::Puzzle1);
        assert_eq!(
            reply.to_string(),
            "Request ignored: No transition available from Puzzle 1 - Message Decoding to Puzzle 3 - Button Sequence"
        );
    }

    #[test]
    fn conduit_replies_cover_all_three_outcomes() {
        let now = Utc::now();
        let mut session = GameSession::default();

        let wrong = session.apply(InboundEvent::ConfirmConduits, now);
        assert_eq!(
            wrong.to_string(),
            "Conduit confirmation ignored. Not in Puzzle 2."
        );

        session.apply(InboundEvent::Advance(GameStage::Puzzle2), now);

        let accepted = session.apply(InboundEvent::ConfirmConduits, now);
        assert_eq!(accepted.to_string(), "Conduits confirmed. Code 264 unlocked.");

        let repeat = session.apply(InboundEvent::ConfirmConduits, now);
        assert_eq!(repeat.to_string(), "Conduits already verified.");
    }

    #[test]
    fn press_reply_does_not_reveal_correctness() {
        let now = Utc::now();
        let mut session = GameSession::default();
        session.apply(InboundEvent::Advance(GameStage::Puzzle2), now);
        session.apply(InboundEvent::Advance(GameStage::Puzzle3), now);

        // First expected button is 4; press 4 then a wrong one.
        let correct = session.apply(InboundEvent::PressButton { id: 4 }, now);
        let incorrect = session.apply(InboundEvent::PressButton { id: 2 }, now);

        assert_eq!(correct.to_string(), "Button press registered: 4");
        assert_eq!(incorrect.to_string(), "Button press registered: 2");
    }

    #[test]
    fn press_outside_puzzle_three_is_acknowledged_as_ignored() {
        let mut session = GameSession::default();
        let reply = session.apply(InboundEvent::PressButton { id: 3 }, Utc::now());

        assert_eq!(reply.to_string(), "Button ignored. Not in Puzzle 3.");
    }

    #[test]
    fn out_of_range_press_is_rejected() {
        let mut session = GameSession::default();
        let reply = session.apply(InboundEvent::PressButton { id: 9 }, Utc::now());

        assert_eq!(
            reply,
            EventReply::Rejected(SessionError::ButtonOutOfRange { id: 9 })
        );
        assert_eq!(
            reply.to_string(),
            "Request ignored: Button id 9 is not on the console"
        );
    }

    #[test]
    fn remote_keys_drive_the_panel_operations() {
        let now = Utc::now();
        let mut session = GameSession::default();

        session.apply(InboundEvent::Remote { code: 'A' }, now);
        assert_eq!(session.stage(), GameStage::Puzzle2);

        session.apply(InboundEvent::Remote { code: 'B' }, now);
        assert_eq!(session.stage(), GameStage::Puzzle3);

        session.apply(InboundEvent::Remote { code: 'D' }, now);
        assert_eq!(session.stage(), GameStage::MissionComplete);

        session.apply(InboundEvent::Remote { code: 'C' }, now);
        assert_eq!(session.stage(), GameStage::Puzzle1);
    }

    #[test]
    fn remote_codes_are_case_insensitive() {
        let mut session = GameSession::default();
        let reply = session.apply(InboundEvent::Remote { code: 'a' }, Utc::now());

        assert_eq!(session.stage(), GameStage::Puzzle2);
        assert_eq!(reply.to_string(), "Remote input accepted: A");
    }

    #[test]
    fn unknown_remote_code_changes_nothing() {
        let mut session = GameSession::default();
        let before = session.clone();

        let reply = session.apply(InboundEvent::Remote { code: 'x' }, Utc::now());

        assert_eq!(session, before);
        assert_eq!(reply, EventReply::RemoteIgnored { code: 'x' });
        assert_eq!(reply.to_string(), "Ignored unknown remote input: x");
    }

    #[test]
    fn remote_advance_out_of_order_acks_but_does_nothing() {
        let mut session = GameSession::default();

        // B asks for Puzzle 3, which is not reachable from Puzzle 1.
        let reply = session.apply(InboundEvent::Remote { code: 'B' }, Utc::now());

        assert_eq!(
            reply,
            EventReply::RemoteAccepted {
                button: RemoteButton::B,
            }
        );
        assert_eq!(session.stage(), GameStage::Puzzle1);
    }

    #[test]
    fn events_roundtrip_through_json() {
        let event = InboundEvent::PressButton { id: 4 };
        let json = serde_json::to_string(&event).unwrap();
        let back: InboundEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
