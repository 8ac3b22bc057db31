//! Display projection.
//!
//! Maps the session onto the payload the room's display polls for.
//! Projection is a pure read: it never advances the matcher, never
//! clears the error flash, and can be called any number of times
//! between events without observable effect. The transport renders
//! the payload into HTML; everything here is plain text.

use crate::core::{GameSession, GameStage, SequencePattern};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Visual state of one sequence slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SlotStatus {
    /// Already entered correctly.
    Done,
    /// The slot the players are on.
    Active,
    /// Not reached yet.
    Pending,
}

/// One slot of the sequence strip.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SequenceSlot {
    pub button: u8,
    pub status: SlotStatus,
}

/// The "Next Input" cue above the strip.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum NextInput {
    /// Show the expected button id.
    Expect(u8),
    /// The whole pattern has been entered; show the checkmark.
    Satisfied,
}

/// The sequence strip shown during Puzzle 3.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SequenceBoard {
    pub next: NextInput,
    pub slots: Vec<SequenceSlot>,
}

impl SequenceBoard {
    /// Build the strip for a pattern with `next_index` slots already
    /// satisfied.
    pub fn for_progress(pattern: &SequencePattern, next_index: usize) -> Self {
        let next = match pattern.get(next_index) {
            Some(expected) => NextInput::Expect(expected),
            None => NextInput::Satisfied,
        };
        let slots = pattern
            .buttons()
            .iter()
            .enumerate()
            .map(|(i, &button)| SequenceSlot {
                button,
                status: if i < next_index {
                    SlotStatus::Done
                } else if i == next_index {
                    SlotStatus::Active
                } else {
                    SlotStatus::Pending
                },
            })
            .collect();
        Self { next, slots }
    }
}

/// Everything the display needs for one refresh.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DisplayPayload {
    /// The stage this payload describes.
    pub stage: GameStage,
    /// Game-master label for the stage.
    pub stage_label: String,
    /// Story headline.
    pub headline: String,
    /// Story paragraphs, in display order.
    pub narrative: Vec<String>,
    /// Unlock banner; present only once the conduits are confirmed.
    pub banner: Option<String>,
    /// Access code; present only once the conduits are confirmed.
    pub access_code: Option<String>,
    /// Sequence strip; present only during Puzzle 3.
    pub sequence: Option<SequenceBoard>,
    /// Error flash line; present only while a wrong press is showing.
    pub alert: Option<String>,
}

/// Project the session onto a display payload at time `now`.
///
/// Total: every reachable session state maps to a payload.
pub fn project(session: &GameSession, now: DateTime<Utc>) -> DisplayPayload {
    let stage = session.stage();
    let mut payload = DisplayPayload {
        stage,
        stage_label: stage.label().to_string(),
        headline: String::new(),
        narrative: Vec::new(),
        banner: None,
        access_code: None,
        sequence: None,
        alert: None,
    };

    match stage {
        GameStage::Puzzle1 => {
            payload.headline = "Lost Signal".to_string();
            payload.narrative = vec![
                "The Orion expedition just lost contact with Mission Control. Decode the \
                 incoming message to re-align the antenna array."
                    .to_string(),
                "Last Transmission:".to_string(),
                "#4 🌍  #7 🪐  #2 ☄️  #9 ⭐".to_string(),
                "02: ⚡ 🔋 🔋 ☁️".to_string(),
                "PWR: 🔺 🟩 🔵".to_string(),
                "Each icon matches a laminated key hidden in the room.".to_string(),
                "Card 1 - Number Key: use the numbers after each # to pick words.".to_string(),
                "Cards 2 & 3 - Emoji Keys: earth=oxygen, planet=system, meteor=offline, \
                 star=restore, bolt=power, battery=battery, cloud=conduit, shapes=set the \
                 order."
                    .to_string(),
                "Card 4 - Rule Key: read the first line before the second.".to_string(),
                "Card 5 - Operation Hint: say each emoji aloud and stitch the sentences \
                 together."
                    .to_string(),
                "Card 6 - Confirmation: once you reach system and restore, shout them to \
                 flag Mission Control."
                    .to_string(),
                "Awaiting GM confirmation...".to_string(),
            ];
        }
        GameStage::Puzzle2 => {
            payload.headline = "Power Conduits".to_string();
            if session.conduits_verified() {
                payload.narrative = vec![
                    "Conduits verified.".to_string(),
                    "Power conduits aligned. Access to Button Control Chamber granted. \
                     Proceed to repower oxygen supply."
                        .to_string(),
                ];
                payload.banner = Some("POWER STABLE - BUTTON ACCESS UNLOCKED".to_string());
                payload.access_code = Some(session.rules().access_code.clone());
            } else {
                payload.narrative = vec![
                    "Great work! Route power through the damaged conduits on the floor. \
                     Match the colored strings to the floor diagram to bring the system \
                     back online."
                        .to_string(),
                    "Await GM visual confirmation before entering the command code.".to_string(),
                ];
            }
        }
        GameStage::Puzzle3 => {
            payload.headline = "Button Sequence".to_string();
            payload.narrative = vec![
                "The lock is open, but the drive bay still needs a precise manual input. \
                 Use all five buttons to enter the correct sequence."
                    .to_string(),
                "Stay sharp. Incorrect inputs reset the buffer.".to_string(),
            ];
            payload.sequence = Some(SequenceBoard::for_progress(
                &session.rules().pattern,
                session.sequence().next_index(),
            ));
            if session.error_active(now) {
                payload.alert = Some("Incorrect input detected. Sequence reset.".to_string());
            }
        }
        GameStage::MissionComplete => {
            payload.headline = "Mission Complete".to_string();
            payload.narrative = vec![
                "Oxygen restored. Returning to Earth.".to_string(),
                "Mission accomplished!".to_string(),
            ];
        }
    }

    payload
}
