//! Game stage representation.
//!
//! The Lost Signal room runs through a fixed, strictly ordered set of
//! stages. Stages are plain values; all progression rules live in
//! [`GameSession`](crate::core::GameSession).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of the mission, in play order.
///
/// The ordering is total and matches play order, so comparisons like
/// `stage >= GameStage::Puzzle2` can be used to gate stage-dependent
/// behavior. `MissionComplete` is terminal; only a reset leaves it.
///
/// # Example
///
/// ```rust
/// use lost_signal::core::GameStage;
///
/// assert!(GameStage::Puzzle1 < GameStage::MissionComplete);
/// assert_eq!(GameStage::Puzzle2.next(), Some(GameStage::Puzzle3));
/// assert!(GameStage::MissionComplete.is_final());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum GameStage {
    /// Decode the intercepted transmission.
    Puzzle1,
    /// Route the power conduits.
    Puzzle2,
    /// Enter the button sequence.
    Puzzle3,
    /// Mission accomplished, room solved.
    MissionComplete,
}

impl GameStage {
    /// Short identifier used in logs and wire payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Puzzle1 => "Puzzle1",
            Self::Puzzle2 => "Puzzle2",
            Self::Puzzle3 => "Puzzle3",
            Self::MissionComplete => "MissionComplete",
        }
    }

    /// Human-readable label shown on the game-master panel.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Puzzle1 => "Puzzle 1 - Message Decoding",
            Self::Puzzle2 => "Puzzle 2 - Power Conduits",
            Self::Puzzle3 => "Puzzle 3 - Button Sequence",
            Self::MissionComplete => "Mission Complete",
        }
    }

    /// The stage that follows this one in play order, if any.
    ///
    /// Forward advancement is only legal between adjacent stages, so
    /// `from.next() == Some(target)` is exactly the set of legal
    /// `advance` requests.
    pub fn next(&self) -> Option<GameStage> {
        match self {
            Self::Puzzle1 => Some(Self::Puzzle2),
            Self::Puzzle2 => Some(Self::Puzzle3),
            Self::Puzzle3 => Some(Self::MissionComplete),
            Self::MissionComplete => None,
        }
    }

    /// Whether this stage ends the mission.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::MissionComplete)
    }
}

impl fmt::Display for GameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
