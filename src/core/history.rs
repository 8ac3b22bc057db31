//! Stage transition journal.
//!
//! Immutable record of every applied stage change, kept for the
//! game-master panel and post-game review. Rejected requests are never
//! journaled; an entry exists only for transitions that actually moved
//! the stage.

use super::stage::GameStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What drove a stage change.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TransitionCause {
    /// Game-master advance request (control panel or remote A/B).
    Advance,
    /// Game-master mission-complete override (remote D).
    GmOverride,
    /// The button sequence was entered in full.
    SequenceComplete,
    /// Mission reset (remote C or control panel).
    Reset,
}

/// Record of a single applied stage change.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct StageTransition {
    /// The stage being left
    pub from: GameStage,
    /// The stage being entered
    pub to: GameStage,
    /// What drove the change
    pub cause: TransitionCause,
    /// When the change was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered journal of stage changes.
///
/// The journal is immutable; [`record`](Self::record) returns a new
/// journal with the transition appended, leaving the original intact.
///
/// # Example
///
/// ```rust
/// use lost_signal::core::{GameStage, StageHistory, StageTransition, TransitionCause};
/// use chrono::Utc;
///
/// let history = StageHistory::new();
/// let history = history.record(StageTransition {
///     from: GameStage::Puzzle1,
///     to: GameStage::Puzzle2,
///     cause: TransitionCause::Advance,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![GameStage::Puzzle1, GameStage::Puzzle2]);
/// ```
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct StageHistory {
    transitions: Vec<StageTransition>,
}

impl StageHistory {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transition, returning a new journal.
    ///
    /// Pure: the existing journal is left unchanged.
    pub fn record(&self, transition: StageTransition) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// The path of stages traversed: the initial stage, then the `to`
    /// stage of each recorded transition.
    pub fn get_path(&self) -> Vec<GameStage> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        for transition in &self.transitions {
            path.push(transition.to);
        }
        path
    }

    /// Elapsed time between the first and last recorded transition.
    ///
    /// `None` while the journal is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All recorded transitions in order.
    pub fn transitions(&self) -> &[StageTransition] {
        &self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(from: GameStage, to: GameStage, cause: TransitionCause) -> StageTransition {
        StageTransition {
            from,
            to,
            cause,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_journal_is_empty() {
        let history = StageHistory::new();
        assert!(history.transitions().is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StageHistory::new();
        let recorded = history.record(step(
            GameStage::Puzzle1,
            GameStage::Puzzle2,
            TransitionCause::Advance,
        ));

        assert_eq!(history.transitions().len(), 0);
        assert_eq!(recorded.transitions().len(), 1);
    }

    #[test]
    fn get_path_includes_the_starting_stage() {
        let history = StageHistory::new()
            .record(step(
                GameStage::Puzzle1,
                GameStage::Puzzle2,
                TransitionCause::Advance,
            ))
            .record(step(
                GameStage::Puzzle2,
                GameStage::Puzzle3,
                TransitionCause::Advance,
            ))
            .record(step(
                GameStage::Puzzle3,
                GameStage::MissionComplete,
                TransitionCause::SequenceComplete,
            ));

        assert_eq!(
            history.get_path(),
            vec![
                GameStage::Puzzle1,
                GameStage::Puzzle2,
                GameStage::Puzzle3,
                GameStage::MissionComplete,
            ]
        );
    }

    #[test]
    fn cause_is_tracked_per_transition() {
        let history = StageHistory::new().record(step(
            GameStage::Puzzle3,
            GameStage::Puzzle1,
            TransitionCause::Reset,
        ));

        assert_eq!(history.transitions()[0].cause, TransitionCause::Reset);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let base = Utc::now();
        let history = StageHistory::new()
            .record(StageTransition {
                from: GameStage::Puzzle1,
                to: GameStage::Puzzle2,
                cause: TransitionCause::Advance,
                timestamp: base,
            })
            .record(StageTransition {
                from: GameStage::Puzzle2,
                to: GameStage::Puzzle3,
                cause: TransitionCause::Advance,
                timestamp: base + chrono::Duration::seconds(90),
            });

        assert_eq!(history.duration(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn journal_roundtrips_through_json() {
        let history = StageHistory::new().record(step(
            GameStage::Puzzle1,
            GameStage::Puzzle2,
            TransitionCause::Advance,
        ));

        let json = serde_json::to_string(&history).unwrap();
        let back: StageHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.transitions().len(), 1);
        assert_eq!(back.transitions()[0].to, GameStage::Puzzle2);
    }
}
