//! Button sequence matching with timed error recovery.
//!
//! Puzzle 3 asks the players to reproduce a fixed order of presses on
//! the five console buttons. The matcher tracks how far into the
//! pattern the players are, advances one slot per correct press, and
//! resets to the start on any wrong press while raising a short-lived
//! error flag the display uses to flash a rejection cue.

use super::stage::GameStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// The button order players must reproduce in Puzzle 3.
pub const REFERENCE_PATTERN: [u8; 15] = [4, 1, 5, 1, 3, 5, 4, 2, 1, 3, 2, 4, 5, 3, 1];

/// Errors raised while building or validating a button pattern.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SequenceError {
    /// A pattern must contain at least one button.
    #[error("Button pattern must not be empty")]
    EmptyPattern,

    /// Pattern entries must name physical buttons.
    #[error("Button id {id} at position {position} is outside {min}..={max}",
        min = SequencePattern::MIN_BUTTON, max = SequencePattern::MAX_BUTTON)]
    ButtonOutOfRange { id: u8, position: usize },
}

/// A validated, non-empty button pattern.
///
/// Every entry is a physical button id in
/// [`MIN_BUTTON`](Self::MIN_BUTTON)`..=`[`MAX_BUTTON`](Self::MAX_BUTTON).
/// Construction is the only validation point; once built, a pattern is
/// always well-formed.
///
/// # Example
///
/// ```rust
/// use lost_signal::core::{SequenceError, SequencePattern};
///
/// let pattern = SequencePattern::new(vec![2, 4, 1]).unwrap();
/// assert_eq!(pattern.len(), 3);
///
/// assert_eq!(SequencePattern::new(vec![]), Err(SequenceError::EmptyPattern));
/// assert_eq!(
///     SequencePattern::new(vec![3, 9]),
///     Err(SequenceError::ButtonOutOfRange { id: 9, position: 1 }),
/// );
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct SequencePattern(Vec<u8>);

impl SequencePattern {
    /// Lowest physical button id on the console.
    pub const MIN_BUTTON: u8 = 1;
    /// Highest physical button id on the console.
    pub const MAX_BUTTON: u8 = 5;

    /// Validate and wrap a button pattern.
    pub fn new(buttons: Vec<u8>) -> Result<Self, SequenceError> {
        if buttons.is_empty() {
            return Err(SequenceError::EmptyPattern);
        }
        for (position, &id) in buttons.iter().enumerate() {
            if !Self::is_valid_button(id) {
                return Err(SequenceError::ButtonOutOfRange { id, position });
            }
        }
        Ok(Self(buttons))
    }

    /// The pattern shipped with the room.
    pub fn reference() -> Self {
        Self(REFERENCE_PATTERN.to_vec())
    }

    /// Whether `id` names a physical button.
    pub fn is_valid_button(id: u8) -> bool {
        (Self::MIN_BUTTON..=Self::MAX_BUTTON).contains(&id)
    }

    /// Number of slots in the pattern. Always at least 1.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; patterns are validated non-empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The expected button at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// All slots in order.
    pub fn buttons(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for SequencePattern {
    type Error = SequenceError;

    fn try_from(buttons: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(buttons)
    }
}

impl From<SequencePattern> for Vec<u8> {
    fn from(pattern: SequencePattern) -> Self {
        pattern.0
    }
}

/// Result of submitting one button press to the matcher.
///
/// `WrongStage` is produced by the session gate, never by the matcher
/// itself; presses only reach the matcher while Puzzle 3 is active.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SequenceOutcome {
    /// The press matched the expected slot.
    Correct {
        /// Slots satisfied so far, including this press.
        progress: usize,
        /// True when this press satisfied the final slot.
        complete: bool,
    },
    /// The press did not match; progress restarted from the top.
    ///
    /// `expected` is diagnostic only and never shown to players.
    Incorrect { expected: u8 },
    /// The press arrived outside Puzzle 3 and was ignored.
    WrongStage { stage: GameStage },
}

/// Position within the pattern plus the timed error flag.
///
/// The error flag is lazily expiring: a wrong press stores a deadline,
/// and the flag reads as active strictly before that deadline. Nothing
/// runs at expiry; the flag is simply observed inactive from the
/// deadline onward, and [`poll_error`](Self::poll_error) releases the
/// stored deadline on the first expired observation.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct SequenceProgress {
    next_index: usize,
    error_expires_at: Option<DateTime<Utc>>,
}

impl SequenceProgress {
    /// Start at the top of the pattern with no error pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next slot to satisfy. Equal to the pattern length
    /// once the whole pattern has been entered.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Deadline of the pending error flash, if one is stored.
    pub fn error_expires_at(&self) -> Option<DateTime<Utc>> {
        self.error_expires_at
    }

    /// Whether the error flash is showing at `now`.
    ///
    /// Pure read: the deadline stays stored even after it passes, so
    /// the display projection can call this without mutating anything.
    pub fn error_active(&self, now: DateTime<Utc>) -> bool {
        self.error_expires_at.map_or(false, |deadline| now < deadline)
    }

    /// Whether the error flash is showing at `now`, releasing the
    /// stored deadline the first time it is observed expired.
    ///
    /// Hosts that poll the flag use this; the flag self-clears exactly
    /// once and never before its deadline.
    pub fn poll_error(&mut self, now: DateTime<Utc>) -> bool {
        match self.error_expires_at {
            Some(deadline) if now < deadline => true,
            Some(_) => {
                self.error_expires_at = None;
                false
            }
            None => false,
        }
    }

    /// Drop any pending error flash without touching progress.
    pub fn clear_error(&mut self) {
        self.error_expires_at = None;
    }

    /// Restart from the top of the pattern with no error pending.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    /// Match one press against the pattern.
    ///
    /// A correct press clears any pending error and advances one slot;
    /// an incorrect press resets progress to the top and arms the error
    /// flash for `error_flash` from `now`. Presses after the pattern is
    /// already satisfied are treated as incorrect against slot 0.
    pub fn submit(
        &mut self,
        pattern: &SequencePattern,
        button_id: u8,
        error_flash: Duration,
        now: DateTime<Utc>,
    ) -> SequenceOutcome {
        let expected = match pattern.get(self.next_index) {
            Some(expected) => expected,
            // Satisfied pattern: the session normally completes the
            // mission before another press can arrive, so fall back to
            // matching from the top.
            None => {
                self.next_index = 0;
                // A fully satisfied pattern always has a first slot.
                match pattern.get(0) {
                    Some(expected) => expected,
                    None => return SequenceOutcome::Incorrect { expected: 0 },
                }
            }
        };

        if button_id == expected {
            self.error_expires_at = None;
            self.next_index += 1;
            SequenceOutcome::Correct {
                progress: self.next_index,
                complete: self.next_index == pattern.len(),
            }
        } else {
            self.next_index = 0;
            self.error_expires_at = chrono::Duration::from_std(error_flash)
                .ok()
                .and_then(|window| now.checked_add_signed(window));
            SequenceOutcome::Incorrect { expected }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLASH: Duration = Duration::from_millis(2500);

    fn millis(base: DateTime<Utc>, offset: i64) -> DateTime<Utc> {
        base + chrono::Duration::milliseconds(offset)
    }

    #[test]
    fn reference_pattern_is_well_formed() {
        let pattern = SequencePattern::reference();
        assert_eq!(pattern.len(), 15);
        assert_eq!(pattern.buttons(), &REFERENCE_PATTERN);
        assert!(SequencePattern::new(REFERENCE_PATTERN.to_vec()).is_ok());
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert_eq!(SequencePattern::new(vec![]), Err(SequenceError::EmptyPattern));
    }

    #[test]
    fn out_of_range_button_is_rejected_with_position() {
        assert_eq!(
            SequencePattern::new(vec![1, 2, 0, 4]),
            Err(SequenceError::ButtonOutOfRange { id: 0, position: 2 }),
        );
        assert_eq!(
            SequencePattern::new(vec![6]),
            Err(SequenceError::ButtonOutOfRange { id: 6, position: 0 }),
        );
    }

    #[test]
    fn pattern_deserialization_revalidates() {
        let pattern: SequencePattern = serde_json::from_str("[4,1,5]").unwrap();
        assert_eq!(pattern.buttons(), &[4, 1, 5]);

        let bad: Result<SequencePattern, _> = serde_json::from_str("[4,7]");
        assert!(bad.is_err());

        let empty: Result<SequencePattern, _> = serde_json::from_str("[]");
        assert!(empty.is_err());
    }

    #[test]
    fn correct_press_advances_one_slot() {
        let pattern = SequencePattern::reference();
        let mut progress = SequenceProgress::new();
        let now = Utc::now();

        let outcome = progress.submit(&pattern, 4, FLASH, now);

        assert_eq!(
            outcome,
            SequenceOutcome::Correct {
                progress: 1,
                complete: false,
            }
        );
        assert_eq!(progress.next_index(), 1);
        assert!(!progress.error_active(now));
    }

    #[test]
    fn full_pattern_reports_completion_on_final_press() {
        let pattern = SequencePattern::reference();
        let mut progress = SequenceProgress::new();
        let now = Utc::now();

        for (i, &button) in REFERENCE_PATTERN.iter().enumerate() {
            let outcome = progress.submit(&pattern, button, FLASH, now);
            assert_eq!(
                outcome,
                SequenceOutcome::Correct {
                    progress: i + 1,
                    complete: i + 1 == REFERENCE_PATTERN.len(),
                }
            );
        }

        assert_eq!(progress.next_index(), pattern.len());
    }

    #[test]
    fn wrong_press_resets_progress_and_arms_the_flash() {
        let pattern = SequencePattern::reference();
        let mut progress = SequenceProgress::new();
        let now = Utc::now();

        progress.submit(&pattern, 4, FLASH, now);
        progress.submit(&pattern, 1, FLASH, now);
        assert_eq!(progress.next_index(), 2);

        // Expected button at slot 2 is 5.
        let outcome = progress.submit(&pattern, 2, FLASH, now);
        assert_eq!(outcome, SequenceOutcome::Incorrect { expected: 5 });
        assert_eq!(progress.next_index(), 0);
        assert!(progress.error_active(now));
    }

    #[test]
    fn error_flash_expires_at_the_deadline_not_before() {
        let pattern = SequencePattern::reference();
        let mut progress = SequenceProgress::new();
        let marked = Utc::now();

        progress.submit(&pattern, 3, FLASH, marked);

        assert!(progress.error_active(marked));
        assert!(progress.error_active(millis(marked, 2499)));
        assert!(!progress.error_active(millis(marked, 2500)));
        assert!(!progress.error_active(millis(marked, 10_000)));
    }

    #[test]
    fn poll_error_clears_the_deadline_exactly_once() {
        let pattern = SequencePattern::reference();
        let mut progress = SequenceProgress::new();
        let marked = Utc::now();

        progress.submit(&pattern, 3, FLASH, marked);

        // Still active: deadline stays stored.
        assert!(progress.poll_error(millis(marked, 1000)));
        assert!(progress.error_expires_at().is_some());

        // First expired observation releases it.
        assert!(!progress.poll_error(millis(marked, 2500)));
        assert!(progress.error_expires_at().is_none());

        // Nothing left to clear.
        assert!(!progress.poll_error(millis(marked, 3000)));
    }

    #[test]
    fn correct_press_clears_a_pending_flash() {
        let pattern = SequencePattern::reference();
        let mut progress = SequenceProgress::new();
        let marked = Utc::now();

        progress.submit(&pattern, 3, FLASH, marked);
        assert!(progress.error_active(marked));

        let outcome = progress.submit(&pattern, 4, FLASH, millis(marked, 100));
        assert_eq!(
            outcome,
            SequenceOutcome::Correct {
                progress: 1,
                complete: false,
            }
        );
        assert!(!progress.error_active(millis(marked, 100)));
        assert!(progress.error_expires_at().is_none());
    }

    #[test]
    fn restart_returns_to_the_top_with_no_error() {
        let pattern = SequencePattern::reference();
        let mut progress = SequenceProgress::new();
        let now = Utc::now();

        progress.submit(&pattern, 4, FLASH, now);
        progress.submit(&pattern, 2, FLASH, now);
        assert!(progress.error_active(now));

        progress.restart();
        assert_eq!(progress.next_index(), 0);
        assert!(!progress.error_active(now));
        assert!(progress.error_expires_at().is_none());
    }

    #[test]
    fn press_after_satisfaction_matches_from_the_top() {
        let pattern = SequencePattern::new(vec![2, 3]).unwrap();
        let mut progress = SequenceProgress::new();
        let now = Utc::now();

        progress.submit(&pattern, 2, FLASH, now);
        progress.submit(&pattern, 3, FLASH, now);
        assert_eq!(progress.next_index(), 2);

        let outcome = progress.submit(&pattern, 2, FLASH, now);
        assert_eq!(
            outcome,
            SequenceOutcome::Correct {
                progress: 1,
                complete: false,
            }
        );
    }
}
