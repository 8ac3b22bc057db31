//! Pure game core.
//!
//! Everything under this module is side-effect free: stage rules, the
//! session with its one-shot gates, the button sequence matcher, and
//! the transition journal. Operations take `&mut self` plus an
//! explicit `now` and return plain values; hardware and transport
//! live behind the effects layer.

mod history;
mod sequence;
mod session;
mod stage;

pub use history::{StageHistory, StageTransition, TransitionCause};
pub use sequence::{
    SequenceError, SequenceOutcome, SequencePattern, SequenceProgress, REFERENCE_PATTERN,
};
pub use session::{ConduitConfirmResult, GameSession, SessionError, TransitionOutcome};
pub use stage::GameStage;
