//! Lost Signal: the puzzle progression core for an escape-room hub
//!
//! Lost Signal is built on Stillwater's "pure core, imperative shell"
//! philosophy. Every game rule is a pure function of the session and an
//! explicit clock value, while the one piece of hardware (the latch
//! release) and the transport live behind effects and environment
//! traits.
//!
//! # Core Concepts
//!
//! - **Stages**: The mission's four ordered stages via [`GameStage`]
//! - **Session**: One owned [`GameSession`] holding stage, gates, and
//!   the button matcher
//! - **Matcher**: Fixed button pattern with a lazily expiring error
//!   flash
//! - **Projection**: Pure mapping of the session onto the display
//!   payload
//!
//! # Example
//!
//! ```rust
//! use lost_signal::core::{GameSession, GameStage};
//! use lost_signal::projector::project;
//! use chrono::Utc;
//!
//! let mut session = GameSession::default();
//! let now = Utc::now();
//!
//! session.advance(GameStage::Puzzle2, now).unwrap();
//! session.confirm_conduits();
//! session.advance(GameStage::Puzzle3, now).unwrap();
//!
//! // First button of the shipped pattern.
//! session.submit(4, now).unwrap();
//!
//! let payload = project(&session, now);
//! assert_eq!(payload.stage, GameStage::Puzzle3);
//! ```

pub mod config;
pub mod core;
pub mod dispatch;
pub mod effects;
pub mod projector;
pub mod remote;

// Re-export commonly used types
pub use crate::config::{GameRules, HubConfig};
pub use crate::core::{GameSession, GameStage};
pub use crate::dispatch::{EventReply, InboundEvent};
pub use crate::projector::{project, DisplayPayload};
pub use crate::remote::RemoteButton;
