//! Hub configuration.
//!
//! Every knob defaults to the values the room shipped with, so a hub
//! with no config file behaves exactly like the installed hardware.
//! Configs are validated as a whole; [`HubConfig::validate`]
//! accumulates every violation instead of stopping at the first, in
//! the same spirit as the matcher reporting everything wrong with a
//! submission at once.

use crate::core::SequencePattern;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// SSID of the hub's own access point.
pub const DEFAULT_SSID: &str = "MissionControlHub";
/// WPA2 password of the hub's access point.
pub const DEFAULT_PASSWORD: &str = "LostSignal2024";
/// Wi-Fi channel the access point broadcasts on.
pub const DEFAULT_CHANNEL: u8 = 6;
/// How long the sequence error flash stays visible.
pub const DEFAULT_ERROR_FLASH_MS: u64 = 2500;
/// Access code revealed once the conduits are confirmed.
pub const DEFAULT_ACCESS_CODE: &str = "264";
/// How often the display polls the projector.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 700;

/// A single configuration problem.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("Error flash window must be nonzero")]
    ZeroErrorFlash,

    #[error("Display poll interval must be nonzero")]
    ZeroPollInterval,

    /// The display would poll too slowly to ever show the flash.
    #[error("Display poll interval {poll_ms}ms must be shorter than the {flash_ms}ms error flash")]
    PollSlowerThanFlash { poll_ms: u64, flash_ms: u64 },

    #[error("Access code must not be empty")]
    EmptyAccessCode,

    #[error("WPA2 password must be at least 8 characters, got {length}")]
    PasswordTooShort { length: usize },

    #[error("Wi-Fi channel {channel} is outside 1..=13")]
    ChannelOutOfRange { channel: u8 },
}

/// Access point settings consumed by the network bring-up.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApConfig {
    pub ssid: String,
    pub password: String,
    pub channel: u8,
}

impl Default for ApConfig {
    fn default() -> Self {
        Self {
            ssid: DEFAULT_SSID.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            channel: DEFAULT_CHANNEL,
        }
    }
}

/// The game definition: what the session enforces.
///
/// The button pattern validates itself at construction, so a
/// `GameRules` value never carries a malformed pattern.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub pattern: SequencePattern,
    pub error_flash_ms: u64,
    pub access_code: String,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            pattern: SequencePattern::reference(),
            error_flash_ms: DEFAULT_ERROR_FLASH_MS,
            access_code: DEFAULT_ACCESS_CODE.to_string(),
        }
    }
}

impl GameRules {
    /// The error flash window as a duration.
    pub fn error_flash(&self) -> Duration {
        Duration::from_millis(self.error_flash_ms)
    }
}

/// Display polling settings.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub poll_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl DisplayConfig {
    /// The poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Complete hub configuration.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub access_point: ApConfig,
    pub game: GameRules,
    pub display: DisplayConfig,
}

impl HubConfig {
    /// Parse a config from JSON. Missing fields fall back to the
    /// shipped defaults; malformed button patterns fail the parse.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Check the whole config, accumulating ALL violations.
    ///
    /// Returns `Validation::Success(())` when everything holds, or a
    /// failure carrying every violated rule at once.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        checks.push(if self.game.error_flash_ms == 0 {
            Validation::fail(ConfigViolation::ZeroErrorFlash)
        } else {
            Validation::success(())
        });

        checks.push(if self.display.poll_interval_ms == 0 {
            Validation::fail(ConfigViolation::ZeroPollInterval)
        } else {
            Validation::success(())
        });

        // Only meaningful once both windows are nonzero.
        checks.push(
            if self.display.poll_interval_ms != 0
                && self.game.error_flash_ms != 0
                && self.display.poll_interval_ms >= self.game.error_flash_ms
            {
                Validation::fail(ConfigViolation::PollSlowerThanFlash {
                    poll_ms: self.display.poll_interval_ms,
                    flash_ms: self.game.error_flash_ms,
                })
            } else {
                Validation::success(())
            },
        );

        checks.push(if self.game.access_code.is_empty() {
            Validation::fail(ConfigViolation::EmptyAccessCode)
        } else {
            Validation::success(())
        });

        checks.push(if self.access_point.password.len() < 8 {
            Validation::fail(ConfigViolation::PasswordTooShort {
                length: self.access_point.password.len(),
            })
        } else {
            Validation::success(())
        });

        checks.push(if !(1..=13).contains(&self.access_point.channel) {
            Validation::fail(ConfigViolation::ChannelOutOfRange {
                channel: self.access_point.channel,
            })
        } else {
            Validation::success(())
        });

        Validation::all_vec(checks).map(|_| ())
    }
}
