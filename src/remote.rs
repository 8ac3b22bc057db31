//! Game-master keyfob remote.
//!
//! The remote transmits single letters. Codes are matched
//! case-insensitively and anything that is not a known key is ignored
//! outright, since the 433MHz receiver occasionally picks up noise.

use serde::{Deserialize, Serialize};

/// The four keys on the keyfob.
///
/// A advances into Puzzle 2, B into Puzzle 3, C resets the mission,
/// D forces mission complete.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum RemoteButton {
    A,
    B,
    C,
    D,
}

impl RemoteButton {
    /// Map a received code to a key, case-insensitively.
    ///
    /// Unknown codes map to `None` and are dropped upstream without
    /// touching the session.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    /// The letter printed on the key.
    pub fn code(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_keys() {
        assert_eq!(RemoteButton::from_code('A'), Some(RemoteButton::A));
        assert_eq!(RemoteButton::from_code('B'), Some(RemoteButton::B));
        assert_eq!(RemoteButton::from_code('C'), Some(RemoteButton::C));
        assert_eq!(RemoteButton::from_code('D'), Some(RemoteButton::D));
    }

    #[test]
    fn codes_match_case_insensitively() {
        assert_eq!(RemoteButton::from_code('a'), Some(RemoteButton::A));
        assert_eq!(RemoteButton::from_code('d'), Some(RemoteButton::D));
    }

    #[test]
    fn unknown_codes_are_dropped() {
        assert_eq!(RemoteButton::from_code('E'), None);
        assert_eq!(RemoteButton::from_code('1'), None);
        assert_eq!(RemoteButton::from_code(' '), None);
        assert_eq!(RemoteButton::from_code('ä'), None);
    }

    #[test]
    fn code_and_from_code_agree() {
        for button in [
            RemoteButton::A,
            RemoteButton::B,
            RemoteButton::C,
            RemoteButton::D,
        ] {
            assert_eq!(RemoteButton::from_code(button.code()), Some(button));
        }
    }
}
