use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("invalid rating {0:?}; expected \"hard\", \"good\" or \"easy\"")]
    Unknown(String),
}

/// Difficulty label chosen after reviewing a card.
///
/// The client never interprets a rating; it is forwarded verbatim to the
/// server, which owns scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Every rating, in the order the controls are laid out.
    pub const ALL: [Rating; 3] = [Rating::Hard, Rating::Good, Rating::Easy];

    /// Wire form sent in the review request body.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }

    /// Primary keyboard shortcut shown next to the button.
    #[must_use]
    pub fn shortcut(self) -> char {
        match self {
            Rating::Hard => '1',
            Rating::Good => '2',
            Rating::Easy => '3',
        }
    }

    /// Maps a pressed key to a rating: `1`/`h`, `2`/`g`, `3`/`e`, case-insensitive.
    #[must_use]
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "1" | "h" => Some(Rating::Hard),
            "2" | "g" => Some(Rating::Good),
            "3" | "e" => Some(Rating::Easy),
            _ => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard" => Ok(Rating::Hard),
            "good" => Ok(Rating::Good),
            "easy" => Ok(Rating::Easy),
            _ => Err(RatingError::Unknown(s.to_string())),
        }
    }
}
