use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::user::UserId;

pub type SessionMap = BTreeMap<UserId, UserSession>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("Rating must be between 1 and 10, got {0}")]
    OutOfRange(i64),

    #[error("Rating is not a number: {0:?}")]
    NotANumber(String),
}

/// Score from 1 to 10 left after the whole catalog was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, RatingError> {
        Self::try_from(i64::from(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| RatingError::NotANumber(s.to_string()))?;

        Self::try_from(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-user progress through the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub video_index: usize,
    #[serde(default)]
    pub paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Sending,
    Paused,
    AwaitingRating,
    Rated(Rating),
}

impl SessionState {
    /// Whether a delivery timer still has work to do: a video or the rating prompt.
    pub fn needs_delivery(&self) -> bool {
        !matches!(self, SessionState::Rated(_))
    }
}

impl UserSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self, catalog_len: usize) -> bool {
        self.video_index >= catalog_len
    }

    /// A pause set while the last video was in flight keeps the session paused
    /// at the end of the catalog, and the rating prompt waits for resume.
    pub fn state(&self, catalog_len: usize) -> SessionState {
        match (self.rating, self.paused, self.is_finished(catalog_len)) {
            (Some(rating), _, true) => SessionState::Rated(rating),
            (_, true, _) => SessionState::Paused,
            (_, false, true) => SessionState::AwaitingRating,
            (_, false, false) => SessionState::Sending,
        }
    }
}
