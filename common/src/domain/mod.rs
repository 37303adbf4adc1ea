use std::fmt::{Display, Formatter};

use nutype::nutype;
use serde::{Deserialize, Serialize};

pub mod status;

pub use status::{ParseStatusError, PublicationStatus, TRANSITION_TABLE};

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(pub i64);

impl From<i64> for PublicationId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for PublicationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an author owned by the authors service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub i64);

impl AuthorId {
    /// The authors service only ever assigns positive ids.
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for AuthorId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for AuthorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optimistic concurrency token of a publication.
/// Starts at zero and grows by exactly one on every status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(pub i64);

impl Version {
    pub const INITIAL: Version = Version(0);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 500),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct PublicationTitle(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 100),
    derive(
        Clone, Debug, Display, FromStr, AsRef, PartialEq, Eq, Hash, Serialize, Deserialize
    )
)]
pub struct Category(String);
