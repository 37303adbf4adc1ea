use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Editorial status of a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicationStatus {
    /// Still being written, the only initial state
    Draft,
    /// Submitted to editors
    InReview,
    /// Accepted by editors, waiting to go out
    Approved,
    /// Publicly available, terminal
    Published,
    /// Turned down, terminal
    Rejected,
}

use PublicationStatus::*;

/// Source status → statuses directly reachable from it.
/// Every status has exactly one row; terminal statuses map to an empty slice.
pub const TRANSITION_TABLE: [(PublicationStatus, &[PublicationStatus]); 5] = [
    (Draft, &[InReview]),
    (InReview, &[Approved, Rejected, Draft]),
    (Approved, &[Published, Rejected]),
    (Published, &[]),
    (Rejected, &[]),
];

impl PublicationStatus {
    pub const ALL: [PublicationStatus; 5] = [Draft, InReview, Approved, Published, Rejected];

    pub const INITIAL: PublicationStatus = Draft;

    /// Statuses reachable from `self` in one step.
    pub fn allowed_transitions(self) -> &'static [PublicationStatus] {
        TRANSITION_TABLE
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
            .unwrap_or(&[])
    }

    pub fn can_transition_to(self, next: PublicationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Draft => "DRAFT",
            InReview => "IN_REVIEW",
            Approved => "APPROVED",
            Published => "PUBLISHED",
            Rejected => "REJECTED",
        }
    }

    /// Human readable name shown by clients
    pub fn label(self) -> &'static str {
        match self {
            Draft => "Draft",
            InReview => "In review",
            Approved => "Approved",
            Published => "Published",
            Rejected => "Rejected",
        }
    }
}

impl Display for PublicationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized publication status `{0}`")]
pub struct ParseStatusError(pub String);

impl FromStr for PublicationStatus {
    type Err = ParseStatusError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        PublicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseStatusError(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: [(PublicationStatus, PublicationStatus); 6] = [
        (Draft, InReview),
        (InReview, Approved),
        (InReview, Rejected),
        (InReview, Draft),
        (Approved, Published),
        (Approved, Rejected),
    ];

    #[test]
    fn every_status_has_exactly_one_row() {
        for status in PublicationStatus::ALL {
            let rows = TRANSITION_TABLE
                .iter()
                .filter(|(from, _)| *from == status)
                .count();
            assert_eq!(rows, 1, "{status} must appear once in the table");
        }
    }

    #[test]
    fn table_contains_exactly_the_listed_edges() {
        for from in PublicationStatus::ALL {
            for to in PublicationStatus::ALL {
                let expected = EDGES.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {}",
                    if expected { "allowed" } else { "rejected" }
                );
            }
        }
    }

    #[test]
    fn terminal_statuses_have_no_way_out() {
        assert!(Published.allowed_transitions().is_empty());
        assert!(Rejected.allowed_transitions().is_empty());
        assert!(Published.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!Draft.is_terminal());
        assert!(!InReview.is_terminal());
        assert!(!Approved.is_terminal());
    }

    #[test]
    fn review_can_be_sent_back_to_draft() {
        assert_eq!(InReview.allowed_transitions(), &[Approved, Rejected, Draft]);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("in_review".parse::<PublicationStatus>(), Ok(InReview));
        assert_eq!(" Published ".parse::<PublicationStatus>(), Ok(Published));
        assert_eq!("DRAFT".parse::<PublicationStatus>(), Ok(Draft));
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "ARCHIVED".parse::<PublicationStatus>().unwrap_err();
        assert_eq!(err, ParseStatusError("ARCHIVED".to_string()));
        assert!("IN REVIEW".parse::<PublicationStatus>().is_err());
        assert!("".parse::<PublicationStatus>().is_err());
    }

    #[test]
    fn display_matches_wire_name() {
        for status in PublicationStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }
}
