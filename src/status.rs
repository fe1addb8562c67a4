use serde::{Deserialize, Serialize};
use std::fmt;

/// Review states for a club application.
///
/// The wire vocabulary is the capitalized form (`"Under Review"`); the older
/// kebab-case and `"In Review"` spellings are still accepted when reading
/// records written by earlier builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "Submitted", alias = "submitted")]
    Submitted,
    #[serde(
        rename = "Under Review",
        alias = "under-review",
        alias = "In Review"
    )]
    UnderReview,
    #[serde(rename = "Accepted", alias = "accepted")]
    Accepted,
    #[serde(rename = "Rejected", alias = "rejected")]
    Rejected,
}

impl ApplicationStatus {
    /// Successor in the demo cycle. Total: every state has exactly one next
    /// state and four advances land back where they started. This backs the
    /// dashboard's "simulate status change" action and is not a real
    /// moderation workflow.
    pub fn advance(self) -> ApplicationStatus {
        match self {
            ApplicationStatus::Submitted => ApplicationStatus::UnderReview,
            ApplicationStatus::UnderReview => ApplicationStatus::Accepted,
            ApplicationStatus::Accepted => ApplicationStatus::Rejected,
            ApplicationStatus::Rejected => ApplicationStatus::Submitted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ApplicationStatus::*;
    use super::*;

    #[test]
    fn advance_steps_through_the_cycle() {
        assert_eq!(Submitted.advance(), UnderReview);
        assert_eq!(UnderReview.advance(), Accepted);
        assert_eq!(Accepted.advance(), Rejected);
        assert_eq!(Rejected.advance(), Submitted);
    }

    #[test]
    fn four_advances_return_to_the_start() {
        for status in [Submitted, UnderReview, Accepted, Rejected] {
            assert_eq!(status.advance().advance().advance().advance(), status);
        }
    }

    #[test]
    fn serializes_with_the_display_vocabulary() {
        assert_eq!(
            serde_json::to_string(&UnderReview).unwrap(),
            "\"Under Review\""
        );
        assert_eq!(serde_json::to_string(&Submitted).unwrap(), "\"Submitted\"");
    }

    #[test]
    fn reads_prototype_vocabularies() {
        for raw in ["\"under-review\"", "\"In Review\"", "\"Under Review\""] {
            assert_eq!(
                serde_json::from_str::<ApplicationStatus>(raw).unwrap(),
                UnderReview
            );
        }
        assert_eq!(
            serde_json::from_str::<ApplicationStatus>("\"accepted\"").unwrap(),
            Accepted
        );
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(UnderReview.to_string(), "Under Review");
        assert_eq!(
            serde_json::to_string(&Rejected).unwrap(),
            format!("\"{}\"", Rejected)
        );
    }
}
