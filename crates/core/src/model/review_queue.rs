use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QueueItemId;
use crate::model::user::UserRef;
use crate::model::value::FieldValue;
use crate::text::contains_ci;

/// Kind of change a collaborator proposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Edit,
    Addition,
    Deletion,
}

impl ChangeType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Edit => "edit",
            ChangeType::Addition => "addition",
            ChangeType::Deletion => "deletion",
        }
    }

    /// Whether the old value is worth showing in a detail view.
    #[must_use]
    pub fn shows_old(self) -> bool {
        matches!(self, ChangeType::Edit | ChangeType::Deletion)
    }

    /// Whether the new value is worth showing in a detail view.
    #[must_use]
    pub fn shows_new(self) -> bool {
        matches!(self, ChangeType::Edit | ChangeType::Addition)
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown change type: {0}")]
pub struct ParseChangeTypeError(pub String);

impl FromStr for ChangeType {
    type Err = ParseChangeTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit" => Ok(ChangeType::Edit),
            "addition" => Ok(ChangeType::Addition),
            "deletion" => Ok(ChangeType::Deletion),
            other => Err(ParseChangeTypeError(other.to_string())),
        }
    }
}

/// One underlying field change inside a grouped queue item.
#[derive(Debug, Clone, PartialEq)]
pub struct IndividualChange {
    pub change_type: ChangeType,
    pub field: String,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
    pub old_display: Option<String>,
    pub new_display: Option<String>,
}

/// A proposed change awaiting the owner's decision.
///
/// Accepting applies every change it carries; rejecting discards all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewQueueItem {
    pub id: QueueItemId,
    pub change_type: ChangeType,
    pub field: String,
    pub submitted_by: Option<UserRef>,
    pub submitted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
    pub old_display: Option<String>,
    pub new_display: Option<String>,
    pub individual_changes: Vec<IndividualChange>,
}

impl ReviewQueueItem {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    #[must_use]
    pub fn is_grouped(&self) -> bool {
        !self.individual_changes.is_empty()
    }

    /// Display-only search across field, change type, submitter and plain
    /// string values.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        if contains_ci(&self.field, term) || contains_ci(self.change_type.as_str(), term) {
            return true;
        }
        if let Some(user) = &self.submitted_by {
            if contains_ci(&user.name, term) {
                return true;
            }
            if user.handle.as_deref().is_some_and(|h| contains_ci(h, term)) {
                return true;
            }
        }
        [&self.old_value, &self.new_value]
            .into_iter()
            .filter_map(FieldValue::as_plain_str)
            .any(|value| contains_ci(value, term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::UserId;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn item(field: &str, old: FieldValue, new: FieldValue) -> ReviewQueueItem {
        ReviewQueueItem {
            id: QueueItemId::new("q1"),
            change_type: ChangeType::Edit,
            field: field.to_string(),
            submitted_by: Some(UserRef::new(UserId::new("u2"), "Grace").with_handle("ghopper")),
            submitted_at: fixed_now(),
            expires_at: fixed_now() + Duration::days(7),
            old_value: old,
            new_value: new,
            old_display: None,
            new_display: None,
            individual_changes: Vec::new(),
        }
    }

    #[test]
    fn change_type_parses_wire_names() {
        assert_eq!("addition".parse::<ChangeType>(), Ok(ChangeType::Addition));
        let err = "rename".parse::<ChangeType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown change type: rename");
    }

    #[test]
    fn search_covers_field_type_submitter_and_strings() {
        let it = item("category", FieldValue::text("Biology"), FieldValue::text("Botany"));
        assert!(it.matches_search("CATEG"));
        assert!(it.matches_search("edit"));
        assert!(it.matches_search("grace"));
        assert!(it.matches_search("hopper"));
        assert!(it.matches_search("botany"));
        assert!(!it.matches_search("zoology"));
    }

    #[test]
    fn search_skips_structured_values() {
        let it = item(
            "flashcards",
            FieldValue::Empty,
            FieldValue::Flashcard {
                question: "Photosynthesis".into(),
                answer: "Light".into(),
            },
        );
        assert!(!it.matches_search("photosynthesis"));
    }

    #[test]
    fn expiry_is_inclusive_of_deadline() {
        let it = item("category", FieldValue::Empty, FieldValue::Empty);
        assert!(!it.is_expired(fixed_now()));
        assert!(it.is_expired(fixed_now() + Duration::days(7)));
    }
}
