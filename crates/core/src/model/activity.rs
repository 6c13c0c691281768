use chrono::{DateTime, Utc};

use crate::model::card::TopicField;
use crate::model::ids::LogEntryId;
use crate::model::patch::CardPatch;
use crate::model::user::{UserRef, actor_label};
use crate::model::value::FieldValue;

/// One field-level change recorded inside a log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub field: String,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
}

impl Change {
    #[must_use]
    pub fn new(field: impl Into<String>, old_value: FieldValue, new_value: FieldValue) -> Self {
        Self {
            field: field.into(),
            old_value,
            new_value,
        }
    }

    /// Patch that restores the old value, when the field is revertible.
    ///
    /// Only topic metadata is reverted in place; flashcard and quiz history
    /// carry no stable target once the item has moved or been removed.
    #[must_use]
    pub fn revert_patch(&self) -> Option<CardPatch> {
        let field = TopicField::from_wire(&self.field)?;
        let value = match &self.old_value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Empty => String::new(),
            _ => return None,
        };
        if self.new_value.as_plain_str() == Some(value.as_str()) {
            return None;
        }
        Some(CardPatch::Topic { field, value })
    }
}

/// Immutable record of an edit applied to a card.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLogEntry {
    pub id: LogEntryId,
    pub summary: String,
    pub actor: Option<UserRef>,
    pub at: DateTime<Utc>,
    pub changes: Vec<Change>,
}

impl ActivityLogEntry {
    #[must_use]
    pub fn actor_label(&self) -> String {
        actor_label(self.actor.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_change_reverts_to_old_text() {
        let change = Change::new(
            "category",
            FieldValue::text("Biology"),
            FieldValue::text("Chemistry"),
        );
        assert_eq!(
            change.revert_patch(),
            Some(CardPatch::Topic {
                field: TopicField::Category,
                value: "Biology".to_string(),
            })
        );
    }

    #[test]
    fn non_topic_changes_are_not_revertible() {
        let change = Change::new(
            "flashcards",
            FieldValue::Empty,
            FieldValue::Flashcard {
                question: "Q".into(),
                answer: "A".into(),
            },
        );
        assert_eq!(change.revert_patch(), None);
    }

    #[test]
    fn no_op_change_is_not_revertible() {
        let change = Change::new("subTopic", FieldValue::text("x"), FieldValue::text("x"));
        assert_eq!(change.revert_patch(), None);
    }
}
