use deck_core::model::{ActivityLogEntry, Change, LogEntryId};

use super::review_queue_vm::field_label;
use super::rich_text::preview;
use super::time_fmt::format_datetime;

const CHANGE_PREVIEW_CHARS: usize = 80;

#[derive(Clone, Debug, PartialEq)]
pub struct LogChangeVm {
    pub field_label: String,
    pub old: String,
    pub new: String,
    pub revertible: bool,
    pub change: Change,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntryVm {
    pub id: LogEntryId,
    pub summary: String,
    pub actor: String,
    pub at: String,
    pub changes: Vec<LogChangeVm>,
}

#[must_use]
pub fn map_log_entry(entry: &ActivityLogEntry) -> LogEntryVm {
    LogEntryVm {
        id: entry.id.clone(),
        summary: entry.summary.clone(),
        actor: entry.actor_label(),
        at: format_datetime(entry.at),
        changes: entry
            .changes
            .iter()
            .map(|change| LogChangeVm {
                field_label: field_label(&change.field),
                old: preview(&change.old_value.summary(), CHANGE_PREVIEW_CHARS),
                new: preview(&change.new_value.summary(), CHANGE_PREVIEW_CHARS),
                revertible: change.revert_patch().is_some(),
                change: change.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::model::FieldValue;
    use deck_core::time::fixed_now;

    #[test]
    fn only_topic_changes_offer_revert() {
        let entry = ActivityLogEntry {
            id: LogEntryId::new("l1"),
            summary: "Updated card".into(),
            actor: None,
            at: fixed_now(),
            changes: vec![
                Change::new("mainTopic", FieldValue::text("Cells"), FieldValue::text("Tissues")),
                Change::new(
                    "flashcards",
                    FieldValue::Empty,
                    FieldValue::Flashcard {
                        question: "Q".into(),
                        answer: "A".into(),
                    },
                ),
            ],
        };
        let vm = map_log_entry(&entry);
        assert_eq!(vm.actor, "System");
        assert_eq!(vm.changes[0].field_label, "Main topic");
        assert!(vm.changes[0].revertible);
        assert!(!vm.changes[1].revertible);
        assert_eq!(vm.changes[1].new, "Q");
    }
}
