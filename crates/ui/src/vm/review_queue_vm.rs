use chrono::{DateTime, Utc};
use deck_core::model::{ChangeType, FieldValue, QueueItemId, ReviewQueueItem, actor_label};
use deck_core::text::plain_text;
use deck_core::time::remaining_label;

use super::diff::{DiffSpan, word_diff};
use super::rich_text::{preview, sanitize_html};
use super::time_fmt::format_datetime;

const ROW_PREVIEW_CHARS: usize = 60;

/// Display-only filter over the pages fetched so far.
#[must_use]
pub fn filter_queue_items(items: &[ReviewQueueItem], term: &str) -> Vec<ReviewQueueItem> {
    items
        .iter()
        .filter(|item| item.matches_search(term))
        .cloned()
        .collect()
}

/// "subTopic" -> "Sub topic".
#[must_use]
pub fn field_label(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    for (i, ch) in field.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.extend(ch.to_lowercase());
        } else if ch == '_' || ch == '-' {
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueueRowVm {
    pub id: QueueItemId,
    pub change_type: ChangeType,
    pub field_label: String,
    pub submitter: String,
    pub submitted_at: String,
    pub summary: String,
    pub grouped_count: usize,
}

impl QueueRowVm {
    #[must_use]
    pub fn from_item(item: &ReviewQueueItem) -> Self {
        let value = match item.change_type {
            ChangeType::Deletion => (&item.old_display, &item.old_value),
            ChangeType::Edit | ChangeType::Addition => (&item.new_display, &item.new_value),
        };
        let summary = match value {
            (Some(display), _) => preview(display, ROW_PREVIEW_CHARS),
            (None, value) => preview(&value.summary(), ROW_PREVIEW_CHARS),
        };
        Self {
            id: item.id.clone(),
            change_type: item.change_type,
            field_label: field_label(&item.field),
            submitter: actor_label(item.submitted_by.as_ref()),
            submitted_at: format_datetime(item.submitted_at),
            summary,
            grouped_count: item.individual_changes.len(),
        }
    }
}

/// Body of one side of a change.
#[derive(Clone, Debug, PartialEq)]
pub enum PanelBody {
    Empty,
    Text(String),
    /// Sanitised HTML.
    Html(String),
    Diff(Vec<DiffSpan>),
    Flashcard {
        question: String,
        answer: String,
    },
    Quiz {
        question: String,
        answer: String,
        options: Vec<String>,
    },
}

impl PanelBody {
    fn from_value(display: Option<&str>, value: &FieldValue) -> Self {
        if let Some(display) = display.filter(|d| !d.trim().is_empty()) {
            return PanelBody::Html(sanitize_html(display));
        }
        match value {
            FieldValue::Empty => PanelBody::Empty,
            FieldValue::Text(s) if s.trim().is_empty() => PanelBody::Empty,
            FieldValue::Text(s) => PanelBody::Html(sanitize_html(s)),
            FieldValue::Flashcard { question, answer } => PanelBody::Flashcard {
                question: sanitize_html(question),
                answer: sanitize_html(answer),
            },
            FieldValue::Quiz {
                question,
                answer,
                options,
            } => PanelBody::Quiz {
                question: sanitize_html(question),
                answer: sanitize_html(answer),
                options: options.iter().map(|o| sanitize_html(o)).collect(),
            },
            FieldValue::Number(_) | FieldValue::Flag(_) | FieldValue::Other(_) => {
                PanelBody::Text(value.summary())
            }
        }
    }
}

/// Old or new side of a change.
#[derive(Clone, Debug, PartialEq)]
pub struct ValuePanel {
    pub label: &'static str,
    pub body: PanelBody,
}

/// One change as shown in the detail view.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeVm {
    pub change_type: ChangeType,
    pub field_label: String,
    pub old: Option<ValuePanel>,
    pub new: Option<ValuePanel>,
}

impl ChangeVm {
    /// Edits show both sides, additions only the new value and deletions only
    /// the old one. Plain-text edits get a word diff.
    #[must_use]
    pub fn build(
        change_type: ChangeType,
        field: &str,
        old: (&FieldValue, Option<&str>),
        new: (&FieldValue, Option<&str>),
    ) -> Self {
        let (old_value, old_display) = old;
        let (new_value, new_display) = new;

        let diff = match (change_type, old_value, new_value, old_display, new_display) {
            (ChangeType::Edit, FieldValue::Text(a), FieldValue::Text(b), None, None) => {
                Some(word_diff(&plain_text(a), &plain_text(b)))
            }
            _ => None,
        };

        let (old_body, new_body) = match diff {
            Some(diff) => (PanelBody::Diff(diff.old), PanelBody::Diff(diff.new)),
            None => (
                PanelBody::from_value(old_display, old_value),
                PanelBody::from_value(new_display, new_value),
            ),
        };

        Self {
            change_type,
            field_label: field_label(field),
            old: change_type.shows_old().then_some(ValuePanel {
                label: "Current",
                body: old_body,
            }),
            new: change_type.shows_new().then_some(ValuePanel {
                label: "Proposed",
                body: new_body,
            }),
        }
    }
}

/// Everything the "inspect before deciding" view renders for one item.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewItemDetailVm {
    pub id: QueueItemId,
    pub title: String,
    pub submitter: String,
    pub submitted_at: String,
    /// `None` once the item has expired.
    pub remaining: Option<String>,
    pub grouped: bool,
    pub changes: Vec<ChangeVm>,
}

impl ReviewItemDetailVm {
    #[must_use]
    pub fn from_item(item: &ReviewQueueItem, now: DateTime<Utc>) -> Self {
        let changes = if item.is_grouped() {
            item.individual_changes
                .iter()
                .map(|change| {
                    ChangeVm::build(
                        change.change_type,
                        &change.field,
                        (&change.old_value, change.old_display.as_deref()),
                        (&change.new_value, change.new_display.as_deref()),
                    )
                })
                .collect()
        } else {
            vec![ChangeVm::build(
                item.change_type,
                &item.field,
                (&item.old_value, item.old_display.as_deref()),
                (&item.new_value, item.new_display.as_deref()),
            )]
        };

        let verb = match item.change_type {
            ChangeType::Edit => "Edit to",
            ChangeType::Addition => "Addition to",
            ChangeType::Deletion => "Deletion from",
        };

        Self {
            id: item.id.clone(),
            title: format!("{verb} {}", field_label(&item.field).to_lowercase()),
            submitter: actor_label(item.submitted_by.as_ref()),
            submitted_at: format_datetime(item.submitted_at),
            remaining: remaining_label(now, item.expires_at),
            grouped: item.is_grouped(),
            changes,
        }
    }
}
