mod diff;
mod edit_card_vm;
mod highlight;
mod log_vm;
mod query;
mod review_queue_vm;
mod rich_text;
mod time_fmt;

pub use diff::{DiffSpan, WordDiff, word_diff};
pub use edit_card_vm::{
    CardView, EditCardNav, Identified, NavDirection, PositionUpdate, filter_flashcards,
    filter_quizzes, original_position, resolve_index,
};
pub use highlight::{HighlightSpan, highlight_spans};
pub use log_vm::{LogChangeVm, LogEntryVm, map_log_entry};
pub use query::CardQuery;
pub use review_queue_vm::{
    ChangeVm, PanelBody, QueueRowVm, ReviewItemDetailVm, ValuePanel, field_label,
    filter_queue_items,
};
pub use rich_text::{display_or, preview, sanitize_html};
pub use time_fmt::format_datetime;
