mod card_patch;
mod debounce;
mod decisions;
mod edit_card;
mod paged_list;
mod previous;
mod sentinel;

pub use card_patch::{CardEdit, CardPatcher, PatchStatus, use_card_patcher};
pub use debounce::{DebounceState, use_debounce};
pub use decisions::{ReviewDecisionsHandle, use_review_decisions};
pub use edit_card::{EditCardManager, use_edit_card_manager};
pub use paged_list::{PagedListHandle, use_card_logs, use_paged_list, use_review_queue_items};
pub use previous::{PreviousValue, use_previous};
pub use sentinel::{Attach, Sentinel, SentinelSlot, use_sentinel, use_sentinel_row};

#[cfg(test)]
mod hook_smoke;
