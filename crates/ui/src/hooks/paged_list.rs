use std::future::Future;

use deck_core::model::{ActivityLogEntry, CardId, ReviewQueueItem};
use dioxus::prelude::*;
use services::{CacheTag, PageRequest, PagedList};
use storage::repository::Page;

use crate::context::{AppContext, use_card_scope};

use super::previous::PreviousValue;
use super::sentinel::{Sentinel, use_sentinel};

/// Reactive wrapper around [`PagedList`].
pub struct PagedListHandle<T: 'static> {
    pub state: Signal<PagedList<T>>,
    pub sentinel: Sentinel,
    pub retry: Callback<()>,
}

impl<T: 'static> Clone for PagedListHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for PagedListHandle<T> {}

impl<T: 'static> PartialEq for PagedListHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.sentinel == other.sentinel
    }
}

/// Drive a [`PagedList`] from an open flag, a debounced search term and a
/// cache version.
///
/// Opening requests page 1 without a search; a changed term restarts at page
/// 1; a bumped `refresh` reloads from page 1. Results belonging to an older
/// context are dropped by the list itself.
pub fn use_paged_list<T, F, Fut>(
    sentinel_key: &'static str,
    open: Signal<bool>,
    search: Signal<String>,
    refresh: Memo<u64>,
    fetch: F,
) -> PagedListHandle<T>
where
    T: 'static,
    F: Fn(PageRequest) -> Fut + 'static,
    Fut: Future<Output = Result<Page<T>, String>> + 'static,
{
    let mut list = use_signal(PagedList::<T>::new);

    let run = use_callback(move |request: PageRequest| {
        log::debug!(
            "{sentinel_key}: requesting page {} (search {:?})",
            request.page,
            request.search
        );
        let pending = fetch(request.clone());
        spawn(async move {
            let result = pending.await;
            list.write().apply(&request, result);
        });
    });

    use_effect(move || {
        if open() {
            let request = list.write().open();
            run.call(request);
        } else if list.peek().is_open() {
            list.write().close();
        }
    });

    let mut last_search = PreviousValue::new();
    use_effect(move || {
        let term = search();
        if !last_search.changed(term.clone()) {
            return;
        }
        let request = list.write().set_search(Some(term.as_str()));
        if let Some(request) = request {
            run.call(request);
        }
    });

    let mut last_version = PreviousValue::new();
    use_effect(move || {
        let version = refresh();
        if !last_version.changed(version) {
            return;
        }
        let request = list.write().reload();
        if let Some(request) = request {
            run.call(request);
        }
    });

    let retry = use_callback(move |()| {
        let request = list.write().retry();
        if let Some(request) = request {
            run.call(request);
        }
    });

    let on_visible = use_callback(move |()| {
        let request = list.write().sentinel_visible();
        if let Some(request) = request {
            run.call(request);
        }
    });
    let sentinel = use_sentinel(sentinel_key, on_visible);

    PagedListHandle {
        state: list,
        sentinel,
        retry,
    }
}

/// Activity log of `card_id`, searchable, refreshed when the log goes stale.
pub fn use_card_logs(
    card_id: CardId,
    open: Signal<bool>,
    search: Signal<String>,
) -> PagedListHandle<ActivityLogEntry> {
    let ctx = use_context::<AppContext>();
    let scope = use_card_scope();
    let tag = CacheTag::CardLogs(card_id.clone());
    let refresh = use_memo(move || scope.version(&tag));
    let logs = ctx.log_service();

    use_paged_list("card-logs", open, search, refresh, move |request| {
        let logs = logs.clone();
        let card_id = card_id.clone();
        async move {
            logs.fetch_page(&card_id, request.page, request.search.as_deref())
                .await
                .map_err(|err| err.user_message())
        }
    })
}

/// Pending review-queue items of `card_id`. The server listing takes no
/// search; filtering happens on the rows already fetched.
pub fn use_review_queue_items(
    card_id: CardId,
    open: Signal<bool>,
) -> PagedListHandle<ReviewQueueItem> {
    let ctx = use_context::<AppContext>();
    let scope = use_card_scope();
    let tag = CacheTag::ReviewQueue(card_id.clone());
    let refresh = use_memo(move || scope.version(&tag));
    let no_search = use_signal(String::new);
    let queue = ctx.review_queue();

    use_paged_list("review-queue", open, no_search, refresh, move |request| {
        let queue = queue.clone();
        let card_id = card_id.clone();
        async move {
            queue
                .fetch_page(&card_id, request.page)
                .await
                .map_err(|err| err.user_message())
        }
    })
}
