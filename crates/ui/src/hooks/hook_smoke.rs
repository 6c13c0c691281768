use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use dioxus::prelude::*;
use services::PageRequest;
use storage::repository::Page;

use super::{Sentinel, use_debounce, use_paged_list, use_sentinel, use_sentinel_row};
use crate::views::test_harness::drive_dom;

async fn drive_async(dom: &mut VirtualDom) {
    let _ = tokio::time::timeout(Duration::from_millis(20), dom.wait_for_work()).await;
    drive_dom(dom);
}

/// Drive until `done` holds or a generous deadline passes.
async fn drive_until(dom: &mut VirtualDom, mut done: impl FnMut() -> bool) {
    for _ in 0..50 {
        if done() {
            return;
        }
        drive_async(dom).await;
    }
}

// Debounce

#[derive(Clone, Default)]
struct DebounceHandles {
    input: Rc<RefCell<Option<Signal<String>>>>,
    published: Rc<RefCell<Vec<(String, Instant)>>>,
}

#[derive(Props, Clone)]
struct DebounceProps {
    delay: Duration,
    handles: DebounceHandles,
}

impl PartialEq for DebounceProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn DebounceHarness(props: DebounceProps) -> Element {
    let input = use_signal(String::new);
    let debounced = use_debounce(input, props.delay);
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *props.handles.input.borrow_mut() = Some(input);
    }

    let current = debounced();
    {
        let mut published = props.handles.published.borrow_mut();
        if published.last().map(|(value, _)| value) != Some(&current) {
            published.push((current.clone(), Instant::now()));
        }
    }
    rsx! { p { "{current}" } }
}

#[tokio::test(flavor = "current_thread")]
async fn debounce_restarts_on_each_keystroke_and_publishes_the_settled_value() {
    let delay = Duration::from_millis(60);
    let handles = DebounceHandles::default();
    let mut dom = VirtualDom::new_with_props(
        DebounceHarness,
        DebounceProps {
            delay,
            handles: handles.clone(),
        },
    );
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    let mut input = (*handles.input.borrow()).expect("input registered");

    let mut last_keystroke = Instant::now();
    for typed in ["m", "mi", "mit"] {
        input.set(typed.to_string());
        last_keystroke = Instant::now();
        drive_dom(&mut dom);
        drive_async(&mut dom).await;
    }

    let published = Rc::clone(&handles.published);
    drive_until(&mut dom, || published.borrow().len() > 1).await;

    let published = handles.published.borrow();
    let values: Vec<&str> = published.iter().map(|(value, _)| value.as_str()).collect();
    assert_eq!(values, vec!["", "mit"]);
    let at = published[1].1;
    assert!(at.duration_since(last_keystroke) >= delay);
}

#[tokio::test(flavor = "current_thread")]
async fn debounce_returning_to_the_published_value_cancels_the_timer() {
    let handles = DebounceHandles::default();
    let mut dom = VirtualDom::new_with_props(
        DebounceHarness,
        DebounceProps {
            delay: Duration::from_millis(30),
            handles: handles.clone(),
        },
    );
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    let mut input = (*handles.input.borrow()).expect("input registered");

    input.set("x".to_string());
    drive_dom(&mut dom);
    input.set(String::new());
    drive_dom(&mut dom);
    for _ in 0..5 {
        drive_async(&mut dom).await;
    }

    let values: Vec<String> = handles
        .published
        .borrow()
        .iter()
        .map(|(value, _)| value.clone())
        .collect();
    assert_eq!(values, vec![String::new()]);
}

// Paged list

type Requests = Rc<RefCell<Vec<(u32, Option<String>)>>>;

#[derive(Clone, Default)]
struct ListHandles {
    search: Rc<RefCell<Option<Signal<String>>>>,
    requests: Requests,
    items: Rc<RefCell<Vec<String>>>,
}

#[derive(Props, Clone)]
struct ListProps {
    handles: ListHandles,
}

impl PartialEq for ListProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn PagedListHarness(props: ListProps) -> Element {
    let open = use_signal(|| true);
    let search = use_signal(String::new);
    let refresh = use_memo(|| 0_u64);
    let requests = Rc::clone(&props.handles.requests);
    let list = use_paged_list("entries", open, search, refresh, move |request: PageRequest| {
        let term = request.search.clone().unwrap_or_default();
        requests
            .borrow_mut()
            .push((request.page, request.search.clone()));
        let page = request.page;
        async move {
            Ok::<_, String>(Page::new(
                vec![format!("{term}:{page}:a"), format!("{term}:{page}:b")],
                true,
            ))
        }
    });

    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *props.handles.search.borrow_mut() = Some(search);
    }
    *props.handles.items.borrow_mut() = list.state.read().items().to_vec();
    rsx! { div {} }
}

#[tokio::test(flavor = "current_thread")]
async fn new_search_replaces_rows_with_its_first_page() {
    let handles = ListHandles::default();
    let mut dom = VirtualDom::new_with_props(
        PagedListHarness,
        ListProps {
            handles: handles.clone(),
        },
    );
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    let items = Rc::clone(&handles.items);
    drive_until(&mut dom, || !items.borrow().is_empty()).await;
    assert_eq!(*handles.items.borrow(), vec![":1:a", ":1:b"]);

    let mut search = (*handles.search.borrow()).expect("search registered");
    search.set("cell".to_string());
    drive_dom(&mut dom);
    let items = Rc::clone(&handles.items);
    drive_until(&mut dom, || {
        items.borrow().first().is_some_and(|row| row.starts_with("cell"))
    })
    .await;

    assert_eq!(*handles.items.borrow(), vec!["cell:1:a", "cell:1:b"]);
    assert_eq!(
        *handles.requests.borrow(),
        vec![(1, None), (1, Some("cell".to_string()))]
    );
}

// Sentinel

#[derive(Clone, Default)]
struct SentinelHandles {
    show_rows: Rc<RefCell<Option<Signal<bool>>>>,
    rows: Rc<RefCell<Option<Signal<Vec<&'static str>>>>>,
    target: Rc<RefCell<Option<String>>>,
}

#[derive(Props, Clone)]
struct SentinelProps {
    handles: SentinelHandles,
}

impl PartialEq for SentinelProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn SentinelRow(id: &'static str, is_last: bool, sentinel: Sentinel) -> Element {
    let dom_id = format!("row-{id}");
    use_sentinel_row(sentinel, dom_id.clone(), is_last);
    rsx! { li { id: "{dom_id}", "{id}" } }
}

/// A list that can be swapped out for a detail view and back.
#[component]
fn SentinelHarness(props: SentinelProps) -> Element {
    let show_rows = use_signal(|| true);
    let rows = use_signal(|| vec!["a", "b", "c"]);
    let sentinel = use_sentinel("rows", use_callback(|()| {}));

    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *props.handles.show_rows.borrow_mut() = Some(show_rows);
        *props.handles.rows.borrow_mut() = Some(rows);
    }
    *props.handles.target.borrow_mut() = sentinel.target();

    if !show_rows() {
        return rsx! { article { "detail" } };
    }
    let rows = rows();
    let last = rows.len().checked_sub(1);
    rsx! {
        ul {
            for (idx, id) in rows.into_iter().enumerate() {
                SentinelRow { key: "{id}", id, is_last: Some(idx) == last, sentinel }
            }
        }
    }
}

#[tokio::test(flavor = "current_thread")]
async fn sentinel_rearms_when_the_list_comes_back() {
    let handles = SentinelHandles::default();
    let mut dom = VirtualDom::new_with_props(
        SentinelHarness,
        SentinelProps {
            handles: handles.clone(),
        },
    );
    dom.rebuild_in_place();
    let target = Rc::clone(&handles.target);
    drive_until(&mut dom, || target.borrow().is_some()).await;
    assert_eq!(handles.target.borrow().as_deref(), Some("row-c"));

    let mut show_rows = (*handles.show_rows.borrow()).expect("toggle registered");
    show_rows.set(false);
    let target = Rc::clone(&handles.target);
    drive_until(&mut dom, || target.borrow().is_none()).await;
    assert_eq!(*handles.target.borrow(), None);

    show_rows.set(true);
    let target = Rc::clone(&handles.target);
    drive_until(&mut dom, || target.borrow().is_some()).await;
    assert_eq!(handles.target.borrow().as_deref(), Some("row-c"));

    let mut rows = (*handles.rows.borrow()).expect("rows registered");
    rows.write().push("d");
    let target = Rc::clone(&handles.target);
    drive_until(&mut dom, || target.borrow().as_deref() == Some("row-d")).await;
    assert_eq!(handles.target.borrow().as_deref(), Some("row-d"));
}
