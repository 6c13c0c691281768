//! Infinite-scroll trigger: an `IntersectionObserver` on the last rendered row.

use dioxus::document::eval;
use dioxus::core::Task;
use dioxus::prelude::*;
use serde::Deserialize;

/// Message posted by the observer script when its element scrolls into view.
#[derive(Debug, Deserialize)]
struct SentinelHit {
    target: String,
}

/// Which element is being watched under a given observer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelSlot {
    key: String,
    target: Option<String>,
}

/// Instruction to (re)start observing `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attach {
    pub key: String,
    pub target: String,
    /// An older observer under the same key must be disconnected first.
    pub replaces: bool,
}

impl SentinelSlot {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target: None,
        }
    }

    /// Point the slot at `target`. `None` when it already watches it.
    pub fn attach(&mut self, target: &str) -> Option<Attach> {
        if self.target.as_deref() == Some(target) {
            return None;
        }
        let replaces = self.target.replace(target.to_string()).is_some();
        Some(Attach {
            key: self.key.clone(),
            target: target.to_string(),
            replaces,
        })
    }

    /// Stop watching. Returns the observer key when something was attached.
    pub fn detach(&mut self) -> Option<String> {
        self.target.take().map(|_| self.key.clone())
    }

    /// Detach only if `target` is the watched element. An unmounting row
    /// that was already superseded leaves the newer target alone.
    pub fn release(&mut self, target: &str) -> Option<String> {
        if self.target.as_deref() == Some(target) {
            self.detach()
        } else {
            None
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

fn observe_script(attach: &Attach) -> String {
    let key = &attach.key;
    let target = &attach.target;
    format!(
        r#"
        const registry = (window.__deckSentinels = window.__deckSentinels || {{}});
        if (registry[{key:?}]) {{
            registry[{key:?}].disconnect();
            delete registry[{key:?}];
        }}
        const el = document.getElementById({target:?});
        if (!el) {{ return; }}
        const observer = new IntersectionObserver((entries) => {{
            if (entries.some((entry) => entry.isIntersecting)) {{
                dioxus.send({{ target: {target:?} }});
            }}
        }});
        observer.observe(el);
        registry[{key:?}] = observer;
        "#
    )
}

fn disconnect_script(key: &str) -> String {
    format!(
        r#"
        const registry = window.__deckSentinels || {{}};
        if (registry[{key:?}]) {{
            registry[{key:?}].disconnect();
            delete registry[{key:?}];
        }}
        "#
    )
}

/// Handle given to list views; rows hook in through [`use_sentinel_row`].
#[derive(Clone, Copy, PartialEq)]
pub struct Sentinel {
    slot: Signal<SentinelSlot>,
    listener: Signal<Option<Task>>,
    on_visible: Callback<()>,
}

impl Sentinel {
    pub fn attach(&self, target_id: &str) {
        let mut slot = self.slot;
        let Some(attach) = slot.write().attach(target_id) else {
            return;
        };
        if attach.replaces {
            log::debug!("sentinel {} moved to {}", attach.key, attach.target);
        }
        let mut listener = self.listener;
        if let Some(task) = listener.write().take() {
            task.cancel();
        }
        let on_visible = self.on_visible;
        let task = spawn(async move {
            let mut channel = eval(&observe_script(&attach));
            while let Ok(hit) = channel.recv::<SentinelHit>().await {
                // Late hits from an element that is no longer last are ignored.
                if slot.peek().target() == Some(hit.target.as_str()) {
                    on_visible.call(());
                }
            }
        });
        listener.set(Some(task));
    }

    pub fn detach(&self) {
        let mut slot = self.slot;
        let mut listener = self.listener;
        if let Some(task) = listener.write().take() {
            task.cancel();
        }
        if let Some(key) = slot.write().detach() {
            let _ = eval(&disconnect_script(&key));
        }
    }

    /// Called when `target_id` leaves the DOM. The slot may already be gone
    /// when the whole list unmounts, hence the `try_` accessors.
    pub fn release(&self, target_id: &str) {
        let mut slot = self.slot;
        let key = match slot.try_write() {
            Ok(mut slot) => slot.release(target_id),
            Err(_) => return,
        };
        let Some(key) = key else {
            return;
        };
        let mut listener = self.listener;
        if let Ok(mut listener) = listener.try_write() {
            if let Some(task) = listener.take() {
                task.cancel();
            }
        }
        let _ = eval(&disconnect_script(&key));
    }

    #[must_use]
    pub fn target(&self) -> Option<String> {
        self.slot.read().target().map(str::to_string)
    }
}

/// Wire a list row to the sentinel: the row watches itself while it is the
/// last one, and lets go when it unmounts so a remount re-arms the observer.
pub fn use_sentinel_row(sentinel: Sentinel, dom_id: String, is_last: bool) {
    let attach_id = dom_id.clone();
    use_effect(use_reactive((&is_last,), move |(is_last,)| {
        if is_last {
            sentinel.attach(&attach_id);
        }
    }));
    use_drop(move || sentinel.release(&dom_id));
}

pub fn use_sentinel(key: &'static str, on_visible: Callback<()>) -> Sentinel {
    let slot = use_signal(|| SentinelSlot::new(key));
    let listener = use_signal(|| None::<Task>);
    use_drop(move || {
        let _ = eval(&disconnect_script(key));
    });
    Sentinel {
        slot,
        listener,
        on_visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reattaching_replaces_previous_observer() {
        let mut slot = SentinelSlot::new("logs");
        let first = slot.attach("log-l9").unwrap();
        assert!(!first.replaces);
        assert!(slot.attach("log-l9").is_none());

        let second = slot.attach("log-l19").unwrap();
        assert!(second.replaces);
        assert_eq!(slot.target(), Some("log-l19"));
    }

    #[test]
    fn detach_reports_key_once() {
        let mut slot = SentinelSlot::new("queue");
        assert_eq!(slot.detach(), None);
        slot.attach("row-1");
        assert_eq!(slot.detach().as_deref(), Some("queue"));
        assert_eq!(slot.detach(), None);
    }

    #[test]
    fn release_ignores_superseded_rows_and_allows_rearming() {
        let mut slot = SentinelSlot::new("queue");
        slot.attach("queue-row-q9");
        slot.attach("queue-row-q19");
        assert_eq!(slot.release("queue-row-q9"), None);
        assert_eq!(slot.target(), Some("queue-row-q19"));

        assert_eq!(slot.release("queue-row-q19").as_deref(), Some("queue"));
        let again = slot.attach("queue-row-q19").unwrap();
        assert!(!again.replaces);
    }

    #[test]
    fn script_disconnects_before_observing() {
        let script = observe_script(&Attach {
            key: "logs".into(),
            target: "log-1".into(),
            replaces: true,
        });
        let disconnect = script.find("disconnect()").unwrap();
        let observe = script.find("observer.observe").unwrap();
        assert!(disconnect < observe);
        assert!(script.contains("\"log-1\""));
    }
}
