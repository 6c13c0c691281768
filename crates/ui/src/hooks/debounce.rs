use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use dioxus::core::Task;
use dioxus::prelude::*;

/// Ticket bookkeeping for a trailing-edge debounce.
///
/// Every new input takes a fresh ticket; a timer may only publish if its
/// ticket is still the latest one when it fires.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DebounceState {
    latest: u64,
    armed: bool,
}

impl DebounceState {
    /// Start (or restart) the quiet period. Earlier tickets become stale.
    pub fn schedule(&mut self) -> u64 {
        self.latest += 1;
        self.armed = true;
        self.latest
    }

    #[must_use]
    pub fn is_current(&self, ticket: u64) -> bool {
        self.armed && ticket == self.latest
    }

    /// Consume `ticket` if it is still current.
    pub fn fire(&mut self, ticket: u64) -> bool {
        let current = self.is_current(ticket);
        if current {
            self.armed = false;
        }
        current
    }

    pub fn cancel(&mut self) {
        self.armed = false;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.armed
    }
}

/// Follow `value`, but only after it has stayed unchanged for `delay`.
pub fn use_debounce<T>(value: Signal<T>, delay: Duration) -> Signal<T>
where
    T: Clone + PartialEq + 'static,
{
    let mut debounced = use_signal(|| value.peek().clone());
    let state = use_hook(|| Rc::new(RefCell::new(DebounceState::default())));
    let timer = use_hook(|| Rc::new(Cell::new(None::<Task>)));

    {
        let state = Rc::clone(&state);
        let timer = Rc::clone(&timer);
        use_effect(move || {
            let next = value();
            if let Some(task) = timer.take() {
                task.cancel();
            }
            if *debounced.peek() == next {
                state.borrow_mut().cancel();
                return;
            }
            let ticket = state.borrow_mut().schedule();
            let state = Rc::clone(&state);
            let task = spawn(async move {
                tokio::time::sleep(delay).await;
                if state.borrow_mut().fire(ticket) {
                    debounced.set(next);
                }
            });
            timer.set(Some(task));
        });
    }

    use_drop(move || {
        state.borrow_mut().cancel();
        if let Some(task) = timer.take() {
            task.cancel();
        }
    });

    debounced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_timer_publishes() {
        let mut state = DebounceState::default();
        let first = state.schedule();
        let second = state.schedule();
        assert!(!state.fire(first));
        assert!(state.is_current(second));
        assert!(state.fire(second));
        assert!(!state.fire(second));
        assert!(!state.is_pending());
    }

    #[test]
    fn cancel_discards_the_pending_value() {
        let mut state = DebounceState::default();
        let ticket = state.schedule();
        state.cancel();
        assert!(!state.fire(ticket));
    }
}
