use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

/// Remembers what a value was on the previous update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousValue<T> {
    slot: Option<T>,
}

impl<T> Default for PreviousValue<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T: Clone> PreviousValue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `current` and hand back the value stored before it; `None` on
    /// the first call.
    pub fn observe(&mut self, current: T) -> Option<T> {
        self.slot.replace(current)
    }

    /// True when `current` differs from the last observed value. The first
    /// observation is not a change.
    pub fn changed(&mut self, current: T) -> bool
    where
        T: PartialEq,
    {
        match self.observe(current.clone()) {
            Some(previous) => previous != current,
            None => false,
        }
    }
}

/// Value of `current` as of the previous render, or `None` on the first.
pub fn use_previous<T: Clone + 'static>(current: T) -> Option<T> {
    let slot = use_hook(|| Rc::new(RefCell::new(PreviousValue::<T>::new())));
    slot.borrow_mut().observe(current)
}
