use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// Label shown for log entries written by the backend itself.
pub const SYSTEM_ACTOR: &str = "System";

/// Reference to a user as embedded in cards, log entries and queue items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
    pub handle: Option<String>,
}

impl UserRef {
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            handle: None,
        }
    }

    #[must_use]
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// "Name (@handle)" when a handle is known, otherwise just the name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.handle {
            Some(handle) if !handle.trim().is_empty() => {
                format!("{} (@{})", self.name, handle.trim_start_matches('@'))
            }
            _ => self.name.clone(),
        }
    }
}

/// Display label for an optional actor; `None` is the backend.
#[must_use]
pub fn actor_label(actor: Option<&UserRef>) -> String {
    actor.map_or_else(|| SYSTEM_ACTOR.to_string(), UserRef::display_name)
}
