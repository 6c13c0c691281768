//! Accept/reject gating shared by every item in a review-queue view.

use std::time::Duration;

use deck_core::model::QueueItemId;

/// How long a failed decision's banner stays up before clearing itself.
pub const ERROR_BANNER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    Accept,
    Reject,
}

impl DecisionKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DecisionKind::Accept => "Accept",
            DecisionKind::Reject => "Reject",
        }
    }

    #[must_use]
    pub fn busy_label(self) -> &'static str {
        match self {
            DecisionKind::Accept => "Accepting…",
            DecisionKind::Reject => "Rejecting…",
        }
    }
}

/// Token for a decision in flight; hand it back to [`ReviewDecisions::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecision {
    pub kind: DecisionKind,
    pub item_id: QueueItemId,
    ticket: u64,
}

/// One loading flag for the whole view, plus the error banner.
///
/// A failed decision keeps every control disabled until the banner is
/// dismissed or times out, so the user sees why before trying again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDecisions {
    authenticated: bool,
    pending: Option<PendingDecision>,
    error: Option<String>,
    notice: Option<String>,
    next_ticket: u64,
}

impl ReviewDecisions {
    #[must_use]
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated,
            ..Self::default()
        }
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    #[must_use]
    pub fn can_act(&self) -> bool {
        self.authenticated && self.pending.is_none() && self.error.is_none()
    }

    /// Claim the shared flag for a decision on `item_id`.
    ///
    /// Returns `None`, leaving state unchanged, when controls are disabled.
    pub fn begin(&mut self, kind: DecisionKind, item_id: QueueItemId) -> Option<PendingDecision> {
        if !self.can_act() {
            return None;
        }
        self.next_ticket += 1;
        let pending = PendingDecision {
            kind,
            item_id,
            ticket: self.next_ticket,
        };
        self.pending = Some(pending.clone());
        self.notice = None;
        Some(pending)
    }

    /// Record the outcome: `Ok(message)` from the backend, or the user-facing
    /// error text.
    pub fn finish(&mut self, decision: &PendingDecision, result: Result<String, String>) {
        if self.pending.as_ref() != Some(decision) {
            return;
        }
        self.pending = None;
        match result {
            Ok(message) => self.notice = Some(message),
            Err(message) => self.error = Some(message),
        }
    }

    /// Clear the error banner and re-enable controls.
    pub fn dismiss(&mut self) {
        self.error = None;
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingDecision> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn is_busy(&self, kind: DecisionKind) -> bool {
        self.pending.as_ref().is_some_and(|p| p.kind == kind)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_decision_waits_for_first() {
        let mut decisions = ReviewDecisions::new(true);
        let accept = decisions
            .begin(DecisionKind::Accept, QueueItemId::new("x"))
            .unwrap();
        assert!(decisions.is_busy(DecisionKind::Accept));
        assert!(decisions.begin(DecisionKind::Reject, QueueItemId::new("y")).is_none());

        decisions.finish(&accept, Ok("Change accepted".into()));
        assert!(decisions.can_act());
        assert_eq!(decisions.notice(), Some("Change accepted"));
    }

    #[test]
    fn failure_blocks_until_dismissed() {
        let mut decisions = ReviewDecisions::new(true);
        let accept = decisions
            .begin(DecisionKind::Accept, QueueItemId::new("x"))
            .unwrap();
        decisions.finish(&accept, Err("expired".into()));
        assert_eq!(decisions.error(), Some("expired"));
        assert!(decisions.begin(DecisionKind::Reject, QueueItemId::new("y")).is_none());

        decisions.dismiss();
        assert!(decisions.begin(DecisionKind::Reject, QueueItemId::new("y")).is_some());
    }

    #[test]
    fn anonymous_cannot_act() {
        let mut decisions = ReviewDecisions::new(false);
        assert!(!decisions.can_act());
        assert!(decisions.begin(DecisionKind::Accept, QueueItemId::new("x")).is_none());
    }

    #[test]
    fn stale_finish_is_ignored() {
        let mut decisions = ReviewDecisions::new(true);
        let first = decisions
            .begin(DecisionKind::Accept, QueueItemId::new("x"))
            .unwrap();
        decisions.finish(&first, Ok("ok".into()));
        let second = decisions
            .begin(DecisionKind::Reject, QueueItemId::new("y"))
            .unwrap();
        decisions.finish(&first, Err("late".into()));
        assert_eq!(decisions.pending(), Some(&second));
        assert_eq!(decisions.error(), None);
    }
}
