use chrono::{DateTime, Duration, Utc};

/// Clock abstraction so expiry checks and optimistic timestamps stay
/// deterministic in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Move a fixed clock forward. No effect on the system clock.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Short "3d 4h" / "25m" style label for the time left until `deadline`.
///
/// Returns `None` once the deadline has passed.
#[must_use]
pub fn remaining_label(now: DateTime<Utc>, deadline: DateTime<Utc>) -> Option<String> {
    let left = deadline.signed_duration_since(now);
    if left <= Duration::zero() {
        return None;
    }
    let days = left.num_days();
    let hours = left.num_hours() - days * 24;
    let minutes = left.num_minutes() - left.num_hours() * 60;
    let label = if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{}m", minutes.max(1))
    };
    Some(label)
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = Clock::fixed(fixed_now());
        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), fixed_now() + Duration::hours(2));
    }

    #[test]
    fn remaining_label_formats_by_magnitude() {
        let now = fixed_now();
        assert_eq!(
            remaining_label(now, now + Duration::days(2) + Duration::hours(3)).as_deref(),
            Some("2d 3h")
        );
        assert_eq!(
            remaining_label(now, now + Duration::minutes(90)).as_deref(),
            Some("1h 30m")
        );
        assert_eq!(remaining_label(now, now + Duration::seconds(20)).as_deref(), Some("1m"));
        assert_eq!(remaining_label(now, now - Duration::seconds(1)), None);
    }
}
