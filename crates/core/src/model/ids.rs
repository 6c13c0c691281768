use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an ID from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// Backend identifiers are opaque strings (document ids), so every id type is a
// thin newtype over `String` that refuses blank values when parsed.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }
        }
    };
}

string_id!(
    /// Unique identifier for a Card (a deck of flashcards and quizzes).
    CardId
);
string_id!(
    /// Unique identifier for a Flashcard inside a Card.
    FlashcardId
);
string_id!(
    /// Unique identifier for a Quiz inside a Card.
    QuizId
);
string_id!(
    /// Unique identifier for an activity log entry.
    LogEntryId
);
string_id!(
    /// Unique identifier for a pending review-queue item.
    QueueItemId
);
string_id!(
    /// Unique identifier for a user.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_id_display_is_raw_value() {
        let id = CardId::new("65f1c0ffee");
        assert_eq!(id.to_string(), "65f1c0ffee");
        assert_eq!(format!("{id:?}"), "CardId(65f1c0ffee)");
    }

    #[test]
    fn parse_trims_and_rejects_blank() {
        let id: QueueItemId = "  q-1 ".parse().unwrap();
        assert_eq!(id.as_str(), "q-1");

        let err = "   ".parse::<QueueItemId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse QueueItemId from string");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&FlashcardId::new("f1")).unwrap();
        assert_eq!(json, "\"f1\"");
        let back: FlashcardId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FlashcardId::new("f1"));
    }
}
