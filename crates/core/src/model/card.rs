use chrono::{DateTime, Utc};

use crate::model::flashcard::Flashcard;
use crate::model::ids::{CardId, FlashcardId, QuizId};
use crate::model::quiz::Quiz;
use crate::model::user::UserRef;

//
// ─── TOPIC METADATA ────────────────────────────────────────────────────────────
//

/// Patchable metadata fields of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TopicField {
    Category,
    MainTopic,
    SubTopic,
    Description,
}

impl TopicField {
    pub const ALL: [TopicField; 4] = [
        TopicField::Category,
        TopicField::MainTopic,
        TopicField::SubTopic,
        TopicField::Description,
    ];

    /// Field name as used by the backend and in log/queue records.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            TopicField::Category => "category",
            TopicField::MainTopic => "mainTopic",
            TopicField::SubTopic => "subTopic",
            TopicField::Description => "description",
        }
    }

    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.wire_name() == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicMeta {
    pub category: String,
    pub main_topic: String,
    pub sub_topic: String,
    pub description: String,
}

impl TopicMeta {
    #[must_use]
    pub fn get(&self, field: TopicField) -> &str {
        match field {
            TopicField::Category => &self.category,
            TopicField::MainTopic => &self.main_topic,
            TopicField::SubTopic => &self.sub_topic,
            TopicField::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: TopicField, value: String) {
        match field {
            TopicField::Category => self.category = value,
            TopicField::MainTopic => self.main_topic = value,
            TopicField::SubTopic => self.sub_topic = value,
            TopicField::Description => self.description = value,
        }
    }
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// A deck: topic metadata plus ordered flashcards and quizzes.
///
/// Activity logs and review-queue items belong to the card as well but are
/// fetched page by page, so only the pending count travels with the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub topic: TopicMeta,
    pub flashcards: Vec<Flashcard>,
    pub quizzes: Vec<Quiz>,
    pub author: Option<UserRef>,
    pub last_editor: Option<UserRef>,
    pub pending_reviews: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId, topic: TopicMeta, author: Option<UserRef>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            topic,
            flashcards: Vec::new(),
            quizzes: Vec::new(),
            author,
            last_editor: None,
            pending_reviews: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user` owns the card; owners' edits apply directly.
    #[must_use]
    pub fn is_owned_by(&self, user: Option<&UserRef>) -> bool {
        match (&self.author, user) {
            (Some(author), Some(user)) => author.id == user.id,
            _ => false,
        }
    }

    #[must_use]
    pub fn flashcard_index(&self, id: &FlashcardId) -> Option<usize> {
        self.flashcards.iter().position(|f| &f.id == id)
    }

    #[must_use]
    pub fn quiz_index(&self, id: &QuizId) -> Option<usize> {
        self.quizzes.iter().position(|q| &q.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::UserId;
    use crate::time::fixed_now;

    #[test]
    fn topic_field_wire_names_round_trip() {
        for field in TopicField::ALL {
            assert_eq!(TopicField::from_wire(field.wire_name()), Some(field));
        }
        assert_eq!(TopicField::from_wire("question"), None);
    }

    #[test]
    fn ownership_requires_matching_user() {
        let author = UserRef::new(UserId::new("u1"), "Ada");
        let other = UserRef::new(UserId::new("u2"), "Bob");
        let card = Card::new(
            CardId::new("c1"),
            TopicMeta::default(),
            Some(author.clone()),
            fixed_now(),
        );
        assert!(card.is_owned_by(Some(&author)));
        assert!(!card.is_owned_by(Some(&other)));
        assert!(!card.is_owned_by(None));
    }
}
