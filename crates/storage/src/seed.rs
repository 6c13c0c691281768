//! Demo content for running the editor without a backend.

use chrono::{DateTime, Duration, Utc};
use deck_core::model::{
    ActivityLogEntry, Card, CardId, Change, ChangeType, FieldValue, Flashcard, FlashcardId,
    IndividualChange, LogEntryId, QueueItemId, Quiz, QuizId, ReviewQueueItem, TopicMeta, UserId,
    UserRef,
};

use crate::memory::InMemoryRepository;

pub const DEMO_CARD_ID: &str = "demo-card";

const LOG_ENTRIES: u32 = 24;
const QUEUE_ITEMS: u32 = 13;

/// Collaborator whose proposals fill the demo review queue.
#[must_use]
pub fn demo_collaborator() -> UserRef {
    UserRef::new(UserId::new("u-grace"), "Grace").with_handle("ghopper")
}

fn topic() -> TopicMeta {
    TopicMeta {
        category: "Science".into(),
        main_topic: "Biology".into(),
        sub_topic: "Cells".into(),
        description: "<p>The <strong>basic unit</strong> of life.</p>".into(),
    }
}

fn flashcards() -> Vec<Flashcard> {
    [
        ("What is a cell?", "The smallest unit of life."),
        ("What does the nucleus hold?", "<p>Genetic material (DNA).</p>"),
        ("What produces ATP?", "Mitochondria"),
        ("What encloses the cell?", "The cell membrane"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (q, a))| Flashcard::new(FlashcardId::new(format!("f-{}", i + 1)), q, a))
    .collect()
}

fn quizzes() -> Vec<Quiz> {
    let specs: [(&str, &str, u8, &[&str]); 3] = [
        ("Powerhouse of the cell?", "Mitochondria", 4, &["Ribosome", "Golgi body"]),
        ("Plants capture light with?", "Chloroplasts", 3, &["Vacuole", "Lysosome"]),
        ("Cells divide by?", "Mitosis", 2, &[]),
    ];
    specs
        .into_iter()
        .enumerate()
        .filter_map(|(i, (q, a, min, options))| {
            let options = options.iter().map(|o| (*o).to_string()).collect();
            Quiz::new(QuizId::new(format!("z-{}", i + 1)), q, a, min, options).ok()
        })
        .collect()
}

/// Fill `repo` with one card owned by `owner`, a paginated activity log and a
/// review queue spanning more than one page. Returns the card id.
pub fn seed_demo(repo: &InMemoryRepository, owner: &UserRef, now: DateTime<Utc>) -> CardId {
    let id = CardId::new(DEMO_CARD_ID);
    let mut card = Card::new(
        id.clone(),
        topic(),
        Some(owner.clone()),
        now - Duration::days(30),
    );
    card.flashcards = flashcards();
    card.quizzes = quizzes();
    card.updated_at = now - Duration::hours(2);
    repo.insert_card(card);

    let collaborator = demo_collaborator();
    for n in 0..LOG_ENTRIES {
        let actor = if n % 3 == 0 { &collaborator } else { owner };
        let at = now - Duration::hours(i64::from(LOG_ENTRIES - n) * 5);
        repo.push_log(
            &id,
            ActivityLogEntry {
                id: LogEntryId::new(format!("log-{n}")),
                summary: format!("{} edited flashcard {}", actor.name, n % 4 + 1),
                actor: Some(actor.clone()),
                at,
                changes: vec![Change::new(
                    "answer",
                    FieldValue::text(format!("Draft {n}")),
                    FieldValue::text(format!("Draft {}", n + 1)),
                )],
            },
        );
    }

    for n in 0..QUEUE_ITEMS {
        repo.push_review_item(&id, queue_item(n, &collaborator, now));
    }
    id
}

fn queue_item(n: u32, by: &UserRef, now: DateTime<Utc>) -> ReviewQueueItem {
    let submitted_at = now - Duration::hours(i64::from(n) * 7);
    let mut item = ReviewQueueItem {
        id: QueueItemId::new(format!("rq-{n}")),
        change_type: ChangeType::Edit,
        field: "subTopic".into(),
        submitted_by: Some(by.clone()),
        submitted_at,
        expires_at: submitted_at + Duration::days(7),
        old_value: FieldValue::text("Cells"),
        new_value: FieldValue::text(format!("Cell structure {n}")),
        old_display: None,
        new_display: None,
        individual_changes: Vec::new(),
    };
    match n % 4 {
        1 => {
            item.change_type = ChangeType::Addition;
            item.field = "flashcards".into();
            item.old_value = FieldValue::Empty;
            item.new_value = FieldValue::Flashcard {
                question: format!("What is organelle {n}?"),
                answer: "A specialised structure".into(),
            };
        }
        2 => {
            item.change_type = ChangeType::Deletion;
            item.field = "quizzes".into();
            item.old_value = FieldValue::Quiz {
                question: "Cells divide by?".into(),
                answer: "Mitosis".into(),
                options: Vec::new(),
            };
            item.new_value = FieldValue::Empty;
        }
        3 => {
            item.field = "flashcards".into();
            item.old_value = FieldValue::Empty;
            item.new_value = FieldValue::Empty;
            item.individual_changes = vec![
                IndividualChange {
                    change_type: ChangeType::Edit,
                    field: "question".into(),
                    old_value: FieldValue::text("What produces ATP?"),
                    new_value: FieldValue::text("Which organelle produces ATP?"),
                    old_display: None,
                    new_display: None,
                },
                IndividualChange {
                    change_type: ChangeType::Edit,
                    field: "answer".into(),
                    old_value: FieldValue::text("Mitochondria"),
                    new_value: FieldValue::text("The mitochondria"),
                    old_display: None,
                    new_display: None,
                },
            ];
        }
        _ => {}
    }
    item
}
