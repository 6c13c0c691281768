//! Wire shapes of the collaboration API and their conversion into domain types.

use chrono::{DateTime, Utc};
use deck_core::model::{
    ActivityLogEntry, Card, CardId, CardPatch, Change, ChangeType, Created, FieldValue, Flashcard,
    FlashcardId, IndividualChange, LogEntryId, QueueItemId, Quiz, QuizId, ReviewQueueItem,
    TopicMeta, UserId, UserRef,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::repository::{Page, PatchOutcome, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "username")]
    handle: Option<String>,
}

impl UserDto {
    fn into_user(self) -> UserRef {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.handle.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        UserRef {
            id: UserId::new(self.id),
            name,
            handle: self.handle,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlashcardDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
}

impl FlashcardDto {
    fn into_flashcard(self) -> Flashcard {
        Flashcard::new(FlashcardId::new(self.id), self.question, self.answer)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
    minimum_options: u8,
    #[serde(default)]
    options: Vec<String>,
}

impl QuizDto {
    fn into_quiz(self) -> Result<Quiz, StorageError> {
        Quiz::new(
            QuizId::new(self.id),
            self.question,
            self.answer,
            self.minimum_options,
            self.options,
        )
        .map_err(ser)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CardDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    main_topic: String,
    #[serde(default)]
    sub_topic: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    flashcards: Vec<FlashcardDto>,
    #[serde(default)]
    quizzes: Vec<QuizDto>,
    #[serde(default)]
    author: Option<UserDto>,
    #[serde(default)]
    last_edited_by: Option<UserDto>,
    #[serde(default)]
    pending_reviews: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CardDto {
    pub(crate) fn into_card(self) -> Result<Card, StorageError> {
        let quizzes = self
            .quizzes
            .into_iter()
            .map(QuizDto::into_quiz)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Card {
            id: CardId::new(self.id),
            topic: TopicMeta {
                category: self.category,
                main_topic: self.main_topic,
                sub_topic: self.sub_topic,
                description: self.description,
            },
            flashcards: self
                .flashcards
                .into_iter()
                .map(FlashcardDto::into_flashcard)
                .collect(),
            quizzes,
            author: self.author.map(UserDto::into_user),
            last_editor: self.last_edited_by.map(UserDto::into_user),
            pending_reviews: self.pending_reviews,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangeDto {
    field: String,
    #[serde(default)]
    old_value: Value,
    #[serde(default)]
    new_value: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default, alias = "action")]
    summary: String,
    #[serde(default)]
    user: Option<UserDto>,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    changes: Vec<ChangeDto>,
}

impl LogDto {
    fn into_entry(self) -> ActivityLogEntry {
        ActivityLogEntry {
            id: LogEntryId::new(self.id),
            summary: self.summary,
            actor: self.user.map(UserDto::into_user),
            at: self.timestamp,
            changes: self
                .changes
                .into_iter()
                .map(|c| {
                    Change::new(
                        c.field,
                        FieldValue::from_json(c.old_value),
                        FieldValue::from_json(c.new_value),
                    )
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogPageDto {
    #[serde(default)]
    logs: Vec<LogDto>,
    #[serde(default)]
    has_more: bool,
}

impl LogPageDto {
    pub(crate) fn into_page(self) -> Page<ActivityLogEntry> {
        Page::new(
            self.logs.into_iter().map(LogDto::into_entry).collect(),
            self.has_more,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndividualChangeDto {
    change_type: String,
    field: String,
    #[serde(default)]
    old_value: Value,
    #[serde(default)]
    new_value: Value,
    #[serde(default)]
    old_value_display: Option<String>,
    #[serde(default)]
    new_value_display: Option<String>,
}

impl IndividualChangeDto {
    fn into_change(self) -> Result<IndividualChange, StorageError> {
        Ok(IndividualChange {
            change_type: self.change_type.parse::<ChangeType>().map_err(ser)?,
            field: self.field,
            old_value: FieldValue::from_json(self.old_value),
            new_value: FieldValue::from_json(self.new_value),
            old_display: self.old_value_display,
            new_display: self.new_value_display,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueueMetadataDto {
    #[serde(default)]
    individual_changes: Vec<IndividualChangeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueueItemDto {
    #[serde(rename = "_id")]
    id: String,
    change_type: String,
    field: String,
    #[serde(default)]
    submitted_by: Option<UserDto>,
    submitted_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    #[serde(default)]
    old_value: Value,
    #[serde(default)]
    new_value: Value,
    #[serde(default)]
    old_value_display: Option<String>,
    #[serde(default)]
    new_value_display: Option<String>,
    #[serde(default)]
    metadata: Option<QueueMetadataDto>,
}

impl QueueItemDto {
    fn into_item(self) -> Result<ReviewQueueItem, StorageError> {
        let individual_changes = self
            .metadata
            .unwrap_or_default()
            .individual_changes
            .into_iter()
            .map(IndividualChangeDto::into_change)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReviewQueueItem {
            id: QueueItemId::new(self.id),
            change_type: self.change_type.parse::<ChangeType>().map_err(ser)?,
            field: self.field,
            submitted_by: self.submitted_by.map(UserDto::into_user),
            submitted_at: self.submitted_at,
            expires_at: self.expires_at,
            old_value: FieldValue::from_json(self.old_value),
            new_value: FieldValue::from_json(self.new_value),
            old_display: self.old_value_display,
            new_display: self.new_value_display,
            individual_changes,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueuePageDto {
    #[serde(default)]
    items: Vec<QueueItemDto>,
    #[serde(default)]
    has_more: bool,
}

impl QueuePageDto {
    pub(crate) fn into_page(self) -> Result<Page<ReviewQueueItem>, StorageError> {
        let items = self
            .items
            .into_iter()
            .map(QueueItemDto::into_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, self.has_more))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessageDto {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PatchResponseDto {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    queued: bool,
    #[serde(default)]
    flashcard: Option<FlashcardDto>,
    #[serde(default)]
    quiz: Option<QuizDto>,
}

impl PatchResponseDto {
    pub(crate) fn into_outcome(self) -> Result<PatchOutcome, StorageError> {
        if self.queued {
            return Ok(PatchOutcome::Queued {
                message: self
                    .message
                    .unwrap_or_else(|| "Submitted for review".to_string()),
            });
        }
        let created = match (self.flashcard, self.quiz) {
            (Some(flashcard), _) => Some(Created::Flashcard(flashcard.into_flashcard())),
            (None, Some(quiz)) => Some(Created::Quiz(quiz.into_quiz()?)),
            (None, None) => None,
        };
        Ok(PatchOutcome::Applied {
            created,
            message: self.message,
        })
    }
}

fn insert_opt(body: &mut Map<String, Value>, key: &str, value: Option<&String>) {
    if let Some(value) = value {
        body.insert(key.to_string(), Value::String(value.clone()));
    }
}

/// Request body for `PATCH cards/update`.
///
/// `_id` names the card; `cardId`/`quizId` name the flashcard or quiz inside it.
pub(crate) fn patch_body(card_id: &CardId, patch: &CardPatch) -> Value {
    let mut body = Map::new();
    body.insert("_id".to_string(), json!(card_id.as_str()));
    match patch {
        CardPatch::Topic { field, value } => {
            body.insert(field.wire_name().to_string(), json!(value));
        }
        CardPatch::AddFlashcard { question, answer } => {
            body.insert("question".to_string(), json!(question));
            body.insert("answer".to_string(), json!(answer));
        }
        CardPatch::EditFlashcard {
            flashcard_id,
            question,
            answer,
        } => {
            body.insert("cardId".to_string(), json!(flashcard_id.as_str()));
            insert_opt(&mut body, "question", question.as_ref());
            insert_opt(&mut body, "answer", answer.as_ref());
        }
        CardPatch::DeleteFlashcard { flashcard_id } => {
            body.insert("cardId".to_string(), json!(flashcard_id.as_str()));
            body.insert("deleteCard".to_string(), json!(true));
        }
        CardPatch::AddQuiz {
            question,
            answer,
            minimum_options,
        } => {
            body.insert(
                "quiz".to_string(),
                json!({
                    "question": question,
                    "answer": answer,
                    "minimumOptions": minimum_options,
                }),
            );
        }
        CardPatch::EditQuiz {
            quiz_id,
            question,
            answer,
        } => {
            body.insert("quizId".to_string(), json!(quiz_id.as_str()));
            insert_opt(&mut body, "question", question.as_ref());
            insert_opt(&mut body, "answer", answer.as_ref());
        }
        CardPatch::AddQuizOption { quiz_id, option } => {
            body.insert("quizId".to_string(), json!(quiz_id.as_str()));
            body.insert("option".to_string(), json!(option));
        }
        CardPatch::EditQuizOption {
            quiz_id,
            option_index,
            option,
        } => {
            body.insert("quizId".to_string(), json!(quiz_id.as_str()));
            body.insert("optionIndex".to_string(), json!(option_index));
            body.insert("option".to_string(), json!(option));
        }
        CardPatch::DeleteQuiz { quiz_id } => {
            body.insert("quizId".to_string(), json!(quiz_id.as_str()));
            body.insert("deleteQuiz".to_string(), json!(true));
        }
    }
    Value::Object(body)
}
