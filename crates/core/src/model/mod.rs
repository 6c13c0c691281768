mod activity;
mod card;
mod flashcard;
mod ids;
mod patch;
mod quiz;
mod review_queue;
mod user;
mod value;

pub use ids::{CardId, FlashcardId, LogEntryId, ParseIdError, QueueItemId, QuizId, UserId};

pub use activity::{ActivityLogEntry, Change};
pub use card::{Card, TopicField, TopicMeta};
pub use flashcard::Flashcard;
pub use patch::{CardPatch, Created, PatchError};
pub use quiz::{MAX_OPTIONS, MIN_OPTIONS, Quiz, QuizError};
pub use review_queue::{ChangeType, IndividualChange, ParseChangeTypeError, ReviewQueueItem};
pub use user::{SYSTEM_ACTOR, UserRef, actor_label};
pub use value::FieldValue;
