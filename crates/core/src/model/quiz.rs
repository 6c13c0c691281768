use thiserror::Error;

use crate::model::ids::QuizId;
use crate::text::{is_blank, rich_text_matches};

/// Smallest and largest number of answer choices a quiz may present.
pub const MIN_OPTIONS: u8 = 2;
pub const MAX_OPTIONS: u8 = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("minimum options must be between 2 and 4, got {0}")]
    InvalidMinimumOptions(u8),

    #[error("option cannot be empty")]
    BlankOption,

    #[error("quiz already has all {max} options")]
    OptionsFull { max: usize },

    #[error("option index {index} is out of range")]
    OptionOutOfRange { index: usize },
}

/// A multiple-choice question.
///
/// `options` holds only the distractors; the correct answer is `answer`, so a
/// complete quiz stores exactly `minimum_options - 1` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub id: QuizId,
    pub question: String,
    pub answer: String,
    minimum_options: u8,
    options: Vec<String>,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError::InvalidMinimumOptions` outside `2..=4`, and
    /// `QuizError::OptionsFull` if more distractors are supplied than fit.
    pub fn new(
        id: QuizId,
        question: impl Into<String>,
        answer: impl Into<String>,
        minimum_options: u8,
        options: Vec<String>,
    ) -> Result<Self, QuizError> {
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&minimum_options) {
            return Err(QuizError::InvalidMinimumOptions(minimum_options));
        }
        let max = usize::from(minimum_options - 1);
        if options.len() > max {
            return Err(QuizError::OptionsFull { max });
        }
        Ok(Self {
            id,
            question: question.into(),
            answer: answer.into(),
            minimum_options,
            options,
        })
    }

    #[must_use]
    pub fn minimum_options(&self) -> u8 {
        self.minimum_options
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Number of distractors a complete quiz stores.
    #[must_use]
    pub fn max_stored_options(&self) -> usize {
        usize::from(self.minimum_options.saturating_sub(1))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.options.len() >= self.max_stored_options()
    }

    /// Whether the "add option" control should be offered.
    #[must_use]
    pub fn can_add_option(&self) -> bool {
        !self.is_complete()
    }

    /// Check a new distractor before it is sent anywhere.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::BlankOption` for empty/whitespace-only input and
    /// `QuizError::OptionsFull` once the quiz is complete.
    pub fn validate_new_option(&self, raw: &str) -> Result<String, QuizError> {
        if is_blank(raw) {
            return Err(QuizError::BlankOption);
        }
        if !self.can_add_option() {
            return Err(QuizError::OptionsFull {
                max: self.max_stored_options(),
            });
        }
        Ok(raw.trim().to_string())
    }

    /// # Errors
    ///
    /// Same rules as [`Quiz::validate_new_option`].
    pub fn push_option(&mut self, raw: &str) -> Result<(), QuizError> {
        let option = self.validate_new_option(raw)?;
        self.options.push(option);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `QuizError::OptionOutOfRange` for a missing slot and
    /// `QuizError::BlankOption` for empty input.
    pub fn set_option(&mut self, index: usize, raw: &str) -> Result<(), QuizError> {
        if is_blank(raw) {
            return Err(QuizError::BlankOption);
        }
        let slot = self
            .options
            .get_mut(index)
            .ok_or(QuizError::OptionOutOfRange { index })?;
        *slot = raw.trim().to_string();
        Ok(())
    }

    /// Case-insensitive match against question, answer or any option.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        rich_text_matches(&self.question, term)
            || rich_text_matches(&self.answer, term)
            || self.options.iter().any(|opt| rich_text_matches(opt, term))
    }
}
