use serde_json::Value;

use crate::text::plain_text;

/// Before/after value carried by log changes and review-queue items.
///
/// The backend sends whatever the field holds: a primitive, a rich-text string,
/// or a flashcard/quiz-shaped object for additions and deletions.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Flashcard { question: String, answer: String },
    Quiz {
        question: String,
        answer: String,
        options: Vec<String>,
    },
    Other(Value),
}

impl FieldValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Classify a raw JSON value.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(s) => Self::Text(s),
            Value::Number(n) => Self::Number(n),
            Value::Bool(b) => Self::Flag(b),
            Value::Object(map) => {
                let question = map.get("question").and_then(Value::as_str);
                let answer = map.get("answer").and_then(Value::as_str);
                match (question, answer) {
                    (Some(question), Some(answer)) => {
                        let options = map.get("options").and_then(Value::as_array);
                        match options {
                            Some(options) => Self::Quiz {
                                question: question.to_string(),
                                answer: answer.to_string(),
                                options: options
                                    .iter()
                                    .filter_map(Value::as_str)
                                    .map(str::to_string)
                                    .collect(),
                            },
                            None => Self::Flashcard {
                                question: question.to_string(),
                                answer: answer.to_string(),
                            },
                        }
                    }
                    _ => Self::Other(Value::Object(map)),
                }
            }
            other @ Value::Array(_) => Self::Other(other),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Empty => Value::Null,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::Flag(b) => Value::Bool(*b),
            FieldValue::Flashcard { question, answer } => serde_json::json!({
                "question": question,
                "answer": answer,
            }),
            FieldValue::Quiz {
                question,
                answer,
                options,
            } => serde_json::json!({
                "question": question,
                "answer": answer,
                "options": options,
            }),
            FieldValue::Other(value) => value.clone(),
        }
    }

    /// The raw string when the value is plain text.
    #[must_use]
    pub fn as_plain_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// One-line, markup-free rendering used in summaries and log rows.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => plain_text(s).trim().to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Flag(b) => b.to_string(),
            FieldValue::Flashcard { question, .. } | FieldValue::Quiz { question, .. } => {
                plain_text(question).trim().to_string()
            }
            FieldValue::Other(value) => value.to_string(),
        }
    }
}
