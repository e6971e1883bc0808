use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::direction::SwipeDirection;

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    /// Left/right swipe.
    Binary,
    /// Eight-way swipe.
    MultiChoice,
}

impl QuestionKind {
    /// Directions that must carry a label for this kind.
    #[must_use]
    pub const fn directions(self) -> &'static [SwipeDirection] {
        match self {
            Self::Binary => &SwipeDirection::BINARY,
            Self::MultiChoice => &SwipeDirection::ALL,
        }
    }
}

/// A single card in the questionnaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub category: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: BTreeMap<SwipeDirection, String>,
}

impl Question {
    /// Outcome label for a direction, if the question defines a non-empty one.
    #[must_use]
    pub fn option(&self, direction: SwipeDirection) -> Option<&str> {
        if !direction.applies_to(self.kind) {
            return None;
        }
        self.options
            .get(&direction)
            .map(String::as_str)
            .filter(|label| !label.trim().is_empty())
    }

    fn validate(&self) -> Result<(), QuestionBankError> {
        for &direction in self.kind.directions() {
            if self.option(direction).is_none() {
                return Err(QuestionBankError::MissingOption {
                    id: self.id,
                    direction,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("question bank is empty")]
    Empty,
    #[error("duplicate question id {0}")]
    DuplicateId(u32),
    #[error("question {id} has no label for direction `{direction}`")]
    MissingOption { id: u32, direction: SwipeDirection },
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The ordered, immutable list of questions a playthrough walks through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from pre-parsed questions, validating every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, an id repeats, or a question is
    /// missing a label its kind requires.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        let bank = Self { questions };
        bank.validate()?;
        Ok(bank)
    }

    /// Load a bank from a JSON document of the form `{"questions": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the bank fails validation.
    pub fn from_json(json: &str) -> Result<Self, QuestionBankError> {
        let bank: Self = serde_json::from_str(json)?;
        bank.validate()?;
        Ok(bank)
    }

    fn validate(&self) -> Result<(), QuestionBankError> {
        if self.questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        let mut seen = HashSet::with_capacity(self.questions.len());
        for question in &self.questions {
            if !seen.insert(question.id) {
                return Err(QuestionBankError::DuplicateId(question.id));
            }
            question.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(id: u32) -> Question {
        Question {
            id,
            category: String::from("Climate & Environment"),
            text: format!("Question {id}"),
            kind: QuestionKind::Binary,
            options: BTreeMap::from([
                (SwipeDirection::Left, String::from("No")),
                (SwipeDirection::Right, String::from("Yes")),
            ]),
        }
    }

    #[test]
    fn test_question_bank_from_json() {
        let json = r#"{
            "questions": [
                {
                    "id": 1,
                    "category": "Climate & Environment",
                    "text": "Snow?",
                    "type": "binary",
                    "options": { "left": "Stay in bed", "right": "Excited" }
                },
                {
                    "id": 2,
                    "category": "Climate & Environment",
                    "text": "Wardrobe?",
                    "type": "multiChoice",
                    "options": {
                        "up": "a", "upRight": "b", "right": "c", "downRight": "d",
                        "down": "e", "downLeft": "f", "left": "g", "upLeft": "h"
                    }
                }
            ]
        }"#;

        let bank = QuestionBank::from_json(json).unwrap();
        assert_eq!(bank.len(), 2);
        let first = bank.get(0).unwrap();
        assert_eq!(first.kind, QuestionKind::Binary);
        assert_eq!(first.option(SwipeDirection::Right), Some("Excited"));
        assert_eq!(first.option(SwipeDirection::Up), None);
        assert_eq!(bank.get(1).unwrap().option(SwipeDirection::DownLeft), Some("f"));
    }

    #[test]
    fn rejects_incomplete_multi_choice() {
        let mut question = binary(7);
        question.kind = QuestionKind::MultiChoice;
        let err = QuestionBank::new(vec![question]).unwrap_err();
        assert!(matches!(err, QuestionBankError::MissingOption { id: 7, .. }));
    }

    #[test]
    fn rejects_blank_binary_label() {
        let mut question = binary(3);
        question
            .options
            .insert(SwipeDirection::Left, String::from("   "));
        let err = QuestionBank::new(vec![question]).unwrap_err();
        assert!(matches!(
            err,
            QuestionBankError::MissingOption {
                direction: SwipeDirection::Left,
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicates_and_empty_banks() {
        assert!(matches!(
            QuestionBank::new(Vec::new()),
            Err(QuestionBankError::Empty)
        ));
        assert!(matches!(
            QuestionBank::new(vec![binary(1), binary(1)]),
            Err(QuestionBankError::DuplicateId(1))
        ));
    }
}
