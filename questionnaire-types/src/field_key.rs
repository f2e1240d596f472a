use std::fmt;

use crate::{ChoiceId, QuestionId};

/// The name of a submitted form field, e.g. `"q12"` or `"q12_40"`.
///
/// A question's own answer lives under `q{id}`. Rating questions store one
/// answer per choice under `q{id}_{choice}`, and "other" choices keep their
/// free text under the same sub-choice key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    key: String,
}

impl FieldKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The key of a question's own answer.
    pub fn question(question_id: QuestionId) -> Self {
        Self::new(format!("q{question_id}"))
    }

    /// The key of a per-choice answer (rating rank, "other" text).
    pub fn sub_choice(question_id: QuestionId, choice_id: ChoiceId) -> Self {
        Self::new(format!("q{question_id}_{choice_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// The question id encoded in this key, if it follows the `q{id}` scheme.
    pub fn question_id(&self) -> Option<QuestionId> {
        let rest = self.key.strip_prefix('q')?;
        let digits = rest.split('_').next()?;
        digits.parse().ok()
    }

    /// The choice id of a `q{id}_{choice}` key.
    pub fn choice_id(&self) -> Option<ChoiceId> {
        let rest = self.key.strip_prefix('q')?;
        let (_, choice) = rest.split_once('_')?;
        choice.parse().ok()
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl From<&str> for FieldKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for FieldKey {
    fn from(s: &String) -> Self {
        Self::new(s.clone())
    }
}
