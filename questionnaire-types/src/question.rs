use serde::{Deserialize, Serialize};

use crate::{ChoiceId, FieldKey, QuestionId, QuestionType, Record, RecordError, SurveyId};

const OTHER_PREFIX: &str = "!other";

/// One selectable option of a question with enumerated answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Database id (0 for a choice not yet stored).
    #[serde(default)]
    pub id: ChoiceId,

    /// The displayed content.
    pub content: String,

    /// The underlying value, if different from the content.
    #[serde(default)]
    pub value: Option<String>,
}

impl Choice {
    /// Create a choice that has not been stored yet.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: 0,
            content: content.into(),
            value: None,
        }
    }

    /// Set the underlying value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// An "other" choice renders an extra free-text input next to it.
    ///
    /// Its content is `!other` optionally followed by `=label`.
    pub fn is_other(&self) -> bool {
        self.content.starts_with(OTHER_PREFIX)
    }

    /// The custom label of an "other" choice, if one was given.
    pub fn other_label(&self) -> Option<&str> {
        self.content
            .strip_prefix(OTHER_PREFIX)
            .and_then(|rest| rest.strip_prefix('='))
            .filter(|label| !label.is_empty())
    }

    pub fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            id: record.id()?,
            content: record.get_str("content")?.to_string(),
            value: record.get_opt_str("value")?.map(str::to_string),
        })
    }

    /// The row for this choice under the given question (id excluded).
    pub fn to_record(&self, question_id: QuestionId) -> Record {
        Record::new()
            .with("question_id", question_id)
            .with("content", self.content.as_str())
            .with("value", self.value.clone())
    }
}

/// A question shown only when a prior question was answered a certain way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// The parent question.
    pub question_id: QuestionId,

    /// The parent's choice that must be selected. For yes/no parents,
    /// 0 means "yes" and 1 means "no".
    pub choice_id: ChoiceId,

    /// The parent's question type.
    pub parent_type: QuestionType,
}

impl Dependency {
    /// The form key holding the parent's answer.
    pub fn parent_key(&self) -> FieldKey {
        FieldKey::question(self.question_id)
    }

    /// The parent answer value that satisfies this dependency.
    pub fn expected_answer(&self) -> String {
        match self.parent_type {
            QuestionType::YesNo if self.choice_id == 0 => "y".to_string(),
            QuestionType::YesNo => "n".to_string(),
            _ => self.choice_id.to_string(),
        }
    }
}

/// Initial field values for a question built by type code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionParams {
    pub survey_id: SurveyId,
    pub name: String,
    pub content: String,
    pub required: bool,
    pub length: i64,
    pub precise: i64,
    pub position: i64,
    /// Parent question and choice, as `(question_id, choice_id)`.
    pub depends_on: Option<(QuestionId, ChoiceId)>,
}

impl QuestionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_survey(mut self, survey_id: SurveyId) -> Self {
        self.survey_id = survey_id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_length(mut self, length: i64) -> Self {
        self.length = length;
        self
    }

    pub fn with_precise(mut self, precise: i64) -> Self {
        self.precise = precise;
        self
    }

    pub fn with_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    pub fn depends_on(mut self, question_id: QuestionId, choice_id: ChoiceId) -> Self {
        self.depends_on = Some((question_id, choice_id));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_choice_label() {
        assert_eq!(Choice::new("!other=Something else").other_label(), Some("Something else"));
        assert_eq!(Choice::new("!other").other_label(), None);
        assert!(Choice::new("!other").is_other());
        assert!(!Choice::new("Red").is_other());
    }

    #[test]
    fn yes_no_dependency_maps_choice_to_letter() {
        let yes = Dependency {
            question_id: 3,
            choice_id: 0,
            parent_type: QuestionType::YesNo,
        };
        let no = Dependency { choice_id: 1, ..yes };
        assert_eq!(yes.expected_answer(), "y");
        assert_eq!(no.expected_answer(), "n");
        assert_eq!(yes.parent_key().as_str(), "q3");
    }

    #[test]
    fn radio_dependency_uses_choice_id() {
        let dependency = Dependency {
            question_id: 3,
            choice_id: 17,
            parent_type: QuestionType::Radio,
        };
        assert_eq!(dependency.expected_answer(), "17");
    }

    #[test]
    fn choice_record_carries_question() {
        let record = Choice::new("One").with_value("1").to_record(9);
        assert_eq!(record.get_int("question_id").unwrap(), 9);
        assert_eq!(record.get_opt_str("value").unwrap(), Some("1"));
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: QuestionParams =
            serde_json::from_str(r#"{"name": "Q1", "required": true}"#).unwrap();
        assert_eq!(params.name, "Q1");
        assert!(params.required);
        assert_eq!(params.length, 0);
        assert_eq!(params.depends_on, None);
    }
}
