use questionnaire_types::{FieldKey, FormData, QuestionType};

use crate::Question;

/// Marker shown next to a question after a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredMarker {
    /// Required and unanswered.
    Missing,
    Satisfied,
}

impl RequiredMarker {
    /// The glyph rendered in the marker slot.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Missing => "*",
            Self::Satisfied => "&nbsp;",
        }
    }

    pub fn is_missing(self) -> bool {
        self == Self::Missing
    }
}

impl Question {
    /// Whether this question is required and the data leaves it unanswered.
    ///
    /// A rating scale counts as answered once any of its rows is.
    pub fn is_required_and_missing(&self, data: &FormData) -> RequiredMarker {
        if !self.required {
            return RequiredMarker::Satisfied;
        }

        let answered = match self.question_type {
            QuestionType::Rate => self
                .choices
                .iter()
                .any(|c| data.has_value(&FieldKey::sub_choice(self.id, c.id))),
            _ => data.has_value(&FieldKey::question(self.id)),
        };

        if answered {
            RequiredMarker::Satisfied
        } else {
            RequiredMarker::Missing
        }
    }
}
