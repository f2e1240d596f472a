use questionnaire_types::{ChoiceId, QuestionId};

/// Why a submitted answer was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Question {0} requires an answer")]
    Required(QuestionId),

    #[error("At least {min} choices must be selected")]
    TooFewChoices { min: usize },

    #[error("At most {max} choices may be selected")]
    TooManyChoices { max: usize },

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a date in yyyy-mm-dd form")]
    InvalidDate(String),

    #[error("'{0}' is not a choice of this question")]
    UnknownChoice(String),

    #[error("Rank {rank} for choice {choice_id} is outside 0..={max}")]
    RankOutOfRange {
        choice_id: ChoiceId,
        rank: i64,
        max: i64,
    },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidField { field: String, value: String },
}
