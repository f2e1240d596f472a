//! Core types for the questionnaire crate.
//!
//! This crate provides the presentation-agnostic building blocks:
//! - `QuestionType` and `TypeInfo` - The closed set of question kinds and their registry rows
//! - `Choice`, `Dependency` and `QuestionParams` - Question data shared by every kind
//! - `FormData` and `FieldKey` - Submitted form values keyed by field name
//! - `SingleResponse` and `MultipleResponse` - Collected answers for one submission
//! - `Storage`, `FormBuilder`, `Output` and `Strings` - The collaborator traits

/// Database id of a question.
pub type QuestionId = i64;

/// Database id of a choice.
pub type ChoiceId = i64;

/// Database id of a survey.
pub type SurveyId = i64;

/// Database id of a submission (one respondent's pass through a survey).
pub type SubmissionId = i64;

/// The component name used for string lookups.
pub const COMPONENT: &str = "questionnaire";

mod storage;
pub use storage::{Condition, Direction, OrderBy, Query, Record, RecordId, Table, Value};

mod error;
pub use error::{QuestionnaireError, RecordError};

mod question_type;
pub use question_type::{CHOOSE_TYPE_CODE, QuestionType, ResponseKind, TypeInfo};

mod question;
pub use question::{Choice, Dependency, QuestionParams};

mod field_key;
pub use field_key::FieldKey;

mod form_data;
pub use form_data::{FormData, FormValue};

mod submitted_value;
pub use submitted_value::SubmittedValue;

mod response;
pub use response::{
    MultipleResponse, Response, ResponseHeader, ResponseItem, ResponseRecord, SingleResponse,
};

mod results;
pub use results::{ChoiceCount, QuestionResults, RankSummary, SortOrder, TextAnswer};

mod settings;
pub use settings::{AutoNumbering, QuestionnaireSettings, RespondentType};

mod render_context;
pub use render_context::{PageKind, RenderContext, ReportTab};

mod form_element;
pub use form_element::{FormElement, FormOption};

mod traits;
pub use traits::{FormBuilder, Output, Storage, Strings};
