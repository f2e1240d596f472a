use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Record, RecordError, Table, Value};

/// Code of the "choose a question type" placeholder in the editor.
///
/// It never maps to a constructible question.
pub const CHOOSE_TYPE_CODE: u32 = 0;

/// The closed set of question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Yes/no radio pair.
    YesNo,
    /// Single-line text box.
    Text,
    /// Multi-line essay box.
    Essay,
    /// Radio buttons, one choice.
    Radio,
    /// Check boxes, any number of choices.
    Check,
    /// Dropdown box, one choice.
    Drop,
    /// Rating scale, one rank per choice.
    Rate,
    /// Date in `yyyy-mm-dd` form.
    Date,
    /// Numeric text box.
    Numeric,
    /// Page separator, no response.
    PageBreak,
    /// Label, no response.
    SectionText,
}

impl QuestionType {
    /// Every question type, ordered by code.
    pub const ALL: [QuestionType; 11] = [
        QuestionType::YesNo,
        QuestionType::Text,
        QuestionType::Essay,
        QuestionType::Radio,
        QuestionType::Check,
        QuestionType::Drop,
        QuestionType::Rate,
        QuestionType::Date,
        QuestionType::Numeric,
        QuestionType::PageBreak,
        QuestionType::SectionText,
    ];

    /// The persisted type code.
    pub fn code(self) -> u32 {
        match self {
            Self::YesNo => 1,
            Self::Text => 2,
            Self::Essay => 3,
            Self::Radio => 4,
            Self::Check => 5,
            Self::Drop => 6,
            Self::Rate => 8,
            Self::Date => 9,
            Self::Numeric => 10,
            Self::PageBreak => 99,
            Self::SectionText => 100,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// The canonical type name.
    pub fn name(self) -> &'static str {
        match self {
            Self::YesNo => "yesno",
            Self::Text => "text",
            Self::Essay => "essay",
            Self::Radio => "radio",
            Self::Check => "check",
            Self::Drop => "drop",
            Self::Rate => "rate",
            Self::Date => "date",
            Self::Numeric => "numeric",
            Self::PageBreak => "pagebreak",
            Self::SectionText => "sectiontext",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Whether questions of this type carry an enumerated list of choices.
    pub fn has_choices(self) -> bool {
        matches!(self, Self::Radio | Self::Check | Self::Drop | Self::Rate)
    }

    /// The response handler for this type, if it collects answers at all.
    pub fn response_kind(self) -> Option<ResponseKind> {
        match self {
            Self::YesNo => Some(ResponseKind::Boolean),
            Self::Text | Self::Essay | Self::Numeric => Some(ResponseKind::Text),
            Self::Date => Some(ResponseKind::Date),
            Self::Radio | Self::Drop => Some(ResponseKind::Single),
            Self::Check => Some(ResponseKind::Multiple),
            Self::Rate => Some(ResponseKind::Rank),
            Self::PageBreak | Self::SectionText => None,
        }
    }

    /// Pure layout types collect nothing and are never numbered.
    pub fn is_layout(self) -> bool {
        matches!(self, Self::PageBreak | Self::SectionText)
    }

    /// Whether other questions may depend on an answer to this type.
    pub fn can_be_parent(self) -> bool {
        matches!(self, Self::YesNo | Self::Radio | Self::Drop)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a question type's answers are stored and aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    Boolean,
    Text,
    Date,
    Single,
    Multiple,
    Rank,
}

impl ResponseKind {
    /// The table holding rows of this kind.
    pub fn table(self) -> Table {
        match self {
            Self::Boolean => Table::ResponseBool,
            Self::Text => Table::ResponseText,
            Self::Date => Table::ResponseDate,
            Self::Single => Table::ResponseSingle,
            Self::Multiple => Table::ResponseMultiple,
            Self::Rank => Table::ResponseRank,
        }
    }

    /// Whether one submission produces a sequence of items.
    pub fn is_multiple(self) -> bool {
        matches!(self, Self::Multiple | Self::Rank)
    }
}

/// A row of the question type table, as cached by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub code: u32,
    pub name: String,
    pub has_choices: bool,
    /// Name of the response table, empty for layout types.
    pub response_table: String,
}

impl TypeInfo {
    /// The built-in row for a question type.
    pub fn builtin(question_type: QuestionType) -> Self {
        Self {
            code: question_type.code(),
            name: question_type.name().to_string(),
            has_choices: question_type.has_choices(),
            response_table: question_type
                .response_kind()
                .map(|kind| kind.table().name().to_string())
                .unwrap_or_default(),
        }
    }

    /// The built-in rows for every question type.
    pub fn builtins() -> Vec<Self> {
        QuestionType::ALL.into_iter().map(Self::builtin).collect()
    }

    /// The closed question type this row describes, if any.
    pub fn question_type(&self) -> Option<QuestionType> {
        QuestionType::from_code(self.code)
    }

    pub fn from_record(record: &Record) -> Result<Self, RecordError> {
        let code = record.get_int("typeid")?;
        let code = u32::try_from(code).map_err(|_| RecordError::InvalidValue {
            column: "typeid".to_string(),
            value: code.to_string(),
        })?;
        Ok(Self {
            code,
            name: record.get_str("type")?.to_string(),
            has_choices: record.get_flag("has_choices")?,
            response_table: record
                .get_opt_str("response_table")?
                .unwrap_or_default()
                .to_string(),
        })
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("typeid", self.code)
            .with("type", self.name.as_str())
            .with("has_choices", Value::flag(self.has_choices))
            .with("response_table", self.response_table.as_str())
    }
}
