use serde::{Deserialize, Serialize};

use crate::{Record, RecordError, Value};

/// How questions and pages are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum AutoNumbering {
    /// No numbering at all.
    None,
    /// Questions are numbered.
    Questions,
    /// Pages are numbered.
    Pages,
    /// Questions and pages are numbered.
    #[default]
    Both,
}

impl AutoNumbering {
    pub fn code(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Questions => 1,
            Self::Pages => 2,
            Self::Both => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Questions),
            2 => Some(Self::Pages),
            3 => Some(Self::Both),
            _ => None,
        }
    }

    /// Whether question numbers are shown.
    pub fn numbers_questions(self) -> bool {
        matches!(self, Self::Questions | Self::Both)
    }

    /// Whether page numbers are shown.
    pub fn numbers_pages(self) -> bool {
        matches!(self, Self::Pages | Self::Both)
    }
}

impl TryFrom<i64> for AutoNumbering {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("invalid autonumbering mode: {code}"))
    }
}

impl From<AutoNumbering> for i64 {
    fn from(mode: AutoNumbering) -> Self {
        mode.code()
    }
}

/// Who respondents are shown as in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondentType {
    #[default]
    Fullname,
    Anonymous,
}

impl RespondentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fullname => "fullname",
            Self::Anonymous => "anonymous",
        }
    }
}

/// Per-survey settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireSettings {
    pub name: String,
    pub title: String,
    pub autonum: AutoNumbering,
    /// Whether questions may depend on earlier answers.
    pub navigate: bool,
    pub respondent_type: RespondentType,
    /// Whether respondents may save and resume.
    pub resume: bool,
    pub grade: i64,
}

impl Default for QuestionnaireSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            autonum: AutoNumbering::Both,
            navigate: false,
            respondent_type: RespondentType::Fullname,
            resume: false,
            grade: 0,
        }
    }
}

impl QuestionnaireSettings {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            ..Self::default()
        }
    }

    pub fn with_autonum(mut self, autonum: AutoNumbering) -> Self {
        self.autonum = autonum;
        self
    }

    pub fn with_navigate(mut self, navigate: bool) -> Self {
        self.navigate = navigate;
        self
    }

    pub fn from_record(record: &Record) -> Result<Self, RecordError> {
        let autonum = record.get_int("autonum")?;
        let respondent_type = match record.get_str("respondenttype")? {
            "anonymous" => RespondentType::Anonymous,
            _ => RespondentType::Fullname,
        };
        Ok(Self {
            name: record.get_str("name")?.to_string(),
            title: record.get_str("title")?.to_string(),
            autonum: AutoNumbering::from_code(autonum).ok_or_else(|| {
                RecordError::InvalidValue {
                    column: "autonum".to_string(),
                    value: autonum.to_string(),
                }
            })?,
            navigate: record.get_int("navigate")? != 0,
            respondent_type,
            resume: record.get_int("resume")? != 0,
            grade: record.get_int("grade")?,
        })
    }

    /// The survey row for these settings (id excluded).
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("name", self.name.as_str())
            .with("title", self.title.as_str())
            .with("autonum", self.autonum.code())
            .with("navigate", Value::Int(i64::from(self.navigate)))
            .with("respondenttype", self.respondent_type.as_str())
            .with("resume", Value::Int(i64::from(self.resume)))
            .with("grade", self.grade)
    }
}
