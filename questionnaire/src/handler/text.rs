//! Free-text answers: text boxes, essays, numbers and dates.
//!
//! Dates are stored exactly as entered.

use chrono::NaiveDate;
use questionnaire_types::{
    FieldKey, FormData, QuestionResults, QuestionType, QuestionnaireError, Record, ResponseItem,
    SubmittedValue, Table, TextAnswer,
};

use crate::{Question, ValidationError};

pub(super) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(super) fn rows(question: &Question, value: &SubmittedValue) -> Vec<(Table, Record)> {
    let table = match question.question_type {
        QuestionType::Date => Table::ResponseDate,
        _ => Table::ResponseText,
    };
    match value.as_text() {
        Some(text) if !text.is_empty() => vec![(table, Record::new().with("response", text))],
        _ => Vec::new(),
    }
}

pub(super) fn validate(question: &Question, value: &SubmittedValue) -> Result<(), ValidationError> {
    let Some(text) = value.as_text() else {
        return Err(ValidationError::InvalidField {
            field: FieldKey::question(question.id).to_string(),
            value: value.type_name().to_string(),
        });
    };

    match question.question_type {
        QuestionType::Numeric => text
            .parse::<f64>()
            .map(|_| ())
            .map_err(|_| ValidationError::NotANumber(text.to_string())),
        QuestionType::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidDate(text.to_string())),
        QuestionType::Text if question.precise > 0 => {
            let max = usize::try_from(question.precise).unwrap_or(usize::MAX);
            if text.chars().count() > max {
                Err(ValidationError::InvalidField {
                    field: FieldKey::question(question.id).to_string(),
                    value: text.to_string(),
                })
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

pub(super) fn results(rows: &[Record]) -> Result<QuestionResults, QuestionnaireError> {
    let answers = rows
        .iter()
        .map(|row| -> Result<TextAnswer, QuestionnaireError> {
            Ok(TextAnswer {
                response_id: row.get_int("response_id")?,
                text: row.get_str("response")?.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QuestionResults::Texts(answers))
}

pub(super) fn items(rows: &[Record], date: bool) -> Result<Vec<ResponseItem>, QuestionnaireError> {
    rows.iter()
        .map(|row| -> Result<ResponseItem, QuestionnaireError> {
            let text = row.get_str("response")?.to_string();
            Ok(if date {
                ResponseItem::Date(text)
            } else {
                ResponseItem::Text(text)
            })
        })
        .collect()
}

pub(super) fn form_values(question: &Question, items: &[ResponseItem]) -> FormData {
    let mut data = FormData::new();
    for item in items {
        if let ResponseItem::Text(text) | ResponseItem::Date(text) = item {
            data.insert(FieldKey::question(question.id), text.as_str());
        }
    }
    data
}
