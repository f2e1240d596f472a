//! Yes/no answers, stored as `y` or `n`.

use questionnaire_types::{
    ChoiceCount, FieldKey, FormData, QuestionResults, QuestionnaireError, Record, ResponseItem,
    SubmittedValue, Table,
};
use tracing::warn;

use crate::{Question, ValidationError};

pub(super) fn rows(question: &Question, value: &SubmittedValue) -> Vec<(Table, Record)> {
    match value.as_text() {
        Some(answer @ ("y" | "n")) => {
            vec![(Table::ResponseBool, Record::new().with("choice_id", answer))]
        }
        Some("") | None => Vec::new(),
        Some(answer) => {
            warn!(question_id = question.id, value = answer, "skipping invalid yes/no answer");
            Vec::new()
        }
    }
}

pub(super) fn validate(value: &SubmittedValue) -> Result<(), ValidationError> {
    match value.as_text() {
        Some("y" | "n") => Ok(()),
        Some(other) => Err(ValidationError::UnknownChoice(other.to_string())),
        None => Err(ValidationError::InvalidField {
            field: "yesno".to_string(),
            value: value.type_name().to_string(),
        }),
    }
}

pub(super) fn results(rows: &[Record]) -> Result<QuestionResults, QuestionnaireError> {
    let mut yes = 0;
    let mut no = 0;
    for row in rows {
        match row.get_str("choice_id")? {
            "y" => yes += 1,
            _ => no += 1,
        }
    }
    Ok(QuestionResults::Counts {
        counts: vec![
            ChoiceCount { choice_id: None, label: "y".to_string(), count: yes },
            ChoiceCount { choice_id: None, label: "n".to_string(), count: no },
        ],
        respondents: rows.len(),
    })
}

pub(super) fn items(rows: &[Record]) -> Result<Vec<ResponseItem>, QuestionnaireError> {
    rows.iter()
        .map(|row| -> Result<ResponseItem, QuestionnaireError> {
            Ok(ResponseItem::Boolean(row.get_str("choice_id")? == "y"))
        })
        .collect()
}

pub(super) fn form_values(question: &Question, items: &[ResponseItem]) -> FormData {
    let mut data = FormData::new();
    for item in items {
        if let ResponseItem::Boolean(yes) = item {
            data.insert(FieldKey::question(question.id), if *yes { "y" } else { "n" });
        }
    }
    data
}
