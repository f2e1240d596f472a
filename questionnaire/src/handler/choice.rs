//! Selected choices: one per submission for radio buttons and dropdowns,
//! any number for check boxes. Text typed next to an "other" choice goes to
//! its own table.

use std::collections::BTreeSet;

use questionnaire_types::{
    ChoiceCount, ChoiceId, FieldKey, FormData, FormValue, QuestionResults, QuestionnaireError,
    Record, ResponseItem, SubmittedValue, Table,
};
use tracing::warn;

use crate::question::other_choice_id;
use crate::{Question, ValidationError};

/// The choice a submitted value names, if it belongs to the question.
fn resolve(question: &Question, value: &str) -> Option<ChoiceId> {
    let choice_id = other_choice_id(value).or_else(|| value.trim().parse().ok())?;
    question.choice(choice_id).map(|c| c.id)
}

fn selected(value: &SubmittedValue) -> (&[String], &[(ChoiceId, String)]) {
    match value {
        SubmittedValue::Selection { choices, others } => (choices.as_slice(), others.as_slice()),
        _ => (&[][..], &[][..]),
    }
}

pub(super) fn rows(
    question: &Question,
    value: &SubmittedValue,
    multiple: bool,
) -> Vec<(Table, Record)> {
    let (choices, others) = selected(value);
    let answer_table = if multiple { Table::ResponseMultiple } else { Table::ResponseSingle };
    let limit = if multiple { usize::MAX } else { 1 };

    let mut rows = Vec::new();
    for value in choices.iter().filter(|v| !v.is_empty()).take(limit) {
        let Some(choice_id) = resolve(question, value) else {
            warn!(question_id = question.id, value = value.as_str(), "skipping unknown choice");
            continue;
        };
        rows.push((answer_table, Record::new().with("choice_id", choice_id)));

        let other = others
            .iter()
            .find(|(id, text)| *id == choice_id && !text.is_empty());
        if let Some((_, text)) = other {
            rows.push((
                Table::ResponseOther,
                Record::new()
                    .with("choice_id", choice_id)
                    .with("response", text.as_str()),
            ));
        }
    }
    rows
}

pub(super) fn validate(
    question: &Question,
    value: &SubmittedValue,
    multiple: bool,
) -> Result<(), ValidationError> {
    let (choices, _) = selected(value);
    let choices: Vec<&String> = choices.iter().filter(|v| !v.is_empty()).collect();

    for value in &choices {
        if resolve(question, value).is_none() {
            return Err(ValidationError::UnknownChoice(value.to_string()));
        }
    }

    if multiple {
        let min = usize::try_from(question.length).unwrap_or(0);
        let max = usize::try_from(question.precise).unwrap_or(0);
        if min > 0 && choices.len() < min {
            return Err(ValidationError::TooFewChoices { min });
        }
        if max > 0 && choices.len() > max {
            return Err(ValidationError::TooManyChoices { max });
        }
    } else if choices.len() > 1 {
        return Err(ValidationError::TooManyChoices { max: 1 });
    }
    Ok(())
}

pub(super) fn results(
    question: &Question,
    rows: &[Record],
) -> Result<QuestionResults, QuestionnaireError> {
    let mut respondents = BTreeSet::new();
    let mut chosen = Vec::with_capacity(rows.len());
    for row in rows {
        respondents.insert(row.get_int("response_id")?);
        chosen.push(row.get_int("choice_id")?);
    }

    let counts = question
        .choices
        .iter()
        .map(|choice| ChoiceCount {
            choice_id: Some(choice.id),
            label: choice.content.clone(),
            count: chosen.iter().filter(|id| **id == choice.id).count(),
        })
        .collect();

    Ok(QuestionResults::Counts {
        counts,
        respondents: respondents.len(),
    })
}

pub(super) fn items(
    question: &Question,
    answers: &[Record],
    others: &[Record],
) -> Result<Vec<ResponseItem>, QuestionnaireError> {
    let mut items = Vec::with_capacity(answers.len() + others.len());
    for row in answers {
        let choice_id = row.get_int("choice_id")?;
        let content = question
            .choice(choice_id)
            .map(|c| c.content.clone())
            .unwrap_or_default();
        items.push(ResponseItem::Choice { choice_id, content });
    }
    for row in others {
        items.push(ResponseItem::Other {
            choice_id: row.get_int("choice_id")?,
            text: row.get_str("response")?.to_string(),
        });
    }
    Ok(items)
}

pub(super) fn form_values(question: &Question, items: &[ResponseItem], multiple: bool) -> FormData {
    let mut data = FormData::new();
    let mut values = Vec::new();

    for item in items {
        match item {
            ResponseItem::Choice { choice_id, .. } => {
                let is_other = question.choice(*choice_id).is_some_and(|c| c.is_other());
                values.push(if is_other {
                    format!("other_{choice_id}")
                } else {
                    choice_id.to_string()
                });
            }
            ResponseItem::Other { choice_id, text } => {
                data.insert(FieldKey::sub_choice(question.id, *choice_id), text.as_str());
            }
            _ => {}
        }
    }

    let key = FieldKey::question(question.id);
    if multiple {
        data.insert(key, FormValue::List(values));
    } else if let Some(value) = values.into_iter().next() {
        data.insert(key, value);
    }
    data
}
