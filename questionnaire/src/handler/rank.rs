//! Rating-scale answers: one rank per rated choice. Rank 0 records the
//! "not applicable" column.

use questionnaire_types::{
    FieldKey, FormData, QuestionResults, QuestionnaireError, RankSummary, Record, ResponseItem,
    SubmittedValue, Table,
};
use tracing::warn;

use crate::body::DEFAULT_SCALE;
use crate::{Question, ValidationError};

fn scale(question: &Question) -> i64 {
    if question.length > 0 { question.length } else { DEFAULT_SCALE }
}

fn rank_allowed(question: &Question, rank: i64) -> bool {
    (1..=scale(question)).contains(&rank) || (rank == 0 && question.precise == 1)
}

pub(super) fn rows(question: &Question, value: &SubmittedValue) -> Vec<(Table, Record)> {
    let SubmittedValue::Ranks(ranks) = value else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for &(choice_id, rank) in ranks {
        if question.choice(choice_id).is_none() || !rank_allowed(question, rank) {
            warn!(question_id = question.id, choice_id, rank, "skipping invalid rank");
            continue;
        }
        rows.push((
            Table::ResponseRank,
            Record::new().with("choice_id", choice_id).with("rank", rank),
        ));
    }
    rows
}

pub(super) fn validate(question: &Question, value: &SubmittedValue) -> Result<(), ValidationError> {
    let SubmittedValue::Ranks(ranks) = value else {
        return Err(ValidationError::InvalidField {
            field: FieldKey::question(question.id).to_string(),
            value: value.type_name().to_string(),
        });
    };

    for &(choice_id, rank) in ranks {
        if question.choice(choice_id).is_none() {
            return Err(ValidationError::UnknownChoice(choice_id.to_string()));
        }
        if !rank_allowed(question, rank) {
            return Err(ValidationError::RankOutOfRange {
                choice_id,
                rank,
                max: scale(question),
            });
        }
    }
    Ok(())
}

pub(super) fn results(
    question: &Question,
    rows: &[Record],
) -> Result<QuestionResults, QuestionnaireError> {
    let mut ranked = Vec::with_capacity(rows.len());
    for row in rows {
        ranked.push((row.get_int("choice_id")?, row.get_int("rank")?));
    }

    let summaries = question
        .choices
        .iter()
        .map(|choice| {
            let ranks: Vec<i64> = ranked
                .iter()
                .filter(|(id, rank)| *id == choice.id && *rank > 0)
                .map(|(_, rank)| *rank)
                .collect();
            let average = if ranks.is_empty() {
                0.0
            } else {
                ranks.iter().sum::<i64>() as f64 / ranks.len() as f64
            };
            RankSummary {
                choice_id: choice.id,
                label: choice.content.clone(),
                average,
                responses: ranks.len(),
            }
        })
        .collect();
    Ok(QuestionResults::Ranks(summaries))
}

pub(super) fn items(rows: &[Record]) -> Result<Vec<ResponseItem>, QuestionnaireError> {
    rows.iter()
        .map(|row| -> Result<ResponseItem, QuestionnaireError> {
            Ok(ResponseItem::Rank {
                choice_id: row.get_int("choice_id")?,
                rank: row.get_int("rank")?,
            })
        })
        .collect()
}

pub(super) fn form_values(question: &Question, items: &[ResponseItem]) -> FormData {
    let mut data = FormData::new();
    for item in items {
        if let ResponseItem::Rank { choice_id, rank } = item {
            data.insert(FieldKey::sub_choice(question.id, *choice_id), rank.to_string());
        }
    }
    data
}
