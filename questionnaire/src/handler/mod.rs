//! Response handlers: how each kind of answer is stored, read back and
//! aggregated.
//!
//! A handler is chosen by [`ResponseKind`]; the kind-specific work lives in
//! one submodule per storage shape.

mod boolean;
mod choice;
mod rank;
mod render;
mod text;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use questionnaire_types::{
    FormData, MultipleResponse, Query, QuestionResults, QuestionnaireError, Record,
    ResponseHeader, ResponseItem, ResponseKind, ResponseRecord, SingleResponse, Storage,
    SubmissionId, SubmittedValue, Table,
};
use tracing::{debug, warn};

use crate::display::Renderer;
use crate::{Question, ValidationError};

/// Stores, reads and aggregates the answers of one response kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHandler {
    kind: ResponseKind,
}

impl ResponseHandler {
    pub fn new(kind: ResponseKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// The table this handler writes answer rows to.
    pub fn table(&self) -> Table {
        self.kind.table()
    }

    /// Write an answer; returns how many rows were stored.
    ///
    /// Empty answers and items that do not belong to the question are
    /// skipped.
    pub fn insert<S: Storage>(
        &self,
        question: &Question,
        storage: &mut S,
        response_id: SubmissionId,
        value: &SubmittedValue,
    ) -> Result<usize, QuestionnaireError> {
        if value.is_empty() {
            return Ok(0);
        }

        let rows = match self.kind {
            ResponseKind::Boolean => boolean::rows(question, value),
            ResponseKind::Text | ResponseKind::Date => text::rows(question, value),
            ResponseKind::Single | ResponseKind::Multiple => {
                choice::rows(question, value, self.kind.is_multiple())
            }
            ResponseKind::Rank => rank::rows(question, value),
        };

        let mut written = 0;
        for (table, row) in rows {
            let row = row
                .with("response_id", response_id)
                .with("question_id", question.id);
            storage.insert(table, row).map_err(QuestionnaireError::storage)?;
            written += 1;
        }
        debug!(question_id = question.id, response_id, written, "stored answer");
        Ok(written)
    }

    /// Check an answer against the question's constraints.
    pub fn validate(
        &self,
        question: &Question,
        value: &SubmittedValue,
    ) -> Result<(), ValidationError> {
        if value.is_empty() {
            return Ok(());
        }
        match self.kind {
            ResponseKind::Boolean => boolean::validate(value),
            ResponseKind::Text | ResponseKind::Date => text::validate(question, value),
            ResponseKind::Single | ResponseKind::Multiple => {
                choice::validate(question, value, self.kind.is_multiple())
            }
            ResponseKind::Rank => rank::validate(question, value),
        }
    }

    /// Aggregate stored answers, optionally limited to some submissions.
    pub fn results<S: Storage>(
        &self,
        question: &Question,
        storage: &S,
        response_ids: Option<&[SubmissionId]>,
    ) -> Result<QuestionResults, QuestionnaireError> {
        let rows = fetch_rows(storage, self.table(), question, response_ids)?;
        match self.kind {
            ResponseKind::Boolean => boolean::results(&rows),
            ResponseKind::Text | ResponseKind::Date => text::results(&rows),
            ResponseKind::Single | ResponseKind::Multiple => choice::results(question, &rows),
            ResponseKind::Rank => rank::results(question, &rows),
        }
    }

    /// Stored answers as containers, one per submission, ordered by
    /// submission id.
    pub fn responses<S: Storage>(
        &self,
        question: &Question,
        storage: &S,
        response_ids: Option<&[SubmissionId]>,
    ) -> Result<Vec<ResponseRecord>, QuestionnaireError> {
        let rows = fetch_rows(storage, self.table(), question, response_ids)?;
        let others = self.fetch_others(storage, question, response_ids)?;

        let mut grouped: BTreeMap<SubmissionId, (Vec<Record>, Vec<Record>)> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.get_int("response_id")?).or_default().0.push(row);
        }
        for row in others {
            grouped.entry(row.get_int("response_id")?).or_default().1.push(row);
        }

        let ids: Vec<SubmissionId> = grouped.keys().copied().collect();
        let headers = submission_headers(storage, question, &ids)?;

        let mut records = Vec::with_capacity(grouped.len());
        for (response_id, (answers, others)) in grouped {
            let Some(header) = headers.get(&response_id).cloned() else {
                warn!(response_id, question_id = question.id, "answer rows without a submission");
                continue;
            };
            let items = self.items(question, &answers, &others)?;
            records.push(self.container(header, items));
        }
        Ok(records)
    }

    /// One stored submission's answer as form fields.
    pub fn form_values<S: Storage>(
        &self,
        question: &Question,
        storage: &S,
        response_id: SubmissionId,
    ) -> Result<FormData, QuestionnaireError> {
        let ids = [response_id];
        let rows = fetch_rows(storage, self.table(), question, Some(&ids[..]))?;
        let others = self.fetch_others(storage, question, Some(&ids[..]))?;
        let items = self.items(question, &rows, &others)?;
        Ok(match self.kind {
            ResponseKind::Boolean => boolean::form_values(question, &items),
            ResponseKind::Text | ResponseKind::Date => text::form_values(question, &items),
            ResponseKind::Single | ResponseKind::Multiple => {
                choice::form_values(question, &items, self.kind.is_multiple())
            }
            ResponseKind::Rank => rank::form_values(question, &items),
        })
    }

    /// Render aggregated answers.
    pub fn display_results(
        &self,
        question: &Question,
        results: &QuestionResults,
        renderer: &mut Renderer<'_>,
    ) {
        render::results(question, results, renderer);
    }

    fn items(
        &self,
        question: &Question,
        answers: &[Record],
        others: &[Record],
    ) -> Result<Vec<ResponseItem>, QuestionnaireError> {
        match self.kind {
            ResponseKind::Boolean => boolean::items(answers),
            ResponseKind::Text => text::items(answers, false),
            ResponseKind::Date => text::items(answers, true),
            ResponseKind::Single | ResponseKind::Multiple => {
                choice::items(question, answers, others)
            }
            ResponseKind::Rank => rank::items(answers),
        }
    }

    fn container(&self, header: ResponseHeader, items: Vec<ResponseItem>) -> ResponseRecord {
        if self.kind.is_multiple() {
            let mut response = MultipleResponse::new(header);
            response.set_all(items);
            ResponseRecord::Multiple(response)
        } else {
            let mut response = SingleResponse::new(header);
            for item in items {
                response.set(item);
            }
            ResponseRecord::Single(response)
        }
    }

    fn fetch_others<S: Storage>(
        &self,
        storage: &S,
        question: &Question,
        response_ids: Option<&[SubmissionId]>,
    ) -> Result<Vec<Record>, QuestionnaireError> {
        match self.kind {
            ResponseKind::Single | ResponseKind::Multiple => {
                fetch_rows(storage, Table::ResponseOther, question, response_ids)
            }
            _ => Ok(Vec::new()),
        }
    }
}

fn fetch_rows<S: Storage>(
    storage: &S,
    table: Table,
    question: &Question,
    response_ids: Option<&[SubmissionId]>,
) -> Result<Vec<Record>, QuestionnaireError> {
    let mut query = Query::new(table)
        .filter("question_id", question.id)
        .order_by("response_id")
        .order_by("id");
    if let Some(ids) = response_ids {
        query = query.filter_in("response_id", ids.iter().copied());
    }
    storage.fetch(&query).map_err(QuestionnaireError::storage)
}

fn submission_headers<S: Storage>(
    storage: &S,
    question: &Question,
    response_ids: &[SubmissionId],
) -> Result<BTreeMap<SubmissionId, ResponseHeader>, QuestionnaireError> {
    if response_ids.is_empty() {
        return Ok(BTreeMap::new());
    }
    let rows = storage
        .fetch(&Query::new(Table::Response).filter_in("id", response_ids.iter().copied()))
        .map_err(QuestionnaireError::storage)?;

    let mut headers = BTreeMap::new();
    for row in rows {
        let response_id = row.id()?;
        let complete = row.get_opt_str("complete")? == Some("y");
        let submitted = row
            .get_opt_str("submitted")?
            .filter(|_| complete)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|time| time.with_timezone(&Utc));
        headers.insert(
            response_id,
            ResponseHeader {
                question_id: question.id,
                question_type: question.question_type,
                response_id,
                submitted,
                user: row.get_opt_str("username")?.unwrap_or_default().to_string(),
                grade: row.get_opt_int("grade")?,
            },
        );
    }
    Ok(headers)
}
