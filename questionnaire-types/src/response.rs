use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{ChoiceId, QuestionId, QuestionType, SubmissionId};

/// One collected answer item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResponseItem {
    /// A yes/no answer.
    Boolean(bool),
    /// Free text (text, essay, numeric).
    Text(String),
    /// A date exactly as entered.
    Date(String),
    /// A selected choice.
    Choice {
        choice_id: ChoiceId,
        content: String,
    },
    /// The rank given to one rating choice.
    Rank { choice_id: ChoiceId, rank: i64 },
    /// Free text typed next to an "other" choice.
    Other { choice_id: ChoiceId, text: String },
}

/// Fields shared by every response container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseHeader {
    pub question_id: QuestionId,
    pub question_type: QuestionType,
    /// The submission this answer belongs to.
    pub response_id: SubmissionId,
    /// When the submission was made, if it was completed.
    pub submitted: Option<DateTime<Utc>>,
    /// The responder's identity.
    pub user: String,
    pub grade: Option<i64>,
}

/// Read access shared by single and multiple response containers.
pub trait Response {
    fn header(&self) -> &ResponseHeader;

    /// The collected items, in order.
    fn items(&self) -> &[ResponseItem];

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// A container holding at most one answer item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleResponse {
    header: ResponseHeader,
    item: Option<ResponseItem>,
}

impl SingleResponse {
    pub fn new(header: ResponseHeader) -> Self {
        Self { header, item: None }
    }

    /// Replace the held item.
    pub fn set(&mut self, item: ResponseItem) {
        self.item = Some(item);
    }

    pub fn item(&self) -> Option<&ResponseItem> {
        self.item.as_ref()
    }
}

impl Response for SingleResponse {
    fn header(&self) -> &ResponseHeader {
        &self.header
    }

    fn items(&self) -> &[ResponseItem] {
        self.item.as_slice()
    }
}

/// A container holding an ordered sequence of answer items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipleResponse {
    header: ResponseHeader,
    items: Vec<ResponseItem>,
}

impl MultipleResponse {
    pub fn new(header: ResponseHeader) -> Self {
        Self {
            header,
            items: Vec::new(),
        }
    }

    /// Append an item.
    pub fn push(&mut self, item: ResponseItem) {
        self.items.push(item);
    }

    /// Replace all items.
    pub fn set_all(&mut self, items: Vec<ResponseItem>) {
        self.items = items;
    }
}

impl Response for MultipleResponse {
    fn header(&self) -> &ResponseHeader {
        &self.header
    }

    fn items(&self) -> &[ResponseItem] {
        &self.items
    }
}

/// Either container shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResponseRecord {
    Single(SingleResponse),
    Multiple(MultipleResponse),
}

impl Response for ResponseRecord {
    fn header(&self) -> &ResponseHeader {
        match self {
            Self::Single(r) => r.header(),
            Self::Multiple(r) => r.header(),
        }
    }

    fn items(&self) -> &[ResponseItem] {
        match self {
            Self::Single(r) => r.items(),
            Self::Multiple(r) => r.items(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> ResponseHeader {
        ResponseHeader {
            question_id: 1,
            question_type: QuestionType::Check,
            response_id: 7,
            submitted: None,
            user: "student1".to_string(),
            grade: None,
        }
    }

    #[test]
    fn single_set_replaces() {
        let mut response = SingleResponse::new(header());
        assert!(response.is_empty());

        response.set(ResponseItem::Text("first".into()));
        response.set(ResponseItem::Text("second".into()));

        assert_eq!(response.items(), &[ResponseItem::Text("second".into())]);
    }

    #[test]
    fn multiple_push_keeps_order() {
        let mut response = MultipleResponse::new(header());
        response.push(ResponseItem::Rank { choice_id: 3, rank: 1 });
        response.push(ResponseItem::Rank { choice_id: 1, rank: 5 });
        response.push(ResponseItem::Rank { choice_id: 2, rank: 2 });

        let ids: Vec<_> = response
            .items()
            .iter()
            .map(|item| match item {
                ResponseItem::Rank { choice_id, .. } => *choice_id,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn multiple_set_all_replaces() {
        let mut response = MultipleResponse::new(header());
        response.push(ResponseItem::Text("old".into()));
        response.set_all(vec![ResponseItem::Text("a".into()), ResponseItem::Text("b".into())]);
        assert_eq!(response.items().len(), 2);
        assert_eq!(response.header().user, "student1");
    }
}
