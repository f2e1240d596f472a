use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{ChoiceId, SubmissionId};

/// Row order for displayed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Choice order.
    #[default]
    Default,
    /// Fewest answers first.
    Ascending,
    /// Most answers first.
    Descending,
}

impl SortOrder {
    /// Parse a sort keyword; anything unrecognized keeps choice order.
    pub fn parse(keyword: &str) -> Self {
        match keyword {
            "ascending" => Self::Ascending,
            "descending" => Self::Descending,
            _ => Self::Default,
        }
    }
}

/// How many submissions picked one answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceCount {
    pub choice_id: Option<ChoiceId>,
    pub label: String,
    pub count: usize,
}

/// Average rank given to one rating choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSummary {
    pub choice_id: ChoiceId,
    pub label: String,
    pub average: f64,
    pub responses: usize,
}

/// One free-text answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnswer {
    pub response_id: SubmissionId,
    pub text: String,
}

/// Aggregated answers to one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QuestionResults {
    /// Per-choice counts (yes/no, radio, dropdown, check boxes).
    Counts {
        counts: Vec<ChoiceCount>,
        /// Distinct submissions that answered.
        respondents: usize,
    },
    /// Every free-text answer (text, essay, numeric, date).
    Texts(Vec<TextAnswer>),
    /// Per-choice averages (rating scales).
    Ranks(Vec<RankSummary>),
}

impl QuestionResults {
    /// Reorder rows by the given sort order. Choice order is left untouched.
    pub fn sort(&mut self, order: SortOrder) {
        let direction = |a: usize, b: usize| match order {
            SortOrder::Default => Ordering::Equal,
            SortOrder::Ascending => a.cmp(&b),
            SortOrder::Descending => b.cmp(&a),
        };
        match self {
            Self::Counts { counts, .. } => {
                counts.sort_by(|a, b| direction(a.count, b.count));
            }
            Self::Ranks(ranks) => {
                ranks.sort_by(|a, b| match order {
                    SortOrder::Default => Ordering::Equal,
                    SortOrder::Ascending => a.average.total_cmp(&b.average),
                    SortOrder::Descending => b.average.total_cmp(&a.average),
                });
            }
            Self::Texts(_) => {}
        }
    }

    /// Whether nobody answered.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Counts { respondents, .. } => *respondents == 0,
            Self::Texts(texts) => texts.is_empty(),
            Self::Ranks(ranks) => ranks.iter().all(|r| r.responses == 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> QuestionResults {
        QuestionResults::Counts {
            counts: vec![
                ChoiceCount { choice_id: Some(1), label: "One".into(), count: 2 },
                ChoiceCount { choice_id: Some(2), label: "Two".into(), count: 5 },
                ChoiceCount { choice_id: Some(3), label: "Three".into(), count: 1 },
            ],
            respondents: 8,
        }
    }

    fn labels(results: &QuestionResults) -> Vec<String> {
        match results {
            QuestionResults::Counts { counts, .. } => {
                counts.iter().map(|c| c.label.clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    #[test]
    fn default_sort_keeps_choice_order() {
        let mut results = counts();
        results.sort(SortOrder::Default);
        assert_eq!(labels(&results), ["One", "Two", "Three"]);
    }

    #[test]
    fn descending_sort_puts_most_popular_first() {
        let mut results = counts();
        results.sort(SortOrder::Descending);
        assert_eq!(labels(&results), ["Two", "One", "Three"]);
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(SortOrder::parse("ascending"), SortOrder::Ascending);
        assert_eq!(SortOrder::parse(""), SortOrder::Default);
    }
}
