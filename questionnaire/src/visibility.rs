//! Whether a dependent question starts out shown or hidden.

use std::sync::LazyLock;

use questionnaire_types::{Dependency, FieldKey, FormData, QuestionType, RenderContext};
use regex::Regex;

use crate::Question;

/// The container class of a rendered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayClass {
    Visible,
    Hidden,
}

impl DisplayClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "qn-container",
            Self::Hidden => "hidedependquestion",
        }
    }
}

// Whole-id match: qn-5 must not match qn-55.
static ANCHOR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bqn-(\d+)\b").expect("regex"));

/// Decide the container class of `question` for this render pass.
///
/// Dependent questions are hidden only where the context hides dependents,
/// and only while nothing in the submitted data satisfies them.
pub fn display_class(question: &Question, data: &FormData, ctx: &RenderContext) -> DisplayClass {
    if !ctx.hides_dependents() {
        return DisplayClass::Visible;
    }
    match question.dependency() {
        Some(dependency) if !dependency_satisfied(question, dependency, data) => {
            DisplayClass::Hidden
        }
        _ => DisplayClass::Visible,
    }
}

/// Whether the submitted data shows a dependent question.
///
/// It is shown when it already has an answer of its own, when the parent
/// holds the expected answer, or when a dropdown parent's selected option
/// lists this question.
pub fn dependency_satisfied(question: &Question, dependency: &Dependency, data: &FormData) -> bool {
    if data.is_truthy(&FieldKey::question(question.id())) {
        return true;
    }

    if question.question_type() == QuestionType::Rate
        && question
            .choices()
            .iter()
            .any(|c| data.contains(&FieldKey::sub_choice(question.id(), c.id)))
    {
        return true;
    }

    let Some(parent_answer) = data.get_text(&dependency.parent_key()) else {
        return false;
    };
    if parent_answer == dependency.expected_answer() {
        return true;
    }

    dependency.parent_type == QuestionType::Drop
        && ANCHOR_ID
            .captures_iter(parent_answer)
            .filter_map(|caps| caps[1].parse().ok())
            .any(|id: i64| id == question.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use questionnaire_types::{AutoNumbering, Choice, PageKind, ReportTab};

    fn question(id: i64, question_type: QuestionType, parent_type: QuestionType) -> Question {
        Question {
            id,
            survey_id: 1,
            name: String::new(),
            question_type,
            content: String::new(),
            required: false,
            deleted: false,
            length: 0,
            precise: 0,
            position: 0,
            choices: Vec::new(),
            dependency: Some(Dependency {
                question_id: 1,
                choice_id: 0,
                parent_type,
            }),
        }
    }

    fn preview() -> RenderContext {
        RenderContext::new(AutoNumbering::Both).with_page(PageKind::Preview)
    }

    #[test]
    fn independent_questions_are_visible() {
        let mut q = question(5, QuestionType::Text, QuestionType::YesNo);
        q.dependency = None;
        assert_eq!(display_class(&q, &FormData::new(), &preview()), DisplayClass::Visible);
    }

    #[test]
    fn unsatisfied_dependent_is_hidden_in_preview() {
        let q = question(5, QuestionType::Text, QuestionType::YesNo);
        assert_eq!(display_class(&q, &FormData::new(), &preview()), DisplayClass::Hidden);
        assert_eq!(DisplayClass::Hidden.as_str(), "hidedependquestion");
    }

    #[test]
    fn yes_answer_on_parent_shows_child() {
        let q = question(5, QuestionType::Text, QuestionType::YesNo);
        let data = FormData::new().with("q1", "y");
        assert_eq!(display_class(&q, &data, &preview()), DisplayClass::Visible);

        let data = FormData::new().with("q1", "n");
        assert_eq!(display_class(&q, &data, &preview()), DisplayClass::Hidden);
    }

    #[test]
    fn own_answer_shows_child() {
        let q = question(5, QuestionType::Text, QuestionType::YesNo);
        let data = FormData::new().with("q5", "typed");
        assert_eq!(display_class(&q, &data, &preview()), DisplayClass::Visible);
    }

    #[test]
    fn rate_sub_answer_shows_child() {
        let mut q = question(5, QuestionType::Rate, QuestionType::Radio);
        q.choices = vec![Choice { id: 9, content: "A".into(), value: None }];
        let data = FormData::new().with("q5_9", "2");
        assert_eq!(display_class(&q, &data, &preview()), DisplayClass::Visible);
    }

    #[test]
    fn dropdown_option_lists_child() {
        let q = question(5, QuestionType::Text, QuestionType::Drop);
        let data = FormData::new().with("q1", "12 qn-5 qn-6");
        assert_eq!(display_class(&q, &data, &preview()), DisplayClass::Visible);

        let data = FormData::new().with("q1", "12 qn-55");
        assert_eq!(display_class(&q, &data, &preview()), DisplayClass::Hidden);
    }

    #[test]
    fn view_page_never_hides() {
        let q = question(5, QuestionType::Text, QuestionType::YesNo);
        let ctx = RenderContext::new(AutoNumbering::Both);
        assert_eq!(display_class(&q, &FormData::new(), &ctx), DisplayClass::Visible);
    }

    #[test]
    fn response_tabs_hide_when_unnumbered() {
        let q = question(5, QuestionType::Text, QuestionType::YesNo);
        let ctx = RenderContext::new(AutoNumbering::None)
            .with_page(PageKind::Report)
            .with_tab(ReportTab::IndividualResponse);
        assert_eq!(display_class(&q, &FormData::new(), &ctx), DisplayClass::Hidden);

        let numbered = RenderContext::new(AutoNumbering::Questions)
            .with_page(PageKind::Report)
            .with_tab(ReportTab::IndividualResponse);
        assert_eq!(display_class(&q, &FormData::new(), &numbered), DisplayClass::Visible);
    }
}
