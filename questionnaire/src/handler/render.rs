//! Result tables.

use questionnaire_types::{ChoiceCount, QuestionResults, QuestionType, Strings};

use crate::Question;
use crate::display::Renderer;

pub(super) fn results(question: &Question, results: &QuestionResults, renderer: &mut Renderer<'_>) {
    let strings = renderer.strings;
    let out = &mut *renderer.out;

    if results.is_empty() {
        out.tag("p", &[("class", "qn-noresponses")], &strings.string("noresponses"));
        return;
    }

    match results {
        QuestionResults::Counts { counts, respondents } => {
            out.start_tag("table", &[("class", "qn-results")]);
            out.start_tag("thead", &[]);
            out.start_tag("tr", &[]);
            out.tag("th", &[], &strings.string("response"));
            out.tag("th", &[], &strings.string("numberofresponses"));
            out.tag("th", &[], "%");
            out.end_tag("tr");
            out.end_tag("thead");

            out.start_tag("tbody", &[]);
            for count in counts {
                let label = count_label(question, count, strings);
                out.start_tag("tr", &[]);
                out.start_tag("td", &[]);
                let formatted = out.format_text(&label);
                out.raw(&formatted);
                out.end_tag("td");
                out.tag("td", &[], &count.count.to_string());
                out.tag("td", &[], &percent(count.count, *respondents));
                out.end_tag("tr");
            }
            out.end_tag("tbody");

            out.start_tag("tfoot", &[]);
            out.start_tag("tr", &[]);
            out.tag("td", &[], &strings.string("total"));
            out.tag("td", &[], &respondents.to_string());
            out.tag("td", &[], "");
            out.end_tag("tr");
            out.end_tag("tfoot");
            out.end_tag("table");
        }
        QuestionResults::Texts(answers) => {
            out.start_tag("ul", &[("class", "qn-text-results")]);
            for answer in answers {
                out.start_tag("li", &[]);
                out.text(&answer.text);
                out.end_tag("li");
            }
            out.end_tag("ul");
        }
        QuestionResults::Ranks(summaries) => {
            out.start_tag("table", &[("class", "qn-results qn-rank-results")]);
            out.start_tag("thead", &[]);
            out.start_tag("tr", &[]);
            out.tag("th", &[], &strings.string("response"));
            out.tag("th", &[], &strings.string("average"));
            out.tag("th", &[], &strings.string("numberofresponses"));
            out.end_tag("tr");
            out.end_tag("thead");

            out.start_tag("tbody", &[]);
            for summary in summaries {
                out.start_tag("tr", &[]);
                out.start_tag("td", &[]);
                let formatted = out.format_text(&summary.label);
                out.raw(&formatted);
                out.end_tag("td");
                out.tag("td", &[], &format!("{:.2}", summary.average));
                out.tag("td", &[], &summary.responses.to_string());
                out.end_tag("tr");
            }
            out.end_tag("tbody");
            out.end_tag("table");
        }
    }
}

fn count_label(question: &Question, count: &ChoiceCount, strings: &dyn Strings) -> String {
    if question.question_type == QuestionType::YesNo {
        return strings.string(if count.label == "y" { "yes" } else { "no" });
    }
    match count.choice_id.and_then(|id| question.choice(id)) {
        Some(choice) if choice.is_other() => choice
            .other_label()
            .map(str::to_string)
            .unwrap_or_else(|| strings.string("other")),
        _ => count.label.clone(),
    }
}

fn percent(count: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{}%", (count * 100 + total / 2) / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnglishStrings, HtmlOutput};
    use questionnaire_types::{AutoNumbering, RenderContext, TextAnswer};

    #[test]
    fn essay_results_are_escaped() {
        let question = Question {
            id: 4,
            survey_id: 1,
            name: String::new(),
            question_type: QuestionType::Essay,
            content: String::new(),
            required: false,
            deleted: false,
            length: 0,
            precise: 0,
            position: 1,
            choices: Vec::new(),
            dependency: None,
        };
        let answers = QuestionResults::Texts(vec![TextAnswer {
            response_id: 1,
            text: "<scr<script>ipt>alert(1)</scr<script>ipt>".to_string(),
        }]);
        let mut out = HtmlOutput::new();
        let strings = EnglishStrings;
        let mut renderer = Renderer::new(
            &mut out,
            &strings,
            RenderContext::new(AutoNumbering::Both),
        );
        results(&question, &answers, &mut renderer);
        let html = out.into_string();

        assert!(!html.contains("<script"));
        assert!(html.contains("<li>&lt;scr&lt;script&gt;ipt&gt;alert(1)"));
    }

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(percent(1, 3), "33%");
        assert_eq!(percent(2, 3), "67%");
        assert_eq!(percent(0, 0), "0%");
    }
}
