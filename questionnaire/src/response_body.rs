//! Read-only answer rendering for stored submissions.

use questionnaire_types::{FieldKey, FormData, FormValue, QuestionType};

use crate::Question;
use crate::display::Renderer;
use crate::question::other_choice_id;

pub(crate) fn render(question: &Question, renderer: &mut Renderer<'_>, data: &FormData) {
    let key = FieldKey::question(question.id);
    match question.question_type {
        QuestionType::YesNo => {
            let current = data.get_text(&key).unwrap_or_default();
            let yes = renderer.strings.string("yes");
            let no = renderer.strings.string("no");
            let out = &mut *renderer.out;
            out.start_tag("div", &[("class", "response yesno")]);
            out.tag("span", &[("class", selected_class(current == "y"))], &yes);
            out.tag("span", &[("class", selected_class(current == "n"))], &no);
            out.end_tag("div");
        }
        QuestionType::Text | QuestionType::Numeric | QuestionType::Date => {
            let out = &mut *renderer.out;
            out.start_tag("div", &[("class", "response text")]);
            if let Some(value) = data.get_text(&key).filter(|v| !v.is_empty()) {
                out.tag("span", &[("class", "selected")], value);
            }
            out.end_tag("div");
        }
        QuestionType::Essay => {
            let out = &mut *renderer.out;
            out.start_tag("div", &[("class", "response text")]);
            if let Some(value) = data.get_text(&key) {
                out.text(value);
            }
            out.end_tag("div");
        }
        QuestionType::Radio | QuestionType::Drop | QuestionType::Check => {
            let selected: Vec<&str> = match data.get(&key) {
                Some(FormValue::List(values)) => values.iter().map(String::as_str).collect(),
                Some(FormValue::Text(value)) => value.split_whitespace().take(1).collect(),
                None => Vec::new(),
            };
            let default_other = renderer.strings.string("other");
            let out = &mut *renderer.out;
            out.start_tag("div", &[("class", "response choices")]);
            for choice in &question.choices {
                let chosen = selected.iter().any(|value| {
                    *value == choice.id.to_string() || other_choice_id(value) == Some(choice.id)
                });
                out.start_tag("div", &[("class", selected_class(chosen))]);
                if choice.is_other() {
                    out.text(choice.other_label().unwrap_or(&default_other));
                    let text = data
                        .get_text(&FieldKey::sub_choice(question.id, choice.id))
                        .filter(|_| chosen);
                    if let Some(text) = text {
                        out.text(" ");
                        out.tag("span", &[("class", "response other")], text);
                    }
                } else {
                    let formatted = out.format_text(&choice.content);
                    out.raw(&formatted);
                }
                out.end_tag("div");
            }
            out.end_tag("div");
        }
        QuestionType::Rate => {
            let na = renderer.strings.string("notapplicable");
            let out = &mut *renderer.out;
            out.start_tag("table", &[("class", "response rate")]);
            for choice in &question.choices {
                let rank = data
                    .get_text(&FieldKey::sub_choice(question.id, choice.id))
                    .unwrap_or_default();
                out.start_tag("tr", &[]);
                out.start_tag("td", &[]);
                let formatted = out.format_text(&choice.content);
                out.raw(&formatted);
                out.end_tag("td");
                let shown = if rank == "0" { na.as_str() } else { rank };
                out.tag("td", &[("class", selected_class(!rank.is_empty()))], shown);
                out.end_tag("tr");
            }
            out.end_tag("table");
        }
        QuestionType::PageBreak | QuestionType::SectionText => {}
    }
}

fn selected_class(selected: bool) -> &'static str {
    if selected { "selected" } else { "unselected" }
}
