//! Answer inputs for taking a questionnaire, one renderer per type.

use questionnaire_types::{Choice, FieldKey, FormData, FormValue, Output, QuestionType};

use crate::display::{Descendants, Renderer};
use crate::Question;

const DEFAULT_TEXT_SIZE: i64 = 20;
const DEFAULT_ESSAY_COLS: i64 = 60;
const DEFAULT_ESSAY_ROWS: i64 = 5;
const DEFAULT_DIGITS: i64 = 10;
pub(crate) const DEFAULT_SCALE: i64 = 5;

pub(crate) fn render(
    question: &Question,
    renderer: &mut Renderer<'_>,
    data: &FormData,
    descendants: &Descendants,
) {
    match question.question_type {
        QuestionType::YesNo => yes_no(question, renderer, data, descendants),
        QuestionType::Text => text_box(question, renderer, data),
        QuestionType::Essay => essay(question, renderer, data),
        QuestionType::Radio => radio(question, renderer, data, descendants),
        QuestionType::Check => check_boxes(question, renderer, data),
        QuestionType::Drop => dropdown(question, renderer, data, descendants),
        QuestionType::Rate => rate(question, renderer, data),
        QuestionType::Date => date(question, renderer, data),
        QuestionType::Numeric => numeric(question, renderer, data),
        QuestionType::PageBreak | QuestionType::SectionText => {}
    }
}

fn or_default(value: i64, default: i64) -> i64 {
    if value > 0 { value } else { default }
}

struct RadioInput<'a> {
    name: &'a str,
    id: &'a str,
    value: &'a str,
    checked: bool,
    dependents: &'a str,
}

fn radio_option(out: &mut dyn Output, input: RadioInput<'_>, label: &str) {
    let mut attrs = vec![
        ("type", "radio"),
        ("name", input.name),
        ("id", input.id),
        ("value", input.value),
    ];
    if input.checked {
        attrs.push(("checked", "checked"));
    }
    if !input.dependents.is_empty() {
        attrs.push(("data-dependents", input.dependents));
    }

    out.start_tag("div", &[("class", "qn-radio-option")]);
    out.empty_tag("input", &attrs);
    choice_label(out, input.id, label);
    out.end_tag("div");
}

fn choice_label(out: &mut dyn Output, target: &str, label: &str) {
    out.start_tag("label", &[("for", target)]);
    let formatted = out.format_text(label);
    out.raw(&formatted);
    out.end_tag("label");
}

/// Free-text input next to an "other" choice.
fn other_input(out: &mut dyn Output, question: &Question, choice: &Choice, data: &FormData) {
    let key = FieldKey::sub_choice(question.id, choice.id);
    let id = out.next_id("other");
    let value = data.get_text(&key).unwrap_or_default();
    out.empty_tag(
        "input",
        &[
            ("type", "text"),
            ("name", key.as_str()),
            ("id", id.as_str()),
            ("size", "25"),
            ("value", value),
        ],
    );
}

fn other_label(renderer: &Renderer<'_>, choice: &Choice) -> String {
    choice
        .other_label()
        .map(str::to_string)
        .unwrap_or_else(|| renderer.strings.string("other"))
}

fn yes_no(
    question: &Question,
    renderer: &mut Renderer<'_>,
    data: &FormData,
    descendants: &Descendants,
) {
    let key = FieldKey::question(question.id);
    let current = data.get_text(&key).unwrap_or_default();

    let mut options = vec![
        ("y", renderer.strings.string("yes")),
        ("n", renderer.strings.string("no")),
    ];
    if !question.required {
        options.push(("", renderer.strings.string("noanswer")));
    }

    let out = &mut *renderer.out;
    out.start_tag("div", &[("class", "qn-yesno")]);
    for (value, label) in &options {
        let id = if value.is_empty() {
            format!("{key}_none")
        } else {
            format!("{key}_{value}")
        };
        let dependents = descendants.anchors(value);
        radio_option(
            out,
            RadioInput {
                name: key.as_str(),
                id: &id,
                value,
                checked: current == *value,
                dependents: &dependents,
            },
            label,
        );
    }
    out.end_tag("div");
}

fn text_box(question: &Question, renderer: &mut Renderer<'_>, data: &FormData) {
    let key = FieldKey::question(question.id);
    let id = format!("text{}", question.id);
    let size = or_default(question.length, DEFAULT_TEXT_SIZE).to_string();
    let max_length = question.precise.to_string();
    let value = data.get_text(&key).unwrap_or_default();

    let mut attrs = vec![
        ("type", "text"),
        ("size", size.as_str()),
        ("name", key.as_str()),
        ("id", id.as_str()),
        ("value", value),
    ];
    if question.precise > 0 {
        attrs.push(("maxlength", max_length.as_str()));
    }
    renderer.out.empty_tag("input", &attrs);
}

fn essay(question: &Question, renderer: &mut Renderer<'_>, data: &FormData) {
    let key = FieldKey::question(question.id);
    let id = format!("edit-q{}", question.id);
    let cols = or_default(question.length, DEFAULT_ESSAY_COLS).to_string();
    let rows = or_default(question.precise, DEFAULT_ESSAY_ROWS).to_string();

    let out = &mut *renderer.out;
    out.start_tag(
        "textarea",
        &[
            ("name", key.as_str()),
            ("id", id.as_str()),
            ("rows", rows.as_str()),
            ("cols", cols.as_str()),
        ],
    );
    out.text(data.get_text(&key).unwrap_or_default());
    out.end_tag("textarea");
}

fn radio(
    question: &Question,
    renderer: &mut Renderer<'_>,
    data: &FormData,
    descendants: &Descendants,
) {
    let key = FieldKey::question(question.id);
    let current = data.get_text(&key).unwrap_or_default();
    let other_labels: Vec<String> = question
        .choices
        .iter()
        .map(|c| if c.is_other() { other_label(renderer, c) } else { String::new() })
        .collect();
    let no_answer = renderer.strings.string("noanswer");

    let out = &mut *renderer.out;
    let class = if question.length == 1 {
        "qn-radio qn-horizontal"
    } else {
        "qn-radio qn-vertical"
    };
    out.start_tag("div", &[("class", class)]);

    for (choice, other) in question.choices.iter().zip(&other_labels) {
        let id = format!("{key}_{}", choice.id);
        if choice.is_other() {
            let value = format!("other_{}", choice.id);
            radio_option(
                out,
                RadioInput {
                    name: key.as_str(),
                    id: &id,
                    value: &value,
                    checked: current == value,
                    dependents: "",
                },
                other,
            );
            other_input(out, question, choice, data);
        } else {
            let value = choice.id.to_string();
            let dependents = descendants.anchors(&value);
            radio_option(
                out,
                RadioInput {
                    name: key.as_str(),
                    id: &id,
                    value: &value,
                    checked: current == value,
                    dependents: &dependents,
                },
                &choice.content,
            );
        }
    }

    if !question.required {
        let id = format!("{key}_none");
        radio_option(
            out,
            RadioInput {
                name: key.as_str(),
                id: &id,
                value: "",
                checked: current.is_empty(),
                dependents: "",
            },
            &no_answer,
        );
    }
    out.end_tag("div");
}

fn check_boxes(question: &Question, renderer: &mut Renderer<'_>, data: &FormData) {
    let key = FieldKey::question(question.id);
    let selected: Vec<&str> = match data.get(&key) {
        Some(FormValue::List(values)) => values.iter().map(String::as_str).collect(),
        Some(FormValue::Text(value)) => vec![value.as_str()],
        None => Vec::new(),
    };
    let other_labels: Vec<String> = question
        .choices
        .iter()
        .map(|c| if c.is_other() { other_label(renderer, c) } else { String::new() })
        .collect();
    let name = format!("{key}[]");

    let out = &mut *renderer.out;
    out.start_tag("div", &[("class", "qn-check")]);
    for (choice, other) in question.choices.iter().zip(&other_labels) {
        let id = format!("checkbox_{}_{}", question.id, choice.id);
        let value = if choice.is_other() {
            format!("other_{}", choice.id)
        } else {
            choice.id.to_string()
        };

        let mut attrs = vec![
            ("type", "checkbox"),
            ("name", name.as_str()),
            ("id", id.as_str()),
            ("value", value.as_str()),
        ];
        if selected.contains(&value.as_str()) {
            attrs.push(("checked", "checked"));
        }

        out.start_tag("div", &[("class", "qn-check-option")]);
        out.empty_tag("input", &attrs);
        if choice.is_other() {
            choice_label(out, &id, other);
            other_input(out, question, choice, data);
        } else {
            choice_label(out, &id, &choice.content);
        }
        out.end_tag("div");
    }
    out.end_tag("div");
}

fn dropdown(
    question: &Question,
    renderer: &mut Renderer<'_>,
    data: &FormData,
    descendants: &Descendants,
) {
    let key = FieldKey::question(question.id);
    let id = format!("drop{}", question.id);
    let current = data
        .get_text(&key)
        .and_then(|v| v.split_whitespace().next())
        .unwrap_or_default();
    let choose = renderer.strings.string("choosedots");

    let out = &mut *renderer.out;
    out.start_tag("select", &[("name", key.as_str()), ("id", id.as_str())]);
    out.tag("option", &[("value", "")], &choose);
    for choice in &question.choices {
        let choice_id = choice.id.to_string();
        let anchors = descendants.anchors(&choice_id);
        // Dependent questions ride along in the option value for the page script.
        let value = if anchors.is_empty() {
            choice_id.clone()
        } else {
            format!("{choice_id} {anchors}")
        };

        let mut attrs = vec![("value", value.as_str())];
        if current == choice_id {
            attrs.push(("selected", "selected"));
        }
        out.tag("option", &attrs, &choice.content);
    }
    out.end_tag("select");
}

fn rate(question: &Question, renderer: &mut Renderer<'_>, data: &FormData) {
    let scale = or_default(question.length, DEFAULT_SCALE);
    let not_applicable = question.precise == 1;
    let na_label = renderer.strings.string("notapplicable");

    let out = &mut *renderer.out;
    out.start_tag("table", &[("class", "qn-rate")]);
    out.start_tag("thead", &[]);
    out.start_tag("tr", &[]);
    out.tag("th", &[], "");
    for rank in 1..=scale {
        out.tag("th", &[("class", "qn-rate-rank")], &rank.to_string());
    }
    if not_applicable {
        out.tag("th", &[("class", "qn-rate-na")], &na_label);
    }
    out.end_tag("tr");
    out.end_tag("thead");

    out.start_tag("tbody", &[]);
    for choice in &question.choices {
        let key = FieldKey::sub_choice(question.id, choice.id);
        let current = data.get_text(&key).unwrap_or_default();

        out.start_tag("tr", &[]);
        out.start_tag("td", &[("class", "qn-rate-choice")]);
        let formatted = out.format_text(&choice.content);
        out.raw(&formatted);
        out.end_tag("td");

        let ranks = (1..=scale).chain(not_applicable.then_some(0));
        for rank in ranks {
            let value = rank.to_string();
            let id = format!("{key}_{rank}");
            let mut attrs = vec![
                ("type", "radio"),
                ("name", key.as_str()),
                ("id", id.as_str()),
                ("value", value.as_str()),
            ];
            if current == value {
                attrs.push(("checked", "checked"));
            }
            out.start_tag("td", &[]);
            out.empty_tag("input", &attrs);
            out.end_tag("td");
        }
        out.end_tag("tr");
    }
    out.end_tag("tbody");
    out.end_tag("table");
}

fn date(question: &Question, renderer: &mut Renderer<'_>, data: &FormData) {
    let key = FieldKey::question(question.id);
    let id = format!("date{}", question.id);
    let hint = renderer.strings.string("dateformatting");
    let value = data.get_text(&key).unwrap_or_default();

    let out = &mut *renderer.out;
    out.empty_tag(
        "input",
        &[
            ("type", "text"),
            ("size", "12"),
            ("maxlength", "10"),
            ("name", key.as_str()),
            ("id", id.as_str()),
            ("value", value),
        ],
    );
    out.tag("span", &[("class", "qn-hint")], &hint);
}

fn numeric(question: &Question, renderer: &mut Renderer<'_>, data: &FormData) {
    let key = FieldKey::question(question.id);
    let id = format!("numeric{}", question.id);
    let digits = or_default(question.length, DEFAULT_DIGITS);
    let decimals = if question.precise > 0 { question.precise + 1 } else { 0 };
    // Room for a sign.
    let width = (digits + decimals + 1).to_string();
    let value = data.get_text(&key).unwrap_or_default();

    renderer.out.empty_tag(
        "input",
        &[
            ("type", "text"),
            ("size", width.as_str()),
            ("maxlength", width.as_str()),
            ("name", key.as_str()),
            ("id", id.as_str()),
            ("value", value),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnglishStrings, HtmlOutput};
    use questionnaire_types::{AutoNumbering, RenderContext};

    fn question(question_type: QuestionType, choices: &[(i64, &str)]) -> Question {
        Question {
            id: 4,
            survey_id: 1,
            name: String::new(),
            question_type,
            content: String::new(),
            required: false,
            deleted: false,
            length: 0,
            precise: 0,
            position: 1,
            choices: choices
                .iter()
                .map(|(id, content)| Choice { id: *id, content: content.to_string(), value: None })
                .collect(),
            dependency: None,
        }
    }

    fn body(question: &Question, data: &FormData, descendants: &Descendants) -> String {
        let mut out = HtmlOutput::new();
        let strings = EnglishStrings;
        let mut renderer = Renderer::new(
            &mut out,
            &strings,
            RenderContext::new(AutoNumbering::Both),
        );
        render(question, &mut renderer, data, descendants);
        out.into_string()
    }

    #[test]
    fn yes_no_checks_current_answer_and_lists_dependents() {
        let q = question(QuestionType::YesNo, &[]);
        let mut descendants = Descendants::new();
        descendants.insert("y", 9);
        let html = body(&q, &FormData::new().with("q4", "y"), &descendants);

        assert!(html.contains(
            "<input type=\"radio\" name=\"q4\" id=\"q4_y\" value=\"y\" checked=\"checked\" \
             data-dependents=\"qn-9\" />"
        ));
        assert!(html.contains("<label for=\"q4_n\">No</label>"));
        assert!(html.contains("No answer"));
    }

    #[test]
    fn required_yes_no_has_no_blank_option() {
        let mut q = question(QuestionType::YesNo, &[]);
        q.required = true;
        let html = body(&q, &FormData::new(), &Descendants::new());
        assert!(!html.contains("q4_none"));
    }

    #[test]
    fn text_box_uses_defaults_and_escapes_value() {
        let mut q = question(QuestionType::Text, &[]);
        q.precise = 25;
        let html = body(&q, &FormData::new().with("q4", "a\"b"), &Descendants::new());
        assert_eq!(
            html,
            "<input type=\"text\" size=\"20\" name=\"q4\" id=\"text4\" value=\"a&quot;b\" \
             maxlength=\"25\" />"
        );
    }

    #[test]
    fn essay_renders_textarea() {
        let q = question(QuestionType::Essay, &[]);
        let html = body(&q, &FormData::new().with("q4", "<b>"), &Descendants::new());
        assert_eq!(
            html,
            "<textarea name=\"q4\" id=\"edit-q4\" rows=\"5\" cols=\"60\">&lt;b&gt;</textarea>"
        );
    }

    #[test]
    fn radio_other_choice_gets_text_input() {
        let q = question(QuestionType::Radio, &[(1, "Red"), (2, "!other=Another")]);
        let data = FormData::new().with("q4", "other_2").with("q4_2", "Teal");
        let html = body(&q, &data, &Descendants::new());

        assert!(html.contains("value=\"other_2\" checked=\"checked\""));
        assert!(html.contains("<label for=\"q4_2\">Another</label>"));
        assert!(html.contains(
            "<input type=\"text\" name=\"q4_2\" id=\"other_1\" size=\"25\" value=\"Teal\" />"
        ));
        assert!(html.contains("qn-vertical"));
    }

    #[test]
    fn check_boxes_keep_choice_order() {
        let q = question(QuestionType::Check, &[(3, "C"), (1, "A"), (2, "B")]);
        let html = body(&q, &FormData::new().with("q4", vec!["1", "2"]), &Descendants::new());
        let c = html.find("value=\"3\"").unwrap();
        let a = html.find("value=\"1\"").unwrap();
        let b = html.find("value=\"2\"").unwrap();
        assert!(c < a && a < b);
        assert!(html.contains("id=\"checkbox_4_1\" value=\"1\" checked=\"checked\""));
        assert!(!html.contains("id=\"checkbox_4_3\" value=\"3\" checked"));
    }

    #[test]
    fn dropdown_options_carry_dependents() {
        let q = question(QuestionType::Drop, &[(5, "Five"), (6, "Six")]);
        let mut descendants = Descendants::new();
        descendants.insert("6", 10);
        descendants.insert("6", 11);
        let html = body(&q, &FormData::new().with("q4", "6 qn-10 qn-11"), &descendants);

        assert!(html.contains("<option value=\"\">Choose...</option>"));
        assert!(html.contains("<option value=\"5\">Five</option>"));
        assert!(html.contains(
            "<option value=\"6 qn-10 qn-11\" selected=\"selected\">Six</option>"
        ));
    }

    #[test]
    fn rate_renders_scale_and_na_column() {
        let mut q = question(QuestionType::Rate, &[(1, "Speed")]);
        q.length = 3;
        q.precise = 1;
        let html = body(&q, &FormData::new().with("q4_1", "0"), &Descendants::new());

        assert!(html.contains(
            "<th class=\"qn-rate-rank\">3</th><th class=\"qn-rate-na\">N/A</th>"
        ));
        assert!(html.contains("id=\"q4_1_0\" value=\"0\" checked=\"checked\""));
        assert!(!html.contains("qn-rate-rank\">4<"));
    }

    #[test]
    fn numeric_width_counts_decimals_and_sign() {
        let mut q = question(QuestionType::Numeric, &[]);
        q.length = 4;
        q.precise = 2;
        let html = body(&q, &FormData::new(), &Descendants::new());
        assert!(html.contains("size=\"8\" maxlength=\"8\""));
    }

    #[test]
    fn layout_types_render_nothing() {
        let q = question(QuestionType::PageBreak, &[]);
        assert_eq!(body(&q, &FormData::new(), &Descendants::new()), "");
    }
}
