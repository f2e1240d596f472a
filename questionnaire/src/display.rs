//! Rendering a question while taking a questionnaire or viewing a response.
//!
//! Every question is wrapped the same way: a fieldset whose class comes from
//! [`display_class`], a legend with the number and required marker, the
//! question text, and the type-specific body.

use std::collections::BTreeMap;

use questionnaire_types::{
    FieldKey, FormData, Output, QuestionId, QuestionType, RenderContext, Strings,
};

use crate::markup::{escape_html, is_blank_html};
use crate::visibility::display_class;
use crate::{Question, body, response_body};

/// The collaborators of one render pass.
pub struct Renderer<'a> {
    pub out: &'a mut dyn Output,
    pub strings: &'a dyn Strings,
    pub ctx: RenderContext,
}

impl<'a> Renderer<'a> {
    pub fn new(out: &'a mut dyn Output, strings: &'a dyn Strings, ctx: RenderContext) -> Self {
        Self { out, strings, ctx }
    }
}

/// Questions that depend on a parent, grouped by the parent answer that
/// shows them (`"y"`/`"n"` for yes/no parents, the choice id otherwise).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descendants {
    by_answer: BTreeMap<String, Vec<QuestionId>>,
}

impl Descendants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, answer: impl Into<String>, question_id: QuestionId) {
        self.by_answer.entry(answer.into()).or_default().push(question_id);
    }

    /// Questions shown by this parent answer.
    pub fn for_answer(&self, answer: &str) -> &[QuestionId] {
        self.by_answer.get(answer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Anchors of the questions shown by this answer, space separated.
    pub fn anchors(&self, answer: &str) -> String {
        self.for_answer(answer)
            .iter()
            .map(|id| format!("qn-{id}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.by_answer.is_empty()
    }
}

impl Question {
    /// Render this question for taking.
    ///
    /// `blank` renders it without any of the submitted values, as for a
    /// printable copy.
    pub fn survey_display(
        &self,
        renderer: &mut Renderer<'_>,
        data: &FormData,
        descendants: &Descendants,
        qnum: &str,
        blank: bool,
    ) {
        self.question_start(renderer, data, qnum);
        let empty = FormData::new();
        let values = if blank { &empty } else { data };
        body::render(self, renderer, values, descendants);
        self.question_end(renderer);
    }

    /// Render this question with a stored answer, read-only.
    pub fn response_display(&self, renderer: &mut Renderer<'_>, data: &FormData, qnum: &str) {
        self.question_start(renderer, data, qnum);
        response_body::render(self, renderer, data);
        self.question_end(renderer);
    }

    fn question_start(&self, renderer: &mut Renderer<'_>, data: &FormData, qnum: &str) {
        let ctx = renderer.ctx;
        let numbering = ctx.numbering();

        // In reports a dependent question nobody reached is shown as skipped.
        let skipped = ctx.page.is_report()
            && numbering
            && !data.is_empty()
            && self.dependency.is_some()
            && !data.contains(&FieldKey::question(self.id));

        let container_class = display_class(self, data, &ctx).as_str();
        let anchor = self.anchor();
        let out = &mut *renderer.out;

        out.start_tag("fieldset", &[("class", container_class), ("id", anchor.as_str())]);
        out.start_tag("legend", &[("class", "qn-legend")]);

        if self.question_type != QuestionType::SectionText {
            if numbering {
                out.start_tag("div", &[("class", "qn-info")]);
                out.tag(
                    "div",
                    &[("class", "accesshide")],
                    &renderer.strings.string("questionnum"),
                );
                out.start_tag("h2", &[("class", "qn-number")]);
                if skipped {
                    out.raw(&format!(
                        "<span class=\"unselected\">({})</span>",
                        escape_html(qnum)
                    ));
                } else {
                    out.text(qnum);
                }
                out.end_tag("h2");
                out.end_tag("div");
            }
            if self.required {
                let label = renderer.strings.string("required");
                out.tag("div", &[("class", "accesshide")], &label);
                out.tag("span", &[("class", "req"), ("title", label.as_str())], "*");
            }
        }
        out.end_tag("legend");

        out.start_tag("div", &[("class", "qn-content")]);
        let question_class = if skipped { "qn-question unselected" } else { "qn-question" };
        out.start_tag("div", &[("class", question_class)]);
        match self.label_target() {
            Some(target) => {
                out.start_tag("label", &[("for", target.as_str())]);
                self.write_content(out);
                out.end_tag("label");
            }
            None => self.write_content(out),
        }
        out.end_tag("div");
        out.start_tag("div", &[("class", "qn-answer")]);
    }

    fn question_end(&self, renderer: &mut Renderer<'_>) {
        let out = &mut *renderer.out;
        out.end_tag("div");
        out.end_tag("div");
        out.end_tag("fieldset");
    }

    fn write_content(&self, out: &mut dyn Output) {
        if !is_blank_html(&self.content) {
            let formatted = out.format_text(&self.content);
            out.raw(&formatted);
        }
    }

    /// The id of the input the question text labels, for single-input types.
    pub(crate) fn label_target(&self) -> Option<String> {
        match self.question_type {
            QuestionType::Text => Some(format!("text{}", self.id)),
            QuestionType::Essay => Some(format!("edit-q{}", self.id)),
            QuestionType::Drop => Some(format!("drop{}", self.id)),
            QuestionType::Numeric => Some(format!("numeric{}", self.id)),
            QuestionType::Date => Some(format!("date{}", self.id)),
            _ => None,
        }
    }
}
