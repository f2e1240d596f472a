//! The question edit form.
//!
//! Elements are appended in a fixed order: header, name, required, length,
//! precision, dependencies, content, then choices for types that have them.
//! The length, precision and dependency slots are filled per type.

use questionnaire_types::{FormBuilder, FormElement, FormOption, QuestionType, Strings};

use crate::Question;

/// What the edit form needs beyond the question itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditContext {
    /// Whether the survey allows dependencies.
    pub navigate: bool,
    /// Parent answers a question may depend on, as `"question_id,choice_id"`
    /// options.
    pub parents: Vec<FormOption>,
}

impl EditContext {
    pub fn new(navigate: bool) -> Self {
        Self {
            navigate,
            parents: Vec::new(),
        }
    }

    pub fn with_parents(mut self, parents: Vec<FormOption>) -> Self {
        self.parents = parents;
        self
    }
}

fn text_field(name: &str, label: String, value: i64, help: &str) -> FormElement {
    FormElement::Text {
        name: name.to_string(),
        label,
        value: value.to_string(),
        size: 2,
        max_length: Some(3),
        help: Some(help.to_string()),
    }
}

fn hidden(name: &str, value: impl Into<String>) -> FormElement {
    FormElement::Hidden {
        name: name.to_string(),
        value: value.into(),
    }
}

fn default_to(value: i64, default: i64) -> i64 {
    if value == 0 { default } else { value }
}

impl Question {
    /// Append this question's edit form to `form`.
    ///
    /// Returns the choices joined one per line, as placed in the choices
    /// textarea.
    pub fn build_edit_form(
        &self,
        form: &mut dyn FormBuilder,
        strings: &dyn Strings,
        ctx: &EditContext,
    ) -> String {
        let type_label = strings.string(self.type_label_key());
        let header = if self.id != 0 {
            strings.string_with("editquestion", &type_label)
        } else {
            strings.string_with("addnewquestion", &type_label)
        };
        form.add(FormElement::Header {
            name: "questionhdredit".to_string(),
            label: header,
            help: Some(self.type_label_key().to_string()),
        });

        self.form_name(form, strings);
        self.form_required(form, strings);
        self.form_length(form, strings);
        self.form_precise(form, strings);
        self.form_dependencies(form, strings, ctx);

        form.add(FormElement::Editor {
            name: "content".to_string(),
            label: strings.string("text"),
            value: self.content.clone(),
            required: true,
        });

        let all_choices = self.all_choices();
        if self.has_choices() {
            form.add(FormElement::Html("<div class=\"qoptcontainer\">".to_string()));
            form.add(FormElement::Textarea {
                name: "allchoices".to_string(),
                label: strings.string("possibleanswers"),
                value: all_choices.clone(),
                required: true,
                help: Some(self.type_label_key().to_string()),
            });
            form.add(FormElement::Html("</div>".to_string()));
            form.add(hidden("num_choices", self.choices.len().to_string()));
        }
        all_choices
    }

    fn form_name(&self, form: &mut dyn FormBuilder, strings: &dyn Strings) {
        if self.question_type == QuestionType::SectionText {
            form.add(hidden("name", self.name.as_str()));
            return;
        }
        form.add(FormElement::Text {
            name: "name".to_string(),
            label: strings.string("optionalname"),
            value: self.name.clone(),
            size: 30,
            max_length: Some(30),
            help: Some("optionalname".to_string()),
        });
    }

    fn form_required(&self, form: &mut dyn FormBuilder, strings: &dyn Strings) {
        if self.question_type == QuestionType::SectionText {
            form.add(hidden("required", "n"));
            return;
        }
        form.add(FormElement::RadioGroup {
            name: "required".to_string(),
            label: strings.string("required"),
            options: vec![
                FormOption::new("y", strings.string("yes")),
                FormOption::new("n", strings.string("no")),
            ],
            selected: Some(if self.required { "y" } else { "n" }.to_string()),
            help: Some("required".to_string()),
        });
    }

    fn form_length(&self, form: &mut dyn FormBuilder, strings: &dyn Strings) {
        let element = match self.question_type {
            QuestionType::Text => text_field(
                "length",
                strings.string("fieldlength"),
                default_to(self.length, 20),
                "fieldlength",
            ),
            QuestionType::Essay => text_field(
                "length",
                strings.string("textareacolumns"),
                default_to(self.length, 60),
                "textareacolumns",
            ),
            QuestionType::Numeric => text_field(
                "length",
                strings.string("maxdigitsallowed"),
                default_to(self.length, 10),
                "maxdigitsallowed",
            ),
            QuestionType::Rate => text_field(
                "length",
                strings.string("numberscaleitems"),
                default_to(self.length, 5),
                "numberscaleitems",
            ),
            QuestionType::Check => text_field(
                "length",
                strings.string("minforcedresponses"),
                self.length,
                "minforcedresponses",
            ),
            QuestionType::Radio => FormElement::RadioGroup {
                name: "length".to_string(),
                label: strings.string("alignment"),
                options: vec![
                    FormOption::new("0", strings.string("vertical")),
                    FormOption::new("1", strings.string("horizontal")),
                ],
                selected: Some(if self.length == 1 { "1" } else { "0" }.to_string()),
                help: Some("alignment".to_string()),
            },
            _ => hidden("length", "0"),
        };
        form.add(element);
    }

    fn form_precise(&self, form: &mut dyn FormBuilder, strings: &dyn Strings) {
        let element = match self.question_type {
            QuestionType::Text => text_field(
                "precise",
                strings.string("maxtextlength"),
                default_to(self.precise, 25),
                "maxtextlength",
            ),
            QuestionType::Essay => text_field(
                "precise",
                strings.string("textarearows"),
                default_to(self.precise, 5),
                "textarearows",
            ),
            QuestionType::Numeric => text_field(
                "precise",
                strings.string("numberofdecimaldigits"),
                self.precise,
                "numberofdecimaldigits",
            ),
            QuestionType::Check => text_field(
                "precise",
                strings.string("maxforcedresponses"),
                self.precise,
                "maxforcedresponses",
            ),
            QuestionType::Rate => FormElement::Select {
                name: "precise".to_string(),
                label: strings.string("kindofratescale"),
                options: vec![
                    FormOption::new("0", strings.string("normal")),
                    FormOption::new("1", strings.string("notapplicablecolumn")),
                ],
                selected: Some(if self.precise == 1 { "1" } else { "0" }.to_string()),
                help: Some("kindofratescale".to_string()),
            },
            _ => hidden("precise", "0"),
        };
        form.add(element);
    }

    fn form_dependencies(
        &self,
        form: &mut dyn FormBuilder,
        strings: &dyn Strings,
        ctx: &EditContext,
    ) {
        if !ctx.navigate || self.question_type.is_layout() || ctx.parents.is_empty() {
            return;
        }

        let mut options = vec![FormOption::new("", strings.string("none"))];
        options.extend(ctx.parents.iter().cloned());
        form.add(FormElement::Select {
            name: "dependquestion".to_string(),
            label: strings.string("dependquestion"),
            options,
            selected: self
                .dependency
                .map(|d| format!("{},{}", d.question_id, d.choice_id)),
            help: Some("dependquestion".to_string()),
        });
    }
}
