//! Edit form elements rendered as HTML.

use questionnaire::{FormBuilder, FormElement, FormOption, HtmlOutput, Output};
use tracing::debug;

/// A [`FormBuilder`] that writes each element as HTML as it is added.
#[derive(Debug, Clone)]
pub struct HtmlFormBuilder {
    out: HtmlOutput,
    prefix: String,
}

impl HtmlFormBuilder {
    /// Create a builder whose elements use `prefix` for their CSS classes.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            out: HtmlOutput::new(),
            prefix: prefix.into(),
        }
    }

    /// The markup written so far.
    pub fn as_str(&self) -> &str {
        self.out.as_str()
    }

    pub fn finish(self) -> String {
        self.out.into_string()
    }

    fn class(&self, suffix: &str) -> String {
        format!("{}-{suffix}", self.prefix)
    }

    fn field_start(&mut self, name: &str, label: &str, help: Option<&str>, required: bool) {
        let class = self.class("field");
        let id = field_id(name);
        match help {
            Some(help) => {
                let attrs = [("class", class.as_str()), ("data-help", help)];
                self.out.start_tag("div", &attrs)
            }
            None => self.out.start_tag("div", &[("class", class.as_str())]),
        }
        self.out.start_tag("label", &[("for", id.as_str())]);
        self.out.text(label);
        if required {
            self.out.tag("span", &[("class", "req")], "*");
        }
        self.out.end_tag("label");
    }

    fn field_end(&mut self) {
        self.out.end_tag("div");
    }

    fn radio_group(
        &mut self,
        name: &str,
        label: &str,
        options: &[FormOption],
        selected: Option<&str>,
    ) {
        let fieldset = self.class("fieldset");
        let option_class = self.class("radio-option");
        self.out.start_tag("fieldset", &[("class", fieldset.as_str())]);
        self.out.tag("legend", &[], label);
        for option in options {
            let id = format!("{}_{}", field_id(name), option.value);
            let mut attrs = vec![
                ("type", "radio"),
                ("name", name),
                ("id", id.as_str()),
                ("value", option.value.as_str()),
            ];
            if selected == Some(option.value.as_str()) {
                attrs.push(("checked", "checked"));
            }
            self.out.start_tag("div", &[("class", option_class.as_str())]);
            self.out.empty_tag("input", &attrs);
            self.out.tag("label", &[("for", id.as_str())], &option.label);
            self.out.end_tag("div");
        }
        self.out.end_tag("fieldset");
    }

    fn select(&mut self, name: &str, options: &[FormOption], selected: Option<&str>) {
        let id = field_id(name);
        let class = self.class("input");
        self.out.start_tag(
            "select",
            &[("name", name), ("id", id.as_str()), ("class", class.as_str())],
        );
        for option in options {
            if selected == Some(option.value.as_str()) {
                self.out.tag(
                    "option",
                    &[("value", option.value.as_str()), ("selected", "selected")],
                    &option.label,
                );
            } else {
                self.out.tag("option", &[("value", option.value.as_str())], &option.label);
            }
        }
        self.out.end_tag("select");
    }

    fn textarea(&mut self, name: &str, value: &str, rows: &str, class: &str, required: bool) {
        let id = field_id(name);
        let mut attrs = vec![("name", name), ("id", id.as_str()), ("rows", rows), ("class", class)];
        if required {
            attrs.push(("required", "required"));
        }
        self.out.tag("textarea", &attrs, value);
    }
}

impl FormBuilder for HtmlFormBuilder {
    fn add(&mut self, element: FormElement) {
        debug!(kind = element.kind(), name = element.name().unwrap_or_default(), "form element");
        match &element {
            FormElement::Header { name, label, help } => {
                let class = self.class("header");
                let mut attrs = vec![("class", class.as_str()), ("id", name.as_str())];
                if let Some(help) = help {
                    attrs.push(("data-help", help.as_str()));
                }
                self.out.tag("h2", &attrs, label);
            }
            FormElement::Text {
                name,
                label,
                value,
                size,
                max_length,
                help,
            } => {
                self.field_start(name, label, help.as_deref(), false);
                let id = field_id(name);
                let size = size.to_string();
                let max_length = max_length.map(|m| m.to_string());
                let class = self.class("input");
                let mut attrs = vec![
                    ("type", "text"),
                    ("name", name.as_str()),
                    ("id", id.as_str()),
                    ("size", size.as_str()),
                    ("value", value.as_str()),
                    ("class", class.as_str()),
                ];
                if let Some(max_length) = &max_length {
                    attrs.push(("maxlength", max_length.as_str()));
                }
                self.out.empty_tag("input", &attrs);
                self.field_end();
            }
            FormElement::RadioGroup {
                name,
                label,
                options,
                selected,
                help,
            } => {
                let class = self.class("field");
                match help {
                    Some(help) => {
                        let attrs = [("class", class.as_str()), ("data-help", help.as_str())];
                        self.out.start_tag("div", &attrs)
                    }
                    None => self.out.start_tag("div", &[("class", class.as_str())]),
                }
                self.radio_group(name, label, options, selected.as_deref());
                self.field_end();
            }
            FormElement::Select {
                name,
                label,
                options,
                selected,
                help,
            } => {
                self.field_start(name, label, help.as_deref(), false);
                self.select(name, options, selected.as_deref());
                self.field_end();
            }
            FormElement::Editor {
                name,
                label,
                value,
                required,
            } => {
                self.field_start(name, label, None, *required);
                let class = self.class("editor");
                self.textarea(name, value, "10", &class, *required);
                self.field_end();
            }
            FormElement::Textarea {
                name,
                label,
                value,
                required,
                help,
            } => {
                self.field_start(name, label, help.as_deref(), *required);
                let class = self.class("textarea");
                self.textarea(name, value, "8", &class, *required);
                self.field_end();
            }
            FormElement::Hidden { name, value } => {
                self.out.empty_tag(
                    "input",
                    &[("type", "hidden"), ("name", name.as_str()), ("value", value.as_str())],
                );
            }
            FormElement::Html(markup) => self.out.raw(markup),
        }
    }
}

fn field_id(name: &str) -> String {
    format!("id_{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_escapes_value() {
        let mut form = HtmlFormBuilder::new("qn");
        form.add(FormElement::Text {
            name: "name".into(),
            label: "Question name".into(),
            value: "<b>\"Q1\"</b>".into(),
            size: 30,
            max_length: Some(30),
            help: None,
        });
        assert_eq!(
            form.finish(),
            "<div class=\"qn-field\"><label for=\"id_name\">Question name</label>\
             <input type=\"text\" name=\"name\" id=\"id_name\" size=\"30\" \
             value=\"&lt;b&gt;&quot;Q1&quot;&lt;/b&gt;\" \
             class=\"qn-input\" maxlength=\"30\" /></div>"
        );
    }

    #[test]
    fn radio_group_checks_selected_option() {
        let mut form = HtmlFormBuilder::new("qn");
        form.add(FormElement::RadioGroup {
            name: "required".into(),
            label: "Response is required".into(),
            options: vec![FormOption::new("y", "Yes"), FormOption::new("n", "No")],
            selected: Some("n".into()),
            help: Some("required".into()),
        });
        let html = form.finish();
        assert!(html.contains(
            "<input type=\"radio\" name=\"required\" id=\"id_required_n\" value=\"n\" \
             checked=\"checked\" />"
        ));
        assert!(html.contains(
            "<input type=\"radio\" name=\"required\" id=\"id_required_y\" value=\"y\" />"
        ));
        assert!(html.starts_with("<div class=\"qn-field\" data-help=\"required\">"));
    }

    #[test]
    fn select_marks_selected_option() {
        let mut form = HtmlFormBuilder::new("qn");
        form.add(FormElement::Select {
            name: "dependquestion".into(),
            label: "Parent question".into(),
            options: vec![FormOption::new("", "None"), FormOption::new("4,0", "1. Q4->Yes")],
            selected: Some("4,0".into()),
            help: None,
        });
        assert!(form
            .as_str()
            .contains("<option value=\"4,0\" selected=\"selected\">1. Q4-&gt;Yes</option>"));
    }

    #[test]
    fn required_textarea_is_marked() {
        let mut form = HtmlFormBuilder::new("qn");
        form.add(FormElement::Editor {
            name: "content".into(),
            label: "Question text".into(),
            value: "<p>Hi</p>".into(),
            required: true,
        });
        let html = form.finish();
        assert!(html.contains("<span class=\"req\">*</span>"));
        assert!(html.contains("required=\"required\">&lt;p&gt;Hi&lt;/p&gt;</textarea>"));
    }

    #[test]
    fn raw_markup_and_hidden_fields() {
        let mut form = HtmlFormBuilder::new("qn");
        form.add(FormElement::Html("<div class=\"qoptcontainer\">".into()));
        form.add(FormElement::Hidden {
            name: "num_choices".into(),
            value: "3".into(),
        });
        form.add(FormElement::Html("</div>".into()));
        assert_eq!(
            form.finish(),
            "<div class=\"qoptcontainer\">\
             <input type=\"hidden\" name=\"num_choices\" value=\"3\" /></div>"
        );
    }
}
