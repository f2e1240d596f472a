/// One option of a radio group or select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOption {
    pub value: String,
    pub label: String,
}

impl FormOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A typed element appended to an edit form.
///
/// `help` names a help string key; `required` adds a client-side required rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormElement {
    Header {
        name: String,
        label: String,
        help: Option<String>,
    },
    Text {
        name: String,
        label: String,
        value: String,
        size: u32,
        max_length: Option<u32>,
        help: Option<String>,
    },
    RadioGroup {
        name: String,
        label: String,
        options: Vec<FormOption>,
        selected: Option<String>,
        help: Option<String>,
    },
    Select {
        name: String,
        label: String,
        options: Vec<FormOption>,
        selected: Option<String>,
        help: Option<String>,
    },
    Editor {
        name: String,
        label: String,
        value: String,
        required: bool,
    },
    Textarea {
        name: String,
        label: String,
        value: String,
        required: bool,
        help: Option<String>,
    },
    Hidden {
        name: String,
        value: String,
    },
    /// Raw markup inserted between elements.
    Html(String),
}

impl FormElement {
    /// The field name, for elements that submit a value.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Header { name, .. }
            | Self::Text { name, .. }
            | Self::RadioGroup { name, .. }
            | Self::Select { name, .. }
            | Self::Editor { name, .. }
            | Self::Textarea { name, .. }
            | Self::Hidden { name, .. } => Some(name),
            Self::Html(_) => None,
        }
    }

    /// Short element kind name, as used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Header { .. } => "header",
            Self::Text { .. } => "text",
            Self::RadioGroup { .. } => "radio",
            Self::Select { .. } => "select",
            Self::Editor { .. } => "editor",
            Self::Textarea { .. } => "textarea",
            Self::Hidden { .. } => "hidden",
            Self::Html(_) => "html",
        }
    }
}
