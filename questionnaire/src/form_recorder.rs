use questionnaire_types::{FormBuilder, FormElement};

/// A [`FormBuilder`] that keeps the elements it is given, in order.
///
/// Useful for inspecting an edit form, or for handing it to a renderer
/// later.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingFormBuilder {
    elements: Vec<FormElement>,
}

impl RecordingFormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[FormElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<FormElement> {
        self.elements
    }

    /// Field names in the order they were added. Raw markup is skipped.
    pub fn names(&self) -> Vec<&str> {
        self.elements.iter().filter_map(FormElement::name).collect()
    }

    /// The first element with this field name.
    pub fn find(&self, name: &str) -> Option<&FormElement> {
        self.elements.iter().find(|e| e.name() == Some(name))
    }

    /// The initial value of a field: its text, or the selected option.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        match self.find(name)? {
            FormElement::Text { value, .. }
            | FormElement::Editor { value, .. }
            | FormElement::Textarea { value, .. }
            | FormElement::Hidden { value, .. } => Some(value),
            FormElement::RadioGroup { selected, .. } | FormElement::Select { selected, .. } => {
                selected.as_deref()
            }
            FormElement::Header { .. } | FormElement::Html(_) => None,
        }
    }
}

impl FormBuilder for RecordingFormBuilder {
    fn add(&mut self, element: FormElement) {
        self.elements.push(element);
    }
}

impl<'a> IntoIterator for &'a RecordingFormBuilder {
    type Item = &'a FormElement;
    type IntoIter = std::slice::Iter<'a, FormElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
