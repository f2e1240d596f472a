use std::collections::HashMap;

use crate::{FieldKey, QuestionId};

/// A single submitted form value.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    /// A scalar field (text box, radio, dropdown).
    Text(String),

    /// A multi-valued field (check boxes).
    List(Vec<String>),
}

impl FormValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Text(_) => None,
        }
    }

    /// Whether the value counts as an answer: non-empty and not `"0"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty() && s != "0",
            Self::List(items) => !items.is_empty(),
        }
    }

    /// Whether nothing was entered.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::List(_) => "List",
        }
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<String>> for FormValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for FormValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Submitted form values of one page or one stored submission.
///
/// Keys are flat field names (see [`FieldKey`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    values: HashMap<FieldKey, FormValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<FieldKey>, value: impl Into<FormValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<FieldKey>, value: impl Into<FormValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &FieldKey) -> Option<&FormValue> {
        self.values.get(key)
    }

    /// The value submitted for a question's own field.
    pub fn answer(&self, question_id: QuestionId) -> Option<&FormValue> {
        self.get(&FieldKey::question(question_id))
    }

    pub fn get_text(&self, key: &FieldKey) -> Option<&str> {
        self.get(key).and_then(FormValue::as_text)
    }

    pub fn get_list(&self, key: &FieldKey) -> Option<&[String]> {
        self.get(key).and_then(FormValue::as_list)
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        self.values.contains_key(key)
    }

    /// Whether the field is present and holds a truthy value.
    pub fn is_truthy(&self, key: &FieldKey) -> bool {
        self.get(key).is_some_and(FormValue::is_truthy)
    }

    /// Whether the field is present and not blank.
    pub fn has_value(&self, key: &FieldKey) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    pub fn remove(&mut self, key: &FieldKey) -> Option<FormValue> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &FormValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge another form data collection into this one.
    pub fn extend(&mut self, other: FormData) {
        self.values.extend(other.values);
    }
}

impl<K: Into<FieldKey>, V: Into<FormValue>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for FormData {
    type Item = (FieldKey, FormValue);
    type IntoIter = std::collections::hash_map::IntoIter<FieldKey, FormValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let data = FormData::new()
            .with("q1", "y")
            .with("q2", vec!["4", "5"]);

        assert_eq!(data.get_text(&FieldKey::question(1)), Some("y"));
        assert_eq!(
            data.get_list(&FieldKey::question(2)),
            Some(&["4".to_string(), "5".to_string()][..])
        );
        assert!(data.answer(3).is_none());
    }

    #[test]
    fn truthiness_follows_form_semantics() {
        let data = FormData::new()
            .with("q1", "")
            .with("q2", "0")
            .with("q3", "no")
            .with("q4", Vec::<String>::new());

        assert!(!data.is_truthy(&FieldKey::question(1)));
        assert!(!data.is_truthy(&FieldKey::question(2)));
        assert!(data.is_truthy(&FieldKey::question(3)));
        assert!(!data.is_truthy(&FieldKey::question(4)));
        assert!(!data.is_truthy(&FieldKey::question(5)));
    }

    #[test]
    fn blank_text_has_no_value() {
        let data = FormData::new().with("q1", "   ").with("q2", "0");
        assert!(!data.has_value(&FieldKey::question(1)));
        assert!(data.has_value(&FieldKey::question(2)));
    }

    #[test]
    fn collect_from_pairs() {
        let data: FormData = [("q1", "a"), ("q2", "b")].into_iter().collect();
        assert_eq!(data.len(), 2);
    }
}
