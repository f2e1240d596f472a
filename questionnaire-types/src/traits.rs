use crate::{COMPONENT, FormElement, Query, Record, RecordId, Table};

/// Trait for the persistence collaborator.
///
/// The engine only names tables and expresses filter/order intent; how rows
/// are stored is up to the implementation.
pub trait Storage {
    /// The error type for this storage.
    type Error: Into<anyhow::Error>;

    /// Fetch every row matching the query, in the query's order.
    fn fetch(&self, query: &Query) -> Result<Vec<Record>, Self::Error>;

    /// Fetch the first row matching the query.
    fn fetch_one(&self, query: &Query) -> Result<Option<Record>, Self::Error> {
        Ok(self.fetch(query)?.into_iter().next())
    }

    /// Insert a row and return its new primary key.
    fn insert(&mut self, table: Table, record: Record) -> Result<RecordId, Self::Error>;

    /// Overwrite the given columns of the row with this primary key.
    fn update(&mut self, table: Table, id: RecordId, record: Record) -> Result<(), Self::Error>;

    /// Delete every row matching the query; returns how many were removed.
    fn delete(&mut self, query: &Query) -> Result<usize, Self::Error>;
}

/// Trait for the form-building collaborator used by edit forms.
pub trait FormBuilder {
    /// Append an element after everything added so far.
    fn add(&mut self, element: FormElement);
}

/// Trait for the output collaborator that receives rendered markup.
pub trait Output {
    fn start_tag(&mut self, tag: &str, attrs: &[(&str, &str)]);

    fn end_tag(&mut self, tag: &str);

    /// A void element such as `input` or `img`.
    fn empty_tag(&mut self, tag: &str, attrs: &[(&str, &str)]);

    /// Escaped text.
    fn text(&mut self, text: &str);

    /// Markup written as-is.
    fn raw(&mut self, markup: &str);

    /// Run the rich-text formatting and sanitization pass over stored content.
    fn format_text(&self, content: &str) -> String;

    /// A fresh element id, unique within this output.
    fn next_id(&mut self, prefix: &str) -> String;

    /// Start tag, escaped text, end tag.
    fn tag(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) {
        self.start_tag(tag, attrs);
        self.text(text);
        self.end_tag(tag);
    }
}

/// Trait for the string-lookup collaborator.
pub trait Strings {
    /// Look up `key` in `component`, substituting `param` for `{$a}`.
    fn get(&self, key: &str, component: &str, param: Option<&str>) -> String;

    /// Look up a questionnaire string.
    fn string(&self, key: &str) -> String {
        self.get(key, COMPONENT, None)
    }

    /// Look up a questionnaire string with a parameter.
    fn string_with(&self, key: &str, param: &str) -> String {
        self.get(key, COMPONENT, Some(param))
    }
}
