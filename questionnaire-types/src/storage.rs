use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::RecordError;

/// Primary key of a stored row.
pub type RecordId = i64;

/// The tables the questionnaire engine reads and writes.
///
/// The engine never issues raw queries; it names a table and expresses
/// filter and order intent through a [`Query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    QuestionType,
    Survey,
    Question,
    Choice,
    Response,
    ResponseBool,
    ResponseText,
    ResponseDate,
    ResponseSingle,
    ResponseMultiple,
    ResponseRank,
    ResponseOther,
}

impl Table {
    /// Every table, in creation order.
    pub const ALL: [Table; 12] = [
        Table::QuestionType,
        Table::Survey,
        Table::Question,
        Table::Choice,
        Table::Response,
        Table::ResponseBool,
        Table::ResponseText,
        Table::ResponseDate,
        Table::ResponseSingle,
        Table::ResponseMultiple,
        Table::ResponseRank,
        Table::ResponseOther,
    ];

    /// The storage name of this table.
    pub fn name(self) -> &'static str {
        match self {
            Self::QuestionType => "questionnaire_question_type",
            Self::Survey => "questionnaire_survey",
            Self::Question => "questionnaire_question",
            Self::Choice => "questionnaire_quest_choice",
            Self::Response => "questionnaire_response",
            Self::ResponseBool => "questionnaire_response_bool",
            Self::ResponseText => "questionnaire_response_text",
            Self::ResponseDate => "questionnaire_response_date",
            Self::ResponseSingle => "questionnaire_resp_single",
            Self::ResponseMultiple => "questionnaire_resp_multiple",
            Self::ResponseRank => "questionnaire_response_rank",
            Self::ResponseOther => "questionnaire_response_other",
        }
    }

    /// Look a table up by its storage name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|table| table.name() == name)
    }

    /// The primary key column.
    pub fn key_column(self) -> &'static str {
        match self {
            Self::QuestionType => "typeid",
            _ => "id",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single stored column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
}

impl Value {
    /// Encode a boolean the way flag columns store it (`y` / `n`).
    pub fn flag(flag: bool) -> Self {
        Self::Text(if flag { "y" } else { "n" }.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Int(_) => "Int",
            Self::Real(_) => "Real",
            Self::Text(_) => "Text",
        }
    }

    /// Total order used for sorting: nulls first, then numbers, then text.
    pub fn compare(&self, other: &Value) -> Ordering {
        fn rank(value: &Value) -> u8 {
            match value {
                Value::Null => 0,
                Value::Int(_) | Value::Real(_) => 1,
                Value::Text(_) => 2,
            }
        }

        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (a, b) if rank(a) == 1 && rank(b) == 1 => {
                let (a, b) = (a.as_real().unwrap_or(0.0), b.as_real().unwrap_or(0.0));
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Real(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One stored row: column name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column setter.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.fields.remove(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keep only the named columns.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Self {
        let fields = columns
            .iter()
            .filter_map(|c| {
                let c = c.as_ref();
                self.fields.get(c).map(|v| (c.to_string(), v.clone()))
            })
            .collect();
        Self { fields }
    }

    // === Typed accessors ===

    fn require(&self, column: &str) -> Result<&Value, RecordError> {
        self.get(column)
            .ok_or_else(|| RecordError::MissingColumn(column.to_string()))
    }

    /// Get the `id` column.
    pub fn id(&self) -> Result<RecordId, RecordError> {
        self.get_int("id")
    }

    pub fn get_int(&self, column: &str) -> Result<i64, RecordError> {
        match self.require(column)? {
            Value::Int(i) => Ok(*i),
            other => Err(RecordError::TypeMismatch {
                column: column.to_string(),
                expected: "Int",
                actual: other.type_name(),
            }),
        }
    }

    /// Get an integer column that may be absent or null.
    pub fn get_opt_int(&self, column: &str) -> Result<Option<i64>, RecordError> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get_int(column).map(Some),
        }
    }

    pub fn get_str(&self, column: &str) -> Result<&str, RecordError> {
        match self.require(column)? {
            Value::Text(s) => Ok(s),
            other => Err(RecordError::TypeMismatch {
                column: column.to_string(),
                expected: "Text",
                actual: other.type_name(),
            }),
        }
    }

    /// Get a text column that may be absent or null.
    pub fn get_opt_str(&self, column: &str) -> Result<Option<&str>, RecordError> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get_str(column).map(Some),
        }
    }

    /// Get a `y` / `n` flag column.
    pub fn get_flag(&self, column: &str) -> Result<bool, RecordError> {
        match self.get_str(column)? {
            "y" => Ok(true),
            "n" => Ok(false),
            other => Err(RecordError::InvalidValue {
                column: column.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// A filter condition on one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    In(String, Vec<Value>),
}

impl Condition {
    pub fn column(&self) -> &str {
        match self {
            Self::Eq(column, _) | Self::In(column, _) => column,
        }
    }

    /// Check whether a record satisfies this condition.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::Eq(column, expected) => record
                .get(column)
                .is_some_and(|v| v.compare(expected) == Ordering::Equal),
            Self::In(column, candidates) => record.get(column).is_some_and(|v| {
                candidates
                    .iter()
                    .any(|c| v.compare(c) == Ordering::Equal)
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// A fetch request: table, filter, order and optional column projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: Table,
    conditions: Vec<Condition>,
    order_by: Vec<OrderBy>,
    columns: Option<Vec<String>>,
}

impl Query {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            conditions: Vec::new(),
            order_by: Vec::new(),
            columns: None,
        }
    }

    /// Shorthand for a lookup by primary key.
    pub fn by_id(table: Table, id: RecordId) -> Self {
        Self::new(table).filter(table.key_column(), id)
    }

    /// Add an equality condition.
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Eq(column.into(), value.into()));
        self
    }

    /// Add a membership condition.
    pub fn filter_in<V: Into<Value>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.conditions.push(Condition::In(
            column.into(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by.push(OrderBy {
            column: column.into(),
            direction: Direction::Asc,
        });
        self
    }

    pub fn order_by_desc(mut self, column: impl Into<String>) -> Self {
        self.order_by.push(OrderBy {
            column: column.into(),
            direction: Direction::Desc,
        });
        self
    }

    /// Restrict the returned columns.
    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn ordering(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn selected_columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Check whether a record satisfies every condition.
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }

    /// Compare two records by this query's ordering.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for order in &self.order_by {
            let left = a.get(&order.column).unwrap_or(&Value::Null);
            let right = b.get(&order.column).unwrap_or(&Value::Null);
            let ordering = match order.direction {
                Direction::Asc => left.compare(right),
                Direction::Desc => right.compare(left),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
