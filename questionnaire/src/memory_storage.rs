//! In-memory storage for tests and previews.
//!
//! `MemoryStorage` keeps every table as an ordered map from primary key to
//! row. Queries are evaluated with [`Query::matches`] and [`Query::compare`],
//! so it behaves like a real database for everything the engine asks of it.
//!
//! # Example
//!
//! ```rust
//! use questionnaire::{MemoryStorage, Query, Record, Storage, Table};
//!
//! let mut storage = MemoryStorage::new();
//! let id = storage
//!     .insert(Table::Choice, Record::new().with("question_id", 1).with("content", "Red"))
//!     .unwrap();
//!
//! let rows = storage.fetch(&Query::by_id(Table::Choice, id)).unwrap();
//! assert_eq!(rows[0].get_str("content").unwrap(), "Red");
//! ```

use std::collections::{BTreeMap, HashMap};

use questionnaire_types::{Query, Record, RecordId, Storage, Table, TypeInfo, Value};

/// A storage backend that keeps all rows in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: HashMap<Table, BTreeMap<RecordId, Record>>,
    next_ids: HashMap<Table, RecordId>,
}

/// Error type for MemoryStorage.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStorageError {
    #[error("No row with id {id} in {table}")]
    MissingRow { table: Table, id: RecordId },

    #[error("Duplicate key {id} in {table}")]
    DuplicateKey { table: Table, id: RecordId },

    #[error("Key column '{column}' of {table} must be an integer")]
    InvalidKey { table: Table, column: &'static str },
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            next_ids: HashMap::new(),
        }
    }

    /// Create storage with the built-in question type rows installed.
    pub fn with_question_types() -> Self {
        let mut storage = Self::new();
        let rows = storage.tables.entry(Table::QuestionType).or_default();
        for info in TypeInfo::builtins() {
            let code = RecordId::from(info.code);
            rows.insert(code, info.to_record());
        }
        storage
    }

    /// Number of rows in a table.
    pub fn row_count(&self, table: Table) -> usize {
        self.tables.get(&table).map_or(0, BTreeMap::len)
    }

    /// Every row of a table, in key order.
    pub fn rows(&self, table: Table) -> impl Iterator<Item = &Record> {
        self.tables.get(&table).into_iter().flat_map(BTreeMap::values)
    }

    fn allocate_id(&mut self, table: Table) -> RecordId {
        let max_key = self
            .tables
            .get(&table)
            .and_then(|rows| rows.keys().next_back().copied())
            .unwrap_or(0);
        let next = self.next_ids.entry(table).or_insert(1);
        *next = (*next).max(max_key + 1);
        let id = *next;
        *next += 1;
        id
    }
}

impl Storage for MemoryStorage {
    type Error = MemoryStorageError;

    fn fetch(&self, query: &Query) -> Result<Vec<Record>, Self::Error> {
        let mut rows: Vec<&Record> = self
            .rows(query.table())
            .filter(|row| query.matches(row))
            .collect();
        rows.sort_by(|a, b| query.compare(a, b));

        let rows = match query.selected_columns() {
            Some(columns) => rows.into_iter().map(|row| row.project(columns)).collect(),
            None => rows.into_iter().cloned().collect(),
        };
        Ok(rows)
    }

    fn insert(&mut self, table: Table, mut record: Record) -> Result<RecordId, Self::Error> {
        let column = table.key_column();
        let id = match record.get(column) {
            None | Some(Value::Null) => self.allocate_id(table),
            Some(Value::Int(id)) => {
                let id = *id;
                if self.tables.get(&table).is_some_and(|rows| rows.contains_key(&id)) {
                    return Err(MemoryStorageError::DuplicateKey { table, id });
                }
                id
            }
            Some(_) => return Err(MemoryStorageError::InvalidKey { table, column }),
        };

        record.set(column, id);
        self.tables.entry(table).or_default().insert(id, record);
        Ok(id)
    }

    fn update(&mut self, table: Table, id: RecordId, record: Record) -> Result<(), Self::Error> {
        let row = self
            .tables
            .get_mut(&table)
            .and_then(|rows| rows.get_mut(&id))
            .ok_or(MemoryStorageError::MissingRow { table, id })?;

        for (column, value) in record {
            if column != table.key_column() {
                row.set(column, value);
            }
        }
        Ok(())
    }

    fn delete(&mut self, query: &Query) -> Result<usize, Self::Error> {
        let Some(rows) = self.tables.get_mut(&query.table()) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|_, row| !query.matches(row));
        Ok(before - rows.len())
    }
}
