use std::path::Path;

use questionnaire::{
    Condition, Direction, Query, Record, RecordId, Storage, Table, TypeInfo, Value,
};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use crate::SqliteStorageError;
use crate::schema::{has_column, schema_batch};

/// A storage backend backed by one SQLite database.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) a database file and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteStorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), "opening questionnaire database");
        Self::with_connection(Connection::open(path)?)
    }

    /// A private in-memory database.
    pub fn in_memory() -> Result<Self, SqliteStorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, creating any missing tables.
    pub fn with_connection(conn: Connection) -> Result<Self, SqliteStorageError> {
        let storage = Self { conn };
        storage.init_schema()?;
        Ok(storage)
    }

    fn init_schema(&self) -> Result<(), SqliteStorageError> {
        self.conn.execute_batch(&schema_batch())?;
        Ok(())
    }

    /// Write the built-in question type rows that are not present yet.
    ///
    /// Returns how many rows were written.
    pub fn install_question_types(&mut self) -> Result<usize, SqliteStorageError> {
        let tx = self.conn.transaction()?;
        let mut installed = 0;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR IGNORE INTO {} \
                 (\"typeid\", \"type\", \"has_choices\", \"response_table\") \
                 VALUES (?1, ?2, ?3, ?4)",
                Table::QuestionType.name()
            ))?;
            for info in TypeInfo::builtins() {
                installed += stmt.execute((
                    info.code,
                    info.name.as_str(),
                    if info.has_choices { "y" } else { "n" },
                    info.response_table.as_str(),
                ))?;
            }
        }
        tx.commit()?;
        debug!(installed, "installed built-in question types");
        Ok(installed)
    }

    /// Number of rows in a table.
    pub fn row_count(&self, table: Table) -> Result<usize, SqliteStorageError> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table.name()), [], |row| {
                    row.get(0)
                })?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Storage for SqliteStorage {
    type Error = SqliteStorageError;

    fn fetch(&self, query: &Query) -> Result<Vec<Record>, Self::Error> {
        let table = query.table();
        let columns = match query.selected_columns() {
            Some(columns) => {
                for column in columns {
                    check_column(table, column)?;
                }
                columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ")
            }
            None => "*".to_string(),
        };

        let (where_clause, params) = where_clause(query)?;
        let mut sql = format!("SELECT {columns} FROM {}{where_clause}", table.name());
        if !query.ordering().is_empty() {
            let mut terms = Vec::new();
            for order in query.ordering() {
                check_column(table, &order.column)?;
                let direction = match order.direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                terms.push(format!("{} {direction}", quote(&order.column)));
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }
        debug!(%sql, "fetch");

        let mut stmt = self.conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
        let mut rows = stmt.query(params_from_iter(params))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Record::new();
            for (index, name) in names.iter().enumerate() {
                let value = match row.get_ref(index)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(i) => Value::Int(i),
                    ValueRef::Real(f) => Value::Real(f),
                    ValueRef::Text(s) => Value::Text(String::from_utf8_lossy(s).into_owned()),
                    ValueRef::Blob(_) => {
                        return Err(SqliteStorageError::UnsupportedValue {
                            table,
                            column: name.clone(),
                        });
                    }
                };
                record.set(name.as_str(), value);
            }
            records.push(record);
        }
        Ok(records)
    }

    fn insert(&mut self, table: Table, record: Record) -> Result<RecordId, Self::Error> {
        let mut columns = Vec::with_capacity(record.len());
        let mut params = Vec::with_capacity(record.len());
        for (column, value) in record {
            check_column(table, &column)?;
            if column == table.key_column() && value.is_null() {
                continue;
            }
            columns.push(quote(&column));
            params.push(to_sql(value));
        }

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", table.name())
        } else {
            let placeholders = (1..=params.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({placeholders})",
                table.name(),
                columns.join(", ")
            )
        };
        debug!(%sql, "insert");

        self.conn.execute(&sql, params_from_iter(params))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&mut self, table: Table, id: RecordId, record: Record) -> Result<(), Self::Error> {
        let key = table.key_column();
        let mut assignments = Vec::new();
        let mut params = Vec::new();
        for (column, value) in record {
            check_column(table, &column)?;
            if column == key {
                continue;
            }
            params.push(to_sql(value));
            assignments.push(format!("{} = ?{}", quote(&column), params.len()));
        }

        let changed = if assignments.is_empty() {
            self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", table.name(), quote(key)),
                [id],
                |row| row.get::<_, i64>(0),
            )? as usize
        } else {
            params.push(SqlValue::Integer(id));
            let sql = format!(
                "UPDATE {} SET {} WHERE {} = ?{}",
                table.name(),
                assignments.join(", "),
                quote(key),
                params.len()
            );
            debug!(%sql, "update");
            self.conn.execute(&sql, params_from_iter(params))?
        };

        if changed == 0 {
            return Err(SqliteStorageError::MissingRow { table, id });
        }
        Ok(())
    }

    fn delete(&mut self, query: &Query) -> Result<usize, Self::Error> {
        let (where_clause, params) = where_clause(query)?;
        let sql = format!("DELETE FROM {}{where_clause}", query.table().name());
        debug!(%sql, "delete");
        Ok(self.conn.execute(&sql, params_from_iter(params))?)
    }
}

fn check_column(table: Table, column: &str) -> Result<(), SqliteStorageError> {
    if has_column(table, column) {
        Ok(())
    } else {
        Err(SqliteStorageError::UnknownColumn {
            table,
            column: column.to_string(),
        })
    }
}

fn quote(column: &str) -> String {
    format!("\"{column}\"")
}

fn to_sql(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Int(i) => SqlValue::Integer(i),
        Value::Real(f) => SqlValue::Real(f),
        Value::Text(s) => SqlValue::Text(s),
    }
}

/// Build ` WHERE ...` for the query's conditions, with numbered parameters.
fn where_clause(query: &Query) -> Result<(String, Vec<SqlValue>), SqliteStorageError> {
    let mut terms = Vec::new();
    let mut params = Vec::new();
    for condition in query.conditions() {
        check_column(query.table(), condition.column())?;
        let column = quote(condition.column());
        match condition {
            Condition::Eq(_, value) => {
                params.push(to_sql(value.clone()));
                terms.push(format!("{column} = ?{}", params.len()));
            }
            // IN () is not valid SQL; an empty set matches nothing
            Condition::In(_, values) if values.is_empty() => terms.push("0".to_string()),
            Condition::In(_, values) => {
                let mut placeholders = Vec::with_capacity(values.len());
                for value in values {
                    params.push(to_sql(value.clone()));
                    placeholders.push(format!("?{}", params.len()));
                }
                terms.push(format!("{column} IN ({})", placeholders.join(", ")));
            }
        }
    }

    if terms.is_empty() {
        Ok((String::new(), params))
    } else {
        Ok((format!(" WHERE {}", terms.join(" AND ")), params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SqliteStorage {
        SqliteStorage::in_memory().unwrap()
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let mut storage = storage();
        let first = storage
            .insert(Table::Choice, Record::new().with("question_id", 1).with("content", "a"))
            .unwrap();
        let second = storage
            .insert(Table::Choice, Record::new().with("question_id", 1).with("content", "b"))
            .unwrap();
        assert_eq!((first, second), (1, 2));

        let row = storage
            .fetch_one(&Query::by_id(Table::Choice, 2))
            .unwrap()
            .unwrap();
        assert_eq!(row.id().unwrap(), 2);
        assert_eq!(row.get_str("content").unwrap(), "b");
        assert_eq!(row.get_opt_str("value").unwrap(), None);
    }

    #[test]
    fn explicit_keys_are_kept() {
        let mut storage = storage();
        let id = storage
            .insert(Table::Survey, Record::new().with("id", 40).with("name", "s"))
            .unwrap();
        assert_eq!(id, 40);
        assert!(matches!(
            storage.insert(Table::Survey, Record::new().with("id", 40)),
            Err(SqliteStorageError::Database(_))
        ));
        assert_eq!(storage.insert(Table::Survey, Record::new()).unwrap(), 41);
    }

    #[test]
    fn fetch_filters_orders_and_projects() {
        let mut storage = storage();
        for (question, content) in [(1, "c"), (2, "x"), (1, "a"), (1, "b")] {
            storage
                .insert(
                    Table::Choice,
                    Record::new().with("question_id", question).with("content", content),
                )
                .unwrap();
        }

        let rows = storage
            .fetch(
                &Query::new(Table::Choice)
                    .filter("question_id", 1)
                    .order_by("content")
                    .columns(["content"]),
            )
            .unwrap();
        let contents: Vec<_> = rows
            .iter()
            .map(|row| row.get_str("content").unwrap())
            .collect();
        assert_eq!(contents, ["a", "b", "c"]);
        assert!(!rows[0].contains("id"));

        let rows = storage
            .fetch(&Query::new(Table::Choice).filter_in("id", [2, 4]).order_by_desc("id"))
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|row| row.id().unwrap()).collect();
        assert_eq!(ids, [4, 2]);

        let none: [i64; 0] = [];
        let rows = storage.fetch(&Query::new(Table::Choice).filter_in("id", none)).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn update_merges_columns() {
        let mut storage = storage();
        let id = storage
            .insert(
                Table::Question,
                Record::new()
                    .with("survey_id", 1)
                    .with("type_id", 1)
                    .with("name", "old")
                    .with("deleted", "n"),
            )
            .unwrap();
        storage
            .update(Table::Question, id, Record::new().with("deleted", "y").with("id", 99))
            .unwrap();

        let row = storage
            .fetch_one(&Query::by_id(Table::Question, id))
            .unwrap()
            .unwrap();
        assert_eq!(row.get_str("name").unwrap(), "old");
        assert!(row.get_flag("deleted").unwrap());
        assert!(storage.update(Table::Question, id, Record::new()).is_ok());

        assert!(matches!(
            storage.update(Table::Question, 99, Record::new().with("name", "x")),
            Err(SqliteStorageError::MissingRow { .. })
        ));
        assert!(matches!(
            storage.update(Table::Question, 99, Record::new()),
            Err(SqliteStorageError::MissingRow { .. })
        ));
    }

    #[test]
    fn delete_counts_rows() {
        let mut storage = storage();
        assert_eq!(storage.install_question_types().unwrap(), 11);
        assert_eq!(storage.install_question_types().unwrap(), 0);
        assert_eq!(storage.row_count(Table::QuestionType).unwrap(), 11);

        let removed = storage
            .delete(&Query::new(Table::QuestionType).filter_in("typeid", [99, 100]))
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(storage.delete(&Query::new(Table::Response)).unwrap(), 0);
    }

    #[test]
    fn unknown_columns_never_reach_sql() {
        let mut storage = storage();
        let err = storage
            .insert(Table::Choice, Record::new().with("content\" --", "x"))
            .unwrap_err();
        assert!(matches!(err, SqliteStorageError::UnknownColumn { .. }));

        let err = storage
            .fetch(&Query::new(Table::Choice).order_by("nope"))
            .unwrap_err();
        assert!(matches!(err, SqliteStorageError::UnknownColumn { .. }));
    }

    #[test]
    fn text_answers_keep_their_type() {
        let mut storage = storage();
        storage
            .insert(
                Table::ResponseText,
                Record::new()
                    .with("response_id", 1)
                    .with("question_id", 2)
                    .with("response", "0012"),
            )
            .unwrap();
        let row = storage
            .fetch_one(&Query::new(Table::ResponseText))
            .unwrap()
            .unwrap();
        assert_eq!(row.get_str("response").unwrap(), "0012");
    }
}
