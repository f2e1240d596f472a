//! Table definitions.
//!
//! Column declarations are kept next to their names so that identifiers in
//! queries can be checked against them before any SQL is built.

use questionnaire::Table;

type Column = (&'static str, &'static str);

const ID: Column = ("id", "INTEGER PRIMARY KEY AUTOINCREMENT");
const RESPONSE_ID: Column = ("response_id", "INTEGER NOT NULL");
const QUESTION_ID: Column = ("question_id", "INTEGER NOT NULL");

fn columns(table: Table) -> &'static [Column] {
    match table {
        Table::QuestionType => &[
            ("typeid", "INTEGER PRIMARY KEY"),
            ("type", "TEXT NOT NULL"),
            ("has_choices", "TEXT NOT NULL DEFAULT 'n'"),
            ("response_table", "TEXT NOT NULL DEFAULT ''"),
        ],
        Table::Survey => &[
            ID,
            ("name", "TEXT NOT NULL DEFAULT ''"),
            ("title", "TEXT NOT NULL DEFAULT ''"),
            ("autonum", "INTEGER NOT NULL DEFAULT 3"),
            ("navigate", "INTEGER NOT NULL DEFAULT 0"),
            ("respondenttype", "TEXT NOT NULL DEFAULT 'fullname'"),
            ("resume", "INTEGER NOT NULL DEFAULT 0"),
            ("grade", "INTEGER NOT NULL DEFAULT 0"),
        ],
        Table::Question => &[
            ID,
            ("survey_id", "INTEGER NOT NULL"),
            ("name", "TEXT"),
            ("type_id", "INTEGER NOT NULL"),
            ("length", "INTEGER NOT NULL DEFAULT 0"),
            ("precise", "INTEGER NOT NULL DEFAULT 0"),
            ("position", "INTEGER NOT NULL DEFAULT 0"),
            ("content", "TEXT NOT NULL DEFAULT ''"),
            ("required", "TEXT NOT NULL DEFAULT 'n'"),
            ("deleted", "TEXT NOT NULL DEFAULT 'n'"),
            ("dependquestion", "INTEGER"),
            ("dependchoice", "INTEGER"),
        ],
        Table::Choice => &[
            ID,
            QUESTION_ID,
            ("content", "TEXT NOT NULL"),
            ("value", "TEXT"),
        ],
        Table::Response => &[
            ID,
            ("survey_id", "INTEGER NOT NULL"),
            ("submitted", "TEXT NOT NULL"),
            ("complete", "TEXT NOT NULL DEFAULT 'n'"),
            ("grade", "INTEGER NOT NULL DEFAULT 0"),
            ("username", "TEXT NOT NULL DEFAULT ''"),
        ],
        // y / n, not a choice row
        Table::ResponseBool => &[ID, RESPONSE_ID, QUESTION_ID, ("choice_id", "TEXT NOT NULL")],
        Table::ResponseText | Table::ResponseDate => {
            &[ID, RESPONSE_ID, QUESTION_ID, ("response", "TEXT")]
        }
        Table::ResponseSingle | Table::ResponseMultiple => {
            &[ID, RESPONSE_ID, QUESTION_ID, ("choice_id", "INTEGER NOT NULL")]
        }
        Table::ResponseRank => &[
            ID,
            RESPONSE_ID,
            QUESTION_ID,
            ("choice_id", "INTEGER NOT NULL"),
            ("rank", "INTEGER NOT NULL"),
        ],
        Table::ResponseOther => &[
            ID,
            RESPONSE_ID,
            QUESTION_ID,
            ("choice_id", "INTEGER NOT NULL"),
            ("response", "TEXT"),
        ],
    }
}

/// The column names of a table, in declaration order.
pub fn column_names(table: Table) -> impl Iterator<Item = &'static str> {
    columns(table).iter().map(|(name, _)| *name)
}

pub(crate) fn has_column(table: Table, column: &str) -> bool {
    column_names(table).any(|name| name == column)
}

/// The `CREATE TABLE IF NOT EXISTS` statement for a table.
pub fn create_statement(table: Table) -> String {
    let columns = columns(table)
        .iter()
        .map(|(name, decl)| format!("    \"{name}\" {decl}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE IF NOT EXISTS {} (\n{columns}\n);", table.name())
}

/// Indexes on the columns the engine filters by.
pub(crate) fn index_statements(table: Table) -> Vec<String> {
    ["survey_id", "question_id", "response_id"]
        .into_iter()
        .filter(|column| has_column(table, column))
        .map(|column| {
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table}(\"{column}\");",
                table = table.name(),
            )
        })
        .collect()
}

/// The whole schema as one batch.
pub(crate) fn schema_batch() -> String {
    let mut batch = String::new();
    for table in Table::ALL {
        batch.push_str(&create_statement(table));
        batch.push('\n');
        for index in index_statements(table) {
            batch.push_str(&index);
            batch.push('\n');
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_has_its_key_column_first() {
        for table in Table::ALL {
            assert_eq!(column_names(table).next(), Some(table.key_column()));
        }
    }

    #[test]
    fn create_statement_quotes_columns() {
        let sql = create_statement(Table::Choice);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS questionnaire_quest_choice ("));
        assert!(sql.contains("\"id\" INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("\"value\" TEXT"));
    }

    #[test]
    fn indexes_only_for_present_columns() {
        assert!(index_statements(Table::QuestionType).is_empty());
        let indexes = index_statements(Table::ResponseRank);
        assert_eq!(indexes.len(), 2);
        assert!(indexes[0].contains("idx_questionnaire_response_rank_question_id"));
    }

    #[test]
    fn unknown_columns_are_rejected() {
        assert!(has_column(Table::Question, "dependchoice"));
        assert!(!has_column(Table::Question, "id; DROP TABLE x"));
    }
}
