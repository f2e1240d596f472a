//! SQLite storage for questionnaires.
//!
//! [`SqliteStorage`] implements the [`Storage`](questionnaire::Storage) trait
//! on top of a single `rusqlite` connection. The schema is created on open,
//! one table per [`Table`](questionnaire::Table) variant.
//!
//! # Example
//!
//! ```rust
//! use questionnaire::{Questionnaire, QuestionnaireGenerator, QuestionnaireSettings, TypeRegistry};
//! use questionnaire_sqlite::SqliteStorage;
//!
//! let mut storage = SqliteStorage::in_memory()?;
//! let registry = TypeRegistry::new();
//! let survey_id = QuestionnaireGenerator::new(&mut storage, &registry)
//!     .create_instance(&QuestionnaireSettings::new("Course feedback"))?;
//!
//! let survey = Questionnaire::load(&registry, &storage, survey_id)?;
//! assert_eq!(survey.settings().title, "Course feedback");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod schema;
mod storage;

pub use error::SqliteStorageError;
pub use schema::{column_names, create_statement};
pub use storage::SqliteStorage;
