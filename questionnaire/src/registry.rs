//! The question type table.
//!
//! Type codes map to type names and to whether the type carries choices.
//! The table is read from storage once and cached for the life of the
//! registry; the rows are never mutated afterwards.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use questionnaire_types::{
    CHOOSE_TYPE_CODE, Query, QuestionType, QuestionnaireError, Storage, Table, TypeInfo,
};
use tracing::{debug, warn};

static NO_TYPES: BTreeMap<u32, TypeInfo> = BTreeMap::new();

/// Read-once cache of the question type table.
///
/// Create one per process (or per storage) and pass it to anything that
/// builds questions by type code.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: OnceLock<BTreeMap<u32, TypeInfo>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry whose table is already known; storage is never consulted.
    pub fn preloaded(types: impl IntoIterator<Item = TypeInfo>) -> Self {
        let registry = Self::new();
        let table = types.into_iter().map(|info| (info.code, info)).collect();
        let _ = registry.types.set(table);
        registry
    }

    /// A registry preloaded with the built-in question types.
    pub fn builtin() -> Self {
        Self::preloaded(TypeInfo::builtins())
    }

    /// Whether the table has been read.
    pub fn is_loaded(&self) -> bool {
        self.types.get().is_some()
    }

    /// The whole type table, reading it on first use.
    ///
    /// An empty table is not cached, so types installed later are still seen.
    pub fn types<S: Storage>(
        &self,
        storage: &S,
    ) -> Result<&BTreeMap<u32, TypeInfo>, QuestionnaireError> {
        if let Some(types) = self.types.get() {
            return Ok(types);
        }

        let rows = storage
            .fetch(&Query::new(Table::QuestionType).order_by("typeid"))
            .map_err(QuestionnaireError::storage)?;

        let mut types = BTreeMap::new();
        for row in &rows {
            let info = TypeInfo::from_record(row)?;
            types.insert(info.code, info);
        }

        if types.is_empty() {
            warn!("question type table is empty");
            return Ok(&NO_TYPES);
        }

        debug!(count = types.len(), "loaded question type table");
        Ok(self.types.get_or_init(|| types))
    }

    /// Resolve a type code to its table row and closed question type.
    pub fn resolve<S: Storage>(
        &self,
        storage: &S,
        code: u32,
    ) -> Result<(&TypeInfo, QuestionType), QuestionnaireError> {
        if code == CHOOSE_TYPE_CODE {
            return Err(QuestionnaireError::UnknownType(code));
        }

        let info = self
            .types(storage)?
            .get(&code)
            .ok_or(QuestionnaireError::UnknownType(code))?;

        let question_type = info.question_type().ok_or_else(|| {
            warn!(code, name = %info.name, "type table names a type with no implementation");
            QuestionnaireError::UnknownType(code)
        })?;

        Ok((info, question_type))
    }

    /// The type name stored for a code.
    pub fn type_name<S: Storage>(
        &self,
        storage: &S,
        code: u32,
    ) -> Result<&str, QuestionnaireError> {
        self.types(storage)?
            .get(&code)
            .map(|info| info.name.as_str())
            .ok_or(QuestionnaireError::UnknownType(code))
    }

    /// Write the built-in type rows that storage does not have yet.
    ///
    /// Returns how many rows were written.
    pub fn install_defaults<S: Storage>(storage: &mut S) -> Result<usize, QuestionnaireError> {
        let existing = storage
            .fetch(&Query::new(Table::QuestionType).columns(["typeid"]))
            .map_err(QuestionnaireError::storage)?;
        let existing: Vec<i64> = existing
            .iter()
            .filter_map(|row| row.get_int("typeid").ok())
            .collect();

        let mut installed = 0;
        for info in TypeInfo::builtins() {
            if existing.contains(&i64::from(info.code)) {
                continue;
            }
            storage
                .insert(Table::QuestionType, info.to_record())
                .map_err(QuestionnaireError::storage)?;
            installed += 1;
        }

        debug!(installed, "installed built-in question types");
        Ok(installed)
    }
}
