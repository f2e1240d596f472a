//! The question entity: fields, persistence and the answer seam.

use questionnaire_types::{
    Choice, ChoiceId, Dependency, FieldKey, FormData, FormValue, Query, QuestionId,
    QuestionParams, QuestionResults, QuestionType, QuestionnaireError, Record, RecordError,
    ResponseRecord, SortOrder, Storage, SubmissionId, SubmittedValue, SurveyId, Table, Value,
};
use tracing::{debug, warn};

use crate::display::Renderer;
use crate::handler::ResponseHandler;
use crate::markup::is_blank_html;
use crate::{TypeRegistry, ValidationError};

/// A question of any type.
///
/// Behavior that differs between types dispatches on [`QuestionType`];
/// everything else is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub(crate) id: QuestionId,
    pub(crate) survey_id: SurveyId,
    pub(crate) name: String,
    pub(crate) question_type: QuestionType,
    pub(crate) content: String,
    pub(crate) required: bool,
    pub(crate) deleted: bool,
    pub(crate) length: i64,
    pub(crate) precise: i64,
    pub(crate) position: i64,
    pub(crate) choices: Vec<Choice>,
    pub(crate) dependency: Option<Dependency>,
}

/// Build a question of the type registered under `code`.
///
/// Fields come from `params`, or stay empty when none are given. The
/// question is not stored; call [`Question::add`] for that.
pub fn build_question_by_type_code<S: Storage>(
    registry: &TypeRegistry,
    storage: &S,
    code: u32,
    params: Option<QuestionParams>,
) -> Result<Question, QuestionnaireError> {
    let (_, question_type) = registry.resolve(storage, code)?;
    let params = params.unwrap_or_default();

    let dependency = match params.depends_on {
        Some((parent_id, choice_id)) => Some(
            resolve_dependency(registry, storage, parent_id, choice_id)?.ok_or(
                QuestionnaireError::NotFound {
                    table: Table::Question,
                    id: parent_id,
                },
            )?,
        ),
        None => None,
    };

    Ok(Question {
        id: 0,
        survey_id: params.survey_id,
        name: params.name,
        question_type,
        content: params.content,
        required: params.required,
        deleted: false,
        length: params.length,
        precise: params.precise,
        position: params.position,
        choices: Vec::new(),
        dependency,
    })
}

impl Question {
    // === Accessors ===

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn survey_id(&self) -> SurveyId {
        self.survey_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    /// The canonical type name, e.g. `"essay"`.
    pub fn type_name(&self) -> &'static str {
        self.question_type.name()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Type-specific size setting (box length, scale items, ...).
    pub fn length(&self) -> i64 {
        self.length
    }

    /// Type-specific precision setting (max length, decimals, ...).
    pub fn precise(&self) -> i64 {
        self.precise
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    /// Choices in storage order. Empty for types without choices.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn choice(&self, choice_id: ChoiceId) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }

    pub fn dependency(&self) -> Option<&Dependency> {
        self.dependency.as_ref()
    }

    pub fn has_choices(&self) -> bool {
        self.question_type.has_choices()
    }

    /// The page anchor of this question, also used as a dependency marker.
    pub fn anchor(&self) -> String {
        format!("qn-{}", self.id)
    }

    /// Choices joined one per line, as shown in the edit form.
    pub fn all_choices(&self) -> String {
        self.choices
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The string key of this type's display label.
    pub fn type_label_key(&self) -> &'static str {
        type_label_key(self.question_type)
    }

    // === Persistence ===

    /// Load a question by id, including its choices when the type has any.
    pub fn load<S: Storage>(
        registry: &TypeRegistry,
        storage: &S,
        id: QuestionId,
    ) -> Result<Self, QuestionnaireError> {
        let record = storage
            .fetch_one(&Query::by_id(Table::Question, id))
            .map_err(QuestionnaireError::storage)?
            .ok_or(QuestionnaireError::NotFound {
                table: Table::Question,
                id,
            })?;
        Self::from_record(registry, storage, &record)
    }

    pub(crate) fn from_record<S: Storage>(
        registry: &TypeRegistry,
        storage: &S,
        record: &Record,
    ) -> Result<Self, QuestionnaireError> {
        let id = record.id()?;
        let (info, question_type) = registry.resolve(storage, type_code(record)?)?;
        let has_choices = info.has_choices;

        let parent = record.get_opt_int("dependquestion")?.filter(|&p| p != 0);
        let dependency = match parent {
            Some(parent_id) => {
                let choice_id = record.get_opt_int("dependchoice")?.unwrap_or(0);
                let dependency = resolve_dependency(registry, storage, parent_id, choice_id)?;
                if dependency.is_none() {
                    warn!(question_id = id, parent_id, "ignoring dependency on missing question");
                }
                dependency
            }
            None => None,
        };

        let mut question = Self {
            id,
            survey_id: record.get_int("survey_id")?,
            name: record.get_opt_str("name")?.unwrap_or_default().to_string(),
            question_type,
            content: record.get_opt_str("content")?.unwrap_or_default().to_string(),
            required: record.get_flag("required")?,
            deleted: record.get_flag("deleted")?,
            length: record.get_opt_int("length")?.unwrap_or(0),
            precise: record.get_opt_int("precise")?.unwrap_or(0),
            position: record.get_opt_int("position")?.unwrap_or(0),
            choices: Vec::new(),
            dependency,
        };
        if has_choices {
            question.choices = load_choices(storage, id)?;
        }
        Ok(question)
    }

    /// The question row (id excluded).
    pub fn to_record(&self) -> Record {
        let (parent_id, choice_id) = self
            .dependency
            .map_or((0, 0), |d| (d.question_id, d.choice_id));
        Record::new()
            .with("survey_id", self.survey_id)
            .with("name", self.name.as_str())
            .with("type_id", self.question_type.code())
            .with("length", self.length)
            .with("precise", self.precise)
            .with("position", self.position)
            .with("content", self.content.as_str())
            .with("required", Value::flag(self.required))
            .with("deleted", Value::flag(self.deleted))
            .with("dependquestion", parent_id)
            .with("dependchoice", choice_id)
    }

    /// Store a new question and its choices; returns the new id.
    ///
    /// Without a position the question goes after the survey's last one.
    pub fn add<S: Storage>(
        &mut self,
        storage: &mut S,
        choices: &[Choice],
    ) -> Result<QuestionId, QuestionnaireError> {
        if self.position == 0 {
            self.position = next_position(storage, self.survey_id)?;
        }

        let id = storage
            .insert(Table::Question, self.to_record())
            .map_err(QuestionnaireError::storage)?;
        self.id = id;

        if self.has_choices() {
            for choice in choices.iter().filter(|c| !c.content.trim().is_empty()) {
                storage
                    .insert(Table::Choice, choice.to_record(id))
                    .map_err(QuestionnaireError::storage)?;
            }
            self.choices = load_choices(storage, id)?;
        } else if !choices.is_empty() {
            warn!(
                question_id = id,
                question_type = %self.question_type,
                "choices ignored for a type without choices"
            );
        }

        debug!(question_id = id, question_type = %self.question_type, "added question");
        Ok(id)
    }

    /// Apply an edit and write it back, reconciling choices line by line.
    pub fn update<S: Storage>(
        &mut self,
        registry: &TypeRegistry,
        storage: &mut S,
        edit: QuestionEdit,
    ) -> Result<(), QuestionnaireError> {
        self.ensure_stored()?;

        self.dependency = match edit.depends_on {
            Some((parent_id, choice_id)) => Some(
                resolve_dependency(registry, storage, parent_id, choice_id)?.ok_or(
                    QuestionnaireError::NotFound {
                        table: Table::Question,
                        id: parent_id,
                    },
                )?,
            ),
            None => None,
        };
        self.name = edit.name;
        self.required = edit.required;
        self.length = edit.length;
        self.precise = edit.precise;
        self.content = if is_blank_html(&edit.content) {
            String::new()
        } else {
            edit.content
        };

        storage
            .update(Table::Question, self.id, self.to_record())
            .map_err(QuestionnaireError::storage)?;

        if self.has_choices() {
            self.update_choices(storage, &edit.all_choices)?;
        }
        debug!(question_id = self.id, "updated question");
        Ok(())
    }

    fn update_choices<S: Storage>(
        &mut self,
        storage: &mut S,
        all_choices: &str,
    ) -> Result<(), QuestionnaireError> {
        let lines: Vec<&str> = all_choices
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        for (index, line) in lines.iter().enumerate() {
            match self.choices.get(index) {
                Some(existing) if existing.content == *line => {}
                Some(existing) => storage
                    .update(Table::Choice, existing.id, Record::new().with("content", *line))
                    .map_err(QuestionnaireError::storage)?,
                None => {
                    storage
                        .insert(Table::Choice, Choice::new(*line).to_record(self.id))
                        .map_err(QuestionnaireError::storage)?;
                }
            }
        }

        let removed: Vec<ChoiceId> = self.choices.iter().skip(lines.len()).map(|c| c.id).collect();
        if !removed.is_empty() {
            storage
                .delete(&Query::new(Table::Choice).filter_in("id", removed))
                .map_err(QuestionnaireError::storage)?;
        }

        self.choices = load_choices(storage, self.id)?;
        Ok(())
    }

    /// Mark the question deleted. Stored answers are kept.
    pub fn delete<S: Storage>(&mut self, storage: &mut S) -> Result<(), QuestionnaireError> {
        self.ensure_stored()?;
        storage
            .update(
                Table::Question,
                self.id,
                Record::new().with("deleted", Value::flag(true)),
            )
            .map_err(QuestionnaireError::storage)?;
        self.deleted = true;
        debug!(question_id = self.id, "deleted question");
        Ok(())
    }

    fn ensure_stored(&self) -> Result<(), QuestionnaireError> {
        if self.id == 0 {
            return Err(QuestionnaireError::NotFound {
                table: Table::Question,
                id: 0,
            });
        }
        Ok(())
    }

    // === Answers ===

    /// The handler that stores and aggregates this type's answers, if any.
    pub fn response_handler(&self) -> Option<ResponseHandler> {
        self.question_type.response_kind().map(ResponseHandler::new)
    }

    /// Pull this question's answer out of submitted form data.
    pub fn submitted_value(&self, data: &FormData) -> SubmittedValue {
        let key = FieldKey::question(self.id);
        match self.question_type {
            QuestionType::YesNo
            | QuestionType::Text
            | QuestionType::Essay
            | QuestionType::Numeric
            | QuestionType::Date => match data.get_text(&key) {
                Some(text) => SubmittedValue::Text(text.trim().to_string()),
                None => SubmittedValue::Empty,
            },
            QuestionType::Radio => match data.get_text(&key) {
                Some(value) => self.selection(data, vec![value.to_string()]),
                None => SubmittedValue::Empty,
            },
            QuestionType::Drop => {
                match data.get_text(&key).and_then(|v| v.split_whitespace().next()) {
                    Some(choice) => SubmittedValue::choice(choice),
                    None => SubmittedValue::Empty,
                }
            }
            QuestionType::Check => match data.get(&key) {
                Some(FormValue::List(values)) => self.selection(data, values.clone()),
                Some(FormValue::Text(value)) if !value.is_empty() => {
                    self.selection(data, vec![value.clone()])
                }
                _ => SubmittedValue::Empty,
            },
            QuestionType::Rate => {
                let mut ranks = Vec::new();
                for choice in &self.choices {
                    let Some(value) = data.get_text(&FieldKey::sub_choice(self.id, choice.id))
                    else {
                        continue;
                    };
                    match value.trim().parse() {
                        Ok(rank) => ranks.push((choice.id, rank)),
                        Err(_) => warn!(
                            question_id = self.id,
                            choice_id = choice.id,
                            value,
                            "ignoring non-numeric rank"
                        ),
                    }
                }
                SubmittedValue::Ranks(ranks)
            }
            QuestionType::PageBreak | QuestionType::SectionText => SubmittedValue::Empty,
        }
    }

    fn selection(&self, data: &FormData, choices: Vec<String>) -> SubmittedValue {
        let others = choices
            .iter()
            .filter_map(|value| other_choice_id(value))
            .filter_map(|choice_id| {
                data.get_text(&FieldKey::sub_choice(self.id, choice_id))
                    .map(|text| (choice_id, text.trim().to_string()))
            })
            .collect();
        SubmittedValue::Selection { choices, others }
    }

    /// Check an answer against this question's constraints.
    pub fn validate_response(&self, value: &SubmittedValue) -> Result<(), ValidationError> {
        match self.response_handler() {
            Some(handler) => handler.validate(self, value),
            None => Ok(()),
        }
    }

    /// Store an answer under a submission.
    ///
    /// Returns how many rows were written, or `None` for types that collect
    /// nothing.
    pub fn insert_response<S: Storage>(
        &self,
        storage: &mut S,
        response_id: SubmissionId,
        value: &SubmittedValue,
    ) -> Result<Option<usize>, QuestionnaireError> {
        match self.response_handler() {
            Some(handler) => handler.insert(self, storage, response_id, value).map(Some),
            None => Ok(None),
        }
    }

    /// Aggregate stored answers, optionally limited to some submissions.
    pub fn get_results<S: Storage>(
        &self,
        storage: &S,
        response_ids: Option<&[SubmissionId]>,
    ) -> Result<Option<QuestionResults>, QuestionnaireError> {
        match self.response_handler() {
            Some(handler) => handler.results(self, storage, response_ids).map(Some),
            None => Ok(None),
        }
    }

    /// Stored answers as response containers, one per submission.
    pub fn get_responses<S: Storage>(
        &self,
        storage: &S,
        response_ids: Option<&[SubmissionId]>,
    ) -> Result<Option<Vec<ResponseRecord>>, QuestionnaireError> {
        match self.response_handler() {
            Some(handler) => handler.responses(self, storage, response_ids).map(Some),
            None => Ok(None),
        }
    }

    /// Render aggregated answers.
    ///
    /// Returns `false` when the type has nothing to show.
    pub fn display_results<S: Storage>(
        &self,
        storage: &S,
        renderer: &mut Renderer<'_>,
        response_ids: Option<&[SubmissionId]>,
        sort: SortOrder,
    ) -> Result<bool, QuestionnaireError> {
        let Some(handler) = self.response_handler() else {
            return Ok(false);
        };
        let mut results = handler.results(self, storage, response_ids)?;
        results.sort(sort);
        handler.display_results(self, &results, renderer);
        Ok(true)
    }

    /// A stored submission's answer, turned back into form fields.
    pub fn stored_form_values<S: Storage>(
        &self,
        storage: &S,
        response_id: SubmissionId,
    ) -> Result<FormData, QuestionnaireError> {
        match self.response_handler() {
            Some(handler) => handler.form_values(self, storage, response_id),
            None => Ok(FormData::new()),
        }
    }
}

/// Edit form values for an existing question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionEdit {
    pub name: String,
    pub required: bool,
    pub length: i64,
    pub precise: i64,
    pub content: String,
    /// Choices, one per line.
    pub all_choices: String,
    /// Parent question and choice.
    pub depends_on: Option<(QuestionId, ChoiceId)>,
}

impl QuestionEdit {
    /// Start from a question's current values.
    pub fn from_question(question: &Question) -> Self {
        Self {
            name: question.name.clone(),
            required: question.required,
            length: question.length,
            precise: question.precise,
            content: question.content.clone(),
            all_choices: question.all_choices(),
            depends_on: question.dependency.map(|d| (d.question_id, d.choice_id)),
        }
    }

    /// Read a submitted edit form.
    ///
    /// Missing numeric fields count as 0. The parent select submits
    /// `"question_id,choice_id"`; an empty value clears the dependency.
    pub fn from_form(data: &FormData) -> Result<Self, ValidationError> {
        let text = |field: &str| data.get_text(&FieldKey::new(field)).unwrap_or_default();
        let number = |field: &str| -> Result<i64, ValidationError> {
            let value = text(field).trim();
            if value.is_empty() {
                return Ok(0);
            }
            value.parse().map_err(|_| ValidationError::InvalidField {
                field: field.to_string(),
                value: value.to_string(),
            })
        };

        let depends_on = match text("dependquestion").trim() {
            "" => None,
            value => {
                let invalid = || ValidationError::InvalidField {
                    field: "dependquestion".to_string(),
                    value: value.to_string(),
                };
                let (parent, choice) = value.split_once(',').ok_or_else(invalid)?;
                let parent = parent.trim().parse().map_err(|_| invalid())?;
                let choice = choice.trim().parse().map_err(|_| invalid())?;
                Some((parent, choice))
            }
        };

        Ok(Self {
            name: text("name").trim().to_string(),
            required: text("required") == "y",
            length: number("length")?,
            precise: number("precise")?,
            content: text("content").to_string(),
            all_choices: text("allchoices").to_string(),
            depends_on,
        })
    }
}

/// The string key of a question type's display label.
pub fn type_label_key(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::YesNo => "yesno",
        QuestionType::Text => "textbox",
        QuestionType::Essay => "essaybox",
        QuestionType::Radio => "radiobuttons",
        QuestionType::Check => "checkboxes",
        QuestionType::Drop => "dropdown",
        QuestionType::Rate => "ratescale",
        QuestionType::Date => "date",
        QuestionType::Numeric => "numeric",
        QuestionType::PageBreak => "pagebreak",
        QuestionType::SectionText => "sectiontext",
    }
}

/// The choice id in an `other_{id}` selection value.
pub(crate) fn other_choice_id(value: &str) -> Option<ChoiceId> {
    value.strip_prefix("other_")?.parse().ok()
}

fn type_code(record: &Record) -> Result<u32, RecordError> {
    let code = record.get_int("type_id")?;
    u32::try_from(code).map_err(|_| RecordError::InvalidValue {
        column: "type_id".to_string(),
        value: code.to_string(),
    })
}

fn resolve_dependency<S: Storage>(
    registry: &TypeRegistry,
    storage: &S,
    parent_id: QuestionId,
    choice_id: ChoiceId,
) -> Result<Option<Dependency>, QuestionnaireError> {
    let parent = storage
        .fetch_one(&Query::by_id(Table::Question, parent_id).columns(["id", "type_id"]))
        .map_err(QuestionnaireError::storage)?;
    let Some(parent) = parent else {
        return Ok(None);
    };
    let (_, parent_type) = registry.resolve(storage, type_code(&parent)?)?;
    if !parent_type.can_be_parent() {
        warn!(
            parent_id,
            parent_type = %parent_type,
            "dependency on a type that cannot be a parent"
        );
    }
    Ok(Some(Dependency {
        question_id: parent_id,
        choice_id,
        parent_type,
    }))
}

pub(crate) fn load_choices<S: Storage>(
    storage: &S,
    question_id: QuestionId,
) -> Result<Vec<Choice>, QuestionnaireError> {
    let rows = storage
        .fetch(
            &Query::new(Table::Choice)
                .filter("question_id", question_id)
                .order_by("id"),
        )
        .map_err(QuestionnaireError::storage)?;
    rows.iter()
        .map(|row| Choice::from_record(row).map_err(QuestionnaireError::from))
        .collect()
}

fn next_position<S: Storage>(storage: &S, survey_id: SurveyId) -> Result<i64, QuestionnaireError> {
    let rows = storage
        .fetch(
            &Query::new(Table::Question)
                .filter("survey_id", survey_id)
                .filter("deleted", Value::flag(false))
                .columns(["position"]),
        )
        .map_err(QuestionnaireError::storage)?;
    let last = rows
        .iter()
        .filter_map(|row| row.get_opt_int("position").ok().flatten())
        .max()
        .unwrap_or(0);
    Ok(last + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    fn setup() -> (TypeRegistry, MemoryStorage) {
        (TypeRegistry::new(), MemoryStorage::with_question_types())
    }

    fn stored<S: Storage>(
        registry: &TypeRegistry,
        storage: &mut S,
        question_type: QuestionType,
        params: QuestionParams,
        choices: &[&str],
    ) -> Question {
        let mut question =
            build_question_by_type_code(registry, storage, question_type.code(), Some(params))
                .unwrap();
        let choices: Vec<Choice> = choices.iter().map(|c| Choice::new(*c)).collect();
        question.add(storage, &choices).unwrap();
        question
    }

    #[test]
    fn build_without_params_is_empty() {
        let (registry, storage) = setup();
        let question = build_question_by_type_code(&registry, &storage, 3, None).unwrap();
        assert_eq!(question.question_type(), QuestionType::Essay);
        assert_eq!(question.id(), 0);
        assert_eq!(question.name(), "");
        assert!(question.choices().is_empty());
    }

    #[test]
    fn build_rejects_unknown_codes() {
        let (registry, storage) = setup();
        let err = build_question_by_type_code(&registry, &storage, 0, None).unwrap_err();
        assert!(err.is_unknown_type());
    }

    #[test]
    fn build_rejects_missing_parent() {
        let (registry, storage) = setup();
        let params = QuestionParams::new().with_survey(1).depends_on(42, 0);
        let err = build_question_by_type_code(&registry, &storage, 2, Some(params)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn add_then_load_round_trips() {
        let (registry, mut storage) = setup();
        let params = QuestionParams::new()
            .with_survey(1)
            .with_name("Q1")
            .with_content("Pick one")
            .required(true);
        let added = stored(
            &registry,
            &mut storage,
            QuestionType::Radio,
            params,
            &["One", "Two", "Three"],
        );

        let loaded = Question::load(&registry, &storage, added.id()).unwrap();
        assert_eq!(loaded, added);
        assert_eq!(loaded.position(), 1);
        let contents: Vec<_> = loaded.choices().iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["One", "Two", "Three"]);
    }

    #[test]
    fn load_missing_question_is_not_found() {
        let (registry, storage) = setup();
        assert!(Question::load(&registry, &storage, 5).unwrap_err().is_not_found());
    }

    #[test]
    fn positions_follow_existing_questions() {
        let (registry, mut storage) = setup();
        let first = stored(
            &registry,
            &mut storage,
            QuestionType::YesNo,
            QuestionParams::new().with_survey(1),
            &[],
        );
        let second = stored(
            &registry,
            &mut storage,
            QuestionType::Text,
            QuestionParams::new().with_survey(1),
            &[],
        );
        assert_eq!((first.position(), second.position()), (1, 2));
    }

    #[test]
    fn dependency_is_resolved_on_load() {
        let (registry, mut storage) = setup();
        let parent = stored(
            &registry,
            &mut storage,
            QuestionType::YesNo,
            QuestionParams::new().with_survey(1),
            &[],
        );
        let child = stored(
            &registry,
            &mut storage,
            QuestionType::Text,
            QuestionParams::new().with_survey(1).depends_on(parent.id(), 1),
            &[],
        );

        let loaded = Question::load(&registry, &storage, child.id()).unwrap();
        let dependency = loaded.dependency().unwrap();
        assert_eq!(dependency.parent_type, QuestionType::YesNo);
        assert_eq!(dependency.expected_answer(), "n");
    }

    #[test]
    fn update_reconciles_choices() {
        let (registry, mut storage) = setup();
        let mut question = stored(
            &registry,
            &mut storage,
            QuestionType::Check,
            QuestionParams::new().with_survey(1),
            &["Red", "Green", "Blue"],
        );
        let kept = question.choices()[0].id;

        let mut edit = QuestionEdit::from_question(&question);
        edit.all_choices = "Red\nYellow\n".to_string();
        edit.content = "<p>  </p>".to_string();
        question.update(&registry, &mut storage, edit).unwrap();

        let contents: Vec<_> = question.choices().iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["Red", "Yellow"]);
        assert_eq!(question.choices()[0].id, kept);
        assert_eq!(question.content(), "");
        assert_eq!(storage.row_count(Table::Choice), 2);
    }

    #[test]
    fn delete_is_soft() {
        let (registry, mut storage) = setup();
        let mut question = stored(
            &registry,
            &mut storage,
            QuestionType::Essay,
            QuestionParams::new().with_survey(1),
            &[],
        );
        question.delete(&mut storage).unwrap();

        let loaded = Question::load(&registry, &storage, question.id()).unwrap();
        assert!(loaded.is_deleted());
    }

    #[test]
    fn unsaved_question_cannot_be_deleted() {
        let (registry, mut storage) = setup();
        let mut question = build_question_by_type_code(&registry, &storage, 1, None).unwrap();
        assert!(question.delete(&mut storage).unwrap_err().is_not_found());
    }

    #[test]
    fn dropdown_value_drops_dependency_markers() {
        let (registry, mut storage) = setup();
        let question = stored(
            &registry,
            &mut storage,
            QuestionType::Drop,
            QuestionParams::new().with_survey(1),
            &["A", "B"],
        );
        let choice = question.choices()[1].id;
        let data = FormData::new().with(
            FieldKey::question(question.id()),
            format!("{choice} qn-7 qn-8"),
        );
        assert_eq!(question.submitted_value(&data), SubmittedValue::choice(choice.to_string()));
    }

    #[test]
    fn radio_other_text_is_collected() {
        let (registry, mut storage) = setup();
        let question = stored(
            &registry,
            &mut storage,
            QuestionType::Radio,
            QuestionParams::new().with_survey(1),
            &["A", "!other=Something else"],
        );
        let other = question.choices()[1].id;
        let data = FormData::new()
            .with(FieldKey::question(question.id()), format!("other_{other}"))
            .with(FieldKey::sub_choice(question.id(), other), " mine ");

        assert_eq!(
            question.submitted_value(&data),
            SubmittedValue::Selection {
                choices: vec![format!("other_{other}")],
                others: vec![(other, "mine".to_string())],
            }
        );
    }

    #[test]
    fn rate_collects_ranks_per_choice() {
        let (registry, mut storage) = setup();
        let question = stored(
            &registry,
            &mut storage,
            QuestionType::Rate,
            QuestionParams::new().with_survey(1),
            &["A", "B", "C"],
        );
        let ids: Vec<_> = question.choices().iter().map(|c| c.id).collect();
        let data = FormData::new()
            .with(FieldKey::sub_choice(question.id(), ids[0]), "3")
            .with(FieldKey::sub_choice(question.id(), ids[2]), "x");
        assert_eq!(question.submitted_value(&data), SubmittedValue::Ranks(vec![(ids[0], 3)]));
    }

    #[test]
    fn layout_types_collect_nothing() {
        let (registry, mut storage) = setup();
        let question = stored(
            &registry,
            &mut storage,
            QuestionType::SectionText,
            QuestionParams::new().with_survey(1),
            &[],
        );
        assert!(question.response_handler().is_none());
        assert_eq!(question.insert_response(&mut storage, 1, &"x".into()).unwrap(), None);
        assert_eq!(question.get_results(&storage, None).unwrap(), None);
    }

    #[test]
    fn yes_no_skips_answers_other_than_y_or_n() {
        let (registry, mut storage) = setup();
        let params = QuestionParams::new().with_survey(1);
        let question = stored(&registry, &mut storage, QuestionType::YesNo, params, &[]);

        let maybe = question.insert_response(&mut storage, 1, &"maybe".into()).unwrap();
        assert_eq!(maybe, Some(0));
        assert_eq!(storage.row_count(Table::ResponseBool), 0);

        assert_eq!(question.insert_response(&mut storage, 2, &"y".into()).unwrap(), Some(1));
        assert_eq!(storage.row_count(Table::ResponseBool), 1);
    }

    #[test]
    fn edit_form_values_parse() {
        let data = FormData::new()
            .with("name", " Q7 ")
            .with("required", "y")
            .with("length", "12")
            .with("dependquestion", "4,17");
        let edit = QuestionEdit::from_form(&data).unwrap();
        assert_eq!(edit.name, "Q7");
        assert!(edit.required);
        assert_eq!(edit.length, 12);
        assert_eq!(edit.precise, 0);
        assert_eq!(edit.depends_on, Some((4, 17)));

        let bad = FormData::new().with("length", "wide");
        assert!(matches!(
            QuestionEdit::from_form(&bad),
            Err(ValidationError::InvalidField { .. })
        ));
    }
}
