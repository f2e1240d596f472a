//! A whole questionnaire: settings plus its questions in order.

use chrono::{DateTime, Utc};
use questionnaire_types::{
    FormData, FormOption, Query, QuestionId, QuestionType, QuestionnaireError,
    QuestionnaireSettings, Record, RenderContext, SortOrder, Storage, Strings, SubmissionId,
    SurveyId, Table, Value,
};
use tracing::{debug, warn};

use crate::display::{Descendants, Renderer};
use crate::edit_form::EditContext;
use crate::visibility::dependency_satisfied;
use crate::{Question, TypeRegistry, ValidationError};

/// A loaded questionnaire.
#[derive(Debug, Clone, PartialEq)]
pub struct Questionnaire {
    id: SurveyId,
    settings: QuestionnaireSettings,
    questions: Vec<Question>,
}

impl Questionnaire {
    /// Store a new, empty questionnaire; returns its id.
    pub fn create<S: Storage>(
        storage: &mut S,
        settings: &QuestionnaireSettings,
    ) -> Result<SurveyId, QuestionnaireError> {
        let id = storage
            .insert(Table::Survey, settings.to_record())
            .map_err(QuestionnaireError::storage)?;
        debug!(survey_id = id, name = %settings.name, "created questionnaire");
        Ok(id)
    }

    /// Load settings and the non-deleted questions, ordered by position.
    ///
    /// Questions whose type has no implementation are left out.
    pub fn load<S: Storage>(
        registry: &TypeRegistry,
        storage: &S,
        survey_id: SurveyId,
    ) -> Result<Self, QuestionnaireError> {
        let record = storage
            .fetch_one(&Query::by_id(Table::Survey, survey_id))
            .map_err(QuestionnaireError::storage)?
            .ok_or(QuestionnaireError::NotFound {
                table: Table::Survey,
                id: survey_id,
            })?;
        let settings = QuestionnaireSettings::from_record(&record)?;

        let rows = storage
            .fetch(
                &Query::new(Table::Question)
                    .filter("survey_id", survey_id)
                    .filter("deleted", Value::flag(false))
                    .order_by("position")
                    .order_by("id"),
            )
            .map_err(QuestionnaireError::storage)?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in &rows {
            match Question::from_record(registry, storage, row) {
                Ok(question) => questions.push(question),
                Err(err) if err.is_unknown_type() => {
                    warn!(survey_id, error = %err, "skipping question of unknown type");
                }
                Err(err) => return Err(err),
            }
        }

        debug!(survey_id, questions = questions.len(), "loaded questionnaire");
        Ok(Self {
            id: survey_id,
            settings,
            questions,
        })
    }

    pub fn id(&self) -> SurveyId {
        self.id
    }

    pub fn settings(&self) -> &QuestionnaireSettings {
        &self.settings
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// A render context for taking this questionnaire.
    pub fn render_context(&self) -> RenderContext {
        RenderContext::new(self.settings.autonum)
    }

    /// Questions grouped into pages. Page breaks separate pages and are not
    /// part of any; empty pages are dropped.
    pub fn pages(&self) -> Vec<&[Question]> {
        self.questions
            .split(|q| q.question_type == QuestionType::PageBreak)
            .filter(|page| !page.is_empty())
            .collect()
    }

    /// Questions depending on `parent_id`, keyed by the parent answer that
    /// shows them.
    pub fn descendants(&self, parent_id: QuestionId) -> Descendants {
        let mut descendants = Descendants::new();
        for question in &self.questions {
            if let Some(dependency) = question.dependency.filter(|d| d.question_id == parent_id) {
                descendants.insert(dependency.expected_answer(), question.id);
            }
        }
        descendants
    }

    /// Edit form context for `question`, or for a new question added at the
    /// end when `None`.
    ///
    /// Parents are the yes/no, radio and dropdown questions positioned
    /// before it.
    pub fn edit_context(&self, question: Option<&Question>, strings: &dyn Strings) -> EditContext {
        let before = |candidate: &Question| match question {
            Some(q) => candidate.id != q.id && candidate.position < q.position,
            None => true,
        };

        let mut parents = Vec::new();
        let candidates = self
            .questions
            .iter()
            .filter(|q| q.question_type.can_be_parent() && before(q));
        for parent in candidates {
            let prefix = format!("{}. {}", parent.position, parent.name);
            if parent.question_type == QuestionType::YesNo {
                for (choice_id, key) in [(0, "yes"), (1, "no")] {
                    parents.push(FormOption::new(
                        format!("{},{choice_id}", parent.id),
                        format!("{prefix}->{}", strings.string(key)),
                    ));
                }
                continue;
            }
            for choice in &parent.choices {
                let label = if choice.is_other() {
                    choice
                        .other_label()
                        .map(str::to_string)
                        .unwrap_or_else(|| strings.string("other"))
                } else {
                    choice.content.clone()
                };
                parents.push(FormOption::new(
                    format!("{},{}", parent.id, choice.id),
                    format!("{prefix}->{label}"),
                ));
            }
        }

        EditContext::new(self.settings.navigate).with_parents(parents)
    }

    /// Render questions for taking: all of them, or one page.
    ///
    /// Numbers run across the whole questionnaire; layout types take none.
    pub fn survey_display(
        &self,
        renderer: &mut Renderer<'_>,
        data: &FormData,
        page: Option<usize>,
        blank: bool,
    ) {
        for (page_index, question, qnum) in self.numbered() {
            if page.is_some_and(|p| p != page_index) {
                continue;
            }
            let descendants = if question.question_type.can_be_parent() {
                self.descendants(question.id)
            } else {
                Descendants::new()
            };
            question.survey_display(renderer, data, &descendants, &qnum, blank);
        }
    }

    /// Render a stored submission read-only.
    pub fn response_display(&self, renderer: &mut Renderer<'_>, data: &FormData) {
        for (_, question, qnum) in self.numbered() {
            question.response_display(renderer, data, &qnum);
        }
    }

    /// Render aggregated results for every question that collects answers.
    pub fn results_display<S: Storage>(
        &self,
        storage: &S,
        renderer: &mut Renderer<'_>,
        response_ids: Option<&[SubmissionId]>,
        sort: SortOrder,
    ) -> Result<(), QuestionnaireError> {
        for (_, question, qnum) in self.numbered() {
            if question.response_handler().is_none() {
                continue;
            }
            let anchor = question.anchor();
            renderer.out.start_tag("div", &[("class", "qn-result"), ("id", anchor.as_str())]);
            let heading = if qnum.is_empty() {
                question.name.clone()
            } else {
                format!("{qnum}. {}", question.name)
            };
            renderer.out.tag("h3", &[("class", "qn-result-heading")], heading.trim());
            question.display_results(storage, renderer, response_ids, sort)?;
            renderer.out.end_tag("div");
        }
        Ok(())
    }

    /// Required questions left unanswered, in order.
    ///
    /// Dependent questions whose parent answer does not show them are not
    /// required.
    pub fn missing_required(&self, data: &FormData) -> Vec<QuestionId> {
        self.questions
            .iter()
            .filter(|q| q.required && !q.question_type.is_layout() && self.is_shown(q, data))
            .filter(|q| q.is_required_and_missing(data).is_missing())
            .map(|q| q.id)
            .collect()
    }

    /// Required questions left unanswered on one page.
    pub fn missing_required_on(&self, page: usize, data: &FormData) -> Vec<QuestionId> {
        let on_page: Vec<QuestionId> = self
            .numbered()
            .filter(|(index, _, _)| *index == page)
            .map(|(_, question, _)| question.id)
            .collect();
        self.missing_required(data)
            .into_iter()
            .filter(|id| on_page.contains(id))
            .collect()
    }

    /// Every problem with a submission: missing required answers and values
    /// that break a question's constraints.
    pub fn validate(&self, data: &FormData) -> Vec<(QuestionId, ValidationError)> {
        let missing = self.missing_required(data);
        let mut errors = Vec::new();
        for question in &self.questions {
            if missing.contains(&question.id) {
                errors.push((question.id, ValidationError::Required(question.id)));
                continue;
            }
            if let Err(err) = question.validate_response(&question.submitted_value(data)) {
                errors.push((question.id, err));
            }
        }
        errors
    }

    /// Store a completed submission and every question's answer.
    pub fn response_insert<S: Storage>(
        &self,
        storage: &mut S,
        data: &FormData,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmissionId, QuestionnaireError> {
        let header = Record::new()
            .with("survey_id", self.id)
            .with("submitted", now.to_rfc3339())
            .with("complete", Value::flag(true))
            .with("grade", 0)
            .with("username", username);
        let response_id = storage
            .insert(Table::Response, header)
            .map_err(QuestionnaireError::storage)?;

        let mut rows = 0;
        for question in &self.questions {
            let value = question.submitted_value(data);
            rows += question.insert_response(storage, response_id, &value)?.unwrap_or(0);
        }

        debug!(survey_id = self.id, response_id, rows, "stored submission");
        Ok(response_id)
    }

    /// Ids of completed submissions, oldest first.
    pub fn response_ids<S: Storage>(
        &self,
        storage: &S,
    ) -> Result<Vec<SubmissionId>, QuestionnaireError> {
        let rows = storage
            .fetch(
                &Query::new(Table::Response)
                    .filter("survey_id", self.id)
                    .filter("complete", Value::flag(true))
                    .order_by("id")
                    .columns(["id"]),
            )
            .map_err(QuestionnaireError::storage)?;
        rows.iter()
            .map(|row| row.id().map_err(QuestionnaireError::from))
            .collect()
    }

    /// A stored submission turned back into form fields.
    pub fn load_submission<S: Storage>(
        &self,
        storage: &S,
        response_id: SubmissionId,
    ) -> Result<FormData, QuestionnaireError> {
        let mut data = FormData::new();
        for question in &self.questions {
            data.extend(question.stored_form_values(storage, response_id)?);
        }
        Ok(data)
    }

    fn is_shown(&self, question: &Question, data: &FormData) -> bool {
        question
            .dependency
            .as_ref()
            .is_none_or(|dependency| dependency_satisfied(question, dependency, data))
    }

    /// Questions other than page breaks with their page index and number.
    fn numbered(&self) -> impl Iterator<Item = (usize, &Question, String)> {
        let numbering = self.settings.autonum.numbers_questions();
        let mut page = 0;
        let mut number = 0;
        self.questions.iter().filter_map(move |question| {
            match question.question_type {
                QuestionType::PageBreak => {
                    page += 1;
                    return None;
                }
                QuestionType::SectionText => return Some((page, question, String::new())),
                _ => number += 1,
            }
            let qnum = if numbering { number.to_string() } else { String::new() };
            Some((page, question, qnum))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnglishStrings, HtmlOutput, MemoryStorage, QuestionnaireGenerator};
    use questionnaire_types::{AutoNumbering, Choice, FieldKey, QuestionParams};

    fn survey(navigate: bool) -> (MemoryStorage, TypeRegistry, SurveyId) {
        let mut storage = MemoryStorage::with_question_types();
        let registry = TypeRegistry::new();
        let survey_id = QuestionnaireGenerator::new(&mut storage, &registry)
            .create_instance(&QuestionnaireSettings::new("Feedback").with_navigate(navigate))
            .unwrap();
        (storage, registry, survey_id)
    }

    #[test]
    fn pages_split_on_page_breaks() {
        let (mut storage, registry, survey_id) = survey(false);
        let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
        generator.yesno(survey_id, QuestionParams::new()).unwrap();
        generator.pagebreak(survey_id).unwrap();
        generator.textbox(survey_id, QuestionParams::new()).unwrap();
        generator.essay(survey_id, QuestionParams::new()).unwrap();

        let questionnaire = Questionnaire::load(&registry, &storage, survey_id).unwrap();
        let pages = questionnaire.pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 1);
        assert_eq!(pages[1].len(), 2);
    }

    #[test]
    fn missing_required_can_be_limited_to_a_page() {
        let (mut storage, registry, survey_id) = survey(false);
        let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
        let liked = generator.yesno(survey_id, QuestionParams::new().required(true)).unwrap();
        generator.pagebreak(survey_id).unwrap();
        let name = generator.textbox(survey_id, QuestionParams::new().required(true)).unwrap();

        let questionnaire = Questionnaire::load(&registry, &storage, survey_id).unwrap();
        let data = FormData::new().with(FieldKey::question(liked.id()), "y");
        assert!(questionnaire.missing_required_on(0, &data).is_empty());
        assert_eq!(questionnaire.missing_required_on(1, &data), [name.id()]);
        assert_eq!(questionnaire.missing_required(&data), [name.id()]);
    }

    #[test]
    fn deleted_questions_are_not_loaded() {
        let (mut storage, registry, survey_id) = survey(false);
        let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
        let mut first = generator.yesno(survey_id, QuestionParams::new()).unwrap();
        generator.textbox(survey_id, QuestionParams::new()).unwrap();
        first.delete(&mut storage).unwrap();

        let questionnaire = Questionnaire::load(&registry, &storage, survey_id).unwrap();
        assert_eq!(questionnaire.questions().len(), 1);
        assert_eq!(questionnaire.questions()[0].question_type(), QuestionType::Text);
    }

    #[test]
    fn numbering_skips_layout_types() {
        let (mut storage, registry, survey_id) = survey(false);
        let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
        generator.sectiontext(survey_id, "<p>Intro</p>").unwrap();
        generator.yesno(survey_id, QuestionParams::new()).unwrap();
        generator.pagebreak(survey_id).unwrap();
        generator.textbox(survey_id, QuestionParams::new()).unwrap();

        let questionnaire = Questionnaire::load(&registry, &storage, survey_id).unwrap();
        let numbers: Vec<(usize, String)> = questionnaire
            .numbered()
            .map(|(page, _, qnum)| (page, qnum))
            .collect();
        assert_eq!(
            numbers,
            [(0, String::new()), (0, "1".to_string()), (1, "2".to_string())]
        );

        let mut out = HtmlOutput::new();
        let mut renderer = Renderer::new(&mut out, &EnglishStrings, questionnaire.render_context());
        questionnaire.survey_display(&mut renderer, &FormData::new(), Some(1), false);
        let html = out.into_string();
        assert!(html.contains("<h2 class=\"qn-number\">2</h2>"));
        assert!(!html.contains("<h2 class=\"qn-number\">1</h2>"));
    }

    #[test]
    fn no_numbers_without_autonumbering() {
        let mut storage = MemoryStorage::with_question_types();
        let registry = TypeRegistry::new();
        let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
        let survey_id = generator
            .create_instance(
                &QuestionnaireSettings::new("Quiet").with_autonum(AutoNumbering::Pages),
            )
            .unwrap();
        generator.yesno(survey_id, QuestionParams::new()).unwrap();

        let questionnaire = Questionnaire::load(&registry, &storage, survey_id).unwrap();
        assert!(questionnaire.numbered().all(|(_, _, qnum)| qnum.is_empty()));
    }

    #[test]
    fn descendants_group_by_parent_answer() {
        let (mut storage, registry, survey_id) = survey(true);
        let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
        let parent = generator.yesno(survey_id, QuestionParams::new()).unwrap();
        let on_yes = generator
            .textbox(survey_id, QuestionParams::new().depends_on(parent.id(), 0))
            .unwrap();
        let on_no = generator
            .essay(survey_id, QuestionParams::new().depends_on(parent.id(), 1))
            .unwrap();

        let questionnaire = Questionnaire::load(&registry, &storage, survey_id).unwrap();
        let descendants = questionnaire.descendants(parent.id());
        assert_eq!(descendants.for_answer("y"), [on_yes.id()]);
        assert_eq!(descendants.for_answer("n"), [on_no.id()]);
        assert!(questionnaire.descendants(on_yes.id()).is_empty());
    }

    #[test]
    fn edit_context_lists_earlier_parents() {
        let (mut storage, registry, survey_id) = survey(true);
        let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
        let yesno = generator
            .yesno(survey_id, QuestionParams::new().with_name("Agree"))
            .unwrap();
        let radio = generator
            .radiobuttons(
                survey_id,
                QuestionParams::new().with_name("Colour"),
                &[Choice::new("Red"), Choice::new("!other=Something else")],
            )
            .unwrap();
        let later = generator.yesno(survey_id, QuestionParams::new()).unwrap();

        let questionnaire = Questionnaire::load(&registry, &storage, survey_id).unwrap();
        let radio = questionnaire.question(radio.id()).unwrap();
        let ctx = questionnaire.edit_context(Some(radio), &EnglishStrings);
        assert!(ctx.navigate);
        let values: Vec<&str> = ctx.parents.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, [format!("{},0", yesno.id()), format!("{},1", yesno.id())]);
        assert_eq!(ctx.parents[0].label, "1. Agree->Yes");

        let ctx = questionnaire.edit_context(None, &EnglishStrings);
        assert_eq!(ctx.parents.len(), 6);
        assert!(ctx.parents.iter().any(|o| o.label == "2. Colour->Something else"));
        assert!(ctx.parents.iter().any(|o| o.value == format!("{},1", later.id())));
    }

    #[test]
    fn hidden_dependents_are_not_required() {
        let (mut storage, registry, survey_id) = survey(true);
        let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
        let parent = generator.yesno(survey_id, QuestionParams::new().required(true)).unwrap();
        let child = generator
            .textbox(
                survey_id,
                QuestionParams::new().required(true).depends_on(parent.id(), 0),
            )
            .unwrap();

        let questionnaire = Questionnaire::load(&registry, &storage, survey_id).unwrap();
        assert_eq!(questionnaire.missing_required(&FormData::new()), [parent.id()]);

        let said_no = FormData::new().with(FieldKey::question(parent.id()), "n");
        assert!(questionnaire.missing_required(&said_no).is_empty());

        let said_yes = FormData::new().with(FieldKey::question(parent.id()), "y");
        assert_eq!(questionnaire.missing_required(&said_yes), [child.id()]);
        assert_eq!(
            questionnaire.validate(&said_yes),
            [(child.id(), ValidationError::Required(child.id()))]
        );
    }

    #[test]
    fn submission_round_trip() {
        let (mut storage, registry, survey_id) = survey(false);
        let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
        let yesno = generator.yesno(survey_id, QuestionParams::new()).unwrap();
        let text = generator.textbox(survey_id, QuestionParams::new()).unwrap();

        let questionnaire = Questionnaire::load(&registry, &storage, survey_id).unwrap();
        let data = FormData::new()
            .with(FieldKey::question(yesno.id()), "y")
            .with(FieldKey::question(text.id()), "Blue");
        let now = DateTime::parse_from_rfc3339("2015-01-27T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let response_id = questionnaire
            .response_insert(&mut storage, &data, "student1", now)
            .unwrap();

        assert_eq!(questionnaire.response_ids(&storage).unwrap(), [response_id]);
        assert_eq!(questionnaire.load_submission(&storage, response_id).unwrap(), data);

        let header = storage.rows(Table::Response).next().unwrap();
        assert_eq!(header.get_str("username").unwrap(), "student1");
        assert_eq!(header.get_str("submitted").unwrap(), "2015-01-27T10:00:00+00:00");
    }

    #[test]
    fn missing_survey_is_not_found() {
        let storage = MemoryStorage::with_question_types();
        let err = Questionnaire::load(&TypeRegistry::new(), &storage, 5).unwrap_err();
        assert!(err.is_not_found());
    }
}
