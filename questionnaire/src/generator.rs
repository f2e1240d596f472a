//! Builds questionnaires and questions in storage, for tests and demos.

use questionnaire_types::{
    Choice, QuestionParams, QuestionType, QuestionnaireError, QuestionnaireSettings, Storage,
    SurveyId,
};
use tracing::debug;

use crate::survey::Questionnaire;
use crate::{Question, TypeRegistry, build_question_by_type_code};

const DEFAULT_CHOICES: [&str; 3] = ["One", "Two", "Three"];

/// Creates stored questionnaires and questions with sensible defaults.
///
/// # Example
///
/// ```
/// use questionnaire::{
///     MemoryStorage, QuestionParams, QuestionnaireGenerator, QuestionnaireSettings, TypeRegistry,
/// };
///
/// let mut storage = MemoryStorage::new();
/// let registry = TypeRegistry::new();
/// let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
///
/// let survey_id = generator.create_instance(&QuestionnaireSettings::new("Feedback")).unwrap();
/// let question = generator.checkbox(survey_id, QuestionParams::new(), &[]).unwrap();
/// assert_eq!(question.choices().len(), 3);
/// ```
pub struct QuestionnaireGenerator<'a, S: Storage> {
    storage: &'a mut S,
    registry: &'a TypeRegistry,
    created: usize,
}

impl<'a, S: Storage> QuestionnaireGenerator<'a, S> {
    pub fn new(storage: &'a mut S, registry: &'a TypeRegistry) -> Self {
        Self {
            storage,
            registry,
            created: 0,
        }
    }

    /// Store a questionnaire, installing the question types first if the
    /// storage has none.
    pub fn create_instance(
        &mut self,
        settings: &QuestionnaireSettings,
    ) -> Result<SurveyId, QuestionnaireError> {
        TypeRegistry::install_defaults(self.storage)?;
        Questionnaire::create(self.storage, settings)
    }

    /// Store a question of any type.
    ///
    /// Empty content gets a numbered placeholder; a type with choices but
    /// none given gets "One", "Two" and "Three".
    pub fn create_question(
        &mut self,
        question_type: QuestionType,
        mut params: QuestionParams,
        choices: &[Choice],
    ) -> Result<Question, QuestionnaireError> {
        self.created += 1;
        if params.content.is_empty() && !question_type.is_layout() {
            params.content = format!("<p>{question_type} question {}</p>", self.created);
        }

        let mut question = build_question_by_type_code(
            self.registry,
            &*self.storage,
            question_type.code(),
            Some(params),
        )?;

        let defaults: Vec<Choice>;
        let choices: &[Choice] = if question_type.has_choices() && choices.is_empty() {
            defaults = DEFAULT_CHOICES.into_iter().map(Choice::new).collect();
            &defaults
        } else {
            choices
        };

        question.add(self.storage, choices)?;
        debug!(question_id = question.id(), question_type = %question_type, "generated question");
        Ok(question)
    }

    pub fn checkbox(
        &mut self,
        survey_id: SurveyId,
        params: QuestionParams,
        choices: &[Choice],
    ) -> Result<Question, QuestionnaireError> {
        self.create_question(QuestionType::Check, params.with_survey(survey_id), choices)
    }

    pub fn date(
        &mut self,
        survey_id: SurveyId,
        params: QuestionParams,
    ) -> Result<Question, QuestionnaireError> {
        self.create_question(QuestionType::Date, params.with_survey(survey_id), &[])
    }

    pub fn dropdown(
        &mut self,
        survey_id: SurveyId,
        params: QuestionParams,
        choices: &[Choice],
    ) -> Result<Question, QuestionnaireError> {
        self.create_question(QuestionType::Drop, params.with_survey(survey_id), choices)
    }

    /// An essay box; rows default to 5.
    pub fn essay(
        &mut self,
        survey_id: SurveyId,
        params: QuestionParams,
    ) -> Result<Question, QuestionnaireError> {
        let params = with_defaults(params, 0, 5).with_survey(survey_id);
        self.create_question(QuestionType::Essay, params, &[])
    }

    pub fn pagebreak(&mut self, survey_id: SurveyId) -> Result<Question, QuestionnaireError> {
        self.create_question(
            QuestionType::PageBreak,
            QuestionParams::new().with_survey(survey_id),
            &[],
        )
    }

    pub fn sectiontext(
        &mut self,
        survey_id: SurveyId,
        content: &str,
    ) -> Result<Question, QuestionnaireError> {
        let params = QuestionParams::new().with_survey(survey_id).with_content(content);
        self.create_question(QuestionType::SectionText, params, &[])
    }

    /// A numeric box; 10 digits with no decimals by default.
    pub fn numeric(
        &mut self,
        survey_id: SurveyId,
        params: QuestionParams,
    ) -> Result<Question, QuestionnaireError> {
        let params = with_defaults(params, 10, 0).with_survey(survey_id);
        self.create_question(QuestionType::Numeric, params, &[])
    }

    pub fn radiobuttons(
        &mut self,
        survey_id: SurveyId,
        params: QuestionParams,
        choices: &[Choice],
    ) -> Result<Question, QuestionnaireError> {
        self.create_question(QuestionType::Radio, params.with_survey(survey_id), choices)
    }

    /// A rating scale; 5 points by default.
    pub fn ratingscale(
        &mut self,
        survey_id: SurveyId,
        params: QuestionParams,
        choices: &[Choice],
    ) -> Result<Question, QuestionnaireError> {
        let params = with_defaults(params, 5, 0).with_survey(survey_id);
        self.create_question(QuestionType::Rate, params, choices)
    }

    /// A text box 20 wide accepting 25 characters by default.
    pub fn textbox(
        &mut self,
        survey_id: SurveyId,
        params: QuestionParams,
    ) -> Result<Question, QuestionnaireError> {
        let params = with_defaults(params, 20, 25).with_survey(survey_id);
        self.create_question(QuestionType::Text, params, &[])
    }

    pub fn yesno(
        &mut self,
        survey_id: SurveyId,
        params: QuestionParams,
    ) -> Result<Question, QuestionnaireError> {
        self.create_question(QuestionType::YesNo, params.with_survey(survey_id), &[])
    }
}

fn with_defaults(params: QuestionParams, length: i64, precise: i64) -> QuestionParams {
    let length = if params.length == 0 { length } else { params.length };
    let precise = if params.precise == 0 { precise } else { params.precise };
    params.with_length(length).with_precise(precise)
}
