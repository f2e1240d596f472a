use chrono::{DateTime, Utc};
use questionnaire::{
    Choice, EnglishStrings, FieldKey, FormData, MemoryStorage, QuestionParams, Questionnaire,
    QuestionnaireGenerator, QuestionnaireSettings, SortOrder, TypeRegistry,
};
use questionnaire_html::{HtmlOptions, edit_page, response_page, results_page, survey_page};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2015-01-27T09:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// A two page survey: a required yes/no question, a page break and a radio question.
fn fixture() -> (MemoryStorage, Questionnaire) {
    init_tracing();
    let mut storage = MemoryStorage::new();
    let registry = TypeRegistry::new();
    let mut generator = QuestionnaireGenerator::new(&mut storage, &registry);
    let survey_id = generator
        .create_instance(&QuestionnaireSettings::new("Course <feedback>").with_navigate(true))
        .unwrap();
    generator
        .yesno(
            survey_id,
            QuestionParams::new()
                .with_name("Liked")
                .with_content("<p>Did you like it?</p>")
                .required(true),
        )
        .unwrap();
    generator.pagebreak(survey_id).unwrap();
    generator
        .radiobuttons(
            survey_id,
            QuestionParams::new().with_name("Colour"),
            &[Choice::new("Red"), Choice::new("Blue")],
        )
        .unwrap();

    let survey = Questionnaire::load(&registry, &storage, survey_id).unwrap();
    (storage, survey)
}

fn fragment() -> HtmlOptions {
    HtmlOptions::new().full_document(false)
}

#[test]
fn survey_page_renders_form_and_questions() {
    let (_, survey) = fixture();
    let liked = survey.questions()[0].id();

    let html = survey_page(&survey, &FormData::new(), None, &EnglishStrings, &HtmlOptions::new());

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Course &lt;feedback&gt;</title>"));
    assert!(html.contains("<form class=\"questionnaire-form\" method=\"post\">"));
    assert!(html.contains(&format!("name=\"q{liked}\" id=\"q{liked}_y\" value=\"y\"")));
    assert!(html.contains("Did you like it?"));
    assert!(html.contains("Red"));
    assert!(html.contains(
        "<button type=\"submit\" class=\"questionnaire-submit\">Submit questionnaire</button>"
    ));
    assert!(!html.contains("class=\"questionnaire-notice\""));
}

#[test]
fn survey_page_shows_only_the_requested_page() {
    let (_, survey) = fixture();

    let html = survey_page(&survey, &FormData::new(), Some(1), &EnglishStrings, &fragment());

    assert!(html.contains("Red"));
    assert!(!html.contains("Did you like it?"));
}

#[test]
fn page_notice_ignores_questions_on_other_pages() {
    let (_, survey) = fixture();
    let colour = &survey.questions()[2];
    let data = FormData::new().with(
        FieldKey::question(colour.id()),
        colour.choices()[0].id.to_string(),
    );

    let html = survey_page(&survey, &data, Some(1), &EnglishStrings, &fragment());

    assert!(!html.contains("class=\"questionnaire-notice\""));
}

#[test]
fn missing_required_answers_are_listed() {
    let (_, survey) = fixture();
    let liked = survey.questions()[0].id();
    let colour = &survey.questions()[2];
    let data = FormData::new().with(
        FieldKey::question(colour.id()),
        colour.choices()[0].id.to_string(),
    );

    let html = survey_page(&survey, &data, None, &EnglishStrings, &fragment());

    assert!(html.contains("<div class=\"questionnaire-notice\">"));
    assert!(html.contains(&format!(
        "<a href=\"#qn-{liked}\">Please answer required question #{liked}</a>"
    )));
}

#[test]
fn edit_page_lists_fields_in_order() {
    let (_, survey) = fixture();
    let colour = &survey.questions()[2];
    let ctx = survey.edit_context(Some(colour), &EnglishStrings);

    let html = edit_page(colour, &ctx, &EnglishStrings, &fragment());

    let position = |needle: &str| {
        html.find(needle)
            .unwrap_or_else(|| panic!("missing {needle} in {html}"))
    };
    assert!(html.contains(&format!(
        "<input type=\"hidden\" name=\"qid\" value=\"{}\" />",
        colour.id()
    )));
    assert!(position("id=\"questionhdredit\"") < position("name=\"name\""));
    assert!(position("name=\"name\"") < position("name=\"required\""));
    assert!(position("name=\"required\"") < position("name=\"dependquestion\""));
    assert!(position("name=\"dependquestion\"") < position("name=\"content\""));
    assert!(position("name=\"content\"") < position("name=\"allchoices\""));
    assert!(html.contains("Red\nBlue</textarea>"));
    assert!(html.contains("Save changes</button>"));
}

#[test]
fn results_and_response_pages_reflect_submissions() {
    let (mut storage, survey) = fixture();
    let liked = survey.questions()[0].id();
    let colour = &survey.questions()[2];
    let blue = colour.choices()[1].id;
    let data = FormData::new()
        .with(FieldKey::question(liked), "n")
        .with(FieldKey::question(colour.id()), blue.to_string());
    let response_id = survey
        .response_insert(&mut storage, &data, "student1", now())
        .unwrap();

    let results =
        results_page(&survey, &storage, SortOrder::Descending, &EnglishStrings, &fragment())
            .unwrap();
    assert!(results.contains("<p class=\"questionnaire-summary\">Responses: 1</p>"));
    assert!(results.contains("<table class=\"qn-results\">"));
    assert!(results.contains("Blue"));

    let response = response_page(&survey, &storage, response_id, &EnglishStrings, &fragment())
        .unwrap();
    assert!(response.contains(
        "<div class=\"response yesno\"><span class=\"unselected\">Yes</span>\
         <span class=\"selected\">No</span></div>"
    ));
    assert!(response.contains("<h1 class=\"questionnaire-title\">Course &lt;feedback&gt;</h1>"));
}

#[test]
fn response_page_for_unknown_submission_selects_nothing() {
    let (storage, survey) = fixture();
    let html = response_page(&survey, &storage, 999, &EnglishStrings, &fragment()).unwrap();
    assert!(html.contains(
        "<div class=\"response yesno\"><span class=\"unselected\">Yes</span>\
         <span class=\"unselected\">No</span></div>"
    ));
}
