//! Complete HTML pages for taking, editing and reporting on questionnaires.

use questionnaire::{
    EditContext, FormData, HtmlOutput, Output, PageKind, Question, Questionnaire,
    QuestionnaireError, Renderer, ReportTab, SortOrder, Storage, Strings, SubmissionId,
    escape_html,
};
use tracing::debug;

use crate::HtmlFormBuilder;

/// Options for HTML generation.
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    /// Title for the HTML document. Survey pages fall back to the survey title.
    pub title: Option<String>,
    /// Whether to include default CSS styling.
    pub include_styles: bool,
    /// Whether to generate a complete HTML document (with html/head/body tags).
    pub full_document: bool,
    /// CSS class prefix for the page chrome. Question markup keeps its own
    /// `qn-` classes.
    pub class_prefix: String,
    /// Where forms are posted.
    pub action: Option<String>,
}

impl HtmlOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self {
            title: None,
            include_styles: true,
            full_document: true,
            class_prefix: "questionnaire".to_string(),
            action: None,
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable default CSS styling.
    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    /// Generate a complete HTML document or just the page fragment.
    pub fn full_document(mut self, full: bool) -> Self {
        self.full_document = full;
        self
    }

    /// Set a custom CSS class prefix.
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Set the form action URL.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// The page for taking a questionnaire: all questions, or one page of them.
pub fn survey_page(
    survey: &Questionnaire,
    data: &FormData,
    page: Option<usize>,
    strings: &dyn Strings,
    options: &HtmlOptions,
) -> String {
    let title = page_title(options, &survey.settings().title);
    let mut out = HtmlOutput::new();
    let prefix = &options.class_prefix;

    let title_class = format!("{prefix}-title");
    form_start(&mut out, options);
    out.tag("h1", &[("class", title_class.as_str())], &title);

    if let Some(page) = page {
        let pages = survey.pages().len();
        if pages > 1 && survey.settings().autonum.numbers_pages() {
            let class = format!("{prefix}-page-number");
            let label = strings.string_with("page", &(page + 1).to_string());
            out.tag("div", &[("class", class.as_str())], &label);
        }
    }

    let missing = match page {
        Some(page) => survey.missing_required_on(page, data),
        None => survey.missing_required(data),
    };
    if !data.is_empty() && !missing.is_empty() {
        let class = format!("{prefix}-notice");
        out.start_tag("div", &[("class", class.as_str())]);
        for question_id in missing {
            let anchor = format!("#qn-{question_id}");
            out.start_tag("a", &[("href", anchor.as_str())]);
            out.text(&strings.string_with("missingrequired", &question_id.to_string()));
            out.end_tag("a");
        }
        out.end_tag("div");
    }

    let questions_class = format!("{prefix}-questions");
    out.start_tag("div", &[("class", questions_class.as_str())]);
    let mut renderer = Renderer::new(&mut out, strings, survey.render_context());
    survey.survey_display(&mut renderer, data, page, false);
    out.end_tag("div");

    submit_button(&mut out, prefix, &strings.string("submitsurvey"));
    out.end_tag("form");

    debug!(survey_id = survey.id(), ?page, "rendered survey page");
    document(out.into_string(), &title, options)
}

/// The edit form for one question.
pub fn edit_page(
    question: &Question,
    ctx: &EditContext,
    strings: &dyn Strings,
    options: &HtmlOptions,
) -> String {
    let prefix = &options.class_prefix;
    let mut form = HtmlFormBuilder::new(prefix.as_str());
    question.build_edit_form(&mut form, strings, ctx);

    let mut out = HtmlOutput::new();
    form_start(&mut out, options);
    let qid = question.id().to_string();
    let type_id = question.question_type().code().to_string();
    out.empty_tag("input", &[("type", "hidden"), ("name", "qid"), ("value", qid.as_str())]);
    out.empty_tag("input", &[("type", "hidden"), ("name", "type_id"), ("value", type_id.as_str())]);
    out.raw(&form.finish());
    submit_button(&mut out, prefix, &strings.string("savechanges"));
    out.end_tag("form");

    let title = options.title.clone().unwrap_or_else(|| {
        strings.string_with("editquestion", &strings.string(question.type_label_key()))
    });
    document(out.into_string(), &title, options)
}

/// Aggregated results for every question.
pub fn results_page<S: Storage>(
    survey: &Questionnaire,
    storage: &S,
    sort: SortOrder,
    strings: &dyn Strings,
    options: &HtmlOptions,
) -> Result<String, QuestionnaireError> {
    let title = page_title(options, &survey.settings().title);
    let prefix = &options.class_prefix;
    let response_ids = survey.response_ids(storage)?;

    let (page_class, title_class, summary_class) = (
        format!("{prefix}-results"),
        format!("{prefix}-title"),
        format!("{prefix}-summary"),
    );

    let mut out = HtmlOutput::new();
    out.start_tag("div", &[("class", page_class.as_str())]);
    out.tag("h1", &[("class", title_class.as_str())], &title);
    out.tag(
        "p",
        &[("class", summary_class.as_str())],
        &format!("{}: {}", strings.string("responses"), response_ids.len()),
    );

    let ctx = survey.render_context().with_page(PageKind::Report).with_tab(ReportTab::Summary);
    let mut renderer = Renderer::new(&mut out, strings, ctx);
    survey.results_display(storage, &mut renderer, Some(response_ids.as_slice()), sort)?;
    out.end_tag("div");

    Ok(document(out.into_string(), &title, options))
}

/// One stored submission, read-only.
pub fn response_page<S: Storage>(
    survey: &Questionnaire,
    storage: &S,
    response_id: SubmissionId,
    strings: &dyn Strings,
    options: &HtmlOptions,
) -> Result<String, QuestionnaireError> {
    let title = page_title(options, &survey.settings().title);
    let prefix = &options.class_prefix;
    let data = survey.load_submission(storage, response_id)?;

    let page_class = format!("{prefix}-response");
    let title_class = format!("{prefix}-title");

    let mut out = HtmlOutput::new();
    out.start_tag("div", &[("class", page_class.as_str())]);
    out.tag("h1", &[("class", title_class.as_str())], &title);

    let ctx = survey
        .render_context()
        .with_page(PageKind::Report)
        .with_tab(ReportTab::IndividualResponse);
    let mut renderer = Renderer::new(&mut out, strings, ctx);
    survey.response_display(&mut renderer, &data);
    out.end_tag("div");

    Ok(document(out.into_string(), &title, options))
}

fn page_title(options: &HtmlOptions, fallback: &str) -> String {
    options.title.clone().unwrap_or_else(|| fallback.to_string())
}

fn form_start(out: &mut HtmlOutput, options: &HtmlOptions) {
    let class = format!("{}-form", options.class_prefix);
    match &options.action {
        Some(action) => out.start_tag(
            "form",
            &[("class", class.as_str()), ("method", "post"), ("action", action.as_str())],
        ),
        None => out.start_tag("form", &[("class", class.as_str()), ("method", "post")]),
    }
}

fn submit_button(out: &mut HtmlOutput, prefix: &str, label: &str) {
    let class = format!("{prefix}-submit");
    out.tag("button", &[("type", "submit"), ("class", class.as_str())], label);
}

/// Wrap a page body in a document when the options ask for one.
fn document(body: String, title: &str, options: &HtmlOptions) -> String {
    if !options.full_document {
        return body;
    }

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    if options.include_styles {
        html.push_str(&generate_styles(&options.class_prefix));
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(&body);
    html.push_str("\n</body>\n</html>\n");
    html
}

/// Generate default CSS styles.
pub fn generate_styles(prefix: &str) -> String {
    format!(
        r#"  <style>
    .{prefix}-form, .{prefix}-results, .{prefix}-response {{
      max-width: 720px;
      margin: 2rem auto;
      padding: 1rem;
      font-family: sans-serif;
    }}
    .{prefix}-notice {{
      margin: 1rem 0;
      padding: 0.5rem;
      background: #fdecea;
    }}
    .{prefix}-notice a {{
      display: block;
    }}
    .{prefix}-field {{
      margin: 0.5rem 0;
    }}
    .{prefix}-field label {{
      display: block;
      margin-bottom: 0.25rem;
    }}
    .{prefix}-input, .{prefix}-textarea, .{prefix}-editor {{
      width: 100%;
      padding: 0.5rem;
      box-sizing: border-box;
    }}
    .{prefix}-fieldset {{
      margin: 1rem 0;
      padding: 1rem;
    }}
    .{prefix}-submit {{
      margin-top: 1rem;
      padding: 0.5rem 1rem;
    }}
    .qn-container {{
      margin: 1rem 0;
      padding: 1rem;
      border: 1px solid #ddd;
    }}
    .hidedependquestion {{
      display: none;
    }}
    .qn-info {{
      float: left;
      margin-right: 1rem;
    }}
    .accesshide {{
      position: absolute;
      left: -10000px;
    }}
    .req {{
      color: #c00;
    }}
    .unselected {{
      color: #888;
    }}
    .selected {{
      font-weight: bold;
    }}
    .qn-horizontal .qn-radio-option {{
      display: inline-block;
      margin-right: 1rem;
    }}
    .qn-results {{
      border-collapse: collapse;
    }}
    .qn-results th, .qn-results td {{
      padding: 0.25rem 0.75rem;
      border-bottom: 1px solid #ddd;
    }}
  </style>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_options_chaining() {
        let options = HtmlOptions::new()
            .with_title("Course feedback")
            .with_styles(false)
            .full_document(false)
            .with_class_prefix("cf")
            .with_action("/submit");

        assert_eq!(options.title, Some("Course feedback".to_string()));
        assert!(!options.include_styles);
        assert!(!options.full_document);
        assert_eq!(options.class_prefix, "cf");
        assert_eq!(options.action.as_deref(), Some("/submit"));
    }

    #[test]
    fn styles_hide_dependent_questions() {
        let styles = generate_styles("qn");
        assert!(styles.contains(".hidedependquestion {\n      display: none;"));
        assert!(styles.contains(".qn-form"));
    }

    #[test]
    fn document_escapes_title() {
        let html = document("<p>body</p>".into(), "Q&A", &HtmlOptions::new().with_styles(false));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Q&amp;A</title>"));
        assert!(!html.contains("<style>"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn fragment_is_returned_as_is() {
        let options = HtmlOptions::new().full_document(false);
        assert_eq!(document("<p>x</p>".into(), "T", &options), "<p>x</p>");
    }
}
