//! HTML pages for questionnaires.
//!
//! This crate turns the engine's output into browser-ready markup:
//! - `HtmlFormBuilder` - renders question edit forms
//! - `survey_page`, `edit_page`, `results_page` and `response_page` - complete documents
//! - `HtmlOptions` - title, styling and document shape

mod form_builder;
pub use form_builder::HtmlFormBuilder;

mod generator;
pub use generator::{
    HtmlOptions, edit_page, generate_styles, response_page, results_page, survey_page,
};
