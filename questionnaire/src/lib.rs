#![doc = include_str!("../README.md")]

// Re-export all types from questionnaire-types
pub use questionnaire_types::*;

mod registry;
pub use registry::TypeRegistry;

// In-memory storage for tests and demos
mod memory_storage;
pub use memory_storage::{MemoryStorage, MemoryStorageError};

mod markup;
pub use markup::{FormIdCounter, HtmlOutput, escape_html, is_blank_html, sanitize_html};

mod strings;
pub use strings::EnglishStrings;

mod error;
pub use error::ValidationError;

mod question;
pub use question::{Question, QuestionEdit, build_question_by_type_code, type_label_key};

mod visibility;
pub use visibility::{DisplayClass, dependency_satisfied, display_class};

mod required;
pub use required::RequiredMarker;

mod display;
pub use display::{Descendants, Renderer};

mod body;
mod response_body;

mod handler;
pub use handler::ResponseHandler;

mod edit_form;
pub use edit_form::EditContext;

mod form_recorder;
pub use form_recorder::RecordingFormBuilder;

mod survey;
pub use survey::Questionnaire;

mod generator;
pub use generator::QuestionnaireGenerator;
