//! Built-in English strings.

use questionnaire_types::Strings;

const ENGLISH: &[(&str, &str)] = &[
    // Editing
    ("addnewquestion", "New {$a} question"),
    ("editquestion", "Editing {$a} question"),
    ("optionalname", "Question name"),
    ("required", "Response is required"),
    ("text", "Question text"),
    ("possibleanswers", "Possible answers"),
    ("dependquestion", "Parent question"),
    ("none", "None"),
    ("fieldlength", "Input box length"),
    ("maxtextlength", "Maximum text length"),
    ("textareacolumns", "Columns"),
    ("textarearows", "Rows"),
    ("maxdigitsallowed", "Max. digits allowed"),
    ("numberofdecimaldigits", "Nb of decimal digits"),
    ("numberscaleitems", "Nb of scale items"),
    ("kindofratescale", "Type of rate scale"),
    ("normal", "Normal"),
    ("notapplicablecolumn", "N/A column"),
    ("minforcedresponses", "Min. forced responses"),
    ("maxforcedresponses", "Max. forced responses"),
    ("alignment", "Alignment"),
    ("vertical", "Vertical"),
    ("horizontal", "Horizontal"),
    ("savechanges", "Save changes"),
    // Question type labels
    ("yesno", "Yes/No"),
    ("textbox", "Text Box"),
    ("essaybox", "Essay Box"),
    ("radiobuttons", "Radio Buttons"),
    ("checkboxes", "Check Boxes"),
    ("dropdown", "Dropdown Box"),
    ("ratescale", "Rate (scale 1..5)"),
    ("date", "Date"),
    ("numeric", "Numeric"),
    ("pagebreak", "----- Page Break -----"),
    ("sectiontext", "Label"),
    // Taking
    ("yes", "Yes"),
    ("no", "No"),
    ("noanswer", "No answer"),
    ("other", "Other:"),
    ("choosedots", "Choose..."),
    ("notapplicable", "N/A"),
    ("questionnum", "Question #"),
    ("dateformatting", "Use the year-month-day format, e.g. 1945-03-14"),
    ("answerquestions", "Answer the questions..."),
    ("page", "Page {$a}"),
    ("missingrequired", "Please answer required question #{$a}"),
    ("submitsurvey", "Submit questionnaire"),
    // Results
    ("response", "Response"),
    ("responses", "Responses"),
    ("numberofresponses", "Number of responses"),
    ("average", "Average rank"),
    ("total", "Total"),
    ("noresponses", "No responses"),
    ("submitted", "Submitted on:"),
    ("respondent", "Respondent:"),
];

/// English strings for every key the engine and its renderers look up.
///
/// Unknown keys come back as `[[key]]` so missing strings are visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishStrings;

impl EnglishStrings {
    pub fn new() -> Self {
        Self
    }

    /// Whether a key has an English string.
    pub fn contains(&self, key: &str) -> bool {
        ENGLISH.iter().any(|(k, _)| *k == key)
    }
}

impl Strings for EnglishStrings {
    fn get(&self, key: &str, _component: &str, param: Option<&str>) -> String {
        let Some((_, text)) = ENGLISH.iter().find(|(k, _)| *k == key) else {
            return format!("[[{key}]]");
        };
        match param {
            Some(param) => text.replace("{$a}", param),
            None => (*text).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_parameter() {
        let strings = EnglishStrings::new();
        assert_eq!(strings.string_with("addnewquestion", "Essay Box"), "New Essay Box question");
        assert_eq!(strings.string("yes"), "Yes");
    }

    #[test]
    fn unknown_keys_are_marked() {
        assert_eq!(EnglishStrings.string("nosuchkey"), "[[nosuchkey]]");
        assert!(!EnglishStrings.contains("nosuchkey"));
    }
}
