use crate::ChoiceId;

/// The answer extracted from form data for one question, shaped by its type.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmittedValue {
    /// Nothing was submitted.
    Empty,

    /// A scalar answer (text, essay, numeric, date, yes/no).
    Text(String),

    /// Selected choice values (radio, dropdown, check boxes), plus the free
    /// text typed next to any selected "other" choice.
    Selection {
        choices: Vec<String>,
        others: Vec<(ChoiceId, String)>,
    },

    /// One rank per answered rating choice.
    Ranks(Vec<(ChoiceId, i64)>),
}

impl SubmittedValue {
    /// A selection of a single choice value.
    pub fn choice(value: impl Into<String>) -> Self {
        Self::Selection {
            choices: vec![value.into()],
            others: Vec::new(),
        }
    }

    /// Whether there is nothing to store.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Selection { choices, .. } => choices.iter().all(|c| c.is_empty()),
            Self::Ranks(ranks) => ranks.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the type name of this value for log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Text(_) => "Text",
            Self::Selection { .. } => "Selection",
            Self::Ranks(_) => "Ranks",
        }
    }
}

impl From<String> for SubmittedValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for SubmittedValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness() {
        assert!(SubmittedValue::Empty.is_empty());
        assert!(SubmittedValue::from("").is_empty());
        assert!(SubmittedValue::choice("").is_empty());
        assert!(!SubmittedValue::choice("4").is_empty());
        assert!(!SubmittedValue::Ranks(vec![(1, 3)]).is_empty());
    }
}
