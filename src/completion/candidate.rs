//! Completion candidates and prefix filtering.

use serde::{Deserialize, Serialize};

/// A single completion suggestion with an optional one-line description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Candidate {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: None,
        }
    }

    pub fn with_description(value: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            value: value.into(),
            description: if description.is_empty() {
                None
            } else {
                Some(description)
            },
        }
    }

    /// Parse `value` or `value<TAB>description`, splitting on the first tab.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('\t') {
            Some((value, description)) => Self::with_description(value, description),
            None => Self::new(raw),
        }
    }

    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.value.starts_with(prefix)
    }
}

impl From<&str> for Candidate {
    fn from(raw: &str) -> Self {
        Candidate::parse(raw)
    }
}

impl From<String> for Candidate {
    fn from(raw: String) -> Self {
        Candidate::parse(&raw)
    }
}

/// Keep candidates whose value starts with `prefix` (case-sensitive), in order.
pub fn filter_by_prefix(candidates: Vec<Candidate>, prefix: &str) -> Vec<Candidate> {
    if prefix.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|c| c.matches_prefix(prefix))
        .collect()
}
