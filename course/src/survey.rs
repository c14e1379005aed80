use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CourseError;

/// What a zone hands to the response on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    /// The zone was passed; it asks nothing.
    Acknowledged,
    Choice(String),
    Selections(BTreeSet<String>),
    Text(String),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Acknowledged => f.write_str("(acknowledged)"),
            Answer::Choice(id) => f.write_str(id),
            Answer::Selections(ids) => {
                let joined: Vec<&str> = ids.iter().map(String::as_str).collect();
                write!(f, "[{}]", joined.join(", "))
            }
            Answer::Text(text) => write!(f, "{text:?}"),
        }
    }
}

/// Answers keyed by zone id. Only zone completion writes here, and each
/// zone writes at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    answers: BTreeMap<String, Answer>,
}

impl SurveyResponse {
    pub(crate) fn record(&mut self, zone: &str, answer: Answer) -> Result<(), CourseError> {
        if self.answers.contains_key(zone) {
            return Err(CourseError::AlreadyAnswered(zone.to_string()));
        }
        self.answers.insert(zone.to_string(), answer);
        Ok(())
    }

    pub fn get(&self, zone: &str) -> Option<&Answer> {
        self.answers.get(zone)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_write_is_rejected() {
        let mut response = SurveyResponse::default();
        response.record("age", Answer::Choice("25-34".into())).unwrap();
        let err = response.record("age", Answer::Choice("18-24".into())).unwrap_err();
        assert_eq!(err, CourseError::AlreadyAnswered("age".into()));
        assert_eq!(response.get("age"), Some(&Answer::Choice("25-34".into())));
    }

    #[test]
    fn selections_display_sorted() {
        let picks: BTreeSet<String> = ["solo", "family"].iter().map(|s| s.to_string()).collect();
        assert_eq!(Answer::Selections(picks).to_string(), "[family, solo]");
    }
}
