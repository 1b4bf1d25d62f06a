//! Core types for the PET advisor
//!
//! Everything here is plain data: built once from the source table
//! (questions, index entries) or produced per request (answers, rankings,
//! veto reports, wizard steps).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A screening question shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier (`q1`, `q2`, ...) assigned in source order
    pub id: String,
    /// Trimmed question text, unique across the catalog
    pub text: String,
    /// Whether more than one option may be selected
    pub multi: bool,
    /// Answer options in source-table order
    pub options: Vec<String>,
    /// Id of the question this one is conditional on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
    /// Answer that must be selected on `depends_on` for this question to show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_value: Option<String>,
}

/// One answer or a set of answers to a single question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multi(Vec<String>),
}

impl AnswerValue {
    /// Selected options; a single answer is a one-element set
    pub fn selections(&self) -> &[String] {
        match self {
            AnswerValue::Single(answer) => std::slice::from_ref(answer),
            AnswerValue::Multi(answers) => answers,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(answer: &str) -> Self {
        AnswerValue::Single(answer.to_string())
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(answers: Vec<&str>) -> Self {
        AnswerValue::Multi(answers.into_iter().map(str::to_string).collect())
    }
}

/// The user's answers, keyed by question text, in insertion order
///
/// Re-inserting a question replaces its answer in place, so iteration order
/// stays the order in which questions were first answered. Deserializing
/// keeps document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    entries: IndexMap<String, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question: impl Into<String>, answer: impl Into<AnswerValue>) {
        self.entries.insert(question.into(), answer.into());
    }

    pub fn get(&self, question: &str) -> Option<&AnswerValue> {
        self.entries.get(question)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.entries.iter().map(|(q, a)| (q.as_str(), a))
    }

    /// Every (question, answer) pair, flattening multi-select answers
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(q, a)| {
            a.selections()
                .iter()
                .map(move |answer| (q.as_str(), answer.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Q: Into<String>, A: Into<AnswerValue>> FromIterator<(Q, A)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (Q, A)>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for (question, answer) in iter {
            set.insert(question, answer);
        }
        set
    }
}

/// Techniques and parameter advice recorded for one (question, answer) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueEntry {
    /// Technique names in source order; repeats are kept and each one votes
    pub techniques: Vec<String>,
    /// Free-text parameter suggestion, empty when none
    pub parameter_text: String,
}

/// Techniques disqualified by one (question, answer) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetoEntry {
    pub vetoed: Vec<String>,
}

/// Why a technique appears in the ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rationale {
    #[serde(rename = "vetoed")]
    Vetoed,
    #[serde(rename = "matches survey")]
    MatchesSurvey,
}

impl Rationale {
    pub fn label(&self) -> &'static str {
        match self {
            Rationale::Vetoed => "vetoed",
            Rationale::MatchesSurvey => "matches survey",
        }
    }
}

/// A technique with its vote count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedTechnique {
    pub name: String,
    pub score: u32,
    pub rationale: Rationale,
}

/// A vetoed technique and the answers that vetoed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetoReport {
    pub name: String,
    /// `"{question} → {answer}"`, in answer order
    pub reasons: Vec<String>,
}

/// Full output of scoring one answer set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub ranked: Vec<RankedTechnique>,
    pub parameters: Vec<String>,
    pub vetoed: Vec<VetoReport>,
}

impl Evaluation {
    /// Ranked names in order, for carrying over to the wizard step
    pub fn technique_names(&self) -> Vec<String> {
        self.ranked.iter().map(|r| r.name.clone()).collect()
    }
}

/// How a wizard step collects its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input_type", rename_all = "snake_case")]
pub enum InputKind {
    Number { placeholder: String },
    Choice { options: Vec<String> },
}

/// A single follow-up question inside a technique wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardStep {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub input: InputKind,
}

impl WizardStep {
    pub fn number(id: &str, text: &str, placeholder: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            input: InputKind::Number {
                placeholder: placeholder.to_string(),
            },
        }
    }

    pub fn choice(id: &str, text: &str, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            input: InputKind::Choice {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        }
    }
}
