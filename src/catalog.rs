//! Question catalog: the ordered screening questionnaire
//!
//! Question order is the order in which each question text first appears in
//! the source table. That order is what the user sees and it also fixes the
//! stable ids `q1, q2, ...` that clients send answers under.

use crate::source::SourceTable;
use crate::types::{AnswerSet, Question};
use indexmap::IndexMap;
use tracing::info;

/// A conditional question declared outside the source table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredDependency {
    /// Phrase identifying the conditional question (case-sensitive)
    pub trigger: &'static str,
    pub depends_on: &'static str,
    pub depends_value: &'static str,
}

/// Fallback dependencies for sources without `Depends On` columns
pub const DECLARED_DEPENDENCIES: &[DeclaredDependency] = &[DeclaredDependency {
    trigger: "If real-time or interactive results are needed",
    depends_on: "q3",
    depends_value: "Real-time/interactive",
}];

const MULTI_SELECT_PHRASES: &[&str] = &["select all", "kind of data"];

/// Content heuristic for multi-select questions
///
/// Sources without a `Multi Select` column have no schema flag, so a
/// question is multi-select when its wording asks for it.
pub fn is_multi_select(text: &str) -> bool {
    let lower = text.to_lowercase();
    MULTI_SELECT_PHRASES.iter().any(|p| lower.contains(p))
}

fn declared_dependency(text: &str) -> Option<&'static DeclaredDependency> {
    DECLARED_DEPENDENCIES.iter().find(|d| text.contains(d.trigger))
}

#[derive(Default)]
struct Pending {
    text: String,
    options: Vec<String>,
    multi: Option<bool>,
    depends_on: Option<String>,
    depends_value: Option<String>,
}

/// Immutable list of screening questions
#[derive(Debug, Clone, Default)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn build(table: &SourceTable) -> Self {
        let mut pending: IndexMap<String, Pending> = IndexMap::new();

        for row in table.rows() {
            let text = row.question();
            if text.is_empty() {
                continue;
            }
            let q = pending.entry(text.to_string()).or_insert_with(|| Pending {
                text: text.to_string(),
                ..Default::default()
            });

            q.options.push(row.answer().to_string());
            if q.multi.is_none() {
                q.multi = row.multi_select();
            }
            if q.depends_on.is_none() {
                q.depends_on = row.depends_on().map(str::to_string);
                q.depends_value = row.depends_value().map(str::to_string);
            }
        }

        let questions: Vec<Question> = pending
            .into_values()
            .enumerate()
            .map(|(i, p)| {
                let declared = declared_dependency(&p.text);
                let (depends_on, depends_value) = match p.depends_on {
                    Some(on) => (Some(on), p.depends_value),
                    None => (
                        declared.map(|d| d.depends_on.to_string()),
                        declared.map(|d| d.depends_value.to_string()),
                    ),
                };
                Question {
                    id: format!("q{}", i + 1),
                    multi: p.multi.unwrap_or_else(|| is_multi_select(&p.text)),
                    text: p.text,
                    options: p.options,
                    depends_on,
                    depends_value,
                }
            })
            .collect();

        info!(
            questions = questions.len(),
            conditional = questions.iter().filter(|q| q.depends_on.is_some()).count(),
            "Built question catalog"
        );
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Question text for a client key: ids are translated, anything else is
    /// taken to already be question text
    pub fn text_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|q| q.text.as_str()).unwrap_or(key)
    }

    /// Re-key an answer set by question text
    pub fn normalize_answers(&self, raw: &AnswerSet) -> AnswerSet {
        raw.iter()
            .map(|(key, answer)| (self.text_for(key).to_string(), answer.clone()))
            .collect()
    }

    /// Whether a question should be shown given the answers so far
    pub fn is_active(&self, question: &Question, answers: &AnswerSet) -> bool {
        let (Some(on), Some(value)) = (&question.depends_on, &question.depends_value) else {
            return true;
        };
        let Some(parent) = self.get(on) else {
            return true;
        };
        answers
            .get(&parent.text)
            .or_else(|| answers.get(&parent.id))
            .map(|a| a.selections().iter().any(|s| s == value))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
