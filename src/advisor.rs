//! Advisor: the assembled, read-only rule engine
//!
//! Build once at startup from the source table, then share (for example
//! behind an `Arc`) between any number of concurrent requests.
//!
//! ```rust,ignore
//! let advisor = Advisor::load(&config.source_path)?;
//!
//! // Screening
//! let questions = advisor.questions();
//! let results = advisor.survey_results(&answers);
//!
//! // Wizard for a chosen technique
//! let plan = advisor.wizard_steps(&results.wizard_tools[0])?;
//! let lines = advisor.wizard_submit(&plan.tool, &step_answers);
//! ```

use crate::catalog::QuestionCatalog;
use crate::classify::{self, Classification};
use crate::error::Result;
use crate::index::LookupIndex;
use crate::scoring::ScoringEngine;
use crate::source::SourceTable;
use crate::types::{AnswerSet, Evaluation, Question};
use crate::wizard::{self, StepAnswers, WizardPlan};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lookup index and question catalog derived from one source table
#[derive(Debug, Clone)]
pub struct Advisor {
    index: LookupIndex,
    catalog: QuestionCatalog,
}

/// Everything the results page shows for one survey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResults {
    pub evaluation: Evaluation,
    /// Top techniques and all policies
    pub display: Classification,
    /// Top ranked names offered as wizards
    pub wizard_tools: Vec<String>,
}

impl Advisor {
    pub fn from_table(table: &SourceTable) -> Self {
        Self {
            index: LookupIndex::build(table),
            catalog: QuestionCatalog::build(table),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_table(&SourceTable::load(path)?))
    }

    pub fn index(&self) -> &LookupIndex {
        &self.index
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn questions(&self) -> &[Question] {
        self.catalog.questions()
    }

    /// Score answers keyed by question id or question text
    pub fn evaluate(&self, answers: &AnswerSet) -> Evaluation {
        let answers = self.catalog.normalize_answers(answers);
        ScoringEngine::new(&self.index).evaluate(&answers)
    }

    pub fn survey_results(&self, answers: &AnswerSet) -> SurveyResults {
        let evaluation = self.evaluate(answers);
        let display = classify::classify(&evaluation.ranked).for_display();
        let wizard_tools = classify::wizard_tools(&evaluation.technique_names());
        SurveyResults {
            evaluation,
            display,
            wizard_tools,
        }
    }

    pub fn wizard_steps(&self, tool_name: &str) -> Result<WizardPlan> {
        wizard::wizard_steps(tool_name)
    }

    pub fn wizard_submit(&self, tool_name: &str, answers: &StepAnswers) -> Vec<String> {
        wizard::wizard_submit(tool_name, answers)
    }
}
