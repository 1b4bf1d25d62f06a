//! pet-advisor - privacy-enhancing technology recommendations
//!
//! A rule engine driven by a tabular questionnaire. Each row maps a
//! (question, answer) pair to recommended techniques, parameter guidance and
//! optional deal-breakers. Survey answers are scored into a ranked list, and
//! the top techniques get a short configuration wizard.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pet_advisor::{Advisor, AnswerSet};
//!
//! let advisor = Advisor::load(Path::new("privacy.csv"))?;
//!
//! let mut answers = AnswerSet::new();
//! answers.insert("q1", "The public");
//! answers.insert("q2", vec!["Health records", "Student records"]);
//!
//! let results = advisor.survey_results(&answers);
//! for r in &results.evaluation.ranked {
//!     println!("{} ({}): {}", r.name, r.score, r.rationale.label());
//! }
//!
//! let plan = advisor.wizard_steps(&results.wizard_tools[0])?;
//! ```
//!
//! # Architecture
//!
//! ```text
//! source table (csv/json)
//!        │
//!        ├──► LookupIndex ──► ScoringEngine ──► Evaluation ──► classify
//!        │                                                        │
//!        └──► QuestionCatalog (ids, options, dependencies)        ▼
//!                                                        wizard (5 techniques)
//! ```

pub mod advisor;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod index;
pub mod rpc;
pub mod scoring;
pub mod session;
pub mod source;
pub mod types;
pub mod wizard;

// Core engine
pub use advisor::{Advisor, SurveyResults};
pub use catalog::QuestionCatalog;
pub use index::LookupIndex;
pub use scoring::ScoringEngine;
pub use source::SourceTable;
pub use types::*;

// Classification and wizards
pub use classify::{classify, Classification};
pub use wizard::{wizard_steps, wizard_submit, StepAnswers, Technique, WizardPlan};

// Ambient
pub use config::AdvisorConfig;
pub use error::{AdvisorError, Result};
pub use session::init_db;
