//! Differential privacy: privacy budget from error tolerance and query load
//!
//! With sensitivity Δ=1 the Laplace scale for an absolute error of `D1` is
//! `D1`, so each query spends ε = 1/D1. Budgets compose additively across
//! the day's queries.

use super::{parse_number, NumericInput, StepAnswers};
use crate::types::WizardStep;

pub const INVALID_INPUT: &str = "⛔ Invalid DP inputs—could not compute ε.";

pub fn steps() -> Vec<WizardStep> {
    vec![
        WizardStep::number(
            "D1",
            "1) Maximum absolute error you can tolerate (Δ=1):",
            "e.g. 2.0",
        ),
        WizardStep::number("D2", "2) Expected number of queries per day:", "e.g. 50"),
    ]
}

/// Per-query and daily ε
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrivacyBudget {
    pub per_query: f64,
    pub per_day: f64,
}

/// A non-positive error tolerance yields a zero budget
pub fn budget(max_error: f64, queries_per_day: u64) -> PrivacyBudget {
    let per_query = if max_error > 0.0 { 1.0 / max_error } else { 0.0 };
    PrivacyBudget {
        per_query,
        per_day: per_query * queries_per_day as f64,
    }
}

pub fn configure(answers: &StepAnswers) -> Vec<String> {
    match (
        parse_number::<f64>(answers, "D1"),
        parse_number::<u64>(answers, "D2"),
    ) {
        (NumericInput::Parsed(max_error), NumericInput::Parsed(queries)) => {
            let budget = budget(max_error, queries);
            vec![
                format!("ε per query ≈ {:.3}", budget.per_query),
                format!("Total ε/day ≈ {:.3}", budget.per_day),
            ]
        }
        _ => vec![INVALID_INPUT.to_string()],
    }
}
