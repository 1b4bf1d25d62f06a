//! Implementation wizards: per-technique follow-up questions and rules
//!
//! Once the survey has ranked techniques, the user can open a short wizard
//! for one of them. Each wizard is a fixed list of steps plus a pure rule
//! function from the step answers to configuration advice lines.
//!
//! Routing from a free-text tool name to a wizard is a single lookup over
//! the declared keyword sets of [`Technique`], checked in declaration order.

pub mod anonymity;
pub mod differential_privacy;
pub mod mpc;
pub mod synthetic;
pub mod tee;

use crate::error::{AdvisorError, Result};
use crate::types::WizardStep;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Raw wizard answers keyed by step id (`D1`, `S3`, `K2`, ...)
pub type StepAnswers = HashMap<String, String>;

/// Techniques that have a configuration wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Technique {
    DifferentialPrivacy,
    SecureMultipartyComputation,
    SyntheticData,
    TrustedExecution,
    KAnonymity,
}

impl Technique {
    /// Routing order; the first technique whose keyword matches wins
    pub const ALL: [Technique; 5] = [
        Technique::DifferentialPrivacy,
        Technique::SecureMultipartyComputation,
        Technique::SyntheticData,
        Technique::TrustedExecution,
        Technique::KAnonymity,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Technique::DifferentialPrivacy => "Differential Privacy",
            Technique::SecureMultipartyComputation => "Secure Multiparty Computation",
            Technique::SyntheticData => "Synthetic Data Generation",
            Technique::TrustedExecution => "Trusted Execution Environments",
            Technique::KAnonymity => "k-anonymity & ℓ-diversity",
        }
    }

    /// Lowercase fragments that select this wizard from a ranked tool name
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Technique::DifferentialPrivacy => &["differential privacy"],
            Technique::SecureMultipartyComputation => &["multiparty", "multi-party", "mpc"],
            Technique::SyntheticData => &["synthetic data"],
            // bare substring, so words like "guarantee" match too
            Technique::TrustedExecution => &["trusted execution", "tee"],
            Technique::KAnonymity => &["k-anonymity", "l-diversity"],
        }
    }

    /// Match a ranked technique name to a wizard by keyword
    pub fn from_tool_name(name: &str) -> Option<Technique> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.keywords().iter().any(|kw| lower.contains(kw)))
    }

    /// Resolve the display name returned by [`wizard_steps`]
    pub fn from_display_name(name: &str) -> Option<Technique> {
        let name = name.trim();
        Self::ALL.into_iter().find(|t| t.display_name() == name)
    }

    pub fn steps(&self) -> Vec<WizardStep> {
        match self {
            Technique::DifferentialPrivacy => differential_privacy::steps(),
            Technique::SecureMultipartyComputation => mpc::steps(),
            Technique::SyntheticData => synthetic::steps(),
            Technique::TrustedExecution => tee::steps(),
            Technique::KAnonymity => anonymity::steps(),
        }
    }

    pub fn configure(&self, answers: &StepAnswers) -> Vec<String> {
        match self {
            Technique::DifferentialPrivacy => differential_privacy::configure(answers),
            Technique::SecureMultipartyComputation => mpc::configure(answers),
            Technique::SyntheticData => synthetic::configure(answers),
            Technique::TrustedExecution => tee::configure(answers),
            Technique::KAnonymity => anonymity::configure(answers),
        }
    }
}

/// Steps for one wizard, labelled with the name to submit answers under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardPlan {
    pub tool: String,
    pub technique: Technique,
    pub steps: Vec<WizardStep>,
}

/// Wizard steps for a ranked tool name
///
/// Names that match no wizard are rejected with
/// [`AdvisorError::UnsupportedTool`].
pub fn wizard_steps(tool_name: &str) -> Result<WizardPlan> {
    let technique =
        Technique::from_tool_name(tool_name).ok_or_else(|| AdvisorError::UnsupportedTool {
            tool: tool_name.to_string(),
        })?;
    Ok(WizardPlan {
        tool: technique.display_name().to_string(),
        technique,
        steps: technique.steps(),
    })
}

/// Configuration advice for a wizard's answers
///
/// `tool_name` is the display name from [`wizard_steps`]; anything else
/// yields a single line saying no wizard logic exists.
pub fn wizard_submit(tool_name: &str, answers: &StepAnswers) -> Vec<String> {
    match Technique::from_display_name(tool_name) {
        Some(technique) => technique.configure(answers),
        None => vec![format!("No wizard logic found for tool: {}", tool_name)],
    }
}

/// Outcome of reading a numeric wizard answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput<T> {
    Parsed(T),
    Invalid,
}

/// Parse a numeric step; a step that was never answered reads as zero
pub fn parse_number<T: FromStr>(answers: &StepAnswers, id: &str) -> NumericInput<T> {
    let raw = answers.get(id).map(|v| v.trim()).unwrap_or("0");
    match raw.parse::<T>() {
        Ok(v) => NumericInput::Parsed(v),
        Err(_) => NumericInput::Invalid,
    }
}

/// Raw answer for a choice step, empty when unanswered
pub fn choice<'a>(answers: &'a StepAnswers, id: &str) -> &'a str {
    answers.get(id).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
pub(crate) fn answers(pairs: &[(&str, &str)]) -> StepAnswers {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InputKind;

    #[test]
    fn test_tool_name_routing() {
        assert_eq!(
            Technique::from_tool_name("  Differential Privacy (Laplace) "),
            Some(Technique::DifferentialPrivacy)
        );
        assert_eq!(
            Technique::from_tool_name("Secure Multi-Party Computation"),
            Some(Technique::SecureMultipartyComputation)
        );
        assert_eq!(
            Technique::from_tool_name("MPC"),
            Some(Technique::SecureMultipartyComputation)
        );
        assert_eq!(
            Technique::from_tool_name("Synthetic Data Generation"),
            Some(Technique::SyntheticData)
        );
        assert_eq!(
            Technique::from_tool_name("TEE"),
            Some(Technique::TrustedExecution)
        );
        assert_eq!(
            Technique::from_tool_name("k-Anonymity / l-Diversity"),
            Some(Technique::KAnonymity)
        );
        assert_eq!(Technique::from_tool_name("Homomorphic Encryption"), None);
    }

    #[test]
    fn test_routing_checks_techniques_in_order() {
        // Both DP and synthetic keywords appear; DP is declared first
        assert_eq!(
            Technique::from_tool_name("Synthetic data with differential privacy"),
            Some(Technique::DifferentialPrivacy)
        );
    }

    #[test]
    fn test_wizard_steps_rejects_unmatched_tool() {
        let err = wizard_steps("Federated Learning").unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::UnsupportedTool { ref tool } if tool == "Federated Learning"
        ));
    }

    #[test]
    fn test_wizard_steps_returns_display_name() {
        let plan = wizard_steps("secure mpc").unwrap();
        assert_eq!(plan.tool, "Secure Multiparty Computation");
        assert_eq!(plan.steps.len(), 2);
        assert!(plan
            .steps
            .iter()
            .all(|s| matches!(s.input, InputKind::Number { .. })));
    }

    #[test]
    fn test_every_technique_has_unique_step_ids() {
        for technique in Technique::ALL {
            let steps = technique.steps();
            assert!(!steps.is_empty(), "{:?} has no steps", technique);
            let mut ids: Vec<_> = steps.iter().map(|s| s.id.clone()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), steps.len(), "{:?} repeats a step id", technique);
            assert_eq!(
                Technique::from_display_name(technique.display_name()),
                Some(technique)
            );
        }
    }

    #[test]
    fn test_submit_unknown_tool() {
        let lines = wizard_submit("Homomorphic Encryption", &StepAnswers::new());
        assert_eq!(
            lines,
            vec!["No wizard logic found for tool: Homomorphic Encryption"]
        );
    }

    #[test]
    fn test_parse_number() {
        let a = answers(&[("D1", " 2.5 "), ("D2", "abc")]);
        assert_eq!(parse_number::<f64>(&a, "D1"), NumericInput::Parsed(2.5));
        assert_eq!(parse_number::<u64>(&a, "D2"), NumericInput::Invalid);
        assert_eq!(parse_number::<u64>(&a, "missing"), NumericInput::Parsed(0));
    }
}
