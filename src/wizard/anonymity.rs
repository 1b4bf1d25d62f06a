//! k-anonymity and ℓ-diversity: parameter tables by dataset size and risk
//!
//! Larger datasets can afford larger equivalence classes; higher accepted
//! re-identification risk allows a larger k. ℓ depends on risk only.

use super::{choice, StepAnswers};
use crate::types::WizardStep;

pub const SIZE_BUCKETS: [&str; 4] = ["<10k", "10k–100k", "100k–1M", ">1M"];
pub const RISK_LEVELS: [&str; 3] = ["Very low (<1%)", "Low (1–5%)", "Moderate (5–10%)"];

/// k by [size bucket][risk level]
const K_TABLE: [[u32; 3]; 4] = [
    [5, 10, 20],
    [10, 20, 50],
    [20, 50, 100],
    [50, 100, 200],
];

/// ℓ by risk level
const L_TABLE: [u32; 3] = [2, 3, 5];

pub fn steps() -> Vec<WizardStep> {
    vec![
        WizardStep::choice(
            "K1",
            "1) Approximately how many unique records does your dataset contain?",
            &SIZE_BUCKETS,
        ),
        WizardStep::choice(
            "K2",
            "2) What maximum re-identification risk do you accept?",
            &RISK_LEVELS,
        ),
    ]
}

/// (k, ℓ) for exact bucket labels; `None` if either label is unknown
pub fn lookup(size: &str, risk: &str) -> Option<(u32, u32)> {
    let row = SIZE_BUCKETS.iter().position(|s| *s == size)?;
    let col = RISK_LEVELS.iter().position(|r| *r == risk)?;
    Some((K_TABLE[row][col], L_TABLE[col]))
}

pub fn configure(answers: &StepAnswers) -> Vec<String> {
    let size = choice(answers, "K1");
    let risk = choice(answers, "K2");

    let mut config = vec![
        "Your anonymization settings:".to_string(),
        format!("  Dataset size: {}", size),
        format!("  Risk tolerance: {}", risk),
        String::new(),
    ];

    match lookup(size, risk) {
        Some((k, l)) => {
            config.push(format!("• Generalize/suppress to achieve k={} and ℓ={}.", k, l));
            config.push("  – k (anonymity): each record is indistinguishable from at least k–1 others sharing the same quasi-identifiers.".to_string());
            config.push("  – ℓ (diversity): each such group must contain at least ℓ distinct sensitive-attribute values.".to_string());
            config.push("  Use a library like ARX (Java) or sdcMicro (R/Python).".to_string());
        }
        None => config
            .push("• Unable to derive k/ℓ for those choices—please adjust settings.".to_string()),
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::answers;

    #[test]
    fn test_lookup_example() {
        assert_eq!(lookup("10k–100k", "Low (1–5%)"), Some((20, 3)));
    }

    #[test]
    fn test_lookup_table_corners() {
        assert_eq!(lookup("<10k", "Very low (<1%)"), Some((5, 2)));
        assert_eq!(lookup(">1M", "Moderate (5–10%)"), Some((200, 5)));
        assert_eq!(lookup("100k–1M", "Very low (<1%)"), Some((20, 2)));
    }

    #[test]
    fn test_lookup_miss() {
        // ASCII hyphen instead of the en dash used by the options
        assert_eq!(lookup("10k-100k", "Low (1–5%)"), None);
        assert_eq!(lookup("<10k", "High"), None);
    }

    #[test]
    fn test_configure_lines() {
        let lines = configure(&answers(&[("K1", "10k–100k"), ("K2", "Low (1–5%)")]));
        assert_eq!(lines[1], "  Dataset size: 10k–100k");
        assert_eq!(lines[4], "• Generalize/suppress to achieve k=20 and ℓ=3.");
        assert!(lines.iter().any(|l| l.contains("ARX")));
    }

    #[test]
    fn test_configure_failure_line() {
        let lines = configure(&answers(&[("K1", "huge")]));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("• Unable to derive k/ℓ for those choices—please adjust settings.")
        );
        assert_eq!(lines.len(), 5);
    }
}
