//! Secure multiparty computation: protocol family from the corruption threshold

use super::{parse_number, NumericInput, StepAnswers};
use crate::types::WizardStep;

pub fn steps() -> Vec<WizardStep> {
    vec![
        WizardStep::number("S1", "1) How many parties are involved?", "e.g. 3"),
        WizardStep::number(
            "S2",
            "2) How many parties do you think might collude or be taken over by an attacker?",
            "e.g. 1",
        ),
    ]
}

/// Adversary model a given (n, t) can support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolFamily {
    /// Honest majority, t < n/2
    SemiHonest,
    /// Dishonest majority, t < n
    Malicious,
    /// t ≥ n
    Infeasible,
}

pub fn select_family(parties: i64, corrupt: i64) -> ProtocolFamily {
    if 2 * i128::from(corrupt) < i128::from(parties) {
        ProtocolFamily::SemiHonest
    } else if corrupt < parties {
        ProtocolFamily::Malicious
    } else {
        ProtocolFamily::Infeasible
    }
}

const LIBRARIES: &[&str] = &[
    "  • MP-SPDZ (C++): supports many protocols & security levels.",
    "  • SCALE-MAMBA (Python/C++): friendly DSL & semi-honest/SPDZ.",
    "  • VIFF (Python): easy prototyping, semi-honest only.",
    "  • Sharemind (Rust): commercial‐grade with high‐performance optimizations.",
];

fn family_lines(family: ProtocolFamily) -> Vec<String> {
    match family {
        ProtocolFamily::SemiHonest => vec![
            "  – Semi-honest model (t < n/2): Consider BGW or GMW (Shamir secret‐sharing)."
                .to_string(),
        ],
        ProtocolFamily::Malicious => vec![
            "  – Malicious model (t < n): Consider SPDZ/MASCOT or HoneyBadgerMPC for stronger security."
                .to_string(),
        ],
        ProtocolFamily::Infeasible => {
            let mut lines = vec![
                "  – Warning: t must be < n for security—please adjust your threshold.".to_string(),
                String::new(),
                "Libraries & frameworks:".to_string(),
            ];
            lines.extend(LIBRARIES.iter().map(|l| l.to_string()));
            lines
        }
    }
}

pub fn configure(answers: &StepAnswers) -> Vec<String> {
    let mut config = vec!["Your MPC configuration:".to_string()];

    let parties = parse_number::<i64>(answers, "S1");
    let corrupt = parse_number::<i64>(answers, "S2");
    match (parties, corrupt) {
        (NumericInput::Parsed(n), NumericInput::Parsed(t)) => {
            config.push(format!("  • Total parties (n): {}", n));
            config.push(format!("  • Max corruptions tolerated (t): {}", t));
            config.push(String::new());
            config.push("Protocol recommendations:".to_string());
            config.extend(family_lines(select_family(n, t)));
        }
        _ => config.push(
            "  ⛔ Invalid inputs—please enter integers for parties and threshold.".to_string(),
        ),
    }

    config.push(String::new());
    config.push(
        "Tip: choose your n-of-t threshold based on your trust & threat model.".to_string(),
    );
    config
}
