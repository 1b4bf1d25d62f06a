//! Synthetic data generation: canned advice per categorical step
//!
//! Each step's rule only looks at its own answer. Output is an echo of the
//! choices followed by the tips of every step in step order.

use super::{choice, StepAnswers};
use crate::types::WizardStep;

pub fn steps() -> Vec<WizardStep> {
    vec![
        WizardStep::choice(
            "S1",
            "1) What kind of data are you synthesizing?",
            &["Tabular", "Time-series", "Graph", "Images / Unstructured"],
        ),
        WizardStep::choice(
            "S2",
            "2) Desired synthetic dataset size:",
            &[
                "Same as real data",
                "Smaller (e.g. 50%)",
                "Larger (e.g. 200%)",
                "Custom…",
            ],
        ),
        WizardStep::choice(
            "S3",
            "3) Which generation method do you prefer?",
            &[
                "GAN-based (CTGAN / TVAE)",
                "Bayesian network / Copula",
                "VAE-based",
            ],
        ),
        WizardStep::choice(
            "S4",
            "4) Do you want Differential Privacy on the synthetic generator?",
            &["Yes (DP-GAN)", "No"],
        ),
        WizardStep::choice(
            "S5",
            "5) How often regenerate synthetic data?",
            &["One-time snapshot", "Daily", "Weekly", "Monthly", "Custom…"],
        ),
        WizardStep::choice(
            "S6",
            "6) Which evaluation criteria matter most?",
            &[
                "Statistical similarity (KS, Chi-square)",
                "ML model performance (accuracy, F1)",
                "Privacy risk metrics (membership inference, MI)",
                "User feedback / qualitative testing",
            ],
        ),
        WizardStep::choice(
            "S7",
            "7) What are your computational and hardware constraints for generating synthetic data?",
            &[
                "High-performance GPUs/TPUs in the cloud",
                "On-premises CPU servers only",
                "Trusted hardware enclaves (TEE) available",
                "Very limited compute budget (e.g. single CPU)",
            ],
        ),
    ]
}

type Rule = fn(&str) -> Vec<&'static str>;

/// (step id, echo label, rule over the lowercased answer)
const STEP_RULES: &[(&str, &str, Rule)] = &[
    ("S1", "Data type", data_type),
    ("S2", "Dataset size", dataset_size),
    ("S3", "Generation method", generation_method),
    ("S4", "Differential Privacy", dp_toggle),
    ("S5", "Regeneration frequency", regeneration),
    ("S6", "Evaluation criteria", evaluation),
    ("S7", "Hardware constraints", hardware),
];

fn data_type(answer: &str) -> Vec<&'static str> {
    if answer.contains("tabular") {
        vec!["• For tabular data, consider CTGAN or TVAE implementations."]
    } else if answer.contains("time-series") {
        vec!["• For time-series, look at TimeGAN or DP-TS synth frameworks."]
    } else if answer.contains("graph") {
        vec!["• For graph data, explore GraphGAN or PrivGraph."]
    } else if answer.contains("images") || answer.contains("unstructured") {
        vec!["• For images/unstructured, try DP-GAN or PATE-GAN variants."]
    } else {
        vec![]
    }
}

fn dataset_size(answer: &str) -> Vec<&'static str> {
    if answer.contains("smaller") {
        vec!["• Smaller samples → faster training; verify distribution overlap."]
    } else if answer.contains("larger") {
        vec!["• Larger synthetic sets may amplify biases—monitor quality metrics."]
    } else if answer.contains("custom") {
        vec!["• Custom sizes: balance compute cost vs. data utility."]
    } else {
        vec![]
    }
}

fn generation_method(answer: &str) -> Vec<&'static str> {
    if answer.contains("gan") {
        vec!["• GAN-based → CTGAN/TVAE for tabular, StyleGAN for images."]
    } else if answer.contains("bayesian") || answer.contains("copula") {
        vec!["• Bayesian/Copula → SDV’s Bayesian network or CopulaGAN."]
    } else if answer.contains("vae") {
        vec!["• VAE-based → try DP-VAE or VAE-GAN hybrids."]
    } else {
        vec![]
    }
}

// Anything but an explicit yes, including no answer, counts as no DP
fn dp_toggle(answer: &str) -> Vec<&'static str> {
    if answer.contains("yes") {
        vec!["• DP enabled → tune ε carefully; too small harms utility."]
    } else {
        vec!["• No DP → ensure data leakage risk is acceptable."]
    }
}

fn regeneration(answer: &str) -> Vec<&'static str> {
    if answer.contains("daily") {
        vec!["• Daily regen → automate retraining & quality checks."]
    } else if answer.contains("weekly") {
        vec!["• Weekly regen → balance freshness vs. compute cost."]
    } else if answer.contains("monthly") {
        vec!["• Monthly regen → schedule performance benchmarks."]
    } else if answer.contains("custom") {
        vec!["• Custom regen → integrate with your CI/CD pipeline."]
    } else {
        vec![]
    }
}

// Criteria are not exclusive; every matching one adds a line
fn evaluation(answer: &str) -> Vec<&'static str> {
    let mut lines = Vec::new();
    if answer.contains("statistical") {
        lines.push("• Use KS test, Chi-square for marginal distribution checks.");
    }
    if answer.contains("ml model") {
        lines.push("• Train downstream models and compare accuracy/F1.");
    }
    if answer.contains("privacy risk") {
        lines.push("• Run membership inference and attribute inference attacks.");
    }
    if answer.contains("user feedback") {
        lines.push("• Collect domain expert feedback on synthetic realism.");
    }
    lines
}

fn hardware(answer: &str) -> Vec<&'static str> {
    if answer.contains("gpu") || answer.contains("tpu") {
        vec!["• Leverage cloud GPUs/TPUs for faster model convergence."]
    } else if answer.contains("cpu") {
        vec!["• CPU only → use lightweight, non-neural methods (Copula, Bayesian)."]
    } else if answer.contains("tee") {
        vec!["• TEE available → run sensitive data synth inside enclaves."]
    } else {
        vec![]
    }
}

/// Tips for one step's answer, without the echo
pub fn step_tips(step_id: &str, answer: &str) -> Vec<&'static str> {
    STEP_RULES
        .iter()
        .find(|(id, _, _)| *id == step_id)
        .map(|(_, _, rule)| rule(&answer.to_lowercase()))
        .unwrap_or_default()
}

pub fn configure(answers: &StepAnswers) -> Vec<String> {
    let mut config = vec!["Your choices for Synthetic Data Generation:".to_string()];

    for (id, label, _) in STEP_RULES {
        if let Some(answer) = answers.get(*id) {
            config.push(format!("  • {}: {}", label, answer));
        }
    }

    config.push(String::new());
    config.push("Implementation tips and recommendations:".to_string());
    for (id, _, rule) in STEP_RULES {
        let answer = choice(answers, id).to_lowercase();
        config.extend(rule(&answer).into_iter().map(str::to_string));
    }

    config.push(String::new());
    config.push(
        "For more, see: SDV (sdv.dev), CTGAN docs, or your preferred synth library.".to_string(),
    );
    config
}
