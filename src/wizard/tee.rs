//! Trusted execution environments: deployment advice by enclave platform

use super::{choice, StepAnswers};
use crate::types::WizardStep;

pub fn steps() -> Vec<WizardStep> {
    vec![
        WizardStep::choice(
            "T1",
            "1) Approximately how many unique records will you process?",
            &["<100k", "100k–1M", ">1M"],
        ),
        WizardStep::choice(
            "T2",
            "2) Do you have secure hardware enclaves available?",
            &["Intel SGX / AMD SEV", "AWS Nitro Enclaves", "No"],
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnclavePlatform {
    IntelOrAmd,
    AwsNitro,
    Unavailable,
}

impl EnclavePlatform {
    /// Case-sensitive, matching the option labels offered in step T2
    pub fn from_answer(answer: &str) -> Self {
        if answer.contains("Intel") {
            EnclavePlatform::IntelOrAmd
        } else if answer.contains("Nitro") {
            EnclavePlatform::AwsNitro
        } else {
            EnclavePlatform::Unavailable
        }
    }
}

pub fn configure(answers: &StepAnswers) -> Vec<String> {
    let records = choice(answers, "T1");
    let enclave = choice(answers, "T2");

    let tip = match EnclavePlatform::from_answer(enclave) {
        EnclavePlatform::IntelOrAmd => format!(
            "• Deploy your code in Intel SGX/AMD SEV enclaves. For datasets {}, use chunked loading to stay within enclave memory limits.",
            records
        ),
        EnclavePlatform::AwsNitro => {
            "• Use AWS Nitro Enclaves with KMS attestation—follow AWS Nitro CLI docs.".to_string()
        }
        EnclavePlatform::Unavailable => {
            "• No hardware enclaves available. Consider Azure Confidential VMs or fallback to MPC for compute isolation."
                .to_string()
        }
    };

    vec![
        "Your TEE settings:".to_string(),
        format!("  Records: {}", records),
        format!("  Enclave available: {}", enclave),
        String::new(),
        "Implementation tips:".to_string(),
        tip,
    ]
}
