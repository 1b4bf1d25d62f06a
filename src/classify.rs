//! Result classification: privacy techniques vs policy recommendations
//!
//! The source table mixes technical PETs with compliance advice
//! ("HIPAA Compliance", "Data sharing policy", ...). They are shown
//! separately, so ranked results are split by keyword before display.

use crate::types::RankedTechnique;
use serde::{Deserialize, Serialize};

/// Name fragments that mark a ranked entry as a policy recommendation
pub const POLICY_KEYWORDS: &[&str] = &[
    "compliance",
    "policy",
    "regulation",
    "ferpa",
    "hipaa",
    "gdpr",
    "foia",
];

/// Wider list used when offering wizards for ranked tools
pub const WIZARD_EXCLUDED_KEYWORDS: &[&str] = &[
    "compliance",
    "policy",
    "regulation",
    "ferpa",
    "hipaa",
    "gdpr",
    "foia",
    "ccpa",
    "coppa",
];

/// Techniques shown on the results page
pub const TOP_TECHNIQUES: usize = 2;

/// Ranked tools carried over to the wizard step
pub const WIZARD_TOOL_LIMIT: usize = 3;

fn matches_any(name: &str, keywords: &[&str]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

pub fn is_policy(name: &str) -> bool {
    matches_any(name, POLICY_KEYWORDS)
}

/// Ranked results split into two lists, each in rank order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub techniques: Vec<RankedTechnique>,
    pub policies: Vec<RankedTechnique>,
}

impl Classification {
    /// Cap techniques for display; policies are never truncated
    pub fn for_display(mut self) -> Self {
        self.techniques.truncate(TOP_TECHNIQUES);
        self
    }
}

pub fn classify(ranked: &[RankedTechnique]) -> Classification {
    let (policies, techniques): (Vec<_>, Vec<_>) =
        ranked.iter().cloned().partition(|r| is_policy(&r.name));
    Classification {
        techniques,
        policies,
    }
}

/// The top ranked names offered as wizards
pub fn wizard_tools(ranked_names: &[String]) -> Vec<String> {
    ranked_names.iter().take(WIZARD_TOOL_LIMIT).cloned().collect()
}

/// Drop names that look like policies or regulations
pub fn privacy_tools(tools: &[String]) -> Vec<String> {
    tools
        .iter()
        .filter(|t| !matches_any(t, WIZARD_EXCLUDED_KEYWORDS))
        .cloned()
        .collect()
}
