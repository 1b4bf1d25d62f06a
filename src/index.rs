//! Lookup index: (question, answer) → techniques, parameters, vetoes
//!
//! Built once from the source table and read-only afterwards. Lookups for
//! pairs the table does not know about return empty results; a survey with
//! unanswered or free-form questions is normal input.

use crate::source::SourceTable;
use crate::types::{TechniqueEntry, VetoEntry};
use std::collections::HashMap;
use tracing::{info, warn};

type PairMap<T> = HashMap<String, HashMap<String, T>>;

static EMPTY_TECHNIQUES: TechniqueEntry = TechniqueEntry {
    techniques: Vec::new(),
    parameter_text: String::new(),
};

/// Read-only technique and veto maps keyed by (question text, answer option)
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    techniques: PairMap<TechniqueEntry>,
    vetoes: PairMap<VetoEntry>,
    has_deal_breakers: bool,
}

impl LookupIndex {
    pub fn build(table: &SourceTable) -> Self {
        let mut index = LookupIndex {
            has_deal_breakers: table.has_deal_breakers(),
            ..Default::default()
        };

        for row in table.rows() {
            let question = row.question();
            if question.is_empty() {
                warn!("Skipping source row with empty question");
                continue;
            }
            let answer = row.answer();

            let entry = TechniqueEntry {
                techniques: row.techniques(),
                parameter_text: row.parameters().to_string(),
            };
            index.insert_entry(question, answer, entry);

            if let Some(vetoed) = row.deal_breakers() {
                index
                    .vetoes
                    .entry(question.to_string())
                    .or_default()
                    .insert(answer.to_string(), VetoEntry { vetoed });
            }
        }

        info!(
            questions = index.techniques.len(),
            entries = index.entry_count(),
            vetoes = index.veto_count(),
            deal_breakers = index.has_deal_breakers,
            "Built lookup index"
        );
        index
    }

    fn insert_entry(&mut self, question: &str, answer: &str, entry: TechniqueEntry) {
        let previous = self
            .techniques
            .entry(question.to_string())
            .or_default()
            .insert(answer.to_string(), entry);
        if previous.is_some() {
            // Last row wins for a repeated pair
            warn!(question, answer, "Duplicate source row replaces earlier entry");
        }
    }

    /// Techniques and parameter text for a pair; empty when unknown
    pub fn entry(&self, question: &str, answer: &str) -> &TechniqueEntry {
        self.techniques
            .get(question)
            .and_then(|answers| answers.get(answer))
            .unwrap_or(&EMPTY_TECHNIQUES)
    }

    /// Techniques vetoed by a pair; empty when unknown
    pub fn vetoes(&self, question: &str, answer: &str) -> &[String] {
        self.vetoes
            .get(question)
            .and_then(|answers| answers.get(answer))
            .map(|v| v.vetoed.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the source carried a deal-breaker column at all
    pub fn has_deal_breakers(&self) -> bool {
        self.has_deal_breakers
    }

    pub fn entry_count(&self) -> usize {
        self.techniques.values().map(HashMap::len).sum()
    }

    pub fn veto_count(&self) -> usize {
        self.vetoes.values().map(HashMap::len).sum()
    }
}
