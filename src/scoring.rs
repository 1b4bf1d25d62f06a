//! Scoring Engine
//!
//! Turns a survey answer set into a ranked, veto-filtered technique list.
//!
//! Every answered (question, answer) pair votes once for each technique its
//! source row lists. Deal-breaker answers veto techniques outright: a vetoed
//! technique is removed from the ranking no matter how many votes it had,
//! and the veto report explains which answers caused it.

use crate::index::LookupIndex;
use crate::types::*;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use tracing::debug;

/// Vote counts in first-appearance order
type VoteTally = IndexMap<String, u32>;

/// Build a ranked entry, tagging it against the veto set
///
/// `evaluate` filters vetoed techniques before ranking, so it only ever
/// produces `MatchesSurvey`; the `Vetoed` tag is kept for callers that rank
/// without filtering.
pub fn tag_technique(name: String, score: u32, vetoed: &[String]) -> RankedTechnique {
    let rationale = if vetoed.contains(&name) {
        Rationale::Vetoed
    } else {
        Rationale::MatchesSurvey
    };
    RankedTechnique {
        name,
        score,
        rationale,
    }
}

/// Scores answer sets against a lookup index
pub struct ScoringEngine<'a> {
    index: &'a LookupIndex,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(index: &'a LookupIndex) -> Self {
        Self { index }
    }

    /// Score an answer set keyed by question text
    ///
    /// Unknown questions and answers contribute nothing. Ties in the ranking
    /// keep the order in which techniques first received a vote.
    pub fn evaluate(&self, answers: &AnswerSet) -> Evaluation {
        // 1. Tally votes and collect parameter text
        let (mut tally, collected_parameters) = self.tally_votes(answers);

        // 2. Collect deal-breakers
        let vetoed = self.collect_vetoes(answers);

        // 3. Vetoed techniques leave the ranking entirely
        tally.retain(|name, _| !vetoed.contains(name));

        // 4. Stable sort, so ties stay in first-vote order
        let mut counts: Vec<(String, u32)> = tally.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        // 5. Rationale tags
        let ranked: Vec<RankedTechnique> = counts
            .into_iter()
            .map(|(name, score)| tag_technique(name, score, &vetoed))
            .collect();

        // 6. Deduplicated, sorted parameter advice
        let parameters: Vec<String> = collected_parameters
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // 7. Explain each veto
        let veto_report = self.veto_report(answers, &vetoed);

        debug!(
            answered = answers.len(),
            ranked = ranked.len(),
            vetoed = veto_report.len(),
            parameters = parameters.len(),
            "Evaluated answer set"
        );

        Evaluation {
            ranked,
            parameters,
            vetoed: veto_report,
        }
    }

    fn tally_votes(&self, answers: &AnswerSet) -> (VoteTally, Vec<String>) {
        let mut tally = VoteTally::default();
        let mut parameters = Vec::new();

        for (question, answer) in answers.pairs() {
            let entry = self.index.entry(question, answer);
            for technique in &entry.techniques {
                *tally.entry(technique.clone()).or_insert(0) += 1;
            }
            if !entry.parameter_text.is_empty() {
                parameters.push(entry.parameter_text.clone());
            }
        }

        (tally, parameters)
    }

    /// Union of vetoed techniques in first-veto order
    fn collect_vetoes(&self, answers: &AnswerSet) -> Vec<String> {
        let mut vetoed: Vec<String> = Vec::new();
        if !self.index.has_deal_breakers() {
            return vetoed;
        }

        for (question, answer) in answers.pairs() {
            for pet in self.index.vetoes(question, answer) {
                if !vetoed.contains(pet) {
                    vetoed.push(pet.clone());
                }
            }
        }
        vetoed
    }

    fn veto_report(&self, answers: &AnswerSet, vetoed: &[String]) -> Vec<VetoReport> {
        vetoed
            .iter()
            .map(|pet| VetoReport {
                name: pet.clone(),
                reasons: answers
                    .pairs()
                    .filter(|(q, a)| self.index.vetoes(q, a).contains(pet))
                    .map(|(q, a)| format!("{} → {}", q, a))
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceTable;
    use proptest::prelude::*;

    const CSV: &str = "\
Question,Answer Option,Recommended Techniques,Parameter Suggestions,Deal-breaker
Q: data sharing?,External partners,MPC;Differential Privacy,Split trust across parties,
Q: data sharing?,Public release,Differential Privacy;Synthetic Data Generation,Keep ε ≤ 1,
Q: data sharing?,Internal only,k-anonymity,,
Which kind of data? Select all,Health,HIPAA Compliance;Differential Privacy,Keep ε ≤ 1,
Which kind of data? Select all,Education,FERPA Compliance;k-anonymity,Generalize quasi-identifiers,
Which kind of data? Select all,Location,Differential Privacy;MPC,,
Latency?,Real-time/interactive,Trusted Execution Environments,,MPC;Synthetic Data Generation
Latency?,Batch,Synthetic Data Generation,,
Budget?,Tiny,k-anonymity,,Trusted Execution Environments
Budget?,Large,MPC;Trusted Execution Environments,,
";

    fn index() -> LookupIndex {
        LookupIndex::build(&SourceTable::from_csv_reader(CSV.as_bytes()).unwrap())
    }

    fn names(evaluation: &Evaluation) -> Vec<&str> {
        evaluation.ranked.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_single_answer_example() {
        let index = index();
        let engine = ScoringEngine::new(&index);
        let answers: AnswerSet = [("Q: data sharing?", "External partners")]
            .into_iter()
            .collect();

        let result = engine.evaluate(&answers);
        assert_eq!(
            result.ranked,
            vec![
                RankedTechnique {
                    name: "MPC".to_string(),
                    score: 1,
                    rationale: Rationale::MatchesSurvey
                },
                RankedTechnique {
                    name: "Differential Privacy".to_string(),
                    score: 1,
                    rationale: Rationale::MatchesSurvey
                },
            ]
        );
        assert_eq!(result.parameters, vec!["Split trust across parties"]);
        assert!(result.vetoed.is_empty());
    }

    #[test]
    fn test_multi_select_votes_with_multiplicity() {
        let index = index();
        let engine = ScoringEngine::new(&index);
        let mut answers = AnswerSet::new();
        answers.insert("Q: data sharing?", "Public release");
        answers.insert(
            "Which kind of data? Select all",
            vec!["Health", "Location"],
        );

        let result = engine.evaluate(&answers);
        assert_eq!(result.ranked[0].name, "Differential Privacy");
        assert_eq!(result.ranked[0].score, 3);
        assert_eq!(
            names(&result),
            vec![
                "Differential Privacy",
                "Synthetic Data Generation",
                "HIPAA Compliance",
                "MPC"
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_vote_order() {
        let index = index();
        let engine = ScoringEngine::new(&index);
        let mut answers = AnswerSet::new();
        answers.insert("Budget?", "Large");
        answers.insert("Q: data sharing?", "Internal only");

        let result = engine.evaluate(&answers);
        assert_eq!(
            names(&result),
            vec!["MPC", "Trusted Execution Environments", "k-anonymity"]
        );

        // Reordering the answers reorders the ties
        let mut answers = AnswerSet::new();
        answers.insert("Q: data sharing?", "Internal only");
        answers.insert("Budget?", "Large");
        let result = engine.evaluate(&answers);
        assert_eq!(
            names(&result),
            vec!["k-anonymity", "MPC", "Trusted Execution Environments"]
        );
    }

    #[test]
    fn test_vetoed_techniques_are_removed_and_explained() {
        let index = index();
        let engine = ScoringEngine::new(&index);
        let mut answers = AnswerSet::new();
        answers.insert("Q: data sharing?", "External partners");
        answers.insert("Latency?", "Real-time/interactive");
        answers.insert("Budget?", "Large");

        let result = engine.evaluate(&answers);
        assert!(!names(&result).contains(&"MPC"));
        assert!(result
            .ranked
            .iter()
            .all(|r| r.rationale == Rationale::MatchesSurvey));
        assert_eq!(
            names(&result),
            vec!["Trusted Execution Environments", "Differential Privacy"]
        );

        assert_eq!(result.vetoed.len(), 2);
        assert_eq!(result.vetoed[0].name, "MPC");
        assert_eq!(
            result.vetoed[0].reasons,
            vec!["Latency? → Real-time/interactive"]
        );
        assert_eq!(result.vetoed[1].name, "Synthetic Data Generation");
    }

    #[test]
    fn test_veto_reasons_collect_every_answer() {
        let index = index();
        let engine = ScoringEngine::new(&index);
        let mut answers = AnswerSet::new();
        answers.insert("Budget?", "Tiny");
        answers.insert("Latency?", "Batch");

        let result = engine.evaluate(&answers);
        assert_eq!(result.vetoed.len(), 1);
        assert_eq!(result.vetoed[0].name, "Trusted Execution Environments");
        assert_eq!(result.vetoed[0].reasons, vec!["Budget? → Tiny"]);
    }

    #[test]
    fn test_rationale_supports_vetoed_tag() {
        let vetoed = vec!["MPC".to_string()];
        assert_eq!(
            tag_technique("MPC".to_string(), 4, &vetoed).rationale,
            Rationale::Vetoed
        );
        assert_eq!(
            tag_technique("Differential Privacy".to_string(), 1, &vetoed).rationale,
            Rationale::MatchesSurvey
        );
    }

    #[test]
    fn test_unknown_answers_are_ignored() {
        let index = index();
        let engine = ScoringEngine::new(&index);
        let mut answers = AnswerSet::new();
        answers.insert("Never asked", "Whatever");
        answers.insert("Q: data sharing?", "external partners");

        assert_eq!(engine.evaluate(&answers), Evaluation::default());
    }

    #[test]
    fn test_parameters_are_deduplicated_and_sorted() {
        let index = index();
        let engine = ScoringEngine::new(&index);
        let mut answers = AnswerSet::new();
        answers.insert("Q: data sharing?", "Public release");
        answers.insert(
            "Which kind of data? Select all",
            vec!["Health", "Education"],
        );

        let result = engine.evaluate(&answers);
        assert_eq!(
            result.parameters,
            vec!["Generalize quasi-identifiers", "Keep ε ≤ 1"]
        );
    }

    #[test]
    fn test_no_deal_breaker_column_means_no_vetoes() {
        let csv = "Question,Answer Option,Recommended Techniques\nQ,A,MPC;DP\n";
        let index = LookupIndex::build(&SourceTable::from_csv_reader(csv.as_bytes()).unwrap());
        let engine = ScoringEngine::new(&index);
        let answers: AnswerSet = [("Q", "A")].into_iter().collect();

        let result = engine.evaluate(&answers);
        assert_eq!(result.ranked.len(), 2);
        assert!(result.vetoed.is_empty());
    }

    const QUESTIONS: &[(&str, &[&str])] = &[
        ("Q: data sharing?", &["External partners", "Public release", "Internal only"]),
        ("Which kind of data? Select all", &["Health", "Education", "Location"]),
        ("Latency?", &["Real-time/interactive", "Batch"]),
        ("Budget?", &["Tiny", "Large"]),
    ];

    fn answers_from_masks(masks: &[u8]) -> AnswerSet {
        let mut answers = AnswerSet::new();
        for ((question, options), mask) in QUESTIONS.iter().zip(masks) {
            let picked: Vec<&str> = options
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, o)| *o)
                .collect();
            match picked.len() {
                0 => {}
                1 => answers.insert(*question, picked[0]),
                _ => answers.insert(*question, picked),
            }
        }
        answers
    }

    proptest! {
        #[test]
        fn property_vetoed_never_ranked(masks in proptest::collection::vec(any::<u8>(), 4)) {
            let index = index();
            let result = ScoringEngine::new(&index).evaluate(&answers_from_masks(&masks));
            for veto in &result.vetoed {
                prop_assert!(result.ranked.iter().all(|r| r.name != veto.name));
                prop_assert!(!veto.reasons.is_empty());
            }
        }

        #[test]
        fn property_scores_count_listing_pairs(masks in proptest::collection::vec(any::<u8>(), 4)) {
            let index = index();
            let answers = answers_from_masks(&masks);
            let result = ScoringEngine::new(&index).evaluate(&answers);
            for ranked in &result.ranked {
                let expected = answers
                    .pairs()
                    .map(|(q, a)| {
                        index.entry(q, a).techniques.iter().filter(|t| **t == ranked.name).count()
                    })
                    .sum::<usize>();
                prop_assert_eq!(ranked.score as usize, expected);
            }
            prop_assert!(result.ranked.windows(2).all(|w| w[0].score >= w[1].score));
        }

        #[test]
        fn property_parameters_sorted_unique(masks in proptest::collection::vec(any::<u8>(), 4)) {
            let index = index();
            let result = ScoringEngine::new(&index).evaluate(&answers_from_masks(&masks));
            prop_assert!(result.parameters.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn property_evaluation_is_deterministic(
            masks in proptest::collection::vec(any::<u8>(), 4)
        ) {
            let index = index();
            let engine = ScoringEngine::new(&index);
            let answers = answers_from_masks(&masks);
            let first = serde_json::to_string(&engine.evaluate(&answers)).unwrap();
            let second = serde_json::to_string(&engine.evaluate(&answers)).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
