//! Quiz round orchestration.
//!
//! The engine owns the active glossary; rounds are separate [`RoundState`]
//! values that the caller keeps and passes back in. A failed call never
//! mutates the round.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::QuizError;
use crate::model::{
    AnswerOutcome, Glossary, GlossarySignature, IncorrectMatch, Question, RoundState,
};
use crate::report::RoundSummary;

/// Number of questions per round when nothing else is configured.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Runs quiz rounds over one glossary at a time.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    glossary: Glossary,
    signature: GlossarySignature,
    question_count: usize,
}

impl QuizEngine {
    pub fn new(glossary: Glossary, question_count: usize) -> Self {
        let signature = glossary.signature();
        Self {
            glossary,
            signature,
            question_count,
        }
    }

    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    pub fn signature(&self) -> GlossarySignature {
        self.signature
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Number of questions a fresh round will contain.
    pub fn round_length(&self) -> usize {
        self.question_count.min(self.glossary.len())
    }

    /// Start a round using the thread-local RNG.
    pub fn start_round(&self) -> RoundState {
        self.start_round_with(&mut rand::thread_rng())
    }

    /// Start a round drawing randomness from `rng`.
    ///
    /// Terms are sampled without replacement; the explanation list is an
    /// independent shuffle of every explanation in the glossary.
    pub fn start_round_with<R: Rng + ?Sized>(&self, rng: &mut R) -> RoundState {
        let all_terms: Vec<&str> = self.glossary.terms().collect();
        let terms: Vec<String> = all_terms
            .choose_multiple(rng, self.round_length())
            .map(|t| t.to_string())
            .collect();

        let mut explanation_order: Vec<String> =
            self.glossary.explanations().map(str::to_string).collect();
        explanation_order.shuffle(rng);

        let state = RoundState {
            id: Uuid::new_v4(),
            signature: self.signature,
            terms,
            explanation_order,
            index: 0,
            score: 0,
            incorrect: Vec::new(),
            started_at: Utc::now(),
        };
        tracing::debug!(
            round = %state.id,
            questions = state.terms.len(),
            "started round"
        );
        state
    }

    /// The question at the round's current index.
    pub fn current_question<'a>(&self, state: &'a RoundState) -> Result<Question<'a>, QuizError> {
        let term = current_term(state)?;
        Ok(Question {
            term,
            position: state.index + 1,
            total: state.total(),
            choices: state.choices(),
        })
    }

    /// Score `chosen` against the current term and advance the round.
    pub fn submit_answer(
        &self,
        state: &mut RoundState,
        chosen: usize,
    ) -> Result<AnswerOutcome, QuizError> {
        let term = current_term(state)?.to_string();
        if state.signature != self.signature {
            return Err(QuizError::StaleRound);
        }
        let max = state.explanation_order.len();
        if chosen == 0 || chosen > max {
            return Err(QuizError::InvalidInput { chosen, max });
        }

        let explanation = self
            .glossary
            .explanation(&term)
            .ok_or(QuizError::StaleRound)?;
        let correct_number = state.number_of(explanation).ok_or(QuizError::StaleRound)?;
        let correct = chosen == correct_number;

        if correct {
            state.score += 1;
        } else {
            state.incorrect.push(IncorrectMatch {
                term,
                chosen,
                correct: correct_number,
                explanation: explanation.to_string(),
            });
        }
        state.index += 1;

        tracing::debug!(
            round = %state.id,
            index = state.index,
            correct,
            "answer submitted"
        );

        Ok(AnswerOutcome {
            correct,
            correct_number,
            finished: state.is_finished(),
        })
    }

    /// Final score and review for a finished round.
    pub fn final_summary(&self, state: &RoundState) -> Result<RoundSummary, QuizError> {
        if !state.is_finished() {
            return Err(QuizError::OutOfRange {
                answered: state.index,
                total: state.total(),
            });
        }
        Ok(RoundSummary::from_round(state))
    }

    /// Swap in a new glossary. Returns `true` if its entries differ, in
    /// which case any round in progress is stale and should be restarted.
    ///
    /// The new glossary is always stored, so metadata-only edits take
    /// effect without invalidating the current round.
    pub fn replace_glossary(&mut self, glossary: Glossary) -> bool {
        let changed = detect_glossary_change(&self.signature, &glossary);
        if changed {
            tracing::info!(
                from = %self.signature.short(),
                to = %glossary.signature().short(),
                "glossary replaced"
            );
            self.signature = glossary.signature();
        } else {
            tracing::debug!("glossary reloaded with unchanged entries");
        }
        self.glossary = glossary;
        changed
    }
}

/// Returns `true` if `new` does not match `previous`.
pub fn detect_glossary_change(previous: &GlossarySignature, new: &Glossary) -> bool {
    new.signature() != *previous
}

fn current_term(state: &RoundState) -> Result<&str, QuizError> {
    state
        .terms
        .get(state.index)
        .map(String::as_str)
        .ok_or(QuizError::OutOfRange {
            answered: state.index,
            total: state.total(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn glossary(n: usize) -> Glossary {
        Glossary::from_entries((0..n).map(|i| (format!("term-{i}"), format!("explanation {i}"))))
            .unwrap()
    }

    fn two_terms() -> Glossary {
        Glossary::from_entries([("A", "exp1"), ("B", "exp2")]).unwrap()
    }

    /// Answer every question correctly.
    fn answer_all_correct(engine: &QuizEngine, state: &mut RoundState) {
        while !state.is_finished() {
            let term = engine.current_question(state).unwrap().term.to_string();
            let n = state
                .number_of(engine.glossary().explanation(&term).unwrap())
                .unwrap();
            engine.submit_answer(state, n).unwrap();
        }
    }

    #[test]
    fn round_samples_distinct_terms_from_glossary() {
        for (size, k) in [(1, 10), (5, 3), (19, 10), (4, 4), (7, 0)] {
            let engine = QuizEngine::new(glossary(size), k);
            for seed in 0..20 {
                let state = engine.start_round_with(&mut StdRng::seed_from_u64(seed));
                assert_eq!(state.terms().len(), k.min(size));
                let unique: HashSet<&String> = state.terms().iter().collect();
                assert_eq!(unique.len(), state.terms().len());
                assert!(state
                    .terms()
                    .iter()
                    .all(|t| engine.glossary().contains_term(t)));
            }
        }
    }

    #[test]
    fn explanation_order_is_permutation_of_all_explanations() {
        let engine = QuizEngine::new(glossary(12), 3);
        let mut expected: Vec<&str> = engine.glossary().explanations().collect();
        expected.sort_unstable();
        for seed in 0..20 {
            let state = engine.start_round_with(&mut StdRng::seed_from_u64(seed));
            let mut got: Vec<&str> = state.explanation_order().iter().map(String::as_str).collect();
            got.sort_unstable();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn fresh_round_is_reset() {
        let engine = QuizEngine::new(glossary(5), 5);
        let state = engine.start_round();
        assert_eq!(state.index(), 0);
        assert_eq!(state.score(), 0);
        assert!(state.incorrect().is_empty());
        assert!(!state.is_finished());
        assert_eq!(state.signature(), engine.signature());
    }

    #[test]
    fn answering_every_question_finishes_round() {
        let engine = QuizEngine::new(glossary(8), 5);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = engine.start_round_with(&mut rng);
            let total = state.total();
            for i in 0..total {
                assert!(!state.is_finished());
                // Alternate right and wrong-ish answers; any valid number works.
                let n = (i % state.explanation_order().len()) + 1;
                engine.submit_answer(&mut state, n).unwrap();
            }
            assert!(state.is_finished());
            assert_eq!(state.index(), total);
            assert_eq!(state.score() + state.incorrect().len(), total);
        }
    }

    #[test]
    fn correct_answer_increments_score_only() {
        let engine = QuizEngine::new(glossary(6), 6);
        let mut state = engine.start_round_with(&mut StdRng::seed_from_u64(7));
        let term = engine.current_question(&state).unwrap().term.to_string();
        let n = state
            .number_of(engine.glossary().explanation(&term).unwrap())
            .unwrap();

        let outcome = engine.submit_answer(&mut state, n).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.correct_number, n);
        assert_eq!(state.score(), 1);
        assert!(state.incorrect().is_empty());
        assert_eq!(state.index(), 1);
    }

    #[test]
    fn two_term_scenario() {
        let engine = QuizEngine::new(two_terms(), 2);
        for seed in 0..10 {
            let mut state = engine.start_round_with(&mut StdRng::seed_from_u64(seed));
            let terms: HashSet<&str> = state.terms().iter().map(String::as_str).collect();
            assert_eq!(terms, HashSet::from(["A", "B"]));

            let term = engine.current_question(&state).unwrap().term.to_string();
            let right = state
                .number_of(engine.glossary().explanation(&term).unwrap())
                .unwrap();

            // Right answer first, then a wrong one for the second term.
            assert!(engine.submit_answer(&mut state, right).unwrap().correct);
            assert_eq!(state.score(), 1);

            let second = engine.current_question(&state).unwrap().term.to_string();
            let second_right = state
                .number_of(engine.glossary().explanation(&second).unwrap())
                .unwrap();
            let second_wrong = 3 - second_right;
            let outcome = engine.submit_answer(&mut state, second_wrong).unwrap();
            assert!(!outcome.correct);
            assert!(outcome.finished);
            assert_eq!(
                state.incorrect(),
                &[IncorrectMatch {
                    term: second.clone(),
                    chosen: second_wrong,
                    correct: second_right,
                    explanation: engine.glossary().explanation(&second).unwrap().to_string(),
                }]
            );
        }
    }

    #[test]
    fn invalid_number_is_rejected_without_mutation() {
        let engine = QuizEngine::new(glossary(3), 3);
        let mut state = engine.start_round();
        let before = state.clone();

        for bad in [0, 4, 100] {
            let err = engine.submit_answer(&mut state, bad).unwrap_err();
            assert_eq!(err, QuizError::InvalidInput { chosen: bad, max: 3 });
        }
        assert_eq!(state, before);
    }

    #[test]
    fn submit_after_finish_is_out_of_range() {
        let engine = QuizEngine::new(glossary(2), 2);
        let mut state = engine.start_round();
        answer_all_correct(&engine, &mut state);
        assert_eq!(state.score(), 2);

        let before = state.clone();
        let err = engine.submit_answer(&mut state, 1).unwrap_err();
        assert_eq!(
            err,
            QuizError::OutOfRange {
                answered: 2,
                total: 2
            }
        );
        assert_eq!(state, before);
        assert!(engine.current_question(&state).is_err());
    }

    #[test]
    fn empty_round_starts_finished() {
        let engine = QuizEngine::new(glossary(3), 0);
        let state = engine.start_round();
        assert!(state.is_finished());
        assert!(matches!(
            engine.current_question(&state),
            Err(QuizError::OutOfRange { .. })
        ));
    }

    #[test]
    fn question_lists_every_explanation_numbered_from_one() {
        let engine = QuizEngine::new(glossary(4), 2);
        let state = engine.start_round();
        let q = engine.current_question(&state).unwrap();
        assert_eq!(q.position, 1);
        assert_eq!(q.total, 2);
        let numbers: Vec<usize> = q.choices.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn duplicate_explanations_use_first_occurrence() {
        let g = Glossary::from_entries([("A", "same"), ("B", "same")]).unwrap();
        let engine = QuizEngine::new(g, 2);
        let mut state = engine.start_round();
        // Both numbers map to "same"; only the first one counts.
        engine.submit_answer(&mut state, 2).unwrap();
        engine.submit_answer(&mut state, 1).unwrap();
        assert_eq!(state.score(), 1);
        assert_eq!(state.incorrect().len(), 1);
        assert_eq!(state.incorrect()[0].correct, 1);
        assert_eq!(state.incorrect()[0].chosen, 2);
    }

    #[test]
    fn replacing_glossary_detects_change_and_stales_rounds() {
        let mut engine = QuizEngine::new(two_terms(), 2);
        let mut state = engine.start_round();
        let old = engine.signature();

        assert!(!engine.replace_glossary(two_terms()));
        assert!(!detect_glossary_change(&old, &two_terms()));

        let changed = Glossary::from_entries([("A", "exp1"), ("B", "exp2 revised")]).unwrap();
        assert!(detect_glossary_change(&old, &changed));
        assert!(engine.replace_glossary(changed));
        assert_ne!(engine.signature(), old);

        let before = state.clone();
        assert_eq!(
            engine.submit_answer(&mut state, 1).unwrap_err(),
            QuizError::StaleRound
        );
        assert_eq!(state, before);

        let fresh = engine.start_round();
        assert_eq!(fresh.signature(), engine.signature());
    }

    #[test]
    fn metadata_only_reload_keeps_round_and_updates_meta() {
        let v1 = two_terms().with_meta([("version".to_string(), "1".to_string())].into());
        let v2 = two_terms().with_meta([("version".to_string(), "2".to_string())].into());
        let mut engine = QuizEngine::new(v1, 2);
        let mut state = engine.start_round();

        assert!(!engine.replace_glossary(v2));
        assert_eq!(engine.glossary().meta().get("version").map(String::as_str), Some("2"));
        assert_eq!(state.signature(), engine.signature());
        answer_all_correct(&engine, &mut state);
        assert_eq!(state.score(), 2);
    }

    #[test]
    fn summary_only_for_finished_rounds() {
        let engine = QuizEngine::new(glossary(3), 3);
        let mut state = engine.start_round();
        assert!(matches!(
            engine.final_summary(&state),
            Err(QuizError::OutOfRange { .. })
        ));
        answer_all_correct(&engine, &mut state);
        let summary = engine.final_summary(&state).unwrap();
        assert_eq!(summary.score, 3);
        assert_eq!(summary.total, 3);
        assert!(summary.is_perfect());
    }
}
