// src/run/scorer.rs

use serde::Serialize;

use crate::run::ledger::AnswerLedger;
use crate::run::session::RunQuestion;

/// Computed result of a completed run. Derived, never stored as the source
/// of truth; recomputing it from the same inputs yields the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    /// round(correct / total * 100), half away from zero.
    pub score_percent: u32,
}

/// Tallies the ledger against the question set.
///
/// Pure and side-effect-free: independent of ledger insertion order, and
/// unanswered questions never contribute to the numerator.
pub fn score(questions: &[RunQuestion], ledger: &AnswerLedger) -> RunOutcome {
    let mut correct = 0u32;
    let mut incorrect = 0u32;

    for question in questions {
        match ledger.get(question.id) {
            Some(selected) if selected == question.correct_answer => correct += 1,
            Some(_) => incorrect += 1,
            None => {}
        }
    }

    let total = questions.len() as u32;
    let unanswered = total - correct - incorrect;

    let score_percent = if total == 0 {
        0
    } else {
        (f64::from(correct) / f64::from(total) * 100.0).round() as u32
    };

    RunOutcome {
        correct,
        incorrect,
        unanswered,
        score_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::ledger::OptionLabel;

    fn question(id: i64, correct: OptionLabel) -> RunQuestion {
        RunQuestion {
            id,
            question_text: format!("Question {}", id),
            option_a: "alpha".to_string(),
            option_b: "beta".to_string(),
            option_c: "gamma".to_string(),
            option_d: "delta".to_string(),
            correct_answer: correct,
            explanation: None,
            time_limit_minutes: 2,
        }
    }

    #[test]
    fn empty_ledger_scores_zero() {
        let questions = vec![question(1, OptionLabel::A), question(2, OptionLabel::B)];
        let outcome = score(&questions, &AnswerLedger::new());
        assert_eq!(outcome.correct, 0);
        assert_eq!(outcome.unanswered, 2);
        assert_eq!(outcome.score_percent, 0);
    }

    #[test]
    fn all_correct_scores_hundred() {
        let questions = vec![
            question(1, OptionLabel::A),
            question(2, OptionLabel::B),
            question(3, OptionLabel::C),
        ];
        let mut ledger = AnswerLedger::new();
        ledger.select(1, OptionLabel::A).unwrap();
        ledger.select(2, OptionLabel::B).unwrap();
        ledger.select(3, OptionLabel::C).unwrap();
        assert_eq!(score(&questions, &ledger).score_percent, 100);
    }

    #[test]
    fn two_of_three_rounds_to_67() {
        // Scenario: correct answers [A, B, C], user selected [A, D, C].
        let questions = vec![
            question(1, OptionLabel::A),
            question(2, OptionLabel::B),
            question(3, OptionLabel::C),
        ];
        let mut ledger = AnswerLedger::new();
        ledger.select(1, OptionLabel::A).unwrap();
        ledger.select(2, OptionLabel::D).unwrap();
        ledger.select(3, OptionLabel::C).unwrap();
        let outcome = score(&questions, &ledger);
        assert_eq!(outcome.correct, 2);
        assert_eq!(outcome.incorrect, 1);
        assert_eq!(outcome.unanswered, 0);
        assert_eq!(outcome.score_percent, 67);
    }

    #[test]
    fn scoring_is_idempotent() {
        let questions = vec![question(1, OptionLabel::B), question(2, OptionLabel::C)];
        let mut ledger = AnswerLedger::new();
        ledger.select(2, OptionLabel::C).unwrap();
        let first = score(&questions, &ledger);
        let second = score(&questions, &ledger);
        assert_eq!(first, second);
    }

    #[test]
    fn independent_of_insertion_order() {
        let questions = vec![
            question(1, OptionLabel::A),
            question(2, OptionLabel::B),
            question(3, OptionLabel::C),
        ];

        let mut forward = AnswerLedger::new();
        forward.select(1, OptionLabel::A).unwrap();
        forward.select(2, OptionLabel::B).unwrap();
        forward.select(3, OptionLabel::D).unwrap();

        let mut backward = AnswerLedger::new();
        backward.select(3, OptionLabel::D).unwrap();
        backward.select(2, OptionLabel::B).unwrap();
        backward.select(1, OptionLabel::A).unwrap();

        assert_eq!(score(&questions, &forward), score(&questions, &backward));
    }

    #[test]
    fn answers_for_unknown_questions_are_ignored() {
        let questions = vec![question(1, OptionLabel::A)];
        let mut ledger = AnswerLedger::new();
        ledger.select(99, OptionLabel::A).unwrap();
        let outcome = score(&questions, &ledger);
        assert_eq!(outcome.correct, 0);
        assert_eq!(outcome.unanswered, 1);
    }
}
