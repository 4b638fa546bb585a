// src/run/ledger.rs

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One of the four answer options of a multiple-choice question.
///
/// Labels are matched case-insensitively at the parsing boundary, so the
/// rest of the engine never compares raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    /// Parses a label such as "a" or "B". Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Some(OptionLabel::A),
            "b" => Some(OptionLabel::B),
            "c" => Some(OptionLabel::C),
            "d" => Some(OptionLabel::D),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLabel::A => "a",
            OptionLabel::B => "b",
            OptionLabel::C => "c",
            OptionLabel::D => "d",
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The question was sealed; its stored answer is immutable.
    Sealed,
}

/// The in-memory mapping of question identifier to selected option for one
/// run. Insertion order is preserved for display; it is irrelevant to
/// scoring.
///
/// The ledger itself enforces the seal invariant: once a question id is
/// sealed, `select` is rejected regardless of what the caller believes.
#[derive(Debug, Clone, Default)]
pub struct AnswerLedger {
    entries: Vec<(i64, OptionLabel)>,
    sealed: HashSet<i64>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the selection for a question. Selecting again while the
    /// question is still open overwrites the previous choice.
    pub fn select(&mut self, question_id: i64, label: OptionLabel) -> Result<(), LedgerError> {
        if self.sealed.contains(&question_id) {
            return Err(LedgerError::Sealed);
        }
        if let Some(entry) = self.entries.iter_mut().find(|(id, _)| *id == question_id) {
            entry.1 = label;
        } else {
            self.entries.push((question_id, label));
        }
        Ok(())
    }

    /// Returns the current selection, or `None` if unanswered.
    pub fn get(&self, question_id: i64) -> Option<OptionLabel> {
        self.entries
            .iter()
            .find(|(id, _)| *id == question_id)
            .map(|(_, label)| *label)
    }

    /// Locks the answer (or absence of one) for a question. Idempotent.
    pub fn seal(&mut self, question_id: i64) {
        self.sealed.insert(question_id);
    }

    pub fn is_sealed(&self, question_id: i64) -> bool {
        self.sealed.contains(&question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.entries.len()
    }

    /// All selections in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, OptionLabel)> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(OptionLabel::parse("A"), Some(OptionLabel::A));
        assert_eq!(OptionLabel::parse("b"), Some(OptionLabel::B));
        assert_eq!(OptionLabel::parse(" C "), Some(OptionLabel::C));
        assert_eq!(OptionLabel::parse("e"), None);
        assert_eq!(OptionLabel::parse(""), None);
    }

    #[test]
    fn select_overwrites_while_open() {
        let mut ledger = AnswerLedger::new();
        ledger.select(1, OptionLabel::A).unwrap();
        ledger.select(1, OptionLabel::C).unwrap();
        assert_eq!(ledger.get(1), Some(OptionLabel::C));
        assert_eq!(ledger.answered_count(), 1);
    }

    #[test]
    fn select_after_seal_is_rejected() {
        let mut ledger = AnswerLedger::new();
        ledger.select(1, OptionLabel::A).unwrap();
        ledger.seal(1);
        assert_eq!(ledger.select(1, OptionLabel::B), Err(LedgerError::Sealed));
        assert_eq!(ledger.get(1), Some(OptionLabel::A));
    }

    #[test]
    fn seal_without_answer_rejects_late_write() {
        let mut ledger = AnswerLedger::new();
        ledger.seal(7);
        assert_eq!(ledger.select(7, OptionLabel::D), Err(LedgerError::Sealed));
        assert_eq!(ledger.get(7), None);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut ledger = AnswerLedger::new();
        ledger.select(3, OptionLabel::B).unwrap();
        ledger.select(1, OptionLabel::A).unwrap();
        ledger.select(2, OptionLabel::D).unwrap();
        let ids: Vec<i64> = ledger.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
