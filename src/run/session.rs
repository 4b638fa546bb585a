// src/run/session.rs

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::run::ledger::{AnswerLedger, LedgerError, OptionLabel};
use crate::run::scorer::{self, RunOutcome};

/// Immutable snapshot of one question for the duration of a run.
/// Loaded once from the database; never mutated by the engine.
#[derive(Debug, Clone, Serialize)]
pub struct RunQuestion {
    pub id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: OptionLabel,
    pub explanation: Option<String>,
    pub time_limit_minutes: i64,
}

/// Question view sent to the client while the run is live: the correct
/// answer and explanation are withheld.
#[derive(Debug, Clone, Serialize)]
pub struct PublicRunQuestion {
    pub id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub time_limit_minutes: i64,
}

impl From<&RunQuestion> for PublicRunQuestion {
    fn from(q: &RunQuestion) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text.clone(),
            option_a: q.option_a.clone(),
            option_b: q.option_b.clone(),
            option_c: q.option_c.clone(),
            option_d: q.option_d.clone(),
            time_limit_minutes: q.time_limit_minutes,
        }
    }
}

/// Per-index classification used by the navigation aid.
/// Exactly one index is `Current`/`Answered` while the run is live; every
/// index before it is `Sealed`; everything after is `Untouched`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "selected", rename_all = "snake_case")]
pub enum QuestionStatus {
    Untouched,
    Current,
    Answered(OptionLabel),
    Sealed(Option<OptionLabel>),
}

/// Outcome of the detached attempt-persistence task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveStatus {
    Pending,
    Saved { attempt_id: i64 },
    Failed { reason: String },
}

/// A (question, selection) pair in ledger insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerRecord {
    pub question_id: i64,
    pub selected_option: OptionLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    EmptyQuestionSet,
    Finished,
    NotFinished,
    /// The question exists in the run but is not the active one.
    NotActiveQuestion,
    /// The question has been sealed; its answer is immutable.
    Sealed,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RunError::EmptyQuestionSet => "a run requires at least one question",
            RunError::Finished => "the run is already finished",
            RunError::NotFinished => "the run is not finished yet",
            RunError::NotActiveQuestion => "only the current question accepts answers",
            RunError::Sealed => "the question is sealed",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for RunError {}

#[derive(Debug, Clone)]
struct Completion {
    outcome: RunOutcome,
    finished_at: DateTime<Utc>,
    time_taken_seconds: i64,
    save: SaveStatus,
}

/// State view of a live (or just-finished) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunView {
    pub run_id: Uuid,
    pub topic_id: i64,
    pub difficulty: String,
    pub finished: bool,
    pub current_index: usize,
    pub total_questions: usize,
    pub answered_count: usize,
    pub remaining_seconds: i64,
    pub statuses: Vec<QuestionStatus>,
    /// The active question, absent once the run is finished.
    pub question: Option<PublicRunQuestion>,
}

/// Full result package handed to the display stage after completion.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub topic_id: i64,
    pub difficulty: String,
    pub questions: Vec<RunQuestion>,
    pub answers: Vec<AnswerRecord>,
    pub outcome: RunOutcome,
    pub time_taken_seconds: i64,
    pub save: SaveStatus,
}

/// One complete attempt at a fixed question set for a (topic, difficulty)
/// pair. Navigation is strictly forward-only: advancing seals the question
/// being left, and sealed questions can never be revisited or rewritten.
///
/// All time-dependent operations take `now` explicitly; expiry is applied
/// lazily at the top of every operation, so a countdown that ran out and an
/// explicit "next" resolve to the identical advance and the later trigger
/// becomes a no-op.
#[derive(Debug, Clone)]
pub struct TestRun {
    pub id: Uuid,
    pub user_id: i64,
    pub topic_id: i64,
    pub difficulty: String,
    questions: Vec<RunQuestion>,
    ledger: AnswerLedger,
    current: usize,
    /// Frozen answers for sealed indices; always a prefix of the run.
    sealed_answers: Vec<Option<OptionLabel>>,
    deadline: DateTime<Utc>,
    started_at: DateTime<Utc>,
    completion: Option<Completion>,
}

impl TestRun {
    /// Starts a run. The first question becomes active immediately and its
    /// countdown is armed exactly once, here.
    pub fn start(
        id: Uuid,
        user_id: i64,
        topic_id: i64,
        difficulty: String,
        questions: Vec<RunQuestion>,
        now: DateTime<Utc>,
    ) -> Result<Self, RunError> {
        if questions.is_empty() {
            return Err(RunError::EmptyQuestionSet);
        }
        let deadline = now + question_limit(&questions[0]);
        Ok(Self {
            id,
            user_id,
            topic_id,
            difficulty,
            questions,
            ledger: AnswerLedger::new(),
            current: 0,
            sealed_answers: Vec::new(),
            deadline,
            started_at: now,
            completion: None,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.completion.is_some()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn questions(&self) -> &[RunQuestion] {
        &self.questions
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.completion.as_ref().map(|c| c.outcome)
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.completion.as_ref().map(|c| c.finished_at)
    }

    /// The active question's expiry instant. Stale once the run finishes.
    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn time_taken_seconds(&self) -> Option<i64> {
        self.completion.as_ref().map(|c| c.time_taken_seconds)
    }

    pub fn answers(&self) -> Vec<AnswerRecord> {
        self.ledger
            .iter()
            .map(|(question_id, selected_option)| AnswerRecord {
                question_id,
                selected_option,
            })
            .collect()
    }

    /// Applies every countdown expiry that `now` has passed. Each expired
    /// question is advanced exactly as an explicit "next" would, timed at
    /// its own deadline so chained expiries consume each question's full
    /// limit.
    pub fn expire_due(&mut self, now: DateTime<Utc>) {
        while self.completion.is_none() && now >= self.deadline {
            let at = self.deadline;
            self.advance_at(at);
        }
    }

    /// Records a selection for the active question.
    pub fn select(
        &mut self,
        question_id: i64,
        label: OptionLabel,
        now: DateTime<Utc>,
    ) -> Result<(), RunError> {
        self.expire_due(now);
        if self.completion.is_some() {
            return Err(RunError::Finished);
        }
        let active_id = self.questions[self.current].id;
        if question_id != active_id {
            if self.ledger.is_sealed(question_id) {
                return Err(RunError::Sealed);
            }
            return Err(RunError::NotActiveQuestion);
        }
        self.ledger.select(question_id, label).map_err(|e| match e {
            LedgerError::Sealed => RunError::Sealed,
        })
    }

    /// Seals the active question and moves forward; finishing the run if it
    /// was the last. A trigger that lost the race against expiry (or a
    /// duplicate press after completion) is a no-op: if expiry already
    /// moved the gate, the question the caller meant is sealed and nothing
    /// further happens.
    pub fn advance(&mut self, now: DateTime<Utc>) {
        let gate = self.current;
        self.expire_due(now);
        if self.completion.is_none() && self.current == gate {
            self.advance_at(now);
        }
    }

    /// Early submission: seals everything from the active question onward
    /// as it stands, then scores. No-op if the run already finished.
    pub fn submit(&mut self, now: DateTime<Utc>) {
        self.expire_due(now);
        while self.completion.is_none() {
            self.advance_at(now);
        }
    }

    /// The sole mutation of the progression gate: seal index `current`,
    /// then either activate the next index (arming its countdown) or score.
    fn advance_at(&mut self, at: DateTime<Utc>) {
        let question_id = self.questions[self.current].id;
        let frozen = self.ledger.get(question_id);
        self.ledger.seal(question_id);
        self.sealed_answers.push(frozen);

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.deadline = at + question_limit(&self.questions[self.current]);
        } else {
            let outcome = scorer::score(&self.questions, &self.ledger);
            let time_taken_seconds = (at - self.started_at).num_seconds().max(0);
            self.completion = Some(Completion {
                outcome,
                finished_at: at,
                time_taken_seconds,
                save: SaveStatus::Pending,
            });
        }
    }

    fn statuses(&self) -> Vec<QuestionStatus> {
        let mut statuses = Vec::with_capacity(self.questions.len());
        for (index, question) in self.questions.iter().enumerate() {
            let status = if index < self.sealed_answers.len() {
                QuestionStatus::Sealed(self.sealed_answers[index])
            } else if index == self.current && self.completion.is_none() {
                match self.ledger.get(question.id) {
                    Some(label) => QuestionStatus::Answered(label),
                    None => QuestionStatus::Current,
                }
            } else {
                QuestionStatus::Untouched
            };
            statuses.push(status);
        }
        statuses
    }

    /// Builds the client-facing view, applying lazy expiry first.
    pub fn snapshot(&mut self, now: DateTime<Utc>) -> RunView {
        self.expire_due(now);
        let finished = self.completion.is_some();
        let remaining_seconds = if finished {
            0
        } else {
            (self.deadline - now).num_seconds().max(0)
        };
        RunView {
            run_id: self.id,
            topic_id: self.topic_id,
            difficulty: self.difficulty.clone(),
            finished,
            current_index: self.current,
            total_questions: self.questions.len(),
            answered_count: self.ledger.answered_count(),
            remaining_seconds,
            statuses: self.statuses(),
            question: if finished {
                None
            } else {
                Some(PublicRunQuestion::from(&self.questions[self.current]))
            },
        }
    }

    /// Full result package. Only available after completion.
    pub fn result(&self) -> Result<RunResult, RunError> {
        let completion = self.completion.as_ref().ok_or(RunError::NotFinished)?;
        Ok(RunResult {
            run_id: self.id,
            topic_id: self.topic_id,
            difficulty: self.difficulty.clone(),
            questions: self.questions.clone(),
            answers: self.answers(),
            outcome: completion.outcome,
            time_taken_seconds: completion.time_taken_seconds,
            save: completion.save.clone(),
        })
    }

    pub fn save_status(&self) -> Option<SaveStatus> {
        self.completion.as_ref().map(|c| c.save.clone())
    }

    pub fn mark_saved(&mut self, attempt_id: i64) {
        if let Some(completion) = self.completion.as_mut() {
            completion.save = SaveStatus::Saved { attempt_id };
        }
    }

    pub fn mark_save_failed(&mut self, reason: String) {
        if let Some(completion) = self.completion.as_mut() {
            completion.save = SaveStatus::Failed { reason };
        }
    }
}

fn question_limit(question: &RunQuestion) -> Duration {
    // A non-positive limit would make the expiry loop spin; clamp to one
    // minute, matching the smallest limit the admin surface accepts.
    Duration::minutes(question.time_limit_minutes.max(1))
}
