// src/run/mod.rs
//
// The timed test-run engine. Everything in here operates on in-memory,
// already-validated data; database access stays in the handlers.

pub mod ledger;
pub mod scorer;
pub mod session;
pub mod store;

pub use ledger::{AnswerLedger, LedgerError, OptionLabel};
pub use scorer::{RunOutcome, score};
pub use session::{
    AnswerRecord, PublicRunQuestion, QuestionStatus, RunError, RunQuestion, RunResult, RunView,
    SaveStatus, TestRun,
};
pub use store::RunStore;
