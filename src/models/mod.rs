pub mod event;
pub mod ledger;
pub mod question;

pub use event::EventKind;
pub use ledger::{EntryUpdate, HistoryLedger, LedgerStats};
pub use question::{
    NewQuestionPayload, QuestionEntry, ReceiveResultPayload, ResultStatus, UserAnswer,
};
