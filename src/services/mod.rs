pub mod answer_evaluator;
pub mod reconciliation;
pub mod submission_dispatcher;

pub use answer_evaluator::{evaluate, AnswerEvaluator, ComparisonRule, Evaluation};
pub use reconciliation::ReconcilePolicy;
pub use submission_dispatcher::{SubmissionDispatcher, SubmitAnswer, SUBMIT_ANSWER};
