//! Structured evaluation logging (JSONL)

mod jsonl_logger;

pub use jsonl_logger::JsonlEvaluationLogger;
