pub mod validator;
pub mod summarizer;
pub mod llm;
pub mod safety;
pub mod engine;

pub use engine::SummaryEngine;
