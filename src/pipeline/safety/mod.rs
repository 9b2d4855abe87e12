pub mod guardrails;

pub use guardrails::*;
