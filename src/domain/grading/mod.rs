// Grading domain module

pub mod criterion;

pub use criterion::{GradingCriterion, StructuredGradingInstruction};
