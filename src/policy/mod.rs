pub mod config;
pub mod engine;
pub mod whitelist;

// Re-export main types
pub use config::PolicyConfiguration;
pub use engine::{evaluate, evaluate_all, EvaluationResult};
