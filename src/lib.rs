//! react-agent - A bounded Reason-Act-Observe agent loop
//!
//! A LoopController alternates between a reasoning oracle, a decision
//! oracle, and a registry of named tools until the agent finishes or the
//! step budget runs out. Every run returns exactly one structured result.

pub mod domain;
pub mod error;
pub mod hooks;
pub mod oracle;
pub mod runner;
pub mod tools;

pub use error::{AgentError, Result};
