//! CLI module for react-agent - command-line interface.
//!
//! A single command: review one pull request with the PR reviewer agent.

pub mod commands;

pub use commands::Cli;
