//! Loop runner module - implements the Reason-Act-Observe cycle.
//!
//! This module provides the core loop execution logic, including:
//! - LoopController for executing agent runs
//! - ControllerConfig for the step budget and per-call deadlines

mod controller;

pub use controller::{ControllerConfig, DEFAULT_MAX_STEPS, LoopController};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let config = ControllerConfig::default();
        assert_eq!(config.max_steps, DEFAULT_MAX_STEPS);
    }
}
