//! Verbose console output of the agent's thought process.

use async_trait::async_trait;
use colored::*;

use super::{HookError, RunHook, StepRecord};
use crate::domain::RunResult;

/// Prints each step's reasoning, action, and observation to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleHook;

#[async_trait]
impl RunHook for ConsoleHook {
    async fn on_step_end(&self, step: u32, record: &StepRecord) -> Result<(), HookError> {
        println!("\n{}", format!("=== Step {} - REASONING ===", step).cyan());
        println!("{}", record.reasoning.content);
        println!("Confidence: {:.2}", record.reasoning.confidence);

        if let Some(tool_name) = record.action.get("tool_name").and_then(|v| v.as_str()) {
            println!("\n{}", format!("=== Step {} - ACTION ===", step).cyan());
            println!("Selected tool: {}", tool_name.green());
            println!("Parameters: {}", record.action["tool_params"]);

            if let Some(output) = &record.output {
                println!("\n{}", format!("=== Step {} - OBSERVATION ===", step).cyan());
                println!("{}", output);
            }
        }
        Ok(())
    }

    async fn on_run_end(&self, result: &RunResult) -> Result<(), HookError> {
        match result {
            RunResult::Finished(_) => println!("\n{}", "=== FINISHED ===".green()),
            RunResult::Failed(e) => println!("\n{} {}", "=== FAILED ===".red(), e.error),
        }
        Ok(())
    }
}
