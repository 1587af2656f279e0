use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;
mod config;

use cli::Cli;
use config::Config;
use react_agent::domain::{AgentConfig, FinalOutput, RunResult};
use react_agent::hooks::{ConsoleHook, HookSet, JsonlTraceHook};
use react_agent::oracle::OpperClient;
use react_agent::runner::LoopController;
use react_agent::tools::{GitHubPrTool, Tool};

const AGENT_ID: &str = "github_pr_reviewer";
const TOOL_NAME: &str = "github_pr_tool";

const PR_REVIEW_INSTRUCTIONS: &str = r#"You are a GitHub PR reviewer. Your task is to review pull requests and provide helpful feedback.
You should:
1. Fetch the PR information using the github_pr_tool
2. Analyze the changes and their impact
3. Identify potential issues or improvements
4. Provide a detailed review with actionable feedback

Your final output should include:
- A summary of the changes
- List of issues found (if any)
- Suggestions for improvement
- Overall assessment"#;

fn setup_logging(log_level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(env!("CARGO_PKG_NAME"))
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join(format!("{}.log", env!("CARGO_PKG_NAME")));

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level.unwrap_or("info")))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Reviewing {}/{}#{}", cli.owner, cli.repo, cli.pr_number);

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let oracle = OpperClient::new(config.oracle.to_opper_config()).context("Failed to create oracle client")?;

    let github_token = std::env::var("GITHUB_TOKEN").ok();
    let github_tool = GitHubPrTool::new(github_token)
        .with_base_url(config.github.api_url.clone())
        .with_max_diff_chars(config.github.max_diff_chars);

    let mut hooks = HookSet::new();
    if cli.is_verbose() {
        hooks = hooks.with(Arc::new(ConsoleHook));
    }
    if let Some(path) = &config.trace.jsonl_path {
        info!("Writing run trace to {}", path.display());
        hooks = hooks.with(Arc::new(JsonlTraceHook::new(path)));
    }

    let mut controller = LoopController::with_config(Arc::new(oracle), config.controller_config(cli.max_steps))
        .with_hook(Arc::new(hooks));
    controller.register_tools(vec![(TOOL_NAME, Arc::new(github_tool) as Arc<dyn Tool>)]);

    let agent = AgentConfig::new(PR_REVIEW_INSTRUCTIONS).with_verbose(cli.is_verbose());
    let result = controller.run_agent(AGENT_ID, &agent, cli.input_data()).await;

    print_review(&result);
    Ok(())
}

fn print_review(result: &RunResult) {
    let output = match result {
        RunResult::Failed(err) => {
            println!("{} {}", "Error:".red(), err.error);
            return;
        }
        RunResult::Finished(output) => FinalOutput::from_map(output),
    };

    println!("\n{}", "=== PR Review Results ===".green().bold());
    println!("\n{} {}", "Summary:".bold(), or_default(&output.review_summary, "No summary provided"));

    if !output.issues_found.is_empty() {
        println!("\n{}", "Issues Found:".yellow());
        for issue in &output.issues_found {
            println!("- {}", issue);
        }
    }

    if !output.suggestions.is_empty() {
        println!("\n{}", "Suggestions:".cyan());
        for suggestion in &output.suggestions {
            println!("- {}", suggestion);
        }
    }

    println!(
        "\n{} {}",
        "Overall Assessment:".bold(),
        or_default(&output.overall_assessment, "No assessment provided")
    );
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up OPPER_API_KEY and GITHUB_TOKEN from a local .env, if any
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
