//! CLI argument definitions using clap.

use clap::Parser;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Review a GitHub pull request with a ReAct agent
#[derive(Parser, Debug)]
#[command(name = "react-agent")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository owner (username or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Pull request number to review
    pub pr_number: u64,

    /// Show the agent's thought process
    #[arg(short, long)]
    pub verbose: bool,

    /// Area the review should concentrate on (e.g. security, performance)
    #[arg(short, long)]
    pub focus_area: Option<String>,

    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the configured step budget
    #[arg(short, long)]
    pub max_steps: Option<u32>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Input payload handed to the agent
    pub fn input_data(&self) -> Value {
        let mut input = json!({
            "owner": self.owner,
            "repo": self.repo,
            "pr_number": self.pr_number,
        });
        if let Some(focus) = &self.focus_area {
            input["focus_area"] = json!(focus);
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_positional_args() {
        let cli = Cli::try_parse_from(["react-agent", "acme", "widgets", "42"]).unwrap();
        assert_eq!(cli.owner, "acme");
        assert_eq!(cli.repo, "widgets");
        assert_eq!(cli.pr_number, 42);
        assert!(!cli.is_verbose());
        assert!(cli.max_steps.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "react-agent",
            "acme",
            "widgets",
            "7",
            "-v",
            "--focus-area",
            "security",
            "--max-steps",
            "5",
            "--config",
            "/tmp/agent.yml",
        ])
        .unwrap();
        assert!(cli.is_verbose());
        assert_eq!(cli.focus_area.as_deref(), Some("security"));
        assert_eq!(cli.max_steps, Some(5));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/agent.yml")));
    }

    #[test]
    fn test_pr_number_must_be_numeric() {
        assert!(Cli::try_parse_from(["react-agent", "acme", "widgets", "abc"]).is_err());
    }

    #[test]
    fn test_missing_args_fail() {
        assert!(Cli::try_parse_from(["react-agent", "acme"]).is_err());
    }

    #[test]
    fn test_input_data() {
        let cli = Cli::try_parse_from(["react-agent", "acme", "widgets", "42"]).unwrap();
        assert_eq!(cli.input_data(), json!({"owner": "acme", "repo": "widgets", "pr_number": 42}));

        let cli = Cli::try_parse_from(["react-agent", "acme", "widgets", "42", "-f", "tests"]).unwrap();
        assert_eq!(cli.input_data()["focus_area"], "tests");
    }

    #[test]
    fn test_help_works() {
        Cli::command().debug_assert();
    }
}
