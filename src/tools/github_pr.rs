//! GitHub pull request tool
//!
//! Fetches a PR's metadata, changed files, and diff from the GitHub REST API.
//! API and input problems are reported as data (`{"error", "status": "error"}`)
//! so the agent can observe them; only an unusable tool setup is an Err.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

use super::{Tool, ToolError};

/// GitHub REST API base URL
pub const GITHUB_API_URL: &str = "https://api.github.com";

const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";

/// Default diff length, in characters, handed back to the agent
pub const DEFAULT_MAX_DIFF_CHARS: usize = 50_000;

const REQUIRED_PARAMS: [&str; 3] = ["owner", "repo", "pr_number"];

/// Input accepted by the GitHub PR tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubPrToolInput {
    /// Repository owner (username or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Pull request number to review
    pub pr_number: u64,
    /// Specific area to focus review on (e.g. performance, security, style)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
}

impl GitHubPrToolInput {
    /// Read the input from loosely typed parameters.
    ///
    /// `pr_number` may arrive as a number or a numeric string.
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, String> {
        let missing: Vec<&str> = REQUIRED_PARAMS
            .iter()
            .copied()
            .filter(|key| params.get(*key).is_none_or(Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "Missing required parameters: {}. Please provide owner, repo, and pr_number.",
                missing.join(", ")
            ));
        }

        let text = |key: &str| {
            params
                .get(key)
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| format!("Parameter '{}' must be a string", key))
        };

        let pr_number = match &params["pr_number"] {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| "Parameter 'pr_number' must be a positive integer".to_string())?;

        Ok(Self {
            owner: text("owner")?,
            repo: text("repo")?,
            pr_number,
            focus_area: params.get("focus_area").and_then(Value::as_str).map(String::from),
        })
    }

    fn label(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.pr_number)
    }
}

#[derive(Debug, Error)]
enum FetchError {
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// Tool that fetches pull request information for review
#[derive(Debug, Clone)]
pub struct GitHubPrTool {
    base_url: String,
    token: Option<String>,
    max_diff_chars: usize,
}

impl GitHubPrTool {
    /// Create the tool; without a token only public repositories are reachable
    pub fn new(token: Option<String>) -> Self {
        Self {
            base_url: GITHUB_API_URL.to_string(),
            token: token.filter(|t| !t.is_empty()),
            max_diff_chars: DEFAULT_MAX_DIFF_CHARS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_diff_chars(mut self, max_diff_chars: usize) -> Self {
        self.max_diff_chars = max_diff_chars;
        self
    }

    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn default_headers(&self) -> Result<HeaderMap, ToolError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_static(env!("CARGO_PKG_NAME")));
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("token {}", token))
                .map_err(|e| ToolError::InvalidParams(format!("invalid GitHub token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn pr_url(&self, input: &GitHubPrToolInput) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_url, input.owner, input.repo, input.pr_number
        )
    }

    async fn get(client: &Client, url: &str, accept: &'static str) -> Result<reqwest::Response, FetchError> {
        let response = client.get(url).header(ACCEPT, accept).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Fetch everything for one PR. The client lives only for this call.
    async fn fetch(&self, client: &Client, input: &GitHubPrToolInput) -> Result<Value, FetchError> {
        let pr_url = self.pr_url(input);

        let pr_info: Value = Self::get(client, &pr_url, JSON_MEDIA_TYPE).await?.json().await?;

        if is_private(&pr_info) && !self.is_authenticated() {
            return Ok(error_payload(
                "This is a private repository. A GitHub token is required for access.",
            ));
        }

        let files: Vec<Value> = Self::get(client, &format!("{}/files", pr_url), JSON_MEDIA_TYPE)
            .await?
            .json()
            .await?;
        let diff = Self::get(client, &pr_url, DIFF_MEDIA_TYPE).await?.text().await?;

        Ok(self.build_result(&pr_info, &files, &diff))
    }

    fn build_result(&self, pr_info: &Value, files: &[Value], diff: &str) -> Value {
        let changed_files: Vec<&str> = files
            .iter()
            .filter_map(|f| f.get("filename").and_then(Value::as_str))
            .collect();

        json!({
            "pr_title": pr_info["title"],
            "pr_author": pr_info["user"]["login"],
            "changed_files": changed_files,
            "additions": pr_info["additions"],
            "deletions": pr_info["deletions"],
            "diff": truncate_diff(diff, self.max_diff_chars),
            "pr_description": pr_info["body"].as_str().unwrap_or_default(),
            "pr_url": pr_info["html_url"],
            "repository_private": is_private(pr_info),
            "status": "success",
        })
    }
}

#[async_trait]
impl Tool for GitHubPrTool {
    fn description(&self) -> &str {
        "Fetch a GitHub pull request's title, author, changed files, and diff. \
         Parameters: owner, repo, pr_number, optional focus_area."
    }

    async fn invoke(&self, params: Map<String, Value>) -> Result<Value, ToolError> {
        let input = match GitHubPrToolInput::from_params(&params) {
            Ok(input) => input,
            Err(message) => return Ok(error_payload(message)),
        };

        let client = Client::builder().default_headers(self.default_headers()?).build()?;

        match self.fetch(&client, &input).await {
            Ok(result) => Ok(result),
            Err(e) => {
                let message = fetch_error_message(&e, &input);
                log::error!("GitHub API error: {}", message);
                Ok(error_payload(message))
            }
        }
    }
}

fn is_private(pr_info: &Value) -> bool {
    pr_info["base"]["repo"]["private"]
        .as_bool()
        .or_else(|| pr_info["private"].as_bool())
        .unwrap_or(false)
}

fn error_payload(message: impl Into<String>) -> Value {
    json!({ "error": message.into(), "status": "error" })
}

fn fetch_error_message(err: &FetchError, input: &GitHubPrToolInput) -> String {
    match err {
        FetchError::Status { status: 404, .. } => format!("PR not found: {}", input.label()),
        FetchError::Status { status: 403, body } if body.to_lowercase().contains("rate limit") => {
            "GitHub API rate limit exceeded. Consider adding authentication for higher limits.".to_string()
        }
        other => format!("Error retrieving PR information: {}", other),
    }
}

/// Truncate the diff if it's too long
fn truncate_diff(diff: &str, max_chars: usize) -> String {
    match diff.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}\n... (diff truncated for length)", &diff[..cut]),
        None => diff.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_input_from_params() {
        let input = GitHubPrToolInput::from_params(&params(json!({
            "owner": "acme", "repo": "widgets", "pr_number": 12, "focus_area": "security"
        })))
        .unwrap();

        assert_eq!(input.owner, "acme");
        assert_eq!(input.pr_number, 12);
        assert_eq!(input.focus_area.as_deref(), Some("security"));
        assert_eq!(input.label(), "acme/widgets#12");
    }

    #[test]
    fn test_input_accepts_numeric_string() {
        let input = GitHubPrToolInput::from_params(&params(json!({
            "owner": "acme", "repo": "widgets", "pr_number": "7"
        })))
        .unwrap();
        assert_eq!(input.pr_number, 7);
    }

    #[test]
    fn test_input_reports_missing_params() {
        let err = GitHubPrToolInput::from_params(&params(json!({"owner": "acme"}))).unwrap_err();
        assert_eq!(
            err,
            "Missing required parameters: repo, pr_number. Please provide owner, repo, and pr_number."
        );
    }

    #[test]
    fn test_input_rejects_bad_pr_number() {
        let err = GitHubPrToolInput::from_params(&params(json!({
            "owner": "acme", "repo": "widgets", "pr_number": -3
        })))
        .unwrap_err();
        assert!(err.contains("pr_number"));
    }

    #[tokio::test]
    async fn test_invoke_missing_params_returns_error_payload() {
        let tool = GitHubPrTool::new(None);
        let result = tool.invoke(params(json!({"repo": "widgets"}))).await.unwrap();

        assert_eq!(result["status"], "error");
        assert!(result["error"].as_str().unwrap().contains("owner, pr_number"));
    }

    #[test]
    fn test_headers_without_token() {
        let headers = GitHubPrTool::new(None).default_headers().unwrap();
        assert_eq!(headers[ACCEPT], JSON_MEDIA_TYPE);
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_headers_with_token() {
        let headers = GitHubPrTool::new(Some("ghp_abc".to_string())).default_headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "token ghp_abc");
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        assert!(!GitHubPrTool::new(Some(String::new())).is_authenticated());
    }

    #[test]
    fn test_pr_url() {
        let tool = GitHubPrTool::new(None).with_base_url("http://localhost:9000/");
        let input = GitHubPrToolInput {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            pr_number: 5,
            focus_area: None,
        };
        assert_eq!(tool.pr_url(&input), "http://localhost:9000/repos/acme/widgets/pulls/5");
    }

    #[test]
    fn test_build_result() {
        let tool = GitHubPrTool::new(None);
        let pr_info = json!({
            "title": "Add cache",
            "user": {"login": "octocat"},
            "additions": 10,
            "deletions": 2,
            "body": null,
            "html_url": "https://github.com/acme/widgets/pull/5",
            "base": {"repo": {"private": false}}
        });
        let files = vec![json!({"filename": "src/cache.rs"}), json!({"filename": "README.md"})];

        let result = tool.build_result(&pr_info, &files, "diff --git a b");

        assert_eq!(result["pr_title"], "Add cache");
        assert_eq!(result["pr_author"], "octocat");
        assert_eq!(result["changed_files"], json!(["src/cache.rs", "README.md"]));
        assert_eq!(result["pr_description"], "");
        assert_eq!(result["repository_private"], false);
        assert_eq!(result["status"], "success");
    }

    #[test]
    fn test_truncate_diff() {
        assert_eq!(truncate_diff("short", 10), "short");
        assert_eq!(truncate_diff("abcdef", 3), "abc\n... (diff truncated for length)");
        assert_eq!(truncate_diff("héllo", 2), "hé\n... (diff truncated for length)");
    }

    #[test]
    fn test_fetch_error_messages() {
        let input = GitHubPrToolInput {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            pr_number: 5,
            focus_area: None,
        };

        let not_found = FetchError::Status {
            status: 404,
            body: String::new(),
        };
        assert_eq!(fetch_error_message(&not_found, &input), "PR not found: acme/widgets#5");

        let limited = FetchError::Status {
            status: 403,
            body: "API rate limit exceeded for 1.2.3.4".to_string(),
        };
        assert!(fetch_error_message(&limited, &input).starts_with("GitHub API rate limit exceeded"));

        let forbidden = FetchError::Status {
            status: 403,
            body: "Resource not accessible".to_string(),
        };
        assert!(fetch_error_message(&forbidden, &input).starts_with("Error retrieving PR information"));
    }
}
