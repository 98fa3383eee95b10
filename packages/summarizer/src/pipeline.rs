// ABOUTME: The fetch -> prompt -> model -> validate summarization pipeline
// ABOUTME: Parses repository references and produces validated summaries

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::AiService;
use crate::error::{SummarizerError, SummarizerResult};
use crate::github::GithubClient;

const SUMMARY_PROMPT: &str = r#"
Summarize this GitHub repository based on its README content:

{readme}

Provide a summary and list some cool facts about the repository.
Format your response as a JSON object with two fields:
1. "summary": A string containing a concise summary
2. "coolFacts": An array of strings containing interesting facts
"#;

/// An owner/repo pair derived from a URL-shaped string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Derive owner and repository name from the last two path segments.
    /// Fails fast on malformed input, before any external call.
    pub fn parse(url: &str) -> SummarizerResult<Self> {
        let parts: Vec<&str> = url.split('/').collect();
        if parts.len() < 2 {
            return Err(SummarizerError::InvalidRepoUrl(
                "URL must contain an owner and a repository name".to_string(),
            ));
        }

        let owner = parts[parts.len() - 2];
        let repo = parts[parts.len() - 1];

        if owner.is_empty() || repo.is_empty() {
            return Err(SummarizerError::InvalidRepoUrl(
                "Could not extract owner and repository name".to_string(),
            ));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

/// Validated summarization output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    pub summary: String,
    #[serde(rename = "coolFacts")]
    pub cool_facts: Vec<String>,
}

/// The summarization pipeline: README fetch, prompt templating, model
/// call, and output validation. Stateless between calls; identical
/// inputs re-run the full pipeline.
pub struct Summarizer {
    github: GithubClient,
    ai: AiService,
}

impl Summarizer {
    pub fn new(github: GithubClient, ai: AiService) -> Self {
        Self { github, ai }
    }

    pub async fn summarize(&self, repo_url: &str) -> SummarizerResult<RepoSummary> {
        let repo_ref = RepoRef::parse(repo_url)?;
        info!("Summarizing repository {}/{}", repo_ref.owner, repo_ref.repo);

        let readme = self
            .github
            .fetch_readme(&repo_ref.owner, &repo_ref.repo)
            .await?;

        let prompt = SUMMARY_PROMPT.replace("{readme}", &readme);
        let summary: RepoSummary = self.ai.generate_structured(prompt).await?;

        validate_summary(summary)
    }
}

/// Shape check on the model output. The struct already guarantees types;
/// an empty summary string still counts as a mismatch. No coercion.
fn validate_summary(summary: RepoSummary) -> SummarizerResult<RepoSummary> {
    if summary.summary.trim().is_empty() {
        return Err(SummarizerError::SchemaValidation(
            "summary must be a non-empty string".to_string(),
        ));
    }
    Ok(summary)
}
