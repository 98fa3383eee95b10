// ABOUTME: GitHub REST client for fetching repository READMEs
// ABOUTME: Decodes the base64 content payload into UTF-8 text

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::error::{SummarizerError, SummarizerResult};

const GITHUB_API_URL: &str = "https://api.github.com";

/// Readme payload returned by the GitHub API. `content` is base64 with
/// embedded newlines.
#[derive(Debug, Deserialize)]
struct ReadmeResponse {
    content: String,
    encoding: String,
}

/// Minimal GitHub API client. An optional token lifts the anonymous
/// rate limit; the endpoint works unauthenticated for public repos.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<String>) -> SummarizerResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent("repolens")
            .build()
            .map_err(SummarizerError::RequestFailed)?;

        Ok(Self { client, token })
    }

    /// Fetch and decode the README of `owner/repo`. Any failure is
    /// terminal for the request; there is no fallback content.
    pub async fn fetch_readme(&self, owner: &str, repo: &str) -> SummarizerResult<String> {
        let url = format!("{}/repos/{}/{}/readme", GITHUB_API_URL, owner, repo);
        debug!("Fetching README: {}/{}", owner, repo);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(SummarizerError::RequestFailed)?;

        if !response.status().is_success() {
            let status = response.status();
            error!("GitHub README request failed: {} for {}/{}", status, owner, repo);
            return Err(SummarizerError::Upstream(format!(
                "GitHub returned {} for {}/{}",
                status, owner, repo
            )));
        }

        let readme: ReadmeResponse = response
            .json()
            .await
            .map_err(SummarizerError::RequestFailed)?;

        if readme.encoding != "base64" {
            return Err(SummarizerError::Decode(format!(
                "Unexpected README encoding: {}",
                readme.encoding
            )));
        }

        decode_readme_content(&readme.content)
    }
}

/// Decode the base64 README body. GitHub wraps the payload with newlines,
/// which the decoder rejects, so strip whitespace first.
fn decode_readme_content(content: &str) -> SummarizerResult<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| SummarizerError::Decode(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| SummarizerError::Decode(e.to_string()))
}
