// ABOUTME: Repository summarization pipeline
// ABOUTME: Fetches a README from GitHub and drives an LLM to a validated JSON summary

pub mod ai;
pub mod error;
pub mod github;
pub mod pipeline;

pub use ai::AiService;
pub use error::{SummarizerError, SummarizerResult};
pub use github::GithubClient;
pub use pipeline::{RepoRef, RepoSummary, Summarizer};
