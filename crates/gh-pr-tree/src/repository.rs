//! Repository model
//!
//! Domain model for GitHub repositories and references to a single
//! pull request within one.

use gh_client::DEFAULT_HOST;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A GitHub repository
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Repository {
    /// Organization or owner name
    pub org: String,
    /// Repository name
    pub repo: String,
    /// GitHub host (None = github.com)
    pub host: Option<String>,
}

impl Repository {
    /// Create a new repository (defaults to github.com)
    pub fn new(org: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            host: None,
        }
    }

    /// Create a repository with a custom host
    pub fn with_host(org: impl Into<String>, repo: impl Into<String>, host: Option<String>) -> Self {
        // Normalize github.com to None
        let host = host.filter(|h| h != DEFAULT_HOST && !h.is_empty());
        Self {
            org: org.into(),
            repo: repo.into(),
            host,
        }
    }

    /// Get the effective host (defaults to github.com)
    pub fn effective_host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Display name for the repository (org/repo)
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }
}

/// Errors parsing a pull request reference
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsePullRequestRefError {
    #[error("expected <owner>/<repo>#<number>, got '{0}'")]
    InvalidFormat(String),

    #[error("invalid pull request number '{0}'")]
    InvalidNumber(String),
}

/// Reference to one pull request: `[host:]owner/repo#number`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub repository: Repository,
    pub number: u64,
}

impl PullRequestRef {
    /// Same pull request on `host`, when one is given
    pub fn on_host(self, host: Option<String>) -> Self {
        match host {
            Some(host) => Self {
                repository: Repository::with_host(
                    self.repository.org,
                    self.repository.repo,
                    Some(host),
                ),
                number: self.number,
            },
            None => self,
        }
    }
}

impl FromStr for PullRequestRef {
    type Err = ParsePullRequestRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePullRequestRefError::InvalidFormat(s.to_string());

        let (path, number) = s.rsplit_once('#').ok_or_else(invalid)?;
        let number: u64 = number
            .parse()
            .map_err(|_| ParsePullRequestRefError::InvalidNumber(number.to_string()))?;

        let (host, path) = match path.split_once(':') {
            Some((host, path)) => (Some(host.to_string()), path),
            None => (None, path),
        };

        let (org, repo) = path.split_once('/').ok_or_else(invalid)?;
        if org.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            repository: Repository::with_host(org, repo, host),
            number,
        })
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(host) = &self.repository.host {
            write!(f, "{}:", host)?;
        }
        write!(f, "{}#{}", self.repository.display_name(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_to_github_com() {
        let repo = Repository::new("org", "repo");
        assert!(repo.host.is_none());
        assert_eq!(repo.effective_host(), "github.com");
    }

    #[test]
    fn test_host_normalization() {
        let repo = Repository::with_host("org", "repo", Some("github.com".to_string()));
        assert!(repo.host.is_none());
    }

    #[test]
    fn test_host_override() {
        let pr: PullRequestRef = "org/repo#1".parse().unwrap();
        let pr = pr.on_host(Some("ghe.example.com".to_string()));
        assert_eq!(pr.repository.effective_host(), "ghe.example.com");
        assert_eq!(pr.to_string(), "ghe.example.com:org/repo#1");

        let pr: PullRequestRef = "ghe.example.com:org/repo#1".parse().unwrap();
        assert_eq!(pr.clone().on_host(None), pr);
        assert!(pr.on_host(Some("github.com".to_string())).repository.host.is_none());
    }

    #[test]
    fn test_parse_pull_request_ref() {
        let pr: PullRequestRef = "rust-lang/rust#123".parse().unwrap();
        assert_eq!(pr.repository, Repository::new("rust-lang", "rust"));
        assert_eq!(pr.number, 123);
        assert_eq!(pr.to_string(), "rust-lang/rust#123");
    }

    #[test]
    fn test_parse_pull_request_ref_with_host() {
        let pr: PullRequestRef = "ghe.example.com:org/repo#7".parse().unwrap();
        assert_eq!(pr.repository.effective_host(), "ghe.example.com");
        assert_eq!(pr.to_string(), "ghe.example.com:org/repo#7");
    }

    #[test]
    fn test_parse_pull_request_ref_errors() {
        assert_eq!(
            "org/repo".parse::<PullRequestRef>(),
            Err(ParsePullRequestRefError::InvalidFormat("org/repo".to_string()))
        );
        assert_eq!(
            "org/repo#abc".parse::<PullRequestRef>(),
            Err(ParsePullRequestRefError::InvalidNumber("abc".to_string()))
        );
        assert!("repo#1".parse::<PullRequestRef>().is_err());
        assert!("a/b/c#1".parse::<PullRequestRef>().is_err());
    }
}
