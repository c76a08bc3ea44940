//! Multi-host GitHub client manager
//!
//! Manages GitHub API clients for different hosts (github.com, GitHub Enterprise).
//! Clients are lazily initialized and shared per host.

use crate::{OctocrabClient, DEFAULT_HOST};
use anyhow::{Context, Result};
use log::{debug, info};
use octocrab::Octocrab;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves GitHub tokens for different hosts
///
/// Tries multiple sources in order:
/// 1. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 2. `gh auth token --hostname {host}` command
/// 3. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// Cached default token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok();

        Self { default_token }
    }

    /// Name of the host-specific token variable
    /// (`ghe.example.com` → `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
    pub fn env_key(host: &str) -> String {
        format!(
            "GITHUB_TOKEN_{}",
            host.replace(['.', '-'], "_").to_uppercase()
        )
    }

    /// Get a token for the given host (None = github.com)
    pub async fn get_token(&self, host: Option<&str>) -> Result<String> {
        let host = host.unwrap_or(DEFAULT_HOST);

        let env_key = Self::env_key(host);
        if let Ok(token) = std::env::var(&env_key) {
            debug!("Using token from env var {} for host {}", env_key, host);
            return Ok(token);
        }

        debug!("Trying gh auth token for host {}", host);
        // A missing gh binary is not fatal, the default token may still apply
        match tokio::process::Command::new("gh")
            .args(["auth", "token", "--hostname", host])
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                let token = String::from_utf8(output.stdout)
                    .context("Invalid UTF-8 in gh auth token output")?
                    .trim()
                    .to_string();
                if !token.is_empty() {
                    debug!("Using token from gh CLI for host {}", host);
                    return Ok(token);
                }
            }
            Ok(_) => debug!("gh auth token returned no token for host {}", host),
            Err(e) => debug!("Failed to run 'gh auth token': {}", e),
        }

        // Fallback to default token (for github.com only)
        if host == DEFAULT_HOST {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Ok(token.clone());
            }
        }

        Err(anyhow::anyhow!(
            "No token found for host '{}'. \
             Set {} or run 'gh auth login --hostname {}'",
            host,
            env_key,
            host
        ))
    }
}

/// Manages GitHub API clients for multiple hosts
///
/// Lazily creates and keeps one client per host. Each client is configured
/// with the appropriate base URL and authentication token.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::ClientManager;
///
/// let mut manager = ClientManager::new();
///
/// // Get client for github.com
/// let client = manager.get_client(None).await?;
///
/// // Get client for enterprise host
/// let ghe_client = manager.get_client(Some("ghe.example.com")).await?;
/// ```
#[derive(Debug, Default)]
pub struct ClientManager {
    /// Clients per host
    clients: HashMap<String, Arc<OctocrabClient>>,
    /// Token resolver
    tokens: TokenResolver,
}

impl ClientManager {
    /// Create a new, empty client manager
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            tokens: TokenResolver::new(),
        }
    }

    /// Get or create a client for the given host (None = github.com)
    pub async fn get_client(&mut self, host: Option<&str>) -> Result<Arc<OctocrabClient>> {
        let key = host.unwrap_or(DEFAULT_HOST).to_string();

        if let Some(client) = self.clients.get(&key) {
            return Ok(Arc::clone(client));
        }

        let client = Arc::new(self.create_client(host).await?);
        self.clients.insert(key, Arc::clone(&client));
        Ok(client)
    }

    /// Create a new client for the given host
    async fn create_client(&self, host: Option<&str>) -> Result<OctocrabClient> {
        let effective_host = host.unwrap_or(DEFAULT_HOST);
        info!("Creating GitHub client for host: {}", effective_host);

        let token = self.tokens.get_token(host).await?;

        let mut builder = Octocrab::builder().personal_token(token);
        if effective_host != DEFAULT_HOST {
            builder = builder
                .base_uri(api_base_url(effective_host))
                .context("Failed to set base URI")?;
        }

        let octocrab = builder.build().context("Failed to build Octocrab client")?;

        info!("GitHub client created for host: {}", effective_host);
        Ok(OctocrabClient::new(Arc::new(octocrab)))
    }
}

/// REST API base URL for a host
pub fn api_base_url(host: &str) -> String {
    if host == DEFAULT_HOST {
        "https://api.github.com".to_string()
    } else {
        format!("https://{}/api/v3", host)
    }
}
