//! Client for the GitHub starred-repositories listing

use std::time::Duration;

use log::debug;
use serde::Deserialize;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::stars::StarRecord;

/// Trait for star listing - allows mocking in tests
pub trait StarsApi {
    /// Returns every repository starred by `username`, in listing order.
    ///
    /// Implementations must exhaust pagination and must not return a partial
    /// list on failure.
    fn starred(&self, username: &str) -> Result<Vec<StarRecord>>;
}

/// Repository as returned by the REST API
#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
    full_name: String,
    owner: ApiOwner,
    language: Option<String>,
    description: Option<String>,
    html_url: String,
    homepage: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    fork: bool,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

impl From<ApiRepository> for StarRecord {
    fn from(repo: ApiRepository) -> Self {
        StarRecord {
            name: repo.name,
            full_name: repo.full_name,
            owner: repo.owner.login,
            language: repo.language,
            description: repo.description,
            html_url: repo.html_url,
            homepage: repo.homepage,
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
            topics: repo.topics,
            archived: repo.archived,
            fork: repo.fork,
        }
    }
}

/// Blocking GitHub REST client
pub struct GitHubClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
    per_page: u32,
    max_pages: u32,
}

impl GitHubClient {
    pub fn new(config: &ApiConfig, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent,
            base_url: config.base_url.clone(),
            token: token.filter(|t| !t.is_empty()),
            per_page: config.per_page,
            max_pages: config.max_pages,
        }
    }

    fn page_url(&self, username: &str, page: u32) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| Error::Config {
                message: format!("api.base_url cannot be a base URL: {}", self.base_url),
                hint: None,
            })?;
            segments.pop_if_empty().extend(["users", username, "starred"]);
        }
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    fn fetch_page(&self, url: &Url) -> Result<Vec<StarRecord>> {
        let mut request = self
            .agent
            .get(url.as_str())
            .set("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        let fetch_error = |message: String| Error::ApiFetch {
            url: url.to_string(),
            message,
        };

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(fetch_error(format!("HTTP {}: {}", code, body.trim())));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(fetch_error(transport.to_string()));
            }
        };

        let repos: Vec<ApiRepository> = response
            .into_json()
            .map_err(|e| fetch_error(format!("invalid response body: {}", e)))?;

        Ok(repos.into_iter().map(StarRecord::from).collect())
    }
}

impl StarsApi for GitHubClient {
    fn starred(&self, username: &str) -> Result<Vec<StarRecord>> {
        let mut records = Vec::new();

        for page in 1..=self.max_pages {
            let url = self.page_url(username, page)?;
            let batch = self.fetch_page(&url)?;
            let count = batch.len();
            debug!("Fetched page {} with {} star(s)", page, count);
            records.extend(batch);

            if count < self.per_page as usize {
                return Ok(records);
            }
        }

        Err(Error::ApiFetch {
            url: self.page_url(username, self.max_pages)?.to_string(),
            message: format!(
                "listing did not end within {} pages; raise api.max_pages",
                self.max_pages
            ),
        })
    }
}
