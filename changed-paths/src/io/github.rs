//! Hosting-provider API access for changed-file lists.
//!
//! The [`ChangedFilesApi`] trait decouples retrieval from the HTTP transport.
//! [`GitHubClient`] talks to the GitHub REST API; tests use in-memory fakes
//! that serve predetermined pages.

use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::core::types::RepoId;
use crate::io::config::ActionConfig;

const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// One page of changed file names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePage {
    pub filenames: Vec<String>,
    pub has_next_page: bool,
}

/// Paginated changed-file endpoints. Pages are 1-based.
pub trait ChangedFilesApi {
    fn list_pull_request_files(&self, repo: &RepoId, number: u64, page: u32) -> Result<FilePage>;

    fn compare_commits(&self, repo: &RepoId, base: &str, head: &str, page: u32) -> Result<FilePage>;

    fn get_commit(&self, repo: &RepoId, reference: &str, page: u32) -> Result<FilePage>;
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    filename: String,
}

/// Compare and single-commit responses carry `files` next to other metadata.
#[derive(Debug, Deserialize)]
struct FilesEnvelope {
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Blocking GitHub REST client authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: Url,
    per_page: u32,
}

impl GitHubClient {
    pub fn new(token: &str, config: &ActionConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| anyhow!("github token contains invalid header characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .context("build http client")?;

        let api_url = Url::parse(config.api_url.trim())
            .with_context(|| format!("parse api url {}", config.api_url))?;
        if api_url.cannot_be_a_base() {
            return Err(anyhow!("api url {api_url} cannot carry a request path"));
        }

        Ok(Self {
            client,
            api_url,
            per_page: config.per_page,
        })
    }

    /// Endpoint URL for `segments` below the API root. Each segment is
    /// percent-encoded, so refs containing `/`, `#` or `?` stay one segment.
    fn page_url(&self, segments: &[&str], page: u32) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("api url {} cannot carry a request path", self.api_url))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    #[instrument(skip_all, fields(url = %url))]
    fn get_page<T: DeserializeOwned>(&self, url: Url) -> Result<(T, bool)> {
        debug!("requesting page");
        let response = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response);
            warn!(%status, %message, "api request failed");
            return Err(anyhow!("GET {url} returned {status}: {message}"));
        }

        let has_next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .is_some_and(has_next_link);
        let body = response
            .json::<T>()
            .with_context(|| format!("decode response from {url}"))?;
        Ok((body, has_next))
    }
}

impl ChangedFilesApi for GitHubClient {
    fn list_pull_request_files(&self, repo: &RepoId, number: u64, page: u32) -> Result<FilePage> {
        let number = number.to_string();
        let url = self.page_url(
            &["repos", &repo.owner, &repo.name, "pulls", &number, "files"],
            page,
        )?;
        let (entries, has_next_page) = self.get_page::<Vec<FileEntry>>(url)?;
        Ok(FilePage {
            filenames: entries.into_iter().map(|e| e.filename).collect(),
            has_next_page,
        })
    }

    fn compare_commits(
        &self,
        repo: &RepoId,
        base: &str,
        head: &str,
        page: u32,
    ) -> Result<FilePage> {
        let range = format!("{base}...{head}");
        let url = self.page_url(&["repos", &repo.owner, &repo.name, "compare", &range], page)?;
        let (envelope, has_next_page) = self.get_page::<FilesEnvelope>(url)?;
        Ok(envelope.into_page(has_next_page))
    }

    fn get_commit(&self, repo: &RepoId, reference: &str, page: u32) -> Result<FilePage> {
        let url = self.page_url(&["repos", &repo.owner, &repo.name, "commits", reference], page)?;
        let (envelope, has_next_page) = self.get_page::<FilesEnvelope>(url)?;
        Ok(envelope.into_page(has_next_page))
    }
}

impl FilesEnvelope {
    fn into_page(self, has_next_page: bool) -> FilePage {
        FilePage {
            filenames: self.files.into_iter().map(|e| e.filename).collect(),
            has_next_page,
        }
    }
}

/// True if an RFC 8288 `Link` header advertises a `rel="next"` target.
pub fn has_next_link(header: &str) -> bool {
    header.split(',').any(|link| {
        link.split(';')
            .skip(1)
            .any(|param| matches!(param.trim(), "rel=\"next\"" | "rel=next"))
    })
}

fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().unwrap_or_default();
    if let Ok(body) = serde_json::from_str::<ApiErrorBody>(&text) {
        return body.message;
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("empty response body")
            .to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_link_detected() {
        let header = concat!(
            r#"<https://api.github.com/repositories/1/pulls/1/files?page=2>; rel="next", "#,
            r#"<https://api.github.com/repositories/1/pulls/1/files?page=5>; rel="last""#,
        );
        assert!(has_next_link(header));
    }

    #[test]
    fn last_page_has_no_next_link() {
        let header = concat!(
            r#"<https://api.github.com/x?page=1>; rel="prev", "#,
            r#"<https://api.github.com/x?page=1>; rel="first""#,
        );
        assert!(!has_next_link(header));
        assert!(!has_next_link(""));
    }

    #[test]
    fn envelope_without_files_is_empty_page() {
        let envelope: FilesEnvelope =
            serde_json::from_str(r#"{"sha": "abc", "commit": {}}"#).expect("parse");
        assert_eq!(envelope.into_page(false), FilePage::default());
    }

    fn client_for(api_url: &str) -> GitHubClient {
        let config = ActionConfig {
            api_url: api_url.to_string(),
            ..ActionConfig::default()
        };
        GitHubClient::new("token", &config).expect("client")
    }

    #[test]
    fn ref_with_url_metacharacters_stays_one_segment() {
        let client = client_for("https://ghe.example.com/api/v3/");
        let url = client
            .page_url(&["repos", "o", "r", "commits", "refs/heads/fix#1?x"], 2)
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/o/r/commits/refs%2Fheads%2Ffix%231%3Fx\
             ?per_page=100&page=2"
        );
    }

    #[test]
    fn root_api_url_gets_no_double_slash() {
        let client = client_for("https://api.github.com");
        let url = client
            .page_url(&["repos", "o", "r", "compare", "a...b"], 1)
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/o/r/compare/a...b?per_page=100&page=1"
        );
    }

    #[test]
    fn unparseable_api_url_is_rejected() {
        let config = ActionConfig {
            api_url: "not a url".to_string(),
            ..ActionConfig::default()
        };
        let err = GitHubClient::new("token", &config).expect_err("invalid");
        assert!(format!("{err:#}").contains("parse api url"), "{err:#}");
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let err = GitHubClient::new("bad\ntoken", &ActionConfig::default()).expect_err("invalid");
        assert!(err.to_string().contains("invalid header characters"));
    }
}
