//! GitHub REST API client.
//!
//! Thin wrapper around `Octocrab` exposing exactly the four upstream calls
//! the service needs: issue/PR search (paginated), a single repository
//! search page, the pull-request merge probe, and the user profile lookup.
//! Search responses are deserialized into our own minimal models rather than
//! the full GitHub issue shape; the parsers in `records` only ever look at
//! these fields.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use octocrab::{Octocrab, Page};
use serde::{Deserialize, Serialize};

/// One item from an issue/PR search response, reduced to the fields we
/// project into records.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchItem {
    pub title: String,
    pub number: u64,
    pub state: String,
    pub html_url: String,
    pub repository_url: String,
    pub user: SearchUser,
    #[serde(default)]
    pub labels: Vec<SearchLabel>,
    pub created_at: DateTime<Utc>,
    pub pull_request: Option<PullRequestLink>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchUser {
    pub login: String,
    pub html_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchLabel {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PullRequestLink {
    pub html_url: String,
}

#[derive(Deserialize)]
struct UserResponse {
    avatar_url: String,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    per_page: u8,
    page: u32,
}

/// Outcome of a user pull-request search.
///
/// GitHub rejects `author:` queries for unknown users with a validation
/// error instead of returning an empty result set, so "no such user" is a
/// distinct, expected outcome rather than a failure.
#[derive(Debug)]
pub enum PrSearch {
    Results(Vec<SearchItem>),
    UserNotFound,
}

#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }

        Ok(Self {
            octocrab: builder.build()?,
        })
    }

    /// Builds a client against a different API base, used by tests to point
    /// at a mock server.
    pub fn with_base_uri(base_uri: &str) -> Result<Self> {
        let octocrab = Octocrab::builder().base_uri(base_uri)?.build()?;
        Ok(Self { octocrab })
    }

    /// Runs an issue/PR search for a user's event pull requests and follows
    /// continuation pages, flattening everything into one ordered list.
    ///
    /// A validation rejection naming an unsearchable user maps to
    /// [`PrSearch::UserNotFound`]; any other upstream failure propagates.
    pub async fn search_user_prs(&self, query: &str, max_pages: u32) -> Result<PrSearch> {
        let first_page = match self.search_page(query, 1, 100).await {
            Ok(page) => page,
            Err(err) if is_unknown_user_error(&err) => return Ok(PrSearch::UserNotFound),
            Err(err) => return Err(err.into()),
        };

        let mut items = first_page.items;
        let mut next = first_page.next;
        let mut page_count = 1;
        let mut hit_page_limit = false;

        while next.is_some() {
            if page_count >= max_pages {
                hit_page_limit = true;
                break;
            }

            match self.octocrab.get_page::<SearchItem>(&next).await? {
                Some(page) => {
                    next = page.next;
                    items.extend(page.items);
                    page_count += 1;
                }
                None => break,
            }
        }

        if hit_page_limit {
            tracing::warn!(
                "Hit max_search_pages ({}) before exhausting search results. Data may be incomplete.",
                max_pages
            );
        }

        Ok(PrSearch::Results(items))
    }

    /// Fetches a single page of repository search results.
    pub async fn search_repos_page(
        &self,
        query: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<SearchItem>> {
        let results = self.search_page(query, page, per_page).await?;
        Ok(results.items)
    }

    async fn search_page(
        &self,
        query: &str,
        page: u32,
        per_page: u8,
    ) -> octocrab::Result<Page<SearchItem>> {
        let params = SearchParams {
            q: query,
            per_page,
            page,
        };
        self.octocrab.get("/search/issues", Some(&params)).await
    }

    /// Checks whether a pull request has been merged.
    ///
    /// The merge endpoint answers 204 for merged and 404 for not merged (or
    /// for a pull request that no longer exists); both are ordinary answers.
    /// Every other status is an upstream failure.
    pub async fn pull_is_merged(&self, owner: &str, repo: &str, number: u64) -> Result<bool> {
        let route = format!("/repos/{owner}/{repo}/pulls/{number}/merge");
        let response = self.octocrab._get(route).await?;

        match response.status().as_u16() {
            204 => Ok(true),
            404 => Ok(false),
            status => Err(anyhow!(
                "unexpected status {status} from merge check for {owner}/{repo}#{number}"
            )),
        }
    }

    /// Looks up a user's profile. Failures (including unknown users)
    /// propagate to the caller.
    pub async fn user_details(&self, username: &str) -> Result<crate::records::UserDetails> {
        let user: UserResponse = self
            .octocrab
            .get(format!("/users/{username}"), None::<&()>)
            .await?;

        Ok(crate::records::UserDetails {
            user_image: user.avatar_url,
            username: username.to_string(),
        })
    }
}

/// True when a search rejection means the queried author does not exist.
fn is_unknown_user_error(err: &octocrab::Error) -> bool {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            is_unknown_user_rejection(&source.message, source.errors.as_deref())
        }
        _ => false,
    }
}

/// GitHub reports a missing `author:` user as a 422 "Validation Failed"
/// whose error entries say the listed users cannot be searched. Other
/// validation failures (e.g. a malformed query) are kept as errors.
fn is_unknown_user_rejection(message: &str, errors: Option<&[serde_json::Value]>) -> bool {
    if !message.to_lowercase().contains("validation failed") {
        return false;
    }

    match errors {
        Some(errors) => errors.iter().any(|error| {
            error
                .get("message")
                .and_then(|message| message.as_str())
                .is_some_and(|message| message.contains("cannot be searched"))
        }),
        // No detail to inspect: assume the common case, an unknown user.
        None => true,
    }
}
