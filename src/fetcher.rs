//! Service layer orchestrating the data-shaping pipelines.
//!
//! Each endpoint maps to one function here: search GitHub, project the raw
//! items into records, and (for pull requests) enrich every record with its
//! merge status. This keeps the retrieval and shaping logic out of the HTTP
//! layer.

use crate::config::AppConfig;
use crate::github::{GitHubClient, PrSearch};
use crate::query;
use crate::records::{self, PullRequestRecord, RepositoryRecord, UserDetails};
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestsResponse {
    pub data: Vec<PullRequestRecord>,
    pub fetched_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoriesResponse {
    pub data: Vec<RepositoryRecord>,
    pub fetched_at: String,
}

#[derive(Debug, Serialize)]
pub struct UserDetailsResponse {
    pub user: UserDetails,
}

/// Fetches, parses, and enriches a user's event pull requests.
///
/// An unknown username yields an empty `data` list, not an error; the
/// frontend treats "no such user" and "no qualifying PRs" the same way.
pub async fn fetch_pull_requests_data(
    client: &GitHubClient,
    config: &AppConfig,
    username: &str,
) -> Result<PullRequestsResponse> {
    let now = Utc::now();
    let search_query = query::build_search_query(username, query::event_year(now));

    let items = match client
        .search_user_prs(&search_query, config.max_search_pages)
        .await?
    {
        PrSearch::Results(items) => items,
        PrSearch::UserNotFound => {
            tracing::debug!(username, "User not searchable, returning empty list");
            Vec::new()
        }
    };

    let mut prs = records::parse_pull_requests(&items, now);
    attach_merge_status(client, &mut prs, config.merge_check_concurrency_limit).await?;

    Ok(PullRequestsResponse {
        data: prs,
        fetched_at: fetched_at_timestamp(),
    })
}

/// Fetches one page of open repositories carrying the event label.
pub async fn fetch_hacktoberfest_repos(
    client: &GitHubClient,
    page: u32,
    per_page: u8,
) -> Result<RepositoriesResponse> {
    let items = client
        .search_repos_page(query::REPO_SEARCH_QUERY, page, per_page)
        .await?;

    Ok(RepositoriesResponse {
        data: records::parse_repositories(&items),
        fetched_at: fetched_at_timestamp(),
    })
}

/// Looks up a user's profile details.
pub async fn fetch_user_details(
    client: &GitHubClient,
    username: &str,
) -> Result<UserDetailsResponse> {
    let user = client.user_details(username).await?;
    Ok(UserDetailsResponse { user })
}

/// Resolves the merge status of every record, in place.
///
/// Each record is paired with its index before dispatch so the flags land on
/// the records they were computed for regardless of completion order; the
/// checks themselves run concurrently up to `concurrency_limit` in flight.
async fn attach_merge_status(
    client: &GitHubClient,
    prs: &mut [PullRequestRecord],
    concurrency_limit: usize,
) -> Result<()> {
    let targets: Vec<(usize, String, u64)> = prs
        .iter()
        .enumerate()
        .map(|(index, pr)| (index, pr.repo_name.clone(), pr.number))
        .collect();

    let mut checks = stream::iter(targets)
        .map(|(index, repo_name, number)| async move {
            match repo_name.split_once('/') {
                Some((owner, repo)) => {
                    let merged = client.pull_is_merged(owner, repo, number).await?;
                    Ok::<(usize, bool), anyhow::Error>((index, merged))
                }
                None => {
                    tracing::warn!(%repo_name, number, "Unparseable repo name, skipping merge check");
                    Ok((index, false))
                }
            }
        })
        .buffer_unordered(concurrency_limit);

    while let Some(result) = checks.next().await {
        let (index, merged) = result?;
        prs[index].merged = merged;
    }

    Ok(())
}

fn fetched_at_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
