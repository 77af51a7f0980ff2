//! Projection of raw GitHub search items into the simplified records served
//! by the API.
//!
//! Parsing is pure: one output record per input item, no network access. The
//! `merged` flag on [`PullRequestRecord`] is left `false` here and filled in
//! by the merge-status enrichment pass in `fetcher`.

use crate::github::SearchItem;
use crate::query::EVENT_LABEL;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::Serialize;

const GITHUB_HOST_PREFIX: &str = "https://github.com/";

/// Number of days a pull request stays "pending" after creation, matching
/// the event's initial review window.
const PENDING_WINDOW_DAYS: i64 = 7;

/// The author of a pull request or issue.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RecordUser {
    pub login: String,
    pub url: String,
}

/// A single pull request as served to the frontend.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRecord {
    pub title: String,
    pub number: u64,
    pub repo_name: String,
    pub user: RecordUser,
    pub url: String,
    pub open: bool,
    pub has_hacktoberfest_label: bool,
    /// Human-readable creation date, e.g. "October 3rd 2021".
    pub created_at: String,
    /// Created within the last seven days, so its review may still be open.
    pub is_pending: bool,
    /// Filled in by the merge-status enrichment pass.
    pub merged: bool,
}

/// An open repository participating in the event.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub title: String,
    pub number: u64,
    pub repo_name: String,
    pub user: RecordUser,
    pub url: String,
    pub open: bool,
    pub created_at: String,
}

/// Profile details for a single user.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub user_image: String,
    pub username: String,
}

/// Projects search items into pull request records.
///
/// Always yields exactly one record per input item; `now` is the reference
/// point for the pending window.
pub fn parse_pull_requests(items: &[SearchItem], now: DateTime<Utc>) -> Vec<PullRequestRecord> {
    items
        .iter()
        .map(|item| {
            // Search results for `type:pr` carry the PR link; fall back to
            // the item's own URL, which points at the PR page as well.
            let pr_url = item
                .pull_request
                .as_ref()
                .map(|pr| pr.html_url.as_str())
                .unwrap_or(item.html_url.as_str());

            PullRequestRecord {
                title: item.title.clone(),
                number: item.number,
                repo_name: repo_name_from_pr_url(pr_url),
                user: RecordUser {
                    login: item.user.login.clone(),
                    url: item.user.html_url.clone(),
                },
                url: item.html_url.clone(),
                open: item.state == "open",
                has_hacktoberfest_label: has_event_label(item),
                created_at: format_event_date(item.created_at),
                is_pending: is_pending(item.created_at, now),
                merged: false,
            }
        })
        .collect()
}

/// Projects repository search items into repository records.
pub fn parse_repositories(items: &[SearchItem]) -> Vec<RepositoryRecord> {
    items
        .iter()
        .map(|item| RepositoryRecord {
            title: item.title.clone(),
            number: item.number,
            repo_name: repo_name_from_repository_url(&item.repository_url),
            user: RecordUser {
                login: item.user.login.clone(),
                url: item.user.html_url.clone(),
            },
            url: item.html_url.clone(),
            open: item.state == "open",
            created_at: format_event_date(item.created_at),
        })
        .collect()
}

fn has_event_label(item: &SearchItem) -> bool {
    item.labels
        .iter()
        .any(|label| label.name.eq_ignore_ascii_case(EVENT_LABEL))
}

/// "owner/repo" from a pull request's HTML URL: everything before `/pull/`,
/// with the host prefix stripped.
fn repo_name_from_pr_url(url: &str) -> String {
    let repo_url = url.split("/pull/").next().unwrap_or(url);
    repo_url
        .strip_prefix(GITHUB_HOST_PREFIX)
        .unwrap_or(repo_url)
        .to_string()
}

/// The last path segment of an API repository URL, i.e. the repository name.
fn repo_name_from_repository_url(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .to_string()
}

/// True when `created_at` is strictly after `now` minus seven days, floored
/// to the start of that day (UTC).
fn is_pending(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let week_old = (now - Duration::days(PENDING_WINDOW_DAYS))
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();
    created_at > week_old
}

/// Formats a timestamp as "October 3rd 2021".
fn format_event_date(date: DateTime<Utc>) -> String {
    let day = date.day();
    format!("{} {}{} {}", date.format("%B"), day, ordinal_suffix(day), date.year())
}

fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}
