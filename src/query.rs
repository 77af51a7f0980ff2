//! Search query construction for the GitHub search API.
//!
//! Hacktoberfest runs every October, so the search window is fixed to the
//! event month (padded by the -12:00 offset so the window covers October
//! everywhere on Earth). Which October depends on the current date: before
//! October we are still reporting on last year's event.

use chrono::{DateTime, Datelike, Utc};

/// The label that marks an item as counting toward the event.
pub const EVENT_LABEL: &str = "hacktoberfest";

/// Fixed query used to list open repositories participating in the event.
pub const REPO_SEARCH_QUERY: &str = "label:hacktoberfest state:open";

/// Returns the event year for a given date: the current year from October
/// onward, the previous year for January through September.
pub fn event_year(today: DateTime<Utc>) -> i32 {
    if today.month() < 10 {
        today.year() - 1
    } else {
        today.year()
    }
}

/// Builds the issue-search query for a user's event pull requests.
///
/// Terms are space-separated; the `q` parameter is URL-encoded when the
/// request is sent, which is where the `+` separators seen in raw GitHub
/// search URLs come from.
pub fn build_search_query(username: &str, year: i32) -> String {
    format!(
        "-label:invalid created:{year}-09-30T00:00:00-12:00..{year}-10-31T23:59:59-12:00 \
         type:pr is:public author:{username}"
    )
}
