//! Endpoint paths for the Atomicwork API, relative to the base URL.

/// Hard upper bound the API accepts for `per_page`.
pub const MAX_PAGE_SIZE: usize = 100;

/// Number of tickets returned when the caller gives no limit.
pub const DEFAULT_LIMIT: usize = 50;

/// Over-fetch factor applied when filtering by requester email client-side.
const REQUESTER_FILTER_OVERFETCH: usize = 3;

const LIST_QUERY: &str = "filter_name=all&sort_order=CREATED_AT_DESC&page=1";

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Workspace listing used by `list_my_tickets`.
pub fn my_tickets(workspace_id: &str) -> String {
    format!(
        "/workspaces/{}/requests/list?{}&is_problem=false",
        segment(workspace_id),
        LIST_QUERY
    )
}

/// Workspace listing used by `list_all_requests`.
pub fn all_requests(workspace_id: &str, per_page: usize) -> String {
    format!(
        "/workspaces/{}/requests/list?{}&per_page={}",
        segment(workspace_id),
        LIST_QUERY,
        per_page
    )
}

/// A single request by id or display id.
pub fn ticket(ticket_id: &str) -> String {
    format!("/requests/{}", segment(ticket_id))
}

/// Keyword search over requests.
pub fn search(query: &str, assigned_to_me: bool) -> String {
    let mut endpoint = format!("/requests?search={}", urlencoding::encode(query));
    if assigned_to_me {
        endpoint.push_str("&assigned_to_me=true");
    }
    endpoint
}

/// Notes on a request, workspace-scoped form.
pub fn workspace_notes(workspace_id: &str, ticket_id: &str) -> String {
    format!(
        "/workspaces/{}/requests/{}/notes",
        segment(workspace_id),
        segment(ticket_id)
    )
}

/// Notes on a request, unscoped form.
pub fn notes(ticket_id: &str) -> String {
    format!("/requests/{}/notes", segment(ticket_id))
}

/// Page size to request for `list_all_requests`.
///
/// Filtering by requester happens after the fetch, so more rows are pulled
/// to leave enough matches; the result never exceeds [`MAX_PAGE_SIZE`].
pub fn fetch_size(limit: usize, filter_by_requester: bool) -> usize {
    let wanted = if filter_by_requester {
        limit.saturating_mul(REQUESTER_FILTER_OVERFETCH)
    } else {
        limit
    };
    wanted.min(MAX_PAGE_SIZE)
}
