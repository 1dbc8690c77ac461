//! Atomicwork request/response shapes.
//!
//! The listing endpoints take a JSON array of filter clauses as the POST body.
//! Responses are not contractually fixed, so tickets stay as raw JSON and
//! are read through the alias lists below.

use serde::Serialize;
use serde_json::Value;

// =============================================================================
// Filter clauses
// =============================================================================

/// One entry of the filter array sent to `/requests/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterClause {
    pub attribute: String,
    pub operator: String,
    pub values: Vec<FilterValue>,
}

/// A value inside a [`FilterClause`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterValue {
    pub value: Value,
    /// `Some(None)` serializes as an explicit `"nested_filter": null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_filter: Option<Option<Value>>,
}

impl FilterClause {
    /// `assignee IN [user_id]`. An unparseable user id is sent as `null`.
    pub fn assignee(user_id: Option<i64>) -> Self {
        Self {
            attribute: "assignee".to_string(),
            operator: "IN".to_string(),
            values: vec![FilterValue {
                value: user_id.map(Value::from).unwrap_or(Value::Null),
                nested_filter: Some(None),
            }],
        }
    }

    /// `status IN [status]`.
    pub fn status(status: &str) -> Self {
        Self {
            attribute: "status".to_string(),
            operator: "IN".to_string(),
            values: vec![FilterValue {
                value: Value::String(status.to_string()),
                nested_filter: None,
            }],
        }
    }
}

// =============================================================================
// Field aliases
// =============================================================================

// Candidate source keys, first present wins. Dotted entries walk nested objects.
pub const ID_ALIASES: &[&str] = &["id", "request_id", "display_id"];
pub const TITLE_ALIASES: &[&str] = &["title", "subject"];
pub const STATUS_ALIASES: &[&str] = &["status"];
pub const PRIORITY_ALIASES: &[&str] = &["priority"];
pub const ASSIGNEE_ALIASES: &[&str] = &["assigned_to.name", "assignee.name"];
pub const CREATED_ALIASES: &[&str] = &["created_at", "created_date"];
pub const UPDATED_ALIASES: &[&str] = &["updated_at", "modified_date"];
/// Key used in the ticket's portal URL; display ids read better than numeric ids.
pub const URL_KEY_ALIASES: &[&str] = &["display_id", "id"];
pub const REQUESTER_EMAIL_PATH: &str = "requester.email";

const DEFAULT_PRIORITY: &str = "normal";
const UNASSIGNED: &str = "Unassigned";

fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// Whether a value counts as "set": not null, false, zero or an empty string.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Resolve the first alias that is present on `record`.
pub fn resolve_alias<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|path| lookup_path(record, path))
        .find(|v| is_present(v))
}

fn resolve_owned(record: &Value, aliases: &[&str]) -> Option<Value> {
    resolve_alias(record, aliases).cloned()
}

/// First alias that exists on `record`, whatever its value (`null` and `""` included).
fn passthrough(record: &Value, aliases: &[&str]) -> Option<Value> {
    aliases
        .iter()
        .find_map(|path| lookup_path(record, path))
        .cloned()
}

fn display_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Normalized ticket
// =============================================================================

/// Fixed output shape for `list_my_tickets`. Absent fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTicket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    pub priority: Value,
    pub assigned_to: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NormalizedTicket {
    /// Reshape a raw ticket. `portal_url` is the web root the ticket link hangs off.
    pub fn from_raw(ticket: &Value, portal_url: &str) -> Self {
        Self {
            id: resolve_owned(ticket, ID_ALIASES),
            title: resolve_owned(ticket, TITLE_ALIASES),
            status: passthrough(ticket, STATUS_ALIASES),
            priority: resolve_owned(ticket, PRIORITY_ALIASES)
                .unwrap_or_else(|| Value::from(DEFAULT_PRIORITY)),
            assigned_to: resolve_owned(ticket, ASSIGNEE_ALIASES)
                .unwrap_or_else(|| Value::from(UNASSIGNED)),
            created: resolve_owned(ticket, CREATED_ALIASES),
            updated: resolve_owned(ticket, UPDATED_ALIASES),
            url: resolve_alias(ticket, URL_KEY_ALIASES)
                .map(|key| format!("{}/requests/{}", portal_url, display_key(key))),
        }
    }
}

/// `list_my_tickets` result envelope.
#[derive(Debug, Clone, Serialize)]
pub struct TicketListing {
    pub total: usize,
    pub tickets: Vec<NormalizedTicket>,
}

impl TicketListing {
    /// Take at most `limit` tickets from `payload` and normalize them.
    pub fn from_payload(payload: &Value, limit: usize, portal_url: &str) -> Self {
        let tickets: Vec<NormalizedTicket> = extract_tickets(payload)
            .iter()
            .take(limit)
            .map(|t| NormalizedTicket::from_raw(t, portal_url))
            .collect();

        Self {
            total: tickets.len(),
            tickets,
        }
    }
}

/// Locate the ticket array: `data`, then `requests`, then the payload itself.
pub fn extract_tickets(payload: &Value) -> &[Value] {
    payload
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| payload.get("requests").and_then(Value::as_array))
        .or_else(|| payload.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Keep only `data` entries whose requester email matches `email`
/// (case-insensitive, trimmed), rewrite `total_count`/`total_pages` for the
/// filtered set, then cut `data` down to `limit`.
///
/// Payloads without a `data` array are left untouched.
pub fn filter_by_requester(payload: &mut Value, email: &str, limit: usize) {
    let wanted = normalize_email(email);

    let Some(object) = payload.as_object_mut() else {
        return;
    };
    let Some(Value::Array(entries)) = object.get_mut("data") else {
        return;
    };

    entries.retain(|entry| {
        lookup_path(entry, REQUESTER_EMAIL_PATH)
            .and_then(Value::as_str)
            .is_some_and(|candidate| normalize_email(candidate) == wanted)
    });

    let matched = entries.len();
    entries.truncate(limit);

    let total_pages = if limit == 0 {
        0
    } else {
        matched.div_ceil(limit)
    };
    object.insert("total_count".to_string(), Value::from(matched));
    object.insert("total_pages".to_string(), Value::from(total_pages));
}
