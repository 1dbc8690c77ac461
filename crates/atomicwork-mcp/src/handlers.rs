//! Tool handlers for MCP server.
//!
//! Each handler validates its arguments, issues one request (two for
//! comments), and renders the outcome as a single text block. Errors never
//! escape as JSON-RPC errors; they are rendered with a per-tool label.

use std::sync::Arc;

use atomicwork_client::endpoints::{self, DEFAULT_LIMIT};
use atomicwork_client::{filter_by_requester, FilterClause, TicketListing};
use atomicwork_core::{ApiRequest, Config, Error, Result, TicketApi};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::tools::{
    self, GET_TICKET_COMMENTS, GET_TICKET_DETAILS, LIST_ALL_REQUESTS, LIST_MY_TICKETS,
    SEARCH_TICKETS,
};

/// Returned for every tool call while no API key is configured.
pub const MISSING_API_KEY_MESSAGE: &str = "Error: ATOMICWORK_API_KEY environment variable not set. \
                                           Please add your API key to continue.";

/// Tool handler that executes tools against the Atomicwork API.
pub struct ToolHandler {
    api: Arc<dyn TicketApi>,
    config: Config,
}

impl ToolHandler {
    /// Create a new tool handler.
    pub fn new(api: Arc<dyn TicketApi>, config: Config) -> Self {
        Self { api, config }
    }

    /// Get available tool definitions.
    pub fn available_tools(&self) -> Vec<ToolDefinition> {
        tools::available_tools()
    }

    /// Execute a tool by name with arguments.
    pub async fn execute(&self, name: &str, arguments: Option<Value>) -> ToolCallResult {
        if !self.config.has_api_key() {
            tracing::warn!("Tool {} called without an API key", name);
            return ToolCallResult::text(MISSING_API_KEY_MESSAGE);
        }

        let arguments = arguments.unwrap_or(Value::Null);

        match name {
            LIST_MY_TICKETS => self.handle_list_my_tickets(arguments).await,
            GET_TICKET_DETAILS => self.handle_get_ticket_details(arguments).await,
            SEARCH_TICKETS => self.handle_search_tickets(arguments).await,
            LIST_ALL_REQUESTS => self.handle_list_all_requests(arguments).await,
            GET_TICKET_COMMENTS => self.handle_get_ticket_comments(arguments).await,
            _ => ToolCallResult::text(format!("Unknown tool: {}", name)),
        }
    }

    async fn handle_list_my_tickets(&self, arguments: Value) -> ToolCallResult {
        let params: ListMyTicketsParams = parse_params(arguments);
        let outcome = self.list_my_tickets(params).await;
        render("Error fetching tickets", outcome)
    }

    async fn handle_get_ticket_details(&self, arguments: Value) -> ToolCallResult {
        let params: TicketIdParams = parse_params(arguments);
        let Some(ticket_id) = non_empty(params.ticket_id) else {
            return missing_argument("ticket_id");
        };

        let outcome = self.api.send(ApiRequest::get(endpoints::ticket(&ticket_id))).await;
        render("Error fetching ticket details", outcome)
    }

    async fn handle_search_tickets(&self, arguments: Value) -> ToolCallResult {
        let params: SearchTicketsParams = parse_params(arguments);
        let Some(query) = non_empty(params.query) else {
            return missing_argument("query");
        };
        let assigned_to_me = params.assigned_to_me.unwrap_or(true);

        let outcome = self
            .api
            .send(ApiRequest::get(endpoints::search(&query, assigned_to_me)))
            .await;
        render("Error searching tickets", outcome)
    }

    async fn handle_list_all_requests(&self, arguments: Value) -> ToolCallResult {
        let params: ListAllRequestsParams = parse_params(arguments);
        let outcome = self.list_all_requests(params).await;
        render("Error fetching requests", outcome)
    }

    async fn handle_get_ticket_comments(&self, arguments: Value) -> ToolCallResult {
        let params: TicketIdParams = parse_params(arguments);
        let Some(ticket_id) = non_empty(params.ticket_id) else {
            return missing_argument("ticket_id");
        };

        let outcome = FallbackOutcome::run(
            self.api.as_ref(),
            ApiRequest::get(endpoints::workspace_notes(
                &self.config.workspace_id,
                &ticket_id,
            )),
            ApiRequest::get(endpoints::notes(&ticket_id)),
        )
        .await;

        match outcome.into_result().and_then(|v| pretty(&v).map_err(|e| e.to_string())) {
            Ok(text) => ToolCallResult::text(text),
            Err(message) => {
                ToolCallResult::text(format!("Error fetching ticket comments: {}", message))
            }
        }
    }

    async fn list_my_tickets(&self, params: ListMyTicketsParams) -> Result<TicketListing> {
        let mut filters = vec![FilterClause::assignee(self.config.user_id_numeric())];
        if let Some(status) = non_empty(params.status) {
            filters.push(FilterClause::status(&status));
        }

        let request = ApiRequest::post(
            endpoints::my_tickets(&self.config.workspace_id),
            serde_json::to_value(&filters)?,
        );
        let payload = self.api.send(request).await?;

        let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
        let listing = TicketListing::from_payload(&payload, limit, &self.config.portal_url());
        tracing::debug!("Normalized {} tickets", listing.total);
        Ok(listing)
    }

    async fn list_all_requests(&self, params: ListAllRequestsParams) -> Result<Value> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
        let requester_email = non_empty(params.requester_email);
        let per_page = endpoints::fetch_size(limit, requester_email.is_some());

        let filters: Vec<FilterClause> = non_empty(params.status)
            .map(|status| FilterClause::status(&status))
            .into_iter()
            .collect();

        let request = ApiRequest::post(
            endpoints::all_requests(&self.config.workspace_id, per_page),
            serde_json::to_value(&filters)?,
        );
        let mut payload = self.api.send(request).await?;

        if let Some(email) = requester_email {
            filter_by_requester(&mut payload, &email, limit);
        }
        Ok(payload)
    }
}

// =============================================================================
// Primary/fallback requests
// =============================================================================

/// Result of a primary request and, only if that failed, a fallback request.
#[derive(Debug)]
pub struct FallbackOutcome {
    pub primary: Result<Value>,
    pub fallback: Option<Result<Value>>,
}

impl FallbackOutcome {
    /// Send `primary`; send `fallback` only if `primary` failed.
    pub async fn run(api: &dyn TicketApi, primary: ApiRequest, fallback: ApiRequest) -> Self {
        let primary = api.send(primary).await;
        let fallback = match &primary {
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Primary request failed ({}), trying {}", e, fallback.endpoint);
                Some(api.send(fallback).await)
            }
        };

        Self { primary, fallback }
    }

    /// First successful payload, or both error messages joined.
    pub fn into_result(self) -> std::result::Result<Value, String> {
        match (self.primary, self.fallback) {
            (Ok(value), _) | (Err(_), Some(Ok(value))) => Ok(value),
            (Err(primary), Some(Err(fallback))) => Err(format!(
                "{}. Fallback also failed: {}",
                primary, fallback
            )),
            (Err(primary), None) => Err(primary.to_string()),
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a payload as pretty JSON, or the error behind `label`.
fn render<T: Serialize>(label: &str, outcome: Result<T>) -> ToolCallResult {
    match outcome.and_then(|value| pretty(&value)) {
        Ok(text) => ToolCallResult::text(text),
        Err(e) => {
            tracing::warn!("{}: {}", label, e);
            ToolCallResult::text(format!("{}: {}", label, e))
        }
    }
}

fn missing_argument(name: &'static str) -> ToolCallResult {
    ToolCallResult::text(format!("Error: {}", Error::MissingArgument(name)))
}

// =============================================================================
// Parameters
// =============================================================================

/// Arguments arrive as arbitrary JSON; anything unusable falls back to defaults.
fn parse_params<T: DeserializeOwned + Default>(arguments: Value) -> T {
    serde_json::from_value(arguments).unwrap_or_default()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parameters for list_my_tickets tool.
#[derive(Debug, Default, Deserialize)]
struct ListMyTicketsParams {
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_limit")]
    limit: Option<usize>,
}

/// Parameters for get_ticket_details and get_ticket_comments tools.
#[derive(Debug, Default, Deserialize)]
struct TicketIdParams {
    #[serde(default, deserialize_with = "lenient_string")]
    ticket_id: Option<String>,
}

/// Parameters for search_tickets tool.
#[derive(Debug, Default, Deserialize)]
struct SearchTicketsParams {
    #[serde(default, deserialize_with = "lenient_string")]
    query: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    assigned_to_me: Option<bool>,
}

/// Parameters for list_all_requests tool.
#[derive(Debug, Default, Deserialize)]
struct ListAllRequestsParams {
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_limit")]
    limit: Option<usize>,
    #[serde(default, deserialize_with = "lenient_string")]
    requester_email: Option<String>,
}

/// Strings as-is, numbers stringified (ticket ids are often numeric).
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Non-negative counts; fractions are truncated, negatives clamp to zero.
fn lenient_limit<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .map(|v| usize::try_from(v).unwrap_or(usize::MAX))
            .or_else(|| n.as_f64().map(|f| if f <= 0.0 { 0 } else { f as usize })),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Booleans, or their string spelling. An explicit `null` reads as false.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => s.trim().parse().ok(),
        Value::Null => Some(false),
        _ => None,
    })
}
