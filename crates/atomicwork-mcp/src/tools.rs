//! MCP tool definitions.

use serde_json::json;

use crate::protocol::ToolDefinition;

pub const LIST_MY_TICKETS: &str = "list_my_tickets";
pub const GET_TICKET_DETAILS: &str = "get_ticket_details";
pub const SEARCH_TICKETS: &str = "search_tickets";
pub const LIST_ALL_REQUESTS: &str = "list_all_requests";
pub const GET_TICKET_COMMENTS: &str = "get_ticket_comments";

/// The fixed tool catalog returned by `tools/list`.
pub fn available_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: LIST_MY_TICKETS.to_string(),
            description: "List all tickets assigned to you in Atomicwork".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "status": {
                        "type": "string",
                        "description": "Filter by status (open, in_progress, resolved, closed)",
                        "enum": ["open", "in_progress", "resolved", "closed"]
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of tickets to return (default: 50)",
                        "default": 50
                    }
                }
            }),
        },
        ToolDefinition {
            name: GET_TICKET_DETAILS.to_string(),
            description: "Get detailed information about a specific ticket".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "ticket_id": {
                        "type": "string",
                        "description": "The ID of the ticket to retrieve"
                    }
                },
                "required": ["ticket_id"]
            }),
        },
        ToolDefinition {
            name: SEARCH_TICKETS.to_string(),
            description: "Search for tickets by keyword or criteria".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query string"
                    },
                    "assigned_to_me": {
                        "type": "boolean",
                        "description": "Only show tickets assigned to me",
                        "default": true
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: LIST_ALL_REQUESTS.to_string(),
            description: "List all requests/tickets in the workspace (not just assigned to you). \
                          Supports filtering by requester email."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "status": {
                        "type": "string",
                        "description": "Filter by status"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of requests to return",
                        "default": 50
                    },
                    "requester_email": {
                        "type": "string",
                        "description": "Filter by requester email address (e.g., 'user@company.com')"
                    }
                }
            }),
        },
        ToolDefinition {
            name: GET_TICKET_COMMENTS.to_string(),
            description: "Get all comments/notes on a specific ticket".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "ticket_id": {
                        "type": "string",
                        "description": "The ID or display_id of the ticket (e.g., 'ITREQ-1234' or '567890')"
                    }
                },
                "required": ["ticket_id"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names() {
        let names: Vec<String> = available_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                LIST_MY_TICKETS,
                GET_TICKET_DETAILS,
                SEARCH_TICKETS,
                LIST_ALL_REQUESTS,
                GET_TICKET_COMMENTS
            ]
        );
    }

    #[test]
    fn test_required_fields() {
        let tools = available_tools();
        let required = |name: &str| {
            tools
                .iter()
                .find(|t| t.name == name)
                .and_then(|t| t.input_schema.get("required").cloned())
        };

        assert_eq!(required(GET_TICKET_DETAILS), Some(json!(["ticket_id"])));
        assert_eq!(required(GET_TICKET_COMMENTS), Some(json!(["ticket_id"])));
        assert_eq!(required(SEARCH_TICKETS), Some(json!(["query"])));
        assert_eq!(required(LIST_MY_TICKETS), None);
        assert_eq!(required(LIST_ALL_REQUESTS), None);
    }

    #[test]
    fn test_schema_defaults() {
        let tools = available_tools();
        let list_mine = &tools[0].input_schema["properties"];
        assert_eq!(list_mine["limit"]["default"], 50);
        assert_eq!(
            list_mine["status"]["enum"],
            json!(["open", "in_progress", "resolved", "closed"])
        );

        let search = &tools[2].input_schema["properties"];
        assert_eq!(search["assigned_to_me"]["default"], true);
    }
}
