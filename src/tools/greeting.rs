//! Greeting Tool Implementation
//!
//! The smallest tool on the server: greets the caller by name and is handy
//! for checking that a client can reach the server at all.

use serde_json::json;

use super::{Arguments, ToolDescriptor, ToolResult};

pub const NAME: &str = "rave";

/// Name used when the caller supplies none.
pub const DEFAULT_NAME: &str = "World";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: NAME,
        description: "Says hello from Rave MCP server",
        input_schema: json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name to greet (optional, defaults to 'World')"
                }
            }
        }),
    }
}

/// Typed view of the greeting arguments.
#[derive(Debug, PartialEq)]
pub struct GreetingRequest<'a> {
    pub name: &'a str,
}

impl<'a> GreetingRequest<'a> {
    /// A missing or non-string `name` falls back to [`DEFAULT_NAME`].
    /// An explicit empty string is kept as given.
    pub fn decode(args: &'a Arguments) -> Self {
        let name = args
            .raw("name")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_NAME);
        Self { name }
    }
}

pub fn call(args: &Arguments) -> ToolResult {
    let request = GreetingRequest::decode(args);
    ToolResult::text(format!("Hello {}! This is Rave MCP Server 🎉", request.name))
}
