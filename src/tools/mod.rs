//! Tools Module
//!
//! This module contains all MCP tool implementations. The set of tools is
//! closed: [`Tool`] has one variant per tool, each tool module provides its
//! descriptor and handler, and [`Toolbox`] routes a `tools/call` name to the
//! matching handler.

pub mod args;
pub mod campaign;
pub mod create_list;
pub mod greeting;
pub mod map_client;

use serde::Serialize;
use serde_json::Value;

pub use args::Arguments;
use create_list::CreateListTool;

/// MCP tool definition, serialized as an entry of the `tools/list` result.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    /// Unique tool identifier
    pub name: &'static str,
    /// Human-readable description of what the tool does
    pub description: &'static str,
    /// JSON Schema describing the arguments. Advisory only: it is published
    /// to the client but never enforced against `tools/call` arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One `{type: "text", text}` content entry.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// Outcome of a tool invocation.
///
/// A failed tool is still a successful JSON-RPC call: the failure travels in
/// `isError` and the text explains it to the caller.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self::build(text.into(), false)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::build(text.into(), true)
    }

    fn build(text: String, is_error: bool) -> Self {
        Self {
            content: vec![TextContent { kind: "text", text }],
            is_error,
        }
    }

    /// Text of the single content entry.
    pub fn text_content(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// The tools this server offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Greeting,
    StartCampaignCreation,
    CreateCampaign,
    CreateList,
}

impl Tool {
    /// Every tool, in `tools/list` order.
    pub const ALL: [Tool; 4] = [
        Tool::Greeting,
        Tool::StartCampaignCreation,
        Tool::CreateCampaign,
        Tool::CreateList,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Greeting => greeting::NAME,
            Tool::StartCampaignCreation => campaign::START_NAME,
            Tool::CreateCampaign => campaign::CREATE_NAME,
            Tool::CreateList => create_list::NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn descriptor(self) -> ToolDescriptor {
        match self {
            Tool::Greeting => greeting::descriptor(),
            Tool::StartCampaignCreation => campaign::start_descriptor(),
            Tool::CreateCampaign => campaign::create_descriptor(),
            Tool::CreateList => create_list::descriptor(),
        }
    }
}

/// Tool catalogue plus the state the handlers need.
///
/// Built once at startup and read-only afterwards.
pub struct Toolbox {
    catalogue: Vec<ToolDescriptor>,
    create_list: CreateListTool,
}

impl Toolbox {
    pub fn new(create_list: CreateListTool) -> Self {
        Self {
            catalogue: Tool::ALL.into_iter().map(Tool::descriptor).collect(),
            create_list,
        }
    }

    /// Descriptors for `tools/list`.
    pub fn catalogue(&self) -> &[ToolDescriptor] {
        &self.catalogue
    }

    /// Run the tool registered under `name`.
    ///
    /// Unknown names are a tool-level error, not a protocol error.
    pub async fn call(&self, name: &str, args: &Arguments) -> ToolResult {
        match Tool::from_name(name) {
            Some(Tool::Greeting) => greeting::call(args),
            Some(Tool::StartCampaignCreation) => campaign::start(),
            Some(Tool::CreateCampaign) => campaign::create(args),
            Some(Tool::CreateList) => self.create_list.call(args).await,
            None => ToolResult::error(format!("Unknown tool: {name}")),
        }
    }
}
