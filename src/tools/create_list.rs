//! Physician map tool (`create_list`).
//!
//! Gated by the shared API key, then forwards to the map endpoint through
//! [`MapClient`].

use serde_json::json;

use super::map_client::{DEFAULT_CLUSTERS, DEFAULT_RADIUS, MapClient, MapRequest};
use super::{Arguments, ToolDescriptor, ToolResult};
use crate::core::config::ApiKeyGate;

pub const NAME: &str = "create_list";

const INVALID_KEY: &str =
    "❌ Invalid API key. Please contact your administrator to get a valid API key for Rave services.";
const MISSING_COUNT: &str =
    "❌ Please specify the number of physicians to display. Example: 'create list with 1000 candidates'";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: NAME,
        description: "Create a physician distribution map showing the specified number of physicians in a geographic area",
        input_schema: json!({
            "type": "object",
            "properties": {
                "count": {
                    "type": "integer",
                    "description": "Number of physicians to display (e.g., 1000)",
                    "minimum": 10,
                    "maximum": 10000
                },
                "radius": {
                    "type": "integer",
                    "description": "Radius in miles (optional, defaults to 50)",
                    "minimum": 5,
                    "maximum": 200
                },
                "lat": {
                    "type": "number",
                    "description": "Center latitude (optional, defaults to San Antonio)"
                },
                "lon": {
                    "type": "number",
                    "description": "Center longitude (optional, defaults to San Antonio)"
                },
                "clusters": {
                    "type": "integer",
                    "description": "Maximum number of clusters (optional, defaults to 50)",
                    "minimum": 1,
                    "maximum": 100
                }
            },
            "required": ["count"]
        }),
    }
}

impl MapRequest {
    /// Decode `create_list` arguments. `None` when `count` is absent or not
    /// positive.
    ///
    /// `radius` and `clusters` go through [`Arguments::integer_or`], so an
    /// explicit `0` means "use the default".
    pub fn decode(args: &Arguments) -> Option<Self> {
        let points = args.integer("count");
        if points <= 0 {
            return None;
        }
        Some(Self {
            points,
            radius: args.integer_or("radius", DEFAULT_RADIUS),
            clusters: args.integer_or("clusters", DEFAULT_CLUSTERS),
            lat: args.number("lat"),
            lon: args.number("lon"),
        })
    }
}

/// Handler for `create_list`, with its key and client fixed at startup.
pub struct CreateListTool {
    gate: ApiKeyGate,
    api_key: Option<String>,
    client: MapClient,
}

impl CreateListTool {
    pub fn new(gate: ApiKeyGate, api_key: Option<String>, client: MapClient) -> Self {
        Self {
            gate,
            api_key,
            client,
        }
    }

    /// The key check runs before anything else; a rejected key never
    /// reaches argument decoding or the network.
    pub async fn call(&self, args: &Arguments) -> ToolResult {
        if !self.gate.authorizes(self.api_key.as_deref()) {
            tracing::warn!("create_list rejected: invalid API key");
            return ToolResult::error(INVALID_KEY);
        }

        let Some(request) = MapRequest::decode(args) else {
            return ToolResult::error(MISSING_COUNT);
        };

        match self.client.generate(&request, self.api_key.as_deref()).await {
            Ok(summary) => ToolResult::text(summary.to_string()),
            Err(e) => ToolResult::error(format!("❌ {e}")),
        }
    }
}
