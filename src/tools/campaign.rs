//! Campaign tools.
//!
//! `start_campaign_creation` hands the calling agent a checklist of what to
//! collect from the user; `create_campaign` takes the collected answers. No
//! state is kept between the two calls, the agent carries the conversation.
//! Creation is simulated: nothing is persisted.

use serde_json::json;

use super::{Arguments, ToolDescriptor, ToolResult};

pub const START_NAME: &str = "start_campaign_creation";
pub const CREATE_NAME: &str = "create_campaign";

const START_PROMPT: &str = "\
🚀 Let's create a new campaign! I need some information from you:

1. **Campaign Name**: What would you like to call this campaign?
2. **Client Name**: Which client is this campaign for?
3. **Description**: Can you describe what this campaign is about?

Optionally, you can also provide:
- **Budget**: What's the budget for this campaign?
- **Channels**: Which marketing channels do you want to use? (e.g., email, social, google-ads, facebook-ads)

Once you provide these details, I'll create the campaign for you!";

pub fn start_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: START_NAME,
        description: "Start the interactive campaign creation process - will ask user for required information step by step",
        input_schema: json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
    }
}

pub fn create_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: CREATE_NAME,
        description: "Create a new marketing campaign with all required information provided",
        input_schema: json!({
            "type": "object",
            "properties": {
                "campaign_name": {
                    "type": "string",
                    "description": "Name of the campaign (required)"
                },
                "description": {
                    "type": "string",
                    "description": "Campaign description (required)"
                },
                "client_name": {
                    "type": "string",
                    "description": "Client name (required)"
                },
                "budget": {
                    "type": "number",
                    "description": "Campaign budget (optional)"
                },
                "channels": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Marketing channels (e.g., email, social, ads)"
                }
            },
            "required": ["campaign_name", "description", "client_name"]
        }),
    }
}

/// Arguments are ignored.
pub fn start() -> ToolResult {
    ToolResult::text(START_PROMPT)
}

/// A required campaign field the caller left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    CampaignName,
    Description,
    ClientName,
}

impl MissingField {
    /// Error text. It doubles as the question the agent should put to the
    /// user, so each one names the field and asks for it.
    pub fn reprompt(self) -> &'static str {
        match self {
            MissingField::CampaignName => {
                "❌ Campaign name is required. Please ask the user: What would you like to name this campaign?"
            }
            MissingField::Description => {
                "❌ Campaign description is required. Please ask the user: Can you describe what this campaign is about?"
            }
            MissingField::ClientName => {
                "❌ Client name is required. Please ask the user: Which client is this campaign for?"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRequest {
    pub campaign_name: String,
    pub description: String,
    pub client_name: String,
    pub budget: Option<f64>,
    pub channels: Vec<String>,
}

impl CampaignRequest {
    /// Required fields are checked in a fixed order (name, description,
    /// client) and the first one missing is reported. Empty strings count as
    /// missing.
    pub fn decode(args: &Arguments) -> Result<Self, MissingField> {
        let required = |key: &str, missing: MissingField| match args.string(key) {
            "" => Err(missing),
            value => Ok(value.to_string()),
        };

        let campaign_name = required("campaign_name", MissingField::CampaignName)?;
        let description = required("description", MissingField::Description)?;
        let client_name = required("client_name", MissingField::ClientName)?;

        Ok(Self {
            campaign_name,
            description,
            client_name,
            budget: args.number("budget"),
            channels: args.strings("channels"),
        })
    }

    pub fn summary(&self) -> String {
        let mut text = format!(
            "Campaign Created Successfully! 🎉\n\nCampaign Details:\n• Name: {}\n• Client: {}\n• Description: {}",
            self.campaign_name, self.client_name, self.description
        );
        if let Some(budget) = self.budget {
            text.push_str(&format!("\n• Budget: ${budget:.2}"));
        }
        if !self.channels.is_empty() {
            text.push_str(&format!("\n• Channels: {}", self.channels.join(", ")));
        }
        text.push_str("\n\n✅ Campaign is ready for launch!");
        text
    }
}

pub fn create(args: &Arguments) -> ToolResult {
    match CampaignRequest::decode(args) {
        Ok(request) => {
            tracing::info!(campaign = %request.campaign_name, client = %request.client_name, "campaign created");
            ToolResult::text(request.summary())
        }
        Err(missing) => ToolResult::error(missing.reprompt()),
    }
}
