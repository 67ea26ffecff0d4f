//! Schema contract shared by the structuring and verification stages
//!
//! The template below is not enforced as a Rust type on the model side.
//! It is embedded in the prompt so the model knows which shape to emit,
//! and it documents what the verification stage is entitled to assume.

use serde::{Deserialize, Serialize};

/// Machine-readable template embedded in every structuring prompt
pub const SCHEMA_TEMPLATE: &str = r#"{
  "action": "CREATE_APP | UPDATE_LOGIC | ...",
  "features": ["USER_AUTH", "PAYMENT", "DATABASE", ...],
  "constraints": ["LOW_COST", "HIGH_SPEED", "INNOVATION_MODE"],
  "priority": "LOW | MEDIUM | HIGH"
}"#;

/// Constraint the model adds when it detects innovative intent
pub const INNOVATION_MODE: &str = "INNOVATION_MODE";

/// Render the structuring prompt for a raw user command
pub fn render_prompt(command: &str) -> String {
    format!(
        "You are the P module of MooDream OS. Convert the user's ambiguous command \
         into JSON that matches the schema below exactly. If the user's intent is \
         innovative, add '{innovation}' to the constraints.\n\
         SCHEMA: {schema}\n\
         USER_COMMAND: \"{command}\"\n\
         JSON_OUTPUT_ONLY:",
        innovation = INNOVATION_MODE,
        schema = SCHEMA_TEMPLATE,
        command = command,
    )
}

/// Priority level requested for an action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Case-insensitive lookup; unknown levels yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }
}

/// Schema-shaped command produced by the structuring stage
///
/// `action` is an open enumeration, so it stays a string. `raw` is the exact
/// JSON text handed to the verification stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredCommand {
    pub action: String,
    pub features: Vec<String>,
    pub constraints: Vec<String>,
    pub priority: Option<Priority>,
    pub raw: String,
}

impl StructuredCommand {
    pub fn has_constraint(&self, constraint: &str) -> bool {
        self.constraints.iter().any(|c| c == constraint)
    }
}
