use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single call to the hosted text-generation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: String,
    /// JSON schema (Gemini `responseSchema` dialect) the output must follow.
    pub response_schema: serde_json::Value,
    pub temperature: f32,
}

/// Which field the user typed when asking for a product identification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationMode {
    /// Free-text description in, HS code out.
    #[default]
    Description,
    /// HS/NCM code in, technical description out.
    Code,
}

impl fmt::Display for IdentificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Description => f.write_str("description"),
            Self::Code => f.write_str("code"),
        }
    }
}

impl FromStr for IdentificationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "description" | "desc" => Ok(Self::Description),
            "code" | "ncm" | "hs" => Ok(Self::Code),
            other => Err(format!("unknown identification mode: {other}")),
        }
    }
}
