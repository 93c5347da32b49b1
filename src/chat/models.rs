//! Request and result types for the chat pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Engine tag for answers produced by the template composer
pub const TEMPLATE_ENGINE: &str = "template-fallback";

/// Engine tag for an answer produced by a named external backend
pub fn backend_engine_tag(name: &str) -> String {
    format!("external-backend:{}", name)
}

/// Stylistic switch applied uniformly across generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMode {
    #[default]
    Serious,
    Joking,
}

impl ToneMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneMode::Serious => "serious",
            ToneMode::Joking => "joking",
        }
    }

    /// Pick the phrasing for this tone
    pub fn pick<T>(&self, serious: T, joking: T) -> T {
        match self {
            ToneMode::Serious => serious,
            ToneMode::Joking => joking,
        }
    }
}

impl fmt::Display for ToneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToneMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serious" => Ok(ToneMode::Serious),
            "joking" => Ok(ToneMode::Joking),
            other => Err(format!("unknown tone mode: {}", other)),
        }
    }
}

/// Final answer returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResult {
    pub response_text: String,
    pub suggestions: Vec<String>,
    pub engine_used: String,
}

impl ChatResult {
    pub fn is_fallback(&self) -> bool {
        self.engine_used == TEMPLATE_ENGINE
    }
}

/// Pipeline stages, in the order a request passes through them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStage {
    Analyzing,
    BackendAttempt,
    Success,
    Fallback,
    Suggesting,
    Done,
}
