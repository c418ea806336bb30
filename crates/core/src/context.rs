use serde::{Deserialize, Serialize};

/// The gaming context (thread, group or match) the player is currently in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamingContext {
    pub identifier: String,
    /// Number of players in the context, 0 when unknown.
    #[serde(default)]
    pub size: u32,
}

impl GamingContext {
    pub fn new(identifier: impl Into<String>, size: u32) -> Self {
        Self {
            identifier: identifier.into(),
            size,
        }
    }
}
