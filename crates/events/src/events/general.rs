use serde::{Deserialize, Serialize};

/// General events not tied to a single domain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    /// Generic warning message with optional context
    Warning {
        message: String,
        context: Option<String>,
    },

    /// Effective configuration after file and environment merge
    ConfigurationLoaded {
        origin: String,
        repository: String,
        policy: String,
        provider: String,
        mirrors: usize,
        max_concurrent_tasks: usize,
    },
}

impl GeneralEvent {
    /// Create a warning event with context
    pub fn warning_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
            context: Some(context.into()),
        }
    }
}
