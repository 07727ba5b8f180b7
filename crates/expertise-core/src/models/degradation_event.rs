use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A degradation event when a query signal falls back to an empty result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

impl DegradationEvent {
    pub fn new(component: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            failure: failure.into(),
            fallback_used: "empty result".to_string(),
            timestamp: Utc::now(),
        }
    }
}
