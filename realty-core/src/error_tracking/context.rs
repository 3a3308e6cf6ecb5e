//! Context recorded alongside tracked errors

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where and for whom an error happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorContext {
    pub url: String,
    pub user_agent: String,
    /// Unix epoch milliseconds
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Map<String, Value>>,
}

/// Caller-supplied context; every field set here overrides the ambient value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialErrorContext {
    pub url: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: Option<i64>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub additional_data: Option<Map<String, Value>>,
}

impl PartialErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn timestamp(mut self, millis: i64) -> Self {
        self.timestamp = Some(millis);
        self
    }

    pub fn user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Add one entry to `additional_data`
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Values filled in when the caller does not supply them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmbientContext {
    pub url: String,
    pub user_agent: String,
}

impl AmbientContext {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Build a full context, stamping the current time
    pub fn materialize(&self, partial: PartialErrorContext) -> ErrorContext {
        ErrorContext {
            url: partial.url.unwrap_or_else(|| self.url.clone()),
            user_agent: partial.user_agent.unwrap_or_else(|| self.user_agent.clone()),
            timestamp: partial
                .timestamp
                .unwrap_or_else(|| Utc::now().timestamp_millis()),
            user_id: partial.user_id,
            session_id: partial.session_id,
            additional_data: partial.additional_data,
        }
    }
}
