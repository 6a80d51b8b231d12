//! Direct Line wire types
//!
//! Outbound user activities and the token response. Inbound activity sets
//! are decoded by the domain layer.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CHANNEL_ID: &str = "directline";

/// Identity and channel metadata stamped on every outbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingProfile {
    pub user_id: String,
    pub user_name: String,
    pub locale: String,
    /// Forwarded verbatim as `channelData`.
    pub channel_data: Map<String, Value>,
}

impl Default for RoutingProfile {
    fn default() -> Self {
        Self {
            user_id: "tester".to_string(),
            user_name: "tester".to_string(),
            locale: "es-ES".to_string(),
            channel_data: Map::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: Option<String>,
    #[serde(rename = "conversationId", default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivitySender {
    pub id: String,
    pub name: String,
    pub role: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationRef {
    pub id: String,
}

/// A user message posted to `conversations/{id}/activities`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundActivity {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub from: ActivitySender,
    pub channel_id: &'static str,
    pub channel_data: Value,
    pub locale: String,
    pub text: String,
    pub conversation: ConversationRef,
    pub timestamp: String,
}

impl OutboundActivity {
    pub fn message(
        profile: &RoutingProfile,
        conversation_id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: "message",
            from: ActivitySender {
                id: profile.user_id.clone(),
                name: profile.user_name.clone(),
                role: "user",
            },
            channel_id: CHANNEL_ID,
            channel_data: Value::Object(profile.channel_data.clone()),
            locale: profile.locale.clone(),
            text: text.to_string(),
            conversation: ConversationRef {
                id: conversation_id.to_string(),
            },
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
