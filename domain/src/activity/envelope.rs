//! Activity envelope types and the reply-matching rule.

use serde::Deserialize;

/// Activity type carrying conversational text.
pub const MESSAGE_ACTIVITY: &str = "message";

/// One decoded stream envelope.
///
/// `activities` is absent on some frames (watermark-only updates); those
/// decode to an empty set rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivitySet {
    #[serde(default)]
    pub activities: Option<Vec<Activity>>,
    #[serde(default)]
    pub watermark: Option<String>,
}

/// A single activity inside an envelope. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub from: Option<ChannelAccount>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Sender of an activity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelAccount {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Role of the account that produced an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderRole {
    /// Our own outbound message echoed back on the stream.
    User,
    Bot,
    /// Role missing or empty.
    Unknown,
    Other(String),
}

impl SenderRole {
    pub fn from_wire(role: Option<&str>) -> Self {
        match role {
            None | Some("") => SenderRole::Unknown,
            Some("user") => SenderRole::User,
            Some("bot") => SenderRole::Bot,
            Some(other) => SenderRole::Other(other.to_string()),
        }
    }

    /// Whether the activity is this process's own echo.
    ///
    /// Only an explicit `user` role counts as self. `Unknown` is deliberately
    /// *not* self, so an envelope without role metadata is accepted as a bot
    /// reply.
    pub fn is_self(&self) -> bool {
        matches!(self, SenderRole::User)
    }
}

impl Activity {
    pub fn is_message(&self) -> bool {
        self.kind.as_deref() == Some(MESSAGE_ACTIVITY)
    }

    pub fn sender_role(&self) -> SenderRole {
        SenderRole::from_wire(self.from.as_ref().and_then(|f| f.role.as_deref()))
    }

    /// A message from anyone other than ourselves.
    pub fn is_reply(&self) -> bool {
        self.is_message() && !self.sender_role().is_self()
    }
}

impl ActivitySet {
    pub fn is_empty(&self) -> bool {
        self.activities.as_ref().is_none_or(|a| a.is_empty())
    }

    /// Text of the first non-self message activity, if any.
    ///
    /// Typing indicators, events and echoes are skipped. A matching
    /// activity without text yields an empty string.
    pub fn first_reply(&self) -> Option<String> {
        self.activities
            .as_deref()?
            .iter()
            .find(|activity| activity.is_reply())
            .map(|activity| activity.text.clone().unwrap_or_default())
    }
}
