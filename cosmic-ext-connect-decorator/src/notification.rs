//! Notification Boundary Types
//!
//! In-memory structures exchanged with the embedding system. The inbound
//! [`NotificationEvent`] carries the raw text fields mirrored from the chat
//! app; the outbound [`DecoratedConversation`] carries the reconstructed
//! conversation ready for presentation.
//!
//! ## Field Semantics
//!
//! | Field      | Typical content                                   |
//! |------------|---------------------------------------------------|
//! | `ticker`   | `"Sender: message"`, may carry trailing spaces    |
//! | `title`    | Contact name, group name or service account name  |
//! | `summary`  | Body text, possibly prefixed with `[n]` unread    |
//!
//! All types serialize as camelCase JSON so they can be exchanged as
//! JSON lines by the command-line host.
//!
//! ## Example
//!
//! ```rust
//! use cosmic_ext_connect_decorator::notification::NotificationEvent;
//!
//! let event: NotificationEvent = serde_json::from_str(r#"{
//!     "profile": 0,
//!     "key": "0|com.tencent.mm|42|null|10123",
//!     "originalId": 42,
//!     "title": "Oasis",
//!     "ticker": "Oasis: Hello",
//!     "summary": "Hello",
//!     "timestampMs": 1700000000000
//! }"#).unwrap();
//!
//! assert_eq!(event.title.as_deref(), Some("Oasis"));
//! assert!(event.rich_payload.is_none());
//! assert!(event.retained.is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::conversation::{ConversationId, ConversationKind, Person, ProfileId};
use crate::message::Message;

/// Get current timestamp in milliseconds since UNIX epoch
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Opaque action handle (reply or mark-read), passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionHandle(pub serde_json::Value);

/// One line of the rich conversation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadLine {
    /// Line text, usually "sender: body" in group chats
    pub text: String,

    /// Explicit author, overriding the inline sender split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Per-line timestamp (ms), if the source app supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
}

impl PayloadLine {
    /// Plain line without author or timestamp
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: None,
            timestamp_ms: None,
        }
    }
}

/// Structured multi-line conversation extension
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichPayload {
    /// Message lines in display order
    #[serde(default)]
    pub lines: Vec<PayloadLine>,

    /// Timestamp of the latest line (ms); 0 when unknown
    #[serde(default)]
    pub latest_timestamp_ms: i64,

    /// Participant names, if supplied
    #[serde(default)]
    pub participants: Vec<String>,

    /// Pending reply action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_action: Option<ActionHandle>,

    /// Pending mark-read action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_action: Option<ActionHandle>,
}

/// A previously posted notification for the same original key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetainedNotification {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub timestamp_ms: i64,
}

/// Inbound notification event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    /// Profile (user) the notification was posted for
    #[serde(default)]
    pub profile: ProfileId,

    /// Original notification key
    #[serde(default)]
    pub key: String,

    /// Notification id as posted; recycled by older app versions
    #[serde(default)]
    pub original_id: ConversationId,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub ticker: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    /// Post time (ms)
    #[serde(default = "current_timestamp")]
    pub timestamp_ms: i64,

    /// Opaque large icon reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_payload: Option<RichPayload>,

    /// Retained notifications of the same original key, in delivery order
    ///
    /// Like the source archive, this includes the current notification. It is
    /// only scanned when there is no rich payload.
    #[serde(default)]
    pub retained: Vec<RetainedNotification>,

    /// Thread key, if already resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_key: Option<String>,

    /// Replies already sent by the user, newest first
    #[serde(default)]
    pub remote_input_history: Vec<String>,
}

impl NotificationEvent {
    /// Create an event with the three text fields set
    ///
    /// The retained list starts with the event itself.
    pub fn new(title: &str, ticker: &str, summary: &str) -> Self {
        let timestamp_ms = current_timestamp();
        Self {
            profile: 0,
            key: String::new(),
            original_id: 0,
            title: Some(title.to_string()),
            ticker: Some(ticker.to_string()),
            summary: Some(summary.to_string()),
            timestamp_ms,
            icon: None,
            rich_payload: None,
            retained: vec![RetainedNotification {
                title: Some(title.to_string()),
                summary: Some(summary.to_string()),
                ticker: Some(ticker.to_string()),
                timestamp_ms,
            }],
            thread_key: None,
            remote_input_history: Vec::new(),
        }
    }

    /// Attach a rich payload built from plain lines
    pub fn with_payload_lines(mut self, lines: &[&str]) -> Self {
        self.rich_payload = Some(RichPayload {
            lines: lines.iter().map(|line| PayloadLine::new(*line)).collect(),
            ..Default::default()
        });
        self
    }
}

/// Presentation group a conversation is sorted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationGroup {
    Direct,
    Group,
    Bot,
}

/// Outbound, reconstructed conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedConversation {
    pub profile: ProfileId,
    pub conversation_id: ConversationId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_key: Option<String>,

    pub kind: ConversationKind,

    /// Attributed messages, oldest first
    pub messages: Vec<Message>,

    /// Title shown for group and bot conversations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_title: Option<String>,

    /// The peer for non-group conversations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_sender: Option<Person>,

    pub unread_count: u32,
    pub timestamp_ms: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_action: Option<ActionHandle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_action: Option<ActionHandle>,

    /// Canned answers offered with the reply action
    #[serde(default)]
    pub reply_choices: Vec<String>,

    pub group: ConversationGroup,
}

/// Result of decorating one notification
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    /// A chat conversation was reconstructed
    Conversation(Box<DecoratedConversation>),
    /// Not a conversation (no ticker); leave the notification untouched
    NotConversation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_defaults() {
        let event: NotificationEvent = serde_json::from_str(r#"{"title": "Oasis"}"#).unwrap();
        assert_eq!(event.profile, 0);
        assert!(event.ticker.is_none());
        assert!(event.summary.is_none());
        assert!(event.timestamp_ms > 0);
        assert!(event.remote_input_history.is_empty());
    }

    #[test]
    fn test_new_event_is_retained() {
        let event = NotificationEvent::new("Oasis", "Oasis: Hello", "Hello");
        assert_eq!(event.retained.len(), 1);
        assert_eq!(event.retained[0].summary.as_deref(), Some("Hello"));
        assert_eq!(event.retained[0].timestamp_ms, event.timestamp_ms);
        assert!(event.rich_payload.is_none());
    }

    #[test]
    fn test_payload_parsing() {
        let json = r#"{
            "lines": [
                {"text": "Bob: Hi"},
                {"text": "Alice: Hey", "author": "Alice", "timestampMs": 1700000000123}
            ],
            "latestTimestampMs": 1700000000123,
            "replyAction": {"intent": 17, "resultKey": "input"}
        }"#;
        let payload: RichPayload = serde_json::from_str(json).unwrap();

        assert_eq!(payload.lines.len(), 2);
        assert_eq!(payload.lines[1].author.as_deref(), Some("Alice"));
        assert_eq!(payload.lines[1].timestamp_ms, Some(1700000000123));
        assert!(payload.read_action.is_none());
        assert!(payload.participants.is_empty());
    }

    #[test]
    fn test_action_handle_is_passed_through() {
        let raw = serde_json::json!({"intent": 17, "extras": {"k": [1, 2, 3]}});
        let handle: ActionHandle = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&handle).unwrap(), raw);
    }

    #[test]
    fn test_decorated_conversation_serialization() {
        let decorated = DecoratedConversation {
            profile: 0,
            conversation_id: 42,
            thread_key: None,
            kind: ConversationKind::BotOrService,
            messages: Vec::new(),
            conversation_title: Some("FedEx".to_string()),
            conversation_sender: None,
            unread_count: 2,
            timestamp_ms: 1,
            reply_action: None,
            read_action: None,
            reply_choices: Vec::new(),
            group: ConversationGroup::Bot,
        };

        let value = serde_json::to_value(&decorated).unwrap();
        assert_eq!(value["conversationId"], 42);
        assert_eq!(value["kind"], "bot_or_service");
        assert_eq!(value["group"], "bot");
        assert_eq!(value["conversationTitle"], "FedEx");
        assert!(value.get("replyAction").is_none());
    }
}
