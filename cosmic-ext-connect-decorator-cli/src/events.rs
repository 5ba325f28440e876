//! Inbound JSON-lines events

use anyhow::{Context, Result};
use cosmic_ext_connect_decorator::{ConversationId, NotificationEvent, ProfileId};
use serde::{Deserialize, Serialize};

/// One line of input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundEvent {
    /// A posted or updated notification
    Notification(NotificationEvent),

    /// Asynchronously resolved thread key of a conversation
    #[serde(rename_all = "camelCase")]
    ThreadKey {
        #[serde(default)]
        profile: ProfileId,
        conversation_id: ConversationId,
        thread_key: String,
    },

    /// The source app was installed, updated or removed
    PackageChanged {
        #[serde(default)]
        version: Option<u32>,
    },
}

/// Parse one input line; blank lines yield `None`
pub fn parse_event_line(line: &str) -> Result<Option<InboundEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let event = serde_json::from_str(line).context("Failed to parse event")?;
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notification() {
        let line = r#"{"type": "notification", "title": "Oasis", "ticker": "Oasis: Hello", "summary": "Hello", "originalId": 7}"#;
        let Some(InboundEvent::Notification(event)) = parse_event_line(line).unwrap() else {
            panic!("expected a notification");
        };
        assert_eq!(event.title.as_deref(), Some("Oasis"));
        assert_eq!(event.original_id, 7);
    }

    #[test]
    fn test_parse_thread_key() {
        let line = r#"{"type": "threadKey", "conversationId": -42, "threadKey": "1@chatroom"}"#;
        assert_eq!(
            parse_event_line(line).unwrap(),
            Some(InboundEvent::ThreadKey {
                profile: 0,
                conversation_id: -42,
                thread_key: "1@chatroom".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_package_changed() {
        assert_eq!(
            parse_event_line(r#"{"type": "packageChanged", "version": 1360}"#).unwrap(),
            Some(InboundEvent::PackageChanged {
                version: Some(1360)
            })
        );
        assert_eq!(
            parse_event_line(r#"{"type": "packageChanged"}"#).unwrap(),
            Some(InboundEvent::PackageChanged { version: None })
        );
    }

    #[test]
    fn test_blank_and_invalid_lines() {
        assert_eq!(parse_event_line("   ").unwrap(), None);
        assert!(parse_event_line(r#"{"type": "unknown"}"#).is_err());
        assert!(parse_event_line("not json").is_err());
    }
}
