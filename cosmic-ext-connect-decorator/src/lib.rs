//! CConnect Conversation Decorator
//!
//! This library reconstructs structured conversations from the free-text
//! notifications mirrored from a chat app that exposes no conversation API:
//! conversation identity, conversation kind (direct, group, bot or service)
//! and an ordered list of attributed messages, stable across repeated,
//! partial and out-of-order updates.

pub mod config;
pub mod conversation;
pub mod decorator;
pub mod emoji;
pub mod history;
pub mod message;
pub mod notification;
pub mod smart_reply;

mod emoji_map;
mod error;

pub use config::{DecoratorConfig, ThreadKeyRules, ThreadKeyRulesConfig};
pub use conversation::{
    Conversation, ConversationId, ConversationKind, ConversationRegistry, KindEvidence, Person,
    ProfileId,
};
pub use decorator::{title_hash, Decorator, SourceAppInfo, StaticSourceApp};
pub use error::{DecoratorError, Result};
pub use message::{
    parse_leading_counter, split_sender, LeadingCounter, Message, SENDER_MESSAGE_SEPARATOR,
};
pub use notification::{
    current_timestamp, ActionHandle, ConversationGroup, DecoratedConversation, Decoration,
    NotificationEvent, PayloadLine, RetainedNotification, RichPayload,
};
