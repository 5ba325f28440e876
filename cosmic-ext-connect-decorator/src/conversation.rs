//! Conversation Registry
//!
//! Owns the identity and accumulated state of every conversation seen so far,
//! keyed by (profile, numeric id). Records are created on first sight and live
//! for the lifetime of the process.
//!
//! ## State Machine
//!
//! A conversation's [`ConversationKind`] starts as `Unknown` and is refined by
//! evidence of increasing strength (see [`KindEvidence`]). Heuristics may only
//! refine `Unknown` or tentative kinds; a resolved thread key may force any
//! kind. Every kind change invalidates:
//!
//! - the cached conversation sender ([`Conversation::sender`])
//! - the group participant cache (unless the new kind is `Group`)
//!
//! Title and thread key changes invalidate the cached sender as well.
//!
//! ## Example
//!
//! ```rust
//! use cosmic_ext_connect_decorator::conversation::{
//!     ConversationKind, ConversationRegistry, KindEvidence,
//! };
//!
//! let mut registry = ConversationRegistry::new();
//! let conversation = registry.resolve(0, 42);
//! assert_eq!(conversation.kind(), ConversationKind::Unknown);
//!
//! conversation.set_kind(ConversationKind::Group, KindEvidence::ThreadKey);
//! assert!(conversation.is_group_chat());
//! assert_eq!(registry.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::emoji;
use crate::notification::RichPayload;

/// Profile (user) identity the notification was posted for
pub type ProfileId = u32;

/// Numeric conversation identity within a profile
pub type ConversationId = i32;

/// Inferred kind of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    /// Not enough evidence yet
    #[default]
    Unknown,
    /// One-to-one chat
    Direct,
    /// Group chat with several participants
    Group,
    /// Service account, bot or official account
    BotOrService,
}

/// Strength of the evidence behind the current kind
///
/// Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindEvidence {
    /// No classification yet
    #[default]
    None,
    /// Plausible guess, re-evaluated on every update
    Tentative,
    /// Unambiguous text heuristics
    Heuristic,
    /// Resolved thread key pattern, authoritative
    ThreadKey,
}

/// A display identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Stable key; empty string means the local user
    pub key: String,

    /// Display name (emoji markers translated)
    pub name: String,

    /// Untranslated name, used for matching
    pub original_name: String,

    /// Whether this is a service account or bot
    #[serde(default)]
    pub is_bot: bool,

    /// Opaque icon reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Person {
    /// The local user
    pub fn local_user() -> Self {
        Self {
            key: String::new(),
            name: String::new(),
            original_name: String::new(),
            is_bot: false,
            icon: None,
        }
    }

    /// Create a person, translating emoji markers in the display name
    pub fn new(key: impl Into<String>, name: &str) -> Self {
        Self {
            key: key.into(),
            name: emoji::translate(name).into_owned(),
            original_name: name.to_string(),
            is_bot: false,
            icon: None,
        }
    }

    /// Whether this person is the local user
    pub fn is_local_user(&self) -> bool {
        self.key.is_empty()
    }
}

/// Identity and accumulated state for one chat thread
#[derive(Debug, Clone)]
pub struct Conversation {
    numeric_id: ConversationId,
    thread_key: Option<String>,
    kind: ConversationKind,
    evidence: KindEvidence,

    /// Last observed title
    pub title: Option<String>,
    /// Last observed ticker text
    pub ticker: Option<String>,
    /// Last observed summary/content text
    pub summary: Option<String>,
    /// Last observed timestamp (ms)
    pub timestamp_ms: i64,
    /// Last parsed unread count
    pub unread_count: u32,
    /// Opaque icon reference
    pub icon: Option<String>,
    /// Rich payload of the latest notification
    pub payload: Option<RichPayload>,

    participants: HashMap<String, Person>,
    sender: Option<Person>,
}

impl Conversation {
    /// Create a zero-initialized conversation
    pub fn new(numeric_id: ConversationId) -> Self {
        Self {
            numeric_id,
            thread_key: None,
            kind: ConversationKind::Unknown,
            evidence: KindEvidence::None,
            title: None,
            ticker: None,
            summary: None,
            timestamp_ms: 0,
            unread_count: 0,
            icon: None,
            payload: None,
            participants: HashMap::new(),
            sender: None,
        }
    }

    /// Numeric identity, fixed at creation
    pub fn numeric_id(&self) -> ConversationId {
        self.numeric_id
    }

    /// Resolved thread key, if known
    pub fn thread_key(&self) -> Option<&str> {
        self.thread_key.as_deref()
    }

    /// Current kind
    pub fn kind(&self) -> ConversationKind {
        self.kind
    }

    /// Evidence behind the current kind
    pub fn evidence(&self) -> KindEvidence {
        self.evidence
    }

    pub fn is_group_chat(&self) -> bool {
        self.kind == ConversationKind::Group
    }

    pub fn is_bot_message(&self) -> bool {
        self.kind == ConversationKind::BotOrService
    }

    /// Whether heuristics are still allowed to (re)classify this conversation
    pub fn needs_classification(&self) -> bool {
        self.evidence <= KindEvidence::Tentative
    }

    /// Whether the ticker looks like "sender: message"
    pub fn is_chat(&self) -> bool {
        self.ticker
            .as_deref()
            .and_then(|ticker| ticker.find(':'))
            .is_some_and(|pos| pos > 0)
    }

    /// Set kind and the evidence behind it
    ///
    /// Returns the previous kind. Caches are invalidated when the kind
    /// actually changes.
    pub fn set_kind(&mut self, kind: ConversationKind, evidence: KindEvidence) -> ConversationKind {
        let previous = self.kind;
        self.evidence = evidence;
        if kind == previous {
            return previous;
        }

        info!(
            "Conversation {} kind changed: {:?} -> {:?} ({:?})",
            self.numeric_id, previous, kind, evidence
        );
        self.kind = kind;
        self.sender = None;
        if kind != ConversationKind::Group {
            self.participants.clear();
        }
        previous
    }

    /// Record the resolved thread key
    ///
    /// Returns `true` if the key changed.
    pub fn set_thread_key(&mut self, key: &str) -> bool {
        if self.thread_key.as_deref() == Some(key) {
            return false;
        }
        debug!("Conversation {} thread key: {}", self.numeric_id, key);
        self.thread_key = Some(key.to_string());
        self.sender = None;
        true
    }

    /// Update the title, invalidating the cached sender if it changed
    pub fn set_title(&mut self, title: &str) {
        if self.title.as_deref() != Some(title) {
            self.title = Some(title.to_string());
            self.sender = None;
        }
    }

    /// Sender identity for non-group conversations
    ///
    /// Built lazily from the title, thread key and kind, and cached until one
    /// of them changes. Group chats have no single sender.
    pub fn sender(&mut self) -> Option<Person> {
        if self.is_group_chat() {
            return None;
        }
        if self.sender.is_none() {
            let key = self
                .thread_key
                .clone()
                .unwrap_or_else(|| self.numeric_id.to_string());
            // Display name must not be empty, or it would be read as absent.
            let title = self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(" ");
            let mut person = Person::new(key, title);
            person.is_bot = self.is_bot_message();
            person.icon = self.icon.clone();
            self.sender = Some(person);
        }
        self.sender.clone()
    }

    /// Look up or create a cached group participant
    ///
    /// Participants are keyed by `key`; a changed `name` for a known key
    /// updates the cached person in place. Returns `None` outside group chats.
    pub fn group_participant(&mut self, key: &str, name: &str) -> Option<Person> {
        if !self.is_group_chat() {
            return None;
        }
        match self.participants.get_mut(key) {
            Some(participant) => {
                if participant.original_name != name {
                    debug!("Participant {} renamed to {}", key, name);
                    participant.original_name = name.to_string();
                    participant.name = emoji::translate(name).into_owned();
                }
                Some(participant.clone())
            }
            None => {
                let participant = Person::new(key, name);
                self.participants.insert(key.to_string(), participant.clone());
                Some(participant)
            }
        }
    }

    /// Number of cached group participants
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Multi-line dump of the raw fields, for troubleshooting
    pub fn debug_summary(&self) -> String {
        let mut summary = format!(
            "#{} {:?}/{:?} key={}\n{}\nT:{}",
            self.numeric_id,
            self.kind,
            self.evidence,
            self.thread_key.as_deref().unwrap_or("-"),
            self.summary.as_deref().unwrap_or(""),
            self.ticker.as_deref().unwrap_or("")
        );
        if let Some(payload) = &self.payload {
            for line in &payload.lines {
                summary.push('\n');
                summary.push_str(&line.text);
            }
        }
        summary
    }
}

/// Registry of all known conversations, per profile
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    profiles: HashMap<ProfileId, HashMap<ConversationId, Conversation>>,
}

impl ConversationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the conversation for (profile, id), creating it if needed
    pub fn resolve(&mut self, profile: ProfileId, id: ConversationId) -> &mut Conversation {
        self.profiles
            .entry(profile)
            .or_default()
            .entry(id)
            .or_insert_with(|| {
                debug!("New conversation {} for profile {}", id, profile);
                Conversation::new(id)
            })
    }

    /// Get an existing conversation
    pub fn get(&self, profile: ProfileId, id: ConversationId) -> Option<&Conversation> {
        self.profiles.get(&profile)?.get(&id)
    }

    /// Total number of conversations across profiles
    pub fn len(&self) -> usize {
        self.profiles.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_creates_once() {
        let mut registry = ConversationRegistry::new();
        assert!(registry.is_empty());

        registry.resolve(0, 7).title = Some("Oasis".to_string());
        let again = registry.resolve(0, 7);
        assert_eq!(again.title.as_deref(), Some("Oasis"));
        assert_eq!(again.numeric_id(), 7);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_profiles_are_separate() {
        let mut registry = ConversationRegistry::new();
        registry.resolve(0, 7);
        registry.resolve(10, 7);
        assert_eq!(registry.len(), 2);
        assert!(registry.get(10, 7).is_some());
        assert!(registry.get(11, 7).is_none());
    }

    #[test]
    fn test_new_conversation_is_unknown() {
        let conversation = Conversation::new(1);
        assert_eq!(conversation.kind(), ConversationKind::Unknown);
        assert_eq!(conversation.evidence(), KindEvidence::None);
        assert!(conversation.needs_classification());
        assert!(conversation.thread_key().is_none());
    }

    #[test]
    fn test_kind_change_clears_participants() {
        let mut conversation = Conversation::new(1);
        conversation.set_kind(ConversationKind::Group, KindEvidence::Heuristic);
        conversation.group_participant("alice", "Alice");
        conversation.group_participant("bob", "Bob");
        assert_eq!(conversation.participant_count(), 2);

        let previous = conversation.set_kind(ConversationKind::Direct, KindEvidence::ThreadKey);
        assert_eq!(previous, ConversationKind::Group);
        assert_eq!(conversation.participant_count(), 0);
        assert!(!conversation.needs_classification());
    }

    #[test]
    fn test_participant_rename_updates_in_place() {
        let mut conversation = Conversation::new(1);
        conversation.set_kind(ConversationKind::Group, KindEvidence::Heuristic);

        let first = conversation.group_participant("nick", "Nick").unwrap();
        assert_eq!(first.name, "Nick");

        let renamed = conversation.group_participant("nick", "Nick[Smile]").unwrap();
        assert_eq!(renamed.key, "nick");
        assert_eq!(renamed.name, "Nick😃");
        assert_eq!(renamed.original_name, "Nick[Smile]");
        assert_eq!(conversation.participant_count(), 1);
    }

    #[test]
    fn test_participants_only_in_group() {
        let mut conversation = Conversation::new(1);
        assert!(conversation.group_participant("nick", "Nick").is_none());
    }

    #[test]
    fn test_sender_cache_invalidation() {
        let mut conversation = Conversation::new(5);
        conversation.set_title("Oasis");
        let sender = conversation.sender().unwrap();
        assert_eq!(sender.key, "5");
        assert_eq!(sender.name, "Oasis");
        assert!(!sender.is_bot);

        conversation.set_thread_key("wxid_oasis");
        assert_eq!(conversation.sender().unwrap().key, "wxid_oasis");

        conversation.set_kind(ConversationKind::BotOrService, KindEvidence::Heuristic);
        assert!(conversation.sender().unwrap().is_bot);

        conversation.set_title("FedEx[Packet]");
        let sender = conversation.sender().unwrap();
        assert_eq!(sender.name, "FedEx🧧");
        assert_eq!(sender.original_name, "FedEx[Packet]");

        conversation.set_kind(ConversationKind::Group, KindEvidence::ThreadKey);
        assert!(conversation.sender().is_none());
    }

    #[test]
    fn test_sender_name_never_empty() {
        let mut conversation = Conversation::new(5);
        assert_eq!(conversation.sender().unwrap().name, " ");
    }

    #[test]
    fn test_set_thread_key_reports_change() {
        let mut conversation = Conversation::new(1);
        assert!(conversation.set_thread_key("a@chatroom"));
        assert!(!conversation.set_thread_key("a@chatroom"));
        assert!(conversation.set_thread_key("b@chatroom"));
    }

    #[test]
    fn test_is_chat() {
        let mut conversation = Conversation::new(1);
        assert!(!conversation.is_chat());
        conversation.ticker = Some("Oasis: Hello".to_string());
        assert!(conversation.is_chat());
        conversation.ticker = Some(":Hello".to_string());
        assert!(!conversation.is_chat());
    }

    #[test]
    fn test_local_user() {
        assert!(Person::local_user().is_local_user());
        assert!(!Person::new("k", "Name").is_local_user());
    }
}
