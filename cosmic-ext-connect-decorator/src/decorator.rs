//! Decoration Pipeline
//!
//! Strings the core components together for one inbound notification:
//!
//! ```text
//! NotificationEvent
//!     │
//!     ├─ validate title / ticker / summary
//!     ├─ resolve conversation (distinct id or title hash)
//!     ├─ apply thread key evidence
//!     ├─ classify (while evidence is weak)
//!     ├─ assemble history (payload, else retained notifications)
//!     ├─ append sent replies, smart reply choices
//!     ▼
//! Decoration
//! ```
//!
//! ## Conversation Identity
//!
//! Older versions of the source app post every notification with a recycled
//! counter id, so the id is only trusted once the installed version is known
//! to post a stable per-thread id. Otherwise the id is a hash of the title,
//! which collapses repeated updates of one visible conversation onto one
//! record (two conversations with identical titles collide).
//!
//! ## Thread Keys
//!
//! Thread keys are resolved asynchronously by the embedding system and may
//! arrive at any time. [`Decorator::apply_thread_key`] is idempotent and can be
//! called before, between or after notification updates.
//!
//! ## Example
//!
//! ```rust
//! use cosmic_ext_connect_decorator::{
//!     ConversationKind, Decoration, Decorator, DecoratorConfig, NotificationEvent,
//!     StaticSourceApp,
//! };
//!
//! let mut decorator =
//!     Decorator::new(DecoratorConfig::default(), StaticSourceApp::new(Some(1360))).unwrap();
//!
//! let event = NotificationEvent::new("TeamChat", "Bob: Hi", "[2]Bob: Hi");
//! let Decoration::Conversation(decorated) = decorator.apply(&event).unwrap() else {
//!     panic!("expected a conversation");
//! };
//! assert_eq!(decorated.kind, ConversationKind::Group);
//! assert_eq!(decorated.unread_count, 2);
//! ```

use tracing::{debug, info, trace, warn};

use crate::config::{DecoratorConfig, ThreadKeyRules};
use crate::conversation::{
    Conversation, ConversationId, ConversationKind, ConversationRegistry, KindEvidence, Person,
    ProfileId,
};
use crate::emoji;
use crate::error::{DecoratorError, Result};
use crate::history;
use crate::message::{self, Message};
use crate::notification::{
    ConversationGroup, DecoratedConversation, Decoration, NotificationEvent,
};
use crate::smart_reply;

/// Information about the installed source chat app
pub trait SourceAppInfo {
    /// Installed version code, `None` when unknown
    fn version_code(&self) -> Option<u32>;
}

/// Source app info with a fixed, externally updated version code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticSourceApp {
    pub version_code: Option<u32>,
}

impl StaticSourceApp {
    pub fn new(version_code: Option<u32>) -> Self {
        Self { version_code }
    }
}

impl SourceAppInfo for StaticSourceApp {
    fn version_code(&self) -> Option<u32> {
        self.version_code
    }
}

/// Java-style string hash (31 multiplier over UTF-16 code units)
///
/// Stable across runs and platforms, so title-derived ids match the ids the
/// source app would compute for the same title.
///
/// ```rust
/// use cosmic_ext_connect_decorator::decorator::title_hash;
///
/// assert_eq!(title_hash(""), 0);
/// assert_eq!(title_hash("hello"), 99162322);
/// ```
pub fn title_hash(title: &str) -> ConversationId {
    title.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

/// Conversation decorator
///
/// Owns all conversation state. Not thread-safe: events must be applied one
/// at a time, in delivery order.
pub struct Decorator<S = StaticSourceApp> {
    config: DecoratorConfig,
    rules: ThreadKeyRules,
    source_app: S,
    distinct_id_supported: Option<bool>,
    registry: ConversationRegistry,
}

impl<S: SourceAppInfo> Decorator<S> {
    /// Create a decorator, compiling the configured thread key rules
    pub fn new(config: DecoratorConfig, source_app: S) -> Result<Self> {
        let rules = config.thread_key_rules.compile()?;
        Ok(Self {
            config,
            rules,
            source_app,
            distinct_id_supported: None,
            registry: ConversationRegistry::new(),
        })
    }

    pub fn config(&self) -> &DecoratorConfig {
        &self.config
    }

    /// All conversations seen so far
    pub fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    pub fn source_app_mut(&mut self) -> &mut S {
        &mut self.source_app
    }

    /// Forget the cached distinct-id answer after the source app was
    /// installed, updated or removed
    pub fn on_source_package_changed(&mut self) {
        if self.distinct_id_supported.take().is_some() {
            info!("Source app package changed, re-checking distinct id support");
        }
    }

    /// Whether the source app posts a stable per-thread notification id
    ///
    /// An unknown version is never cached.
    fn is_distinct_id(&mut self) -> bool {
        if let Some(supported) = self.distinct_id_supported {
            return supported;
        }
        match self.source_app.version_code() {
            Some(version) if version > 0 => {
                let supported = version >= self.config.min_distinct_id_version;
                info!(
                    "Source app version {}: distinct id {}",
                    version,
                    if supported { "supported" } else { "not supported" }
                );
                self.distinct_id_supported = Some(supported);
                supported
            }
            _ => false,
        }
    }

    /// Record a resolved thread key for a conversation
    ///
    /// Returns `true` if the key changed the conversation kind. Applying the
    /// same key again is a no-op.
    pub fn apply_thread_key(
        &mut self,
        profile: ProfileId,
        id: ConversationId,
        thread_key: &str,
    ) -> bool {
        let conversation = self.registry.resolve(profile, id);
        apply_thread_key_evidence(conversation, &self.rules, thread_key)
    }

    /// Decorate one notification event
    ///
    /// Fails with [`DecoratorError::MissingField`] before touching any state
    /// when the title (or the summary of a ticker-bearing event) is missing,
    /// and with [`DecoratorError::NoHistoryExtracted`] when there is neither
    /// a payload nor a usable retained notification. Both are recoverable.
    pub fn apply(&mut self, event: &NotificationEvent) -> Result<Decoration> {
        let title = match event.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => {
                warn!("Title is missing: {}", event.key);
                return Err(DecoratorError::MissingField("title"));
            }
        };
        let Some(ticker) = event.ticker.as_deref() else {
            // E.g. web login confirmation
            debug!("Skip non-conversation notification: {}", title);
            return Ok(Decoration::NotConversation);
        };
        let Some(summary) = event.summary.as_deref() else {
            return Err(DecoratorError::MissingField("summary"));
        };

        let id = if self.is_distinct_id() {
            event.original_id
        } else {
            title_hash(title)
        };

        let conversation = self.registry.resolve(event.profile, id);
        conversation.set_title(title);
        conversation.ticker = Some(ticker.to_string());
        conversation.summary = Some(summary.to_string());
        conversation.timestamp_ms = event.timestamp_ms;
        conversation.icon = event.icon.clone();
        conversation.payload = event.rich_payload.clone();

        if let Some(thread_key) = event.thread_key.as_deref() {
            apply_thread_key_evidence(conversation, &self.rules, thread_key);
        }

        let payload_lines = event
            .rich_payload
            .as_ref()
            .map(|payload| payload.lines.as_slice())
            .unwrap_or_default();
        if conversation.needs_classification() {
            let guess = message::guess_kind(title, ticker, summary, payload_lines);
            if guess.kind == ConversationKind::Unknown {
                trace!("Conversation {} kind still ambiguous", id);
            } else {
                conversation.set_kind(guess.kind, guess.evidence);
            }
        }

        let basic = message::extract_basic_message(ticker, summary);
        conversation.unread_count = basic.unread_count.unwrap_or(1);
        if basic.bot_hint && conversation.needs_classification() {
            conversation.set_kind(ConversationKind::BotOrService, KindEvidence::Heuristic);
        }

        let mut messages = match &event.rich_payload {
            Some(payload) => {
                if payload.latest_timestamp_ms > 0 {
                    conversation.timestamp_ms = payload.latest_timestamp_ms;
                }
                history::from_payload(conversation, &payload.lines, &basic)
            }
            None => {
                let archive = history::from_archive(
                    conversation,
                    title,
                    ticker,
                    &event.retained,
                    self.config.max_history_lines,
                )?;
                conversation.unread_count = archive.unread_count;
                archive.messages
            }
        };

        if self.config.append_input_history {
            messages.extend(event.remote_input_history.iter().rev().map(|text| {
                Message::new(emoji::translate(text), Some(Person::local_user()), 0)
            }));
        }

        let decorated = build_decorated(conversation, event, messages, &self.config);
        Ok(Decoration::Conversation(Box::new(decorated)))
    }
}

fn apply_thread_key_evidence(
    conversation: &mut Conversation,
    rules: &ThreadKeyRules,
    thread_key: &str,
) -> bool {
    conversation.set_thread_key(thread_key);
    let Some(kind) = rules.kind_for(thread_key) else {
        return false;
    };
    conversation.set_kind(kind, KindEvidence::ThreadKey) != kind
}

fn build_decorated(
    conversation: &mut Conversation,
    event: &NotificationEvent,
    messages: Vec<Message>,
    config: &DecoratorConfig,
) -> DecoratedConversation {
    let is_service_account = conversation.thread_key() == Some(config.service_account_key.as_str());
    let title = conversation.title.as_deref().unwrap_or_default();

    // A non-group conversation with many senders, shown under one header.
    let conversation_title = if is_service_account {
        Some(config.service_message_header.clone())
    } else if conversation.is_group_chat() || conversation.is_bot_message() {
        Some(emoji::translate(title).into_owned())
    } else {
        None
    };

    let group = if is_service_account || conversation.is_bot_message() {
        ConversationGroup::Bot
    } else if conversation.is_group_chat() {
        ConversationGroup::Group
    } else {
        ConversationGroup::Direct
    };

    let reply_action = event
        .rich_payload
        .as_ref()
        .and_then(|payload| payload.reply_action.clone());
    let read_action = event
        .rich_payload
        .as_ref()
        .and_then(|payload| payload.read_action.clone());

    let reply_choices = if config.smart_replies && reply_action.is_some() && conversation.is_chat() {
        smart_reply::generate_choices(&messages)
    } else {
        Vec::new()
    };

    DecoratedConversation {
        profile: event.profile,
        conversation_id: conversation.numeric_id(),
        thread_key: conversation.thread_key().map(str::to_string),
        kind: conversation.kind(),
        messages,
        conversation_title,
        conversation_sender: conversation.sender(),
        unread_count: conversation.unread_count,
        timestamp_ms: conversation.timestamp_ms,
        reply_action,
        read_action,
        reply_choices,
        group,
    }
}
