//! Decorator configuration
//!
//! All settings have defaults tuned to the observed behavior of the source
//! chat app, so an empty configuration file is valid.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversation::ConversationKind;
use crate::error::{DecoratorError, Result};

/// Tunables for the decoration pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoratorConfig {
    /// First source app version code that posts a stable per-thread id
    #[serde(default = "default_min_distinct_id_version")]
    pub min_distinct_id_version: u32,

    /// Number of newest lines kept by the retained-notification scan
    #[serde(default = "default_max_history_lines")]
    pub max_history_lines: usize,

    /// Conversation title for the virtual service-notification account
    #[serde(default = "default_service_message_header")]
    pub service_message_header: String,

    /// Thread key of the virtual service-notification account
    #[serde(default = "default_service_account_key")]
    pub service_account_key: String,

    /// Offer canned answers to questions
    #[serde(default = "default_true")]
    pub smart_replies: bool,

    /// Append replies already sent by the user as self messages
    #[serde(default = "default_true")]
    pub append_input_history: bool,

    /// Thread key patterns, authoritative for the conversation kind
    #[serde(default)]
    pub thread_key_rules: ThreadKeyRulesConfig,
}

fn default_min_distinct_id_version() -> u32 {
    1340
}

fn default_max_history_lines() -> usize {
    10
}

fn default_service_message_header() -> String {
    "Service messages".to_string()
}

fn default_service_account_key() -> String {
    "notifymessage".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DecoratorConfig {
    fn default() -> Self {
        Self {
            min_distinct_id_version: default_min_distinct_id_version(),
            max_history_lines: default_max_history_lines(),
            service_message_header: default_service_message_header(),
            service_account_key: default_service_account_key(),
            smart_replies: true,
            append_input_history: true,
            thread_key_rules: ThreadKeyRulesConfig::default(),
        }
    }
}

/// Regex lists mapping thread keys to conversation kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadKeyRulesConfig {
    #[serde(default = "default_group_patterns")]
    pub group: Vec<String>,

    #[serde(default = "default_bot_patterns")]
    pub bot: Vec<String>,

    #[serde(default = "default_direct_patterns")]
    pub direct: Vec<String>,
}

fn default_group_patterns() -> Vec<String> {
    // The second one is used by the enterprise edition.
    vec![r"@chatroom$".to_string(), r"@im\.chatroom$".to_string()]
}

fn default_bot_patterns() -> Vec<String> {
    vec![r"^gh_".to_string(), r"^notifymessage$".to_string()]
}

fn default_direct_patterns() -> Vec<String> {
    vec![r"@openim$".to_string()]
}

impl Default for ThreadKeyRulesConfig {
    fn default() -> Self {
        Self {
            group: default_group_patterns(),
            bot: default_bot_patterns(),
            direct: default_direct_patterns(),
        }
    }
}

impl ThreadKeyRulesConfig {
    /// Compile all patterns
    pub fn compile(&self) -> Result<ThreadKeyRules> {
        fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
            patterns
                .iter()
                .map(|pattern| Regex::new(pattern).map_err(DecoratorError::from))
                .collect()
        }

        Ok(ThreadKeyRules {
            group: compile_all(&self.group)?,
            bot: compile_all(&self.bot)?,
            direct: compile_all(&self.direct)?,
        })
    }
}

/// Compiled thread key patterns
#[derive(Debug, Clone)]
pub struct ThreadKeyRules {
    group: Vec<Regex>,
    bot: Vec<Regex>,
    direct: Vec<Regex>,
}

impl ThreadKeyRules {
    /// Kind implied by a thread key, checked group first, then bot, then direct
    ///
    /// Returns `None` when no pattern matches; such a key carries no
    /// authoritative kind.
    pub fn kind_for(&self, key: &str) -> Option<ConversationKind> {
        let matches = |patterns: &[Regex]| patterns.iter().any(|re| re.is_match(key));

        let kind = if matches(self.group.as_slice()) {
            ConversationKind::Group
        } else if matches(self.bot.as_slice()) {
            ConversationKind::BotOrService
        } else if matches(self.direct.as_slice()) {
            ConversationKind::Direct
        } else {
            debug!("Thread key {} matches no rule", key);
            return None;
        };
        Some(kind)
    }
}
