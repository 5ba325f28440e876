//! Type Classifier & Sender Extractor
//!
//! The source app exposes no structured conversation data, only free text
//! whose shape varies by conversation kind and unread count:
//!
//! | Case                | Ticker                 | Title    | Summary                  | Payload line       |
//! |---------------------|------------------------|----------|--------------------------|--------------------|
//! | Direct, 1 unread    | `Oasis: Hello`         | Oasis    | `Hello`                  | `Hello`            |
//! | Direct, >1 unread   | `Oasis: [Link] WTF`    | Oasis    | `[2]Oasis: [Link] WTF`   |                    |
//! | Service, 1 unread   | `FedEx: [Link] Status` | FedEx    | `[Link] Status`          | `[Link] Status`    |
//! | Service, >1 unread  | `FedEx: Delivered`     | FedEx    | `[2]FedEx: Delivered`    | `[Link] Delivered` |
//! | Group, 1 unread     | `Nick: Hello`          | Group    | `Nick: Hello`            | `Nick: Hello`      |
//! | Group, >1 unread    | `Nick: [Link] Mm`      | Group    | `[2]Nick: [Link] Mm`     | `Nick: [Link] Mm`  |
//!
//! This module infers the conversation kind from these fields, splits
//! sender from body, and parses the leading unread counter.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

use crate::conversation::{ConversationKind, KindEvidence, Person};
use crate::notification::PayloadLine;

/// Separator between sender and body in ticker, summary and payload lines
pub const SENDER_MESSAGE_SEPARATOR: &str = ": ";

/// Number of leading ticker characters searched for in the summary
///
/// The summary may be truncated, so only a prefix is matched.
pub const TICKER_PREFIX_MATCH_LEN: usize = 10;

/// Widest unread counter prefix, `[999t]`, in characters
pub const MAX_COUNTER_PREFIX_WIDTH: usize = 6;

/// Largest representable unread count
pub const MAX_UNREAD_COUNT: u32 = 0xFFFF;

/// A displayable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Body text, emoji markers translated
    pub text: String,

    /// Originating person
    ///
    /// `None` means no distinct sender: the message belongs to the
    /// conversation peer (non-group) or is plain text (group). The local user
    /// is a person with an empty key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Person>,

    /// Timestamp (ms), 0 when unknown
    pub timestamp_ms: i64,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Option<Person>, timestamp_ms: i64) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp_ms,
        }
    }

    /// Whether the message was sent by the local user
    pub fn is_from_local_user(&self) -> bool {
        self.sender.as_ref().is_some_and(Person::is_local_user)
    }
}

/// Split `line` into (sender, body) at the first separator
///
/// A separator at position 0 does not count, so `":hi"` and `": hi"` have no
/// sender.
///
/// ```rust
/// use cosmic_ext_connect_decorator::message::split_sender;
///
/// assert_eq!(split_sender("Alice: hi"), (Some("Alice"), "hi"));
/// assert_eq!(split_sender("hi"), (None, "hi"));
/// assert_eq!(split_sender(": hi"), (None, ": hi"));
/// ```
pub fn split_sender(line: &str) -> (Option<&str>, &str) {
    match line.find(SENDER_MESSAGE_SEPARATOR) {
        Some(pos) if pos > 0 => (
            Some(&line[..pos]),
            &line[pos + SENDER_MESSAGE_SEPARATOR.len()..],
        ),
        _ => (None, line),
    }
}

/// Whether `text` is strictly longer than `sender + ": "` and starts with it
pub fn starts_with_sender(text: &str, sender: &str) -> bool {
    text.len() > sender.len() + SENDER_MESSAGE_SEPARATOR.len()
        && text
            .strip_prefix(sender)
            .is_some_and(|rest| rest.starts_with(SENDER_MESSAGE_SEPARATOR))
}

/// A parsed leading unread counter such as `[3]` or `[12条]`
///
/// Count and end offset are packed into one value: the count (saturated at
/// [`MAX_UNREAD_COUNT`]) in the low 16 bits and the byte offset just past the
/// closing bracket in the high 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadingCounter(u32);

impl LeadingCounter {
    fn new(count: u32, end: usize) -> Option<Self> {
        let end = u32::try_from(end).ok().filter(|end| *end <= 0xFFFF)?;
        Some(Self((end << 16) | count.min(MAX_UNREAD_COUNT)))
    }

    /// Unread count
    pub fn count(self) -> u32 {
        self.0 & 0xFFFF
    }

    /// Byte offset where the counter prefix ends
    pub fn end(self) -> usize {
        (self.0 >> 16) as usize
    }

    /// Packed representation
    pub fn packed(self) -> u32 {
        self.0
    }

    /// The text following the counter prefix
    pub fn strip(self, text: &str) -> &str {
        text.get(self.end()..).unwrap_or_default()
    }
}

/// Parse a leading `[` digits [unit] `]` unread counter
///
/// Requires at least 4 characters, at least one leading digit and a count of
/// 2 or more (a single unread message has no counter). The unit is any run
/// of characters without digits or whitespace, e.g. `条` or `tail`. Anything
/// else is ordinary text.
///
/// ```rust
/// use cosmic_ext_connect_decorator::message::parse_leading_counter;
///
/// let counter = parse_leading_counter("[2]Bob: Hi").unwrap();
/// assert_eq!(counter.count(), 2);
/// assert_eq!(counter.strip("[2]Bob: Hi"), "Bob: Hi");
///
/// assert!(parse_leading_counter("[1]x").is_none());
/// assert!(parse_leading_counter("[Link] x").is_none());
/// ```
pub fn parse_leading_counter(text: &str) -> Option<LeadingCounter> {
    if !text.starts_with('[') || text.chars().nth(3).is_none() {
        return None;
    }
    let (close, _) = text.char_indices().skip(2).find(|(_, c)| *c == ']')?;

    let inner = &text[1..close];
    let digits_end = inner
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(inner.len());
    if digits_end == 0 {
        return None;
    }
    // Unit word such as "条"; more digits or spaces make it ordinary text.
    if inner[digits_end..]
        .chars()
        .any(|c| c.is_whitespace() || c.is_ascii_digit())
    {
        return None;
    }

    let count: u32 = match inner[..digits_end].parse() {
        Ok(count) => count,
        Err(e) => {
            debug!("Failed to parse unread counter {:?}: {}", inner, e);
            return None;
        }
    };
    if count < 2 {
        return None;
    }
    LeadingCounter::new(count, close + 1)
}

/// Message reconstructed from ticker and summary alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicMessage<'a> {
    pub sender: Option<&'a str>,
    pub text: &'a str,
    /// Unread count from the summary prefix
    pub unread_count: Option<u32>,
    /// Summary looks like a service message omitting the sender
    pub bot_hint: bool,
}

/// Extract the latest message from the ticker and summary fields
///
/// The ticker is authoritative for the sender; the summary (with its unread
/// counter stripped) for the text when both agree on the sender.
pub fn extract_basic_message<'a>(ticker: &'a str, summary: &'a str) -> BasicMessage<'a> {
    let ticker = ticker.trim_end_matches(' ');
    let (mut sender, mut text) = split_sender(ticker);
    let mut unread_count = None;
    let mut bot_hint = false;

    let mut content = summary;
    if let Some(counter) = parse_leading_counter(summary) {
        unread_count = Some(counter.count());
        content = counter.strip(summary);
    } else if summary.starts_with('[') && summary.chars().nth(3).is_some() {
        // Only service messages omit the sender before a bracketed prefix, e.g. "[Link]".
        if let Some(close) = summary[1..].find(']').map(|i| i + 1) {
            bot_hint = &summary[close + 1..] == text;
        }
    }

    match sender {
        None => (sender, text) = split_sender(content),
        Some(name) if !starts_with_sender(content, name) => {
            if unread_count.is_some() {
                warn!(
                    "Sender mismatch: {:?} in ticker, summary: {:?}",
                    name,
                    summary.chars().take(TICKER_PREFIX_MATCH_LEN).collect::<String>()
                );
            }
            // Single unread message: summary is the bare body.
            if starts_with_sender(ticker, name) {
                text = content;
            }
        }
        Some(_) => {}
    }

    BasicMessage {
        sender,
        text,
        unread_count,
        bot_hint,
    }
}

/// A classification result with the evidence behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: ConversationKind,
    pub evidence: KindEvidence,
}

impl Classification {
    fn heuristic(kind: ConversationKind) -> Self {
        Self {
            kind,
            evidence: KindEvidence::Heuristic,
        }
    }
}

/// Guess the conversation kind from text fields and payload lines
pub fn guess_kind(
    title: &str,
    ticker: &str,
    summary: &str,
    payload_lines: &[PayloadLine],
) -> Classification {
    let last_line = payload_lines.last().map(|line| line.text.as_str());

    if payload_lines.len() > 1 {
        let senders: HashSet<&str> = payload_lines
            .iter()
            .filter_map(|line| {
                line.author
                    .as_deref()
                    .or_else(|| split_sender(&line.text).0)
            })
            .collect();
        if senders.len() > 1 {
            trace!("Multiple senders in payload: {:?}", senders);
            return Classification::heuristic(ConversationKind::Group);
        }
    }

    // Ticker starts with the sender, which is the title only for direct messages.
    let ticker = ticker.trim();
    let ticker_prefix = match ticker.char_indices().nth(TICKER_PREFIX_MATCH_LEN) {
        Some((end, _)) => &ticker[..end],
        None => ticker,
    };

    let found = summary
        .find(ticker_prefix)
        .filter(|pos| summary[..*pos].chars().count() <= MAX_COUNTER_PREFIX_WIDTH);
    if let Some(pos) = found {
        let content = if pos > 0 && summary.starts_with('[') {
            &summary[pos..]
        } else {
            summary
        };
        if !starts_with_sender(content, title) {
            // Leading token is another participant, the title is the group name.
            return Classification::heuristic(ConversationKind::Group);
        }

        let text = &content[title.len() + SENDER_MESSAGE_SEPARATOR.len()..];
        if starts_with_bracketed_prefix_and_one_space(last_line, text)
            || is_bracketed_prefix_only(last_line)
        {
            return Classification::heuristic(ConversationKind::BotOrService);
        }
        return Classification::heuristic(ConversationKind::Direct);
    }

    if ticker.contains(summary) {
        if starts_with_bracketed_prefix_and_one_space(last_line, summary) {
            return Classification::heuristic(ConversationKind::BotOrService);
        }
        if ticker
            .strip_prefix(title)
            .and_then(|rest| rest.strip_prefix(SENDER_MESSAGE_SEPARATOR))
            == Some(summary)
        {
            // Also what a plain service text message looks like.
            return Classification {
                kind: ConversationKind::Direct,
                evidence: KindEvidence::Tentative,
            };
        }
        return Classification {
            kind: ConversationKind::Unknown,
            evidence: KindEvidence::None,
        };
    }

    // Service messages with links omit the "sender: " echo.
    Classification::heuristic(ConversationKind::BotOrService)
}

/// `[X] needle`: bracketed prefix, one space, then `needle`
fn starts_with_bracketed_prefix_and_one_space(line: Option<&str>, needle: &str) -> bool {
    let Some(line) = line else {
        return false;
    };
    let Some(start) = line.find(needle) else {
        return false;
    };
    let bytes = line.as_bytes();
    start > 3 && bytes[0] == b'[' && bytes[start - 1] == b' ' && bytes[start - 2] == b']'
}

/// A bare `[X]` or `[XY]` line
fn is_bracketed_prefix_only(line: Option<&str>) -> bool {
    line.is_some_and(|line| {
        let length = line.chars().count();
        (3..=4).contains(&length) && line.starts_with('[') && line.ends_with(']')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sender() {
        assert_eq!(split_sender("Alice: hi"), (Some("Alice"), "hi"));
        assert_eq!(split_sender("hi"), (None, "hi"));
        assert_eq!(split_sender(":hi"), (None, ":hi"));
        assert_eq!(split_sender("Alice:hi"), (None, "Alice:hi"));
        assert_eq!(split_sender("A: b: c"), (Some("A"), "b: c"));
        assert_eq!(split_sender("小明: 你好"), (Some("小明"), "你好"));
    }

    #[test]
    fn test_starts_with_sender() {
        assert!(starts_with_sender("Oasis: Hello", "Oasis"));
        assert!(!starts_with_sender("Oasis: ", "Oasis"));
        assert!(!starts_with_sender("Oasis:Hello", "Oasis"));
        assert!(!starts_with_sender("Bob: Hi", "TeamChat"));
    }

    #[test]
    fn test_counter_boundaries() {
        assert!(parse_leading_counter("[1]x").is_none());

        let counter = parse_leading_counter("[2]x").unwrap();
        assert_eq!(counter.count(), 2);
        assert_eq!(counter.end(), 3);
        assert_eq!(counter.strip("[2]x"), "x");

        let counter = parse_leading_counter("[999tail]x").unwrap();
        assert_eq!(counter.count(), 999);
        assert_eq!(counter.strip("[999tail]x"), "x");
    }

    #[test]
    fn test_counter_with_unit_suffix() {
        let text = "[12条]Bob: Hi";
        let counter = parse_leading_counter(text).unwrap();
        assert_eq!(counter.count(), 12);
        assert_eq!(counter.strip(text), "Bob: Hi");
        assert_eq!(counter.packed() >> 16, counter.end() as u32);
    }

    #[test]
    fn test_counter_rejects_ordinary_text() {
        assert!(parse_leading_counter("").is_none());
        assert!(parse_leading_counter("[2]").is_none());
        assert!(parse_leading_counter("2]xx").is_none());
        assert!(parse_leading_counter("[Link] Status").is_none());
        assert!(parse_leading_counter("[2 no close").is_none());
        assert!(parse_leading_counter("[]2]x").is_none());
        assert!(parse_leading_counter("[99999999999]x").is_none());
        assert!(parse_leading_counter("[2 apples]x").is_none());
        assert!(parse_leading_counter("[2a3]x").is_none());
    }

    #[test]
    fn test_counter_saturates() {
        let counter = parse_leading_counter("[70000]x").unwrap();
        assert_eq!(counter.count(), MAX_UNREAD_COUNT);
        assert_eq!(counter.strip("[70000]x"), "x");
    }

    #[test]
    fn test_basic_message_single_unread() {
        let basic = extract_basic_message("Oasis: Hello  ", "Hello");
        assert_eq!(basic.sender, Some("Oasis"));
        assert_eq!(basic.text, "Hello");
        assert_eq!(basic.unread_count, None);
        assert!(!basic.bot_hint);
    }

    #[test]
    fn test_basic_message_with_counter() {
        let basic = extract_basic_message("Bob: Hi", "[2]Bob: Hi");
        assert_eq!(basic.sender, Some("Bob"));
        assert_eq!(basic.text, "Hi");
        assert_eq!(basic.unread_count, Some(2));
    }

    #[test]
    fn test_basic_message_sender_from_summary() {
        let basic = extract_basic_message("New message", "[3]Alice: Are you there");
        assert_eq!(basic.sender, Some("Alice"));
        assert_eq!(basic.text, "Are you there");
        assert_eq!(basic.unread_count, Some(3));
    }

    #[test]
    fn test_basic_message_bot_hint() {
        let basic = extract_basic_message("Status", "[Link]Status");
        assert!(basic.bot_hint);
        assert_eq!(basic.unread_count, None);
    }

    #[test]
    fn test_direct_single_unread_is_tentative() {
        let classification = guess_kind("Oasis", "Oasis: Hello", "Hello", &[]);
        assert_eq!(classification.kind, ConversationKind::Direct);
        assert_eq!(classification.evidence, KindEvidence::Tentative);
    }

    #[test]
    fn test_direct_multiple_unread() {
        let classification = guess_kind("Oasis", "Oasis: [Link] WTF", "[2]Oasis: [Link] WTF", &[]);
        assert_eq!(classification, Classification::heuristic(ConversationKind::Direct));
    }

    #[test]
    fn test_group_with_counter() {
        let classification = guess_kind("TeamChat", "Bob: Hi", "[2]Bob: Hi", &[]);
        assert_eq!(classification, Classification::heuristic(ConversationKind::Group));

        let classification = guess_kind("Group", "Nick: Hello", "Nick: Hello", &[]);
        assert_eq!(classification.kind, ConversationKind::Group);
    }

    #[test]
    fn test_group_by_multiple_payload_senders() {
        let lines = [PayloadLine::new("Alice: Hi"), PayloadLine::new("Bob: Hey")];
        let classification = guess_kind("Oasis", "Oasis: Hello", "Hello", &lines);
        assert_eq!(classification.kind, ConversationKind::Group);

        let lines = [PayloadLine::new("Alice: Hi"), PayloadLine::new("Alice: Hey")];
        let classification = guess_kind("Oasis", "Oasis: Hello", "Hello", &lines);
        assert_ne!(classification.kind, ConversationKind::Group);
    }

    #[test]
    fn test_group_by_explicit_payload_authors() {
        let mut lines = [PayloadLine::new("Hi"), PayloadLine::new("Yo")];
        lines[0].author = Some("Alice".to_string());
        lines[1].author = Some("Bob".to_string());
        let classification = guess_kind("Team", "Bob: Yo", "Yo", &lines);
        assert_eq!(classification.kind, ConversationKind::Group);

        // Same author throughout, even though the text looks like two senders
        let mut lines = [PayloadLine::new("Note: a"), PayloadLine::new("Time: b")];
        lines[0].author = Some("Alice".to_string());
        lines[1].author = Some("Alice".to_string());
        let classification = guess_kind("Alice", "Alice: Time: b", "Time: b", &lines);
        assert_ne!(classification.kind, ConversationKind::Group);
    }

    #[test]
    fn test_service_messages() {
        // Multiple unread, payload line carries a bracketed prefix
        let lines = [PayloadLine::new("[Link] Delivered")];
        let classification = guess_kind("FedEx", "FedEx: Delivered", "[2]FedEx: Delivered", &lines);
        assert_eq!(classification.kind, ConversationKind::BotOrService);

        // Bare bracketed prefix as the last line
        let lines = [PayloadLine::new("[图片]")];
        let classification = guess_kind("FedEx", "FedEx: Photo", "[2]FedEx: Photo", &lines);
        assert_eq!(classification.kind, ConversationKind::BotOrService);

        // Single unread, ticker contains the summary
        let lines = [PayloadLine::new("[Link] Status")];
        let classification = guess_kind("FedEx", "FedEx: Status", "Status", &lines);
        assert_eq!(classification.kind, ConversationKind::BotOrService);

        // Summary diverges from ticker
        let classification = guess_kind("FedEx", "FedEx: [Link] Status", "Tracking updated", &[]);
        assert_eq!(classification, Classification::heuristic(ConversationKind::BotOrService));
    }

    #[test]
    fn test_ambiguous_is_unknown() {
        let classification = guess_kind("Oasis", "Someone: Hello there", "Hello", &[]);
        assert_eq!(classification.kind, ConversationKind::Unknown);
        assert_eq!(classification.evidence, KindEvidence::None);
    }

    #[test]
    fn test_long_ticker_matches_by_prefix() {
        let classification = guess_kind(
            "Oasis",
            "Oasis: a very long message that got truncated",
            "[5]Oasis: a very long message that got",
            &[],
        );
        assert_eq!(classification.kind, ConversationKind::Direct);
    }

    #[test]
    fn test_bracket_helpers() {
        assert!(starts_with_bracketed_prefix_and_one_space(Some("[Link] Text"), "Text"));
        assert!(!starts_with_bracketed_prefix_and_one_space(Some("[Link]Text"), "Text"));
        assert!(!starts_with_bracketed_prefix_and_one_space(Some("Text"), "Text"));
        assert!(!starts_with_bracketed_prefix_and_one_space(None, "Text"));

        assert!(is_bracketed_prefix_only(Some("[X]")));
        assert!(is_bracketed_prefix_only(Some("[图片]")));
        assert!(!is_bracketed_prefix_only(Some("[Link]")));
        assert!(!is_bracketed_prefix_only(Some("[]")));
    }

    #[test]
    fn test_local_user_message() {
        let message = Message::new("hi", Some(Person::local_user()), 0);
        assert!(message.is_from_local_user());
        assert!(!Message::new("hi", None, 0).is_from_local_user());
    }
}
