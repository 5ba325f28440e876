//! History Assembler
//!
//! Produces the ordered message list of a conversation from one of two
//! sources, tried in order:
//!
//! 1. **Rich payload**: every payload line is split into sender and body. For
//!    non-group chats the line matching the basic-field message marks the end
//!    of what the peer sent; anything after it was sent by the local user.
//! 2. **Retained notifications**: previously posted notifications with the
//!    same title are scanned, their unread counters stripped, and stitched
//!    into one list ordered by timestamp. Entries sharing a timestamp are
//!    repeated deliveries of the same message; the last one wins.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::conversation::{Conversation, Person};
use crate::emoji;
use crate::error::{DecoratorError, Result};
use crate::message::{
    parse_leading_counter, split_sender, BasicMessage, Message, SENDER_MESSAGE_SEPARATOR,
};
use crate::notification::{PayloadLine, RetainedNotification};

/// Who a line of text is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribution<'a> {
    /// The local user
    LocalUser,
    /// The conversation peer (non-group), or no sender at all (group)
    Conversation,
    /// A group participant, keyed by sender with a display nick
    Participant { key: &'a str, nick: &'a str },
}

fn resolve_person(conversation: &mut Conversation, attribution: Attribution<'_>) -> Option<Person> {
    match attribution {
        Attribution::LocalUser => Some(Person::local_user()),
        Attribution::Conversation => None,
        Attribution::Participant { key, nick } => conversation.group_participant(key, nick),
    }
}

/// Build messages from the rich payload lines
///
/// Falls back to the basic-field message when the payload has no lines.
pub fn from_payload(
    conversation: &mut Conversation,
    lines: &[PayloadLine],
    basic: &BasicMessage<'_>,
) -> Vec<Message> {
    if lines.is_empty() {
        debug!("Empty payload, using basic fields");
        return vec![from_basic_fields(conversation, basic)];
    }

    let title = conversation.title.clone().unwrap_or_default();
    let is_group = conversation.is_group_chat();

    // Lines after the one matching the basic fields were sent by the local user.
    let end_of_peers = if is_group {
        None
    } else {
        lines.iter().rposition(|line| line.text == basic.text)
    };

    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let from_self = end_of_peers.is_some_and(|end| index > end);
            let (text, attribution) = if from_self {
                (line.text.as_str(), Attribution::LocalUser)
            } else {
                attribute_payload_line(line, &title, is_group)
            };

            let sender = resolve_person(conversation, attribution);
            Message::new(
                emoji::translate(text),
                sender,
                line.timestamp_ms.unwrap_or(0),
            )
        })
        .collect()
}

fn attribute_payload_line<'a>(
    line: &'a PayloadLine,
    title: &str,
    is_group: bool,
) -> (&'a str, Attribution<'a>) {
    let (sender, body) = match line.author.as_deref() {
        Some("") => return (line.text.as_str(), Attribution::LocalUser),
        Some(author) => (Some(author), line.text.as_str()),
        None => split_sender(&line.text),
    };
    let explicit = line.author.is_some();

    match sender {
        // The app labels self-sent messages in group chats with the group title.
        Some(sender) if is_group && sender == title => (body, Attribution::LocalUser),
        Some(sender) if is_group => (
            body,
            Attribution::Participant {
                key: sender,
                nick: sender,
            },
        ),
        Some(sender) if explicit || sender == title => (body, Attribution::Conversation),
        // Not really a sender for non-group chats, keep the whole line.
        _ => (line.text.as_str(), Attribution::Conversation),
    }
}

fn from_basic_fields(conversation: &mut Conversation, basic: &BasicMessage<'_>) -> Message {
    let attribution = match basic.sender {
        Some(sender) if conversation.is_group_chat() => Attribution::Participant {
            key: sender,
            nick: sender,
        },
        _ => Attribution::Conversation,
    };
    let sender = resolve_person(conversation, attribution);
    Message::new(
        emoji::translate(basic.text),
        sender,
        conversation.timestamp_ms,
    )
}

/// Messages stitched from retained notifications
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveHistory {
    pub messages: Vec<Message>,
    /// Unread count of the last scanned entry
    pub unread_count: u32,
}

#[derive(Debug)]
struct ArchivedLine<'a> {
    text: &'a str,
    ticker: Option<&'a str>,
    has_inline_sender: bool,
}

/// Build messages by scanning retained notifications of the same title
///
/// Only the newest `max_lines` lines are kept. `event_ticker` supplies the
/// group nick for entries that carry no ticker of their own.
pub fn from_archive(
    conversation: &mut Conversation,
    title: &str,
    event_ticker: &str,
    retained: &[RetainedNotification],
    max_lines: usize,
) -> Result<ArchiveHistory> {
    let display_title = emoji::translate(title);
    let redundant_prefix = format!("{}{}", title, SENDER_MESSAGE_SEPARATOR);

    let mut lines: BTreeMap<i64, ArchivedLine<'_>> = BTreeMap::new();
    let mut unread_count = 0;
    for entry in retained {
        let its_title = entry.title.as_deref().unwrap_or_default();
        if emoji::translate(its_title) != display_title {
            // Id recycled by the app for another conversation
            debug!("Skip other conversation with the same key: {}", its_title);
            continue;
        }
        let Some(text) = entry.summary.as_deref() else {
            warn!("No text in retained notification of {}", title);
            continue;
        };

        let text = match parse_leading_counter(text) {
            Some(counter) => {
                unread_count = counter.count();
                counter.strip(text)
            }
            None => {
                unread_count = 1;
                text
            }
        };
        let (text, has_inline_sender) = match text.strip_prefix(redundant_prefix.as_str()) {
            Some(stripped) => (stripped, false),
            None => (text, matches!(split_sender(text), (Some(_), _))),
        };

        lines.insert(
            entry.timestamp_ms,
            ArchivedLine {
                text,
                ticker: entry.ticker.as_deref(),
                has_inline_sender,
            },
        );
    }

    let skip = lines.len().saturating_sub(max_lines);
    let kept: Vec<(i64, ArchivedLine<'_>)> = lines.into_iter().skip(skip).collect();
    if kept.is_empty() {
        warn!("No lines extracted, expected {}", unread_count);
        return Err(DecoratorError::NoHistoryExtracted {
            title: title.to_string(),
        });
    }

    let sender_inline = kept.iter().all(|(_, line)| line.has_inline_sender);
    let messages = kept
        .iter()
        .map(|(timestamp, line)| {
            let fallback_sender = (!sender_inline).then_some(title);
            archived_message(conversation, title, *timestamp, line, event_ticker, fallback_sender)
        })
        .collect();

    Ok(ArchiveHistory {
        messages,
        unread_count,
    })
}

fn archived_message(
    conversation: &mut Conversation,
    title: &str,
    timestamp_ms: i64,
    line: &ArchivedLine<'_>,
    event_ticker: &str,
    fallback_sender: Option<&str>,
) -> Message {
    let (sender, text) = match fallback_sender {
        Some(sender) => (Some(sender), line.text),
        None => split_sender(line.text),
    };

    let attribution = match sender {
        // Inline sender equal to the title is the local user in group chats.
        Some(sender) if fallback_sender.is_none() && sender == title => {
            if conversation.is_group_chat() {
                Attribution::LocalUser
            } else {
                Attribution::Conversation
            }
        }
        Some(sender) if conversation.is_group_chat() => {
            // Group nick is used in the ticker, the original nick in the text.
            let ticker = line.ticker.unwrap_or(event_ticker);
            let nick = split_sender(ticker).0.unwrap_or(sender);
            Attribution::Participant { key: sender, nick }
        }
        _ => Attribution::Conversation,
    };

    let sender = resolve_person(conversation, attribution);
    Message::new(emoji::translate(text), sender, timestamp_ms)
}
