//! Emoji Marker Translator
//!
//! The chat app renders its built-in emoji as bracketed textual markers in
//! notification text, e.g. `[Smile]` or `[微笑]`. This module rewrites the
//! markers it recognizes into real emoji characters and leaves everything
//! else untouched.
//!
//! ## Matching Rules
//!
//! - Find the next `]`, then the nearest `[` before it with at least one
//!   character in between.
//! - Markers starting with a Latin capital letter are looked up in the English
//!   table, all others in the Chinese table.
//! - Unrecognized bracketed text is kept verbatim and the scan moves on to the
//!   next `]` without consuming the unmatched `[`.
//! - Output is never re-scanned, so translation is idempotent.
//!
//! ## Example
//!
//! ```rust
//! use cosmic_ext_connect_decorator::emoji;
//!
//! assert_eq!(emoji::translate("Left[Smile] Right"), "Left😃 Right");
//! assert_eq!(emoji::translate("[NotEmoji]"), "[NotEmoji]");
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::trace;

use crate::emoji_map::EMOJI_MAP;

struct MarkerTables {
    chinese: HashMap<&'static str, &'static str>,
    english: HashMap<&'static str, &'static str>,
}

static TABLES: LazyLock<MarkerTables> = LazyLock::new(|| {
    let mut chinese = HashMap::with_capacity(EMOJI_MAP.len());
    let mut english = HashMap::with_capacity(EMOJI_MAP.len());
    for (zh, en, emoji) in EMOJI_MAP {
        if let Some(zh) = zh {
            chinese.insert(*zh, *emoji);
        }
        if let Some(en) = en {
            english.insert(*en, *emoji);
        }
    }
    MarkerTables { chinese, english }
});

/// Look up the emoji for a marker (without brackets)
pub fn lookup(marker: &str) -> Option<&'static str> {
    let first = marker.chars().next()?;
    let table = if first.is_ascii_uppercase() {
        &TABLES.english
    } else {
        &TABLES.chinese
    };
    table.get(marker).copied()
}

/// Translate all recognized emoji markers in `text`
///
/// Returns the input unchanged (borrowed) when nothing was replaced.
pub fn translate(text: &str) -> Cow<'_, str> {
    let mut translated: Option<String> = None;
    // Everything before `copied` is final, either copied into `translated` or
    // consumed by a replacement.
    let mut copied = 0;
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find(']') {
        let end = search_from + offset;
        search_from = end + 1;
        if end < copied + 2 {
            continue;
        }

        let mut start = text[copied..end].rfind('[').map(|i| i + copied);
        if start == Some(end - 1) {
            // Empty marker "[]", look further back.
            start = text[copied..end - 1].rfind('[').map(|i| i + copied);
        }
        let Some(start) = start else {
            continue;
        };

        let marker = &text[start + 1..end];
        match lookup(marker) {
            Some(emoji) => {
                let buffer = translated.get_or_insert_with(|| String::with_capacity(text.len()));
                buffer.push_str(&text[copied..start]);
                buffer.push_str(emoji);
                copied = end + 1;
            }
            None => trace!("Not translated [{}]", marker),
        }
    }

    match translated {
        Some(mut buffer) => {
            buffer.push_str(&text[copied..]);
            Cow::Owned(buffer)
        }
        None => Cow::Borrowed(text),
    }
}
