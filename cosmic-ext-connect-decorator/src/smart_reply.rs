//! Canned reply choices for questions

use crate::message::Message;

const REPLIES_FOR_QUESTION_ZH: &[&str] = &["👌", "好", "对", "没问题"];
const REPLIES_FOR_QUESTION_EN: &[&str] = &["👌", "OK", "Ye"];

/// Offer canned answers if the last message is a question
///
/// A full-width question mark picks the Chinese set.
pub fn generate_choices(messages: &[Message]) -> Vec<String> {
    let Some(last) = messages.last() else {
        return Vec::new();
    };
    let choices = if last.text.contains('？') {
        REPLIES_FOR_QUESTION_ZH
    } else if last.text.contains('?') {
        REPLIES_FOR_QUESTION_EN
    } else {
        return Vec::new();
    };
    choices.iter().map(|choice| choice.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choices_for_questions() {
        let messages = [Message::new("Lunch?", None, 0)];
        assert_eq!(generate_choices(&messages), ["👌", "OK", "Ye"]);

        let messages = [Message::new("Hi", None, 0), Message::new("吃饭了吗？", None, 0)];
        assert_eq!(generate_choices(&messages), ["👌", "好", "对", "没问题"]);
    }

    #[test]
    fn test_only_last_message_counts() {
        let messages = [Message::new("Lunch?", None, 0), Message::new("Never mind", None, 0)];
        assert!(generate_choices(&messages).is_empty());
        assert!(generate_choices(&[]).is_empty());
    }
}
