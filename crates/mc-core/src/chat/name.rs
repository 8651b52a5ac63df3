//! Spotting a self-introduction in a user message

/// Phrases that introduce a name, and whether the name must be capitalized
/// to count ("I am tired" is not an introduction).
const INTRODUCTIONS: &[(&str, bool)] = &[
    ("my name is", false),
    ("i'm", true),
    ("i\u{2019}m", true),
    ("i am", true),
];

/// Pull a name out of "my name is X", "I'm X" or "I am X".
///
/// Only English phrasings are recognized. Surrounding punctuation is
/// stripped from the name.
pub fn extract_name(message: &str) -> Option<String> {
    // ASCII lowering keeps byte offsets aligned with `message`
    let lower = message.to_ascii_lowercase();

    for (phrase, needs_capital) in INTRODUCTIONS {
        for (start, _) in lower.match_indices(phrase) {
            if !starts_word(&lower, start) {
                continue;
            }

            let rest = &message[start + phrase.len()..];
            if !rest.starts_with(char::is_whitespace) {
                continue;
            }

            let Some(name) = rest.split_whitespace().next().map(strip_punctuation) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            if *needs_capital && !name.starts_with(char::is_uppercase) {
                continue;
            }
            return Some(name.to_string());
        }
    }

    None
}

fn starts_word(text: &str, index: usize) -> bool {
    text[..index]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_alphanumeric())
}

fn strip_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
        .trim_matches('\'')
}
