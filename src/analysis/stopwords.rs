/// The set of common words dropped from query/index token streams after
/// tokenization. Matches are case-insensitive; callers pass already-lowercase
/// tokens.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "this", "they", "but",
    "have", "had", "what", "when", "where", "who", "which", "why", "how",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Removes stop words from `tokens`, optionally extended with caller-supplied
/// additions (per `Config::indexing.stop_words`).
pub fn filter_stop_words<'a>(tokens: impl IntoIterator<Item = &'a str>, extra: &[String]) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| !is_stop_word(t) && !extra.iter().any(|e| e == t))
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_stop_words() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("which"));
        assert!(!is_stop_word("rust"));
    }

    #[test]
    fn filter_drops_stop_words_and_extras() {
        let tokens = vec!["the", "rust", "engine", "foo"];
        let extra = vec!["foo".to_string()];
        let filtered = filter_stop_words(tokens, &extra);
        assert_eq!(filtered, vec!["rust", "engine"]);
    }
}
