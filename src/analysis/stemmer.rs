/// Words exempt from stemming because the naive suffix rules below would
/// otherwise mutilate them.
const EXCEPTIONS: &[&str] = &[
    "this", "his", "is", "was", "has", "does", "series", "species", "test",
];

/// A light, rule-based stemmer: not a full Porter/Snowball implementation,
/// just the handful of suffix rules needed to fold common gerund, past-tense,
/// and plural forms onto a shared root.
pub fn stem(word: &str) -> String {
    if EXCEPTIONS.contains(&word) || word.len() <= 3 {
        return word.to_string();
    }

    if let Some(stripped) = word.strip_suffix("est") {
        if stripped.len() > 2 {
            return stripped.to_string();
        }
    }

    if let Some(stripped) = word.strip_suffix("er") {
        if stripped.len() > 2 {
            return stripped.to_string();
        }
    }

    if let Some(stripped) = word.strip_suffix("ing") {
        return destem_gerund(stripped);
    }

    if let Some(stripped) = word.strip_suffix("ied") {
        return format!("{stripped}y");
    }

    if let Some(stripped) = word.strip_suffix("ed") {
        return destem_past(stripped);
    }

    if let Some(stripped) = word.strip_suffix("ies") {
        return format!("{stripped}y");
    }

    if let Some(stripped) = word.strip_suffix("es") {
        if ends_with_sibilant(stripped) {
            return stripped.to_string();
        }
    }

    if let Some(stripped) = word.strip_suffix('s') {
        if !stripped.ends_with('s') && stripped.len() > 2 {
            return stripped.to_string();
        }
    }

    word.to_string()
}

fn destem_gerund(stem: &str) -> String {
    if stem.len() >= 2 {
        let bytes = stem.as_bytes();
        let last = bytes[bytes.len() - 1];
        let second_last = bytes[bytes.len() - 2];
        if last == second_last && last.is_ascii_alphabetic() && !matches!(last, b'l' | b's' | b'z') {
            return stem[..stem.len() - 1].to_string();
        }
    }
    if stem.is_empty() {
        return stem.to_string();
    }
    stem.to_string()
}

fn destem_past(stem: &str) -> String {
    if stem.len() >= 2 {
        let bytes = stem.as_bytes();
        let last = bytes[bytes.len() - 1];
        let second_last = bytes[bytes.len() - 2];
        if last == second_last && last.is_ascii_alphabetic() && !matches!(last, b'l' | b's' | b'z') {
            return stem[..stem.len() - 1].to_string();
        }
    }
    stem.to_string()
}

fn ends_with_sibilant(s: &str) -> bool {
    s.ends_with('s')
        || s.ends_with('x')
        || s.ends_with('z')
        || s.ends_with("ch")
        || s.ends_with("sh")
}

/// Applies `stem` across a token stream.
pub fn stem_tokens(tokens: impl IntoIterator<Item = String>) -> Vec<String> {
    tokens.into_iter().map(|t| stem(&t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exceptions_pass_through() {
        assert_eq!(stem("this"), "this");
        assert_eq!(stem("series"), "series");
        assert_eq!(stem("test"), "test");
    }

    #[test]
    fn tests_folds_onto_the_plural_rule() {
        assert_eq!(stem("tests"), "test");
    }

    #[test]
    fn strips_gerund_suffix() {
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("jumping"), "jump");
    }

    #[test]
    fn strips_past_tense_suffix() {
        assert_eq!(stem("stopped"), "stop");
        assert_eq!(stem("walked"), "walk");
    }

    #[test]
    fn strips_plural_suffix() {
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("boxes"), "box");
    }

    #[test]
    fn strips_comparative_superlative_suffix() {
        assert_eq!(stem("fastest"), "fast");
        assert_eq!(stem("faster"), "fast");
    }
}
