/// Lowercases `text`, replaces every character outside `[A-Za-z0-9_]` with
/// whitespace, splits on whitespace, and drops empty pieces. Unicode letters
/// beyond ASCII are preserved as-is rather than normalized away.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_lowercases() {
        assert_eq!(
            tokenize("Hello, World! foo_bar"),
            vec!["hello", "world", "foo_bar"]
        );
    }

    #[test]
    fn drops_empty_pieces() {
        assert_eq!(tokenize("  a   b  "), vec!["a", "b"]);
    }

    #[test]
    fn preserves_non_ascii_letters() {
        assert_eq!(tokenize("café"), vec!["café"]);
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
