use crate::analysis::stemmer::stem;
use crate::analysis::stopwords::is_stop_word;
use crate::analysis::tokenizer::tokenize;

/// The role a raw query token plays once classified. Deliberately not a
/// boolean query AST: operators and field modifiers are recognized and
/// carried through, but never combined into a tree of clauses.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryToken {
    Term(String),
    Phrase(String),
    Required(String),
    Excluded(String),
    Negated(String),
    Field { name: String, value: String },
}

/// Tokenizes, classifies, filters, and lightly stems a raw query string into
/// the token stream the engine's search operation consumes.
#[derive(Debug, Default)]
pub struct QueryProcessor;

impl QueryProcessor {
    pub fn new() -> Self {
        QueryProcessor
    }

    pub fn process(&self, raw_query: &str) -> Vec<QueryToken> {
        let sanitized = sanitize(raw_query);
        if sanitized.is_empty() {
            return Vec::new();
        }

        let (phrases, remainder) = extract_phrases(&sanitized);

        let mut tokens: Vec<QueryToken> = Vec::new();
        for phrase in phrases {
            tokens.push(QueryToken::Phrase(phrase));
        }

        for word in remainder.split_whitespace() {
            if let Some(classified) = classify_word(word) {
                tokens.push(classified);
            }
        }

        tokens
            .into_iter()
            .filter(|t| !is_filtered_stop_word(t))
            .map(stem_token)
            .collect()
    }
}

fn sanitize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pulls out every `"..."` span, including nested quote characters inside a
/// span (treated as literal text, not a new span boundary). Returns the
/// phrases found and the remaining text with those spans removed.
fn extract_phrases(text: &str) -> (Vec<String>, String) {
    let mut phrases = Vec::new();
    let mut remainder = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            let mut phrase = String::new();
            for next in chars.by_ref() {
                if next == '"' {
                    break;
                }
                phrase.push(next);
            }
            if !phrase.trim().is_empty() {
                phrases.push(phrase.trim().to_string());
            }
        } else {
            remainder.push(c);
        }
    }

    (phrases, remainder)
}

fn classify_word(word: &str) -> Option<QueryToken> {
    if let Some(field_value) = word.split_once(':') {
        let (name, value) = field_value;
        if !name.is_empty() && !value.is_empty() {
            return Some(QueryToken::Field {
                name: name.to_lowercase(),
                value: value.to_lowercase(),
            });
        }
    }

    if let Some(term) = word.strip_prefix('+') {
        return non_empty_term(term).map(QueryToken::Required);
    }
    if let Some(term) = word.strip_prefix('-') {
        return non_empty_term(term).map(QueryToken::Excluded);
    }
    if let Some(term) = word.strip_prefix('!') {
        return non_empty_term(term).map(QueryToken::Negated);
    }

    let normalized = tokenize(word);
    normalized.into_iter().next().map(QueryToken::Term)
}

fn non_empty_term(word: &str) -> Option<String> {
    tokenize(word).into_iter().next()
}

fn is_filtered_stop_word(token: &QueryToken) -> bool {
    matches!(token, QueryToken::Term(term) if is_stop_word(term))
}

fn stem_token(token: QueryToken) -> QueryToken {
    match token {
        QueryToken::Term(t) => QueryToken::Term(stem(&t)),
        QueryToken::Required(t) => QueryToken::Required(stem(&t)),
        QueryToken::Excluded(t) => QueryToken::Excluded(stem(&t)),
        QueryToken::Negated(t) => QueryToken::Negated(stem(&t)),
        other => other,
    }
}
