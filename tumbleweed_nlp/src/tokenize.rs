// Word tokenizer.
//
// Splits text into word tokens on any non-alphanumeric boundary, keeping
// apostrophes inside words ("ain't", "don't"). Case is preserved; callers
// that need case-insensitive behavior lowercase the tokens themselves.

/// Split `text` into word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '\'' {
            current.push(ch);
        } else if !current.is_empty() {
            push_token(&mut tokens, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        push_token(&mut tokens, current);
    }

    tokens
}

/// Strip stray edge apostrophes (quoting artifacts) before keeping a token.
fn push_token(tokens: &mut Vec<String>, raw: String) {
    let trimmed = raw.trim_matches('\'');
    if !trimmed.is_empty() {
        tokens.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        assert_eq!(
            tokenize("cold beer on a friday night"),
            vec!["cold", "beer", "on", "a", "friday", "night"]
        );
    }

    #[test]
    fn test_punctuation_dropped() {
        assert_eq!(
            tokenize("whiskey, beer -- and wine!"),
            vec!["whiskey", "beer", "and", "wine"]
        );
    }

    #[test]
    fn test_inner_apostrophe_kept() {
        assert_eq!(tokenize("she don't care"), vec!["she", "don't", "care"]);
    }

    #[test]
    fn test_edge_apostrophes_stripped() {
        assert_eq!(tokenize("'round the fire'"), vec!["round", "the", "fire"]);
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(tokenize("Friday Night"), vec!["Friday", "Night"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ...  ").is_empty());
    }
}
