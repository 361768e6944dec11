use std::collections::BTreeSet;

/// Shortest run of ASCII letters/digits that counts as a token.
pub const MIN_TOKEN_LEN: usize = 3;

/// Lexical tokenizer shared by ranking and query analysis.
///
/// Tokens are maximal runs of ASCII letters and digits, at least
/// [`MIN_TOKEN_LEN`] long, taken from the lowercased text. Shorter runs and
/// everything else are dropped.
pub struct Tokenizer;

impl Tokenizer {
    /// Splits text into lowercase tokens, in order of appearance.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragdesk::retrieval::Tokenizer;
    ///
    /// assert_eq!(Tokenizer::tokenize("RC Pro: 3 metres!"), vec!["pro", "metres"]);
    /// assert!(Tokenizer::tokenize("a b c").is_empty());
    /// ```
    #[must_use]
    pub fn tokenize(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut tokens = Vec::new();
        let mut current = String::new();

        for c in lowered.chars() {
            if c.is_ascii_alphanumeric() {
                current.push(c);
            } else {
                flush(&mut current, &mut tokens);
            }
        }
        flush(&mut current, &mut tokens);

        tokens
    }

    /// Returns the distinct tokens of `text`.
    ///
    /// Repeated words collapse, so scoring counts distinct query terms.
    #[must_use]
    pub fn token_set(text: &str) -> BTreeSet<String> {
        Self::tokenize(text).into_iter().collect()
    }
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    // `current` only holds ASCII, so byte length is the character count.
    if current.len() >= MIN_TOKEN_LEN {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_tokens() {
        assert_eq!(Tokenizer::tokenize("RUST Rust rust"), vec!["rust", "rust", "rust"]);
    }

    #[test]
    fn test_drops_short_runs_entirely() {
        assert_eq!(Tokenizer::tokenize("rc pro"), vec!["pro"]);
        assert_eq!(Tokenizer::tokenize("ab 12 x"), Vec::<String>::new());
    }

    #[test]
    fn test_splits_on_non_alphanumeric() {
        assert_eq!(
            Tokenizer::tokenize("sous-traitance, non_declaree!"),
            vec!["sous", "traitance", "non", "declaree"]
        );
    }

    #[test]
    fn test_digits_are_token_characters() {
        assert_eq!(Tokenizer::tokenize("qwen2.5 v100"), vec!["qwen2", "v100"]);
    }

    #[test]
    fn test_non_ascii_letters_break_runs() {
        // 'é' is not an ASCII letter, so "résiliation" splits around it.
        assert_eq!(Tokenizer::tokenize("résiliation"), vec!["siliation"]);
    }

    #[test]
    fn test_empty_input_yields_no_tokens() {
        assert!(Tokenizer::tokenize("").is_empty());
        assert!(Tokenizer::tokenize("  ?! -- ").is_empty());
    }

    #[test]
    fn test_token_set_collapses_duplicates() {
        let set = Tokenizer::token_set("procedure Procedure PROCEDURE sinistre");
        let tokens: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(tokens, vec!["procedure", "sinistre"]);
    }
}
