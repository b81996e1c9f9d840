use serde::{Deserialize, Serialize};

/// A single token of a document.
///
/// Offsets are half-open byte offsets into the text of the owning
/// [`Document`](super::Document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub start_char: usize,
    pub end_char: usize,
    pub is_punct: bool,
    pub is_space: bool,
    pub is_stop: bool,
    /// `None` when the producing pipeline has no vocabulary.
    #[serde(default)]
    pub is_oov: Option<bool>,
}

impl Token {
    /// Create a token at `start_char`, classifying punctuation and whitespace
    /// from its text. Stop-word and vocabulary flags start unset.
    pub fn new(text: &str, start_char: usize) -> Self {
        Token {
            text: text.to_string(),
            start_char,
            end_char: start_char + text.len(),
            is_punct: is_punct(text),
            is_space: !text.is_empty() && text.chars().all(char::is_whitespace),
            is_stop: false,
            is_oov: None,
        }
    }

    pub fn with_stop(mut self, is_stop: bool) -> Self {
        self.is_stop = is_stop;
        self
    }

    pub fn with_oov(mut self, is_oov: bool) -> Self {
        self.is_oov = Some(is_oov);
        self
    }

    /// Byte length of the token.
    pub fn len(&self) -> usize {
        self.end_char - self.start_char
    }

    pub fn is_empty(&self) -> bool {
        self.start_char == self.end_char
    }

    /// Neither whitespace nor punctuation.
    pub fn is_word(&self) -> bool {
        !(self.is_space || self.is_punct)
    }

    pub fn contains_alpha(&self) -> bool {
        self.text.chars().any(char::is_alphabetic)
    }
}

fn is_punct(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_token_kinds() {
        let word = Token::new("test", 10);
        assert_eq!(word.end_char, 14);
        assert!(word.is_word());
        assert!(word.contains_alpha());

        let punct = Token::new("#", 0);
        assert!(punct.is_punct);
        assert!(!punct.is_word());

        let space = Token::new("\n", 3);
        assert!(space.is_space);
        assert!(!space.is_punct);

        let number = Token::new("12355", 0);
        assert!(number.is_word());
        assert!(!number.contains_alpha());
    }
}
