use super::{is_stop_word, Document, Token};
use crate::heuristics::Vocabulary;
use unicode_segmentation::UnicodeSegmentation;

/// Reference tokenizer splitting on Unicode word boundaries (UAX #29).
///
/// Runs of horizontal whitespace separate tokens and are dropped; whitespace
/// containing a line break is kept as a space token. Every non-whitespace
/// segment becomes its own token, so `test.` yields `test` and `.`.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    vocabulary: Option<Vocabulary>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark tokens whose text is missing from `vocabulary` as out of
    /// vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    pub fn tokenize(&self, text: &str) -> Document {
        let tokens = text
            .split_word_bound_indices()
            .filter(|(_, segment)| !is_horizontal_space(segment))
            .map(|(start, segment)| {
                let token = Token::new(segment, start).with_stop(is_stop_word(segment));
                match &self.vocabulary {
                    Some(vocabulary) if !token.is_space => {
                        let is_oov = !vocabulary.contains(segment);
                        token.with_oov(is_oov)
                    }
                    Some(_) => token.with_oov(false),
                    None => token,
                }
            })
            .collect();

        // Word bound segments are ordered and lie on char boundaries.
        Document::from_parts(text.to_string(), tokens)
    }
}

/// Tokenize `text` with the default [`Tokenizer`].
pub fn create_document_from_string(text: &str) -> Document {
    Tokenizer::new().tokenize(text)
}

fn is_horizontal_space(segment: &str) -> bool {
    segment
        .chars()
        .all(|c| c.is_whitespace() && c != '\n' && c != '\r')
}
