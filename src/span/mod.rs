//! Tokenized documents and spans.
//!
//! The scoring functions only read through [`TextSpan`], so any tokenizer can
//! feed them. [`Document`] owns the text and tokens; [`Span`] borrows a
//! contiguous token range of it.

mod stop_words;
mod token;
mod tokenize;

pub use stop_words::is_stop_word;
pub use token::Token;
pub use tokenize::{create_document_from_string, Tokenizer};

use crate::error::{QualityError, QualityResult};
use std::ops::Range;

/// The read-only view the scoring functions need from a tokenized text.
pub trait TextSpan {
    /// Tokens in document order.
    fn tokens(&self) -> &[Token];

    /// The text covered by this span.
    fn text(&self) -> &str;

    /// Byte offset of [`text`](Self::text) in the token offset space.
    ///
    /// Token offsets index the owning document, so a sub-span subtracts this
    /// to slice its own text.
    fn text_offset(&self) -> usize {
        0
    }

    fn lines(&self) -> Vec<&str> {
        self.text().split('\n').collect()
    }

    fn paragraphs(&self) -> Vec<&str> {
        self.text().split("\n\n").collect()
    }

    /// Text of the tokens `start..end` (exclusive), including the whitespace
    /// between them.
    fn token_range_text(&self, start: usize, end: usize) -> &str {
        let tokens = self.tokens();
        if start >= end {
            return "";
        }
        let offset = self.text_offset();
        &self.text()[tokens[start].start_char - offset..tokens[end - 1].end_char - offset]
    }
}

/// Separators used to split a text into lines and paragraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub line_break: String,
    pub paragraph_break: String,
}

impl Default for Segmentation {
    fn default() -> Self {
        Segmentation {
            line_break: "\n".to_string(),
            paragraph_break: "\n\n".to_string(),
        }
    }
}

impl Segmentation {
    /// Windows-style `\r\n` separators.
    pub fn crlf() -> Self {
        Segmentation {
            line_break: "\r\n".to_string(),
            paragraph_break: "\r\n\r\n".to_string(),
        }
    }
}

/// A tokenized document.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    tokens: Vec<Token>,
    segmentation: Segmentation,
}

impl Document {
    /// Create a document from text and tokens produced by any pipeline.
    ///
    /// Tokens must be ordered, non-overlapping, and lie on char boundaries
    /// of `text`.
    pub fn new(text: impl Into<String>, tokens: Vec<Token>) -> QualityResult<Self> {
        let text = text.into();
        let mut previous_end = 0;
        for (index, token) in tokens.iter().enumerate() {
            let invalid = |reason: String| QualityError::InvalidToken { index, reason };
            if token.start_char > token.end_char {
                return Err(invalid(format!(
                    "start {} is after end {}",
                    token.start_char, token.end_char
                )));
            }
            if token.end_char > text.len() {
                return Err(invalid(format!(
                    "end {} is past the text length {}",
                    token.end_char,
                    text.len()
                )));
            }
            if !text.is_char_boundary(token.start_char) || !text.is_char_boundary(token.end_char)
            {
                return Err(invalid("offsets split a UTF-8 character".to_string()));
            }
            if token.start_char < previous_end {
                return Err(invalid(format!(
                    "starts at {} before the previous token ends at {}",
                    token.start_char, previous_end
                )));
            }
            previous_end = token.end_char;
        }

        Ok(Document::from_parts(text, tokens))
    }

    pub(crate) fn from_parts(text: String, tokens: Vec<Token>) -> Self {
        Document {
            text,
            tokens,
            segmentation: Segmentation::default(),
        }
    }

    /// Override how lines and paragraphs are split.
    pub fn with_segmentation(mut self, segmentation: Segmentation) -> Self {
        self.segmentation = segmentation;
        self
    }

    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// A span over the whole document, including leading and trailing
    /// whitespace.
    pub fn span(&self) -> Span<'_> {
        Span {
            doc: self,
            range: 0..self.tokens.len(),
            whole: true,
        }
    }

    /// A span over the tokens in `range`, or `None` if it is out of bounds.
    pub fn span_range(&self, range: Range<usize>) -> Option<Span<'_>> {
        if range.start > range.end || range.end > self.tokens.len() {
            return None;
        }
        Some(Span {
            doc: self,
            range,
            whole: false,
        })
    }
}

impl TextSpan for Document {
    fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn lines(&self) -> Vec<&str> {
        self.text.split(self.segmentation.line_break.as_str()).collect()
    }

    fn paragraphs(&self) -> Vec<&str> {
        self.text
            .split(self.segmentation.paragraph_break.as_str())
            .collect()
    }
}

/// A contiguous token range of a [`Document`].
#[derive(Debug, Clone)]
pub struct Span<'a> {
    doc: &'a Document,
    range: Range<usize>,
    whole: bool,
}

impl<'a> Span<'a> {
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Token indices of this span within its document.
    pub fn token_range(&self) -> Range<usize> {
        self.range.clone()
    }

    fn char_range(&self) -> Range<usize> {
        let tokens = &self.doc.tokens[self.range.clone()];
        if self.whole {
            0..self.doc.text.len()
        } else {
            match (tokens.first(), tokens.last()) {
                (Some(first), Some(last)) => first.start_char..last.end_char,
                _ => 0..0,
            }
        }
    }
}

impl<'a> TextSpan for Span<'a> {
    fn tokens(&self) -> &[Token] {
        &self.doc.tokens[self.range.clone()]
    }

    fn text(&self) -> &str {
        &self.doc.text[self.char_range()]
    }

    fn text_offset(&self) -> usize {
        self.char_range().start
    }

    fn lines(&self) -> Vec<&str> {
        self.text()
            .split(self.doc.segmentation.line_break.as_str())
            .collect()
    }

    fn paragraphs(&self) -> Vec<&str> {
        self.text()
            .split(self.doc.segmentation.paragraph_break.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_span_keeps_surrounding_whitespace() {
        let doc = create_document_from_string("  Hello there.  ");
        let span = doc.span();
        assert_eq!(span.text(), "  Hello there.  ");
        assert_eq!(span.tokens().len(), 3);
    }

    #[test]
    fn sub_span_text_follows_tokens() {
        let doc = create_document_from_string("This is a test. Another one.");
        let span = doc.span_range(1..4).unwrap();
        assert_eq!(span.text(), "is a test");
        assert_eq!(span.text_offset(), 5);
        assert_eq!(span.token_range_text(0, 2), "is a");
        assert_eq!(span.token_range_text(1, 3), "a test");
    }

    #[test]
    fn empty_sub_span_has_no_text() {
        let doc = create_document_from_string("Some words here");
        let span = doc.span_range(2..2).unwrap();
        assert_eq!(span.text(), "");
        assert!(span.tokens().is_empty());
        assert!(doc.span_range(2..9).is_none());
    }

    #[test]
    fn custom_segmentation() {
        let doc = create_document_from_string("a\r\nb\r\n\r\nc").with_segmentation(Segmentation::crlf());
        assert_eq!(doc.lines(), vec!["a", "b", "", "c"]);
        assert_eq!(doc.paragraphs(), vec!["a\r\nb", "c"]);
        assert_eq!(doc.span().lines(), vec!["a", "b", "", "c"]);
    }

    #[test]
    fn rejects_overlapping_tokens() {
        let tokens = vec![Token::new("abc", 0), Token::new("bc", 1)];
        let err = Document::new("abc", tokens).unwrap_err();
        assert!(matches!(err, QualityError::InvalidToken { index: 1, .. }));
    }

    #[test]
    fn rejects_out_of_bounds_tokens() {
        let err = Document::new("ab", vec![Token::new("abc", 0)]).unwrap_err();
        assert!(matches!(err, QualityError::InvalidToken { index: 0, .. }));
    }

    #[test]
    fn rejects_split_characters() {
        let mut token = Token::new("é", 0);
        token.end_char = 1;
        assert!(Document::new("é", vec![token]).is_err());
    }
}
