//! Simple per-span heuristics: token statistics, line markers, and
//! vocabulary coverage.

use crate::error::{QualityError, QualityResult};
use crate::span::TextSpan;
use std::collections::HashSet;
use std::path::Path;

/// Number of stop-word tokens.
pub fn n_stop_words<S: TextSpan + ?Sized>(span: &S) -> usize {
    span.tokens().iter().filter(|t| t.is_stop).count()
}

/// Share of tokens containing at least one alphabetic character.
pub fn alpha_ratio<S: TextSpan + ?Sized>(span: &S) -> f64 {
    let tokens = span.tokens();
    if tokens.is_empty() {
        return 0.0;
    }
    let alpha = tokens.iter().filter(|t| t.contains_alpha()).count();
    alpha as f64 / tokens.len() as f64
}

/// Mean token length in characters, punctuation tokens included.
pub fn mean_word_length<S: TextSpan + ?Sized>(span: &S) -> f64 {
    let tokens = span.tokens();
    if tokens.is_empty() {
        return 0.0;
    }
    let total: usize = tokens.iter().map(|t| t.text.chars().count()).sum();
    total as f64 / tokens.len() as f64
}

/// Number of tokens.
pub fn doc_length<S: TextSpan + ?Sized>(span: &S) -> usize {
    span.tokens().len()
}

fn proportion_of_lines<S, F>(span: &S, mut predicate: F) -> f64
where
    S: TextSpan + ?Sized,
    F: FnMut(&str) -> bool,
{
    let lines = span.lines();
    if lines.is_empty() {
        return 0.0;
    }
    let matching = lines.iter().filter(|line| predicate(line.trim())).count();
    matching as f64 / lines.len() as f64
}

/// Share of lines starting with one of `bullets` once trimmed.
pub fn proportion_bullet_points<S, B>(span: &S, bullets: &[B]) -> f64
where
    S: TextSpan + ?Sized,
    B: AsRef<str>,
{
    proportion_of_lines(span, |line| {
        bullets.iter().any(|bullet| line.starts_with(bullet.as_ref()))
    })
}

/// Share of lines ending with one of `ellipses` once trimmed.
pub fn proportion_ellipsis<S, E>(span: &S, ellipses: &[E]) -> f64
where
    S: TextSpan + ?Sized,
    E: AsRef<str>,
{
    proportion_of_lines(span, |line| {
        ellipses.iter().any(|ellipsis| line.ends_with(ellipsis.as_ref()))
    })
}

/// Non-overlapping occurrences of `symbol` per word token.
pub fn symbol_to_word_ratio<S: TextSpan + ?Sized>(span: &S, symbol: &str) -> f64 {
    let n_words = span.tokens().iter().filter(|t| t.is_word()).count();
    if n_words == 0 || symbol.is_empty() {
        return 0.0;
    }
    span.text().matches(symbol).count() as f64 / n_words as f64
}

pub fn contains_string<S: TextSpan + ?Sized>(span: &S, needle: &str) -> bool {
    span.text().contains(needle)
}

/// A set of known words for the out-of-vocabulary ratio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: HashSet<String>,
}

impl Vocabulary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Vocabulary {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Read a vocabulary with one word per line. Blank lines are skipped.
    pub fn load(path: impl AsRef<Path>) -> QualityResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| QualityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let vocabulary = Vocabulary::from_words(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        );
        tracing::debug!(path = %path.display(), words = vocabulary.len(), "loaded vocabulary");
        Ok(vocabulary)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Share of tokens that are out of vocabulary.
///
/// With a `vocabulary`, tokens whose text it lacks count as out of
/// vocabulary. Without one, the tokens' own `is_oov` flags are used when
/// every token carries one. Otherwise the ratio is unavailable.
pub fn oov_ratio<S: TextSpan + ?Sized>(span: &S, vocabulary: Option<&Vocabulary>) -> Option<f64> {
    let tokens = span.tokens();
    match vocabulary {
        Some(_) if tokens.is_empty() => Some(0.0),
        Some(vocabulary) => {
            let oov = tokens.iter().filter(|t| !vocabulary.contains(&t.text)).count();
            Some(oov as f64 / tokens.len() as f64)
        }
        None if tokens.is_empty() => None,
        None => {
            let flags: Option<Vec<bool>> = tokens.iter().map(|t| t.is_oov).collect();
            let flags = flags?;
            let oov = flags.iter().filter(|&&is_oov| is_oov).count();
            Some(oov as f64 / tokens.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_document_from_string, Tokenizer};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn stop_words() {
        let doc = create_document_from_string("This is a test.");
        assert_eq!(n_stop_words(&doc), 3);
        let doc = create_document_from_string("This is not a test, it is a sentence.");
        assert_eq!(n_stop_words(&doc), 7);
        assert_eq!(n_stop_words(&create_document_from_string("")), 0);
    }

    #[test]
    fn mean_word_length_counts_punctuation() {
        let doc = create_document_from_string("This is a test.");
        assert!(close(mean_word_length(&doc), 2.4));
        let doc = create_document_from_string("ab abc abcd");
        assert!(close(mean_word_length(&doc), 3.0));
        assert_eq!(mean_word_length(&create_document_from_string("")), 0.0);
        let doc = create_document_from_string("été");
        assert_eq!(mean_word_length(&doc), 3.0);
    }

    #[test]
    fn alpha_ratio_per_token() {
        assert!(close(alpha_ratio(&create_document_from_string("This is a test.")), 0.8));
        assert_eq!(alpha_ratio(&create_document_from_string("12355 12.345")), 0.0);
        assert_eq!(alpha_ratio(&create_document_from_string("")), 0.0);
    }

    #[test]
    fn doc_length_counts_tokens() {
        assert_eq!(doc_length(&create_document_from_string("This is a test.")), 5);
        assert_eq!(doc_length(&create_document_from_string("")), 0);
    }

    #[test]
    fn bullet_points() {
        let bullets = ["-", "*"];
        let cases = [
            ("- list item 1\n- list item 2\n- list item 3", 1.0),
            ("- list item 1\n* list item 2\nno bullet", 2.0 / 3.0),
            ("no bullets here", 0.0),
            ("  - indented bullet", 1.0),
        ];
        for (text, expected) in cases {
            let doc = create_document_from_string(text);
            assert!(close(proportion_bullet_points(&doc, &bullets), expected), "{:?}", text);
        }
    }

    #[test]
    fn ellipsis() {
        let ellipses = ["…", "..."];
        let cases = [
            ("This is a line...", 1.0),
            ("First line…\nSecond line.", 0.5),
            ("No ellipsis.", 0.0),
            ("trailing ...   ", 1.0),
        ];
        for (text, expected) in cases {
            let doc = create_document_from_string(text);
            assert!(close(proportion_ellipsis(&doc, &ellipses), expected), "{:?}", text);
        }
    }

    #[test]
    fn symbol_ratio() {
        let doc = create_document_from_string("#hashtag #another #third word");
        assert!(close(symbol_to_word_ratio(&doc, "#"), 0.75));
        let doc = create_document_from_string("No symbols");
        assert_eq!(symbol_to_word_ratio(&doc, "#"), 0.0);
        let doc = create_document_from_string("# # #");
        assert_eq!(symbol_to_word_ratio(&doc, "#"), 0.0);
    }

    #[test]
    fn contains() {
        let doc = create_document_from_string("Lorem ipsum dolor, lorem ipsum");
        assert!(contains_string(&doc, "lorem ipsum"));
        assert!(!contains_string(&doc, "dolor sit"));
    }

    #[test]
    fn oov_with_vocabulary() {
        let vocabulary = Vocabulary::from_words(vec!["This", "is", "a", "test", "."]);
        let doc = create_document_from_string("This is a nonwrod.");
        assert_eq!(oov_ratio(&doc, Some(&vocabulary)), Some(0.2));
        let empty = create_document_from_string("");
        assert_eq!(oov_ratio(&empty, Some(&vocabulary)), Some(0.0));
    }

    #[test]
    fn oov_from_token_flags() {
        let doc = Tokenizer::new()
            .with_vocabulary(Vocabulary::from_words(vec!["This", "is", "a"]))
            .tokenize("This is a nonwrod");
        assert_eq!(oov_ratio(&doc, None), Some(0.25));
    }

    #[test]
    fn oov_unavailable_without_vocabulary() {
        let doc = create_document_from_string("This is a test.");
        assert_eq!(oov_ratio(&doc, None), None);
        assert_eq!(oov_ratio(&create_document_from_string(""), None), None);
    }

    #[test]
    fn load_vocabulary() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "This\nis\n\n a \ntest").unwrap();
        let vocabulary = Vocabulary::load(file.path()).unwrap();
        assert_eq!(vocabulary.len(), 4);
        assert!(vocabulary.contains("a"));
        assert!(!vocabulary.contains(""));

        let err = Vocabulary::load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, QualityError::Io { .. }));
    }
}
