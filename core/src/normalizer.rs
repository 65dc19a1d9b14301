use crate::config::Language;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use rust_stemmers::Algorithm;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// ASCII and Latin-1 punctuation, currency and typographic symbols blanked out
/// in stage 3. `ß`, `ø` and `œ` belong to the set as well, as does U+00AD.
pub const PUNCTUATION: &str =
    ".,;:?=/\\!*&%$#(){}[]<>º\"'“”‘’—-_+‰±@|~£¥¨®°µ·½¿×ßø˜…€™¤´¡¦§©ª«»\u{ad}¯²³¶¸¼¾œƒˆ‡¬„¢†•‹›";

lazy_static! {
    static ref DIGITS: Regex = Regex::new(r"\d+").expect("valid regex");
    static ref SYMBOLS: Regex =
        Regex::new(&format!("[{}]", regex::escape(PUNCTUATION))).expect("valid regex");
    static ref NON_WORD: Regex = Regex::new(r"\W").expect("valid regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// Maps a token to its stem.
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Membership test against a stopword list.
pub trait StopwordFilter: Send + Sync {
    fn is_stopword(&self, token: &str) -> bool;
}

/// Snowball stemmer backed by `rust-stemmers`.
pub struct SnowballStemmer {
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { inner: rust_stemmers::Stemmer::create(algorithm) }
    }

    pub fn english() -> Self {
        Self::new(Algorithm::English)
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }
}

/// Leaves tokens untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Stopwords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { words: iter.into_iter().map(Into::into).collect() }
    }
}

impl StopwordFilter for Stopwords {
    fn is_stopword(&self, token: &str) -> bool {
        self.words.contains(token)
    }
}

/// Output of every pipeline stage for one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Tokens after character cleanup, lowercasing and splitting
    pub preprocessed: Vec<String>,
    /// `preprocessed` without stopwords
    pub filtered: Vec<String>,
    /// `filtered` after stemming; these are the index terms
    pub stemmed: Vec<String>,
}

/// Text normalization pipeline with pluggable stopword and stemming
/// capabilities.
pub struct Normalizer {
    stopwords: Box<dyn StopwordFilter>,
    stemmer: Box<dyn Stemmer>,
}

impl Normalizer {
    pub fn new(stopwords: impl StopwordFilter + 'static, stemmer: impl Stemmer + 'static) -> Self {
        Self { stopwords: Box::new(stopwords), stemmer: Box::new(stemmer) }
    }

    /// Snowball stemming for `language`, or no stemming for `Language::None`.
    pub fn for_language(stopwords: Stopwords, language: Language) -> Self {
        match language.algorithm() {
            Some(algorithm) => Self::new(stopwords, SnowballStemmer::new(algorithm)),
            None => Self::new(stopwords, IdentityStemmer),
        }
    }

    /// Run the whole pipeline, keeping each intermediate sequence.
    pub fn analyze(&self, text: &str) -> Analysis {
        let preprocessed = preprocess(text);
        let filtered: Vec<String> = preprocessed
            .iter()
            .filter(|token| !self.stopwords.is_stopword(token))
            .cloned()
            .collect();
        let stemmed = filtered.iter().map(|token| self.stemmer.stem(token)).collect();
        Analysis { preprocessed, filtered, stemmed }
    }

    /// Index terms for `text`. May be empty and may repeat terms.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        self.analyze(text).stemmed
    }

    /// Analyze many texts in parallel; output order follows input order.
    pub fn analyze_all<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Analysis> {
        texts.par_iter().map(|text| self.analyze(text.as_ref())).collect()
    }
}

/// Stages 1 to 8: character cleanup, case folding and splitting.
pub fn preprocess(text: &str) -> Vec<String> {
    let text = DIGITS.replace_all(text, " ");
    let text: String = text.nfd().filter(|c| !is_combining_diacritic(*c)).collect();
    let text = SYMBOLS.replace_all(&text, " ");
    let text = NON_WORD.replace_all(&text, " ");
    let text = drop_short_tokens(&text).to_lowercase();
    let text = WHITESPACE.replace_all(&text, " ");
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    text.split(' ').map(str::to_string).collect()
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Blank out every whitespace-delimited token of at most one character,
/// including tokens at either end and adjacent ones.
fn drop_short_tokens(text: &str) -> String {
    text.split(char::is_whitespace)
        .map(|token| if token.chars().count() <= 1 { "" } else { token })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(stopwords: &[&str]) -> Normalizer {
        Normalizer::new(stopwords.iter().copied().collect::<Stopwords>(), IdentityStemmer)
    }

    #[test]
    fn digits_become_separators() {
        assert_eq!(preprocess("abc123def 2024"), vec!["abc", "def"]);
    }

    #[test]
    fn diacritics_are_stripped() {
        assert_eq!(preprocess("Café naïve ação"), vec!["cafe", "naive", "acao"]);
    }

    #[test]
    fn punctuation_and_underscore_split_words() {
        assert_eq!(preprocess("snake_case, (quoted) «text»!"), vec!["snake", "case", "quoted", "text"]);
    }

    #[test]
    fn single_character_tokens_are_removed_everywhere() {
        assert_eq!(preprocess("a cat b c sat x"), vec!["cat", "sat"]);
        assert_eq!(preprocess("Don't stop"), vec!["don", "stop"]);
    }

    #[test]
    fn blank_text_has_no_tokens() {
        assert!(preprocess("").is_empty());
        assert!(preprocess("  42 . ! ").is_empty());
    }

    #[test]
    fn consecutive_stopwords_are_all_removed() {
        let n = plain(&["the", "of"]);
        let analysis = n.analyze("the the of cat the");
        assert_eq!(analysis.preprocessed, vec!["the", "the", "of", "cat", "the"]);
        assert_eq!(analysis.filtered, vec!["cat"]);
    }

    #[test]
    fn snowball_stemming_is_applied_last() {
        let n = Normalizer::new(["the"].into_iter().collect::<Stopwords>(), SnowballStemmer::english());
        let analysis = n.analyze("The runners were running");
        assert_eq!(analysis.filtered, vec!["runners", "were", "running"]);
        assert!(analysis.stemmed.contains(&"run".to_string()));
        assert_eq!(analysis.stemmed.len(), 3);
    }

    #[test]
    fn language_none_keeps_tokens() {
        let n = Normalizer::for_language(Stopwords::new(), Language::None);
        assert_eq!(n.normalize("cats running"), vec!["cats", "running"]);
    }

    #[test]
    fn parallel_analysis_keeps_order() {
        let n = plain(&[]);
        let texts: Vec<String> = (0..50).map(|i| format!("doc{i} word{}", "x".repeat(i % 3 + 1))).collect();
        let analyses = n.analyze_all(&texts);
        for (text, analysis) in texts.iter().zip(&analyses) {
            assert_eq!(analysis, &n.analyze(text));
        }
    }
}
