use crate::error::{Error, Result};
use rust_stemmers::Algorithm;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DOCS_FILE: &str = "docs.txt";
pub const DEFAULT_QUERIES_FILE: &str = "queries.txt";
pub const DEFAULT_STOPWORDS_FILE: &str = "stopwords.txt";
pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const DEFAULT_MINIMAL_RELEVANCE: f64 = 0.05;

/// Character encoding of the input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Encoding {
    Utf8,
    Latin1,
    Ascii,
}

impl Encoding {
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Latin1 => "ISO-8859-1",
            Encoding::Ascii => "US-ASCII",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "iso-8859-1" | "iso8859-1" | "iso_8859_1" | "latin1" | "latin-1" => Ok(Encoding::Latin1),
            "us-ascii" | "ascii" => Ok(Encoding::Ascii),
            other => Err(Error::InvalidConfiguration(format!("unsupported encoding '{other}'"))),
        }
    }
}

/// Stemming language. `None` turns stemming off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Language {
    None,
    English,
    Portuguese,
    Spanish,
    French,
    German,
    Italian,
    Dutch,
}

impl Language {
    /// Snowball algorithm for this language, if stemming is enabled.
    pub fn algorithm(&self) -> Option<Algorithm> {
        match self {
            Language::None => None,
            Language::English => Some(Algorithm::English),
            Language::Portuguese => Some(Algorithm::Portuguese),
            Language::Spanish => Some(Algorithm::Spanish),
            Language::French => Some(Algorithm::French),
            Language::German => Some(Algorithm::German),
            Language::Italian => Some(Algorithm::Italian),
            Language::Dutch => Some(Algorithm::Dutch),
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Language::None),
            "english" | "en" => Ok(Language::English),
            "portuguese" | "pt" => Ok(Language::Portuguese),
            "spanish" | "es" => Ok(Language::Spanish),
            "french" | "fr" => Ok(Language::French),
            "german" | "de" => Ok(Language::German),
            "italian" | "it" => Ok(Language::Italian),
            "dutch" | "nl" => Ok(Language::Dutch),
            other => Err(Error::InvalidConfiguration(format!("unsupported stemming language '{other}'"))),
        }
    }
}

/// Everything a run needs. Built once by the caller and handed to the
/// processor; nothing here is process-wide state.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub documents_path: PathBuf,
    pub queries_path: PathBuf,
    pub stopwords_path: PathBuf,
    pub encoding: Encoding,
    pub language: Language,
    /// Tier-accumulation threshold for ranked retrieval (top K)
    pub max_results: usize,
    /// Similarity cutoff defining the relevant set
    pub minimal_relevance: f64,
    /// Where trace files and the report go; `None` skips writing them
    pub output_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            documents_path: PathBuf::from(DEFAULT_DOCS_FILE),
            queries_path: PathBuf::from(DEFAULT_QUERIES_FILE),
            stopwords_path: PathBuf::from(DEFAULT_STOPWORDS_FILE),
            encoding: Encoding::Utf8,
            language: Language::English,
            max_results: DEFAULT_MAX_RESULTS,
            minimal_relevance: DEFAULT_MINIMAL_RELEVANCE,
            output_dir: Some(PathBuf::from(".")),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.minimal_relevance.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "minimal relevance must be a finite number, got {}",
                self.minimal_relevance
            )));
        }
        if self.max_results == 0 {
            return Err(Error::InvalidConfiguration("max results must be at least 1".into()));
        }
        Ok(())
    }
}
