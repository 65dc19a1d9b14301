use anyhow::{Context, Result};
use clap::Parser;
use retrieval_core::config::{
    DEFAULT_DOCS_FILE, DEFAULT_MAX_RESULTS, DEFAULT_MINIMAL_RELEVANCE, DEFAULT_QUERIES_FILE, DEFAULT_STOPWORDS_FILE,
};
use retrieval_core::{EngineConfig, Encoding, EvaluationReport, Language, Processor};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "processor")]
#[command(about = "Evaluate queries against a corpus with the boolean and vector space models", long_about = None)]
pub struct Cli {
    /// Documents file, one document per line
    #[arg(short = 'f', long = "file", default_value = DEFAULT_DOCS_FILE)]
    pub file: PathBuf,
    /// Queries file, one query per line
    #[arg(short, long, default_value = DEFAULT_QUERIES_FILE)]
    pub queries: PathBuf,
    /// Comma-separated stopwords file
    #[arg(short, long, default_value = DEFAULT_STOPWORDS_FILE)]
    pub stopwords: PathBuf,
    /// Input encoding: UTF-8, ISO-8859-1 or US-ASCII
    #[arg(short, long, default_value = "UTF-8")]
    pub encoding: String,
    /// Directory for the step files and report.json
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
    /// Snowball stemmer language, or `none`
    #[arg(short, long, default_value = "english")]
    pub language: String,
    /// Ranked results to show per query
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: usize,
    /// Similarity at which a document counts as relevant
    #[arg(long, default_value_t = DEFAULT_MINIMAL_RELEVANCE)]
    pub minimal_relevance: f64,
    /// Verbose logging and full error chains
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,
}

impl Cli {
    pub fn to_config(&self) -> Result<EngineConfig> {
        let encoding: Encoding = self.encoding.parse().context("invalid --encoding")?;
        let language: Language = self.language.parse().context("invalid --language")?;
        let config = EngineConfig {
            documents_path: self.file.clone(),
            queries_path: self.queries.clone(),
            stopwords_path: self.stopwords.clone(),
            encoding,
            language,
            max_results: self.max_results,
            minimal_relevance: self.minimal_relevance,
            output_dir: Some(self.output.clone()),
        };
        config.validate().context("invalid arguments")?;
        Ok(config)
    }
}

pub fn run(cli: &Cli) -> Result<EvaluationReport> {
    let config = cli.to_config()?;
    let report = Processor::run(config).with_context(|| {
        format!("failed to process queries from {} against {}", cli.queries.display(), cli.file.display())
    })?;
    tracing::info!(queries = report.queries.len(), output = %cli.output.display(), "processing complete");
    Ok(report)
}
