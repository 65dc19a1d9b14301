use crate::boolean::BooleanModel;
use crate::config::EngineConfig;
use crate::corpus;
use crate::error::{Error, Result};
use crate::evaluate::{EvaluationReport, Evaluator};
use crate::index::{build_matrix, DocId, Document, Index};
use crate::normalizer::{Analysis, Normalizer};
use crate::persist::{self, OutputPaths, RunMeta, RunReport, Trace};
use crate::vector::VectorModel;
use std::path::Path;

const CONSOLE_PREVIEW: usize = 100;
const TRACE_PREVIEW: usize = 300;

/// A corpus run end to end: documents are normalized and indexed once, then
/// query batches are evaluated against both models.
pub struct Processor {
    config: EngineConfig,
    normalizer: Normalizer,
    documents: Vec<Document>,
    index: Index,
    boolean: BooleanModel,
    vector: VectorModel,
    trace: Trace,
}

impl Processor {
    /// Load stopwords and documents named by `config` and build both models.
    pub fn build(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let stopwords = corpus::load_stopwords(&config.stopwords_path, config.encoding)?;
        let normalizer = Normalizer::for_language(stopwords, config.language);
        let texts = corpus::load_lines(&config.documents_path, config.encoding)?;
        Ok(Self::from_texts(config, normalizer, texts))
    }

    pub fn from_texts(config: EngineConfig, normalizer: Normalizer, texts: Vec<String>) -> Self {
        let mut trace = Trace::default();
        let analyses = normalizer.analyze_all(&texts);
        record_analysis(&mut trace, &analyses);

        let documents: Vec<Document> = texts
            .into_iter()
            .zip(analyses)
            .enumerate()
            .map(|(i, (text, analysis))| Document::new(i, text, analysis.stemmed))
            .collect();

        let index = build_matrix(documents.iter().map(Document::terms));
        trace.record(
            persist::TERM_DOCUMENT_MATRIX_FILE,
            "The term x document matrix was built:",
            index
                .matrix
                .rows()
                .enumerate()
                .map(|(t, row)| persist::matrix_line("termDocumentMatrix", t, row))
                .collect(),
        );

        let boolean = BooleanModel::new(&index);
        trace.record(
            persist::BOOLEAN_MODEL_FILE,
            "The document x term matrix of the boolean model was built:",
            (0..boolean.num_docs())
                .map(|d| persist::matrix_line("booleanModelMatrix", d, &boolean.incidence_row(d)))
                .collect(),
        );

        let vector = VectorModel::new(&index);
        trace.record(
            persist::VECTOR_MODEL_FILE,
            "The document x term matrix of the vector model was built:",
            (0..vector.num_docs())
                .map(|d| persist::matrix_line("vectorModelMatrix", d, vector.weight_row(d)))
                .collect(),
        );

        tracing::info!(
            num_docs = documents.len(),
            num_terms = index.vocabulary.len(),
            "documents indexed"
        );
        Self { config, normalizer, documents, index, boolean, vector, trace }
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn process_queries(&mut self, path: &Path) -> Result<EvaluationReport> {
        let texts = corpus::load_lines(path, self.config.encoding)?;
        Ok(self.evaluate_texts(texts))
    }

    pub fn evaluate_texts(&mut self, texts: Vec<String>) -> EvaluationReport {
        let queries: Vec<Document> = self
            .normalizer
            .analyze_all(&texts)
            .into_iter()
            .zip(texts)
            .enumerate()
            .map(|(i, (analysis, text))| Document::new(i, text, analysis.stemmed))
            .collect();

        let report = Evaluator::new(&self.boolean, &self.vector, self.config.max_results, self.config.minimal_relevance)
            .evaluate(&queries);
        self.record_report(&report);
        report
    }

    /// Write the trace and the JSON report. Nothing is written when the
    /// configuration has no output directory.
    pub fn save(&self, report: &EvaluationReport) -> Result<()> {
        let Some(dir) = &self.config.output_dir else {
            return Ok(());
        };
        let paths = OutputPaths::new(dir);
        let created_at = persist::timestamp(time::OffsetDateTime::now_utc())
            .map_err(|e| Error::writing(paths.report(), e))?;
        let meta = RunMeta {
            num_docs: self.documents.len(),
            num_terms: self.index.vocabulary.len(),
            num_queries: report.queries.len(),
            encoding: self.config.encoding.to_string(),
            language: format!("{:?}", self.config.language),
            created_at,
            version: 1,
        };
        persist::save_run(&paths, &self.trace, &RunReport { meta, evaluation: report })?;
        tracing::info!(output = %dir.display(), steps = self.trace.steps().len(), "run written");
        Ok(())
    }

    /// Build from `config`, evaluate its queries file and save the output.
    pub fn run(config: EngineConfig) -> Result<EvaluationReport> {
        let queries_path = config.queries_path.clone();
        let mut processor = Self::build(config)?;
        let report = processor.process_queries(&queries_path)?;
        processor.save(&report)?;
        Ok(report)
    }

    fn record_report(&mut self, report: &EvaluationReport) {
        let mut results = Vec::new();
        for eval in &report.queries {
            tracing::info!(query = eval.query, content = %eval.content, "applying query");
            results.push(String::new());
            results.push(format!("Query {}: '{}' -> {:?}", eval.query, eval.content, eval.terms));
            results.extend(self.result_block(&eval.boolean_results, "boolean"));
            results.extend(self.result_block(&eval.vector_results, "vector"));
        }
        self.trace.record(
            persist::QUERY_RESULTS_FILE,
            format!("{} queries were applied to the boolean and vector models:", report.queries.len()),
            results,
        );

        let mut ranked = Vec::new();
        let mut metrics = Vec::new();
        for eval in &report.queries {
            ranked.push(String::new());
            ranked.push(format!("Query '{}' returned the following documents:", eval.content));
            for hit in &eval.ranked {
                let doc = &self.documents[hit.document];
                tracing::info!(query = eval.query, similarity = hit.similarity, "{}", doc.preview(CONSOLE_PREVIEW));
                ranked.push(format!(">> [{:.6}] {}", hit.similarity, doc.preview(TRACE_PREVIEW)));
            }
            tracing::info!(query = eval.query, precision = %eval.precision, recall = %eval.recall, "ranked query measured");
            metrics.push(format!("Query '{}' has precision = {} and recall = {}", eval.content, eval.precision, eval.recall));
        }
        self.trace.record(
            persist::MOST_RELEVANT_FILE,
            format!(
                "Vector model showing the {} most relevant documents, with minimal relevance {}:",
                report.max_results, report.minimal_relevance
            ),
            ranked,
        );
        self.trace.record(persist::PRECISION_RECALL_FILE, "Precision and recall per query:", metrics);
    }

    fn result_block(&self, docs: &[DocId], model: &str) -> Vec<String> {
        let mut lines = vec![format!("The {model} model returned {} documents:", docs.len())];
        for &d in docs {
            let doc = &self.documents[d];
            tracing::info!(model, "{}", doc.preview(CONSOLE_PREVIEW));
            lines.push(format!(">> {}", doc.preview(TRACE_PREVIEW)));
        }
        lines
    }
}

fn record_analysis(trace: &mut Trace, analyses: &[Analysis]) {
    let stage = |pick: fn(&Analysis) -> &Vec<String>| -> Vec<String> {
        analyses.iter().enumerate().map(|(i, a)| persist::terms_line(i, pick(a))).collect()
    };
    trace.record(persist::PREPROCESSED_FILE, "Preprocessing was applied:", stage(|a| &a.preprocessed));
    trace.record(persist::STOPWORDS_REMOVED_FILE, "Stopwords were removed:", stage(|a| &a.filtered));
    trace.record(persist::STEMMED_FILE, "Stemming was applied:", stage(|a| &a.stemmed));
}
