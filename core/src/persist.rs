use crate::error::{Error, Result};
use crate::evaluate::EvaluationReport;
use crate::index::DocId;
use serde::Serialize;
use std::fmt::Display;
use std::fs::{self, create_dir_all, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const PREPROCESSED_FILE: &str = "step1-preprocessed.txt";
pub const STOPWORDS_REMOVED_FILE: &str = "step2-stopwords-removed.txt";
pub const STEMMED_FILE: &str = "step3-stemmed.txt";
pub const TERM_DOCUMENT_MATRIX_FILE: &str = "step4-term-document-matrix.txt";
pub const BOOLEAN_MODEL_FILE: &str = "step5-boolean-model.txt";
pub const VECTOR_MODEL_FILE: &str = "step6-vector-model.txt";
pub const QUERY_RESULTS_FILE: &str = "step7-query-results.txt";
pub const MOST_RELEVANT_FILE: &str = "step8-most-relevant-results.txt";
pub const PRECISION_RECALL_FILE: &str = "step9-precision-and-recall.txt";
pub const REPORT_FILE: &str = "report.json";

/// Human-readable dump of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub file_name: &'static str,
    pub header: String,
    pub lines: Vec<String>,
}

impl Step {
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + self.lines.iter().map(|l| l.len() + 1).sum::<usize>() + 1);
        out.push_str(&self.header);
        out.push('\n');
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Steps recorded during a run, kept in memory until the run succeeded.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub fn record(&mut self, file_name: &'static str, header: impl Into<String>, lines: Vec<String>) {
        self.steps.retain(|s| s.file_name != file_name);
        self.steps.push(Step { file_name, header: header.into(), lines });
    }

    pub fn get(&self, file_name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.file_name == file_name)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// `Document N: [a, b, c]`
pub fn terms_line(doc: DocId, terms: &[String]) -> String {
    format!("Document {doc}: [{}]", terms.join(", "))
}

/// `name[row]={v1,v2,...}`
pub fn matrix_line<T: Display>(name: &str, row: usize, values: &[T]) -> String {
    let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("{name}[{row}]={{{}}}", values.join(","))
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub num_docs: usize,
    pub num_terms: usize,
    pub num_queries: usize,
    pub encoding: String,
    pub language: String,
    pub created_at: String,
    pub version: u32,
}

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub meta: RunMeta,
    pub evaluation: &'a EvaluationReport,
}

pub struct OutputPaths {
    pub root: PathBuf,
}

impl OutputPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn step(&self, file_name: &str) -> PathBuf { self.root.join(file_name) }
    pub fn report(&self) -> PathBuf { self.root.join(REPORT_FILE) }
}

/// RFC 3339 form of `at`, as stored in `RunMeta::created_at`.
pub fn timestamp(at: OffsetDateTime) -> io::Result<String> {
    at.format(&Rfc3339).map_err(io::Error::other)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut f = File::create(path).map_err(|e| Error::writing(path, e))?;
    f.write_all(contents).map_err(|e| Error::writing(path, e))?;
    Ok(())
}

/// Write every step file and `report.json` under `paths.root`, or none of
/// them. Contents are rendered up front and written into a staging directory
/// inside the root, then renamed into place; a failed rename removes the
/// files already moved.
pub fn save_run(paths: &OutputPaths, trace: &Trace, report: &RunReport<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| Error::writing(paths.report(), e.into()))?;
    let mut files: Vec<(&str, Vec<u8>)> = vec![(REPORT_FILE, json.into_bytes())];
    files.extend(trace.steps().iter().map(|step| (step.file_name, step.render().into_bytes())));

    create_dir_all(&paths.root).map_err(|e| Error::writing(&paths.root, e))?;
    let staging = TempDir::new_in(&paths.root).map_err(|e| Error::writing(&paths.root, e))?;
    for (name, contents) in &files {
        write_file(&staging.path().join(name), contents)?;
    }

    let mut moved: Vec<PathBuf> = Vec::with_capacity(files.len());
    for (name, contents) in &files {
        let target = paths.root.join(name);
        if let Err(e) = fs::rename(staging.path().join(name), &target) {
            for path in &moved {
                let _ = fs::remove_file(path);
            }
            return Err(Error::writing(target, e));
        }
        tracing::debug!(path = %target.display(), bytes = contents.len(), "wrote output file");
        moved.push(target);
    }
    Ok(())
}
