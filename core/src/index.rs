use indexmap::IndexSet;
use std::sync::Arc;

pub type TermId = usize;
pub type DocId = usize;

/// One input record: its position in the corpus, the raw line and the index
/// terms derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    index: DocId,
    content: String,
    terms: Vec<String>,
}

impl Document {
    pub fn new(index: DocId, content: impl Into<String>, terms: Vec<String>) -> Self {
        Self { index, content: content.into(), terms }
    }

    pub fn index(&self) -> DocId {
        self.index
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// `Document N: <first max_chars characters>...`
    pub fn preview(&self, max_chars: usize) -> String {
        let head: String = self.content.chars().take(max_chars).collect();
        format!("Document {}: {}...", self.index, head.trim())
    }
}

/// Term to dense column index, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: IndexSet<String>,
}

impl Vocabulary {
    pub fn get(&self, term: &str) -> Option<TermId> {
        self.terms.get_index_of(term)
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get_index(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, &str)> {
        self.terms.iter().enumerate().map(|(id, t)| (id, t.as_str()))
    }

    fn intern(&mut self, term: &str) -> TermId {
        match self.terms.get_index_of(term) {
            Some(id) => id,
            None => self.terms.insert_full(term.to_string()).0,
        }
    }
}

/// Raw term counts; rows are terms, columns are documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermDocumentMatrix {
    rows: Vec<Vec<u32>>,
    num_docs: usize,
}

impl TermDocumentMatrix {
    pub fn num_terms(&self) -> usize {
        self.rows.len()
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn frequency(&self, term: TermId, doc: DocId) -> u32 {
        self.rows[term][doc]
    }

    pub fn row(&self, term: TermId) -> &[u32] {
        &self.rows[term]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Total occurrences of `term` across the corpus.
    pub fn term_total(&self, term: TermId) -> u64 {
        self.rows[term].iter().map(|&c| c as u64).sum()
    }

    /// Number of documents containing `term` at least once.
    pub fn document_frequency(&self, term: TermId) -> u32 {
        self.rows[term].iter().filter(|&&c| c > 0).count() as u32
    }
}

/// Vocabulary plus counts, the input to both retrieval models.
#[derive(Debug, Clone, Default)]
pub struct Index {
    pub vocabulary: Arc<Vocabulary>,
    pub matrix: TermDocumentMatrix,
}

/// Count every term occurrence of every document. Documents are taken in
/// order; unseen terms get the next column index.
pub fn build_matrix<'a, I>(documents: I) -> Index
where
    I: IntoIterator<Item = &'a [String]>,
{
    let documents: Vec<&[String]> = documents.into_iter().collect();
    let num_docs = documents.len();
    let mut vocabulary = Vocabulary::default();
    let mut rows: Vec<Vec<u32>> = Vec::new();

    for (doc, terms) in documents.iter().enumerate() {
        for term in terms.iter() {
            let tid = vocabulary.intern(term);
            if tid == rows.len() {
                rows.push(vec![0; num_docs]);
            }
            rows[tid][doc] += 1;
        }
    }

    tracing::info!(num_docs, num_terms = vocabulary.len(), "built term-document matrix");
    Index { vocabulary: Arc::new(vocabulary), matrix: TermDocumentMatrix { rows, num_docs } }
}
