use crate::index::{DocId, Index, TermId, Vocabulary};
use crate::model::{RelevanceSearchReturn, SearchModel};
use std::sync::Arc;

/// Packed 0/1 row over the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BitRow(Vec<u64>);

impl BitRow {
    fn zeros(len: usize) -> Self {
        BitRow(vec![0; len.div_ceil(64)])
    }

    fn set(&mut self, bit: usize) {
        self.0[bit / 64] |= 1u64 << (bit % 64);
    }

    fn get(&self, bit: usize) -> bool {
        self.0[bit / 64] & (1u64 << (bit % 64)) != 0
    }

    /// `self AND query == query`
    fn contains_all(&self, query: &BitRow) -> bool {
        self.0.iter().zip(&query.0).all(|(d, q)| d & q == *q)
    }
}

/// Exact conjunctive matching over a document × term incidence matrix.
pub struct BooleanModel {
    incidence: Vec<BitRow>,
    num_terms: usize,
    vocabulary: Arc<Vocabulary>,
}

impl BooleanModel {
    pub fn new(index: &Index) -> Self {
        let matrix = &index.matrix;
        let num_terms = matrix.num_terms();
        let mut incidence = vec![BitRow::zeros(num_terms); matrix.num_docs()];
        for (term, row) in matrix.rows().enumerate() {
            for (doc, &count) in row.iter().enumerate() {
                if count > 0 {
                    incidence[doc].set(term);
                }
            }
        }
        tracing::debug!(num_docs = incidence.len(), num_terms, "built boolean incidence matrix");
        Self { incidence, num_terms, vocabulary: Arc::clone(&index.vocabulary) }
    }

    pub fn num_docs(&self) -> usize {
        self.incidence.len()
    }

    pub fn contains(&self, doc: DocId, term: TermId) -> bool {
        self.incidence[doc].get(term)
    }

    /// Incidence row of `doc` as 0/1 values, one per term.
    pub fn incidence_row(&self, doc: DocId) -> Vec<u8> {
        (0..self.num_terms).map(|term| self.contains(doc, term) as u8).collect()
    }

    /// Terms missing from the vocabulary set no bit.
    fn prepare_query(&self, query: &[String]) -> BitRow {
        let mut bits = BitRow::zeros(self.num_terms);
        for tid in query.iter().filter_map(|term| self.vocabulary.get(term)) {
            bits.set(tid);
        }
        bits
    }
}

impl SearchModel for BooleanModel {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn process_query(&self, query: &[String]) -> Vec<DocId> {
        let bits = self.prepare_query(query);
        self.incidence
            .iter()
            .enumerate()
            .filter(|(_, row)| row.contains_all(&bits))
            .map(|(doc, _)| doc)
            .collect()
    }

    fn process_query_with_relevance(&self, _query: &[String], _threshold: usize, _minimal_relevance: f64) -> Option<RelevanceSearchReturn> {
        None
    }
}
