use crate::index::{DocId, Index, TermId, Vocabulary};
use crate::model::{RelevanceSearchReturn, SearchModel};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Documents sharing one similarity value, ascending by index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tier {
    pub similarity: f64,
    pub documents: Vec<DocId>,
}

/// `(1 + log2(tf)) * log2(n / df)`, or 0 when the term is absent.
pub fn tf_idf(tf: u32, df: u32, n: usize) -> f64 {
    if tf == 0 || df == 0 {
        return 0.0;
    }
    (1.0 + (tf as f64).log2()) * (n as f64 / df as f64).log2()
}

/// TF-IDF vector space model with cosine similarity.
pub struct VectorModel {
    /// documents × terms raw counts
    frequencies: Vec<Vec<u32>>,
    document_frequency: Vec<u32>,
    /// documents × terms tf-idf weights
    weights: Vec<Vec<f64>>,
    norms: Vec<f64>,
    vocabulary: Arc<Vocabulary>,
}

impl VectorModel {
    pub fn new(index: &Index) -> Self {
        let matrix = &index.matrix;
        let n = matrix.num_docs();
        let num_terms = matrix.num_terms();

        let frequencies: Vec<Vec<u32>> =
            (0..n).map(|doc| (0..num_terms).map(|term| matrix.frequency(term, doc)).collect()).collect();
        let document_frequency: Vec<u32> = (0..num_terms).map(|t| matrix.document_frequency(t)).collect();

        let weights: Vec<Vec<f64>> = frequencies
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&document_frequency)
                    .map(|(&tf, &df)| tf_idf(tf, df, n))
                    .collect()
            })
            .collect();
        let norms = weights.iter().map(|row| euclidean_norm(row)).collect();

        tracing::debug!(num_docs = n, num_terms, "built tf-idf weight matrix");
        Self { frequencies, document_frequency, weights, norms, vocabulary: Arc::clone(&index.vocabulary) }
    }

    pub fn num_docs(&self) -> usize {
        self.weights.len()
    }

    pub fn document_frequency(&self, term: TermId) -> u32 {
        self.document_frequency[term]
    }

    pub fn frequency_row(&self, doc: DocId) -> &[u32] {
        &self.frequencies[doc]
    }

    pub fn weight_row(&self, doc: DocId) -> &[f64] {
        &self.weights[doc]
    }

    /// Score the query as a pseudo-document against the corpus statistics.
    /// Terms outside the vocabulary are dropped.
    pub fn prepare_query(&self, query: &[String]) -> Vec<f64> {
        let mut counts = vec![0u32; self.document_frequency.len()];
        for tid in query.iter().filter_map(|term| self.vocabulary.get(term)) {
            counts[tid] += 1;
        }
        let n = self.num_docs();
        counts
            .iter()
            .zip(&self.document_frequency)
            .map(|(&tf, &df)| tf_idf(tf, df, n))
            .collect()
    }

    /// Cosine similarity of every document against the query, by index.
    /// Zero whenever either vector has zero length.
    pub fn similarities(&self, query: &[String]) -> Vec<f64> {
        let weights = self.prepare_query(query);
        let query_norm = euclidean_norm(&weights);
        let active: Vec<(TermId, f64)> =
            weights.into_iter().enumerate().filter(|(_, w)| *w != 0.0).collect();

        (0..self.num_docs())
            .into_par_iter()
            .map(|doc| {
                let doc_norm = self.norms[doc];
                if doc_norm == 0.0 || query_norm == 0.0 {
                    return 0.0;
                }
                let row = &self.weights[doc];
                let dot: f64 = active.iter().map(|&(t, w)| row[t] * w).sum();
                dot / (doc_norm * query_norm)
            })
            .collect()
    }

    /// Documents with positive similarity grouped into tiers, highest first.
    pub fn rank(&self, query: &[String]) -> Vec<Tier> {
        let mut scored: Vec<(DocId, f64)> = self
            .similarities(query)
            .into_iter()
            .enumerate()
            .filter(|(_, s)| *s > 0.0)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut tiers: Vec<Tier> = Vec::new();
        for (doc, similarity) in scored {
            match tiers.last_mut() {
                Some(tier) if tier.similarity == similarity => tier.documents.push(doc),
                _ => tiers.push(Tier { similarity, documents: vec![doc] }),
            }
        }
        tiers
    }

    /// Ranked retrieval. Whole tiers are taken until at least `threshold`
    /// documents were collected; the relevant set is every tier whose
    /// similarity is at least `minimal_relevance`.
    pub fn relevance_search(&self, query: &[String], threshold: usize, minimal_relevance: f64) -> RelevanceSearchReturn {
        Self::select(&self.rank(query), threshold, minimal_relevance)
    }

    /// Result list and relevant set from already ranked tiers.
    pub fn select(tiers: &[Tier], threshold: usize, minimal_relevance: f64) -> RelevanceSearchReturn {
        let mut results: Vec<DocId> = Vec::new();
        for tier in tiers {
            if results.len() >= threshold {
                break;
            }
            results.extend(&tier.documents);
        }

        let relevant: BTreeSet<DocId> = tiers
            .iter()
            .take_while(|tier| tier.similarity >= minimal_relevance)
            .flat_map(|tier| tier.documents.iter().copied())
            .collect();

        RelevanceSearchReturn::new(results, relevant)
    }
}

impl SearchModel for VectorModel {
    fn name(&self) -> &'static str {
        "vector"
    }

    /// Unlike `rank`, results come back in index order.
    fn process_query(&self, query: &[String]) -> Vec<DocId> {
        self.similarities(query)
            .into_iter()
            .enumerate()
            .filter(|(_, s)| *s > 0.0)
            .map(|(doc, _)| doc)
            .collect()
    }

    fn process_query_with_relevance(
        &self,
        query: &[String],
        threshold: usize,
        minimal_relevance: f64,
    ) -> Option<RelevanceSearchReturn> {
        Some(self.relevance_search(query, threshold, minimal_relevance))
    }
}

fn euclidean_norm(v: &[f64]) -> f64 {
    v.iter().map(|w| w * w).sum::<f64>().sqrt()
}
