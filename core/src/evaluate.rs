use crate::boolean::BooleanModel;
use crate::error::Result;
use crate::index::{DocId, Document};
use crate::model::{RelevanceSearchReturn, SearchModel};
use crate::vector::VectorModel;
use serde::Serialize;
use std::fmt;

/// A precision or recall value, or the reason it has none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Metric {
    Defined { value: f64 },
    Undefined { reason: String },
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Defined { value } => Some(*value),
            Metric::Undefined { .. } => None,
        }
    }
}

impl From<Result<f64>> for Metric {
    fn from(result: Result<f64>) -> Self {
        match result {
            Ok(value) => Metric::Defined { value },
            Err(err) => Metric::Undefined { reason: err.to_string() },
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Defined { value } => write!(f, "{value}"),
            Metric::Undefined { reason } => write!(f, "undefined ({reason})"),
        }
    }
}

/// One entry of a ranked result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedHit {
    pub document: DocId,
    pub similarity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryEvaluation {
    pub query: DocId,
    pub content: String,
    pub terms: Vec<String>,
    pub boolean_results: Vec<DocId>,
    pub vector_results: Vec<DocId>,
    pub ranked: Vec<RankedHit>,
    pub relevance: RelevanceSearchReturn,
    pub precision: Metric,
    pub recall: Metric,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub max_results: usize,
    pub minimal_relevance: f64,
    pub queries: Vec<QueryEvaluation>,
}

/// Runs a query batch through both models and measures the vector model's
/// ranked answers against its own relevance cutoff.
pub struct Evaluator<'a> {
    boolean: &'a BooleanModel,
    vector: &'a VectorModel,
    max_results: usize,
    minimal_relevance: f64,
}

impl<'a> Evaluator<'a> {
    pub fn new(boolean: &'a BooleanModel, vector: &'a VectorModel, max_results: usize, minimal_relevance: f64) -> Self {
        Self { boolean, vector, max_results, minimal_relevance }
    }

    pub fn evaluate_query(&self, query: &Document) -> QueryEvaluation {
        let terms = query.terms();
        let boolean_results = apply_query(self.boolean, query);
        let vector_results = apply_query(self.vector, query);

        let tiers = self.vector.rank(terms);
        let relevance = VectorModel::select(&tiers, self.max_results, self.minimal_relevance);
        // the result list is a prefix of the flattened tiers
        let ranked = tiers
            .iter()
            .flat_map(|tier| {
                tier.documents.iter().map(move |&document| RankedHit { document, similarity: tier.similarity })
            })
            .take(relevance.results().len())
            .collect();

        let precision = Metric::from(relevance.precision());
        let recall = Metric::from(relevance.recall());
        for metric in [&precision, &recall] {
            if let Metric::Undefined { reason } = metric {
                tracing::warn!(query = query.index(), %reason, "metric undefined");
            }
        }
        tracing::debug!(
            query = query.index(),
            boolean = boolean_results.len(),
            vector = vector_results.len(),
            answered = relevance.answered().len(),
            relevant = relevance.relevant().len(),
            "evaluated query"
        );

        QueryEvaluation {
            query: query.index(),
            content: query.content().to_string(),
            terms: terms.to_vec(),
            boolean_results,
            vector_results,
            ranked,
            relevance,
            precision,
            recall,
        }
    }

    pub fn evaluate(&self, queries: &[Document]) -> EvaluationReport {
        let queries = queries.iter().map(|q| self.evaluate_query(q)).collect();
        EvaluationReport { max_results: self.max_results, minimal_relevance: self.minimal_relevance, queries }
    }
}

/// Unranked answers of `model` for `query`.
pub fn apply_query(model: &dyn SearchModel, query: &Document) -> Vec<DocId> {
    let documents = model.process_query(query.terms());
    tracing::debug!(model = model.name(), query = query.index(), matched = documents.len(), "applied query");
    documents
}
