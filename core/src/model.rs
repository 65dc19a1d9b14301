use crate::error::{Error, Result};
use crate::index::DocId;
use serde::Serialize;
use std::collections::BTreeSet;

/// Common surface of the retrieval models.
pub trait SearchModel {
    fn name(&self) -> &'static str;

    /// Every matching document, ascending by document index.
    fn process_query(&self, query: &[String]) -> Vec<DocId>;

    /// Ranked retrieval. `None` when the model has no notion of graded
    /// relevance.
    fn process_query_with_relevance(
        &self,
        query: &[String],
        threshold: usize,
        minimal_relevance: f64,
    ) -> Option<RelevanceSearchReturn>;
}

/// Outcome of one ranked query: the ranked result list, the relevant set (R)
/// and the answered set (A).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelevanceSearchReturn {
    results: Vec<DocId>,
    relevant: BTreeSet<DocId>,
    answered: BTreeSet<DocId>,
}

impl RelevanceSearchReturn {
    pub fn new(results: Vec<DocId>, relevant: BTreeSet<DocId>) -> Self {
        let answered = results.iter().copied().collect();
        Self { results, relevant, answered }
    }

    pub fn results(&self) -> &[DocId] {
        &self.results
    }

    pub fn relevant(&self) -> &BTreeSet<DocId> {
        &self.relevant
    }

    pub fn answered(&self) -> &BTreeSet<DocId> {
        &self.answered
    }

    /// |R ∩ A|
    pub fn relevant_answered(&self) -> usize {
        self.relevant.intersection(&self.answered).count()
    }

    /// |R ∩ A| / |A|
    pub fn precision(&self) -> Result<f64> {
        if self.answered.is_empty() {
            return Err(Error::UndefinedMetric { metric: "precision", reason: "no documents were answered" });
        }
        Ok(self.relevant_answered() as f64 / self.answered.len() as f64)
    }

    /// |R ∩ A| / |R|
    pub fn recall(&self) -> Result<f64> {
        if self.relevant.is_empty() {
            return Err(Error::UndefinedMetric { metric: "recall", reason: "no documents are relevant" });
        }
        Ok(self.relevant_answered() as f64 / self.relevant.len() as f64)
    }
}
