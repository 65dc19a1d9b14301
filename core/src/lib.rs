pub mod boolean;
pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod index;
pub mod model;
pub mod normalizer;
pub mod persist;
pub mod processor;
pub mod vector;

pub use boolean::BooleanModel;
pub use config::{EngineConfig, Encoding, Language};
pub use error::{Error, Result};
pub use evaluate::{EvaluationReport, Evaluator, Metric, QueryEvaluation, RankedHit};
pub use index::{build_matrix, DocId, Document, Index, TermDocumentMatrix, TermId, Vocabulary};
pub use model::{RelevanceSearchReturn, SearchModel};
pub use normalizer::{Analysis, IdentityStemmer, Normalizer, SnowballStemmer, Stemmer, StopwordFilter, Stopwords};
pub use processor::Processor;
pub use vector::{Tier, VectorModel};
