use retrieval_core::config::EngineConfig;
use retrieval_core::persist;
use retrieval_core::{
    build_matrix, BooleanModel, Document, Error, IdentityStemmer, Language, Metric, Normalizer, Processor,
    SearchModel, StopwordFilter, Stopwords, VectorModel,
};
use std::fs;
use tempfile::tempdir;

fn plain_normalizer() -> Normalizer {
    Normalizer::new(["the", "and"].into_iter().collect::<Stopwords>(), IdentityStemmer)
}

fn documents(normalizer: &Normalizer, texts: &[&str]) -> Vec<Document> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| Document::new(i, *t, normalizer.normalize(t)))
        .collect()
}

#[test]
fn boolean_query_over_small_corpus() {
    let n = plain_normalizer();
    let docs = documents(&n, &["the cat sat", "the dog ran", "cats and dogs"]);
    let index = build_matrix(docs.iter().map(Document::terms));
    assert_eq!(index.vocabulary.len(), 6);

    let boolean = BooleanModel::new(&index);
    assert_eq!(boolean.process_query(&n.normalize("cat")), vec![0]);
    assert_eq!(boolean.process_query(&n.normalize("the cats")), vec![2]);
    assert!(boolean.process_query(&n.normalize("cat dog")).is_empty());
}

#[test]
fn normalized_terms_hold_their_invariants() {
    let stopwords: Stopwords = ["the", "of", "and"].into_iter().collect();
    let n = Normalizer::for_language(stopwords.clone(), Language::None);
    let texts = [
        "The 2nd Law of Thermodynamics — entropy & disorder!",
        "a b c 1 2 3 x",
        "  Ça va? Über-cool naïveté... 100%  ",
        "",
        "snake_case and kebab-case, under_score",
    ];
    for text in texts {
        for term in n.normalize(text) {
            assert!(term.chars().count() >= 2, "{term:?} from {text:?}");
            assert!(!term.chars().any(char::is_numeric), "{term:?}");
            assert!(!stopwords.is_stopword(&term), "{term:?}");
            assert_eq!(term, term.to_lowercase());
        }
    }
}

#[test]
fn normalizing_twice_changes_nothing() {
    let n = Normalizer::for_language(Stopwords::new(), Language::None);
    for text in ["Hello, World! 42 times", "résumé café", "x y zz"] {
        let once = n.normalize(text).join(" ");
        assert_eq!(n.normalize(&once).join(" "), once);
    }
}

#[test]
fn matrix_columns_sum_to_document_lengths() {
    let n = plain_normalizer();
    let docs = documents(&n, &["cat cat dog", "the bird", "dog owl owl owl", ""]);
    let index = build_matrix(docs.iter().map(Document::terms));
    for doc in &docs {
        let column: u32 = index.matrix.rows().map(|row| row[doc.index()]).sum();
        assert_eq!(column as usize, doc.terms().len());
    }
    for (id, term) in index.vocabulary.iter() {
        assert_eq!(index.vocabulary.get(term), Some(id));
    }
}

#[test]
fn vector_ranking_prefers_closer_documents() {
    let n = plain_normalizer();
    let docs = documents(&n, &["cat sat mat", "dog ran far", "cat dog", "bird flew"]);
    let model = VectorModel::new(&build_matrix(docs.iter().map(Document::terms)));
    let tiers = model.rank(&n.normalize("cat sat"));
    assert_eq!(tiers[0].documents, vec![0]);
    assert!(tiers.iter().all(|t| t.similarity > 0.0 && t.similarity <= 1.0 + 1e-12));
    assert!(tiers.windows(2).all(|w| w[0].similarity > w[1].similarity));
}

#[test]
fn full_run_writes_trace_and_report() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("docs.txt"), "the cat sat\nthe dog ran\ncats and dogs\n").unwrap();
    fs::write(dir.path().join("queries.txt"), "cat\nunicorn\n").unwrap();
    fs::write(dir.path().join("stopwords.txt"), "the, and\n").unwrap();
    let out = dir.path().join("out");

    let config = EngineConfig {
        documents_path: dir.path().join("docs.txt"),
        queries_path: dir.path().join("queries.txt"),
        stopwords_path: dir.path().join("stopwords.txt"),
        language: Language::None,
        output_dir: Some(out.clone()),
        ..EngineConfig::default()
    };
    let report = Processor::run(config).unwrap();

    assert_eq!(report.queries.len(), 2);
    assert_eq!(report.queries[0].boolean_results, vec![0]);
    assert_eq!(report.queries[0].precision, Metric::Defined { value: 1.0 });
    assert!(matches!(report.queries[1].recall, Metric::Undefined { .. }));

    for file in [
        persist::PREPROCESSED_FILE,
        persist::STOPWORDS_REMOVED_FILE,
        persist::STEMMED_FILE,
        persist::TERM_DOCUMENT_MATRIX_FILE,
        persist::BOOLEAN_MODEL_FILE,
        persist::VECTOR_MODEL_FILE,
        persist::QUERY_RESULTS_FILE,
        persist::MOST_RELEVANT_FILE,
        persist::PRECISION_RECALL_FILE,
    ] {
        assert!(out.join(file).is_file(), "{file}");
    }
    let filtered = fs::read_to_string(out.join(persist::STOPWORDS_REMOVED_FILE)).unwrap();
    assert!(filtered.contains("Document 0: [cat, sat]"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(persist::REPORT_FILE)).unwrap()).unwrap();
    assert_eq!(json["meta"]["num_docs"], 3);
    assert_eq!(json["meta"]["encoding"], "UTF-8");
    assert_eq!(json["evaluation"]["queries"][0]["precision"]["status"], "defined");
}

#[test]
fn missing_documents_file_fails_before_writing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("stopwords.txt"), "the").unwrap();
    let out = dir.path().join("out");
    let config = EngineConfig {
        documents_path: dir.path().join("absent.txt"),
        stopwords_path: dir.path().join("stopwords.txt"),
        output_dir: Some(out.clone()),
        ..EngineConfig::default()
    };
    let err = Processor::run(config).err().unwrap();
    assert!(matches!(err, Error::FileNotFound { .. }));
    assert!(!out.exists());
}

#[test]
fn failed_report_write_leaves_no_trace_behind() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("docs.txt"), "the cat sat\nthe dog ran\n").unwrap();
    fs::write(dir.path().join("queries.txt"), "cat\n").unwrap();
    fs::write(dir.path().join("stopwords.txt"), "the").unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(out.join(persist::REPORT_FILE)).unwrap();

    let config = EngineConfig {
        documents_path: dir.path().join("docs.txt"),
        queries_path: dir.path().join("queries.txt"),
        stopwords_path: dir.path().join("stopwords.txt"),
        output_dir: Some(out.clone()),
        ..EngineConfig::default()
    };
    let err = Processor::run(config).err().unwrap();
    assert!(matches!(err, Error::WriteFailure { .. }));
    assert!(!out.join(persist::PREPROCESSED_FILE).exists());
    assert!(!out.join(persist::PRECISION_RECALL_FILE).exists());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
}

#[test]
fn classic_mac_line_endings_split_documents() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("docs.txt"), "the cat sat\rthe dog ran\r\ncats and dogs").unwrap();
    fs::write(dir.path().join("queries.txt"), "dog\r").unwrap();
    fs::write(dir.path().join("stopwords.txt"), "the, and").unwrap();
    let config = EngineConfig {
        documents_path: dir.path().join("docs.txt"),
        queries_path: dir.path().join("queries.txt"),
        stopwords_path: dir.path().join("stopwords.txt"),
        language: Language::None,
        output_dir: None,
        ..EngineConfig::default()
    };
    let report = Processor::run(config).unwrap();
    assert_eq!(report.queries.len(), 1);
    assert_eq!(report.queries[0].boolean_results, vec![1]);
}
