//! Behavioural tests for [`FileOntologySource`].
#![expect(
    clippy::expect_used,
    reason = "behaviour tests should fail fast when fixtures cannot be written"
)]

use std::cell::RefCell;
use std::fs;

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use routerisk_core::{OntologySource, OntologyStatus};
use routerisk_data::FileOntologySource;
use tempfile::TempDir;

/// Temporary directory for each scenario.
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("create temporary directory")
}

/// Location of the ontology document under test.
#[fixture]
fn document() -> RefCell<Option<Utf8PathBuf>> {
    RefCell::new(None)
}

/// Outcome of probing the source.
#[fixture]
fn status() -> RefCell<Option<OntologyStatus>> {
    RefCell::new(None)
}

fn document_path(temp_dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp_dir.path().join("ontology.json")).expect("utf8 path")
}

#[given("an ontology document relating PM2.5 to traffic")]
fn well_formed(temp_dir: &TempDir, document: &RefCell<Option<Utf8PathBuf>>) {
    let path = document_path(temp_dir);
    fs::write(
        &path,
        r#"{"triples": [
            {"subject": "http://example.org/air#PM2.5", "predicate": "http://example.org/air#hasSource", "object": "http://example.org/air#Traffic"},
            {"subject": "http://example.org/air#Traffic", "predicate": "rdf:type", "object": "http://example.org/air#HumanSource"}
        ]}"#,
    )
    .expect("write ontology");
    *document.borrow_mut() = Some(path);
}

#[given("no ontology document")]
fn missing(temp_dir: &TempDir, document: &RefCell<Option<Utf8PathBuf>>) {
    *document.borrow_mut() = Some(document_path(temp_dir));
}

#[given("a malformed ontology document")]
fn malformed(temp_dir: &TempDir, document: &RefCell<Option<Utf8PathBuf>>) {
    let path = document_path(temp_dir);
    fs::write(&path, "<rdf:RDF>").expect("write ontology");
    *document.borrow_mut() = Some(path);
}

#[when("I check the ontology source")]
fn check_source(
    document: &RefCell<Option<Utf8PathBuf>>,
    status: &RefCell<Option<OntologyStatus>>,
) {
    let path = document.borrow().clone().expect("document path must be set");
    *status.borrow_mut() = Some(FileOntologySource::new(path).status());
}

#[then("the ontology is reported available with {count} pollutant")]
fn available(status: &RefCell<Option<OntologyStatus>>, count: usize) {
    let borrowed = status.borrow();
    let report = borrowed.as_ref().expect("status must be recorded");
    assert!(report.available, "expected available, got {report:?}");
    assert_eq!(report.pollutants, count);
}

#[then("the ontology is reported unavailable")]
fn unavailable(status: &RefCell<Option<OntologyStatus>>) {
    let borrowed = status.borrow();
    let report = borrowed.as_ref().expect("status must be recorded");
    assert!(!report.available);
    assert!(report.error.is_some());
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/ontology_loading.feature", name = $title)]
        fn $fn_name(
            temp_dir: TempDir,
            document: RefCell<Option<Utf8PathBuf>>,
            status: RefCell<Option<OntologyStatus>>,
        ) {
            let _ = (temp_dir, document, status);
        }
    };
}

register_scenario!(
    loads_well_formed_document,
    "loading a well-formed ontology document"
);
register_scenario!(reports_missing_document, "checking a missing ontology document");
register_scenario!(
    reports_malformed_document,
    "checking a malformed ontology document"
);
