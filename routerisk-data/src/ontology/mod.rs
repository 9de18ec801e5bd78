//! File-backed ontology loading.
//!
//! The ontology is a JSON document holding subject/predicate/object
//! triples. Terms may be full IRIs or prefixed names; only the local part is
//! significant. Two relations are recognised: `hasSource` (or `emittedBy`)
//! from a pollutant to a source, and `sourceType` (or `rdf:type`) from a
//! source to `HumanSource` or `NaturalSource`.
//!
//! ```json
//! {"triples": [
//!   {"subject": "air:PM25", "predicate": "air:hasSource", "object": "air:Traffic"},
//!   {"subject": "air:Traffic", "predicate": "rdf:type", "object": "air:HumanSource"}
//! ]}
//! ```

mod document;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use routerisk_core::{OntologyError, OntologyModel, OntologySource};

use document::TripleDocument;

/// Ontology source reading a triple document from disk on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOntologySource {
    path: Utf8PathBuf,
}

impl FileOntologySource {
    /// Read the ontology from `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_document(&self) -> Result<String, OntologyError> {
        let read_error = |source| OntologyError::Read {
            path: self.path.clone(),
            source,
        };
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = self.path.file_name().ok_or_else(|| {
            read_error(std::io::Error::other("ontology path should name a file"))
        })?;
        let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        dir.read_to_string(file_name).map_err(read_error)
    }
}

impl OntologySource for FileOntologySource {
    fn load(&self) -> Result<OntologyModel, OntologyError> {
        let raw = self.read_document()?;
        let document: TripleDocument =
            serde_json::from_str(&raw).map_err(|err| OntologyError::Parse {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        let model = document.into_model();
        if model.is_empty() {
            return Err(OntologyError::Empty {
                path: self.path.clone(),
            });
        }
        log::debug!(
            "loaded ontology from {} ({} pollutants, {} sources)",
            self.path,
            model.pollutant_count(),
            model.source_count()
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use routerisk_core::{Pollutant, SourceKind};
    use std::fs;
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temporary directory")
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8 path");
        fs::write(&path, contents).expect("write ontology fixture");
        path
    }

    #[rstest]
    fn loads_triples_from_disk(temp_dir: TempDir) {
        let path = write(
            &temp_dir,
            "ontology.json",
            r#"{"triples": [
                {"subject": "ex:NO2", "predicate": "ex:hasSource", "object": "ex:Traffic"},
                {"subject": "ex:Traffic", "predicate": "ex:sourceType", "object": "ex:HumanSource"}
            ]}"#,
        );

        let model = FileOntologySource::new(path).load().expect("ontology loads");

        assert_eq!(
            model.source_kinds(Pollutant::No2).collect::<Vec<_>>(),
            vec![SourceKind::Human]
        );
    }

    #[rstest]
    fn missing_file_is_read_error(temp_dir: TempDir) {
        let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("absent.json"))
            .expect("utf8 path");
        let err = FileOntologySource::new(path).load().expect_err("should fail");
        assert!(matches!(err, OntologyError::Read { .. }));
    }

    #[rstest]
    fn malformed_json_is_parse_error(temp_dir: TempDir) {
        let path = write(&temp_dir, "broken.json", "{ not json");
        let err = FileOntologySource::new(path).load().expect_err("should fail");
        assert!(matches!(err, OntologyError::Parse { .. }));
    }

    #[rstest]
    fn document_without_relations_is_empty(temp_dir: TempDir) {
        let path = write(&temp_dir, "empty.json", r#"{"triples": []}"#);
        let err = FileOntologySource::new(path).load().expect_err("should fail");
        assert!(matches!(err, OntologyError::Empty { .. }));
    }

    #[rstest]
    fn status_reports_counts(temp_dir: TempDir) {
        let path = write(
            &temp_dir,
            "ontology.json",
            r#"{"triples": [
                {"subject": "ex:PM10", "predicate": "ex:hasSource", "object": "ex:Dust"},
                {"subject": "ex:Dust", "predicate": "rdf:type", "object": "ex:NaturalSource"}
            ]}"#,
        );

        let status = FileOntologySource::new(path).status();

        assert!(status.available);
        assert_eq!(status.pollutants, 1);
        assert_eq!(status.sources, 1);
        assert!(status.error.is_none());
    }
}
