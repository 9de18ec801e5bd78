//! JSON triple documents describing pollutant sources.

use routerisk_core::{OntologyModel, Pollutant, SourceKind};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TripleDocument {
    #[serde(default)]
    pub triples: Vec<Triple>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    HasSource,
    SourceType,
}

impl Relation {
    fn from_local_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "hassource" | "emittedby" => Some(Self::HasSource),
            "sourcetype" | "type" => Some(Self::SourceType),
            _ => None,
        }
    }
}

/// Strip an IRI or prefixed name down to its local part.
///
/// `http://example.org/air#PM25` and `air:PM25` both become `PM25`.
pub(crate) fn local_name(term: &str) -> &str {
    let trimmed = term.trim().trim_start_matches('<').trim_end_matches('>');
    trimmed
        .rsplit(['#', '/', ':'])
        .next()
        .unwrap_or(trimmed)
}

impl TripleDocument {
    /// Index the triples into an [`OntologyModel`].
    ///
    /// Triples with unknown predicates, unrecognised pollutants or unknown
    /// source kinds are skipped.
    pub(crate) fn into_model(self) -> OntologyModel {
        let mut model = OntologyModel::default();
        for triple in self.triples {
            let subject = local_name(&triple.subject);
            let object = local_name(&triple.object);
            match Relation::from_local_name(local_name(&triple.predicate)) {
                Some(Relation::HasSource) => {
                    if let Ok(pollutant) = subject.parse::<Pollutant>() {
                        model.add_source(pollutant, object);
                    }
                }
                Some(Relation::SourceType) => {
                    if let Ok(kind) = object.parse::<SourceKind>() {
                        model.add_source_kind(subject, kind);
                    }
                }
                None => {}
            }
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://example.org/air#PM25", "PM25")]
    #[case("http://example.org/air/Traffic", "Traffic")]
    #[case("rdf:type", "type")]
    #[case("<http://example.org/air#hasSource>", "hasSource")]
    #[case("Plain", "Plain")]
    fn extracts_local_names(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(local_name(term), expected);
    }

    #[rstest]
    fn indexes_sources_and_kinds() {
        let doc: TripleDocument = serde_json::from_str(
            r#"{"triples": [
                {"subject": "air:PM2.5", "predicate": "air:hasSource", "object": "air:Traffic"},
                {"subject": "air:SO2", "predicate": "air:emittedBy", "object": "air:Volcano"},
                {"subject": "air:Traffic", "predicate": "rdf:type", "object": "air:HumanSource"},
                {"subject": "air:Volcano", "predicate": "air:sourceType", "object": "air:Natural"},
                {"subject": "air:NH3", "predicate": "air:hasSource", "object": "air:Farming"},
                {"subject": "air:Traffic", "predicate": "rdfs:label", "object": "Traffic"}
            ]}"#,
        )
        .expect("should deserialise");

        let model = doc.into_model();

        assert_eq!(
            model.source_kinds(Pollutant::Pm25).collect::<Vec<_>>(),
            vec![SourceKind::Human]
        );
        assert_eq!(
            model.source_kinds(Pollutant::So2).collect::<Vec<_>>(),
            vec![SourceKind::Natural]
        );
        assert_eq!(model.pollutant_count(), 2);
    }
}
