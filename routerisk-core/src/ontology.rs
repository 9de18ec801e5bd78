//! In-memory pollutant/source relation graph.
//!
//! The ontology answers one question: which kinds of source contribute to a
//! pollutant. It is resolved in two hops, pollutant to source names and
//! source name to [`SourceKind`], against maps built once at load time. The
//! scorer never sees the document format the graph was read from.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::Pollutant;

/// Broad origin of a pollution source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// Anthropogenic sources such as traffic or industry.
    Human,
    /// Natural sources such as wildfire or dust.
    Natural,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "human" | "humansource" | "anthropogenic" | "anthropogenicsource" => Ok(Self::Human),
            "natural" | "naturalsource" => Ok(Self::Natural),
            _ => Err(format!("unknown source kind '{s}'")),
        }
    }
}

/// Directed relations from pollutants to sources and from sources to kinds.
///
/// # Examples
/// ```
/// use routerisk_core::{OntologyModel, Pollutant, SourceKind};
///
/// let model = OntologyModel::default()
///     .with_source(Pollutant::No2, "Traffic")
///     .with_source_kind("Traffic", SourceKind::Human);
/// let kinds: Vec<_> = model.source_kinds(Pollutant::No2).collect();
/// assert_eq!(kinds, vec![SourceKind::Human]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OntologyModel {
    pollutant_sources: BTreeMap<Pollutant, BTreeSet<String>>,
    source_kinds: BTreeMap<String, SourceKind>,
}

impl OntologyModel {
    /// Relate `pollutant` to a contributing source.
    pub fn add_source(&mut self, pollutant: Pollutant, source: impl Into<String>) {
        self.pollutant_sources
            .entry(pollutant)
            .or_default()
            .insert(source.into());
    }

    /// Tag `source` with its kind, replacing any earlier tag.
    pub fn add_source_kind(&mut self, source: impl Into<String>, kind: SourceKind) {
        self.source_kinds.insert(source.into(), kind);
    }

    /// Chaining form of [`OntologyModel::add_source`].
    #[must_use]
    pub fn with_source(mut self, pollutant: Pollutant, source: impl Into<String>) -> Self {
        self.add_source(pollutant, source);
        self
    }

    /// Chaining form of [`OntologyModel::add_source_kind`].
    #[must_use]
    pub fn with_source_kind(mut self, source: impl Into<String>, kind: SourceKind) -> Self {
        self.add_source_kind(source, kind);
        self
    }

    /// Sources related to `pollutant`.
    pub fn sources(&self, pollutant: Pollutant) -> impl Iterator<Item = &str> + '_ {
        self.pollutant_sources
            .get(&pollutant)
            .into_iter()
            .flat_map(|sources| sources.iter().map(String::as_str))
    }

    /// Kind of `source`, if tagged.
    #[must_use]
    pub fn kind_of(&self, source: &str) -> Option<SourceKind> {
        self.source_kinds.get(source).copied()
    }

    /// Resolve `pollutant` to the kinds of its tagged sources.
    ///
    /// Untagged sources are skipped. A kind appears once per source, so a
    /// pollutant with two human sources yields `Human` twice.
    pub fn source_kinds(&self, pollutant: Pollutant) -> impl Iterator<Item = SourceKind> + '_ {
        self.sources(pollutant)
            .filter_map(|source| self.kind_of(source))
    }

    /// Number of pollutants with at least one related source.
    #[must_use]
    pub fn pollutant_count(&self) -> usize {
        self.pollutant_sources.len()
    }

    /// Number of distinct sources, tagged or not.
    #[must_use]
    pub fn source_count(&self) -> usize {
        let related = self.pollutant_sources.values().flatten();
        let tagged = self.source_kinds.keys();
        related.chain(tagged).collect::<BTreeSet<_>>().len()
    }

    /// Report whether the model relates no pollutant to any source.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pollutant_sources.is_empty()
    }
}

/// Errors raised while loading an ontology document.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// Reading the document failed.
    #[error("failed to read ontology at {path}")]
    Read {
        /// Requested document path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The document could not be decoded.
    #[error("failed to parse ontology at {path}: {message}")]
    Parse {
        /// Document path.
        path: Utf8PathBuf,
        /// Decoder error description.
        message: String,
    },
    /// The document decoded but relates no pollutant to a source.
    #[error("ontology at {path} contains no pollutant relations")]
    Empty {
        /// Document path.
        path: Utf8PathBuf,
    },
}

/// Availability report for an ontology source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OntologyStatus {
    /// Whether the ontology loaded successfully.
    pub available: bool,
    /// Number of pollutants with related sources.
    pub pollutants: usize,
    /// Number of distinct sources.
    pub sources: usize,
    /// Load failure description when unavailable.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

/// Load the relation graph used by the ontology stage.
///
/// Loading happens once per request; the returned model is read-only for
/// the rest of it. A failed load disables the ontology stage and must never
/// fail the request.
pub trait OntologySource: Send + Sync {
    /// Load and index the ontology.
    ///
    /// # Errors
    /// Returns [`OntologyError`] when the document cannot be read, decoded,
    /// or relates no pollutant to a source.
    fn load(&self) -> Result<OntologyModel, OntologyError>;

    /// Report whether the ontology is currently loadable.
    fn status(&self) -> OntologyStatus {
        match self.load() {
            Ok(model) => OntologyStatus {
                available: true,
                pollutants: model.pollutant_count(),
                sources: model.source_count(),
                error: None,
            },
            Err(err) => OntologyStatus {
                available: false,
                pollutants: 0,
                sources: 0,
                error: Some(err.to_string()),
            },
        }
    }
}

/// A model that is already in memory; loading clones it without I/O.
impl OntologySource for OntologyModel {
    fn load(&self) -> Result<Self, OntologyError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn model() -> OntologyModel {
        OntologyModel::default()
            .with_source(Pollutant::Pm25, "Traffic")
            .with_source(Pollutant::Pm25, "Wildfire")
            .with_source(Pollutant::So2, "Volcano")
            .with_source(Pollutant::O3, "Unmapped")
            .with_source_kind("Traffic", SourceKind::Human)
            .with_source_kind("Wildfire", SourceKind::Natural)
            .with_source_kind("Volcano", SourceKind::Natural)
    }

    #[rstest]
    fn resolves_kinds_through_sources(model: OntologyModel) {
        let mut kinds: Vec<_> = model.source_kinds(Pollutant::Pm25).collect();
        kinds.sort();
        assert_eq!(kinds, vec![SourceKind::Human, SourceKind::Natural]);
    }

    #[rstest]
    fn untagged_sources_have_no_kind(model: OntologyModel) {
        assert_eq!(model.source_kinds(Pollutant::O3).count(), 0);
        assert_eq!(model.source_kinds(Pollutant::Co).count(), 0);
    }

    #[rstest]
    fn counts_pollutants_and_sources(model: OntologyModel) {
        assert_eq!(model.pollutant_count(), 3);
        assert_eq!(model.source_count(), 4);
        assert!(!model.is_empty());
    }

    #[rstest]
    #[case("HumanSource", SourceKind::Human)]
    #[case("anthropogenic", SourceKind::Human)]
    #[case("Natural", SourceKind::Natural)]
    fn parses_source_kinds(#[case] raw: &str, #[case] expected: SourceKind) {
        assert_eq!(raw.parse::<SourceKind>(), Ok(expected));
    }

    #[rstest]
    fn loaded_model_serves_itself(model: OntologyModel) {
        let loaded = model.load().expect("in-memory model loads");
        assert_eq!(loaded, model);
        let status = model.status();
        assert!(status.available);
        assert_eq!(status.pollutants, 3);
    }

    struct BrokenSource;

    impl OntologySource for BrokenSource {
        fn load(&self) -> Result<OntologyModel, OntologyError> {
            Err(OntologyError::Empty {
                path: Utf8PathBuf::from("missing.json"),
            })
        }
    }

    #[rstest]
    fn status_reports_unavailable_source() {
        let status = BrokenSource.status();
        assert!(!status.available);
        assert!(status.error.is_some_and(|msg| msg.contains("missing.json")));
    }
}
