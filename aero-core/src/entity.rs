//! Entity references and natural keys.

use once_cell::sync::Lazy;
use oxigraph::model::{NamedNode, NamedNodeRef};
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::schema::EntityKind;
use crate::vocab::NS;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());

/// Collapse every run of non-word characters into a single `_`.
///
/// `"09/27"` and `"09_27"` both become `"09_27"`.
pub fn sanitize(text: &str) -> String {
    NON_WORD.replace_all(text.trim(), "_").into_owned()
}

/// Last path segment of a source IRI (`.../entity/Q41` → `Q41`).
pub fn source_id(raw: &str) -> &str {
    raw.rsplit('/').next().unwrap_or(raw)
}

/// Derive the natural key of an entity from its raw source identifier.
///
/// Knowledge-base entities (countries, cities, airports, runways) are keyed
/// by the trailing segment of their source IRI when given one. Airlines and
/// flights are keyed by their sanitized name. All keys are sanitized so the
/// resulting IRI is always valid.
pub fn natural_key(kind: EntityKind, raw: &str) -> String {
    match kind {
        EntityKind::Country | EntityKind::City | EntityKind::Airport | EntityKind::Runway => {
            let raw = raw.trim();
            if raw.contains("://") {
                sanitize(source_id(raw))
            } else {
                sanitize(raw)
            }
        }
        EntityKind::Airline | EntityKind::Flight => sanitize(raw),
    }
}

/// A resolved entity in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntityRef {
    /// Kind of entity
    pub kind: EntityKind,
    /// Natural key (e.g. "Q41", "09_27", "JFK_LAX_American_Airlines_Inc_11")
    pub key: String,
    /// Node IRI
    #[serde(serialize_with = "serialize_iri")]
    pub iri: NamedNode,
}

fn serialize_iri<S: serde::Serializer>(iri: &NamedNode, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(iri.as_str())
}

impl EntityRef {
    /// Build the reference for an already-derived key.
    pub fn new(kind: EntityKind, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let iri = format!("{}{}{}", NS, kind.iri_prefix(), key);
        let iri = NamedNode::new(iri.clone()).map_err(|e| Error::InvalidIri {
            iri,
            message: e.to_string(),
        })?;
        Ok(Self { kind, key, iri })
    }

    /// Recover the reference from a node IRI, if it follows the naming
    /// scheme for `kind`.
    pub fn from_iri(kind: EntityKind, iri: NamedNodeRef<'_>) -> Option<Self> {
        let key = iri.as_str().strip_prefix(NS)?.strip_prefix(kind.iri_prefix())?;
        Some(Self {
            kind,
            key: key.to_string(),
            iri: iri.into_owned(),
        })
    }

    pub fn node(&self) -> NamedNodeRef<'_> {
        self.iri.as_ref()
    }
}
