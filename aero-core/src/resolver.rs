//! Entity resolution.
//!
//! The [`Resolver`] maps `(kind, raw source identifier)` to exactly one node
//! in the graph. The first encounter of a natural key creates the node with
//! its type, label and attributes; every later encounter returns the same
//! reference and ignores whatever the repeat record carries.

use oxigraph::model::{Literal, LiteralRef, NamedNode, TripleRef};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::entity::{natural_key, EntityRef};
use crate::error::Result;
use crate::schema::{Attribute, EntityKind};
use crate::store::GraphStore;
use crate::vocab::{owl, rdf, rdfs};

/// Everything needed to create an entity on first encounter.
#[derive(Debug, Clone)]
pub struct EntitySpec<'a> {
    pub kind: EntityKind,
    /// Source identifier the natural key is derived from
    pub raw_id: &'a str,
    /// English display label
    pub label: Option<&'a str>,
    /// Source IRI recorded with `owl:sameAs`
    pub same_as: Option<&'a str>,
    pub attributes: Vec<(Attribute, Literal)>,
}

impl<'a> EntitySpec<'a> {
    pub fn new(kind: EntityKind, raw_id: &'a str) -> Self {
        Self {
            kind,
            raw_id,
            label: None,
            same_as: None,
            attributes: Vec::new(),
        }
    }

    pub fn label(mut self, label: Option<&'a str>) -> Self {
        self.label = label;
        self
    }

    pub fn same_as(mut self, iri: Option<&'a str>) -> Self {
        self.same_as = iri;
        self
    }

    /// Attach an attribute. `None` values are dropped here so callers can
    /// pass optional source columns straight through.
    pub fn attribute(mut self, attribute: Attribute, value: Option<Literal>) -> Self {
        if let Some(value) = value {
            self.attributes.push((attribute, value));
        }
        self
    }
}

/// Outcome of [`Resolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub entity: EntityRef,
    /// `true` if this call created the node
    pub created: bool,
}

/// Run-scoped natural-key lookup tables.
#[derive(Debug, Default)]
pub struct Resolver {
    entities: HashMap<EntityKind, HashMap<String, EntityRef>>,
    airports_by_iata: HashMap<String, EntityRef>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build lookup tables from the entities already typed in `store`.
    ///
    /// Nodes whose IRI does not follow the naming scheme for their class are
    /// left out; they can still be queried but are never reused.
    pub fn seeded_from(store: &GraphStore) -> Result<Self> {
        let mut resolver = Self::new();
        for kind in EntityKind::ALL {
            let table = resolver.entities.entry(kind).or_default();
            for node in store.instances_of(kind.class())? {
                if let Some(entity) = EntityRef::from_iri(kind, node.as_ref()) {
                    table.entry(entity.key.clone()).or_insert(entity);
                }
            }
        }
        for (code, node) in store.iata_index()? {
            if let Some(airport) = EntityRef::from_iri(EntityKind::Airport, node.as_ref()) {
                resolver.airports_by_iata.entry(code).or_insert(airport);
            }
        }
        debug!(
            "Seeded resolver with {} entities and {} IATA codes",
            resolver.total(),
            resolver.airports_by_iata.len()
        );
        Ok(resolver)
    }

    /// Find an entity without creating it.
    pub fn lookup(&self, kind: EntityKind, raw_id: &str) -> Option<&EntityRef> {
        self.entities
            .get(&kind)?
            .get(&natural_key(kind, raw_id))
    }

    /// Find an airport by its IATA code.
    pub fn airport_by_iata(&self, code: &str) -> Option<&EntityRef> {
        self.airports_by_iata.get(code)
    }

    /// Number of known entities of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.get(&kind).map_or(0, HashMap::len)
    }

    pub fn total(&self) -> usize {
        self.entities.values().map(HashMap::len).sum()
    }

    /// Return the node for `spec`, creating it on first encounter.
    pub fn resolve(&mut self, store: &GraphStore, spec: EntitySpec<'_>) -> Result<Resolution> {
        let key = natural_key(spec.kind, spec.raw_id);
        if let Some(existing) = self.entities.get(&spec.kind).and_then(|t| t.get(&key)) {
            return Ok(Resolution {
                entity: existing.clone(),
                created: false,
            });
        }

        let entity = EntityRef::new(spec.kind, key)?;
        let node = entity.node();
        store.insert(TripleRef::new(node, rdf::TYPE, spec.kind.class()))?;

        if let Some(label) = spec.label {
            store.insert(TripleRef::new(
                node,
                rdfs::LABEL,
                LiteralRef::new_language_tagged_literal_unchecked(label, "en"),
            ))?;
        }

        if let Some(source) = spec.same_as {
            match NamedNode::new(source) {
                Ok(source) => {
                    store.insert(TripleRef::new(node, owl::SAME_AS, source.as_ref()))?;
                }
                Err(e) => warn!("Not linking {} to source '{}': {}", entity.iri, source, e),
            }
        }

        for (attribute, value) in &spec.attributes {
            store.insert(TripleRef::new(node, attribute.predicate(), value.as_ref()))?;
            if spec.kind == EntityKind::Airport && *attribute == Attribute::IataCode {
                self.airports_by_iata
                    .entry(value.value().to_string())
                    .or_insert_with(|| entity.clone());
            }
        }

        debug!("Created {} {}", spec.kind, entity.key);
        self.entities
            .entry(spec.kind)
            .or_default()
            .insert(entity.key.clone(), entity.clone());

        Ok(Resolution {
            entity,
            created: true,
        })
    }
}
