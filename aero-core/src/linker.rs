//! Relationship linking between resolved entities.

use oxigraph::model::TripleRef;
use tracing::debug;

use crate::entity::EntityRef;
use crate::error::{Error, Result};
use crate::resolver::Resolver;
use crate::schema::{EntityKind, Relation};
use crate::store::GraphStore;

/// Add `subject --relation--> object`.
///
/// Returns `true` if the edge was new. Kinds outside the relation's domain
/// or range are rejected.
pub fn link(
    store: &GraphStore,
    subject: &EntityRef,
    relation: Relation,
    object: &EntityRef,
) -> Result<bool> {
    if !relation.accepts(subject.kind, object.kind) {
        return Err(Error::InvalidLink {
            relation: relation.to_string(),
            subject: subject.kind.to_string(),
            object: object.kind.to_string(),
        });
    }
    store.insert(TripleRef::new(subject.node(), relation.predicate(), object.node()))
}

/// Link two entities by raw source identifier.
///
/// If either endpoint has not been resolved the edge is skipped and `false`
/// is returned.
pub fn link_keys(
    store: &GraphStore,
    resolver: &Resolver,
    (subject_kind, subject_id): (EntityKind, &str),
    relation: Relation,
    (object_kind, object_id): (EntityKind, &str),
) -> Result<bool> {
    let (Some(subject), Some(object)) = (
        resolver.lookup(subject_kind, subject_id),
        resolver.lookup(object_kind, object_id),
    ) else {
        debug!(
            "Skipping {} edge {}:{} -> {}:{}, endpoint not resolved",
            relation, subject_kind, subject_id, object_kind, object_id
        );
        return Ok(false);
    };
    link(store, subject, relation, object)
}
