//! GraphStore - in-memory triple store for the airport graph.
//!
//! Wraps an oxigraph [`Store`] holding a single default graph. Files are read
//! and written as RDF/XML; queries are SPARQL.

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{
    GraphNameRef, Literal, NamedNode, NamedNodeRef, Subject, Term, TermRef, TripleRef,
};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::schema::EntityKind;
use crate::vocab::{self, rdf};

/// Tabular result of a query. Terms are kept as-is; display shortening is
/// left to the caller.
#[derive(Debug, Clone, Default)]
pub struct QueryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<Term>>>,
    pub execution_time_ms: u64,
}

impl QueryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Graph statistics.
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub triple_count: usize,
    pub entity_counts: BTreeMap<EntityKind, usize>,
}

/// In-memory RDF graph.
pub struct GraphStore {
    store: Store,
}

impl GraphStore {
    /// Create an empty graph.
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: Store::new()?,
        })
    }

    /// Create a graph and load `path` into it when the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new()?;
        store.load_if_exists(path)?;
        Ok(store)
    }

    /// Load an RDF/XML file. Returns `false` if the file does not exist.
    pub fn load_if_exists(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No graph at {:?}, nothing to load", path);
            return Ok(false);
        }
        self.load_file(path)?;
        Ok(true)
    }

    /// Load an RDF/XML file, adding its triples to the graph.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let start = Instant::now();
        let before = self.len()?;
        let file = File::open(path)?;
        self.load_rdfxml(BufReader::new(file), &path.display().to_string())?;
        info!(
            "Loaded {} triples from {:?} in {:?}",
            self.len()? - before,
            path,
            start.elapsed()
        );
        Ok(())
    }

    /// Load RDF/XML from any reader.
    pub fn load_rdfxml(&self, reader: impl Read, source_name: &str) -> Result<()> {
        self.store
            .load_from_reader(RdfParser::from_format(RdfFormat::RdfXml), reader)
            .map_err(|e| Error::Load {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })
    }

    /// Serialize the graph as RDF/XML to a file, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_rdfxml(&mut writer)?;
        writer.flush()?;
        info!("Saved {} triples to {:?}", self.len()?, path);
        Ok(())
    }

    /// Serialize the graph as RDF/XML to any writer.
    pub fn write_rdfxml<W: Write>(&self, writer: W) -> Result<W> {
        Ok(self
            .store
            .dump_graph_to_writer(GraphNameRef::DefaultGraph, RdfFormat::RdfXml, writer)?)
    }

    /// Add a triple. Returns `true` if it was not already present.
    pub fn insert(&self, triple: TripleRef<'_>) -> Result<bool> {
        Ok(self
            .store
            .insert(triple.in_graph(GraphNameRef::DefaultGraph))?)
    }

    pub fn contains(&self, triple: TripleRef<'_>) -> Result<bool> {
        Ok(self
            .store
            .contains(triple.in_graph(GraphNameRef::DefaultGraph))?)
    }

    /// Number of triples.
    pub fn len(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.is_empty()?)
    }

    /// All objects of `(subject, predicate, ?)`.
    pub fn objects(&self, subject: NamedNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Result<Vec<Term>> {
        self.store
            .quads_for_pattern(
                Some(subject.into()),
                Some(predicate),
                None,
                Some(GraphNameRef::DefaultGraph),
            )
            .map(|quad| quad.map(|q| q.object).map_err(Error::from))
            .collect()
    }

    /// All named subjects typed with `class`.
    pub fn instances_of(&self, class: NamedNodeRef<'_>) -> Result<Vec<NamedNode>> {
        let mut subjects = Vec::new();
        for quad in self.store.quads_for_pattern(
            None,
            Some(rdf::TYPE),
            Some(class.into()),
            Some(GraphNameRef::DefaultGraph),
        ) {
            if let Subject::NamedNode(node) = quad?.subject {
                subjects.push(node);
            }
        }
        Ok(subjects)
    }

    /// All `(subject, literal value)` pairs for a datatype property.
    pub fn literal_pairs(&self, predicate: NamedNodeRef<'_>) -> Result<Vec<(NamedNode, String)>> {
        let mut pairs = Vec::new();
        for quad in self.store.quads_for_pattern(
            None,
            Some(predicate),
            None,
            Some(GraphNameRef::DefaultGraph),
        ) {
            let quad = quad?;
            if let (Subject::NamedNode(node), Term::Literal(literal)) =
                (quad.subject, quad.object)
            {
                pairs.push((node, literal.value().to_string()));
            }
        }
        Ok(pairs)
    }

    /// The first literal of `(subject, predicate, ?)`, if any.
    pub fn literal(&self, subject: NamedNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Result<Option<Literal>> {
        Ok(self
            .objects(subject, predicate)?
            .into_iter()
            .find_map(|term| match term {
                Term::Literal(literal) => Some(literal),
                _ => None,
            }))
    }

    /// Count triples matching `(?, predicate, object)`.
    pub fn count_with_object(&self, predicate: NamedNodeRef<'_>, object: TermRef<'_>) -> Result<usize> {
        let mut count = 0;
        for quad in self.store.quads_for_pattern(
            None,
            Some(predicate),
            Some(object),
            Some(GraphNameRef::DefaultGraph),
        ) {
            quad?;
            count += 1;
        }
        Ok(count)
    }

    /// Triple count and entity counts per kind.
    pub fn stats(&self) -> Result<GraphStats> {
        let mut entity_counts = BTreeMap::new();
        for kind in EntityKind::ALL {
            entity_counts.insert(kind, self.count_with_object(rdf::TYPE, kind.class().into())?);
        }
        Ok(GraphStats {
            triple_count: self.len()?,
            entity_counts,
        })
    }

    /// Evaluate a SPARQL query (SELECT, ASK or CONSTRUCT/DESCRIBE).
    ///
    /// Graph results come back as a `subject`/`predicate`/`object` table and
    /// boolean results as a single `result` cell.
    pub fn query(&self, sparql: &str) -> Result<QueryTable> {
        let start = Instant::now();
        let mut table = QueryTable::default();

        match self.store.query(sparql)? {
            QueryResults::Solutions(solutions) => {
                table.columns = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                for solution in solutions {
                    let solution = solution?;
                    let row = table
                        .columns
                        .iter()
                        .map(|column| solution.get(column.as_str()).cloned())
                        .collect();
                    table.rows.push(row);
                }
            }
            QueryResults::Boolean(value) => {
                table.columns = vec!["result".to_string()];
                table.rows.push(vec![Some(Literal::from(value).into())]);
            }
            QueryResults::Graph(triples) => {
                table.columns = vec![
                    "subject".to_string(),
                    "predicate".to_string(),
                    "object".to_string(),
                ];
                for triple in triples {
                    let triple = triple?;
                    table.rows.push(vec![
                        Some(triple.subject.into()),
                        Some(triple.predicate.into()),
                        Some(triple.object),
                    ]);
                }
            }
        }

        table.execution_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Query returned {} row(s) in {}ms",
            table.rows.len(),
            table.execution_time_ms
        );
        Ok(table)
    }

    /// Every `(IATA code, airport node)` pair in the graph.
    pub fn iata_index(&self) -> Result<Vec<(String, NamedNode)>> {
        Ok(self
            .literal_pairs(vocab::HAS_IATA_CODE)?
            .into_iter()
            .map(|(node, code)| (code, node))
            .collect())
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("triples", &self.store.len().unwrap_or(0))
            .finish()
    }
}
