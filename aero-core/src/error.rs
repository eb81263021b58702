//! Error types for aero-core.

use thiserror::Error;

/// Result type alias for aero-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, building or querying the graph.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying triple store rejected an operation.
    #[error("Store error: {message}")]
    Store {
        /// Description of the storage failure.
        message: String,
    },

    /// An RDF document could not be parsed into the store.
    #[error("Failed to load RDF from {source_name}: {message}")]
    Load {
        /// File path or stream name that was being loaded.
        source_name: String,
        /// Parser or loader message.
        message: String,
    },

    /// The graph could not be serialized.
    #[error("Failed to serialize graph: {message}")]
    Serialize {
        /// Serializer message.
        message: String,
    },

    /// A SPARQL query failed to parse or evaluate.
    #[error("Query error: {message}")]
    Query {
        /// Evaluation message.
        message: String,
    },

    /// A generated entity IRI was rejected.
    #[error("Invalid IRI '{iri}': {message}")]
    InvalidIri {
        /// The offending IRI.
        iri: String,
        /// Parser message.
        message: String,
    },

    /// An edge was requested between kinds the relation does not connect.
    #[error("Cannot link {subject} to {object} with {relation}")]
    InvalidLink {
        /// Relation name.
        relation: String,
        /// Subject kind.
        subject: String,
        /// Object kind.
        object: String,
    },

    /// A remote result document did not have the expected shape.
    #[error("Malformed SPARQL results: {0}")]
    Decode(#[from] serde_json::Error),

    /// IO error reading or writing graph files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<oxigraph::store::StorageError> for Error {
    fn from(err: oxigraph::store::StorageError) -> Self {
        Error::Store {
            message: err.to_string(),
        }
    }
}

impl From<oxigraph::sparql::EvaluationError> for Error {
    fn from(err: oxigraph::sparql::EvaluationError) -> Self {
        Error::Query {
            message: err.to_string(),
        }
    }
}

impl From<oxigraph::store::SerializerError> for Error {
    fn from(err: oxigraph::store::SerializerError) -> Self {
        Error::Serialize {
            message: err.to_string(),
        }
    }
}
