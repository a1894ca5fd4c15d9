use oxiri::IriParseError;
use oxrdfio::RdfParseError;
use std::error::Error;
use std::io;

/// An error raised while loading a source into a [`TripleStore`](crate::TripleStore).
///
/// Loading errors are fatal: no entity state is produced from a source that could not be read.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    /// An error raised while reading the file or fetching the remote document.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error raised while parsing the serialization.
    #[error(transparent)]
    Parse(#[from] RdfParseError),
    /// The base IRI is invalid.
    #[error("Invalid base IRI '{iri}': {error}")]
    InvalidBaseIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
    /// The source is neither a text, a file nor a supported URI.
    #[error("The source {0} is not supported, only text, files and http(s) or file URIs are")]
    UnsupportedSource(String),
    /// The serialization format could not be determined.
    #[error("The RDF serialization {0} is not supported")]
    UnsupportedFormat(String),
}

impl From<LoadError> for io::Error {
    #[inline]
    fn from(error: LoadError) -> Self {
        match error {
            LoadError::Io(error) => error,
            LoadError::Parse(error) => error.into(),
            LoadError::InvalidBaseIri { .. }
            | LoadError::UnsupportedSource(_)
            | LoadError::UnsupportedFormat(_) => {
                Self::new(io::ErrorKind::InvalidInput, error.to_string())
            }
        }
    }
}

/// An error returned by a [`SchemaQueries`](crate::SchemaQueries) backend.
///
/// The in-memory [`TripleStore`](crate::TripleStore) never fails, other backends wrap their own
/// errors into this type.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct QueryError(Box<dyn Error + Send + Sync + 'static>);

impl QueryError {
    /// Wraps a backend error.
    pub fn new(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self(error.into())
    }

    /// Attempts to recover the backend error.
    pub fn downcast<E: Error + 'static>(self) -> Result<Box<E>, Self> {
        self.0.downcast().map_err(Self)
    }
}

/// An error raised during a [`Scanner::scan`](crate::Scanner::scan).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ScanError {
    /// The store could not be queried.
    #[error("Failed to query the store during the {phase} extraction: {error}")]
    Query {
        /// The extraction phase that failed.
        phase: &'static str,
        /// The backend error.
        #[source]
        error: QueryError,
    },
}

impl ScanError {
    pub(crate) fn query(phase: &'static str) -> impl FnOnce(QueryError) -> Self {
        move |error| Self::Query { phase, error }
    }
}

/// An error raised by [`OntologyGraph`](crate::OntologyGraph) operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OntologyGraphError {
    /// The source could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The loaded store could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),
}
