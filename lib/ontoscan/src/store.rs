//! The in-memory triple store the scanner runs against.

use crate::error::LoadError;
use crate::http::{Client, RDF_ACCEPT};
use crate::source::{RdfSource, response_format};
use crate::vocab::DEFAULT_PREFIXES;
use oxiri::Iri;
use oxrdf::{Graph, Triple, TripleRef};
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::time::Duration;
use tracing::info;

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);
const HTTP_REDIRECTION_LIMIT: usize = 8;

/// An in-memory RDF graph together with the namespace prefixes declared by the loaded sources.
///
/// Loading is additive: every [`load`](Self::load) merges new triples into the same graph.
///
/// ```
/// use ontoscan::{RdfSource, TripleStore};
/// use oxrdfio::RdfFormat;
///
/// let mut store = TripleStore::new();
/// store.load(RdfSource::from_text(
///     "@prefix ex: <http://example.com/> . ex:s ex:p ex:o .",
///     RdfFormat::Turtle,
/// ))?;
/// assert_eq!(store.len(), 1);
/// assert!(store.prefixes().any(|(prefix, iri)| prefix == "ex" && iri == "http://example.com/"));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug)]
pub struct TripleStore {
    graph: Graph,
    prefixes: Vec<(String, String)>,
    source_iri: Option<String>,
}

impl TripleStore {
    /// Creates an empty store with the `rdf`, `rdfs`, `xml` and `xsd` prefixes bound.
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            prefixes: DEFAULT_PREFIXES
                .iter()
                .map(|(prefix, iri)| ((*prefix).to_owned(), (*iri).to_owned()))
                .collect(),
            source_iri: None,
        }
    }

    /// Loads the triples of a source into the store.
    ///
    /// The source identifier becomes the store [source IRI](Self::source_iri).
    /// Quads in named graphs are merged into the single graph of the store.
    pub fn load(&mut self, source: RdfSource) -> Result<(), LoadError> {
        let identifier = source.identifier();
        let base_iri = source.base_iri().map(ToOwned::to_owned);
        let loaded = match &source {
            RdfSource::Text { data, format, .. } => {
                self.load_from_reader(data.as_bytes(), *format, base_iri.as_deref())?
            }
            RdfSource::Path { path, .. } => {
                let file = File::open(path)?;
                self.load_from_reader(BufReader::new(file), source.format(), base_iri.as_deref())?
            }
            RdfSource::Uri { uri, format } => {
                if let Some(path) = uri.strip_prefix("file://") {
                    let file = File::open(path)?;
                    self.load_from_reader(
                        BufReader::new(file),
                        source.format(),
                        base_iri.as_deref(),
                    )?
                } else if uri.starts_with("http://") || uri.starts_with("https://") {
                    let client = Client::new(Some(HTTP_TIMEOUT), HTTP_REDIRECTION_LIMIT)?;
                    let (media_type, body) = client.get(uri, RDF_ACCEPT)?;
                    let format = match format {
                        Some(format) => *format,
                        None => response_format(uri, &media_type)?,
                    };
                    self.load_from_reader(body, format, base_iri.as_deref())?
                } else {
                    return Err(LoadError::UnsupportedSource(uri.clone()));
                }
            }
        };
        info!(source = %source, triples = loaded, "Loaded {loaded} triples");
        if identifier.is_some() {
            self.source_iri = identifier;
        }
        Ok(())
    }

    /// Parses a serialization from a reader and adds its triples and prefixes to the store.
    ///
    /// Returns the number of parsed triples.
    pub fn load_from_reader(
        &mut self,
        reader: impl Read,
        format: RdfFormat,
        base_iri: Option<&str>,
    ) -> Result<usize, LoadError> {
        let mut parser = RdfParser::from_format(format);
        if let Some(base_iri) = base_iri {
            parser = parser
                .with_base_iri(base_iri)
                .map_err(|error| LoadError::InvalidBaseIri {
                    iri: base_iri.into(),
                    error,
                })?;
        }
        let mut reader = parser.for_reader(reader);
        let mut count = 0;
        while let Some(quad) = reader.next() {
            self.graph.insert(&Triple::from(quad?));
            count += 1;
            // RDF/XML only exposes the namespaces in scope at the current position
            self.merge_prefixes(reader.prefixes());
        }
        self.merge_prefixes(reader.prefixes());
        Ok(count)
    }

    fn merge_prefixes<'a>(&mut self, prefixes: impl Iterator<Item = (&'a str, &'a str)>) {
        for (prefix, iri) in prefixes {
            if !self.prefixes.iter().any(|(p, i)| p == prefix && i == iri) {
                self.bind_prefix(prefix, iri);
            }
        }
    }

    /// Adds a triple to the store.
    pub fn insert<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> bool {
        self.graph.insert(triple)
    }

    /// Binds a prefix, replacing the namespace previously bound to it if any.
    pub fn bind_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        let prefix = prefix.into();
        let iri = iri.into();
        if let Some((_, bound)) = self.prefixes.iter_mut().find(|(p, _)| *p == prefix) {
            *bound = iri;
        } else {
            self.prefixes.push((prefix, iri));
        }
    }

    /// Sets the identifier of the graph, usually the location of the last loaded source.
    pub fn set_source_iri(&mut self, iri: impl Into<String>) {
        self.source_iri = Some(iri.into());
    }

    /// The identifier of the graph, usually the location of the last loaded source.
    pub fn source_iri(&self) -> Option<&str> {
        self.source_iri.as_deref()
    }

    /// The bound `(prefix, namespace)` pairs, in binding order.
    ///
    /// The base namespace, if declared, has an empty prefix.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| (prefix.as_str(), iri.as_str()))
    }

    /// The underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The number of triples in the store.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Checks if the store contains no triple.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Writes the whole store into the given serialization, with the bound prefixes.
    ///
    /// Prefixes whose namespace is not a valid IRI (e.g. a file path used as source identifier) are skipped.
    pub fn dump_to_writer<W: Write>(&self, format: RdfFormat, writer: W) -> io::Result<W> {
        let mut serializer = RdfSerializer::from_format(format);
        for (prefix, iri) in self.prefixes() {
            if Iri::parse(iri).is_err() {
                continue;
            }
            serializer = serializer
                .with_prefix(prefix, iri)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        }
        let mut serializer = serializer.for_writer(writer);
        for triple in &self.graph {
            serializer.serialize_triple(triple)?;
        }
        serializer.finish()
    }
}

impl Default for TripleStore {
    fn default() -> Self {
        Self::new()
    }
}
