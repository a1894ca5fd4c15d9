use crate::error::{OntologyGraphError, ScanError};
use crate::scan::{ScanOptions, ScanResult, Scanner};
use crate::source::RdfSource;
use crate::store::TripleStore;
use oxrdfio::RdfFormat;
use std::fmt;
use std::io::{self, Write};
use tracing::info;

/// A loaded RDF graph together with the entities scanned from it.
///
/// Sources can be added later on with [`add_source`](Self::add_source): their triples are merged
/// into the same store and the entities are rebuilt from scratch.
///
/// ```
/// use ontoscan::{OntologyGraph, RdfSource};
/// use oxrdfio::RdfFormat;
///
/// let mut graph = OntologyGraph::load(RdfSource::from_text(
///     "<http://example.com/Pizza> a <http://www.w3.org/2002/07/owl#Class> .",
///     RdfFormat::Turtle,
/// ))?;
/// assert_eq!(graph.result().classes().len(), 1);
///
/// graph.add_source(RdfSource::from_text(
///     "<http://example.com/Topping> a <http://www.w3.org/2002/07/owl#Class> .",
///     RdfFormat::Turtle,
/// ))?;
/// assert_eq!(graph.triple_count(), 2);
/// assert_eq!(graph.result().top_layer().count(), 2);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug)]
pub struct OntologyGraph {
    store: TripleStore,
    options: ScanOptions,
    result: ScanResult,
}

impl OntologyGraph {
    /// Loads a source into a new store and scans it with the default [`ScanOptions`].
    pub fn load(source: RdfSource) -> Result<Self, OntologyGraphError> {
        Self::load_with_options(source, ScanOptions::default())
    }

    pub fn load_with_options(
        source: RdfSource,
        options: ScanOptions,
    ) -> Result<Self, OntologyGraphError> {
        let mut store = TripleStore::new();
        store.load(source)?;
        Ok(Self::from_store_with_options(store, options)?)
    }

    /// Scans an already populated store.
    pub fn from_store(store: TripleStore) -> Result<Self, ScanError> {
        Self::from_store_with_options(store, ScanOptions::default())
    }

    pub fn from_store_with_options(
        store: TripleStore,
        options: ScanOptions,
    ) -> Result<Self, ScanError> {
        let result = Scanner::new(&store).with_options(options.clone()).scan()?;
        Ok(Self {
            store,
            options,
            result,
        })
    }

    /// Merges the triples of another source into the store and rescans it.
    ///
    /// Entity ids are not preserved.
    pub fn add_source(&mut self, source: RdfSource) -> Result<(), OntologyGraphError> {
        self.store.load(source)?;
        self.rescan()?;
        Ok(())
    }

    /// Rebuilds all the entities from the store content.
    ///
    /// On failure the previous entities are kept.
    pub fn rescan(&mut self) -> Result<(), ScanError> {
        self.result = Scanner::new(&self.store)
            .with_options(self.options.clone())
            .scan()?;
        info!(
            triples = self.store.len(),
            classes = self.result.classes().len(),
            properties = self.result.properties().len(),
            "Rescanned graph"
        );
        Ok(())
    }

    pub fn store(&self) -> &TripleStore {
        &self.store
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// The entities of the last scan.
    pub fn result(&self) -> &ScanResult {
        &self.result
    }

    pub fn triple_count(&self) -> usize {
        self.store.len()
    }

    /// Writes all the triples of the store, with its prefixes, into the given format.
    ///
    /// ```
    /// use ontoscan::{OntologyGraph, RdfSource};
    /// use oxrdfio::RdfFormat;
    ///
    /// let graph = OntologyGraph::load(RdfSource::from_text(
    ///     "<http://example.com/Pizza> a <http://www.w3.org/2002/07/owl#Class> .",
    ///     RdfFormat::Turtle,
    /// ))?;
    /// let turtle = String::from_utf8(graph.serialize(RdfFormat::Turtle, Vec::new())?)?;
    /// assert!(turtle.contains("<http://example.com/Pizza>"));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn serialize<W: Write>(&self, format: RdfFormat, writer: W) -> io::Result<W> {
        self.store.dump_to_writer(format, writer)
    }

    pub fn into_store(self) -> TripleStore {
        self.store
    }
}

impl fmt::Display for OntologyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Ontology graph {}({} triples, {} ontologies, {} classes, {} properties)>",
            self.store
                .source_iri()
                .map(|iri| format!("{iri} "))
                .unwrap_or_default(),
            self.store.len(),
            self.result.ontologies().len(),
            self.result.classes().len(),
            self.result.properties().len()
        )
    }
}
