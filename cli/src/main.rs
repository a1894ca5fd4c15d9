use crate::cli::{Args, Command, SourceArgs};
use anyhow::{Context, bail};
use clap::Parser;
use ontoscan::{
    Entity, EntityQuery, Found, OntologyGraph, RdfFormat, RdfSource, ScanOptions, ScanResult,
    TreeOptions, TripleStore, UnresolvedPolicy, render_class_tree, render_property_tree,
};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufWriter, Write, stdout};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);
    match args.command {
        Command::Summary { source, json } => {
            let graph = load(&source)?;
            let summary = Summary::new(&graph);
            let mut out = stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &summary)?;
                writeln!(out)?;
            } else {
                summary.write_text(&mut out)?;
            }
            out.flush()?;
            Ok(())
        }
        Command::Tree {
            source,
            properties,
            no_ids,
        } => {
            let graph = load(&source)?;
            let options = TreeOptions::new().with_ids(!no_ids);
            let mut out = if properties {
                render_property_tree(graph.result(), stdout().lock(), options)?
            } else {
                render_class_tree(graph.result(), stdout().lock(), options)?
            };
            out.flush()?;
            Ok(())
        }
        Command::Find {
            query,
            source,
            properties,
        } => {
            let graph = load(&source)?;
            let result = graph.result();
            let entity_query = EntityQuery::guess(&query);
            if entity_query.is_empty() {
                bail!("The query must not be empty")
            }
            let mut out = stdout().lock();
            let (kind, count) = if properties {
                (
                    "property",
                    write_found(result.get_property(entity_query), result, &mut out)?,
                )
            } else {
                (
                    "class",
                    write_found(result.get_class(entity_query), result, &mut out)?,
                )
            };
            out.flush()?;
            if count == 0 {
                bail!("No {kind} matches '{query}'")
            }
            Ok(())
        }
        Command::Namespaces { source } => {
            let graph = load(&source)?;
            let mut out = stdout().lock();
            for namespace in graph.result().namespaces() {
                writeln!(out, "{namespace}")?;
            }
            out.flush()?;
            Ok(())
        }
        Command::Dump {
            source,
            to_file,
            to_format,
        } => {
            let format = if let Some(format) = to_format {
                rdf_format_from_name(&format)?
            } else if let Some(file) = &to_file {
                rdf_format_from_path(file)?
            } else {
                bail!("The --to-format option must be set when writing to stdout")
            };
            let graph = load(&source)?;
            if let Some(file) = to_file {
                close_file_writer(graph.serialize(format, BufWriter::new(File::create(file)?))?)?;
            } else {
                graph.serialize(format, stdout().lock())?.flush()?;
            }
            Ok(())
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

/// Loads all the sources into the same store and scans it.
fn load(args: &SourceArgs) -> anyhow::Result<OntologyGraph> {
    let format = args
        .format
        .as_deref()
        .map(rdf_format_from_name)
        .transpose()?;
    let mut store = TripleStore::new();
    for location in &args.sources {
        let mut source = if is_uri(location) {
            RdfSource::from_uri(location)
        } else {
            RdfSource::from_path(location)
        };
        if let Some(format) = format {
            source = source.with_format(format);
        }
        if let Some(base) = &args.base {
            source = source.with_base_iri(base);
        }
        store
            .load(source)
            .with_context(|| format!("Failed to load {location}"))?;
    }
    let options = ScanOptions::new()
        .with_unresolved_supertypes(if args.keep_unresolved_supertypes {
            UnresolvedPolicy::Retain
        } else {
            UnresolvedPolicy::Drop
        })
        .with_unresolved_domain_range(if args.drop_unresolved_domain_range {
            UnresolvedPolicy::Drop
        } else {
            UnresolvedPolicy::Retain
        });
    let graph = OntologyGraph::from_store_with_options(store, options)
        .context("Failed to scan the graph")?;
    debug!(graph = %graph, "Graph scanned");
    Ok(graph)
}

fn is_uri(location: &str) -> bool {
    ["http://", "https://", "file://", "www."]
        .iter()
        .any(|prefix| location.starts_with(prefix))
}

/// Writes one line per found entity and returns the number of lines.
fn write_found<E: Entity>(
    found: Found<'_, E>,
    result: &ScanResult,
    out: &mut impl Write,
) -> io::Result<usize> {
    let entities = found.into_vec();
    for entity in &entities {
        write!(
            out,
            "[{}] {} <{}>",
            entity.id(),
            entity.qname(result.namespaces()),
            entity.uri()
        )?;
        if let Some(label) = entity.best_label(Some("en")) {
            write!(out, " \"{label}\"")?;
        }
        writeln!(out)?;
    }
    Ok(entities.len())
}

#[derive(Serialize)]
struct Summary<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    triples: usize,
    ontologies: Vec<&'a str>,
    classes: usize,
    properties: PropertyCounts,
    top_layer: Vec<String>,
}

#[derive(Serialize)]
struct PropertyCounts {
    total: usize,
    annotation: usize,
    object: usize,
    datatype: usize,
}

impl<'a> Summary<'a> {
    fn new(graph: &'a OntologyGraph) -> Self {
        let result = graph.result();
        Self {
            source: graph.store().source_iri(),
            triples: graph.triple_count(),
            ontologies: result.ontologies().iter().map(Entity::uri).collect(),
            classes: result.classes().len(),
            properties: PropertyCounts {
                total: result.properties().len(),
                annotation: result.annotation_properties().count(),
                object: result.object_properties().count(),
                datatype: result.datatype_properties().count(),
            },
            top_layer: result
                .top_layer()
                .map(|class| class.qname(result.namespaces()))
                .collect(),
        }
    }

    fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        if let Some(source) = self.source {
            writeln!(out, "Source: {source}")?;
        }
        writeln!(out, "Triples: {}", self.triples)?;
        writeln!(out, "Ontologies: {}", self.ontologies.len())?;
        for ontology in &self.ontologies {
            writeln!(out, "    <{ontology}>")?;
        }
        writeln!(out, "Classes: {}", self.classes)?;
        writeln!(
            out,
            "Properties: {} (annotation: {}, object: {}, datatype: {})",
            self.properties.total,
            self.properties.annotation,
            self.properties.object,
            self.properties.datatype
        )?;
        writeln!(out, "Top layer: {}", self.top_layer.join(", "))
    }
}

fn rdf_format_from_path(path: &Path) -> anyhow::Result<RdfFormat> {
    let Some(ext) = path.extension().and_then(OsStr::to_str) else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    };
    RdfFormat::from_extension(ext).with_context(|| {
        format!("Not able to guess the file format from file name extension '{ext}'")
    })
}

fn rdf_format_from_name(name: &str) -> anyhow::Result<RdfFormat> {
    if let Some(t) = RdfFormat::from_extension(name) {
        return Ok(t);
    }
    if let Some(t) = RdfFormat::from_media_type(name) {
        return Ok(t);
    }
    bail!("The file format '{name}' is unknown")
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;

    #[test]
    fn uri_detection() {
        assert!(is_uri("http://example.com/onto.ttl"));
        assert!(is_uri("www.w3.org/2002/07/owl"));
        assert!(!is_uri("data/pizza.ttl"));
    }

    #[test]
    fn format_names() -> anyhow::Result<()> {
        assert_eq!(rdf_format_from_name("ttl")?, RdfFormat::Turtle);
        assert_eq!(rdf_format_from_name("application/n-triples")?, RdfFormat::NTriples);
        assert!(rdf_format_from_name("foo").is_err());
        assert!(rdf_format_from_path(Path::new("out")).is_err());
        Ok(())
    }
}
