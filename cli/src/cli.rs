use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "ontoscan")]
/// Inspect the ontologies, classes and properties declared in RDF graphs
pub struct Args {
    /// Write the logs to stderr as JSON lines
    ///
    /// The log level is set with the RUST_LOG environment variable and defaults to "warn".
    #[arg(long, global = true)]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args)]
pub struct SourceArgs {
    /// Files or URIs of the RDF documents to inspect
    ///
    /// Several documents are merged into the same graph.
    /// URIs starting with "www." are fetched over HTTP.
    #[arg(required = true, num_args = 1.., value_hint = ValueHint::AnyPath)]
    pub sources: Vec<String>,
    /// The format of the documents
    ///
    /// It can be an extension like "ttl" or a MIME type like "text/turtle".
    /// By default the format is guessed from the document extension and defaults to RDF/XML.
    #[arg(long)]
    pub format: Option<String>,
    /// Base IRI of the files
    #[arg(long, value_hint = ValueHint::Url)]
    pub base: Option<String>,
    /// Keep the super-classes and super-properties that are not declared in the graph
    #[arg(long)]
    pub keep_unresolved_supertypes: bool,
    /// Drop the domains and ranges that are not declared classes
    #[arg(long)]
    pub drop_unresolved_domain_range: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the number of ontologies, classes and properties and the top of the class hierarchy
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the class hierarchy
    Tree {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the property hierarchy instead
        #[arg(long)]
        properties: bool,
        /// Do not print the entity ids
        #[arg(long)]
        no_ids: bool,
    },
    /// Find classes by id, IRI or IRI fragment
    ///
    /// An integer is understood as an id, an absolute IRI as an IRI and anything else as an IRI fragment.
    Find {
        /// The id, IRI or IRI fragment to look for
        query: String,
        #[command(flatten)]
        source: SourceArgs,
        /// Look for properties instead
        #[arg(long)]
        properties: bool,
    },
    /// Print the namespaces of the graph
    Namespaces {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Serialize the merged graph
    Dump {
        #[command(flatten)]
        source: SourceArgs,
        /// File to write the graph to
        ///
        /// If no file is given, stdout is used.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        to_file: Option<PathBuf>,
        /// The format of the output
        ///
        /// It can be an extension like "ttl" or a MIME type like "text/turtle".
        /// By default the format is guessed from the output file extension.
        #[arg(long, required_unless_present = "to_file")]
        to_format: Option<String>,
    },
}
