#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod entity;
mod error;
mod graph;
mod http;
mod lookup;
mod namespace;
mod query;
mod scan;
mod source;
mod store;
mod tree;
pub mod vocab;

pub use crate::entity::{
    Class, ClassId, ClassRef, Entity, EntityHandle, Hierarchical, Ontology, Property, PropertyId,
    PropertyKind,
};
pub use crate::error::{LoadError, OntologyGraphError, QueryError, ScanError};
pub use crate::graph::OntologyGraph;
pub use crate::lookup::{EntityQuery, Found};
pub use crate::namespace::{Namespace, Namespaces, infer_prefix};
pub use crate::query::{
    CLASS_TYPES, Hierarchy, PROPERTY_TYPES, PredicateObject, QueryRow, SchemaQueries,
};
pub use crate::scan::{ScanOptions, ScanResult, Scanner, UnresolvedPolicy};
pub use crate::source::{RdfSource, guess_format};
pub use crate::store::TripleStore;
pub use crate::tree::{TreeOptions, render_class_tree, render_property_tree};
pub use oxrdfio::RdfFormat;
