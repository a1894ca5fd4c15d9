//! The lookups the scanner runs against a triple store.

use crate::error::QueryError;
use crate::store::TripleStore;
use crate::vocab::{owl, rdf, rdfs};
use oxrdf::{NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Term, TermRef};

/// A `(predicate, object)` pair of a triple whose subject is a scanned entity.
pub type PredicateObject = (NamedNode, Term);

/// A row returned by the declaration lookups: a candidate entity and the RDF type it is declared with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryRow {
    /// The declared node, possibly a blank node.
    pub subject: NamedOrBlankNode,
    /// The type the node is declared with.
    pub rdf_type: Option<NamedNode>,
}

/// The subsumption hierarchies the scanner builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hierarchy {
    /// `rdfs:subClassOf`.
    Class,
    /// `rdfs:subPropertyOf`.
    Property,
}

impl Hierarchy {
    /// The subsumption predicate of the hierarchy.
    pub fn predicate(self) -> NamedNodeRef<'static> {
        match self {
            Self::Class => rdfs::SUB_CLASS_OF,
            Self::Property => rdfs::SUB_PROPERTY_OF,
        }
    }
}

/// RDF types a node must be declared with to be scanned as a class.
pub const CLASS_TYPES: [NamedNodeRef<'static>; 2] = [rdfs::CLASS, owl::CLASS];

/// RDF types a node must be declared with to be scanned as a property.
pub const PROPERTY_TYPES: [NamedNodeRef<'static>; 4] = [
    rdf::PROPERTY,
    owl::OBJECT_PROPERTY,
    owl::DATATYPE_PROPERTY,
    owl::ANNOTATION_PROPERTY,
];

/// The canonical lookups the [`Scanner`](crate::Scanner) needs from a triple store.
///
/// Implementations are free to return duplicated rows, blank nodes or rows in any order:
/// the scanner does not rely on the store to enforce any invariant.
pub trait SchemaQueries {
    /// The `(prefix, namespace)` pairs known to the store, the base namespace having an empty prefix.
    fn namespaces(&self) -> Result<Vec<(String, String)>, QueryError>;

    /// The identifier of the graph, usually where it has been loaded from.
    fn source_iri(&self) -> Option<&str>;

    /// All nodes declared as `owl:Ontology`.
    fn ontology_declarations(&self) -> Result<Vec<QueryRow>, QueryError>;

    /// All nodes declared with one of the [`CLASS_TYPES`], one row per declaration.
    fn class_declarations(&self) -> Result<Vec<QueryRow>, QueryError>;

    /// All nodes declared with one of the [`PROPERTY_TYPES`], one row per declaration.
    fn property_declarations(&self) -> Result<Vec<QueryRow>, QueryError>;

    /// The direct (one-hop, not transitive) super-entities of `entity` in the given hierarchy.
    fn direct_supers(
        &self,
        entity: NamedNodeRef<'_>,
        hierarchy: Hierarchy,
    ) -> Result<Vec<NamedOrBlankNode>, QueryError>;

    /// All the `(predicate, object)` pairs of the triples whose subject is `entity`.
    fn entity_triples(
        &self,
        entity: NamedOrBlankNodeRef<'_>,
    ) -> Result<Vec<PredicateObject>, QueryError>;
}

impl SchemaQueries for TripleStore {
    fn namespaces(&self) -> Result<Vec<(String, String)>, QueryError> {
        Ok(self
            .prefixes()
            .map(|(prefix, iri)| (prefix.to_owned(), iri.to_owned()))
            .collect())
    }

    fn source_iri(&self) -> Option<&str> {
        TripleStore::source_iri(self)
    }

    fn ontology_declarations(&self) -> Result<Vec<QueryRow>, QueryError> {
        Ok(declarations(self, &[owl::ONTOLOGY]))
    }

    fn class_declarations(&self) -> Result<Vec<QueryRow>, QueryError> {
        Ok(declarations(self, &CLASS_TYPES))
    }

    fn property_declarations(&self) -> Result<Vec<QueryRow>, QueryError> {
        Ok(declarations(self, &PROPERTY_TYPES))
    }

    fn direct_supers(
        &self,
        entity: NamedNodeRef<'_>,
        hierarchy: Hierarchy,
    ) -> Result<Vec<NamedOrBlankNode>, QueryError> {
        let mut supers = self
            .graph()
            .objects_for_subject_predicate(entity, hierarchy.predicate())
            .filter_map(|object| match object {
                TermRef::NamedNode(node) => Some(NamedOrBlankNode::from(node.into_owned())),
                TermRef::BlankNode(node) => Some(NamedOrBlankNode::from(node.into_owned())),
                TermRef::Literal(_) => None,
            })
            .collect::<Vec<_>>();
        supers.sort_by_cached_key(ToString::to_string);
        Ok(supers)
    }

    fn entity_triples(
        &self,
        entity: NamedOrBlankNodeRef<'_>,
    ) -> Result<Vec<PredicateObject>, QueryError> {
        let mut triples = self
            .graph()
            .triples_for_subject(entity)
            .map(|triple| (triple.predicate.into_owned(), triple.object.into_owned()))
            .collect::<Vec<_>>();
        triples.sort_by_cached_key(|(predicate, object)| {
            (predicate.to_string(), object.to_string())
        });
        Ok(triples)
    }
}

/// Rows for every node typed with one of `types`, ordered by node then by type.
fn declarations(store: &TripleStore, types: &[NamedNodeRef<'_>]) -> Vec<QueryRow> {
    let mut rows = Vec::new();
    for rdf_type in types {
        for subject in store
            .graph()
            .subjects_for_predicate_object(rdf::TYPE, *rdf_type)
        {
            rows.push(QueryRow {
                subject: subject.into_owned(),
                rdf_type: Some(rdf_type.into_owned()),
            });
        }
    }
    rows.sort_by_cached_key(|row| {
        let rank = types
            .iter()
            .position(|t| row.rdf_type.as_ref().is_some_and(|r| r.as_ref() == *t));
        (row.subject.to_string(), rank)
    });
    rows
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use crate::source::RdfSource;
    use oxrdfio::RdfFormat;
    use std::error::Error;

    const DATA: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.com/> .

ex:A a owl:Class, rdfs:Class .
ex:B a owl:Class ; rdfs:subClassOf ex:A, [ a owl:Restriction ], ex:C .
ex:B rdfs:label "B" .
ex:C a rdfs:Class ; rdfs:subClassOf ex:A .
"#;

    fn store() -> Result<TripleStore, Box<dyn Error>> {
        let mut store = TripleStore::new();
        store.load(RdfSource::from_text(DATA, RdfFormat::Turtle))?;
        Ok(store)
    }

    #[test]
    fn class_rows_keep_every_declaration() -> Result<(), Box<dyn Error>> {
        let rows = store()?.class_declarations()?;
        let rows = rows
            .iter()
            .map(|row| {
                (
                    row.subject.to_string(),
                    row.rdf_type.as_ref().map(NamedNode::as_str),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            [
                ("<http://example.com/A>".to_owned(), Some(rdfs::CLASS.as_str())),
                ("<http://example.com/A>".to_owned(), Some(owl::CLASS.as_str())),
                ("<http://example.com/B>".to_owned(), Some(owl::CLASS.as_str())),
                ("<http://example.com/C>".to_owned(), Some(rdfs::CLASS.as_str())),
            ]
        );
        Ok(())
    }

    #[test]
    fn direct_supers_are_one_hop() -> Result<(), Box<dyn Error>> {
        let store = store()?;
        let supers = store.direct_supers(
            NamedNodeRef::new("http://example.com/B")?,
            Hierarchy::Class,
        )?;
        assert_eq!(supers.len(), 3);
        assert_eq!(
            supers
                .iter()
                .filter(|node| matches!(node, NamedOrBlankNode::BlankNode(_)))
                .count(),
            1
        );
        let supers = store.direct_supers(
            NamedNodeRef::new("http://example.com/A")?,
            Hierarchy::Class,
        )?;
        assert!(supers.is_empty());
        Ok(())
    }

    #[test]
    fn entity_triples_only_have_the_entity_as_subject() -> Result<(), Box<dyn Error>> {
        let store = store()?;
        let triples = store.entity_triples(NamedNodeRef::new("http://example.com/B")?.into())?;
        assert_eq!(triples.len(), 5);
        assert!(triples.iter().any(|(predicate, _)| *predicate == rdfs::LABEL));
        Ok(())
    }
}
