//! Ontologies, classes and properties found by a scan, and the operations linking them together.

use crate::namespace::Namespaces;
use crate::query::PredicateObject;
use crate::vocab::{dc, dcterms, owl, rdfs, skos};
use oxrdf::{NamedNode, NamedNodeRef, NamedOrBlankNode, Term};
use std::fmt;
use std::hash::Hash;
use tracing::trace;

/// Handle of a [`Class`] inside a [`ScanResult`](crate::ScanResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(usize);

/// Handle of a [`Property`] inside a [`ScanResult`](crate::ScanResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(usize);

/// Handles of entities stored in a [`ScanResult`](crate::ScanResult) vector.
pub trait EntityHandle: Copy + Eq + Hash + fmt::Debug {
    #[doc(hidden)]
    fn from_index(index: usize) -> Self;

    /// The position of the entity in its collection.
    fn index(self) -> usize;
}

impl EntityHandle for ClassId {
    #[inline]
    fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

impl EntityHandle for PropertyId {
    #[inline]
    fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// What every scanned entity provides.
pub trait Entity {
    /// The entity identifier.
    ///
    /// It is the IRI of classes and properties. For ontologies declared on a blank node it is the
    /// Dublin Core identifier found for the node.
    fn uri(&self) -> &str;

    /// Scan-local sequential number, starting at 1 in creation order.
    ///
    /// Only meaningful inside the scan that created the entity.
    fn id(&self) -> usize;

    /// The type the entity is declared with, `None` for ontologies.
    fn rdf_type(&self) -> Option<NamedNodeRef<'_>>;

    /// The `(predicate, object)` pairs of the triples whose subject is the entity.
    fn triples(&self) -> &[PredicateObject];

    /// A short display name, built from the namespace table.
    fn qname(&self, namespaces: &Namespaces) -> String {
        namespaces.qname(self.uri())
    }

    /// The objects of the entity triples with the given predicate.
    fn values_for<'a>(
        &'a self,
        predicate: NamedNodeRef<'a>,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples()
            .iter()
            .filter(move |(p, _)| *p == predicate)
            .map(|(_, o)| o)
    }

    /// The `rdfs:label` (or else `skos:prefLabel`) of the entity, preferably in the given language.
    fn best_label(&self, language: Option<&str>) -> Option<&str> {
        best_literal(self, &[rdfs::LABEL, skos::PREF_LABEL], language)
    }

    /// The `rdfs:comment` (or else Dublin Core description) of the entity, preferably in English.
    fn best_description(&self) -> Option<&str> {
        best_literal(
            self,
            &[rdfs::COMMENT, dcterms::DESCRIPTION, dc::DESCRIPTION],
            Some("en"),
        )
    }
}

/// Picks a literal value: first by predicate order, then by language (requested one, untagged, any).
fn best_literal<'a, E: Entity + ?Sized>(
    entity: &'a E,
    predicates: &[NamedNodeRef<'_>],
    language: Option<&str>,
) -> Option<&'a str> {
    for predicate in predicates {
        let literals = entity
            .triples()
            .iter()
            .filter(|(p, _)| p == predicate)
            .filter_map(|(_, o)| match o {
                Term::Literal(literal) => Some(literal),
                _ => None,
            })
            .collect::<Vec<_>>();
        let best = language
            .and_then(|language| {
                literals.iter().find(|literal| {
                    literal
                        .language()
                        .is_some_and(|l| l.eq_ignore_ascii_case(language))
                })
            })
            .or_else(|| literals.iter().find(|literal| literal.language().is_none()))
            .or_else(|| literals.first());
        if let Some(literal) = best {
            return Some(literal.value());
        }
    }
    None
}

/// Entities organized in a subsumption hierarchy.
pub trait Hierarchical: Entity {
    type Handle: EntityHandle;

    /// Direct (one-hop) super-entities.
    fn parents(&self) -> &[Self::Handle];

    /// Direct (one-hop) sub-entities, the inverse of [`parents`](Self::parents).
    fn children(&self) -> &[Self::Handle];

    /// Super-entity IRIs without a matching declaration, kept only with
    /// [`UnresolvedPolicy::Retain`](crate::UnresolvedPolicy::Retain).
    fn unresolved_parents(&self) -> &[NamedNode];

    #[doc(hidden)]
    fn edges_mut(&mut self) -> HierarchyEdges<'_, Self::Handle>;
}

#[doc(hidden)]
pub struct HierarchyEdges<'a, H> {
    parents: &'a mut Vec<H>,
    children: &'a mut Vec<H>,
    unresolved_parents: &'a mut Vec<NamedNode>,
}

/// Adds the `child ⊑ parent` edge, in both directions.
///
/// Returns `false` if the edge already existed or is a self loop.
/// This is the only way hierarchy edges are created, so `parents` and `children` stay symmetric.
pub(crate) fn link_hierarchy<N: Hierarchical>(
    nodes: &mut [N],
    child: N::Handle,
    parent: N::Handle,
) -> bool {
    if child == parent {
        trace!(uri = nodes[child.index()].uri(), "Ignoring self subsumption");
        return false;
    }
    let inserted = {
        let edges = nodes[child.index()].edges_mut();
        if edges.parents.contains(&parent) {
            false
        } else {
            edges.parents.push(parent);
            true
        }
    };
    let edges = nodes[parent.index()].edges_mut();
    if !edges.children.contains(&child) {
        edges.children.push(child);
    }
    if inserted {
        trace!(
            child = nodes[child.index()].uri(),
            parent = nodes[parent.index()].uri(),
            "Linked hierarchy edge"
        );
    }
    inserted
}

/// Records a super-entity IRI that matches no declared entity.
pub(crate) fn retain_unresolved_parent<N: Hierarchical>(node: &mut N, parent: NamedNode) {
    let edges = node.edges_mut();
    if !edges.unresolved_parents.contains(&parent) {
        edges.unresolved_parents.push(parent);
    }
}

/// The target of a property domain or range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassRef {
    /// A class found by the scan.
    Declared(ClassId),
    /// An IRI that is not a scanned class, e.g. a datatype like `xsd:string`.
    External(NamedNode),
}

impl ClassRef {
    /// The handle of the scanned class, if any.
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            Self::Declared(id) => Some(*id),
            Self::External(_) => None,
        }
    }
}

/// Which side of a property a class is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PropertyEnd {
    Domain,
    Range,
}

/// Attaches a resolved class as domain or range of a property, and the property to the class.
pub(crate) fn link_property_class(
    classes: &mut [Class],
    properties: &mut [Property],
    property: PropertyId,
    class: ClassId,
    end: PropertyEnd,
) {
    let target = ClassRef::Declared(class);
    let (targets, back_edges) = match end {
        PropertyEnd::Domain => (
            &mut properties[property.index()].domains,
            &mut classes[class.index()].domain_of,
        ),
        PropertyEnd::Range => (
            &mut properties[property.index()].ranges,
            &mut classes[class.index()].range_of,
        ),
    };
    if !targets.contains(&target) {
        targets.push(target);
    }
    if !back_edges.contains(&property) {
        back_edges.push(property);
    }
    trace!(
        property = properties[property.index()].uri(),
        class = classes[class.index()].uri(),
        ?end,
        "Linked property to class"
    );
}

/// Attaches an IRI that matches no class as domain or range of a property, without back edge.
pub(crate) fn link_property_external(property: &mut Property, iri: NamedNode, end: PropertyEnd) {
    let target = ClassRef::External(iri);
    let targets = match end {
        PropertyEnd::Domain => &mut property.domains,
        PropertyEnd::Range => &mut property.ranges,
    };
    if !targets.contains(&target) {
        targets.push(target);
    }
}

/// An ontology declaration (`owl:Ontology`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ontology {
    uri: String,
    node: NamedOrBlankNode,
    id: usize,
    triples: Vec<PredicateObject>,
}

impl Ontology {
    pub(crate) fn new(uri: String, node: NamedOrBlankNode, id: usize) -> Self {
        Self {
            uri,
            node,
            id,
            triples: Vec::new(),
        }
    }

    /// The node the ontology is declared on.
    ///
    /// It differs from [`uri`](Entity::uri) for ontologies declared on a blank node.
    pub fn node(&self) -> &NamedOrBlankNode {
        &self.node
    }

    pub(crate) fn set_triples(&mut self, triples: Vec<PredicateObject>) {
        self.triples = triples;
    }

    /// The IRIs imported with `owl:imports`.
    pub fn imports(&self) -> impl Iterator<Item = &NamedNode> {
        self.values_for(owl::IMPORTS).filter_map(|term| match term {
            Term::NamedNode(node) => Some(node),
            _ => None,
        })
    }
}

impl Entity for Ontology {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn id(&self) -> usize {
        self.id
    }

    fn rdf_type(&self) -> Option<NamedNodeRef<'_>> {
        None
    }

    fn triples(&self) -> &[PredicateObject] {
        &self.triples
    }
}

impl fmt::Display for Ontology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ontology <{}>", self.uri)
    }
}

/// A class declaration (`rdfs:Class` or `owl:Class`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    iri: NamedNode,
    rdf_type: NamedNode,
    id: usize,
    triples: Vec<PredicateObject>,
    parents: Vec<ClassId>,
    children: Vec<ClassId>,
    unresolved_parents: Vec<NamedNode>,
    domain_of: Vec<PropertyId>,
    range_of: Vec<PropertyId>,
}

impl Class {
    pub(crate) fn new(iri: NamedNode, rdf_type: NamedNode, id: usize) -> Self {
        Self {
            iri,
            rdf_type,
            id,
            triples: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            unresolved_parents: Vec::new(),
            domain_of: Vec::new(),
            range_of: Vec::new(),
        }
    }

    pub fn iri(&self) -> NamedNodeRef<'_> {
        self.iri.as_ref()
    }

    /// Checks if the class is declared as an `owl:Class` (and not only `rdfs:Class`).
    pub fn is_owl_class(&self) -> bool {
        self.rdf_type == owl::CLASS
    }

    /// The properties having this class as domain.
    pub fn domain_of(&self) -> &[PropertyId] {
        &self.domain_of
    }

    /// The properties having this class as range.
    pub fn range_of(&self) -> &[PropertyId] {
        &self.range_of
    }

    pub(crate) fn set_triples(&mut self, triples: Vec<PredicateObject>) {
        self.triples = triples;
    }
}

impl Entity for Class {
    fn uri(&self) -> &str {
        self.iri.as_str()
    }

    fn id(&self) -> usize {
        self.id
    }

    fn rdf_type(&self) -> Option<NamedNodeRef<'_>> {
        Some(self.rdf_type.as_ref())
    }

    fn triples(&self) -> &[PredicateObject] {
        &self.triples
    }
}

impl Hierarchical for Class {
    type Handle = ClassId;

    fn parents(&self) -> &[ClassId] {
        &self.parents
    }

    fn children(&self) -> &[ClassId] {
        &self.children
    }

    fn unresolved_parents(&self) -> &[NamedNode] {
        &self.unresolved_parents
    }

    fn edges_mut(&mut self) -> HierarchyEdges<'_, ClassId> {
        HierarchyEdges {
            parents: &mut self.parents,
            children: &mut self.children,
            unresolved_parents: &mut self.unresolved_parents,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class {}", self.iri)
    }
}

/// The kind of a property, from the type it is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// `owl:AnnotationProperty`.
    Annotation,
    /// `owl:ObjectProperty`.
    Object,
    /// `owl:DatatypeProperty`.
    Datatype,
    /// Any other type, e.g. a plain `rdf:Property`.
    Other,
}

impl PropertyKind {
    pub fn from_rdf_type(rdf_type: NamedNodeRef<'_>) -> Self {
        if rdf_type == owl::ANNOTATION_PROPERTY {
            Self::Annotation
        } else if rdf_type == owl::OBJECT_PROPERTY {
            Self::Object
        } else if rdf_type == owl::DATATYPE_PROPERTY {
            Self::Datatype
        } else {
            Self::Other
        }
    }
}

/// A property declaration (`rdf:Property` or one of the OWL property types).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    iri: NamedNode,
    rdf_type: NamedNode,
    kind: PropertyKind,
    id: usize,
    triples: Vec<PredicateObject>,
    parents: Vec<PropertyId>,
    children: Vec<PropertyId>,
    unresolved_parents: Vec<NamedNode>,
    domains: Vec<ClassRef>,
    ranges: Vec<ClassRef>,
}

impl Property {
    pub(crate) fn new(iri: NamedNode, rdf_type: NamedNode, id: usize) -> Self {
        Self {
            kind: PropertyKind::from_rdf_type(rdf_type.as_ref()),
            iri,
            rdf_type,
            id,
            triples: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            unresolved_parents: Vec::new(),
            domains: Vec::new(),
            ranges: Vec::new(),
        }
    }

    pub fn iri(&self) -> NamedNodeRef<'_> {
        self.iri.as_ref()
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// The asserted domains, scanned classes or raw IRIs.
    pub fn domains(&self) -> &[ClassRef] {
        &self.domains
    }

    /// The asserted ranges, scanned classes or raw IRIs (often datatypes).
    pub fn ranges(&self) -> &[ClassRef] {
        &self.ranges
    }

    pub(crate) fn set_triples(&mut self, triples: Vec<PredicateObject>) {
        self.triples = triples;
    }
}

impl Entity for Property {
    fn uri(&self) -> &str {
        self.iri.as_str()
    }

    fn id(&self) -> usize {
        self.id
    }

    fn rdf_type(&self) -> Option<NamedNodeRef<'_>> {
        Some(self.rdf_type.as_ref())
    }

    fn triples(&self) -> &[PredicateObject] {
        &self.triples
    }
}

impl Hierarchical for Property {
    type Handle = PropertyId;

    fn parents(&self) -> &[PropertyId] {
        &self.parents
    }

    fn children(&self) -> &[PropertyId] {
        &self.children
    }

    fn unresolved_parents(&self) -> &[NamedNode] {
        &self.unresolved_parents
    }

    fn edges_mut(&mut self) -> HierarchyEdges<'_, PropertyId> {
        HierarchyEdges {
            parents: &mut self.parents,
            children: &mut self.children,
            unresolved_parents: &mut self.unresolved_parents,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Property {}", self.iri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::rdf;
    use oxrdf::Literal;

    fn class(name: &str, id: usize) -> Class {
        Class::new(
            NamedNode::new_unchecked(format!("http://example.com/{name}")),
            owl::CLASS.into_owned(),
            id,
        )
    }

    #[test]
    fn hierarchy_edges_are_symmetric() {
        let mut classes = vec![class("A", 1), class("B", 2)];
        let (a, b) = (ClassId::from_index(0), ClassId::from_index(1));
        assert!(link_hierarchy(&mut classes, b, a));
        assert!(!link_hierarchy(&mut classes, b, a));
        assert_eq!(classes[1].parents(), [a]);
        assert_eq!(classes[0].children(), [b]);
        assert!(classes[0].parents().is_empty());
    }

    #[test]
    fn self_loops_are_ignored() {
        let mut classes = vec![class("A", 1)];
        let a = ClassId::from_index(0);
        assert!(!link_hierarchy(&mut classes, a, a));
        assert!(classes[0].parents().is_empty());
        assert!(classes[0].children().is_empty());
    }

    #[test]
    fn domain_links_have_back_edges() {
        let mut classes = vec![class("Pizza", 1)];
        let mut properties = vec![Property::new(
            NamedNode::new_unchecked("http://example.com/hasTopping"),
            owl::OBJECT_PROPERTY.into_owned(),
            1,
        )];
        let (pizza, has_topping) = (ClassId::from_index(0), PropertyId::from_index(0));
        link_property_class(&mut classes, &mut properties, has_topping, pizza, PropertyEnd::Domain);
        link_property_class(&mut classes, &mut properties, has_topping, pizza, PropertyEnd::Domain);
        assert_eq!(properties[0].domains(), [ClassRef::Declared(pizza)]);
        assert_eq!(classes[0].domain_of(), [has_topping]);
        assert!(classes[0].range_of().is_empty());
    }

    #[test]
    fn property_kind_from_type() {
        assert_eq!(PropertyKind::from_rdf_type(owl::OBJECT_PROPERTY), PropertyKind::Object);
        assert_eq!(PropertyKind::from_rdf_type(rdf::PROPERTY), PropertyKind::Other);
    }

    #[test]
    fn best_label_prefers_requested_language() {
        let mut pizza = class("Pizza", 1);
        pizza.set_triples(vec![
            (
                rdfs::LABEL.into_owned(),
                Literal::new_language_tagged_literal_unchecked("Pizza", "en").into(),
            ),
            (
                rdfs::LABEL.into_owned(),
                Literal::new_language_tagged_literal_unchecked("Pizza!", "it").into(),
            ),
            (rdfs::COMMENT.into_owned(), Literal::new_simple_literal("A flat bread").into()),
        ]);
        assert_eq!(pizza.best_label(Some("it")), Some("Pizza!"));
        assert_eq!(pizza.best_label(Some("fr")), Some("Pizza"));
        assert_eq!(pizza.best_description(), Some("A flat bread"));
        assert_eq!(pizza.values_for(rdfs::LABEL).count(), 2);
    }
}
