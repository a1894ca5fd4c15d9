//! The extraction pipeline turning the declarations of a triple store into linked entities.

use crate::entity::{
    Class, ClassId, Entity, EntityHandle, Hierarchical, Ontology, Property, PropertyEnd,
    PropertyId, PropertyKind, link_hierarchy, link_property_class, link_property_external,
    retain_unresolved_parent,
};
use crate::error::ScanError;
use crate::lookup::{EntityQuery, Found, find};
use crate::namespace::Namespaces;
use crate::query::{Hierarchy, QueryRow, SchemaQueries};
use crate::vocab::{dc, dcterms, rdf, rdfs};
use oxrdf::{NamedNode, NamedNodeRef, NamedOrBlankNode, Term};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::debug;

/// What to do with an IRI that matches no scanned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnresolvedPolicy {
    /// Forget it.
    Drop,
    /// Keep the raw IRI next to the resolved entities.
    Retain,
}

/// Options of a [`Scanner`].
///
/// ```
/// use ontoscan::{ScanOptions, UnresolvedPolicy};
///
/// let options = ScanOptions::new()
///     .with_unresolved_supertypes(UnresolvedPolicy::Retain)
///     .with_fallback_prefix("default");
/// assert_eq!(options.unresolved_domain_range(), UnresolvedPolicy::Retain);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    unresolved_supertypes: UnresolvedPolicy,
    unresolved_domain_range: UnresolvedPolicy,
    fallback_prefix: String,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// What to do with super-classes and super-properties that are not declared in the graph.
    ///
    /// Defaults to [`UnresolvedPolicy::Drop`]. Retained IRIs are available with
    /// [`Hierarchical::unresolved_parents`] and do not remove the entity from the top layer.
    #[must_use]
    pub fn with_unresolved_supertypes(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved_supertypes = policy;
        self
    }

    /// What to do with property domains and ranges that are not declared classes.
    ///
    /// Defaults to [`UnresolvedPolicy::Retain`].
    #[must_use]
    pub fn with_unresolved_domain_range(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved_domain_range = policy;
        self
    }

    /// The prefix given to a declared base namespace when none can be inferred from its IRI.
    ///
    /// Defaults to `base`.
    #[must_use]
    pub fn with_fallback_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fallback_prefix = prefix.into();
        self
    }

    pub fn unresolved_supertypes(&self) -> UnresolvedPolicy {
        self.unresolved_supertypes
    }

    pub fn unresolved_domain_range(&self) -> UnresolvedPolicy {
        self.unresolved_domain_range
    }

    pub fn fallback_prefix(&self) -> &str {
        &self.fallback_prefix
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            unresolved_supertypes: UnresolvedPolicy::Drop,
            unresolved_domain_range: UnresolvedPolicy::Retain,
            fallback_prefix: "base".into(),
        }
    }
}

/// Builds a [`ScanResult`] from a store answering the [`SchemaQueries`].
///
/// The phases always run in the same order: namespaces, ontologies, classes, properties
/// (with their domains and ranges) and finally the top layers.
///
/// ```
/// use ontoscan::{Entity, RdfSource, Scanner, TripleStore};
/// use oxrdfio::RdfFormat;
///
/// let mut store = TripleStore::new();
/// store.load(RdfSource::from_text(
///     "@prefix owl: <http://www.w3.org/2002/07/owl#> .
///      @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
///      @prefix : <http://example.com/pizza#> .
///      :Pizza a owl:Class .
///      :NamedPizza a owl:Class ; rdfs:subClassOf :Pizza .",
///     RdfFormat::Turtle,
/// ))?;
/// let result = Scanner::new(&store).scan()?;
/// assert_eq!(result.classes().len(), 2);
/// assert_eq!(
///     result.top_layer().map(Entity::uri).collect::<Vec<_>>(),
///     ["http://example.com/pizza#Pizza"]
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct Scanner<'a, Q: SchemaQueries + ?Sized> {
    queries: &'a Q,
    options: ScanOptions,
}

impl<'a, Q: SchemaQueries + ?Sized> Scanner<'a, Q> {
    pub fn new(queries: &'a Q) -> Self {
        Self {
            queries,
            options: ScanOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs all the extraction phases and returns the linked entities.
    ///
    /// Fails if the store cannot be queried, in which case no partial result is returned.
    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        let mut result = ScanResult {
            namespaces: self.extract_namespaces()?,
            ..ScanResult::default()
        };
        result.ontologies = self.extract_ontologies()?;
        self.extract_classes(&mut result)?;
        self.extract_properties(&mut result)?;
        result.compute_top_layers();
        debug!(
            ontologies = result.ontologies.len(),
            classes = result.classes.len(),
            properties = result.properties.len(),
            top_layer = result.top_layer.len(),
            "Scan done"
        );
        Ok(result)
    }

    fn extract_namespaces(&self) -> Result<Namespaces, ScanError> {
        let declared = self
            .queries
            .namespaces()
            .map_err(ScanError::query("namespace"))?;
        let namespaces = Namespaces::extract(
            declared,
            self.queries.source_iri(),
            &self.options.fallback_prefix,
        );
        debug!(namespaces = namespaces.len(), "Extracted namespaces");
        Ok(namespaces)
    }

    fn extract_ontologies(&self) -> Result<Vec<Ontology>, ScanError> {
        let rows = self
            .queries
            .ontology_declarations()
            .map_err(ScanError::query("ontology"))?;
        let mut ontologies = Vec::<Ontology>::new();
        for QueryRow { subject, .. } in rows {
            let triples = self
                .queries
                .entity_triples(subject.as_ref())
                .map_err(ScanError::query("ontology"))?;
            let uri = match &subject {
                NamedOrBlankNode::NamedNode(node) => node.as_str().to_owned(),
                NamedOrBlankNode::BlankNode(node) => {
                    let Some(identifier) = triples
                        .iter()
                        .filter(|(p, _)| *p == dc::IDENTIFIER || *p == dcterms::IDENTIFIER)
                        .find_map(|(_, o)| match o {
                            Term::Literal(literal) => Some(literal.value().to_owned()),
                            Term::NamedNode(node) => Some(node.as_str().to_owned()),
                            Term::BlankNode(_) => None,
                        })
                    else {
                        debug!(node = %node, "Dropping blank ontology without identifier");
                        continue;
                    };
                    identifier
                }
            };
            if ontologies.iter().any(|o| o.uri() == uri) {
                continue;
            }
            let mut ontology = Ontology::new(uri, subject, ontologies.len() + 1);
            ontology.set_triples(triples);
            ontologies.push(ontology);
        }
        debug!(ontologies = ontologies.len(), "Extracted ontologies");
        Ok(ontologies)
    }

    fn extract_classes(&self, result: &mut ScanResult) -> Result<(), ScanError> {
        let rows = self
            .queries
            .class_declarations()
            .map_err(ScanError::query("class"))?;
        for (id, (iri, rdf_type)) in declared_entities(rows, "class", rdfs::CLASS)
            .into_iter()
            .enumerate()
        {
            let handle = ClassId::from_index(id);
            result
                .class_index
                .entry(iri.as_str().to_lowercase())
                .or_insert(handle);
            result.classes.push(Class::new(iri, rdf_type, id + 1));
        }
        for index in 0..result.classes.len() {
            let child = ClassId::from_index(index);
            let iri = result.classes[index].iri().into_owned();
            let triples = self
                .queries
                .entity_triples(iri.as_ref().into())
                .map_err(ScanError::query("class"))?;
            result.classes[index].set_triples(triples);
            let supers = self
                .queries
                .direct_supers(iri.as_ref(), Hierarchy::Class)
                .map_err(ScanError::query("class"))?;
            for parent in supers {
                match resolve(&result.class_index, &parent) {
                    Some(parent) => {
                        link_hierarchy(&mut result.classes, child, parent);
                    }
                    None => self.unresolved_parent(&mut result.classes[index], parent),
                }
            }
        }
        debug!(classes = result.classes.len(), "Extracted classes");
        Ok(())
    }

    fn extract_properties(&self, result: &mut ScanResult) -> Result<(), ScanError> {
        let rows = self
            .queries
            .property_declarations()
            .map_err(ScanError::query("property"))?;
        for (id, (iri, rdf_type)) in declared_entities(rows, "property", rdf::PROPERTY)
            .into_iter()
            .enumerate()
        {
            let handle = PropertyId::from_index(id);
            result
                .property_index
                .entry(iri.as_str().to_lowercase())
                .or_insert(handle);
            result.properties.push(Property::new(iri, rdf_type, id + 1));
        }
        for index in 0..result.properties.len() {
            let child = PropertyId::from_index(index);
            let iri = result.properties[index].iri().into_owned();
            let triples = self
                .queries
                .entity_triples(iri.as_ref().into())
                .map_err(ScanError::query("property"))?;
            result.properties[index].set_triples(triples);
            self.link_domains_and_ranges(result, child);
            let supers = self
                .queries
                .direct_supers(iri.as_ref(), Hierarchy::Property)
                .map_err(ScanError::query("property"))?;
            for parent in supers {
                match resolve(&result.property_index, &parent) {
                    Some(parent) => {
                        link_hierarchy(&mut result.properties, child, parent);
                    }
                    None => self.unresolved_parent(&mut result.properties[index], parent),
                }
            }
        }
        debug!(
            properties = result.properties.len(),
            annotation = result.annotation_properties().count(),
            object = result.object_properties().count(),
            datatype = result.datatype_properties().count(),
            "Extracted properties"
        );
        Ok(())
    }

    /// Reads the `rdfs:domain` and `rdfs:range` values among the property own triples.
    fn link_domains_and_ranges(&self, result: &mut ScanResult, property: PropertyId) {
        let targets = result.properties[property.index()]
            .triples()
            .iter()
            .filter_map(|(predicate, object)| {
                let end = if *predicate == rdfs::DOMAIN {
                    PropertyEnd::Domain
                } else if *predicate == rdfs::RANGE {
                    PropertyEnd::Range
                } else {
                    return None;
                };
                match object {
                    Term::NamedNode(node) => Some((end, node.clone())),
                    _ => None,
                }
            })
            .collect::<Vec<_>>();
        for (end, target) in targets {
            if let Some(class) = result.class_index.get(&target.as_str().to_lowercase()) {
                link_property_class(
                    &mut result.classes,
                    &mut result.properties,
                    property,
                    *class,
                    end,
                );
            } else {
                debug!(
                    property = result.properties[property.index()].uri(),
                    target = target.as_str(),
                    ?end,
                    "Unresolved property target"
                );
                if self.options.unresolved_domain_range == UnresolvedPolicy::Retain {
                    link_property_external(&mut result.properties[property.index()], target, end);
                }
            }
        }
    }

    fn unresolved_parent<N: Hierarchical>(&self, node: &mut N, parent: NamedOrBlankNode) {
        let NamedOrBlankNode::NamedNode(parent) = parent else {
            debug!(child = node.uri(), "Ignoring blank super-entity");
            return;
        };
        debug!(
            child = node.uri(),
            parent = parent.as_str(),
            "Unresolved super-entity"
        );
        if self.options.unresolved_supertypes == UnresolvedPolicy::Retain {
            retain_unresolved_parent(node, parent);
        }
    }
}

/// Reduces declaration rows to one `(IRI, type)` pair per distinct IRI, in row order.
///
/// Blank nodes are dropped. When an IRI is declared several times, a specific type replaces the
/// `generic` one.
fn declared_entities(
    rows: Vec<QueryRow>,
    kind: &str,
    generic: NamedNodeRef<'_>,
) -> Vec<(NamedNode, NamedNode)> {
    let mut declared = Vec::<(NamedNode, NamedNode)>::new();
    let mut positions = FxHashMap::<NamedNode, usize>::default();
    for QueryRow { subject, rdf_type } in rows {
        let iri = match subject {
            NamedOrBlankNode::NamedNode(iri) => iri,
            NamedOrBlankNode::BlankNode(node) => {
                debug!(node = %node, kind, "Dropping blank declaration");
                continue;
            }
        };
        let rdf_type = rdf_type.unwrap_or_else(|| generic.into_owned());
        if let Some(position) = positions.get(&iri) {
            let (_, current) = &mut declared[*position];
            if *current == generic && rdf_type != generic {
                *current = rdf_type;
            }
        } else {
            positions.insert(iri.clone(), declared.len());
            declared.push((iri, rdf_type));
        }
    }
    declared
}

fn resolve<H: Copy>(index: &FxHashMap<String, H>, node: &NamedOrBlankNode) -> Option<H> {
    match node {
        NamedOrBlankNode::NamedNode(node) => index.get(&node.as_str().to_lowercase()).copied(),
        NamedOrBlankNode::BlankNode(_) => None,
    }
}

/// The linked entities produced by a [`Scanner`].
///
/// It is immutable: a new scan has to be run to take into account changes of the store.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    namespaces: Namespaces,
    ontologies: Vec<Ontology>,
    classes: Vec<Class>,
    properties: Vec<Property>,
    class_index: FxHashMap<String, ClassId>,
    property_index: FxHashMap<String, PropertyId>,
    top_layer: Vec<ClassId>,
    top_layer_properties: Vec<PropertyId>,
}

impl ScanResult {
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    pub fn ontologies(&self) -> &[Ontology] {
        &self.ontologies
    }

    /// All classes, in creation order.
    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    /// The class with the given handle.
    ///
    /// Panics if the handle comes from another scan with fewer classes.
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    /// All properties, in creation order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The property with the given handle.
    ///
    /// Panics if the handle comes from another scan with fewer properties.
    pub fn property(&self, id: PropertyId) -> &Property {
        &self.properties[id.index()]
    }

    pub fn annotation_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties_of_kind(PropertyKind::Annotation)
    }

    pub fn object_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties_of_kind(PropertyKind::Object)
    }

    pub fn datatype_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties_of_kind(PropertyKind::Datatype)
    }

    fn properties_of_kind(&self, kind: PropertyKind) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(move |p| p.kind() == kind)
    }

    /// The classes without any declared super-class.
    pub fn top_layer(&self) -> impl Iterator<Item = &Class> {
        self.top_layer.iter().map(|id| self.class(*id))
    }

    /// The properties without any declared super-property.
    pub fn top_layer_properties(&self) -> impl Iterator<Item = &Property> {
        self.top_layer_properties.iter().map(|id| self.property(*id))
    }

    /// Finds the handle of a class from its IRI, ignoring case.
    pub fn class_id(&self, uri: &str) -> Option<ClassId> {
        self.class_index.get(&uri.to_lowercase()).copied()
    }

    /// Finds the handle of a property from its IRI, ignoring case.
    pub fn property_id(&self, uri: &str) -> Option<PropertyId> {
        self.property_index.get(&uri.to_lowercase()).copied()
    }

    /// Searches classes by id, IRI or IRI fragment.
    ///
    /// ```
    /// use ontoscan::{Entity, EntityQuery, Found, RdfSource, Scanner, TripleStore};
    /// use oxrdfio::RdfFormat;
    ///
    /// let mut store = TripleStore::new();
    /// store.load(RdfSource::from_text(
    ///     "@prefix owl: <http://www.w3.org/2002/07/owl#> .
    ///      <http://example.com/Pizza> a owl:Class .
    ///      <http://example.com/Topping> a owl:Class .",
    ///     RdfFormat::Turtle,
    /// ))?;
    /// let result = Scanner::new(&store).scan()?;
    /// let Found::One(class) = result.get_class(EntityQuery::by_id(2)) else { unreachable!() };
    /// assert_eq!(class.uri(), "http://example.com/Topping");
    /// let Found::Many(classes) = result.get_class(EntityQuery::matching("PIZ")) else { unreachable!() };
    /// assert_eq!(classes.len(), 1);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn get_class(&self, query: impl Into<EntityQuery>) -> Found<'_, Class> {
        find(&self.classes, &query.into())
    }

    /// Searches properties by id, IRI or IRI fragment.
    pub fn get_property(&self, query: impl Into<EntityQuery>) -> Found<'_, Property> {
        find(&self.properties, &query.into())
    }

    /// All the (transitive) super-classes of a class, nearest first.
    pub fn class_ancestors(&self, id: ClassId) -> Vec<ClassId> {
        walk(&self.classes, id, Class::parents)
    }

    /// All the (transitive) sub-classes of a class, nearest first.
    pub fn class_descendants(&self, id: ClassId) -> Vec<ClassId> {
        walk(&self.classes, id, Class::children)
    }

    /// All the (transitive) super-properties of a property, nearest first.
    pub fn property_ancestors(&self, id: PropertyId) -> Vec<PropertyId> {
        walk(&self.properties, id, Property::parents)
    }

    /// All the (transitive) sub-properties of a property, nearest first.
    pub fn property_descendants(&self, id: PropertyId) -> Vec<PropertyId> {
        walk(&self.properties, id, Property::children)
    }

    fn compute_top_layers(&mut self) {
        self.top_layer = roots(&self.classes);
        self.top_layer_properties = roots(&self.properties);
        debug!(
            classes = self.top_layer.len(),
            properties = self.top_layer_properties.len(),
            "Computed top layers"
        );
    }
}

fn roots<N: Hierarchical>(nodes: &[N]) -> Vec<N::Handle> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.parents().is_empty())
        .map(|(index, _)| N::Handle::from_index(index))
        .collect()
}

/// Breadth-first walk along `next` edges, the start node excluded, each node listed once.
fn walk<N: Hierarchical>(
    nodes: &[N],
    start: N::Handle,
    next: impl Fn(&N) -> &[N::Handle],
) -> Vec<N::Handle> {
    let mut visited = FxHashSet::default();
    visited.insert(start);
    let mut queue = VecDeque::from([start]);
    let mut found = Vec::new();
    while let Some(current) = queue.pop_front() {
        for neighbor in next(&nodes[current.index()]) {
            if visited.insert(*neighbor) {
                found.push(*neighbor);
                queue.push_back(*neighbor);
            }
        }
    }
    found
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use crate::entity::ClassRef;
    use crate::source::RdfSource;
    use crate::store::TripleStore;
    use oxrdfio::RdfFormat;
    use std::error::Error;

    fn scan(data: &str, options: ScanOptions) -> Result<ScanResult, Box<dyn Error>> {
        let mut store = TripleStore::new();
        store.load(RdfSource::from_text(data, RdfFormat::Turtle))?;
        Ok(Scanner::new(&store).with_options(options).scan()?)
    }

    const HIERARCHY: &str = r"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.com/> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .

ex:A a owl:Class .
ex:B a owl:Class ; rdfs:subClassOf ex:A, ex:B, foaf:Agent, [ a owl:Restriction ] .
ex:C a rdfs:Class, owl:Class ; rdfs:subClassOf ex:b .
[] a owl:Class .
";

    #[test]
    fn ids_follow_creation_order() -> Result<(), Box<dyn Error>> {
        let result = scan(HIERARCHY, ScanOptions::new())?;
        let ids = result
            .classes()
            .iter()
            .map(|c| (c.id(), c.uri()))
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            [
                (1, "http://example.com/A"),
                (2, "http://example.com/B"),
                (3, "http://example.com/C"),
            ]
        );
        Ok(())
    }

    #[test]
    fn specific_type_wins_over_generic_one() -> Result<(), Box<dyn Error>> {
        let result = scan(HIERARCHY, ScanOptions::new())?;
        let c = result.class(result.class_id("http://example.com/C").ok_or("C not found")?);
        assert!(c.is_owl_class());
        Ok(())
    }

    #[test]
    fn super_classes_are_resolved_ignoring_case() -> Result<(), Box<dyn Error>> {
        let result = scan(HIERARCHY, ScanOptions::new())?;
        let b = result.class_id("http://example.com/B").ok_or("B not found")?;
        let c = result.class_id("http://example.com/C").ok_or("C not found")?;
        assert_eq!(result.class(c).parents(), [b]);
        assert_eq!(result.class(b).children(), [c]);
        assert!(result.class(b).unresolved_parents().is_empty());
        assert_eq!(
            result.top_layer().map(Entity::uri).collect::<Vec<_>>(),
            ["http://example.com/A"]
        );
        Ok(())
    }

    #[test]
    fn retained_super_classes_keep_top_layer() -> Result<(), Box<dyn Error>> {
        let result = scan(
            HIERARCHY,
            ScanOptions::new().with_unresolved_supertypes(UnresolvedPolicy::Retain),
        )?;
        let b = result.class(result.class_id("http://example.com/B").ok_or("B not found")?);
        assert_eq!(
            b.unresolved_parents()
                .iter()
                .map(NamedNode::as_str)
                .collect::<Vec<_>>(),
            ["http://xmlns.com/foaf/0.1/Agent"]
        );
        assert_eq!(result.top_layer().count(), 1);
        Ok(())
    }

    #[test]
    fn transitive_navigation() -> Result<(), Box<dyn Error>> {
        let result = scan(HIERARCHY, ScanOptions::new())?;
        let a = result.class_id("http://example.com/A").ok_or("A not found")?;
        let b = result.class_id("http://example.com/B").ok_or("B not found")?;
        let c = result.class_id("http://example.com/C").ok_or("C not found")?;
        assert_eq!(result.class_ancestors(c), [b, a]);
        assert_eq!(result.class_descendants(a), [b, c]);
        assert!(result.class_ancestors(a).is_empty());
        Ok(())
    }

    #[test]
    fn unresolved_domains_are_retained_or_dropped() -> Result<(), Box<dyn Error>> {
        const DATA: &str = r"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix ex: <http://example.com/> .

ex:Person a owl:Class .
ex:age a owl:DatatypeProperty ; rdfs:domain ex:Person, [ a owl:Class ] ; rdfs:range xsd:integer .
";
        let result = scan(DATA, ScanOptions::new())?;
        let age = &result.properties()[0];
        assert_eq!(age.domains().len(), 1);
        assert_eq!(
            age.ranges(),
            [ClassRef::External(NamedNode::new("http://www.w3.org/2001/XMLSchema#integer")?)]
        );
        assert_eq!(result.datatype_properties().count(), 1);

        let result = scan(
            DATA,
            ScanOptions::new().with_unresolved_domain_range(UnresolvedPolicy::Drop),
        )?;
        assert!(result.properties()[0].ranges().is_empty());
        Ok(())
    }
}
