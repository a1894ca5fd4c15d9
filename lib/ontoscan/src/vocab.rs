//! Provides ready to use [`NamedNodeRef`](oxrdf::NamedNodeRef)s for the vocabularies the scanner
//! relies on beyond the [`oxrdf::vocab`] ones.

pub use oxrdf::vocab::{rdf, rdfs};

pub mod owl {
    //! [OWL 2](https://www.w3.org/TR/owl2-rdf-based-semantics/) vocabulary.
    use oxrdf::NamedNodeRef;

    /// The class of annotation properties.
    pub const ANNOTATION_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AnnotationProperty");
    /// The class of OWL classes.
    pub const CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    /// The class of data properties.
    pub const DATATYPE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    /// The class of object properties.
    pub const OBJECT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    /// Ontology imported by an ontology.
    pub const IMPORTS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#imports");
    /// The class of ontologies.
    pub const ONTOLOGY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
}

pub mod dc {
    //! [Dublin Core elements 1.1](https://www.dublincore.org/specifications/dublin-core/dces/) vocabulary.
    use oxrdf::NamedNodeRef;

    /// An account of the resource.
    pub const DESCRIPTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/description");
    /// An unambiguous reference to the resource within a given context.
    pub const IDENTIFIER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/identifier");
}

pub mod dcterms {
    //! [DCMI Metadata Terms](https://www.dublincore.org/specifications/dublin-core/dcmi-terms/) vocabulary.
    use oxrdf::NamedNodeRef;

    /// An account of the resource.
    pub const DESCRIPTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");
    /// An unambiguous reference to the resource within a given context.
    pub const IDENTIFIER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/identifier");
}

pub mod skos {
    //! [SKOS](https://www.w3.org/TR/skos-reference/) vocabulary.
    use oxrdf::NamedNodeRef;

    /// The preferred lexical label for a resource.
    pub const PREF_LABEL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#prefLabel");
}

/// Namespaces bound in every [`TripleStore`](crate::TripleStore) before anything is loaded.
pub(crate) const DEFAULT_PREFIXES: [(&str, &str); 4] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];
