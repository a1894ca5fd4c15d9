//! Namespace table of a scanned graph and qname computation.

use std::fmt;
use std::slice;

/// A `(prefix, namespace IRI)` binding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace {
    prefix: String,
    iri: String,
}

impl Namespace {
    #[inline]
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }

    /// The prefix, empty for the implicit base namespace.
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn iri(&self) -> &str {
        &self.iri
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: <{}>", self.prefix, self.iri)
    }
}

/// The namespaces of a scanned graph, sorted by prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    inner: Vec<Namespace>,
}

impl Namespaces {
    /// Builds the namespace table of a graph from the prefixes declared in its store.
    ///
    /// Declared base namespaces (empty prefix) are renamed with a prefix [inferred](infer_prefix)
    /// from their IRI, or `fallback_prefix` if none can be inferred.
    /// If no declared namespace is the graph source IRI, an entry binding the empty prefix to it is added.
    ///
    /// ```
    /// use ontoscan::Namespaces;
    ///
    /// let namespaces = Namespaces::extract(
    ///     [
    ///         ("".to_owned(), "http://example.com/pizza#".to_owned()),
    ///         ("".to_owned(), "http://example.com/".to_owned()),
    ///         ("owl".to_owned(), "http://www.w3.org/2002/07/owl#".to_owned()),
    ///     ],
    ///     Some("pizza.ttl"),
    ///     "base",
    /// );
    /// let prefixes = namespaces.iter().map(|ns| ns.prefix()).collect::<Vec<_>>();
    /// assert_eq!(prefixes, ["", "base", "owl", "pizza"]);
    /// assert_eq!(namespaces.get("").map(|ns| ns.iri()), Some("pizza.ttl"));
    /// ```
    pub fn extract(
        declared: impl IntoIterator<Item = (String, String)>,
        source_iri: Option<&str>,
        fallback_prefix: &str,
    ) -> Self {
        let mut inner = Vec::new();
        let mut has_source = false;
        for (prefix, iri) in declared {
            if source_iri == Some(iri.as_str()) {
                has_source = true;
            }
            let prefix = if prefix.is_empty() {
                infer_prefix(&iri).unwrap_or_else(|| fallback_prefix.to_owned())
            } else {
                prefix
            };
            inner.push(Namespace { prefix, iri });
        }
        if let Some(source_iri) = source_iri {
            if !has_source {
                inner.push(Namespace::new("", source_iri));
            }
        }
        inner.sort();
        inner.dedup();
        Self { inner }
    }

    pub fn iter(&self) -> slice::Iter<'_, Namespace> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The first namespace bound to `prefix`.
    pub fn get(&self, prefix: &str) -> Option<&Namespace> {
        self.inner.iter().find(|ns| ns.prefix == prefix)
    }

    /// Shortens an IRI to `prefix:local` using the longest matching namespace.
    ///
    /// Namespaces with an empty prefix use the prefix inferred from their IRI, or none at all (`:local`).
    /// IRIs outside of every namespace are returned unchanged.
    ///
    /// ```
    /// use ontoscan::{Namespace, Namespaces};
    ///
    /// let namespaces = Namespaces::from_iter([
    ///     Namespace::new("ex", "http://example.com/"),
    ///     Namespace::new("pizza", "http://example.com/pizza#"),
    /// ]);
    /// assert_eq!(namespaces.qname("http://example.com/pizza#Margherita"), "pizza:Margherita");
    /// assert_eq!(namespaces.qname("http://example.com/Thing"), "ex:Thing");
    /// assert_eq!(namespaces.qname("http://other.com/Thing"), "http://other.com/Thing");
    /// ```
    pub fn qname(&self, iri: &str) -> String {
        let Some(namespace) = self
            .inner
            .iter()
            .filter(|ns| !ns.iri.is_empty() && iri.starts_with(&ns.iri))
            .max_by_key(|ns| ns.iri.len())
        else {
            return iri.to_owned();
        };
        let local = &iri[namespace.iri.len()..];
        if namespace.prefix.is_empty() {
            match infer_prefix(&namespace.iri) {
                Some(prefix) => format!("{prefix}:{local}"),
                None => format!(":{local}"),
            }
        } else {
            format!("{}:{local}", namespace.prefix)
        }
    }
}

impl FromIterator<Namespace> for Namespaces {
    fn from_iter<I: IntoIterator<Item = Namespace>>(iter: I) -> Self {
        let mut inner = iter.into_iter().collect::<Vec<_>>();
        inner.sort();
        inner.dedup();
        Self { inner }
    }
}

impl<'a> IntoIterator for &'a Namespaces {
    type Item = &'a Namespace;
    type IntoIter = slice::Iter<'a, Namespace>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Infers a readable prefix from a namespace IRI: its last path segment, fragment separators removed.
///
/// ```
/// use ontoscan::infer_prefix;
///
/// assert_eq!(infer_prefix("http://www.co-ode.org/ontologies/pizza/pizza.owl#").as_deref(), Some("pizza.owl"));
/// assert_eq!(infer_prefix("http://cohereweb.net/ontology/cohere#").as_deref(), Some("cohere"));
/// assert_eq!(infer_prefix("http://purl.org/ontology/bibo/"), None);
/// ```
pub fn infer_prefix(namespace: &str) -> Option<String> {
    let namespace = namespace.replace('#', "");
    let prefix = namespace.rsplit('/').next()?;
    if prefix.is_empty() {
        None
    } else {
        Some(prefix.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(prefix, iri)| ((*prefix).to_owned(), (*iri).to_owned()))
            .collect()
    }

    #[test]
    fn source_iri_becomes_the_base_namespace() {
        let namespaces = Namespaces::extract(
            declared(&[("rdfs", "http://www.w3.org/2000/01/rdf-schema#")]),
            Some("http://example.com/onto"),
            "base",
        );
        let base = namespaces
            .iter()
            .filter(|ns| ns.prefix().is_empty())
            .collect::<Vec<_>>();
        assert_eq!(base, [&Namespace::new("", "http://example.com/onto")]);
    }

    #[test]
    fn declared_source_iri_is_not_duplicated() {
        let namespaces = Namespaces::extract(
            declared(&[("ex", "http://example.com/onto")]),
            Some("http://example.com/onto"),
            "base",
        );
        assert_eq!(namespaces.len(), 1);
        assert!(namespaces.get("").is_none());
    }

    #[test]
    fn unnamed_base_gets_fallback_prefix() {
        let namespaces = Namespaces::extract(
            declared(&[("", "http://purl.org/ontology/bibo/")]),
            None,
            "base",
        );
        assert_eq!(
            namespaces.iter().collect::<Vec<_>>(),
            [&Namespace::new("base", "http://purl.org/ontology/bibo/")]
        );
    }

    #[test]
    fn no_source_no_synthetic_namespace() {
        let namespaces = Namespaces::extract(Vec::new(), None, "base");
        assert!(namespaces.is_empty());
    }

    #[test]
    fn qname_of_base_namespace() {
        let namespaces = Namespaces::from_iter([
            Namespace::new("", "http://example.com/pizza#"),
            Namespace::new("", "http://example.com/things/"),
        ]);
        assert_eq!(namespaces.qname("http://example.com/pizza#Pizza"), "pizza:Pizza");
        assert_eq!(namespaces.qname("http://example.com/things/Thing"), ":Thing");
    }

    #[test]
    fn sorted_by_prefix() {
        let namespaces = Namespaces::from_iter([
            Namespace::new("xsd", "http://www.w3.org/2001/XMLSchema#"),
            Namespace::new("owl", "http://www.w3.org/2002/07/owl#"),
            Namespace::new("", "http://example.com/"),
        ]);
        let prefixes = namespaces.iter().map(Namespace::prefix).collect::<Vec<_>>();
        assert_eq!(prefixes, ["", "owl", "xsd"]);
    }
}
