//! Search of scanned entities by id, IRI or IRI fragment.

use crate::entity::Entity;
use oxiri::Iri;

/// Criteria of a [`ScanResult::get_class`](crate::ScanResult::get_class) or
/// [`ScanResult::get_property`](crate::ScanResult::get_property) search.
///
/// A fragment search returns every entity whose IRI contains the fragment, ignoring case.
/// Otherwise the first entity having the id or the IRI (ignoring case) is returned.
///
/// ```
/// use ontoscan::EntityQuery;
///
/// assert_eq!(EntityQuery::guess("12"), EntityQuery::by_id(12));
/// assert_eq!(
///     EntityQuery::guess("http://example.com/Pizza"),
///     EntityQuery::by_uri("http://example.com/Pizza")
/// );
/// assert_eq!(EntityQuery::guess("izza"), EntityQuery::matching("izza"));
/// assert!(EntityQuery::guess("  ").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[must_use]
pub struct EntityQuery {
    id: Option<usize>,
    uri: Option<String>,
    fragment: Option<String>,
}

impl EntityQuery {
    /// A query without criteria, matching nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: usize) -> Self {
        Self::new().with_id(id)
    }

    pub fn by_uri(uri: impl Into<String>) -> Self {
        Self::new().with_uri(uri)
    }

    pub fn matching(fragment: impl Into<String>) -> Self {
        Self::new().with_fragment(fragment)
    }

    /// Interprets a single user input: an integer is an id, an absolute IRI an IRI,
    /// anything else a fragment.
    pub fn guess(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            Self::new()
        } else if let Ok(id) = input.parse() {
            Self::by_id(id)
        } else if Iri::parse(input).is_ok() {
            Self::by_uri(input)
        } else {
            Self::matching(input)
        }
    }

    pub fn with_id(mut self, id: usize) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Sets the IRI fragment to look for. It takes precedence over the id and the IRI.
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Checks if the query has no criteria.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.uri.is_none() && self.fragment.is_none()
    }
}

impl From<usize> for EntityQuery {
    fn from(id: usize) -> Self {
        Self::by_id(id)
    }
}

impl From<&str> for EntityQuery {
    fn from(input: &str) -> Self {
        Self::guess(input)
    }
}

/// The outcome of an [`EntityQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found<'a, T> {
    /// No entity matches the id or the IRI, or the query is empty.
    Nothing,
    /// The entity with the id or the IRI.
    One(&'a T),
    /// All the entities matching the fragment, in creation order. Possibly empty.
    Many(Vec<&'a T>),
}

impl<'a, T> Found<'a, T> {
    /// Checks if no entity has been found, including for an empty fragment search.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Nothing => true,
            Self::One(_) => false,
            Self::Many(entities) => entities.is_empty(),
        }
    }

    /// The found entities as a list.
    pub fn into_vec(self) -> Vec<&'a T> {
        match self {
            Self::Nothing => Vec::new(),
            Self::One(entity) => vec![entity],
            Self::Many(entities) => entities,
        }
    }
}

pub(crate) fn find<'a, N: Entity>(entities: &'a [N], query: &EntityQuery) -> Found<'a, N> {
    if let Some(fragment) = &query.fragment {
        let fragment = fragment.to_lowercase();
        return Found::Many(
            entities
                .iter()
                .filter(|entity| entity.uri().to_lowercase().contains(&fragment))
                .collect(),
        );
    }
    if query.id.is_none() && query.uri.is_none() {
        return Found::Nothing;
    }
    let uri = query.uri.as_deref().map(str::to_lowercase);
    entities
        .iter()
        .find(|entity| {
            query.id == Some(entity.id())
                || uri
                    .as_deref()
                    .is_some_and(|uri| entity.uri().to_lowercase() == uri)
        })
        .map_or(Found::Nothing, Found::One)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Class;
    use crate::vocab::owl;
    use oxrdf::NamedNode;

    fn classes() -> Vec<Class> {
        ["Pizza", "NamedPizza", "Topping"]
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                Class::new(
                    NamedNode::new_unchecked(format!("http://example.com/pizza#{name}")),
                    owl::CLASS.into_owned(),
                    index + 1,
                )
            })
            .collect()
    }

    fn uris<'a>(found: Found<'a, Class>) -> Vec<&'a str> {
        found.into_vec().into_iter().map(Entity::uri).collect()
    }

    #[test]
    fn fragment_search_is_case_insensitive() {
        let classes = classes();
        assert_eq!(
            uris(find(&classes, &EntityQuery::matching("IZZA"))),
            [
                "http://example.com/pizza#Pizza",
                "http://example.com/pizza#NamedPizza"
            ]
        );
        assert_eq!(
            find(&classes, &EntityQuery::matching("unknown")),
            Found::Many(Vec::new())
        );
    }

    #[test]
    fn id_and_uri_search() {
        let classes = classes();
        assert_eq!(
            uris(find(&classes, &EntityQuery::by_id(3))),
            ["http://example.com/pizza#Topping"]
        );
        assert_eq!(
            uris(find(
                &classes,
                &EntityQuery::by_uri("HTTP://EXAMPLE.COM/PIZZA#NAMEDPIZZA")
            )),
            ["http://example.com/pizza#NamedPizza"]
        );
        assert_eq!(find(&classes, &EntityQuery::by_id(0)), Found::Nothing);
        assert_eq!(find(&classes, &EntityQuery::new()), Found::Nothing);
    }

    #[test]
    fn fragment_takes_precedence() {
        let classes = classes();
        let query = EntityQuery::by_id(1).with_fragment("Topping");
        assert_eq!(uris(find(&classes, &query)), ["http://example.com/pizza#Topping"]);
    }

    #[test]
    fn lookup_is_idempotent() {
        let classes = classes();
        let query = EntityQuery::guess("pizza#P");
        assert_eq!(find(&classes, &query), find(&classes, &query));
    }
}
