#[cfg(any(not(feature = "http-client"), target_family = "wasm"))]
mod dummy;
#[cfg(all(feature = "http-client", not(target_family = "wasm")))]
mod simple;

#[cfg(any(not(feature = "http-client"), target_family = "wasm"))]
pub use dummy::Client;
#[cfg(all(feature = "http-client", not(target_family = "wasm")))]
pub use simple::Client;

/// Media types asked for when fetching a remote ontology, most specific first.
pub const RDF_ACCEPT: &str = "text/turtle, application/rdf+xml;q=0.9, application/n-triples;q=0.8, text/n3;q=0.7, application/ld+json;q=0.6, */*;q=0.1";
