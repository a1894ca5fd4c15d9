//! Description of where the RDF triples to scan come from.

use crate::error::LoadError;
use oxrdfio::RdfFormat;
use std::fmt;
use std::path::{Path, PathBuf};

/// A source of RDF triples, decided by the caller.
///
/// ```
/// use ontoscan::RdfSource;
/// use oxrdfio::RdfFormat;
///
/// let source = RdfSource::from_text("<http://example.com/s> <http://example.com/p> <http://example.com/o> .", RdfFormat::NTriples);
/// assert_eq!(source.format(), RdfFormat::NTriples);
///
/// let source = RdfSource::from_path("data/schemas/pizza.ttl");
/// assert_eq!(source.format(), RdfFormat::Turtle);
/// assert_eq!(source.identifier().as_deref(), Some("data/schemas/pizza.ttl"));
///
/// let source = RdfSource::from_uri("www.w3.org/2002/07/owl");
/// assert_eq!(source.identifier().as_deref(), Some("http://www.w3.org/2002/07/owl"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum RdfSource {
    /// An in-memory serialization.
    Text {
        /// The serialized triples.
        data: String,
        /// The serialization format.
        format: RdfFormat,
        /// The IRI relative IRIs are resolved against, also used as the source identifier.
        base_iri: Option<String>,
    },
    /// A local file.
    Path {
        /// The file path, also used as the source identifier.
        path: PathBuf,
        /// The serialization format, guessed from the file extension if not set.
        format: Option<RdfFormat>,
        /// The IRI relative IRIs are resolved against.
        base_iri: Option<String>,
    },
    /// A remote document fetched over HTTP(S) or a `file:` URI.
    Uri {
        /// The document URI, also used as the base IRI and the source identifier.
        uri: String,
        /// The serialization format, guessed from the response media type and the URI if not set.
        format: Option<RdfFormat>,
    },
}

impl RdfSource {
    /// An in-memory serialization.
    pub fn from_text(data: impl Into<String>, format: RdfFormat) -> Self {
        Self::Text {
            data: data.into(),
            format,
            base_iri: None,
        }
    }

    /// A local file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path {
            path: path.into(),
            format: None,
            base_iri: None,
        }
    }

    /// A remote document.
    ///
    /// URIs starting with `www.` are understood as `http://www.`.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self::Uri {
            uri: if uri.starts_with("www.") {
                format!("http://{uri}")
            } else {
                uri
            },
            format: None,
        }
    }

    /// Sets the serialization format instead of guessing it.
    pub fn with_format(mut self, new_format: RdfFormat) -> Self {
        match &mut self {
            Self::Text { format, .. } => *format = new_format,
            Self::Path { format, .. } | Self::Uri { format, .. } => *format = Some(new_format),
        }
        self
    }

    /// Sets the base IRI of a text or file source.
    ///
    /// URI sources always use their own URI as base IRI.
    pub fn with_base_iri(mut self, iri: impl Into<String>) -> Self {
        match &mut self {
            Self::Text { base_iri, .. } | Self::Path { base_iri, .. } => {
                *base_iri = Some(iri.into());
            }
            Self::Uri { .. } => (),
        }
        self
    }

    /// The serialization format that is going to be used, the one set by the caller or the one guessed from the name.
    ///
    /// For URI sources the response media type takes precedence over the name when no format is set.
    pub fn format(&self) -> RdfFormat {
        match self {
            Self::Text { format, .. } => *format,
            Self::Path { path, format, .. } => format.unwrap_or_else(|| guess_path_format(path)),
            Self::Uri { uri, format } => format.unwrap_or_else(|| guess_format(uri)),
        }
    }

    /// The IRI relative IRIs are resolved against.
    pub fn base_iri(&self) -> Option<&str> {
        match self {
            Self::Text { base_iri, .. } | Self::Path { base_iri, .. } => base_iri.as_deref(),
            Self::Uri { uri, .. } => Some(uri),
        }
    }

    /// The identifier of the graph built from this source: the path or URI it is read from,
    /// or the base IRI of an in-memory text.
    pub fn identifier(&self) -> Option<String> {
        match self {
            Self::Text { base_iri, .. } => base_iri.clone(),
            Self::Path { path, .. } => Some(path.display().to_string()),
            Self::Uri { uri, .. } => Some(uri.clone()),
        }
    }
}

impl fmt::Display for RdfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { data, format, .. } => {
                write!(f, "{} bytes of {} text", data.len(), format.name())
            }
            Self::Path { path, .. } => write!(f, "{}", path.display()),
            Self::Uri { uri, .. } => f.write_str(uri),
        }
    }
}

/// Guesses a serialization from a file name or an URI.
///
/// Unknown or missing extensions default to RDF/XML, the historical serialization of OWL files.
///
/// ```
/// use ontoscan::guess_format;
/// use oxrdfio::RdfFormat;
///
/// assert_eq!(guess_format("pizza.ttl"), RdfFormat::Turtle);
/// assert_eq!(guess_format("http://example.com/onto.nt"), RdfFormat::NTriples);
/// assert_eq!(guess_format("pizza.owl"), RdfFormat::RdfXml);
/// assert_eq!(guess_format("http://purl.org/ontology/bibo/"), RdfFormat::RdfXml);
/// ```
pub fn guess_format(name: &str) -> RdfFormat {
    format_from_name(name).unwrap_or(RdfFormat::RdfXml)
}

/// The serialization given by the extension of a file name or an URI, `.owl` being RDF/XML.
fn format_from_name(name: &str) -> Option<RdfFormat> {
    let name = name
        .split_once(['?', '#'])
        .map_or(name, |(before, _)| before);
    let (_, extension) = name
        .rsplit_once('/')
        .map_or(name, |(_, last)| last)
        .rsplit_once('.')?;
    if extension.eq_ignore_ascii_case("owl") {
        Some(RdfFormat::RdfXml)
    } else {
        RdfFormat::from_extension(extension)
    }
}

/// Picks the serialization of a document fetched from `uri` with the given response media type.
///
/// The media type wins over the URI extension. A binary media type falls back to RDF/XML,
/// any other unknown media type is rejected.
pub(crate) fn response_format(uri: &str, media_type: &str) -> Result<RdfFormat, LoadError> {
    if let Some(format) =
        RdfFormat::from_media_type(media_type).or_else(|| format_from_name(uri))
    {
        Ok(format)
    } else if media_type.eq_ignore_ascii_case("application/octet-stream") {
        Ok(RdfFormat::RdfXml)
    } else {
        Err(LoadError::UnsupportedFormat(media_type.to_owned()))
    }
}

fn guess_path_format(path: &Path) -> RdfFormat {
    path.extension()
        .and_then(|extension| extension.to_str())
        .and_then(RdfFormat::from_extension)
        .unwrap_or(RdfFormat::RdfXml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_guessed_from_extension() {
        assert_eq!(RdfSource::from_path("a/b.nt").format(), RdfFormat::NTriples);
        assert_eq!(RdfSource::from_path("a/b.TTL").format(), RdfFormat::Turtle);
        assert_eq!(RdfSource::from_path("a/b").format(), RdfFormat::RdfXml);
        assert_eq!(
            RdfSource::from_uri("http://example.com/a.n3?x=y").format(),
            RdfFormat::N3
        );
    }

    #[test]
    fn explicit_format_wins() {
        let source = RdfSource::from_path("pizza.owl").with_format(RdfFormat::Turtle);
        assert_eq!(source.format(), RdfFormat::Turtle);
    }

    #[test]
    fn text_identifier_is_its_base_iri() {
        let source = RdfSource::from_text("", RdfFormat::Turtle);
        assert_eq!(source.identifier(), None);
        let source = source.with_base_iri("http://example.com/onto");
        assert_eq!(source.identifier().as_deref(), Some("http://example.com/onto"));
        assert_eq!(source.base_iri(), Some("http://example.com/onto"));
    }

    #[test]
    fn response_media_type_wins_over_extension() {
        assert!(matches!(
            response_format("http://example.com/onto.ttl", "application/rdf+xml"),
            Ok(RdfFormat::RdfXml)
        ));
        assert!(matches!(
            response_format("http://example.com/onto.ttl", "application/x-unknown"),
            Ok(RdfFormat::Turtle)
        ));
        assert!(matches!(
            response_format("http://example.com/pizza.owl", "text/html"),
            Ok(RdfFormat::RdfXml)
        ));
        assert!(matches!(
            response_format("http://purl.org/ontology/bibo/", "application/octet-stream"),
            Ok(RdfFormat::RdfXml)
        ));
    }

    #[test]
    fn unknown_response_media_type_is_rejected() {
        let result = response_format("http://purl.org/ontology/bibo/", "text/html");
        assert!(matches!(
            result,
            Err(LoadError::UnsupportedFormat(media_type)) if media_type == "text/html"
        ));
    }

    #[test]
    fn uri_is_its_own_base() {
        let source = RdfSource::from_uri("http://example.com/onto").with_base_iri("http://other/");
        assert_eq!(source.base_iri(), Some("http://example.com/onto"));
    }
}
