//! Plain text rendering of the class and property hierarchies.

use crate::entity::{EntityHandle, Hierarchical};
use crate::namespace::Namespaces;
use crate::scan::ScanResult;
use std::io::{self, Write};

/// Options of [`render_class_tree`] and [`render_property_tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct TreeOptions {
    show_ids: bool,
}

impl TreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefixes every line with the `[id]` of the entity (enabled by default).
    pub fn with_ids(mut self, show_ids: bool) -> Self {
        self.show_ids = show_ids;
        self
    }
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self { show_ids: true }
    }
}

/// Writes the class hierarchy, from the top layer down, one class per line.
///
/// Every depth level adds four dashes before the class qname. A class with several parents is
/// written below each of them.
///
/// ```
/// use ontoscan::{RdfSource, Scanner, TreeOptions, TripleStore, render_class_tree};
/// use oxrdfio::RdfFormat;
///
/// let mut store = TripleStore::new();
/// store.load(RdfSource::from_text(
///     "@prefix owl: <http://www.w3.org/2002/07/owl#> .
///      @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
///      @prefix pizza: <http://example.com/pizza#> .
///      pizza:Pizza a owl:Class .
///      pizza:NamedPizza a owl:Class ; rdfs:subClassOf pizza:Pizza .",
///     RdfFormat::Turtle,
/// ))?;
/// let result = Scanner::new(&store).scan()?;
/// let tree = render_class_tree(&result, Vec::new(), TreeOptions::new())?;
/// assert_eq!(String::from_utf8(tree)?, "[2] pizza:Pizza\n[1] ----pizza:NamedPizza\n");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn render_class_tree<W: Write>(
    result: &ScanResult,
    writer: W,
    options: TreeOptions,
) -> io::Result<W> {
    render(result.classes(), result.namespaces(), writer, options)
}

/// Writes the property hierarchy, from the top layer down, one property per line.
///
/// The layout is the one of [`render_class_tree`].
pub fn render_property_tree<W: Write>(
    result: &ScanResult,
    writer: W,
    options: TreeOptions,
) -> io::Result<W> {
    render(result.properties(), result.namespaces(), writer, options)
}

fn render<N: Hierarchical, W: Write>(
    nodes: &[N],
    namespaces: &Namespaces,
    writer: W,
    options: TreeOptions,
) -> io::Result<W> {
    let id_width = nodes
        .iter()
        .map(|node| node.id().to_string().len())
        .max()
        .unwrap_or(0)
        + 3;
    let mut renderer = TreeRenderer {
        nodes,
        namespaces,
        writer,
        id_width: options.show_ids.then_some(id_width),
        path: Vec::new(),
    };
    for (index, node) in nodes.iter().enumerate() {
        if node.parents().is_empty() {
            renderer.write_subtree(N::Handle::from_index(index), 0)?;
        }
    }
    Ok(renderer.writer)
}

struct TreeRenderer<'a, N: Hierarchical, W> {
    nodes: &'a [N],
    namespaces: &'a Namespaces,
    writer: W,
    id_width: Option<usize>,
    path: Vec<N::Handle>,
}

impl<N: Hierarchical, W: Write> TreeRenderer<'_, N, W> {
    fn write_subtree(&mut self, handle: N::Handle, depth: usize) -> io::Result<()> {
        let nodes = self.nodes;
        let node = &nodes[handle.index()];
        if let Some(width) = self.id_width {
            let id = format!("[{}]", node.id());
            write!(self.writer, "{id:<width$}")?;
        }
        writeln!(
            self.writer,
            "{}{}",
            "----".repeat(depth),
            node.qname(self.namespaces)
        )?;
        self.path.push(handle);
        for child in node.children() {
            // cycle
            if !self.path.contains(child) {
                self.write_subtree(*child, depth + 1)?;
            }
        }
        self.path.pop();
        Ok(())
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use crate::scan::Scanner;
    use crate::source::RdfSource;
    use crate::store::TripleStore;
    use oxrdfio::RdfFormat;
    use std::error::Error;

    const DATA: &str = r"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.com/> .

ex:Root a owl:Class .
ex:A a owl:Class ; rdfs:subClassOf ex:Root, ex:B .
ex:B a owl:Class ; rdfs:subClassOf ex:A .
ex:p a owl:ObjectProperty .
ex:q a owl:ObjectProperty ; rdfs:subPropertyOf ex:p .
";

    fn result() -> Result<ScanResult, Box<dyn Error>> {
        let mut store = TripleStore::new();
        store.load(RdfSource::from_text(DATA, RdfFormat::Turtle))?;
        Ok(Scanner::new(&store).scan()?)
    }

    #[test]
    fn cycles_are_cut() -> Result<(), Box<dyn Error>> {
        let tree = render_class_tree(&result()?, Vec::new(), TreeOptions::new().with_ids(false))?;
        assert_eq!(String::from_utf8(tree)?, "ex:Root\n----ex:A\n--------ex:B\n");
        Ok(())
    }

    #[test]
    fn property_tree() -> Result<(), Box<dyn Error>> {
        let tree = render_property_tree(&result()?, Vec::new(), TreeOptions::new())?;
        assert_eq!(String::from_utf8(tree)?, "[1] ex:p\n[2] ----ex:q\n");
        Ok(())
    }
}
