use std::collections::HashMap;

use roxmltree::{Document, Node};

use crate::error::Result;
use crate::query::{PathQuery, QueryHit};

/// Prefix under which the default (unprefixed) namespace is registered, so
/// path queries can address default-namespace nodes explicitly.
pub const DEFAULT_NS_PREFIX: &str = "default";

/// A loaded XML document: the parsed tree plus the prefix table harvested
/// from the root element's namespace declarations. Registration happens
/// once at load time, never during traversal.
pub struct XmlDocument<'input> {
    doc: Document<'input>,
    namespaces: HashMap<String, String>,
}

impl<'input> XmlDocument<'input> {
    /// Parse the document text. Malformed input fails with the parser's
    /// error propagated unchanged.
    pub fn load(text: &'input str) -> Result<Self> {
        let doc = Document::parse(text)?;

        let mut namespaces = HashMap::new();
        for ns in doc.root_element().namespaces() {
            let prefix = match ns.name() {
                Some(prefix) if !prefix.is_empty() => prefix.to_string(),
                _ => DEFAULT_NS_PREFIX.to_string(),
            };
            namespaces.insert(prefix, ns.uri().to_string());
        }

        Ok(Self { doc, namespaces })
    }

    /// Registered prefix -> namespace URI table.
    pub fn namespaces(&self) -> &HashMap<String, String> {
        &self.namespaces
    }

    /// Evaluate `query` and keep the element hits, in document order.
    /// With no context the query runs against the document root, which is
    /// where a mapping's root path starts. Attribute hits carry no subtree
    /// to recurse into and are dropped here.
    pub fn select_nodes<'a>(
        &'a self,
        context: Option<Node<'a, 'input>>,
        query: &str,
    ) -> Result<Vec<Node<'a, 'input>>> {
        let query = PathQuery::parse(query)?;
        let context = context.unwrap_or_else(|| self.doc.root());

        let hits = query.evaluate(context, &self.namespaces)?;
        Ok(hits
            .into_iter()
            .filter_map(|hit| match hit {
                QueryHit::Element(node) => Some(node),
                QueryHit::Attribute(_) => None,
            })
            .collect())
    }

    /// Evaluate `query` and return the first hit's textual content: the
    /// concatenated direct text children of an element hit, or the value of
    /// an attribute hit. `None` when nothing matches.
    pub fn select_first_text(&self, context: Node<'_, 'input>, query: &str) -> Result<Option<String>> {
        let query = PathQuery::parse(query)?;

        let hits = query.evaluate(context, &self.namespaces)?;
        Ok(hits.into_iter().next().map(|hit| match hit {
            QueryHit::Element(node) => direct_text(node),
            QueryHit::Attribute(value) => value,
        }))
    }
}

/// Direct text children of an element, concatenated, untrimmed. Descendant
/// element text is not included.
fn direct_text(node: Node<'_, '_>) -> String {
    node.children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect()
}
