use std::collections::HashMap;

use roxmltree::Node;

use crate::error::{MapperError, Result};

/// A parsed path query.
///
/// Supported grammar, evaluated against a context node:
/// - `/a/b` - absolute path, evaluated from the document root;
/// - `a/b` - relative path, evaluated from the context node;
/// - `//a`, `a//b` - descendant steps at any depth;
/// - `*` - any element;
/// - `ns:a` - element in the namespace registered under prefix `ns`
///   (the default namespace is registered under the `default` prefix);
/// - `.` and `..` - context node and parent;
/// - `@attr` - attribute value, only as the final step;
/// - `a[2]` - 1-based positional predicate, per context node.
#[derive(Debug, Clone)]
pub struct PathQuery {
    text: String,
    absolute: bool,
    steps: Vec<Step>,
}

#[derive(Debug, Clone)]
struct Step {
    axis: Axis,
    test: NodeTest,
    index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone)]
enum NodeTest {
    Named { prefix: Option<String>, local: String },
    Any,
    Attribute(String),
    Current,
    Parent,
}

/// One match produced by query evaluation, in document order.
#[derive(Debug)]
pub enum QueryHit<'a, 'input> {
    Element(Node<'a, 'input>),
    Attribute(String),
}

impl PathQuery {
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(invalid(text, "query is empty"));
        }

        let absolute = trimmed.starts_with('/');
        let segments: Vec<&str> = trimmed.split('/').collect();

        let mut steps = Vec::new();
        let mut axis = Axis::Child;
        // A leading empty segment is the absolute-path marker, any other
        // empty segment is a `//` turning the next step into a descendant
        // step.
        let start = if absolute { 1 } else { 0 };
        for segment in &segments[start..] {
            if segment.is_empty() {
                if axis == Axis::Descendant {
                    return Err(invalid(text, "empty step"));
                }
                axis = Axis::Descendant;
                continue;
            }
            steps.push(parse_step(text, segment, axis)?);
            axis = Axis::Child;
        }

        if axis == Axis::Descendant {
            return Err(invalid(text, "dangling '/'"));
        }
        if steps.is_empty() {
            return Err(invalid(text, "query has no steps"));
        }
        for (i, step) in steps.iter().enumerate() {
            if matches!(step.test, NodeTest::Attribute(_)) && i + 1 != steps.len() {
                return Err(invalid(text, "attribute step must be the final step"));
            }
        }

        Ok(Self {
            text: trimmed.to_string(),
            absolute,
            steps,
        })
    }

    /// Evaluate against `context`, resolving namespace prefixes through the
    /// registered prefix table. Hits come back in document order.
    pub fn evaluate<'a, 'input>(
        &self,
        context: Node<'a, 'input>,
        namespaces: &HashMap<String, String>,
    ) -> Result<Vec<QueryHit<'a, 'input>>> {
        let mut current: Vec<Node<'a, 'input>> = if self.absolute {
            vec![context.document().root()]
        } else {
            vec![context]
        };

        for step in &self.steps {
            if let NodeTest::Attribute(name) = &step.test {
                // Parse-time validation guarantees this is the final step.
                let hits = current
                    .iter()
                    .filter_map(|node| node.attribute(name.as_str()))
                    .map(|value| QueryHit::Attribute(value.to_string()))
                    .collect();
                return Ok(hits);
            }

            current = self.advance(&current, step, namespaces)?;
            if current.is_empty() {
                return Ok(Vec::new());
            }
        }

        Ok(current.into_iter().map(QueryHit::Element).collect())
    }

    fn advance<'a, 'input>(
        &self,
        current: &[Node<'a, 'input>],
        step: &Step,
        namespaces: &HashMap<String, String>,
    ) -> Result<Vec<Node<'a, 'input>>> {
        match &step.test {
            NodeTest::Current => Ok(current.to_vec()),
            NodeTest::Parent => {
                // Distinct context nodes may share a parent.
                let mut parents: Vec<Node<'a, 'input>> = Vec::new();
                for node in current {
                    if let Some(parent) = node.parent() {
                        if !parents.iter().any(|seen| seen.id() == parent.id()) {
                            parents.push(parent);
                        }
                    }
                }
                Ok(parents)
            }
            test => {
                let mut next = Vec::new();
                for node in current {
                    let mut matched = Vec::new();
                    match step.axis {
                        Axis::Child => {
                            for child in node.children() {
                                if self.element_matches(test, child, namespaces)? {
                                    matched.push(child);
                                }
                            }
                        }
                        Axis::Descendant => {
                            for descendant in node.descendants().skip(1) {
                                if self.element_matches(test, descendant, namespaces)? {
                                    matched.push(descendant);
                                }
                            }
                        }
                    }
                    // Positional predicates count within each context node.
                    match step.index {
                        Some(position) => {
                            if let Some(hit) = matched.get(position - 1) {
                                next.push(*hit);
                            }
                        }
                        None => next.extend(matched),
                    }
                }
                Ok(next)
            }
        }
    }

    fn element_matches(
        &self,
        test: &NodeTest,
        node: Node<'_, '_>,
        namespaces: &HashMap<String, String>,
    ) -> Result<bool> {
        if !node.is_element() {
            return Ok(false);
        }
        match test {
            NodeTest::Any => Ok(true),
            NodeTest::Named { prefix, local } => {
                let tag = node.tag_name();
                if tag.name() != local {
                    return Ok(false);
                }
                match prefix {
                    Some(prefix) => {
                        let uri = namespaces.get(prefix).ok_or_else(|| {
                            invalid(&self.text, &format!("unknown namespace prefix '{}'", prefix))
                        })?;
                        Ok(tag.namespace() == Some(uri.as_str()))
                    }
                    None => Ok(tag.namespace().is_none()),
                }
            }
            _ => Ok(false),
        }
    }
}

fn parse_step(query: &str, segment: &str, axis: Axis) -> Result<Step> {
    let (name_part, index) = split_predicate(query, segment)?;

    let test = if name_part == "." {
        NodeTest::Current
    } else if name_part == ".." {
        NodeTest::Parent
    } else if let Some(attr) = name_part.strip_prefix('@') {
        validate_name(query, attr)?;
        NodeTest::Attribute(attr.to_string())
    } else if name_part == "*" {
        NodeTest::Any
    } else if let Some((prefix, local)) = name_part.split_once(':') {
        validate_name(query, prefix)?;
        validate_name(query, local)?;
        NodeTest::Named {
            prefix: Some(prefix.to_string()),
            local: local.to_string(),
        }
    } else {
        validate_name(query, name_part)?;
        NodeTest::Named {
            prefix: None,
            local: name_part.to_string(),
        }
    };

    if index.is_some() && matches!(test, NodeTest::Attribute(_) | NodeTest::Current | NodeTest::Parent) {
        return Err(invalid(query, "predicate not allowed on this step"));
    }

    Ok(Step { axis, test, index })
}

fn split_predicate<'s>(query: &str, segment: &'s str) -> Result<(&'s str, Option<usize>)> {
    match segment.find('[') {
        Some(open) => {
            let rest = &segment[open..];
            let inner = rest
                .strip_prefix('[')
                .and_then(|r| r.strip_suffix(']'))
                .ok_or_else(|| invalid(query, "malformed predicate"))?;
            let position: usize = inner
                .trim()
                .parse()
                .map_err(|_| invalid(query, "predicate must be a position number"))?;
            if position == 0 {
                return Err(invalid(query, "positions are 1-based"));
            }
            Ok((&segment[..open], Some(position)))
        }
        None => Ok((segment, None)),
    }
}

fn validate_name(query: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(query, "empty name in step"));
    }
    if name.chars().any(|c| c.is_whitespace() || "[]@/:".contains(c)) {
        return Err(invalid(query, &format!("invalid name '{}'", name)));
    }
    Ok(())
}

fn invalid(query: &str, reason: &str) -> MapperError {
    MapperError::InvalidQuery {
        query: query.to_string(),
        reason: reason.to_string(),
    }
}
