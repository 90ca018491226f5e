use roxmltree::Node;
use tracing::{debug, trace, warn};

use crate::document::XmlDocument;
use crate::error::{MapperError, Result};
use crate::mapping::{FieldSource, MappingSpec, MappingTable, TransformerConfig};
use crate::persistence::PersistenceOracle;
use crate::record::{CollectionKind, FieldMap, Parsed, Record, RecordSet, Value};
use crate::registry::TargetRegistry;
use crate::transform::TransformerRegistry;

/// The mapping engine: recursively walks a named mapping specification
/// against a parsed document and produces typed or generic records,
/// mirroring the document's repeated-node structure.
///
/// The mapping table and registries are fixed at wiring time; `parse`
/// borrows immutably, so concurrent calls on distinct documents are safe.
pub struct Mapper {
    mappings: MappingTable,
    targets: TargetRegistry,
    transformers: TransformerRegistry,
    oracle: Option<Box<dyn PersistenceOracle>>,
}

impl Mapper {
    /// Create a mapper over a mapping table, with the built-in transformers
    /// registered, no typed targets, and no persistence oracle.
    pub fn new(mappings: MappingTable) -> Self {
        Self {
            mappings,
            targets: TargetRegistry::new(),
            transformers: TransformerRegistry::new(),
            oracle: None,
        }
    }

    /// Register a typed target factory.
    pub fn register_target<F>(&mut self, type_id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn crate::record::MappedRecord> + Send + Sync + 'static,
    {
        self.targets.register(type_id, factory);
    }

    /// Register a transformer factory.
    pub fn register_transformer<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn crate::transform::Transformer> + Send + Sync + 'static,
    {
        self.transformers.register(name, factory);
    }

    /// Wire a persistence oracle. Without one, every target type counts as
    /// unmanaged.
    pub fn set_oracle(&mut self, oracle: Box<dyn PersistenceOracle>) {
        self.oracle = Some(oracle);
    }

    /// Parse an XML document according to the named mapping.
    ///
    /// Result cardinality follows the document: one root-path match yields
    /// `Parsed::One`, several yield `Parsed::Many` in document order, none
    /// yield `Parsed::Empty`. Any fatal condition aborts the whole call
    /// with no partial result.
    pub fn parse(&self, xml: &str, mapping_name: &str) -> Result<Parsed> {
        let spec = self
            .mappings
            .get(mapping_name)
            .ok_or_else(|| MapperError::UnknownMapping(mapping_name.to_string()))?;

        let doc = XmlDocument::load(xml)?;
        let result = self.traverse(&doc, None, spec)?;

        debug!("Finished parsing of {} successfully", mapping_name);
        Ok(result)
    }

    fn traverse<'a, 'input>(
        &self,
        doc: &'a XmlDocument<'input>,
        context: Option<Node<'a, 'input>>,
        spec: &MappingSpec,
    ) -> Result<Parsed> {
        let children = doc.select_nodes(context, &spec.root)?;
        debug!("Parsing children of {}", spec.root);

        if children.is_empty() {
            return Ok(Parsed::Empty);
        }

        let multiple = children.len() > 1;
        // Decided per invocation from this level's target, never inherited.
        let managed = match (&spec.target, &self.oracle) {
            (Some(target), Some(oracle)) => oracle.is_managed(target),
            _ => false,
        };

        let mut records = Vec::with_capacity(children.len());
        for child in children {
            records.push(self.build_record(doc, child, spec)?);
        }

        if multiple {
            let kind = if managed {
                CollectionKind::Managed
            } else {
                CollectionKind::Plain
            };
            let mut set = RecordSet::new(kind);
            for record in records {
                set.push(record);
            }
            Ok(Parsed::Many(set))
        } else {
            match records.into_iter().next() {
                Some(record) => Ok(Parsed::One(record)),
                None => Ok(Parsed::Empty),
            }
        }
    }

    fn build_record<'a, 'input>(
        &self,
        doc: &'a XmlDocument<'input>,
        node: Node<'a, 'input>,
        spec: &MappingSpec,
    ) -> Result<Record> {
        match spec.target.as_deref() {
            Some(target) => {
                let mut record = self.targets.instantiate(target)?;
                for (field, source) in &spec.fields {
                    // The source is only resolved for fields the target
                    // carries, so a broken transformer on a skipped field
                    // cannot abort the parse.
                    if record.has(field) {
                        let value = self.resolve(doc, node, source)?;
                        record.set(field, value);
                        trace!("Saved {} field", field);
                    } else {
                        warn!("Missing field {} on target type {}", field, target);
                    }
                }
                Ok(Record::Typed(record))
            }
            None => {
                let mut map = FieldMap::new();
                for (field, source) in &spec.fields {
                    let value = self.resolve(doc, node, source)?;
                    map.insert(field.clone(), value);
                    trace!("Saved {} field", field);
                }
                Ok(Record::Generic(map))
            }
        }
    }

    fn resolve<'a, 'input>(
        &self,
        doc: &'a XmlDocument<'input>,
        node: Node<'a, 'input>,
        source: &FieldSource,
    ) -> Result<Value> {
        match source {
            FieldSource::Nested(spec) => Ok(self.traverse(doc, Some(node), spec)?.into_value()),
            FieldSource::Query(query) => self.leaf_value(doc, node, query),
            FieldSource::Leaf(leaf) => {
                let value = self.leaf_value(doc, node, &leaf.query)?;
                match &leaf.transformer {
                    Some(name) => self.apply_transformer(name, &leaf.config, value),
                    None => Ok(value),
                }
            }
        }
    }

    fn leaf_value<'a, 'input>(
        &self,
        doc: &'a XmlDocument<'input>,
        node: Node<'a, 'input>,
        query: &str,
    ) -> Result<Value> {
        trace!("Parsing {} field", query);
        let text = doc.select_first_text(node, query)?;
        Ok(text.map(Value::Text).unwrap_or(Value::Null))
    }

    fn apply_transformer(
        &self,
        name: &str,
        config: &TransformerConfig,
        value: Value,
    ) -> Result<Value> {
        // Fresh instance per invocation; nothing is cached across calls.
        let transformer = self.transformers.resolve(name)?;
        debug!("Processing field value using {}", name);
        transformer
            .process(value, config)
            .map_err(|err| MapperError::Transform {
                name: name.to_string(),
                message: err.to_string(),
            })
    }
}
