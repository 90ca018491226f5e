use std::fmt;

use indexmap::IndexMap;

/// A resolved field value: leaf text, a nested record, a nested collection,
/// or nothing.
#[derive(Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Record(Record),
    Collection(RecordSet),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Leaf text, if this value holds any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&RecordSet> {
        match self {
            Value::Collection(set) => Some(set),
            _ => None,
        }
    }

    /// JSON projection, used for diagnostics and structural comparison.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Text(text) => serde_json::Value::String(text.clone()),
            Value::Record(record) => record.to_json(),
            Value::Collection(set) => set.to_json(),
        }
    }
}

/// Capability contract for typed mapping targets.
///
/// Each mappable record type implements this explicitly; the engine never
/// pokes fields blindly. `field_names` backs the JSON projection and
/// diagnostics, it is not consulted during mapping itself.
pub trait MappedRecord: fmt::Debug + Send {
    /// Type identifier this record was registered under.
    fn type_name(&self) -> &str;

    /// Whether the record carries a field with this name.
    fn has(&self, field: &str) -> bool;

    /// Assign a field. Only called for fields where `has` returned true.
    fn set(&mut self, field: &str, value: Value);

    /// Read a field back, `None` when the record has no such field.
    fn get(&self, field: &str) -> Option<&Value>;

    /// Declared field names, in declaration order.
    fn field_names(&self) -> Vec<&str>;
}

/// A single populated mapping result: either a generic ordered field map or
/// a typed record behind the capability trait.
#[derive(Debug)]
pub enum Record {
    Generic(FieldMap),
    Typed(Box<dyn MappedRecord>),
}

impl Record {
    /// Read a field regardless of representation.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Record::Generic(map) => map.get(field),
            Record::Typed(record) => record.get(field),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        match self {
            Record::Generic(map) => {
                for (name, value) in map.iter() {
                    out.insert(name.to_string(), value.to_json());
                }
            }
            Record::Typed(record) => {
                for name in record.field_names() {
                    let value = record
                        .get(name)
                        .map(Value::to_json)
                        .unwrap_or(serde_json::Value::Null);
                    out.insert(name.to_string(), value);
                }
            }
        }
        serde_json::Value::Object(out)
    }
}

/// Generic mapping target: unique keys, insertion order preserved.
#[derive(Debug, Default)]
pub struct FieldMap {
    entries: IndexMap<String, Value>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.entries.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries.get(field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Which container a multi-record result lives in. `Managed` marks results
/// whose target type is tracked by an external persistence layer; the
/// ordering and contents are identical either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Plain,
    Managed,
}

/// Ordered collection of records, tagged with its container kind.
#[derive(Debug)]
pub struct RecordSet {
    kind: CollectionKind,
    items: Vec<Record>,
}

impl RecordSet {
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, record: Record) {
        self.items.push(record);
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.items.iter()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.items.iter().map(Record::to_json).collect())
    }
}

/// Result container of one mapping traversal. Cardinality is structural:
/// one root match yields `One`, several yield `Many`, none yield `Empty`.
#[derive(Debug)]
pub enum Parsed {
    Empty,
    One(Record),
    Many(RecordSet),
}

impl Parsed {
    /// Fold into a field value for the enclosing record.
    pub fn into_value(self) -> Value {
        match self {
            Parsed::Empty => Value::Null,
            Parsed::One(record) => Value::Record(record),
            Parsed::Many(set) => Value::Collection(set),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Parsed::Empty)
    }

    pub fn as_one(&self) -> Option<&Record> {
        match self {
            Parsed::One(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&RecordSet> {
        match self {
            Parsed::Many(set) => Some(set),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Parsed::Empty => serde_json::Value::Null,
            Parsed::One(record) => record.to_json(),
            Parsed::Many(set) => set.to_json(),
        }
    }
}
