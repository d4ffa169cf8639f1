//! The document tree.
//!
//! A [`Document`] owns every node in arena storage and hands out copyable
//! [`NodeId`] handles. Each node carries a back-reference to its parent, so
//! navigation works in both directions without reference cycles; containers
//! hold child ids (insertion-ordered for objects).
//!
//! Two intentional asymmetries in [`Document::to_json`]: an empty array
//! serializes to the empty string rather than `[]`, and objects skip any
//! attribute whose rendered value is empty. Hand-built documents that avoid
//! empty arrays round-trip exactly.

use indexmap::IndexMap;

use crate::strings;

/// Handle to a node inside a [`Document`].
///
/// Ids are only meaningful to the document that issued them. Using an id
/// after [`Document::remove`] freed its node panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Null,
    String,
    Number,
    Boolean,
    Object,
    Array,
}

#[derive(Debug)]
enum Value {
    Null,
    Text(String),
    Number(f64),
    Boolean(bool),
    Object(IndexMap<String, NodeId>),
    Array(Vec<NodeId>),
}

#[derive(Debug)]
struct NodeData {
    parent: Option<NodeId>,
    value: Value,
}

/// An arena of nodes with a designated root object.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<NodeData>>,
    free: Vec<u32>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding a single empty root object.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.alloc(Value::Object(IndexMap::new()));
        doc
    }

    /// The root object.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        match self.data(id).value {
            Value::Null => NodeType::Null,
            Value::Text(_) => NodeType::String,
            Value::Number(_) => NodeType::Number,
            Value::Boolean(_) => NodeType::Boolean,
            Value::Object(_) => NodeType::Object,
            Value::Array(_) => NodeType::Array,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// How the node is reachable from its parent: the attribute key under
    /// an object, `[index]` under an array, `root` for a detached
    /// container, and the empty string for a detached scalar.
    pub fn name(&self, id: NodeId) -> String {
        match self.parent(id) {
            Some(parent) => match &self.data(parent).value {
                Value::Object(map) => map
                    .iter()
                    .find(|(_, child)| **child == id)
                    .map(|(key, _)| key.clone())
                    .unwrap_or_default(),
                Value::Array(items) => {
                    let index = items.iter().position(|child| *child == id);
                    match index {
                        Some(i) => format!("[{i}]"),
                        None => String::new(),
                    }
                }
                _ => String::new(),
            },
            None => match self.node_type(id) {
                NodeType::Object | NodeType::Array => "root".to_string(),
                _ => String::new(),
            },
        }
    }

    // ===== detached constructors =====

    pub fn new_null(&mut self) -> NodeId {
        self.alloc(Value::Null)
    }

    pub fn new_string(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(Value::Text(value.into()))
    }

    pub fn new_number(&mut self, value: f64) -> NodeId {
        self.alloc(Value::Number(value))
    }

    pub fn new_boolean(&mut self, value: bool) -> NodeId {
        self.alloc(Value::Boolean(value))
    }

    pub fn new_object(&mut self) -> NodeId {
        self.alloc(Value::Object(IndexMap::new()))
    }

    pub fn new_array(&mut self) -> NodeId {
        self.alloc(Value::Array(Vec::new()))
    }

    // ===== object mutation =====

    /// Attaches `node` to `object` under `name`.
    ///
    /// A node already attached elsewhere is detached first; inserting a
    /// node that is already a child of this object is a no-op. When the
    /// name is taken, `replace` decides the outcome: `true` discards the
    /// old value, `false` folds old and new into an array under the name
    /// (appending when the old value already is one).
    ///
    /// Returns `node`. Panics if `object` is not an object node.
    pub fn insert_attribute(
        &mut self,
        object: NodeId,
        name: &str,
        node: NodeId,
        replace: bool,
    ) -> NodeId {
        assert!(
            matches!(self.data(object).value, Value::Object(_)),
            "insert_attribute target is not an object"
        );

        if let Some(parent) = self.parent(node) {
            if parent == object {
                return node;
            }
            self.take_from_parent(node);
        }

        let existing = self.object_map(object).get(name).copied();
        match existing {
            Some(old) if replace => {
                self.data_mut(old).parent = None;
                self.free_subtree(old);
                self.object_map_mut(object).insert(name.to_string(), node);
                self.data_mut(node).parent = Some(object);
            }
            Some(old) => {
                if matches!(self.data(old).value, Value::Array(_)) {
                    self.push_value(old, node);
                } else {
                    let array = self.alloc(Value::Array(vec![old, node]));
                    self.data_mut(old).parent = Some(array);
                    self.data_mut(node).parent = Some(array);
                    self.data_mut(array).parent = Some(object);
                    // keeps the attribute's position in the object
                    self.object_map_mut(object).insert(name.to_string(), array);
                }
            }
            None => {
                self.object_map_mut(object).insert(name.to_string(), node);
                self.data_mut(node).parent = Some(object);
            }
        }
        node
    }

    pub fn add_null(&mut self, object: NodeId, name: &str) -> NodeId {
        let node = self.new_null();
        self.insert_attribute(object, name, node, true)
    }

    pub fn add_string(&mut self, object: NodeId, name: &str, value: impl Into<String>) -> NodeId {
        let node = self.new_string(value);
        self.insert_attribute(object, name, node, true)
    }

    pub fn add_number(&mut self, object: NodeId, name: &str, value: f64) -> NodeId {
        let node = self.new_number(value);
        self.insert_attribute(object, name, node, true)
    }

    pub fn add_boolean(&mut self, object: NodeId, name: &str, value: bool) -> NodeId {
        let node = self.new_boolean(value);
        self.insert_attribute(object, name, node, true)
    }

    pub fn add_object(&mut self, object: NodeId, name: &str) -> NodeId {
        let node = self.new_object();
        self.insert_attribute(object, name, node, true)
    }

    pub fn add_array(&mut self, object: NodeId, name: &str) -> NodeId {
        let node = self.new_array();
        self.insert_attribute(object, name, node, true)
    }

    /// Removes and frees the attribute under `name`. Returns whether an
    /// attribute was removed.
    pub fn remove_attribute(&mut self, object: NodeId, name: &str) -> bool {
        let removed = self.object_map_mut(object).shift_remove(name);
        match removed {
            Some(child) => {
                self.data_mut(child).parent = None;
                self.free_subtree(child);
                true
            }
            None => false,
        }
    }

    // ===== array mutation =====

    /// Appends `node` to `array`, detaching it from any previous parent.
    /// Appending a node already inside this array is a no-op.
    ///
    /// Panics if `array` is not an array node.
    pub fn push_value(&mut self, array: NodeId, node: NodeId) -> NodeId {
        assert!(
            matches!(self.data(array).value, Value::Array(_)),
            "push_value target is not an array"
        );
        if let Some(parent) = self.parent(node) {
            if parent == array {
                return node;
            }
            self.take_from_parent(node);
        }
        self.data_mut(node).parent = Some(array);
        self.array_vec_mut(array).push(node);
        node
    }

    pub fn push_null(&mut self, array: NodeId) -> NodeId {
        let node = self.new_null();
        self.push_value(array, node)
    }

    pub fn push_string(&mut self, array: NodeId, value: impl Into<String>) -> NodeId {
        let node = self.new_string(value);
        self.push_value(array, node)
    }

    pub fn push_number(&mut self, array: NodeId, value: f64) -> NodeId {
        let node = self.new_number(value);
        self.push_value(array, node)
    }

    pub fn push_boolean(&mut self, array: NodeId, value: bool) -> NodeId {
        let node = self.new_boolean(value);
        self.push_value(array, node)
    }

    pub fn push_object(&mut self, array: NodeId) -> NodeId {
        let node = self.new_object();
        self.push_value(array, node)
    }

    pub fn push_array(&mut self, array: NodeId) -> NodeId {
        let node = self.new_array();
        self.push_value(array, node)
    }

    // ===== detachment and disposal =====

    /// Unlinks the node from its parent, leaving it alive and detached.
    /// Exactly one entry leaves the parent's collection. Detached nodes
    /// are left untouched, so calling this twice is harmless.
    pub fn take_from_parent(&mut self, id: NodeId) {
        let Some(parent) = self.data_mut(id).parent.take() else {
            return;
        };
        match &mut self.nodes[parent.0 as usize].as_mut().expect("stale node id").value {
            Value::Object(map) => {
                let key = map
                    .iter()
                    .find(|(_, child)| **child == id)
                    .map(|(key, _)| key.clone());
                if let Some(key) = key {
                    map.shift_remove(&key);
                }
            }
            Value::Array(items) => {
                if let Some(index) = items.iter().position(|child| *child == id) {
                    items.remove(index);
                }
            }
            _ => {}
        }
    }

    /// Detaches the node and frees it together with its subtree.
    pub fn remove(&mut self, id: NodeId) {
        assert!(id != self.root, "cannot remove the root object");
        self.take_from_parent(id);
        self.free_subtree(id);
    }

    /// Frees every child of an object or array, leaving the container
    /// empty. Panics on scalar nodes.
    pub fn clear(&mut self, container: NodeId) {
        let children: Vec<NodeId> = match &mut self.data_mut(container).value {
            Value::Object(map) => map.drain(..).map(|(_, child)| child).collect(),
            Value::Array(items) => std::mem::take(items),
            _ => panic!("clear target is not a container"),
        };
        for child in children {
            self.data_mut(child).parent = None;
            self.free_subtree(child);
        }
    }

    /// Deep copy of the node and its subtree. The copy is detached and
    /// shares no storage with the original.
    pub fn clone_node(&mut self, id: NodeId) -> NodeId {
        enum Snapshot {
            Null,
            Text(String),
            Number(f64),
            Boolean(bool),
            Object(Vec<(String, NodeId)>),
            Array(Vec<NodeId>),
        }

        let snapshot = match &self.data(id).value {
            Value::Null => Snapshot::Null,
            Value::Text(text) => Snapshot::Text(text.clone()),
            Value::Number(value) => Snapshot::Number(*value),
            Value::Boolean(value) => Snapshot::Boolean(*value),
            Value::Object(map) => Snapshot::Object(
                map.iter().map(|(key, child)| (key.clone(), *child)).collect(),
            ),
            Value::Array(items) => Snapshot::Array(items.clone()),
        };

        match snapshot {
            Snapshot::Null => self.new_null(),
            Snapshot::Text(text) => self.new_string(text),
            Snapshot::Number(value) => self.new_number(value),
            Snapshot::Boolean(value) => self.new_boolean(value),
            Snapshot::Object(entries) => {
                let copy = self.new_object();
                for (key, child) in entries {
                    let child_copy = self.clone_node(child);
                    self.insert_attribute(copy, &key, child_copy, true);
                }
                copy
            }
            Snapshot::Array(items) => {
                let copy = self.new_array();
                for child in items {
                    let child_copy = self.clone_node(child);
                    self.push_value(copy, child_copy);
                }
                copy
            }
        }
    }

    // ===== queries =====

    pub fn get(&self, object: NodeId, name: &str) -> Option<NodeId> {
        self.object_map(object).get(name).copied()
    }

    pub fn attribute_count(&self, object: NodeId) -> usize {
        self.object_map(object).len()
    }

    /// Attributes of an object in insertion order.
    pub fn attributes(&self, object: NodeId) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.object_map(object)
            .iter()
            .map(|(key, child)| (key.as_str(), *child))
    }

    pub fn at(&self, array: NodeId, index: usize) -> Option<NodeId> {
        self.array_vec(array).get(index).copied()
    }

    pub fn len(&self, array: NodeId) -> usize {
        self.array_vec(array).len()
    }

    pub fn is_empty(&self, array: NodeId) -> bool {
        self.array_vec(array).is_empty()
    }

    pub fn index_of(&self, array: NodeId, node: NodeId) -> Option<usize> {
        self.array_vec(array).iter().position(|child| *child == node)
    }

    /// Elements of an array in order.
    pub fn elements(&self, array: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.array_vec(array).iter().copied()
    }

    // ===== typed accessors =====

    pub fn string_value(&self, id: NodeId) -> Option<&str> {
        match &self.data(id).value {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn number_value(&self, id: NodeId) -> Option<f64> {
        match self.data(id).value {
            Value::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn boolean_value(&self, id: NodeId) -> Option<bool> {
        match self.data(id).value {
            Value::Boolean(value) => Some(value),
            _ => None,
        }
    }

    // ===== coercions =====
    //
    // Every coercion reports failure as `None`; none of them can fail the
    // document or panic on a live id. A single-element array answers for
    // its sole element; containers otherwise never coerce.

    pub fn to_bool(&self, id: NodeId) -> Option<bool> {
        match &self.data(id).value {
            Value::Text(text) => strings::to_bool(text),
            Value::Number(value) => Some(*value != 0.0),
            Value::Boolean(value) => Some(*value),
            Value::Array(items) if items.len() == 1 => self.to_bool(items[0]),
            _ => None,
        }
    }

    pub fn to_i32(&self, id: NodeId) -> Option<i32> {
        match &self.data(id).value {
            Value::Text(text) => strings::to_i32(text),
            Value::Number(value) => {
                let truncated = value.trunc();
                if truncated >= i32::MIN as f64 && truncated <= i32::MAX as f64 {
                    Some(truncated as i32)
                } else {
                    None
                }
            }
            Value::Boolean(value) => Some(i32::from(*value)),
            Value::Array(items) if items.len() == 1 => self.to_i32(items[0]),
            _ => None,
        }
    }

    pub fn to_u32(&self, id: NodeId) -> Option<u32> {
        match &self.data(id).value {
            Value::Text(text) => strings::to_u32(text),
            Value::Number(value) => {
                let truncated = value.trunc();
                if truncated >= 0.0 && truncated <= u32::MAX as f64 {
                    Some(truncated as u32)
                } else {
                    None
                }
            }
            Value::Boolean(value) => Some(u32::from(*value)),
            Value::Array(items) if items.len() == 1 => self.to_u32(items[0]),
            _ => None,
        }
    }

    pub fn to_f64(&self, id: NodeId) -> Option<f64> {
        match &self.data(id).value {
            Value::Text(text) => strings::to_f64(text),
            Value::Number(value) => Some(*value),
            Value::Boolean(value) => Some(f64::from(*value)),
            Value::Array(items) if items.len() == 1 => self.to_f64(items[0]),
            _ => None,
        }
    }

    pub fn to_text(&self, id: NodeId) -> Option<String> {
        match &self.data(id).value {
            Value::Text(text) => Some(text.clone()),
            Value::Number(value) => Some(strings::from_f64(*value)),
            Value::Boolean(value) => Some(strings::from_bool(*value).to_string()),
            Value::Array(items) if items.len() == 1 => self.to_text(items[0]),
            _ => None,
        }
    }

    // ===== serialization =====

    /// Minimal JSON rendering of the node.
    ///
    /// Empty arrays render as the empty string, and objects omit any
    /// attribute whose value renders empty. Everything else is standard
    /// minimal JSON with full string escaping.
    pub fn to_json(&self, id: NodeId) -> String {
        match &self.data(id).value {
            Value::Null => "null".to_string(),
            Value::Text(text) => escape_string(text),
            Value::Number(value) => strings::from_f64(*value),
            Value::Boolean(value) => strings::from_bool(*value).to_string(),
            Value::Object(map) => {
                let mut attributes = String::new();
                for (key, child) in map {
                    let rendered = self.to_json(*child);
                    if rendered.is_empty() {
                        continue;
                    }
                    if !attributes.is_empty() {
                        attributes.push(',');
                    }
                    attributes.push_str(&escape_string(key));
                    attributes.push(':');
                    attributes.push_str(&rendered);
                }
                format!("{{{attributes}}}")
            }
            Value::Array(items) => {
                let mut rendered_items = String::new();
                for child in items {
                    let rendered = self.to_json(*child);
                    if rendered.is_empty() {
                        continue;
                    }
                    if !rendered_items.is_empty() {
                        rendered_items.push(',');
                    }
                    rendered_items.push_str(&rendered);
                }
                if rendered_items.is_empty() {
                    String::new()
                } else {
                    format!("[{rendered_items}]")
                }
            }
        }
    }

    /// Structural equality between a node here and a node in `other`,
    /// ignoring ids and parents.
    pub fn deep_eq(&self, id: NodeId, other: &Document, other_id: NodeId) -> bool {
        match (&self.data(id).value, &other.data(other_id).value) {
            (Value::Null, Value::Null) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| {
                        ka == kb && self.deep_eq(*va, other, *vb)
                    })
            }
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(va, vb)| self.deep_eq(*va, other, *vb))
            }
            _ => false,
        }
    }

    // ===== internals =====

    fn alloc(&mut self, value: Value) -> NodeId {
        let data = NodeData { parent: None, value };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot as usize] = Some(data);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(data));
                NodeId((self.nodes.len() - 1) as u32)
            }
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children: Vec<NodeId> = match &self.data(id).value {
            Value::Object(map) => map.values().copied().collect(),
            Value::Array(items) => items.clone(),
            _ => Vec::new(),
        };
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.0 as usize] = None;
        self.free.push(id.0);
    }

    fn data(&self, id: NodeId) -> &NodeData {
        self.nodes[id.0 as usize].as_ref().expect("stale node id")
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.nodes[id.0 as usize].as_mut().expect("stale node id")
    }

    fn object_map(&self, id: NodeId) -> &IndexMap<String, NodeId> {
        match &self.data(id).value {
            Value::Object(map) => map,
            _ => panic!("node is not an object"),
        }
    }

    fn object_map_mut(&mut self, id: NodeId) -> &mut IndexMap<String, NodeId> {
        match &mut self.data_mut(id).value {
            Value::Object(map) => map,
            _ => panic!("node is not an object"),
        }
    }

    fn array_vec(&self, id: NodeId) -> &Vec<NodeId> {
        match &self.data(id).value {
            Value::Array(items) => items,
            _ => panic!("node is not an array"),
        }
    }

    fn array_vec_mut(&mut self, id: NodeId) -> &mut Vec<NodeId> {
        match &mut self.data_mut(id).value {
            Value::Array(items) => items,
            _ => panic!("node is not an array"),
        }
    }
}

/// Quotes and escapes a string for JSON output.
fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
