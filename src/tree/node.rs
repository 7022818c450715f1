//! Tree nodes and typed accessors.

use std::fmt;

use crate::error::{CelError, Result};

/// The active variant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    String,
    Tree,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Int => write!(f, "int"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::String => write!(f, "string"),
            ValueKind::Tree => write!(f, "tree"),
        }
    }
}

/// A node value. Exactly one variant is active at a time.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i32),
    Float(f32),
    String(String),
    Tree(Tree),
}

impl Value {
    /// The zero value a missing key materializes as.
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::String => Value::String(String::new()),
            ValueKind::Tree => Value::Tree(Tree::new()),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Tree(_) => ValueKind::Tree,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Value::Tree(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut Tree> {
        match self {
            Value::Tree(v) => Some(v),
            _ => None,
        }
    }
}

/// Structural equality. Any two NaN floats compare equal, since both print
/// as `NaN`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Tree(a), Value::Tree(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Tree> for Value {
    fn from(v: Tree) -> Self {
        Value::Tree(v)
    }
}

/// A single keyed entry of a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: String,
    pub value: Value,
}

impl Node {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An ordered sequence of nodes.
///
/// Lookup is linear and case-sensitive and resolves to the first node with a
/// matching key. Duplicate keys are allowed by the structure; producers keep
/// keys unique by convention.
///
/// `Clone` is a full structural copy: every node owns its subtree, so a clone
/// never shares state with its source. Duplicating a keyzone is a plain clone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    children: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Independent copy of the whole subtree.
    pub fn deep_copy(&self) -> Tree {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.children.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.children.iter_mut()
    }

    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn node_at_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }

    /// Child tree stored at `index`, if that node holds a tree.
    pub fn child_tree(&self, index: usize) -> Option<&Tree> {
        self.children.get(index).and_then(|n| n.value.as_tree())
    }

    pub fn child_tree_mut(&mut self, index: usize) -> Option<&mut Tree> {
        self.children
            .get_mut(index)
            .and_then(|n| n.value.as_tree_mut())
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn insert(&mut self, index: usize, node: Node) {
        self.children.insert(index, node);
    }

    /// Insert at the front; legacy migrations place new fields first.
    pub fn insert_front(&mut self, node: Node) {
        self.children.insert(0, node);
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Node> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    /// Remove the first node with `key`.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let index = self.position(key)?;
        Some(self.children.remove(index))
    }

    pub fn truncate(&mut self, len: usize) {
        self.children.truncate(len);
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.children.iter().position(|n| n.key == key)
    }

    /// Read-only lookup. Never materializes a node.
    pub fn find_child(&self, key: &str) -> Option<&Node> {
        self.children.iter().find(|n| n.key == key)
    }

    pub fn find_child_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|n| n.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_child(key).is_some()
    }

    /// Value at `key`, appending a zero value of `kind` when absent.
    fn entry(&mut self, key: &str, kind: ValueKind) -> &mut Value {
        let index = match self.position(key) {
            Some(index) => index,
            None => {
                self.children.push(Node {
                    key: key.to_string(),
                    value: Value::zero(kind),
                });
                self.children.len() - 1
            }
        };
        &mut self.children[index].value
    }

    pub fn try_node(&mut self, key: &str) -> Result<&mut Tree> {
        match self.entry(key, ValueKind::Tree) {
            Value::Tree(v) => Ok(v),
            other => Err(mismatch(key, ValueKind::Tree, other)),
        }
    }

    pub fn try_int(&mut self, key: &str) -> Result<&mut i32> {
        match self.entry(key, ValueKind::Int) {
            Value::Int(v) => Ok(v),
            other => Err(mismatch(key, ValueKind::Int, other)),
        }
    }

    pub fn try_float(&mut self, key: &str) -> Result<&mut f32> {
        match self.entry(key, ValueKind::Float) {
            Value::Float(v) => Ok(v),
            other => Err(mismatch(key, ValueKind::Float, other)),
        }
    }

    pub fn try_string(&mut self, key: &str) -> Result<&mut String> {
        match self.entry(key, ValueKind::String) {
            Value::String(v) => Ok(v),
            other => Err(mismatch(key, ValueKind::String, other)),
        }
    }

    /// Child tree at `key`, created empty when absent.
    ///
    /// # Panics
    /// Panics if `key` holds a value of another type.
    pub fn get_node(&mut self, key: &str) -> &mut Tree {
        match self.try_node(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }

    /// Integer at `key`, created as `0` when absent.
    ///
    /// # Panics
    /// Panics if `key` holds a value of another type.
    pub fn get_int(&mut self, key: &str) -> &mut i32 {
        match self.try_int(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }

    /// Float at `key`, created as `0.0` when absent.
    ///
    /// # Panics
    /// Panics if `key` holds a value of another type.
    pub fn get_float(&mut self, key: &str) -> &mut f32 {
        match self.try_float(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }

    /// String at `key`, created empty when absent.
    ///
    /// # Panics
    /// Panics if `key` holds a value of another type.
    pub fn get_string(&mut self, key: &str) -> &mut String {
        match self.try_string(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

fn mismatch(key: &str, expected: ValueKind, found: &Value) -> CelError {
    CelError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

impl FromIterator<Node> for Tree {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_materializes_at_end() {
        let mut tree = Tree::new();
        tree.push(Node::new("a", 1));

        assert_eq!(*tree.get_int("b"), 0);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.nodes()[1].key, "b");

        *tree.get_int("b") = 7;
        assert_eq!(tree.find_child("b").and_then(|n| n.value.as_int()), Some(7));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_each_kind_materializes_zero() {
        let mut tree = Tree::new();
        assert_eq!(*tree.get_float("f"), 0.0);
        assert_eq!(tree.get_string("s").as_str(), "");
        assert!(tree.get_node("n").is_empty());
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_find_child_does_not_materialize() {
        let tree = Tree::new();
        assert!(tree.find_child("keymap_preset").is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_first_match_wins() {
        let mut tree = Tree::from_nodes(vec![Node::new("k", 1), Node::new("k", 2)]);
        assert_eq!(*tree.get_int("k"), 1);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut tree = Tree::from_nodes(vec![Node::new("Volume", 1.0f32)]);
        assert_eq!(*tree.get_float("volume"), 0.0);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_try_reports_mismatch() {
        let mut tree = Tree::from_nodes(vec![Node::new("sample_path", "C:/a.mogg")]);
        let err = tree.try_int("sample_path").unwrap_err();
        match err {
            CelError::TypeMismatch {
                expected, found, ..
            } => {
                assert_eq!(expected, ValueKind::Int);
                assert_eq!(found, ValueKind::String);
            }
            other => panic!("unexpected error: {other}"),
        }
        // the stored value is untouched
        assert_eq!(tree.get_string("sample_path"), "C:/a.mogg");
    }

    #[test]
    #[should_panic(expected = "Type mismatch")]
    fn test_get_panics_on_mismatch() {
        let mut tree = Tree::from_nodes(vec![Node::new("volume", "loud")]);
        let _ = tree.get_float("volume");
    }

    #[test]
    fn test_nan_values_compare_equal() {
        assert_eq!(Value::Float(f32::NAN), Value::Float(-f32::NAN));
        assert_ne!(Value::Float(f32::NAN), Value::Float(0.0));
        assert_ne!(Value::Float(1.0), Value::Int(1));
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
    }

    #[test]
    fn test_clone_does_not_alias() {
        let mut zone = Tree::new();
        *zone.get_float("volume") = -3.0;
        *zone.get_node("pan").get_float("position") = 0.5;

        let mut copy = zone.deep_copy();
        *copy.get_float("volume") = 2.0;
        *copy.get_node("pan").get_float("position") = -1.0;

        assert_eq!(*zone.get_float("volume"), -3.0);
        assert_eq!(*zone.get_node("pan").get_float("position"), 0.5);
    }

    #[test]
    fn test_structural_helpers() {
        let mut tree: Tree = vec![Node::new("a", 1), Node::new("b", 2)]
            .into_iter()
            .collect();
        tree.insert_front(Node::new("first", 0));
        assert_eq!(tree.position("first"), Some(0));

        assert!(tree.remove("a").is_some());
        assert!(tree.remove("missing").is_none());
        assert!(tree.remove_at(5).is_none());

        tree.truncate(1);
        assert_eq!(tree.len(), 1);
        assert!(tree.contains_key("first"));
    }
}
