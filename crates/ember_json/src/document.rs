//! # JSON Document
//!
//! The immutable parsed document and its query API.
//!
//! ## Storage
//!
//! Nodes live in growable vectors owned by the document - an index arena.
//! Children are referenced by typed ids, nothing is freed individually,
//! and dropping the document is the teardown. Object members and array
//! elements are singly linked lists threaded through those vectors:
//!
//! - Members are **prepended** while parsing, so the list is in reverse
//!   parse order and a lookup scanning from the head makes the
//!   last-declared duplicate key win.
//! - Elements are prepended too, then the list is **reversed once** after
//!   the closing bracket so indexed access sees ascending order.
//!
//! Both behaviors are observable semantics, not accidents.
//!
//! ## Sticky errors
//!
//! There are no exceptions. A failed query (missing key, bad index, type
//! mismatch) poisons the queried node and every ancestor; every further
//! query on a poisoned node answers `None`. A chain like
//! `lookup("a") -> index(2) -> lookup("b")` therefore fails silently and
//! stays failed without the caller checking each step.

use crate::error::JsonError;
use ember_core::key_hash;
use std::cell::Cell;
use std::fmt;

/// Handle to a value node inside a [`Document`].
///
/// Ids are only meaningful for the document that issued them; a foreign or
/// stale id resolves to `None`, never to another document's data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueId(usize);

/// Internal handle to an object-member node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MemberId(usize);

/// Internal handle to an array-element node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ElementId(usize);

/// The kind of a JSON value, for callers that dispatch on type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    /// The literal `null`.
    Null,
    /// `true` or `false`.
    Boolean,
    /// An IEEE-754 double.
    Number,
    /// A string borrowed from the source buffer.
    String,
    /// An object (named members).
    Object,
    /// An array (indexed elements).
    Array,
}

/// Payload of a value node. The tagged-sum replacement for the C-style
/// union: every access is exhaustive-checked.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Payload<'src> {
    /// The literal `null`.
    Null,
    /// A boolean literal.
    Boolean(bool),
    /// A number, already converted to a double.
    Number(f64),
    /// A string slice of the source buffer (escapes not decoded).
    String(&'src str),
    /// An object: head of its member list (reverse parse order).
    Object {
        /// First member, or `None` for `{}`.
        first: Option<MemberId>,
    },
    /// An array: head of its element list (ascending after the
    /// post-parse reversal).
    Array {
        /// First element, or `None` for `[]`.
        first: Option<ElementId>,
        /// Number of elements.
        len: usize,
    },
}

/// One value node: payload plus the bookkeeping the query API needs.
struct ValueNode<'src> {
    /// The value itself.
    payload: Payload<'src>,
    /// Enclosing container, for upward error propagation. Lookup-only.
    parent: Option<ValueId>,
    /// Sticky error flag. Once set, every query on this node answers
    /// `None`.
    poisoned: Cell<bool>,
}

/// One object member: `(key hash, value, next)`.
struct MemberNode {
    /// Hash of the member name (via [`ember_core::key_hash`]). The
    /// original key text is not retained.
    key_hash: u64,
    /// The member's value node.
    value: ValueId,
    /// Next member in reverse parse order.
    next: Option<MemberId>,
}

/// One array element: `(index, value, next)`.
struct ElementNode {
    /// 0-based position in the array.
    index: usize,
    /// The element's value node.
    value: ValueId,
    /// Next element (ascending order once parsing has reversed the list).
    next: Option<ElementId>,
}

/// A parsed JSON document.
///
/// Produced by [`crate::parse`]; immutable afterward - queries only ever
/// touch the sticky error flags. String values borrow from the source
/// buffer handed to `parse`, so the buffer must outlive the document.
pub struct Document<'src> {
    /// All value nodes, in creation order.
    values: Vec<ValueNode<'src>>,
    /// All object-member nodes.
    members: Vec<MemberNode>,
    /// All array-element nodes.
    elements: Vec<ElementNode>,
    /// The top-level value. `None` when parsing failed.
    root: Option<ValueId>,
    /// The first (and only surfaced) scan/parse error.
    error: Option<JsonError>,
}

impl<'src> Document<'src> {
    /// Creates an empty document for the parser to fill in.
    pub(crate) fn empty() -> Self {
        Self {
            values: Vec::new(),
            members: Vec::new(),
            elements: Vec::new(),
            root: None,
            error: None,
        }
    }

    /// Creates a document that records a parse failure and nothing else.
    pub(crate) fn failed(error: JsonError) -> Self {
        let mut doc = Self::empty();
        doc.error = Some(error);
        doc
    }

    /// Appends a value node, returning its id.
    pub(crate) fn push_value(
        &mut self,
        payload: Payload<'src>,
        parent: Option<ValueId>,
    ) -> ValueId {
        let id = ValueId(self.values.len());
        self.values.push(ValueNode {
            payload,
            parent,
            poisoned: Cell::new(false),
        });
        id
    }

    /// Prepends a member to an object's list.
    ///
    /// Prepending is what makes the last-declared duplicate key win: the
    /// lookup scan starts at the head, which is the most recent member.
    pub(crate) fn prepend_member(&mut self, object: ValueId, key_hash: u64, value: ValueId) {
        let Payload::Object { first } = self.values[object.0].payload else {
            return;
        };
        let id = MemberId(self.members.len());
        self.members.push(MemberNode {
            key_hash,
            value,
            next: first,
        });
        if let Payload::Object { first } = &mut self.values[object.0].payload {
            *first = Some(id);
        }
    }

    /// Prepends an element to an array's list, assigning the next index.
    ///
    /// The list stays in reverse order until [`Self::reverse_elements`]
    /// runs after the closing bracket.
    pub(crate) fn prepend_element(&mut self, array: ValueId, value: ValueId) {
        let Payload::Array { first, len } = self.values[array.0].payload else {
            return;
        };
        let id = ElementId(self.elements.len());
        self.elements.push(ElementNode {
            index: len,
            value,
            next: first,
        });
        if let Payload::Array { first, len } = &mut self.values[array.0].payload {
            *first = Some(id);
            *len += 1;
        }
    }

    /// Reverses an array's element list in place, restoring ascending
    /// index order. Called exactly once per array, when `]` is consumed.
    pub(crate) fn reverse_elements(&mut self, array: ValueId) {
        let Payload::Array { first, .. } = self.values[array.0].payload else {
            return;
        };

        let mut prev: Option<ElementId> = None;
        let mut cursor = first;
        while let Some(id) = cursor {
            let next = self.elements[id.0].next;
            self.elements[id.0].next = prev;
            prev = Some(id);
            cursor = next;
        }

        if let Payload::Array { first, .. } = &mut self.values[array.0].payload {
            *first = prev;
        }
    }

    /// Records the top-level value after a successful parse.
    pub(crate) fn set_root(&mut self, root: ValueId) {
        self.root = Some(root);
    }

    /// Records the terminal parse error.
    pub(crate) fn set_error(&mut self, error: JsonError) {
        self.error = Some(error);
    }

    /// Returns the top-level value, or `None` if parsing failed.
    #[must_use]
    pub const fn root(&self) -> Option<ValueId> {
        self.root
    }

    /// Returns the parse error, if the parse failed.
    #[must_use]
    pub const fn error(&self) -> Option<&JsonError> {
        self.error.as_ref()
    }

    /// Returns `true` if the document parsed cleanly.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Returns a value's type, or `None` for a stale/foreign id.
    ///
    /// Type inspection does not poison; only failed queries do.
    #[must_use]
    pub fn value_type(&self, id: ValueId) -> Option<ValueType> {
        Some(match self.node(id)?.payload {
            Payload::Null => ValueType::Null,
            Payload::Boolean(_) => ValueType::Boolean,
            Payload::Number(_) => ValueType::Number,
            Payload::String(_) => ValueType::String,
            Payload::Object { .. } => ValueType::Object,
            Payload::Array { .. } => ValueType::Array,
        })
    }

    /// Returns `true` if a failed query has poisoned this node.
    #[must_use]
    pub fn had_error(&self, id: ValueId) -> bool {
        self.node(id).is_some_and(|node| node.poisoned.get())
    }

    /// Looks up an object member by name.
    ///
    /// The name is hashed with [`ember_core::key_hash`] - the same hash
    /// the parser stored - and the member list is scanned from the head,
    /// so the **last-declared** duplicate key wins.
    ///
    /// # Returns
    ///
    /// The member's value, or `None` if `object` is poisoned, is not an
    /// object, or has no such member. The two failure cases poison
    /// `object` and its ancestors.
    #[must_use]
    pub fn lookup(&self, object: ValueId, key: &str) -> Option<ValueId> {
        let node = self.node(object)?;
        if node.poisoned.get() {
            return None;
        }
        let Payload::Object { first } = node.payload else {
            self.poison(object);
            return None;
        };

        let hash = key_hash(key);
        let mut cursor = first;
        while let Some(id) = cursor {
            let member = &self.members[id.0];
            if member.key_hash == hash {
                return Some(member.value);
            }
            cursor = member.next;
        }

        self.poison(object);
        None
    }

    /// Looks up an array element by 0-based position.
    ///
    /// # Returns
    ///
    /// The element's value, or `None` if `array` is poisoned, is not an
    /// array, or the index is out of range (the failure cases poison
    /// `array` and its ancestors).
    #[must_use]
    pub fn index(&self, array: ValueId, index: usize) -> Option<ValueId> {
        let node = self.node(array)?;
        if node.poisoned.get() {
            return None;
        }
        let Payload::Array { first, .. } = node.payload else {
            self.poison(array);
            return None;
        };

        let mut cursor = first;
        while let Some(id) = cursor {
            let element = &self.elements[id.0];
            if element.index == index {
                return Some(element.value);
            }
            cursor = element.next;
        }

        self.poison(array);
        None
    }

    /// Type-checks a value as an object.
    ///
    /// # Returns
    ///
    /// The same id if the value is an unpoisoned object; otherwise
    /// poisons and returns `None`.
    #[must_use]
    pub fn as_object(&self, id: ValueId) -> Option<ValueId> {
        let node = self.node(id)?;
        if node.poisoned.get() {
            return None;
        }
        if matches!(node.payload, Payload::Object { .. }) {
            Some(id)
        } else {
            self.poison(id);
            None
        }
    }

    /// Type-checks a value as an array.
    ///
    /// # Returns
    ///
    /// The same id if the value is an unpoisoned array; otherwise poisons
    /// and returns `None`.
    #[must_use]
    pub fn as_array(&self, id: ValueId) -> Option<ValueId> {
        let node = self.node(id)?;
        if node.poisoned.get() {
            return None;
        }
        if matches!(node.payload, Payload::Array { .. }) {
            Some(id)
        } else {
            self.poison(id);
            None
        }
    }

    /// Reads a string value: the raw slice of the source buffer, quotes
    /// trimmed, escapes not decoded.
    #[must_use]
    pub fn as_string(&self, id: ValueId) -> Option<&'src str> {
        let node = self.node(id)?;
        if node.poisoned.get() {
            return None;
        }
        if let Payload::String(text) = node.payload {
            Some(text)
        } else {
            self.poison(id);
            None
        }
    }

    /// Reads a number value.
    #[must_use]
    pub fn as_number(&self, id: ValueId) -> Option<f64> {
        let node = self.node(id)?;
        if node.poisoned.get() {
            return None;
        }
        if let Payload::Number(value) = node.payload {
            Some(value)
        } else {
            self.poison(id);
            None
        }
    }

    /// Reads a boolean value.
    #[must_use]
    pub fn as_boolean(&self, id: ValueId) -> Option<bool> {
        let node = self.node(id)?;
        if node.poisoned.get() {
            return None;
        }
        if let Payload::Boolean(value) = node.payload {
            Some(value)
        } else {
            self.poison(id);
            None
        }
    }

    /// Returns `true` if the value is the literal `null`.
    ///
    /// A predicate, not a query: it never poisons.
    #[must_use]
    pub fn is_null(&self, id: ValueId) -> bool {
        self.node(id)
            .is_some_and(|node| matches!(node.payload, Payload::Null))
    }

    /// Returns an array's element count, or `None` for a non-array.
    ///
    /// Like [`Self::value_type`], inspection only - never poisons.
    #[must_use]
    pub fn array_len(&self, id: ValueId) -> Option<usize> {
        match self.node(id)?.payload {
            Payload::Array { len, .. } => Some(len),
            _ => None,
        }
    }

    /// Serializes the document to bracketed, indented text.
    ///
    /// Two spaces per nesting level, numbers in `%f` form. Object keys are
    /// rendered as their numeric hash: the parser does not retain key
    /// text, a deliberate layout tradeoff, so faithful re-serialization is
    /// out of scope. This output is for debugging and golden files.
    #[must_use]
    pub fn write_string(&self) -> String {
        let mut out = String::new();
        match self.root {
            Some(root) => self.write_value(root, 0, &mut out),
            None => out.push_str("null"),
        }
        out
    }

    /// Prints [`Self::write_string`] to stdout.
    pub fn print(&self) {
        println!("{}", self.write_string());
    }

    /// Resolves an id, without any poison handling.
    #[inline]
    fn node(&self, id: ValueId) -> Option<&ValueNode<'src>> {
        self.values.get(id.0)
    }

    /// Sets the sticky error flag on `id` and every ancestor.
    fn poison(&self, id: ValueId) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                return;
            };
            node.poisoned.set(true);
            cursor = node.parent;
        }
    }

    /// Recursive pretty-printer behind [`Self::write_string`].
    fn write_value(&self, id: ValueId, depth: usize, out: &mut String) {
        let Some(node) = self.node(id) else {
            out.push_str("null");
            return;
        };

        match node.payload {
            Payload::Null => out.push_str("null"),
            Payload::Boolean(true) => out.push_str("true"),
            Payload::Boolean(false) => out.push_str("false"),
            Payload::Number(value) => out.push_str(&format!("{value:.6}")),
            Payload::String(text) => {
                out.push('"');
                out.push_str(text);
                out.push('"');
            }
            Payload::Object { first } => {
                out.push_str("{\n");
                let mut cursor = first;
                while let Some(member_id) = cursor {
                    let member = &self.members[member_id.0];
                    indent(out, depth + 1);
                    out.push_str(&format!("{}: ", member.key_hash));
                    self.write_value(member.value, depth + 1, out);
                    cursor = member.next;
                    if cursor.is_some() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                indent(out, depth);
                out.push('}');
            }
            Payload::Array { first, .. } => {
                out.push_str("[\n");
                let mut cursor = first;
                while let Some(element_id) = cursor {
                    let element = &self.elements[element_id.0];
                    indent(out, depth + 1);
                    self.write_value(element.value, depth + 1, out);
                    cursor = element.next;
                    if cursor.is_some() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                indent(out, depth);
                out.push(']');
            }
        }
    }
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.write_string())
    }
}

/// Writes `depth` levels of two-space indentation.
fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `{"a": 1.0, "b": [true, null]}` by hand.
    fn sample() -> Document<'static> {
        let mut doc = Document::empty();
        let root = doc.push_value(Payload::Object { first: None }, None);

        let a = doc.push_value(Payload::Number(1.0), Some(root));
        doc.prepend_member(root, key_hash("a"), a);

        let b = doc.push_value(Payload::Array { first: None, len: 0 }, Some(root));
        let e0 = doc.push_value(Payload::Boolean(true), Some(b));
        doc.prepend_element(b, e0);
        let e1 = doc.push_value(Payload::Null, Some(b));
        doc.prepend_element(b, e1);
        doc.reverse_elements(b);
        doc.prepend_member(root, key_hash("b"), b);

        doc.set_root(root);
        doc
    }

    #[test]
    fn test_lookup_and_index() {
        let doc = sample();
        let root = doc.root().unwrap();

        let a = doc.lookup(root, "a").unwrap();
        assert_eq!(doc.as_number(a), Some(1.0));

        let b = doc.lookup(root, "b").unwrap();
        assert_eq!(doc.array_len(b), Some(2));
        let e0 = doc.index(b, 0).unwrap();
        assert_eq!(doc.as_boolean(e0), Some(true));
        assert!(doc.is_null(doc.index(b, 1).unwrap()));
    }

    #[test]
    fn test_missing_key_poisons_up_to_root() {
        let doc = sample();
        let root = doc.root().unwrap();
        let b = doc.lookup(root, "b").unwrap();

        assert_eq!(doc.lookup(b, "missing"), None); // b is an array
        assert!(doc.had_error(b));
        assert!(doc.had_error(root));

        // Poisoned nodes refuse even queries that would have succeeded
        assert_eq!(doc.lookup(root, "a"), None);
        assert_eq!(doc.index(b, 0), None);
    }

    #[test]
    fn test_type_mismatch_poisons() {
        let doc = sample();
        let root = doc.root().unwrap();
        let a = doc.lookup(root, "a").unwrap();

        assert_eq!(doc.as_string(a), None); // a is a number
        assert!(doc.had_error(a));
        assert!(doc.had_error(root));
        assert_eq!(doc.as_number(a), None); // sticky
    }

    #[test]
    fn test_out_of_range_index_poisons() {
        let doc = sample();
        let root = doc.root().unwrap();
        let b = doc.lookup(root, "b").unwrap();

        assert_eq!(doc.index(b, 99), None);
        assert!(doc.had_error(b));
        assert!(doc.had_error(root));
    }

    #[test]
    fn test_as_object_and_as_array() {
        let doc = sample();
        let root = doc.root().unwrap();
        assert_eq!(doc.as_object(root), Some(root));

        let b = doc.lookup(root, "b").unwrap();
        assert_eq!(doc.as_array(b), Some(b));
        // Wrong-kind check poisons
        assert_eq!(doc.as_object(b), None);
        assert!(doc.had_error(b));
    }

    #[test]
    fn test_write_string_shape() {
        let doc = sample();
        let text = doc.write_string();
        assert!(text.starts_with("{\n"));
        assert!(text.ends_with('}'));
        assert!(text.contains("1.000000"));
        assert!(text.contains("true"));
        assert!(text.contains("null"));
        // Keys are hashes, not names
        assert!(!text.contains("\"a\""));
        assert!(text.contains(&key_hash("a").to_string()));
    }

    #[test]
    fn test_inspection_does_not_poison() {
        let doc = sample();
        let root = doc.root().unwrap();
        assert_eq!(doc.value_type(root), Some(ValueType::Object));
        assert_eq!(doc.array_len(root), None);
        assert!(!doc.is_null(root));
        assert!(!doc.had_error(root));
    }
}
