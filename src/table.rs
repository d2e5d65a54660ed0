//! Shared, insertion-ordered tables.

use crate::Value;
use std::{cell::RefCell, fmt, rc::Rc};

/// A heterogeneous container shared by handle.
///
/// Cloning a `Table` clones the handle, not the contents: clones observe each
/// other's mutations, and `==` is handle identity. Entries keep insertion
/// order. A table whose keys are exactly the integers `1..=n` encodes as a
/// dense array; anything else encodes as a map.
///
/// # Example
///
/// ```
/// use vson::{Table, Value};
///
/// let t = Table::new();
/// t.push(Value::from(10));
/// t.set("kind".into(), "demo".into());
///
/// assert_eq!(t.get(&Value::Int(1)), Value::Int(10));
/// assert_eq!(t.get(&"kind".into()), Value::from("demo"));
/// ```
#[derive(Clone, Default)]
pub struct Table(Rc<RefCell<Vec<(Value, Value)>>>);

impl Table {
    /// Creates an empty table.
    pub fn new() -> Table { Table::default() }

    /// Number of entries.
    pub fn len(&self) -> usize { self.0.borrow().len() }

    /// Indicates whether the table has no entries.
    pub fn is_empty(&self) -> bool { self.0.borrow().is_empty() }

    /// Looks up `key`, returning [`Value::Nil`] when absent.
    ///
    /// Keys compare like host values: numbers numerically, strings by
    /// contents, tables and opaque handles by identity.
    pub fn get(&self, key: &Value) -> Value {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Nil)
    }

    /// Binds `key` to `val`, replacing any previous binding.
    ///
    /// Binding a key to [`Value::Nil`] removes the entry — tables cannot hold
    /// nil. A nil key is ignored.
    pub fn set(&self, key: Value, val: Value) {
        if key.is_nil() {
            return;
        }
        let mut entries = self.0.borrow_mut();
        let found = entries.iter().position(|(k, _)| *k == key);
        match (found, val.is_nil()) {
            (Some(i), true) => {
                entries.remove(i);
            }
            (Some(i), false) => entries[i].1 = val,
            (None, false) => entries.push((key, val)),
            (None, true) => {}
        }
    }

    /// Appends `val` keyed by one more than the current entry count, so that
    /// pushing into a fresh table builds the dense keys `1..=n`.
    pub fn push(&self, val: Value) {
        let mut entries = self.0.borrow_mut();
        let key = Value::Int(entries.len() as i64 + 1);
        entries.push((key, val));
    }

    /// Snapshot of the entries in insertion order.
    pub fn pairs(&self) -> Vec<(Value, Value)> { self.0.borrow().clone() }

    /// Identity comparison: do both handles point at the same table?
    pub fn ptr_eq(&self, other: &Table) -> bool { Rc::ptr_eq(&self.0, &other.0) }

    pub(crate) fn address(&self) -> usize { Rc::as_ptr(&self.0) as usize }
}

impl PartialEq for Table {
    fn eq(&self, other: &Table) -> bool { self.ptr_eq(other) }
}

impl Eq for Table {}

impl fmt::Debug for Table {
    // entries may be cyclic, so print the handle rather than the contents
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Table({:#x}, {} entries)", self.address(), self.len())
    }
}

impl From<Vec<Value>> for Table {
    /// Builds a dense array: values take the keys `1..=n` in order.
    fn from(values: Vec<Value>) -> Table {
        let t = Table::new();
        for v in values {
            t.push(v);
        }
        t
    }
}

impl FromIterator<(Value, Value)> for Table {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Table {
        let t = Table::new();
        for (k, v) in iter {
            t.set(k, v);
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_replace() {
        let t = Table::new();
        t.set(Value::from("a"), Value::Int(1));
        t.set(Value::from("a"), Value::Int(2));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(&Value::from("a")), Value::Int(2));
        assert_eq!(t.get(&Value::from("b")), Value::Nil);
    }

    #[test]
    fn nil_value_removes() {
        let t = Table::new();
        t.set(Value::Int(1), Value::from("x"));
        t.set(Value::Int(1), Value::Nil);
        assert!(t.is_empty());
    }

    #[test]
    fn nil_key_is_ignored() {
        let t = Table::new();
        t.set(Value::Nil, Value::Int(1));
        assert!(t.is_empty());
    }

    #[test]
    fn push_assigns_integer_keys() {
        let t = Table::new();
        t.push(Value::from("x"));
        t.push(Value::from("y"));
        assert_eq!(t.get(&Value::Int(1)), Value::from("x"));
        assert_eq!(t.get(&Value::Int(2)), Value::from("y"));
    }

    #[test]
    fn numeric_keys_compare_numerically() {
        let t = Table::new();
        t.set(Value::Int(3), Value::from("x"));
        assert_eq!(t.get(&Value::from(3.0)), Value::from("x"));
    }

    #[test]
    fn equality_is_identity() {
        let a = Table::new();
        let b = Table::new();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn clones_share_contents() {
        let a = Table::new();
        let b = a.clone();
        b.push(Value::Int(7));
        assert_eq!(a.get(&Value::Int(1)), Value::Int(7));
    }
}
