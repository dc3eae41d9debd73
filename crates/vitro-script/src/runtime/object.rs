//! Script object representation.

use super::value::Value;
use indexmap::IndexMap;

/// A script object with insertion-ordered properties.
///
/// Property order is observable in rendered output, so a plain hash map
/// is not enough here.
#[derive(Debug, Clone, Default)]
pub struct Object {
    properties: IndexMap<String, Value>,
}

impl Object {
    /// Creates a new empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a property value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Sets a property value.
    pub fn set(&mut self, key: String, value: Value) {
        self.properties.insert(key, value);
    }

    /// Deletes a property.
    pub fn delete(&mut self, key: &str) -> bool {
        self.properties.shift_remove(key).is_some()
    }

    /// Checks if a property exists.
    pub fn has(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// The property keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// The properties, in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the object has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_keep_insertion_order() {
        let mut object = Object::new();
        object.set("z".into(), Value::Number(1.0));
        object.set("a".into(), Value::Number(2.0));
        object.set("m".into(), Value::Number(3.0));
        let keys: Vec<_> = object.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn overwrite_keeps_original_position() {
        let mut object = Object::new();
        object.set("a".into(), Value::Number(1.0));
        object.set("b".into(), Value::Number(2.0));
        object.set("a".into(), Value::Number(3.0));
        let keys: Vec<_> = object.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(object.get("a"), Some(&Value::Number(3.0)));
    }
}
