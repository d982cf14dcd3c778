//! Ordered AMF0 property collection.

use crate::Amf0Value;

/// An ordered collection of named AMF0 values.
///
/// Properties keep their insertion order so that re-encoding is
/// deterministic. Names are unique: [`set`](Self::set) on an existing name
/// removes the old pair and appends the new one, moving it to the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amf0Object {
    properties: Vec<(String, Amf0Value)>,
}

impl Amf0Object {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object with room for `capacity` properties.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            properties: Vec::with_capacity(capacity),
        }
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|(key, _)| key == name)
    }

    /// Set `name` to `value`.
    ///
    /// An existing property with the same name is removed first, so the new
    /// pair always ends up last.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Amf0Value>) {
        let name = name.into();
        if let Some(idx) = self.position(&name) {
            self.properties.remove(idx);
        }

        self.properties.push((name, value.into()));
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&Amf0Value> {
        self.position(name).map(|idx| &self.properties[idx].1)
    }

    /// Look up a property by name for modification.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Amf0Value> {
        let idx = self.position(name)?;
        Some(&mut self.properties[idx].1)
    }

    /// Remove a property, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Amf0Value> {
        let idx = self.position(name)?;
        Some(self.properties.remove(idx).1)
    }

    /// Name of the property at `index`.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.properties.get(index).map(|(key, _)| key.as_str())
    }

    /// Value of the property at `index`.
    pub fn value_at(&self, index: usize) -> Option<&Amf0Value> {
        self.properties.get(index).map(|(_, value)| value)
    }

    /// Iterate over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Amf0Value)> {
        self.properties.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// The string value of `name`, if it exists and is a string.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    /// The number value of `name`, if it exists and is a number.
    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_number()
    }

    /// The boolean value of `name`, if it exists and is a boolean.
    pub fn get_boolean(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_boolean()
    }
}

impl<K, V> FromIterator<(K, V)> for Amf0Object
where
    K: Into<String>,
    V: Into<Amf0Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut object = Self::new();
        for (key, value) in iter {
            object.set(key, value);
        }
        object
    }
}

impl IntoIterator for Amf0Object {
    type IntoIter = std::vec::IntoIter<(String, Amf0Value)>;
    type Item = (String, Amf0Value);

    fn into_iter(self) -> Self::IntoIter {
        self.properties.into_iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Amf0Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn set_moves_existing_key_to_end() {
        let mut object = Amf0Object::new();
        object.set("a", 1.0);
        object.set("b", 2.0);
        object.set("a", 3.0);

        assert_eq!(object.len(), 2);
        assert_eq!(object.key_at(0), Some("b"));
        assert_eq!(object.key_at(1), Some("a"));
        assert_eq!(object.get_number("a"), Some(3.0));
    }

    #[test]
    fn typed_lookups() {
        let object: Amf0Object = [
            ("name", Amf0Value::from("clip")),
            ("width", Amf0Value::from(1280.0)),
            ("stereo", Amf0Value::from(true)),
        ]
        .into_iter()
        .collect();

        assert_eq!(object.get_string("name"), Some("clip"));
        assert_eq!(object.get_number("width"), Some(1280.0));
        assert_eq!(object.get_boolean("stereo"), Some(true));

        // wrong type
        assert_eq!(object.get_number("name"), None);
        assert_eq!(object.get_string("missing"), None);
    }

    #[test]
    fn remove_and_get_mut() {
        let mut object = Amf0Object::new();
        object.set("a", 1.0);
        object.set("b", "x");

        if let Some(value) = object.get_mut("a") {
            *value = Amf0Value::Null;
        }
        assert_eq!(object.get("a"), Some(&Amf0Value::Null));

        assert_eq!(object.remove("b"), Some(Amf0Value::from("x")));
        assert_eq!(object.remove("b"), None);
        assert_eq!(object.len(), 1);
        assert_eq!(object.value_at(1), None);
    }

    #[test]
    fn clone_is_independent() {
        let mut inner = Amf0Object::new();
        inner.set("codec", "avc1");

        let mut source = Amf0Object::new();
        source.set("video", Amf0Value::Object(inner));

        let mut copy = source.clone();
        copy.set("audio", "mp4a");
        if let Some(Amf0Value::Object(video)) = copy.get_mut("video") {
            video.set("codec", "hvc1");
        }

        assert_eq!(source.len(), 1);
        assert_eq!(
            source.get("video").and_then(Amf0Value::as_object).and_then(|v| v.get_string("codec")),
            Some("avc1")
        );
        assert_eq!(
            copy.get("video").and_then(Amf0Value::as_object).and_then(|v| v.get_string("codec")),
            Some("hvc1")
        );
    }

    #[test]
    fn into_iter_keeps_order() {
        let object: Amf0Object = [("z", 1.0), ("a", 2.0)].into_iter().collect();
        let keys: Vec<String> = object.into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["z", "a"]);
    }
}
