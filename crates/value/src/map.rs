use std::collections::{
    btree_map,
    BTreeMap,
};

use crate::{
    FieldPath,
    FieldValue,
};

/// Map payload. Keys are kept sorted by code point so insertion order never
/// leaks into ordering, encoding or canonical ids.
#[derive(Clone, Debug, Default)]
pub struct MapValue(BTreeMap<String, FieldValue>);

impl MapValue {
    pub fn new(fields: BTreeMap<String, FieldValue>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Follows `path` through nested maps. Typed values disguised as maps are
    /// leaves, so a path never descends into a vector or server timestamp.
    pub fn get_path(&self, path: &FieldPath) -> Option<&FieldValue> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.get(first)?;
        for segment in rest {
            let FieldValue::Map(map) = current else {
                return None;
            };
            current = map.get(segment)?;
        }
        Some(current)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn into_inner(self) -> BTreeMap<String, FieldValue> {
        self.0
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o.equals(v)))
    }
}

impl FromIterator<(String, FieldValue)> for MapValue {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for MapValue {
    type IntoIter = btree_map::IntoIter<String, FieldValue>;
    type Item = (String, FieldValue);

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MapValue {
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;
    type Item = (&'a String, &'a FieldValue);

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<BTreeMap<String, FieldValue>> for MapValue {
    fn from(fields: BTreeMap<String, FieldValue>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        val,
        FieldPath,
        FieldValue,
    };

    #[test]
    fn test_get_path() -> anyhow::Result<()> {
        let FieldValue::Map(map) = val!({"a" => {"b" => 1}, "v" => [1.0]}) else {
            panic!("not a map");
        };
        assert_eq!(map.get_path(&"a.b".parse::<FieldPath>()?), Some(&val!(1)));
        assert_eq!(map.get_path(&"a.c".parse::<FieldPath>()?), None);
        assert_eq!(map.get_path(&"a.b.c".parse::<FieldPath>()?), None);
        Ok(())
    }
}
