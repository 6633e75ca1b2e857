use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// 有序的 key -> value 表，序列化为 JSON 对象并保持插入顺序
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<V>(Vec<(String, V)>);

impl<V> Default for Ranked<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> Ranked<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: V) {
        self.0.push((key.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn take(mut self, n: usize) -> Self {
        self.0.truncate(n);
        self
    }

    /// 按 `cmp` 排序，相同时按 key 字典序
    pub fn sorted_by<F>(mut entries: Vec<(String, V)>, mut cmp: F) -> Self
    where
        F: FnMut(&V, &V) -> Ordering,
    {
        entries.sort_by(|a, b| cmp(&a.1, &b.1).then_with(|| a.0.cmp(&b.0)));
        Self(entries)
    }
}

#[cfg(test)]
impl<V> Ranked<V> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl Ranked<usize> {
    /// 频次降序，同频按 key 字典序；`limit` 为 None 时全部保留
    pub fn from_counts(counts: HashMap<String, usize>, limit: Option<usize>) -> Self {
        let ranked = Self::sorted_by(counts.into_iter().collect(), |a, b| b.cmp(a));
        match limit {
            Some(n) => ranked.take(n),
            None => ranked,
        }
    }
}

impl<V> FromIterator<(String, V)> for Ranked<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V: Serialize> Serialize for Ranked<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct RankedVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for RankedVisitor<V> {
    type Value = Ranked<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry::<String, V>()? {
            entries.push((k, v));
        }
        Ok(Ranked(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ranked<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RankedVisitor(PhantomData))
    }
}
