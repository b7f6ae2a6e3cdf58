//! Inversion of list → members into member → lists

use crate::error::{Error, Result};
use crate::table::RowView;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Invert per-row `(key, values)` pairs into `value -> keys`.
///
/// `keys[i]` belongs to `values[i]`. The result iterates values in their
/// natural order. Each value's keys appear in row order, once per
/// occurrence of the value in a row, so a row listing a value twice
/// contributes its key twice.
pub fn invert<K, V>(keys: &[K], values: &[Vec<V>]) -> Result<BTreeMap<V, Vec<K>>>
where
    K: Clone,
    V: Ord + Clone,
{
    if keys.len() != values.len() {
        return Err(Error::LengthMismatch {
            keys: keys.len(),
            values: values.len(),
        });
    }

    Ok(invert_pairs(
        keys.iter().zip(values.iter().map(Vec::as_slice)),
    ))
}

fn invert_pairs<'a, K, V, I>(pairs: I) -> BTreeMap<V, Vec<K>>
where
    K: Clone + 'a,
    V: Ord + Clone + 'a,
    I: IntoIterator<Item = (&'a K, &'a [V])> + Clone,
{
    // Every distinct value gets an entry up front, in sorted order
    let mut inverted: BTreeMap<V, Vec<K>> = pairs
        .clone()
        .into_iter()
        .flat_map(|(_, values)| values.iter())
        .map(|value| (value.clone(), Vec::new()))
        .collect();

    for (key, values) in pairs {
        for value in values {
            if let Some(keys) = inverted.get_mut(value) {
                keys.push(key.clone());
            }
        }
    }

    inverted
}

/// Member → lists mapping produced by one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inversion {
    entries: BTreeMap<String, Vec<String>>,
}

impl Inversion {
    /// Invert split rows
    pub fn from_rows(rows: &[RowView]) -> Self {
        let entries = invert_pairs(rows.iter().map(|row| (&row.key, row.values.as_slice())));
        Self { entries }
    }

    /// Number of distinct value tokens
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no row contributed any token
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys (lists) that reference `value`, in row order
    pub fn keys_for(&self, value: &str) -> Option<&[String]> {
        self.entries.get(value).map(Vec::as_slice)
    }

    /// Iterate `(value, keys)` in value order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(value, keys)| (value.as_str(), keys.as_slice()))
    }

    /// Take the underlying map
    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> (Vec<String>, Vec<Vec<String>>) {
        let keys = strings(&["list-c", "list-a", "list-b", "list-d"]);
        let values = vec![
            strings(&["bob", "alice"]),
            strings(&["alice"]),
            strings(&["carol", "bob", "alice"]),
            strings(&[]),
        ];
        (keys, values)
    }

    #[test]
    fn test_invert_basic() {
        let keys = strings(&["x", "y"]);
        let values = vec![strings(&["m1"]), strings(&["m1", "m2"])];
        let inverted = invert(&keys, &values).unwrap();

        assert_eq!(inverted.len(), 2);
        assert_eq!(inverted["m1"], strings(&["x", "y"]));
        assert_eq!(inverted["m2"], strings(&["y"]));
    }

    #[test]
    fn test_values_sorted() {
        let (keys, values) = sample();
        let inverted = invert(&keys, &values).unwrap();
        let order: Vec<&String> = inverted.keys().collect();
        assert_eq!(order, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_keys_follow_row_order() {
        let keys = strings(&["z-list", "a-list"]);
        let values = vec![strings(&["m"]), strings(&["m"])];
        let inverted = invert(&keys, &values).unwrap();
        assert_eq!(inverted["m"], strings(&["z-list", "a-list"]));
    }

    #[test]
    fn test_duplicate_in_row_is_kept() {
        let keys = strings(&["x", "y"]);
        let values = vec![strings(&["m1", "m1"]), strings(&["m1"])];
        let inverted = invert(&keys, &values).unwrap();
        assert_eq!(inverted["m1"], strings(&["x", "x", "y"]));
    }

    #[test]
    fn test_row_without_values_contributes_nothing() {
        let (keys, values) = sample();
        let inverted = invert(&keys, &values).unwrap();
        assert!(inverted.values().all(|ks| !ks.contains(&"list-d".to_string())));
    }

    #[test]
    fn test_length_mismatch() {
        let keys = strings(&["x"]);
        let values: Vec<Vec<String>> = Vec::new();
        assert!(matches!(
            invert(&keys, &values),
            Err(Error::LengthMismatch { keys: 1, values: 0 })
        ));
    }

    #[test]
    fn test_empty_input() {
        let keys: Vec<String> = Vec::new();
        let values: Vec<Vec<String>> = Vec::new();
        assert!(invert(&keys, &values).unwrap().is_empty());
    }

    #[test]
    fn test_generic_over_types() {
        let keys = vec![10u32, 20];
        let values = vec![vec!['b', 'a'], vec!['a']];
        let inverted = invert(&keys, &values).unwrap();
        assert_eq!(inverted[&'a'], vec![10, 20]);
        assert_eq!(inverted[&'b'], vec![10]);
    }

    #[test]
    fn test_idempotent() {
        let (keys, values) = sample();
        let first = invert(&keys, &values).unwrap();
        let second = invert(&keys, &values).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().eq(second.iter()));
    }

    #[test]
    fn test_complete_and_nothing_fabricated() {
        let (keys, values) = sample();
        let inverted = invert(&keys, &values).unwrap();

        for (key, row_values) in keys.iter().zip(&values) {
            for value in row_values {
                assert!(inverted[value].contains(key));
            }
        }
        for (value, value_keys) in &inverted {
            assert!(values.iter().any(|row| row.contains(value)));
            for key in value_keys {
                assert!(keys.contains(key));
            }
        }
    }

    #[test]
    fn test_value_set_independent_of_row_order() {
        let (mut keys, mut values) = sample();
        let forward = invert(&keys, &values).unwrap();
        keys.reverse();
        values.reverse();
        let backward = invert(&keys, &values).unwrap();

        assert!(forward.keys().eq(backward.keys()));
        assert_eq!(forward["alice"], strings(&["list-c", "list-a", "list-b"]));
        assert_eq!(backward["alice"], strings(&["list-b", "list-a", "list-c"]));
    }

    #[test]
    fn test_inversion_from_rows() {
        let rows = vec![
            RowView {
                key: "x".to_string(),
                values: strings(&["m2", "m1"]),
            },
            RowView {
                key: "y".to_string(),
                values: strings(&["m1"]),
            },
        ];
        let inversion = Inversion::from_rows(&rows);

        assert_eq!(inversion.len(), 2);
        assert_eq!(inversion.keys_for("m1"), Some(&strings(&["x", "y"])[..]));
        assert_eq!(inversion.keys_for("m3"), None);
        let order: Vec<&str> = inversion.iter().map(|(value, _)| value).collect();
        assert_eq!(order, vec!["m1", "m2"]);
    }

    #[test]
    fn test_inversion_serializes_as_object() {
        let rows = vec![RowView {
            key: "x".to_string(),
            values: strings(&["m1"]),
        }];
        let json = serde_json::to_string(&Inversion::from_rows(&rows)).unwrap();
        assert_eq!(json, r#"{"m1":["x"]}"#);
    }
}
