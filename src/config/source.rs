use std::collections::{BTreeMap, HashMap};

use regex::Regex;

/// A read-only source of string settings addressed by dotted keys.
///
/// Indexed entries use a decimal segment, e.g. `exemption.bug.0.id`.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<&str>;
    fn keys(&self) -> Vec<&str>;
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }

    fn keys(&self) -> Vec<&str> {
        HashMap::keys(self).map(String::as_str).collect()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }

    fn keys(&self) -> Vec<&str> {
        BTreeMap::keys(self).map(String::as_str).collect()
    }
}

/// Structured settings flattened from a YAML document.
///
/// Mapping keys are joined with `.` and sequence items are addressed by their
/// position, so `{exemption: {bug: [{id: X}]}}` becomes `exemption.bug.0.id = X`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten `value`, prefixing every key with `prefix` (may be empty).
    pub fn from_yaml(prefix: &str, value: &serde_yaml::Value) -> Self {
        let mut values = BTreeMap::new();
        flatten(value, prefix, &mut values);
        Self { values }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Override settings key by key with `other`.
    pub fn overlay(&mut self, other: &HashMap<String, String>) {
        for (key, value) in other {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn to_flat_map(&self) -> HashMap<String, String> {
        self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for Settings {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn keys(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }
}

fn flatten(value: &serde_yaml::Value, prefix: &str, out: &mut BTreeMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let Some(segment) = scalar_to_string(k) else { continue };
                flatten(v, &join(prefix, &segment), out);
            }
        }
        serde_yaml::Value::Sequence(seq) => {
            for (i, v) in seq.iter().enumerate() {
                flatten(v, &join(prefix, &i.to_string()), out);
            }
        }
        serde_yaml::Value::Tagged(tagged) => flatten(&tagged.value, prefix, out),
        serde_yaml::Value::Null => {}
        scalar => {
            if let Some(s) = scalar_to_string(scalar) {
                out.insert(prefix.to_string(), s);
            }
        }
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

/// Trimmed value for `key`, `None` if absent or blank.
pub fn get_text<S: ConfigSource + ?Sized>(source: &S, key: &str) -> Option<String> {
    source
        .get(key)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// True if `key` itself or any key below it is present.
pub fn has_entry<S: ConfigSource + ?Sized>(source: &S, key: &str) -> bool {
    let nested = format!("{}.", key);
    source.keys().iter().any(|k| *k == key || k.starts_with(&nested))
}

/// Sorted, distinct indices `n` for which some `prefix.<n>[.…]` key exists.
///
/// Returns the offending segment as `Err` if one is not a plain decimal
/// number without sign or leading zeros.
pub fn indices<S: ConfigSource + ?Sized>(source: &S, prefix: &str) -> Result<Vec<usize>, String> {
    let re = Regex::new(&format!(r"^{}\.([^.]+)", regex::escape(prefix)))
        .map_err(|e| format!("invalid key prefix '{}': {}", prefix, e))?;

    let mut found = Vec::new();
    for key in source.keys() {
        if let Some(caps) = re.captures(key) {
            let segment = &caps[1];
            let index = segment
                .parse::<usize>()
                .map_err(|_| format!("'{}' in key '{}' is not a numeric index", segment, key))?;
            // Readers look entries up by the canonical form only.
            if segment != index.to_string() {
                return Err(format!(
                    "'{}' in key '{}' is not a canonical index (use '{}')",
                    segment, key, index
                ));
            }
            found.push(index);
        }
    }
    found.sort_unstable();
    found.dedup();
    Ok(found)
}

/// A list setting given either as one comma separated value at `key` or as
/// indexed entries `key.<n>`. Blank items are dropped.
pub fn get_list<S: ConfigSource + ?Sized>(source: &S, key: &str) -> Result<Vec<String>, String> {
    if let Some(value) = source.get(key) {
        return Ok(value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect());
    }

    let mut items = Vec::new();
    for index in indices(source, key)? {
        if let Some(item) = get_text(source, &format!("{}.{}", key, index)) {
            items.push(item);
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> serde_yaml::Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_flatten_nested_mapping_and_sequence() {
        let settings = Settings::from_yaml("", &yaml(
            "exemption:\n  bug:\n    - id: CVE-2014-0050\n      reason: capped\n    - CVE-2015-1111\n  unassessed: all\n"
        ));
        assert_eq!(settings.get("exemption.bug.0.id"), Some("CVE-2014-0050"));
        assert_eq!(settings.get("exemption.bug.0.reason"), Some("capped"));
        assert_eq!(settings.get("exemption.bug.1"), Some("CVE-2015-1111"));
        assert_eq!(settings.get("exemption.unassessed"), Some("all"));
        assert_eq!(settings.len(), 4);
    }

    #[test]
    fn test_flatten_with_prefix_and_scalars() {
        let settings =
            Settings::from_yaml("exemption", &yaml("unassessed: true\nlimit: 3\nempty: ~\n"));
        assert_eq!(settings.get("exemption.unassessed"), Some("true"));
        assert_eq!(settings.get("exemption.limit"), Some("3"));
        assert!(settings.get("exemption.empty").is_none());
    }

    #[test]
    fn test_overlay_replaces_keys() {
        let mut settings = Settings::new();
        settings.insert("exemption.unassessed", "all");
        let mut db = HashMap::new();
        db.insert("exemption.unassessed".to_string(), "off".to_string());
        db.insert("exemption.bug.0".to_string(), "CVE-1".to_string());
        settings.overlay(&db);
        assert_eq!(settings.get("exemption.unassessed"), Some("off"));
        assert_eq!(settings.get("exemption.bug.0"), Some("CVE-1"));
    }

    #[test]
    fn test_indices_sorted_and_distinct() {
        let mut map = HashMap::new();
        map.insert("exemption.bug.10.id".to_string(), "a".to_string());
        map.insert("exemption.bug.2".to_string(), "b".to_string());
        map.insert("exemption.bug.2.reason".to_string(), "c".to_string());
        map.insert("exemption.bugs.7".to_string(), "ignored".to_string());
        map.insert("exemption.scope.0".to_string(), "ignored".to_string());
        assert_eq!(indices(&map, "exemption.bug").unwrap(), vec![2, 10]);
    }

    #[test]
    fn test_indices_rejects_non_numeric_segment() {
        let mut map = HashMap::new();
        map.insert("exemption.bug.first.id".to_string(), "a".to_string());
        let err = indices(&map, "exemption.bug").unwrap_err();
        assert!(err.contains("first"));
    }

    #[test]
    fn test_indices_rejects_non_canonical_segment() {
        for segment in ["01", "+1", "00"] {
            let mut map = HashMap::new();
            map.insert("exemption.bug.1".to_string(), "CVE-1".to_string());
            map.insert(format!("exemption.bug.{}", segment), "CVE-2".to_string());
            let err = indices(&map, "exemption.bug").unwrap_err();
            assert!(err.contains(segment), "{}", err);
        }
    }

    #[test]
    fn test_get_text_trims_and_drops_blank() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), "  x ".to_string());
        map.insert("b".to_string(), "   ".to_string());
        assert_eq!(get_text(&map, "a").as_deref(), Some("x"));
        assert!(get_text(&map, "b").is_none());
        assert!(get_text(&map, "c").is_none());
    }

    #[test]
    fn test_get_list_comma_separated_and_indexed_agree() {
        let mut flat = HashMap::new();
        flat.insert("libs".to_string(), "a:*, b:c ,".to_string());
        let mut indexed = HashMap::new();
        indexed.insert("libs.0".to_string(), "a:*".to_string());
        indexed.insert("libs.1".to_string(), "b:c".to_string());
        assert_eq!(get_list(&flat, "libs").unwrap(), vec!["a:*", "b:c"]);
        assert_eq!(get_list(&indexed, "libs").unwrap(), vec!["a:*", "b:c"]);
    }

    #[test]
    fn test_has_entry() {
        let mut map = HashMap::new();
        map.insert("exemption.unassessed.reason".to_string(), "x".to_string());
        assert!(has_entry(&map, "exemption.unassessed"));
        assert!(!has_entry(&map, "exemption.unassess"));
    }
}
