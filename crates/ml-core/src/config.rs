//! Column configuration and presets
//!
//! A [`ColumnSpec`] names the header of the list-address column and of the
//! member column. It is plain data owned by the caller and passed by value
//! into every pipeline run; it can also be kept in a small JSON file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which header names designate the key and value columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Header of the column holding the list address
    pub key_header: String,
    /// Header of the column holding newline-separated members
    pub value_header: String,
}

impl ColumnSpec {
    /// Create a new column spec
    pub fn new(key_header: impl Into<String>, value_header: impl Into<String>) -> Self {
        Self {
            key_header: key_header.into(),
            value_header: value_header.into(),
        }
    }

    /// Replace either side, keeping the other
    pub fn with_overrides(mut self, key_header: Option<String>, value_header: Option<String>) -> Self {
        if let Some(key) = key_header {
            self.key_header = key;
        }
        if let Some(value) = value_header {
            self.value_header = value;
        }
        self
    }

    /// Load a column spec from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the column spec to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ColumnSpec {
    fn default() -> Self {
        PRESETS[0].spec()
    }
}

/// A named, predefined column spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub key_header: &'static str,
    pub value_header: &'static str,
}

/// Presets for the two export formats of the mailing-list service
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "統計確認",
        key_header: "MLアドレス",
        value_header: "MLメンバー",
    },
    Preset {
        name: "ML管理",
        key_header: "MLメールアドレス(編集不可)",
        value_header: "メンバー",
    },
];

impl Preset {
    /// Find a preset by 1-based index or by name
    pub fn lookup(selector: &str) -> Result<&'static Preset> {
        let by_index = selector
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| PRESETS.get(i));

        by_index
            .or_else(|| PRESETS.iter().find(|p| p.name == selector))
            .ok_or_else(|| Error::UnknownPreset(selector.to_string()))
    }

    /// The column spec this preset stands for
    pub fn spec(&self) -> ColumnSpec {
        ColumnSpec::new(self.key_header, self.value_header)
    }

    /// Whether `spec` is exactly this preset
    pub fn matches(&self, spec: &ColumnSpec) -> bool {
        spec.key_header == self.key_header && spec.value_header == self.value_header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first_preset() {
        let spec = ColumnSpec::default();
        assert_eq!(spec.key_header, "MLアドレス");
        assert_eq!(spec.value_header, "MLメンバー");
        assert!(PRESETS[0].matches(&spec));
        assert!(!PRESETS[1].matches(&spec));
    }

    #[test]
    fn test_lookup_by_index() {
        assert_eq!(Preset::lookup("1").unwrap().name, "統計確認");
        assert_eq!(Preset::lookup("2").unwrap().key_header, "MLメールアドレス(編集不可)");
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Preset::lookup("ML管理").unwrap().value_header, "メンバー");
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(matches!(Preset::lookup("0"), Err(Error::UnknownPreset(_))));
        assert!(matches!(Preset::lookup("3"), Err(Error::UnknownPreset(_))));
        assert!(matches!(Preset::lookup("nope"), Err(Error::UnknownPreset(_))));
    }

    #[test]
    fn test_with_overrides_keeps_other_side() {
        let spec = ColumnSpec::default().with_overrides(None, Some("Members".to_string()));
        assert_eq!(spec.key_header, "MLアドレス");
        assert_eq!(spec.value_header, "Members");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("ml-core-spec-{}.json", std::process::id()));
        let spec = ColumnSpec::new("List", "Members");
        spec.save(&path).unwrap();

        let loaded = ColumnSpec::load(&path).unwrap();
        assert_eq!(loaded, spec);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = ColumnSpec::load("/nonexistent/ml-core/spec.json").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
