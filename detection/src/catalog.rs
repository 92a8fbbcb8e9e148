//! Condition catalog.
//!
//! The catalog file is `{"skin_diseases": [ ... ]}`; the position of a record
//! is the classifier class index it answers for. Loaded once at boot and
//! shared read-only.

use crate::error::{CatalogError, DetectionError};
use common::DiseaseRecord;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct CatalogFile {
    skin_diseases: Vec<DiseaseRecord>,
}

/// Ordered, immutable list of known conditions.
#[derive(Debug, Clone)]
pub struct DiseaseCatalog {
    records: Vec<DiseaseRecord>,
}

impl DiseaseCatalog {
    /// Load and validate the catalog file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json_str(&contents)?;
        tracing::info!(path = ?path, conditions = catalog.len(), "Loaded disease catalog");
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_records(file.skin_diseases)
    }

    pub fn from_records(records: Vec<DiseaseRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(index) = records.iter().position(|r| r.name.trim().is_empty()) {
            return Err(CatalogError::InvalidRecord {
                index,
                reason: "name is blank".to_string(),
            });
        }
        Ok(Self { records })
    }

    /// Record for a classifier output index. Never clamps.
    pub fn get(&self, index: usize) -> Result<&DiseaseRecord, DetectionError> {
        self.records.get(index).ok_or(DetectionError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a loaded catalog; empty files are rejected.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Condition names in class order.
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RECORDS: &str = r#"{"skin_diseases": [
        {"name": "Acne", "overview": "o1", "symptoms": ["s"], "causes": ["c"], "treatments": ["t"]},
        {"name": "Eczema", "overview": "o2", "symptoms": [], "causes": [], "treatments": ["Moisturize"]}
    ]}"#;

    #[test]
    fn test_index_maps_to_position() {
        let catalog = DiseaseCatalog::from_json_str(TWO_RECORDS).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().name, "Acne");
        assert_eq!(catalog.get(1).unwrap().name, "Eczema");
        assert_eq!(catalog.names(), vec!["Acne", "Eczema"]);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_out_of_range_is_not_clamped() {
        let catalog = DiseaseCatalog::from_json_str(TWO_RECORDS).unwrap();
        let err = catalog.get(2).unwrap_err();
        assert!(matches!(err, DetectionError::IndexOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let json = r#"{"skin_diseases": [{"name": "Acne", "overview": "o"}]}"#;
        assert!(matches!(
            DiseaseCatalog::from_json_str(json),
            Err(CatalogError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_element_type_is_malformed() {
        let json = r#"{"skin_diseases": [
            {"name": "Acne", "overview": "o", "symptoms": "itchy", "causes": [], "treatments": []}
        ]}"#;
        assert!(matches!(
            DiseaseCatalog::from_json_str(json),
            Err(CatalogError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_and_blank_name_rejected() {
        assert!(matches!(
            DiseaseCatalog::from_json_str(r#"{"skin_diseases": []}"#),
            Err(CatalogError::Empty)
        ));

        let json = r#"{"skin_diseases": [
            {"name": " ", "overview": "o", "symptoms": [], "causes": [], "treatments": []}
        ]}"#;
        assert!(matches!(
            DiseaseCatalog::from_json_str(json),
            Err(CatalogError::InvalidRecord { index: 0, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = DiseaseCatalog::load(dir.path().join("skindisease.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
