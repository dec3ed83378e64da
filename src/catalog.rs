// Static catalog loading. The inventory dataset is bundled into the binary
// and parsed once at startup; records are immutable for the process
// lifetime, so every downstream operation reads the same slice.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::RawInventoryRecord;

const CATALOG_JSON: &str = include_str!("../data/catalog.json");

// The dataset wraps its records in a response/docs envelope.
#[derive(Deserialize)]
struct CatalogFile {
    response: CatalogResponse,
}

#[derive(Deserialize)]
struct CatalogResponse {
    docs: Vec<RawInventoryRecord>,
}

#[derive(Debug)]
pub struct Catalog {
    records: Vec<RawInventoryRecord>,
}

impl Catalog {
    // Parses the bundled dataset. Individual malformed fields are absorbed
    // by the record defaults; only a structurally broken file is an error.
    pub fn load() -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(CATALOG_JSON).context("Failed to parse bundled catalog data")?;
        tracing::info!("Loaded {} catalog records.", file.response.docs.len());
        Ok(Catalog {
            records: file.response.docs,
        })
    }

    pub fn records(&self) -> &[RawInventoryRecord] {
        &self.records
    }

    // Unique maker names, sorted.
    pub fn makers(&self) -> Vec<String> {
        let mut makers: Vec<String> = self
            .records
            .iter()
            .filter(|r| !r.maker_name.is_empty())
            .map(|r| r.maker_name.clone())
            .collect();
        makers.sort();
        makers.dedup();
        makers
    }

    // Unique model names for one maker, sorted.
    pub fn models_for_maker(&self, maker: &str) -> Vec<String> {
        let mut models: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.maker_name == maker && !r.car_model_name.is_empty())
            .map(|r| r.car_model_name.clone())
            .collect();
        models.sort();
        models.dedup();
        models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn bundled_catalog_parses() {
        let catalog = Catalog::load().unwrap();
        assert!(!catalog.records().is_empty());
    }

    #[test]
    fn every_bundled_record_normalizes_cleanly() {
        let catalog = Catalog::load().unwrap();
        for record in catalog.records() {
            let vehicle = normalize(record);
            assert!(!vehicle.name.trim().is_empty());
            assert!(vehicle.price >= 0.0);
        }
    }

    #[test]
    fn makers_are_sorted_and_unique() {
        let catalog = Catalog::load().unwrap();
        let makers = catalog.makers();
        let mut sorted = makers.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(makers, sorted);
        assert!(makers.contains(&"トヨタ".to_string()));
    }

    #[test]
    fn models_for_unknown_maker_is_empty() {
        let catalog = Catalog::load().unwrap();
        assert!(catalog.models_for_maker("フェラーリ").is_empty());
    }
}
