//! Model catalog types and the testable-model filter.
//!
//! The listing endpoint returns a `models` array where each entry
//! carries a name and its supported generation methods. Only models
//! that support `generateContent` are worth probing, and Gemma models
//! are skipped (they share the endpoint but not the quota pools this
//! tool is watching).

use serde::Deserialize;

/// The catalog payload returned by the model listing endpoint.
/// Missing fields deserialize to empty rather than failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelCatalog {
    #[serde(default)]
    pub models: Vec<CatalogModel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogModel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

/// Return the model names worth probing, in catalog order.
///
/// A model qualifies when its method list contains exactly
/// `generateContent` and its name does not contain `gemma`
/// (case-insensitive).
pub fn extract_testable_models(catalog: &ModelCatalog) -> Vec<String> {
    catalog
        .models
        .iter()
        .filter(|m| m.supported_generation_methods.iter().any(|s| s == "generateContent"))
        .filter(|m| !m.name.to_lowercase().contains("gemma"))
        .map(|m| m.name.clone())
        .collect()
}
