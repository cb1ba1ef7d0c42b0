//! File and in-memory collaborator implementations

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use super::{CollaboratorError, RequirementsExtractor, VendorSearch};
use crate::domain::{OptionsCatalog, Requirements};

/// Parse a document as JSON when it looks like one, YAML otherwise
fn parse_document<T: serde::de::DeserializeOwned>(text: &str, is_json: bool) -> Result<T, CollaboratorError> {
    if is_json {
        serde_json::from_str(text).map_err(|e| CollaboratorError::Parse(e.to_string()))
    } else {
        serde_yaml::from_str(text).map_err(|e| CollaboratorError::Parse(e.to_string()))
    }
}

fn is_json_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Load requirements from a YAML or JSON file
pub fn load_requirements(path: impl AsRef<Path>) -> Result<Requirements, CollaboratorError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "load_requirements: called");
    let text = std::fs::read_to_string(path)?;
    parse_document(&text, is_json_path(path))
}

/// Load a catalog from a YAML or JSON file
///
/// Accepts either `{options: [...]}` or a bare list of options.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<OptionsCatalog, CollaboratorError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "load_catalog: called");
    let text = std::fs::read_to_string(path)?;
    let json = is_json_path(path);
    match parse_document::<OptionsCatalog>(&text, json) {
        Ok(catalog) => Ok(catalog),
        Err(_) => parse_document(&text, json).map(OptionsCatalog::new),
    }
}

/// Extractor for requests that are already structured YAML or JSON
#[derive(Debug, Clone, Default)]
pub struct StructuredExtractor;

#[async_trait]
impl RequirementsExtractor for StructuredExtractor {
    async fn extract(&self, text: &str) -> Result<Requirements, CollaboratorError> {
        debug!(len = text.len(), "StructuredExtractor::extract: called");
        let json = text.trim_start().starts_with('{');
        parse_document(text, json)
    }
}

/// Vendor search over a fixed catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    catalog: OptionsCatalog,
}

impl StaticCatalog {
    pub fn new(catalog: OptionsCatalog) -> Self {
        Self { catalog }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CollaboratorError> {
        Ok(Self::new(load_catalog(path)?))
    }
}

#[async_trait]
impl VendorSearch for StaticCatalog {
    async fn search(&self, requirements: &Requirements) -> Result<OptionsCatalog, CollaboratorError> {
        debug!(location = %requirements.location, "StaticCatalog::search: called");
        Ok(self.catalog.clone())
    }
}
