use super::normalizer::normalize_key;
use super::MarketDataImportError;
use crate::workflows::negotiation::{
    ProviderError, Violation, ViolationsProvider, STANDARD_TENANT_RIGHTS,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct ViolationsDocument {
    #[serde(default)]
    building_violations: Vec<BuildingViolations>,
    #[serde(default)]
    tenant_rights: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BuildingViolations {
    address: String,
    #[serde(default)]
    violations: Vec<Violation>,
}

/// Building violations keyed by address, plus the tenant rights shown alongside them.
#[derive(Debug, Clone)]
pub struct ViolationsRegistry {
    by_address: HashMap<String, Vec<Violation>>,
    tenant_rights: Vec<String>,
}

impl ViolationsRegistry {
    /// No recorded violations and the standard tenant rights.
    pub fn empty() -> Self {
        Self {
            by_address: HashMap::new(),
            tenant_rights: standard_rights(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, MarketDataImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MarketDataImportError> {
        let document: ViolationsDocument = serde_json::from_reader(reader)?;

        let mut by_address: HashMap<String, Vec<Violation>> = HashMap::new();
        for building in document.building_violations {
            // First entry for an address wins.
            by_address
                .entry(normalize_key(&building.address))
                .or_insert(building.violations);
        }

        let tenant_rights = if document.tenant_rights.is_empty() {
            standard_rights()
        } else {
            document.tenant_rights
        };

        Ok(Self {
            by_address,
            tenant_rights,
        })
    }

    pub fn with_violations(mut self, address: &str, violations: Vec<Violation>) -> Self {
        self.by_address.insert(normalize_key(address), violations);
        self
    }
}

impl Default for ViolationsRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl ViolationsProvider for ViolationsRegistry {
    fn violations(&self, address: &str) -> Result<Vec<Violation>, ProviderError> {
        Ok(self
            .by_address
            .get(&normalize_key(address))
            .cloned()
            .unwrap_or_default())
    }

    fn tenant_rights(&self) -> Vec<String> {
        self.tenant_rights.clone()
    }
}

fn standard_rights() -> Vec<String> {
    STANDARD_TENANT_RIGHTS
        .iter()
        .map(|right| right.to_string())
        .collect()
}
