//! Muscle catalog - the editable list of known muscle groups

use tracing::{error, info};

use crate::db::codec::{decode_catalog, encode_catalog};
use crate::db::{CATALOG_KEY, KeyValueStore};
use crate::error::{Result, ValidationError};

/// Seed list written on first run
pub const DEFAULT_MUSCLES: &[&str] = &["Chest", "Back", "Shoulders"];

/// Larger seed list, opt-in from the CLI
pub const EXTENDED_DEFAULTS: &[&str] = &[
    "Chest",
    "Back",
    "Shoulders",
    "Biceps",
    "Triceps",
    "Core",
    "Glutes",
    "Quads",
    "Hamstrings",
    "Calves",
];

/// Known muscle-group names in insertion order, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MuscleCatalog {
    names: Vec<String>,
}

impl MuscleCatalog {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for name in names {
            let name = name.into();
            let name = name.trim();
            if !name.is_empty() && !catalog.contains(name) {
                catalog.names.push(name.to_string());
            }
        }
        catalog
    }

    /// Load from the store; a missing key yields the seed list, which is saved
    pub fn load<S: KeyValueStore>(store: &mut S, seed: &[&str]) -> Result<Self> {
        match store.get(CATALOG_KEY)? {
            Some(raw) => {
                let catalog = Self::from_names(decode_catalog(&raw)?);
                info!("Loaded {} muscle groups", catalog.names.len());
                Ok(catalog)
            }
            None => {
                let catalog = Self::from_names(seed.iter().copied());
                info!("Seeding muscle catalog with {} groups", catalog.names.len());
                catalog.save(store)?;
                Ok(catalog)
            }
        }
    }

    pub fn list(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Append a new name (trimmed; case-sensitive duplicate check)
    ///
    /// Returns the stored name. If saving fails the name stays in memory.
    pub fn add_muscle<S: KeyValueStore>(&mut self, name: &str, store: &mut S) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.contains(name) {
            return Err(ValidationError::AlreadyExists(name.to_string()).into());
        }

        self.names.push(name.to_string());
        self.save(store)?;
        info!("Added muscle group {}", name);
        Ok(name.to_string())
    }

    /// Remove a name; returns `false` when it was not in the catalog
    ///
    /// Log entries for the muscle are not touched here.
    pub fn remove_muscle<S: KeyValueStore>(&mut self, name: &str, store: &mut S) -> Result<bool> {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        if self.names.len() == before {
            return Ok(false);
        }

        self.save(store)?;
        info!("Removed muscle group {}", name);
        Ok(true)
    }

    fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<()> {
        let raw = encode_catalog(&self.names)?;
        store.set(CATALOG_KEY, &raw).map_err(|e| {
            error!("Error saving muscle catalog: {}", e);
            e
        })?;
        Ok(())
    }
}
