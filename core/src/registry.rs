//! Declarative registry of entity types.
//!
//! The registry is external configuration consumed by the engine: an ordered
//! list of [`EntityDescriptor`] values describing which collections a
//! snapshot contains and how each one is compared. Report section order
//! follows registry order. Adding a new entity type to the system means
//! adding a descriptor, never adding code.

use crate::error_codes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// How a collection is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Identity-keyed presence check plus per-property diff of matched
    /// records. Requires `id_field`.
    Entity,
    /// Order-insensitive multiset diff of unidentified records. Never
    /// produces per-property changes.
    Flat,
}

/// Describes one entity type: where its records live and how they are
/// compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Collection key in the snapshot root, or in a parent record for
    /// nested types.
    pub key: String,
    /// Human-readable label used when rendering reports.
    pub label: String,
    pub strategy: Strategy,
    /// Identity field name. Required for [`Strategy::Entity`], forbidden
    /// for [`Strategy::Flat`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,
    /// Nested entity types exposed by matched parent records. Only
    /// meaningful for [`Strategy::Entity`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntityDescriptor>,
}

impl EntityDescriptor {
    /// An entity-strategy descriptor with no children.
    pub fn entity(
        key: impl Into<String>,
        label: impl Into<String>,
        id_field: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            strategy: Strategy::Entity,
            id_field: Some(id_field.into()),
            children: Vec::new(),
        }
    }

    /// A flat-strategy descriptor.
    pub fn flat(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            strategy: Strategy::Flat,
            id_field: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<EntityDescriptor>) -> Self {
        self.children = children;
        self
    }

    fn validate(&self) -> Result<(), RegistryError> {
        match self.strategy {
            Strategy::Entity => {
                if self.id_field.as_deref().map_or(true, str::is_empty) {
                    return Err(RegistryError::MissingIdField {
                        key: self.key.clone(),
                    });
                }
            }
            Strategy::Flat => {
                if self.id_field.is_some() {
                    return Err(RegistryError::IdFieldOnFlat {
                        key: self.key.clone(),
                    });
                }
                if !self.children.is_empty() {
                    return Err(RegistryError::ChildrenOnFlat {
                        key: self.key.clone(),
                    });
                }
            }
        }
        check_sibling_keys(&self.children)?;
        for child in &self.children {
            child.validate()?;
        }
        Ok(())
    }
}

/// An ordered, validated list of entity-type descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    entries: Vec<EntityDescriptor>,
}

impl Registry {
    /// Validate descriptors and build a registry. Entry order is preserved
    /// and determines report section order.
    pub fn from_entries(entries: Vec<EntityDescriptor>) -> Result<Self, RegistryError> {
        check_sibling_keys(&entries)?;
        for entry in &entries {
            entry.validate()?;
        }
        Ok(Self { entries })
    }

    /// Parse a registry from JSON text: an array of descriptors.
    pub fn from_json_str(text: &str) -> Result<Self, RegistryError> {
        let entries: Vec<EntityDescriptor> = serde_json::from_str(text)?;
        Self::from_entries(entries)
    }

    pub fn entries(&self) -> &[EntityDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_sibling_keys(entries: &[EntityDescriptor]) -> Result<(), RegistryError> {
    let mut seen = BTreeSet::new();
    for entry in entries {
        if !seen.insert(entry.key.as_str()) {
            return Err(RegistryError::DuplicateKey {
                key: entry.key.clone(),
            });
        }
    }
    Ok(())
}

/// Errors produced while validating or parsing a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("[SNAPDIFF_REG_001] entity descriptor '{key}' has no id_field. Suggestion: set id_field or switch the descriptor to the flat strategy.")]
    MissingIdField { key: String },

    #[error("[SNAPDIFF_REG_002] flat descriptor '{key}' sets id_field, which only applies to the entity strategy.")]
    IdFieldOnFlat { key: String },

    #[error("[SNAPDIFF_REG_003] flat descriptor '{key}' declares children, which only apply to the entity strategy.")]
    ChildrenOnFlat { key: String },

    #[error("[SNAPDIFF_REG_004] duplicate descriptor key '{key}' among siblings.")]
    DuplicateKey { key: String },

    #[error("[SNAPDIFF_REG_005] registry is not valid JSON: {source}. Suggestion: the registry file must be a JSON array of descriptors.")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

impl RegistryError {
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::MissingIdField { .. } => error_codes::REG_MISSING_ID_FIELD,
            RegistryError::IdFieldOnFlat { .. } => error_codes::REG_ID_FIELD_ON_FLAT,
            RegistryError::ChildrenOnFlat { .. } => error_codes::REG_CHILDREN_ON_FLAT,
            RegistryError::DuplicateKey { .. } => error_codes::REG_DUPLICATE_KEY,
            RegistryError::Parse { .. } => error_codes::REG_PARSE,
        }
    }
}
