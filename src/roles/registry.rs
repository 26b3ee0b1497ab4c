//! Role weight registry.
//!
//! Holds the voting weight of each reviewer role. The weights of all
//! configured roles add up to [`TOTAL_WEIGHT`], which is the denominator
//! of every approval percentage.

use crate::core::{Error, Result};
use crate::roles::Role;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Sum every valid configuration must reach.
pub const TOTAL_WEIGHT: u32 = 100;

/// Immutable snapshot of role weights.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoleWeightRegistry {
    weights: BTreeMap<Role, u32>,
}

impl RoleWeightRegistry {
    /// Build a registry, validating every weight.
    pub fn new(weights: impl IntoIterator<Item = (Role, i64)>) -> Result<Self> {
        let mut validated = BTreeMap::new();
        for (role, weight) in weights {
            if weight < 0 {
                return Err(Error::Config(format!(
                    "weight for {} must be non-negative, got {}",
                    role, weight
                )));
            }
            let weight = u32::try_from(weight).map_err(|_| {
                Error::Config(format!("weight for {} is out of range: {}", role, weight))
            })?;
            if validated.insert(role, weight).is_some() {
                return Err(Error::Config(format!("role {} configured twice", role)));
            }
        }

        if validated.is_empty() {
            return Err(Error::Config("no voting roles configured".to_string()));
        }

        let total: u64 = validated.values().map(|w| u64::from(*w)).sum();
        if total != u64::from(TOTAL_WEIGHT) {
            return Err(Error::Config(format!(
                "role weights must sum to {}, got {}",
                TOTAL_WEIGHT, total
            )));
        }

        Ok(Self { weights: validated })
    }

    /// Build a registry from role names as they appear in configuration files.
    pub fn from_names(weights: &BTreeMap<String, i64>) -> Result<Self> {
        let mut parsed = Vec::with_capacity(weights.len());
        for (name, weight) in weights {
            let role: Role = name
                .parse()
                .map_err(|_| Error::Config(format!("unknown role '{}' in weights", name)))?;
            parsed.push((role, *weight));
        }
        Self::new(parsed)
    }

    /// Weight of a voting role.
    ///
    /// Roles without a configured weight are not reviewers and may not vote.
    pub fn weight_of(&self, role: Role) -> Result<u32> {
        self.weights
            .get(&role)
            .copied()
            .ok_or_else(|| Error::Authorization(format!("role {} is not a voting role", role)))
    }

    /// Sum of all configured weights.
    pub fn total_weight(&self) -> u32 {
        self.weights.values().sum()
    }

    /// Whether the role may vote.
    pub fn contains(&self, role: Role) -> bool {
        self.weights.contains_key(&role)
    }

    /// Configured voting roles, in stable order.
    pub fn voting_roles(&self) -> Vec<Role> {
        self.weights.keys().copied().collect()
    }

    /// Iterate over `(role, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Role, u32)> + '_ {
        self.weights.iter().map(|(r, w)| (*r, *w))
    }

    /// Role names mapped to weights, as written in configuration.
    pub fn to_names(&self) -> BTreeMap<String, i64> {
        self.iter()
            .map(|(role, weight)| (role.as_str().to_string(), i64::from(weight)))
            .collect()
    }
}

impl Default for RoleWeightRegistry {
    fn default() -> Self {
        Self {
            weights: BTreeMap::from([
                (Role::Editor, 30),
                (Role::LegalReviewer, 30),
                (Role::ChiefEditor, 40),
            ]),
        }
    }
}

/// Shared, swappable registry.
///
/// Readers take an `Arc` snapshot; a replacement never becomes visible to a
/// computation that already holds one.
#[derive(Clone, Debug)]
pub struct RegistryHandle {
    current: Arc<RwLock<Arc<RoleWeightRegistry>>>,
}

impl RegistryHandle {
    pub fn new(registry: RoleWeightRegistry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Result<Arc<RoleWeightRegistry>> {
        let guard = self.current.read().map_err(|_| Error::poisoned("registry"))?;
        Ok(Arc::clone(&*guard))
    }

    /// Atomically replace the registry.
    pub fn replace(&self, registry: RoleWeightRegistry) -> Result<Arc<RoleWeightRegistry>> {
        let next = Arc::new(registry);
        let mut guard = self.current.write().map_err(|_| Error::poisoned("registry"))?;
        *guard = Arc::clone(&next);
        tracing::info!(roles = ?next.voting_roles(), "role weights replaced");
        Ok(next)
    }
}

impl Default for RegistryHandle {
    fn default() -> Self {
        Self::new(RoleWeightRegistry::default())
    }
}
