//! Newsroom roles.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A newsroom role.
///
/// Which roles vote, and with what weight, is decided by the
/// [`RoleWeightRegistry`](crate::roles::RoleWeightRegistry), not by the role itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Writes articles
    Reporter,
    /// Editorial review
    Editor,
    /// Legal review
    LegalReviewer,
    /// Final editorial sign-off
    ChiefEditor,
    /// User and configuration management
    Administrator,
}

impl Role {
    /// All known roles.
    pub const ALL: [Role; 5] = [
        Role::Reporter,
        Role::Editor,
        Role::LegalReviewer,
        Role::ChiefEditor,
        Role::Administrator,
    ];

    /// Canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reporter => "REPORTER",
            Role::Editor => "EDITOR",
            Role::LegalReviewer => "LEGAL_REVIEWER",
            Role::ChiefEditor => "CHIEF_EDITOR",
            Role::Administrator => "ADMINISTRATOR",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Reporter => "Reporter",
            Role::Editor => "Editor",
            Role::LegalReviewer => "Legal Reviewer",
            Role::ChiefEditor => "Chief Editor",
            Role::Administrator => "Administrator",
        }
    }

    /// Label used by the newsroom's existing user directory.
    fn directory_label(&self) -> &'static str {
        match self {
            Role::Reporter => "Reportero",
            Role::Editor => "Editor",
            Role::LegalReviewer => "Revisor Legal",
            Role::ChiefEditor => "Jefe de Redacción",
            Role::Administrator => "Administrador",
        }
    }

    /// Parse a comma separated role list.
    pub fn parse_list(s: &str) -> Result<Vec<Role>> {
        let mut roles = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let role: Role = part.parse()?;
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        Ok(roles)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let normalized = trimmed.strip_prefix("ROLE_").unwrap_or(trimmed);
        Role::ALL
            .into_iter()
            .find(|role| {
                role.as_str().eq_ignore_ascii_case(normalized)
                    || role.display_name().eq_ignore_ascii_case(normalized)
                    || role.directory_label() == normalized
            })
            .ok_or_else(|| Error::Authorization(format!("unknown role '{}'", trimmed)))
    }
}
