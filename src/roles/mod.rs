//! Roles Module
//!
//! Newsroom roles and the weight each reviewer role carries in consensus.

pub mod registry;
pub mod role;

pub use registry::{RegistryHandle, RoleWeightRegistry, TOTAL_WEIGHT};
pub use role::Role;
