//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod catalog;
mod feature_map;
mod grant;

pub use catalog::{Department, FeatureCard};
pub use feature_map::{FeatureMap, FeatureMapEntry, is_feature_allowed};
pub use grant::{PermissionGrant, UserAccess, normalize_grant_name};
