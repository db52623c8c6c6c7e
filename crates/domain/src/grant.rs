//! Permission grants as delivered by the external identity service.
//!
//! Grant payloads come from a back-office system that has used several key
//! spellings over time. Each payload shape is read into a raw alias struct
//! and converted into one canonical type.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Normalizes a grant display name for comparison.
///
/// Uppercases, trims surrounding whitespace and replaces every underscore
/// with a single space, so `LISTADO_DE_MOVILIDAD` and `listado de movilidad`
/// compare equal.
#[must_use]
pub fn normalize_grant_name(value: &str) -> String {
    value.to_uppercase().trim().replace('_', " ")
}

/// One access right held by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPermissionGrant")]
pub struct PermissionGrant {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

impl PermissionGrant {
    /// Creates a grant from an optional display name and identifier.
    #[must_use]
    pub fn new(name: Option<String>, id: Option<String>) -> Self {
        Self {
            name: name.filter(|value| !value.trim().is_empty()),
            id: id.filter(|value| !value.trim().is_empty()),
        }
    }

    /// Creates a grant carrying only a display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()), None)
    }

    /// Creates a grant carrying only an identifier.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self::new(None, Some(id.into()))
    }

    /// Returns the display name as issued by the identity service.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn match_keys(&self) -> impl Iterator<Item = String> + '_ {
        let name = self.name.as_deref().map(normalize_grant_name);
        let id = self.id.as_deref().map(|value| value.trim().to_owned());
        name.into_iter()
            .chain(id)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GrantIdentifier {
    Text(String),
    Number(serde_json::Number),
}

impl From<GrantIdentifier> for String {
    fn from(value: GrantIdentifier) -> Self {
        match value {
            GrantIdentifier::Text(text) => text,
            GrantIdentifier::Number(number) => number.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawPermissionGrant {
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default)]
    subvista: Option<String>,
    #[serde(default, rename = "SUBVISTA")]
    subvista_upper: Option<String>,
    #[serde(default)]
    id: Option<GrantIdentifier>,
    #[serde(default)]
    id_subvista: Option<GrantIdentifier>,
}

impl From<RawPermissionGrant> for PermissionGrant {
    fn from(value: RawPermissionGrant) -> Self {
        let name = [value.nombre, value.subvista, value.subvista_upper]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.trim().is_empty());
        let id = [value.id, value.id_subvista]
            .into_iter()
            .flatten()
            .map(String::from)
            .find(|candidate| !candidate.trim().is_empty());

        Self { name, id }
    }
}

/// The slice of a signed-in user that access decisions consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUserAccess")]
pub struct UserAccess {
    #[serde(rename = "isAdmin")]
    is_admin: bool,
    #[serde(rename = "subvistas")]
    grants: Vec<PermissionGrant>,
}

impl UserAccess {
    /// Creates a user access snapshot.
    #[must_use]
    pub fn new(is_admin: bool, grants: Vec<PermissionGrant>) -> Self {
        Self { is_admin, grants }
    }

    /// Creates an administrator snapshot with no explicit grants.
    #[must_use]
    pub fn admin() -> Self {
        Self::new(true, Vec::new())
    }

    /// Creates a non-administrator snapshot holding the given grants.
    #[must_use]
    pub fn with_grants(grants: Vec<PermissionGrant>) -> Self {
        Self::new(false, grants)
    }

    /// Returns whether the user bypasses fine-grained checks.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Returns the grants held by the user.
    #[must_use]
    pub fn grants(&self) -> &[PermissionGrant] {
        &self.grants
    }

    /// Returns every key the user is known to hold: normalized grant names
    /// plus trimmed raw identifiers.
    #[must_use]
    pub fn effective_grant_keys(&self) -> HashSet<String> {
        self.grants
            .iter()
            .flat_map(PermissionGrant::match_keys)
            .collect()
    }
}

#[derive(Deserialize)]
struct RawUserAccess {
    #[serde(default, rename = "isAdmin")]
    is_admin_camel: Option<bool>,
    #[serde(default)]
    is_admin: Option<bool>,
    #[serde(default)]
    subvistas: Option<Vec<PermissionGrant>>,
    #[serde(default)]
    grants: Option<Vec<PermissionGrant>>,
    #[serde(default)]
    permisos: Option<Vec<PermissionGrant>>,
}

impl From<RawUserAccess> for UserAccess {
    fn from(value: RawUserAccess) -> Self {
        let is_admin = value.is_admin_camel.or(value.is_admin).unwrap_or(false);
        let grants = value
            .subvistas
            .or(value.grants)
            .or(value.permisos)
            .unwrap_or_default();

        Self { is_admin, grants }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn normalization_reconciles_underscores_and_spaces() {
        assert_eq!(
            normalize_grant_name("LISTADO_DE_MOVILIDAD"),
            normalize_grant_name("LISTADO DE MOVILIDAD")
        );
        assert_eq!(
            normalize_grant_name("  listado de movilidad  "),
            "LISTADO DE MOVILIDAD"
        );
    }

    #[test]
    fn normalization_uppercases_non_ascii_letters() {
        assert_eq!(
            normalize_grant_name("calendario_de_campañas"),
            "CALENDARIO DE CAMPAÑAS"
        );
    }

    #[test]
    fn grant_reads_each_name_alias() {
        for key in ["nombre", "subvista", "SUBVISTA"] {
            let grant: Result<PermissionGrant, _> =
                serde_json::from_value(json!({ key: "GESTION_DE_CLIENTES" }));
            assert_eq!(
                grant.ok().as_ref().and_then(PermissionGrant::name),
                Some("GESTION_DE_CLIENTES"),
                "alias '{key}' was not read"
            );
        }
    }

    #[test]
    fn grant_prefers_first_non_empty_name_alias() {
        let grant: Result<PermissionGrant, _> = serde_json::from_value(json!({
            "nombre": "  ",
            "subvista": "INVENTARIO",
            "SUBVISTA": "AUDITORIA",
        }));
        assert_eq!(
            grant.ok().as_ref().and_then(PermissionGrant::name),
            Some("INVENTARIO")
        );
    }

    #[test]
    fn grant_accepts_numeric_and_string_identifiers() {
        let numeric: Result<PermissionGrant, _> =
            serde_json::from_value(json!({ "id_subvista": 42 }));
        assert_eq!(numeric.ok().as_ref().and_then(PermissionGrant::id), Some("42"));

        let text: Result<PermissionGrant, _> = serde_json::from_value(json!({ "id": " 17 " }));
        assert_eq!(text.ok().as_ref().and_then(PermissionGrant::id), Some(" 17 "));
    }

    #[test]
    fn user_access_reads_aliases_and_defaults() {
        let user: Result<UserAccess, _> = serde_json::from_value(json!({
            "is_admin": true,
            "grants": [{ "nombre": "AUDITORIA" }],
        }));
        let user = user.unwrap_or_default();
        assert!(user.is_admin());
        assert_eq!(user.grants().len(), 1);

        let empty: Result<UserAccess, _> = serde_json::from_value(json!({}));
        let empty = empty.unwrap_or_else(|_| UserAccess::admin());
        assert!(!empty.is_admin());
        assert!(empty.grants().is_empty());

        let null_grants: Result<UserAccess, _> =
            serde_json::from_value(json!({ "isAdmin": false, "subvistas": null }));
        assert!(null_grants.is_ok_and(|user| user.grants().is_empty()));
    }

    #[test]
    fn user_access_serializes_canonical_shape() {
        let user = UserAccess::with_grants(vec![PermissionGrant::new(
            Some("INVENTARIO".to_owned()),
            Some("7".to_owned()),
        )]);
        let value = serde_json::to_value(&user).unwrap_or_default();
        assert_eq!(
            value,
            json!({ "isAdmin": false, "subvistas": [{ "nombre": "INVENTARIO", "id": "7" }] })
        );

        let restored: Result<UserAccess, _> = serde_json::from_value(value);
        assert_eq!(restored.ok(), Some(user));
    }

    #[test]
    fn effective_keys_hold_normalized_names_and_trimmed_ids() {
        let user = UserAccess::with_grants(vec![
            PermissionGrant::named(" gestion_de_clientes "),
            PermissionGrant::with_id(" 12 "),
            PermissionGrant::named("GESTION DE CLIENTES"),
        ]);

        let keys = user.effective_grant_keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("GESTION DE CLIENTES"));
        assert!(keys.contains("12"));
    }
}
