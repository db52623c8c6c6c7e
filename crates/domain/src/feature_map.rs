//! Static association between identity-service grant names and dashboard
//! feature identifiers.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::grant::{UserAccess, normalize_grant_name};

/// One grant name and the feature identifiers it unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMapEntry {
    grant_name: String,
    normalized_grant_name: String,
    feature_ids: Vec<String>,
}

impl FeatureMapEntry {
    /// Creates an entry, normalizing the grant name once.
    #[must_use]
    pub fn new<I, S>(grant_name: impl Into<String>, feature_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let grant_name = grant_name.into();
        Self {
            normalized_grant_name: normalize_grant_name(&grant_name),
            grant_name,
            feature_ids: feature_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the grant name exactly as the identity service spells it.
    #[must_use]
    pub fn grant_name(&self) -> &str {
        self.grant_name.as_str()
    }

    /// Returns the normalized grant name used for matching.
    #[must_use]
    pub fn normalized_grant_name(&self) -> &str {
        self.normalized_grant_name.as_str()
    }

    /// Returns the feature identifiers unlocked by this grant.
    #[must_use]
    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    /// Returns whether this entry unlocks the feature identifier.
    #[must_use]
    pub fn unlocks(&self, feature_id: &str) -> bool {
        self.feature_ids.iter().any(|value| value == feature_id)
    }
}

/// Read-only grant-to-feature table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMap {
    entries: Vec<FeatureMapEntry>,
}

impl FeatureMap {
    /// Builds a map from authored `(grant name, feature ids)` pairs.
    #[must_use]
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a [&'a str])>,
    ) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(grant_name, feature_ids)| {
                    FeatureMapEntry::new(grant_name, feature_ids.iter().copied())
                })
                .collect(),
        }
    }

    /// Returns the dashboard's built-in table.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD_FEATURE_MAP
    }

    /// Returns every entry in authored order.
    #[must_use]
    pub fn entries(&self) -> &[FeatureMapEntry] {
        &self.entries
    }

    /// Returns the distinct feature identifiers reachable through the map.
    #[must_use]
    pub fn feature_ids(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .flat_map(|entry| entry.feature_ids.iter().map(String::as_str))
            .collect()
    }

    /// Decides whether a feature is visible to the user.
    ///
    /// Administrators always pass. Otherwise the feature is visible when at
    /// least one entry unlocking it carries a grant name the user holds.
    /// Unknown feature identifiers are never visible to non-administrators.
    #[must_use]
    pub fn is_feature_allowed(&self, feature_id: &str, user: &UserAccess) -> bool {
        if user.is_admin() {
            return true;
        }

        if user.grants().is_empty() {
            return false;
        }

        let held = user.effective_grant_keys();
        self.entries
            .iter()
            .filter(|entry| entry.unlocks(feature_id))
            .any(|entry| held.contains(entry.normalized_grant_name()))
    }
}

/// Decides visibility against the built-in table.
#[must_use]
pub fn is_feature_allowed(feature_id: &str, user: &UserAccess) -> bool {
    FeatureMap::standard().is_feature_allowed(feature_id, user)
}

static STANDARD_FEATURE_MAP: LazyLock<FeatureMap> =
    LazyLock::new(|| FeatureMap::from_entries(STANDARD_ENTRIES.iter().copied()));

// Misspelled grant names are issued by the identity service as-is and must
// stay mapped next to their corrected forms.
static STANDARD_ENTRIES: &[(&str, &[&str])] = &[
    // Logística
    (
        "INVENTARIO",
        &[
            "inventario-callao",
            "inventario-malvinas",
            "inventario-comparar",
            "inventario-consolidado",
            "inventario-registro",
            "inventario-proformas",
        ],
    ),
    ("INVENTARIO_CALLAO", &["inventario-callao"]),
    ("INVENTARIO_MALVINAS", &["inventario-malvinas"]),
    ("COMPARAR_INVENTARIO", &["inventario-comparar"]),
    ("INVENTARIO_CONSOLIDADO", &["inventario-consolidado"]),
    ("REGISTRO_DE_INVENTARIO", &["inventario-registro"]),
    ("PROFORMAS", &["inventario-proformas"]),
    ("LISTADO_DE_MOVILIDAD", &["listado-movilidad"]),
    ("LISTADO DE MOVILIDAD", &["listado-movilidad"]),
    ("REGISTRO_INCIDENCIA_IMPORTACION_LOGIS", &["incidencias"]),
    ("REGISTRO_INCIDENCIA_IMPORTACION_IOGISTICA", &["incidencias"]),
    ("GUIAS_DE_REMISION", &["guias-remision"]),
    ("GUIAS_DE_REMISON", &["guias-remision"]),
    ("SEGUIMIENTO_DE_IMPORTACIONES", &["seguimiento-importaciones"]),
    ("TRANSFERENCIAS_ENTRE_ALMACENES", &["transferencias-almacen"]),
    // Marketing
    ("GESTION_DE_PRODUCTOS", &["gestion-productos"]),
    (
        "CATALOGO_DE_PRODUCTOS",
        &["catalogo-productos", "gestion-productos"],
    ),
    ("CAMPAÑAS_DE_MARKETING", &["campanas", "calendario-campanas"]),
    ("CAMPANAS_DE_MARKETING", &["campanas", "calendario-campanas"]),
    ("CALENDARIO_DE_CAMPAÑAS", &["calendario-campanas"]),
    // Gerencia
    (
        "REPORTES_GERENCIALES",
        &["reportes-gerenciales", "dashboard-ventas"],
    ),
    ("DASHBOARD_DE_VENTAS", &["dashboard-ventas"]),
    ("METAS_COMERCIALES", &["metas-comerciales"]),
    ("AUDITORIA", &["auditoria"]),
    // Ventas
    ("GESTION_DE_CLIENTES", &["gestion-clientes"]),
    ("LISTADO_DE_VENTAS", &["listado-ventas"]),
    ("REGISTRO_DE_VENTAS", &["registro-ventas"]),
    ("COTIZACIONES", &["cotizaciones"]),
    ("SOLICITUDES_DE_COMPRA", &["solicitudes-compra"]),
    ("SOLICITUDES_DE_COMRPA", &["solicitudes-compra"]),
    // Sistemas
    ("SOPORTE_TECNICO", &["tickets-soporte"]),
    ("GESTION_DE_EQUIPOS", &["inventario-equipos"]),
    ("GESTION_DE_ACCESOS", &["gestion-accesos"]),
];
