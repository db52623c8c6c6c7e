use std::fmt::{Display, Formatter};
use std::str::FromStr;

use tablero_core::{AppError, AppResult};

/// Dashboard department grouping feature cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Department {
    /// Warehouses, imports and transport.
    Logistica,
    /// Products and campaigns.
    Marketing,
    /// Management reporting.
    Gerencia,
    /// Clients, quotes and sales.
    Ventas,
    /// IT support and access administration.
    Sistemas,
}

impl Department {
    /// Returns a stable transport value for this department.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logistica => "logistica",
            Self::Marketing => "marketing",
            Self::Gerencia => "gerencia",
            Self::Ventas => "ventas",
            Self::Sistemas => "sistemas",
        }
    }

    /// Returns all departments in dashboard order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Department] = &[
            Department::Logistica,
            Department::Marketing,
            Department::Gerencia,
            Department::Ventas,
            Department::Sistemas,
        ];

        ALL
    }

    /// Parses a transport value into a department.
    pub fn parse(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }
}

impl FromStr for Department {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "logistica" => Ok(Self::Logistica),
            "marketing" => Ok(Self::Marketing),
            "gerencia" => Ok(Self::Gerencia),
            "ventas" => Ok(Self::Ventas),
            "sistemas" => Ok(Self::Sistemas),
            _ => Err(AppError::Validation(format!(
                "unknown department value '{value}'"
            ))),
        }
    }
}

impl Display for Department {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A dashboard card whose visibility is gated by grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureCard {
    feature_id: &'static str,
    department: Department,
    title: &'static str,
}

impl FeatureCard {
    const fn new(feature_id: &'static str, department: Department, title: &'static str) -> Self {
        Self {
            feature_id,
            department,
            title,
        }
    }

    /// Returns the feature identifier used by UI surfaces.
    #[must_use]
    pub fn feature_id(&self) -> &'static str {
        self.feature_id
    }

    /// Returns the owning department.
    #[must_use]
    pub fn department(&self) -> Department {
        self.department
    }

    /// Returns the card title shown on the dashboard.
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Returns every card in dashboard order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        FEATURE_CATALOG
    }

    /// Finds the card for a feature identifier.
    #[must_use]
    pub fn find(feature_id: &str) -> Option<Self> {
        FEATURE_CATALOG
            .iter()
            .find(|card| card.feature_id == feature_id)
            .copied()
    }

    /// Returns the cards of one department in dashboard order.
    pub fn for_department(department: Department) -> impl Iterator<Item = Self> {
        FEATURE_CATALOG
            .iter()
            .filter(move |card| card.department == department)
            .copied()
    }
}

static FEATURE_CATALOG: &[FeatureCard] = &[
    FeatureCard::new("inventario-callao", Department::Logistica, "Inventario Callao"),
    FeatureCard::new("inventario-malvinas", Department::Logistica, "Inventario Malvinas"),
    FeatureCard::new("inventario-comparar", Department::Logistica, "Comparar inventarios"),
    FeatureCard::new("inventario-consolidado", Department::Logistica, "Inventario consolidado"),
    FeatureCard::new("inventario-registro", Department::Logistica, "Registro de inventario"),
    FeatureCard::new("inventario-proformas", Department::Logistica, "Proformas"),
    FeatureCard::new("listado-movilidad", Department::Logistica, "Listado de movilidad"),
    FeatureCard::new("incidencias", Department::Logistica, "Incidencias de importación"),
    FeatureCard::new("guias-remision", Department::Logistica, "Guías de remisión"),
    FeatureCard::new(
        "seguimiento-importaciones",
        Department::Logistica,
        "Seguimiento de importaciones",
    ),
    FeatureCard::new(
        "transferencias-almacen",
        Department::Logistica,
        "Transferencias entre almacenes",
    ),
    FeatureCard::new("gestion-productos", Department::Marketing, "Gestión de productos"),
    FeatureCard::new("catalogo-productos", Department::Marketing, "Catálogo de productos"),
    FeatureCard::new("campanas", Department::Marketing, "Campañas"),
    FeatureCard::new("calendario-campanas", Department::Marketing, "Calendario de campañas"),
    FeatureCard::new("reportes-gerenciales", Department::Gerencia, "Reportes gerenciales"),
    FeatureCard::new("dashboard-ventas", Department::Gerencia, "Dashboard de ventas"),
    FeatureCard::new("metas-comerciales", Department::Gerencia, "Metas comerciales"),
    FeatureCard::new("auditoria", Department::Gerencia, "Auditoría"),
    FeatureCard::new("gestion-clientes", Department::Ventas, "Gestión de clientes"),
    FeatureCard::new("listado-ventas", Department::Ventas, "Listado de ventas"),
    FeatureCard::new("registro-ventas", Department::Ventas, "Registro de ventas"),
    FeatureCard::new("cotizaciones", Department::Ventas, "Cotizaciones"),
    FeatureCard::new("solicitudes-compra", Department::Ventas, "Solicitudes de compra"),
    FeatureCard::new("tickets-soporte", Department::Sistemas, "Soporte técnico"),
    FeatureCard::new("inventario-equipos", Department::Sistemas, "Inventario de equipos"),
    FeatureCard::new("gestion-accesos", Department::Sistemas, "Gestión de accesos"),
];
