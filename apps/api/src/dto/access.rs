use serde::{Deserialize, Serialize};
use tablero_domain::{FeatureCard, UserAccess};
use ts_rs::TS;

/// Incoming payload for a single feature visibility check.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/check-feature-access-request.ts"
)]
pub struct CheckFeatureAccessRequest {
    pub feature_id: String,
    #[ts(type = "{ isAdmin?: boolean; subvistas?: Array<{ nombre?: string; id?: string | number }> }")]
    pub user: UserAccess,
}

/// Visibility decision for one feature.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/feature-access-response.ts"
)]
pub struct FeatureAccessResponse {
    pub feature_id: String,
    pub allowed: bool,
}

/// Incoming payload for filtering the cards a page wants to render.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/filter-features-request.ts"
)]
pub struct FilterFeaturesRequest {
    pub feature_ids: Vec<String>,
    #[ts(type = "{ isAdmin?: boolean; subvistas?: Array<{ nombre?: string; id?: string | number }> }")]
    pub user: UserAccess,
}

/// Visible subset of the requested features, in request order.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/filtered-features-response.ts"
)]
pub struct FilteredFeaturesResponse {
    pub feature_ids: Vec<String>,
}

/// Incoming payload for listing visible dashboard cards.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/visible-cards-request.ts"
)]
pub struct VisibleCardsRequest {
    #[ts(type = "{ isAdmin?: boolean; subvistas?: Array<{ nombre?: string; id?: string | number }> }")]
    pub user: UserAccess,
    #[serde(default)]
    pub department: Option<String>,
}

/// Catalog query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub department: Option<String>,
}

/// API representation of a dashboard card.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/feature-card-response.ts"
)]
pub struct FeatureCardResponse {
    pub feature_id: String,
    pub department: String,
    pub title: String,
}

impl From<FeatureCard> for FeatureCardResponse {
    fn from(value: FeatureCard) -> Self {
        Self {
            feature_id: value.feature_id().to_owned(),
            department: value.department().as_str().to_owned(),
            title: value.title().to_owned(),
        }
    }
}
