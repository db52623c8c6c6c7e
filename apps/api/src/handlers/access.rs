use axum::Json;
use axum::extract::{Query, State};
use tablero_domain::Department;

use crate::dto::{
    CatalogQuery, CheckFeatureAccessRequest, FeatureAccessResponse, FeatureCardResponse,
    FilterFeaturesRequest, FilteredFeaturesResponse, VisibleCardsRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn check_feature_access_handler(
    State(state): State<AppState>,
    Json(payload): Json<CheckFeatureAccessRequest>,
) -> Json<FeatureAccessResponse> {
    let allowed = state
        .access_service
        .is_feature_allowed(payload.feature_id.as_str(), &payload.user);

    Json(FeatureAccessResponse {
        feature_id: payload.feature_id,
        allowed,
    })
}

pub async fn filter_features_handler(
    State(state): State<AppState>,
    Json(payload): Json<FilterFeaturesRequest>,
) -> Json<FilteredFeaturesResponse> {
    let feature_ids = state
        .access_service
        .filter_features(&payload.feature_ids, &payload.user);

    Json(FilteredFeaturesResponse { feature_ids })
}

pub async fn visible_cards_handler(
    State(state): State<AppState>,
    Json(payload): Json<VisibleCardsRequest>,
) -> ApiResult<Json<Vec<FeatureCardResponse>>> {
    let department = parse_department(payload.department.as_deref())?;
    let cards = state
        .access_service
        .visible_cards(&payload.user, department)
        .into_iter()
        .map(FeatureCardResponse::from)
        .collect();

    Ok(Json(cards))
}

pub async fn catalog_handler(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<Json<Vec<FeatureCardResponse>>> {
    let department = parse_department(query.department.as_deref())?;
    let cards = state
        .access_service
        .catalog(department)
        .into_iter()
        .map(FeatureCardResponse::from)
        .collect();

    Ok(Json(cards))
}

fn parse_department(value: Option<&str>) -> ApiResult<Option<Department>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Department::parse)
        .transpose()
        .map_err(Into::into)
}
