mod access;
mod common;

pub use access::{
    CatalogQuery, CheckFeatureAccessRequest, FeatureAccessResponse, FeatureCardResponse,
    FilterFeaturesRequest, FilteredFeaturesResponse, VisibleCardsRequest,
};
pub use common::HealthResponse;
