use tablero_domain::{Department, FeatureCard, FeatureMap, UserAccess};
use tracing::debug;

/// Application service answering which dashboard features a user may see.
#[derive(Clone, Copy)]
pub struct AccessService {
    feature_map: &'static FeatureMap,
}

impl AccessService {
    /// Creates an access service over a feature map.
    #[must_use]
    pub fn new(feature_map: &'static FeatureMap) -> Self {
        Self { feature_map }
    }

    /// Returns whether the feature is visible to the user.
    #[must_use]
    pub fn is_feature_allowed(&self, feature_id: &str, user: &UserAccess) -> bool {
        let allowed = self.feature_map.is_feature_allowed(feature_id, user);
        debug!(
            feature_id,
            allowed,
            is_admin = user.is_admin(),
            grant_count = user.grants().len(),
            "resolved feature access"
        );

        allowed
    }

    /// Keeps the candidate features visible to the user, in input order.
    #[must_use]
    pub fn filter_features<S>(&self, candidates: &[S], user: &UserAccess) -> Vec<String>
    where
        S: AsRef<str>,
    {
        candidates
            .iter()
            .map(|candidate| candidate.as_ref())
            .filter(|feature_id| self.feature_map.is_feature_allowed(feature_id, user))
            .map(str::to_owned)
            .collect()
    }

    /// Returns the catalog cards visible to the user.
    ///
    /// Cards keep catalog order. When a department is given only its cards
    /// are considered.
    #[must_use]
    pub fn visible_cards(
        &self,
        user: &UserAccess,
        department: Option<Department>,
    ) -> Vec<FeatureCard> {
        let cards: Vec<FeatureCard> = self
            .catalog(department)
            .into_iter()
            .filter(|card| self.feature_map.is_feature_allowed(card.feature_id(), user))
            .collect();
        debug!(
            department = department.map(|value| value.as_str()),
            visible = cards.len(),
            "resolved visible cards"
        );

        cards
    }

    /// Returns the catalog, optionally restricted to one department.
    #[must_use]
    pub fn catalog(&self, department: Option<Department>) -> Vec<FeatureCard> {
        match department {
            Some(department) => FeatureCard::for_department(department).collect(),
            None => FeatureCard::all().to_vec(),
        }
    }
}

impl Default for AccessService {
    fn default() -> Self {
        Self::new(FeatureMap::standard())
    }
}
