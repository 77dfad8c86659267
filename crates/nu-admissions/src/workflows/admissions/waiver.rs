use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::catalog::Catalog;

/// Upper bound for any stacked waiver.
pub const MAX_WAIVER_PERCENTAGE: u8 = 100;

/// Combines selected waiver policies into one capped percentage.
#[derive(Debug, Clone)]
pub struct WaiverResolver {
    catalog: Arc<Catalog>,
}

impl WaiverResolver {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Sums the percentages of every known policy id, capped at 100.
    ///
    /// The selection is treated as a set, so a repeated id counts once. Unknown
    /// ids contribute nothing. Policies stack regardless of category.
    pub fn resolve<I, S>(&self, selected: I) -> u8
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected: BTreeSet<String> = selected
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();

        let mut total: u32 = 0;
        for id in &selected {
            let id = id.as_str();
            match self.catalog.policy(id) {
                Some(policy) => total += u32::from(policy.percentage),
                None => debug!(policy_id = id, "skipping unknown waiver policy"),
            }
        }

        total.min(u32::from(MAX_WAIVER_PERCENTAGE)) as u8
    }
}
