//! Topic filters applied once before the quiz starts.

use crate::config::DrillbookConfig;
use crate::model::Catalog;

/// Which topics to leave out of the quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    /// Drop every topic whose name contains "Regional".
    pub drop_regional: bool,
    /// Drop topics with exactly these names.
    pub excluded: Vec<String>,
}

impl TopicFilter {
    pub fn from_config(config: &DrillbookConfig) -> Self {
        Self {
            drop_regional: config.filter_regional_topics,
            excluded: config.excluded_topics.clone(),
        }
    }

    pub fn is_noop(&self) -> bool {
        !self.drop_regional && self.excluded.is_empty()
    }

    /// Remove filtered topics from `catalog`, returning their names.
    pub fn apply(&self, catalog: &mut Catalog) -> Vec<String> {
        for name in &self.excluded {
            if catalog.topic(name).is_none() {
                tracing::warn!("excluded topic '{name}' is not in the catalog");
            }
        }

        let removed = catalog.retain_topics(|topic| {
            !(self.drop_regional && topic.is_regional())
                && !self.excluded.iter().any(|name| *name == topic.name)
        });
        for name in &removed {
            tracing::info!("filtered out topic '{name}'");
        }
        removed
    }
}
