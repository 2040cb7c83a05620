use super::{DataError, Repository};
use contracts::domain::a001_producer::Producer;
use contracts::domain::a003_municipality::Municipality;
use contracts::domain::a004_color::Color;
use contracts::domain::a005_community::Community;

/// Lookup tables shared by forms, filters and reports
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub producers: Vec<Producer>,
    pub municipalities: Vec<Municipality>,
    pub colors: Vec<Color>,
    pub communities: Vec<Community>,
}

impl ReferenceData {
    /// Fetch the four tables concurrently. The first failure wins.
    pub async fn load(repo: &dyn Repository) -> Result<Self, DataError> {
        let (producers, municipalities, colors, communities) = futures::join!(
            repo.fetch_producers(),
            repo.fetch_municipalities(),
            repo.fetch_colors(),
            repo.fetch_communities(),
        );
        Ok(Self {
            producers: producers?,
            municipalities: municipalities?,
            colors: colors?,
            communities: communities?,
        })
    }

    /// Producers eligible for a new entry, sorted by name
    pub fn active_producers(&self) -> Vec<&Producer> {
        let mut list: Vec<&Producer> = self.producers.iter().filter(|p| p.is_active()).collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn municipality_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .municipalities
            .iter()
            .map(|m| m.name.clone())
            .filter(|n| !n.trim().is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
