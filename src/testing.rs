// In-memory catalogue source for unit tests

use crate::client::CatalogueSource;
use crate::error::{FetchError, FetchResult};
use crate::model::{Entry, Stat, Summary, TypeSlot};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

pub fn entry_url(id: u32) -> String {
    format!("fake://pokemon/{}", id)
}

pub fn type_url(name: &str) -> String {
    format!("fake://type/{}", name)
}

pub fn sample_entry(id: u32, name: &str, types: &[&str]) -> Entry {
    Entry {
        id,
        name: name.to_string(),
        types: types
            .iter()
            .map(|t| TypeSlot {
                name: t.to_string(),
                url: type_url(t),
            })
            .collect(),
        abilities: vec!["overgrow".to_string()],
        height: 7,
        weight: 69,
        stats: vec![
            Stat { name: "hp".to_string(), base_value: 45 },
            Stat { name: "attack".to_string(), base_value: 49 },
        ],
    }
}

#[derive(Default)]
pub struct FakeSource {
    entries: Vec<Entry>,
    categories: HashMap<u32, Vec<String>>,
    weaknesses: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    fail_list: bool,
}

impl FakeSource {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    pub fn with_categories(mut self, id: u32, groups: &[&str]) -> Self {
        self.categories
            .insert(id, groups.iter().map(|g| g.to_string()).collect());
        self
    }

    pub fn with_weakness(mut self, type_name: &str, weak_to: &[&str]) -> Self {
        self.weaknesses
            .insert(type_url(type_name), weak_to.iter().map(|w| w.to_string()).collect());
        self
    }

    /// Any request for this URL fails with a 500
    pub fn failing_on(mut self, url: String) -> Self {
        self.failing.insert(url);
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    fn check(&self, url: &str) -> FetchResult<()> {
        if self.failing.contains(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogueSource for FakeSource {
    async fn list_page(&self, offset: usize, limit: usize) -> FetchResult<Vec<Summary>> {
        if self.fail_list {
            return Err(FetchError::Status {
                url: "fake://pokemon".to_string(),
                status: 503,
            });
        }
        Ok(self
            .entries
            .iter()
            .skip(offset)
            .take(limit)
            .map(|e| Summary {
                name: e.name.clone(),
                url: entry_url(e.id),
            })
            .collect())
    }

    async fn entry_at(&self, url: &str) -> FetchResult<Entry> {
        self.check(url)?;
        self.entries
            .iter()
            .find(|e| entry_url(e.id) == url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    async fn entry_by_id(&self, id: u32) -> FetchResult<Entry> {
        self.entry_at(&entry_url(id)).await
    }

    async fn categories(&self, id: u32) -> FetchResult<Vec<String>> {
        let url = format!("fake://pokemon-species/{}/", id);
        self.check(&url)?;
        Ok(self.categories.get(&id).cloned().unwrap_or_default())
    }

    async fn double_damage_from(&self, type_url: &str) -> FetchResult<Vec<String>> {
        self.check(type_url)?;
        Ok(self.weaknesses.get(type_url).cloned().unwrap_or_default())
    }
}
