//! One page of a list endpoint together with its pagination figures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    /// Matching rows across all pages, when the backend reports it
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl<T> Paged<T> {
    /// A page with no pagination figures, as returned by bare-array endpoints
    pub fn unpaged(items: Vec<T>) -> Self {
        Self {
            items,
            total: None,
            page: None,
            limit: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages at the current limit
    pub fn total_pages(&self) -> Option<u64> {
        let total = self.total?;
        match self.limit {
            Some(limit) if limit > 0 => Some(total.div_ceil(u64::from(limit))),
            _ => Some(u64::from(total > 0)),
        }
    }

    pub fn has_more(&self) -> bool {
        match (self.total, self.page, self.limit) {
            (Some(total), Some(page), Some(limit)) => u64::from(page) * u64::from(limit) < total,
            (Some(total), _, _) => (self.items.len() as u64) < total,
            _ => false,
        }
    }
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self::unpaged(Vec::new())
    }
}

impl<'a, T> IntoIterator for &'a Paged<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
