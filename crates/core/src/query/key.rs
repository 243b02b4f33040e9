use std::fmt;

use crate::order::OrderFilter;

/// Hierarchical cache key, e.g. `admin/orders/status=3`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Extend with one more segment
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn admin_me() -> Self {
        Self::new(["admin", "me"])
    }

    /// Prefix of every admin order listing, whatever the filter
    pub fn admin_orders() -> Self {
        Self::new(["admin", "orders"])
    }

    pub fn admin_orders_filtered(filter: &OrderFilter) -> Self {
        let key = Self::admin_orders();
        if filter.is_empty() {
            key.child("all")
        } else {
            key.child(filter.to_query_string())
        }
    }

    pub fn order(id: &str) -> Self {
        Self::new(["admin", "order", id])
    }

    pub fn cars() -> Self {
        Self::new(["cars"])
    }

    pub fn brands() -> Self {
        Self::new(["brands"])
    }

    pub fn packages() -> Self {
        Self::new(["packages"])
    }

    pub fn cancellation_reasons() -> Self {
        Self::new(["cancellation-reasons"])
    }

    pub fn pages() -> Self {
        Self::new(["pages"])
    }

    pub fn templates() -> Self {
        Self::new(["system-templates"])
    }

    pub fn settings() -> Self {
        Self::new(["settings", "general"])
    }

    pub fn dashboard() -> Self {
        Self::new(["admin", "dashboard"])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderStatus;

    #[test]
    fn test_filtered_orders_share_prefix() {
        let filtered =
            QueryKey::admin_orders_filtered(&OrderFilter::default().with_status(OrderStatus::New));
        assert!(filtered.starts_with(&QueryKey::admin_orders()));
        assert_eq!(filtered.to_string(), "admin/orders/status=2");
        assert!(!QueryKey::order("o1").starts_with(&QueryKey::admin_orders()));
    }
}
