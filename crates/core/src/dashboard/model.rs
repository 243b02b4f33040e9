//! Dashboard analytics returned by the admin stats endpoint

use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: f64,
    #[serde(default)]
    pub orders: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_cars: u64,
    #[serde(default)]
    pub total_customers: u64,
    #[serde(default)]
    pub orders_by_status: Vec<StatusCount>,
    #[serde(default)]
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

impl DashboardStats {
    pub fn count_for(&self, status: OrderStatus) -> u64 {
        self.orders_by_status
            .iter()
            .filter(|entry| entry.status == status)
            .map(|entry| entry.count)
            .sum()
    }

    /// Orders still needing admin attention
    pub fn open_orders(&self) -> u64 {
        self.orders_by_status
            .iter()
            .filter(|entry| !entry.status.is_terminal() && entry.status != OrderStatus::Completed)
            .map(|entry| entry.count)
            .sum()
    }
}
