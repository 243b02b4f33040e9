//! Order model definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Booking status as stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrderStatus {
    Deleted = 0,
    Approved = 1,
    New = 2,
    Cancelled = 3,
    Started = 4,
    Completed = 5,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        Self::New,
        Self::Approved,
        Self::Started,
        Self::Completed,
        Self::Cancelled,
        Self::Deleted,
    ];

    /// Cancelled and deleted orders accept no further admin action
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Deleted)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Deleted => "Deleted",
            Self::Approved => "Approved",
            Self::New => "New",
            Self::Cancelled => "Cancelled",
            Self::Started => "Started",
            Self::Completed => "Completed",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::New
    }
}

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Deleted),
            1 => Ok(Self::Approved),
            2 => Ok(Self::New),
            3 => Ok(Self::Cancelled),
            4 => Ok(Self::Started),
            5 => Ok(Self::Completed),
            other => Err(Error::InvalidInput(format!("Unknown order status {}", other))),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(code) = value.parse::<u8>() {
            return Self::try_from(code);
        }
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::InvalidInput(format!("Unsupported order status '{}'", value)))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payment state of a booking, freely settable by an admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaymentStatus {
    Unpaid = 0,
    Paid = 1,
    Pending = 2,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [Self::Unpaid, Self::Paid, Self::Pending];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
            Self::Pending => "Pending",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Unpaid
    }
}

impl From<PaymentStatus> for u8 {
    fn from(status: PaymentStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for PaymentStatus {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Unpaid),
            1 => Ok(Self::Paid),
            2 => Ok(Self::Pending),
            other => Err(Error::InvalidInput(format!(
                "Unknown payment status {}",
                other
            ))),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(code) = value.parse::<u8>() {
            return Self::try_from(code);
        }
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::InvalidInput(format!("Unsupported payment status '{}'", value)))
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who supplies the vehicle for a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HostType {
    SelfHosted = 1,
    Attachment = 2,
}

impl Default for HostType {
    fn default() -> Self {
        Self::SelfHosted
    }
}

impl From<HostType> for u8 {
    fn from(host_type: HostType) -> Self {
        host_type as u8
    }
}

impl TryFrom<u8> for HostType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::SelfHosted),
            2 => Ok(Self::Attachment),
            other => Err(Error::InvalidInput(format!("Unknown host type {}", other))),
        }
    }
}

/// Contact record of a third-party vehicle host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostDetails {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub aadhar: Option<String>,
}

/// Reason recorded when an admin cancels an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancellation {
    pub reason_id: String,
    pub reason_text: String,
}

/// Car summary embedded in an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCar {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A customer booking as seen by the admin back-office
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub car: Option<OrderCar>,
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub drop_location: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub host_type: HostType,
    #[serde(default)]
    pub host_details: Option<HostDetails>,
    #[serde(default)]
    pub cancellation: Option<OrderCancellation>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a new order for the given customer
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            car: None,
            pickup_location: None,
            drop_location: None,
            start_date: None,
            end_date: None,
            total_amount: 0.0,
            status: OrderStatus::default(),
            payment_status: PaymentStatus::default(),
            host_type: HostType::default(),
            host_details: None,
            cancellation: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the payment status
    pub fn with_payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = payment_status;
        self
    }

    /// Mark the order as supplied by a third-party host
    pub fn with_host(mut self, details: HostDetails) -> Self {
        self.host_type = HostType::Attachment;
        self.host_details = Some(details);
        self
    }

    /// Host contact, only meaningful for attachment bookings
    pub fn host(&self) -> Option<&HostDetails> {
        match self.host_type {
            HostType::Attachment => self.host_details.as_ref(),
            HostType::SelfHosted => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_codes_round_trip_as_integers() {
        let order = Order::new("o-1", "Asha").with_status(OrderStatus::Started);
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["status"], 4);
        assert_eq!(value["paymentStatus"], 0);
        assert_eq!(value["_id"], "o-1");
    }

    #[test]
    fn test_decode_backend_order() {
        let order: Order = serde_json::from_value(json!({
            "_id": "65f0c0ffee",
            "name": "Ravi",
            "email": "ravi@example.com",
            "phone": "9999999999",
            "status": 3,
            "paymentStatus": 2,
            "hostType": 2,
            "hostDetails": { "name": "Kiran", "phone": "8888888888", "aadhar": "1234" },
            "totalAmount": 4500.0
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.host().map(|h| h.name.as_str()), Some("Kiran"));
        assert!(order.is_cancelled());
    }

    #[test]
    fn test_unknown_status_code_is_rejected() {
        let result = serde_json::from_value::<Order>(json!({
            "_id": "x", "name": "a", "email": "b", "phone": "c", "status": 9
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_host_hidden_for_self_hosted() {
        let mut order = Order::new("o-2", "Meera");
        order.host_details = Some(HostDetails {
            name: "Stale".into(),
            email: None,
            phone: None,
            aadhar: None,
        });
        assert!(order.host().is_none());
    }

    #[test]
    fn test_parse_status_from_label_or_code() {
        assert_eq!("paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert_eq!("2".parse::<PaymentStatus>().unwrap(), PaymentStatus::Pending);
        assert_eq!("Completed".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Deleted.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::Completed.is_terminal());
    }
}
