//! Admin order workflow
//!
//! Which actions an order offers, and the drafts behind the cancel,
//! payment and delete dialogs.

use serde::{Deserialize, Serialize};

use super::model::{Order, OrderStatus, PaymentStatus};
use crate::cancellation::{active_reasons, CancellationReason};
use crate::{Error, Result};

/// Action buttons shown on an order row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    Cancel,
    Edit,
    UpdatePayment,
    UpdateStatus,
    Delete,
}

impl OrderAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Edit => "edit",
            Self::UpdatePayment => "update_payment",
            Self::UpdateStatus => "update_status",
            Self::Delete => "delete",
        }
    }
}

/// Actions offered for an order in the admin grid.
///
/// Terminal orders only keep the delete button.
pub fn available_actions(order: &Order) -> Vec<OrderAction> {
    if order.status.is_terminal() {
        return vec![OrderAction::Delete];
    }
    let mut actions = vec![
        OrderAction::Cancel,
        OrderAction::Edit,
        OrderAction::UpdatePayment,
    ];
    if !next_statuses(order.status).is_empty() {
        actions.push(OrderAction::UpdateStatus);
    }
    actions.push(OrderAction::Delete);
    actions
}

impl Order {
    pub fn allows(&self, action: OrderAction) -> bool {
        available_actions(self).contains(&action)
    }
}

/// Forward moves an admin can apply through the status selector
pub fn next_statuses(from: OrderStatus) -> Vec<OrderStatus> {
    match from {
        OrderStatus::New => vec![OrderStatus::Approved],
        OrderStatus::Approved => vec![OrderStatus::Started],
        OrderStatus::Started => vec![OrderStatus::Completed],
        OrderStatus::Completed | OrderStatus::Cancelled | OrderStatus::Deleted => Vec::new(),
    }
}

/// Validate a direct status change.
///
/// Cancellation goes through [`CancelOrderDraft`] so that a reason is
/// always recorded; deletion goes through [`DeleteConfirmation`].
pub fn transition(from: OrderStatus, to: OrderStatus) -> Result<OrderStatusUpdate> {
    if from.is_terminal() {
        return Err(Error::InvalidTransition(format!(
            "{} orders cannot change status",
            from
        )));
    }
    if from == to {
        return Err(Error::InvalidTransition(format!("Order is already {}", to)));
    }
    if !next_statuses(from).contains(&to) {
        return Err(Error::InvalidTransition(format!(
            "Cannot move order from {} to {}",
            from, to
        )));
    }
    Ok(OrderStatusUpdate { status: to })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Payload submitted when cancelling an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub reason_id: String,
    pub reason_text: String,
}

/// State of the cancel dialog
#[derive(Debug, Clone)]
pub struct CancelOrderDraft {
    order_id: String,
    order_status: OrderStatus,
    reasons: Vec<CancellationReason>,
    selected: Option<usize>,
}

impl CancelOrderDraft {
    /// Open the dialog; only active reasons are offered
    pub fn new(order: &Order, reasons: &[CancellationReason]) -> Self {
        Self {
            order_id: order.id.clone(),
            order_status: order.status,
            reasons: active_reasons(reasons).into_iter().cloned().collect(),
            selected: None,
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn options(&self) -> &[CancellationReason] {
        &self.reasons
    }

    pub fn selected(&self) -> Option<&CancellationReason> {
        self.selected.map(|idx| &self.reasons[idx])
    }

    pub fn select(&mut self, reason_id: &str) -> Result<&CancellationReason> {
        let idx = self
            .reasons
            .iter()
            .position(|r| r.id == reason_id)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Reason {} is not an active cancellation reason",
                    reason_id
                ))
            })?;
        self.selected = Some(idx);
        Ok(&self.reasons[idx])
    }

    pub fn can_confirm(&self) -> bool {
        self.selected.is_some() && !self.order_status.is_terminal()
    }

    pub fn confirm(&self) -> Result<CancelOrderRequest> {
        if self.order_status.is_terminal() {
            return Err(Error::InvalidTransition(format!(
                "{} orders cannot be cancelled",
                self.order_status
            )));
        }
        let reason = self
            .selected()
            .ok_or_else(|| Error::InvalidInput("Select a cancellation reason".into()))?;
        Ok(CancelOrderRequest {
            reason_id: reason.id.clone(),
            reason_text: reason.reason.clone(),
        })
    }
}

/// Payload submitted when changing the payment status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,
}

/// State of the payment-status dialog
#[derive(Debug, Clone)]
pub struct PaymentStatusDraft {
    current: PaymentStatus,
    selected: PaymentStatus,
}

impl PaymentStatusDraft {
    pub fn new(order: &Order) -> Self {
        Self {
            current: order.payment_status,
            selected: order.payment_status,
        }
    }

    pub fn options(&self) -> &'static [PaymentStatus] {
        &PaymentStatus::ALL
    }

    pub fn current(&self) -> PaymentStatus {
        self.current
    }

    pub fn selected(&self) -> PaymentStatus {
        self.selected
    }

    pub fn select(&mut self, status: PaymentStatus) {
        self.selected = status;
    }

    pub fn can_confirm(&self) -> bool {
        self.selected != self.current
    }

    pub fn confirm(&self) -> Result<UpdatePaymentRequest> {
        if !self.can_confirm() {
            return Err(Error::InvalidInput(format!(
                "Payment status is already {}",
                self.current
            )));
        }
        Ok(UpdatePaymentRequest {
            payment_status: self.selected,
        })
    }
}

/// Generic two-step confirmation for destructive actions
#[derive(Debug, Clone, Default)]
pub struct DeleteConfirmation {
    target_id: String,
    acknowledged: bool,
}

impl DeleteConfirmation {
    pub fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            acknowledged: false,
        }
    }

    pub fn acknowledge(&mut self) {
        self.acknowledged = true;
    }

    pub fn can_confirm(&self) -> bool {
        self.acknowledged
    }

    /// Returns the id to delete once acknowledged
    pub fn confirm(&self) -> Result<&str> {
        if !self.acknowledged {
            return Err(Error::InvalidInput(
                "Deletion must be confirmed before it is submitted".into(),
            ));
        }
        Ok(&self.target_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::ReasonStatus;

    fn reasons() -> Vec<CancellationReason> {
        vec![
            CancellationReason::new("r1", "Customer request"),
            CancellationReason::new("r2", "Old reason").with_status(ReasonStatus::Inactive),
        ]
    }

    #[test]
    fn test_actions_for_open_orders() {
        for status in [
            OrderStatus::New,
            OrderStatus::Approved,
            OrderStatus::Started,
            OrderStatus::Completed,
        ] {
            let order = Order::new("o", "c").with_status(status);
            assert!(order.allows(OrderAction::Cancel), "{:?}", status);
            assert!(order.allows(OrderAction::Edit), "{:?}", status);
            assert!(order.allows(OrderAction::UpdatePayment), "{:?}", status);
        }
    }

    #[test]
    fn test_cancelled_order_hides_actions() {
        let order = Order::new("o", "c").with_status(OrderStatus::Cancelled);
        assert_eq!(available_actions(&order), vec![OrderAction::Delete]);
    }

    #[test]
    fn test_deleted_order_hides_actions() {
        let order = Order::new("o", "c").with_status(OrderStatus::Deleted);
        assert!(!order.allows(OrderAction::Cancel));
        assert!(!order.allows(OrderAction::UpdatePayment));
    }

    #[test]
    fn test_cancel_disabled_until_reason_selected() {
        let order = Order::new("o-1", "c");
        let mut draft = CancelOrderDraft::new(&order, &reasons());
        assert_eq!(draft.options().len(), 1);
        assert!(!draft.can_confirm());
        assert!(draft.confirm().is_err());

        draft.select("r1").unwrap();
        assert!(draft.can_confirm());
        let request = draft.confirm().unwrap();
        assert_eq!(request.reason_id, "r1");
        assert_eq!(request.reason_text, "Customer request");
    }

    #[test]
    fn test_draft_offers_the_active_reason_list() {
        let order = Order::new("o-1", "c");
        let mut all = reasons();
        all.push(CancellationReason::new("r3", "Vehicle breakdown"));
        all.push(CancellationReason::new("r4", "Duplicate").with_status(ReasonStatus::Inactive));

        let draft = CancelOrderDraft::new(&order, &all);
        let offered: Vec<&str> = draft.options().iter().map(|r| r.id.as_str()).collect();
        let active: Vec<&str> = active_reasons(&all).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(offered, active);
        assert_eq!(offered, vec!["r1", "r3"]);
    }

    #[test]
    fn test_inactive_reason_cannot_be_selected() {
        let order = Order::new("o-1", "c");
        let mut draft = CancelOrderDraft::new(&order, &reasons());
        assert!(draft.select("r2").is_err());
        assert!(!draft.can_confirm());
    }

    #[test]
    fn test_cancel_rejected_for_terminal_order() {
        let order = Order::new("o-1", "c").with_status(OrderStatus::Cancelled);
        let mut draft = CancelOrderDraft::new(&order, &reasons());
        draft.select("r1").unwrap();
        assert!(!draft.can_confirm());
        assert!(matches!(draft.confirm(), Err(Error::InvalidTransition(_))));
    }

    #[test]
    fn test_payment_confirm_requires_change() {
        let order = Order::new("o", "c").with_payment_status(PaymentStatus::Pending);
        let mut draft = PaymentStatusDraft::new(&order);
        assert_eq!(draft.options().len(), 3);
        assert!(!draft.can_confirm());

        draft.select(PaymentStatus::Paid);
        assert!(draft.can_confirm());
        assert_eq!(draft.confirm().unwrap().payment_status, PaymentStatus::Paid);

        draft.select(PaymentStatus::Pending);
        assert!(!draft.can_confirm());
    }

    #[test]
    fn test_payment_can_move_backwards() {
        let order = Order::new("o", "c").with_payment_status(PaymentStatus::Paid);
        let mut draft = PaymentStatusDraft::new(&order);
        draft.select(PaymentStatus::Unpaid);
        assert!(draft.confirm().is_ok());
    }

    #[test]
    fn test_status_transitions() {
        assert!(transition(OrderStatus::New, OrderStatus::Approved).is_ok());
        assert!(transition(OrderStatus::Approved, OrderStatus::Started).is_ok());
        assert!(transition(OrderStatus::Started, OrderStatus::Completed).is_ok());
        assert!(transition(OrderStatus::New, OrderStatus::Completed).is_err());
        assert!(transition(OrderStatus::New, OrderStatus::New).is_err());
        assert!(transition(OrderStatus::Cancelled, OrderStatus::Approved).is_err());
    }

    #[test]
    fn test_delete_requires_acknowledgement() {
        let mut confirmation = DeleteConfirmation::new("o-9");
        assert!(!confirmation.can_confirm());
        assert!(confirmation.confirm().is_err());
        confirmation.acknowledge();
        assert_eq!(confirmation.confirm().unwrap(), "o-9");
    }
}
