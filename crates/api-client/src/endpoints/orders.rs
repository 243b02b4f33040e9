use rental_core::order::{
    CancelOrderRequest, Order, OrderFilter, OrderStatusUpdate, UpdatePaymentRequest,
};
use rental_core::paging::Paged;

use super::segment;
use crate::client::ApiClient;
use crate::error::Result;
use crate::transport::ApiRequest;

impl ApiClient {
    /// `GET /orders` with the admin list filters as query parameters
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Paged<Order>> {
        let request = filter
            .to_params()
            .into_iter()
            .fold(ApiRequest::get("/orders"), |req, (key, value)| req.query(key, value));
        self.send_paged(request).await
    }

    pub async fn get_order(&self, id: &str) -> Result<Order> {
        self.send_json(ApiRequest::get(format!("/orders/{}", segment(id))))
            .await
    }

    /// `PUT /orders/:id/status`
    pub async fn update_order_status(&self, id: &str, update: &OrderStatusUpdate) -> Result<Order> {
        let request = ApiRequest::put(format!("/orders/{}/status", segment(id))).json(update)?;
        self.send_json(request).await
    }

    /// `PUT /orders/:id/payment-status`
    pub async fn update_payment_status(
        &self,
        id: &str,
        update: &UpdatePaymentRequest,
    ) -> Result<Order> {
        let request =
            ApiRequest::put(format!("/orders/{}/payment-status", segment(id))).json(update)?;
        self.send_json(request).await
    }

    /// `PUT /orders/:id/cancel`
    pub async fn cancel_order(&self, id: &str, cancel: &CancelOrderRequest) -> Result<Order> {
        let request = ApiRequest::put(format!("/orders/{}/cancel", segment(id))).json(cancel)?;
        self.send_json(request).await
    }

    pub async fn delete_order(&self, id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("/orders/{}", segment(id))))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use crate::transport::Method;
    use rental_core::order::{OrderStatus, PaymentStatus};
    use rental_core::session::SessionContext;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_orders_sends_filter() {
        let backend = Arc::new(MockBackend::new("t").route(Method::Get, "/orders", |req| {
            let status = req
                .query
                .iter()
                .find(|(k, _)| k == "status")
                .map(|(_, v)| v.clone());
            json!({
                "data": [{
                    "_id": "o1", "name": "Asha", "email": "a@x.io", "phone": "1",
                    "status": status.and_then(|s| s.parse::<u8>().ok()).unwrap_or(2)
                }],
                "total": 41,
                "page": 3,
                "limit": 20
            })
        }));
        let client = ApiClient::new(backend, SessionContext::with_token("t"));

        let orders = client
            .list_orders(&OrderFilter::default().with_status(OrderStatus::Approved))
            .await
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders.items[0].status, OrderStatus::Approved);
        assert_eq!(orders.total, Some(41));
        assert_eq!(orders.total_pages(), Some(3));
        assert!(!orders.has_more());
    }

    #[tokio::test]
    async fn test_payment_update_sends_integer_code() {
        let backend = Arc::new(MockBackend::new("t").route(
            Method::Put,
            "/orders/o1/payment-status",
            |_| json!({ "_id": "o1", "name": "A", "email": "e", "phone": "p", "paymentStatus": 1 }),
        ));
        let client = ApiClient::new(backend.clone(), SessionContext::with_token("t"));

        let order = client
            .update_payment_status(
                "o1",
                &UpdatePaymentRequest {
                    payment_status: PaymentStatus::Paid,
                },
            )
            .await
            .unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(
            backend.last_json_body("/orders/o1/payment-status").unwrap(),
            json!({ "paymentStatus": 1 })
        );
    }
}
