//! Admin service
//!
//! Read-through queries over [`QueryCache`] and mutations that flag the
//! action as pending and invalidate the affected listings on success.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use rental_core::cancellation::{CancellationReason, CancellationReasonInput};
use rental_core::catalog::{
    Brand, BrandInput, Car, CarInput, Package, PackageInput, Page, PageInput, SiteSettings,
    SystemTemplate, SystemTemplateInput, UploadedFile,
};
use rental_core::dashboard::DashboardStats;
use rental_core::guard::{AdminGuard, Redirect};
use rental_core::order::{
    transition, CancelOrderDraft, DeleteConfirmation, Order, OrderAction, OrderFilter,
    OrderStatus, PaymentStatusDraft,
};
use rental_core::paging::Paged;
use rental_core::query::{QueryCache, QueryKey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::{ClientError, Result};

type PendingKey = (OrderAction, String);

/// Order actions currently in flight, used to disable buttons
#[derive(Debug, Clone, Default)]
pub struct PendingActions {
    inner: Arc<Mutex<HashSet<PendingKey>>>,
}

/// Clears the pending flag when dropped
struct PendingGuard {
    actions: PendingActions,
    key: PendingKey,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.actions.inner.lock() {
            inner.remove(&self.key);
        }
    }
}

impl PendingActions {
    pub fn is_pending(&self, action: OrderAction, order_id: &str) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.contains(&(action, order_id.to_string())))
            .unwrap_or(false)
    }

    /// Any action running for this order
    pub fn is_busy(&self, order_id: &str) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.iter().any(|(_, id)| id == order_id))
            .unwrap_or(false)
    }

    fn begin(&self, action: OrderAction, order_id: &str) -> Result<PendingGuard> {
        let key = (action, order_id.to_string());
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ClientError::Config("Pending action registry poisoned".into()))?;
        if !inner.insert(key.clone()) {
            return Err(rental_core::Error::InvalidInput(format!(
                "{} is already in progress for order {}",
                action.as_str(),
                order_id
            ))
            .into());
        }
        Ok(PendingGuard {
            actions: self.clone(),
            key,
        })
    }
}

#[derive(Clone)]
pub struct AdminService {
    client: ApiClient,
    cache: QueryCache,
    pending: PendingActions,
}

impl AdminService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: QueryCache::new(),
            pending: PendingActions::default(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn pending(&self) -> &PendingActions {
        &self.pending
    }

    async fn cached<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.cache.get_fresh(&key).await? {
            debug!("Cache hit for {}", key);
            return Ok(value);
        }
        let value = fetch().await?;
        self.cache.put(key, &value).await?;
        Ok(value)
    }

    async fn invalidate_order(&self, order_id: &str) {
        self.cache.invalidate(&QueryKey::admin_orders()).await;
        self.cache.invalidate(&QueryKey::order(order_id)).await;
        self.cache.invalidate(&QueryKey::dashboard()).await;
    }

    async fn run_order_mutation<T, Fut>(
        &self,
        action: OrderAction,
        order_id: &str,
        mutation: Fut,
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let _pending = self.pending.begin(action, order_id)?;
        let result = mutation.await;
        if result.is_ok() {
            info!("Order {}: {} succeeded", order_id, action.as_str());
            self.invalidate_order(order_id).await;
        }
        result
    }

    // Session

    /// Resolve the current admin and feed the outcome to the guard
    pub async fn check_session(&self, guard: &mut AdminGuard) -> Option<Redirect> {
        let outcome = self.client.me().await;
        guard.on_session_loaded(outcome)
    }

    pub async fn logout(&self) -> Result<()> {
        let result = self.client.logout().await;
        self.cache.clear().await;
        result
    }

    // Orders

    pub async fn orders(&self, filter: &OrderFilter) -> Result<Paged<Order>> {
        self.cached(QueryKey::admin_orders_filtered(filter), || {
            self.client.list_orders(filter)
        })
        .await
    }

    pub async fn order(&self, id: &str) -> Result<Order> {
        self.cached(QueryKey::order(id), || self.client.get_order(id))
            .await
    }

    pub async fn cancel_order(&self, draft: &CancelOrderDraft) -> Result<Order> {
        let request = draft.confirm()?;
        let order_id = draft.order_id();
        self.run_order_mutation(
            OrderAction::Cancel,
            order_id,
            self.client.cancel_order(order_id, &request),
        )
        .await
    }

    pub async fn update_payment_status(
        &self,
        order_id: &str,
        draft: &PaymentStatusDraft,
    ) -> Result<Order> {
        let request = draft.confirm()?;
        self.run_order_mutation(
            OrderAction::UpdatePayment,
            order_id,
            self.client.update_payment_status(order_id, &request),
        )
        .await
    }

    pub async fn update_order_status(&self, order: &Order, to: OrderStatus) -> Result<Order> {
        let update = transition(order.status, to)?;
        self.run_order_mutation(
            OrderAction::UpdateStatus,
            &order.id,
            self.client.update_order_status(&order.id, &update),
        )
        .await
    }

    pub async fn delete_order(&self, confirmation: &DeleteConfirmation) -> Result<()> {
        let order_id = confirmation.confirm()?;
        self.run_order_mutation(
            OrderAction::Delete,
            order_id,
            self.client.delete_order(order_id),
        )
        .await
    }

    // Cancellation reasons

    pub async fn cancellation_reasons(&self) -> Result<Vec<CancellationReason>> {
        self.cached(QueryKey::cancellation_reasons(), || {
            self.client.list_cancellation_reasons()
        })
        .await
    }

    /// Open the cancel dialog for an order with the current reason list
    pub async fn cancel_draft(&self, order: &Order) -> Result<CancelOrderDraft> {
        let reasons = self.cancellation_reasons().await?;
        Ok(CancelOrderDraft::new(order, &reasons))
    }

    pub async fn save_cancellation_reason(
        &self,
        id: Option<&str>,
        input: &CancellationReasonInput,
    ) -> Result<CancellationReason> {
        let saved = match id {
            Some(id) => self.client.update_cancellation_reason(id, input).await?,
            None => self.client.create_cancellation_reason(input).await?,
        };
        self.cache.invalidate(&QueryKey::cancellation_reasons()).await;
        Ok(saved)
    }

    pub async fn delete_cancellation_reason(&self, id: &str) -> Result<()> {
        self.client.delete_cancellation_reason(id).await?;
        self.cache.invalidate(&QueryKey::cancellation_reasons()).await;
        Ok(())
    }

    // Catalog

    pub async fn cars(&self) -> Result<Vec<Car>> {
        self.cached(QueryKey::cars(), || self.client.list_cars()).await
    }

    pub async fn save_car(&self, id: Option<&str>, input: &CarInput) -> Result<Car> {
        let saved = match id {
            Some(id) => self.client.update_car(id, input).await?,
            None => self.client.create_car(input).await?,
        };
        self.cache.invalidate(&QueryKey::cars()).await;
        Ok(saved)
    }

    pub async fn delete_car(&self, id: &str) -> Result<()> {
        self.client.delete_car(id).await?;
        self.cache.invalidate(&QueryKey::cars()).await;
        Ok(())
    }

    pub async fn brands(&self) -> Result<Vec<Brand>> {
        self.cached(QueryKey::brands(), || self.client.list_brands())
            .await
    }

    pub async fn save_brand(&self, id: Option<&str>, input: &BrandInput) -> Result<Brand> {
        let saved = match id {
            Some(id) => self.client.update_brand(id, input).await?,
            None => self.client.create_brand(input).await?,
        };
        self.cache.invalidate(&QueryKey::brands()).await;
        // car rows embed the brand name
        self.cache.invalidate(&QueryKey::cars()).await;
        Ok(saved)
    }

    pub async fn delete_brand(&self, id: &str) -> Result<()> {
        self.client.delete_brand(id).await?;
        self.cache.invalidate(&QueryKey::brands()).await;
        self.cache.invalidate(&QueryKey::cars()).await;
        Ok(())
    }

    pub async fn packages(&self) -> Result<Vec<Package>> {
        self.cached(QueryKey::packages(), || self.client.list_packages())
            .await
    }

    pub async fn save_package(&self, id: Option<&str>, input: &PackageInput) -> Result<Package> {
        let saved = match id {
            Some(id) => self.client.update_package(id, input).await?,
            None => self.client.create_package(input).await?,
        };
        self.cache.invalidate(&QueryKey::packages()).await;
        Ok(saved)
    }

    pub async fn delete_package(&self, id: &str) -> Result<()> {
        self.client.delete_package(id).await?;
        self.cache.invalidate(&QueryKey::packages()).await;
        Ok(())
    }

    // Content

    pub async fn pages(&self) -> Result<Vec<Page>> {
        self.cached(QueryKey::pages(), || self.client.list_pages()).await
    }

    pub async fn save_page(&self, id: Option<&str>, input: &PageInput) -> Result<Page> {
        let saved = match id {
            Some(id) => self.client.update_page(id, input).await?,
            None => self.client.create_page(input).await?,
        };
        self.cache.invalidate(&QueryKey::pages()).await;
        Ok(saved)
    }

    pub async fn delete_page(&self, id: &str) -> Result<()> {
        self.client.delete_page(id).await?;
        self.cache.invalidate(&QueryKey::pages()).await;
        Ok(())
    }

    pub async fn templates(&self) -> Result<Vec<SystemTemplate>> {
        self.cached(QueryKey::templates(), || self.client.list_templates())
            .await
    }

    pub async fn save_template(
        &self,
        id: Option<&str>,
        input: &SystemTemplateInput,
    ) -> Result<SystemTemplate> {
        let saved = match id {
            Some(id) => self.client.update_template(id, input).await?,
            None => self.client.create_template(input).await?,
        };
        self.cache.invalidate(&QueryKey::templates()).await;
        Ok(saved)
    }

    pub async fn delete_template(&self, id: &str) -> Result<()> {
        self.client.delete_template(id).await?;
        self.cache.invalidate(&QueryKey::templates()).await;
        Ok(())
    }

    // Settings, dashboard, uploads

    pub async fn settings(&self) -> Result<SiteSettings> {
        self.cached(QueryKey::settings(), || self.client.get_settings())
            .await
    }

    pub async fn update_settings(&self, settings: &SiteSettings) -> Result<SiteSettings> {
        let saved = self.client.update_settings(settings).await?;
        self.cache.put(QueryKey::settings(), &saved).await?;
        Ok(saved)
    }

    pub async fn dashboard(&self) -> Result<DashboardStats> {
        self.cached(QueryKey::dashboard(), || self.client.dashboard_stats())
            .await
    }

    pub async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        bytes: impl Into<Bytes>,
    ) -> Result<UploadedFile> {
        self.client.upload(folder, file_name, bytes).await
    }
}
