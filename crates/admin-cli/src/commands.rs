//! Command handlers

use std::time::Instant;

use anyhow::{bail, Context, Result};
use rental_client::{AdminService, ApiClient, ClientConfig};
use rental_core::guard::AdminGuard;
use rental_core::order::{
    available_actions, DeleteConfirmation, Order, OrderFilter, PaymentStatusDraft,
};
use rental_core::session::{token_expiry, SessionContext};
use tracing::{debug, warn};

use crate::cli::Command;
use crate::keepalive;
use crate::session_file::{SessionFile, StoredSession};

/// Build the service for one invocation from whatever the last one stored
pub fn connect(config: &ClientConfig, stored: Option<&StoredSession>) -> Result<AdminService> {
    let session = match stored {
        Some(stored) => SessionContext::with_token(&stored.token),
        None => SessionContext::new(),
    };
    let client = ApiClient::from_config(config, session)
        .context("Failed to initialize API client")?;
    if let Some(cookies) = stored.and_then(|s| s.cookies.as_deref()) {
        client.restore_cookies(cookies);
    }
    Ok(AdminService::new(client))
}

/// Run a command, then store a rotated session even if the command failed
pub async fn execute(
    command: Command,
    admin: &AdminService,
    config: &ClientConfig,
    session_file: &SessionFile,
    stored: Option<&StoredSession>,
) -> Result<()> {
    let is_auth_command = matches!(command, Command::Login { .. } | Command::Logout);
    let result = run(command, admin, config, session_file).await;
    if is_auth_command {
        return result;
    }

    if let Err(save_err) = persist_refreshed(admin, session_file, stored).await {
        if result.is_ok() {
            return Err(save_err);
        }
        warn!("Failed to store refreshed session: {:#}", save_err);
    }
    result
}

async fn persist_refreshed(
    admin: &AdminService,
    session_file: &SessionFile,
    stored: Option<&StoredSession>,
) -> Result<()> {
    let Some(stored) = stored else {
        return Ok(());
    };
    let session = admin.client().session();
    // a cleared session means the command signed out
    let Some(token) = session.token().await else {
        return Ok(());
    };
    if let Some(next) = stored.refreshed(
        Some(token),
        admin.client().cookies(),
        session.profile().await,
    ) {
        session_file.save(&next).await?;
        debug!("Stored refreshed session in {:?}", session_file.path());
    }
    Ok(())
}

pub async fn run(
    command: Command,
    admin: &AdminService,
    config: &ClientConfig,
    session_file: &SessionFile,
) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let outcome = admin
                .client()
                .login(&email, &password)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            let stored = StoredSession::new(outcome.token, outcome.admin)
                .with_cookies(admin.client().cookies());
            session_file.save(&stored).await?;
            match stored.expires_at() {
                Some(exp) => println!("Signed in as {} (token expires {})", email, exp),
                None => println!("Signed in as {}", email),
            }
        }
        Command::Logout => {
            let result = admin.logout().await;
            session_file.clear().await?;
            if let Err(err) = result {
                tracing::warn!("Server logout failed: {}", err);
            }
            println!("Signed out");
        }
        Command::Refresh => {
            let token = admin
                .client()
                .refresh_session()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            match token_expiry(&token) {
                Some(exp) => println!("Session refreshed (token expires {})", exp),
                None => println!("Session refreshed"),
            }
        }
        Command::Whoami => match admin.client().me().await? {
            Some(profile) => println!("{} <{}>", profile.name, profile.email),
            None => bail!("No admin session"),
        },
        Command::Guard { path } => {
            let mut guard = AdminGuard::with_timeout(&path, config.force_logout_after);
            let redirect = match tokio::time::timeout(
                config.force_logout_after,
                admin.check_session(&mut guard),
            )
            .await
            {
                Ok(redirect) => redirect,
                Err(_) if guard.can_force_logout(Instant::now()) => {
                    println!("Session lookup still pending, signing out locally");
                    session_file.clear().await?;
                    guard.force_logout(admin.client().session()).await
                }
                Err(_) => bail!("Session lookup timed out"),
            };
            match redirect {
                Some(redirect) => println!("{} -> redirect to {}", path, redirect.target()),
                None if guard.should_render() => println!("{} renders", path),
                None => println!("{} is waiting on the session", path),
            }
        }
        Command::Orders {
            status,
            payment,
            search,
            page,
            limit,
        } => {
            let filter = OrderFilter {
                status,
                payment_status: payment,
                search,
                page,
                limit: Some(limit),
            };
            let orders = admin.orders(&filter).await?;
            if orders.is_empty() {
                println!("No orders");
            }
            for order in &orders.items {
                print_order(order);
            }
            if let Some(total) = orders.total {
                println!("{} of {} orders", orders.items.len(), total);
            }
        }
        Command::Cancel { order_id, reason } => {
            let order = admin.order(&order_id).await?;
            let mut draft = admin.cancel_draft(&order).await?;
            draft.select(&reason)?;
            let updated = admin.cancel_order(&draft).await?;
            println!("Order {} is now {}", updated.id, updated.status);
        }
        Command::Payment { order_id, status } => {
            let order = admin.order(&order_id).await?;
            let mut draft = PaymentStatusDraft::new(&order);
            draft.select(status);
            let updated = admin.update_payment_status(&order_id, &draft).await?;
            println!("Order {} payment is now {}", updated.id, updated.payment_status);
        }
        Command::Status { order_id, status } => {
            let order = admin.order(&order_id).await?;
            let updated = admin.update_order_status(&order, status).await?;
            println!("Order {} is now {}", updated.id, updated.status);
        }
        Command::Delete { order_id, yes } => {
            let mut confirmation = DeleteConfirmation::new(&order_id);
            if yes {
                confirmation.acknowledge();
            } else {
                bail!("Refusing to delete order {} without --yes", order_id);
            }
            admin.delete_order(&confirmation).await?;
            println!("Order {} deleted", order_id);
        }
        Command::Reasons => {
            for reason in admin.cancellation_reasons().await? {
                let marker = if reason.is_active() { "active" } else { "inactive" };
                println!("{}  {:<8}  {}", reason.id, marker, reason.reason);
            }
        }
        Command::Dashboard => {
            let stats = admin.dashboard().await?;
            println!("Orders:    {} ({} open)", stats.total_orders, stats.open_orders());
            println!("Revenue:   {:.2}", stats.total_revenue);
            println!("Cars:      {}", stats.total_cars);
            println!("Customers: {}", stats.total_customers);
            for month in &stats.monthly_revenue {
                println!("  {}  {:>12.2}  {} orders", month.month, month.revenue, month.orders);
            }
        }
        Command::Upload { folder, file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {:?}", file))?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("Upload path has no file name")?;
            let uploaded = admin
                .upload(&folder, file_name, bytes)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{}", uploaded.url);
        }
        Command::Keepalive => {
            keepalive::run(
                admin.client().clone(),
                config.keepalive_interval,
                config.keepalive_timeout,
            )
            .await;
        }
    }
    Ok(())
}

fn print_order(order: &Order) {
    let actions: Vec<&str> = available_actions(order)
        .into_iter()
        .map(|action| action.as_str())
        .collect();
    println!(
        "{}  {:<10} {:<8} {:<24} {}  [{}]",
        order.id,
        order.status,
        order.payment_status,
        order.name,
        order.car.as_ref().map(|c| c.name.as_str()).unwrap_or("-"),
        actions.join(", ")
    );
    if let Some(host) = order.host() {
        println!(
            "    host: {} {}",
            host.name,
            host.phone.as_deref().unwrap_or_default()
        );
    }
    if let Some(cancellation) = &order.cancellation {
        println!("    cancelled: {}", cancellation.reason_text);
    }
}
